//! Pursuit: погоня за активной целью (игрок, свет, звук, еда).
//!
//! Re-path только если цель сдвинулась и прошёл cooldown
//! `clamp(distance × multiplier, min, max)`; для звука диапазон другой.

use bevy::prelude::*;

use super::config::PursuitConfig;
use crate::ai::components::{AiState, AiStateType, AiTarget, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::geometry::angle_between;
use crate::ai::perception;
use crate::ai::services::PathStatus;
use crate::components::SensorContact;

pub struct PursuitState {
    config: PursuitConfig,
    timer: f32,
    repath_timer: f32,
    look_at_weight: f32,
}

impl PursuitState {
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            repath_timer: 0.0,
            look_at_weight: 0.0,
        }
    }

    pub fn repath_timer(&self) -> f32 {
        self.repath_timer
    }

    /// Re-path к сдвинувшейся угрозе, если истёк cooldown
    fn repath(&mut self, ctx: &mut ZombieContext<'_>, threat: AiTarget, cooldown: f32) {
        if ctx.target_position() != threat.position() && cooldown < self.repath_timer {
            ctx.set_destination(threat.position());
            self.repath_timer = 0.0;
        }
    }
}

impl AiState<ZombieMachine> for PursuitState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Pursuit
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.nav_agent_control(true, false);
        ctx.zombie.seeking = 0;
        ctx.zombie.feeding = false;
        ctx.zombie.attack_type = 0;

        self.timer = 0.0;
        self.repath_timer = 0.0;
        self.look_at_weight = 0.0;

        let destination = ctx.target_position();
        ctx.set_destination(destination);
        ctx.set_nav_stopped(false);
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        self.timer += ctx.delta;
        self.repath_timer += ctx.delta;

        if self.timer > self.config.max_duration {
            return AiStateType::Patrol;
        }

        let target_kind = ctx.target_kind();
        let reached = ctx.senses.target_reached;

        if target_kind == TargetKind::VisualPlayer && ctx.senses.in_melee_range {
            return AiStateType::Attack;
        }

        if reached {
            match target_kind {
                TargetKind::Audio | TargetKind::VisualLight => {
                    ctx.clear_target();
                    return AiStateType::Alerted;
                }
                TargetKind::VisualFood => return AiStateType::Feeding,
                _ => {}
            }
        }

        let (pending, stale, has_path, status) = ctx
            .nav
            .as_deref()
            .map(|nav| (nav.path_pending(), nav.is_path_stale(), nav.has_path(), nav.path_status()))
            .unwrap_or((false, false, false, PathStatus::Invalid));

        if stale || (!has_path && !pending) || status != PathStatus::Complete {
            return AiStateType::Alerted;
        }

        let visual = ctx.senses.visual_threat;
        let audio = ctx.senses.audio_threat;

        if pending {
            ctx.zombie.speed = 0.0;
        } else {
            ctx.zombie.speed = self.config.speed;
            let root_rotation = ctx.zombie.use_root_rotation();

            if !root_rotation && target_kind == TargetKind::VisualPlayer && visual.is(TargetKind::VisualPlayer) && reached
            {
                let target = ctx.target_position();
                ctx.snap_facing(target);
            } else if !root_rotation && !reached {
                ctx.face_desired_velocity(self.config.slerp_speed);
            } else if reached {
                return AiStateType::Alerted;
            }
        }

        if visual.is(TargetKind::VisualPlayer) {
            let cooldown = self.config.visual_repath_cooldown(visual.distance());
            self.repath(ctx, visual, cooldown);
            ctx.set_target(visual);
            return AiStateType::Pursuit;
        }

        if target_kind == TargetKind::VisualPlayer {
            return AiStateType::Pursuit;
        }

        if visual.is(TargetKind::VisualLight) {
            match target_kind {
                TargetKind::Audio | TargetKind::VisualFood => {
                    ctx.set_target(visual);
                    return AiStateType::Alerted;
                }
                TargetKind::VisualLight => {
                    if ctx.target().source() == visual.source() {
                        let cooldown = self.config.visual_repath_cooldown(visual.distance());
                        self.repath(ctx, visual, cooldown);
                        ctx.set_target(visual);
                        return AiStateType::Pursuit;
                    }

                    ctx.set_target(visual);
                    return AiStateType::Alerted;
                }
                _ => {}
            }
        } else if audio.is(TargetKind::Audio) {
            match target_kind {
                TargetKind::VisualFood => {
                    ctx.set_target(audio);
                    return AiStateType::Alerted;
                }
                TargetKind::Audio => {
                    if ctx.target().source() == audio.source() {
                        let cooldown = self.config.audio_repath_cooldown(audio.distance());
                        self.repath(ctx, audio, cooldown);
                        ctx.set_target(audio);
                        return AiStateType::Pursuit;
                    }

                    ctx.set_target(audio);
                    return AiStateType::Alerted;
                }
                _ => {}
            }
        }

        AiStateType::Pursuit
    }

    fn on_animator_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.apply_root_motion();
    }

    fn on_animator_ik_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        if ctx.animator.is_none() {
            return;
        }

        let target = ctx.target_position();
        let t = ctx.delta.clamp(0.0, 1.0);

        if angle_between(ctx.forward(), target - ctx.position()) < self.config.look_at_angle_threshold {
            self.look_at_weight += (self.config.look_at_weight - self.look_at_weight) * t;
            ctx.set_look_at(target + Vec3::Y, self.look_at_weight);
        } else {
            self.look_at_weight += (0.0 - self.look_at_weight) * t;
            ctx.set_look_at(target + Vec3::Y, self.look_at_weight);
        }
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }
}
