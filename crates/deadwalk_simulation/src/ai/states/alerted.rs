//! Alerted: стоит, крутится к лучшему стимулу, ждёт развязки.
//!
//! Turn bias (`seeking`) пересчитывается раз в `direction_change_time`,
//! а не каждый тик: иначе зомби дёргается на месте.

use bevy::prelude::*;
use rand::Rng;

use super::config::AlertedConfig;
use crate::ai::components::{AiState, AiStateType, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::geometry::{flatten, sign_i32, signed_angle};
use crate::ai::perception;
use crate::components::SensorContact;

/// Минимальный шанс крика после состоявшегося крика
const SCREAM_CHANCE_AFTER_SCREAM: f32 = f32::MIN;

pub struct AlertedState {
    config: AlertedConfig,
    timer: f32,
    direction_change_timer: f32,
    scream_chance: f32,
    next_scream: f32,
}

impl AlertedState {
    pub fn new(config: AlertedConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            direction_change_timer: 0.0,
            scream_chance: 0.0,
            next_scream: 0.0,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Случайный знак -1/1
    fn random_sign(ctx: &mut ZombieContext<'_>) -> i32 {
        if ctx.rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    }

    /// Пора пересчитать turn bias (сбрасывает таймер)
    fn direction_change_due(&mut self) -> bool {
        if self.direction_change_timer > self.config.direction_change_time {
            self.direction_change_timer = 0.0;
            true
        } else {
            false
        }
    }
}

impl AiState<ZombieMachine> for AlertedState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Alerted
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.nav_agent_control(true, false);
        ctx.zombie.speed = 0.0;
        ctx.zombie.seeking = 0;
        ctx.zombie.feeding = false;
        ctx.zombie.attack_type = 0;

        self.timer = self.config.max_duration;
        self.direction_change_timer = 0.0;
        self.scream_chance = ctx.zombie.profile.scream_chance - ctx.random_unit();
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        self.timer -= ctx.delta;
        self.direction_change_timer += ctx.delta;

        if self.timer <= 0.0 {
            if let Some(waypoint) = ctx.waypoint_position(false) {
                ctx.set_destination(waypoint);
                ctx.set_nav_stopped(false);
            }
            self.timer = self.config.max_duration;
        }

        let visual = ctx.senses.visual_threat;
        let audio = ctx.senses.audio_threat;

        if visual.is(TargetKind::VisualPlayer) {
            ctx.set_target(visual);

            if self.scream_chance > 0.0 && ctx.now > self.next_scream && ctx.scream() {
                self.scream_chance = SCREAM_CHANCE_AFTER_SCREAM;
                self.next_scream = ctx.now + self.config.scream_frequency;
                return AiStateType::Alerted;
            }

            return AiStateType::Pursuit;
        }

        if audio.is(TargetKind::Audio) {
            ctx.set_target(audio);
            self.timer = self.config.max_duration;
        }

        if visual.is(TargetKind::VisualLight) {
            ctx.set_target(visual);
            self.timer = self.config.max_duration;
        }

        if audio.is_none() && visual.is(TargetKind::VisualFood) && ctx.target_kind() == TargetKind::None {
            ctx.set_target(visual);
            return AiStateType::Pursuit;
        }

        let target_kind = ctx.target_kind();
        let intelligence = ctx.zombie.profile.intelligence;

        if matches!(target_kind, TargetKind::Audio | TargetKind::VisualLight) && !ctx.senses.target_reached {
            let angle = signed_angle(ctx.forward(), flatten(ctx.target_position() - ctx.position()));

            if target_kind == TargetKind::Audio && angle.abs() < self.config.threat_angle_threshold {
                return AiStateType::Pursuit;
            }

            if self.direction_change_due() {
                let seeking = if ctx.random_unit() < intelligence {
                    sign_i32(angle)
                } else {
                    Self::random_sign(ctx)
                };
                ctx.zombie.seeking = seeking;
            }
        } else if target_kind == TargetKind::Waypoint && !ctx.nav.as_deref().is_some_and(|nav| nav.path_pending()) {
            let steering = ctx.nav.as_deref().map(|nav| nav.steering_target());
            if let Some(steering) = steering {
                let angle = signed_angle(ctx.forward(), flatten(steering - ctx.position()));
                if angle.abs() < self.config.waypoint_angle_threshold {
                    return AiStateType::Patrol;
                }

                if self.direction_change_due() {
                    ctx.zombie.seeking = sign_i32(angle);
                }
            }
        } else if self.direction_change_due() {
            let seeking = Self::random_sign(ctx);
            ctx.zombie.seeking = seeking;
        }

        if !ctx.zombie.use_root_rotation() {
            let turn = (self.config.turn_speed * ctx.zombie.seeking as f32 * ctx.delta).to_radians();
            ctx.transform.rotate_y(turn);
        }

        AiStateType::Alerted
    }

    fn on_animator_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.apply_root_motion();
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }
}
