//! Patrol: идёт по сети вейпоинтов, эскалирует на стимулы.

use bevy::prelude::*;

use super::config::PatrolConfig;
use crate::ai::components::{AiState, AiStateType, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::geometry::angle_between;
use crate::ai::perception;
use crate::ai::services::PathStatus;
use crate::components::SensorContact;

pub struct PatrolState {
    config: PatrolConfig,
}

impl PatrolState {
    pub fn new(config: PatrolConfig) -> Self {
        Self { config }
    }

    /// Следующий вейпоинт → destination
    fn advance_waypoint(ctx: &mut ZombieContext<'_>) {
        if let Some(waypoint) = ctx.waypoint_position(true) {
            ctx.set_destination(waypoint);
        }
    }
}

impl AiState<ZombieMachine> for PatrolState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Patrol
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.nav_agent_control(true, false);
        ctx.zombie.speed = self.config.speed;
        ctx.zombie.seeking = 0;
        ctx.zombie.feeding = false;
        ctx.zombie.attack_type = 0;

        if let Some(waypoint) = ctx.waypoint_position(false) {
            ctx.set_destination(waypoint);
        }
        ctx.set_nav_stopped(false);
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        let visual = ctx.senses.visual_threat;
        let audio = ctx.senses.audio_threat;

        if visual.is(TargetKind::VisualPlayer) {
            ctx.set_target(visual);
            return AiStateType::Pursuit;
        }

        if visual.is(TargetKind::VisualLight) {
            ctx.set_target(visual);
            return AiStateType::Alerted;
        }

        if audio.is(TargetKind::Audio) {
            ctx.set_target(audio);
            return AiStateType::Alerted;
        }

        if visual.is(TargetKind::VisualFood) {
            // Интерес к еде взвешен голодом: чем сытее, тем ближе должна быть еда
            let hunger = 1.0 - ctx.zombie.satisfaction;
            if hunger > visual.distance() / ctx.sensor_radius() {
                ctx.set_target(visual);
                return AiStateType::Pursuit;
            }
        }

        let Some((pending, stale, has_path, status, steering)) = ctx.nav.as_deref().map(|nav| {
            (
                nav.path_pending(),
                nav.is_path_stale(),
                nav.has_path(),
                nav.path_status(),
                nav.steering_target(),
            )
        }) else {
            ctx.zombie.speed = 0.0;
            return AiStateType::Patrol;
        };

        if pending {
            ctx.zombie.speed = 0.0;
            return AiStateType::Patrol;
        }
        ctx.zombie.speed = self.config.speed;

        if !ctx.zombie.use_root_rotation() {
            ctx.face_desired_velocity(self.config.slerp_speed);
        }

        // Резкий поворот по пути → разворот на месте в Alerted
        if angle_between(ctx.forward(), steering - ctx.position()) > self.config.turn_on_spot_threshold {
            return AiStateType::Alerted;
        }

        if stale || !has_path || status != PathStatus::Complete {
            Self::advance_waypoint(ctx);
            return AiStateType::Alerted;
        }

        AiStateType::Patrol
    }

    fn on_animator_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.apply_root_motion();
    }

    fn on_animator_ik_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        if ctx.target_kind() == TargetKind::None {
            return;
        }
        let look_at = ctx.target_position() + Vec3::Y;
        ctx.set_look_at(look_at, self.config.look_at_weight);
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }

    fn on_destination_reached(&mut self, ctx: &mut ZombieContext<'_>, reached: bool) {
        if reached && ctx.target_kind() == TargetKind::Waypoint {
            Self::advance_waypoint(ctx);
        }
    }
}
