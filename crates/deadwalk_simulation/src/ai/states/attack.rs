//! Attack: держит дистанцию, смотрит на игрока, выдаёт attack-type токены.

use bevy::prelude::*;
use rand::Rng;

use super::config::AttackConfig;
use crate::ai::components::{AiState, AiStateType, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::geometry::angle_between;
use crate::ai::perception;
use crate::components::SensorContact;

pub struct AttackState {
    config: AttackConfig,
    look_at_weight: f32,
}

impl AttackState {
    pub fn new(config: AttackConfig) -> Self {
        Self {
            config,
            look_at_weight: 0.0,
        }
    }

    /// Токен для выбора анимации атаки (1..100)
    fn roll_attack_type(ctx: &mut ZombieContext<'_>) {
        ctx.zombie.attack_type = ctx.rng.gen_range(1..100);
    }
}

impl AiState<ZombieMachine> for AttackState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Attack
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.nav_agent_control(true, false);
        ctx.zombie.seeking = 0;
        ctx.zombie.feeding = false;
        ctx.zombie.speed = self.config.speed;
        Self::roll_attack_type(ctx);
        self.look_at_weight = 0.0;
    }

    fn on_exit(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.zombie.attack_type = 0;
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        ctx.zombie.speed = if ctx.position().distance(ctx.target_position()) < self.config.stopping_distance {
            0.0
        } else {
            self.config.speed
        };

        let visual = ctx.senses.visual_threat;
        let root_rotation = ctx.zombie.use_root_rotation();

        if visual.is(TargetKind::VisualPlayer) {
            ctx.set_target(visual);

            if !ctx.senses.in_melee_range {
                return AiStateType::Pursuit;
            }

            if !root_rotation {
                let target = ctx.target_position();
                ctx.face_towards(target, self.config.slerp_speed);
            }

            Self::roll_attack_type(ctx);
            return AiStateType::Attack;
        }

        if !root_rotation {
            let target = ctx.target_position();
            ctx.face_towards(target, self.config.slerp_speed);
        }

        AiStateType::Alerted
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
        let goal = if angle_between(ctx.forward(), target - ctx.position()) < self.config.look_at_angle_threshold {
            self.config.look_at_weight
        } else {
            0.0
        };

        self.look_at_weight += (goal - self.look_at_weight) * t;
        ctx.set_look_at(target + Vec3::Y, self.look_at_weight);
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }
}
