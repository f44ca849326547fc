//! Idle: стоит на месте, ждёт стимулов, через случайное время → Patrol.

use rand::Rng;

use super::config::IdleConfig;
use crate::ai::components::{AiState, AiStateType, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::perception;
use crate::components::SensorContact;

pub struct IdleState {
    config: IdleConfig,
    idle_time: f32,
    timer: f32,
}

impl IdleState {
    pub fn new(config: IdleConfig) -> Self {
        Self {
            config,
            idle_time: 0.0,
            timer: 0.0,
        }
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }
}

impl AiState<ZombieMachine> for IdleState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Idle
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        let (min, max) = (self.config.idle_time_min, self.config.idle_time_max);
        self.idle_time = if max > min { ctx.rng.gen_range(min..max) } else { min };
        self.timer = 0.0;

        ctx.nav_agent_control(true, false);
        ctx.zombie.speed = 0.0;
        ctx.zombie.seeking = 0;
        ctx.zombie.feeding = false;
        ctx.zombie.attack_type = 0;
        ctx.clear_target();
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        let visual = ctx.senses.visual_threat;
        let audio = ctx.senses.audio_threat;

        match visual.kind() {
            TargetKind::VisualPlayer => {
                ctx.set_target(visual);
                return AiStateType::Pursuit;
            }
            TargetKind::VisualLight => {
                ctx.set_target(visual);
                return AiStateType::Alerted;
            }
            _ => {}
        }

        if audio.is(TargetKind::Audio) {
            ctx.set_target(audio);
            return AiStateType::Alerted;
        }

        if visual.is(TargetKind::VisualFood) {
            ctx.set_target(visual);
            return AiStateType::Pursuit;
        }

        self.timer += ctx.delta;
        if self.timer > self.idle_time {
            return AiStateType::Patrol;
        }

        AiStateType::Idle
    }

    fn on_animator_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.apply_root_motion();
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }
}
