//! Feeding: ест, пока анимация реально в "Feeding State".

use super::config::FeedingConfig;
use crate::ai::components::{AiState, AiStateType, TargetKind, TriggerEventKind};
use crate::ai::context::{ZombieContext, ZombieMachine};
use crate::ai::events::EffectKind;
use crate::ai::perception;
use crate::components::SensorContact;

pub struct FeedingState {
    config: FeedingConfig,
    /// Индекс слоя кэшируется при первом входе
    layer_index: Option<usize>,
    blood_timer: f32,
}

impl FeedingState {
    pub fn new(config: FeedingConfig) -> Self {
        Self {
            config,
            layer_index: None,
            blood_timer: 0.0,
        }
    }

    /// Аниматор сейчас проигрывает состояние еды
    fn is_eating(&self, ctx: &ZombieContext<'_>) -> bool {
        let (Some(animator), Some(layer)) = (ctx.animator.as_deref(), self.layer_index) else {
            return false;
        };
        animator.current_state(layer) == Some(self.config.feeding_state.as_str())
    }
}

impl AiState<ZombieMachine> for FeedingState {
    fn state_type(&self) -> AiStateType {
        AiStateType::Feeding
    }

    fn on_enter(&mut self, ctx: &mut ZombieContext<'_>) {
        if self.layer_index.is_none() {
            self.layer_index = ctx
                .animator
                .as_deref()
                .and_then(|animator| animator.layer_index(&self.config.feeding_layer));
        }

        ctx.zombie.feeding = true;
        ctx.zombie.seeking = 0;
        ctx.zombie.speed = 0.0;
        ctx.zombie.attack_type = 0;
        ctx.nav_agent_control(true, false);
        self.blood_timer = 0.0;
    }

    fn on_exit(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.zombie.feeding = false;
    }

    fn on_update(&mut self, ctx: &mut ZombieContext<'_>) -> AiStateType {
        self.blood_timer += ctx.delta;

        if ctx.zombie.satisfaction > self.config.full_threshold {
            ctx.waypoint_position(false);
            return AiStateType::Alerted;
        }

        let visual = ctx.senses.visual_threat;
        if !visual.is_none() && !visual.is(TargetKind::VisualFood) {
            ctx.set_target(visual);
            return AiStateType::Alerted;
        }

        let audio = ctx.senses.audio_threat;
        if audio.is(TargetKind::Audio) {
            ctx.set_target(audio);
            return AiStateType::Alerted;
        }

        if self.is_eating(ctx) {
            ctx.zombie.replenish_satisfaction(ctx.delta);

            if self.blood_timer > self.config.blood_burst_time {
                let position = ctx.target_position();
                ctx.emit(EffectKind::BloodBurst {
                    position,
                    amount: self.config.blood_burst_amount,
                });
                self.blood_timer = 0.0;
            }
        }

        if !ctx.zombie.use_root_rotation() {
            let target = ctx.target_position();
            ctx.face_towards(target, self.config.slerp_speed);
        }

        AiStateType::Feeding
    }

    fn on_animator_updated(&mut self, ctx: &mut ZombieContext<'_>) {
        ctx.apply_root_motion();
    }

    fn on_trigger_event(&mut self, ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
        perception::classify(ctx, kind, contact);
    }
}
