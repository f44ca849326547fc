//! AI decision-making module
//!
//! Perception-driven FSM зомби: модель целей, generic state machine,
//! классификатор стимулов, шесть поведенческих состояний.
//!
//! Хост (физика/навигация/анимация/аудио) подключается через узкие
//! контракты из `services`, headless реализации: в `crate::headless`.

use bevy::prelude::*;

pub mod agent;
pub mod audio;
pub mod components;
pub mod context;
pub mod events;
pub mod geometry;
pub mod perception;
pub mod registry;
pub mod scheduler;
pub mod services;
pub mod states;
pub mod systems;
pub mod waypoints;

#[cfg(test)]
mod perception_tests;
#[cfg(test)]
mod test_support;

// Re-export основных типов
pub use agent::{zombie_context, AgentServices, ZombieAgent};
pub use audio::{AudioCollection, ZombieSounds};
pub use components::*;
pub use context::{anim, ZombieBrain, ZombieContext, ZombieMachine};
pub use events::*;
pub use registry::ColliderRegistry;
pub use scheduler::{DeferredTask, DeferredTasks, TaskPayload, TaskPurpose};
pub use services::*;
pub use states::ZombieBehaviorConfig;
pub use waypoints::{PatrolRoute, WaypointNetwork};

/// Фазы одного fixed тика
///
/// Порядок выполнения (chain):
/// 1. Prepare: отложенные задачи, pre-pass восприятия, старт машин
/// 2. Detect: контакты хоста (headless: overlap stimulus ↔ сенсор)
/// 3. Relay: sensor / target trigger / melee / animation notify → агент
/// 4. Think: OnUpdate, переходы, sync аниматора, урон, эффекты
/// 5. Locomotion: root motion, IK, nav agent, затухание звуков
/// 6. Animate: оценка анимации
/// 7. Late: ragdoll blend (читает живые кости), sync body parts
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiSet {
    Prepare,
    Detect,
    Relay,
    Think,
    Locomotion,
    Animate,
    Late,
}

/// AI Plugin
///
/// Регистрирует события, ресурсы и AI системы в FixedUpdate.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ColliderRegistry>()
            .init_resource::<DeferredTasks>();

        app.add_event::<SensorEvent>()
            .add_event::<TargetTriggerEvent>()
            .add_event::<MeleeZoneEvent>()
            .add_event::<AnimationNotify>()
            .add_event::<AiStateChanged>()
            .add_event::<AgentEffect>();

        app.configure_sets(
            FixedUpdate,
            (
                AiSet::Prepare,
                AiSet::Detect,
                AiSet::Relay,
                AiSet::Think,
                AiSet::Locomotion,
                AiSet::Animate,
                AiSet::Late,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (systems::run_deferred_tasks, systems::prepare_agents)
                    .chain()
                    .in_set(AiSet::Prepare),
                (
                    systems::relay_sensor_events,
                    systems::relay_target_triggers,
                    systems::relay_melee_zone,
                    systems::relay_animation_notify,
                )
                    .chain()
                    .in_set(AiSet::Relay),
                (systems::update_state_machines, systems::apply_agent_effects)
                    .chain()
                    .in_set(AiSet::Think),
                (
                    systems::apply_animator_updates,
                    systems::drive_navigation,
                    systems::decay_sound_emitters,
                )
                    .chain()
                    .in_set(AiSet::Locomotion),
                systems::advance_animators.in_set(AiSet::Animate),
            ),
        );
    }
}
