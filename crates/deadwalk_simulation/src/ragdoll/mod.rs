//! Ragdoll / reanimation sub-machine
//!
//! Animated → Ragdoll (сильный удар, смерть, crawl, cinematic, удар в спину)
//! → RagdollToAnim (после паузы, только если жив) → Animated (blend = 1).
//!
//! Вход в ragdoll делает combat (`apply_damage_requests`), отсчёт
//! реанимации: отложенная задача в `DeferredTasks`.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod reanimation;
pub mod systems;

#[cfg(test)]
mod reanimation_tests;

pub use components::{BoneAlignment, BoneControlMode, BoneSnapshot, Ragdoll, RagdollConfig};
pub use events::{BoneControlChanged, ReanimationDue};

use crate::ai::{systems as ai_systems, AiSet};

/// Ragdoll Plugin
///
/// - Prepare: ReanimationDue → RagdollToAnim (сразу после отложенных задач)
/// - Late: blend (после оценки анимации) → sync body parts
pub struct RagdollPlugin;

impl Plugin for RagdollPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ReanimationDue>()
            .add_event::<BoneControlChanged>();

        app.add_systems(
            FixedUpdate,
            (
                systems::start_reanimation
                    .in_set(AiSet::Prepare)
                    .after(ai_systems::run_deferred_tasks)
                    .before(ai_systems::prepare_agents),
                (systems::blend_reanimation, systems::sync_body_parts)
                    .chain()
                    .in_set(AiSet::Late),
            ),
        );
    }
}
