//! Locomotion phase: root motion, IK, интеграция nav agent'а, затухание звуков.

use bevy::prelude::*;

use crate::ai::agent::{zombie_context, AgentServices, ZombieAgent};
use crate::ai::geometry::look_rotation;
use crate::ai::services::NavAgent;
use crate::combat::Dead;
use crate::components::{ContactShape, SoundEmitter, Stimulus};
use crate::ragdoll::{BoneControlMode, Ragdoll};

/// Система: OnAnimatorUpdated + OnAnimatorIKUpdated активного состояния
pub fn apply_animator_updates(mut agents: Query<ZombieAgent, Without<Dead>>, mut services: AgentServices) {
    for mut agent in agents.iter_mut() {
        if agent.ragdoll.mode != BoneControlMode::Animated {
            continue;
        }

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        machine.animator_updated(&mut ctx);
        machine.animator_ik_updated(&mut ctx);
    }
}

/// Система: шаг nav agent'а → transform
///
/// Хосты с собственной навигацией оставляют `step` по умолчанию (None),
/// тогда transform не трогается.
pub fn drive_navigation(
    time: Res<Time<Fixed>>,
    mut agents: Query<(&mut Transform, &mut NavAgent, &Ragdoll), Without<Dead>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav, ragdoll) in agents.iter_mut() {
        if ragdoll.mode != BoneControlMode::Animated {
            continue;
        }

        let Some(next) = nav.step(transform.translation, delta) else {
            continue;
        };
        transform.translation = next;

        if nav.updates_rotation() {
            if let Some(rotation) = look_rotation(nav.desired_velocity()) {
                transform.rotation = rotation;
            }
        }
    }
}

/// Система: затухание audio-emitter'ов
///
/// Радиус emitter'а → радиус сферы stimulus'а, тишина выключает stimulus.
/// Одноразовые всплески (крики) деспавнятся, когда затихнут.
pub fn decay_sound_emitters(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut emitters: Query<(Entity, &mut SoundEmitter, Option<&mut Stimulus>)>,
) {
    let delta = time.delta_secs();

    for (entity, mut emitter, stimulus) in emitters.iter_mut() {
        let radius = emitter.tick(delta);

        if let Some(mut stimulus) = stimulus {
            stimulus.enabled = !emitter.is_silent();
            if let ContactShape::Sphere { center, .. } = stimulus.shape {
                stimulus.shape = ContactShape::Sphere { center, radius };
            }
        }

        if emitter.is_silent() && emitter.despawn_when_silent {
            commands.entity(entity).despawn();
        }
    }
}
