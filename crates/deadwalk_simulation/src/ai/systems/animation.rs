//! Animate phase: оценка аниматоров за тик.

use bevy::prelude::*;

use crate::ai::events::AnimationNotify;
use crate::ai::services::AnimatorHandle;

/// Система: `Animator::advance` для всех агентов
///
/// Сигналы анимации (root motion refcount, cinematic) уходят в
/// AnimationNotify и применяются в Relay следующего тика. Для хостов с
/// внешней анимацией advance: no-op.
pub fn advance_animators(
    time: Res<Time<Fixed>>,
    mut animators: Query<(Entity, &Transform, &mut AnimatorHandle)>,
    mut notifications: EventWriter<AnimationNotify>,
) {
    let delta = time.delta_secs();

    for (agent, transform, mut animator) in animators.iter_mut() {
        for signal in animator.advance(transform, delta) {
            notifications.write(AnimationNotify { agent, signal });
        }
    }
}
