//! Headless хост: реализации сервисов без движка
//!
//! - physics: сферы + плоскости пола, raycast'ы для LOS и floor snap
//! - navigation: прямолинейный nav agent
//! - animator: параметры, слои, rest pose, подъём после ragdoll'а
//! - audio: журнал one-shot'ов
//! - contacts: overlap триггеры (сенсор, arrival volume, melee zone)
//! - spawn: сборка сцены в `World`
//!
//! Используется демо-бинарником и интеграционными тестами. Движок
//! подключает свои реализации тех же контрактов из `ai::services`.

use bevy::prelude::*;

pub mod animator;
pub mod audio;
pub mod contacts;
pub mod navigation;
pub mod physics;
pub mod spawn;

pub use animator::{
    HeadlessAnimator, BASE_LAYER, STATE_ATTACK, STATE_FEEDING, STATE_HIT, STATE_IDLE, STATE_LOCOMOTION,
    STATE_REANIMATE_FROM_BACK, STATE_REANIMATE_FROM_FRONT, STATE_SCREAM, STATE_TURN,
};
pub use audio::{HeadlessAudio, SoundLog};
pub use contacts::ContactTracker;
pub use navigation::HeadlessNavAgent;
pub use physics::{HeadlessCollider, HeadlessGround, HeadlessPhysics};
pub use spawn::*;

use crate::ai::services::AudioBackend;
use crate::ai::AiSet;

/// Headless Plugin
///
/// Detect фаза: пересборка сцены raycast'ов → overlap триггеры.
/// AudioBackend вставляется только если хост не дал свой.
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContactTracker>();

        if !app.world().contains_resource::<AudioBackend>() {
            app.insert_resource(AudioBackend(Box::new(HeadlessAudio::new())));
        }

        app.add_systems(
            FixedUpdate,
            (
                physics::rebuild_headless_physics,
                contacts::detect_sensor_contacts,
                contacts::detect_target_triggers,
                contacts::detect_melee_contacts,
            )
                .chain()
                .in_set(AiSet::Detect),
        );
    }
}
