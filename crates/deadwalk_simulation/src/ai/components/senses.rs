//! Senses: три слота целей агента + флаги триггеров.

use bevy::prelude::*;

use super::target::{AiTarget, TargetKind};

/// Arrival volume вокруг закоммиченной цели
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TargetTrigger {
    pub center: Vec3,
    pub radius: f32,
}

/// Component: восприятие агента
///
/// - `visual_threat` / `audio_threat` пересобираются с нуля каждый тик
///   (pre-pass сбрасывает, sensor events заново утверждают)
/// - `target` живёт между тиками, пока его явно не очистят/заменят
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Senses {
    pub visual_threat: AiTarget,
    pub audio_threat: AiTarget,
    target: AiTarget,
    target_trigger: Option<TargetTrigger>,
    /// Агент внутри arrival volume (сбрасывается в pre-pass)
    pub target_reached: bool,
    /// Выставляется melee zone триггером (вне pre-pass)
    pub in_melee_range: bool,
}

impl Senses {
    /// Pre-pass одного тика
    pub fn begin_tick(&mut self, agent_position: Vec3) {
        self.visual_threat.clear();
        self.audio_threat.clear();
        self.target.refresh_distance(agent_position);
        self.target_reached = false;
    }

    pub fn target(&self) -> &AiTarget {
        &self.target
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target.kind()
    }

    pub fn target_trigger(&self) -> Option<TargetTrigger> {
        self.target_trigger
    }

    /// Коммит цели + arrival volume заданного радиуса в позиции цели
    pub fn commit_target(&mut self, target: AiTarget, trigger_radius: f32) {
        if target.is_none() {
            self.clear_target();
            return;
        }

        self.target = target;
        self.target_trigger = Some(TargetTrigger {
            center: target.position(),
            radius: trigger_radius,
        });
    }

    pub fn clear_target(&mut self) {
        self.target.clear();
        self.target_trigger = None;
    }
}
