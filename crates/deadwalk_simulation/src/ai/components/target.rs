//! Target/Threat model: классифицированный стимул или цель навигации.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип цели/угрозы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    None,
    Waypoint,
    VisualPlayer,
    VisualLight,
    VisualFood,
    Audio,
}

impl TargetKind {
    /// Визуальная угроза (игрок, свет, еда)
    pub fn is_visual(self) -> bool {
        matches!(self, Self::VisualPlayer | Self::VisualLight | Self::VisualFood)
    }
}

/// Одна классифицированная цель
///
/// Инвариант: `kind == None` ⇒ `source == None` и `distance == +inf`.
/// Перезаписывается целиком через [`AiTarget::set`]; отдельно обновляется
/// только `distance` (каждый тик, пока цель активна).
///
/// `source`: слабая ссылка (Entity коллайдера): entity может быть уже
/// despawned, перед использованием перепроверяйте через Query.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AiTarget {
    kind: TargetKind,
    source: Option<Entity>,
    position: Vec3,
    distance: f32,
    timestamp: f32,
}

impl Default for AiTarget {
    fn default() -> Self {
        Self {
            kind: TargetKind::None,
            source: None,
            position: Vec3::ZERO,
            distance: f32::INFINITY,
            timestamp: 0.0,
        }
    }
}

impl AiTarget {
    pub fn new(kind: TargetKind, source: Option<Entity>, position: Vec3, distance: f32, now: f32) -> Self {
        let mut target = Self::default();
        target.set(kind, source, position, distance, now);
        target
    }

    /// Полная перезапись цели, штамп времени = `now`
    pub fn set(&mut self, kind: TargetKind, source: Option<Entity>, position: Vec3, distance: f32, now: f32) {
        if kind == TargetKind::None {
            self.clear();
            return;
        }

        self.kind = kind;
        self.source = source;
        self.position = position;
        self.distance = distance;
        self.timestamp = now;
    }

    /// Сброс в None-инвариант
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn source(&self) -> Option<Entity> {
        self.source
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn timestamp(&self) -> f32 {
        self.timestamp
    }

    pub fn is_none(&self) -> bool {
        self.kind == TargetKind::None
    }

    pub fn is(&self, kind: TargetKind) -> bool {
        self.kind == kind
    }

    /// Обновление кэшированной дистанции (только для активной цели)
    pub fn refresh_distance(&mut self, from: Vec3) {
        if self.kind != TargetKind::None {
            self.distance = from.distance(self.position);
        }
    }
}
