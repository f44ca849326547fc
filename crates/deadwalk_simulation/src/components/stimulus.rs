//! Stimuli: то, что ловит сенсор зомби (игрок, фонарик, звук, еда).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Категория контакта (тег коллайдера)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ContactTag {
    Player,
    Flashlight,
    SoundEmitter,
    Food,
    Other,
}

/// Форма trigger-объёма (в локальных координатах коллайдера)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ContactShape {
    Sphere { center: Vec3, radius: f32 },
    Box { size: Vec3 },
    Point,
}

/// Контакт сенсора: снимок коллайдера на момент события
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorContact {
    /// Entity коллайдера (слабая ссылка)
    pub collider: Entity,
    pub tag: ContactTag,
    /// Мировая позиция transform'а коллайдера
    pub position: Vec3,
    pub rotation: Quat,
    /// Lossy scale коллайдера
    pub scale: Vec3,
    pub shape: ContactShape,
}

impl SensorContact {
    pub fn new(collider: Entity, tag: ContactTag, transform: &Transform, shape: ContactShape) -> Self {
        Self {
            collider,
            tag,
            position: transform.translation,
            rotation: transform.rotation,
            scale: transform.scale,
            shape,
        }
    }
}

/// Component: stimulus volume в мире
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stimulus {
    pub tag: ContactTag,
    pub shape: ContactShape,
    pub enabled: bool,
}

impl Stimulus {
    pub fn new(tag: ContactTag, shape: ContactShape) -> Self {
        Self { tag, shape, enabled: true }
    }

    pub fn sound(radius: f32) -> Self {
        Self::new(
            ContactTag::SoundEmitter,
            ContactShape::Sphere { center: Vec3::ZERO, radius },
        )
    }

    /// Радиус охвата (для broad-phase overlap)
    pub fn extent(&self, scale: Vec3) -> f32 {
        match self.shape {
            ContactShape::Sphere { center, radius } => center.length() + radius * scale.max_element(),
            ContactShape::Box { size } => (size * scale).length() * 0.5,
            ContactShape::Point => 0.0,
        }
    }
}

/// Component: затухающий audio-emitter (radius decay)
///
/// Радиус интерполируется от `source_radius` к `target_radius` со
/// скоростью `1 / decay_rate`. Радиус ≈ 0 → stimulus выключен.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SoundEmitter {
    pub decay_rate: f32,
    source_radius: f32,
    target_radius: f32,
    interpolator: f32,
    interpolator_speed: f32,
    radius: f32,
    /// Деспавнить entity, когда звук затих (крики)
    pub despawn_when_silent: bool,
}

impl SoundEmitter {
    pub fn new(radius: f32, decay_rate: f32) -> Self {
        Self {
            decay_rate,
            source_radius: radius,
            target_radius: radius,
            interpolator: 0.0,
            interpolator_speed: if decay_rate > 0.02 { 1.0 / decay_rate } else { 0.0 },
            radius,
            despawn_when_silent: false,
        }
    }

    /// Одноразовый всплеск: сразу `radius`, затухает до 0
    pub fn burst(radius: f32, decay_rate: f32) -> Self {
        let mut emitter = Self::new(radius, decay_rate);
        emitter.set_radius(0.0, false);
        emitter.despawn_when_silent = true;
        emitter
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_silent(&self) -> bool {
        self.radius < f32::EPSILON
    }

    /// Новый целевой радиус. Рост (или `instant`): мгновенный старт с нового
    /// радиуса, уменьшение: плавно от текущего.
    pub fn set_radius(&mut self, new_radius: f32, instant: bool) {
        if new_radius == self.target_radius {
            return;
        }

        self.source_radius = if instant || new_radius > self.radius { new_radius } else { self.radius };
        self.target_radius = new_radius;
        self.interpolator = 0.0;
    }

    /// Шаг затухания, возвращает текущий радиус
    pub fn tick(&mut self, delta: f32) -> f32 {
        self.interpolator = (self.interpolator + delta * self.interpolator_speed).clamp(0.0, 1.0);
        self.radius = self.source_radius + (self.target_radius - self.source_radius) * self.interpolator;
        self.radius
    }
}

/// Component: melee zone (на игроке): трогает коллайдеры зомби
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MeleeZone {
    pub radius: f32,
}
