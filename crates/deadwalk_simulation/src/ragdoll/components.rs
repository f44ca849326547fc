//! Ragdoll components: режим управления костями, tuning, снимки поз.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision_layers::COLLISION_MASK_GEOMETRY;
use crate::components::{BonePose, HumanBone};
use crate::config::{check_positive, check_range, ConfigError};

/// Кто управляет скелетом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BoneControlMode {
    /// Обычная анимация
    #[default]
    Animated,
    /// Физика body parts, скелет следует за ними
    Ragdoll,
    /// Blend из позы ragdoll'а обратно в анимацию
    RagdollToAnim,
}

/// Ось root bone, которая у модели смотрит "вперёд" (от живота)
///
/// Скелеты из разных пакетов ориентированы по-разному: ось нужна, чтобы
/// понять, лежит ли ragdoll на спине или лицом вниз.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BoneAlignment {
    Right,
    Up,
    #[default]
    Forward,
    Left,
    Down,
    Back,
}

impl BoneAlignment {
    /// Локальная ось кости (forward = -Z)
    pub fn axis(self) -> Vec3 {
        match self {
            BoneAlignment::Right => Vec3::X,
            BoneAlignment::Up => Vec3::Y,
            BoneAlignment::Forward => Vec3::NEG_Z,
            BoneAlignment::Left => Vec3::NEG_X,
            BoneAlignment::Down => Vec3::NEG_Y,
            BoneAlignment::Back => Vec3::Z,
        }
    }
}

/// Tuning ragdoll / реанимации
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RagdollConfig {
    /// Пауза в ragdoll'е перед реанимацией (сек)
    pub reanimation_wait: f32,
    /// Длительность blend'а ragdoll → анимация
    pub blend_time: f32,
    /// Задержка перехода аниматора до начала blend'а
    pub mecanim_transition_time: f32,
    /// Сила удара (|force|), выше которой зомби падает
    pub hit_strength_threshold: f32,
    /// Минимальная сила для импульса в body part
    pub min_impulse: f32,
    pub root_alignment: BoneAlignment,
    /// Слои пола для floor snap
    pub geometry_mask: u32,
    /// Радиус проекции на nav surface
    pub nav_sample_radius: f32,
    /// Кости, которые снимаются и блендятся
    pub bones: Vec<HumanBone>,
}

impl Default for RagdollConfig {
    fn default() -> Self {
        Self {
            reanimation_wait: 3.0,
            blend_time: 1.5,
            mecanim_transition_time: 0.1,
            hit_strength_threshold: 1.0,
            min_impulse: 1.0,
            root_alignment: BoneAlignment::Forward,
            geometry_mask: COLLISION_MASK_GEOMETRY,
            nav_sample_radius: 25.0,
            bones: HumanBone::ALL.to_vec(),
        }
    }
}

impl RagdollConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("reanimation_wait", self.reanimation_wait, 0.0, f32::MAX)?;
        check_positive("blend_time", self.blend_time)?;
        check_range("mecanim_transition_time", self.mecanim_transition_time, 0.0, f32::MAX)?;
        check_range("hit_strength_threshold", self.hit_strength_threshold, 0.0, f32::MAX)?;
        check_range("min_impulse", self.min_impulse, 0.0, f32::MAX)?;
        check_range("nav_sample_radius", self.nav_sample_radius, 0.0, f32::MAX)?;
        Ok(())
    }
}

/// Снимок кости в момент начала реанимации
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BoneSnapshot {
    pub bone: HumanBone,
    pub pose: BonePose,
}

/// Component: ragdoll sub-machine агента
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Ragdoll {
    pub config: RagdollConfig,
    pub mode: BoneControlMode,
    /// Время начала реанимации (отсчёт blend'а)
    pub ragdoll_end_time: f32,
    pub snapshots: Vec<BoneSnapshot>,
    pub ragdoll_hip_position: Vec3,
    pub ragdoll_head_position: Vec3,
    pub ragdoll_feet_position: Vec3,
}

impl Ragdoll {
    /// Ragdoll с tuning'ом. Невалидный конфиг логируется и заменяется default.
    pub fn new(config: RagdollConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                crate::logger::log_error(&format!("❌ Invalid ragdoll config: {} → defaults", err));
                RagdollConfig::default()
            }
        };

        Self {
            config,
            ..Default::default()
        }
    }

    pub fn is_animated(&self) -> bool {
        self.mode == BoneControlMode::Animated
    }
}
