//! External services: узкие контракты к движку хоста.
//!
//! Ядро не знает про конкретный физический движок, navmesh, анимацию и
//! аудио: всё это trait objects внутри компонентов/ресурсов. Отсутствие
//! сервиса = no-op (Option), это основная политика ошибок ядра.
//!
//! Headless реализации живут в `crate::headless`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::components::{BonePose, HumanBone};

// ============================================================================
// Physics
// ============================================================================

/// Одно пересечение луча
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub collider: Entity,
    /// Rigid body, которому принадлежит коллайдер (если есть)
    pub body: Option<Entity>,
}

/// Physics query service
pub trait PhysicsQuery: Send + Sync {
    /// Все пересечения луча до `max_distance`, отсортированы по distance
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RayHit>;
}

/// Resource: physics backend
#[derive(Resource)]
pub struct PhysicsBackend(pub Box<dyn PhysicsQuery>);

impl Deref for PhysicsBackend {
    type Target = dyn PhysicsQuery;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum PathStatus {
    #[default]
    Complete,
    Partial,
    Invalid,
}

/// Navigation agent (per-agent)
pub trait NavigationAgent: Send + Sync {
    fn set_destination(&mut self, target: Vec3) -> bool;
    fn destination(&self) -> Option<Vec3>;

    fn is_stopped(&self) -> bool;
    fn set_stopped(&mut self, stopped: bool);

    fn path_pending(&self) -> bool;
    fn has_path(&self) -> bool;
    fn is_path_stale(&self) -> bool;
    fn path_status(&self) -> PathStatus;

    fn steering_target(&self) -> Vec3;
    fn desired_velocity(&self) -> Vec3;
    /// Скорость на этот тик (root motion → nav agent)
    fn set_velocity(&mut self, velocity: Vec3);

    /// Кто двигает/вращает transform: агент или анимация
    fn set_update_position(&mut self, enabled: bool);
    fn set_update_rotation(&mut self, enabled: bool);
    fn updates_position(&self) -> bool;
    fn updates_rotation(&self) -> bool;

    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    fn base_offset(&self) -> f32;

    /// Проекция точки на навигационную поверхность
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Телепорт агента (после реанимации)
    fn warp(&mut self, position: Vec3);

    /// Интеграция движения за тик. Хосты, которые двигают агентов сами,
    /// оставляют реализацию по умолчанию.
    fn step(&mut self, _from: Vec3, _delta: f32) -> Option<Vec3> {
        None
    }
}

/// Component: navigation agent зомби
#[derive(Component)]
pub struct NavAgent(pub Box<dyn NavigationAgent>);

impl Deref for NavAgent {
    type Target = dyn NavigationAgent;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for NavAgent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

// ============================================================================
// Animation
// ============================================================================

/// Уведомления анимации → агент (state machine behaviours хоста)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSignal {
    /// Refcount-запрос root motion (+1 вход, -1 выход)
    RootMotion { position: i32, rotation: i32 },
    /// Cinematic lock вкл/выкл
    Cinematic(bool),
}

/// Animation service (per-agent)
pub trait Animator: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    fn set_float(&mut self, name: &str, value: f32);
    fn get_float(&self, name: &str) -> f32;
    fn set_bool(&mut self, name: &str, value: bool);
    fn get_bool(&self, name: &str) -> bool;
    fn set_integer(&mut self, name: &str, value: i32);
    fn get_integer(&self, name: &str) -> i32;
    fn set_trigger(&mut self, name: &str);

    fn layer_index(&self, name: &str) -> Option<usize>;
    fn layer_weight(&self, layer: usize) -> f32;
    fn set_layer_weight(&mut self, layer: usize, weight: f32);
    /// Имя текущего состояния на слое
    fn current_state(&self, layer: usize) -> Option<&str>;

    /// Root motion за последний кадр анимации
    fn root_delta_position(&self) -> Vec3;
    fn root_rotation(&self) -> Quat;

    fn bone_world_pose(&self, bone: HumanBone) -> Option<BonePose>;
    /// Override позы кости поверх анимации (до следующей оценки)
    fn set_bone_world_pose(&mut self, bone: HumanBone, pose: BonePose);

    /// IK look-at
    fn set_look_at(&mut self, position: Vec3, weight: f32);
    /// Последний look-at (позиция, вес). Хосты без записи IK возвращают None.
    fn look_at(&self) -> Option<(Vec3, f32)> {
        None
    }

    /// Оценка анимации за тик. Хосты с внешней анимацией оставляют default.
    fn advance(&mut self, _root: &Transform, _delta: f32) -> Vec<AnimationSignal> {
        Vec::new()
    }
}

/// Component: animator зомби
#[derive(Component)]
pub struct AnimatorHandle(pub Box<dyn Animator>);

impl Deref for AnimatorHandle {
    type Target = dyn Animator;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for AnimatorHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

// ============================================================================
// Audio
// ============================================================================

/// Запрос one-shot звука
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    pub group: String,
    pub clip: String,
    pub position: Vec3,
    pub volume: f32,
    pub spatial_blend: f32,
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// Audio service
pub trait AudioPlayer: Send + Sync {
    fn play_one_shot(&mut self, request: SoundRequest) -> Option<SoundHandle>;
    fn stop(&mut self, handle: SoundHandle);
}

/// Resource: audio backend
#[derive(Resource)]
pub struct AudioBackend(pub Box<dyn AudioPlayer>);

impl Deref for AudioBackend {
    type Target = dyn AudioPlayer;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for AudioBackend {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
