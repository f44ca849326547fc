//! Zombie machine context: всё, что состояние видит за один вызов.
//!
//! Контекст собирается системой из компонентов агента и ресурсов на
//! время одного вызова state machine, затем отпускается. Состояния не
//! хранят ссылок на агента между тиками.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::components::{AiStateType, AiTarget, MachineKind, Senses, StateMachine, TargetKind};
use super::events::{AgentEffect, EffectKind};
use super::geometry::look_rotation;
use super::registry::ColliderRegistry;
use super::services::{AnimatorHandle, NavAgent, PhysicsBackend};
use super::states::{register_zombie_states, ZombieBehaviorConfig};
use super::waypoints::{PatrolRoute, WaypointNetwork};
use crate::components::{SensorContact, Zombie};

/// Имена параметров/слоёв анимации, которые пишет ядро
pub mod anim {
    pub const SPEED: &str = "speed";
    pub const FEEDING: &str = "feeding";
    pub const SEEKING: &str = "seeking";
    pub const ATTACK: &str = "attack";
    pub const SCREAM: &str = "scream";
    pub const CRAWLING: &str = "crawling";
    pub const HIT: &str = "hit";
    pub const HIT_TYPE: &str = "hit_type";
    pub const UPPER_BODY_DAMAGE: &str = "upper_body_damage";
    pub const LOWER_BODY_DAMAGE: &str = "lower_body_damage";
    pub const REANIMATE_FROM_BACK: &str = "reanimate_from_back";
    pub const REANIMATE_FROM_FRONT: &str = "reanimate_from_front";

    pub const CINEMATIC_LAYER: &str = "Cinematic";
    pub const LOWER_BODY_LAYER: &str = "Lower Body";
    pub const UPPER_BODY_LAYER: &str = "Upper Body";
}

/// Семейство машин зомби
pub struct ZombieMachine;

impl MachineKind for ZombieMachine {
    type Context<'a> = ZombieContext<'a>;
    type Contact = SensorContact;
}

/// Component: "мозг" зомби: state machine со всеми шестью состояниями
#[derive(Component)]
pub struct ZombieBrain {
    pub machine: StateMachine<ZombieMachine>,
}

impl ZombieBrain {
    /// Пустая машина (состояния регистрирует вызывающий)
    pub fn new(initial: AiStateType) -> Self {
        Self {
            machine: StateMachine::new(initial),
        }
    }

    /// Машина с Idle/Alerted/Patrol/Pursuit/Attack/Feeding
    pub fn with_behavior(config: &ZombieBehaviorConfig, initial: AiStateType) -> Self {
        let mut brain = Self::new(initial);
        register_zombie_states(&mut brain.machine, config);
        brain
    }
}

/// Контекст одного вызова state machine зомби
pub struct ZombieContext<'a> {
    pub entity: Entity,
    pub zombie: &'a mut Zombie,
    pub senses: &'a mut Senses,
    pub transform: &'a mut Transform,
    pub route: &'a mut PatrolRoute,
    pub waypoints: Option<&'a WaypointNetwork>,
    pub nav: Option<&'a mut NavAgent>,
    pub animator: Option<&'a mut AnimatorHandle>,
    pub physics: Option<&'a PhysicsBackend>,
    pub registry: &'a ColliderRegistry,
    pub rng: &'a mut ChaCha8Rng,
    pub now: f32,
    pub delta: f32,
    effects: Vec<EffectKind>,
}

impl<'a> ZombieContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity: Entity,
        zombie: &'a mut Zombie,
        senses: &'a mut Senses,
        transform: &'a mut Transform,
        route: &'a mut PatrolRoute,
        registry: &'a ColliderRegistry,
        rng: &'a mut ChaCha8Rng,
        now: f32,
        delta: f32,
    ) -> Self {
        Self {
            entity,
            zombie,
            senses,
            transform,
            route,
            waypoints: None,
            nav: None,
            animator: None,
            physics: None,
            registry,
            rng,
            now,
            delta,
            effects: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Геометрия агента
    // ------------------------------------------------------------------

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward().as_vec3()
    }

    /// Мировая позиция сенсора (глаза)
    pub fn sensor_position(&self) -> Vec3 {
        self.transform
            .transform_point(Vec3::Y * self.zombie.profile.sensor_height)
    }

    /// Мировой радиус сенсора (с учётом scale)
    pub fn sensor_radius(&self) -> f32 {
        self.zombie.profile.sensor_radius * self.transform.scale.max_element()
    }

    // ------------------------------------------------------------------
    // Target
    // ------------------------------------------------------------------

    pub fn target(&self) -> AiTarget {
        *self.senses.target()
    }

    pub fn target_kind(&self) -> TargetKind {
        self.senses.target_kind()
    }

    pub fn target_position(&self) -> Vec3 {
        self.senses.target().position()
    }

    /// Коммит цели с arrival volume = stopping distance
    pub fn set_target(&mut self, target: AiTarget) {
        let radius = self.zombie.profile.stopping_distance;
        self.senses.commit_target(target, radius);
    }

    pub fn set_target_with_radius(&mut self, target: AiTarget, radius: f32) {
        self.senses.commit_target(target, radius);
    }

    pub fn clear_target(&mut self) {
        self.senses.clear_target();
    }

    // ------------------------------------------------------------------
    // Locomotion facade
    // ------------------------------------------------------------------

    /// Кто двигает transform: nav agent (position) / nav agent (rotation)
    pub fn nav_agent_control(&mut self, position: bool, rotation: bool) {
        if let Some(nav) = self.nav.as_deref_mut() {
            nav.set_update_position(position);
            nav.set_update_rotation(rotation);
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) -> bool {
        match self.nav.as_deref_mut() {
            Some(nav) => nav.set_destination(destination),
            None => false,
        }
    }

    pub fn set_nav_stopped(&mut self, stopped: bool) {
        if let Some(nav) = self.nav.as_deref_mut() {
            nav.set_stopped(stopped);
        }
    }

    /// Вейпоинт патруля (текущий или следующий): коммитится как Waypoint-цель
    pub fn waypoint_position(&mut self, increment: bool) -> Option<Vec3> {
        let network = self.waypoints?;
        let position = self.route.waypoint(network, increment, &mut *self.rng)?;

        let distance = position.distance(self.transform.translation);
        let target = AiTarget::new(TargetKind::Waypoint, None, position, distance, self.now);
        self.set_target(target);
        Some(position)
    }

    /// Плавный горизонтальный поворот к точке
    pub fn face_towards(&mut self, point: Vec3, slerp_speed: f32) {
        if let Some(rotation) = look_rotation(point - self.transform.translation) {
            let t = (slerp_speed * self.delta).clamp(0.0, 1.0);
            self.transform.rotation = self.transform.rotation.slerp(rotation, t);
        }
    }

    /// Мгновенный горизонтальный поворот к точке
    pub fn snap_facing(&mut self, point: Vec3) {
        if let Some(rotation) = look_rotation(point - self.transform.translation) {
            self.transform.rotation = rotation;
        }
    }

    /// Плавный поворот вдоль desired velocity nav agent'а
    pub fn face_desired_velocity(&mut self, slerp_speed: f32) {
        let Some(velocity) = self.nav.as_deref().map(|nav| nav.desired_velocity()) else {
            return;
        };
        let point = self.transform.translation + velocity;
        self.face_towards(point, slerp_speed);
    }

    /// Root motion → nav agent velocity / transform rotation
    pub fn apply_root_motion(&mut self) {
        let Some(animator) = self.animator.as_deref() else {
            return;
        };

        if self.zombie.use_root_position() && self.delta > 0.0 {
            if let Some(nav) = self.nav.as_deref_mut() {
                nav.set_velocity(animator.root_delta_position() / self.delta);
            }
        }

        if self.zombie.use_root_rotation() {
            self.transform.rotation = animator.root_rotation();
        }
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    pub fn layer_active(&self, layer: &str) -> bool {
        let Some(animator) = self.animator.as_deref() else {
            return false;
        };
        animator
            .layer_index(layer)
            .map(|index| animator.layer_weight(index) > 0.5)
            .unwrap_or(false)
    }

    /// IK look-at (no-op без аниматора)
    pub fn set_look_at(&mut self, position: Vec3, weight: f32) {
        if let Some(animator) = self.animator.as_deref_mut() {
            animator.set_look_at(position, weight);
        }
    }

    /// Пуш runtime параметров в аниматор (раз в тик после OnUpdate)
    pub fn sync_animator(&mut self) {
        let Some(animator) = self.animator.as_deref_mut() else {
            return;
        };
        animator.set_float(anim::SPEED, self.zombie.speed);
        animator.set_bool(anim::FEEDING, self.zombie.feeding);
        animator.set_integer(anim::SEEKING, self.zombie.seeking);
        animator.set_integer(anim::ATTACK, self.zombie.attack_type);
    }

    /// Крик: trigger анимации + audio-emitter stimulus вокруг scream mount.
    ///
    /// true, если зомби кричит (уже или только что начал).
    pub fn scream(&mut self) -> bool {
        if self.zombie.is_screaming {
            return true;
        }

        let radius = self.zombie.profile.scream_radius;
        if radius <= 0.0 || self.zombie.cinematic_enabled || self.layer_active(anim::CINEMATIC_LAYER) {
            return false;
        }

        let Some(animator) = self.animator.as_deref_mut() else {
            return false;
        };
        animator.set_trigger(anim::SCREAM);

        let position = self
            .transform
            .transform_point(Vec3::Y * self.zombie.profile.scream_height);
        self.zombie.is_screaming = true;
        self.emit(EffectKind::Scream { position, radius });

        crate::logger::log(&format!("😱 Zombie {:?} screams (radius {:.1})", self.entity, radius));
        true
    }

    // ------------------------------------------------------------------
    // RNG / effects
    // ------------------------------------------------------------------

    /// Случайное число в [0, 1)
    pub fn random_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    pub fn emit(&mut self, effect: EffectKind) {
        self.effects.push(effect);
    }

    pub fn take_effects(&mut self) -> Vec<AgentEffect> {
        let agent = self.entity;
        self.effects
            .drain(..)
            .map(|effect| AgentEffect { agent, effect })
            .collect()
    }
}
