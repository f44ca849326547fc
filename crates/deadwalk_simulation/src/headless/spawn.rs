//! Spawn helpers для headless сцен (демо, интеграционные тесты).
//!
//! Работают напрямую с `World`: зомби регистрирует свои коллайдеры в
//! `ColliderRegistry` сразу при спавне.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;

use super::animator::HeadlessAnimator;
use super::navigation::HeadlessNavAgent;
use super::physics::{HeadlessCollider, HeadlessGround};
use crate::ai::components::{AiStateType, Senses};
use crate::ai::context::ZombieBrain;
use crate::ai::registry::ColliderRegistry;
use crate::ai::services::{Animator, AnimatorHandle, NavAgent};
use crate::ai::states::ZombieBehaviorConfig;
use crate::ai::waypoints::{PatrolRoute, WaypointNetwork};
use crate::ai::ZombieSounds;
use crate::collision_layers::{
    COLLISION_LAYER_AI_BODY_PART, COLLISION_LAYER_PLAYER, COLLISION_LAYER_VISUAL_AGGRAVATOR,
};
use crate::components::{
    BodyPart, BonePose, ContactShape, ContactTag, HumanBone, MeleeZone, SoundEmitter, Stimulus, Zombie, ZombieProfile,
};
use crate::ragdoll::{Ragdoll, RagdollConfig};

/// Радиус основного коллайдера зомби
pub const ZOMBIE_COLLIDER_RADIUS: f32 = 0.35;
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.4;
pub const FOOD_COLLIDER_RADIUS: f32 = 0.3;

/// Rigid bodies ragdoll'а: кость и радиус сферы
pub const BODY_PART_LAYOUT: [(HumanBone, f32); 11] = [
    (HumanBone::Hips, 0.15),
    (HumanBone::Chest, 0.18),
    (HumanBone::Head, 0.12),
    (HumanBone::LeftUpperArm, 0.06),
    (HumanBone::LeftLowerArm, 0.05),
    (HumanBone::RightUpperArm, 0.06),
    (HumanBone::RightLowerArm, 0.05),
    (HumanBone::LeftUpperLeg, 0.08),
    (HumanBone::LeftLowerLeg, 0.07),
    (HumanBone::RightUpperLeg, 0.08),
    (HumanBone::RightLowerLeg, 0.07),
];

/// Параметры спавна зомби
#[derive(Debug, Clone)]
pub struct ZombieSpawn {
    pub position: Vec3,
    /// Поворот вокруг Y (радианы), 0: смотрит в -Z
    pub yaw: f32,
    pub profile: ZombieProfile,
    pub behavior: ZombieBehaviorConfig,
    pub ragdoll: RagdollConfig,
    pub initial_state: AiStateType,
    pub network: Option<Entity>,
    pub random_patrol: bool,
    pub sounds: Option<ZombieSounds>,
    /// Проходимая область nav agent'а (min, max по XZ)
    pub nav_bounds: Option<(Vec2, Vec2)>,
}

impl Default for ZombieSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            profile: ZombieProfile::default(),
            behavior: ZombieBehaviorConfig::default(),
            ragdoll: RagdollConfig::default(),
            initial_state: AiStateType::Idle,
            network: None,
            random_patrol: false,
            sounds: None,
            nav_bounds: None,
        }
    }
}

impl ZombieSpawn {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Спавн зомби + body parts, регистрация коллайдеров в registry
pub fn spawn_zombie(world: &mut World, spawn: ZombieSpawn) -> Entity {
    let transform = Transform::from_translation(spawn.position).with_rotation(Quat::from_rotation_y(spawn.yaw));

    let mut nav = HeadlessNavAgent::new(spawn.position);
    if let Some((min, max)) = spawn.nav_bounds {
        nav = nav.with_bounds(min, max);
    }
    let animator = HeadlessAnimator::new(transform);

    let mut entity = world.spawn((
        transform,
        Zombie::new(spawn.profile),
        Senses::default(),
        ZombieBrain::with_behavior(&spawn.behavior, spawn.initial_state),
        PatrolRoute::new(spawn.network, spawn.random_patrol),
        Ragdoll::new(spawn.ragdoll),
        HeadlessCollider::new(ZOMBIE_COLLIDER_RADIUS, COLLISION_LAYER_AI_BODY_PART),
    ));
    if let Some(sounds) = spawn.sounds {
        entity.insert(sounds);
    }
    let agent = entity.id();

    // Body parts спавнятся в позе аниматора (kinematic, пока Animated)
    let mut parts = Vec::new();
    for (bone, radius) in BODY_PART_LAYOUT {
        let pose = animator
            .bone_world_pose(bone)
            .unwrap_or_else(|| BonePose::from_transform(&transform));
        let part = world
            .spawn((
                Transform::from_translation(pose.position).with_rotation(pose.rotation),
                BodyPart {
                    owner: agent,
                    region: bone.region(),
                    bone,
                },
                RigidBody::KinematicPositionBased,
            ))
            .id();
        world
            .entity_mut(part)
            .insert(HeadlessCollider::new(radius, COLLISION_LAYER_AI_BODY_PART).with_body(part));
        parts.push(part);
    }

    world
        .entity_mut(agent)
        .insert((NavAgent(Box::new(nav)), AnimatorHandle(Box::new(animator))));

    let mut registry = world.get_resource_or_insert_with(ColliderRegistry::default);
    registry.register(agent, agent);
    for part in &parts {
        registry.register(*part, agent);
    }

    crate::logger::log(&format!(
        "🧟 Spawned zombie {:?} at {:?} ({} body parts)",
        agent,
        spawn.position,
        parts.len()
    ));

    agent
}

/// Игрок: stimulus + коллайдер для LOS + melee zone
///
/// `position`: центр капсулы (на эту точку целится LOS зомби).
pub fn spawn_player(world: &mut World, position: Vec3, melee_radius: f32) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            Stimulus::new(ContactTag::Player, ContactShape::Point),
            HeadlessCollider::new(PLAYER_COLLIDER_RADIUS, COLLISION_LAYER_PLAYER),
            MeleeZone { radius: melee_radius },
        ))
        .id()
}

pub fn spawn_food(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            Stimulus::new(ContactTag::Food, ContactShape::Point),
            HeadlessCollider::new(FOOD_COLLIDER_RADIUS, COLLISION_LAYER_VISUAL_AGGRAVATOR),
        ))
        .id()
}

/// Луч фонарика: box глубиной `depth` вдоль forward transform'а
pub fn spawn_flashlight(world: &mut World, transform: Transform, depth: f32) -> Entity {
    world
        .spawn((
            transform,
            Stimulus::new(
                ContactTag::Flashlight,
                ContactShape::Box {
                    size: Vec3::new(1.0, 1.0, depth),
                },
            ),
        ))
        .id()
}

/// Постоянный источник звука (радиус меняется через `SoundEmitter::set_radius`)
pub fn spawn_sound(world: &mut World, position: Vec3, radius: f32, decay_rate: f32) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            Stimulus::sound(radius),
            SoundEmitter::new(radius, decay_rate),
        ))
        .id()
}

pub fn spawn_waypoint_network(world: &mut World, points: Vec<Vec3>) -> Entity {
    world.spawn(WaypointNetwork::new(points)).id()
}

pub fn spawn_ground(world: &mut World, height: f32) -> Entity {
    world.spawn(HeadlessGround { height }).id()
}
