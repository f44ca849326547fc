//! Headless physics query: сферы + горизонтальные плоскости пола.
//!
//! Пересобирается каждый тик из `HeadlessCollider` / `HeadlessGround`.
//! Коллайдеры с `ColliderDisabled` (ragdoll) в сцену не попадают.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;

use crate::ai::services::{PhysicsBackend, PhysicsQuery, RayHit};
use crate::collision_layers::{layer_in_mask, COLLISION_LAYER_GEOMETRY};

/// Component: сферический коллайдер для headless raycast'ов
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HeadlessCollider {
    pub radius: f32,
    /// Слой (один бит из collision_layers)
    pub layer: u32,
    /// Rigid body-владелец (body part → сам, агент → None)
    pub body: Option<Entity>,
    pub enabled: bool,
}

impl HeadlessCollider {
    pub fn new(radius: f32, layer: u32) -> Self {
        Self {
            radius,
            layer,
            body: None,
            enabled: true,
        }
    }

    pub fn with_body(mut self, body: Entity) -> Self {
        self.body = Some(body);
        self
    }
}

/// Component: бесконечная плоскость пола на высоте `height`
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HeadlessGround {
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
struct SphereShape {
    collider: Entity,
    center: Vec3,
    radius: f32,
    layer: u32,
    body: Option<Entity>,
}

#[derive(Debug, Clone, Copy)]
struct GroundPlane {
    collider: Entity,
    height: f32,
}

/// Снимок сцены для raycast'ов
#[derive(Debug, Clone, Default)]
pub struct HeadlessPhysics {
    spheres: Vec<SphereShape>,
    grounds: Vec<GroundPlane>,
}

impl HeadlessPhysics {
    pub fn add_sphere(&mut self, collider: Entity, center: Vec3, radius: f32, layer: u32, body: Option<Entity>) {
        self.spheres.push(SphereShape {
            collider,
            center,
            radius,
            layer,
            body,
        });
    }

    pub fn add_ground(&mut self, collider: Entity, height: f32) {
        self.grounds.push(GroundPlane { collider, height });
    }

    pub fn len(&self) -> usize {
        self.spheres.len() + self.grounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ray vs sphere: ближайшее t >= 0 (0, если origin внутри)
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;

    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some((-b - discriminant.sqrt()).max(0.0))
}

impl PhysicsQuery for HeadlessPhysics {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = self
            .spheres
            .iter()
            .filter(|sphere| layer_in_mask(sphere.layer, mask))
            .filter_map(|sphere| {
                let distance = ray_sphere(origin, direction, sphere.center, sphere.radius)?;
                (distance <= max_distance).then(|| RayHit {
                    distance,
                    point: origin + direction * distance,
                    collider: sphere.collider,
                    body: sphere.body,
                })
            })
            .collect();

        if layer_in_mask(COLLISION_LAYER_GEOMETRY, mask) && direction.y < -f32::EPSILON {
            for ground in &self.grounds {
                let distance = (ground.height - origin.y) / direction.y;
                if (0.0..=max_distance).contains(&distance) {
                    hits.push(RayHit {
                        distance,
                        point: origin + direction * distance,
                        collider: ground.collider,
                        body: None,
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Система: пересборка PhysicsBackend из headless коллайдеров
pub fn rebuild_headless_physics(
    mut commands: Commands,
    colliders: Query<(Entity, &Transform, &HeadlessCollider), Without<ColliderDisabled>>,
    grounds: Query<(Entity, &HeadlessGround)>,
) {
    let mut physics = HeadlessPhysics::default();

    for (entity, transform, collider) in colliders.iter() {
        if !collider.enabled {
            continue;
        }
        physics.add_sphere(
            entity,
            transform.translation,
            collider.radius * transform.scale.max_element(),
            collider.layer,
            collider.body,
        );
    }

    for (entity, ground) in grounds.iter() {
        physics.add_ground(entity, ground.height);
    }

    commands.insert_resource(PhysicsBackend(Box::new(physics)));
}
