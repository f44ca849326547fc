//! Perception / threat classifier
//!
//! Sensor events (Enter/Stay) → кандидаты в `visual_threat` / `audio_threat`.
//! Exit ничего не инвалидирует: не подтверждённая угроза просто исчезнет
//! в следующем pre-pass.
//!
//! Приоритеты:
//! - Player перезаписывает всё, кроме более близкого игрока
//! - Light: только пока нет игрока
//! - Audio: отдельный слот, ближайший источник выигрывает
//! - Food: только без игрока/света, без звука и если зомби голоден

use bevy::prelude::*;

use super::components::{AiTarget, TargetKind, TriggerEventKind};
use super::context::ZombieContext;
use super::geometry::angle_between;
use crate::collision_layers::{COLLISION_MASK_PLAYER_LOS, COLLISION_MASK_VISUAL_LOS};
use crate::components::{ContactShape, ContactTag, SensorContact};

/// Satisfaction, выше которой еда не интересна
pub const FOOD_SATISFACTION_THRESHOLD: f32 = 0.9;

/// Классификация одного контакта сенсора
pub fn classify(ctx: &mut ZombieContext<'_>, kind: TriggerEventKind, contact: &SensorContact) {
    if kind == TriggerEventKind::Exit {
        return;
    }

    match contact.tag {
        ContactTag::Player => classify_player(ctx, contact),
        ContactTag::Flashlight => classify_light(ctx, contact),
        ContactTag::SoundEmitter => classify_audio(ctx, contact),
        ContactTag::Food => classify_food(ctx, contact),
        ContactTag::Other => {}
    }
}

fn classify_player(ctx: &mut ZombieContext<'_>, contact: &SensorContact) {
    let current = ctx.senses.visual_threat;
    let distance = ctx.sensor_position().distance(contact.position);

    // Игрок заменяет только не-игрока или более дальнего игрока
    if current.is(TargetKind::VisualPlayer) && distance >= current.distance() {
        return;
    }

    if collider_is_visible(ctx, contact, COLLISION_MASK_PLAYER_LOS) {
        ctx.senses.visual_threat = AiTarget::new(
            TargetKind::VisualPlayer,
            Some(contact.collider),
            contact.position,
            distance,
            ctx.now,
        );
    }
}

fn classify_light(ctx: &mut ZombieContext<'_>, contact: &SensorContact) {
    if ctx.senses.visual_threat.is(TargetKind::VisualPlayer) {
        return;
    }

    let ContactShape::Box { size } = contact.shape else {
        return;
    };

    // Глубина луча фонарика вдоль его forward (с учётом scale)
    let depth = size.z * contact.scale.z;
    if depth <= f32::EPSILON {
        return;
    }

    let distance = ctx.sensor_position().distance(contact.position);
    let aggravation = distance / depth;
    let profile = &ctx.zombie.profile;

    if aggravation <= profile.sight && aggravation <= profile.intelligence {
        ctx.senses.visual_threat = AiTarget::new(
            TargetKind::VisualLight,
            Some(contact.collider),
            contact.position,
            distance,
            ctx.now,
        );
    }
}

fn classify_audio(ctx: &mut ZombieContext<'_>, contact: &SensorContact) {
    let Some((center, radius)) = sphere_to_world(contact) else {
        return;
    };
    if radius <= f32::EPSILON {
        return;
    }

    let distance = (center - ctx.sensor_position()).length();
    let mut factor = distance / radius;
    // Плохой слух "отдаляет" звук
    factor += factor * (1.0 - ctx.zombie.profile.hearing);

    if factor > 1.0 {
        return;
    }

    if distance < ctx.senses.audio_threat.distance() {
        ctx.senses.audio_threat = AiTarget::new(TargetKind::Audio, Some(contact.collider), center, distance, ctx.now);
    }
}

fn classify_food(ctx: &mut ZombieContext<'_>, contact: &SensorContact) {
    let current = ctx.senses.visual_threat.kind();
    if matches!(current, TargetKind::VisualPlayer | TargetKind::VisualLight)
        || ctx.zombie.satisfaction > FOOD_SATISFACTION_THRESHOLD
        || !ctx.senses.audio_threat.is_none()
    {
        return;
    }

    let distance = contact.position.distance(ctx.sensor_position());
    if distance >= ctx.senses.visual_threat.distance() {
        return;
    }

    if collider_is_visible(ctx, contact, COLLISION_MASK_VISUAL_LOS) {
        ctx.senses.visual_threat = AiTarget::new(
            TargetKind::VisualFood,
            Some(contact.collider),
            contact.position,
            distance,
            ctx.now,
        );
    }
}

/// Line-of-sight: FOV + ближайшее не-своё пересечение луча == сам контакт
///
/// Свои body parts отсекаются через collider → agent registry.
pub fn collider_is_visible(ctx: &ZombieContext<'_>, contact: &SensorContact, mask: u32) -> bool {
    let Some(physics) = ctx.physics else {
        return false;
    };

    let origin = ctx.sensor_position();
    let direction = contact.position - origin;
    if direction.length_squared() < f32::EPSILON {
        return false;
    }

    if angle_between(direction, ctx.forward()) > ctx.zombie.profile.fov * 0.5 {
        return false;
    }

    let range = ctx.sensor_radius() * ctx.zombie.profile.sight;
    let hits = physics.raycast_all(origin, direction.normalize(), range, mask);

    let closest = hits
        .iter()
        .filter(|hit| {
            let body = hit.body.unwrap_or(hit.collider);
            !ctx.registry.belongs_to(body, ctx.entity) && !ctx.registry.belongs_to(hit.collider, ctx.entity)
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    matches!(closest, Some(hit) if hit.collider == contact.collider)
}

/// Sphere trigger → мировые center/radius (non-uniform scale: берём max)
pub fn sphere_to_world(contact: &SensorContact) -> Option<(Vec3, f32)> {
    let ContactShape::Sphere { center, radius } = contact.shape else {
        return None;
    };

    let world_center = contact.position + contact.rotation * (center * contact.scale);
    let world_radius = radius * contact.scale.abs().max_element();
    Some((world_center, world_radius))
}
