//! Damage model: роутинг попадания по региону, решение ragdoll vs hit reaction.

use bevy::prelude::*;

use crate::ai::context::anim;
use crate::ai::geometry::{flatten, signed_angle};
use crate::ai::services::Animator;
use crate::components::{BodyRegion, Zombie};
use crate::ragdoll::BoneControlMode;

/// Порог угла hit reaction для головы (градусы)
pub const HEAD_HIT_ANGLE: f32 = 10.0;
/// Порог угла hit reaction для корпуса (градусы)
pub const UPPER_BODY_HIT_ANGLE: f32 = 20.0;

/// Одно попадание по зомби
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInput {
    pub region: BodyRegion,
    /// Точка попадания (мир)
    pub position: Vec3,
    pub force: Vec3,
    pub damage: i32,
    pub attacker_position: Vec3,
    /// -1 слева, 1 справа, 0: по углу к точке попадания
    pub hit_direction: i32,
}

/// Результат попадания
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub ragdoll: bool,
    /// Код hit reaction (0: без реакции)
    pub hit_type: i32,
    /// Этим попаданием health дошёл до 0
    pub died: bool,
}

/// Применяет попадание к зомби и решает, падать ли в ragdoll
///
/// Ragdoll: сила выше порога, смерть, удар по ногам, уже не Animated,
/// ползёт, cinematic lock, атакующий за спиной.
pub fn resolve_hit(
    zombie: &mut Zombie,
    transform: &Transform,
    mode: BoneControlMode,
    hit: &HitInput,
    strength_threshold: f32,
) -> HitOutcome {
    let was_alive = zombie.is_alive();
    let mut ragdoll = hit.force.length() > strength_threshold;

    match hit.region {
        BodyRegion::Head => {
            zombie.health = (zombie.health - hit.damage).max(0);
            if zombie.health == 0 {
                ragdoll = true;
            }
        }
        BodyRegion::UpperBody => {
            zombie.upper_body_damage += hit.damage;
        }
        BodyRegion::LowerBody => {
            zombie.lower_body_damage += hit.damage;
            ragdoll = true;
        }
        BodyRegion::None => {}
    }

    let attacker_behind = (hit.attacker_position - transform.translation).dot(transform.forward().as_vec3()) < 0.0;

    if mode != BoneControlMode::Animated || zombie.is_crawling() || zombie.cinematic_enabled || attacker_behind {
        ragdoll = true;
    }

    let hit_type = if ragdoll {
        0
    } else {
        let angle = signed_angle(transform.forward().as_vec3(), flatten(hit.position - transform.translation));
        hit_type(hit.region, angle, hit.hit_direction)
    };

    HitOutcome {
        ragdoll,
        hit_type,
        died: was_alive && !zombie.is_alive(),
    }
}

/// Код hit reaction: голова 1/2/3, корпус 4/5/6 (слева / по центру / справа)
///
/// `angle`: знаковый угол forward → точка попадания (положительный слева).
/// Явное направление удара перекрывает угол.
pub fn hit_type(region: BodyRegion, angle: f32, hit_direction: i32) -> i32 {
    let (base, threshold) = match region {
        BodyRegion::Head => (1, HEAD_HIT_ANGLE),
        BodyRegion::UpperBody => (4, UPPER_BODY_HIT_ANGLE),
        BodyRegion::LowerBody | BodyRegion::None => return 0,
    };

    let side = match hit_direction {
        d if d < 0 => 0,
        d if d > 0 => 2,
        _ if angle > threshold => 0,
        _ if angle < -threshold => 2,
        _ => 1,
    };

    base + side
}

/// Damage layers + параметры аниматора из накопленного урона
pub fn update_damage_layers(zombie: &Zombie, animator: &mut dyn Animator) {
    if let Some(lower) = animator.layer_index(anim::LOWER_BODY_LAYER) {
        animator.set_layer_weight(lower, if zombie.is_limping() { 1.0 } else { 0.0 });
    }
    if let Some(upper) = animator.layer_index(anim::UPPER_BODY_LAYER) {
        animator.set_layer_weight(upper, if zombie.upper_body_impaired() { 1.0 } else { 0.0 });
    }

    animator.set_bool(anim::CRAWLING, zombie.is_crawling());
    animator.set_integer(anim::UPPER_BODY_DAMAGE, zombie.upper_body_damage);
    animator.set_integer(anim::LOWER_BODY_DAMAGE, zombie.lower_body_damage);
}
