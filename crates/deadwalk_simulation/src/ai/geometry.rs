//! Угловые helpers (горизонтальная плоскость, Y-up, forward = -Z).

use bevy::prelude::*;

/// Угол между векторами в градусах (0..180)
pub fn angle_between(from: Vec3, to: Vec3) -> f32 {
    if from.length_squared() < f32::EPSILON || to.length_squared() < f32::EPSILON {
        return 0.0;
    }
    from.angle_between(to).to_degrees()
}

/// Знаковый угол (градусы): положительный: `to` против часовой стрелки
/// от `from` (если смотреть сверху), т.е. "левее".
///
/// Совпадает по знаку с `Quat::from_rotation_y`: поворот на +angle
/// разворачивает `from` к `to`.
pub fn signed_angle(from: Vec3, to: Vec3) -> f32 {
    if from.length_squared() < f32::EPSILON || to.length_squared() < f32::EPSILON {
        return 0.0;
    }

    let angle = angle_between(from, to);
    let cross = from.cross(to);
    angle * if cross.y < 0.0 { -1.0 } else { 1.0 }
}

/// Знак как целое -1/1 (0 → 1)
pub fn sign_i32(value: f32) -> i32 {
    if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Вектор без вертикальной компоненты
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Поворот "смотреть вдоль direction" (горизонтально). None для нулевого вектора.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = flatten(direction);
    if flat.length_squared() < 1e-6 {
        return None;
    }
    Some(Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation)
}
