//! Реанимация: снимок позы ragdoll'а и blend обратно в анимацию.
//!
//! Blend начинается после `mecanim_transition_time` (аниматор успевает
//! перейти в reanimate состояние), ratio растёт линейно за `blend_time`.
//! Пока идёт окно перехода, root агента подтягивается под лежащие бёдра:
//! floor snap → проекция на nav surface → коррекция разворота.

use bevy::prelude::*;

use super::components::{BoneAlignment, BoneControlMode, BoneSnapshot, Ragdoll, RagdollConfig};
use crate::ai::context::anim;
use crate::ai::geometry::flatten;
use crate::ai::registry::ColliderRegistry;
use crate::ai::services::{Animator, NavigationAgent, PhysicsQuery};
use crate::components::{BonePose, HumanBone};

/// Высота старта луча пола над вычисленной позицией
const FLOOR_PROBE_HEIGHT: f32 = 0.25;
const FLOOR_PROBE_DISTANCE: f32 = 1000.0;

/// Ratio blend'а 0..1 (0 до конца окна перехода аниматора)
pub fn blend_ratio(now: f32, ragdoll_end_time: f32, config: &RagdollConfig) -> f32 {
    ((now - ragdoll_end_time - config.mecanim_transition_time) / config.blend_time).clamp(0.0, 1.0)
}

/// Окно перехода аниматора: root ещё подстраивается под ragdoll
pub fn in_transition_window(now: f32, ragdoll_end_time: f32, config: &RagdollConfig) -> bool {
    now - ragdoll_end_time <= config.mecanim_transition_time
}

/// Trigger реанимации: ось бёдер смотрит вверх → лежит на спине
pub fn reanimation_trigger(hip_rotation: Quat, alignment: BoneAlignment) -> &'static str {
    let axis = hip_rotation * alignment.axis();
    if axis.y >= 0.0 {
        anim::REANIMATE_FROM_BACK
    } else {
        anim::REANIMATE_FROM_FRONT
    }
}

/// Ragdoll → RagdollToAnim
///
/// Снимает позы костей (скелет сейчас висит на body parts), запоминает
/// бёдра/голову/ступни, включает аниматор и запускает trigger подъёма.
/// Возвращает имя trigger'а.
pub fn begin_reanimation(ragdoll: &mut Ragdoll, animator: &mut dyn Animator, now: f32) -> &'static str {
    ragdoll.snapshots = ragdoll
        .config
        .bones
        .iter()
        .filter_map(|&bone| animator.bone_world_pose(bone).map(|pose| BoneSnapshot { bone, pose }))
        .collect();

    let hips = animator.bone_world_pose(HumanBone::Hips);
    ragdoll.ragdoll_hip_position = hips.map(|pose| pose.position).unwrap_or_default();
    ragdoll.ragdoll_head_position = animator
        .bone_world_pose(HumanBone::Head)
        .map(|pose| pose.position)
        .unwrap_or(ragdoll.ragdoll_hip_position);
    ragdoll.ragdoll_feet_position = feet_position(animator).unwrap_or(ragdoll.ragdoll_hip_position);

    let trigger = reanimation_trigger(
        hips.map(|pose| pose.rotation).unwrap_or(Quat::IDENTITY),
        ragdoll.config.root_alignment,
    );

    ragdoll.mode = BoneControlMode::RagdollToAnim;
    ragdoll.ragdoll_end_time = now;

    animator.set_enabled(true);
    animator.set_trigger(trigger);
    trigger
}

/// Середина между ступнями
pub fn feet_position(animator: &dyn Animator) -> Option<Vec3> {
    let left = animator.bone_world_pose(HumanBone::LeftFoot)?;
    let right = animator.bone_world_pose(HumanBone::RightFoot)?;
    Some((left.position + right.position) * 0.5)
}

/// Высота пола под точкой (самое высокое чужое попадание)
pub fn floor_height(
    physics: &dyn PhysicsQuery,
    point: Vec3,
    mask: u32,
    agent: Entity,
    registry: &ColliderRegistry,
) -> Option<f32> {
    physics
        .raycast_all(point + Vec3::Y * FLOOR_PROBE_HEIGHT, Vec3::NEG_Y, FLOOR_PROBE_DISTANCE, mask)
        .iter()
        .filter(|hit| {
            let body = hit.body.unwrap_or(hit.collider);
            !registry.belongs_to(body, agent) && !registry.belongs_to(hit.collider, agent)
        })
        .map(|hit| hit.point.y)
        .reduce(f32::max)
}

/// Новая позиция root'а: бёдра ragdoll'а под анимированными бёдрами
///
/// Floor snap и проекция на nav surface опциональны: нет попадания /
/// проекции → используется сырая позиция со смещением.
#[allow(clippy::too_many_arguments)]
pub fn reanimated_root_position(
    ragdoll: &Ragdoll,
    root: Vec3,
    animated_hips: Vec3,
    physics: Option<&dyn PhysicsQuery>,
    nav: Option<&dyn NavigationAgent>,
    agent: Entity,
    registry: &ColliderRegistry,
) -> Vec3 {
    let mut position = root + (ragdoll.ragdoll_hip_position - animated_hips);

    if let Some(floor) =
        physics.and_then(|physics| floor_height(physics, position, ragdoll.config.geometry_mask, agent, registry))
    {
        position.y = floor;
    }

    let Some(nav) = nav else {
        return position;
    };

    let base_offset = Vec3::Y * nav.base_offset();
    match nav.sample_position(position, ragdoll.config.nav_sample_radius) {
        Some(sampled) => sampled + base_offset,
        None => position + base_offset,
    }
}

/// Горизонтальная коррекция разворота: направление голова→ноги анимации
/// поворачивается к направлению голова→ноги ragdoll'а
pub fn facing_correction(ragdoll: &Ragdoll, animator: &dyn Animator) -> Option<Quat> {
    let ragdoll_direction = flatten(ragdoll.ragdoll_feet_position - ragdoll.ragdoll_head_position);

    let head = animator.bone_world_pose(HumanBone::Head)?.position;
    let feet = feet_position(animator)?;
    let animated_direction = flatten(feet - head);

    if ragdoll_direction.length_squared() < 1e-4 || animated_direction.length_squared() < 1e-4 {
        return None;
    }

    Some(Quat::from_rotation_arc(
        animated_direction.normalize(),
        ragdoll_direction.normalize(),
    ))
}

/// Поза кости на этом тике blend'а
///
/// Root bone блендит позицию и поворот, остальные: только поворот
/// (позиции остаются анимированными).
pub fn blend_pose(snapshot: &BoneSnapshot, animated: BonePose, ratio: f32) -> BonePose {
    let rotation = snapshot.pose.rotation.slerp(animated.rotation, ratio);
    let position = if snapshot.bone.is_root() {
        snapshot.pose.position.lerp(animated.position, ratio)
    } else {
        animated.position
    };
    BonePose::new(position, rotation)
}

/// Применяет blend ко всем снятым костям. Возвращает ratio.
pub fn apply_blend(ragdoll: &Ragdoll, animator: &mut dyn Animator, now: f32) -> f32 {
    let ratio = blend_ratio(now, ragdoll.ragdoll_end_time, &ragdoll.config);

    for snapshot in &ragdoll.snapshots {
        let Some(animated) = animator.bone_world_pose(snapshot.bone) else {
            continue;
        };
        animator.set_bone_world_pose(snapshot.bone, blend_pose(snapshot, animated, ratio));
    }

    ratio
}
