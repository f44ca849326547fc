//! Tests for reanimation math.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::context::anim;
    use crate::ai::registry::ColliderRegistry;
    use crate::ai::services::{Animator, NavigationAgent, PhysicsQuery};
    use crate::collision_layers::COLLISION_LAYER_GEOMETRY;
    use crate::components::{BonePose, HumanBone};
    use crate::headless::{HeadlessAnimator, HeadlessNavAgent, HeadlessPhysics};
    use crate::ragdoll::reanimation::*;
    use crate::ragdoll::{BoneAlignment, BoneControlMode, BoneSnapshot, Ragdoll, RagdollConfig};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_blend_ratio_waits_for_transition() {
        let config = RagdollConfig::default();

        assert_eq!(blend_ratio(10.0, 10.0, &config), 0.0);
        assert_eq!(blend_ratio(10.05, 10.0, &config), 0.0);
        assert!(approx(blend_ratio(10.85, 10.0, &config), 0.5));
        assert_eq!(blend_ratio(20.0, 10.0, &config), 1.0);

        assert!(in_transition_window(10.05, 10.0, &config));
        assert!(!in_transition_window(10.2, 10.0, &config));
    }

    #[test]
    fn test_reanimation_trigger_by_hip_axis() {
        let on_back = Quat::from_rotation_x(90f32.to_radians());
        let face_down = Quat::from_rotation_x(-90f32.to_radians());

        assert_eq!(reanimation_trigger(on_back, BoneAlignment::Forward), anim::REANIMATE_FROM_BACK);
        assert_eq!(reanimation_trigger(face_down, BoneAlignment::Forward), anim::REANIMATE_FROM_FRONT);

        // Скелет с осью назад: та же поза читается наоборот
        assert_eq!(reanimation_trigger(on_back, BoneAlignment::Back), anim::REANIMATE_FROM_FRONT);
    }

    #[test]
    fn test_begin_reanimation_snapshots_pose() {
        let mut ragdoll = Ragdoll::default();
        ragdoll.mode = BoneControlMode::Ragdoll;

        let mut animator = HeadlessAnimator::default();
        animator.set_enabled(false);
        let lying_hips = BonePose::new(Vec3::new(2.0, 0.15, 0.0), Quat::from_rotation_x(-90f32.to_radians()));
        animator.set_bone_world_pose(HumanBone::Hips, lying_hips);
        animator.set_bone_world_pose(HumanBone::Head, BonePose::new(Vec3::new(2.0, 0.2, -0.7), Quat::IDENTITY));

        let trigger = begin_reanimation(&mut ragdoll, &mut animator, 12.5);

        assert_eq!(trigger, anim::REANIMATE_FROM_FRONT);
        assert_eq!(ragdoll.mode, BoneControlMode::RagdollToAnim);
        assert_eq!(ragdoll.ragdoll_end_time, 12.5);
        assert_eq!(ragdoll.snapshots.len(), HumanBone::ALL.len());
        assert_eq!(ragdoll.ragdoll_hip_position, lying_hips.position);
        assert_eq!(ragdoll.ragdoll_head_position, Vec3::new(2.0, 0.2, -0.7));
        // Ступни из rest pose: середина между ними
        assert_eq!(ragdoll.ragdoll_feet_position, Vec3::new(0.0, 0.05, 0.0));

        assert!(animator.is_enabled());
        assert!(animator.get_bool(anim::REANIMATE_FROM_FRONT));
    }

    #[test]
    fn test_blend_pose_root_vs_limbs() {
        let lying = Quat::from_rotation_x(90f32.to_radians());
        let animated = BonePose::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);

        let hips = BoneSnapshot {
            bone: HumanBone::Hips,
            pose: BonePose::new(Vec3::new(0.0, 0.2, 0.0), lying),
        };
        let blended = blend_pose(&hips, animated, 0.5);
        assert!((blended.position - Vec3::new(0.0, 0.6, 0.0)).length() < 1e-4);
        assert!(blended.rotation.angle_between(Quat::from_rotation_x(45f32.to_radians())) < 1e-3);

        // Не-root кость: позиция всегда из анимации
        let head = BoneSnapshot {
            bone: HumanBone::Head,
            pose: BonePose::new(Vec3::splat(5.0), lying),
        };
        let blended = blend_pose(&head, animated, 0.1);
        assert_eq!(blended.position, animated.position);

        assert!(blend_pose(&head, animated, 1.0).rotation.angle_between(Quat::IDENTITY) < 1e-3);
    }

    #[test]
    fn test_apply_blend_writes_overrides() {
        let mut ragdoll = Ragdoll::default();
        let mut animator = HeadlessAnimator::default();
        let lying_hips = BonePose::new(Vec3::new(0.0, 0.2, 0.0), Quat::IDENTITY);
        animator.set_bone_world_pose(HumanBone::Hips, lying_hips);
        begin_reanimation(&mut ragdoll, &mut animator, 0.0);

        // Аниматор отыграл кадр: overrides сброшены
        animator.advance(&Transform::IDENTITY, 0.01);
        let animated = animator.bone_world_pose(HumanBone::Hips).expect("hips");

        let ratio = apply_blend(&ragdoll, &mut animator, 0.85);
        assert!(approx(ratio, 0.5));

        let hips = animator.bone_world_pose(HumanBone::Hips).expect("hips");
        assert!((hips.position - lying_hips.position.lerp(animated.position, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_root_position_floor_and_nav() {
        let agent = Entity::from_raw(1);
        let own_part = Entity::from_raw(2);
        let floor = Entity::from_raw(3);

        let mut registry = ColliderRegistry::default();
        registry.register(own_part, agent);

        let mut physics = HeadlessPhysics::default();
        physics.add_ground(floor, 0.1);
        // Собственная body part выше пола: её луч игнорирует
        physics.add_sphere(own_part, Vec3::new(3.0, 0.1, 1.0), 0.1, COLLISION_LAYER_GEOMETRY, Some(own_part));

        let mut ragdoll = Ragdoll::default();
        ragdoll.ragdoll_hip_position = Vec3::new(3.0, 0.15, 1.0);
        let animated_hips = Vec3::new(0.0, 0.15, 0.0);

        let snapped = reanimated_root_position(
            &ragdoll,
            Vec3::ZERO,
            animated_hips,
            Some(&physics as &dyn PhysicsQuery),
            None,
            agent,
            &registry,
        );
        assert!((snapped - Vec3::new(3.0, 0.1, 1.0)).length() < 1e-4);

        let nav = HeadlessNavAgent::new(Vec3::ZERO).with_bounds(Vec2::splat(-5.0), Vec2::splat(5.0));
        let sampled = reanimated_root_position(
            &ragdoll,
            Vec3::ZERO,
            animated_hips,
            Some(&physics as &dyn PhysicsQuery),
            Some(&nav as &dyn NavigationAgent),
            agent,
            &registry,
        );
        assert!((sampled - Vec3::new(3.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_root_position_fallbacks() {
        let agent = Entity::from_raw(1);
        let registry = ColliderRegistry::default();

        let mut ragdoll = Ragdoll::default();
        ragdoll.ragdoll_hip_position = Vec3::new(9.0, 0.4, 0.0);

        // Ни пола, ни nav surface под бёдрами: сырая позиция со смещением
        let nav = HeadlessNavAgent::new(Vec3::ZERO).with_bounds(Vec2::splat(-5.0), Vec2::splat(5.0));
        let position = reanimated_root_position(
            &ragdoll,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.15, 0.0),
            Some(&HeadlessPhysics::default() as &dyn PhysicsQuery),
            Some(&nav as &dyn NavigationAgent),
            agent,
            &registry,
        );
        assert!((position - Vec3::new(10.0, 0.25, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_facing_correction() {
        let mut ragdoll = Ragdoll::default();
        ragdoll.ragdoll_head_position = Vec3::new(1.0, 0.1, 0.0);
        ragdoll.ragdoll_feet_position = Vec3::new(-1.0, 0.1, 0.0);

        let mut animator = HeadlessAnimator::default();
        animator.set_bone_world_pose(HumanBone::Head, BonePose::new(Vec3::new(0.0, 0.1, 1.0), Quat::IDENTITY));
        animator.set_bone_world_pose(HumanBone::LeftFoot, BonePose::new(Vec3::new(-0.1, 0.05, -1.0), Quat::IDENTITY));
        animator.set_bone_world_pose(HumanBone::RightFoot, BonePose::new(Vec3::new(0.1, 0.05, -1.0), Quat::IDENTITY));

        let correction = facing_correction(&ragdoll, &animator).expect("correction");
        assert!((correction * Vec3::NEG_Z - Vec3::NEG_X).length() < 1e-4);

        // Голова над ступнями: направление не определено
        ragdoll.ragdoll_feet_position = Vec3::new(1.0, -1.0, 0.0);
        assert!(facing_correction(&ragdoll, &animator).is_none());
    }
}
