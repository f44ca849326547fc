//! Tests for threat classification and line of sight.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::components::{AiStateType, TargetKind, TriggerEventKind};
    use super::super::perception::{classify, sphere_to_world};
    use super::super::test_support::TestAgent;
    use crate::collision_layers::COLLISION_LAYER_AI_BODY_PART;
    use crate::components::{ContactShape, ContactTag, SensorContact, ZombieProfile};

    const EYE: f32 = 1.6;

    #[test]
    fn test_audio_within_inflated_radius_is_accepted() {
        let profile = ZombieProfile {
            hearing: 0.5,
            ..Default::default()
        };
        let mut agent = TestAgent::with_profile(profile, AiStateType::Idle);
        let sound = agent.sound_at(Vec3::new(0.0, EYE, -10.0), 20.0);

        agent.sense(&[sound]);

        // 10 / 20 = 0.5 → 0.5 + 0.5 × (1 - 0.5) = 0.75 ≤ 1
        assert_eq!(agent.senses.audio_threat.kind(), TargetKind::Audio);
        assert_eq!(agent.senses.audio_threat.source(), Some(sound.collider));
        assert!((agent.senses.audio_threat.distance() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_audio_beyond_inflated_radius_is_rejected() {
        let profile = ZombieProfile {
            hearing: 0.5,
            ..Default::default()
        };
        let mut agent = TestAgent::with_profile(profile, AiStateType::Idle);
        // 15 / 20 = 0.75 → 1.125 > 1
        let sound = agent.sound_at(Vec3::new(0.0, EYE, -15.0), 20.0);

        agent.sense(&[sound]);
        assert!(agent.senses.audio_threat.is_none());
    }

    #[test]
    fn test_closer_audio_source_wins() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let far = agent.sound_at(Vec3::new(0.0, EYE, -8.0), 20.0);
        let near = agent.sound_at(Vec3::new(4.0, EYE, 0.0), 20.0);

        agent.sense(&[far, near]);
        assert_eq!(agent.senses.audio_threat.source(), Some(near.collider));

        agent.sense(&[near, far]);
        assert_eq!(agent.senses.audio_threat.source(), Some(near.collider));
    }

    #[test]
    fn test_sphere_to_world_uses_scale_and_rotation() {
        let transform = Transform {
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::new(2.0, 1.0, 3.0),
        };
        let contact = SensorContact::new(
            Entity::from_raw(9),
            ContactTag::SoundEmitter,
            &transform,
            ContactShape::Sphere { center: Vec3::new(1.0, 0.0, 0.0), radius: 2.0 },
        );

        let (center, radius) = sphere_to_world(&contact).expect("sphere contact");
        // Локальный центр (2, 0, 0) после поворота на 90° вокруг Y → (0, 0, -2)
        assert!((center - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-4);
        assert_eq!(radius, 6.0);
    }

    #[test]
    fn test_visible_player_becomes_visual_threat() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let player = agent.player_at(Vec3::new(0.0, EYE, -3.0));

        agent.sense(&[player]);

        assert_eq!(agent.senses.visual_threat.kind(), TargetKind::VisualPlayer);
        assert_eq!(agent.senses.visual_threat.source(), Some(player.collider));
    }

    #[test]
    fn test_player_outside_fov_or_range_is_ignored() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let behind = agent.player_at(Vec3::new(0.0, EYE, 3.0));
        let side = agent.player_at(Vec3::new(3.0, EYE, -3.0));
        // LOS range = sensor radius × sight = 5
        let far = agent.player_at(Vec3::new(0.0, EYE, -7.0));

        agent.sense(&[behind, side, far]);
        assert!(agent.senses.visual_threat.is_none());
    }

    #[test]
    fn test_own_body_parts_do_not_block_sight() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let player = agent.player_at(Vec3::new(0.0, EYE, -3.0));

        agent.sense(&[player]);
        assert!(agent.senses.visual_threat.is(TargetKind::VisualPlayer));

        // Без записи в registry голова агента закрывает обзор
        let head = agent.head;
        agent.registry.unregister(head);
        agent.sense(&[player]);
        assert!(agent.senses.visual_threat.is_none());
    }

    #[test]
    fn test_other_zombie_blocks_sight() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let player = agent.player_at(Vec3::new(0.0, EYE, -4.0));
        let other = agent.next_entity();
        agent.add_sphere(other, Vec3::new(0.0, EYE, -2.0), 0.3, COLLISION_LAYER_AI_BODY_PART, Some(other));

        agent.sense(&[player]);
        assert!(agent.senses.visual_threat.is_none());
    }

    #[test]
    fn test_player_priority_over_light_and_food() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        agent.zombie.satisfaction = 0.2;
        let player = agent.player_at(Vec3::new(0.0, EYE, -3.0));
        let light = agent.light_at(Vec3::new(0.0, EYE, -1.0), 10.0);
        let food = agent.food_at(Vec3::new(0.0, EYE, -2.0));

        agent.sense(&[player, light, food]);
        assert!(agent.senses.visual_threat.is(TargetKind::VisualPlayer));

        // Свет без игрока принимается
        agent.sense(&[light]);
        assert!(agent.senses.visual_threat.is(TargetKind::VisualLight));
    }

    #[test]
    fn test_farther_player_does_not_replace_closer_one() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let near = agent.player_at(Vec3::new(-0.5, EYE, -2.0));
        let far = agent.player_at(Vec3::new(0.5, EYE, -4.0));

        agent.sense(&[near, far]);
        assert_eq!(agent.senses.visual_threat.source(), Some(near.collider));

        agent.sense(&[far, near]);
        assert_eq!(agent.senses.visual_threat.source(), Some(near.collider));
    }

    #[test]
    fn test_light_aggravation_gated_by_sight_and_intelligence() {
        let profile = ZombieProfile {
            intelligence: 0.2,
            ..Default::default()
        };
        let mut agent = TestAgent::with_profile(profile, AiStateType::Idle);
        // 3 / 10 = 0.3: в пределах sight (0.5), но выше intelligence (0.2)
        let light = agent.light_at(Vec3::new(0.0, EYE, -3.0), 10.0);

        agent.sense(&[light]);
        assert!(agent.senses.visual_threat.is_none());
    }

    #[test]
    fn test_food_requires_hunger_and_silence() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let food = agent.food_at(Vec3::new(0.0, 0.5, -3.0));
        let sound = agent.sound_at(Vec3::new(2.0, EYE, 0.0), 20.0);

        agent.zombie.satisfaction = 0.95;
        agent.sense(&[food]);
        assert!(agent.senses.visual_threat.is_none());

        agent.zombie.satisfaction = 0.5;
        agent.sense(&[sound, food]);
        assert!(agent.senses.visual_threat.is_none());

        agent.sense(&[food]);
        assert!(agent.senses.visual_threat.is(TargetKind::VisualFood));
    }

    #[test]
    fn test_exit_events_are_not_classified() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let player = agent.player_at(Vec3::new(0.0, EYE, -3.0));
        agent.sense(&[]);

        let (_, mut ctx) = agent.parts();
        classify(&mut ctx, TriggerEventKind::Exit, &player);
        assert!(ctx.senses.visual_threat.is_none());

        classify(&mut ctx, TriggerEventKind::Enter, &player);
        assert!(ctx.senses.visual_threat.is(TargetKind::VisualPlayer));
    }

    #[test]
    fn test_threats_do_not_leak_across_ticks() {
        let mut agent = TestAgent::new(AiStateType::Idle);
        let player = agent.player_at(Vec3::new(0.0, EYE, -3.0));

        agent.sense(&[player]);
        assert!(!agent.senses.visual_threat.is_none());

        agent.sense(&[]);
        assert!(agent.senses.visual_threat.is_none());
        assert!(agent.senses.audio_threat.is_none());
    }
}
