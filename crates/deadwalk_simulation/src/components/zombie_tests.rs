//! Tests for zombie profile + runtime.

#[cfg(test)]
mod tests {
    use super::super::zombie::{Zombie, ZombieProfile};
    use crate::config::ConfigError;

    #[test]
    fn test_default_profile_is_valid() {
        assert_eq!(ZombieProfile::default().validate(), Ok(()));
    }

    #[test]
    fn test_profile_loads_from_partial_json() {
        let json = r#"{ "sight": 0.9, "hearing": 0.25, "health": 40 }"#;
        let profile: ZombieProfile = serde_json::from_str(json).expect("valid json");

        assert_eq!(profile.sight, 0.9);
        assert_eq!(profile.hearing, 0.25);
        assert_eq!(profile.health, 40);
        // Остальное: дефолты
        assert_eq!(profile.fov, 50.0);
        assert_eq!(profile.crawl_threshold, 90);
    }

    #[test]
    fn test_invalid_profile_is_clamped_on_spawn() {
        let profile = ZombieProfile {
            sight: 1.7,
            health: 250,
            ..Default::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::OutOfRange { field: "sight", .. })
        ));

        let zombie = Zombie::new(profile);
        assert_eq!(zombie.profile.sight, 1.0);
        assert_eq!(zombie.health, 100);
    }

    #[test]
    fn test_depletion_scales_with_speed_cubed() {
        let mut zombie = Zombie::default();
        zombie.speed = 2.0;

        zombie.deplete_satisfaction(10.0);

        // 0.1 × 10 / 100 × 8 = 0.08
        assert!((zombie.satisfaction - 0.92).abs() < 1e-5);

        zombie.speed = 0.0;
        zombie.deplete_satisfaction(10.0);
        assert!((zombie.satisfaction - 0.92).abs() < 1e-5);
    }

    #[test]
    fn test_replenish_caps_at_one() {
        let mut zombie = Zombie::default();
        zombie.satisfaction = 0.5;
        zombie.replenish_satisfaction(20.0);
        // 20 × 0.5 / 100 = 0.1
        assert!((zombie.satisfaction - 0.6).abs() < 1e-5);

        zombie.replenish_satisfaction(1_000.0);
        assert_eq!(zombie.satisfaction, 1.0);
    }

    #[test]
    fn test_limp_and_crawl_thresholds() {
        let mut zombie = Zombie::default();

        zombie.lower_body_damage = 30;
        assert!(!zombie.is_limping());

        zombie.lower_body_damage = 31;
        assert!(zombie.is_limping());
        assert!(!zombie.is_crawling());

        zombie.lower_body_damage = 90;
        assert!(!zombie.is_limping());
        assert!(zombie.is_crawling());

        zombie.upper_body_damage = 50;
        assert!(!zombie.upper_body_impaired(), "crawling disables upper body layer");
    }

    #[test]
    fn test_root_motion_refcounts() {
        let mut zombie = Zombie::default();
        zombie.add_root_motion_request(1, 0);
        zombie.add_root_motion_request(1, 1);
        assert!(zombie.use_root_position());
        assert!(zombie.use_root_rotation());

        zombie.add_root_motion_request(-1, -1);
        assert!(zombie.use_root_position());
        assert!(!zombie.use_root_rotation());
    }
}
