//! Zombie profile (tuning) + runtime state агента.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{check_positive, check_range, check_unit, ConfigError};

/// Tuning одного зомби (serde, грузится из JSON/RON хостом)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieProfile {
    /// Полный угол обзора (градусы, 10..360)
    pub fov: f32,
    pub sight: f32,
    pub hearing: f32,
    pub aggression: f32,
    pub intelligence: f32,
    /// "Head" health pool (0..100)
    pub health: i32,
    pub satisfaction: f32,
    pub replenish_rate: f32,
    pub depletion_rate: f32,

    pub scream_chance: f32,
    pub scream_radius: f32,
    /// Сколько секунд после крика зомби считается "кричащим"
    pub scream_duration: f32,
    /// Высота scream mount над root
    pub scream_height: f32,

    pub sensor_radius: f32,
    /// Высота сенсора (глаза) над root
    pub sensor_height: f32,
    /// Радиус arrival volume по умолчанию (0..15)
    pub stopping_distance: f32,

    pub upper_body_threshold: i32,
    pub limp_threshold: i32,
    pub crawl_threshold: i32,
}

impl Default for ZombieProfile {
    fn default() -> Self {
        Self {
            fov: 50.0,
            sight: 0.5,
            hearing: 1.0,
            aggression: 0.5,
            intelligence: 0.5,
            health: 100,
            satisfaction: 1.0,
            replenish_rate: 0.5,
            depletion_rate: 0.1,
            scream_chance: 1.0,
            scream_radius: 20.0,
            scream_duration: 2.0,
            scream_height: 1.6,
            sensor_radius: 10.0,
            sensor_height: 1.6,
            stopping_distance: 1.0,
            upper_body_threshold: 30,
            limp_threshold: 30,
            crawl_threshold: 90,
        }
    }
}

impl ZombieProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("fov", self.fov, 10.0, 360.0)?;
        check_unit("sight", self.sight)?;
        check_unit("hearing", self.hearing)?;
        check_unit("aggression", self.aggression)?;
        check_unit("intelligence", self.intelligence)?;
        check_range("health", self.health as f32, 0.0, 100.0)?;
        check_unit("satisfaction", self.satisfaction)?;
        check_range("replenish_rate", self.replenish_rate, 0.0, f32::MAX)?;
        check_range("depletion_rate", self.depletion_rate, 0.0, f32::MAX)?;
        check_unit("scream_chance", self.scream_chance)?;
        check_range("scream_radius", self.scream_radius, 0.0, f32::MAX)?;
        check_positive("scream_duration", self.scream_duration)?;
        check_positive("sensor_radius", self.sensor_radius)?;
        check_range("stopping_distance", self.stopping_distance, 0.0, 15.0)?;
        check_range("limp_threshold", self.limp_threshold as f32, 0.0, self.crawl_threshold as f32)?;
        Ok(())
    }

    /// Зажимает все значения в допустимые диапазоны
    pub fn clamped(&self) -> Self {
        let crawl_threshold = self.crawl_threshold.max(0);
        Self {
            fov: clamp_or(self.fov, 10.0, 360.0, 50.0),
            sight: clamp_or(self.sight, 0.0, 1.0, 0.5),
            hearing: clamp_or(self.hearing, 0.0, 1.0, 1.0),
            aggression: clamp_or(self.aggression, 0.0, 1.0, 0.5),
            intelligence: clamp_or(self.intelligence, 0.0, 1.0, 0.5),
            health: self.health.clamp(0, 100),
            satisfaction: clamp_or(self.satisfaction, 0.0, 1.0, 1.0),
            replenish_rate: clamp_or(self.replenish_rate, 0.0, f32::MAX, 0.5),
            depletion_rate: clamp_or(self.depletion_rate, 0.0, f32::MAX, 0.1),
            scream_chance: clamp_or(self.scream_chance, 0.0, 1.0, 1.0),
            scream_radius: clamp_or(self.scream_radius, 0.0, f32::MAX, 20.0),
            scream_duration: clamp_or(self.scream_duration, 0.01, f32::MAX, 2.0),
            scream_height: self.scream_height,
            sensor_radius: clamp_or(self.sensor_radius, 0.01, f32::MAX, 10.0),
            sensor_height: self.sensor_height,
            stopping_distance: clamp_or(self.stopping_distance, 0.0, 15.0, 1.0),
            upper_body_threshold: self.upper_body_threshold,
            limp_threshold: self.limp_threshold.clamp(0, crawl_threshold),
            crawl_threshold,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Component: зомби-агент (profile + runtime)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Zombie {
    pub profile: ZombieProfile,

    pub health: i32,
    pub satisfaction: f32,
    pub upper_body_damage: i32,
    pub lower_body_damage: i32,

    /// Скорость локомоции (animator "speed")
    pub speed: f32,
    /// Turn bias: -1 / 0 / 1
    pub seeking: i32,
    /// Attack-type token (0 = не атакует)
    pub attack_type: i32,
    pub feeding: bool,

    pub is_screaming: bool,
    pub cinematic_enabled: bool,

    root_position_refs: i32,
    root_rotation_refs: i32,
}

impl Default for Zombie {
    fn default() -> Self {
        Self::new(ZombieProfile::default())
    }
}

impl Zombie {
    /// Создание из профиля. Невалидный профиль логируется и зажимается.
    pub fn new(profile: ZombieProfile) -> Self {
        let profile = match profile.validate() {
            Ok(()) => profile,
            Err(err) => {
                crate::logger::log_error(&format!("❌ Invalid zombie profile: {} → clamping", err));
                profile.clamped()
            }
        };

        Self {
            health: profile.health,
            satisfaction: profile.satisfaction,
            profile,
            upper_body_damage: 0,
            lower_body_damage: 0,
            speed: 0.0,
            seeking: 0,
            attack_type: 0,
            feeding: false,
            is_screaming: false,
            cinematic_enabled: false,
            root_position_refs: 0,
            root_rotation_refs: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_crawling(&self) -> bool {
        self.lower_body_damage >= self.profile.crawl_threshold
    }

    /// Хромает (lower body layer активен)
    pub fn is_limping(&self) -> bool {
        self.lower_body_damage > self.profile.limp_threshold && self.lower_body_damage < self.profile.crawl_threshold
    }

    /// Upper body damage layer активен
    pub fn upper_body_impaired(&self) -> bool {
        self.upper_body_damage > self.profile.upper_body_threshold && !self.is_crawling()
    }

    /// Refcount-запрос root motion (+1 на входе анимации, -1 на выходе)
    pub fn add_root_motion_request(&mut self, position: i32, rotation: i32) {
        self.root_position_refs += position;
        self.root_rotation_refs += rotation;
    }

    pub fn use_root_position(&self) -> bool {
        self.root_position_refs > 0
    }

    pub fn use_root_rotation(&self) -> bool {
        self.root_rotation_refs > 0
    }

    /// Голод растёт с движением: depletion × dt / 100 × speed³
    pub fn deplete_satisfaction(&mut self, delta: f32) {
        let drain = self.profile.depletion_rate * delta / 100.0 * self.speed.powi(3);
        self.satisfaction = (self.satisfaction - drain).max(0.0);
    }

    /// Насыщение во время еды: dt × replenish / 100
    pub fn replenish_satisfaction(&mut self, delta: f32) {
        self.satisfaction = (self.satisfaction + delta * self.profile.replenish_rate / 100.0).min(1.0);
    }
}
