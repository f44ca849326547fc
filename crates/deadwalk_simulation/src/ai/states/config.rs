//! Tuning поведенческих состояний зомби.

use serde::{Deserialize, Serialize};

use crate::config::{check_positive, check_range, check_span, check_unit, ConfigError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Диапазон случайного времени простоя (секунды)
    pub idle_time_min: f32,
    pub idle_time_max: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            idle_time_min: 10.0,
            idle_time_max: 60.0,
        }
    }
}

impl IdleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("idle.idle_time_min", self.idle_time_min, 0.0, f32::MAX)?;
        check_span("idle.idle_time", self.idle_time_min, self.idle_time_max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertedConfig {
    pub max_duration: f32,
    /// Угол до вейпоинта, при котором Alerted → Patrol
    pub waypoint_angle_threshold: f32,
    /// Угол до звука, при котором Alerted → Pursuit
    pub threat_angle_threshold: f32,
    /// Период пересчёта turn bias
    pub direction_change_time: f32,
    /// Поворот на месте (градусы/сек) без root rotation
    pub turn_speed: f32,
    /// Минимальный интервал между криками
    pub scream_frequency: f32,
}

impl Default for AlertedConfig {
    fn default() -> Self {
        Self {
            max_duration: 10.0,
            waypoint_angle_threshold: 90.0,
            threat_angle_threshold: 10.0,
            direction_change_time: 1.5,
            turn_speed: 45.0,
            scream_frequency: 120.0,
        }
    }
}

impl AlertedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("alerted.max_duration", self.max_duration, 1.0, 60.0)?;
        check_range("alerted.waypoint_angle_threshold", self.waypoint_angle_threshold, 0.0, 180.0)?;
        check_range("alerted.threat_angle_threshold", self.threat_angle_threshold, 0.0, 180.0)?;
        check_positive("alerted.direction_change_time", self.direction_change_time)?;
        check_range("alerted.scream_frequency", self.scream_frequency, 0.0, f32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub speed: f32,
    /// Угол до steering target, при котором разворот на месте (→ Alerted)
    pub turn_on_spot_threshold: f32,
    pub slerp_speed: f32,
    pub look_at_weight: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            turn_on_spot_threshold: 80.0,
            slerp_speed: 5.0,
            look_at_weight: 0.55,
        }
    }
}

impl PatrolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("patrol.speed", self.speed, 0.0, 3.0)?;
        check_range("patrol.turn_on_spot_threshold", self.turn_on_spot_threshold, 0.0, 180.0)?;
        check_range("patrol.slerp_speed", self.slerp_speed, 0.0, 10.0)?;
        check_unit("patrol.look_at_weight", self.look_at_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub speed: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
    pub slerp_speed: f32,
    /// Re-path cooldown = clamp(distance × multiplier, min, max)
    pub repath_distance_multiplier: f32,
    pub repath_visual_min_duration: f32,
    pub repath_visual_max_duration: f32,
    pub repath_audio_min_duration: f32,
    pub repath_audio_max_duration: f32,
    /// Максимальная длительность погони без развязки (→ Patrol)
    pub max_duration: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            look_at_weight: 0.7,
            look_at_angle_threshold: 15.0,
            slerp_speed: 5.0,
            repath_distance_multiplier: 0.035,
            repath_visual_min_duration: 0.05,
            repath_visual_max_duration: 5.0,
            repath_audio_min_duration: 0.25,
            repath_audio_max_duration: 5.0,
            max_duration: 40.0,
        }
    }
}

impl PursuitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("pursuit.speed", self.speed, 0.0, 10.0)?;
        check_unit("pursuit.look_at_weight", self.look_at_weight)?;
        check_range("pursuit.look_at_angle_threshold", self.look_at_angle_threshold, 0.0, 90.0)?;
        check_range("pursuit.slerp_speed", self.slerp_speed, 0.0, 10.0)?;
        check_range("pursuit.repath_distance_multiplier", self.repath_distance_multiplier, 0.0, 1.0)?;
        check_span(
            "pursuit.repath_visual",
            self.repath_visual_min_duration,
            self.repath_visual_max_duration,
        )?;
        check_span(
            "pursuit.repath_audio",
            self.repath_audio_min_duration,
            self.repath_audio_max_duration,
        )?;
        check_positive("pursuit.max_duration", self.max_duration)
    }

    /// Cooldown re-path для визуальной цели на дистанции `distance`
    pub fn visual_repath_cooldown(&self, distance: f32) -> f32 {
        (distance * self.repath_distance_multiplier)
            .clamp(self.repath_visual_min_duration, self.repath_visual_max_duration)
    }

    /// Cooldown re-path для звука (менее срочно → другой диапазон)
    pub fn audio_repath_cooldown(&self, distance: f32) -> f32 {
        (distance * self.repath_distance_multiplier)
            .clamp(self.repath_audio_min_duration, self.repath_audio_max_duration)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub speed: f32,
    pub stopping_distance: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            speed: 0.0,
            stopping_distance: 1.0,
            look_at_weight: 0.7,
            look_at_angle_threshold: 15.0,
            slerp_speed: 5.0,
        }
    }
}

impl AttackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("attack.speed", self.speed, 0.0, 10.0)?;
        check_range("attack.stopping_distance", self.stopping_distance, 0.0, 5.0)?;
        check_unit("attack.look_at_weight", self.look_at_weight)?;
        check_range("attack.look_at_angle_threshold", self.look_at_angle_threshold, 0.0, 90.0)?;
        check_range("attack.slerp_speed", self.slerp_speed, 0.0, 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    pub slerp_speed: f32,
    /// Слой и состояние анимации, в которых зомби реально ест
    pub feeding_layer: String,
    pub feeding_state: String,
    /// Период косметических брызг крови
    pub blood_burst_time: f32,
    pub blood_burst_amount: u32,
    /// Satisfaction, при которой еда заканчивается
    pub full_threshold: f32,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            slerp_speed: 5.0,
            feeding_layer: "Cinematic".to_string(),
            feeding_state: "Feeding State".to_string(),
            blood_burst_time: 0.1,
            blood_burst_amount: 10,
            full_threshold: 0.9,
        }
    }
}

impl FeedingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("feeding.slerp_speed", self.slerp_speed, 0.0, 10.0)?;
        check_positive("feeding.blood_burst_time", self.blood_burst_time)?;
        check_unit("feeding.full_threshold", self.full_threshold)
    }
}

/// Все state configs зомби
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieBehaviorConfig {
    pub idle: IdleConfig,
    pub alerted: AlertedConfig,
    pub patrol: PatrolConfig,
    pub pursuit: PursuitConfig,
    pub attack: AttackConfig,
    pub feeding: FeedingConfig,
}

impl ZombieBehaviorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.idle.validate()?;
        self.alerted.validate()?;
        self.patrol.validate()?;
        self.pursuit.validate()?;
        self.attack.validate()?;
        self.feeding.validate()
    }
}
