//! Headless navigation agent: прямолинейный путь по плоскому полу.
//!
//! Путь никогда не pending. Агент двигается только скоростью, выставленной
//! на этот тик (root motion → `set_velocity`), после шага скорость сбрасывается.

use bevy::prelude::*;

use crate::ai::geometry::flatten;
use crate::ai::services::{NavigationAgent, PathStatus};

/// Ближе этого к destination: пути больше нет
const ARRIVAL_EPSILON: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct HeadlessNavAgent {
    position: Vec3,
    destination: Option<Vec3>,
    velocity: Vec3,
    /// Модуль desired velocity
    pub max_speed: f32,
    stopped: bool,
    update_position: bool,
    update_rotation: bool,
    enabled: bool,
    stale: bool,
    status: PathStatus,
    ground_height: f32,
    /// Проходимая область (min, max по XZ)
    bounds: Option<(Vec2, Vec2)>,
}

impl HeadlessNavAgent {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            destination: None,
            velocity: Vec3::ZERO,
            max_speed: 1.0,
            stopped: false,
            update_position: true,
            update_rotation: false,
            enabled: true,
            stale: false,
            status: PathStatus::Complete,
            ground_height: position.y,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, min: Vec2, max: Vec2) -> Self {
        self.bounds = Some((min, max));
        self
    }

    pub fn with_path_status(mut self, status: PathStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_stale_path(mut self, stale: bool) -> Self {
        self.stale = stale;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn in_bounds(&self, point: Vec3) -> bool {
        match self.bounds {
            Some((min, max)) => point.x >= min.x && point.x <= max.x && point.z >= min.y && point.z <= max.y,
            None => true,
        }
    }
}

impl NavigationAgent for HeadlessNavAgent {
    fn set_destination(&mut self, target: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        self.destination = Some(target);
        self.stale = false;
        self.status = if self.in_bounds(target) {
            PathStatus::Complete
        } else {
            PathStatus::Partial
        };
        true
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn has_path(&self) -> bool {
        self.enabled
            && self
                .destination
                .is_some_and(|destination| flatten(destination - self.position).length() > ARRIVAL_EPSILON)
    }

    fn is_path_stale(&self) -> bool {
        self.stale
    }

    fn path_status(&self) -> PathStatus {
        self.status
    }

    fn steering_target(&self) -> Vec3 {
        self.destination.unwrap_or(self.position)
    }

    fn desired_velocity(&self) -> Vec3 {
        if self.stopped || !self.has_path() {
            return Vec3::ZERO;
        }
        flatten(self.steering_target() - self.position).normalize_or_zero() * self.max_speed
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_update_position(&mut self, enabled: bool) {
        self.update_position = enabled;
    }

    fn set_update_rotation(&mut self, enabled: bool) {
        self.update_rotation = enabled;
    }

    fn updates_position(&self) -> bool {
        self.update_position
    }

    fn updates_rotation(&self) -> bool {
        self.update_rotation
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.velocity = Vec3::ZERO;
        }
    }

    fn base_offset(&self) -> f32 {
        0.0
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        if !self.in_bounds(point) || (point.y - self.ground_height).abs() > max_distance {
            return None;
        }
        Some(Vec3::new(point.x, self.ground_height, point.z))
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }

    fn step(&mut self, from: Vec3, delta: f32) -> Option<Vec3> {
        self.position = from;
        let velocity = std::mem::take(&mut self.velocity);

        if !self.enabled || self.stopped || !self.update_position {
            return None;
        }

        let next = from + flatten(velocity) * delta;
        if !self.in_bounds(next) {
            return None;
        }

        self.position = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_until_arrival() {
        let mut nav = HeadlessNavAgent::new(Vec3::ZERO);
        assert!(!nav.has_path());

        nav.set_destination(Vec3::new(0.0, 0.0, -2.0));
        assert!(nav.has_path());
        assert_eq!(nav.desired_velocity(), Vec3::NEG_Z);

        nav.step(Vec3::new(0.0, 0.0, -1.98), 0.0);
        assert!(!nav.has_path());
        assert_eq!(nav.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_velocity_is_consumed_by_step() {
        let mut nav = HeadlessNavAgent::new(Vec3::ZERO);
        nav.set_velocity(Vec3::new(0.0, 0.0, -1.5));

        let moved = nav.step(Vec3::ZERO, 0.5);
        assert_eq!(moved, Some(Vec3::new(0.0, 0.0, -0.75)));

        // Без нового set_velocity агент стоит
        assert_eq!(nav.step(Vec3::new(0.0, 0.0, -0.75), 0.5), Some(Vec3::new(0.0, 0.0, -0.75)));
    }

    #[test]
    fn test_stopped_or_disabled_does_not_move() {
        let mut nav = HeadlessNavAgent::new(Vec3::ZERO);
        nav.set_stopped(true);
        nav.set_velocity(Vec3::X);
        assert_eq!(nav.step(Vec3::ZERO, 1.0), None);

        nav.set_stopped(false);
        nav.set_enabled(false);
        nav.set_velocity(Vec3::X);
        assert_eq!(nav.step(Vec3::ZERO, 1.0), None);
        assert!(!nav.set_destination(Vec3::X));
    }

    #[test]
    fn test_sample_position_respects_bounds() {
        let nav = HeadlessNavAgent::new(Vec3::ZERO).with_bounds(Vec2::splat(-5.0), Vec2::splat(5.0));

        assert_eq!(nav.sample_position(Vec3::new(1.0, 0.7, 2.0), 25.0), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(nav.sample_position(Vec3::new(9.0, 0.0, 0.0), 25.0), None);
    }

    #[test]
    fn test_out_of_bounds_destination_is_partial() {
        let mut nav = HeadlessNavAgent::new(Vec3::ZERO).with_bounds(Vec2::splat(-5.0), Vec2::splat(5.0));
        nav.set_destination(Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(nav.path_status(), PathStatus::Partial);
    }
}
