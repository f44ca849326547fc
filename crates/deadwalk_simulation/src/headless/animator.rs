//! Headless animator: параметры, слои, простой граф состояний, скелет.
//!
//! Скелет: rest pose относительно root transform'а агента. Override'ы
//! костей (ragdoll, blend) живут до следующего `advance`; у выключенного
//! аниматора override'ы сохраняются (скелет висит на ragdoll'е).

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::ai::context::anim;
use crate::ai::services::{AnimationSignal, Animator};
use crate::components::{BonePose, HumanBone};

pub const BASE_LAYER: &str = "Base Layer";

pub const STATE_IDLE: &str = "Idle";
pub const STATE_LOCOMOTION: &str = "Locomotion";
pub const STATE_TURN: &str = "Turn";
pub const STATE_ATTACK: &str = "Attack";
pub const STATE_HIT: &str = "Hit Reaction";
pub const STATE_REANIMATE_FROM_BACK: &str = "Reanimate From Back";
pub const STATE_REANIMATE_FROM_FRONT: &str = "Reanimate From Front";
pub const STATE_FEEDING: &str = "Feeding State";
pub const STATE_SCREAM: &str = "Scream";

const HIT_DURATION: f32 = 0.4;
const REANIMATE_DURATION: f32 = 1.5;
const SCREAM_DURATION: f32 = 2.0;

#[derive(Debug, Clone)]
struct AnimatorLayer {
    name: &'static str,
    weight: f32,
    state: Option<&'static str>,
    /// Оставшееся время "одноразового" состояния
    timer: f32,
}

impl AnimatorLayer {
    fn new(name: &'static str, weight: f32) -> Self {
        Self {
            name,
            weight,
            state: None,
            timer: 0.0,
        }
    }
}

/// Rest pose гуманоида (root в ногах, forward = -Z)
pub fn default_rest_pose() -> HashMap<HumanBone, BonePose> {
    let pose = |x: f32, y: f32| BonePose::new(Vec3::new(x, y, 0.0), Quat::IDENTITY);

    HashMap::from([
        (HumanBone::Hips, pose(0.0, 1.0)),
        (HumanBone::Spine, pose(0.0, 1.15)),
        (HumanBone::Chest, pose(0.0, 1.35)),
        (HumanBone::Head, pose(0.0, 1.65)),
        (HumanBone::LeftUpperArm, pose(-0.2, 1.45)),
        (HumanBone::LeftLowerArm, pose(-0.45, 1.45)),
        (HumanBone::RightUpperArm, pose(0.2, 1.45)),
        (HumanBone::RightLowerArm, pose(0.45, 1.45)),
        (HumanBone::LeftUpperLeg, pose(-0.12, 0.9)),
        (HumanBone::LeftLowerLeg, pose(-0.12, 0.5)),
        (HumanBone::LeftFoot, pose(-0.12, 0.05)),
        (HumanBone::RightUpperLeg, pose(0.12, 0.9)),
        (HumanBone::RightLowerLeg, pose(0.12, 0.5)),
        (HumanBone::RightFoot, pose(0.12, 0.05)),
    ])
}

/// Rest pose, уложенная на землю вокруг бёдер (на спину или лицом вниз)
fn lying_pose(local: BonePose, on_back: bool) -> BonePose {
    let pivot = Vec3::new(0.0, 1.0, 0.0);
    let grounded_hips = Vec3::new(0.0, 0.15, 0.0);
    let angle = if on_back { 90.0_f32 } else { -90.0_f32 };
    let rotation = Quat::from_rotation_x(angle.to_radians());

    BonePose::new(
        grounded_hips + rotation * (local.position - pivot),
        rotation * local.rotation,
    )
}

#[derive(Debug, Clone)]
pub struct HeadlessAnimator {
    enabled: bool,
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    integers: HashMap<String, i32>,
    triggers: HashSet<String>,
    layers: Vec<AnimatorLayer>,
    root: Transform,
    root_delta: Vec3,
    rest_pose: HashMap<HumanBone, BonePose>,
    overrides: HashMap<HumanBone, BonePose>,
    look_at: Option<(Vec3, f32)>,
    root_motion_active: bool,
}

impl Default for HeadlessAnimator {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl HeadlessAnimator {
    pub fn new(root: Transform) -> Self {
        Self {
            enabled: true,
            floats: HashMap::new(),
            bools: HashMap::new(),
            integers: HashMap::new(),
            triggers: HashSet::new(),
            layers: vec![
                AnimatorLayer::new(BASE_LAYER, 1.0),
                AnimatorLayer::new(anim::CINEMATIC_LAYER, 0.0),
                AnimatorLayer::new(anim::LOWER_BODY_LAYER, 0.0),
                AnimatorLayer::new(anim::UPPER_BODY_LAYER, 0.0),
            ],
            root,
            root_delta: Vec3::ZERO,
            rest_pose: default_rest_pose(),
            overrides: HashMap::new(),
            look_at: None,
            root_motion_active: false,
        }
    }

    fn layer_mut(&mut self, name: &str) -> Option<&mut AnimatorLayer> {
        self.layers.iter_mut().find(|layer| layer.name == name)
    }

    /// Базовое состояние по параметрам (если не идёт одноразовое)
    fn locomotion_state(&self) -> &'static str {
        if self.get_integer(anim::ATTACK) > 0 {
            STATE_ATTACK
        } else if self.get_float(anim::SPEED) > 0.01 {
            STATE_LOCOMOTION
        } else if self.get_integer(anim::SEEKING) != 0 {
            STATE_TURN
        } else {
            STATE_IDLE
        }
    }

    /// (на спине?, прогресс 0..1), пока base layer играет подъём
    fn getting_up(&self) -> Option<(bool, f32)> {
        let base = self.layers.first()?;
        let on_back = match base.state {
            Some(STATE_REANIMATE_FROM_BACK) => true,
            Some(STATE_REANIMATE_FROM_FRONT) => false,
            _ => return None,
        };
        Some((on_back, (1.0 - base.timer / REANIMATE_DURATION).clamp(0.0, 1.0)))
    }

    fn consume_trigger(&mut self, name: &str) -> bool {
        self.triggers.remove(name)
    }

    fn play(&mut self, layer: &str, state: &'static str, duration: f32) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.state = Some(state);
            layer.timer = duration;
        }
    }
}

impl Animator for HeadlessAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_string(), value);
    }

    fn get_float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    /// Для trigger-параметров: true, пока trigger не потреблён
    fn get_bool(&self, name: &str) -> bool {
        self.triggers.contains(name) || self.bools.get(name).copied().unwrap_or(false)
    }

    fn set_integer(&mut self, name: &str, value: i32) {
        self.integers.insert(name.to_string(), value);
    }

    fn get_integer(&self, name: &str) -> i32 {
        self.integers.get(name).copied().unwrap_or(0)
    }

    fn set_trigger(&mut self, name: &str) {
        self.triggers.insert(name.to_string());
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name == name)
    }

    fn layer_weight(&self, layer: usize) -> f32 {
        self.layers.get(layer).map(|layer| layer.weight).unwrap_or(0.0)
    }

    fn set_layer_weight(&mut self, layer: usize, weight: f32) {
        if let Some(layer) = self.layers.get_mut(layer) {
            layer.weight = weight.clamp(0.0, 1.0);
        }
    }

    fn current_state(&self, layer: usize) -> Option<&str> {
        self.layers.get(layer).and_then(|layer| layer.state)
    }

    fn root_delta_position(&self) -> Vec3 {
        self.root_delta
    }

    fn root_rotation(&self) -> Quat {
        self.root.rotation
    }

    fn bone_world_pose(&self, bone: HumanBone) -> Option<BonePose> {
        if let Some(pose) = self.overrides.get(&bone) {
            return Some(*pose);
        }
        let mut local = *self.rest_pose.get(&bone)?;

        // Подъём: от лежачей позы к rest pose за время состояния
        if let Some((on_back, progress)) = self.getting_up() {
            let lying = lying_pose(local, on_back);
            local = BonePose::new(
                lying.position.lerp(local.position, progress),
                lying.rotation.slerp(local.rotation, progress),
            );
        }

        Some(BonePose::new(
            self.root.transform_point(local.position),
            self.root.rotation * local.rotation,
        ))
    }

    fn set_bone_world_pose(&mut self, bone: HumanBone, pose: BonePose) {
        self.overrides.insert(bone, pose);
    }

    fn set_look_at(&mut self, position: Vec3, weight: f32) {
        self.look_at = Some((position, weight));
    }

    fn look_at(&self) -> Option<(Vec3, f32)> {
        self.look_at
    }

    fn advance(&mut self, root: &Transform, delta: f32) -> Vec<AnimationSignal> {
        let mut signals = Vec::new();
        if !self.enabled {
            self.root_delta = Vec3::ZERO;
            return signals;
        }

        self.root = *root;
        self.overrides.clear();

        // Одноразовые состояния из триггеров
        if self.consume_trigger(anim::REANIMATE_FROM_BACK) {
            self.play(BASE_LAYER, STATE_REANIMATE_FROM_BACK, REANIMATE_DURATION);
        } else if self.consume_trigger(anim::REANIMATE_FROM_FRONT) {
            self.play(BASE_LAYER, STATE_REANIMATE_FROM_FRONT, REANIMATE_DURATION);
        } else if self.consume_trigger(anim::HIT) {
            self.play(BASE_LAYER, STATE_HIT, HIT_DURATION);
        }

        if self.consume_trigger(anim::SCREAM) {
            self.play(anim::CINEMATIC_LAYER, STATE_SCREAM, SCREAM_DURATION);
        }

        for layer in &mut self.layers {
            if layer.timer > 0.0 {
                layer.timer -= delta;
                if layer.timer <= 0.0 {
                    layer.state = None;
                }
            }
        }

        // Base layer: одноразовое состояние или locomotion граф
        let base_locked = self.layers.first().is_some_and(|layer| layer.timer > 0.0);
        if !base_locked {
            let state = self.locomotion_state();
            if let Some(base) = self.layers.first_mut() {
                base.state = Some(state);
            }
        }

        // Cinematic layer: еда поверх всего, пока не идёт крик
        let feeding = self.get_bool(anim::FEEDING);
        if let Some(cinematic) = self.layer_mut(anim::CINEMATIC_LAYER) {
            if cinematic.timer <= 0.0 {
                cinematic.state = feeding.then_some(STATE_FEEDING);
            }
            cinematic.weight = if cinematic.state.is_some() { 1.0 } else { 0.0 };
        }

        // Root motion refcount: Locomotion запрашивает позицию
        let base_state = self.layers.first().and_then(|layer| layer.state);
        let locomotion = base_state == Some(STATE_LOCOMOTION);
        if locomotion != self.root_motion_active {
            self.root_motion_active = locomotion;
            let position = if locomotion { 1 } else { -1 };
            signals.push(AnimationSignal::RootMotion { position, rotation: 0 });
        }

        self.root_delta = if locomotion {
            root.forward().as_vec3() * self.get_float(anim::SPEED) * delta
        } else {
            Vec3::ZERO
        };

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locomotion_requests_root_motion_once() {
        let mut animator = HeadlessAnimator::default();
        animator.set_float(anim::SPEED, 1.0);

        let signals = animator.advance(&Transform::IDENTITY, 0.5);
        assert_eq!(signals, vec![AnimationSignal::RootMotion { position: 1, rotation: 0 }]);
        assert_eq!(animator.root_delta_position(), Vec3::new(0.0, 0.0, -0.5));

        assert!(animator.advance(&Transform::IDENTITY, 0.5).is_empty());

        animator.set_float(anim::SPEED, 0.0);
        let signals = animator.advance(&Transform::IDENTITY, 0.5);
        assert_eq!(signals, vec![AnimationSignal::RootMotion { position: -1, rotation: 0 }]);
        assert_eq!(animator.root_delta_position(), Vec3::ZERO);
    }

    #[test]
    fn test_feeding_state_on_cinematic_layer() {
        let mut animator = HeadlessAnimator::default();
        let cinematic = animator.layer_index(anim::CINEMATIC_LAYER).expect("cinematic layer");

        animator.set_bool(anim::FEEDING, true);
        animator.advance(&Transform::IDENTITY, 0.1);

        assert_eq!(animator.current_state(cinematic), Some(STATE_FEEDING));
        assert_eq!(animator.layer_weight(cinematic), 1.0);
    }

    #[test]
    fn test_trigger_visible_until_consumed() {
        let mut animator = HeadlessAnimator::default();
        animator.set_trigger(anim::HIT);
        assert!(animator.get_bool(anim::HIT));

        animator.advance(&Transform::IDENTITY, 0.1);
        assert!(!animator.get_bool(anim::HIT));
        assert_eq!(animator.current_state(0), Some(STATE_HIT));
    }

    #[test]
    fn test_bones_follow_root_and_overrides_reset() {
        let root = Transform::from_xyz(3.0, 0.0, 1.0);
        let mut animator = HeadlessAnimator::new(root);

        let hips = animator.bone_world_pose(HumanBone::Hips).expect("hips");
        assert_eq!(hips.position, Vec3::new(3.0, 1.0, 1.0));

        let lying = BonePose::new(Vec3::new(3.0, 0.2, 1.0), Quat::IDENTITY);
        animator.set_bone_world_pose(HumanBone::Hips, lying);
        assert_eq!(animator.bone_world_pose(HumanBone::Hips), Some(lying));

        animator.advance(&root, 0.1);
        assert_eq!(animator.bone_world_pose(HumanBone::Hips).map(|p| p.position), Some(Vec3::new(3.0, 1.0, 1.0)));
    }

    #[test]
    fn test_reanimation_starts_lying_and_stands_up() {
        let mut animator = HeadlessAnimator::default();
        animator.set_trigger(anim::REANIMATE_FROM_BACK);
        animator.advance(&Transform::IDENTITY, 0.01);

        assert_eq!(animator.current_state(0), Some(STATE_REANIMATE_FROM_BACK));
        let head = animator.bone_world_pose(HumanBone::Head).expect("head");
        // На спине: голова позади root'а, почти на земле
        assert!(head.position.z > 0.5);
        assert!(head.position.y < 0.3);

        for _ in 0..200 {
            animator.advance(&Transform::IDENTITY, 0.01);
        }
        assert_eq!(animator.current_state(0), Some(STATE_IDLE));
        let head = animator.bone_world_pose(HumanBone::Head).expect("head");
        assert!((head.position - Vec3::new(0.0, 1.65, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_disabled_animator_keeps_overrides() {
        let mut animator = HeadlessAnimator::default();
        let lying = BonePose::new(Vec3::new(0.0, 0.2, 0.0), Quat::IDENTITY);

        animator.set_enabled(false);
        animator.set_bone_world_pose(HumanBone::Hips, lying);
        animator.set_float(anim::SPEED, 1.0);

        assert!(animator.advance(&Transform::IDENTITY, 0.1).is_empty());
        assert_eq!(animator.bone_world_pose(HumanBone::Hips), Some(lying));
        assert_eq!(animator.root_delta_position(), Vec3::ZERO);
    }
}
