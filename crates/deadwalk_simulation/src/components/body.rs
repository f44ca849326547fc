//! Body parts (ragdoll rigid bodies) + humanoid skeleton ids.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Регион тела для роутинга урона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BodyRegion {
    #[default]
    None,
    Head,
    UpperBody,
    LowerBody,
}

/// Кости гуманоидного скелета, которые читает/пишет ядро
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum HumanBone {
    Hips,
    Spine,
    Chest,
    Head,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
}

impl HumanBone {
    pub const ALL: [HumanBone; 14] = [
        HumanBone::Hips,
        HumanBone::Spine,
        HumanBone::Chest,
        HumanBone::Head,
        HumanBone::LeftUpperArm,
        HumanBone::LeftLowerArm,
        HumanBone::RightUpperArm,
        HumanBone::RightLowerArm,
        HumanBone::LeftUpperLeg,
        HumanBone::LeftLowerLeg,
        HumanBone::LeftFoot,
        HumanBone::RightUpperLeg,
        HumanBone::RightLowerLeg,
        HumanBone::RightFoot,
    ];

    /// Root bone скелета (позиция блендится отдельно)
    pub fn is_root(self) -> bool {
        self == HumanBone::Hips
    }

    /// Регион по умолчанию для rigid body на этой кости
    pub fn region(self) -> BodyRegion {
        match self {
            HumanBone::Head => BodyRegion::Head,
            HumanBone::Spine
            | HumanBone::Chest
            | HumanBone::LeftUpperArm
            | HumanBone::LeftLowerArm
            | HumanBone::RightUpperArm
            | HumanBone::RightLowerArm => BodyRegion::UpperBody,
            _ => BodyRegion::LowerBody,
        }
    }
}

/// Мировая поза кости
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl BonePose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

/// Component: rigid body части тела зомби
///
/// Живёт на отдельной entity. В Animated режиме kinematic и следует за
/// анимированной костью; в Ragdoll режиме: dynamic, скелет следует за ним.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BodyPart {
    pub owner: Entity,
    pub region: BodyRegion,
    pub bone: HumanBone,
}
