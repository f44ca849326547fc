//! ECS Components для DEADWALK simulation
//!
//! Организация:
//! - zombie: ZombieProfile (tuning) + Zombie (runtime)
//! - body: BodyPart, BodyRegion, HumanBone, BonePose
//! - stimulus: Stimulus, SensorContact, SoundEmitter, MeleeZone

pub mod body;
pub mod stimulus;
pub mod zombie;

#[cfg(test)]
mod zombie_tests;

pub use body::*;
pub use stimulus::*;
pub use zombie::*;
