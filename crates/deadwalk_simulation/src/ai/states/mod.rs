//! Поведенческие состояния зомби
//!
//! Каждое состояние: отдельный объект на агента (таймеры внутри),
//! общая логика восприятия вынесена в `ai::perception`.

pub mod alerted;
pub mod attack;
pub mod config;
pub mod feeding;
pub mod idle;
pub mod patrol;
pub mod pursuit;


pub use alerted::AlertedState;
pub use attack::AttackState;
pub use config::*;
pub use feeding::FeedingState;
pub use idle::IdleState;
pub use patrol::PatrolState;
pub use pursuit::PursuitState;

use super::components::StateMachine;
use super::context::ZombieMachine;

/// Регистрирует все шесть состояний зомби
pub fn register_zombie_states(machine: &mut StateMachine<ZombieMachine>, config: &ZombieBehaviorConfig) {
    if let Err(err) = config.validate() {
        crate::logger::log_warning(&format!("⚠️ Zombie behavior config: {}", err));
    }

    machine.register_state(Box::new(IdleState::new(config.idle.clone())));
    machine.register_state(Box::new(AlertedState::new(config.alerted.clone())));
    machine.register_state(Box::new(PatrolState::new(config.patrol.clone())));
    machine.register_state(Box::new(PursuitState::new(config.pursuit.clone())));
    machine.register_state(Box::new(AttackState::new(config.attack.clone())));
    machine.register_state(Box::new(FeedingState::new(config.feeding.clone())));
}
