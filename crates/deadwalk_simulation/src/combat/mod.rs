//! Combat module: урон по зомби
//!
//! ECS ответственность:
//! - Damage model: head health, region damage, limp/crawl layers
//! - Решение ragdoll vs hit reaction
//! - Events: ZombieDied, маркер Dead
//!
//! Хост (оружие, hitbox'ы) пишет DamageRequest с body part, в который попали.

use bevy::prelude::*;

pub mod damage;
pub mod systems;


// Re-export основных типов
pub use damage::{hit_type, resolve_hit, update_damage_layers, HitInput, HitOutcome};

use crate::ai::{systems as ai_systems, AiSet};

/// Запрос урона от хоста
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub agent: Entity,
    /// Body part, в который попали (None → без региона)
    pub body_part: Option<Entity>,
    /// Точка попадания (мир)
    pub position: Vec3,
    pub force: Vec3,
    pub damage: i32,
    pub attacker_position: Vec3,
    /// -1 слева, 1 справа, 0: по углу
    pub hit_direction: i32,
}

/// Событие: зомби умер (health дошёл до 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZombieDied {
    pub agent: Entity,
    pub position: Vec3,
}

/// Компонент-маркер: зомби мёртв
///
/// Агент навсегда остаётся в Ragdoll, AI системы его пропускают.
/// Деспавн не автоматический: трупы остаются на месте.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Combat Plugin
///
/// apply_damage_requests работает в Think сразу после тика машин:
/// ragdoll takeover видит уже обновлённое состояние агента.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>().add_event::<ZombieDied>();

        app.add_systems(
            FixedUpdate,
            systems::apply_damage_requests
                .in_set(AiSet::Think)
                .after(ai_systems::update_state_machines)
                .before(ai_systems::apply_agent_effects),
        );
    }
}
