//! Collider → Agent registry
//!
//! Заполняется при спавне агента (main collider + все body parts), дальше
//! только читается: LOS self-exclusion, melee zone, роутинг урона.
//! Удаление записей при деспавне агента: забота интеграции.

use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Resource, Debug, Default)]
pub struct ColliderRegistry {
    owners: HashMap<Entity, Entity>,
}

impl ColliderRegistry {
    /// Регистрирует коллайдер/rigid body. Повторная регистрация перезаписывает владельца.
    pub fn register(&mut self, body: Entity, agent: Entity) {
        if let Some(previous) = self.owners.insert(body, agent) {
            if previous != agent {
                crate::logger::log_warning(&format!(
                    "ColliderRegistry: {:?} moved from agent {:?} to {:?}",
                    body, previous, agent
                ));
            }
        }
    }

    pub fn unregister(&mut self, body: Entity) -> Option<Entity> {
        self.owners.remove(&body)
    }

    pub fn agent_of(&self, body: Entity) -> Option<Entity> {
        self.owners.get(&body).copied()
    }

    /// Коллайдер принадлежит этому агенту
    pub fn belongs_to(&self, body: Entity, agent: Entity) -> bool {
        self.agent_of(body) == Some(agent)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
