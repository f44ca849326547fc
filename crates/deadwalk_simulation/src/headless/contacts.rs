//! Headless trigger detection: overlap тестами вместо физического движка.
//!
//! Каждый тик сравнивает текущие пересечения с прошлым тиком и пишет
//! Enter (новое), Stay (продолжается), Exit (пропало) события:
//! - сенсор зомби ↔ enabled Stimulus → SensorEvent
//! - агент ↔ arrival volume своей цели → TargetTriggerEvent
//! - MeleeZone ↔ коллайдеры зомби → MeleeZoneEvent

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;
use std::collections::HashSet;

use super::physics::HeadlessCollider;
use crate::ai::components::{Senses, TriggerEventKind};
use crate::ai::events::{MeleeZoneEvent, SensorEvent, TargetTriggerEvent};
use crate::ai::geometry::flatten;
use crate::ai::registry::ColliderRegistry;
use crate::combat::Dead;
use crate::components::{MeleeZone, SensorContact, Stimulus, Zombie};

/// Пары, пересекавшиеся на прошлом тике
#[derive(Resource, Debug, Default)]
pub struct ContactTracker {
    sensors: HashSet<(Entity, Entity)>,
    arrivals: HashSet<Entity>,
    melee: HashSet<(Entity, Entity)>,
}

impl ContactTracker {
    pub fn sensor_contacts(&self) -> usize {
        self.sensors.len()
    }
}

/// Enter для новых ключей, Stay для старых. Возвращает исчезнувшие ключи (Exit).
fn diff<K: Copy + Eq + std::hash::Hash + Ord>(
    previous: &mut HashSet<K>,
    current: HashSet<K>,
) -> (Vec<(K, TriggerEventKind)>, Vec<K>) {
    let mut events: Vec<(K, TriggerEventKind)> = current
        .iter()
        .map(|key| {
            let kind = if previous.contains(key) {
                TriggerEventKind::Stay
            } else {
                TriggerEventKind::Enter
            };
            (*key, kind)
        })
        .collect();
    let mut exits: Vec<K> = previous.difference(&current).copied().collect();

    // HashSet без порядка: сортируем ради детерминизма
    events.sort_by_key(|(key, _)| *key);
    exits.sort();

    *previous = current;
    (events, exits)
}

/// Центр сенсора зомби (на высоте глаз)
pub fn sensor_center(zombie: &Zombie, transform: &Transform) -> Vec3 {
    transform.translation + Vec3::Y * zombie.profile.sensor_height
}

/// Система: сенсоры зомби ↔ stimulus volumes
pub fn detect_sensor_contacts(
    mut tracker: ResMut<ContactTracker>,
    agents: Query<(Entity, &Zombie, &Transform), Without<Dead>>,
    stimuli: Query<(Entity, &Stimulus, &Transform)>,
    mut events: EventWriter<SensorEvent>,
) {
    let mut current = HashSet::new();

    for (agent, zombie, transform) in agents.iter() {
        let center = sensor_center(zombie, transform);
        for (collider, stimulus, stimulus_transform) in stimuli.iter() {
            if !stimulus.enabled {
                continue;
            }
            let reach = zombie.profile.sensor_radius + stimulus.extent(stimulus_transform.scale);
            if center.distance(stimulus_transform.translation) <= reach {
                current.insert((agent, collider));
            }
        }
    }

    let (overlaps, exits) = diff(&mut tracker.sensors, current);

    for ((agent, collider), kind) in overlaps {
        if let Ok((_, stimulus, transform)) = stimuli.get(collider) {
            events.write(SensorEvent {
                agent,
                kind,
                contact: SensorContact::new(collider, stimulus.tag, transform, stimulus.shape),
            });
        }
    }

    // Exit только для живых stimulus: деспавн молча рвёт контакт
    for (agent, collider) in exits {
        if let Ok((_, stimulus, transform)) = stimuli.get(collider) {
            events.write(SensorEvent {
                agent,
                kind: TriggerEventKind::Exit,
                contact: SensorContact::new(collider, stimulus.tag, transform, stimulus.shape),
            });
        }
    }
}

/// Система: агент ↔ arrival volume его цели
///
/// Снятый trigger (цель очищена) Exit не даёт, как выключенный коллайдер.
pub fn detect_target_triggers(
    mut tracker: ResMut<ContactTracker>,
    agents: Query<(Entity, &Senses, &Transform), Without<Dead>>,
    mut events: EventWriter<TargetTriggerEvent>,
) {
    let mut current = HashSet::new();
    let mut alive = HashSet::new();

    for (agent, senses, transform) in agents.iter() {
        let Some(trigger) = senses.target_trigger() else {
            continue;
        };
        alive.insert(agent);
        // Цель может висеть над полом (игрок): сравниваем по горизонтали
        if flatten(transform.translation - trigger.center).length() <= trigger.radius {
            current.insert(agent);
        }
    }

    let (overlaps, exits) = diff(&mut tracker.arrivals, current);

    for (agent, kind) in overlaps {
        events.write(TargetTriggerEvent { agent, kind });
    }
    for agent in exits.into_iter().filter(|agent| alive.contains(agent)) {
        events.write(TargetTriggerEvent {
            agent,
            kind: TriggerEventKind::Exit,
        });
    }
}

/// Система: melee zone ↔ коллайдеры агентов из registry
pub fn detect_melee_contacts(
    mut tracker: ResMut<ContactTracker>,
    registry: Res<ColliderRegistry>,
    zones: Query<(Entity, &MeleeZone, &Transform)>,
    colliders: Query<(Entity, &HeadlessCollider, &Transform), Without<ColliderDisabled>>,
    mut events: EventWriter<MeleeZoneEvent>,
) {
    let mut current = HashSet::new();

    for (zone, melee, zone_transform) in zones.iter() {
        for (collider, shape, transform) in colliders.iter() {
            if !shape.enabled || registry.agent_of(collider).is_none() {
                continue;
            }
            let reach = melee.radius + shape.radius * transform.scale.max_element();
            if zone_transform.translation.distance(transform.translation) <= reach {
                current.insert((zone, collider));
            }
        }
    }

    let (overlaps, exits) = diff(&mut tracker.melee, current);

    for ((_, collider), kind) in overlaps {
        events.write(MeleeZoneEvent { collider, kind });
    }
    for (_, collider) in exits {
        events.write(MeleeZoneEvent {
            collider,
            kind: TriggerEventKind::Exit,
        });
    }
}
