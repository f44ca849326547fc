//! Combat systems: запросы урона → damage model → hit reaction / ragdoll.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, ExternalImpulse, RigidBody};

use super::damage::{resolve_hit, update_damage_layers, HitInput};
use super::{DamageRequest, Dead, ZombieDied};
use crate::ai::agent::{zombie_context, AgentServices, ZombieAgent};
use crate::ai::context::anim;
use crate::ai::scheduler::{DeferredTasks, TaskPayload, TaskPurpose};
use crate::components::{BodyPart, BodyRegion, Zombie};
use crate::ragdoll::{BoneControlChanged, BoneControlMode};

/// Система: apply damage от DamageRequest событий
///
/// 1. Регион по body part (чужие/неизвестные коллайдеры → BodyRegion::None)
/// 2. resolve_hit: health / region damage + решение ragdoll
/// 3. Лёгкий удар → hit reaction в аниматор
/// 4. Ragdoll → машина приостановлена, навигация/анимация/коллайдер
///    выключены, body parts dynamic, импульс в точку попадания
/// 5. Жив → (пере)запуск отсчёта реанимации, мёртв → Dead + ZombieDied
#[allow(clippy::too_many_arguments)]
pub fn apply_damage_requests(
    mut commands: Commands,
    mut requests: EventReader<DamageRequest>,
    mut agents: Query<ZombieAgent, Without<Dead>>,
    mut services: AgentServices,
    mut tasks: ResMut<DeferredTasks>,
    parts: Query<(Entity, &BodyPart, &Transform), Without<Zombie>>,
    mut deaths: EventWriter<ZombieDied>,
    mut changes: EventWriter<BoneControlChanged>,
) {
    let now = services.now();

    for request in requests.read() {
        let Ok(mut agent) = agents.get_mut(request.agent) else {
            continue;
        };
        let entity = agent.entity;

        let hit_part = request
            .body_part
            .and_then(|part| parts.get(part).ok())
            .filter(|(_, part, _)| part.owner == entity);
        let region = hit_part.map(|(_, part, _)| part.region).unwrap_or(BodyRegion::None);

        let hit = HitInput {
            region,
            position: request.position,
            force: request.force,
            damage: request.damage,
            attacker_position: request.attacker_position,
            hit_direction: request.hit_direction,
        };
        let threshold = agent.ragdoll.config.hit_strength_threshold;
        let mode = agent.ragdoll.mode;
        let outcome = resolve_hit(&mut agent.zombie, &agent.transform, mode, &hit, threshold);

        if let Some(animator) = agent.animator.as_deref_mut() {
            update_damage_layers(&agent.zombie, &mut **animator);
        }

        crate::logger::log(&format!(
            "💥 Zombie {:?} hit: {:?} {} dmg, |force| {:.2} → health {} (ragdoll: {})",
            entity,
            region,
            request.damage,
            request.force.length(),
            agent.zombie.health,
            outcome.ragdoll
        ));

        if !outcome.ragdoll {
            if outcome.hit_type != 0 {
                if let Some(animator) = agent.animator.as_deref_mut() {
                    animator.set_integer(anim::HIT_TYPE, outcome.hit_type);
                    animator.set_trigger(anim::HIT);
                }
            }
            continue;
        }

        // Ragdoll takeover
        if mode == BoneControlMode::Animated {
            let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
            machine.suspend(&mut ctx);
        }

        agent.ragdoll.mode = BoneControlMode::Ragdoll;
        agent.ragdoll.snapshots.clear();

        if let Some(nav) = agent.nav.as_deref_mut() {
            nav.set_enabled(false);
        }
        if let Some(animator) = agent.animator.as_deref_mut() {
            animator.set_enabled(false);
        }
        commands.entity(entity).insert(ColliderDisabled);

        for (part, _, _) in parts.iter().filter(|(_, part, _)| part.owner == entity) {
            commands.entity(part).insert(RigidBody::Dynamic);
        }

        if let Some((part, _, part_transform)) = hit_part {
            if request.force.length() > agent.ragdoll.config.min_impulse {
                commands.entity(part).insert(ExternalImpulse::at_point(
                    request.force,
                    request.position,
                    part_transform.translation,
                ));
            }
        }

        if agent.zombie.is_alive() {
            let due = now + agent.ragdoll.config.reanimation_wait;
            if tasks.schedule(entity, TaskPurpose::Reanimate, due, TaskPayload::Reanimate) {
                crate::logger::log(&format!("🔁 Zombie {:?} reanimation countdown restarted", entity));
            }
        } else {
            tasks.cancel(entity, TaskPurpose::Reanimate);
            commands.entity(entity).insert(Dead);

            if outcome.died {
                crate::logger::log_info(&format!("☠️ Zombie {:?} died", entity));
                deaths.write(ZombieDied {
                    agent: entity,
                    position: agent.transform.translation,
                });
            }
        }

        if mode != BoneControlMode::Ragdoll {
            crate::logger::log(&format!("🦴 Zombie {:?}: {:?} → Ragdoll", entity, mode));
            changes.write(BoneControlChanged {
                agent: entity,
                from: mode,
                to: BoneControlMode::Ragdoll,
            });
        }
    }
}
