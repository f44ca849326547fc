//! Ragdoll systems: запуск реанимации, blend (Late), sync body parts.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBody};

use super::components::{BoneControlMode, Ragdoll};
use super::events::{BoneControlChanged, ReanimationDue};
use super::reanimation::{
    apply_blend, begin_reanimation, blend_ratio, facing_correction, in_transition_window, reanimated_root_position,
};
use crate::ai::agent::{zombie_context, AgentServices, ZombieAgent};
use crate::ai::components::AiStateType;
use crate::ai::services::{AnimatorHandle, NavigationAgent, PhysicsQuery};
use crate::combat::Dead;
use crate::components::{BodyPart, BonePose, HumanBone, Zombie};

/// Система: ReanimationDue → RagdollToAnim
///
/// Body parts замораживаются (kinematic), поза снимается, аниматор
/// включается с trigger'ом подъёма. Мёртвых не поднимаем.
pub fn start_reanimation(
    mut commands: Commands,
    mut events: EventReader<ReanimationDue>,
    time: Res<Time<Fixed>>,
    mut agents: Query<(&mut Ragdoll, &Zombie, Option<&mut AnimatorHandle>), Without<Dead>>,
    parts: Query<(Entity, &BodyPart)>,
    mut changes: EventWriter<BoneControlChanged>,
) {
    let now = time.elapsed_secs();

    for event in events.read() {
        let Ok((mut ragdoll, zombie, animator)) = agents.get_mut(event.agent) else {
            continue;
        };
        if ragdoll.mode != BoneControlMode::Ragdoll || !zombie.is_alive() {
            continue;
        }

        for (part, _) in parts.iter().filter(|(_, part)| part.owner == event.agent) {
            commands.entity(part).insert(RigidBody::KinematicPositionBased);
        }

        match animator {
            Some(mut animator) => {
                let trigger = begin_reanimation(&mut ragdoll, &mut **animator, now);
                crate::logger::log(&format!("🧟 Zombie {:?} reanimating ({})", event.agent, trigger));
            }
            None => {
                crate::logger::log_warning(&format!(
                    "⚠️ Zombie {:?} reanimating without animator: no pose blend",
                    event.agent
                ));
                ragdoll.snapshots.clear();
                ragdoll.mode = BoneControlMode::RagdollToAnim;
                ragdoll.ragdoll_end_time = now;
            }
        }

        changes.write(BoneControlChanged {
            agent: event.agent,
            from: BoneControlMode::Ragdoll,
            to: BoneControlMode::RagdollToAnim,
        });
    }
}

/// Система: blend ragdoll → анимация (после оценки анимации)
///
/// В окне перехода root подтягивается под бёдра ragdoll'а. Ratio 1 →
/// Animated: навигация и коллайдер возвращаются, машина сразу в Alerted.
pub fn blend_reanimation(
    mut commands: Commands,
    mut agents: Query<ZombieAgent, Without<Dead>>,
    mut services: AgentServices,
    mut changes: EventWriter<BoneControlChanged>,
) {
    let now = services.now();

    for mut agent in agents.iter_mut() {
        if agent.ragdoll.mode != BoneControlMode::RagdollToAnim {
            continue;
        }

        let entity = agent.entity;
        let end_time = agent.ragdoll.ragdoll_end_time;

        if in_transition_window(now, end_time, &agent.ragdoll.config) {
            let animated_hips = agent
                .animator
                .as_deref()
                .and_then(|animator| animator.bone_world_pose(HumanBone::Hips));

            if let Some(hips) = animated_hips {
                let physics = services.physics.as_deref().map(|backend| &**backend as &dyn PhysicsQuery);
                let nav = agent.nav.as_deref().map(|nav| &**nav as &dyn NavigationAgent);

                let position = reanimated_root_position(
                    &agent.ragdoll,
                    agent.transform.translation,
                    hips.position,
                    physics,
                    nav,
                    entity,
                    &services.registry,
                );
                agent.transform.translation = position;
            }

            let correction = agent
                .animator
                .as_deref()
                .and_then(|animator| facing_correction(&agent.ragdoll, &**animator));
            if let Some(correction) = correction {
                let rotation = agent.transform.rotation;
                agent.transform.rotation = (correction * rotation).normalize();
            }
        }

        let ratio = match agent.animator.as_deref_mut() {
            Some(animator) => apply_blend(&agent.ragdoll, &mut **animator, now),
            None => blend_ratio(now, end_time, &agent.ragdoll.config),
        };

        if ratio < 1.0 {
            continue;
        }

        agent.ragdoll.mode = BoneControlMode::Animated;
        agent.ragdoll.snapshots.clear();

        let position = agent.transform.translation;
        if let Some(nav) = agent.nav.as_deref_mut() {
            nav.set_enabled(true);
            nav.warp(position);
        }
        commands.entity(entity).remove::<ColliderDisabled>();

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        machine.force_state(AiStateType::Alerted, &mut ctx);

        crate::logger::log(&format!("🧟 Zombie {:?} back on its feet → Alerted", entity));
        changes.write(BoneControlChanged {
            agent: entity,
            from: BoneControlMode::RagdollToAnim,
            to: BoneControlMode::Animated,
        });
    }
}

/// Система: body parts ↔ скелет
///
/// Ragdoll: скелет следует за body parts. Animated / RagdollToAnim:
/// body parts (kinematic) следуют за скелетом.
pub fn sync_body_parts(
    mut agents: Query<(&Ragdoll, &mut AnimatorHandle), With<Zombie>>,
    mut parts: Query<(&BodyPart, &mut Transform), Without<Zombie>>,
) {
    for (part, mut transform) in parts.iter_mut() {
        let Ok((ragdoll, mut animator)) = agents.get_mut(part.owner) else {
            continue;
        };

        match ragdoll.mode {
            BoneControlMode::Ragdoll => {
                animator.set_bone_world_pose(part.bone, BonePose::from_transform(&transform));
            }
            BoneControlMode::Animated | BoneControlMode::RagdollToAnim => {
                if let Some(pose) = animator.bone_world_pose(part.bone) {
                    transform.translation = pose.position;
                    transform.rotation = pose.rotation;
                }
            }
        }
    }
}
