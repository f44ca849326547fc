//! Sense phase: отложенные задачи, pre-pass восприятия, relay событий хоста.
//!
//! Порядок внутри тика важен: pre-pass сбрасывает угрозы ДО того, как
//! sensor events этого тика заново их утвердят.

use bevy::prelude::*;

use crate::ai::agent::{zombie_context, AgentServices, ZombieAgent};
use crate::ai::components::{Senses, TriggerEventKind};
use crate::ai::events::{AnimationNotify, MeleeZoneEvent, SensorEvent, TargetTriggerEvent};
use crate::ai::registry::ColliderRegistry;
use crate::ai::scheduler::{DeferredTasks, TaskPayload};
use crate::ai::services::{AnimationSignal, AudioBackend};
use crate::combat::Dead;
use crate::components::Zombie;
use crate::ragdoll::{BoneControlMode, ReanimationDue};

/// Система: исполнение созревших отложенных задач
///
/// Reanimate → ReanimationDue (дальше забирает ragdoll),
/// ScreamCooldownEnd → зомби снова может кричать, Sound → audio backend.
pub fn run_deferred_tasks(
    time: Res<Time<Fixed>>,
    mut tasks: ResMut<DeferredTasks>,
    mut zombies: Query<&mut Zombie>,
    mut audio: Option<ResMut<AudioBackend>>,
    mut reanimations: EventWriter<ReanimationDue>,
) {
    let now = time.elapsed_secs();

    for task in tasks.take_due(now) {
        match task.payload {
            TaskPayload::Reanimate => {
                reanimations.write(ReanimationDue { agent: task.agent });
            }
            TaskPayload::ScreamCooldownEnd => {
                if let Ok(mut zombie) = zombies.get_mut(task.agent) {
                    zombie.is_screaming = false;
                }
            }
            TaskPayload::Sound(request) => match audio.as_deref_mut() {
                Some(backend) => {
                    backend.play_one_shot(request);
                }
                None => {
                    crate::logger::log_warning(&format!(
                        "⚠️ Delayed sound '{}' dropped: no AudioBackend",
                        request.clip
                    ));
                }
            },
        }
    }
}

/// Система: pre-pass восприятия + ленивый старт машин
///
/// Угрозы сбрасываются, distance цели пересчитывается. Машины стартуют
/// только в Animated режиме (ragdoll-агентов стартует реанимация).
pub fn prepare_agents(mut agents: Query<ZombieAgent, Without<Dead>>, mut services: AgentServices) {
    for mut agent in agents.iter_mut() {
        let position = agent.transform.translation;
        agent.senses.begin_tick(position);

        if agent.ragdoll.mode != BoneControlMode::Animated || agent.brain.machine.is_started() {
            continue;
        }

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        machine.start(&mut ctx);
        crate::logger::log(&format!(
            "🧟 Zombie {:?} started in {:?}",
            ctx.entity,
            machine.current_type()
        ));
    }
}

/// Система: сенсор → классификатор активного состояния
pub fn relay_sensor_events(
    mut events: EventReader<SensorEvent>,
    mut agents: Query<ZombieAgent, Without<Dead>>,
    mut services: AgentServices,
) {
    for event in events.read() {
        let Ok(mut agent) = agents.get_mut(event.agent) else {
            continue;
        };
        if agent.ragdoll.mode != BoneControlMode::Animated {
            continue;
        }

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        machine.trigger_event(&mut ctx, event.kind, &event.contact);
    }
}

/// Система: arrival volume цели
///
/// Enter/Stay утверждают `target_reached` на этот тик, Enter/Exit
/// дополнительно уведомляют состояние.
pub fn relay_target_triggers(
    mut events: EventReader<TargetTriggerEvent>,
    mut agents: Query<ZombieAgent, Without<Dead>>,
    mut services: AgentServices,
) {
    for event in events.read() {
        let Ok(mut agent) = agents.get_mut(event.agent) else {
            continue;
        };
        if agent.ragdoll.mode != BoneControlMode::Animated {
            continue;
        }

        agent.senses.target_reached = event.kind != TriggerEventKind::Exit;

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        match event.kind {
            TriggerEventKind::Enter => machine.destination_reached(&mut ctx, true),
            TriggerEventKind::Exit => machine.destination_reached(&mut ctx, false),
            TriggerEventKind::Stay => {}
        }
    }
}

/// Система: melee zone → `in_melee_range` владельца коллайдера
pub fn relay_melee_zone(
    mut events: EventReader<MeleeZoneEvent>,
    registry: Res<ColliderRegistry>,
    mut senses: Query<&mut Senses>,
) {
    for event in events.read() {
        let Some(agent) = registry.agent_of(event.collider) else {
            continue;
        };
        let Ok(mut agent_senses) = senses.get_mut(agent) else {
            continue;
        };

        match event.kind {
            TriggerEventKind::Enter => agent_senses.in_melee_range = true,
            TriggerEventKind::Exit => agent_senses.in_melee_range = false,
            TriggerEventKind::Stay => {}
        }
    }
}

/// Система: уведомления анимации (root motion refcount, cinematic lock)
pub fn relay_animation_notify(mut events: EventReader<AnimationNotify>, mut zombies: Query<&mut Zombie>) {
    for event in events.read() {
        let Ok(mut zombie) = zombies.get_mut(event.agent) else {
            continue;
        };

        match event.signal {
            AnimationSignal::RootMotion { position, rotation } => {
                zombie.add_root_motion_request(position, rotation);
            }
            AnimationSignal::Cinematic(enabled) => {
                zombie.cinematic_enabled = enabled;
            }
        }
    }
}
