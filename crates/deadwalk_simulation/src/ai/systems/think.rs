//! Think phase: тик state machine, sync аниматора, эффекты состояний.

use bevy::prelude::*;

use crate::ai::agent::{zombie_context, AgentServices, ZombieAgent};
use crate::ai::audio::ZombieSounds;
use crate::ai::events::{AgentEffect, AiStateChanged, EffectKind};
use crate::ai::scheduler::{DeferredTasks, TaskPayload, TaskPurpose};
use crate::ai::services::AudioBackend;
use crate::combat::Dead;
use crate::components::{SoundEmitter, Stimulus, Zombie};
use crate::ragdoll::BoneControlMode;
use crate::DeterministicRng;

/// Скорость затухания крика (секунды до тишины)
pub const SCREAM_DECAY_RATE: f32 = 1.0;

/// Система: OnUpdate активного состояния + переходы
///
/// После апдейта: параметры → аниматор, голод, эффекты → события.
/// Агенты вне Animated режима не думают (ими управляет ragdoll).
pub fn update_state_machines(
    mut agents: Query<ZombieAgent, Without<Dead>>,
    mut services: AgentServices,
    mut state_changes: EventWriter<AiStateChanged>,
    mut effects: EventWriter<AgentEffect>,
) {
    for mut agent in agents.iter_mut() {
        if agent.ragdoll.mode != BoneControlMode::Animated {
            continue;
        }

        let (machine, mut ctx) = zombie_context(&mut agent, &mut services);
        machine.start(&mut ctx);

        if let Some(transition) = machine.tick(&mut ctx) {
            if transition.is_fallback() {
                crate::logger::log_warning(&format!(
                    "⚠️ Zombie {:?}: {:?} → {:?} fell back to {:?}",
                    ctx.entity, transition.from, transition.requested, transition.active
                ));
            } else {
                crate::logger::log(&format!(
                    "🧠 Zombie {:?}: {:?} → {:?} (target {:?})",
                    ctx.entity,
                    transition.from,
                    transition.requested,
                    ctx.target_kind()
                ));
            }

            state_changes.write(AiStateChanged {
                agent: ctx.entity,
                from: transition.from,
                to: transition.requested,
                active: transition.active,
            });
        }

        ctx.sync_animator();
        let delta = ctx.delta;
        ctx.zombie.deplete_satisfaction(delta);

        for effect in ctx.take_effects() {
            effects.write(effect);
        }
    }
}

/// Система: исполнение эффектов состояний
///
/// Scream → burst audio-emitter stimulus + cooldown "кричит" + опциональный
/// звук. BloodBurst: косметика хоста, ядро только логирует.
#[allow(clippy::too_many_arguments)]
pub fn apply_agent_effects(
    mut commands: Commands,
    mut events: EventReader<AgentEffect>,
    time: Res<Time<Fixed>>,
    mut tasks: ResMut<DeferredTasks>,
    mut rng: ResMut<DeterministicRng>,
    mut audio: Option<ResMut<AudioBackend>>,
    zombies: Query<(&Zombie, Option<&ZombieSounds>)>,
) {
    let now = time.elapsed_secs();

    for event in events.read() {
        match event.effect {
            EffectKind::Scream { position, radius } => {
                commands.spawn((
                    Transform::from_translation(position),
                    Stimulus::sound(radius),
                    SoundEmitter::burst(radius, SCREAM_DECAY_RATE),
                ));

                let Ok((zombie, sounds)) = zombies.get(event.agent) else {
                    continue;
                };

                tasks.schedule(
                    event.agent,
                    TaskPurpose::ScreamCooldown,
                    now + zombie.profile.scream_duration,
                    TaskPayload::ScreamCooldownEnd,
                );

                let Some(sounds) = sounds else {
                    continue;
                };
                let Some(request) = sounds
                    .scream
                    .as_ref()
                    .and_then(|collection| collection.request(0, position, &mut rng.rng))
                else {
                    continue;
                };

                if sounds.scream_delay > 0.0 {
                    let id = tasks.next_sound_id();
                    tasks.schedule(
                        event.agent,
                        TaskPurpose::DelayedSound(id),
                        now + sounds.scream_delay,
                        TaskPayload::Sound(request),
                    );
                } else if let Some(backend) = audio.as_deref_mut() {
                    backend.play_one_shot(request);
                }
            }
            EffectKind::BloodBurst { position, amount } => {
                crate::logger::log(&format!(
                    "🩸 Zombie {:?} blood burst x{} at {:.1?}",
                    event.agent, amount, position
                ));
            }
        }
    }
}
