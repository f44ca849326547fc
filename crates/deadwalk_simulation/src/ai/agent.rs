//! Agent query + shared system params: сборка ZombieContext в системах.

use bevy::ecs::query::QueryData;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{Senses, StateMachine};
use super::context::{ZombieBrain, ZombieContext, ZombieMachine};
use super::registry::ColliderRegistry;
use super::services::{AnimatorHandle, NavAgent, PhysicsBackend};
use super::waypoints::{PatrolRoute, WaypointNetwork};
use crate::components::Zombie;
use crate::ragdoll::Ragdoll;
use crate::DeterministicRng;

/// Все компоненты зомби-агента, которые трогают AI системы
#[derive(QueryData)]
#[query_data(mutable)]
pub struct ZombieAgent {
    pub entity: Entity,
    pub zombie: &'static mut Zombie,
    pub senses: &'static mut Senses,
    pub brain: &'static mut ZombieBrain,
    pub transform: &'static mut Transform,
    pub route: &'static mut PatrolRoute,
    pub ragdoll: &'static mut Ragdoll,
    pub nav: Option<&'static mut NavAgent>,
    pub animator: Option<&'static mut AnimatorHandle>,
}

/// Ресурсы, нужные контексту
#[derive(SystemParam)]
pub struct AgentServices<'w, 's> {
    pub time: Res<'w, Time<Fixed>>,
    pub registry: Res<'w, ColliderRegistry>,
    pub physics: Option<Res<'w, PhysicsBackend>>,
    pub rng: ResMut<'w, DeterministicRng>,
    pub networks: Query<'w, 's, &'static WaypointNetwork>,
}

impl AgentServices<'_, '_> {
    pub fn now(&self) -> f32 {
        self.time.elapsed_secs()
    }

    pub fn delta(&self) -> f32 {
        self.time.delta_secs()
    }
}

/// Раскладывает агента на (state machine, context) с непересекающимися заимствованиями
pub fn zombie_context<'a>(
    agent: &'a mut ZombieAgentItem<'_>,
    services: &'a mut AgentServices<'_, '_>,
) -> (&'a mut StateMachine<ZombieMachine>, ZombieContext<'a>) {
    let now = services.now();
    let delta = services.delta();

    let AgentServices {
        registry,
        physics,
        rng,
        networks,
        ..
    } = services;

    let registry: &'a ColliderRegistry = registry;
    let networks: &'a Query<'_, '_, &'static WaypointNetwork> = networks;
    let waypoints = agent.route.network.and_then(|network| networks.get(network).ok());

    let mut ctx = ZombieContext::new(
        agent.entity,
        &mut agent.zombie,
        &mut agent.senses,
        &mut agent.transform,
        &mut agent.route,
        registry,
        &mut rng.rng,
        now,
        delta,
    );
    ctx.waypoints = waypoints;
    ctx.nav = agent.nav.as_deref_mut();
    ctx.animator = agent.animator.as_deref_mut();
    ctx.physics = physics.as_deref();

    (&mut agent.brain.machine, ctx)
}
