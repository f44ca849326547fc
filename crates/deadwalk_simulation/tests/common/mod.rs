//! Общие helpers интеграционных тестов: headless App + запись событий.

#![allow(dead_code)]

use bevy::prelude::*;
use deadwalk_simulation::ai::{AgentEffect, AiStateChanged, AiStateType};
use deadwalk_simulation::components::{BodyPart, BodyRegion};
use deadwalk_simulation::headless::spawn_ground;
use deadwalk_simulation::{create_simulation_app, BoneControlChanged, ZombieBrain, ZombieDied};

/// Все события ядра за прогон
#[derive(Resource, Default)]
pub struct Recorded {
    pub states: Vec<AiStateChanged>,
    pub bones: Vec<BoneControlChanged>,
    pub deaths: Vec<ZombieDied>,
    pub effects: Vec<AgentEffect>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut states: EventReader<AiStateChanged>,
    mut bones: EventReader<BoneControlChanged>,
    mut deaths: EventReader<ZombieDied>,
    mut effects: EventReader<AgentEffect>,
) {
    recorded.states.extend(states.read().copied());
    recorded.bones.extend(bones.read().copied());
    recorded.deaths.extend(deaths.read().copied());
    recorded.effects.extend(effects.read().copied());
}

/// Симуляция + headless хост + пол на y = 0. Первый update (инициализация часов) уже сделан.
pub fn create_test_app(seed: u64) -> App {
    let mut app = create_simulation_app(seed);
    app.init_resource::<Recorded>()
        .add_systems(FixedPostUpdate, record_events);

    spawn_ground(app.world_mut(), 0.0);
    app.update();
    app
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Тикает, пока условие не выполнится. Возвращает число тиков или None.
pub fn run_until(app: &mut App, max_ticks: usize, mut condition: impl FnMut(&World) -> bool) -> Option<usize> {
    for tick in 1..=max_ticks {
        app.update();
        if condition(app.world()) {
            return Some(tick);
        }
    }
    None
}

pub fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}

pub fn state_of(app: &App, agent: Entity) -> AiStateType {
    app.world()
        .get::<ZombieBrain>(agent)
        .map(|brain| brain.machine.current_type())
        .unwrap_or(AiStateType::None)
}

/// Агент хоть раз переходил в `state`
pub fn entered(app: &App, agent: Entity, state: AiStateType) -> bool {
    recorded(app)
        .states
        .iter()
        .any(|change| change.agent == agent && change.to == state)
}

/// Первый body part агента в регионе
pub fn body_part(app: &mut App, agent: Entity, region: BodyRegion) -> Entity {
    let mut query = app.world_mut().query::<(Entity, &BodyPart)>();
    query
        .iter(app.world())
        .find(|(_, part)| part.owner == agent && part.region == region)
        .map(|(entity, _)| entity)
        .expect("body part in region")
}

pub fn position_of(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|transform| transform.translation)
        .unwrap_or_default()
}
