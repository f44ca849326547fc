//! DEADWALK Simulation Core
//!
//! ECS-симуляция зомби на Bevy 0.16: восприятие, FSM поведения,
//! damage model, ragdoll и реанимация.
//!
//! Ядро не владеет физикой, навигацией, анимацией и звуком: хост
//! подключает их через контракты `ai::services`. Без движка работает
//! `headless` хост (демо, интеграционные тесты).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod collision_layers;
pub mod combat;
pub mod components;
pub mod config;
pub mod headless;
pub mod logger;
pub mod ragdoll;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AiSet, AiStateChanged, AiStateType, ColliderRegistry, ZombieBehaviorConfig, ZombieBrain};
pub use combat::{CombatPlugin, DamageRequest, Dead, ZombieDied};
pub use components::*;
pub use config::ConfigError;
pub use headless::HeadlessPlugin;
pub use ragdoll::{BoneControlChanged, BoneControlMode, Ragdoll, RagdollConfig, RagdollPlugin};

// Re-export logger
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger_if_needed,
    LogLevel, LogPrinter,
};

/// Частота fixed тика симуляции
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Хост-сервисы не входят: движок вставляет свои, headless: `HeadlessPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

        // Seed, выставленный хостом заранее, не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((AIPlugin, CombatPlugin, RagdollPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один fixed тик
/// (первый update только инициализирует часы).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Полный headless App: симуляция + headless хост
pub fn create_simulation_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessPlugin));
    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
