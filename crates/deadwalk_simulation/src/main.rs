//! Headless симуляция DEADWALK
//!
//! Зомби патрулирует, замечает игрока, получает удар по ногам,
//! лежит в ragdoll'е и поднимается обратно.

use bevy::prelude::*;
use deadwalk_simulation::ai::{AiStateChanged, AiStateType};
use deadwalk_simulation::headless::{spawn_ground, spawn_player, spawn_waypoint_network, spawn_zombie, ZombieSpawn};
use deadwalk_simulation::{
    create_simulation_app, log_info, log_warning, set_log_level, BoneControlChanged, DamageRequest, LogLevel,
};

fn main() {
    let seed = 42;
    println!("Starting DEADWALK headless simulation (seed: {})", seed);

    let mut app = create_simulation_app(seed);

    // DEADWALK_LOG=info|warn|error|debug
    if let Ok(value) = std::env::var("DEADWALK_LOG") {
        match value.parse::<LogLevel>() {
            Ok(level) => set_log_level(level),
            Err(error) => log_warning(&format!("⚠️ DEADWALK_LOG: {}", error)),
        }
    }
    app.add_systems(FixedPostUpdate, report_events);

    let world = app.world_mut();
    spawn_ground(world, 0.0);
    let network = spawn_waypoint_network(
        world,
        vec![
            Vec3::new(0.0, 0.0, -8.0),
            Vec3::new(8.0, 0.0, -8.0),
            Vec3::new(8.0, 0.0, 0.0),
        ],
    );
    let zombie = spawn_zombie(
        world,
        ZombieSpawn {
            initial_state: AiStateType::Patrol,
            network: Some(network),
            ..ZombieSpawn::at(Vec3::ZERO)
        },
    );

    for tick in 0..1200 {
        if tick == 300 {
            spawn_player(app.world_mut(), Vec3::new(0.0, 1.0, -12.0), 1.0);
        }

        if tick == 600 {
            app.world_mut().send_event(DamageRequest {
                agent: zombie,
                body_part: None,
                position: Vec3::new(0.0, 0.5, -0.2),
                force: Vec3::new(0.0, 0.0, 4.0),
                damage: 20,
                attacker_position: Vec3::new(0.0, 1.6, -3.0),
                hit_direction: 0,
            });
        }

        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}

fn report_events(mut states: EventReader<AiStateChanged>, mut bones: EventReader<BoneControlChanged>) {
    for change in states.read() {
        log_info(&format!("🧠 {:?}: {:?} → {:?}", change.agent, change.from, change.to));
    }
    for change in bones.read() {
        log_info(&format!("🦴 {:?}: {:?} → {:?}", change.agent, change.from, change.to));
    }
}
