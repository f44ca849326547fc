//! Zombie behaviour scenarios в headless App
//!
//! - игрок в поле зрения → Pursuit → подход → Attack
//! - звук рядом → Alerted
//! - голодный зомби видит еду → Pursuit
//! - сытый зомби еду игнорирует

mod common;

use bevy::prelude::*;
use common::*;
use deadwalk_simulation::ai::AiStateType;
use deadwalk_simulation::headless::{spawn_food, spawn_player, spawn_sound, spawn_zombie, ZombieSpawn};
use deadwalk_simulation::*;

#[test]
fn test_zombie_sees_player_and_attacks() {
    let mut app = create_test_app(42);
    let zombie = spawn_zombie(app.world_mut(), ZombieSpawn::at(Vec3::ZERO));
    let player = spawn_player(app.world_mut(), Vec3::new(0.0, 1.6, -4.0), 1.0);

    run_ticks(&mut app, 30);
    assert!(entered(&app, zombie, AiStateType::Pursuit), "Зомби не заметил игрока");

    let start = position_of(&app, zombie);
    let ticks = run_until(&mut app, 600, |world| {
        world
            .get::<ZombieBrain>(zombie)
            .map(|brain| brain.machine.current_type() == AiStateType::Attack)
            .unwrap_or(false)
    });
    assert!(ticks.is_some(), "Зомби не дошёл до атаки за 600 тиков");

    let target = position_of(&app, player);
    let now = position_of(&app, zombie);
    let before = Vec2::new(target.x - start.x, target.z - start.z).length();
    let after = Vec2::new(target.x - now.x, target.z - now.z).length();
    assert!(after < before - 1.0, "Зомби не приблизился: {} → {}", before, after);

    // Переходы шли в правильном порядке
    let order: Vec<AiStateType> = recorded(&app)
        .states
        .iter()
        .filter(|change| change.agent == zombie)
        .map(|change| change.to)
        .collect();
    let pursuit = order.iter().position(|state| *state == AiStateType::Pursuit);
    let attack = order.iter().position(|state| *state == AiStateType::Attack);
    assert!(pursuit < attack);
}

#[test]
fn test_player_behind_is_not_seen() {
    let mut app = create_test_app(3);
    let zombie = spawn_zombie(app.world_mut(), ZombieSpawn::at(Vec3::ZERO));
    // За спиной (+Z), внутри сенсора, но вне FOV
    spawn_player(app.world_mut(), Vec3::new(0.0, 1.6, 3.0), 1.0);

    run_ticks(&mut app, 30);
    assert!(!entered(&app, zombie, AiStateType::Pursuit));
}

#[test]
fn test_zombie_hears_sound() {
    let mut app = create_test_app(5);
    let zombie = spawn_zombie(app.world_mut(), ZombieSpawn::at(Vec3::ZERO));
    spawn_sound(app.world_mut(), Vec3::new(3.0, 0.0, 0.0), 6.0, 1.0);

    run_ticks(&mut app, 10);
    assert!(entered(&app, zombie, AiStateType::Alerted), "Зомби не услышал звук");
    assert!(!entered(&app, zombie, AiStateType::Pursuit));
}

#[test]
fn test_hungry_zombie_pursues_food() {
    let mut app = create_test_app(9);
    let mut spawn = ZombieSpawn::at(Vec3::ZERO);
    spawn.profile.satisfaction = 0.5;
    let zombie = spawn_zombie(app.world_mut(), spawn);
    spawn_food(app.world_mut(), Vec3::new(0.0, 0.5, -3.5));

    run_ticks(&mut app, 10);
    assert!(entered(&app, zombie, AiStateType::Pursuit), "Голодный зомби не пошёл к еде");
}

#[test]
fn test_full_zombie_ignores_food() {
    let mut app = create_test_app(9);
    let zombie = spawn_zombie(app.world_mut(), ZombieSpawn::at(Vec3::ZERO));
    spawn_food(app.world_mut(), Vec3::new(0.0, 0.5, -3.5));

    run_ticks(&mut app, 10);
    assert!(!entered(&app, zombie, AiStateType::Pursuit));
}
