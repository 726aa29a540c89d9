//! Тесты детерминизма
//!
//! Одинаковый seed + одинаковый input → идентичный мир (RNG scatter, спавнеры,
//! idle/chase таймеры AI).

use std::sync::Arc;

use bevy::prelude::*;
use skirmish_simulation::actor::{SpawnPlacement, Spawner};
use skirmish_simulation::config::ScatterType;
use skirmish_simulation::*;

const TICK: f32 = 1.0 / 50.0;

fn run_skirmish(seed: u64, ticks: usize) -> (Vec<u8>, Vec<u8>) {
    let rifle = Arc::new(WeaponConfig {
        projectile_count: 3,
        projectile_cooldown: 0.05,
        scatter_type: ScatterType::Random,
        scatter_angle: 20.0,
        speed: 25.0,
        damage: 8.0,
        ..default()
    });
    let grunt_weapon = Arc::new(WeaponConfig {
        speed: 15.0,
        attack_cooldown: 1.5,
        ..default()
    });
    let ai = Arc::new(AIConfig {
        detection_radius: 14.0,
        attack_range: 8.0,
        ..default()
    });

    let fire = RawInput {
        aim: true,
        attack: true,
        aim_position: Some(Vec3::new(0.0, 1.0, -20.0)),
        ..default()
    };
    let input = InputService::new(ScriptedInput::default().hold(fire, ticks));
    let mut sim = Simulation::with_services(seed, SpatialService::default(), input);

    sim.create(&ActorTemplate::player(
        "player",
        Arc::new(ActorConfig::default()),
        Some(rifle),
    ));

    let grunt = ActorTemplate::enemy("grunt", Arc::new(ActorConfig::default()), ai, Some(grunt_weapon));
    let spawner = Spawner::new(
        vec![grunt],
        0.5,
        SpawnPlacement::Area {
            half_extents: Vec3::new(6.0, 2.0, 3.0),
        },
    )
    .with_alive_limit(5);
    sim.world_mut()
        .spawn((Transform::from_xyz(0.0, 0.0, -10.0), spawner));

    sim.run(TICK, ticks);

    let world = sim.world_mut();
    (
        world_snapshot::<Transform>(world),
        world_snapshot::<Health>(world),
    )
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_skirmish(SEED, 300);
    let second = run_skirmish(SEED, 300);

    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..3).map(|_| run_skirmish(SEED, 200)).collect();
    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            &snapshots[0], snapshot,
            "Прогон {} отличается от первого",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    let (transforms_a, _) = run_skirmish(1, 100);
    let (transforms_b, _) = run_skirmish(2, 100);

    // Позиции спавна и scatter зависят от seed
    assert_ne!(transforms_a, transforms_b);
}
