//! AI integration test
//!
//! Perception → Decision → synthetic ActionInput → Attack → Resolution
//! на полном SimulationPlugin.

use std::sync::Arc;

use bevy::prelude::*;
use skirmish_simulation::actor::ActorModule;
use skirmish_simulation::*;

fn ai_config() -> Arc<AIConfig> {
    Arc::new(AIConfig {
        detection_radius: 10.0,
        attack_range: 5.0,
        attack_cooldown: 0.5,
        chase_attack_min_time: 1.0,
        chase_attack_max_time: 3.0,
    })
}

fn rifle() -> Arc<WeaponConfig> {
    Arc::new(WeaponConfig {
        damage: 10.0,
        speed: 20.0,
        lifetime: 1.0,
        attack_cooldown: 0.5,
        projectile_cooldown: 0.0,
        ..default()
    })
}

/// Цель без оружия и без input
fn player(sim: &mut Simulation, position: Vec3) -> Entity {
    sim.create(
        &ActorTemplate::new("player", Arc::new(ActorConfig::default()))
            .with_faction(FactionTag::Player)
            .with_module(ActorModule::Health)
            .at(position),
    )
}

fn enemy(sim: &mut Simulation, transform: Transform) -> Entity {
    sim.create(
        &ActorTemplate::enemy("grunt", Arc::new(ActorConfig::default()), ai_config(), Some(rifle()))
            .with_transform(transform),
    )
}

fn state(sim: &Simulation, entity: Entity) -> Option<BehaviorState> {
    sim.get::<Behavior>(entity).map(|b| b.current_state)
}

#[test]
fn test_target_outside_detection_radius_is_ignored() {
    let mut sim = Simulation::new(42);
    player(&mut sim, Vec3::new(15.0, 0.0, 0.0));
    let grunt = enemy(&mut sim, Transform::IDENTITY);

    sim.run(0.02, 20);

    let perception = sim.get::<Perception>(grunt).cloned().unwrap_or_default();
    assert!(!perception.detection_radius_pass);
    assert!(perception.health_check_pass);
    assert!(perception.target.is_none());
    assert_eq!(perception.distance_to_target, f32::MAX);
    assert_eq!(state(&sim, grunt), Some(BehaviorState::Idle));
}

#[test]
fn test_short_sighted_enemy_idles_then_patrols() {
    let mut sim = Simulation::new(42);
    let ai = Arc::new(AIConfig {
        detection_radius: 2.0,
        ..default()
    });
    assert!(ai.validate().is_ok());
    let grunt = sim.create(&ActorTemplate::enemy(
        "grunt",
        Arc::new(ActorConfig::default()),
        ai,
        Some(rifle()),
    ));

    // Idle dwell 3–5 s → Patrol
    let mut states = Vec::new();
    for _ in 0..80 {
        sim.step(0.1);
        if let Some(state) = state(&sim, grunt) {
            if states.last() != Some(&state) {
                states.push(state);
            }
        }
    }

    assert_eq!(states.first(), Some(&BehaviorState::Idle));
    assert!(states.contains(&BehaviorState::Patrol));
    let moved = sim.get::<Transform>(grunt).map_or(0.0, |t| t.translation.length());
    assert!(moved > 0.0);
}

#[test]
fn test_enemy_in_range_attacks_and_damages_player() {
    let mut sim = Simulation::new(42);
    let target = player(&mut sim, Vec3::ZERO);
    let grunt = enemy(
        &mut sim,
        Transform::from_xyz(0.0, 0.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    );

    let mut hits = Vec::new();
    for _ in 0..100 {
        sim.step(0.02);
        hits.extend(sim.events::<DamageDealt>());
    }

    assert_eq!(state(&sim, grunt), Some(BehaviorState::Attack));
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|hit| hit.target == target && hit.attacker == Some(grunt)));

    let health = sim.get::<Health>(target).map_or(0.0, |h| h.current);
    assert!(health < 100.0);
    assert_eq!(health, 100.0 - 10.0 * hits.len() as f32);
}

#[test]
fn test_hit_from_unseen_attacker_starts_chase() {
    let mut sim = Simulation::new(42);
    player(&mut sim, Vec3::new(0.0, 0.0, 30.0));
    let grunt = enemy(&mut sim, Transform::IDENTITY);

    sim.run(0.02, 5);
    assert_eq!(state(&sim, grunt), Some(BehaviorState::Idle));

    let weapon = Arc::new(WeaponConfig {
        speed: 0.0,
        damage: 5.0,
        ..default()
    });
    sim.spawn_projectile(
        &weapon,
        Some(FactionTag::Player),
        None,
        Transform::from_xyz(0.0, 1.0, 0.0),
        None,
    );

    // Тик попадания: is_hit выставлен в Resolution
    sim.step(0.02);
    assert!(sim.get::<Health>(grunt).is_some_and(|h| h.is_hit));

    // Следующий Decision видит is_hit
    sim.step(0.02);
    assert_eq!(state(&sim, grunt), Some(BehaviorState::Chase));
    let last_known = sim
        .get::<Perception>(grunt)
        .and_then(|p| p.last_known_target_position);
    assert!(last_known.is_some());
}

#[test]
fn test_dead_enemy_stops_acting() {
    let mut sim = Simulation::new(42);
    let target = player(&mut sim, Vec3::ZERO);
    let grunt = enemy(
        &mut sim,
        Transform::from_xyz(0.0, 0.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    );

    if let Some(mut health) = sim.get_mut::<Health>(grunt) {
        let max = health.max;
        health.change_health(-max);
    }

    sim.step(0.02);
    assert_eq!(state(&sim, grunt), Some(BehaviorState::Dead));

    sim.run(0.02, 50);
    assert!(sim.exists(grunt));
    assert_eq!(state(&sim, grunt), Some(BehaviorState::Dead));
    assert_eq!(sim.get::<Health>(target).map(|h| h.current), Some(100.0));
    assert_eq!(sim.get::<Perception>(grunt).map(|p| p.target), Some(None));
}
