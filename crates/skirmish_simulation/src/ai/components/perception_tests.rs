//! Tests for Perception memory window.

use bevy::prelude::*;

use super::perception::{Perception, TARGET_MEMORY_WINDOW};

fn seen(target: Entity) -> Perception {
    let mut perception = Perception::default();
    perception.set_gates(true, true, true);
    perception.see_target(target, 4.0, Vec3::NEG_Z, Vec3::new(0.0, 1.0, -4.0));
    perception
}

#[test]
fn test_default_uses_sentinels() {
    let perception = Perception::default();
    assert!(!perception.has_target());
    assert_eq!(perception.distance_to_target, f32::MAX);
    assert_eq!(perception.direction_to_target, Vec3::ZERO);
    assert!(!perception.gates_pass());
}

#[test]
fn test_target_remembered_until_window_expires() {
    let target = Entity::from_raw(3);
    let mut perception = seen(target);
    perception.set_gates(true, true, false);

    // 0.9 s без видимости: всё ещё помним
    for _ in 0..9 {
        perception.lose_sight(0.1);
    }
    assert_eq!(perception.target, Some(target));
    assert!(perception.last_known_target_position.is_some());
    assert!(perception.time_since_last_saw_target < TARGET_MEMORY_WINDOW);

    perception.lose_sight(0.15);
    assert_eq!(perception, Perception::default());
}

#[test]
fn test_seeing_target_resets_memory_timer() {
    let target = Entity::from_raw(3);
    let mut perception = seen(target);
    perception.lose_sight(0.8);

    perception.see_target(target, 2.0, Vec3::X, Vec3::ONE);
    assert_eq!(perception.time_since_last_saw_target, 0.0);
    perception.lose_sight(0.8);
    assert_eq!(perception.target, Some(target));
}

#[test]
fn test_never_seen_target_keeps_counting() {
    let mut perception = Perception::default();
    perception.lose_sight(0.7);
    perception.lose_sight(0.7);
    assert!(!perception.has_target());
    assert!((perception.time_since_last_saw_target - 1.4).abs() < 1e-5);
}
