//! Tests for AI state machine dispatch and per-state logic.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::idle::{IDLE_MAX_DWELL, IDLE_MIN_DWELL};
use super::patrol::{PATROL_FALLBACK_SPREAD, PATROL_MAX_TIMEOUT, PATROL_MIN_DISTANCE, PATROL_MIN_TIMEOUT};
use super::*;
use crate::config::AIConfig;
use crate::spatial::{ObstacleField, OpenField};

struct Fixture {
    behavior: Behavior,
    perception: Perception,
    rng: ChaCha8Rng,
    input: ActionInput,
}

impl Fixture {
    fn new() -> Self {
        Self {
            behavior: Behavior::from_config(&AIConfig::default()),
            perception: Perception::default(),
            rng: ChaCha8Rng::seed_from_u64(7),
            input: ActionInput::default(),
        }
    }

    fn ctx<'a>(&'a mut self, spatial: &'a dyn SpatialOracle) -> (StateContext<'a>, &'a mut ActionInput) {
        (
            StateContext {
                entity: Entity::from_raw(1),
                position: Vec3::ZERO,
                behavior: &mut self.behavior,
                perception: &mut self.perception,
                spatial,
                rng: &mut self.rng,
            },
            &mut self.input,
        )
    }
}

#[test]
fn test_switch_to_same_state_is_noop() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    let mut machine = AiStateMachine::default();

    let (mut ctx, _) = fixture.ctx(&field);
    machine.start(BehaviorState::Idle, &mut ctx);
    let dwell = machine.idle().transition_time();
    ctx.behavior.state_timer = 2.5;

    assert!(!machine.switch_state(BehaviorState::Idle, false, &mut ctx));
    assert_eq!(ctx.behavior.state_timer, 2.5);
    // Enter не вызывался: dwell не перероллен
    assert_eq!(machine.idle().transition_time(), dwell);

    assert!(machine.switch_state(BehaviorState::Idle, true, &mut ctx));
    assert_eq!(ctx.behavior.state_timer, 0.0);
}

#[test]
fn test_idle_dwell_then_patrol() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Idle, &mut ctx);
    let dwell = machine.idle().transition_time();
    assert!((IDLE_MIN_DWELL..=IDLE_MAX_DWELL).contains(&dwell));

    let mut elapsed = 0.0;
    while machine.current() == BehaviorState::Idle && elapsed < 10.0 {
        machine.tick(&mut ctx, input, 0.1);
        elapsed += 0.1;
    }

    assert_eq!(machine.current(), BehaviorState::Patrol);
    assert!(elapsed >= dwell);
    assert_eq!(ctx.behavior.current_state, BehaviorState::Patrol);
}

#[test]
fn test_idle_aims_at_last_known_position() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    let last_known = Vec3::new(2.0, 1.0, -3.0);
    fixture.perception.last_known_target_position = Some(last_known);
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Idle, &mut ctx);
    machine.tick(&mut ctx, input, 0.016);

    assert!(input.aim.held);
    assert_eq!(input.aim_position, Some(last_known));
    assert_eq!(input.movement, Vec2::ZERO);
}

#[test]
fn test_patrol_point_within_detection_radius() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Patrol, &mut ctx);

    let target = machine.patrol().target().expect("patrol target");
    let distance = target.distance(Vec3::ZERO);
    assert!(distance >= PATROL_MIN_DISTANCE - 1e-4);
    assert!(distance <= 10.0 + 1e-4);

    machine.tick(&mut ctx, input, 0.016);
    assert!((input.movement.length() - 1.0).abs() < 1e-4);
}

#[test]
fn test_patrol_with_small_detection_radius() {
    let field = OpenField::default();

    for radius in [2.0, 0.0] {
        let config = AIConfig {
            detection_radius: radius,
            ..default()
        };
        assert!(config.validate().is_ok());

        let mut fixture = Fixture::new();
        fixture.behavior = Behavior::from_config(&config);
        let mut machine = AiStateMachine::default();

        let (mut ctx, input) = fixture.ctx(&field);
        machine.start(BehaviorState::Patrol, &mut ctx);

        // Точка между radius и минимальной дистанцией патруля
        let target = machine.patrol().target().expect("patrol target");
        let distance = target.distance(Vec3::ZERO);
        assert!(distance >= radius - 1e-4, "radius {radius}: {distance}");
        assert!(distance <= PATROL_MIN_DISTANCE + 1e-4, "radius {radius}: {distance}");

        machine.tick(&mut ctx, input, 0.1);
        assert_eq!(machine.current(), BehaviorState::Patrol);
    }
}

#[test]
fn test_patrol_falls_back_near_self_without_ground() {
    // Земля только далеко от AI: все 10 проб промахиваются
    let field = ObstacleField {
        ground_bounds: Some(crate::spatial::Aabb::from_center(
            Vec3::new(1000.0, 0.0, 0.0),
            Vec3::splat(1.0),
        )),
        ..default()
    };
    let mut fixture = Fixture::new();
    let mut machine = AiStateMachine::default();

    let (mut ctx, _) = fixture.ctx(&field);
    machine.start(BehaviorState::Patrol, &mut ctx);

    let target = machine.patrol().target().expect("fallback target");
    assert!(target.x.abs() <= PATROL_FALLBACK_SPREAD);
    assert!(target.z.abs() <= PATROL_FALLBACK_SPREAD);
}

#[test]
fn test_patrol_times_out_to_idle() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Patrol, &mut ctx);
    let timeout = machine.patrol().timeout();
    assert!((PATROL_MIN_TIMEOUT..=PATROL_MAX_TIMEOUT).contains(&timeout));

    // Позиция не меняется (никто не двигает entity), точка далеко → только timeout
    let mut elapsed = 0.0;
    while machine.current() == BehaviorState::Patrol && elapsed < 20.0 {
        machine.tick(&mut ctx, input, 0.1);
        elapsed += 0.1;
    }
    assert_eq!(machine.current(), BehaviorState::Idle);
    assert!(elapsed >= timeout);
}

#[test]
fn test_chase_switches_to_attack_after_random_delay() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    fixture.perception.direction_to_target = Vec3::new(3.0, 0.0, 4.0);
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Chase, &mut ctx);
    let delay = machine.chase().attack_switch_time();
    assert!((1.0..=3.0).contains(&delay));

    machine.tick(&mut ctx, input, 0.1);
    assert!((input.movement - Vec2::new(0.6, 0.8)).length() < 1e-5);

    let mut elapsed = 0.1;
    while machine.current() == BehaviorState::Chase && elapsed < 5.0 {
        machine.tick(&mut ctx, input, 0.1);
        elapsed += 0.1;
    }
    assert_eq!(machine.current(), BehaviorState::Attack);
}

#[test]
fn test_chase_without_bounds_never_self_switches() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    fixture.behavior.chase_attack_min_time = 0.0;
    fixture.behavior.chase_attack_max_time = 0.0;
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Chase, &mut ctx);
    for _ in 0..100 {
        machine.tick(&mut ctx, input, 0.1);
    }
    assert_eq!(machine.current(), BehaviorState::Chase);
}

#[test]
fn test_attack_pulses_once_per_cooldown() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    fixture.behavior.attack_cooldown = 0.5;
    fixture.perception.last_known_target_position = Some(Vec3::new(0.0, 1.0, -2.0));
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Attack, &mut ctx);

    let mut pulses = 0;
    for _ in 0..16 {
        machine.tick(&mut ctx, input, 0.125);
        assert!(input.aim.held);
        if input.attack.held {
            pulses += 1;
        }
    }
    // 2.0 s при cooldown 0.5 s → пульс на 1, 5, 9, 13 тиках
    assert_eq!(pulses, 4);
}

#[test]
fn test_dead_state_generates_neutral_input() {
    let field = OpenField::default();
    let mut fixture = Fixture::new();
    fixture.input.movement = Vec2::ONE;
    fixture.input.attack.held = true;
    let mut machine = AiStateMachine::default();

    let (mut ctx, input) = fixture.ctx(&field);
    machine.start(BehaviorState::Attack, &mut ctx);
    machine.switch_state(BehaviorState::Dead, false, &mut ctx);
    machine.tick(&mut ctx, input, 0.1);

    assert_eq!(*input, ActionInput::default());
}
