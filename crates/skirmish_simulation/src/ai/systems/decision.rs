//! AI Decision system: глобальная таблица переходов + tick активного состояния.
//!
//! Порядок переходов (один раз за тик, до per-state таймеров):
//! 1. dead → Dead
//! 2. is_hit в Idle/Patrol → last-known = позиция попадания − направление, Chase
//! 3. цель видна: в attack range → Attack; иначе Idle или state_timer > attack_cooldown → Chase
//! 4. цель есть, gates не прошли, память > 1 s → Idle
//! 5. цели нет, Attack/Chase → Idle

use bevy::prelude::*;

use crate::ai::components::{Behavior, BehaviorState, Perception, TARGET_MEMORY_WINDOW};
use crate::ai::states::{AiStateMachine, StateContext};
use crate::components::{ActionInput, AiControlled, Health};
use crate::logger::{log_with_source, LogLevel};
use crate::spatial::SpatialService;
use crate::{DeltaTime, DeterministicRng};

pub fn ai_decision(
    delta: Res<DeltaTime>,
    spatial: Res<SpatialService>,
    mut rng: ResMut<DeterministicRng>,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &mut Behavior,
            &mut AiStateMachine,
            &mut Perception,
            Option<&mut ActionInput>,
            Option<&Health>,
        ),
        With<AiControlled>,
    >,
) {
    let dt = delta.0;

    for (entity, transform, mut behavior, mut machine, mut perception, input, health) in
        agents.iter_mut()
    {
        let Some(mut input) = input else {
            log_with_source(
                LogLevel::Error,
                "AIDecisionSystem",
                &format!("{:?} has no ActionInput, skipping", entity),
            );
            continue;
        };

        let mut ctx = StateContext {
            entity,
            position: transform.translation,
            behavior: &mut *behavior,
            perception: &mut *perception,
            spatial: spatial.oracle(),
            rng: &mut rng.rng,
        };

        if !machine.is_started() {
            machine.start(BehaviorState::Idle, &mut ctx);
        }

        apply_global_transitions(&mut *machine, &mut ctx, health);
        machine.tick(&mut ctx, &mut *input, dt);
    }
}

/// Таблица переходов 1–5
pub fn apply_global_transitions(
    machine: &mut AiStateMachine,
    ctx: &mut StateContext,
    health: Option<&Health>,
) {
    let current = machine.current();

    if let Some(health) = health {
        if health.is_dead {
            machine.switch_state(BehaviorState::Dead, false, ctx);
            return;
        }

        if health.is_hit && matches!(current, BehaviorState::Idle | BehaviorState::Patrol) {
            let hit = health.last_hit;
            ctx.perception.last_known_target_position = Some(hit.position - hit.direction);
            machine.switch_state(BehaviorState::Chase, false, ctx);
            return;
        }
    }

    if current == BehaviorState::Dead {
        return;
    }

    if ctx.perception.has_target() {
        if ctx.perception.gates_pass() {
            if ctx.perception.distance_to_target <= ctx.behavior.attack_range {
                machine.switch_state(BehaviorState::Attack, false, ctx);
            } else if current == BehaviorState::Idle
                || ctx.behavior.state_timer > ctx.behavior.attack_cooldown
            {
                machine.switch_state(BehaviorState::Chase, false, ctx);
            }
            return;
        }

        if ctx.perception.time_since_last_saw_target > TARGET_MEMORY_WINDOW {
            machine.switch_state(BehaviorState::Idle, false, ctx);
        }
    } else if matches!(current, BehaviorState::Attack | BehaviorState::Chase) {
        machine.switch_state(BehaviorState::Idle, false, ctx);
    }
}
