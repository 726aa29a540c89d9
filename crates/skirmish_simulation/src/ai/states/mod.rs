//! AI state machine: Idle → Patrol → Chase → Attack, плюс поглощающий Dead.
//!
//! Архитектура:
//! - `AiStateMachine` (Component) владеет объектами всех состояний и диспатчит
//!   Enter/Update/Exit/GenerateInput в активное
//! - `StateContext`: всё, что состоянию можно читать/писать за тик
//! - Глобальные переходы (смерть, попадание, perception): в `ai_decision`,
//!   до делегирования активному состоянию

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::components::{Behavior, BehaviorState, Perception};
use crate::components::ActionInput;
use crate::logger::{log_with_source, LogLevel};
use crate::spatial::SpatialOracle;

pub mod attack;
pub mod chase;
pub mod dead;
pub mod idle;
pub mod patrol;

#[cfg(test)]
mod states_tests;

pub use attack::AttackState;
pub use chase::ChaseState;
pub use dead::DeadState;
pub use idle::IdleState;
pub use patrol::PatrolState;

/// Данные одного AI entity на время тика
pub struct StateContext<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub behavior: &'a mut Behavior,
    pub perception: &'a mut Perception,
    pub spatial: &'a dyn SpatialOracle,
    pub rng: &'a mut ChaCha8Rng,
}

pub trait AiState: Send + Sync {
    fn enter(&mut self, _ctx: &mut StateContext) {}

    /// Per-state таймеры. `Some(next)`: запрос перехода.
    fn update(&mut self, _ctx: &mut StateContext, _delta: f32) -> Option<BehaviorState> {
        None
    }

    fn exit(&mut self, _ctx: &mut StateContext) {}

    /// Пишет overrides поверх уже сброшенного input
    fn generate_input(&mut self, _ctx: &mut StateContext, _input: &mut ActionInput) {}
}

/// Aim-held на last-known позицию цели (Idle, Chase, Attack)
pub(crate) fn aim_at_last_known(perception: &Perception, input: &mut ActionInput) {
    if let Some(position) = perception.last_known_target_position {
        input.aim.held = true;
        input.aim_position = Some(position);
    }
}

#[derive(Component, Debug, Default)]
pub struct AiStateMachine {
    current: BehaviorState,
    started: bool,
    idle: IdleState,
    patrol: PatrolState,
    chase: ChaseState,
    attack: AttackState,
    dead: DeadState,
}

impl AiStateMachine {
    pub fn current(&self) -> BehaviorState {
        self.current
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn patrol(&self) -> &PatrolState {
        &self.patrol
    }

    pub fn idle(&self) -> &IdleState {
        &self.idle
    }

    pub fn chase(&self) -> &ChaseState {
        &self.chase
    }

    pub fn attack(&self) -> &AttackState {
        &self.attack
    }

    /// Первый вход (Enter без Exit)
    pub fn start(&mut self, initial: BehaviorState, ctx: &mut StateContext) {
        self.current = initial;
        self.started = true;
        ctx.behavior.current_state = initial;
        ctx.behavior.state_timer = 0.0;
        self.state_mut(initial).enter(ctx);
    }

    /// No-op если уже в `next` и не `force`. Возвращает true при реальном переходе.
    pub fn switch_state(&mut self, next: BehaviorState, force: bool, ctx: &mut StateContext) -> bool {
        if self.current == next && !force {
            return false;
        }

        let previous = self.current;
        self.state_mut(previous).exit(ctx);

        self.current = next;
        ctx.behavior.current_state = next;
        ctx.behavior.state_timer = 0.0;
        self.state_mut(next).enter(ctx);

        log_with_source(
            LogLevel::Debug,
            "AIStateMachine",
            &format!("{:?}: {:?} → {:?}", ctx.entity, previous, next),
        );
        true
    }

    /// stateTimer += dt → Update активного состояния → GenerateInput (поверх reset)
    pub fn tick(&mut self, ctx: &mut StateContext, input: &mut ActionInput, delta: f32) {
        ctx.behavior.state_timer += delta;

        if let Some(next) = self.state_mut(self.current).update(ctx, delta) {
            self.switch_state(next, false, ctx);
        }

        input.reset_transient();
        self.state_mut(self.current).generate_input(ctx, input);
    }

    fn state_mut(&mut self, state: BehaviorState) -> &mut dyn AiState {
        match state {
            BehaviorState::Idle => &mut self.idle,
            BehaviorState::Patrol => &mut self.patrol,
            BehaviorState::Chase => &mut self.chase,
            BehaviorState::Attack => &mut self.attack,
            BehaviorState::Dead => &mut self.dead,
        }
    }
}
