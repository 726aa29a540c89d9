use rand::Rng;

use super::{aim_at_last_known, AiState, StateContext};
use crate::ai::components::BehaviorState;
use crate::components::ActionInput;

pub const IDLE_MIN_DWELL: f32 = 3.0;
pub const IDLE_MAX_DWELL: f32 = 5.0;

/// Стоит на месте 3–5 s, затем Patrol
#[derive(Debug, Default)]
pub struct IdleState {
    transition_time: f32,
}

impl IdleState {
    pub fn transition_time(&self) -> f32 {
        self.transition_time
    }
}

impl AiState for IdleState {
    fn enter(&mut self, ctx: &mut StateContext) {
        self.transition_time = ctx.rng.gen_range(IDLE_MIN_DWELL..=IDLE_MAX_DWELL);
    }

    fn update(&mut self, ctx: &mut StateContext, _delta: f32) -> Option<BehaviorState> {
        (ctx.behavior.state_timer > self.transition_time).then_some(BehaviorState::Patrol)
    }

    fn generate_input(&mut self, ctx: &mut StateContext, input: &mut ActionInput) {
        aim_at_last_known(ctx.perception, input);
    }
}
