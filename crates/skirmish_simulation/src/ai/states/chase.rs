use bevy::prelude::*;
use rand::Rng;

use super::{aim_at_last_known, AiState, StateContext};
use crate::ai::components::BehaviorState;
use crate::components::ActionInput;

/// Бежит к цели; опционально через случайную задержку переходит в Attack
#[derive(Debug, Default)]
pub struct ChaseState {
    attack_switch_time: f32,
}

impl ChaseState {
    pub fn attack_switch_time(&self) -> f32 {
        self.attack_switch_time
    }
}

impl AiState for ChaseState {
    fn enter(&mut self, ctx: &mut StateContext) {
        let min = ctx.behavior.chase_attack_min_time;
        let max = ctx.behavior.chase_attack_max_time;

        self.attack_switch_time = if min > 0.0 && max > 0.0 {
            ctx.rng.gen_range(min.min(max)..=max.max(min))
        } else {
            0.0
        };
    }

    fn update(&mut self, _ctx: &mut StateContext, delta: f32) -> Option<BehaviorState> {
        if self.attack_switch_time <= 0.0 {
            return None;
        }

        self.attack_switch_time -= delta;
        (self.attack_switch_time <= 0.0).then_some(BehaviorState::Attack)
    }

    fn generate_input(&mut self, ctx: &mut StateContext, input: &mut ActionInput) {
        let direction = ctx.perception.direction_to_target;
        input.movement = Vec2::new(direction.x, direction.z).normalize_or_zero();
        aim_at_last_known(ctx.perception, input);
    }
}
