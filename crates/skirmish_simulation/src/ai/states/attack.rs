use super::{aim_at_last_known, AiState, StateContext};
use crate::ai::components::BehaviorState;
use crate::components::ActionInput;

/// Держит прицел на цели, attack-held пульс раз в `behavior.attack_cooldown`
#[derive(Debug, Default)]
pub struct AttackState {
    cooldown_timer: f32,
}

impl AttackState {
    pub fn cooldown_timer(&self) -> f32 {
        self.cooldown_timer
    }
}

impl AiState for AttackState {
    fn enter(&mut self, _ctx: &mut StateContext) {
        self.cooldown_timer = 0.0;
    }

    fn update(&mut self, _ctx: &mut StateContext, delta: f32) -> Option<BehaviorState> {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer -= delta;
        }
        None
    }

    fn generate_input(&mut self, ctx: &mut StateContext, input: &mut ActionInput) {
        aim_at_last_known(ctx.perception, input);
        input.aim.held = true;

        let ready = self.cooldown_timer <= 0.0;
        input.attack.held = ready;
        if ready {
            self.cooldown_timer = ctx.behavior.attack_cooldown;
        }
    }
}
