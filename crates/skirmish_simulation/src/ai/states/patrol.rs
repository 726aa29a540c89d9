use bevy::prelude::*;
use rand::Rng;

use super::{AiState, StateContext};
use crate::ai::components::BehaviorState;
use crate::components::ActionInput;

/// Ближе этого: точка считается достигнутой
pub const ARRIVE_DISTANCE: f32 = 0.5;
/// Сколько секунд стоять на точке перед Idle
pub const ARRIVED_HOLD_TIME: f32 = 1.0;
pub const PATROL_MIN_TIMEOUT: f32 = 5.0;
pub const PATROL_MAX_TIMEOUT: f32 = 8.0;
pub const PATROL_MIN_DISTANCE: f32 = 3.0;
pub const PATROL_SAMPLE_ATTEMPTS: usize = 10;
/// Fallback: случайная точка в ±3 m вокруг себя
pub const PATROL_FALLBACK_SPREAD: f32 = 3.0;

/// Идёт к случайной точке в пределах detection radius
#[derive(Debug, Default)]
pub struct PatrolState {
    target: Option<Vec3>,
    direction: Vec3,
    arrived_timer: f32,
    timeout: f32,
}

impl PatrolState {
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn timeout(&self) -> f32 {
        self.timeout
    }
}

/// Точка патруля: до 10 попыток через ground probe, иначе точка рядом с собой
pub fn pick_patrol_point(ctx: &mut StateContext) -> Vec3 {
    // Radius меньше минимальной дистанции: границы меняются местами
    let radius = ctx.behavior.detection_radius;
    let (min_distance, max_distance) = (PATROL_MIN_DISTANCE.min(radius), PATROL_MIN_DISTANCE.max(radius));

    for _ in 0..PATROL_SAMPLE_ATTEMPTS {
        let heading = Vec3::new(
            ctx.rng.gen_range(-1.0..=1.0),
            0.0,
            ctx.rng.gen_range(-1.0..=1.0),
        )
        .normalize_or_zero();
        if heading == Vec3::ZERO {
            continue;
        }

        let distance = ctx.rng.gen_range(min_distance..=max_distance);
        if let Some(ground) = ctx.spatial.ground_probe(ctx.position + heading * distance) {
            return ground;
        }
    }

    ctx.position
        + Vec3::new(
            ctx.rng.gen_range(-PATROL_FALLBACK_SPREAD..=PATROL_FALLBACK_SPREAD),
            0.0,
            ctx.rng.gen_range(-PATROL_FALLBACK_SPREAD..=PATROL_FALLBACK_SPREAD),
        )
}

impl AiState for PatrolState {
    fn enter(&mut self, ctx: &mut StateContext) {
        self.arrived_timer = 0.0;
        self.timeout = ctx.rng.gen_range(PATROL_MIN_TIMEOUT..=PATROL_MAX_TIMEOUT);
        let target = pick_patrol_point(ctx);
        self.target = Some(target);
        self.direction = flat_direction(ctx.position, target);
    }

    fn update(&mut self, ctx: &mut StateContext, delta: f32) -> Option<BehaviorState> {
        let target = *self.target.get_or_insert_with(|| ctx.position);
        self.direction = flat_direction(ctx.position, target);

        if self.direction.length() < ARRIVE_DISTANCE {
            self.arrived_timer += delta;
            if self.arrived_timer > ARRIVED_HOLD_TIME {
                return Some(BehaviorState::Idle);
            }
        }

        (ctx.behavior.state_timer > self.timeout).then_some(BehaviorState::Idle)
    }

    fn exit(&mut self, _ctx: &mut StateContext) {
        self.target = None;
    }

    fn generate_input(&mut self, _ctx: &mut StateContext, input: &mut ActionInput) {
        if self.direction.length() >= ARRIVE_DISTANCE {
            input.movement = Vec2::new(self.direction.x, self.direction.z).normalize_or_zero();
        }
    }
}

fn flat_direction(from: Vec3, to: Vec3) -> Vec3 {
    let mut direction = to - from;
    direction.y = 0.0;
    direction
}
