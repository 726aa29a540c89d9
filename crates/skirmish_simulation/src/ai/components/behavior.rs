//! Behavior: состояние и параметры AI state machine.

use bevy::prelude::*;

use crate::config::AIConfig;

/// Состояния AI (Dead: поглощающее)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum BehaviorState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
    Dead,
}

/// Пишет только state machine (ai_decision)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Behavior {
    pub current_state: BehaviorState,
    /// Секунды в текущем состоянии
    pub state_timer: f32,
    pub detection_radius: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub chase_attack_min_time: f32,
    pub chase_attack_max_time: f32,
}

impl Default for Behavior {
    fn default() -> Self {
        Self::from_config(&AIConfig::default())
    }
}

impl Behavior {
    pub fn from_config(config: &AIConfig) -> Self {
        Self {
            current_state: BehaviorState::Idle,
            state_timer: 0.0,
            detection_radius: config.detection_radius,
            attack_range: config.attack_range,
            attack_cooldown: config.attack_cooldown,
            chase_attack_min_time: config.chase_attack_min_time,
            chase_attack_max_time: config.chase_attack_max_time,
        }
    }
}
