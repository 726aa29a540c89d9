//! AI decision-making module
//!
//! Perception (nearest hostile + gates + память) → Decision (state machine
//! Idle/Patrol/Chase/Attack/Dead) → synthetic ActionInput того же формата, что у игрока.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod states;
pub mod systems;

// Re-export основных типов
pub use components::{Behavior, BehaviorState, Perception, TARGET_MEMORY_WINDOW};
pub use states::{AiState, AiStateMachine, StateContext};
pub use systems::{ai_decision, find_nearest_hostile, update_perception, EYE_HEIGHT};

/// AI Plugin
///
/// Порядок выполнения:
/// 1. update_perception (SimulationSet::Perception)
/// 2. ai_decision (SimulationSet::Decision): переходы + GenerateInput
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                systems::update_perception.in_set(SimulationSet::Perception),
                systems::ai_decision.in_set(SimulationSet::Decision),
            ),
        );
    }
}
