//! AI components

pub mod behavior;
pub mod perception;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod perception_tests;

// Re-export all components
pub use behavior::*;
pub use perception::*;
