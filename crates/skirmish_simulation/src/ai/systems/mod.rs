//! AI systems: Perception → Decision

pub mod decision;
pub mod perception;


pub use decision::*;
pub use perception::*;
