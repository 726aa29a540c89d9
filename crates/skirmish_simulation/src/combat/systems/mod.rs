//! Combat systems: attack resolver + projectile/explosion resolution

pub mod attack;
pub mod resolution;


pub use attack::resolve_attacks;
pub use resolution::{clear_hit_flags, resolve_combat, OBSTACLE_PROBE_LENGTH};
