//! ECS Components, общие для всех доменов
//!
//! Организация:
//! - actor: Actor, Faction, Health, Hitbox, Mover, Aimer, control markers
//! - input: ActionInput (intent record игрока и AI)
//!
//! Доменные компоненты живут рядом со своими системами:
//! ai (Behavior, Perception, AiStateMachine), combat (Attacker, Projectile, Explosion).

pub mod actor;
pub mod input;

pub use actor::*;
pub use input::*;
