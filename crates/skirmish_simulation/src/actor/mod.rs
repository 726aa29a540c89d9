//! Actor domain: сборка акторов из capability-модулей и их базовые системы
//!
//! Содержит:
//! - ActorTemplate / ActorModule / spawn_actor
//! - Системы Health / Mover / Aimer / cleanup мёртвых
//! - Spawner (периодический спавн по шаблонам)
//! - ActorSpawned / ActorDestroyed события

use bevy::prelude::*;

use crate::SimulationSet;

pub mod events;
pub mod spawner;
pub mod systems;
pub mod template;

pub use events::{ActorDestroyed, ActorSpawned, DestroyReason};
pub use spawner::{pick_spawn_pose, tick_spawners, SpawnPlacement, Spawner};
pub use systems::{
    announce_spawned_actors, apply_aim, apply_movement, despawn_dead_actors, tick_health,
};
pub use template::{spawn_actor, ActorModule, ActorTemplate};

/// Actor Plugin
///
/// Порядок выполнения (SimulationSet::Actors):
/// 1. announce_spawned_actors: ActorSpawned для новых Actor
/// 2. tick_health: decay hit cooldown / dead grace
/// 3. despawn_dead_actors: grace истёк → despawn + ActorDestroyed
/// 4. apply_movement → apply_aim
///
/// SimulationSet::Spawners: tick_spawners
pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActorSpawned>().add_event::<ActorDestroyed>();

        app.add_systems(
            Update,
            (
                (
                    systems::announce_spawned_actors,
                    systems::tick_health,
                    systems::despawn_dead_actors,
                    systems::apply_movement,
                    systems::apply_aim,
                )
                    .chain()
                    .in_set(SimulationSet::Actors),
                spawner::tick_spawners.in_set(SimulationSet::Spawners),
            ),
        );
    }
}
