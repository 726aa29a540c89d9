//! Actor lifecycle events.

use bevy::prelude::*;

/// Событие: актор появился в мире (spawn_actor / Spawner / Simulation::create)
#[derive(Event, Debug, Clone)]
pub struct ActorSpawned {
    pub entity: Entity,
    pub name: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    /// Смерть + истёк grace period
    Died,
    /// Явное удаление (Simulation::destroy)
    Removed,
}

/// Событие: актор удалён из мира
#[derive(Event, Debug, Clone)]
pub struct ActorDestroyed {
    pub entity: Entity,
    pub reason: DestroyReason,
}
