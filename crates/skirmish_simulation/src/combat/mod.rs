//! Combat module: weapons, projectiles, explosions
//!
//! ECS ответственность:
//! - Attacker: burst / scatter / origin cycling → ShotRequest → Projectile entities
//! - Projectile: движение, AABB hit, penetration, obstacle probe
//! - Explosion: radius hit, falloff, clone flags от родительского снаряда
//! - Events: DamageDealt, EntityDied, Projectile*/Explosion*, EffectRequested
//!
//! Физика и рендер: oracles (SpatialService) и события для движка.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod attacker;
pub mod events;
pub mod explosion;
pub mod hit;
pub mod projectile;
pub mod spawn;
pub mod systems;


// Re-export основных типов
pub use attacker::{cone_sweep, Attacker, AttackerState, ShotRequest};
pub use events::{
    DamageDealt, EffectRequested, EntityDied, ExplosionSpawned, ProjectileDestroyed,
    ProjectileSpawned,
};
pub use explosion::{falloff_multiplier, Explosion};
pub use hit::{apply_hit, HitFilter, HitOutcome, HitPayload};
pub use projectile::Projectile;
pub use spawn::{spawn_explosion, spawn_projectile};
pub use systems::{clear_hit_flags, resolve_attacks, resolve_combat};

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. resolve_attacks (SimulationSet::Attack): ActionInput → снаряды
/// 2. clear_hit_flags → resolve_combat (SimulationSet::Resolution)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ProjectileSpawned>()
            .add_event::<ProjectileDestroyed>()
            .add_event::<ExplosionSpawned>()
            .add_event::<EffectRequested>();

        app.add_systems(
            Update,
            (
                systems::resolve_attacks.in_set(SimulationSet::Attack),
                (systems::clear_hit_flags, systems::resolve_combat)
                    .chain()
                    .in_set(SimulationSet::Resolution),
            ),
        );
    }
}
