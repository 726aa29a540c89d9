//! Combat events (ECS → движок / UI / звук).

use bevy::prelude::*;

/// Событие: урон нанесен
///
/// `source`: снаряд или взрыв, `attacker`: стрелок (если известен).
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub source: Entity,
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

#[derive(Event, Debug, Clone)]
pub struct ProjectileSpawned {
    pub projectile: Entity,
    pub owner: Option<Entity>,
    pub prefab: Option<String>,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Event, Debug, Clone)]
pub struct ProjectileDestroyed {
    pub projectile: Entity,
    pub position: Vec3,
    pub hit_count: u32,
}

#[derive(Event, Debug, Clone)]
pub struct ExplosionSpawned {
    pub explosion: Entity,
    pub owner: Option<Entity>,
    pub position: Vec3,
    pub radius: f32,
}

/// Запрос визуального эффекта (hit FX, explosion FX). Рендер на стороне движка.
#[derive(Event, Debug, Clone)]
pub struct EffectRequested {
    pub prefab: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}
