//! Spawn helpers для снарядов и взрывов (через Commands).
//!
//! События (ProjectileSpawned / ExplosionSpawned) пишет вызывающая сторона.

use std::sync::Arc;

use bevy::prelude::*;

use crate::components::FactionTag;
use crate::config::WeaponConfig;

use super::explosion::Explosion;
use super::projectile::Projectile;

pub fn spawn_projectile(
    commands: &mut Commands,
    weapon: &Arc<WeaponConfig>,
    tag: Option<FactionTag>,
    owner: Option<Entity>,
    pose: Transform,
    aim_position: Option<Vec3>,
) -> Entity {
    let projectile = Projectile::from_weapon(weapon.clone(), tag, owner, aim_position);
    let transform = Transform::from_translation(pose.translation)
        .with_rotation(pose.rotation)
        .with_scale(Vec3::splat(projectile.scale));

    commands.spawn((transform, projectile)).id()
}

pub fn spawn_explosion(commands: &mut Commands, explosion: Explosion, position: Vec3) -> Entity {
    let transform = Transform::from_translation(position).with_scale(Vec3::splat(explosion.scale));
    commands.spawn((transform, explosion)).id()
}
