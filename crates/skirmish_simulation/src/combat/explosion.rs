//! Explosion: сферическая hit area с distance falloff.
//!
//! Спавнится при уничтожении снаряда, у которого в WeaponConfig есть explosion.
//! Clone flags копируют параметры родителя; hit-set родителя переносится,
//! поэтому цель, уже поражённая снарядом, взрывом не поражается.

use std::collections::HashSet;
use std::sync::Arc;

use bevy::prelude::*;

use crate::components::FactionTag;
use crate::config::ExplosionConfig;

use super::projectile::Projectile;

#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Explosion {
    pub config: Arc<ExplosionConfig>,
    pub tag: Option<FactionTag>,
    pub owner: Option<Entity>,
    pub hit_entities: HashSet<Entity>,

    pub damage: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub push_force: f32,
    pub push_upwards_mod: f32,
    /// Только визуал; radius не масштабируется
    pub scale: f32,

    pub life_timer: f32,
}

impl Explosion {
    pub fn from_config(config: Arc<ExplosionConfig>, tag: Option<FactionTag>, owner: Option<Entity>) -> Self {
        Self {
            tag,
            owner,
            hit_entities: HashSet::new(),
            damage: config.damage,
            knockback_force: config.knockback_force,
            knockback_duration: config.knockback_duration,
            push_force: config.push_force,
            push_upwards_mod: config.push_upwards_mod,
            scale: config.scale,
            life_timer: 0.0,
            config,
        }
    }

    /// Перенос clone-параметров и hit-set с родительского снаряда
    pub fn inherit_from(mut self, projectile: &Projectile) -> Self {
        if self.config.clone_scale {
            self.scale = projectile.scale;
        }
        if self.config.clone_damage {
            self.damage = projectile.damage;
        }
        if self.config.clone_knockback {
            self.knockback_force = projectile.knockback_force;
            self.knockback_duration = projectile.knockback_duration;
        }
        if self.config.clone_push {
            self.push_force = projectile.push_force;
            self.push_upwards_mod = projectile.push_upwards_mod;
        }
        self.hit_entities = projectile.hit_entities.clone();
        self
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn hit_area_active(&self) -> bool {
        self.life_timer < self.config.hit_area_lifetime
    }

    pub fn needs_destroy(&self) -> bool {
        self.life_timer >= self.config.lifetime
    }

    pub fn falloff(&self, distance: f32) -> f32 {
        falloff_multiplier(distance, self.config.radius, self.config.distance_mult)
    }
}

/// Множитель урона по дистанции: (d / r) × mult, округлённый до сотых.
///
/// Растёт к краю радиуса (в центре = 0).
pub fn falloff_multiplier(distance: f32, radius: f32, distance_mult: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    ((distance / radius) * distance_mult * 100.0).round() / 100.0
}
