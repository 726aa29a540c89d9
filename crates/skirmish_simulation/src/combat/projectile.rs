//! Projectile: летящий снаряд с AABB hitbox, hit-set и penetration budget.

use std::collections::HashSet;
use std::sync::Arc;

use bevy::prelude::*;

use crate::components::FactionTag;
use crate::config::WeaponConfig;
use crate::spatial::Aabb;

#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Projectile {
    pub weapon: Arc<WeaponConfig>,
    pub tag: Option<FactionTag>,
    pub owner: Option<Entity>,
    /// Каждый target получает не больше одного попадания за жизнь снаряда
    pub hit_entities: HashSet<Entity>,

    pub damage: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub push_force: f32,
    pub push_upwards_mod: f32,
    pub scale: f32,

    pub speed: f32,
    pub lifetime: f32,
    pub life_timer: f32,
    pub penetration_budget: u32,
    pub hit_count: u32,

    /// Точка наведения (aim position стрелка на момент выстрела)
    pub homing_target: Option<Vec3>,

    pub can_hit_on_cooldown: bool,
    pub ignore_hit_fx: bool,
    pub enable_friendly_fire: bool,
    pub half_extents: Vec3,
    pub hitbox_enable_delay: f32,
}

impl Projectile {
    pub fn from_weapon(
        weapon: Arc<WeaponConfig>,
        tag: Option<FactionTag>,
        owner: Option<Entity>,
        aim_position: Option<Vec3>,
    ) -> Self {
        Self {
            tag,
            owner,
            hit_entities: HashSet::new(),
            damage: weapon.damage,
            knockback_force: weapon.knockback_force,
            knockback_duration: weapon.knockback_duration,
            push_force: weapon.push_force,
            push_upwards_mod: weapon.push_upwards_mod,
            scale: weapon.scale,
            speed: weapon.speed,
            lifetime: weapon.lifetime,
            life_timer: 0.0,
            penetration_budget: weapon.penetration_count,
            hit_count: 0,
            homing_target: if weapon.homing { aim_position } else { None },
            can_hit_on_cooldown: weapon.can_hit_on_cooldown,
            ignore_hit_fx: weapon.ignore_hit_fx,
            enable_friendly_fire: weapon.enable_friendly_fire,
            half_extents: weapon.hitbox_half_extents(),
            hitbox_enable_delay: weapon.hitbox_enable_delay,
            weapon,
        }
    }

    pub fn needs_destroy(&self) -> bool {
        self.life_timer >= self.lifetime || self.hit_count > self.penetration_budget
    }

    pub fn hitbox_active(&self) -> bool {
        self.life_timer >= self.hitbox_enable_delay
    }

    pub fn bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center(transform.translation, self.half_extents)
    }

    /// Засчитать попадание. `None`: препятствие (стена/земля).
    pub fn register_hit(&mut self, target: Option<Entity>) {
        if let Some(target) = target {
            self.hit_entities.insert(target);
        }
        self.hit_count += 1;
    }

    /// Движение вдоль forward; homing плавно доворачивает к цели.
    pub fn advance(&mut self, transform: &mut Transform, delta: f32, fixed_delta: f32) {
        if let Some(target) = self.homing_target {
            let wanted = (target - transform.translation).normalize_or_zero();
            if wanted != Vec3::ZERO {
                let factor = (self.weapon.homing_turn_rate * fixed_delta).clamp(0.0, 1.0);
                let current = transform.forward().as_vec3();
                let steered = current.lerp(wanted, factor).normalize_or_zero();
                if steered != Vec3::ZERO {
                    transform.look_to(steered, Vec3::Y);
                }
            }
        }

        let forward = transform.forward().as_vec3();
        transform.translation += forward * self.speed * delta;
        self.life_timer += delta;
    }
}
