//! Weapon и Explosion конфиги: immutable templates.
//!
//! Runtime state (таймеры, hit-sets) живёт отдельно: `AttackerState`, `Projectile`, `Explosion`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Порядок переключения spawn origins внутри атаки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum OriginCycleMode {
    /// Все origins стреляют одновременно
    #[default]
    None,
    /// 0, 1, .., n-1, 0, 1, ..
    Reset,
    /// 0, 1, .., n-1, n-2, .., 0, 1, ..
    PingPong,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ScatterType {
    #[default]
    None,
    /// Uniform в [-angle/2, +angle/2], заново для каждого выстрела
    Random,
    /// Равномерный веер, симметричный относительно forward
    Cone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub enable_friendly_fire: bool,
    pub can_hit_on_cooldown: bool,
    pub ignore_hit_fx: bool,

    // Timing
    pub attack_cooldown: f32,
    pub projectile_count: u32,
    /// 0 = multi-shot (весь projectile_count за один проход)
    pub projectile_cooldown: f32,
    pub burst_count: u32,
    pub burst_cooldown: f32,
    pub hold_burst_transform: bool,

    // Scatter / origins
    /// Градусы
    pub scatter_angle: f32,
    pub scatter_type: ScatterType,
    pub origin_cycle_mode: OriginCycleMode,
    pub switch_after_each_shot: bool,

    // Projectile
    pub projectile_prefab: Option<String>,
    pub hit_fx_prefab: Option<String>,
    pub damage: f32,
    pub speed: f32,
    pub lifetime: f32,
    pub penetration_count: u32,
    pub hitbox_enable_delay: f32,
    /// Полный размер AABB снаряда (метры)
    pub hitbox_size: [f32; 3],
    pub scale: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub push_force: f32,
    pub push_upwards_mod: f32,
    pub homing: bool,
    /// Доля поворота к цели за секунду fixed step
    pub homing_turn_rate: f32,

    pub explosion: Option<ExplosionConfig>,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            enable_friendly_fire: false,
            can_hit_on_cooldown: false,
            ignore_hit_fx: false,
            attack_cooldown: 1.0,
            projectile_count: 1,
            projectile_cooldown: 1.0,
            burst_count: 1,
            burst_cooldown: 1.0,
            hold_burst_transform: false,
            scatter_angle: 0.0,
            scatter_type: ScatterType::None,
            origin_cycle_mode: OriginCycleMode::None,
            switch_after_each_shot: false,
            projectile_prefab: None,
            hit_fx_prefab: None,
            damage: 10.0,
            speed: 10.0,
            lifetime: 1.0,
            penetration_count: 0,
            hitbox_enable_delay: 0.0,
            hitbox_size: [0.2, 0.2, 0.2],
            scale: 1.0,
            knockback_force: 0.0,
            knockback_duration: 0.0,
            push_force: 1.0,
            push_upwards_mod: 1.0,
            homing: false,
            homing_turn_rate: 5.0,
            explosion: None,
        }
    }
}

impl WeaponConfig {
    pub fn hitbox_half_extents(&self) -> Vec3 {
        Vec3::from_array(self.hitbox_size) * 0.5 * self.scale
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: &str| Err(ConfigError::invalid("weapon", "", reason));

        if self.projectile_count == 0 {
            return fail("projectile_count must be at least 1");
        }
        if self.burst_count == 0 {
            return fail("burst_count must be at least 1");
        }
        if self.lifetime <= 0.0 {
            return fail("lifetime must be positive");
        }
        let timers = [
            self.attack_cooldown,
            self.projectile_cooldown,
            self.burst_cooldown,
            self.hitbox_enable_delay,
        ];
        if timers.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return fail("cooldowns and delays must be finite and non-negative");
        }
        if self.damage < 0.0 || !self.speed.is_finite() || self.scale <= 0.0 {
            return fail("damage, speed and scale out of range");
        }
        if let Some(explosion) = &self.explosion {
            explosion.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub enable_friendly_fire: bool,
    pub can_hit_on_cooldown: bool,
    pub ignore_hit_fx: bool,
    pub explosion_prefab: Option<String>,

    // Clone flags: значение берётся из родительского снаряда
    pub clone_scale: bool,
    pub clone_damage: bool,
    pub clone_knockback: bool,
    pub clone_push: bool,

    pub scale: f32,
    pub damage: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub push_force: f32,
    pub push_upwards_mod: f32,

    pub radius: f32,
    pub lifetime: f32,
    /// Hit area активна пока life_timer < hit_area_lifetime
    pub hit_area_lifetime: f32,
    pub distance_mult: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            enable_friendly_fire: false,
            can_hit_on_cooldown: false,
            ignore_hit_fx: false,
            explosion_prefab: None,
            clone_scale: false,
            clone_damage: false,
            clone_knockback: false,
            clone_push: false,
            scale: 1.0,
            damage: 10.0,
            knockback_force: 0.0,
            knockback_duration: 0.0,
            push_force: 1.0,
            push_upwards_mod: 1.0,
            radius: 1.0,
            lifetime: 1.0,
            hit_area_lifetime: 0.5,
            distance_mult: 1.0,
        }
    }
}

impl ExplosionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return Err(ConfigError::invalid("explosion", "", "radius must be positive"));
        }
        if self.lifetime <= 0.0 || self.hit_area_lifetime < 0.0 {
            return Err(ConfigError::invalid(
                "explosion",
                "",
                "lifetime must be positive and hit_area_lifetime non-negative",
            ));
        }
        Ok(())
    }
}
