//! Actor и AI конфиги

use serde::{Deserialize, Serialize};

use super::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub speed: f32,
    /// Градусы в секунду
    pub rotation_speed: f32,
    pub max_health: f32,
    pub hit_cooldown: f32,
    /// Полный размер AABB hitbox
    pub hitbox_size: [f32; 3],
    pub hitbox_offset: [f32; 3],
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            rotation_speed: 720.0,
            max_health: 100.0,
            hit_cooldown: 0.25,
            hitbox_size: [1.0, 2.0, 1.0],
            hitbox_offset: [0.0, 1.0, 0.0],
        }
    }
}

impl ActorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0.0 {
            return Err(ConfigError::invalid("actor", "", "max_health must be positive"));
        }
        if self.speed < 0.0 || self.hit_cooldown < 0.0 {
            return Err(ConfigError::invalid(
                "actor",
                "",
                "speed and hit_cooldown must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Параметры AI поведения (копируются в `Behavior` при спавне)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub detection_radius: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Границы случайной задержки Chase → Attack (0 = отключено)
    pub chase_attack_min_time: f32,
    pub chase_attack_max_time: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_radius: 10.0,
            attack_range: 5.0,
            attack_cooldown: 1.0,
            chase_attack_min_time: 1.0,
            chase_attack_max_time: 3.0,
        }
    }
}

impl AIConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection_radius < 0.0 || self.attack_range < 0.0 || self.attack_cooldown < 0.0 {
            return Err(ConfigError::invalid(
                "ai",
                "",
                "radii and cooldowns must be non-negative",
            ));
        }
        if self.chase_attack_min_time > self.chase_attack_max_time {
            return Err(ConfigError::invalid(
                "ai",
                "",
                "chase_attack_min_time exceeds chase_attack_max_time",
            ));
        }
        Ok(())
    }
}
