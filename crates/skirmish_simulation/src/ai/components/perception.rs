//! Perception: что AI видит (или помнит) о ближайшем враге.

use bevy::prelude::*;

/// Сколько секунд AI помнит цель после потери видимости
pub const TARGET_MEMORY_WINDOW: f32 = 1.0;

/// Инвариант: без цели distance = f32::MAX, direction = Vec3::ZERO
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub target: Option<Entity>,
    pub distance_to_target: f32,
    pub direction_to_target: Vec3,
    pub time_since_last_saw_target: f32,
    /// Позиция цели + up offset в момент последнего наблюдения
    pub last_known_target_position: Option<Vec3>,

    // Gates (все три → цель видна)
    pub detection_radius_pass: bool,
    pub health_check_pass: bool,
    pub line_of_sight_pass: bool,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            target: None,
            distance_to_target: f32::MAX,
            direction_to_target: Vec3::ZERO,
            time_since_last_saw_target: 0.0,
            last_known_target_position: None,
            detection_radius_pass: false,
            health_check_pass: false,
            line_of_sight_pass: false,
        }
    }
}

impl Perception {
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn gates_pass(&self) -> bool {
        self.detection_radius_pass && self.health_check_pass && self.line_of_sight_pass
    }

    pub fn set_gates(&mut self, radius: bool, alive: bool, line_of_sight: bool) {
        self.detection_radius_pass = radius;
        self.health_check_pass = alive;
        self.line_of_sight_pass = line_of_sight;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Цель видна: live значения, таймер памяти в 0
    pub fn see_target(&mut self, target: Entity, distance: f32, direction: Vec3, last_known: Vec3) {
        self.target = Some(target);
        self.distance_to_target = distance;
        self.direction_to_target = direction;
        self.time_since_last_saw_target = 0.0;
        self.last_known_target_position = Some(last_known);
    }

    /// Цель не видна в этом тике. После окна памяти: полный reset.
    pub fn lose_sight(&mut self, delta: f32) {
        self.time_since_last_saw_target += delta;
        if self.last_known_target_position.is_some()
            && self.time_since_last_saw_target >= TARGET_MEMORY_WINDOW
        {
            self.reset();
        }
    }
}
