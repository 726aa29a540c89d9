//! Базовые компоненты акторов: Actor, Faction, Health, Hitbox, Mover, Aimer

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ActorConfig;
use crate::spatial::Aabb;

/// Grace period (секунды) между смертью и удалением entity из мира
pub const DEAD_GRACE_PERIOD: f32 = 2.0;

/// Актор (игрок, враг): всё, что perception может выбрать как цель
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Actor {
    /// Имя шаблона (для логов и ActorSpawned)
    pub name: String,
}

/// Фракция для friend/foe фильтрации
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum FactionTag {
    #[default]
    Default,
    Player,
    Enemy,
}

/// Entity либо несёт фракцию, либо нет: системы проверяют наличие компонента
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Faction(pub FactionTag);

/// Маркер: Input пишет device-polling система
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerControlled;

/// Маркер: Input пишет state machine (`GenerateInput`)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AiControlled;

/// Параметры последнего попадания (для knockback/ragdoll на стороне движка)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct HitRecord {
    pub position: Vec3,
    pub direction: Vec3,
    pub ignore_fx: bool,
    pub knockback_force: f32,
    pub knockback_duration: f32,
    pub push_force: f32,
    pub push_upwards_mod: f32,
}

/// Здоровье актора
///
/// Инварианты:
/// - 0 ≤ current ≤ max
/// - is_dead ⇔ current ≤ 0
///
/// Урон во время hit cooldown игнорируется (`change_health`), если вызывающий
/// явно не обходит cooldown (`change_health_ignoring_cooldown`).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    /// Длительность неуязвимости после попадания (секунды)
    pub hit_cooldown: f32,
    pub hit_cooldown_timer: f32,
    /// Попадание в этом тике (сбрасывается перед следующим resolution pass)
    pub is_hit: bool,
    pub last_hit: HitRecord,
    pub is_dead: bool,
    /// Обратный отсчёт до удаления мёртвой entity
    pub dead_timer: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0, 0.25)
    }
}

impl Health {
    pub fn new(max: f32, hit_cooldown: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            hit_cooldown: hit_cooldown.max(0.0),
            hit_cooldown_timer: 0.0,
            is_hit: false,
            last_hit: HitRecord::default(),
            is_dead: max <= 0.0,
            dead_timer: 0.0,
        }
    }

    pub fn from_config(config: &ActorConfig) -> Self {
        Self::new(config.max_health, config.hit_cooldown)
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.hit_cooldown_timer > 0.0
    }

    /// Изменяет здоровье на `value` (отрицательное = урон).
    ///
    /// Возвращает фактически применённую дельту.
    pub fn change_health(&mut self, value: f32) -> f32 {
        self.apply_change(value, true)
    }

    /// То же, что `change_health`, но урон проходит и во время hit cooldown
    pub fn change_health_ignoring_cooldown(&mut self, value: f32) -> f32 {
        self.apply_change(value, false)
    }

    fn apply_change(&mut self, value: f32, respect_cooldown: bool) -> f32 {
        if value < 0.0 {
            if self.is_dead || (respect_cooldown && self.is_on_cooldown()) {
                return 0.0;
            }
            self.is_hit = true;
            self.hit_cooldown_timer = self.hit_cooldown;
        }

        let before = self.current;
        self.current = (self.current + value).clamp(0.0, self.max);

        let was_dead = self.is_dead;
        self.is_dead = self.current <= 0.0;
        if self.is_dead && !was_dead {
            self.dead_timer = DEAD_GRACE_PERIOD;
        }

        self.current - before
    }

    pub fn register_hit(&mut self, record: HitRecord) {
        self.last_hit = record;
    }

    /// Decay таймеров (hit cooldown, dead grace)
    pub fn tick(&mut self, delta: f32) {
        if self.hit_cooldown_timer > 0.0 {
            self.hit_cooldown_timer = (self.hit_cooldown_timer - delta).max(0.0);
        }
        if self.is_dead && self.dead_timer > 0.0 {
            self.dead_timer = (self.dead_timer - delta).max(0.0);
        }
    }

    pub fn needs_removal(&self) -> bool {
        self.is_dead && self.dead_timer <= 0.0
    }
}

/// AABB hitbox актора (без учёта rotation)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Hitbox {
    pub half_extents: Vec3,
    /// Смещение центра относительно pivot (pivot обычно у ног)
    pub offset: Vec3,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            offset: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Hitbox {
    pub fn from_config(config: &ActorConfig) -> Self {
        Self {
            half_extents: Vec3::from_array(config.hitbox_size) * 0.5,
            offset: Vec3::from_array(config.hitbox_offset),
        }
    }

    pub fn center(&self, position: Vec3) -> Vec3 {
        position + self.offset
    }

    pub fn bounds(&self, position: Vec3) -> Aabb {
        Aabb::from_center(self.center(position), self.half_extents)
    }
}

/// Кинематическое перемещение по Input.movement (XZ plane)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Mover {
    /// Метры в секунду
    pub speed: f32,
}

/// Поворот актора к aim position (yaw only)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Aimer {
    /// Градусы в секунду
    pub rotation_speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(100.0, 0.0);

        let applied = health.change_health(-30.0);
        assert_eq!(applied, -30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_hit);
        assert!(health.is_alive());

        health.change_health(-500.0);
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead);
        assert_eq!(health.dead_timer, DEAD_GRACE_PERIOD);
    }

    #[test]
    fn test_health_heal_clamps_at_max() {
        let mut health = Health::new(100.0, 0.0);
        health.change_health(-50.0);
        health.change_health(80.0);
        assert_eq!(health.current, 100.0);
        assert!(!health.is_dead);
    }

    #[test]
    fn test_damage_ignored_during_hit_cooldown() {
        let mut health = Health::new(100.0, 0.25);
        health.change_health(-10.0);
        assert!(health.is_on_cooldown());

        assert_eq!(health.change_health(-10.0), 0.0);
        assert_eq!(health.current, 90.0);

        assert_eq!(health.change_health_ignoring_cooldown(-10.0), -10.0);
        assert_eq!(health.current, 80.0);

        health.tick(0.3);
        assert!(!health.is_on_cooldown());
        health.change_health(-10.0);
        assert_eq!(health.current, 70.0);
    }

    #[test]
    fn test_dead_invariant_holds_after_every_change() {
        let mut health = Health::new(50.0, 0.0);
        for delta in [-20.0, 5.0, -40.0, 100.0, -1000.0, 3.0] {
            health.change_health(delta);
            assert!(health.current >= 0.0 && health.current <= health.max);
            assert_eq!(health.is_dead, health.current <= 0.0);
        }
    }

    #[test]
    fn test_dead_entity_removed_after_grace_period() {
        let mut health = Health::new(10.0, 0.0);
        health.change_health(-10.0);
        assert!(!health.needs_removal());

        health.tick(1.0);
        assert!(!health.needs_removal());
        health.tick(1.0);
        assert!(health.needs_removal());
    }
}
