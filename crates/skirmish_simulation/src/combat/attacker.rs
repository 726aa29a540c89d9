//! Attacker: runtime state оружия (bursts, scatter, origin cycling, cooldowns).
//!
//! Архитектура:
//! - `WeaponConfig`: immutable template (Arc), общий для всех носителей
//! - `AttackerState`: per-entity таймеры и счётчики, пишет только resolve_attacks
//! - `AttackerState::tick`: чистая логика: возвращает список выстрелов за тик,
//!   спавн снарядов делает система
//!
//! Таймеры:
//! - attack_cooldown_timer: пока > 0, новые bursts ограничены burst_count
//! - burst_cooldown_timer: пауза между bursts
//! - projectile_cooldown_timer: пауза между выстрелами внутри burst

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use crate::config::{OriginCycleMode, ScatterType, WeaponConfig};

/// Один выстрел: от какого origin, от какой базовой позы, под каким углом (градусы, yaw)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub base: Transform,
    pub origin_index: usize,
    pub scatter_angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackerState {
    pub attack_cooldown_timer: f32,
    pub burst_cooldown_timer: f32,
    pub projectile_cooldown_timer: f32,
    /// Bursts, завершённые в текущем окне attack cooldown
    pub burst_count: u32,
    /// Выстрелы в текущем burst
    pub projectile_count: u32,
    pub scatter_angle: f32,
    pub origin_index: usize,
    /// +1 / -1 (PingPong)
    pub cycle_direction: i32,
    pub is_attack_triggered: bool,
    /// Поза актора на первом выстреле burst (hold_burst_transform)
    pub hold_pose: Option<Transform>,
}

impl Default for AttackerState {
    fn default() -> Self {
        Self {
            attack_cooldown_timer: 0.0,
            burst_cooldown_timer: 0.0,
            projectile_cooldown_timer: 0.0,
            burst_count: 0,
            projectile_count: 0,
            scatter_angle: 0.0,
            origin_index: 0,
            cycle_direction: 1,
            is_attack_triggered: false,
            hold_pose: None,
        }
    }
}

/// Веер Cone: (начальный угол, шаг). Симметричен относительно forward.
pub fn cone_sweep(scatter_angle: f32, projectile_count: u32) -> (f32, f32) {
    let gaps = projectile_count.saturating_sub(1);
    if gaps == 0 {
        return (0.0, 0.0);
    }
    let step = scatter_angle / gaps as f32;
    (-step * gaps as f32 / 2.0, step)
}

impl AttackerState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tick_timers(&mut self, delta: f32) {
        if self.attack_cooldown_timer > 0.0 {
            self.attack_cooldown_timer -= delta;
            if self.attack_cooldown_timer <= 0.0 {
                self.attack_cooldown_timer = 0.0;
                self.burst_count = 0;
            }
        }

        self.burst_cooldown_timer = (self.burst_cooldown_timer - delta).max(0.0);

        if self.is_attack_triggered {
            self.projectile_cooldown_timer = (self.projectile_cooldown_timer - delta).max(0.0);
        }
    }

    pub fn can_start_burst(&self, weapon: &WeaponConfig) -> bool {
        self.burst_count < weapon.burst_count && self.burst_cooldown_timer <= 0.0
    }

    /// Один проход resolver'а. `current_pose`: world transform актора в этом тике.
    pub fn tick(
        &mut self,
        weapon: &WeaponConfig,
        origin_count: usize,
        attack_held: bool,
        current_pose: Transform,
        delta: f32,
        rng: &mut impl Rng,
    ) -> Vec<ShotRequest> {
        self.tick_timers(delta);

        if !self.is_attack_triggered {
            if !(attack_held && self.can_start_burst(weapon)) {
                return Vec::new();
            }
            self.is_attack_triggered = true;
        }

        if !self.can_start_burst(weapon) || self.projectile_cooldown_timer > 0.0 {
            return Vec::new();
        }

        let origin_count = origin_count.max(1);
        let projectile_count = weapon.projectile_count.max(1);

        if self.projectile_count == 0 && weapon.hold_burst_transform {
            self.hold_pose = Some(current_pose);
        }
        let base = self.hold_pose.unwrap_or(current_pose);

        let mut shots = Vec::new();
        if weapon.projectile_cooldown > 0.0 {
            self.fire_shot(weapon, origin_count, projectile_count, base, rng, &mut shots);
            self.projectile_cooldown_timer = weapon.projectile_cooldown;
        } else {
            while self.projectile_count < projectile_count {
                self.fire_shot(weapon, origin_count, projectile_count, base, rng, &mut shots);
            }
        }

        if self.projectile_count >= projectile_count {
            self.complete_burst(weapon, origin_count);
        }

        shots
    }

    fn fire_shot(
        &mut self,
        weapon: &WeaponConfig,
        origin_count: usize,
        projectile_count: u32,
        base: Transform,
        rng: &mut impl Rng,
        shots: &mut Vec<ShotRequest>,
    ) {
        let scatter_angle = self.next_scatter_angle(weapon, projectile_count, rng);
        self.scatter_angle = scatter_angle;

        match weapon.origin_cycle_mode {
            OriginCycleMode::None => {
                shots.extend((0..origin_count).map(|origin_index| ShotRequest {
                    base,
                    origin_index,
                    scatter_angle,
                }));
            }
            mode => {
                shots.push(ShotRequest {
                    base,
                    origin_index: self.origin_index.min(origin_count - 1),
                    scatter_angle,
                });
                if weapon.switch_after_each_shot {
                    self.advance_origin(mode, origin_count);
                }
            }
        }

        self.projectile_count += 1;
    }

    fn next_scatter_angle(&self, weapon: &WeaponConfig, projectile_count: u32, rng: &mut impl Rng) -> f32 {
        match weapon.scatter_type {
            ScatterType::None => 0.0,
            ScatterType::Cone => {
                let (start, step) = cone_sweep(weapon.scatter_angle, projectile_count);
                self.cycle_direction as f32 * (start + step * self.projectile_count as f32)
            }
            ScatterType::Random => {
                let half = weapon.scatter_angle.abs() * 0.5;
                if half > 0.0 {
                    rng.gen_range(-half..=half)
                } else {
                    0.0
                }
            }
        }
    }

    fn advance_origin(&mut self, mode: OriginCycleMode, origin_count: usize) {
        if origin_count <= 1 {
            self.origin_index = 0;
            return;
        }

        match mode {
            OriginCycleMode::None => {}
            OriginCycleMode::Reset => {
                self.origin_index = (self.origin_index + 1) % origin_count;
            }
            OriginCycleMode::PingPong => {
                let next = self.origin_index as i64 + self.cycle_direction as i64;
                if next < 0 || next >= origin_count as i64 {
                    self.cycle_direction = -self.cycle_direction;
                    let bounced = self.origin_index as i64 + self.cycle_direction as i64;
                    self.origin_index = bounced.clamp(0, origin_count as i64 - 1) as usize;
                } else {
                    self.origin_index = next as usize;
                }
            }
        }
    }

    fn complete_burst(&mut self, weapon: &WeaponConfig, origin_count: usize) {
        if weapon.origin_cycle_mode != OriginCycleMode::None && !weapon.switch_after_each_shot {
            self.advance_origin(weapon.origin_cycle_mode, origin_count);
        }

        self.is_attack_triggered = false;
        self.burst_cooldown_timer = weapon.burst_cooldown;
        self.projectile_cooldown_timer = 0.0;
        self.projectile_count = 0;
        self.scatter_angle = 0.0;
        self.hold_pose = None;
        self.burst_count += 1;

        self.attack_cooldown_timer = if self.attack_cooldown_timer == 0.0 {
            weapon.attack_cooldown
        } else {
            weapon.attack_cooldown / self.burst_count as f32
        };

        // Без attack cooldown окно никогда не закроется таймером
        if self.attack_cooldown_timer <= 0.0 {
            self.attack_cooldown_timer = 0.0;
            self.burst_count = 0;
        }
    }
}

/// Оружие + spawn origins актора
#[derive(Component, Debug, Clone)]
pub struct Attacker {
    pub weapon: Option<Arc<WeaponConfig>>,
    /// Локальные позы точек вылета относительно актора (пусто = pivot актора)
    pub origins: Vec<Transform>,
    pub state: AttackerState,
    /// Предупреждение о невалидном конфиге уже залогировано
    pub config_warned: bool,
}

impl Attacker {
    pub fn new(weapon: Option<Arc<WeaponConfig>>, origins: Vec<Transform>) -> Self {
        Self {
            weapon,
            origins,
            state: AttackerState::default(),
            config_warned: false,
        }
    }

    pub fn origin_count(&self) -> usize {
        self.origins.len().max(1)
    }

    /// World поза снаряда: базовая поза × локальный origin, затем yaw scatter
    pub fn shot_pose(&self, shot: &ShotRequest) -> Transform {
        let local = self
            .origins
            .get(shot.origin_index)
            .copied()
            .unwrap_or_default();

        let mut pose = shot.base.mul_transform(local);
        pose.rotation = Quat::from_rotation_y(shot.scatter_angle.to_radians()) * pose.rotation;
        pose.scale = Vec3::ONE;
        pose
    }
}
