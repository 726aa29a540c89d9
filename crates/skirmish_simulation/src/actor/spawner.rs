//! Spawner: периодически создаёт акторов из набора шаблонов.
//!
//! Лимиты:
//! - total_limit: сколько всего может быть создано (None = бесконечно)
//! - alive_limit: сколько созданных может жить одновременно (None = без лимита)
//!
//! Размещение:
//! - Point: в позе спавнера, только если игрок на дистанции (min, max)
//! - Area: случайная XZ точка в box, проверка земли и свободного места

use std::collections::HashSet;

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::components::{Actor, AiControlled};
use crate::logger::{log_with_source, LogLevel};
use crate::spatial::{SpatialOracle, SpatialService};
use crate::{DeltaTime, DeterministicRng};

use super::events::ActorDestroyed;
use super::template::{spawn_actor, ActorTemplate};

/// Попыток найти свободную точку в Area за один спавн
pub const AREA_SAMPLE_ATTEMPTS: usize = 25;
/// Радиус проверки занятости точки спавна
pub const SPAWN_CLEARANCE_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPlacement {
    Point { min_distance: f32, max_distance: f32 },
    Area { half_extents: Vec3 },
}

#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Spawner {
    pub templates: Vec<ActorTemplate>,
    /// Секунды между волнами
    pub interval: f32,
    pub per_spawn: u32,
    pub total_limit: Option<u32>,
    pub alive_limit: Option<u32>,
    pub placement: SpawnPlacement,
    timer: f32,
    alive: HashSet<Entity>,
    total_spawned: u32,
}

impl Spawner {
    pub fn new(templates: Vec<ActorTemplate>, interval: f32, placement: SpawnPlacement) -> Self {
        Self {
            templates,
            interval,
            per_spawn: 1,
            total_limit: None,
            alive_limit: None,
            placement,
            timer: interval,
            alive: HashSet::new(),
            total_spawned: 0,
        }
    }

    pub fn with_per_spawn(mut self, per_spawn: u32) -> Self {
        self.per_spawn = per_spawn.max(1);
        self
    }

    pub fn with_total_limit(mut self, limit: u32) -> Self {
        self.total_limit = Some(limit);
        self
    }

    pub fn with_alive_limit(mut self, limit: u32) -> Self {
        self.alive_limit = Some(limit);
        self
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    pub fn total_spawned(&self) -> u32 {
        self.total_spawned
    }

    pub fn is_exhausted(&self) -> bool {
        self.total_limit.is_some_and(|limit| self.total_spawned >= limit)
    }

    pub fn forget(&mut self, entity: Entity) -> bool {
        self.alive.remove(&entity)
    }

    pub fn track(&mut self, entity: Entity) {
        self.alive.insert(entity);
        self.total_spawned += 1;
    }

    /// Тик таймера. Возвращает, сколько акторов создать сейчас (с учётом лимитов).
    pub fn due(&mut self, delta: f32) -> u32 {
        if self.is_exhausted() {
            return 0;
        }
        let alive = self.alive.len() as u32;
        if self.alive_limit.is_some_and(|limit| alive >= limit) {
            return 0;
        }

        if self.timer > 0.0 {
            self.timer -= delta;
        }
        if self.timer > 0.0 {
            return 0;
        }
        self.timer = self.interval;

        let mut count = self.per_spawn;
        if let Some(limit) = self.alive_limit {
            count = count.min(limit.saturating_sub(alive));
        }
        if let Some(limit) = self.total_limit {
            count = count.min(limit.saturating_sub(self.total_spawned));
        }
        count
    }
}

/// Поза нового актора или None, если свободной точки не нашлось
pub fn pick_spawn_pose(
    placement: &SpawnPlacement,
    origin: &Transform,
    player: Option<Vec3>,
    spatial: &dyn SpatialOracle,
    rng: &mut ChaCha8Rng,
) -> Option<Transform> {
    match *placement {
        SpawnPlacement::Point { .. } => Some(*origin),
        SpawnPlacement::Area { half_extents } => {
            let center = origin.translation;
            let position = (0..AREA_SAMPLE_ATTEMPTS).find_map(|_| {
                let x = center.x + rng.gen_range(-1.0_f32..=1.0) * half_extents.x;
                let z = center.z + rng.gen_range(-1.0_f32..=1.0) * half_extents.z;
                let ground = spatial.ground_probe(Vec3::new(x, center.y + half_extents.y, z))?;
                let probe = ground + Vec3::Y * SPAWN_CLEARANCE_RADIUS;
                spatial
                    .overlap_sphere(probe, SPAWN_CLEARANCE_RADIUS)
                    .is_empty()
                    .then_some(ground)
            })?;

            let facing = player
                .map(|p| Vec3::new(p.x - position.x, 0.0, p.z - position.z))
                .filter(|d| d.length_squared() > f32::EPSILON);
            let transform = match facing {
                Some(direction) => Transform::from_translation(position).looking_to(direction, Vec3::Y),
                None => Transform::from_translation(position)
                    .with_rotation(Quat::from_rotation_y(rng.gen_range(0.0..360.0_f32).to_radians())),
            };
            Some(transform)
        }
    }
}

/// Point spawner работает только когда игрок на дистанции (min, max) или игрока нет
pub fn point_gate_open(placement: &SpawnPlacement, origin: Vec3, player: Option<Vec3>) -> bool {
    match (*placement, player) {
        (SpawnPlacement::Point { min_distance, max_distance }, Some(player)) => {
            let distance = origin.distance(player);
            distance > min_distance && distance < max_distance
        }
        _ => true,
    }
}

pub fn tick_spawners(
    mut commands: Commands,
    delta: Res<DeltaTime>,
    spatial: Res<SpatialService>,
    mut rng: ResMut<DeterministicRng>,
    mut destroyed: EventReader<ActorDestroyed>,
    mut spawners: Query<(Entity, &Transform, &mut Spawner)>,
    players: Query<&Transform, (With<Actor>, Without<AiControlled>, Without<Spawner>)>,
) {
    let destroyed: Vec<Entity> = destroyed.read().map(|event| event.entity).collect();
    let player = players.iter().next().map(|t| t.translation);

    for (spawner_entity, origin, mut spawner) in spawners.iter_mut() {
        for entity in &destroyed {
            spawner.forget(*entity);
        }

        if !point_gate_open(&spawner.placement, origin.translation, player) {
            continue;
        }

        let count = spawner.due(delta.0);
        if count > 0 && spawner.templates.is_empty() {
            log_with_source(
                LogLevel::Error,
                "SpawnerSystem",
                &format!("{:?} has no templates", spawner_entity),
            );
            continue;
        }

        for _ in 0..count {
            let Some(pose) = pick_spawn_pose(&spawner.placement, origin, player, spatial.oracle(), &mut rng.rng)
            else {
                log_with_source(
                    LogLevel::Warning,
                    "SpawnerSystem",
                    &format!("{:?}: no free spawn position found", spawner_entity),
                );
                continue;
            };

            let index = rng.rng.gen_range(0..spawner.templates.len());
            let template = spawner.templates[index].clone().with_transform(pose);
            let actor = spawn_actor(&mut commands, &template);
            spawner.track(actor);
        }
    }
}
