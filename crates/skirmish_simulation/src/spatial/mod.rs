//! Spatial oracle: black-box интерфейс к физике движка.
//!
//! Core использует его для:
//! - line-of-sight (perception)
//! - obstacle collision (projectiles)
//! - ground probe (patrol points, spawners)
//!
//! Реальная реализация живёт на стороне движка. Здесь: `OpenField` (пустая
//! плоскость) и `ObstacleField` (набор AABB стен) для headless симуляции и тестов.

use bevy::prelude::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Касание границами считается пересечением
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Параметр t ∈ [0, 1] первого входа отрезка `from → to` в box
    pub fn segment_entry(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let delta = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let d = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t1 = (lo - origin) * inv;
            let mut t2 = (hi - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Результат raycast: точка и (если известна) entity, владеющая collider'ом
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub entity: Option<Entity>,
}

pub trait SpatialOracle: Send + Sync {
    /// Первое препятствие на отрезке `from → to`
    fn raycast_obstacle(&self, from: Vec3, to: Vec3) -> Option<RayHit>;

    /// Entities, чьи collider'ы пересекают сферу
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Entity>;

    /// Точка земли под `point` (None = нет земли, например обрыв)
    fn ground_probe(&self, point: Vec3) -> Option<Vec3>;
}

/// Spatial oracle как Resource (trait object)
#[derive(Resource)]
pub struct SpatialService(pub Box<dyn SpatialOracle>);

impl SpatialService {
    pub fn new(oracle: impl SpatialOracle + 'static) -> Self {
        Self(Box::new(oracle))
    }

    pub fn oracle(&self) -> &dyn SpatialOracle {
        self.0.as_ref()
    }
}

impl Default for SpatialService {
    fn default() -> Self {
        Self::new(OpenField::default())
    }
}

/// Плоская земля без препятствий
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField {
    pub ground_height: f32,
}

impl SpatialOracle for OpenField {
    fn raycast_obstacle(&self, _from: Vec3, _to: Vec3) -> Option<RayHit> {
        None
    }

    fn overlap_sphere(&self, _center: Vec3, _radius: f32) -> Vec<Entity> {
        Vec::new()
    }

    fn ground_probe(&self, point: Vec3) -> Option<Vec3> {
        Some(Vec3::new(point.x, self.ground_height, point.z))
    }
}

/// Стена (AABB), опционально привязанная к entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub entity: Option<Entity>,
}

/// Набор AABB препятствий + конечная плоская земля
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
    pub ground_height: f32,
    /// Если задано: земля существует только внутри этих XZ границ
    pub ground_bounds: Option<Aabb>,
}

impl ObstacleField {
    pub fn with_wall(mut self, bounds: Aabb, entity: Option<Entity>) -> Self {
        self.obstacles.push(Obstacle { bounds, entity });
        self
    }
}

impl SpatialOracle for ObstacleField {
    fn raycast_obstacle(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
        self.obstacles
            .iter()
            .filter_map(|obstacle| {
                obstacle
                    .bounds
                    .segment_entry(from, to)
                    .map(|t| (t, obstacle.entity))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, entity)| RayHit {
                point: from.lerp(to, t),
                entity,
            })
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Entity> {
        self.obstacles
            .iter()
            .filter(|obstacle| {
                let closest = center.clamp(obstacle.bounds.min, obstacle.bounds.max);
                closest.distance_squared(center) <= radius * radius
            })
            .filter_map(|obstacle| obstacle.entity)
            .collect()
    }

    fn ground_probe(&self, point: Vec3) -> Option<Vec3> {
        if let Some(bounds) = &self.ground_bounds {
            let inside_xz = point.x >= bounds.min.x
                && point.x <= bounds.max.x
                && point.z >= bounds.min.z
                && point.z <= bounds.max.z;
            if !inside_xz {
                return None;
            }
        }
        Some(Vec3::new(point.x, self.ground_height, point.z))
    }
}
