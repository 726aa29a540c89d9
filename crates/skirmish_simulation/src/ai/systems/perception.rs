//! Perception system: nearest hostile + три gate'а (radius, liveness, LOS).

use bevy::prelude::*;

use crate::ai::components::{Behavior, Perception};
use crate::components::{Actor, AiControlled, Faction, FactionTag, Health};
use crate::spatial::{SpatialOracle, SpatialService};
use crate::DeltaTime;

/// Высота "глаз" над pivot для LOS и last-known позиции
pub const EYE_HEIGHT: f32 = 1.0;

/// Кандидат в цели (снимок одного Actor)
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate {
    pub entity: Entity,
    pub position: Vec3,
    pub faction: Option<FactionTag>,
    pub alive: bool,
}

/// Ближайший враг: другая фракция, живой, не сам.
///
/// Strict `<`: при равных дистанциях выигрывает первый в порядке итерации.
pub fn find_nearest_hostile(
    self_entity: Entity,
    self_position: Vec3,
    self_faction: Option<FactionTag>,
    candidates: impl IntoIterator<Item = TargetCandidate>,
) -> Option<(TargetCandidate, f32)> {
    let mut nearest: Option<TargetCandidate> = None;
    let mut min_distance = f32::MAX;

    for candidate in candidates {
        if candidate.entity == self_entity {
            continue;
        }
        if candidate.faction == self_faction {
            continue;
        }
        if !candidate.alive {
            continue;
        }

        let distance = self_position.distance(candidate.position);
        if distance < min_distance {
            min_distance = distance;
            nearest = Some(candidate);
        }
    }

    nearest.map(|candidate| (candidate, min_distance))
}

/// LOS с up-offset. Препятствием, которое является самой целью, обзор не блокируется.
pub fn has_line_of_sight(spatial: &dyn SpatialOracle, from: Vec3, target: Entity, to: Vec3) -> bool {
    let eye = Vec3::Y * EYE_HEIGHT;
    match spatial.raycast_obstacle(from + eye, to + eye) {
        None => true,
        Some(hit) => hit.entity == Some(target),
    }
}

/// AI Perception phase (до ai_decision)
pub fn update_perception(
    delta: Res<DeltaTime>,
    spatial: Res<SpatialService>,
    mut observers: Query<
        (
            Entity,
            &Transform,
            &Behavior,
            &mut Perception,
            Option<&Faction>,
            Option<&Health>,
        ),
        With<AiControlled>,
    >,
    actors: Query<(Entity, &Transform, Option<&Faction>, Option<&Health>), With<Actor>>,
) {
    let dt = delta.0;

    for (entity, transform, behavior, mut perception, faction, health) in observers.iter_mut() {
        if health.is_some_and(|h| h.is_dead) {
            perception.reset();
            continue;
        }

        let position = transform.translation;
        let candidates = actors.iter().map(|(candidate, t, f, h)| TargetCandidate {
            entity: candidate,
            position: t.translation,
            faction: f.map(|f| f.0),
            alive: h.map_or(true, |h| h.is_alive()),
        });

        let Some((target, distance)) =
            find_nearest_hostile(entity, position, faction.map(|f| f.0), candidates)
        else {
            perception.set_gates(false, false, false);
            perception.lose_sight(dt);
            continue;
        };

        let radius_pass = distance <= behavior.detection_radius;
        let alive_pass = target.alive;
        let los_pass = has_line_of_sight(spatial.oracle(), position, target.entity, target.position);
        perception.set_gates(radius_pass, alive_pass, los_pass);

        if perception.gates_pass() {
            let direction = (target.position - position).normalize_or_zero();
            perception.see_target(
                target.entity,
                distance,
                direction,
                target.position + Vec3::Y * EYE_HEIGHT,
            );
        } else {
            perception.lose_sight(dt);
        }
    }
}
