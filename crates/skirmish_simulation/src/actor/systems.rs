//! Actor systems: health timers, kinematic movement, aim rotation, cleanup.

use bevy::prelude::*;

use crate::components::{ActionInput, Actor, Aimer, Health, Mover};
use crate::logger::{log_with_source, LogLevel};
use crate::DeltaTime;

use super::events::{ActorDestroyed, ActorSpawned, DestroyReason};

pub fn announce_spawned_actors(
    spawned: Query<(Entity, &Actor, &Transform), Added<Actor>>,
    mut events: EventWriter<ActorSpawned>,
) {
    for (entity, actor, transform) in spawned.iter() {
        log_with_source(
            LogLevel::Info,
            "ActorSystem",
            &format!("{} spawned at {:?} ({:?})", actor.name, transform.translation, entity),
        );
        events.write(ActorSpawned {
            entity,
            name: actor.name.clone(),
            position: transform.translation,
        });
    }
}

/// Decay hit cooldown + dead grace таймеров
pub fn tick_health(delta: Res<DeltaTime>, mut healths: Query<&mut Health>) {
    for mut health in healths.iter_mut() {
        health.tick(delta.0);
    }
}

/// Мёртвые акторы с истёкшим grace period удаляются
pub fn despawn_dead_actors(
    mut commands: Commands,
    actors: Query<(Entity, &Actor, &Health)>,
    mut events: EventWriter<ActorDestroyed>,
) {
    for (entity, actor, health) in actors.iter() {
        if !health.needs_removal() {
            continue;
        }

        log_with_source(
            LogLevel::Debug,
            "ActorSystem",
            &format!("Despawning dead {} ({:?})", actor.name, entity),
        );
        commands.entity(entity).despawn();
        events.write(ActorDestroyed {
            entity,
            reason: DestroyReason::Died,
        });
    }
}

/// Кинематика: movement (XZ, длина ≤ 1) × speed
pub fn apply_movement(
    delta: Res<DeltaTime>,
    mut movers: Query<(&mut Transform, &Mover, &ActionInput, Option<&Health>)>,
) {
    for (mut transform, mover, input, health) in movers.iter_mut() {
        if health.is_some_and(|h| h.is_dead) {
            continue;
        }

        let movement = input.movement.clamp_length_max(1.0);
        if movement == Vec2::ZERO {
            continue;
        }
        transform.translation += Vec3::new(movement.x, 0.0, movement.y) * mover.speed * delta.0;
    }
}

/// Yaw к aim position (если aim held), иначе по направлению движения.
/// Скорость поворота ограничена `rotation_speed`.
pub fn apply_aim(
    delta: Res<DeltaTime>,
    mut aimers: Query<(&mut Transform, &Aimer, &ActionInput, Option<&Health>)>,
) {
    for (mut transform, aimer, input, health) in aimers.iter_mut() {
        if health.is_some_and(|h| h.is_dead) {
            continue;
        }

        let Some(direction) = facing_direction(transform.translation, input) else {
            continue;
        };

        let desired = yaw_rotation(direction);
        let max_step = aimer.rotation_speed.to_radians() * delta.0;
        transform.rotation = rotate_towards(transform.rotation, desired, max_step);
    }
}

/// Направление взгляда в плоскости XZ
pub fn facing_direction(position: Vec3, input: &ActionInput) -> Option<Vec2> {
    let direction = match (input.aim.held, input.aim_position) {
        (true, Some(target)) => Vec2::new(target.x - position.x, target.z - position.z),
        _ => input.movement,
    };
    (direction.length_squared() > f32::EPSILON).then(|| direction.normalize())
}

/// Поворот, при котором forward (-Z) смотрит вдоль `direction` (x, z)
pub fn yaw_rotation(direction: Vec2) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.y))
}

pub fn rotate_towards(current: Quat, desired: Quat, max_step: f32) -> Quat {
    let angle = current.angle_between(desired);
    if angle <= max_step || angle <= f32::EPSILON {
        desired
    } else {
        current.slerp(desired, max_step / angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_rotation_faces_direction() {
        let rotation = yaw_rotation(Vec2::new(1.0, 0.0));
        assert!(((rotation * Vec3::NEG_Z) - Vec3::X).length() < 1e-5);

        let rotation = yaw_rotation(Vec2::new(0.0, 1.0));
        assert!(((rotation * Vec3::NEG_Z) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_rotate_towards_is_capped() {
        let desired = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let step = 0.1;
        let rotated = rotate_towards(Quat::IDENTITY, desired, step);
        assert!((rotated.angle_between(Quat::IDENTITY) - step).abs() < 1e-4);

        assert_eq!(rotate_towards(Quat::IDENTITY, desired, 10.0), desired);
    }

    #[test]
    fn test_facing_prefers_aim_over_movement() {
        let mut input = ActionInput {
            movement: Vec2::new(1.0, 0.0),
            aim_position: Some(Vec3::new(0.0, 1.0, -4.0)),
            ..default()
        };
        assert_eq!(facing_direction(Vec3::ZERO, &input), Some(Vec2::new(1.0, 0.0)));

        input.aim.held = true;
        assert_eq!(facing_direction(Vec3::ZERO, &input), Some(Vec2::new(0.0, -1.0)));

        let idle = ActionInput::default();
        assert_eq!(facing_direction(Vec3::ZERO, &idle), None);
    }
}
