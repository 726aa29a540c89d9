//! Projectile & Explosion resolution.
//!
//! Порядок в тике:
//! 1. clear_hit_flags: сброс Health::is_hit с прошлого тика
//! 2. resolve_combat: сначала все снаряды (движение, AABB hit, obstacle probe,
//!    уничтожение + спавн взрыва), затем все взрывы (radius hit, falloff, lifetime)
//!
//! Взрыв, созданный в этом тике через Commands, начинает проверку попаданий в следующем.

use std::sync::Arc;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::events::{
    DamageDealt, EffectRequested, EntityDied, ExplosionSpawned, ProjectileDestroyed,
};
use crate::combat::explosion::Explosion;
use crate::combat::hit::{apply_hit, HitFilter, HitOutcome, HitPayload};
use crate::combat::projectile::Projectile;
use crate::combat::spawn::spawn_explosion;
use crate::components::{Faction, Health, HitRecord, Hitbox};
use crate::logger::{log_with_source, LogLevel};
use crate::spatial::SpatialService;
use crate::{DeltaTime, FixedTimestep};

/// Длина obstacle probe за снарядом (вдоль -forward)
pub const OBSTACLE_PROBE_LENGTH: f32 = 1.0;

/// Цели без Hitbox не поражаются
type Targets<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static mut Health, &'static Hitbox, Option<&'static Faction>),
    (Without<Projectile>, Without<Explosion>),
>;

#[derive(SystemParam)]
pub struct CombatEvents<'w> {
    damage: EventWriter<'w, DamageDealt>,
    died: EventWriter<'w, EntityDied>,
    projectile_destroyed: EventWriter<'w, ProjectileDestroyed>,
    explosion_spawned: EventWriter<'w, ExplosionSpawned>,
    effects: EventWriter<'w, EffectRequested>,
}

impl CombatEvents<'_> {
    fn report_hit(&mut self, source: Entity, attacker: Option<Entity>, target: Entity, outcome: HitOutcome) {
        self.damage.write(DamageDealt {
            source,
            attacker,
            target,
            damage: -outcome.applied,
            target_died: outcome.killed,
        });

        if outcome.killed {
            log_with_source(
                LogLevel::Info,
                "CombatSystem",
                &format!("{:?} killed by {:?}", target, attacker),
            );
            self.died.write(EntityDied {
                entity: target,
                killer: attacker,
            });
        }
    }

    fn request_effect(&mut self, prefab: Option<&String>, position: Vec3, rotation: Quat, scale: f32) {
        if let Some(prefab) = prefab {
            self.effects.write(EffectRequested {
                prefab: prefab.clone(),
                position,
                rotation,
                scale,
            });
        }
    }
}

/// Hit flag: импульс длиной в один тик
pub fn clear_hit_flags(mut healths: Query<&mut Health>) {
    for mut health in healths.iter_mut() {
        if health.is_hit {
            health.is_hit = false;
        }
    }
}

pub fn resolve_combat(
    mut commands: Commands,
    delta: Res<DeltaTime>,
    fixed: Res<FixedTimestep>,
    spatial: Res<SpatialService>,
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile), Without<Explosion>>,
    mut explosions: Query<(Entity, &Transform, &mut Explosion), Without<Projectile>>,
    mut targets: Targets,
    mut events: CombatEvents,
) {
    let dt = delta.0;

    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        projectile.advance(&mut transform, dt, fixed.0);

        if projectile.hitbox_active() {
            resolve_projectile_hit(entity, &transform, &mut projectile, &mut targets, &mut events);
        }

        let position = transform.translation;
        let forward = transform.forward().as_vec3();
        let mut hit_obstacle = false;
        if let Some(hit) = spatial
            .oracle()
            .raycast_obstacle(position - forward * OBSTACLE_PROBE_LENGTH, position)
        {
            // Собственный collider стрелка не считается препятствием
            if hit.entity.is_none() || hit.entity != projectile.owner {
                projectile.register_hit(None);
                hit_obstacle = true;
                if !projectile.ignore_hit_fx {
                    events.request_effect(
                        projectile.weapon.hit_fx_prefab.as_ref(),
                        hit.point,
                        transform.rotation,
                        projectile.scale,
                    );
                }
            }
        }

        if !hit_obstacle && !projectile.needs_destroy() {
            continue;
        }

        commands.entity(entity).despawn();
        events.projectile_destroyed.write(ProjectileDestroyed {
            projectile: entity,
            position,
            hit_count: projectile.hit_count,
        });

        if let Some(config) = &projectile.weapon.explosion {
            let explosion = Explosion::from_config(Arc::new(config.clone()), projectile.tag, projectile.owner)
                .inherit_from(&projectile);
            let radius = explosion.radius();
            let scale = explosion.scale;
            let owner = explosion.owner;
            let spawned = spawn_explosion(&mut commands, explosion, position);

            events.explosion_spawned.write(ExplosionSpawned {
                explosion: spawned,
                owner,
                position,
                radius,
            });
            events.request_effect(config.explosion_prefab.as_ref(), position, Quat::IDENTITY, scale);
        }
    }

    for (entity, transform, mut explosion) in explosions.iter_mut() {
        if explosion.hit_area_active() {
            resolve_explosion_hits(entity, transform.translation, &mut explosion, &mut targets, &mut events);
        }

        explosion.life_timer += dt;
        if explosion.needs_destroy() {
            commands.entity(entity).despawn();
        }
    }
}

/// Первая новая цель, чей AABB пересекает снаряд. Не больше одной за тик.
fn resolve_projectile_hit(
    source: Entity,
    transform: &Transform,
    projectile: &mut Projectile,
    targets: &mut Targets,
    events: &mut CombatEvents,
) {
    let bounds = projectile.bounds(transform);

    for (target, target_transform, mut health, hitbox, faction) in targets.iter_mut() {
        let filter = HitFilter {
            owner: projectile.owner,
            tag: projectile.tag,
            hit_entities: &projectile.hit_entities,
            enable_friendly_fire: projectile.enable_friendly_fire,
            can_hit_on_cooldown: projectile.can_hit_on_cooldown,
        };
        if !filter.accepts(target, faction.map(|f| f.0), &health) {
            continue;
        }

        if !bounds.intersects(&hitbox.bounds(target_transform.translation)) {
            continue;
        }

        let direction = (hitbox.center(target_transform.translation) - transform.translation).normalize_or_zero();
        let payload = HitPayload {
            damage: projectile.damage,
            record: HitRecord {
                position: transform.translation,
                direction,
                ignore_fx: projectile.ignore_hit_fx,
                knockback_force: projectile.knockback_force,
                knockback_duration: projectile.knockback_duration,
                push_force: projectile.push_force,
                push_upwards_mod: projectile.push_upwards_mod,
            },
        };

        let outcome = apply_hit(&mut health, &payload, projectile.can_hit_on_cooldown);
        projectile.register_hit(Some(target));
        events.report_hit(source, projectile.owner, target, outcome);

        if !projectile.ignore_hit_fx {
            events.request_effect(
                projectile.weapon.hit_fx_prefab.as_ref(),
                transform.translation,
                transform.rotation,
                projectile.scale,
            );
        }
        break;
    }
}

/// Все цели в радиусе (центр–центр), урон/knockback/push × falloff
fn resolve_explosion_hits(
    source: Entity,
    center: Vec3,
    explosion: &mut Explosion,
    targets: &mut Targets,
    events: &mut CombatEvents,
) {
    let config = explosion.config.clone();

    for (target, target_transform, mut health, hitbox, faction) in targets.iter_mut() {
        let filter = HitFilter {
            owner: explosion.owner,
            tag: explosion.tag,
            hit_entities: &explosion.hit_entities,
            enable_friendly_fire: config.enable_friendly_fire,
            can_hit_on_cooldown: config.can_hit_on_cooldown,
        };
        if !filter.accepts(target, faction.map(|f| f.0), &health) {
            continue;
        }

        let target_center = hitbox.center(target_transform.translation);
        let distance = center.distance(target_center);
        if distance > explosion.radius() {
            continue;
        }

        let falloff = explosion.falloff(distance);
        let payload = HitPayload {
            damage: explosion.damage * falloff,
            record: HitRecord {
                position: center,
                direction: (target_center - center).normalize_or_zero(),
                ignore_fx: config.ignore_hit_fx,
                knockback_force: explosion.knockback_force * falloff,
                knockback_duration: explosion.knockback_duration,
                push_force: explosion.push_force * falloff,
                push_upwards_mod: explosion.push_upwards_mod,
            },
        };

        let outcome = apply_hit(&mut health, &payload, config.can_hit_on_cooldown);
        explosion.hit_entities.insert(target);
        events.report_hit(source, explosion.owner, target, outcome);
    }
}
