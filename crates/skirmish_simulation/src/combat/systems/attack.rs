//! Attack resolver: ActionInput.attack → AttackerState::tick → снаряды.

use bevy::prelude::*;

use crate::combat::attacker::Attacker;
use crate::combat::events::ProjectileSpawned;
use crate::combat::spawn::spawn_projectile;
use crate::components::{ActionInput, Faction, Health};
use crate::logger::{log_with_source, LogLevel};
use crate::{DeltaTime, DeterministicRng};

pub fn resolve_attacks(
    mut commands: Commands,
    delta: Res<DeltaTime>,
    mut rng: ResMut<DeterministicRng>,
    mut attackers: Query<(
        Entity,
        &Transform,
        &mut Attacker,
        Option<&ActionInput>,
        Option<&Faction>,
        Option<&Health>,
    )>,
    mut spawned_events: EventWriter<ProjectileSpawned>,
) {
    let dt = delta.0;

    for (entity, transform, mut attacker, input, faction, health) in attackers.iter_mut() {
        if health.is_some_and(|h| h.is_dead) {
            continue;
        }

        let Some(input) = input else {
            log_with_source(
                LogLevel::Error,
                "AttackSystem",
                &format!("{:?} has Attacker but no ActionInput", entity),
            );
            continue;
        };

        let weapon = match attacker.weapon.clone() {
            Some(weapon) => match weapon.validate() {
                Ok(()) => weapon,
                Err(err) => {
                    warn_once(&mut attacker, entity, &err.to_string());
                    continue;
                }
            },
            None => {
                warn_once(&mut attacker, entity, "no weapon assigned");
                continue;
            }
        };

        let origin_count = attacker.origin_count();
        let shots = attacker.state.tick(
            &weapon,
            origin_count,
            input.attack.held,
            *transform,
            dt,
            &mut rng.rng,
        );

        for shot in &shots {
            let pose = attacker.shot_pose(shot);
            let projectile = spawn_projectile(
                &mut commands,
                &weapon,
                faction.map(|f| f.0),
                Some(entity),
                pose,
                input.aim_position,
            );

            spawned_events.write(ProjectileSpawned {
                projectile,
                owner: Some(entity),
                prefab: weapon.projectile_prefab.clone(),
                position: pose.translation,
                rotation: pose.rotation,
            });
        }
    }
}

fn warn_once(attacker: &mut Attacker, entity: Entity, reason: &str) {
    if attacker.config_warned {
        return;
    }
    attacker.config_warned = true;
    log_with_source(
        LogLevel::Warning,
        "AttackSystem",
        &format!("{:?} cannot fire: {}", entity, reason),
    );
}
