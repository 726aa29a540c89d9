//! Общие правила попадания для снарядов и взрывов.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::components::{FactionTag, Health, HitRecord};

/// Skip-правила цели: owner, hit-set, фракция, мёртвые, hit cooldown
#[derive(Debug, Clone, Copy)]
pub struct HitFilter<'a> {
    pub owner: Option<Entity>,
    pub tag: Option<FactionTag>,
    pub hit_entities: &'a HashSet<Entity>,
    pub enable_friendly_fire: bool,
    pub can_hit_on_cooldown: bool,
}

impl HitFilter<'_> {
    pub fn accepts(&self, target: Entity, faction: Option<FactionTag>, health: &Health) -> bool {
        if self.owner == Some(target) {
            return false;
        }
        if self.hit_entities.contains(&target) {
            return false;
        }
        if !self.enable_friendly_fire && faction == self.tag {
            return false;
        }
        if health.is_dead {
            return false;
        }
        if health.is_on_cooldown() && !self.can_hit_on_cooldown {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HitPayload {
    pub damage: f32,
    pub record: HitRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitOutcome {
    /// Фактическое изменение здоровья (≤ 0)
    pub applied: f32,
    pub killed: bool,
}

/// Записать hit record и применить урон.
pub fn apply_hit(health: &mut Health, payload: &HitPayload, ignore_cooldown: bool) -> HitOutcome {
    let was_dead = health.is_dead;
    health.register_hit(payload.record);

    let applied = if ignore_cooldown {
        health.change_health_ignoring_cooldown(-payload.damage)
    } else {
        health.change_health(-payload.damage)
    };

    HitOutcome {
        applied,
        killed: !was_dead && health.is_dead,
    }
}
