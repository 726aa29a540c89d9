//! ActorTemplate: набор capability-модулей, из которого собирается актор.
//!
//! Каждый модуль добавляет свои компоненты; базовые (Actor, Transform,
//! ActionInput, Faction) есть у любого актора.

use std::sync::Arc;

use bevy::prelude::*;

use crate::ai::{AiStateMachine, Behavior, Perception};
use crate::combat::Attacker;
use crate::components::{
    ActionInput, Actor, Aimer, AiControlled, Faction, FactionTag, Health, Hitbox, Mover,
    PlayerControlled,
};
use crate::config::{AIConfig, ActorConfig, WeaponConfig};
use crate::logger::{log_with_source, LogLevel};

#[derive(Debug, Clone)]
pub enum ActorModule {
    /// Health + Hitbox из ActorConfig
    Health,
    Mover,
    Aimer,
    Attacker {
        weapon: Option<Arc<WeaponConfig>>,
        /// Локальные позы spawn origins
        origins: Vec<Transform>,
    },
    /// AiControlled + Behavior + Perception + AiStateMachine
    Ai(Arc<AIConfig>),
    /// PlayerControlled (input от InputService)
    PlayerInput,
}

#[derive(Debug, Clone)]
pub struct ActorTemplate {
    pub name: String,
    pub faction: Option<FactionTag>,
    pub config: Arc<ActorConfig>,
    pub transform: Transform,
    pub modules: Vec<ActorModule>,
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>, config: Arc<ActorConfig>) -> Self {
        Self {
            name: name.into(),
            faction: None,
            config,
            transform: Transform::IDENTITY,
            modules: Vec::new(),
        }
    }

    /// Игрок: здоровье, движение, прицел, оружие, device input
    pub fn player(name: impl Into<String>, config: Arc<ActorConfig>, weapon: Option<Arc<WeaponConfig>>) -> Self {
        Self::new(name, config)
            .with_faction(FactionTag::Player)
            .with_module(ActorModule::Health)
            .with_module(ActorModule::Mover)
            .with_module(ActorModule::Aimer)
            .with_module(ActorModule::Attacker {
                weapon,
                origins: Vec::new(),
            })
            .with_module(ActorModule::PlayerInput)
    }

    /// Враг под управлением AI
    pub fn enemy(
        name: impl Into<String>,
        config: Arc<ActorConfig>,
        ai: Arc<AIConfig>,
        weapon: Option<Arc<WeaponConfig>>,
    ) -> Self {
        Self::new(name, config)
            .with_faction(FactionTag::Enemy)
            .with_module(ActorModule::Health)
            .with_module(ActorModule::Mover)
            .with_module(ActorModule::Aimer)
            .with_module(ActorModule::Attacker {
                weapon,
                origins: Vec::new(),
            })
            .with_module(ActorModule::Ai(ai))
    }

    pub fn with_faction(mut self, faction: FactionTag) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(self, position: Vec3) -> Self {
        let rotation = self.transform.rotation;
        self.with_transform(Transform::from_translation(position).with_rotation(rotation))
    }

    pub fn with_module(mut self, module: ActorModule) -> Self {
        self.modules.push(module);
        self
    }

    pub fn has_ai(&self) -> bool {
        self.modules.iter().any(|m| matches!(m, ActorModule::Ai(_)))
    }

    pub fn has_player_input(&self) -> bool {
        self.modules.iter().any(|m| matches!(m, ActorModule::PlayerInput))
    }
}

/// Собрать актора из шаблона через Commands
pub fn spawn_actor(commands: &mut Commands, template: &ActorTemplate) -> Entity {
    let config = &template.config;
    let mut entity = commands.spawn((
        Actor {
            name: template.name.clone(),
        },
        template.transform,
        ActionInput::default(),
    ));

    if let Some(faction) = template.faction {
        entity.insert(Faction(faction));
    }

    // Один producer для ActionInput: AI побеждает
    let has_ai = template.has_ai();
    if has_ai && template.has_player_input() {
        log_with_source(
            LogLevel::Warning,
            "ActorSpawn",
            &format!("{}: both AI and player input modules, AI takes control", template.name),
        );
    }

    for module in &template.modules {
        match module {
            ActorModule::Health => {
                entity.insert((Health::from_config(config), Hitbox::from_config(config)));
            }
            ActorModule::Mover => {
                entity.insert(Mover {
                    speed: config.speed,
                });
            }
            ActorModule::Aimer => {
                entity.insert(Aimer {
                    rotation_speed: config.rotation_speed,
                });
            }
            ActorModule::Attacker { weapon, origins } => {
                entity.insert(Attacker::new(weapon.clone(), origins.clone()));
            }
            ActorModule::Ai(ai) => {
                entity.insert((
                    AiControlled,
                    Behavior::from_config(ai),
                    Perception::default(),
                    AiStateMachine::default(),
                ));
            }
            ActorModule::PlayerInput => {
                if !has_ai {
                    entity.insert(PlayerControlled);
                }
            }
        }
    }

    entity.id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(template: &ActorTemplate) -> (World, Entity) {
        let mut world = World::new();
        let entity = spawn_actor(&mut world.commands(), template);
        world.flush();
        (world, entity)
    }

    #[test]
    fn test_enemy_template_components() {
        let template = ActorTemplate::enemy(
            "grunt",
            Arc::new(ActorConfig::default()),
            Arc::new(AIConfig::default()),
            Some(Arc::new(WeaponConfig::default())),
        )
        .at(Vec3::new(1.0, 0.0, 2.0));
        let (world, entity) = spawn(&template);

        assert!(world.get::<AiControlled>(entity).is_some());
        assert!(world.get::<PlayerControlled>(entity).is_none());
        assert!(world.get::<ActionInput>(entity).is_some());
        assert!(world.get::<Attacker>(entity).is_some());
        assert_eq!(world.get::<Faction>(entity), Some(&Faction(FactionTag::Enemy)));
        assert_eq!(world.get::<Health>(entity).map(|h| h.max), Some(100.0));
        assert_eq!(
            world.get::<Transform>(entity).map(|t| t.translation),
            Some(Vec3::new(1.0, 0.0, 2.0))
        );
    }

    #[test]
    fn test_ai_wins_over_player_input() {
        let template = ActorTemplate::new("confused", Arc::new(ActorConfig::default()))
            .with_module(ActorModule::PlayerInput)
            .with_module(ActorModule::Ai(Arc::new(AIConfig::default())));
        let (world, entity) = spawn(&template);

        assert!(world.get::<AiControlled>(entity).is_some());
        assert!(world.get::<PlayerControlled>(entity).is_none());
    }

    #[test]
    fn test_bare_template_has_base_components_only() {
        let template = ActorTemplate::new("prop", Arc::new(ActorConfig::default()));
        let (world, entity) = spawn(&template);

        assert!(world.get::<Actor>(entity).is_some());
        assert!(world.get::<Faction>(entity).is_none());
        assert!(world.get::<Health>(entity).is_none());
    }
}
