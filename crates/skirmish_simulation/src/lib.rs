//! Skirmish Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: акторы, AI (perception + state machine),
//! оружие, снаряды и взрывы.
//!
//! Движок (физика, рендер, устройства ввода): за oracle-интерфейсами:
//! - SpatialService: raycast / overlap / ground probe
//! - InputService: сырые данные устройств игрока
//! - Events: spawn/destroy/FX запросы для визуальной стороны

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod logger;
pub mod simulation;
pub mod spatial;

// Re-export основных типов для удобства
pub use actor::{ActorDestroyed, ActorModule, ActorPlugin, ActorSpawned, ActorTemplate, Spawner};
pub use ai::{AIPlugin, AiStateMachine, Behavior, BehaviorState, Perception};
pub use combat::{
    Attacker, CombatPlugin, DamageDealt, EffectRequested, EntityDied, Explosion, Projectile,
};
pub use components::{
    ActionInput, Actor, AiControlled, ButtonState, Faction, FactionTag, Health, Hitbox,
    PlayerControlled,
};
pub use config::{AIConfig, ActorConfig, ConfigError, ConfigLibrary, ExplosionConfig, WeaponConfig};
pub use input::{InputService, InputSource, RawInput, ScriptedInput};
pub use logger::init_logger;
pub use simulation::Simulation;
pub use spatial::{ObstacleField, OpenField, SpatialOracle, SpatialService};

/// Фазы одного тика (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Device input → ActionInput игрока
    Input,
    /// Health таймеры, cleanup, движение, прицел
    Actors,
    Spawners,
    Perception,
    /// AI state machine → synthetic ActionInput
    Decision,
    /// ActionInput.attack → снаряды
    Attack,
    /// Снаряды и взрывы → урон
    Resolution,
}

/// Длительность текущего тика (секунды). Единственный источник времени.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct DeltaTime(pub f32);

/// Fixed step движка (для homing снарядов)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep(pub f32);

impl Default for FixedTimestep {
    fn default() -> Self {
        Self(1.0 / 50.0)
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Actors,
                SimulationSet::Spawners,
                SimulationSet::Perception,
                SimulationSet::Decision,
                SimulationSet::Attack,
                SimulationSet::Resolution,
            )
                .chain(),
        );

        app.init_resource::<DeltaTime>().init_resource::<FixedTimestep>();

        // Сервисы могли быть подставлены до плагина (Simulation::with_services)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        if !app.world().contains_resource::<SpatialService>() {
            app.insert_resource(SpatialService::default());
        }
        if !app.world().contains_resource::<InputService>() {
            app.insert_resource(InputService::default());
        }

        app.add_systems(Update, input::poll_player_input.in_set(SimulationSet::Input))
            // Подсистемы
            .add_plugins((ActorPlugin, AIPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт Bevy App для headless симуляции (без MinimalPlugins: время задаёт DeltaTime)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
