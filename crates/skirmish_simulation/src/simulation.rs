//! Simulation: фасад над bevy App для движка и headless тестов.
//!
//! Движок вызывает `step(dt)` раз в кадр; создание/удаление акторов,
//! снарядов и взрывов идёт через этот же фасад (spawn/destroy services).

use std::sync::Arc;

use bevy::ecs::component::Mutable;
use bevy::ecs::event::Events;
use bevy::prelude::*;

use crate::actor::{spawn_actor, ActorDestroyed, ActorTemplate, DestroyReason};
use crate::combat::{self, Explosion, ExplosionSpawned, ProjectileSpawned};
use crate::components::{Actor, FactionTag};
use crate::config::{ExplosionConfig, WeaponConfig};
use crate::input::InputService;
use crate::logger::{log_with_source, LogLevel};
use crate::spatial::SpatialService;
use crate::{create_headless_app, DeltaTime, SimulationPlugin};

pub struct Simulation {
    app: App,
    tick: u64,
}

impl Simulation {
    /// Открытое поле без препятствий, без игрового ввода
    pub fn new(seed: u64) -> Self {
        Self::with_services(seed, SpatialService::default(), InputService::default())
    }

    pub fn with_services(seed: u64, spatial: SpatialService, input: InputService) -> Self {
        let mut app = create_headless_app(seed);
        app.insert_resource(spatial)
            .insert_resource(input)
            .add_plugins(SimulationPlugin);

        Self { app, tick: 0 }
    }

    /// Один тик всех фаз с заданной длительностью
    pub fn step(&mut self, dt: f32) {
        self.app.world_mut().resource_mut::<DeltaTime>().0 = dt.max(0.0);
        self.app.update();
        self.tick += 1;
    }

    pub fn run(&mut self, dt: f32, ticks: usize) {
        for _ in 0..ticks {
            self.step(dt);
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn create(&mut self, template: &ActorTemplate) -> Entity {
        let world = self.app.world_mut();
        let entity = spawn_actor(&mut world.commands(), template);
        world.flush();
        entity
    }

    /// Удалить entity немедленно. false: entity уже нет.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let world = self.app.world_mut();
        if world.get_entity(entity).is_err() {
            log_with_source(
                LogLevel::Warning,
                "Simulation",
                &format!("destroy: {:?} does not exist", entity),
            );
            return false;
        }

        world.despawn(entity);
        world.send_event(ActorDestroyed {
            entity,
            reason: DestroyReason::Removed,
        });
        true
    }

    pub fn spawn_projectile(
        &mut self,
        weapon: &Arc<WeaponConfig>,
        tag: Option<FactionTag>,
        owner: Option<Entity>,
        pose: Transform,
        aim_position: Option<Vec3>,
    ) -> Entity {
        let world = self.app.world_mut();
        let projectile = combat::spawn_projectile(&mut world.commands(), weapon, tag, owner, pose, aim_position);
        world.flush();

        world.send_event(ProjectileSpawned {
            projectile,
            owner,
            prefab: weapon.projectile_prefab.clone(),
            position: pose.translation,
            rotation: pose.rotation,
        });
        projectile
    }

    pub fn spawn_explosion(
        &mut self,
        config: Arc<ExplosionConfig>,
        tag: Option<FactionTag>,
        owner: Option<Entity>,
        position: Vec3,
    ) -> Entity {
        let explosion = Explosion::from_config(config, tag, owner);
        let radius = explosion.radius();

        let world = self.app.world_mut();
        let entity = combat::spawn_explosion(&mut world.commands(), explosion, position);
        world.flush();

        world.send_event(ExplosionSpawned {
            explosion: entity,
            owner,
            position,
            radius,
        });
        entity
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.app.world().get::<T>(entity)
    }

    pub fn get_mut<T: Component<Mutability = Mutable>>(&mut self, entity: Entity) -> Option<Mut<'_, T>> {
        self.app.world_mut().get_mut::<T>(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.app
            .world()
            .get_entity(entity)
            .is_ok_and(|e| e.contains::<T>())
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.app.world().get_entity(entity).is_ok()
    }

    pub fn insert<B: Bundle>(&mut self, entity: Entity, bundle: B) -> bool {
        match self.app.world_mut().get_entity_mut(entity) {
            Ok(mut entity) => {
                entity.insert(bundle);
                true
            }
            Err(_) => false,
        }
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.app.world_mut().get_entity_mut(entity).ok()?.take::<T>()
    }

    /// Все живые в мире акторы (по возрастанию индекса)
    pub fn actors(&mut self) -> Vec<Entity> {
        let world = self.app.world_mut();
        let mut actors: Vec<Entity> = world.query_filtered::<Entity, With<Actor>>().iter(world).collect();
        actors.sort_by_key(|e| e.index());
        actors
    }

    /// События типа E, отправленные за последний `step`
    pub fn events<E: Event + Clone>(&self) -> Vec<E> {
        self.app
            .world()
            .get_resource::<Events<E>>()
            .map(|events| events.iter_current_update_events().cloned().collect())
            .unwrap_or_default()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
