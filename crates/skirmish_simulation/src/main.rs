//! Headless симуляция Skirmish
//!
//! Игрок стреляет по направлению -Z, враги появляются из area spawner'а.
//! Конфиги: assets/demo.toml (или путь первым аргументом).

use bevy::prelude::*;

use skirmish_simulation::actor::{ActorTemplate, SpawnPlacement, Spawner};
use skirmish_simulation::combat::{DamageDealt, EntityDied};
use skirmish_simulation::config::ConfigLibrary;
use skirmish_simulation::input::{RawInput, ScriptedInput};
use skirmish_simulation::logger::{log_error, log_info};
use skirmish_simulation::{init_logger, InputService, Simulation, SpatialService};

const DEMO_LIBRARY: &str = include_str!("../assets/demo.toml");
const TICK: f32 = 1.0 / 50.0;
const TICKS: usize = 1500;

fn main() {
    init_logger();

    let library = match std::env::args().nth(1) {
        Some(path) => ConfigLibrary::load(path),
        None => ConfigLibrary::from_toml_str(DEMO_LIBRARY),
    };
    let library = match library {
        Ok(library) => library,
        Err(err) => {
            log_error(&format!("Failed to load config library: {err}"));
            return;
        }
    };

    let (Some(player_cfg), Some(grunt_cfg), Some(grunt_ai)) =
        (library.actor("player"), library.actor("grunt"), library.ai("grunt"))
    else {
        log_error("Config library must define actors.player, actors.grunt and ai.grunt");
        return;
    };

    let seed = 42;
    println!("Starting Skirmish headless simulation (seed: {})", seed);

    // Игрок держит прицел и огонь вдоль -Z
    let fire = RawInput {
        aim: true,
        attack: true,
        aim_position: Some(Vec3::new(0.0, 1.0, -20.0)),
        ..default()
    };
    let input = InputService::new(ScriptedInput::default().hold(fire, TICKS));
    let mut sim = Simulation::with_services(seed, SpatialService::default(), input);

    sim.create(&ActorTemplate::player("player", player_cfg, library.weapon("rifle")));

    let grunt = ActorTemplate::enemy("grunt", grunt_cfg, grunt_ai, library.weapon("grenade"));
    let spawner = Spawner::new(
        vec![grunt],
        3.0,
        SpawnPlacement::Area {
            half_extents: Vec3::new(8.0, 2.0, 4.0),
        },
    )
    .with_alive_limit(4)
    .with_total_limit(12);
    sim.world_mut()
        .spawn((Transform::from_xyz(0.0, 0.0, -12.0), spawner));

    let mut damage_events = 0;
    let mut deaths = 0;
    for tick in 0..TICKS {
        sim.step(TICK);
        damage_events += sim.events::<DamageDealt>().len();
        deaths += sim.events::<EntityDied>().len();

        if tick % 250 == 0 {
            let actors = sim.actors().len();
            log_info(&format!(
                "Tick {}: {} actors, {} hits, {} deaths",
                tick, actors, damage_events, deaths
            ));
        }
    }

    println!(
        "Simulation complete: {} hits, {} deaths, {} actors alive",
        damage_events,
        deaths,
        sim.actors().len()
    );
}
