//! Input source: polled один раз за тик.
//!
//! Движок реализует `InputSource` (клавиатура/геймпад/камера); ядро видит только
//! `RawInput` и переводит его в `ActionInput` тем же форматом, что и AI.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::components::{ActionInput, AiControlled, PlayerControlled};

/// Сырое состояние устройств за один тик
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub movement: Vec2,
    pub jump: bool,
    pub aim: bool,
    pub attack: bool,
    pub aim_position: Option<Vec3>,
    pub camera: Option<Entity>,
}

pub trait InputSource: Send + Sync {
    fn poll(&mut self) -> RawInput;
}

#[derive(Resource)]
pub struct InputService(pub Box<dyn InputSource>);

impl InputService {
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new(NoInput)
    }
}

/// Никто не держит контроллер
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> RawInput {
        RawInput::default()
    }
}

/// Заранее записанная последовательность кадров (headless демо, тесты).
/// Когда очередь пуста: повторяет последний кадр.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<RawInput>,
    last: RawInput,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = RawInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            last: RawInput::default(),
        }
    }

    /// Один и тот же кадр `ticks` раз подряд
    pub fn hold(mut self, frame: RawInput, ticks: usize) -> Self {
        self.frames.extend(std::iter::repeat(frame).take(ticks));
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> RawInput {
        if let Some(frame) = self.frames.pop_front() {
            self.last = frame;
        }
        self.last
    }
}

/// Input phase: device → ActionInput для игроков (AI entities исключены)
pub fn poll_player_input(
    mut service: ResMut<InputService>,
    mut players: Query<&mut ActionInput, (With<PlayerControlled>, Without<AiControlled>)>,
) {
    let raw = service.0.poll();
    for mut input in players.iter_mut() {
        input.apply_raw(&raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_repeats_last_frame() {
        let fire = RawInput {
            attack: true,
            ..default()
        };
        let mut source = ScriptedInput::default().hold(fire, 2);

        assert!(source.poll().attack);
        assert!(source.poll().attack);
        assert!(source.poll().attack);
    }

    #[test]
    fn test_poll_skips_ai_controlled_entities() {
        let mut world = World::new();
        world.insert_resource(InputService::new(ScriptedInput::new([RawInput {
            attack: true,
            movement: Vec2::X,
            ..default()
        }])));

        let player = world
            .spawn((PlayerControlled, ActionInput::default()))
            .id();
        let hijacked = world
            .spawn((PlayerControlled, AiControlled, ActionInput::default()))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(poll_player_input);
        schedule.run(&mut world);

        let player_input = world.get::<ActionInput>(player).expect("input");
        assert!(player_input.attack.hit);
        assert_eq!(player_input.movement, Vec2::X);

        let ai_input = world.get::<ActionInput>(hijacked).expect("input");
        assert_eq!(*ai_input, ActionInput::default());
    }
}
