//! Input intent: общий формат для игрока и AI.
//!
//! Ровно один producer на entity за тик: `poll_player_input` (PlayerControlled)
//! или `GenerateInput` state machine (AiControlled).

use bevy::prelude::*;

use crate::input::RawInput;

/// Tri-state кнопки: hit (нажата в этом тике), held, released (отпущена в этом тике)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ButtonState {
    pub hit: bool,
    pub held: bool,
    pub released: bool,
}

impl ButtonState {
    /// Edge detection по сырому pressed состоянию
    pub fn update(&mut self, pressed: bool) {
        self.hit = pressed && !self.held;
        self.released = !pressed && self.held;
        self.held = pressed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActionInput {
    /// x → world X, y → world Z
    pub movement: Vec2,
    pub jump: ButtonState,
    pub aim: ButtonState,
    pub attack: ButtonState,
    pub aim_position: Option<Vec3>,
    /// Камера игрока (у AI всегда None)
    pub camera: Option<Entity>,
}

impl ActionInput {
    /// Сброс всех transient флагов перед synthetic input текущего тика
    pub fn reset_transient(&mut self) {
        self.movement = Vec2::ZERO;
        self.jump.reset();
        self.aim.reset();
        self.attack.reset();
        self.aim_position = None;
    }

    pub fn apply_raw(&mut self, raw: &RawInput) {
        self.movement = raw.movement;
        self.jump.update(raw.jump);
        self.aim.update(raw.aim);
        self.attack.update(raw.attack);
        self.aim_position = raw.aim_position;
        if raw.camera.is_some() {
            self.camera = raw.camera;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edges() {
        let mut button = ButtonState::default();

        button.update(true);
        assert_eq!(button, ButtonState { hit: true, held: true, released: false });

        button.update(true);
        assert_eq!(button, ButtonState { hit: false, held: true, released: false });

        button.update(false);
        assert_eq!(button, ButtonState { hit: false, held: false, released: true });

        button.update(false);
        assert_eq!(button, ButtonState::default());
    }

    #[test]
    fn test_reset_transient_keeps_camera() {
        let camera = Entity::from_raw(7);
        let mut input = ActionInput {
            movement: Vec2::ONE,
            aim_position: Some(Vec3::X),
            camera: Some(camera),
            ..default()
        };
        input.attack.update(true);

        input.reset_transient();
        assert_eq!(input.movement, Vec2::ZERO);
        assert!(!input.attack.held);
        assert_eq!(input.aim_position, None);
        assert_eq!(input.camera, Some(camera));
    }
}
