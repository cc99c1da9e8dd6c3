use glam::Vec2;

use crate::character::{Character, Environment};
use crate::error::{check_finite, ConfigError};
use crate::input::{HeldKeys, InputLatch};

/// Key identifiers that drive a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub left: String,
    pub right: String,
    pub jump: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            left: "a".to_string(),
            right: "d".to_string(),
            jump: "w".to_string(),
        }
    }
}

impl Controls {
    /// Every binding must be on the latch's watch-list, otherwise the action
    /// could never fire.
    pub fn validate(&self, latch: &InputLatch) -> Result<(), ConfigError> {
        for (action, key) in [
            ("left", &self.left),
            ("right", &self.right),
            ("jump", &self.jump),
        ] {
            if !latch.is_watched(key) {
                return Err(ConfigError::UnwatchedBinding {
                    action,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Turns held keys into velocity and jump commands for the character it owns.
///
/// Horizontal speed is all-or-nothing: no acceleration, no friction and no
/// separate air control. With no direction held, `vx` is exactly zero.
#[derive(Debug, Clone)]
pub struct ControllablePlayer {
    character: Character,
    controls: Controls,
    speed: f32,
    facing: Facing,
}

impl ControllablePlayer {
    pub fn new(character: Character, controls: Controls, speed: f32) -> Result<Self, ConfigError> {
        check_finite("player.speed", speed, true)?;
        Ok(Self {
            character,
            controls,
            speed,
            facing: Facing::Right,
        })
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn position(&self) -> Vec2 {
        self.character.position
    }

    pub fn step(&mut self, held: &HeldKeys, env: &dyn Environment) {
        let mut vx = 0.0;
        if held.contains(&self.controls.left) {
            vx = -self.speed;
        }
        // Checked last, so right wins when both directions are held.
        if held.contains(&self.controls.right) {
            vx = self.speed;
        }
        self.character.velocity.x = vx;
        if vx < 0.0 {
            self.facing = Facing::Left;
        } else if vx > 0.0 {
            self.facing = Facing::Right;
        }

        if held.contains(&self.controls.jump) {
            self.character.jump();
        }

        self.character.step(env);
    }
}
