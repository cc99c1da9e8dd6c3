//! Gravity-driven character with a two-state motion machine.
//!
//! Coordinates are simulation space: origin bottom-left, Y up, ground at the
//! environment's ground line. Per tick the character integrates
//! `pos += vel; vel.y -= gravity` unconditionally, then lands if it is moving
//! down and the environment reports it at or below ground. Landing happens in
//! the same tick as the integration that crossed the ground line, so a
//! negative height is never observable between ticks.
//!
//! Physics is per tick, not per second: tick length is whatever the host's
//! frame pacing grants, so motion speed follows the display rate.

use glam::Vec2;

use crate::animation::AnimatedSprite;

/// What a character needs from the world it lives in.
pub trait Environment {
    /// Downward acceleration per tick, applied to `velocity.y`.
    fn gravity(&self) -> f32;

    fn is_grounded(&self, position: Vec2) -> bool;

    /// Height a landing character is clamped to.
    fn ground_level(&self) -> f32 {
        0.0
    }
}

/// Flat floor at `y = 0` with constant gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub gravity: f32,
}

impl Environment for FlatGround {
    fn gravity(&self) -> f32 {
        self.gravity
    }

    fn is_grounded(&self, position: Vec2) -> bool {
        position.y <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Grounded,
    Jumping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterTuning {
    pub jump_impulse: f32,
    /// Animation cursor increment per tick while grounded.
    pub walk_rate: f64,
    /// Animation cursor increment per tick while airborne.
    pub jump_rate: f64,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            jump_impulse: 20.0,
            walk_rate: 0.2,
            jump_rate: 0.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Character {
    pub position: Vec2,
    pub velocity: Vec2,
    motion: Motion,
    tuning: CharacterTuning,
    walk: AnimatedSprite,
    jump: AnimatedSprite,
}

impl Character {
    pub fn new(
        position: Vec2,
        tuning: CharacterTuning,
        walk: AnimatedSprite,
        jump: AnimatedSprite,
    ) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            motion: Motion::Grounded,
            tuning,
            walk,
            jump,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_jumping(&self) -> bool {
        self.motion == Motion::Jumping
    }

    pub fn tuning(&self) -> &CharacterTuning {
        &self.tuning
    }

    /// Start a jump. Does nothing while already airborne.
    pub fn jump(&mut self) {
        if self.motion == Motion::Jumping {
            return;
        }
        self.motion = Motion::Jumping;
        self.velocity.y = self.tuning.jump_impulse;
        self.jump.reset();
        log::debug!(
            "Jump from x={:.1} with vy={:.1}",
            self.position.x,
            self.velocity.y
        );
    }

    pub fn step(&mut self, env: &dyn Environment) {
        match self.motion {
            Motion::Grounded => self.walk.advance(self.tuning.walk_rate),
            Motion::Jumping => self.jump.advance(self.tuning.jump_rate),
        }

        self.position += self.velocity;
        self.velocity.y -= env.gravity();

        if self.velocity.y < 0.0 && env.is_grounded(self.position) {
            if self.motion == Motion::Jumping {
                log::debug!("Landed at x={:.1}", self.position.x);
            }
            self.position.y = env.ground_level();
            self.velocity.y = 0.0;
            self.motion = Motion::Grounded;
        }
    }

    /// Sprite bound to the current motion state.
    pub fn active_sprite(&self) -> &AnimatedSprite {
        self.sprite_for(self.motion)
    }

    pub fn sprite_for(&self, motion: Motion) -> &AnimatedSprite {
        match motion {
            Motion::Grounded => &self.walk,
            Motion::Jumping => &self.jump,
        }
    }
}
