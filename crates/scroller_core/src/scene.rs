//! Assembles a playable world from config and loaded images, and drives the
//! per-frame render-then-step cycle for whoever owns the frame callback.

use glam::Vec2;

use crate::animation::{AnimatedSprite, FrameStrip, ImageHandle};
use crate::background::ScrollingBackground;
use crate::character::Character;
use crate::config::{GameConfig, StripSettings};
use crate::error::ConfigError;
use crate::input::InputLatch;
use crate::player::ControllablePlayer;
use crate::render::{Renderer, Surface};
use crate::script::InputScript;
use crate::world::{EntityId, EntityState, World};

#[derive(Debug, Clone, Copy)]
pub struct SceneImages {
    pub player_sheet: ImageHandle,
    pub background: ImageHandle,
}

pub struct Scene {
    pub world: World,
    pub input: InputLatch,
    pub player: EntityId,
    renderer: Renderer,
}

impl Scene {
    pub fn build(config: &GameConfig, images: SceneImages) -> Result<Self, ConfigError> {
        config.validate()?;
        let input = config.controls.build_latch()?;

        let walk = strip(images.player_sheet, &config.player.walk)?;
        let jump = strip(images.player_sheet, &config.player.jump)?;
        let character = Character::new(
            Vec2::new(config.player.start_x, 0.0),
            config.player.tuning(),
            AnimatedSprite::new(walk),
            AnimatedSprite::new(jump),
        );
        let player = ControllablePlayer::new(
            character,
            config.controls.controls(),
            config.player.speed,
        )?;

        let mut world = World::new(config.physics.gravity);
        world.add_background(ScrollingBackground::new(
            images.background,
            config.background.scroll_speed,
        )?);
        let player = world.add_entity(Box::new(player));

        log::info!(
            "Scene ready: gravity {}, speed {}, jump impulse {}, scroll {}",
            config.physics.gravity,
            config.player.speed,
            config.player.jump_impulse,
            config.background.scroll_speed
        );
        Ok(Self {
            world,
            input,
            player,
            renderer: Renderer::new(),
        })
    }

    pub fn render(&mut self, surface: &mut dyn Surface) {
        self.renderer.render(&self.world, surface);
    }

    pub fn step(&mut self) {
        self.world.step(&self.input);
    }

    /// One full tick: draw the previous step's state, then simulate.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        self.render(surface);
        self.step();
    }

    pub fn player_state(&self) -> Option<EntityState> {
        self.world.entity(self.player)
    }

    pub fn run_script(&mut self, script: &InputScript, surface: &mut dyn Surface) {
        for events in script.expanded() {
            events.apply(&mut self.input);
            self.tick(surface);
        }
    }
}

fn strip(image: ImageHandle, settings: &StripSettings) -> Result<FrameStrip, ConfigError> {
    FrameStrip::new(
        image,
        settings.frame_width,
        settings.frame_height,
        settings.row,
        settings.frame_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Motion;
    use crate::render::Blit;
    use crate::script::ScriptFrame;

    struct NullSurface {
        draws: usize,
    }

    impl Surface for NullSurface {
        fn width(&self) -> u32 {
            800
        }

        fn height(&self) -> u32 {
            500
        }

        fn clear(&mut self) {}

        fn draw_image(&mut self, _blit: &Blit) {
            self.draws += 1;
        }
    }

    fn images(config: &GameConfig) -> SceneImages {
        let (w, h) = config.player.sheet_size();
        SceneImages {
            player_sheet: ImageHandle::new(1, w, h),
            background: ImageHandle::new(2, 800, 500),
        }
    }

    fn frame(press: &[&str], release: &[&str], repeat: u32) -> ScriptFrame {
        ScriptFrame {
            press: press.iter().map(|k| k.to_string()).collect(),
            release: release.iter().map(|k| k.to_string()).collect(),
            repeat,
        }
    }

    #[test]
    fn walking_right_for_ten_ticks() {
        let mut config = GameConfig::default();
        config.physics.gravity = 0.3;
        let mut scene = Scene::build(&config, images(&config)).expect("scene");
        let start = scene.player_state().expect("player").position;

        let script = InputScript {
            frames: vec![frame(&["d"], &[], 10)],
        };
        let mut surface = NullSurface { draws: 0 };
        scene.run_script(&script, &mut surface);

        let state = scene.player_state().expect("player");
        assert_eq!(state.position.x - start.x, 10.0 * config.player.speed);
        assert_eq!(state.position.y, 0.0);
        assert_eq!(state.motion, Motion::Grounded);
        assert_eq!(scene.world.tick(), 10);
        assert!(surface.draws >= 20);
    }

    #[test]
    fn tapped_jump_lands_after_arc() {
        let config = GameConfig::default();
        let mut scene = Scene::build(&config, images(&config)).expect("scene");
        let script = InputScript {
            frames: vec![frame(&["w"], &[], 1), frame(&[], &["w"], 60)],
        };
        let mut surface = NullSurface { draws: 0 };
        scene.run_script(&script, &mut surface);

        let state = scene.player_state().expect("player");
        assert_eq!(state.motion, Motion::Grounded);
        assert_eq!(state.position.y, 0.0);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn strip_larger_than_sheet_fails_at_build() {
        let config = GameConfig::default();
        let images = SceneImages {
            player_sheet: ImageHandle::new(1, 256, 192),
            background: ImageHandle::new(2, 800, 500),
        };
        let err = Scene::build(&config, images)
            .err()
            .expect("walk strip is 512px wide");
        assert!(matches!(err, ConfigError::StripTooWide { .. }));
    }

    #[test]
    fn player_starts_at_configured_x() {
        let mut config = GameConfig::default();
        config.player.start_x = 120.0;
        let scene = Scene::build(&config, images(&config)).expect("scene");
        let state = scene.player_state().expect("player");
        assert_eq!(state.position, Vec2::new(120.0, 0.0));
    }
}
