//! Draw-call generation against an abstract raster surface.
//!
//! Simulation space has its origin at the bottom-left with Y up; raster space
//! has its origin at the top-left with Y down. The conversion lives in
//! [`to_screen_y`] and nowhere else.

use crate::animation::ImageHandle;
use crate::player::Facing;
use crate::world::{EntityState, World};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Copy `src` (image pixels) into `dst` (surface pixels), scaling as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub image: ImageHandle,
    pub src: Rect,
    pub dst: Rect,
    /// Mirror the source horizontally inside `dst`.
    pub flip_x: bool,
}

/// Output target. Implementations own the pixels and the image table; the
/// core only issues calls.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn clear(&mut self);

    fn draw_image(&mut self, blit: &Blit);
}

/// Top edge in raster space of a sprite whose bottom edge sits at `sim_y`.
pub fn to_screen_y(surface_height: f32, sim_y: f32, sprite_height: f32) -> f32 {
    surface_height - sim_y - sprite_height
}

#[derive(Debug, Default)]
pub struct Renderer {
    frames: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Clear, then draw backgrounds followed by entities, each in the
    /// world's stable order.
    pub fn render(&mut self, world: &World, surface: &mut dyn Surface) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        surface.clear();

        for background in world.backgrounds() {
            let pair = background.segments(width, height);
            for segment in std::iter::once(pair.main).chain(pair.wrapped) {
                surface.draw_image(&Blit {
                    image: background.image,
                    src: segment.src,
                    dst: segment.dst,
                    flip_x: false,
                });
            }
        }

        for entity in world.entities() {
            surface.draw_image(&entity_blit(&entity, height));
        }

        self.frames += 1;
    }
}

fn entity_blit(entity: &EntityState, surface_height: f32) -> Blit {
    let frame = entity.frame;
    Blit {
        image: entity.image,
        src: frame,
        dst: Rect::new(
            entity.position.x,
            to_screen_y(surface_height, entity.position.y, frame.h),
            frame.w,
            frame.h,
        ),
        flip_x: entity.facing == Facing::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::ScrollingBackground;
    use crate::character::tests::test_character;
    use crate::character::CharacterTuning;
    use crate::input::InputLatch;
    use crate::player::{ControllablePlayer, Controls};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Draw(Blit),
    }

    struct RecordingSurface {
        width: u32,
        height: u32,
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }

        fn draws(&self) -> Vec<Blit> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Draw(blit) => Some(*blit),
                    Call::Clear => None,
                })
                .collect()
        }

        /// The draw for the test character's sheet, wherever it lands among
        /// the background segments.
        fn sprite_draw(&self) -> Blit {
            self.draws()
                .into_iter()
                .find(|blit| blit.image.id == 7)
                .expect("character was drawn")
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_image(&mut self, blit: &Blit) {
            self.calls.push(Call::Draw(*blit));
        }
    }

    fn world_with_player_and_background() -> World {
        let mut world = World::new(1.5);
        let background =
            ScrollingBackground::new(ImageHandle::new(2, 800, 500), 100.0).expect("valid");
        world.add_background(background);
        let player = ControllablePlayer::new(
            test_character(CharacterTuning::default()),
            Controls::default(),
            5.0,
        )
        .expect("valid player");
        world.add_entity(Box::new(player));
        world
    }

    #[test]
    fn screen_y_flip() {
        assert_eq!(to_screen_y(500.0, 0.0, 100.0), 400.0);
        assert_eq!(to_screen_y(500.0, 400.0, 100.0), 0.0);
        assert_eq!(to_screen_y(500.0, 20.0, 50.0), 430.0);
    }

    #[test]
    fn clears_first_then_backgrounds_then_entities() {
        let world = world_with_player_and_background();
        let mut surface = RecordingSurface::new(800, 500);
        let mut renderer = Renderer::new();
        renderer.render(&world, &mut surface);

        assert_eq!(surface.calls[0], Call::Clear);
        let draws = surface.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].image.id, 2);
        assert_eq!(draws[1].image.id, 7);
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn grounded_entity_sits_on_bottom_edge() {
        let world = world_with_player_and_background();
        let mut surface = RecordingSurface::new(800, 500);
        Renderer::new().render(&world, &mut surface);

        let sprite = surface.sprite_draw();
        assert_eq!(sprite.dst, Rect::new(0.0, 400.0, 60.0, 100.0));
        assert_eq!(sprite.src, Rect::new(0.0, 0.0, 60.0, 100.0));
        assert!(!sprite.flip_x);
    }

    #[test]
    fn wrapped_background_issues_two_draws() {
        let mut world = world_with_player_and_background();
        let input = InputLatch::new(["a", "d", "w"]).expect("watch-list");
        for _ in 0..3 {
            world.step(&input);
        }
        let mut surface = RecordingSurface::new(800, 500);
        Renderer::new().render(&world, &mut surface);

        let draws = surface.draws();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].src.x, 300.0);
        assert_eq!(draws[0].dst.w, 500.0);
        assert_eq!(draws[1].src.x, 0.0);
        assert_eq!(draws[1].dst.x, 500.0);
        assert_eq!(draws[1].dst.w, 300.0);
    }

    #[test]
    fn render_shows_state_of_previous_step() {
        let mut world = world_with_player_and_background();
        let mut input = InputLatch::new(["a", "d", "w"]).expect("watch-list");
        input.record_down("w");

        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new(800, 500);
        renderer.render(&world, &mut surface);
        world.step(&input);
        // The first frame was drawn before the jump was simulated.
        assert_eq!(surface.sprite_draw().dst.y, 400.0);

        let mut surface = RecordingSurface::new(800, 500);
        renderer.render(&world, &mut surface);
        // The background wrapped on that step, so there are two segment draws
        // ahead of the character.
        assert_eq!(surface.draws().len(), 3);
        assert_eq!(surface.sprite_draw().dst.y, 380.0);
    }

    #[test]
    fn left_facing_entity_is_mirrored() {
        let mut world = world_with_player_and_background();
        let mut input = InputLatch::new(["a", "d", "w"]).expect("watch-list");
        input.record_down("a");
        world.step(&input);
        let mut surface = RecordingSurface::new(800, 500);
        Renderer::new().render(&world, &mut surface);
        assert!(surface.sprite_draw().flip_x);
    }
}
