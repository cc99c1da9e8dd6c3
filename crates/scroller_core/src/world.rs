//! Container for everything that steps each tick.
//!
//! Backgrounds step before entities, each collection in insertion order, so
//! a run with the same inputs always produces the same states. Readers get
//! value snapshots from [`World::entities`] and [`World::backgrounds`], never
//! references into the live collections.

use glam::Vec2;

use crate::animation::ImageHandle;
use crate::background::{ScrollingBackground, SegmentPair};
use crate::character::{Character, Environment, FlatGround, Motion};
use crate::input::{HeldKeys, InputLatch};
use crate::player::{ControllablePlayer, Facing};
use crate::render::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackgroundId(pub u32);

/// Something the world steps once per tick and the renderer draws.
pub trait Entity {
    fn step(&mut self, held: &HeldKeys, env: &dyn Environment);

    fn snapshot(&self) -> EntityState;
}

impl Entity for ControllablePlayer {
    fn step(&mut self, held: &HeldKeys, env: &dyn Environment) {
        ControllablePlayer::step(self, held, env);
    }

    fn snapshot(&self) -> EntityState {
        let mut state = EntityState::of_character(self.character());
        state.facing = self.facing();
        state
    }
}

/// A character nobody controls: gravity only.
impl Entity for Character {
    fn step(&mut self, _held: &HeldKeys, env: &dyn Environment) {
        Character::step(self, env);
    }

    fn snapshot(&self) -> EntityState {
        EntityState::of_character(self)
    }
}

/// Value copy of an entity as of the last completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub motion: Motion,
    pub facing: Facing,
    pub image: ImageHandle,
    pub frame: Rect,
}

impl EntityState {
    fn of_character(character: &Character) -> Self {
        let sprite = character.active_sprite();
        Self {
            id: EntityId(0),
            position: character.position,
            velocity: character.velocity,
            motion: character.motion(),
            facing: Facing::Right,
            image: sprite.strip().image(),
            frame: sprite.current_frame_rect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundState {
    pub id: BackgroundId,
    pub image: ImageHandle,
    pub offset: f32,
}

impl BackgroundState {
    pub fn segments(&self, viewport_width: f32, viewport_height: f32) -> SegmentPair {
        crate::background::segments_at(self.image, self.offset, viewport_width, viewport_height)
    }
}

pub struct World {
    ground: FlatGround,
    entities: Vec<(EntityId, Box<dyn Entity>)>,
    backgrounds: Vec<(BackgroundId, ScrollingBackground)>,
    next_id: u32,
    tick: u64,
}

impl World {
    pub fn new(gravity: f32) -> Self {
        Self {
            ground: FlatGround { gravity },
            entities: Vec::new(),
            backgrounds: Vec::new(),
            next_id: 1,
            tick: 0,
        }
    }

    pub fn gravity(&self) -> f32 {
        self.ground.gravity
    }

    /// Ground test used for every entity: at or below `y = 0`.
    pub fn on_ground(&self, position: Vec2) -> bool {
        self.ground.is_grounded(position)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn add_entity(&mut self, entity: Box<dyn Entity>) -> EntityId {
        let id = EntityId(self.allocate_id());
        self.entities.push((id, entity));
        log::debug!("Entity {:?} added ({} total)", id, self.entities.len());
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let index = self.entities.iter().position(|(eid, _)| *eid == id)?;
        let (_, entity) = self.entities.remove(index);
        log::debug!("Entity {:?} removed ({} left)", id, self.entities.len());
        Some(entity)
    }

    pub fn add_background(&mut self, background: ScrollingBackground) -> BackgroundId {
        let id = BackgroundId(self.allocate_id());
        self.backgrounds.push((id, background));
        log::debug!("Background {:?} added", id);
        id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<EntityState> {
        self.entities
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(eid, entity)| with_id(*eid, entity.as_ref()))
    }

    pub fn entities(&self) -> Vec<EntityState> {
        self.entities
            .iter()
            .map(|(id, entity)| with_id(*id, entity.as_ref()))
            .collect()
    }

    pub fn backgrounds(&self) -> Vec<BackgroundState> {
        self.backgrounds
            .iter()
            .map(|(id, background)| BackgroundState {
                id: *id,
                image: background.image(),
                offset: background.offset(),
            })
            .collect()
    }

    /// Advance one tick. The held-key snapshot is taken once so every entity
    /// sees the same input.
    pub fn step(&mut self, input: &InputLatch) {
        let held = input.snapshot();
        for (_, background) in &mut self.backgrounds {
            background.step();
        }
        // Entities are moved out while they step so the world itself can be
        // their environment.
        let mut entities = std::mem::take(&mut self.entities);
        for (_, entity) in &mut entities {
            entity.step(&held, &*self);
        }
        self.entities = entities;
        self.tick += 1;
        log::trace!("Tick {} done, {} keys held", self.tick, held.len());
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Environment for World {
    fn gravity(&self) -> f32 {
        World::gravity(self)
    }

    fn is_grounded(&self, position: Vec2) -> bool {
        self.on_ground(position)
    }
}

fn with_id(id: EntityId, entity: &dyn Entity) -> EntityState {
    let mut state = entity.snapshot();
    state.id = id;
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::tests::test_character;
    use crate::character::CharacterTuning;
    use crate::player::Controls;

    const SPEED: f32 = 5.0;

    fn player() -> ControllablePlayer {
        ControllablePlayer::new(
            test_character(CharacterTuning::default()),
            Controls::default(),
            SPEED,
        )
        .expect("valid player")
    }

    fn latch() -> InputLatch {
        InputLatch::new(["a", "d", "w"]).expect("watch-list")
    }

    #[test]
    fn holding_right_moves_exactly_speed_per_tick() {
        let mut world = World::new(0.3);
        let id = world.add_entity(Box::new(player()));
        let mut input = latch();
        input.record_down("d");

        for _ in 0..10 {
            world.step(&input);
            let state = world.entity(id).expect("player exists");
            assert_eq!(state.position.y, 0.0);
            assert_eq!(state.motion, Motion::Grounded);
        }
        let state = world.entity(id).expect("player exists");
        assert_eq!(state.position.x, 10.0 * SPEED);
    }

    #[test]
    fn tapped_jump_follows_gravity_and_lands() {
        let mut world = World::new(1.5);
        let id = world.add_entity(Box::new(player()));
        let mut input = latch();

        input.record_down("w");
        world.step(&input);
        input.record_up("w");

        let mut expected_vy = 20.0_f32 - 1.5;
        let mut expected_y = 20.0_f32;
        let state = world.entity(id).expect("player exists");
        assert_eq!(state.velocity.y, expected_vy);
        assert_eq!(state.motion, Motion::Jumping);

        loop {
            world.step(&input);
            expected_y += expected_vy;
            expected_vy -= 1.5;
            let state = world.entity(id).expect("player exists");
            if expected_y <= 0.0 {
                assert_eq!(state.position.y, 0.0);
                assert_eq!(state.velocity.y, 0.0);
                assert_eq!(state.motion, Motion::Grounded);
                break;
            }
            assert_eq!(state.velocity.y, expected_vy);
            assert_eq!(state.motion, Motion::Jumping);
        }
    }

    #[test]
    fn backgrounds_step_with_world() {
        let mut world = World::new(1.0);
        let bg = ScrollingBackground::new(ImageHandle::new(9, 100, 50), 30.0).expect("valid");
        world.add_background(bg);
        let input = latch();
        for _ in 0..4 {
            world.step(&input);
        }
        let backgrounds = world.backgrounds();
        assert_eq!(backgrounds.len(), 1);
        assert_eq!(backgrounds[0].offset, 20.0);
        assert_eq!(world.tick(), 4);
    }

    #[test]
    fn snapshot_mutation_does_not_leak_into_world() {
        let mut world = World::new(1.5);
        let id = world.add_entity(Box::new(player()));
        let mut input = latch();
        input.record_down("d");

        let mut snapshot = world.entities();
        snapshot[0].position.x = 999.0;
        snapshot[0].velocity.y = 50.0;
        snapshot.clear();

        world.step(&input);
        let state = world.entity(id).expect("player exists");
        assert_eq!(state.position.x, SPEED);
        assert_eq!(state.position.y, 0.0);
        assert_eq!(world.entities().len(), 1);
    }

    #[test]
    fn entities_keep_insertion_order_and_ids() {
        let mut world = World::new(1.5);
        let a = world.add_entity(Box::new(player()));
        let b = world.add_entity(Box::new(test_character(CharacterTuning::default())));
        let c = world.add_entity(Box::new(player()));
        let ids: Vec<EntityId> = world.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b, c]);

        assert!(world.remove_entity(b).is_some());
        assert!(world.remove_entity(b).is_none());
        let ids: Vec<EntityId> = world.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn uncontrolled_character_ignores_input() {
        let mut world = World::new(1.5);
        let id = world.add_entity(Box::new(test_character(CharacterTuning::default())));
        let mut input = latch();
        input.record_down("d");
        input.record_down("w");
        world.step(&input);
        let state = world.entity(id).expect("character exists");
        assert_eq!(state.position, Vec2::ZERO);
        assert_eq!(state.motion, Motion::Grounded);
    }

    #[test]
    fn on_ground_and_gravity() {
        let world = World::new(0.3);
        assert_eq!(world.gravity(), 0.3);
        assert!(world.on_ground(Vec2::new(10.0, 0.0)));
        assert!(world.on_ground(Vec2::new(10.0, -1.0)));
        assert!(!world.on_ground(Vec2::new(10.0, 0.5)));
    }

    #[test]
    fn world_is_the_character_environment() {
        let mut world = World::new(2.0);
        let env: &dyn Environment = &world;
        assert_eq!(env.gravity(), 2.0);
        assert!(env.is_grounded(Vec2::new(3.0, 0.0)));
        assert!(!env.is_grounded(Vec2::new(3.0, 4.0)));

        let id = world.add_entity(Box::new(player()));
        let mut input = latch();
        input.record_down("w");
        world.step(&input);
        // Impulse 20, then the world's gravity of 2 per tick.
        let state = world.entity(id).expect("player exists");
        assert_eq!(state.position.y, 20.0);
        assert_eq!(state.velocity.y, 18.0);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn snapshot_reports_active_frame() {
        let mut world = World::new(1.5);
        let id = world.add_entity(Box::new(player()));
        let mut input = latch();
        input.record_down("w");
        world.step(&input);
        let state = world.entity(id).expect("player exists");
        // Jump strip is row 1 of the test sheet.
        assert_eq!(state.frame.y, 100.0);
        assert_eq!(state.image.id, 7);
    }
}
