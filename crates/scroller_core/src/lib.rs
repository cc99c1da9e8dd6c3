//! Simulation and draw-call core of the side scroller.
//!
//! Nothing in here touches a window, a GPU or the file system beyond reading
//! config and input scripts. The platform layer owns the frame callback and
//! calls [`scene::Scene::tick`] (render, then step) once per displayed frame.

pub mod animation;
pub mod background;
pub mod character;
pub mod config;
pub mod error;
pub mod input;
pub mod player;
pub mod render;
pub mod scene;
pub mod script;
pub mod time;
pub mod world;

pub use animation::{AnimatedSprite, FrameStrip, ImageHandle};
pub use background::ScrollingBackground;
pub use character::{Character, CharacterTuning, Environment, FlatGround, Motion};
pub use config::{load_config_from_path, GameConfig};
pub use error::ConfigError;
pub use input::{HeldKeys, InputLatch};
pub use player::{ControllablePlayer, Controls, Facing};
pub use render::{Blit, Rect, Renderer, Surface};
pub use scene::{Scene, SceneImages};
pub use script::{load_script_from_path, InputScript};
pub use time::FrameClock;
pub use world::{BackgroundState, EntityId, EntityState, World};
