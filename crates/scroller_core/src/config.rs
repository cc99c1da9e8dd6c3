//! Game tuning and asset settings, loaded from JSON.
//!
//! Every section and field falls back to the built-in tuning, so an empty
//! object `{}` is a valid config file.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::character::CharacterTuning;
use crate::error::{check_finite, ConfigError};
use crate::input::InputLatch;
use crate::player::Controls;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub background: BackgroundSettings,
    pub controls: ControlSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Raster canvas size; the window is created at this size and the canvas
    /// is stretched on resize.
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Scroller".to_string(),
            width: 800,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self { gravity: 1.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StripSettings {
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub row: u32,
    pub frame_count: u32,
}

impl StripSettings {
    fn extent(&self) -> (u32, u32) {
        (
            self.frame_width.saturating_mul(self.frame_count),
            self.row.saturating_add(1).saturating_mul(self.frame_height),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub sheet: String,
    pub speed: f32,
    pub jump_impulse: f32,
    pub start_x: f32,
    pub walk_rate: f64,
    pub jump_rate: f64,
    pub walk: StripSettings,
    pub jump: StripSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        let tuning = CharacterTuning::default();
        Self {
            sheet: "assets/player.png".to_string(),
            speed: 5.0,
            jump_impulse: tuning.jump_impulse,
            start_x: 40.0,
            walk_rate: tuning.walk_rate,
            jump_rate: tuning.jump_rate,
            walk: StripSettings {
                frame_width: 64,
                frame_height: 96,
                row: 0,
                frame_count: 8,
            },
            jump: StripSettings {
                frame_width: 64,
                frame_height: 96,
                row: 1,
                frame_count: 6,
            },
        }
    }
}

impl PlayerSettings {
    pub fn tuning(&self) -> CharacterTuning {
        CharacterTuning {
            jump_impulse: self.jump_impulse,
            walk_rate: self.walk_rate,
            jump_rate: self.jump_rate,
        }
    }

    /// Smallest sheet that holds both strips.
    pub fn sheet_size(&self) -> (u32, u32) {
        let (walk_w, walk_h) = self.walk.extent();
        let (jump_w, jump_h) = self.jump.extent();
        (walk_w.max(jump_w), walk_h.max(jump_h))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub image: String,
    pub scroll_speed: f32,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            image: "assets/background.png".to_string(),
            scroll_speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub left: String,
    pub right: String,
    pub jump: String,
    /// Keys the input latch tracks. Empty means "just the three bindings".
    pub watch: Vec<String>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        let controls = Controls::default();
        Self {
            left: controls.left,
            right: controls.right,
            jump: controls.jump,
            watch: Vec::new(),
        }
    }
}

impl ControlSettings {
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.left.clone(),
            right: self.right.clone(),
            jump: self.jump.clone(),
        }
    }

    pub fn watch_list(&self) -> Vec<String> {
        if self.watch.is_empty() {
            vec![self.left.clone(), self.right.clone(), self.jump.clone()]
        } else {
            self.watch.clone()
        }
    }

    /// Build the latch and check the bindings against it.
    pub fn build_latch(&self) -> Result<InputLatch, ConfigError> {
        let latch = InputLatch::new(self.watch_list())?;
        self.controls().validate(&latch)?;
        Ok(latch)
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window",
                reason: format!(
                    "canvas size {}x{} must be non-zero",
                    self.window.width, self.window.height
                ),
            });
        }
        check_finite("physics.gravity", self.physics.gravity, true)?;
        if self.physics.gravity == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "physics.gravity",
                reason: "must be positive or jumps never land".to_string(),
            });
        }
        check_finite("player.speed", self.player.speed, true)?;
        check_finite("player.jump_impulse", self.player.jump_impulse, true)?;
        if self.player.jump_impulse == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "player.jump_impulse",
                reason: "must be positive or a jump never leaves the ground".to_string(),
            });
        }
        check_finite("player.start_x", self.player.start_x, false)?;
        for (field, rate) in [
            ("player.walk_rate", self.player.walk_rate),
            ("player.jump_rate", self.player.jump_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{rate} must be a finite non-negative number"),
                });
            }
        }
        check_finite(
            "background.scroll_speed",
            self.background.scroll_speed,
            true,
        )?;
        self.controls.build_latch()?;
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    log::info!("Loaded config {}", path.display());
    Ok(config)
}
