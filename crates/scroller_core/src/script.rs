//! Scripted key presses for headless runs and reproducible sessions.
//!
//! ```json
//! { "frames": [
//!     { "press": ["d"], "repeat": 10 },
//!     { "press": ["w"], "release": ["d"] },
//!     { "release": ["w"], "repeat": 40 }
//! ] }
//! ```
//!
//! A frame's releases are applied before its presses, on the first of its
//! `repeat` ticks; the remaining ticks just hold the latch as it is.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::input::InputLatch;

#[derive(Debug, Deserialize, Clone)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScriptFrame {
    #[serde(default)]
    pub press: Vec<String>,
    #[serde(default)]
    pub release: Vec<String>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Latch transitions to apply before one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub press: Vec<String>,
    pub release: Vec<String>,
}

impl TickEvents {
    pub fn apply(&self, latch: &mut InputLatch) {
        for key in &self.release {
            latch.record_up(key);
        }
        for key in &self.press {
            if !latch.record_down(key) && !latch.is_watched(key) {
                log::debug!("Script pressed unwatched key '{}'", key);
            }
        }
    }
}

impl InputScript {
    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }

    /// One entry per tick.
    pub fn expanded(&self) -> Vec<TickEvents> {
        let mut out = Vec::with_capacity(self.tick_count());
        for frame in &self.frames {
            out.push(TickEvents {
                press: frame.press.clone(),
                release: frame.release.clone(),
            });
            for _ in 1..frame.repeat.max(1) {
                out.push(TickEvents::default());
            }
        }
        out
    }
}

pub fn load_script_from_path(path: &Path) -> Result<InputScript, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let script: InputScript = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if script.frames.is_empty() {
        return Err(ConfigError::EmptyScript);
    }
    Ok(script)
}

const fn default_repeat() -> u32 {
    1
}
