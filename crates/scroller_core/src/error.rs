use std::path::PathBuf;

use thiserror::Error;

/// Setup-time misuse. The simulation itself never fails once constructed;
/// anything that could corrupt frame indices or input handling at runtime is
/// rejected here instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame strip has no frames")]
    EmptyFrameStrip,
    #[error("frame size must be non-zero, got {width}x{height}")]
    ZeroFrameSize { width: u32, height: u32 },
    #[error(
        "frame strip is {frame_count} frames of {frame_width}px, wider than its {image_width}px image"
    )]
    StripTooWide {
        frame_width: u32,
        frame_count: u32,
        image_width: u32,
    },
    #[error("frame strip row {row} ({frame_height}px frames) lies outside its {image_height}px image")]
    RowOutOfBounds {
        row: u32,
        frame_height: u32,
        image_height: u32,
    },
    #[error("input watch-list is empty")]
    EmptyWatchList,
    #[error("{action} binding '{key}' is not in the input watch-list")]
    UnwatchedBinding { action: &'static str, key: String },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("input script has no frames")]
    EmptyScript,
}

/// Reject NaN/infinite settings and, when `non_negative`, anything below zero.
pub(crate) fn check_finite(
    field: &'static str,
    value: f32,
    non_negative: bool,
) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} is not finite"),
        });
    }
    if non_negative && value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}
