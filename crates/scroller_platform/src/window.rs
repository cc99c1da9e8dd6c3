use std::sync::Arc;

use scroller_core::config::WindowSettings;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::from(&WindowSettings::default())
    }
}

impl From<&WindowSettings> for PlatformConfig {
    fn from(settings: &WindowSettings) -> Self {
        Self {
            title: settings.title.clone(),
            width: settings.width,
            height: settings.height,
            vsync: true,
        }
    }
}

/// Opens the window at the canvas size. Later resizes stretch the canvas.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let size = winit::dpi::LogicalSize::new(config.width, config.height);
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(size);

    let window = event_loop.create_window(attrs)?;
    log::info!(
        "Window created: '{}' {}x{}",
        config.title,
        config.width,
        config.height
    );
    Ok(Arc::new(window))
}
