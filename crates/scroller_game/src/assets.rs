//! Turns a [`GameConfig`] into a ready scene plus the canvas it draws into.

use std::path::Path;

use scroller_core::{ConfigError, GameConfig, Scene, SceneImages};
use scroller_render::{placeholder_background, placeholder_sheet, ImageStore, RasterSurface};

pub fn load_scene_images(config: &GameConfig, store: &mut ImageStore) -> SceneImages {
    let player = &config.player;
    let player_sheet = store.load_or_else(Path::new(&player.sheet), || {
        let columns = player.walk.frame_count.max(player.jump.frame_count);
        let rows = player.walk.row.max(player.jump.row) + 1;
        let frame_width = player.walk.frame_width.max(player.jump.frame_width);
        let frame_height = player.walk.frame_height.max(player.jump.frame_height);
        placeholder_sheet(frame_width, frame_height, columns, rows)
    });
    let background = store.load_or_else(Path::new(&config.background.image), || {
        placeholder_background(config.window.width, config.window.height)
    });
    SceneImages {
        player_sheet,
        background,
    }
}

/// Loads images, builds the scene and hands back a canvas sized to the
/// configured window that owns the loaded images.
pub fn assemble(config: &GameConfig) -> Result<(Scene, RasterSurface), ConfigError> {
    let mut store = ImageStore::new();
    let images = load_scene_images(config, &mut store);
    let scene = Scene::build(config, images)?;
    let canvas = RasterSurface::new(config.window.width, config.window.height, store);
    Ok((scene, canvas))
}
