//! Windowless replay: feeds an input script through the scene one tick at a
//! time and optionally saves the last rendered frame.

use std::path::Path;

use anyhow::Context;
use scroller_core::{EntityState, GameConfig, InputScript};

use crate::assets;

pub struct ReplayOutcome {
    pub ticks: u64,
    pub player: Option<EntityState>,
}

pub fn run_replay(
    config: &GameConfig,
    script: &InputScript,
    snapshot: Option<&Path>,
) -> anyhow::Result<ReplayOutcome> {
    let (mut scene, mut canvas) = assets::assemble(config).context("Failed to build scene")?;
    log::info!("Replaying {} ticks headless", script.tick_count());

    scene.run_script(script, &mut canvas);

    if let Some(path) = snapshot {
        // The last tick stepped after drawing; draw once more so the image
        // matches the final state.
        scene.render(&mut canvas);
        canvas
            .save_png(path)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(ReplayOutcome {
        ticks: scene.world.tick(),
        player: scene.player_state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::{config_without_assets, missing_asset_path};
    use scroller_core::script::ScriptFrame;
    use scroller_core::{Facing, Motion};

    fn walk_then_jump() -> InputScript {
        InputScript {
            frames: vec![
                ScriptFrame {
                    press: vec!["d".to_string()],
                    release: vec![],
                    repeat: 10,
                },
                ScriptFrame {
                    press: vec!["w".to_string()],
                    release: vec!["d".to_string()],
                    repeat: 1,
                },
            ],
        }
    }

    #[test]
    fn replay_moves_player_and_counts_ticks() {
        let config = config_without_assets();
        let outcome = run_replay(&config, &walk_then_jump(), None).expect("replay");

        assert_eq!(outcome.ticks, 11);
        let player = outcome.player.expect("player present");
        assert_eq!(
            player.position.x,
            config.player.start_x + 10.0 * config.player.speed
        );
        assert_eq!(player.motion, Motion::Jumping);
        assert_eq!(player.facing, Facing::Right);
        assert!(player.position.y > 0.0);
    }

    #[test]
    fn snapshot_is_written_at_canvas_size() {
        let config = config_without_assets();
        let path = std::path::PathBuf::from(missing_asset_path("snapshot"));
        run_replay(&config, &walk_then_jump(), Some(&path)).expect("replay");

        let written = image::open(&path).expect("snapshot readable");
        assert_eq!(
            (written.width(), written.height()),
            (config.window.width, config.window.height)
        );
        let _ = std::fs::remove_file(path);
    }
}
