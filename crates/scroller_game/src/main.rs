//! Side-scrolling platformer: a walking, jumping character over an endlessly
//! scrolling background.
//!
//! Without `--replay` the game opens a window and runs one tick per displayed
//! frame. With `--replay` it feeds a recorded input script through the same
//! scene with no window and can save the final frame as a PNG.

mod app;
mod assets;
mod headless;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scroller_core::{load_config_from_path, load_script_from_path, GameConfig};
use scroller_platform::PlatformConfig;
use winit::event_loop::{ControlFlow, EventLoop};

use app::{App, Game};

/// Side-scrolling platformer
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Game config JSON. Built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run an input script headless instead of opening a window.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Save the last replayed frame as a PNG.
    #[arg(long, value_name = "PNG", requires = "replay")]
    snapshot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Scroller starting...");

    let config = match &cli.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            log::info!("No config given, using built-in defaults");
            GameConfig::default()
        }
    };

    if let Some(replay_path) = &cli.replay {
        let script = load_script_from_path(replay_path)
            .with_context(|| format!("Failed to load replay {}", replay_path.display()))?;
        let outcome = headless::run_replay(&config, &script, cli.snapshot.as_deref())?;
        match outcome.player {
            Some(player) => log::info!(
                "Replay finished after {} ticks: player at ({:.1}, {:.1}), {:?}, facing {:?}",
                outcome.ticks,
                player.position.x,
                player.position.y,
                player.motion,
                player.facing
            ),
            None => log::info!("Replay finished after {} ticks", outcome.ticks),
        }
        return Ok(());
    }

    let game = Game::new(&config)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(PlatformConfig::from(&config.window), game);
    event_loop.run_app(&mut app).context("Event loop error")?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
