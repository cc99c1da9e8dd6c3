//! Windowed loop driver.
//!
//! winit drives the event loop through `ApplicationHandler`. Every
//! `RedrawRequested` is one tick: draw the scene into the CPU canvas, step the
//! simulation, then upload the canvas and present it. With FIFO presentation
//! the tick rate is the display refresh rate.
//!
//! Keyboard events are translated to key identifiers and latched; the scene
//! reads them at its next step. Escape, F5 and F6 are handled here on press
//! and never reach the simulation as controls.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use scroller_core::{FrameClock, GameConfig, Scene};
use scroller_platform::{create_window, key_identifier, PlatformConfig};
use scroller_render::{FramePresenter, GpuContext, RasterSurface};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::assets;

const REPORT_EVERY_FRAMES: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Exit,
    TogglePause,
    StepOnce,
}

impl Control {
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Exit),
            "F5" => Some(Self::TogglePause),
            "F6" => Some(Self::StepOnce),
            _ => None,
        }
    }
}

/// Simulation side of the app: everything that runs without a window.
pub struct Game {
    pub scene: Scene,
    pub canvas: RasterSurface,
    pub clock: FrameClock,
    paused: bool,
    step_requested: bool,
}

impl Game {
    pub fn new(config: &GameConfig) -> anyhow::Result<Self> {
        let (scene, canvas) = assets::assemble(config).context("Failed to build scene")?;
        Ok(Self {
            scene,
            canvas,
            clock: FrameClock::new(),
            paused: false,
            step_requested: false,
        })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns false when the game should exit.
    pub fn apply_control(&mut self, control: Control) -> bool {
        match control {
            Control::Exit => return false,
            Control::TogglePause => {
                self.paused = !self.paused;
                self.step_requested = false;
                log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
            }
            Control::StepOnce => {
                if self.paused {
                    self.step_requested = true;
                }
            }
        }
        true
    }

    /// Render the current state, then advance one tick unless paused.
    pub fn frame(&mut self) {
        self.scene.render(&mut self.canvas);
        if !self.paused || std::mem::take(&mut self.step_requested) {
            self.scene.step();
        }
    }
}

struct GpuState {
    window: Arc<Window>,
    gpu: GpuContext,
    presenter: FramePresenter,
}

impl GpuState {
    fn new(window: Arc<Window>, vsync: bool, canvas: (u32, u32)) -> anyhow::Result<Self> {
        let gpu = GpuContext::new(window.clone(), vsync).context("GPU initialisation failed")?;
        let presenter = FramePresenter::new(&gpu.device, gpu.surface_format, canvas.0, canvas.1);
        Ok(Self {
            window,
            gpu,
            presenter,
        })
    }

    fn present(&self, canvas: &RasterSurface) {
        self.presenter.upload(&self.gpu.queue, canvas.canvas());
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.presenter.draw(&mut encoder, &view);
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

pub struct App {
    config: PlatformConfig,
    game: Game,
    gpu: Option<GpuState>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: PlatformConfig, game: Game) -> Self {
        Self {
            config,
            game,
            gpu: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        let window = match create_window(event_loop, &self.config) {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, anyhow!("Failed to create window: {err}")),
        };
        let canvas = (self.config.width, self.config.height);
        match GpuState::new(window, self.config.vsync, canvas) {
            Ok(state) => {
                self.game.clock.resync();
                self.gpu = Some(state);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.gpu {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.gpu.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                // Key-up events are not delivered to an unfocused window.
                self.game.scene.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = key_identifier(event.physical_key) else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        if let Some(control) = Control::for_key(key) {
                            if !event.repeat && !self.game.apply_control(control) {
                                log::info!("Escape pressed, exiting.");
                                event_loop.exit();
                            }
                            return;
                        }
                        self.game.scene.input.record_down(key);
                    }
                    ElementState::Released => {
                        self.game.scene.input.record_up(key);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                self.game.clock.begin_frame();
                self.game.frame();
                state.present(&self.game.canvas);

                if self.game.clock.is_report_frame(REPORT_EVERY_FRAMES) {
                    let player = self.game.scene.player_state();
                    log::debug!(
                        "tick {}{} | {:.1} fps ({:.2} ms) | player {:?}",
                        self.game.scene.world.tick(),
                        if self.game.is_paused() { " (paused)" } else { "" },
                        self.game.clock.smoothed_fps,
                        self.game.clock.smoothed_frame_time_ms,
                        player.map(|p| p.position)
                    );
                }
            }

            _ => {}
        }
    }
}
