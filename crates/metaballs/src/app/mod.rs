//! Application window, event loop and per-frame update.

mod input;

use std::collections::HashSet;
use std::sync::Arc;

use winit::{
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{CursorGrabMode, Window},
};

use metaball_core::{FrameClock, SceneConfig, Simulation};
use metaball_render::{RenderEngine, RenderError, SceneUniforms};

use crate::error::{AppError, Result};

pub use input::{movement_for_key, MouseLook};

/// The metaballs application state.
pub struct App {
    config: SceneConfig,
    simulation: Simulation,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    keys_down: HashSet<KeyCode>,
    mouse_look: MouseLook,
    focused: bool,
    close_requested: bool,
    error: Option<AppError>,
}

impl App {
    /// Builds the simulation for `config`. The window is created once the
    /// event loop resumes.
    pub fn new(config: SceneConfig) -> Result<Self> {
        let simulation = Simulation::new(&config)?;
        let clock = FrameClock::new(config.max_frame_delta);
        Ok(Self {
            config,
            simulation,
            clock,
            window: None,
            engine: None,
            keys_down: HashSet::new(),
            mouse_look: MouseLook::new(),
            focused: false,
            close_requested: false,
            error: None,
        })
    }

    /// Records a fatal error and stops the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    /// Grabs and hides the cursor while focused, releases it otherwise.
    fn set_cursor_captured(&self, captured: bool) {
        let Some(window) = &self.window else {
            return;
        };
        if captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                log::warn!("cursor grab unavailable: {err}");
            }
        } else if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("cursor release failed: {err}");
        }
        window.set_cursor_visible(!captured);
    }

    /// Advances the scene one frame and draws it.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        let Some(engine) = &mut self.engine else {
            return;
        };

        for &key in &self.keys_down {
            if let Some(direction) = movement_for_key(key) {
                engine.camera.process_keyboard(direction, dt);
            }
        }

        self.simulation.step(dt);
        let surface = self.simulation.extract_surface();
        engine.upload_surface(&surface);
        engine.update_scene_uniforms(&SceneUniforms::new(
            self.simulation.spheres(),
            self.config.light_position,
            self.config.light_color,
        ));

        match engine.render() {
            Ok(()) => {}
            Err(err @ (RenderError::SurfaceLost | RenderError::SurfaceOutdated)) => {
                log::debug!("skipping frame: {err}");
            }
            Err(RenderError::Timeout) => {
                log::warn!("timed out waiting for the next frame");
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }
}

/// Opens the window and runs the event loop until it closes.
pub fn run_app(config: SceneConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
