use std::sync::Arc;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use metaball_render::{Camera, MovementDirection, RenderEngine};

use super::App;

/// Pixels of touchpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

/// Maps a held key to a camera movement.
#[must_use]
pub fn movement_for_key(key: KeyCode) -> Option<MovementDirection> {
    match key {
        KeyCode::KeyW => Some(MovementDirection::Forward),
        KeyCode::KeyS => Some(MovementDirection::Backward),
        KeyCode::KeyA => Some(MovementDirection::Left),
        KeyCode::KeyD => Some(MovementDirection::Right),
        KeyCode::Space => Some(MovementDirection::Up),
        KeyCode::ShiftLeft => Some(MovementDirection::Down),
        _ => None,
    }
}

/// Turns raw mouse motion into look offsets.
///
/// The first sample after creation or [`MouseLook::reset`] is swallowed, so
/// regaining focus does not jerk the view. The y offset is inverted: moving
/// the mouse up gives a positive offset.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    primed: bool,
}

impl MouseLook {
    /// Creates a tracker that swallows its first sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous sample.
    pub fn reset(&mut self) {
        self.primed = false;
    }

    /// Returns the look offset for a motion delta, or `None` for the first sample.
    pub fn offset(&mut self, dx: f64, dy: f64) -> Option<(f32, f32)> {
        if !self.primed {
            self.primed = true;
            return None;
        }
        Some((dx as f32, -dy as f32))
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let size = window.inner_size();
        let camera = Camera::from_config(
            &self.config.camera,
            size.width.max(1) as f32 / size.height.max(1) as f32,
        );
        let engine =
            match RenderEngine::new_windowed(window.clone(), camera, self.config.background_color)
                .block_on()
            {
                Ok(engine) => engine,
                Err(err) => return self.fail(event_loop, err.into()),
            };

        log::info!(
            "window {}x{} ready; WASD/Space/LeftShift to move, mouse to look, scroll to zoom, Escape to quit",
            size.width,
            size.height
        );

        self.window = Some(window.clone());
        self.engine = Some(engine);
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                self.mouse_look.reset();
                if !focused {
                    self.keys_down.clear();
                }
                self.set_cursor_captured(focused);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(engine) = &mut self.engine {
                    engine.camera.process_mouse_scroll(scroll_lines(delta));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if code == KeyCode::Escape {
                                self.close_requested = true;
                            }
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if !self.focused {
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let (Some(engine), Some((x, y))) = (&mut self.engine, self.mouse_look.offset(dx, dy))
            {
                engine.camera.process_mouse_movement(x, y, true);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
