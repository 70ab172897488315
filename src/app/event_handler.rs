//! Event handler module for the gallery viewer.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use hilbert_gallery::config::GalleryConfig;
use hilbert_gallery::error::GalleryError;
use hilbert_gallery::game::winit_key_to_nav_key;
use hilbert_gallery::math::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    error::EventLoopError,
    dpi::PhysicalSize,
    event::{
        DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent,
    },
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

/// Main application struct that owns the window and the gallery session.
///
/// # Lifecycle
/// 1. Created with [`App::new`] from the gallery config and artwork directory
/// 2. On `resumed` the window is created and the gallery is generated
/// 3. Events are routed to the navigation controller and placements
/// 4. On close both are disposed and the event loop exits
pub struct App {
    config: GalleryConfig,
    art_dir: PathBuf,
    /// The running session, None until the window exists.
    pub state: Option<AppState>,
    /// The application window, None until created.
    pub window: Option<Arc<Window>>,
    /// First fatal error raised inside the event loop.
    error: Option<GalleryError>,
}

impl App {
    /// Creates an [`App`] that will show the images in `art_dir`.
    pub fn new(config: GalleryConfig, art_dir: PathBuf) -> Self {
        Self {
            config,
            art_dir,
            state: None,
            window: None,
            error: None,
        }
    }

    /// Takes the error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<GalleryError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GalleryError) {
        log::error!("{error}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn handle_touch(state: &mut AppState, touch: Touch) {
        let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => state.navigation.touch_start(touch.id, position, Instant::now()),
            TouchPhase::Moved => state.navigation.touch_move(touch.id, position),
            TouchPhase::Ended => {
                if let Some(hit) = state.navigation.touch_end(touch.id, Instant::now()) {
                    log::debug!("Tap teleport: {hit:?}");
                }
            }
            TouchPhase::Cancelled => state.navigation.touch_cancel(touch.id),
        }
    }
}

impl ApplicationHandler for App {
    /// Creates the window and the gallery session on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("Hilbert Gallery")
            .with_inner_size(PhysicalSize::new(1360, 768));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, GalleryError::EventLoop(EventLoopError::Os(err)));
                return;
            }
        };

        match AppState::new(&self.config, &self.art_dir, &window) {
            Ok(state) => {
                window.request_redraw();
                self.state = Some(state);
                self.window = Some(window);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    /// Forwards raw mouse motion to the look controls while the cursor is grabbed.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                state.navigation.mouse_motion(delta.0, delta.1);
            }
        }
    }

    /// Routes keyboard, mouse, touch, resize, close and redraw events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                state.dispose();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                // Minimized windows report a zero size.
                if new_size.width > 0 && new_size.height > 0 {
                    state.navigation.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if key == Key::Named(NamedKey::Escape) && key_state == ElementState::Pressed {
                    state.navigation.set_pointer_locked(false);
                    state.triage_mouse(window);
                } else if let Some(nav_key) = winit_key_to_nav_key(&key) {
                    match key_state {
                        ElementState::Pressed => state.navigation.key_down(nav_key),
                        ElementState::Released => state.navigation.key_up(nav_key),
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let center = AppState::screen_center(window);
                match button {
                    MouseButton::Left if !state.navigation.pointer_locked() => {
                        state.navigation.set_pointer_locked(true);
                        state.triage_mouse(window);
                    }
                    MouseButton::Left => {
                        state.placements.inspect_at_screen(&state.navigation, center);
                    }
                    MouseButton::Right => {
                        if let Some(hit) = state.navigation.teleport_at_screen(center) {
                            log::debug!("Teleport: {hit:?}");
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::Focused(false) => {
                state.navigation.set_pointer_locked(false);
                state.triage_mouse(window);
            }

            WindowEvent::Touch(touch) => Self::handle_touch(state, touch),

            WindowEvent::RedrawRequested => {
                state.tick();
                window.set_title(&state.title());
                window.request_redraw();
            }

            _ => {}
        }
    }
}
