//! The navigation controller: input in, player pose and events out.
//!
//! # Frame Order
//!
//! [`NavigationController::update`] runs once per frame:
//!
//! 1. Key intent is mapped onto the filtered yaw and scaled by walk or run speed
//! 2. The candidate position is resolved against the walls of its grid cell
//! 3. The walk cycle advances (emitting footsteps) or settles back to rest
//! 4. An in-flight teleport overrides the plan position with its eased path
//! 5. The view orientation follows the raw one through the look filter
//! 6. The head bob is derived from the walk phase
//!
//! Look input (mouse or touch drag) is applied as it arrives and only touches
//! the raw orientation.
//!
//! # Events
//!
//! Hosts collect [`NavEvent`]s with [`NavigationController::drain_events`]:
//!
//! - `Moved` is queued only on frames where the player actually moved or a
//!   teleport is in flight; an idle frame queues nothing
//! - `Looked` is queued for every applied look delta
//! - `Footstep` is queued when a stride starts, after that frame's move
//! - `Teleported` is queued when a teleport starts
//!
//! # Lifecycle
//!
//! After [`NavigationController::dispose`] every input and update is ignored
//! and the event queue stays empty.

use crate::config::{CameraConfig, NavigationConfig};
use crate::error::Result;
use crate::game::collision::{clear_of_walls, resolve_walls};
use crate::game::keys::{KeyState, NavKey};
use crate::game::player::{Player, Teleport};
use crate::game::teleport::{TeleportHit, find_landing};
use crate::game::{MotionState, NavEvent};
use crate::map::MapModel;
use crate::math::{Ray, Vec2, ease_in_out_cubic};
use std::sync::Arc;
use std::time::Instant;

/// A single-finger gesture in progress.
#[derive(Debug, Clone, Copy)]
struct TouchGesture {
    id: u64,
    first: Vec2,
    last: Vec2,
    started: Instant,
}

pub struct NavigationController {
    map: Arc<MapModel>,
    config: NavigationConfig,
    camera: CameraConfig,
    /// Viewport size in physical pixels.
    viewport: (u32, u32),
    player: Player,
    keys: KeyState,
    touch: Option<TouchGesture>,
    pointer_locked: bool,
    enabled: bool,
    events: Vec<NavEvent>,
}

impl NavigationController {
    /// Creates a controller with the player at the map's spawn pose.
    pub fn new(map: Arc<MapModel>, config: NavigationConfig, camera: CameraConfig) -> Result<Self> {
        config.validate()?;
        camera.validate()?;
        let spawn = map.spawn();
        let player = Player::new(spawn.position, spawn.yaw, config.eye_height);
        log::debug!(
            "Navigation starts at {:?} facing {:.3} rad",
            spawn.position,
            spawn.yaw
        );
        Ok(Self {
            map,
            config,
            camera,
            viewport: (0, 0),
            player,
            keys: KeyState::new(),
            touch: None,
            pointer_locked: false,
            enabled: true,
            events: Vec::new(),
        })
    }

    pub fn map(&self) -> &Arc<MapModel> {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn motion_state(&self) -> MotionState {
        if self.player.teleport.is_some() {
            MotionState::Teleporting
        } else if self.player.displacement != Vec2::ZERO {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    /// Moves the player to `position` facing `yaw`, cancelling any teleport.
    pub fn place(&mut self, position: Vec2, yaw: f32) {
        self.player = Player::new(position, yaw, self.config.eye_height);
    }

    pub fn key_down(&mut self, key: NavKey) {
        if self.enabled {
            self.keys.press_key(key);
        }
    }

    pub fn key_up(&mut self, key: NavKey) {
        if self.enabled {
            self.keys.release_key(key);
        }
    }

    /// Mouse look only applies while the pointer is locked to the window.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.enabled {
            self.pointer_locked = locked;
        }
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Updates the viewport used for unprojection and the camera aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.resize(width, height);
    }

    /// Applies a raw mouse delta. Moving the mouse right turns right and
    /// moving it down looks down.
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        if !self.enabled || !self.pointer_locked {
            return;
        }
        self.look(-dx, -dy, self.config.mouse_sensitivity);
    }

    fn look(&mut self, dx: f64, dy: f64, sensitivity: f32) {
        self.player.orient(dx, dy, sensitivity, &self.config);
        self.events.push(NavEvent::Looked {
            rotation: self.player.rotation,
        });
    }

    /// Starts tracking a finger. Only the first finger down is followed.
    pub fn touch_start(&mut self, id: u64, position: Vec2, at: Instant) {
        if !self.enabled || self.touch.is_some() {
            return;
        }
        self.touch = Some(TouchGesture {
            id,
            first: position,
            last: position,
            started: at,
        });
    }

    /// Drags the view with the tracked finger.
    pub fn touch_move(&mut self, id: u64, position: Vec2) {
        if !self.enabled {
            return;
        }
        let Some(gesture) = self.touch.as_mut().filter(|g| g.id == id) else {
            return;
        };
        let delta = position - gesture.last;
        gesture.last = position;
        self.look(
            delta.x() as f64,
            delta.y() as f64,
            self.config.touch_sensitivity,
        );
    }

    /// Ends the gesture; a short touch that barely moved teleports toward
    /// the touched point.
    pub fn touch_end(&mut self, id: u64, at: Instant) -> Option<TeleportHit> {
        if !self.enabled {
            return None;
        }
        let gesture = self.touch.filter(|g| g.id == id)?;
        self.touch = None;

        let held = at.saturating_duration_since(gesture.started);
        let travelled = gesture.first.distance(&gesture.last);
        if held < self.config.tap_duration && travelled < self.config.tap_distance {
            log::trace!("Tap at {:?} after {:?}", gesture.last, held);
            self.teleport_at_screen(gesture.last)
        } else {
            None
        }
    }

    pub fn touch_cancel(&mut self, id: u64) {
        if self.touch.is_some_and(|g| g.id == id) {
            self.touch = None;
        }
    }

    /// Converts a pixel position to normalized device coordinates.
    pub fn to_ndc(&self, pixel: Vec2) -> Option<Vec2> {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Vec2::new(
            pixel.x() / width as f32 * 2.0 - 1.0,
            -(pixel.y() / height as f32 * 2.0 - 1.0),
        ))
    }

    /// View ray through a pixel of the viewport.
    pub fn screen_ray(&self, pixel: Vec2) -> Option<Ray> {
        let ndc = self.to_ndc(pixel)?;
        Some(self.player.screen_ray(ndc, &self.camera))
    }

    /// Teleports toward the point under `pixel`.
    pub fn teleport_at_screen(&mut self, pixel: Vec2) -> Option<TeleportHit> {
        let ray = self.screen_ray(pixel)?;
        self.teleport_along(&ray)
    }

    /// Teleports toward whatever `ray` hits first.
    ///
    /// Returns the raw hit, before the landing point is pushed away from the
    /// walls. A miss leaves the player untouched.
    pub fn teleport_along(&mut self, ray: &Ray) -> Option<TeleportHit> {
        if !self.enabled {
            return None;
        }
        let grid = self.map.grid();
        let Some(hit) = find_landing(grid, ray, &self.config) else {
            log::trace!("No teleport target along {:?}", ray);
            return None;
        };

        let from = self.player.plan_position();
        let to = clear_of_walls(grid, hit.point, self.config.viewing_clearance);
        self.player.teleport = Some(Teleport {
            from,
            to,
            progress: 0.0,
        });
        log::debug!("Teleport ({:?}) from {:?} to {:?}", hit.kind, from, to);
        self.events.push(NavEvent::Teleported { from, to });
        Some(hit)
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_time)
        } else {
            0.0
        };
        let running = self.keys.is_running();
        let teleporting = self.player.teleport.is_some();

        let mut displacement = Vec2::ZERO;
        if !teleporting {
            let intent = self.keys.intent();
            let heading = self.player.forward() * intent.y() + self.player.right() * intent.x();
            let speed = if running {
                self.config.run_speed
            } else {
                self.config.walk_speed
            };
            let current = self.player.plan_position();
            let candidate = current + heading.normalize() * (speed * dt);
            let resolved = resolve_walls(self.map.grid(), candidate, self.config.wall_clearance);
            displacement = resolved - current;
        }
        self.player.running = running;
        self.player.displacement = displacement;

        let distance = displacement.length();
        let stepped = if distance > 0.0 {
            let stride = if running {
                self.config.run_stride
            } else {
                self.config.walk_stride
            };
            self.player.advance_walk(distance, stride)
        } else {
            self.player.settle_walk();
            false
        };

        let plan = self.player.plan_position() + displacement;
        self.player.position = plan.at_height(self.config.eye_height);

        if let Some(mut teleport) = self.player.teleport {
            teleport.progress = (teleport.progress + dt / self.config.teleport_duration).min(1.0);
            let eased = ease_in_out_cubic(teleport.progress);
            self.player.position = teleport
                .from
                .lerp(&teleport.to, eased)
                .at_height(self.config.eye_height);
            self.player.teleport = if teleport.progress >= 1.0 {
                log::trace!("Teleport arrived at {:?}", teleport.to);
                None
            } else {
                Some(teleport)
            };
        }

        self.player.filter_rotation(self.config.rotation_filter);
        self.player.update_bob(self.config.step_height);

        if stepped {
            self.events.push(NavEvent::Footstep {
                position: self.player.eye(),
                running,
            });
        }
        if distance > 0.0 || teleporting {
            self.events.push(NavEvent::Moved {
                position: self.player.eye(),
            });
        }
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    /// Detaches all input. Later calls are ignored.
    pub fn dispose(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.keys.clear();
        self.touch = None;
        self.pointer_locked = false;
        self.events.clear();
        log::info!("Navigation disposed");
    }
}
