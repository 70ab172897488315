//! Tunables for map generation, navigation, placement and the camera.
//!
//! Every config is a plain struct with a [`Default`] carrying the values the
//! gallery ships with. Hosts override individual fields and call
//! [`GalleryConfig::validate`] before building anything.

use crate::error::{GalleryError, Result};
use crate::math::deg_to_rad;
use std::f32::consts::PI;
use std::time::Duration;

/// Highest curve order the grid index accepts; `4^(order + 1)` curve points.
pub const MAX_ORDER: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct GalleryConfig {
    pub map: MapConfig,
    pub navigation: NavigationConfig,
    pub placement: PlacementConfig,
    pub camera: CameraConfig,
}

impl GalleryConfig {
    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.navigation.validate()?;
        self.placement.validate()?;
        self.camera.validate()
    }
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Curve order of the maze; the gallery is `2^order` cells wide.
    pub order: u32,
    /// Edge length of one grid cell in world units.
    pub cell_size: f32,
    /// Wall thickness as a fraction of a corridor.
    pub wall_width: f32,
    /// Fraction of the `4^order` budget of walls to knock down.
    pub removal: f32,
    pub wall_height: f32,
    /// Seed for wall removal; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// How far in front of the first artwork the player spawns.
    pub spawn_distance: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            order: 6,
            cell_size: 8.0,
            wall_width: 0.25,
            removal: 0.5,
            wall_height: 7.0,
            seed: None,
            spawn_distance: 5.75,
        }
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(GalleryError::invalid_config(format!(
                "map order {} outside 1..={MAX_ORDER}",
                self.order
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(GalleryError::invalid_config("cell size must be positive"));
        }
        if !(0.0..2.0).contains(&self.wall_width) {
            return Err(GalleryError::invalid_config("wall width must be in [0, 2)"));
        }
        if !(0.0..=1.0).contains(&self.removal) {
            return Err(GalleryError::invalid_config("removal must be in [0, 1]"));
        }
        if !(self.wall_height > 0.0) {
            return Err(GalleryError::invalid_config("wall height must be positive"));
        }
        if !(self.spawn_distance >= 0.0) {
            return Err(GalleryError::invalid_config("spawn distance must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NavigationConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Distance covered per footstep while walking.
    pub walk_stride: f32,
    pub run_stride: f32,
    pub eye_height: f32,
    /// Amplitude of the head bob.
    pub step_height: f32,
    /// Closest the player may stand to a wall.
    pub wall_clearance: f32,
    /// Distance kept from walls after a teleport.
    pub viewing_clearance: f32,
    pub mouse_sensitivity: f32,
    pub touch_sensitivity: f32,
    /// Weight of the raw orientation in the look filter; `1` disables smoothing.
    pub rotation_filter: f32,
    /// Hard pitch limit in radians.
    pub pitch_limit: f32,
    /// Pitch beyond which look input is damped.
    pub pitch_slowdown: f32,
    /// Largest per-event look delta in pixels; bigger jumps are clipped.
    pub look_delta_limit: f64,
    /// Longest touch that still counts as a tap.
    pub tap_duration: Duration,
    /// Furthest a touch may wander and still count as a tap, in pixels.
    pub tap_distance: f32,
    pub teleport_duration: f32,
    /// Wall, floor and painting hits further than this are ignored.
    pub teleport_range: f32,
    pub ray_step: f32,
    pub ray_steps: usize,
    /// Height of the plane that caps teleport rays aimed upward.
    pub ceiling_plane: f32,
    /// Landing points this close to a slot midpoint snap onto it.
    pub painting_snap: f32,
    /// Frames longer than this are clamped before integrating.
    pub max_frame_time: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            run_speed: 12.0,
            walk_stride: 3.6,
            run_stride: 5.0,
            eye_height: 1.7,
            step_height: 0.03,
            wall_clearance: 0.5,
            viewing_clearance: 3.0,
            mouse_sensitivity: 0.002,
            touch_sensitivity: 0.008,
            rotation_filter: 0.95,
            pitch_limit: PI / 4.0,
            pitch_slowdown: PI / 6.0,
            look_delta_limit: 100.0,
            tap_duration: Duration::from_millis(300),
            tap_distance: 20.0,
            teleport_duration: 1.0,
            teleport_range: 40.0,
            ray_step: 4.0,
            ray_steps: 10,
            ceiling_plane: 5.0,
            painting_snap: 1.3,
            max_frame_time: 0.1,
        }
    }
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.walk_speed > 0.0 && self.run_speed > 0.0) {
            return Err(GalleryError::invalid_config("speeds must be positive"));
        }
        if !(self.walk_stride > 0.0 && self.run_stride > 0.0) {
            return Err(GalleryError::invalid_config("strides must be positive"));
        }
        if !(self.rotation_filter > 0.0 && self.rotation_filter <= 1.0) {
            return Err(GalleryError::invalid_config("rotation filter must be in (0, 1]"));
        }
        if !(self.pitch_slowdown < self.pitch_limit && self.pitch_limit < PI / 2.0) {
            return Err(GalleryError::invalid_config(
                "pitch slowdown must be below the pitch limit, itself below a right angle",
            ));
        }
        if !(self.teleport_duration > 0.0) {
            return Err(GalleryError::invalid_config("teleport duration must be positive"));
        }
        if !(self.wall_clearance >= 0.0 && self.viewing_clearance >= self.wall_clearance) {
            return Err(GalleryError::invalid_config(
                "viewing clearance must be at least the wall clearance",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Half-width of the placement-list window considered for culling.
    pub render_window: usize,
    /// Extra angle added on each side of the horizontal field of view.
    pub fov_margin: f32,
    /// Depth of the frame box.
    pub frame_depth: f32,
    /// Gap kept between the frame's back and the wall.
    pub wall_gap: f32,
    /// Fraction of the frame covered by the canvas.
    pub canvas_inset: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            render_window: 20,
            fov_margin: PI / 32.0,
            frame_depth: 0.1,
            wall_gap: 0.005,
            canvas_inset: 0.9,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<()> {
        if self.render_window == 0 {
            return Err(GalleryError::invalid_config("render window must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.canvas_inset) {
            return Err(GalleryError::invalid_config("canvas inset must be in [0, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: deg_to_rad(75.0),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_y > 0.0 && self.fov_y < PI) {
            return Err(GalleryError::invalid_config("vertical fov must be in (0, π)"));
        }
        if !(self.aspect > 0.0) {
            return Err(GalleryError::invalid_config("aspect must be positive"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(GalleryError::invalid_config("clip planes must satisfy 0 < near < far"));
        }
        Ok(())
    }

    /// Horizontal field of view derived from the vertical one and the aspect.
    pub fn fov_x(&self) -> f32 {
        2.0 * ((self.fov_y / 2.0).tan() * self.aspect).atan()
    }

    /// Updates the aspect from a viewport size, ignoring degenerate sizes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that the shipped defaults pass validation.
    #[test]
    fn test_defaults_are_valid() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    /// Tests that an out-of-range order is rejected.
    #[test]
    fn test_rejects_bad_order() {
        let config = MapConfig {
            order: 0,
            ..MapConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GalleryError::InvalidConfig { .. })
        ));
    }

    /// Tests the horizontal fov for a 16:9 viewport at 75° vertical.
    #[test]
    fn test_fov_x() {
        let camera = CameraConfig::default();
        let degrees = camera.fov_x().to_degrees();
        assert!((degrees - 107.5).abs() < 0.5, "{degrees}");
    }

    /// Tests that a zero-sized resize keeps the previous aspect.
    #[test]
    fn test_resize_ignores_zero() {
        let mut camera = CameraConfig::default();
        camera.resize(800, 0);
        assert_eq!(camera.aspect, 16.0 / 9.0);
        camera.resize(800, 800);
        assert_eq!(camera.aspect, 1.0);
    }
}
