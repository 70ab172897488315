//! Player state: pose, walk cycle and camera.
//!
//! This module defines the [`Player`] struct, which tracks where the visitor
//! stands, where they look and how far through a stride they are. It owns no
//! input handling; [`NavigationController`](crate::game::navigation::NavigationController)
//! feeds it.
//!
//! # Coordinate System
//!
//! Plan point `(x, y)` is world point `(x, height, y)`. Angles are in radians:
//! - **Yaw**: `0` looks toward `-z`, `π/2` toward `-x`
//! - **Pitch**: positive looks up, clamped to the configured limit
//!
//! # Orientation Filter
//!
//! Look input moves the raw [`Rotation`]; the view rotation used for rendering
//! and movement follows it through a first-order low-pass filter applied once
//! per frame.

use crate::config::{CameraConfig, NavigationConfig};
use crate::math::{Mat4, Ray, Vec2, Vec3, sign};

/// Walk phase at rest, where the head bob is neutral.
pub const REST_PHASE: f32 = 0.25;

/// Yaw and pitch in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

/// An in-flight teleport, eased from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub from: Vec2,
    pub to: Vec2,
    /// Normalized progress in `[0, 1]`.
    pub progress: f32,
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Plan position and eye height, without head bob.
    pub position: Vec3,
    /// Orientation as driven by look input.
    pub rotation: Rotation,
    /// Filtered orientation used for the camera and movement.
    pub view: Rotation,
    /// Plan displacement applied in the last frame.
    pub displacement: Vec2,
    pub running: bool,
    /// Stride counter; the fractional part drives the head bob.
    pub walk_phase: f32,
    /// Vertical head-bob offset added to the eye.
    pub bob: f32,
    pub teleport: Option<Teleport>,
}

impl Player {
    /// Creates a player standing at `position` with eyes at `eye_height`.
    pub fn new(position: Vec2, yaw: f32, eye_height: f32) -> Self {
        let rotation = Rotation { yaw, pitch: 0.0 };
        Self {
            position: position.at_height(eye_height),
            rotation,
            view: rotation,
            displacement: Vec2::ZERO,
            running: false,
            walk_phase: 0.5,
            bob: 0.0,
            teleport: None,
        }
    }

    pub fn plan_position(&self) -> Vec2 {
        self.position.plan()
    }

    /// Camera position including the head bob.
    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.bob, 0.0)
    }

    /// Plan heading the camera looks along.
    pub fn forward(&self) -> Vec2 {
        let (sin, cos) = self.view.yaw.sin_cos();
        Vec2::new(-sin, -cos)
    }

    /// Plan direction to the camera's right.
    pub fn right(&self) -> Vec2 {
        let (sin, cos) = self.view.yaw.sin_cos();
        Vec2::new(cos, -sin)
    }

    /// World-space look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.view.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    fn camera_up(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.view.pitch.sin_cos();
        Vec3::new(sin_yaw * sin_pitch, cos_pitch, cos_yaw * sin_pitch)
    }

    /// Ray from the eye through a point in normalized device coordinates.
    ///
    /// `ndc` runs from `(-1, -1)` at the bottom left to `(1, 1)` at the top right.
    pub fn screen_ray(&self, ndc: Vec2, camera: &CameraConfig) -> Ray {
        let half_height = (camera.fov_y / 2.0).tan();
        let half_width = half_height * camera.aspect;
        let right = self.right();
        let direction = self.look_direction()
            + Vec3::new(right.x(), 0.0, right.y()) * (ndc.x() * half_width)
            + self.camera_up() * (ndc.y() * half_height);
        Ray::new(self.position, direction)
    }

    /// Computes the world-to-camera matrix for the filtered orientation.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        let translation = Mat4::translation(-eye.x(), -eye.y(), -eye.z());
        let yaw = Mat4::rotation_y(-self.view.yaw);
        let pitch = Mat4::rotation_x(-self.view.pitch);
        pitch.multiply(&yaw).multiply(&translation)
    }

    pub fn view_proj_matrix(&self, camera: &CameraConfig) -> Mat4 {
        let projection = Mat4::perspective(camera.fov_y, camera.aspect, camera.near, camera.far);
        projection.multiply(&self.view_matrix())
    }

    /// Applies a look delta to the raw orientation.
    ///
    /// Deltas are clipped to the configured limit. Vertical input that pushes
    /// further past the slowdown angle is damped linearly to zero at the
    /// pitch limit, and pitch is then clamped to the limit.
    pub fn orient(&mut self, dx: f64, dy: f64, sensitivity: f32, config: &NavigationConfig) {
        let limit = config.look_delta_limit;
        let dx = dx.clamp(-limit, limit) as f32;
        let dy = dy.clamp(-limit, limit) as f32;

        let pitch = self.rotation.pitch;
        let mut smooth = 1.0;
        if pitch.abs() > config.pitch_slowdown && sign(pitch) == sign(dy) {
            smooth = ((config.pitch_limit - pitch.abs())
                / (config.pitch_limit - config.pitch_slowdown))
                .max(0.0);
        }

        self.rotation.pitch = (pitch + smooth * dy * sensitivity)
            .clamp(-config.pitch_limit, config.pitch_limit);
        self.rotation.yaw += dx * sensitivity;
    }

    /// Moves the view orientation toward the raw one by `weight`.
    pub fn filter_rotation(&mut self, weight: f32) {
        self.view.yaw = weight * self.rotation.yaw + (1.0 - weight) * self.view.yaw;
        self.view.pitch = weight * self.rotation.pitch + (1.0 - weight) * self.view.pitch;
    }

    /// Advances the walk cycle by `distance` and reports whether a new
    /// stride started.
    pub fn advance_walk(&mut self, distance: f32, stride: f32) -> bool {
        let before = self.walk_phase.floor();
        self.walk_phase += distance / stride;
        self.walk_phase.floor() != before
    }

    /// Eases the walk cycle back toward the rest phase while standing still.
    pub fn settle_walk(&mut self) {
        if self.walk_phase == REST_PHASE {
            return;
        }
        let w = self.walk_phase;
        self.walk_phase = (((w + 0.5) % 1.0 - 0.5).abs() - 0.25) * 0.8 + 0.25;
        if (self.walk_phase + 0.01) % 0.25 < 0.02 {
            self.walk_phase = REST_PHASE;
        }
    }

    /// Recomputes the head bob from the walk phase.
    pub fn update_bob(&mut self, step_height: f32) {
        self.bob = if self.walk_phase == REST_PHASE {
            0.0
        } else {
            step_height * (std::f32::consts::TAU * self.walk_phase).cos()
        };
    }
}
