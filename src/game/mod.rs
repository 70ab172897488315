//! First-person navigation through the gallery.
//!
//! This module holds the visitor's state and everything that moves it: key
//! tracking, wall collision, teleport picking and the
//! [`NavigationController`] that ties them together once per frame. The
//! controller never touches UI state; it queues [`NavEvent`]s that the host
//! drains after each update.

pub mod collision;
pub mod keys;
pub mod navigation;
pub mod player;
pub mod teleport;

pub use keys::{KeyState, NavKey, winit_key_to_nav_key};
pub use navigation::NavigationController;
pub use player::{Player, Rotation};
pub use teleport::{TeleportHit, TeleportKind};

use crate::math::{Vec2, Vec3};

/// Notifications produced by the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// The eye moved, by walking or by an in-flight teleport.
    Moved { position: Vec3 },
    /// Look input changed the raw orientation.
    Looked { rotation: Rotation },
    /// A new stride started.
    Footstep { position: Vec3, running: bool },
    /// A teleport was started.
    Teleported { from: Vec2, to: Vec2 },
}

/// What the visitor is doing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    Moving,
    /// Position follows the teleport interpolation; look input still applies.
    Teleporting,
}
