//! Keyboard input for walking.
//!
//! This module defines the [`NavKey`] enum for abstracting navigation actions
//! from physical keys, and [`KeyState`] for tracking which of them are held.
//! It also maps winit key events onto those actions.

use crate::math::Vec2;
use std::collections::HashSet;
use winit::keyboard;

/// Navigation actions that can be held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Walk forward (W or Up Arrow).
    MoveForward,
    /// Walk backward (S or Down Arrow).
    MoveBackward,
    /// Strafe left (A or Left Arrow).
    MoveLeft,
    /// Strafe right (D or Right Arrow).
    MoveRight,
    /// Run instead of walking (Shift).
    Run,
}

/// Tracks the set of currently held navigation keys.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    pressed_keys: HashSet<NavKey>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: NavKey) {
        self.pressed_keys.insert(key);
    }

    pub fn release_key(&mut self, key: NavKey) {
        self.pressed_keys.remove(&key);
    }

    pub fn is_pressed(&self, key: NavKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Movement intent as `(strafe, advance)`, each in `{-1, 0, 1}`.
    ///
    /// Opposite keys cancel out. Positive strafe is to the right, positive
    /// advance is forward.
    pub fn intent(&self) -> Vec2 {
        let axis = |positive: NavKey, negative: NavKey| {
            self.is_pressed(positive) as i32 as f32 - self.is_pressed(negative) as i32 as f32
        };
        Vec2::new(
            axis(NavKey::MoveRight, NavKey::MoveLeft),
            axis(NavKey::MoveForward, NavKey::MoveBackward),
        )
    }

    pub fn is_running(&self) -> bool {
        self.is_pressed(NavKey::Run)
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`NavKey`] if it is mapped.
///
/// Supports the arrow keys and Shift as named keys and WASD as characters,
/// ignoring case so that Shift+W still walks forward.
pub fn winit_key_to_nav_key(key: &keyboard::Key) -> Option<NavKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => NavKey::MoveForward,
            ArrowDown => NavKey::MoveBackward,
            ArrowLeft => NavKey::MoveLeft,
            ArrowRight => NavKey::MoveRight,
            Shift => NavKey::Run,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => NavKey::MoveForward,
            "s" => NavKey::MoveBackward,
            "a" => NavKey::MoveLeft,
            "d" => NavKey::MoveRight,
        }),

        _ => None,
    }
}
