//! Application module for the gallery viewer.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds the running session
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//!
//! # Event Flow
//!
//! 1. **Input Events**: Keys, mouse and touch are routed to the navigation controller
//! 2. **Frame**: Each redraw advances navigation and recomputes artwork visibility
//! 3. **Events**: Navigation events are drained into the log
//!
//! Everything runs on the event loop thread; image loading is driven to
//! completion with `pollster` when the window is created.

pub mod app_state;
pub mod event_handler;

pub use app_state::AppState;
pub use event_handler::App;
