//! Maze generation.
//!
//! The gallery layout is the outline of a Hilbert curve; see [`hilbert`] for
//! the curve itself, the turn-sign classification and seeded wall removal.

pub mod hilbert;

pub use hilbert::{Border, Joint, border_path, derive_border, emit_path, hilbert_curve};
