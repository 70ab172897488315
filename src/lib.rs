//! # Hilbert Gallery
//!
//! The core of a walkable 3D art gallery whose floor plan is a Hilbert curve.
//!
//! ## Modules
//! - [`maze`]: the curve and the closed wall outline traced around it
//! - [`map`]: wall segments, the spatial grid, placement slots and wall geometry
//! - [`game`]: first-person navigation with collision and teleporting
//! - [`gallery`]: artwork placement, visibility culling and inspection
//! - [`math`]: small vector, matrix and ray types
//! - [`config`] and [`error`]: tunables and the shared error type
//!
//! A host generates a [`map::MapModel`] once, shares it between a
//! [`game::NavigationController`] and a [`gallery::PlacementManager`], and
//! drives both from its frame loop.

pub mod config;
pub mod error;
pub mod gallery;
pub mod game;
pub mod map;
pub mod math;
pub mod maze;
