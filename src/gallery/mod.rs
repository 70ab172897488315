//! Artworks: what hangs where, and what can be seen.
//!
//! - [`item`] describes the artworks handed in by the host
//! - [`image_source`] loads their images behind the [`ImageSource`] trait
//! - [`placement`] hangs them on the map's slots and culls them per frame

pub mod image_source;
pub mod item;
pub mod placement;

pub use image_source::{CachedImageSource, FsImageSource, ImageHandle, ImageSource, LoadedImage};
pub use item::{GalleryItem, scan_directory};
pub use placement::{ArtworkId, Liveness, PlacedArtwork, PlacementManager};
