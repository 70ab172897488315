//! Hilbert Gallery - a walkable art gallery laid out along a Hilbert curve.
//!
//! This is the desktop entry point. It hangs the images found in a directory on
//! the walls of a freshly generated gallery and lets you walk through it.
//!
//! # Usage
//! ```text
//! hilbert-gallery <art-dir>
//! ```
//! `GALLERY_SEED` fixes the layout; `RUST_LOG` controls logging (default `info`).
//!
//! # Controls
//! - **WASD / arrows**: walk, **Shift**: run
//! - **Left click**: grab the mouse, then inspect the artwork in the crosshair
//! - **Right click**: teleport toward the crosshair
//! - **Escape**: release the mouse
//! - **Touch**: drag to look, tap to teleport

#![warn(missing_docs)]
pub mod app;

use hilbert_gallery::config::GalleryConfig;
use hilbert_gallery::error::{GalleryError, Result};
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

/// Builds the config from the command line and environment, then runs the
/// event loop until the window is closed.
fn run() -> Result<()> {
    let art_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = GalleryConfig::default();
    if let Ok(seed) = std::env::var("GALLERY_SEED") {
        let seed = seed
            .trim()
            .parse()
            .map_err(|e| GalleryError::invalid_config(format!("GALLERY_SEED: {e}")))?;
        config.map.seed = Some(seed);
    }
    config.validate()?;
    log::info!("Opening gallery for {}", art_dir.display());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(config, art_dir);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
