//! Error type shared by the gallery core and its host binary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The curve construction produced a border it cannot close. Never
    /// expected for a valid order; construction is aborted.
    #[error("Maze generation failed: {reason}")]
    Generation { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl GalleryError {
    pub fn invalid_config<T: ToString>(reason: T) -> Self {
        GalleryError::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    pub fn generation<T: ToString>(reason: T) -> Self {
        GalleryError::Generation {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
