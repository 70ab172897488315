//! Image loading for artworks.
//!
//! The placement manager only needs an image's pixel size; the decoded
//! pixels travel through it untouched as an [`ImageHandle`] for whoever
//! renders the canvas. Loads are asynchronous so that a host can back
//! [`ImageSource`] with a network fetch; the filesystem source resolves
//! immediately.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque image payload handed to the renderer.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    Decoded(Arc<image::DynamicImage>),
    /// Stand-in for an image that failed to load.
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub handle: ImageHandle,
}

impl LoadedImage {
    /// A square stand-in used when loading fails.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            handle: ImageHandle::Placeholder,
        }
    }

    pub fn from_image(image: image::DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            handle: ImageHandle::Decoded(Arc::new(image)),
        }
    }

    /// Width over height; degenerate sizes count as square.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.handle, ImageHandle::Placeholder)
    }
}

/// Something that turns an image reference into pixels.
pub trait ImageSource {
    fn load(&self, reference: &str) -> impl Future<Output = Result<LoadedImage>>;
}

/// Loads images from files below a root directory.
#[derive(Debug, Clone)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageSource for FsImageSource {
    async fn load(&self, reference: &str) -> Result<LoadedImage> {
        let path = self.root.join(reference);
        let image = image::ImageReader::open(&path)?
            .with_guessed_format()?
            .decode()?;
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(LoadedImage::from_image(image))
    }
}

/// Memoizes successful loads of another source by reference.
#[derive(Debug)]
pub struct CachedImageSource<S> {
    inner: S,
    cache: RefCell<HashMap<String, LoadedImage>>,
}

impl<S: ImageSource> CachedImageSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Drops the cached image for `reference`, returning whether it was cached.
    pub fn unload(&self, reference: &str) -> bool {
        self.cache.borrow_mut().remove(reference).is_some()
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<S: ImageSource> ImageSource for CachedImageSource<S> {
    async fn load(&self, reference: &str) -> Result<LoadedImage> {
        let hit = self.cache.borrow().get(reference).cloned();
        if let Some(image) = hit {
            log::trace!("Image cache hit for {reference}");
            return Ok(image);
        }
        let image = self.inner.load(reference).await?;
        self.cache
            .borrow_mut()
            .insert(reference.to_string(), image.clone());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use std::cell::Cell;

    /// Serves fixed sizes and counts the loads that reach it.
    struct CountingSource {
        loads: Cell<usize>,
    }

    impl ImageSource for CountingSource {
        async fn load(&self, reference: &str) -> Result<LoadedImage> {
            self.loads.set(self.loads.get() + 1);
            if reference == "missing.png" {
                return Err(GalleryError::Io(std::io::ErrorKind::NotFound.into()));
            }
            Ok(LoadedImage::from_image(image::DynamicImage::new_rgb8(40, 20)))
        }
    }

    /// Tests the aspect of decoded, placeholder and degenerate images.
    #[test]
    fn test_aspect() {
        assert_eq!(LoadedImage::from_image(image::DynamicImage::new_rgb8(40, 20)).aspect(), 2.0);
        assert_eq!(LoadedImage::placeholder().aspect(), 1.0);
        let empty = LoadedImage {
            width: 0,
            height: 10,
            handle: ImageHandle::Placeholder,
        };
        assert_eq!(empty.aspect(), 1.0);
    }

    /// Tests that repeated loads hit the cache until unloaded.
    #[test]
    fn test_cache() {
        let source = CachedImageSource::new(CountingSource {
            loads: Cell::new(0),
        });
        pollster::block_on(async {
            source.load("a.png").await.unwrap();
            source.load("a.png").await.unwrap();
        });
        assert_eq!(source.inner.loads.get(), 1);
        assert_eq!(source.cached(), 1);

        assert!(source.unload("a.png"));
        assert!(!source.unload("a.png"));
        pollster::block_on(source.load("a.png")).unwrap();
        assert_eq!(source.inner.loads.get(), 2);
    }

    /// Tests that failures are not cached.
    #[test]
    fn test_cache_skips_failures() {
        let source = CachedImageSource::new(CountingSource {
            loads: Cell::new(0),
        });
        assert!(pollster::block_on(source.load("missing.png")).is_err());
        assert!(pollster::block_on(source.load("missing.png")).is_err());
        assert_eq!(source.inner.loads.get(), 2);
        assert_eq!(source.cached(), 0);
    }

    /// Tests that a missing file surfaces as an IO error.
    #[test]
    fn test_fs_missing_file() {
        let source = FsImageSource::new("/definitely/not/a/gallery");
        let result = pollster::block_on(source.load("nothing.png"));
        assert!(matches!(result, Err(GalleryError::Io(_))));
    }
}
