use std::path::Path;

/// Title shown when neither a title nor a usable file name is available.
const DEFAULT_TITLE: &str = "Artwork";

/// File extensions picked up when scanning a directory for artworks.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// An artwork to hang in the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: String,
    /// Display title. When missing, [`GalleryItem::display_title`] derives one
    /// from the image file name.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Reference handed to the [`ImageSource`](crate::gallery::ImageSource).
    pub image: String,
}

impl GalleryItem {
    pub fn new(id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            image: image.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The title, or one made from the image's file stem.
    ///
    /// # Example
    /// ```
    /// use hilbert_gallery::gallery::GalleryItem;
    ///
    /// let item = GalleryItem::new("1", "art/blue-lake.jpg");
    /// assert_eq!(item.display_title(), "Blue lake");
    /// ```
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => title_from_reference(&self.image),
        }
    }
}

fn title_from_reference(reference: &str) -> String {
    let stem = Path::new(reference)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .replace(['-', '_'], " ");
    let stem = stem.trim();

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Lists the images directly inside `dir` as gallery items, sorted by file
/// name. The file name doubles as id and image reference.
pub fn scan_directory(dir: &Path) -> crate::error::Result<Vec<GalleryItem>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    names.sort();
    log::info!("Found {} images in {}", names.len(), dir.display());
    Ok(names
        .into_iter()
        .map(|name| GalleryItem::new(name.clone(), name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the fallback title derived from file names.
    #[test]
    fn test_display_title_fallback() {
        assert_eq!(GalleryItem::new("a", "blue-lake.jpg").display_title(), "Blue lake");
        assert_eq!(
            GalleryItem::new("b", "dir/old_mill-2.png").display_title(),
            "Old mill 2"
        );
        assert_eq!(GalleryItem::new("c", "").display_title(), "Artwork");
        assert_eq!(
            GalleryItem::new("d", "x.png").with_title("  ").display_title(),
            "X"
        );
    }

    /// Tests that an explicit title wins.
    #[test]
    fn test_display_title_explicit() {
        let item = GalleryItem::new("a", "blue-lake.jpg")
            .with_title("Evening")
            .with_description("Oil on canvas");
        assert_eq!(item.display_title(), "Evening");
        assert_eq!(item.description.as_deref(), Some("Oil on canvas"));
    }

    /// Tests that scanning a missing directory is an IO error.
    #[test]
    fn test_scan_missing_directory() {
        let result = scan_directory(Path::new("/definitely/not/a/gallery"));
        assert!(matches!(result, Err(crate::error::GalleryError::Io(_))));
    }
}
