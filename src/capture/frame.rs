//! Screenshot data loaded from disk

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

/// A captured screenshot
#[derive(Debug)]
pub struct CapturedFrame {
    /// Decoded image
    pub image: DynamicImage,
    /// File the image was read from
    pub path: PathBuf,
}

impl CapturedFrame {
    /// Create a frame from an already decoded image
    pub fn new(image: DynamicImage, path: impl Into<PathBuf>) -> Self {
        Self {
            image,
            path: path.into(),
        }
    }

    /// Decode an image file into a frame
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;
        Ok(Self::new(image, path))
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_open_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbaImage::new(12, 7).save(&path).unwrap();

        let frame = CapturedFrame::open(&path).unwrap();
        assert_eq!(frame.dimensions(), (12, 7));
        assert_eq!(frame.path, path);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(CapturedFrame::open(Path::new("/nonexistent/shot.png")).is_err());
    }
}
