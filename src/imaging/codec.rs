//! Decode/encode seam for full-size rasters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::buffer::ConvertBuffer;
use image::{ImageFormat, RgbImage, RgbaImage};

use super::ImagingError;
use crate::constants::IMAGE_EXTENSIONS;

/// Source and sink for rasters addressed by path.
///
/// Grids decode their base image through a codec and write recomposed output
/// back through it, so the navigation model never touches the filesystem directly.
pub trait ImageCodec {
    /// Read the image at `path` as RGBA.
    fn decode(&self, path: &Path) -> Result<RgbaImage, ImagingError>;

    /// Write `image` to `path`, keeping the format named by the path suffix.
    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), ImagingError>;
}

/// Check if a path has a supported image extension.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Codec backed by the `image` crate and the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> Result<RgbaImage, ImagingError> {
        let img = image::open(path).map_err(|source| ImagingError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        log::trace!(
            "FileCodec: decoded {:?} ({}x{})",
            path,
            img.width(),
            img.height()
        );

        Ok(img.to_rgba8())
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), ImagingError> {
        let format = ImageFormat::from_path(path).map_err(|_| ImagingError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let result = if format == ImageFormat::Jpeg {
            // JPEG carries no alpha channel
            let rgb: RgbImage = image.convert();
            rgb.save_with_format(path, format)
        } else {
            image.save_with_format(path, format)
        };

        result.map_err(|source| ImagingError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("FileCodec: wrote {:?} as {:?}", path, format);
        Ok(())
    }
}

/// Codec that keeps rasters in memory, keyed by path.
///
/// Used by tests and by hosts that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryCodec {
    images: RefCell<HashMap<PathBuf, RgbaImage>>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image under `path`, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, image: RgbaImage) {
        self.images.borrow_mut().insert(path.into(), image);
    }

    /// Get a copy of the image stored under `path`.
    pub fn get(&self, path: &Path) -> Option<RgbaImage> {
        self.images.borrow().get(path).cloned()
    }

    /// Check if an image is stored under `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.images.borrow().contains_key(path)
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.images.borrow().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl ImageCodec for MemoryCodec {
    fn decode(&self, path: &Path) -> Result<RgbaImage, ImagingError> {
        self.get(path).ok_or_else(|| ImagingError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<(), ImagingError> {
        self.insert(path, image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_image;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("transect-codec-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("survey/DSC0001.JPG")));
        assert!(is_image_path(Path::new("a.png")));
        assert!(!is_image_path(Path::new("counts.json")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_memory_codec_round_trip() {
        let codec = MemoryCodec::new();
        let img = test_image::gradient(8, 4);
        codec.encode(&img, Path::new("/survey/a.png")).unwrap();

        assert!(codec.contains(Path::new("/survey/a.png")));
        assert_eq!(codec.decode(Path::new("/survey/a.png")).unwrap(), img);
    }

    #[test]
    fn test_memory_codec_missing_is_decode_failure() {
        let codec = MemoryCodec::new();
        let err = codec.decode(Path::new("/nowhere.png")).unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_file_codec_png_is_lossless() {
        let dir = scratch_dir("png");
        let path = dir.join("tile.png");
        let img = test_image::gradient(17, 9);

        FileCodec.encode(&img, &path).unwrap();
        let decoded = FileCodec.decode(&path).unwrap();
        assert_eq!(decoded, img);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_codec_writes_jpeg_without_alpha() {
        let dir = scratch_dir("jpeg");
        let path = dir.join("photo.jpg");
        let img = test_image::solid(12, 12, [200, 40, 40, 255]);

        FileCodec.encode(&img, &path).unwrap();
        let decoded = FileCodec.decode(&path).unwrap();
        assert_eq!(decoded.dimensions(), (12, 12));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_codec_rejects_unknown_suffix() {
        let img = test_image::solid(2, 2, [0, 0, 0, 255]);
        let err = FileCodec
            .encode(&img, Path::new("out.notanimage"))
            .unwrap_err();
        assert!(matches!(err, ImagingError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_file_codec_missing_file_is_decode_failure() {
        let err = FileCodec
            .decode(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(err.is_decode_failure());
    }
}
