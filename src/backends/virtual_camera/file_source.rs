// SPDX-License-Identifier: GPL-3.0-only

//! Still image source for the virtual camera

use crate::backends::camera::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::file_formats;
use std::path::Path;
use tracing::info;

/// Load an image file as a single RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(BackendError::Other(format!(
            "Unsupported file format: {}",
            extension
        )));
    }

    if !path.exists() {
        return Err(BackendError::DeviceNotFound(path.display().to_string()));
    }

    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::Other(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let frame = CameraFrame::from_rgba(img.to_rgba8());
    info!(width = frame.width, height = frame.height, "Image loaded successfully");

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_extension() {
        let err = load_image_as_frame(Path::new("clip.mkv")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_missing_file_is_device_not_found() {
        let err = load_image_as_frame(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, BackendError::DeviceNotFound(_)));
    }

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.png");
        image::RgbaImage::from_pixel(5, 3, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let frame = load_image_as_frame(&path).unwrap();
        assert_eq!((frame.width, frame.height), (5, 3));
        assert_eq!(&frame.data[..4], &[10, 20, 30, 255]);
    }
}
