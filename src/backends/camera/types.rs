// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use image::RgbaImage;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A single RGBA frame grabbed from a live stream
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly or loosely packed RGBA rows, see `stride`
    pub data: Arc<[u8]>,
    /// Bytes per row
    pub stride: u32,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap an already decoded RGBA image
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw().into_boxed_slice()),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Copy the frame into an `RgbaImage`, dropping any row padding
    pub fn to_rgba_image(&self) -> BackendResult<RgbaImage> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        if stride < row_bytes {
            return Err(BackendError::Other(format!(
                "Invalid stride {} for width {}",
                stride, self.width
            )));
        }

        let needed = stride * self.height.saturating_sub(1) as usize + row_bytes;
        if self.height > 0 && self.data.len() < needed {
            return Err(BackendError::Other(format!(
                "Frame data too small: expected {}, got {}",
                needed,
                self.data.len()
            )));
        }

        let pixels = if stride == row_bytes {
            self.data[..row_bytes * self.height as usize].to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
            for row in 0..self.height as usize {
                let start = row * stride;
                packed.extend_from_slice(&self.data[start..start + row_bytes]);
            }
            packed
        };

        RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| BackendError::Other("Failed to wrap frame pixels".to_string()))
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// What a stream request asks the platform for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub video: bool,
    pub audio: bool,
}

impl StreamConstraints {
    /// The booth only ever needs a picture
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

/// One track of a media stream
///
/// The liveness flag is shared with whoever produces the frames, so either side
/// can end the track (explicit stop, or the device going away).
#[derive(Debug, Clone)]
pub struct MediaTrack {
    pub id: String,
    pub label: String,
    pub kind: TrackKind,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop the track; stopping twice is harmless
    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Shared liveness flag, for producers that need to end the track themselves
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.live)
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// The user or the platform refused camera access
    PermissionDenied(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// The stream has no live video track left
    StreamEnded,
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::StreamEnded => write!(f, "Stream ended"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgba_image_strips_row_padding() {
        // 2x2 frame with 4 bytes of padding per row
        let mut data = Vec::new();
        data.extend_from_slice(&[1, 1, 1, 255, 2, 2, 2, 255, 0, 0, 0, 0]);
        data.extend_from_slice(&[3, 3, 3, 255, 4, 4, 4, 255, 0, 0, 0, 0]);
        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data),
            stride: 12,
            captured_at: Instant::now(),
        };

        let image = frame.to_rgba_image().unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [2, 2, 2, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [3, 3, 3, 255]);
    }

    #[test]
    fn test_to_rgba_image_rejects_short_buffer() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: Arc::from(vec![0u8; 10]),
            stride: 16,
            captured_at: Instant::now(),
        };
        assert!(frame.to_rgba_image().is_err());
    }

    #[test]
    fn test_track_stop_is_shared() {
        let track = MediaTrack::new("t0", "Virtual", TrackKind::Video);
        let flag = track.liveness();
        assert!(track.is_live());
        track.stop();
        assert!(!flag.load(Ordering::SeqCst));
    }
}
