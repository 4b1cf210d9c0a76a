// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photo booth

use crate::backends::camera::types::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture and composition errors
    Photo(PhotoError),
    /// Gallery errors
    Gallery(GalleryError),
    /// Countdown errors
    Countdown(CountdownError),
    /// Configuration errors
    Config(ConfigError),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Permission to use the camera was denied
    AccessDenied(String),
    /// No camera devices found
    NoCameraFound,
    /// Operation needs a running camera
    NotStarted,
    /// Backend error while acquiring or reading the stream
    BackendError(String),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Grabbing or drawing the frame failed
    CaptureFailed(String),
    /// Filter could not be applied
    FilterFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// A buffered image could not be decoded
    DecodeFailed(String),
    /// Strip assembly was asked for before all frames were captured
    StripIncomplete { have: usize, need: usize },
}

/// Gallery errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// Writing an entry to disk failed
    SaveFailed(String),
}

/// Countdown errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownError {
    /// A countdown is already in flight
    AlreadyRunning,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read or written
    Io(String),
    /// Config file is not valid JSON for this version
    Parse(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Gallery(e) => write!(f, "Gallery error: {}", e),
            AppError::Countdown(e) => write!(f, "Countdown error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::AccessDenied(msg) => write!(f, "Camera access denied: {}", msg),
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::NotStarted => write!(f, "Camera is off"),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::FilterFailed(msg) => write!(f, "Filter failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            PhotoError::StripIncomplete { have, need } => {
                write!(f, "Strip needs {} frames, have {}", need, have)
            }
        }
    }
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for CountdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownError::AlreadyRunning => write!(f, "Countdown already running"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for GalleryError {}
impl std::error::Error for CountdownError {}
impl std::error::Error for ConfigError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        AppError::Gallery(err)
    }
}

impl From<CountdownError> for AppError {
    fn from(err: CountdownError) -> Self {
        AppError::Countdown(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PermissionDenied(msg) => CameraError::AccessDenied(msg),
            BackendError::DeviceNotFound(_) => CameraError::NoCameraFound,
            other => CameraError::BackendError(other.to_string()),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err.into())
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        GalleryError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => PhotoError::DecodeFailed(e.to_string()),
            other => PhotoError::EncodingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_maps_to_access_denied() {
        let err: CameraError = BackendError::PermissionDenied("user said no".into()).into();
        assert_eq!(err, CameraError::AccessDenied("user said no".into()));
    }

    #[test]
    fn test_app_error_display_prefixes_category() {
        let err: AppError = PhotoError::StripIncomplete { have: 2, need: 4 }.into();
        assert_eq!(err.to_string(), "Photo error: Strip needs 4 frames, have 2");
    }
}
