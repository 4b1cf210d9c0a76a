// SPDX-License-Identifier: GPL-3.0-only

//! Camera session lifecycle
//!
//! The session is the only owner of the live stream. It keeps the preview
//! surface and the toggle label in step with its Off/On state.

use super::types::{CameraFrame, StreamConstraints};
use super::{CameraBackend, MediaStream};
use crate::constants::labels;
use crate::errors::CameraError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Off,
    On,
}

/// The live preview the user looks at
///
/// `source` is the id of the bound stream, `None` while the camera is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSurface {
    pub source: Option<String>,
    /// Visual effect currently applied to the preview
    pub filter: String,
    /// Preview is shown mirrored, like a mirror
    pub mirrored: bool,
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self {
            source: None,
            filter: "none".to_string(),
            mirrored: true,
        }
    }
}

/// Camera session manager
pub struct CameraSession {
    backend: Arc<dyn CameraBackend>,
    stream: Option<Box<dyn MediaStream>>,
    preview: PreviewSurface,
    toggle_label: &'static str,
}

impl CameraSession {
    /// Create an idle session; the camera is never started automatically
    pub fn new(backend: Arc<dyn CameraBackend>) -> Self {
        info!(backend = backend.name(), "Creating camera session");
        Self {
            backend,
            stream: None,
            preview: PreviewSurface::default(),
            toggle_label: labels::CAMERA_OFF,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.stream.is_some() {
            SessionState::On
        } else {
            SessionState::Off
        }
    }

    /// Check whether the camera is on, releasing a stream whose tracks all ended
    pub fn is_on(&mut self) -> bool {
        let ended = self.stream.as_ref().is_some_and(|s| !s.is_active());
        if ended {
            warn!("All camera tracks ended, turning camera off");
            self.stop();
        }
        self.stream.is_some()
    }

    /// Acquire a video-only stream and bind it to the preview
    ///
    /// On failure the session stays off and nothing is retained. Starting an
    /// already running session does nothing.
    pub async fn start(&mut self) -> Result<(), CameraError> {
        if self.is_on() {
            debug!("Camera already on");
            return Ok(());
        }

        info!(backend = self.backend.name(), "Requesting camera stream");
        let request = self
            .backend
            .request_stream(StreamConstraints::video_only());

        match request.await {
            Ok(stream) => {
                info!(stream = stream.id(), tracks = stream.tracks().len(), "Camera started");
                self.preview.source = Some(stream.id().to_string());
                self.stream = Some(stream);
                self.toggle_label = labels::CAMERA_ON;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Camera access denied");
                Err(e.into())
            }
        }
    }

    /// Halt every track and release the stream; no-op when off
    pub fn stop(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };

        stream.stop_all();
        info!(stream = stream.id(), "Camera stopped");
        drop(stream);

        self.preview.source = None;
        self.toggle_label = labels::CAMERA_OFF;
    }

    /// Stop when on, start when off
    pub async fn toggle(&mut self) -> Result<(), CameraError> {
        if self.stream.is_some() {
            self.stop();
            Ok(())
        } else {
            self.start().await
        }
    }

    /// Grab the current frame of the live stream
    pub fn grab_frame(&mut self) -> Result<CameraFrame, CameraError> {
        if !self.is_on() {
            return Err(CameraError::NotStarted);
        }
        match &self.stream {
            Some(stream) => stream.grab_frame().map_err(CameraError::from),
            None => Err(CameraError::NotStarted),
        }
    }

    /// Text of the camera toggle button
    pub fn toggle_label(&self) -> &'static str {
        self.toggle_label
    }

    pub fn preview(&self) -> &PreviewSurface {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewSurface {
        &mut self.preview
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("backend", &self.backend.name())
            .field("state", &self.state())
            .field("preview", &self.preview)
            .finish()
    }
}
