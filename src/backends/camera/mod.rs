// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   Booth (app)       │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CameraSession     │  ← Off/On lifecycle, preview binding
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← request_stream()
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │VirtualCamera│  ← Image file or test pattern
//!     └─────────────┘
//! ```

pub mod session;
pub mod types;

pub use session::{CameraSession, PreviewSurface, SessionState};
pub use types::*;

use futures::future::BoxFuture;

/// Camera backend trait
///
/// A backend hands out live streams. Acquisition is asynchronous because real
/// platforms ask the user for permission before the first frame flows.
pub trait CameraBackend: Send + Sync {
    /// Human readable backend name for logs
    fn name(&self) -> &str;

    /// Request a new stream matching `constraints`
    ///
    /// # Returns
    /// * `Ok(stream)` - Stream with at least one live video track
    /// * `Err(BackendError::PermissionDenied)` - Access refused
    /// * `Err(BackendError::DeviceNotFound)` - Nothing to capture from
    fn request_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>>;
}

/// A live media stream owned by exactly one session
pub trait MediaStream: Send {
    /// Stream identifier, used to bind the preview surface
    fn id(&self) -> &str;

    /// All tracks of the stream
    fn tracks(&self) -> &[MediaTrack];

    /// Current frame of the first live video track
    fn grab_frame(&self) -> BackendResult<CameraFrame>;

    /// Stop every track
    fn stop_all(&mut self) {
        for track in self.tracks() {
            track.stop();
        }
    }

    /// True while at least one video track is live
    fn is_active(&self) -> bool {
        self.tracks()
            .iter()
            .any(|t| t.kind == TrackKind::Video && t.is_live())
    }
}
