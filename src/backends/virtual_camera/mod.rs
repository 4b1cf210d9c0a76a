// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! Serves frames from a still image or from a generated test pattern. Useful
//! on machines without a webcam and as the camera of the test suite. Access can
//! be refused on demand to exercise the denied-permission path, and all open
//! streams can be ended at once to mimic an unplugged device.

pub mod file_source;

use crate::backends::camera::types::{
    BackendError, BackendResult, CameraFrame, MediaTrack, StreamConstraints, TrackKind,
};
use crate::backends::camera::{CameraBackend, MediaStream};
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info};

/// Where virtual frames come from
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// A fixed picture
    Still(Arc<RgbaImage>),
    /// SMPTE-like color bars
    Pattern { width: u32, height: u32 },
}

/// State shared between a stream and the camera that issued it
struct StreamShared {
    liveness: Arc<AtomicBool>,
}

/// Virtual camera backend
pub struct VirtualCamera {
    source: FrameSource,
    access_denied: AtomicBool,
    next_stream: AtomicU64,
    issued: Mutex<Vec<Weak<StreamShared>>>,
}

impl VirtualCamera {
    pub fn new(source: FrameSource) -> Self {
        Self {
            source,
            access_denied: AtomicBool::new(false),
            next_stream: AtomicU64::new(0),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Camera serving generated color bars
    pub fn test_pattern(width: u32, height: u32) -> Self {
        Self::new(FrameSource::Pattern { width, height })
    }

    /// Camera serving a still image
    pub fn from_image(image: RgbaImage) -> Self {
        Self::new(FrameSource::Still(Arc::new(image)))
    }

    /// Camera serving the picture stored at `path`
    pub fn from_file(path: &Path) -> BackendResult<Self> {
        let frame = file_source::load_image_as_frame(path)?;
        Ok(Self::from_image(frame.to_rgba_image()?))
    }

    /// Refuse (or allow again) every following stream request
    pub fn set_access_denied(&self, denied: bool) {
        self.access_denied.store(denied, Ordering::SeqCst);
    }

    /// End every track of every open stream, as if the device was unplugged
    pub fn disconnect(&self) {
        info!("Virtual camera disconnected");
        for shared in self.live_streams() {
            shared.liveness.store(false, Ordering::SeqCst);
        }
    }

    /// Number of streams that are still referenced by someone
    pub fn open_streams(&self) -> usize {
        self.live_streams().len()
    }

    /// Number of open streams whose video track is still live
    pub fn live_tracks(&self) -> usize {
        self.live_streams()
            .iter()
            .filter(|s| s.liveness.load(Ordering::SeqCst))
            .count()
    }

    fn live_streams(&self) -> Vec<Arc<StreamShared>> {
        let mut issued = match self.issued.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        issued.retain(|w| w.strong_count() > 0);
        issued.iter().filter_map(Weak::upgrade).collect()
    }

    fn register(&self, shared: &Arc<StreamShared>) {
        let mut issued = match self.issued.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        issued.push(Arc::downgrade(shared));
    }
}

impl CameraBackend for VirtualCamera {
    fn name(&self) -> &str {
        "virtual"
    }

    fn request_stream(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>> {
        let denied = self.access_denied.load(Ordering::SeqCst);
        let index = self.next_stream.fetch_add(1, Ordering::SeqCst);

        let result: BackendResult<Box<dyn MediaStream>> = if denied {
            Err(BackendError::PermissionDenied(
                "virtual camera access refused".to_string(),
            ))
        } else if !constraints.video {
            Err(BackendError::DeviceNotFound(
                "virtual camera only provides video".to_string(),
            ))
        } else {
            let track = MediaTrack::new(
                format!("virtual-video-{}", index),
                "Virtual Camera",
                TrackKind::Video,
            );
            let shared = Arc::new(StreamShared {
                liveness: track.liveness(),
            });
            self.register(&shared);
            debug!(index, "Issued virtual stream");

            Ok(Box::new(VirtualStream {
                id: format!("virtual-stream-{}", index),
                tracks: vec![track],
                source: self.source.clone(),
                frame_counter: AtomicU64::new(0),
                _shared: shared,
            }))
        };

        Box::pin(async move { result })
    }
}

/// Stream handed out by [`VirtualCamera`]
struct VirtualStream {
    id: String,
    tracks: Vec<MediaTrack>,
    source: FrameSource,
    frame_counter: AtomicU64,
    _shared: Arc<StreamShared>,
}

impl MediaStream for VirtualStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    fn grab_frame(&self) -> BackendResult<CameraFrame> {
        if !self.is_active() {
            return Err(BackendError::StreamEnded);
        }

        let sequence = self.frame_counter.fetch_add(1, Ordering::Relaxed);
        let image = match &self.source {
            FrameSource::Still(image) => image.as_ref().clone(),
            FrameSource::Pattern { width, height } => color_bars(*width, *height, sequence),
        };
        Ok(CameraFrame::from_rgba(image))
    }
}

/// Seven vertical bars, with a one pixel marker row that moves per frame
fn color_bars(width: u32, height: u32, sequence: u64) -> RgbaImage {
    const BARS: [[u8; 3]; 7] = [
        [192, 192, 192],
        [192, 192, 0],
        [0, 192, 192],
        [0, 192, 0],
        [192, 0, 192],
        [192, 0, 0],
        [0, 0, 192],
    ];

    let marker_row = if height == 0 {
        0
    } else {
        (sequence % height as u64) as u32
    };

    RgbaImage::from_fn(width, height, |x, y| {
        if y == marker_row {
            return Rgba([255, 255, 255, 255]);
        }
        let bar = (x as usize * BARS.len()) / width.max(1) as usize;
        let [r, g, b] = BARS[bar.min(BARS.len() - 1)];
        Rgba([r, g, b, 255])
    })
}
