// SPDX-License-Identifier: GPL-3.0-only

//! The photo booth
//!
//! [`Booth`] wires the camera session, filter selection, countdown, capture
//! pipeline, strip assembler and gallery together. Every control of the booth
//! (camera toggle, filter, mode, caption, capture, reset) is a method here.
//!
//! Failures are handled at this boundary: they are logged and returned, and
//! never leave the gallery or the strip buffer half updated.

pub mod countdown;
pub mod filter_picker;
pub mod state;

pub use countdown::{Countdown, CountdownDisplay, CountdownTick, HiddenDisplay};
pub use filter_picker::FilterSelector;
pub use state::{CaptureMode, CaptureOutcome};

use crate::backends::camera::{CameraBackend, CameraSession};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::gallery::GallerySink;
use crate::pipelines::photo::{Caption, CapturePipeline, StripAssembler};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct Booth {
    session: CameraSession,
    filters: FilterSelector,
    countdown: Arc<Countdown>,
    pipeline: CapturePipeline,
    strip: StripAssembler,
    gallery: Box<dyn GallerySink>,
    mode: CaptureMode,
    caption: String,
}

impl Booth {
    /// Create a booth with the camera off
    pub fn new(
        backend: Arc<dyn CameraBackend>,
        gallery: Box<dyn GallerySink>,
        config: &Config,
    ) -> Self {
        let mut session = CameraSession::new(backend);
        session.preview_mut().mirrored = config.mirror;

        let mut filters = FilterSelector::new();
        filters.select(&config.default_filter, session.preview_mut());

        Self {
            session,
            filters,
            countdown: Arc::new(Countdown::from_config(config)),
            pipeline: CapturePipeline::from_config(config),
            strip: StripAssembler::new(),
            gallery,
            mode: config.default_mode,
            caption: String::new(),
        }
    }

    // ===== Camera =====

    /// Turn the camera on or off
    ///
    /// A refused camera is reported and leaves the booth usable, with the
    /// camera off.
    pub async fn toggle_camera(&mut self) -> AppResult<()> {
        self.session.toggle().await.map_err(AppError::from)
    }

    pub async fn start_camera(&mut self) -> AppResult<()> {
        self.session.start().await.map_err(AppError::from)
    }

    pub fn stop_camera(&mut self) {
        self.session.stop();
    }

    // ===== Controls =====

    pub fn select_filter(&mut self, name: &str) {
        self.filters.select(name, self.session.preview_mut());
    }

    pub fn set_mode(&mut self, mode: CaptureMode) {
        if mode != self.mode {
            info!(%mode, pending = self.strip.len(), "Capture mode changed");
        }
        self.mode = mode;
    }

    /// Caption text as typed; it is trimmed when a photo is taken
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    // ===== Capture =====

    /// Count down, then capture
    ///
    /// Holds the booth for the whole countdown. To keep the controls usable
    /// while it runs, drive [`Booth::countdown_handle`] and call
    /// [`Booth::capture`] once it completes.
    pub async fn capture_with_countdown(
        &mut self,
        display: &mut dyn CountdownDisplay,
    ) -> AppResult<CaptureOutcome> {
        let countdown = Arc::clone(&self.countdown);
        countdown.run(display).await?;
        self.capture().await
    }

    /// Capture one frame and route it by mode
    ///
    /// With the camera off this does nothing and reports
    /// [`CaptureOutcome::CameraOff`].
    pub async fn capture(&mut self) -> AppResult<CaptureOutcome> {
        if !self.session.is_on() {
            debug!("Camera is off, skipping capture");
            return Ok(CaptureOutcome::CameraOff);
        }

        let result = self.capture_inner().await;
        if let Err(e) = &result {
            error!(error = %e, "Capture failed");
        }
        result
    }

    async fn capture_inner(&mut self) -> AppResult<CaptureOutcome> {
        let frame = self.session.grab_frame()?;
        let caption = Caption::new(&self.caption);

        let image = self
            .pipeline
            .capture(frame, self.filters.expression(), caption.clone())
            .await?;

        match self.mode {
            CaptureMode::Single => {
                self.gallery.add_entry(image, caption.as_ref())?;
                Ok(CaptureOutcome::Photo)
            }
            CaptureMode::Strip => {
                if !self.strip.push(image) {
                    return Ok(CaptureOutcome::StripPending {
                        frames: self.strip.len(),
                    });
                }

                // Put the fourth frame back out on failure so the buffer is unchanged
                let strip = match self.strip.assemble().await {
                    Ok(strip) => strip,
                    Err(e) => {
                        self.strip.pop();
                        return Err(e.into());
                    }
                };
                if let Err(e) = self.gallery.add_entry(strip, caption.as_ref()) {
                    self.strip.pop();
                    return Err(e.into());
                }

                self.strip.clear();
                info!("Photo strip added to gallery");
                Ok(CaptureOutcome::Strip)
            }
        }
    }

    /// Empty the gallery and drop any half-finished strip
    pub fn reset(&mut self) {
        info!(
            entries = self.gallery.len(),
            pending = self.strip.len(),
            "Resetting booth"
        );
        self.gallery.reset();
        self.strip.clear();
    }

    // ===== Accessors =====

    pub fn session(&self) -> &CameraSession {
        &self.session
    }

    pub fn camera_on(&mut self) -> bool {
        self.session.is_on()
    }

    pub fn filter(&self) -> &FilterSelector {
        &self.filters
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Shared countdown, runnable without borrowing the booth
    ///
    /// Every handle guards the same run, so a second trigger is refused
    /// wherever it comes from.
    pub fn countdown_handle(&self) -> Arc<Countdown> {
        Arc::clone(&self.countdown)
    }

    pub fn strip(&self) -> &StripAssembler {
        &self.strip
    }

    pub fn gallery(&self) -> &dyn GallerySink {
        self.gallery.as_ref()
    }
}

impl std::fmt::Debug for Booth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Booth")
            .field("session", &self.session)
            .field("filter", &self.filters.selected())
            .field("mode", &self.mode)
            .field("pending_strip", &self.strip.len())
            .field("gallery", &self.gallery.len())
            .finish()
    }
}
