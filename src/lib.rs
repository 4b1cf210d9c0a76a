// SPDX-License-Identifier: GPL-3.0-only

//! Photobooth - countdown capture, filters, captioned cards and photo strips
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: The [`Booth`] orchestrator, countdown and filter selection
//! - [`backends`]: Camera backend abstraction, camera session, virtual camera
//! - [`pipelines`]: Card composition, captions, filters, encoding, strips
//! - [`gallery`]: Destinations for finished photos
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```no_run
//! use photobooth::backends::virtual_camera::VirtualCamera;
//! use photobooth::gallery::MemoryGallery;
//! use photobooth::{Booth, CaptureMode, Config};
//! use std::sync::Arc;
//!
//! # async fn demo() -> photobooth::errors::AppResult<()> {
//! let camera = Arc::new(VirtualCamera::test_pattern(640, 480));
//! let mut booth = Booth::new(camera, Box::new(MemoryGallery::new()), &Config::default());
//! booth.toggle_camera().await?;
//! booth.select_filter("polaroid");
//! booth.set_mode(CaptureMode::Strip);
//! for _ in 0..4 {
//!     booth.capture().await?;
//! }
//! assert_eq!(booth.gallery().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gallery;
pub mod pipelines;

// Re-export commonly used types
pub use app::{Booth, CaptureMode, CaptureOutcome};
pub use config::Config;
pub use pipelines::photo::FilterKind;
