// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture pipeline
//!
//! ```text
//! Live frame → Mirror + Filter → Bordered card → Caption → PNG
//!                                                           ↓
//!                                         Gallery  or  Strip buffer → Strip
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Compose**: white card, frame mirrored into the interior with the
//!    active filter applied
//! 2. **Caption**: optional text in the bottom band, never mirrored
//! 3. **Encoding**: lossless PNG on a blocking task
//!
//! Routing of the result (single photo or strip) is up to the caller.

pub mod caption;
pub mod encoding;
pub mod filters;
pub mod strip;

pub use caption::{Caption, CaptionRenderer, CaptionStyle};
pub use encoding::{CapturedImage, ImageKind};
pub use filters::{FilterExpression, FilterKind, resolve};
pub use strip::StripAssembler;

use crate::backends::camera::types::CameraFrame;
use crate::config::Config;
use crate::constants::card;
use crate::errors::PhotoError;
use image::{Rgba, RgbaImage, imageops};
use tracing::{debug, info};

/// Geometry of the bordered card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    /// Left, top and right border
    pub border: u32,
    /// Bottom band holding the caption
    pub bottom_border: u32,
    /// Flip the frame horizontally like the preview
    pub mirror: bool,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            border: card::BORDER_SIZE,
            bottom_border: card::BOTTOM_BORDER_SIZE,
            mirror: true,
        }
    }
}

impl CardLayout {
    /// Card size for a live frame of `width` x `height`
    pub fn card_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let card_width = width.checked_add(self.border.checked_mul(2)?)?;
        let card_height = height
            .checked_add(self.border)?
            .checked_add(self.bottom_border)?;
        Some((card_width, card_height))
    }
}

/// Turns live frames into finished photo cards
#[derive(Debug, Clone, Default)]
pub struct CapturePipeline {
    layout: CardLayout,
    captions: CaptionRenderer,
}

impl CapturePipeline {
    pub fn new(layout: CardLayout, caption_style: CaptionStyle) -> Self {
        Self {
            layout,
            captions: CaptionRenderer::new(caption_style),
        }
    }

    /// Build a pipeline from user configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CardLayout {
                border: config.border_size,
                bottom_border: config.bottom_border_size,
                mirror: config.mirror,
            },
            CaptionStyle {
                font_family: config.caption_font_family.clone(),
                font_size: config.caption_font_size,
                ..CaptionStyle::default()
            },
        )
    }

    pub fn layout(&self) -> CardLayout {
        self.layout
    }

    /// Compose one card from a live frame
    ///
    /// # Arguments
    /// * `frame` - Live RGBA frame
    /// * `filter` - Filter expression active on the preview
    /// * `caption` - Optional caption for the bottom band
    pub fn compose(
        &self,
        frame: &CameraFrame,
        filter: &FilterExpression,
        caption: Option<&Caption>,
    ) -> Result<RgbaImage, PhotoError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(PhotoError::CaptureFailed("empty frame".to_string()));
        }

        let (card_width, card_height) = self
            .layout
            .card_size(frame.width, frame.height)
            .ok_or_else(|| {
                PhotoError::CaptureFailed(format!(
                    "card too large for {}x{} frame",
                    frame.width, frame.height
                ))
            })?;

        let mut picture = frame
            .to_rgba_image()
            .map_err(|e| PhotoError::CaptureFailed(e.to_string()))?;
        if self.layout.mirror {
            imageops::flip_horizontal_in_place(&mut picture);
        }
        filter.apply(&mut picture);

        let mut canvas = RgbaImage::from_pixel(card_width, card_height, Rgba(card::BORDER_COLOR));
        let border = self.layout.border as i64;
        imageops::overlay(&mut canvas, &picture, border, border);

        if let Some(caption) = caption {
            self.captions.draw(&mut canvas, caption)?;
        }

        debug!(
            width = card_width,
            height = card_height,
            mirrored = self.layout.mirror,
            captioned = caption.is_some(),
            "Card composed"
        );
        Ok(canvas)
    }

    /// Compose and encode a card on a blocking task
    pub async fn capture(
        &self,
        frame: CameraFrame,
        filter_expression: &str,
        caption: Option<Caption>,
    ) -> Result<CapturedImage, PhotoError> {
        info!(
            width = frame.width,
            height = frame.height,
            filter = filter_expression,
            "Capturing photo"
        );

        let pipeline = self.clone();
        let filter = FilterExpression::lenient(filter_expression);
        let frame_size = (frame.width, frame.height);

        let composed = tokio::task::spawn_blocking(move || {
            pipeline.compose(&frame, &filter, caption.as_ref())
        })
        .await
        .map_err(|e| PhotoError::CaptureFailed(format!("compose task error: {}", e)))??;

        CapturedImage::encode(composed, ImageKind::Photo, frame_size).await
    }
}
