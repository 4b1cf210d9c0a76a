// SPDX-License-Identifier: GPL-3.0-only

//! Photo strip assembly
//!
//! Captures made in strip mode are buffered here. Once four are in, they are
//! decoded concurrently and stacked top to bottom in capture order. Decodes may
//! finish in any order; each one is drawn into its own slot, and the strip is
//! only encoded after every slot has been filled.

use super::encoding::{CapturedImage, ImageKind, decode_png};
use crate::constants::strip::FRAME_COUNT;
use crate::errors::PhotoError;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use image::RgbaImage;
use image::imageops::{self, FilterType as ResizeFilter};
use tracing::{debug, info, warn};

/// Owns the pending strip buffer
#[derive(Debug, Default)]
pub struct StripAssembler {
    buffer: Vec<CapturedImage>,
}

impl StripAssembler {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(FRAME_COUNT),
        }
    }

    /// Number of buffered captures, always within `0..=4`
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= FRAME_COUNT
    }

    pub fn pending(&self) -> &[CapturedImage] {
        &self.buffer
    }

    /// Buffer a capture; returns true once the strip is complete
    ///
    /// A full buffer does not grow; the extra capture is dropped.
    pub fn push(&mut self, image: CapturedImage) -> bool {
        if self.is_full() {
            warn!("Strip buffer already full, dropping capture");
            return true;
        }
        self.buffer.push(image);
        debug!(pending = self.buffer.len(), "Strip frame buffered");
        self.is_full()
    }

    /// Take back the most recent capture
    pub fn pop(&mut self) -> Option<CapturedImage> {
        self.buffer.pop()
    }

    pub fn clear(&mut self) {
        if !self.buffer.is_empty() {
            debug!(dropped = self.buffer.len(), "Strip buffer cleared");
        }
        self.buffer.clear();
    }

    /// Compose the four buffered captures into one vertical strip
    ///
    /// The strip is one live frame wide and four live frames high; each card
    /// is scaled into its slot. The buffer is left untouched so the caller
    /// decides when to clear it.
    pub async fn assemble(&self) -> Result<CapturedImage, PhotoError> {
        if self.buffer.len() != FRAME_COUNT {
            return Err(PhotoError::StripIncomplete {
                have: self.buffer.len(),
                need: FRAME_COUNT,
            });
        }

        let first = &self.buffer[0];
        let (slot_width, slot_height) = (first.frame_width, first.frame_height);
        let strip_height = slot_height
            .checked_mul(FRAME_COUNT as u32)
            .filter(|h| *h > 0 && slot_width > 0)
            .ok_or_else(|| {
                PhotoError::CaptureFailed(format!(
                    "invalid strip slot {}x{}",
                    slot_width, slot_height
                ))
            })?;

        info!(
            width = slot_width,
            height = strip_height,
            "Assembling photo strip"
        );

        let mut decodes: FuturesUnordered<_> = self
            .buffer
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let png = image.png_shared();
                async move {
                    let decoded = tokio::task::spawn_blocking(move || {
                        let card = decode_png(&png)?;
                        Ok::<_, PhotoError>(fit_to_slot(card, slot_width, slot_height))
                    })
                    .await
                    .map_err(|e| PhotoError::DecodeFailed(format!("decode task error: {}", e)))
                    .and_then(|result| result);
                    (index, decoded)
                }
            })
            .collect();

        let mut canvas = RgbaImage::new(slot_width, strip_height);
        let mut completed = 0usize;

        while let Some((index, decoded)) = decodes.next().await {
            let card = decoded?;
            let y = index as u32 * slot_height;
            imageops::replace(&mut canvas, &card, 0, y as i64);
            completed += 1;
            debug!(index, completed, "Strip slot drawn");
        }

        if completed != FRAME_COUNT {
            return Err(PhotoError::StripIncomplete {
                have: completed,
                need: FRAME_COUNT,
            });
        }

        CapturedImage::encode(canvas, ImageKind::Strip, (slot_width, slot_height)).await
    }
}

/// Scale a card to the slot size, skipping the resample when it already fits
fn fit_to_slot(card: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if card.dimensions() == (width, height) {
        card
    } else {
        imageops::resize(&card, width, height, ResizeFilter::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::encoding::encode_png;
    use image::Rgba;

    fn card(color: [u8; 4], size: (u32, u32), frame: (u32, u32)) -> CapturedImage {
        let image = RgbaImage::from_pixel(size.0, size.1, Rgba(color));
        CapturedImage::new(encode_png(&image).unwrap(), ImageKind::Photo, size, frame)
    }

    #[test]
    fn test_push_reports_full_at_four() {
        let mut strip = StripAssembler::new();
        for i in 0..3 {
            assert!(!strip.push(card([i, 0, 0, 255], (2, 2), (2, 2))));
        }
        assert!(strip.push(card([9, 0, 0, 255], (2, 2), (2, 2))));
        assert!(strip.push(card([10, 0, 0, 255], (2, 2), (2, 2))));
        assert_eq!(strip.len(), 4);
    }

    #[tokio::test]
    async fn test_assemble_requires_four() {
        let mut strip = StripAssembler::new();
        strip.push(card([0, 0, 0, 255], (2, 2), (2, 2)));
        let err = strip.assemble().await.unwrap_err();
        assert_eq!(err, PhotoError::StripIncomplete { have: 1, need: 4 });
    }

    #[tokio::test]
    async fn test_assemble_keeps_capture_order() {
        let colors = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
        ];
        let mut strip = StripAssembler::new();
        for color in colors {
            // Cards are larger than the frame, as bordered cards are
            strip.push(card(color, (16, 12), (8, 6)));
        }

        let assembled = strip.assemble().await.unwrap();
        assert_eq!(assembled.kind, ImageKind::Strip);
        assert_eq!((assembled.width, assembled.height), (8, 24));

        let pixels = assembled.decode().unwrap();
        for (slot, color) in colors.iter().enumerate() {
            let got = pixels.get_pixel(4, slot as u32 * 6 + 3).0;
            for c in 0..4 {
                assert!(got[c].abs_diff(color[c]) <= 1, "slot {} got {:?}", slot, got);
            }
        }
        // Assembly does not consume the buffer
        assert_eq!(strip.len(), 4);
    }

    #[tokio::test]
    async fn test_corrupt_frame_fails_assembly() {
        let mut strip = StripAssembler::new();
        for _ in 0..3 {
            strip.push(card([0, 0, 0, 255], (2, 2), (2, 2)));
        }
        strip.push(CapturedImage::new(
            b"garbage".to_vec(),
            ImageKind::Photo,
            (2, 2),
            (2, 2),
        ));
        assert!(matches!(
            strip.assemble().await,
            Err(PhotoError::DecodeFailed(_))
        ));
    }
}
