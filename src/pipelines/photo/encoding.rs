// SPDX-License-Identifier: GPL-3.0-only

//! PNG encoding of finished cards and strips
//!
//! Every result of the booth is kept as PNG bytes. The same bytes back the
//! `data:` URI used by gallery download links and the files written to disk.

use crate::constants::PNG_DATA_URI_PREFIX;
use crate::errors::PhotoError;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::sync::Arc;
use tracing::debug;

/// What an encoded image shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// One bordered card
    Photo,
    /// Four cards stacked vertically
    Strip,
}

/// A finished, PNG-encoded image
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    png: Arc<[u8]>,
    pub kind: ImageKind,
    /// Pixel size of the encoded image
    pub width: u32,
    pub height: u32,
    /// Size of the live frame the image was made from
    pub frame_width: u32,
    pub frame_height: u32,
}

impl CapturedImage {
    pub fn new(png: Vec<u8>, kind: ImageKind, size: (u32, u32), frame_size: (u32, u32)) -> Self {
        Self {
            png: Arc::from(png),
            kind,
            width: size.0,
            height: size.1,
            frame_width: frame_size.0,
            frame_height: frame_size.1,
        }
    }

    /// Encode `image` on a blocking task
    pub async fn encode(
        image: RgbaImage,
        kind: ImageKind,
        frame_size: (u32, u32),
    ) -> Result<Self, PhotoError> {
        tokio::task::spawn_blocking(move || {
            let size = image.dimensions();
            let png = encode_png(&image)?;
            Ok(Self::new(png, kind, size, frame_size))
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("encoding task error: {}", e)))?
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Shared handle to the PNG bytes, for moving into blocking tasks
    pub fn png_shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.png)
    }

    /// `data:image/png;base64,...` form of the image
    pub fn data_uri(&self) -> String {
        data_uri(&self.png)
    }

    /// Decode back to pixels
    pub fn decode(&self) -> Result<RgbaImage, PhotoError> {
        decode_png(&self.png)
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("kind", &self.kind)
            .field("size", &(self.width, self.height))
            .field("frame", &(self.frame_width, self.frame_height))
            .field("bytes", &self.png.len())
            .finish()
    }
}

/// Encode image as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();

    image
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    debug!(
        width = image.width(),
        height = image.height(),
        size = buffer.len(),
        "PNG encoded"
    );
    Ok(buffer)
}

/// Decode PNG bytes to RGBA
pub fn decode_png(png: &[u8]) -> Result<RgbaImage, PhotoError> {
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| PhotoError::DecodeFailed(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

/// Base64 data URI for PNG bytes
pub fn data_uri(png: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + encoded.len());
    uri.push_str(PNG_DATA_URI_PREFIX);
    uri.push_str(&encoded);
    uri
}
