// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Layout of the bordered photo card
pub mod card {
    /// Uniform border around the frame (left, top, right)
    pub const BORDER_SIZE: u32 = 30;
    /// Bottom band reserved for the caption
    pub const BOTTOM_BORDER_SIZE: u32 = 80;
    /// Card background and border color
    pub const BORDER_COLOR: [u8; 4] = [255, 255, 255, 255];
}

/// Caption text style
pub mod caption {
    /// Font family list handed to the text rasterizer
    pub const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
    /// Font size in pixels
    pub const FONT_SIZE: f32 = 20.0;
    /// Distance of the text baseline from the bottom edge of the card
    pub const BASELINE_OFFSET: u32 = 30;
    /// Caption fill color (CSS color syntax)
    pub const COLOR: &str = "black";
}

/// Countdown shown before every capture
pub mod countdown {
    use super::Duration;

    /// First number shown
    pub const START_SECONDS: u32 = 3;
    /// Time between two ticks
    pub const TICK: Duration = Duration::from_secs(1);
    /// Marker shown on the last tick before the shutter fires
    pub const SHUTTER_MARKER: &str = "📸";
}

/// Photo strip composition
pub mod strip {
    /// Number of captures composed into one strip
    pub const FRAME_COUNT: usize = 4;
}

/// Gallery and download naming
pub mod gallery {
    /// Suggested filename of every download link
    pub const DOWNLOAD_FILENAME: &str = "instax_photo.png";
    /// Prefix of single photos written to disk
    pub const PHOTO_PREFIX: &str = "PHOTO";
    /// Prefix of photo strips written to disk
    pub const STRIP_PREFIX: &str = "STRIP";
}

/// Labels of the camera toggle affordance
pub mod labels {
    pub const CAMERA_ON: &str = "Turn Off Camera";
    pub const CAMERA_OFF: &str = "Turn On Camera";
}

/// Virtual camera defaults
pub mod virtual_camera {
    /// Size of the generated test pattern
    pub const PATTERN_WIDTH: u32 = 640;
    pub const PATTERN_HEIGHT: u32 = 480;
}

/// Image file extensions accepted as a virtual camera source
pub mod file_formats {
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif"];

    /// Check if an extension (lowercase, no dot) is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext)
    }
}

/// Data URI prefix of encoded PNG images
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";
