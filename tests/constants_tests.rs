// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use photobooth::FilterKind;
use photobooth::constants::{card, countdown, file_formats, gallery, labels, strip};

#[test]
fn test_card_layout_values() {
    assert_eq!(card::BORDER_SIZE, 30);
    assert_eq!(card::BOTTOM_BORDER_SIZE, 80);
    assert_eq!(card::BORDER_COLOR, [255, 255, 255, 255]);
}

#[test]
fn test_countdown_values() {
    assert_eq!(countdown::START_SECONDS, 3);
    assert_eq!(countdown::TICK.as_millis(), 1000);
    assert!(!countdown::SHUTTER_MARKER.is_empty());
}

#[test]
fn test_strip_and_download_names() {
    assert_eq!(strip::FRAME_COUNT, 4);
    assert_eq!(gallery::DOWNLOAD_FILENAME, "instax_photo.png");
    assert_ne!(gallery::PHOTO_PREFIX, gallery::STRIP_PREFIX);
}

#[test]
fn test_toggle_labels_differ() {
    assert_ne!(labels::CAMERA_ON, labels::CAMERA_OFF);
}

#[test]
fn test_image_extensions() {
    assert!(file_formats::is_image_extension("png"));
    assert!(file_formats::is_image_extension("jpg"));
    assert!(!file_formats::is_image_extension("mp4"));
}

#[test]
fn test_filter_presets() {
    // Test that all presets have names, display names and expressions
    assert_eq!(FilterKind::ALL.len(), 5);
    for kind in FilterKind::ALL {
        assert!(!kind.name().is_empty());
        assert!(!kind.display_name().is_empty());
        assert!(!kind.expression().is_empty());
        assert_eq!(FilterKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(FilterKind::None.expression(), "none");
    assert_eq!(FilterKind::Grayscale.expression(), "grayscale(100%)");
    assert_eq!(FilterKind::Sepia.expression(), "sepia(100%)");
    assert_eq!(FilterKind::Invert.expression(), "invert(100%)");
    assert_eq!(
        FilterKind::Polaroid.expression(),
        "brightness(110%) contrast(90%) saturate(80%) sepia(20%)"
    );
}
