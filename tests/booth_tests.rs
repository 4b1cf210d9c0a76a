// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the booth: camera lifecycle, capture routing,
//! strips, captions and gallery reset

use image::{Rgba, RgbaImage};
use photobooth::app::{CountdownDisplay, CountdownTick};
use photobooth::backends::camera::SessionState;
use photobooth::backends::virtual_camera::VirtualCamera;
use photobooth::constants::labels;
use photobooth::errors::{AppError, CameraError, CountdownError, GalleryError};
use photobooth::gallery::{DirectoryGallery, GalleryEntry, GallerySink, MemoryGallery};
use photobooth::pipelines::photo::{Caption, CapturedImage, ImageKind};
use photobooth::{Booth, CaptureMode, CaptureOutcome, Config};
use std::sync::Arc;
use std::time::Duration;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

fn booth_with(camera: Arc<VirtualCamera>) -> Booth {
    Booth::new(camera, Box::new(MemoryGallery::new()), &Config::default())
}

fn solid_camera(color: [u8; 4]) -> Arc<VirtualCamera> {
    Arc::new(VirtualCamera::from_image(RgbaImage::from_pixel(
        WIDTH,
        HEIGHT,
        Rgba(color),
    )))
}

#[derive(Default)]
struct Recorder(Vec<CountdownTick>);

impl CountdownDisplay for Recorder {
    fn show(&mut self, tick: &CountdownTick) {
        self.0.push(tick.clone());
    }
}

/// Gallery whose every add fails
struct FullDisk;

impl GallerySink for FullDisk {
    fn add_entry(
        &mut self,
        _image: CapturedImage,
        _caption: Option<&Caption>,
    ) -> Result<&GalleryEntry, GalleryError> {
        Err(GalleryError::SaveFailed("no space left on device".to_string()))
    }

    fn entries(&self) -> &[GalleryEntry] {
        &[]
    }

    fn reset(&mut self) {}
}

#[tokio::test]
async fn test_capture_with_camera_off_is_noop() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));

    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::CameraOff);
    assert!(booth.gallery().is_empty());
    assert!(booth.strip().is_empty());
}

#[tokio::test]
async fn test_toggle_twice_releases_everything() {
    let camera = Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT));
    let mut booth = booth_with(camera.clone());

    booth.toggle_camera().await.unwrap();
    assert_eq!(booth.session().state(), SessionState::On);
    assert_eq!(booth.session().toggle_label(), labels::CAMERA_ON);
    assert_eq!(camera.live_tracks(), 1);

    booth.toggle_camera().await.unwrap();
    assert_eq!(booth.session().state(), SessionState::Off);
    assert_eq!(booth.session().toggle_label(), labels::CAMERA_OFF);
    assert!(booth.session().preview().source.is_none());
    assert_eq!(camera.open_streams(), 0);
    assert_eq!(camera.live_tracks(), 0);
}

#[tokio::test]
async fn test_denied_access_keeps_booth_usable() {
    let camera = Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT));
    camera.set_access_denied(true);
    let mut booth = booth_with(camera.clone());

    let err = booth.toggle_camera().await.unwrap_err();
    assert!(matches!(err, AppError::Camera(CameraError::AccessDenied(_))));
    assert_eq!(booth.session().state(), SessionState::Off);
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::CameraOff);

    // Access granted on a later attempt
    camera.set_access_denied(false);
    booth.toggle_camera().await.unwrap();
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::Photo);
}

#[tokio::test]
async fn test_single_mode_appends_in_order() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.toggle_camera().await.unwrap();

    for _ in 0..3 {
        assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::Photo);
    }

    let entries = booth.gallery().entries();
    assert_eq!(entries.len(), 3);
    for pair in entries.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
        assert_ne!(pair[0].id, pair[1].id);
    }
    for entry in entries {
        assert_eq!(entry.image.kind, ImageKind::Photo);
        assert_eq!(
            (entry.image.width, entry.image.height),
            (WIDTH + 60, HEIGHT + 30 + 80)
        );
        assert_eq!(entry.download.filename, "instax_photo.png");
    }
}

#[tokio::test]
async fn test_strip_of_four() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.set_mode(CaptureMode::Strip);
    booth.toggle_camera().await.unwrap();

    for frames in 1..=3 {
        assert_eq!(
            booth.capture().await.unwrap(),
            CaptureOutcome::StripPending { frames }
        );
        assert!(booth.gallery().is_empty());
    }

    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::Strip);
    assert!(booth.strip().is_empty());

    let entries = booth.gallery().entries();
    assert_eq!(entries.len(), 1);
    let strip = &entries[0].image;
    assert_eq!(strip.kind, ImageKind::Strip);
    assert_eq!((strip.width, strip.height), (WIDTH, HEIGHT * 4));

    let decoded = strip.decode().unwrap();
    assert_eq!(decoded.dimensions(), (WIDTH, HEIGHT * 4));
}

#[tokio::test]
async fn test_eight_strip_captures_make_two_strips() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.set_mode(CaptureMode::Strip);
    booth.toggle_camera().await.unwrap();

    for _ in 0..8 {
        booth.capture().await.unwrap();
    }
    assert_eq!(booth.gallery().len(), 2);
    assert!(booth.strip().is_empty());
}

#[tokio::test]
async fn test_caption_is_trimmed_and_blank_is_omitted() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.toggle_camera().await.unwrap();

    booth.set_caption("   \t ");
    booth.capture().await.unwrap();
    booth.set_caption("  Happy birthday  ");
    booth.capture().await.unwrap();

    let entries = booth.gallery().entries();
    assert_eq!(entries[0].caption, None);
    assert_eq!(entries[1].caption.as_deref(), Some("Happy birthday"));

    // Only the captioned card has text in its bottom band
    let band = |card: &RgbaImage| {
        let h = card.height();
        card.enumerate_pixels()
            .filter(|(_, y, p)| (h - 50..h - 20).contains(y) && p[0] < 128)
            .count()
    };
    assert_eq!(band(&entries[0].image.decode().unwrap()), 0);
    assert!(band(&entries[1].image.decode().unwrap()) > 0);
}

#[tokio::test]
async fn test_filter_applies_to_preview_and_photo() {
    let mut booth = booth_with(solid_camera([255, 0, 0, 255]));
    booth.toggle_camera().await.unwrap();

    booth.select_filter("invert");
    assert_eq!(booth.session().preview().filter, "invert(100%)");
    booth.capture().await.unwrap();

    let card = booth.gallery().entries()[0].image.decode().unwrap();
    // Frame area is inverted, the border is untouched
    assert_eq!(card.get_pixel(40, 40).0, [0, 255, 255, 255]);
    assert_eq!(card.get_pixel(5, 5).0, [255, 255, 255, 255]);
}

#[tokio::test]
async fn test_reset_clears_gallery_and_pending_strip() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.toggle_camera().await.unwrap();

    booth.capture().await.unwrap();
    booth.set_mode(CaptureMode::Strip);
    booth.capture().await.unwrap();
    booth.capture().await.unwrap();
    assert_eq!(booth.gallery().len(), 1);
    assert_eq!(booth.strip().len(), 2);

    booth.reset();
    assert!(booth.gallery().is_empty());
    assert!(booth.strip().is_empty());

    // A fresh strip needs four new frames
    for _ in 0..3 {
        booth.capture().await.unwrap();
    }
    assert!(booth.gallery().is_empty());
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::Strip);
}

#[tokio::test]
async fn test_disconnected_camera_turns_off() {
    let camera = Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT));
    let mut booth = booth_with(camera.clone());
    booth.toggle_camera().await.unwrap();

    camera.disconnect();
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::CameraOff);
    assert_eq!(booth.session().state(), SessionState::Off);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_then_capture() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.toggle_camera().await.unwrap();

    let mut display = Recorder::default();
    let outcome = booth.capture_with_countdown(&mut display).await.unwrap();

    assert_eq!(outcome, CaptureOutcome::Photo);
    assert_eq!(
        display.0,
        vec![
            CountdownTick::Number(3),
            CountdownTick::Number(2),
            CountdownTick::Number(1),
            CountdownTick::Shutter,
            CountdownTick::Hidden,
        ]
    );
    assert_eq!(booth.gallery().len(), 1);
}

#[tokio::test]
async fn test_directory_gallery_saves_photos() {
    let dir = tempfile::tempdir().unwrap();
    let camera = Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT));
    let mut booth = Booth::new(
        camera,
        Box::new(DirectoryGallery::new(dir.path())),
        &Config::default(),
    );
    booth.toggle_camera().await.unwrap();
    booth.capture().await.unwrap();

    let saved = booth.gallery().entries()[0].saved_to.clone().unwrap();
    assert!(saved.starts_with(dir.path()));
    assert_eq!(image::open(&saved).unwrap().width(), WIDTH + 60);
}

#[tokio::test]
async fn test_config_defaults_apply_to_booth() {
    let config = Config {
        default_filter: "sepia".to_string(),
        default_mode: CaptureMode::Strip,
        ..Config::default()
    };
    let booth = Booth::new(
        Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)),
        Box::new(MemoryGallery::new()),
        &config,
    );

    assert_eq!(booth.mode(), CaptureMode::Strip);
    assert_eq!(booth.filter().selected(), "sepia");
    assert_eq!(booth.session().preview().filter, "sepia(100%)");
}

#[tokio::test]
async fn test_failed_gallery_add_leaves_state_unchanged() {
    let camera = Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT));
    let mut booth = Booth::new(camera, Box::new(FullDisk), &Config::default());
    booth.toggle_camera().await.unwrap();

    let err = booth.capture().await.unwrap_err();
    assert!(matches!(err, AppError::Gallery(_)));

    booth.set_mode(CaptureMode::Strip);
    for _ in 0..3 {
        booth.capture().await.unwrap();
    }
    assert!(booth.capture().await.is_err());
    // The fourth frame is rolled back, the first three stay buffered
    assert_eq!(booth.strip().len(), 3);
    assert!(booth.gallery().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_camera_stopped_during_countdown() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.set_mode(CaptureMode::Strip);
    booth.toggle_camera().await.unwrap();

    let countdown = booth.countdown_handle();
    let mut display = Recorder::default();
    let (finished, ()) = tokio::join!(countdown.run(&mut display), async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(countdown.is_running());
        booth.stop_camera();
    });

    // The countdown is not aborted, the capture that follows does nothing
    finished.unwrap();
    assert_eq!(display.0.len(), 5);
    assert_eq!(booth.capture().await.unwrap(), CaptureOutcome::CameraOff);
    assert!(booth.gallery().is_empty());
    assert!(booth.strip().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_second_trigger_during_countdown_is_ignored() {
    let mut booth = booth_with(Arc::new(VirtualCamera::test_pattern(WIDTH, HEIGHT)));
    booth.toggle_camera().await.unwrap();

    let countdown = booth.countdown_handle();
    let mut first = Recorder::default();
    let mut second = Recorder::default();
    let (running, retrigger) = tokio::join!(
        countdown.run(&mut first),
        booth.capture_with_countdown(&mut second)
    );

    running.unwrap();
    assert!(matches!(
        retrigger,
        Err(AppError::Countdown(CountdownError::AlreadyRunning))
    ));
    assert!(second.0.is_empty());
    assert!(booth.gallery().is_empty());

    // Once the first run is over a new trigger goes through
    let outcome = booth.capture_with_countdown(&mut second).await.unwrap();
    assert_eq!(outcome, CaptureOutcome::Photo);
}
