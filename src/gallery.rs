// SPDX-License-Identifier: GPL-3.0-only

//! Gallery of finished photos and strips
//!
//! The gallery is the end of the pipeline: every finished card or strip is
//! appended as an entry with an optional caption and a download link. The
//! [`GallerySink`] trait keeps the booth independent of how entries are shown.

use crate::constants::gallery::{DOWNLOAD_FILENAME, PHOTO_PREFIX, STRIP_PREFIX};
use crate::errors::GalleryError;
use crate::pipelines::photo::{Caption, CapturedImage, ImageKind};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Link offered to save an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// `data:` URI of the PNG
    pub href: String,
    /// Suggested filename
    pub filename: String,
}

/// One rendered gallery item
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub id: Uuid,
    pub image: CapturedImage,
    /// Present only for non-blank captions
    pub caption: Option<String>,
    pub download: DownloadLink,
    pub created_at: DateTime<Local>,
    /// File written for this entry, if the sink saves to disk
    pub saved_to: Option<PathBuf>,
}

impl GalleryEntry {
    fn new(image: CapturedImage, caption: Option<&Caption>) -> Self {
        let download = DownloadLink {
            href: image.data_uri(),
            filename: DOWNLOAD_FILENAME.to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            image,
            caption: caption.map(|c| c.text().to_string()),
            download,
            created_at: Local::now(),
            saved_to: None,
        }
    }
}

/// Destination of finished images
pub trait GallerySink: Send {
    /// Append an entry after all existing ones
    fn add_entry(
        &mut self,
        image: CapturedImage,
        caption: Option<&Caption>,
    ) -> Result<&GalleryEntry, GalleryError>;

    /// Entries in arrival order
    fn entries(&self) -> &[GalleryEntry];

    /// Remove every entry
    fn reset(&mut self);

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Gallery kept in memory for the lifetime of the session
#[derive(Debug, Default)]
pub struct MemoryGallery {
    entries: Vec<GalleryEntry>,
}

impl MemoryGallery {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, entry: GalleryEntry) -> Result<&GalleryEntry, GalleryError> {
        info!(
            id = %entry.id,
            kind = ?entry.image.kind,
            width = entry.image.width,
            height = entry.image.height,
            captioned = entry.caption.is_some(),
            "Gallery entry added"
        );
        self.entries.push(entry);
        self.entries
            .last()
            .ok_or_else(|| GalleryError::SaveFailed("gallery entry was not stored".to_string()))
    }
}

impl GallerySink for MemoryGallery {
    fn add_entry(
        &mut self,
        image: CapturedImage,
        caption: Option<&Caption>,
    ) -> Result<&GalleryEntry, GalleryError> {
        self.push(GalleryEntry::new(image, caption))
    }

    fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    fn reset(&mut self) {
        debug!(removed = self.entries.len(), "Gallery reset");
        self.entries.clear();
    }
}

/// Gallery that also saves every entry as a PNG file
///
/// Resetting clears the listing only; files already written stay on disk.
#[derive(Debug)]
pub struct DirectoryGallery {
    dir: PathBuf,
    inner: MemoryGallery,
    saved: u64,
}

impl DirectoryGallery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            inner: MemoryGallery::new(),
            saved: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Timestamped, never reused file name for the next entry
    fn next_path(&mut self, kind: ImageKind) -> PathBuf {
        let prefix = match kind {
            ImageKind::Photo => PHOTO_PREFIX,
            ImageKind::Strip => STRIP_PREFIX,
        };
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        loop {
            self.saved += 1;
            let path = self
                .dir
                .join(format!("{}_{}_{}.png", prefix, timestamp, self.saved));
            if !path.exists() {
                return path;
            }
        }
    }
}

impl GallerySink for DirectoryGallery {
    fn add_entry(
        &mut self,
        image: CapturedImage,
        caption: Option<&Caption>,
    ) -> Result<&GalleryEntry, GalleryError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.next_path(image.kind);

        write_atomically(&self.dir, &path, image.png_bytes()).map_err(|e| {
            GalleryError::SaveFailed(format!("Failed to save '{}': {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Photo saved");

        let mut entry = GalleryEntry::new(image, caption);
        entry.saved_to = Some(path);
        self.inner.push(entry)
    }

    fn entries(&self) -> &[GalleryEntry] {
        self.inner.entries()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Write `bytes` to a temporary file in `dir`, then move it to `path`
///
/// `path` only ever holds a complete file; the temporary file is removed
/// when any step fails.
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix(".photobooth-")
        .suffix(".part")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
