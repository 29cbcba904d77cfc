//! Book cover image storage.
//!
//! Images are written into one flat directory and referenced by their
//! sanitized filename. A later upload with the same name replaces the file.
//!
//! Writes are two-phase: the bytes land under a hidden staging name first
//! and only take their real name once the book row referencing them has
//! been saved. A failed row write discards the staged file, so neither an
//! orphan nor a clobbered cover is left behind.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Bytes;
use bookshelf_core::error::CoreError;
use bookshelf_core::filename::image_filename;

use crate::error::{AppError, AppResult};

/// Distinguishes concurrent stagings of the same filename.
static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// An image part pulled out of a multipart form, with its name already sanitized.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Bytes,
}

impl ImageUpload {
    /// Validate the client filename and keep the payload.
    pub fn new(original_filename: &str, data: Bytes) -> Result<Self, CoreError> {
        let filename = image_filename(original_filename)?;
        Ok(Self { filename, data })
    }
}

/// An image written under its staging name, waiting on the row write.
#[derive(Debug)]
#[must_use = "a staged image must be committed or discarded"]
pub struct StagedImage {
    filename: String,
    staged: PathBuf,
    target: PathBuf,
}

impl StagedImage {
    /// The filename the book row should store.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Move the file to its final name. Call after the row is saved.
    pub async fn commit(self) -> AppResult<String> {
        tokio::fs::rename(&self.staged, &self.target)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        tracing::info!(filename = %self.filename, "Stored book image");
        Ok(self.filename)
    }

    /// Remove the staged file. Call when the row write failed.
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.staged).await {
            tracing::warn!(
                path = %self.staged.display(),
                error = %e,
                "Failed to remove staged image"
            );
        } else {
            tracing::debug!(filename = %self.filename, "Discarded staged image");
        }
    }
}

/// Writes uploaded images under a fixed directory.
#[derive(Debug, Clone)]
pub struct ImageUploads {
    dir: PathBuf,
}

impl ImageUploads {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an upload under a hidden staging name inside the upload dir.
    ///
    /// Staging in the same directory keeps the later rename atomic.
    pub async fn stage(&self, upload: &ImageUpload) -> AppResult<StagedImage> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
        let staged = self.dir.join(format!(
            ".{}.{}-{seq}.part",
            upload.filename,
            std::process::id()
        ));
        tokio::fs::write(&staged, &upload.data)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tracing::debug!(
            filename = %upload.filename,
            bytes = upload.data.len(),
            "Staged book image"
        );
        Ok(StagedImage {
            filename: upload.filename.clone(),
            staged,
            target: self.dir.join(&upload.filename),
        })
    }
}
