//! PDF artifact lifecycle and the generation seam.
//!
//! Rendering internals live behind [`PdfGenerator`] — the core only cares
//! that a file exists on disk, can be renamed to its assigned filename, and
//! can be removed once its postage batch has gone out.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::PdfError;
use crate::model::Staff;
use crate::notify::message::Notification;

/// A generated printable document standing in for an email when the
/// recipient has no address.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfArtifact {
    path: PathBuf,
    /// Assigned filename, `"<message_type>_for_<username>.pdf"` once the
    /// dispatch coordinator has named it.
    pub filename: String,
}

impl PdfArtifact {
    /// Wrap a freshly generated file. The filename defaults to the file's
    /// current basename until the coordinator assigns one.
    pub fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, filename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the file on disk to match the assigned filename, so the
    /// attachment administrators receive carries the meaningful name.
    /// Returns the final path.
    pub fn persist(&mut self) -> Result<PathBuf, PdfError> {
        let target = self.path.with_file_name(&self.filename);
        if target != self.path {
            std::fs::rename(&self.path, &target).map_err(|source| PdfError::Persist {
                filename: self.filename.clone(),
                source,
            })?;
            self.path = target;
        }
        Ok(self.path.clone())
    }

    /// Remove the file on disk. Callers treat failure as a warning, not an
    /// error — the batch has already gone out by the time this runs.
    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

/// External PDF-generation collaborator.
#[async_trait]
pub trait PdfGenerator: Send + Sync {
    /// Render the notification for one staff member into a file on disk.
    async fn generate(
        &self,
        notification: &Notification,
        staff: &Staff,
    ) -> Result<PdfArtifact, PdfError>;
}
