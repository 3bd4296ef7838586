//! Driving port for recording uploads and ownership-scoped reads.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{Error, Recording, RecordingId, UserId};

/// Upload request handed over by inbound adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecording {
    pub title: String,
    pub original_filename: String,
    pub language: String,
    /// Temporary file holding the uploaded bytes.
    pub source_path: PathBuf,
}

/// Domain use-case port for recordings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordingService: Send + Sync {
    /// Record metadata for an upload in the pending state.
    async fn create(
        &self,
        owner: UserId,
        title: &str,
        original_filename: &str,
        language: &str,
    ) -> Result<Recording, Error>;

    /// Flag a pending recording as uploaded.
    async fn mark_uploaded(&self, recording: &Recording) -> Result<Recording, Error>;

    /// Uploaded recordings belonging to `owner`.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Recording>, Error>;

    /// Look up a recording without checking ownership.
    async fn get_by_id(&self, id: RecordingId) -> Result<Recording, Error>;

    /// Create the row, store the file and mark the row uploaded.
    async fn upload(&self, owner: UserId, upload: UploadRecording) -> Result<Recording, Error>;
}
