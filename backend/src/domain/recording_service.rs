//! Recording domain service.
//!
//! Implements the [`RecordingService`] driving port. Uploads run as three
//! steps: insert a pending row, store the audio under a name derived from the
//! row id, then flip the row to uploaded. A storage failure leaves the row
//! pending, which keeps it out of every listing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    RecordingFileStore, RecordingPersistenceError, RecordingRepository, RecordingService,
    RecordingStorageError, UploadRecording,
};
use crate::domain::{
    Error, NewRecording, Recording, RecordingId, RecordingStatus, UserId,
};

fn map_repository_error(error: RecordingPersistenceError) -> Error {
    match error {
        RecordingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recording repository unavailable: {message}"))
        }
        RecordingPersistenceError::Query { message } => {
            Error::internal(format!("recording repository error: {message}"))
        }
    }
}

fn map_storage_error(error: RecordingStorageError) -> Error {
    Error::internal(error.to_string())
}

/// Recording service backed by the metadata repository and the file store.
pub struct RecordingCatalogueService<R: ?Sized, F: ?Sized> {
    recordings: Arc<R>,
    files: Arc<F>,
}

impl<R: ?Sized, F: ?Sized> RecordingCatalogueService<R, F> {
    /// Create a new service.
    pub fn new(recordings: Arc<R>, files: Arc<F>) -> Self {
        Self { recordings, files }
    }
}

#[async_trait]
impl<R, F> RecordingService for RecordingCatalogueService<R, F>
where
    R: RecordingRepository + ?Sized,
    F: RecordingFileStore + ?Sized,
{
    async fn create(
        &self,
        owner: UserId,
        title: &str,
        original_filename: &str,
        language: &str,
    ) -> Result<Recording, Error> {
        let draft = NewRecording::new(owner, title, original_filename, language)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.recordings
            .insert(&draft)
            .await
            .map_err(map_repository_error)
    }

    async fn mark_uploaded(&self, recording: &Recording) -> Result<Recording, Error> {
        self.recordings
            .set_status(recording.id(), RecordingStatus::Uploaded)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("recording {} not found", recording.id())))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Recording>, Error> {
        self.recordings
            .list_uploaded_by_owner(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn get_by_id(&self, id: RecordingId) -> Result<Recording, Error> {
        self.recordings
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("recording {id} not found")))
    }

    async fn upload(&self, owner: UserId, upload: UploadRecording) -> Result<Recording, Error> {
        let UploadRecording {
            title,
            original_filename,
            language,
            source_path,
        } = upload;

        let pending = self
            .create(owner, &title, &original_filename, &language)
            .await?;
        let stored_filename = pending.stored_filename();

        if let Err(error) = self.files.store(&source_path, &stored_filename).await {
            warn!(
                recording_id = %pending.id(),
                %error,
                "recording left pending after storage failure"
            );
            return Err(map_storage_error(error));
        }

        let uploaded = self.mark_uploaded(&pending).await?;
        info!(
            recording_id = %uploaded.id(),
            user_id = %owner,
            %stored_filename,
            "recording uploaded"
        );
        Ok(uploaded)
    }
}

#[cfg(test)]
#[path = "recording_service_tests.rs"]
mod tests;
