//! Port abstraction for recording metadata persistence.

use async_trait::async_trait;

use crate::domain::{NewRecording, Recording, RecordingId, RecordingStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recording repository adapters.
    pub enum RecordingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recording repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recording repository query failed: {message}",
    }
}

/// Port for recording metadata reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordingRepository: Send + Sync {
    /// Insert a pending recording and return it with its generated id.
    async fn insert(&self, recording: &NewRecording)
    -> Result<Recording, RecordingPersistenceError>;

    /// Fetch a recording by id regardless of owner or status.
    async fn find_by_id(
        &self,
        id: RecordingId,
    ) -> Result<Option<Recording>, RecordingPersistenceError>;

    /// Set the status of a recording and return the stored row.
    ///
    /// Returns `None` when no row carries the id.
    async fn set_status(
        &self,
        id: RecordingId,
        status: RecordingStatus,
    ) -> Result<Option<Recording>, RecordingPersistenceError>;

    /// List an owner's uploaded recordings ordered by id.
    ///
    /// Pending rows are never returned.
    async fn list_uploaded_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Recording>, RecordingPersistenceError>;
}
