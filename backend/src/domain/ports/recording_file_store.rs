//! Port for durable storage of uploaded audio bytes.

use std::path::Path;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while storing recording files.
    pub enum RecordingStorageError {
        /// The source file could not be read.
        Source { message: String } => "failed to read uploaded file: {message}",
        /// Writing into the storage area failed.
        Write { message: String } => "failed to store recording file: {message}",
    }
}

/// Port for moving an uploaded file into permanent storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordingFileStore: Send + Sync {
    /// Copy `source` into storage under `stored_filename`.
    ///
    /// The file is only visible under its final name once fully written.
    async fn store(
        &self,
        source: &Path,
        stored_filename: &str,
    ) -> Result<(), RecordingStorageError>;
}
