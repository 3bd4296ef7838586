//! Local directory `RecordingFileStore` built on a cap-std directory handle.
//!
//! Files are written as `<name>.part` and renamed into place once synced, so
//! a reader never observes a partially written recording. All access goes
//! through the directory capability; names that would escape it are
//! rejected by cap-std.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, File};
use tracing::debug;

use crate::domain::TraceId;
use crate::domain::ports::{RecordingFileStore, RecordingStorageError};

const PARTIAL_SUFFIX: &str = ".part";

/// Stores recordings inside a single directory.
#[derive(Clone)]
pub struct LocalRecordingFileStore {
    root: PathBuf,
    dir: Arc<Dir>,
}

impl LocalRecordingFileStore {
    /// Create the directory if needed and open a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingStorageError::Write`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RecordingStorageError> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|err| write_error(&root, &err))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|err| write_error(&root, &err))?;
        Ok(Self {
            root,
            dir: Arc::new(dir),
        })
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn write_error(path: &Path, error: &io::Error) -> RecordingStorageError {
    RecordingStorageError::write(format!("{}: {error}", path.display()))
}

fn copy_into(dir: &Dir, source: &Path, name: &str) -> Result<u64, RecordingStorageError> {
    let mut input = File::open_ambient(source, ambient_authority())
        .map_err(|err| RecordingStorageError::source(format!("{}: {err}", source.display())))?;

    let partial = format!("{name}{PARTIAL_SUFFIX}");
    let written = (|| {
        let mut output = dir.create(&partial)?;
        let written = io::copy(&mut input, &mut output)?;
        output.sync_all()?;
        dir.rename(&partial, dir, name)?;
        Ok::<_, io::Error>(written)
    })();

    written.map_err(|err| {
        if let Err(cleanup) = dir.remove_file(&partial) {
            debug!(%cleanup, %partial, "partial recording not removed");
        }
        RecordingStorageError::write(format!("{name}: {err}"))
    })
}

#[async_trait]
impl RecordingFileStore for LocalRecordingFileStore {
    async fn store(
        &self,
        source: &Path,
        stored_filename: &str,
    ) -> Result<(), RecordingStorageError> {
        let dir = Arc::clone(&self.dir);
        let source = source.to_path_buf();
        let name = stored_filename.to_owned();
        let trace_id = TraceId::current();

        let written = tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || copy_into(&dir, &source, &name))
        })
        .await
        .map_err(|err| RecordingStorageError::write(format!("storage task failed: {err}")))??;

        debug!(stored_filename, bytes = written, "recording file stored");
        Ok(())
    }
}
