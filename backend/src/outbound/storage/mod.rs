//! Filesystem adapters for recording audio files.

mod local;

pub use local::LocalRecordingFileStore;
