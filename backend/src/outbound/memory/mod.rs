//! In-memory adapters used when no database is configured and in tests.
//!
//! State lives behind a `Mutex`; a poisoned lock is reported as a query
//! error rather than a panic.

mod recordings;
mod users;

pub use recordings::InMemoryRecordingRepository;
pub use users::InMemoryUserRepository;
