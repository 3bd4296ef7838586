//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, file store, mailer, hasher) expose typed
//! errors generated by [`define_port_error`]; services translate them into
//! the domain [`Error`](crate::domain::Error). Driving ports are the
//! use-case traits inbound adapters depend on.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod confirmation_mailer;
mod password_hasher;
mod recording_file_store;
mod recording_repository;
mod recording_service;
mod user_repository;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
pub use confirmation_mailer::{
    CONFIRMATION_SUBJECT, ConfirmationMailer, ConfirmationMessage, MailDeliveryError,
};
#[cfg(test)]
pub use confirmation_mailer::MockConfirmationMailer;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use recording_file_store::MockRecordingFileStore;
pub use recording_file_store::{RecordingFileStore, RecordingStorageError};
#[cfg(test)]
pub use recording_repository::MockRecordingRepository;
pub use recording_repository::{RecordingPersistenceError, RecordingRepository};
#[cfg(test)]
pub use recording_service::MockRecordingService;
pub use recording_service::{RecordingService, UploadRecording};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
