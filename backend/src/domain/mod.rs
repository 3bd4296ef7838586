//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for accounts and recordings, the
//! use-case services operating on them, and the ports adapters implement.
//! Types here never depend on HTTP, SQL or filesystem details.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `EmailAddress`, `ConfirmationToken`: account model.
//! - `Recording`, `NewRecording`, `RecordingId`: recording model.
//! - `UserAccountService`, `RecordingCatalogueService`: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod recording;
pub mod recording_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{CONFIRM_PATH, UserAccountService, confirmation_link};
pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::recording::{
    NewRecording, Recording, RecordingId, RecordingRecord, RecordingStatus,
    RecordingValidationError,
};
pub use self::recording_service::RecordingCatalogueService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AccountStatus, ConfirmationToken, EmailAddress, NewUser, PasswordHash, User, UserId,
    UserRecord, UserValidationError,
};
