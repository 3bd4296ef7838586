//! Port abstraction for user account persistence and its errors.

use async_trait::async_trait;

use crate::domain::{ConfirmationToken, EmailAddress, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail => "an account with this email already exists",
    }
}

/// Port for storing and looking up user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new unconfirmed account and return the stored row.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Confirm the account holding `token` and clear the token in a single
    /// conditional write.
    ///
    /// Returns `None` when no account holds the token, including when a
    /// concurrent request consumed it first.
    async fn consume_confirmation_token(
        &self,
        token: &ConfirmationToken,
    ) -> Result<Option<User>, UserPersistenceError>;
}
