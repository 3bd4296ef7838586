//! Driving port for account registration, login and confirmation.
//!
//! Inbound adapters call this port without knowing which stores, hashers or
//! mailers back it, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, User};

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an unconfirmed account and send its confirmation link.
    async fn register(&self, credentials: &Credentials) -> Result<User, Error>;

    /// Authenticate a confirmed account.
    async fn login(&self, credentials: &Credentials) -> Result<User, Error>;

    /// Confirm the account holding `token`.
    async fn confirm(&self, token: &str) -> Result<User, Error>;
}
