//! Account domain service.
//!
//! Implements the [`AccountService`] driving port on top of the user
//! repository, password hasher and confirmation mailer ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, ConfirmationMailer, ConfirmationMessage, PasswordHashError, PasswordHasher,
    UserPersistenceError, UserRepository,
};
use crate::domain::{ConfirmationToken, Credentials, Error, NewUser, User};

/// Path segment under which confirmation links are served.
pub const CONFIRM_PATH: &str = "/u/confirm";

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => {
            Error::invalid_request("an account with this email already exists")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Build the confirmation link for `token` under `url_base`.
///
/// # Examples
/// ```
/// use speech_portal::domain::{ConfirmationToken, confirmation_link};
///
/// let token = ConfirmationToken::parse("00000000-0000-0000-0000-000000000000").unwrap();
/// assert_eq!(
///     confirmation_link("http://localhost:8080/", &token),
///     "http://localhost:8080/u/confirm/00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[must_use]
pub fn confirmation_link(url_base: &str, token: &ConfirmationToken) -> String {
    format!("{}{CONFIRM_PATH}/{token}", url_base.trim_end_matches('/'))
}

/// Account service backed by driven ports.
pub struct UserAccountService<R: ?Sized, H: ?Sized, M: ?Sized> {
    users: Arc<R>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    url_base: String,
}

impl<R: ?Sized, H: ?Sized, M: ?Sized> UserAccountService<R, H, M> {
    /// Create a new service; `url_base` prefixes confirmation links.
    pub fn new(users: Arc<R>, hasher: Arc<H>, mailer: Arc<M>, url_base: impl Into<String>) -> Self {
        Self {
            users,
            hasher,
            mailer,
            url_base: url_base.into(),
        }
    }
}

#[async_trait]
impl<R, H, M> AccountService for UserAccountService<R, H, M>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    M: ConfirmationMailer + ?Sized,
{
    async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let confirmation_token = ConfirmationToken::generate();

        let user = self
            .users
            .insert(&NewUser {
                email: credentials.email().clone(),
                password_hash,
                confirmation_token,
            })
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), "account registered");

        let message = ConfirmationMessage::new(
            user.email().clone(),
            confirmation_link(&self.url_base, &confirmation_token),
        );
        // The account row is kept when dispatch fails.
        if let Err(error) = self.mailer.send(&message).await {
            warn!(user_id = %user.id(), %error, "confirmation email dispatch failed");
            return Err(Error::delivery_failed(
                "the confirmation email could not be sent",
            ));
        }

        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::invalid_credentials(INVALID_CREDENTIALS))?;

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        if !user.is_confirmed() {
            return Err(Error::account_unconfirmed(
                "please confirm your email address before logging in",
            ));
        }

        Ok(user)
    }

    async fn confirm(&self, token: &str) -> Result<User, Error> {
        let token = ConfirmationToken::parse(token)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let confirmed = self
            .users
            .consume_confirmation_token(&token)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found("confirmation link is invalid or has already been used")
            })?;

        info!(user_id = %confirmed.id(), "account confirmed");
        Ok(confirmed)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
