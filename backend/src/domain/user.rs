//! User account model.
//!
//! Accounts start unconfirmed with a single-use confirmation token and become
//! confirmed once the emailed link is followed. Only confirmed accounts may
//! log in.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted length of an email address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors returned by user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NonPositiveId,
    EmptyEmail,
    EmailTooLong { max: usize },
    MalformedEmail,
    InvalidToken,
    UnknownStatus { value: i16 },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::MalformedEmail => write!(f, "email address is not valid"),
            Self::InvalidToken => write!(f, "confirmation token must be a valid UUID"),
            Self::UnknownStatus { value } => write!(f, "unknown account status {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - trimmed and lowercased;
/// - exactly one `@` with non-empty local part and domain;
/// - no embedded whitespace.
///
/// # Examples
/// ```
/// use speech_portal::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate a raw email string.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::MalformedEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::MalformedEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Confirmation state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Unconfirmed,
    Confirmed,
}

impl AccountStatus {
    /// Stored representation.
    #[must_use]
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Unconfirmed => 0,
            Self::Confirmed => 1,
        }
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = UserValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unconfirmed),
            1 => Ok(Self::Confirmed),
            other => Err(UserValidationError::UnknownStatus { value: other }),
        }
    }
}

/// Single-use token embedded in confirmation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfirmationToken(Uuid);

impl ConfirmationToken {
    /// Generate a random v4 token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token from its textual form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidToken)
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque password hash string produced by a password hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Account ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub confirmation_token: ConfirmationToken,
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password_hash: PasswordHash,
    status: AccountStatus,
    confirmation_token: Option<ConfirmationToken>,
    created_at: DateTime<Utc>,
}

/// Field bundle used to rebuild a [`User`] from storage.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub status: AccountStatus,
    pub confirmation_token: Option<ConfirmationToken>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        let UserRecord {
            id,
            email,
            password_hash,
            status,
            confirmation_token,
            created_at,
        } = record;
        Self {
            id,
            email,
            password_hash,
            status,
            confirmation_token,
            created_at,
        }
    }
}

impl User {
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    #[must_use]
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    #[must_use]
    pub fn confirmation_token(&self) -> Option<&ConfirmationToken> {
        self.confirmation_token.as_ref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the account may authenticate.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == AccountStatus::Confirmed
    }

    /// Apply a successful confirmation: clear the token and mark confirmed.
    #[must_use]
    pub fn confirmed(mut self) -> Self {
        self.status = AccountStatus::Confirmed;
        self.confirmation_token = None;
        self
    }
}
