//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    AccountStatus, ConfirmationToken, EmailAddress, NewUser, PasswordHash, User, UserId,
    UserRecord,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow, UserStatusUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> UserPersistenceError {
    match classify_diesel_error(&error, operation) {
        DieselFailure::Connection => UserPersistenceError::connection("database connection error"),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(),
        DieselFailure::Query => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        email,
        password_hash,
        status,
        confirmation_token,
        created_at,
    } = row;

    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("invalid user row {id}: {err}"))
    };

    Ok(User::from(UserRecord {
        id: UserId::new(id).map_err(invalid)?,
        email: EmailAddress::parse(&email).map_err(invalid)?,
        password_hash: PasswordHash::new(password_hash),
        status: AccountStatus::try_from(status).map_err(invalid)?,
        confirmation_token: confirmation_token.map(ConfirmationToken::from_uuid),
        created_at,
    }))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_ref(),
            status: AccountStatus::Unconfirmed.as_i16(),
            confirmation_token: Some(*user.confirmation_token.as_uuid()),
        };

        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert user"))?;

        row_to_user(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find user by email"))?;

        row.map(row_to_user).transpose()
    }

    async fn consume_confirmation_token(
        &self,
        token: &ConfirmationToken,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = UserStatusUpdate {
            status: AccountStatus::Confirmed.as_i16(),
            confirmation_token: None,
            updated_at: Utc::now(),
        };

        // The token filter makes the write conditional; a second request
        // with the same token matches no row.
        let row = diesel::update(
            users::table.filter(users::confirmation_token.eq(token.as_uuid())),
        )
        .set(&changes)
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, "consume confirmation token"))?;

        row.map(row_to_user).transpose()
    }
}
