//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{recordings, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub status: i16,
    pub confirmation_token: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub status: i16,
    pub confirmation_token: Option<Uuid>,
}

/// Changeset applied when an account is confirmed.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserStatusUpdate {
    pub status: i16,
    pub confirmation_token: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the recordings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recordings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecordingRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub filename: String,
    pub language: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for pending recordings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recordings)]
pub(crate) struct NewRecordingRow<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub filename: &'a str,
    pub language: &'a str,
    pub status: i16,
}
