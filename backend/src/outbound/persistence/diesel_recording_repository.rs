//! PostgreSQL-backed `RecordingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordingPersistenceError, RecordingRepository};
use crate::domain::{
    NewRecording, Recording, RecordingId, RecordingRecord, RecordingStatus, UserId,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewRecordingRow, RecordingRow};
use super::pool::{DbPool, PoolError};
use super::schema::recordings;

/// Diesel-backed implementation of the recording repository port.
#[derive(Clone)]
pub struct DieselRecordingRepository {
    pool: DbPool,
}

impl DieselRecordingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordingPersistenceError {
    RecordingPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> RecordingPersistenceError {
    match classify_diesel_error(&error, operation) {
        DieselFailure::Connection => {
            RecordingPersistenceError::connection("database connection error")
        }
        DieselFailure::UniqueViolation | DieselFailure::Query => {
            RecordingPersistenceError::query("database error")
        }
    }
}

fn row_to_recording(row: RecordingRow) -> Result<Recording, RecordingPersistenceError> {
    let RecordingRow {
        id,
        user_id,
        title,
        filename,
        language,
        status,
        created_at,
    } = row;

    let invalid = |message: String| {
        RecordingPersistenceError::query(format!("invalid recording row {id}: {message}"))
    };

    Ok(Recording::from(RecordingRecord {
        id: RecordingId::new(id).map_err(|err| invalid(err.to_string()))?,
        owner: UserId::new(user_id).map_err(|err| invalid(err.to_string()))?,
        title,
        filename,
        language,
        status: RecordingStatus::try_from(status).map_err(|err| invalid(err.to_string()))?,
        created_at,
    }))
}

#[async_trait]
impl RecordingRepository for DieselRecordingRepository {
    async fn insert(
        &self,
        recording: &NewRecording,
    ) -> Result<Recording, RecordingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewRecordingRow {
            user_id: recording.owner().get(),
            title: recording.title(),
            filename: recording.filename(),
            language: recording.language(),
            status: RecordingStatus::Pending.as_i16(),
        };

        let stored = diesel::insert_into(recordings::table)
            .values(&row)
            .returning(RecordingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert recording"))?;

        row_to_recording(stored)
    }

    async fn find_by_id(
        &self,
        id: RecordingId,
    ) -> Result<Option<Recording>, RecordingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = recordings::table
            .find(id.get())
            .select(RecordingRow::as_select())
            .first::<RecordingRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find recording"))?;

        row.map(row_to_recording).transpose()
    }

    async fn set_status(
        &self,
        id: RecordingId,
        status: RecordingStatus,
    ) -> Result<Option<Recording>, RecordingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(recordings::table.find(id.get()))
            .set((
                recordings::status.eq(status.as_i16()),
                recordings::updated_at.eq(Utc::now()),
            ))
            .returning(RecordingRow::as_returning())
            .get_result::<RecordingRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update recording status"))?;

        row.map(row_to_recording).transpose()
    }

    async fn list_uploaded_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Recording>, RecordingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecordingRow> = recordings::table
            .filter(
                recordings::user_id
                    .eq(owner.get())
                    .and(recordings::status.ne(RecordingStatus::Pending.as_i16())),
            )
            .order(recordings::id.asc())
            .select(RecordingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list recordings"))?;

        rows.into_iter().map(row_to_recording).collect()
    }
}
