//! In-memory `RecordingRepository`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{RecordingPersistenceError, RecordingRepository};
use crate::domain::{
    NewRecording, Recording, RecordingId, RecordingRecord, RecordingStatus, UserId,
};

#[derive(Default)]
struct State {
    next_id: i64,
    recordings: Vec<Recording>,
}

/// Recording repository keeping metadata in process memory.
#[derive(Default)]
pub struct InMemoryRecordingRepository {
    state: Mutex<State>,
}

impl InMemoryRecordingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, RecordingPersistenceError>,
    ) -> Result<T, RecordingPersistenceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RecordingPersistenceError::query("recording store lock poisoned"))?;
        f(&mut state)
    }
}

#[async_trait]
impl RecordingRepository for InMemoryRecordingRepository {
    async fn insert(
        &self,
        recording: &NewRecording,
    ) -> Result<Recording, RecordingPersistenceError> {
        self.with_state(|state| {
            state.next_id += 1;
            let id = RecordingId::new(state.next_id)
                .map_err(|err| RecordingPersistenceError::query(err.to_string()))?;
            let stored = Recording::from(RecordingRecord {
                id,
                owner: recording.owner(),
                title: recording.title().to_owned(),
                filename: recording.filename().to_owned(),
                language: recording.language().to_owned(),
                status: RecordingStatus::Pending,
                created_at: Utc::now(),
            });
            state.recordings.push(stored.clone());
            Ok(stored)
        })
    }

    async fn find_by_id(
        &self,
        id: RecordingId,
    ) -> Result<Option<Recording>, RecordingPersistenceError> {
        self.with_state(|state| {
            Ok(state
                .recordings
                .iter()
                .find(|recording| recording.id() == id)
                .cloned())
        })
    }

    async fn set_status(
        &self,
        id: RecordingId,
        status: RecordingStatus,
    ) -> Result<Option<Recording>, RecordingPersistenceError> {
        self.with_state(|state| {
            let Some(slot) = state
                .recordings
                .iter_mut()
                .find(|recording| recording.id() == id)
            else {
                return Ok(None);
            };
            *slot = slot.clone().with_status(status);
            Ok(Some(slot.clone()))
        })
    }

    async fn list_uploaded_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Recording>, RecordingPersistenceError> {
        self.with_state(|state| {
            let mut listed: Vec<Recording> = state
                .recordings
                .iter()
                .filter(|recording| recording.is_visible_to(owner))
                .cloned()
                .collect();
            listed.sort_by_key(Recording::id);
            Ok(listed)
        })
    }
}
