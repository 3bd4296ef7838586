//! In-memory `UserRepository`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    AccountStatus, ConfirmationToken, EmailAddress, NewUser, User, UserId, UserRecord,
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
}

/// User repository keeping accounts in process memory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, UserPersistenceError>,
    ) -> Result<T, UserPersistenceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))?;
        f(&mut state)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        self.with_state(|state| {
            if state.users.iter().any(|existing| existing.email() == &user.email) {
                return Err(UserPersistenceError::duplicate_email());
            }
            state.next_id += 1;
            let id = UserId::new(state.next_id)
                .map_err(|err| UserPersistenceError::query(err.to_string()))?;
            let stored = User::from(UserRecord {
                id,
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                status: AccountStatus::Unconfirmed,
                confirmation_token: Some(user.confirmation_token),
                created_at: Utc::now(),
            });
            state.users.push(stored.clone());
            Ok(stored)
        })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.with_state(|state| {
            Ok(state
                .users
                .iter()
                .find(|user| user.email() == email)
                .cloned())
        })
    }

    async fn consume_confirmation_token(
        &self,
        token: &ConfirmationToken,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.with_state(|state| {
            let Some(slot) = state
                .users
                .iter_mut()
                .find(|user| user.confirmation_token() == Some(token))
            else {
                return Ok(None);
            };
            *slot = slot.clone().confirmed();
            Ok(Some(slot.clone()))
        })
    }
}
