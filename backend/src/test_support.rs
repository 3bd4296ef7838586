//! Test utilities for the speech portal crate.
//!
//! Integration tests (in `tests/`) wire the real domain services onto the
//! in-memory adapters through [`InMemoryStack`], capture confirmation
//! messages with [`CapturingMailer`] and inspect stored audio through
//! `cap_std`. Only compiled with the `test-support` feature.

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::web;
use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tempfile::TempDir;

use crate::domain::ports::{ConfirmationMailer, ConfirmationMessage, MailDeliveryError};
use crate::domain::{RecordingCatalogueService, UserAccountService};
use crate::inbound::http::state::HttpState;
use crate::outbound::hashing::{BcryptPasswordHasher, MIN_BCRYPT_COST};
use crate::outbound::memory::{InMemoryRecordingRepository, InMemoryUserRepository};
use crate::outbound::storage::LocalRecordingFileStore;

/// Mailer double that records every message instead of sending it.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<ConfirmationMessage>>,
}

impl CapturingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages captured so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ConfirmationMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Link from the most recent message sent to `recipient`.
    #[must_use]
    pub fn last_link_for(&self, recipient: &str) -> Option<String> {
        self.messages()
            .into_iter()
            .rev()
            .find(|message| message.recipient.as_ref() == recipient)
            .map(|message| message.link)
    }
}

#[async_trait]
impl ConfirmationMailer for CapturingMailer {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), MailDeliveryError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// Domain services on in-memory stores with a temporary recordings directory.
///
/// The directory is removed when the stack is dropped.
pub struct InMemoryStack {
    state: web::Data<HttpState>,
    mailer: Arc<CapturingMailer>,
    recordings_dir: TempDir,
}

impl InMemoryStack {
    /// Build the stack; confirmation links are rooted at `url_base`.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the temporary directory cannot be created.
    pub fn new(url_base: &str) -> io::Result<Self> {
        let recordings_dir = tempfile::tempdir()?;
        let files = LocalRecordingFileStore::open(recordings_dir.path())
            .map_err(|err| io::Error::other(err.to_string()))?;
        let mailer = Arc::new(CapturingMailer::new());

        let accounts = UserAccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BcryptPasswordHasher::new(MIN_BCRYPT_COST)),
            Arc::clone(&mailer),
            url_base,
        );
        let recordings = RecordingCatalogueService::new(
            Arc::new(InMemoryRecordingRepository::new()),
            Arc::new(files),
        );

        Ok(Self {
            state: web::Data::new(HttpState::new(
                Arc::new(accounts),
                Arc::new(recordings),
                url_base,
            )),
            mailer,
            recordings_dir,
        })
    }

    /// Handler state to register with `App::app_data`.
    #[must_use]
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    #[must_use]
    pub fn mailer(&self) -> &CapturingMailer {
        &self.mailer
    }

    /// Read a stored recording by its stored file name.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file does not exist.
    pub fn stored_bytes(&self, stored_filename: &str) -> io::Result<Vec<u8>> {
        let dir = Dir::open_ambient_dir(self.recordings_dir.path(), ambient_authority())?;
        dir.read(Path::new(stored_filename))
    }
}
