//! Builders for the HTTP state and the adapters behind it.

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use speech_portal::domain::ports::{
    AccountService, ConfirmationMailer, PasswordHasher, RecordingFileStore, RecordingRepository,
    RecordingService, UserRepository,
};
use speech_portal::domain::{RecordingCatalogueService, UserAccountService};
use speech_portal::inbound::http::state::HttpState;
use speech_portal::outbound::hashing::BcryptPasswordHasher;
use speech_portal::outbound::mail::{HttpConfirmationMailer, LogConfirmationMailer};
use speech_portal::outbound::memory::{InMemoryRecordingRepository, InMemoryUserRepository};
use speech_portal::outbound::persistence::{DbPool, DieselRecordingRepository, DieselUserRepository};
use speech_portal::outbound::storage::LocalRecordingFileStore;

use super::config::{MailApiConfig, ServerConfig};

type Repositories = (Arc<dyn UserRepository>, Arc<dyn RecordingRepository>);

/// Diesel repositories when a pool is available, otherwise in-memory ones.
fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => (
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselRecordingRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; accounts and recordings are kept in memory");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryRecordingRepository::new()),
            )
        }
    }
}

fn build_mailer(mail_api: Option<&MailApiConfig>) -> io::Result<Arc<dyn ConfirmationMailer>> {
    let Some(MailApiConfig {
        endpoint,
        timeout,
        identity,
    }) = mail_api
    else {
        warn!("no mail API configured; confirmation links are written to the log");
        return Ok(Arc::new(LogConfirmationMailer));
    };

    info!(endpoint = %endpoint, sender = %identity.sender, "sending confirmation mail via API");
    let mailer = HttpConfirmationMailer::new(
        endpoint.clone(),
        *timeout,
        identity.clone(),
    )
    .map_err(|err| io::Error::other(format!("mail client construction failed: {err}")))?;
    Ok(Arc::new(mailer))
}

/// Wire the domain services and bundle them into the handler state.
///
/// # Errors
///
/// Returns [`io::Error`] when the recordings directory cannot be opened or
/// the mail client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let (users, recordings) = build_repositories(config.db_pool.as_ref());

    let files: Arc<dyn RecordingFileStore> = Arc::new(
        LocalRecordingFileStore::open(config.recordings_dir.clone()).map_err(|err| {
            io::Error::other(format!(
                "failed to open recordings directory {}: {err}",
                config.recordings_dir.display()
            ))
        })?,
    );
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    let mailer = build_mailer(config.mail_api.as_ref())?;

    let accounts: Arc<dyn AccountService> = Arc::new(UserAccountService::new(
        users,
        hasher,
        mailer,
        config.url_base.clone(),
    ));
    let recordings: Arc<dyn RecordingService> =
        Arc::new(RecordingCatalogueService::new(recordings, files));

    Ok(web::Data::new(HttpState::new(
        accounts,
        recordings,
        config.url_base.clone(),
    )))
}
