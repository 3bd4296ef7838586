//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use speech_portal::inbound::http::session_config::SessionSettings;
use speech_portal::outbound::hashing::DEFAULT_BCRYPT_COST;
use speech_portal::outbound::mail::MailApiIdentity;
use speech_portal::outbound::persistence::DbPool;
use url::Url;

/// Connection details for the transactional mail API.
pub struct MailApiConfig {
    pub(crate) endpoint: Url,
    pub(crate) timeout: Duration,
    pub(crate) identity: MailApiIdentity,
}

impl MailApiConfig {
    #[must_use]
    pub fn new(endpoint: Url, timeout: Duration, identity: MailApiIdentity) -> Self {
        Self {
            endpoint,
            timeout,
            identity,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) url_base: String,
    pub(crate) recordings_dir: PathBuf,
    pub(crate) bcrypt_cost: u32,
    pub(crate) mail_api: Option<MailApiConfig>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with in-memory stores and logged
    /// confirmation links.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        url_base: impl Into<String>,
        recordings_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session,
            bind_addr,
            url_base: url_base.into(),
            recordings_dir: recordings_dir.into(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            mail_api: None,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Send confirmation emails through the given mail API.
    #[must_use]
    pub fn with_mail_api(mut self, mail_api: MailApiConfig) -> Self {
        self.mail_api = Some(mail_api);
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
