//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `WEB_ASR_*` environment variables and an
//! optional configuration file. Session secrets are not part of this struct;
//! they follow the `SESSION_*` variables read by the session configuration
//! module.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use speech_portal::outbound::hashing::DEFAULT_BCRYPT_COST;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_URL_BASE: &str = "http://localhost:8080";
const DEFAULT_RECORDINGS_DIR: &str = "recordings";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid mail API URL {value:?}: {message}")]
    MailApiUrl { value: String, message: String },
}

/// Runtime settings for the speech portal server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEB_ASR")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Public URL prefix used in generated links.
    pub url_base: Option<String>,
    /// PostgreSQL connection string; in-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Directory receiving uploaded audio files.
    pub recordings_dir: Option<PathBuf>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
    /// Transactional mail API endpoint; links are logged when unset.
    pub mail_api_url: Option<String>,
    pub mail_api_token: Option<String>,
    pub mail_sender: Option<String>,
    /// Mail API request timeout in seconds.
    pub mail_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Parsed listener address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn url_base(&self) -> &str {
        self.url_base.as_deref().unwrap_or(DEFAULT_URL_BASE)
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.recordings_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDINGS_DIR))
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs.unwrap_or(DEFAULT_MAIL_TIMEOUT_SECS))
    }

    /// Parsed mail API endpoint, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MailApiUrl`] when the value is not a URL.
    pub fn mail_api_url(&self) -> Result<Option<Url>, SettingsError> {
        self.mail_api_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|err| SettingsError::MailApiUrl {
                    value: raw.to_owned(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }
}
