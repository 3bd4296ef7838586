//! Backend entry-point: loads settings, prepares adapters and runs the HTTP server.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use speech_portal::inbound::http::health::HealthState;
use speech_portal::inbound::http::session_config::{
    BuildMode, fingerprint::key_fingerprint, session_settings_from_env,
};
use speech_portal::outbound::mail::MailApiIdentity;
use speech_portal::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, MailApiConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut config = ServerConfig::new(
        session,
        bind_addr,
        settings.url_base(),
        settings.recordings_dir(),
    )
    .with_bcrypt_cost(settings.bcrypt_cost());

    if let Some(endpoint) = settings
        .mail_api_url()
        .map_err(|e| std::io::Error::other(e.to_string()))?
    {
        let mut identity = MailApiIdentity::default();
        if let Some(sender) = settings.mail_sender.clone() {
            identity.sender = sender;
        }
        identity.token = settings.mail_api_token.clone();
        config = config.with_mail_api(MailApiConfig::new(
            endpoint,
            settings.mail_timeout(),
            identity,
        ));
    }

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await
}
