//! HTTP inbound adapter: routing, session guards, negotiation and pages.

pub mod context;
pub mod dto;
pub mod error;
pub mod health;
pub mod negotiate;
pub mod pages;
pub mod recordings;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

pub use error::ApiResult;

use crate::domain::Error;

/// Upper bound on an uploaded recording, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Register every application route.
///
/// Callers provide the session middleware, [`state::HttpState`] and
/// [`health::HealthState`] as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .error_handler(|err, _| Error::invalid_request(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_UPLOAD_BYTES)
            .error_handler(|err, _| Error::invalid_request(err.to_string()).into()),
    )
    .service(recordings::index)
    .service(
        web::scope("/u")
            .service(users::login_page)
            .service(users::login)
            .service(users::logout)
            .service(users::register_page)
            .service(users::register)
            .service(users::confirm),
    )
    .service(
        web::scope("/recording")
            .service(recordings::upload_page)
            .service(recordings::upload)
            .service(recordings::view),
    )
    .service(health::live)
    .service(health::ready);
}
