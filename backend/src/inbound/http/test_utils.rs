//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;

use super::session_config::{SESSION_COOKIE_NAME, SessionSettings};

/// Session middleware with a fresh key and a non-`Secure` cookie so plain
/// HTTP test requests round-trip it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// URL base used by handler tests.
pub const TEST_URL_BASE: &str = "http://localhost:8080";

/// State wired to the given doubles.
pub fn test_state(
    accounts: impl crate::domain::ports::AccountService + 'static,
    recordings: impl crate::domain::ports::RecordingService + 'static,
) -> actix_web::web::Data<super::state::HttpState> {
    actix_web::web::Data::new(super::state::HttpState::new(
        std::sync::Arc::new(accounts),
        std::sync::Arc::new(recordings),
        TEST_URL_BASE,
    ))
}
