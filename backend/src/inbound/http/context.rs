//! Typed request identity extracted from the session.
//!
//! Handlers declare the identity they need as an argument:
//! [`RequestContext`] for routes open to everyone, [`AuthenticatedUser`]
//! for routes that require a login and [`Anonymous`] for routes that only
//! make sense before logging in. The guards reject with `401 Unauthorized`.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use super::session::SessionContext;
use crate::domain::{Error, UserId};

/// Identity of the caller, if logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
}

impl RequestContext {
    /// Whether the session carries a user.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let user_id = session.await?.user_id()?;
            Ok(Self { user_id })
        })
    }
}

/// Guard for routes that require a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let context = RequestContext::from_request(req, payload);
        Box::pin(async move {
            context
                .await?
                .user_id
                .map(Self)
                .ok_or_else(|| Error::unauthorized("login required").into())
        })
    }
}

/// Guard for routes reserved for callers without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anonymous;

impl FromRequest for Anonymous {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let context = RequestContext::from_request(req, payload);
        Box::pin(async move {
            if context.await?.is_logged_in() {
                Err(Error::unauthorized("already logged in").into())
            } else {
                Ok(Self)
            }
        })
    }
}
