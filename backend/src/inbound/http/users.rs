//! Account handlers.
//!
//! ```text
//! GET|POST /u/login     email, password
//! GET      /u/logout
//! GET|POST /u/register  email, password
//! GET      /u/confirm/{token}
//! ```

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use super::context::{Anonymous, AuthenticatedUser};
use super::dto::UserDto;
use super::error::{redact_if_internal, status_for};
use super::negotiate::Representation;
use super::pages::{self, FormError};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;
use crate::domain::{Credentials, CredentialsValidationError, Error, ErrorCode};

const LOGIN_FAILED: &str = "Login Failed";
const REGISTRATION_FAILED: &str = "Registration Failed";

/// Form body shared by login and registration.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

impl TryFrom<&CredentialsForm> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(form: &CredentialsForm) -> Result<Self, Self::Error> {
        Self::try_from_parts(&form.email, &form.password)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::InvalidEmail(inner) => {
            Error::invalid_request(format!("email is invalid: {inner}"))
                .with_details(json!({ "field": "email", "code": "invalid_email" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn login_failure_message(error: &Error) -> String {
    match error.code() {
        ErrorCode::InvalidCredentials => "Invalid credentials provided".to_owned(),
        ErrorCode::AccountUnconfirmed => {
            "Please check your mailbox and click the confirmation link".to_owned()
        }
        _ => redact_if_internal(error).message().to_owned(),
    }
}

/// Show the login form.
#[get("/login")]
pub async fn login_page(
    _: Anonymous,
    representation: Representation,
    state: web::Data<HttpState>,
) -> HttpResponse {
    representation.respond_page(StatusCode::OK, || pages::login(&state.page(false), None))
}

/// Check credentials and start a session.
///
/// HTML callers get the login form back with an explanation on failure;
/// JSON and XML callers get the error payload.
#[post("/login")]
pub async fn login(
    _: Anonymous,
    session: SessionContext,
    representation: Representation,
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let outcome = match Credentials::try_from(&form.into_inner()) {
        Ok(credentials) => state.accounts.login(&credentials).await,
        Err(err) => Err(map_credentials_error(err)),
    };

    match outcome {
        Ok(user) => {
            session.persist_user(user.id())?;
            representation.respond(StatusCode::OK, &UserDto::from(&user), || {
                pages::login_successful(&state.page(true))
            })
        }
        Err(error) if representation == Representation::Html => {
            let message = login_failure_message(&error);
            let failure = FormError {
                title: LOGIN_FAILED,
                message: &message,
            };
            Ok(representation.respond_page(status_for(error.code()), || {
                pages::login(&state.page(false), Some(&failure))
            }))
        }
        Err(error) => Err(error),
    }
}

/// Drop the session and go home.
#[get("/logout")]
pub async fn logout(_: AuthenticatedUser, session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Show the registration form.
#[get("/register")]
pub async fn register_page(
    _: Anonymous,
    representation: Representation,
    state: web::Data<HttpState>,
) -> HttpResponse {
    representation.respond_page(StatusCode::OK, || pages::register(&state.page(false), None))
}

/// Create an unconfirmed account and send the confirmation link.
#[post("/register")]
pub async fn register(
    _: Anonymous,
    representation: Representation,
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let outcome = match Credentials::try_from(&form.into_inner()) {
        Ok(credentials) => state.accounts.register(&credentials).await,
        Err(err) => Err(map_credentials_error(err)),
    };

    match outcome {
        Ok(user) => representation.respond(StatusCode::OK, &UserDto::from(&user), || {
            pages::register_successful(&state.page(false))
        }),
        Err(error) if representation == Representation::Html => {
            let shown = redact_if_internal(&error);
            let failure = FormError {
                title: REGISTRATION_FAILED,
                message: shown.message(),
            };
            Ok(representation.respond_page(status_for(error.code()), || {
                pages::register(&state.page(false), Some(&failure))
            }))
        }
        Err(error) => Err(error),
    }
}

/// Consume a confirmation token.
#[get("/confirm/{token}")]
pub async fn confirm(
    _: Anonymous,
    representation: Representation,
    state: web::Data<HttpState>,
    token: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.accounts.confirm(&token).await?;
    representation.respond(StatusCode::OK, &UserDto::from(&user), || {
        pages::confirmation(&state.page(false))
    })
}
