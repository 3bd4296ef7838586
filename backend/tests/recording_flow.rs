//! End-to-end tests for the account and recording flow over HTTP.
//!
//! These tests run the real domain services on the in-memory adapters:
//! register, confirm through the emailed link, log in, upload a recording and
//! read it back, while a second account is refused access to it.

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::Value;
use speech_portal::Trace;
use speech_portal::domain::TRACE_ID_HEADER;
use speech_portal::inbound::http::configure;
use speech_portal::inbound::http::health::HealthState;
use speech_portal::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use speech_portal::test_support::InMemoryStack;

const URL_BASE: &str = "http://localhost:8080";
const BOUNDARY: &str = "----recording-flow";
const ADA: &str = "ada@example.com";
const GRACE: &str = "grace@example.com";
const PASSWORD: &str = "correct horse battery";
const AUDIO: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

#[fixture]
fn stack() -> InMemoryStack {
    InMemoryStack::new(URL_BASE).expect("in-memory stack")
}

/// Path of the most recent confirmation link sent to `email`.
fn confirmation_path(stack: &InMemoryStack, email: &str) -> String {
    let link = stack
        .mailer()
        .last_link_for(email)
        .expect("confirmation message captured");
    link.strip_prefix(URL_BASE)
        .expect("link rooted at the url base")
        .to_owned()
}

fn assert_single_confirmation_sent(stack: &InMemoryStack) {
    let messages = stack.mailer().messages();
    assert_eq!(messages.len(), 1, "one message per registration");
    assert_eq!(messages.first().map(|m| m.subject.as_str()), Some("Email Confirmation"));
}

fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

async fn portal(
    stack: &InMemoryStack,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(HealthState::new()))
            .app_data(stack.state())
            .wrap(session().middleware())
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

struct Reply {
    status: StatusCode,
    cookie: Option<Cookie<'static>>,
    trace_id: Option<String>,
    body: Value,
}

async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> Reply {
    let res = test::call_service(
        app,
        request
            .insert_header((header::ACCEPT, "application/json"))
            .to_request(),
    )
    .await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned);
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        cookie,
        trace_id,
        body,
    }
}

fn credentials(uri: &str, email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .set_form([("email", email), ("password", PASSWORD)])
}

fn upload_request(
    cookie: Cookie<'static>,
    title: Option<&str>,
    filename: &str,
) -> test::TestRequest {
    let mut body = Vec::new();
    let title = title.map(|value| ("title", value));
    for (name, value) in title.into_iter().chain([("language", "en")]) {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"content\"; \
             filename=\"{filename}\"\r\nContent-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(AUDIO);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri("/recording/upload")
        .cookie(cookie)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

async fn register_and_confirm(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    stack: &InMemoryStack,
    email: &str,
) {
    let registered = send(app, credentials("/u/register", email)).await;
    assert_eq!(registered.status, StatusCode::OK);
    let path = confirmation_path(stack, email);
    let confirmed = send(app, test::TestRequest::get().uri(&path)).await;
    assert_eq!(confirmed.status, StatusCode::OK);
}

async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let reply = send(app, credentials("/u/login", email)).await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.cookie.expect("session cookie")
}

#[rstest]
#[actix_web::test]
async fn registered_user_uploads_and_views_a_recording(stack: InMemoryStack) {
    let app = portal(&stack).await;

    let registered = send(&app, credentials("/u/register", ADA)).await;
    assert_eq!(registered.status, StatusCode::OK);
    assert_eq!(registered.body["email"], ADA);
    assert_eq!(registered.body["status"], "unconfirmed");
    assert_single_confirmation_sent(&stack);

    let confirm_path = confirmation_path(&stack, ADA);
    let confirmed = send(&app, test::TestRequest::get().uri(&confirm_path)).await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["status"], "confirmed");

    let cookie = login(&app, ADA).await;
    let uploaded = send(
        &app,
        upload_request(cookie.clone(), Some("Greeting"), "speech.wav"),
    )
    .await;
    assert_eq!(uploaded.status, StatusCode::OK);
    assert_eq!(uploaded.body["filename"], "speech.wav");
    assert_eq!(uploaded.body["language"], "en");
    let id = uploaded.body["id"].as_i64().expect("numeric id");
    let stored_filename = uploaded.body["storedFilename"]
        .as_str()
        .expect("stored filename")
        .to_owned();
    assert_eq!(
        stack.stored_bytes(&stored_filename).expect("stored audio"),
        AUDIO
    );

    let viewed = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/recording/view/{id}"))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(viewed.status, StatusCode::OK);
    assert_eq!(viewed.body["title"], "Greeting");

    let listed = send(&app, test::TestRequest::get().uri("/").cookie(cookie)).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    register_and_confirm(&app, &stack, GRACE).await;
    let intruder = login(&app, GRACE).await;
    let refused = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/recording/view/{id}"))
            .cookie(intruder.clone()),
    )
    .await;
    assert_eq!(refused.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refused.body["code"], "unauthorized");
    assert_eq!(
        refused.body["traceId"].as_str(),
        refused.trace_id.as_deref()
    );

    let own_listing = send(&app, test::TestRequest::get().uri("/").cookie(intruder)).await;
    assert_eq!(own_listing.body.as_array().map(Vec::len), Some(0));
}

#[rstest]
#[actix_web::test]
async fn untitled_upload_is_named_after_the_file(stack: InMemoryStack) {
    let app = portal(&stack).await;
    register_and_confirm(&app, &stack, ADA).await;
    let cookie = login(&app, ADA).await;

    let uploaded = send(&app, upload_request(cookie.clone(), None, "speech.wav")).await;
    assert_eq!(uploaded.status, StatusCode::OK);
    assert_eq!(uploaded.body["title"], "speech.wav");
    assert_eq!(uploaded.body["language"], "en");
    let id = uploaded.body["id"].as_i64().expect("numeric id");

    let viewed = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/recording/view/{id}"))
            .cookie(cookie),
    )
    .await;
    assert_eq!(viewed.status, StatusCode::OK);
    assert_eq!(viewed.body["title"], "speech.wav");
    assert_eq!(viewed.body["filename"], "speech.wav");
}

#[rstest]
#[actix_web::test]
async fn uploaded_file_names_cannot_escape_the_recordings_directory(stack: InMemoryStack) {
    let app = portal(&stack).await;
    register_and_confirm(&app, &stack, ADA).await;
    let cookie = login(&app, ADA).await;

    let uploaded = send(&app, upload_request(cookie, None, "../../etc/evil.wav")).await;

    assert_eq!(uploaded.status, StatusCode::OK);
    assert_eq!(uploaded.body["title"], "evil.wav");
    assert_eq!(uploaded.body["filename"], "evil.wav");
    let id = uploaded.body["id"].as_i64().expect("numeric id");
    let stored_filename = format!("recording-{id}");
    assert_eq!(uploaded.body["storedFilename"], stored_filename.as_str());
    assert_eq!(
        stack.stored_bytes(&stored_filename).expect("stored audio"),
        AUDIO
    );
}

#[rstest]
#[actix_web::test]
async fn login_before_confirmation_reports_unconfirmed_account(stack: InMemoryStack) {
    let app = portal(&stack).await;
    let registered = send(&app, credentials("/u/register", ADA)).await;
    assert_eq!(registered.status, StatusCode::OK);

    let reply = send(&app, credentials("/u/login", ADA)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "account_unconfirmed");
    assert!(reply.cookie.is_none());
}

#[rstest]
#[actix_web::test]
async fn confirmation_links_are_single_use(stack: InMemoryStack) {
    let app = portal(&stack).await;
    let registered = send(&app, credentials("/u/register", ADA)).await;
    assert_eq!(registered.status, StatusCode::OK);
    let confirm_path = confirmation_path(&stack, ADA);

    let first = send(&app, test::TestRequest::get().uri(&confirm_path)).await;
    let second = send(&app, test::TestRequest::get().uri(&confirm_path)).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(second.body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_rejected(stack: InMemoryStack) {
    let app = portal(&stack).await;
    let first = send(&app, credentials("/u/register", ADA)).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = send(&app, credentials("/u/register", "Ada@Example.com")).await;

    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["code"], "invalid_request");
    assert_single_confirmation_sent(&stack);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_invalid_credentials(stack: InMemoryStack) {
    let app = portal(&stack).await;
    register_and_confirm(&app, &stack, ADA).await;

    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/u/login")
            .set_form([("email", ADA), ("password", "not the password")]),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_credentials");
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(stack: InMemoryStack) {
    let app = portal(&stack).await;
    register_and_confirm(&app, &stack, ADA).await;
    let cookie = login(&app, ADA).await;

    let logout = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/u/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::TEMPORARY_REDIRECT);
    let cleared = logout
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("removal cookie");

    let upload_form = send(
        &app,
        test::TestRequest::get()
            .uri("/recording/upload")
            .cookie(cleared),
    )
    .await;
    assert_eq!(upload_form.status, StatusCode::UNAUTHORIZED);
}
