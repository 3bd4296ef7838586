//! Tests for the account service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CONFIRMATION_SUBJECT, MailDeliveryError, MockConfirmationMailer, MockPasswordHasher,
    MockUserRepository,
};
use crate::domain::{
    AccountStatus, EmailAddress, ErrorCode, PasswordHash, UserId, UserRecord,
};

const URL_BASE: &str = "http://localhost:8080";
const TOKEN: &str = "5b0b6c2e-58d1-4c4e-9a53-0a3c2f1d9e11";

type TestService = UserAccountService<MockUserRepository, MockPasswordHasher, MockConfirmationMailer>;

fn stored_user(status: AccountStatus, token: Option<ConfirmationToken>) -> User {
    User::from(UserRecord {
        id: UserId::new(7).expect("valid id"),
        email: EmailAddress::parse("ada@example.com").expect("valid email"),
        password_hash: PasswordHash::new("$2b$10$stored"),
        status,
        confirmation_token: token,
        created_at: Utc::now(),
    })
}

fn user_from_new(new_user: &NewUser) -> User {
    User::from(UserRecord {
        id: UserId::new(7).expect("valid id"),
        email: new_user.email.clone(),
        password_hash: new_user.password_hash.clone(),
        status: AccountStatus::Unconfirmed,
        confirmation_token: Some(new_user.confirmation_token),
        created_at: Utc::now(),
    })
}

#[fixture]
fn credentials() -> Credentials {
    Credentials::try_from_parts("Ada@Example.com", "pw123456").expect("valid credentials")
}

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    mailer: MockConfirmationMailer,
) -> TestService {
    UserAccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(mailer), URL_BASE)
}

fn hasher_returning(verified: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .returning(move |_, _| Ok(verified));
    hasher
}

#[rstest]
#[tokio::test]
async fn register_persists_unconfirmed_user_and_sends_link(credentials: Credentials) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "pw123456")
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$2b$10$hashed")));

    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|new_user| {
            new_user.email.as_ref() == "ada@example.com"
                && new_user.password_hash.as_ref() == "$2b$10$hashed"
        })
        .times(1)
        .returning(|new_user| Ok(user_from_new(new_user)));

    let mut mailer = MockConfirmationMailer::new();
    mailer
        .expect_send()
        .withf(|message| {
            message.recipient.as_ref() == "ada@example.com"
                && message.subject == CONFIRMATION_SUBJECT
                && message
                    .link
                    .starts_with("http://localhost:8080/u/confirm/")
        })
        .times(1)
        .returning(|_| Ok(()));

    let user = service(users, hasher, mailer)
        .register(&credentials)
        .await
        .expect("registration succeeds");

    assert_eq!(user.status(), AccountStatus::Unconfirmed);
    let token = user.confirmation_token().expect("token stored");
    assert_eq!(token.as_uuid().get_version_num(), 4);
}

#[rstest]
#[tokio::test]
async fn register_link_matches_stored_token(credentials: Credentials) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$2b$10$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|new_user| Ok(user_from_new(new_user)));

    let sent = Arc::new(std::sync::Mutex::new(None::<ConfirmationMessage>));
    let sink = Arc::clone(&sent);
    let mut mailer = MockConfirmationMailer::new();
    mailer.expect_send().returning(move |message| {
        *sink.lock().expect("lock") = Some(message.clone());
        Ok(())
    });

    let user = service(users, hasher, mailer)
        .register(&credentials)
        .await
        .expect("registration succeeds");

    let message = sent.lock().expect("lock").clone().expect("message sent");
    let token = user.confirmation_token().expect("token stored");
    assert_eq!(message.link, confirmation_link(URL_BASE, token));
}

#[rstest]
#[tokio::test]
async fn register_duplicate_email_is_invalid_request(credentials: Credentials) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$2b$10$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::duplicate_email()));
    let mut mailer = MockConfirmationMailer::new();
    mailer.expect_send().times(0);

    let error = service(users, hasher, mailer)
        .register(&credentials)
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn register_reports_delivery_failure(credentials: Credentials) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$2b$10$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .returning(|new_user| Ok(user_from_new(new_user)));
    let mut mailer = MockConfirmationMailer::new();
    mailer
        .expect_send()
        .returning(|_| Err(MailDeliveryError::transport("connection refused")));

    let error = service(users, hasher, mailer)
        .register(&credentials)
        .await
        .expect_err("delivery failure");

    assert_eq!(error.code(), ErrorCode::DeliveryFailed);
}

#[rstest]
#[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn login_maps_repository_errors(
    credentials: Credentials,
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Err(failure));

    let error = service(users, MockPasswordHasher::new(), MockConfirmationMailer::new())
        .login(&credentials)
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn login_unknown_email_is_invalid_credentials(credentials: Credentials) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let error = service(users, MockPasswordHasher::new(), MockConfirmationMailer::new())
        .login(&credentials)
        .await
        .expect_err("unknown email");

    assert_eq!(error.code(), ErrorCode::InvalidCredentials);
}

#[rstest]
#[case(AccountStatus::Confirmed, false, Some(ErrorCode::InvalidCredentials))]
#[case(AccountStatus::Unconfirmed, false, Some(ErrorCode::InvalidCredentials))]
#[case(AccountStatus::Unconfirmed, true, Some(ErrorCode::AccountUnconfirmed))]
#[case(AccountStatus::Confirmed, true, None)]
#[tokio::test]
async fn login_checks_password_before_confirmation(
    credentials: Credentials,
    #[case] status: AccountStatus,
    #[case] password_matches: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "ada@example.com")
        .returning(move |_| Ok(Some(stored_user(status, None))));

    let result = service(
        users,
        hasher_returning(password_matches),
        MockConfirmationMailer::new(),
    )
    .login(&credentials)
    .await;

    match (result, expected) {
        (Ok(user), None) => assert_eq!(user.email().as_ref(), "ada@example.com"),
        (Err(error), Some(code)) => assert_eq!(error.code(), code),
        (other, expected) => panic!("unexpected outcome {other:?}, expected {expected:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn confirm_rejects_malformed_token_without_lookup() {
    let mut users = MockUserRepository::new();
    users.expect_consume_confirmation_token().times(0);

    let error = service(users, MockPasswordHasher::new(), MockConfirmationMailer::new())
        .confirm("not-a-uuid")
        .await
        .expect_err("malformed token");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn confirm_unknown_token_is_not_found() {
    let mut users = MockUserRepository::new();
    users
        .expect_consume_confirmation_token()
        .returning(|_| Ok(None));

    let error = service(users, MockPasswordHasher::new(), MockConfirmationMailer::new())
        .confirm(TOKEN)
        .await
        .expect_err("unknown token");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn confirm_clears_token_and_marks_confirmed() {
    let token = ConfirmationToken::parse(TOKEN).expect("valid token");
    let mut users = MockUserRepository::new();
    users
        .expect_consume_confirmation_token()
        .withf(move |candidate| *candidate == token)
        .times(1)
        .returning(|_| Ok(Some(stored_user(AccountStatus::Confirmed, None))));

    let user = service(users, MockPasswordHasher::new(), MockConfirmationMailer::new())
        .confirm(TOKEN)
        .await
        .expect("confirmation succeeds");

    assert_eq!(user.status(), AccountStatus::Confirmed);
    assert!(user.confirmation_token().is_none());
}
