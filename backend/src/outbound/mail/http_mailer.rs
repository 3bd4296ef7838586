//! Reqwest-backed confirmation mailer.
//!
//! Posts one JSON document per message to a transactional mail API. The
//! adapter owns transport details only: payload shape, bearer auth, timeout
//! and status mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{ConfirmationMailer, ConfirmationMessage, MailDeliveryError};

const DEFAULT_SENDER: &str = "no-reply@speech-portal.invalid";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sender identity and credentials for the mail API.
#[derive(Clone)]
pub struct MailApiIdentity {
    /// Address placed in the `from` field.
    pub sender: String,
    /// Bearer token; omitted from requests when `None`.
    pub token: Option<String>,
}

impl Default for MailApiIdentity {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_owned(),
            token: None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
    html: String,
}

impl<'a> MailPayload<'a> {
    fn from_message(sender: &'a str, message: &'a ConfirmationMessage) -> Self {
        Self {
            from: sender,
            to: message.recipient.as_ref(),
            subject: &message.subject,
            text: message.text_body(),
            html: message.html_body(),
        }
    }
}

/// Mailer that posts to a single HTTP endpoint.
pub struct HttpConfirmationMailer {
    client: Client,
    endpoint: Url,
    sender: String,
    token: Option<String>,
}

impl HttpConfirmationMailer {
    /// Build a mailer whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: MailApiIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            sender: identity.sender,
            token: identity.token,
        })
    }
}

#[async_trait]
impl ConfirmationMailer for HttpConfirmationMailer {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), MailDeliveryError> {
        let payload = MailPayload::from_message(&self.sender, message);
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            debug!(%status, "confirmation email accepted by mail API");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_transport_error(error: reqwest::Error) -> MailDeliveryError {
    if error.is_timeout() {
        MailDeliveryError::transport(format!("mail API request timed out: {error}"))
    } else {
        MailDeliveryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> MailDeliveryError {
    let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = if excerpt.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        excerpt
    };
    MailDeliveryError::rejected(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::rstest;

    fn message() -> ConfirmationMessage {
        ConfirmationMessage::new(
            EmailAddress::parse("ada@example.com").expect("valid email"),
            "http://localhost:8080/u/confirm/0000",
        )
    }

    #[test]
    fn payload_carries_both_bodies() {
        let message = message();
        let payload = MailPayload::from_message("noreply@example.com", &message);
        let json = serde_json::to_value(&payload).expect("serialise payload");

        assert_eq!(json["from"], "noreply@example.com");
        assert_eq!(json["to"], "ada@example.com");
        assert_eq!(json["subject"], "Email Confirmation");
        assert!(
            json["text"]
                .as_str()
                .is_some_and(|text| text.contains(&message.link))
        );
        assert!(
            json["html"]
                .as_str()
                .is_some_and(|html| html.contains("href=\"http://localhost:8080/u/confirm/0000\""))
        );
    }

    #[rstest]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, "bad recipient", "bad recipient")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "   ", "Service Unavailable")]
    fn status_errors_keep_code_and_reason(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, body);

        match error {
            MailDeliveryError::Rejected {
                status: code,
                message,
            } => {
                assert_eq!(code, status.as_u16());
                assert_eq!(message, expected);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        let error = map_status_error(StatusCode::BAD_REQUEST, &body);

        let MailDeliveryError::Rejected { message, .. } = error else {
            panic!("expected rejection");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
    }
}
