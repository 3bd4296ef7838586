//! Port for dispatching account confirmation messages.

use async_trait::async_trait;
use quick_xml::escape::escape;

use crate::domain::EmailAddress;

use super::define_port_error;

/// Subject line used for confirmation messages.
pub const CONFIRMATION_SUBJECT: &str = "Email Confirmation";

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum MailDeliveryError {
        /// The mail service could not be reached.
        Transport { message: String } => "mail transport failed: {message}",
        /// The mail service refused the message.
        Rejected { status: u16, message: String } =>
            "mail service rejected message with status {status}: {message}",
    }
}

/// Confirmation message addressed to a newly registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationMessage {
    pub recipient: EmailAddress,
    pub subject: String,
    pub link: String,
}

impl ConfirmationMessage {
    /// Build the message for `recipient` pointing at `link`.
    pub fn new(recipient: EmailAddress, link: impl Into<String>) -> Self {
        Self {
            recipient,
            subject: CONFIRMATION_SUBJECT.to_owned(),
            link: link.into(),
        }
    }

    /// Plain-text body embedding the confirmation link.
    #[must_use]
    pub fn text_body(&self) -> String {
        format!(
            "Please confirm your email address by visiting the link below.\n\n{}\n",
            self.link
        )
    }

    /// HTML body embedding the confirmation link; the link is escaped for
    /// both the attribute and the text.
    #[must_use]
    pub fn html_body(&self) -> String {
        format!(
            "<p>Please confirm your email address by clicking \
             <a href=\"{link}\">this link</a>.</p><p>{link}</p>",
            link = escape(self.link.as_str())
        )
    }
}

/// Port for sending confirmation messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    /// Deliver the message or report why it failed.
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), MailDeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn html_body_escapes_the_link() {
        let message = ConfirmationMessage::new(
            EmailAddress::parse("ada@example.com").expect("email"),
            "https://asr.example.com/u/confirm/x?a=1&b=\"><script>",
        );

        let html = message.html_body();

        assert!(html.contains(
            "href=\"https://asr.example.com/u/confirm/x?a=1&amp;b=&quot;&gt;&lt;script&gt;\""
        ));
        assert!(!html.contains("<script>"));
        assert!(message.text_body().contains(&message.link));
    }
}
