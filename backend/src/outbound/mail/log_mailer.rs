//! Development mailer that writes confirmation links to the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ConfirmationMailer, ConfirmationMessage, MailDeliveryError};

/// Mailer that never leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConfirmationMailer;

#[async_trait]
impl ConfirmationMailer for LogConfirmationMailer {
    async fn send(&self, message: &ConfirmationMessage) -> Result<(), MailDeliveryError> {
        info!(
            recipient = %message.recipient,
            subject = %message.subject,
            link = %message.link,
            "confirmation email not sent; no mail API configured"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;

    #[tokio::test]
    async fn always_accepts_messages() {
        let message = ConfirmationMessage::new(
            EmailAddress::parse("ada@example.com").expect("valid email"),
            "http://localhost:8080/u/confirm/abc",
        );

        LogConfirmationMailer
            .send(&message)
            .await
            .expect("log mailer accepts");
    }
}
