//! Confirmation mail adapters.
//!
//! `HttpConfirmationMailer` posts messages to a JSON mail API.
//! `LogConfirmationMailer` is used when no API is configured and only logs
//! the confirmation link.

mod http_mailer;
mod log_mailer;

pub use http_mailer::{HttpConfirmationMailer, MailApiIdentity};
pub use log_mailer::LogConfirmationMailer;
