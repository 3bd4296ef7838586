//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so tests can substitute doubles without any I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, RecordingService};

use super::pages::PageContext;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub recordings: Arc<dyn RecordingService>,
    /// Absolute URL prefix used for every generated link.
    pub url_base: String,
}

impl HttpState {
    /// Bundle the driving ports with the public URL base.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        recordings: Arc<dyn RecordingService>,
        url_base: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            recordings,
            url_base: url_base.into(),
        }
    }

    /// Page context for a caller with the given login state.
    #[must_use]
    pub fn page(&self, is_logged_in: bool) -> PageContext<'_> {
        PageContext {
            is_logged_in,
            url_base: &self.url_base,
        }
    }
}
