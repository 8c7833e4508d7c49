//! Confluence REST API client.
//!
//! Provides a sync HTTP client for Confluence Server/Data Center with
//! HTTP basic authentication.

mod attachments;

use std::time::Duration;

use ureq::Agent;

use crate::credentials::Credentials;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    credentials: Credentials,
}

impl ConfluenceClient {
    /// Create a client for `base_url`.
    ///
    /// Non-2xx responses are returned as values rather than errors so that
    /// callers can classify them.
    #[must_use]
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    /// User the client authenticates as.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    fn auth_header(&self) -> String {
        self.credentials.basic_auth_header()
    }
}
