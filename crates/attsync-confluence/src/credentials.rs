//! Basic-auth credentials and the provider seam used to obtain them.

use std::fmt;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::error::TransferError;

/// Username and password for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    /// Basic-auth username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn basic_auth_header(&self) -> String {
        let token = BASE64_STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of credentials for a transfer.
///
/// Called once per invocation, before any network request is made.
/// Interactive implementations may block on user input.
pub trait CredentialProvider {
    /// Obtain credentials.
    fn credentials(&self) -> Result<Credentials, TransferError>;
}

/// Non-interactive provider returning fixed credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    /// Create a provider for the given username and password.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self(Credentials::new(username, password))
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, TransferError> {
        Ok(self.0.clone())
    }
}
