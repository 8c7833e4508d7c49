//! Interactive password prompt.

use attsync_confluence::{CredentialProvider, Credentials, TransferError};
use console::Term;

/// Prompts on the terminal for the password of a known user.
pub(crate) struct PromptCredentials {
    username: String,
}

impl PromptCredentials {
    pub(crate) fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
        }
    }
}

impl CredentialProvider for PromptCredentials {
    fn credentials(&self) -> Result<Credentials, TransferError> {
        let term = Term::stderr();
        term.write_str(&format!("Password for {}: ", self.username))?;
        // Echo is disabled while reading.
        let password = term.read_secure_line()?;
        Ok(Credentials::new(&self.username, &password))
    }
}
