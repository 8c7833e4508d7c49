//! Error types for attachment transfers.

use std::path::PathBuf;

use crate::outcome::OutcomeReason;

/// Error from resolving or executing an attachment transfer.
///
/// Every variant is terminal for the invocation; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Required parameters are missing after merging flags with the mined URL.
    #[error("insufficient parameters: missing {}", .0.join(", "))]
    InsufficientParameters(Vec<&'static str>),

    /// The `--urlbase` value is not an http(s) URL.
    #[error("invalid URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    /// Local file to push does not exist.
    #[error("local file not found: {}", .0.display())]
    LocalFileNotFound(PathBuf),

    /// Attachment existence check failed.
    #[error("attachment lookup on page {page_id} failed: {message}")]
    RemoteLookupFailed {
        /// Page that was queried.
        page_id: String,
        /// What went wrong.
        message: String,
    },

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// Server answered with an error status not covered by another variant.
    #[error("HTTP error: {status} - {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Pull returned a "page not found" page instead of attachment content.
    #[error("no valid attachment link: '{filename}' not found on page {page_id}")]
    PageNotFound {
        /// Requested page.
        page_id: String,
        /// Requested attachment title.
        filename: String,
    },

    /// Server rejected the basic-auth credentials.
    #[error("basic authentication failure for user '{username}'")]
    AuthFailed {
        /// User whose credentials were rejected.
        username: String,
    },

    /// Push response does not reference the uploaded file.
    #[error("upload of '{filename}' was not confirmed by the server ({reason})")]
    UpsertNotConfirmed {
        /// Remote attachment title.
        filename: String,
        /// Why the response was rejected.
        reason: OutcomeReason,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
