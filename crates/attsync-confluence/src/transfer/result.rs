//! Transfer results.

use std::path::PathBuf;

use crate::params::Action;
use crate::request::ResolvedEndpoint;

/// Result of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Transfer direction.
    pub action: Action,
    /// Local file that was read or written.
    pub local_path: PathBuf,
    /// URL the transfer went to or came from.
    pub url: String,
    /// Bytes transferred.
    pub bytes: u64,
}

/// A request that would be sent, with the condition under which it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRequest {
    /// When this request is sent.
    pub label: &'static str,
    /// The request.
    pub endpoint: ResolvedEndpoint,
}

/// Requests a transfer would make, built without network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Existence check sent before a push.
    pub lookup_url: Option<String>,
    /// Candidate transfer requests.
    pub requests: Vec<PlannedRequest>,
}
