//! Confluence attachment synchronization.
//!
//! Pulls a single attachment (optionally a historical version) from a
//! Confluence page, or pushes a local file as a new attachment or a new
//! version of an existing one, over HTTP basic authentication.
//!
//! The pieces run in order for every invocation:
//!
//! - [`resolve`] turns flags and/or a Confluence URL into a [`TransferRequest`]
//! - [`VersionedFilename`] splits a `.v<N>` suffix off the requested filename
//! - [`ConfluenceClient::find_attachment`] decides between create and update
//! - [`pull_endpoint`] / [`push_endpoint`] build the request
//! - [`classify_download`] / [`classify_upsert`] decide success
//!
//! [`Transfer`] wires them together.

mod client;
mod credentials;
mod error;
mod outcome;
mod params;
mod request;
mod transfer;
mod types;
mod version;

pub use client::ConfluenceClient;
pub use credentials::{CredentialProvider, Credentials, StaticCredentials};
pub use error::TransferError;
pub use outcome::{
    Outcome, OutcomeReason, classify_download, classify_upsert, extract_json_payload,
    scan_error_markers, scan_error_markers_in,
};
pub use params::{Action, ExplicitParams, MinedUrl, TransferRequest, mine_url, resolve};
pub use request::{
    FormField, Method, RequestBody, ResolvedEndpoint, lookup_url, pull_endpoint, push_endpoint,
    timestamp_comment,
};
pub use transfer::{PlannedRequest, Transfer, TransferPlan, TransferReport, plan};
pub use types::{Attachment, AttachmentsResponse};
pub use version::{VersionSelector, VersionedFilename};
