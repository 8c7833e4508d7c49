//! Response classification.
//!
//! Confluence answers HTTP 200 for several logical failures: a missing page
//! or attachment renders an HTML "Page Not Found" page and rejected
//! credentials can render a "Basic Authentication Failure" page. Status
//! codes are checked first; the phrase scan runs only on 2xx responses.
//!
//! The phrase scan is a heuristic. An attachment whose genuine content
//! contains one of the phrases is classified as a failure.

use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::bytes::Regex;
use serde_json::Value;

static PAGE_NOT_FOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page not found|page does not exist").unwrap());

static AUTH_FAILURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)basic authentication failure").unwrap());

const SCAN_CHUNK: usize = 64 * 1024;

/// Tail of each chunk carried into the next; longer than any marker phrase.
const SCAN_OVERLAP: usize = 64;

/// Why a response was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeReason {
    /// Page or attachment does not exist.
    PageNotFound,
    /// Credentials were rejected.
    AuthFailed,
    /// Push response carried no usable `webui` link.
    EmptyResult,
    /// Push response links to a different file.
    NameMismatch,
    /// Server returned an error status.
    HttpStatus(u16),
    /// Response is the expected content.
    ConfirmedMatch,
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageNotFound => f.write_str("page not found"),
            Self::AuthFailed => f.write_str("authentication failed"),
            Self::EmptyResult => f.write_str("empty result"),
            Self::NameMismatch => f.write_str("link does not name the uploaded file"),
            Self::HttpStatus(status) => write!(f, "HTTP status {status}"),
            Self::ConfirmedMatch => f.write_str("confirmed"),
        }
    }
}

/// Classification of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the transfer succeeded.
    pub succeeded: bool,
    /// Why.
    pub reason: OutcomeReason,
}

impl Outcome {
    fn confirmed() -> Self {
        Self {
            succeeded: true,
            reason: OutcomeReason::ConfirmedMatch,
        }
    }

    fn failed(reason: OutcomeReason) -> Self {
        Self {
            succeeded: false,
            reason,
        }
    }
}

/// Map an HTTP error status to a failure reason.
fn status_failure(status: u16) -> Option<OutcomeReason> {
    match status {
        401 | 403 => Some(OutcomeReason::AuthFailed),
        404 => Some(OutcomeReason::PageNotFound),
        s if s >= 400 => Some(OutcomeReason::HttpStatus(s)),
        _ => None,
    }
}

/// Scan content for disguised error pages.
///
/// "Page not found" wins over "basic authentication failure" when both
/// appear.
#[must_use]
pub fn scan_error_markers(content: &[u8]) -> Option<OutcomeReason> {
    if PAGE_NOT_FOUND_RE.is_match(content) {
        Some(OutcomeReason::PageNotFound)
    } else if AUTH_FAILURE_RE.is_match(content) {
        Some(OutcomeReason::AuthFailed)
    } else {
        None
    }
}

/// Scan a stream for disguised error pages in fixed-size chunks.
///
/// Same precedence as [`scan_error_markers`]. Memory use is bounded by the
/// chunk size regardless of the stream length.
///
/// # Errors
///
/// Returns any I/O error from `reader`.
pub fn scan_error_markers_in<R: Read>(mut reader: R) -> io::Result<Option<OutcomeReason>> {
    let mut buf = vec![0; SCAN_OVERLAP + SCAN_CHUNK];
    let mut carried = 0;
    let mut auth_failed = false;

    loop {
        let read = match reader.read(&mut buf[carried..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let filled = carried + read;
        let window = &buf[..filled];
        if PAGE_NOT_FOUND_RE.is_match(window) {
            return Ok(Some(OutcomeReason::PageNotFound));
        }
        auth_failed |= AUTH_FAILURE_RE.is_match(window);

        carried = filled.min(SCAN_OVERLAP);
        buf.copy_within(filled - carried..filled, 0);
    }

    Ok(auth_failed.then_some(OutcomeReason::AuthFailed))
}

/// Classify a downloaded attachment read from `content`.
///
/// `content` is not read when the status alone decides the outcome.
///
/// # Errors
///
/// Returns any I/O error from `content`.
pub fn classify_download<R: Read>(status: u16, content: R) -> io::Result<Outcome> {
    let reason = match status_failure(status) {
        Some(reason) => Some(reason),
        None => scan_error_markers_in(content)?,
    };
    Ok(reason.map_or_else(Outcome::confirmed, Outcome::failed))
}

/// Extract the JSON document from a push response body.
///
/// The body is used as-is when it starts with `{`; otherwise the first line
/// beginning with `{"` is taken, which tolerates bodies with leading noise.
#[must_use]
pub fn extract_json_payload(body: &str) -> Option<&str> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    body.lines().find(|line| line.starts_with("{\""))
}

/// Classify an upload response.
///
/// Success requires the `webui` link of the created attachment
/// (`results[0]._links.webui`) or of the new version (`_links.webui`) to
/// mention the base name of `remote_filename`.
#[must_use]
pub fn classify_upsert(status: u16, body: &str, remote_filename: &str) -> Outcome {
    if let Some(reason) = status_failure(status) {
        return Outcome::failed(reason);
    }

    let Some(value) = extract_json_payload(body)
        .and_then(|payload| serde_json::from_str::<Value>(payload).ok())
    else {
        if AUTH_FAILURE_RE.is_match(body.as_bytes()) {
            return Outcome::failed(OutcomeReason::AuthFailed);
        }
        return Outcome::failed(OutcomeReason::EmptyResult);
    };

    if let Some(code) = value.get("statusCode").and_then(Value::as_u64)
        && let Some(reason) = u16::try_from(code).ok().and_then(status_failure)
    {
        return Outcome::failed(reason);
    }

    let webui = value
        .pointer("/results/0/_links/webui")
        .or_else(|| value.pointer("/_links/webui"))
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty());

    let Some(webui) = webui else {
        return Outcome::failed(OutcomeReason::EmptyResult);
    };

    if link_names_file(webui, remote_filename) {
        Outcome::confirmed()
    } else {
        Outcome::failed(OutcomeReason::NameMismatch)
    }
}

/// Whether `link` mentions the base name of `filename`, raw or URL-decoded.
fn link_names_file(link: &str, filename: &str) -> bool {
    let base = Path::new(filename)
        .file_name()
        .map_or_else(|| filename.to_owned(), |n| n.to_string_lossy().into_owned());
    if base.is_empty() {
        return false;
    }
    if link.contains(&base) {
        return true;
    }
    let decoded = percent_decode_str(link).decode_utf8_lossy();
    decoded.contains(&base) || decoded.replace('+', " ").contains(&base)
}
