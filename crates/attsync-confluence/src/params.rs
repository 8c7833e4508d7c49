//! Transfer parameter resolution.
//!
//! Parameters come from explicit flags, from a single Confluence URL, or
//! both. A URL is mined with [`mine_url`]; explicit flags always win and
//! mined values only fill the gaps.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use attsync_config::ConfluenceConfig;
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use crate::error::TransferError;
use crate::version::{VersionSelector, VersionedFilename};

/// Transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Download an attachment.
    Pull,
    /// Upload a local file as an attachment.
    Push,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => f.write_str("pull"),
            Self::Push => f.write_str("push"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pull" => Ok(Self::Pull),
            "push" => Ok(Self::Push),
            other => Err(format!("unknown action '{other}', expected push or pull")),
        }
    }
}

/// Parameters as supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ExplicitParams {
    /// `--action`.
    pub action: Option<Action>,
    /// `--filename`.
    pub filename: Option<String>,
    /// `--pageid`.
    pub page_id: Option<String>,
    /// `--urlbase`: either a server base URL or a full attachment URL.
    pub url: Option<String>,
    /// `--username`, or the configured username.
    pub username: Option<String>,
}

/// Values recovered from a Confluence attachment URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedUrl {
    /// Direction implied by the URL shape.
    pub action: Action,
    /// Page identifier.
    pub page_id: Option<String>,
    /// Attachment filename (pull URLs only).
    pub filename: Option<String>,
    /// Scheme, host and context path preceding the API marker.
    pub base_url: String,
}

/// Fully resolved parameters for one transfer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Transfer direction.
    pub action: Action,
    /// Remote page identifier.
    pub page_id: String,
    /// Local filename as requested, including any version suffix.
    pub filename: String,
    /// Attachment title on the server.
    pub remote_filename: String,
    /// Version to download.
    pub version: VersionSelector,
    /// Server base URL, without trailing slash.
    pub base_url: String,
    /// Basic-auth username.
    pub username: String,
}

impl TransferRequest {
    /// Local file read by push or written by pull.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        Path::new(&self.filename)
    }
}

/// Extract action, page and filename from a Confluence URL.
///
/// Recognized shapes (an optional context path such as `/wiki` may precede
/// the marker):
///
/// - `{base}/rest/api/content/{page}/child/attachment...` → push
/// - `{base}/download/attachments/{page}/{file}?...` → pull
///
/// The URL is split as raw text, so unencoded characters such as spaces in
/// the filename are accepted. A decoded filename that is not a single path
/// component is dropped.
///
/// Returns `None` for any other URL.
#[must_use]
pub fn mine_url(url: &str) -> Option<MinedUrl> {
    let url = url.split(['?', '#']).next().unwrap_or_default();
    let (scheme, rest) = url.split_once("://")?;
    let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let marker = find_marker(&segments)?;

    let prefix = segments[..marker].join("/");
    let base_url = if prefix.is_empty() {
        format!("{scheme}://{authority}")
    } else {
        format!("{scheme}://{authority}/{prefix}")
    };
    let rest = &segments[marker + 2..];

    if segments[marker] == "rest" {
        let page_id = rest
            .iter()
            .position(|s| *s == "content")
            .and_then(|i| rest.get(i + 1))
            .map(|s| (*s).to_owned());
        Some(MinedUrl {
            action: Action::Push,
            page_id,
            filename: None,
            base_url,
        })
    } else {
        let page_id = rest.first().map(|s| (*s).to_owned());
        let filename = match rest
            .get(1)
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        {
            Some(name) if !is_single_component(&name) => {
                warn!(filename = %name, "Ignoring URL filename that is not a plain file name");
                None
            }
            other => other,
        };
        Some(MinedUrl {
            action: Action::Pull,
            page_id,
            filename,
            base_url,
        })
    }
}

fn find_marker(segments: &[&str]) -> Option<usize> {
    segments
        .windows(2)
        .position(|pair| matches!(pair, ["rest", "api"] | ["download", "attachments"]))
}

fn is_single_component(name: &str) -> bool {
    !name.contains(['/', '\\', '\0']) && name != "." && name != ".."
}

/// Resolve explicit parameters and configuration into a [`TransferRequest`].
///
/// # Errors
///
/// Returns [`TransferError::InsufficientParameters`] naming every missing
/// field, or [`TransferError::InvalidUrl`] if `--urlbase` is not http(s)
/// or is an attachment URL that could not be mined.
pub fn resolve(
    params: &ExplicitParams,
    config: &ConfluenceConfig,
) -> Result<TransferRequest, TransferError> {
    let mined = params.url.as_deref().and_then(mine_url);

    let base_url = match (&mined, params.url.as_deref()) {
        (Some(m), _) => m.base_url.clone(),
        (None, Some(url)) => {
            let segments: Vec<&str> = url.split('/').collect();
            if (!url.starts_with("http://") && !url.starts_with("https://"))
                || find_marker(&segments).is_some()
            {
                return Err(TransferError::InvalidUrl(url.to_owned()));
            }
            url.trim_end_matches('/').to_owned()
        }
        (None, None) => config.base_url.clone(),
    };

    if let Some(m) = &mined {
        debug!(?m, "Mined parameters from URL");
        report_override("action", params.action.map(|a| a.to_string()), Some(m.action.to_string()));
        report_override("pageid", params.page_id.clone(), m.page_id.clone());
        report_override("filename", params.filename.clone(), m.filename.clone());
    }

    let action = params.action.or(mined.as_ref().map(|m| m.action));
    let page_id = non_empty(params.page_id.clone())
        .or_else(|| mined.as_ref().and_then(|m| m.page_id.clone()));
    let filename = non_empty(params.filename.clone())
        .or_else(|| mined.as_ref().and_then(|m| m.filename.clone()));
    let username = non_empty(params.username.clone());

    let versioned = filename.as_deref().map(VersionedFilename::parse);
    let remote_filename = versioned
        .as_ref()
        .map(VersionedFilename::remote_title)
        .filter(|t| !t.is_empty());

    let mut missing = Vec::new();
    if action.is_none() {
        missing.push("action");
    }
    if remote_filename.is_none() {
        missing.push("filename");
    }
    if page_id.is_none() {
        missing.push("pageid");
    }
    if username.is_none() {
        missing.push("username");
    }

    match (action, filename, remote_filename, page_id, username, versioned) {
        (
            Some(action),
            Some(filename),
            Some(remote_filename),
            Some(page_id),
            Some(username),
            Some(versioned),
        ) => Ok(TransferRequest {
            action,
            page_id,
            filename,
            remote_filename,
            version: versioned.selector(),
            base_url,
            username,
        }),
        _ => Err(TransferError::InsufficientParameters(missing)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Warn when an explicit flag disagrees with the URL; the flag wins.
fn report_override(field: &str, explicit: Option<String>, mined: Option<String>) {
    if let (Some(explicit), Some(mined)) = (explicit, mined)
        && explicit != mined
    {
        warn!(
            field,
            explicit = %explicit,
            mined = %mined,
            "Explicit --{field} overrides the value found in --urlbase"
        );
    }
}
