//! HTTP request construction for pull and push.
//!
//! Builders are pure: they only assemble URLs and form fields, so the same
//! [`ResolvedEndpoint`] can be executed by the client or printed by
//! `--debug`.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::params::TransferRequest;
use crate::types::Attachment;
use crate::version::VersionSelector;

/// Characters escaped inside a URL path segment or query value.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a single path segment or query value.
pub(crate) fn encode_segment(input: &str) -> String {
    utf8_percent_encode(input, SEGMENT_ENCODE_SET).to_string()
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One `multipart/form-data` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Plain text field.
    Text {
        /// Field name.
        name: &'static str,
        /// Field value.
        value: String,
    },
    /// File upload field; contents are read when the request is sent.
    File {
        /// Field name.
        name: &'static str,
        /// Local file to read.
        path: PathBuf,
        /// Filename announced to the server.
        filename: String,
    },
}

impl FormField {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Request body shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    None,
    /// `multipart/form-data` body.
    Multipart(Vec<FormField>),
}

/// A fully built request, consumed once by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: String,
    /// Request body.
    pub body: RequestBody,
}

impl ResolvedEndpoint {
    /// Look up a form field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        match &self.body {
            RequestBody::None => None,
            RequestBody::Multipart(fields) => fields.iter().find(|f| f.name() == name),
        }
    }

    /// Human-readable rendering, curl-like.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.method, self.url);
        if let RequestBody::Multipart(fields) = &self.body {
            for field in fields {
                match field {
                    FormField::Text { name, value } => {
                        let _ = write!(out, "\n  -F {name}={value}");
                    }
                    FormField::File { name, path, .. } => {
                        let _ = write!(out, "\n  -F {name}=@{}", path.display());
                    }
                }
            }
        }
        out
    }
}

/// Build the download request.
///
/// `{base}/download/attachments/{page}/{title}?[version=N&]api=v2`
#[must_use]
pub fn pull_endpoint(request: &TransferRequest) -> ResolvedEndpoint {
    let query = match request.version {
        VersionSelector::Number(n) => format!("version={n}&api=v2"),
        VersionSelector::Latest => "api=v2".to_owned(),
    };
    ResolvedEndpoint {
        method: Method::Get,
        url: format!(
            "{}/download/attachments/{}/{}?{}",
            request.base_url,
            encode_segment(&request.page_id),
            encode_segment(&request.remote_filename),
            query
        ),
        body: RequestBody::None,
    }
}

/// URL listing the attachments on a page that carry a given title.
#[must_use]
pub fn lookup_url(base_url: &str, page_id: &str, title: &str) -> String {
    format!(
        "{}/child/attachment?filename={}&limit=200",
        content_url(base_url, page_id),
        encode_segment(title)
    )
}

/// Build the upload request.
///
/// Without an existing attachment this creates a new one; with one it adds a
/// new version of that attachment id and marks the edit as not minor.
#[must_use]
pub fn push_endpoint(
    request: &TransferRequest,
    existing: Option<&Attachment>,
    comment: &str,
) -> ResolvedEndpoint {
    let mut fields = vec![
        FormField::File {
            name: "file",
            path: request.local_path().to_path_buf(),
            filename: request.remote_filename.clone(),
        },
        FormField::Text {
            name: "comment",
            value: comment.to_owned(),
        },
    ];

    let url = if let Some(att) = existing {
        fields.push(FormField::Text {
            name: "minorEdit",
            value: "false".to_owned(),
        });
        format!(
            "{}/child/attachment/{}/data",
            content_url(&request.base_url, &request.page_id),
            encode_segment(&att.id)
        )
    } else {
        format!(
            "{}/child/attachment",
            content_url(&request.base_url, &request.page_id)
        )
    };

    ResolvedEndpoint {
        method: Method::Post,
        url,
        body: RequestBody::Multipart(fields),
    }
}

/// Upload comment: the local time of the push.
#[must_use]
pub fn timestamp_comment() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn content_url(base_url: &str, page_id: &str) -> String {
    format!("{base_url}/rest/api/content/{}", encode_segment(page_id))
}
