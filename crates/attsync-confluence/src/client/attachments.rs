//! Attachment operations for Confluence API.

use std::io::{self, Write};

use rand::RngExt;
use tracing::{debug, info};

use super::ConfluenceClient;
use crate::error::TransferError;
use crate::outcome::{OutcomeReason, scan_error_markers};
use crate::request::{FormField, Method, RequestBody, ResolvedEndpoint, lookup_url};
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// List attachments on a page that carry `title`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::AuthFailed`] when the server rejects the
    /// credentials, [`TransferError::RemoteLookupFailed`] for any other
    /// unusable response, and [`TransferError::Transport`] on network failure.
    pub fn list_attachments(
        &self,
        page_id: &str,
        title: &str,
    ) -> Result<AttachmentsResponse, TransferError> {
        let url = lookup_url(&self.base_url, page_id, title);

        info!("Getting attachments for page {}", page_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read body)".to_owned());

        if status == 401 || status == 403 {
            return Err(self.auth_failed());
        }
        if status >= 400 {
            return Err(TransferError::RemoteLookupFailed {
                page_id: page_id.to_owned(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            if scan_error_markers(body.as_bytes()) == Some(OutcomeReason::AuthFailed) {
                self.auth_failed()
            } else {
                TransferError::RemoteLookupFailed {
                    page_id: page_id.to_owned(),
                    message: format!("unexpected response: {err}"),
                }
            }
        })
    }

    /// Find an attachment titled exactly `title` on a page.
    ///
    /// # Errors
    ///
    /// Same as [`ConfluenceClient::list_attachments`]; lookup failures are
    /// never reported as "not found".
    pub fn find_attachment(
        &self,
        page_id: &str,
        title: &str,
    ) -> Result<Option<Attachment>, TransferError> {
        let found = self.list_attachments(page_id, title)?.find_by_title(title);
        match &found {
            Some(att) => info!("Found existing attachment '{}' (id={})", title, att.id),
            None => info!("No attachment '{}' on page {}", title, page_id),
        }
        Ok(found)
    }

    /// Execute a GET endpoint, streaming the body into `sink`.
    ///
    /// Returns the HTTP status code; the body is written whatever the status.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Transport`] on network failure and
    /// [`TransferError::Io`] if writing to `sink` fails.
    pub fn download<W: Write>(
        &self,
        endpoint: &ResolvedEndpoint,
        sink: &mut W,
    ) -> Result<u16, TransferError> {
        debug_assert_eq!(endpoint.method, Method::Get);
        info!("Downloading {}", endpoint.url);

        let response = self
            .agent
            .get(&endpoint.url)
            .header("Authorization", &self.auth_header())
            .call()?;

        let status = response.status().as_u16();
        let mut reader = response.into_body().into_reader();
        let bytes = io::copy(&mut reader, sink)?;
        debug!(status, bytes, "Download finished");

        Ok(status)
    }

    /// Execute a multipart POST endpoint.
    ///
    /// Returns the HTTP status code and the response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::LocalFileNotFound`] if a file field cannot be
    /// read, and [`TransferError::Transport`] on network failure.
    pub fn upload(&self, endpoint: &ResolvedEndpoint) -> Result<(u16, String), TransferError> {
        debug_assert_eq!(endpoint.method, Method::Post);
        info!("Uploading to {}", endpoint.url);

        let boundary = format!(
            "----AttsyncFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let body = encode_multipart(&endpoint.body, &boundary)?;

        let response = self
            .agent
            .post(&endpoint.url)
            .header("Authorization", &self.auth_header())
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read body)".to_owned());
        debug!(status, "Upload finished");

        Ok((status, body))
    }

    fn auth_failed(&self) -> TransferError {
        TransferError::AuthFailed {
            username: self.username().to_owned(),
        }
    }
}

/// Build a `multipart/form-data` body.
fn encode_multipart(body: &RequestBody, boundary: &str) -> Result<Vec<u8>, TransferError> {
    let RequestBody::Multipart(fields) = body else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for field in fields {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match field {
            FormField::Text { name, value } => {
                out.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                out.extend_from_slice(value.as_bytes());
            }
            FormField::File {
                name,
                path,
                filename,
            } => {
                let data = std::fs::read(path).map_err(|err| match err.kind() {
                    io::ErrorKind::NotFound => TransferError::LocalFileNotFound(path.clone()),
                    _ => TransferError::Io(err),
                })?;
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n",
                        filename.replace('"', "%22")
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                out.extend_from_slice(&data);
            }
        }
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(out)
}
