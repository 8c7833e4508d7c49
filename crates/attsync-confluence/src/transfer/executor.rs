//! Transfer executor.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::result::{PlannedRequest, TransferPlan, TransferReport};
use crate::client::ConfluenceClient;
use crate::error::TransferError;
use crate::outcome::{OutcomeReason, classify_download, classify_upsert};
use crate::params::{Action, TransferRequest};
use crate::request::{self, timestamp_comment};
use crate::types::Attachment;

/// Staging file for pull downloads inside the scratch directory.
const STAGED_DOWNLOAD: &str = "download.part";

/// Captured push response inside the scratch directory.
const PUSH_RESPONSE: &str = "push-response.json";

/// Bytes of a rejected download kept for the error message.
const ERROR_BODY_LIMIT: u64 = 4096;

/// Runs one resolved transfer against a Confluence server.
pub struct Transfer<'a> {
    client: &'a ConfluenceClient,
    request: &'a TransferRequest,
    comment: String,
}

impl<'a> Transfer<'a> {
    /// Create a transfer; push comments default to the current local time.
    #[must_use]
    pub fn new(client: &'a ConfluenceClient, request: &'a TransferRequest) -> Self {
        Self {
            client,
            request,
            comment: timestamp_comment(),
        }
    }

    /// Replace the upload comment.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        comment.clone_into(&mut self.comment);
        self
    }

    /// Execute the transfer.
    ///
    /// `scratch` must be an existing writable directory owned by the caller;
    /// intermediate files are written there and removed before returning.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] describing why the transfer failed. Pull
    /// failures never leave a file at the local destination.
    pub fn run(&self, scratch: &Path) -> Result<TransferReport, TransferError> {
        match self.request.action {
            Action::Pull => self.pull(scratch),
            Action::Push => self.push(scratch),
        }
    }

    fn pull(&self, scratch: &Path) -> Result<TransferReport, TransferError> {
        let endpoint = request::pull_endpoint(self.request);
        let staged = scratch.join(STAGED_DOWNLOAD);

        let status = {
            let mut file = File::create(&staged)?;
            let status = self.client.download(&endpoint, &mut file)?;
            file.flush()?;
            status
        };

        let bytes = fs::metadata(&staged)?.len();
        let outcome = classify_download(status, BufReader::new(File::open(&staged)?))?;
        if !outcome.succeeded {
            let mut head = Vec::new();
            File::open(&staged)?
                .take(ERROR_BODY_LIMIT)
                .read_to_end(&mut head)?;
            fs::remove_file(&staged)?;
            warn!(
                reason = %outcome.reason,
                "Discarded downloaded artifact for '{}'",
                self.request.remote_filename
            );
            return Err(self.failure(outcome.reason, status, &head));
        }

        let local = self.request.local_path();
        if let Some(parent) = local.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&staged, local)?;
        fs::remove_file(&staged)?;
        info!("Saved {bytes} bytes to {}", local.display());

        Ok(TransferReport {
            action: Action::Pull,
            local_path: local.to_path_buf(),
            url: endpoint.url,
            bytes,
        })
    }

    fn push(&self, scratch: &Path) -> Result<TransferReport, TransferError> {
        let local = self.request.local_path();
        if !local.is_file() {
            return Err(TransferError::LocalFileNotFound(local.to_path_buf()));
        }
        let bytes = fs::metadata(local)?.len();

        let existing = self
            .client
            .find_attachment(&self.request.page_id, &self.request.remote_filename)?;
        let endpoint = request::push_endpoint(self.request, existing.as_ref(), &self.comment);
        let (status, body) = self.client.upload(&endpoint)?;

        let captured = scratch.join(PUSH_RESPONSE);
        fs::write(&captured, &body)?;
        debug!(path = %captured.display(), status, "Captured push response");

        let outcome = classify_upsert(status, &body, &self.request.remote_filename);
        fs::remove_file(&captured)?;
        if !outcome.succeeded {
            return Err(self.failure(outcome.reason, status, body.as_bytes()));
        }

        Ok(TransferReport {
            action: Action::Push,
            local_path: local.to_path_buf(),
            url: endpoint.url,
            bytes,
        })
    }

    fn failure(&self, reason: OutcomeReason, status: u16, body: &[u8]) -> TransferError {
        match (reason, self.request.action) {
            (OutcomeReason::AuthFailed, _) => TransferError::AuthFailed {
                username: self.client.username().to_owned(),
            },
            (OutcomeReason::HttpStatus(status), _) => TransferError::HttpStatus {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            },
            (OutcomeReason::PageNotFound, Action::Pull) => TransferError::PageNotFound {
                page_id: self.request.page_id.clone(),
                filename: self.request.remote_filename.clone(),
            },
            (reason, Action::Push) => TransferError::UpsertNotConfirmed {
                filename: self.request.remote_filename.clone(),
                reason,
            },
            (reason, Action::Pull) => TransferError::HttpStatus {
                status,
                body: reason.to_string(),
            },
        }
    }
}

/// Build the requests a transfer would make, without network access.
///
/// Push plans list both candidate uploads because choosing between them
/// needs the existence lookup.
#[must_use]
pub fn plan(request: &TransferRequest, comment: &str) -> TransferPlan {
    match request.action {
        Action::Pull => TransferPlan {
            lookup_url: None,
            requests: vec![PlannedRequest {
                label: "download",
                endpoint: request::pull_endpoint(request),
            }],
        },
        Action::Push => {
            let placeholder = Attachment {
                id: "ATTACHMENT_ID".to_owned(),
                title: request.remote_filename.clone(),
            };
            TransferPlan {
                lookup_url: Some(request::lookup_url(
                    &request.base_url,
                    &request.page_id,
                    &request.remote_filename,
                )),
                requests: vec![
                    PlannedRequest {
                        label: "if no attachment exists",
                        endpoint: request::push_endpoint(request, None, comment),
                    },
                    PlannedRequest {
                        label: "if an attachment with this title exists",
                        endpoint: request::push_endpoint(request, Some(&placeholder), comment),
                    },
                ],
            }
        }
    }
}
