//! Attachment transfer execution.
//!
//! This module provides the [`Transfer`] struct that runs one pull or push
//! end to end:
//!
//! 1. (push) Verify the local file exists
//! 2. (push) Look up an existing attachment with the same title
//! 3. Build the request
//! 4. Send it, capturing the response inside a scratch directory
//! 5. Classify the response and report success or a [`TransferError`]
//!
//! [`plan`] builds the same requests without touching the network.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//! use attsync_config::ConfluenceConfig;
//! use attsync_confluence::{
//!     Action, ConfluenceClient, CredentialProvider, ExplicitParams, StaticCredentials,
//!     Transfer, resolve,
//! };
//!
//! let params = ExplicitParams {
//!     action: Some(Action::Pull),
//!     filename: Some("report.pdf.v3".to_owned()),
//!     page_id: Some("1001".to_owned()),
//!     username: Some("alice".to_owned()),
//!     ..Default::default()
//! };
//! let request = resolve(&params, &ConfluenceConfig::default())?;
//! let credentials = StaticCredentials::new("alice", "secret").credentials()?;
//! let client = ConfluenceClient::new(&request.base_url, credentials, Duration::from_secs(30));
//!
//! let scratch = tempfile::tempdir()?;
//! let report = Transfer::new(&client, &request).run(scratch.path())?;
//! println!("{} bytes", report.bytes);
//! # Ok(())
//! # }
//! ```
//!
//! [`TransferError`]: crate::TransferError

mod executor;
mod result;

pub use executor::{Transfer, plan};
pub use result::{PlannedRequest, TransferPlan, TransferReport};
