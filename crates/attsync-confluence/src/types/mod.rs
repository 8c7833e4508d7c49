//! Confluence REST API types.

mod attachment;

pub use attachment::{Attachment, AttachmentsResponse};
