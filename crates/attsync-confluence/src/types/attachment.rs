//! Confluence attachment types.

use serde::Deserialize;

/// Confluence attachment.
///
/// Only includes fields that are actually used.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment title/filename.
    pub title: String,
}

/// Attachments API response.
///
/// Only includes `results` since we only need the attachment list.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentsResponse {
    /// List of attachments.
    #[serde(default)]
    pub results: Vec<Attachment>,
}

impl AttachmentsResponse {
    /// First attachment whose title equals `title` exactly.
    #[must_use]
    pub fn find_by_title(self, title: &str) -> Option<Attachment> {
        self.results.into_iter().find(|a| a.title == title)
    }
}
