//! Document metadata and attachment models

use serde::{Deserialize, Serialize};

/// Metadata of a stored document as returned by the document service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    /// Stored title, usually the original file name
    pub title: String,
    pub document_source: Option<String>,
    pub document_category: Option<String>,

    /// Whether the document may be forwarded with the track-and-trace record
    pub eligible: bool,
}

/// Attachment entry written onto a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub title: String,
    pub file_name: String,
    pub source_category: Option<String>,
}

/// Criteria sent to the document service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCriteria {
    pub branch_code: Option<String>,
    pub country_code: Option<String>,
    pub event_id: Option<String>,
    pub prod_code: Option<String>,
}
