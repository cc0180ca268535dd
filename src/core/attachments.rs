//! Attachment classification
//!
//! Turns document metadata into attachment entries with human-readable titles.

use crate::domain::{Attachment, DocumentMeta};

const SWIFT_SOURCE: &str = "SWIFT";

/// Title for one document
///
/// SWIFT messages are titled by category, everything else by its file title with
/// the extension dropped.
pub fn attachment_title(document: &DocumentMeta) -> String {
    if document.document_source.as_deref() == Some(SWIFT_SOURCE) {
        format!(
            "SWIFT : {}",
            document.document_category.as_deref().unwrap_or_default()
        )
    } else {
        format!("DOCUMENT_VALUE : {}", strip_extension(&document.title))
    }
}

/// Drops the part after the last `.`; titles without one come back unchanged
fn strip_extension(title: &str) -> &str {
    match title.rfind('.') {
        Some(idx) if idx > 0 => &title[..idx],
        _ => title,
    }
}

/// Classifies documents into attachments
///
/// Returns `None` for an empty input ("nothing was considered") and `Some` of the
/// eligible subset otherwise, which may itself be empty ("all filtered out").
///
/// # Examples
///
/// ```
/// use tntrace::core::attachments::classify;
/// use tntrace::domain::DocumentMeta;
///
/// assert!(classify(&[]).is_none());
///
/// let doc = DocumentMeta {
///     title: "invoice.xml".to_string(),
///     document_source: Some("EMAIL".to_string()),
///     eligible: true,
///     ..Default::default()
/// };
/// let attachments = classify(&[doc]).unwrap();
/// assert_eq!(attachments[0].title, "DOCUMENT_VALUE : invoice");
/// assert_eq!(attachments[0].file_name, "invoice.xml");
/// ```
pub fn classify(documents: &[DocumentMeta]) -> Option<Vec<Attachment>> {
    if documents.is_empty() {
        return None;
    }

    let attachments: Vec<Attachment> = documents
        .iter()
        .filter(|d| d.eligible)
        .map(|d| Attachment {
            title: attachment_title(d),
            file_name: d.title.clone(),
            source_category: d.document_category.clone(),
        })
        .collect();

    tracing::debug!(
        considered = documents.len(),
        eligible = attachments.len(),
        "Classified attachments"
    );

    Some(attachments)
}
