//! Document generation
//!
//! Every product has a [`DocumentStrategy`] that decides the document's root element
//! and product-specific details. Attachment/courier assignment and the file write are
//! shared default methods, so strategies only describe what differs between products.
//!
//! - [`registry`] - immutable product code → strategy table
//! - [`products`] - built-in strategies
//! - [`xml`] - record → XML rendering
//! - [`writer`] - atomic file writes

pub mod products;
pub mod registry;
pub mod writer;
pub mod xml;

pub use registry::StrategyRegistry;
pub use writer::GeneratedDocument;

use crate::domain::{
    Attachment, CanonicalRequest, EventId, Result, TntError, TxnRecord, MO_EVENT_ID,
};
use std::path::Path;

/// One product-specific detail line of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub name: &'static str,
    pub value: Option<String>,
}

impl ProductDetail {
    pub fn new(name: &'static str, value: Option<String>) -> Self {
        Self { name, value }
    }
}

/// File name of the document generated for `event_id`
pub fn document_file_name(product_code: &str, event_id: &EventId) -> String {
    format!("TNT_{product_code}_{event_id}.xml")
}

/// Event id a document is named after
///
/// # Errors
///
/// Returns `TntError::Validation` when the request has no usable event id.
pub fn document_event_id(request: &CanonicalRequest) -> Result<EventId> {
    let raw = request
        .event_id
        .as_deref()
        .ok_or_else(|| TntError::Validation("Event id is required to name the document".to_string()))?;
    EventId::new(raw).map_err(TntError::Validation)
}

/// Product-specific document generator
pub trait DocumentStrategy: Send + Sync {
    /// Product code this strategy handles
    fn product_code(&self) -> &str;

    /// Root element of the generated document
    fn document_root(&self) -> &'static str;

    /// Details written in the document's product section
    fn product_details(&self, record: &TxnRecord, request: &CanonicalRequest) -> Vec<ProductDetail>;

    /// Assigns attachments, courier details and the `mo_event_id` metadata entry
    ///
    /// The attachment list is always set, even when empty. Courier fields are only
    /// filled when the request carries a way-bill. Exactly one `mo_event_id` entry
    /// exists afterwards.
    fn set_attachment_and_courier(
        &self,
        record: &mut TxnRecord,
        request: &CanonicalRequest,
        attachments: Vec<Attachment>,
    ) {
        record.attachments = Some(attachments);

        if let Some(courier) = request.courier_waybill() {
            record.courier_partner = courier.courier_partner.clone();
            record.waybill_number = courier.waybill_number.clone();
        }

        record.set_additional_field(MO_EVENT_ID, request.event_id.clone());
    }

    /// Serializes the record and writes it under `output_dir`
    ///
    /// Either the complete document is in place when this returns `Ok`, or no
    /// document file was created.
    ///
    /// # Errors
    ///
    /// - `TntError::Validation` if the request has no usable event id
    /// - `TntError::Serialization` if the record cannot be encoded
    /// - `TntError::Io` if the directory is missing or the write fails
    fn generate(
        &self,
        record: &TxnRecord,
        request: &CanonicalRequest,
        output_dir: &Path,
    ) -> Result<GeneratedDocument> {
        let event_id = document_event_id(request)?;
        let body = xml::render(
            self.document_root(),
            self.product_code(),
            &event_id,
            record,
            &self.product_details(record, request),
        )?;

        let file_name = document_file_name(self.product_code(), &event_id);
        let document = writer::write_atomic(output_dir, &file_name, body.as_bytes())?;

        tracing::info!(
            product_code = self.product_code(),
            event_id = %event_id,
            path = %document.path.display(),
            bytes = document.bytes,
            "Document generated"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::products::ImportLetterOfCredit;
    use super::*;
    use crate::domain::Courier;

    fn request(courier: Option<Courier>) -> CanonicalRequest {
        CanonicalRequest {
            event_id: Some("EVT1".to_string()),
            prod_code: Some("IMLC".to_string()),
            courier,
            ..Default::default()
        }
    }

    fn mo_event_entries(record: &TxnRecord) -> usize {
        record
            .additional_fields
            .iter()
            .filter(|f| f.name == MO_EVENT_ID)
            .count()
    }

    #[test]
    fn test_courier_set_when_waybill_present() {
        let strategy = ImportLetterOfCredit;
        let mut record = TxnRecord::new();
        strategy.set_attachment_and_courier(
            &mut record,
            &request(Some(Courier::new("DHL", "WB1"))),
            vec![],
        );

        assert_eq!(record.courier_partner.as_deref(), Some("DHL"));
        assert_eq!(record.waybill_number.as_deref(), Some("WB1"));
        assert_eq!(mo_event_entries(&record), 1);
        assert_eq!(
            record.additional_field(MO_EVENT_ID).unwrap().value.as_deref(),
            Some("EVT1")
        );
        assert_eq!(record.attachments, Some(vec![]));
    }

    #[test]
    fn test_courier_unset_without_waybill() {
        let strategy = ImportLetterOfCredit;
        let no_waybill = Courier {
            courier_partner: Some("DHL".to_string()),
            waybill_number: None,
        };

        for courier in [None, Some(no_waybill)] {
            let mut record = TxnRecord::new();
            strategy.set_attachment_and_courier(&mut record, &request(courier), vec![]);
            assert!(record.courier_partner.is_none());
            assert!(record.waybill_number.is_none());
            assert_eq!(mo_event_entries(&record), 1);
        }
    }

    #[test]
    fn test_repeated_calls_keep_single_mo_event_id() {
        let strategy = ImportLetterOfCredit;
        let mut record = TxnRecord::new();
        let req = request(None);
        strategy.set_attachment_and_courier(&mut record, &req, vec![]);
        strategy.set_attachment_and_courier(&mut record, &req, vec![]);
        assert_eq!(mo_event_entries(&record), 1);
    }

    #[test]
    fn test_document_event_id_validation() {
        let mut req = request(None);
        assert_eq!(document_event_id(&req).unwrap().as_str(), "EVT1");

        req.event_id = None;
        assert!(matches!(document_event_id(&req), Err(TntError::Validation(_))));

        req.event_id = Some("../x".to_string());
        assert!(matches!(document_event_id(&req), Err(TntError::Validation(_))));
    }

    #[test]
    fn test_document_file_name_embeds_event_id() {
        let id = EventId::new("EVT42").unwrap();
        assert_eq!(document_file_name("EXCO", &id), "TNT_EXCO_EVT42.xml");
    }
}
