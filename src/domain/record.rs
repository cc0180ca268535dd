//! Output transaction record
//!
//! A [`TxnRecord`] is populated field-by-field by one pipeline invocation and is
//! never shared between invocations.

use super::document::Attachment;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Name of the metadata entry carrying the originating event id
pub const MO_EVENT_ID: &str = "mo_event_id";

/// Free-form name/value metadata on a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalField {
    pub name: String,
    pub value: Option<String>,
}

impl AdditionalField {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Target transaction record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnRecord {
    pub branch_code: Option<String>,
    pub bo_ref_id: Option<String>,
    pub txn_id: Option<String>,
    pub txn_type_code: Option<String>,
    pub txn_status_code: Option<String>,
    pub ctx_status_code: Option<String>,
    pub prod_code: Option<String>,
    pub currency: Option<String>,
    pub customer_reference: Option<String>,

    /// Generated at application time in the configured reference offset
    pub release_dttm: Option<DateTime<FixedOffset>>,

    /// `None` until attachments have been assigned; assigned lists may be empty
    pub attachments: Option<Vec<Attachment>>,
    pub courier_partner: Option<String>,
    pub waybill_number: Option<String>,
    pub additional_fields: Vec<AdditionalField>,
}

impl TxnRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a metadata entry, replacing any existing entry with the same name
    pub fn set_additional_field(&mut self, name: &str, value: Option<String>) {
        self.additional_fields.retain(|f| f.name != name);
        self.additional_fields.push(AdditionalField::new(name, value));
    }

    /// Looks up a metadata entry by name
    pub fn additional_field(&self, name: &str) -> Option<&AdditionalField> {
        self.additional_fields.iter().find(|f| f.name == name)
    }
}
