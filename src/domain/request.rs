//! Request-side domain models
//!
//! The three resolution inputs ([`RuleMapping`], [`BaseRequest`], [`Event`]) and the
//! merged [`CanonicalRequest`] every downstream step reads from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the value when it is present and not blank/whitespace-only
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Reference data keyed by product / transaction type
///
/// Loaded from a reference store for every resolution call and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMapping {
    /// Default transaction type code
    pub txn_type_code: Option<String>,

    /// Default transaction status code
    pub txn_status_code: Option<String>,

    /// CTX status code
    pub ctx_status_code: Option<String>,

    /// Product code override, wins over the request's when non-blank
    pub prod_code: Option<String>,

    /// Whether records of this product carry courier details
    pub courier_required: bool,

    /// Whether records of this product carry document attachments
    pub attachments_required: bool,
}

/// Inbound track-and-trace request
///
/// A present `ref_id` marks the request as pre-linked to an external transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRequest {
    pub branch_code: Option<String>,
    pub country_code: Option<String>,
    pub event_id: Option<String>,

    /// EB customer id
    pub customer_id: Option<String>,
    pub prod_code: Option<String>,

    /// Pre-resolved external reference id
    pub ref_id: Option<String>,

    /// Pre-resolved external transaction id
    pub txn_id: Option<String>,

    /// Merchant file reference
    pub mfr: Option<String>,

    /// Unique merchant file reference
    pub umfr: Option<String>,
    pub currency: Option<String>,

    /// Field identifiers requested by the caller; empty selects the default set
    pub common_fields: Vec<String>,
}

impl BaseRequest {
    /// Whether the request was already associated with an external transaction
    pub fn is_pre_linked(&self) -> bool {
        self.ref_id.is_some()
    }
}

/// Previously persisted domain event
///
/// When present during resolution it is authoritative for identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub event_id: Option<String>,
    pub ref_id: Option<String>,
    pub txn_id: Option<String>,

    /// Merchant file reference
    pub mfr: Option<String>,
    pub umfr: Option<String>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
    pub branch_code: Option<String>,
    pub country_code: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Courier details for a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Courier {
    pub courier_partner: Option<String>,
    pub waybill_number: Option<String>,
}

impl Courier {
    /// Creates a courier with both partner and way-bill set
    pub fn new(partner: impl Into<String>, waybill: impl Into<String>) -> Self {
        Self {
            courier_partner: Some(partner.into()),
            waybill_number: Some(waybill.into()),
        }
    }

    /// Whether this courier carries a usable way-bill number
    pub fn has_waybill(&self) -> bool {
        non_blank(&self.waybill_number).is_some()
    }
}

/// Capability flags computed once during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlags {
    pub courier_lookup_needed: bool,
    pub ref_id_lookup_needed: bool,
    pub attachment_needed: bool,
}

/// Candidate keys used to locate a persisted event, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKey {
    CxtTxnId,
    CxtRefId,
    Umfr,
    Mfr,
}

impl EventKey {
    /// All keys in the order they are tried
    pub const ORDERED: [EventKey; 4] = [
        EventKey::CxtTxnId,
        EventKey::CxtRefId,
        EventKey::Umfr,
        EventKey::Mfr,
    ];

    /// Name of the event column this key is matched against
    pub fn column(&self) -> &'static str {
        match self {
            EventKey::CxtTxnId => "txn_id",
            EventKey::CxtRefId => "ref_id",
            EventKey::Umfr => "umfr",
            EventKey::Mfr => "mfr",
        }
    }

    /// The request value this key searches with
    pub fn value_from<'a>(&self, request: &'a BaseRequest) -> Option<&'a str> {
        match self {
            EventKey::CxtTxnId => non_blank(&request.txn_id),
            EventKey::CxtRefId => non_blank(&request.ref_id),
            EventKey::Umfr => non_blank(&request.umfr),
            EventKey::Mfr => non_blank(&request.mfr),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKey::CxtTxnId => "CXT_TXN_ID",
            EventKey::CxtRefId => "CXT_REF_ID",
            EventKey::Umfr => "UMFR",
            EventKey::Mfr => "MFR",
        };
        f.write_str(name)
    }
}

/// The resolved, merged view of a request
///
/// Single source of truth for field selection and document generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub branch_code: Option<String>,
    pub country_code: Option<String>,
    pub event_id: Option<String>,
    pub ref_id: Option<String>,
    pub txn_id: Option<String>,

    /// Business-owner reference
    pub bo_ref_id: Option<String>,
    pub txn_type_code: Option<String>,
    pub txn_status_code: Option<String>,
    pub ctx_status_code: Option<String>,
    pub prod_code: Option<String>,
    pub mfr: Option<String>,
    pub umfr: Option<String>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,

    /// Branch-qualified customer reference, filled by enrichment
    pub customer_reference: Option<String>,

    /// Reference id resolved through the merchant file reference
    pub ref_id_mfr: Option<String>,

    /// Courier details, filled by enrichment
    pub courier: Option<Courier>,

    /// Locator key that found the authoritative event, if one was located
    pub found_by: Option<EventKey>,

    pub flags: FieldFlags,
}

impl CanonicalRequest {
    /// The courier, only when it carries a way-bill
    pub fn courier_waybill(&self) -> Option<&Courier> {
        self.courier.as_ref().filter(|c| c.has_waybill())
    }
}
