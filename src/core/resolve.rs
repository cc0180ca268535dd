//! Request resolution
//!
//! Merges a [`RuleMapping`], a [`BaseRequest`] and an optional [`Event`] into one
//! [`CanonicalRequest`]. Resolution is a best-effort merge: missing optional values
//! degrade to `None` and nothing here returns an error.

use crate::domain::request::non_blank;
use crate::domain::{BaseRequest, CanonicalRequest, Event, FieldFlags, RuleMapping};

/// Business-owner reference rule
///
/// The event id is used only for requests already linked to an external
/// transaction, and a blank event id never produces a reference.
pub fn business_owner_reference(ref_id: Option<&str>, event_id: Option<&str>) -> Option<String> {
    if ref_id.is_none() {
        return None;
    }
    event_id
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

/// Resolves the canonical request
///
/// Returns `None` when either mandatory input (`mapping`, `request`) is missing.
///
/// # Examples
///
/// ```
/// use tntrace::core::resolve::resolve;
/// use tntrace::domain::{BaseRequest, RuleMapping};
///
/// let mapping = RuleMapping {
///     txn_type_code: Some("TT".to_string()),
///     ..Default::default()
/// };
/// let request = BaseRequest {
///     branch_code: Some("BR".to_string()),
///     event_id: Some("EVT1".to_string()),
///     ref_id: Some("REF1".to_string()),
///     prod_code: Some("PROD".to_string()),
///     ..Default::default()
/// };
///
/// let canonical = resolve(Some(&mapping), Some(&request), None).unwrap();
/// assert_eq!(canonical.bo_ref_id.as_deref(), Some("EVT1"));
/// assert_eq!(canonical.txn_type_code, None);
/// assert_eq!(canonical.prod_code.as_deref(), Some("PROD"));
///
/// assert!(resolve(None, Some(&request), None).is_none());
/// ```
pub fn resolve(
    mapping: Option<&RuleMapping>,
    request: Option<&BaseRequest>,
    event: Option<&Event>,
) -> Option<CanonicalRequest> {
    let (mapping, request) = match (mapping, request) {
        (Some(m), Some(r)) => (m, r),
        _ => {
            tracing::debug!(
                mapping_present = mapping.is_some(),
                request_present = request.is_some(),
                "Mandatory resolution input missing"
            );
            return None;
        }
    };

    let prod_code = non_blank(&mapping.prod_code)
        .map(str::to_string)
        .or_else(|| request.prod_code.clone());

    let mut canonical = CanonicalRequest {
        branch_code: request.branch_code.clone(),
        country_code: request.country_code.clone(),
        event_id: request.event_id.clone(),
        ref_id: request.ref_id.clone(),
        txn_id: request.txn_id.clone(),
        bo_ref_id: business_owner_reference(
            request.ref_id.as_deref(),
            request.event_id.as_deref(),
        ),
        ctx_status_code: mapping.ctx_status_code.clone(),
        prod_code,
        mfr: request.mfr.clone(),
        umfr: request.umfr.clone(),
        currency: request.currency.clone(),
        customer_id: request.customer_id.clone(),
        ..Default::default()
    };

    if !request.is_pre_linked() {
        canonical.txn_type_code = mapping.txn_type_code.clone();
        canonical.txn_status_code = mapping.txn_status_code.clone();
    }

    if let Some(event) = event {
        apply_event(&mut canonical, event);
    }

    canonical.flags = compute_flags(mapping, &canonical);

    tracing::debug!(
        event_id = canonical.event_id.as_deref().unwrap_or(""),
        prod_code = canonical.prod_code.as_deref().unwrap_or(""),
        event_sourced = event.is_some(),
        "Resolved canonical request"
    );

    Some(canonical)
}

/// Overrides identity fields with the event's values
fn apply_event(canonical: &mut CanonicalRequest, event: &Event) {
    canonical.event_id = event.event_id.clone();
    canonical.ref_id = event.ref_id.clone();
    canonical.txn_id = event.txn_id.clone();
    canonical.mfr = event.mfr.clone();
    canonical.umfr = event.umfr.clone();
    canonical.currency = event.currency.clone();
    canonical.customer_id = event.customer_id.clone();
    canonical.bo_ref_id =
        business_owner_reference(event.ref_id.as_deref(), event.event_id.as_deref());

    // status is event-owned
    canonical.txn_type_code = None;
    canonical.txn_status_code = None;
}

fn compute_flags(mapping: &RuleMapping, canonical: &CanonicalRequest) -> FieldFlags {
    FieldFlags {
        courier_lookup_needed: mapping.courier_required
            && non_blank(&canonical.event_id).is_some(),
        ref_id_lookup_needed: canonical.ref_id.is_none() && non_blank(&canonical.mfr).is_some(),
        attachment_needed: mapping.attachments_required,
    }
}
