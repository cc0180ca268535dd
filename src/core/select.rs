//! Field selection
//!
//! Projects a [`FieldSet`] onto a [`TxnRecord`]. Every [`TxnField`] maps to an
//! independent [`FieldRule`]; most rules are pure functions of the canonical
//! request, the release timestamp is generated from an injected [`Clock`].

use crate::core::resolve::business_owner_reference;
use crate::domain::{CanonicalRequest, FieldSet, TxnField, TxnRecord};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::sync::Arc;

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

type TextRule = fn(&CanonicalRequest) -> Option<String>;

/// How a field's value is obtained
#[derive(Clone, Copy)]
pub enum FieldRule {
    /// Derived from the canonical request
    Text(TextRule),
    /// Generated at application time, never read from input
    Generated,
}

/// Derivation rule for a field
pub fn rule(field: TxnField) -> FieldRule {
    match field {
        TxnField::BranchCode => FieldRule::Text(branch_code),
        TxnField::BoRefId => FieldRule::Text(bo_ref_id),
        TxnField::TxnId => FieldRule::Text(txn_id),
        TxnField::TxnTypeCode => FieldRule::Text(txn_type_code),
        TxnField::TxnStatusCode => FieldRule::Text(txn_status_code),
        TxnField::CtxStatusCode => FieldRule::Text(ctx_status_code),
        TxnField::ProdCode => FieldRule::Text(prod_code),
        TxnField::Currency => FieldRule::Text(currency),
        TxnField::CustomerRef => FieldRule::Text(customer_reference),
        TxnField::ReleaseDttm => FieldRule::Generated,
    }
}

fn branch_code(source: &CanonicalRequest) -> Option<String> {
    source.branch_code.clone()
}

fn bo_ref_id(source: &CanonicalRequest) -> Option<String> {
    business_owner_reference(source.ref_id.as_deref(), source.event_id.as_deref())
}

fn txn_id(source: &CanonicalRequest) -> Option<String> {
    source.txn_id.clone()
}

// Pre-linked transactions keep the status they already carry elsewhere.
fn txn_type_code(source: &CanonicalRequest) -> Option<String> {
    match source.ref_id {
        None => source.txn_type_code.clone(),
        Some(_) => None,
    }
}

fn txn_status_code(source: &CanonicalRequest) -> Option<String> {
    match source.ref_id {
        None => source.txn_status_code.clone(),
        Some(_) => None,
    }
}

fn ctx_status_code(source: &CanonicalRequest) -> Option<String> {
    source.ctx_status_code.clone()
}

fn prod_code(source: &CanonicalRequest) -> Option<String> {
    source.prod_code.clone()
}

fn currency(source: &CanonicalRequest) -> Option<String> {
    source.currency.clone()
}

fn customer_reference(source: &CanonicalRequest) -> Option<String> {
    source.customer_reference.clone()
}

fn assign_text(target: &mut TxnRecord, field: TxnField, value: Option<String>) {
    let slot = match field {
        TxnField::BranchCode => &mut target.branch_code,
        TxnField::BoRefId => &mut target.bo_ref_id,
        TxnField::TxnId => &mut target.txn_id,
        TxnField::TxnTypeCode => &mut target.txn_type_code,
        TxnField::TxnStatusCode => &mut target.txn_status_code,
        TxnField::CtxStatusCode => &mut target.ctx_status_code,
        TxnField::ProdCode => &mut target.prod_code,
        TxnField::Currency => &mut target.currency,
        TxnField::CustomerRef => &mut target.customer_reference,
        TxnField::ReleaseDttm => return,
    };
    *slot = value;
}

/// Applies field rules onto records
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use tntrace::core::select::{FieldSelector, FixedClock};
/// use tntrace::domain::{CanonicalRequest, FieldSet, TxnRecord};
///
/// let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
/// let selector = FieldSelector::new(Arc::new(clock), FixedOffset::east_opt(0).unwrap());
///
/// let source = CanonicalRequest {
///     branch_code: Some("BR".to_string()),
///     txn_id: Some("TXN1".to_string()),
///     ..Default::default()
/// };
/// let mut record = TxnRecord::new();
/// selector.apply_fields(&mut record, &source, &FieldSet::default());
///
/// assert_eq!(record.branch_code.as_deref(), Some("BR"));
/// assert_eq!(record.txn_id.as_deref(), Some("TXN1"));
/// assert!(record.release_dttm.is_some());
/// ```
#[derive(Clone)]
pub struct FieldSelector {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl FieldSelector {
    /// Creates a selector generating timestamps from `clock` in `offset`
    pub fn new(clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    /// Selector on the system clock, UTC
    pub fn utc() -> Self {
        Self::new(Arc::new(SystemClock), Utc.fix())
    }

    /// Current time in the reference offset
    pub fn release_timestamp(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.offset)
    }

    /// Applies `fields` (or the default set when empty) from `source` onto `target`
    pub fn apply_fields(&self, target: &mut TxnRecord, source: &CanonicalRequest, fields: &FieldSet) {
        for &field in fields.effective() {
            match rule(field) {
                FieldRule::Text(derive) => assign_text(target, field, derive(source)),
                FieldRule::Generated => target.release_dttm = Some(self.release_timestamp()),
            }
        }

        tracing::trace!(
            fields = ?fields.effective(),
            defaulted = fields.is_empty(),
            "Applied record fields"
        );
    }
}
