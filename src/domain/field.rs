//! Field identifiers and field sets
//!
//! [`TxnField`] is the closed enumeration of record fields a caller may request.
//! [`FieldSet`] is the validated, ordered selection handed to the field selector.

use super::errors::TntError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a projectable record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxnField {
    BranchCode,
    BoRefId,
    TxnId,
    TxnTypeCode,
    TxnStatusCode,
    CtxStatusCode,
    ProdCode,
    Currency,
    CustomerRef,
    ReleaseDttm,
}

impl TxnField {
    /// Every field identifier, in declaration order
    pub const ALL: [TxnField; 10] = [
        TxnField::BranchCode,
        TxnField::BoRefId,
        TxnField::TxnId,
        TxnField::TxnTypeCode,
        TxnField::TxnStatusCode,
        TxnField::CtxStatusCode,
        TxnField::ProdCode,
        TxnField::Currency,
        TxnField::CustomerRef,
        TxnField::ReleaseDttm,
    ];

    /// Baseline applied when the caller requests no fields
    pub const DEFAULTS: [TxnField; 3] =
        [TxnField::BranchCode, TxnField::TxnId, TxnField::ReleaseDttm];

    /// Wire identifier of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnField::BranchCode => "BRANCH_CODE",
            TxnField::BoRefId => "BO_REF_ID",
            TxnField::TxnId => "TXN_ID",
            TxnField::TxnTypeCode => "TXN_TYPE_CODE",
            TxnField::TxnStatusCode => "TXN_STATUS_CODE",
            TxnField::CtxStatusCode => "CTX_STATUS_CODE",
            TxnField::ProdCode => "PROD_CODE",
            TxnField::Currency => "CURRENCY",
            TxnField::CustomerRef => "CUSTOMER_REF",
            TxnField::ReleaseDttm => "RELEASE_DTTM",
        }
    }
}

impl fmt::Display for TxnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnField {
    type Err = TntError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        TxnField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| TntError::Validation(format!("Unknown field identifier: '{s}'")))
    }
}

/// Ordered, duplicate-free set of requested fields
///
/// An empty set means "apply the default set".
///
/// # Examples
///
/// ```
/// use tntrace::domain::field::{FieldSet, TxnField};
///
/// let fields = FieldSet::parse(&["TXN_ID", "prod_code", "TXN_ID"]).unwrap();
/// assert_eq!(fields.as_slice(), &[TxnField::TxnId, TxnField::ProdCode]);
///
/// assert!(FieldSet::parse(&["NOT_A_FIELD"]).is_err());
/// assert_eq!(FieldSet::default().effective(), &TxnField::DEFAULTS);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<TxnField>,
}

impl FieldSet {
    /// Validates caller-supplied identifiers
    ///
    /// # Errors
    ///
    /// Returns `TntError::Validation` naming every unknown identifier.
    pub fn parse<S: AsRef<str>>(identifiers: &[S]) -> Result<Self> {
        let mut fields = Vec::with_capacity(identifiers.len());
        let mut unknown = Vec::new();

        for identifier in identifiers {
            match identifier.as_ref().parse::<TxnField>() {
                Ok(field) => {
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                Err(_) => unknown.push(identifier.as_ref().to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(TntError::Validation(format!(
                "Unknown field identifiers: {}",
                unknown.join(", ")
            )));
        }

        Ok(Self { fields })
    }

    /// The explicit default set
    pub fn default_set() -> Self {
        Self {
            fields: TxnField::DEFAULTS.to_vec(),
        }
    }

    /// Whether the caller requested no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Requested fields as given
    pub fn as_slice(&self) -> &[TxnField] {
        &self.fields
    }

    /// Fields to apply: the requested ones, or the defaults when none were requested
    pub fn effective(&self) -> &[TxnField] {
        if self.fields.is_empty() {
            &TxnField::DEFAULTS
        } else {
            &self.fields
        }
    }
}

impl From<Vec<TxnField>> for FieldSet {
    fn from(values: Vec<TxnField>) -> Self {
        let mut fields = Vec::with_capacity(values.len());
        for field in values {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Self { fields }
    }
}
