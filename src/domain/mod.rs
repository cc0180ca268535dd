//! Domain models and types for tntrace.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Resolution inputs** ([`RuleMapping`], [`BaseRequest`], [`Event`])
//! - **The merged view** ([`CanonicalRequest`]) with its [`FieldFlags`]
//! - **The output record** ([`TxnRecord`]) and its [`Attachment`]s
//! - **Field identifiers** ([`TxnField`], [`FieldSet`])
//! - **Strongly-typed identifiers** ([`ProductCode`], [`EventId`])
//! - **Error types** ([`TntError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TntError>`]:
//!
//! ```rust
//! use tntrace::domain::{FieldSet, Result};
//!
//! fn example() -> Result<()> {
//!     let fields = FieldSet::parse(&["BRANCH_CODE", "TXN_ID"])?;
//!     assert_eq!(fields.as_slice().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod errors;
pub mod field;
pub mod ids;
pub mod record;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{Attachment, DocumentCriteria, DocumentMeta};
pub use errors::TntError;
pub use field::{FieldSet, TxnField};
pub use ids::{EventId, ProductCode};
pub use record::{AdditionalField, TxnRecord, MO_EVENT_ID};
pub use request::{
    BaseRequest, CanonicalRequest, Courier, Event, EventKey, FieldFlags, RuleMapping,
};
pub use result::Result;
