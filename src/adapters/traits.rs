//! Collaborator service traits
//!
//! The core reaches every external system (courier registry, reference-id lookup,
//! document store, event repository, downstream persistence) through these traits.
//! Implementations live in [`super::http`] (REST) and [`super::memory`] (fixtures).

use crate::domain::{
    CanonicalRequest, Courier, DocumentCriteria, DocumentMeta, Event, EventKey, Result, TxnRecord,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Courier details lookup
#[async_trait]
pub trait CourierLookup: Send + Sync {
    /// Courier registered for an event, if any
    ///
    /// # Errors
    ///
    /// Returns `TntError::Lookup` if the service cannot be reached.
    async fn courier_details(
        &self,
        branch_code: &str,
        country_code: &str,
        event_id: &str,
    ) -> Result<Option<Courier>>;
}

/// Reference-id lookup through the merchant file reference
#[async_trait]
pub trait RefIdLookup: Send + Sync {
    async fn ref_id_by_mfr(
        &self,
        branch_code: &str,
        country_code: &str,
        mfr: &str,
    ) -> Result<Option<String>>;
}

/// Document metadata store
#[async_trait]
pub trait DocumentMetadataSource: Send + Sync {
    async fn documents(&self, criteria: &DocumentCriteria) -> Result<Vec<DocumentMeta>>;
}

/// Query for the most recently created event matching one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub branch_code: Option<String>,
    pub country_code: Option<String>,
    pub key: EventKey,

    /// Event column the value is matched against
    pub column: String,
    pub value: String,

    /// Events in these statuses are ignored
    pub excluded_statuses: Vec<String>,
}

/// Persisted event repository
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Latest event (by creation time) matching the query
    async fn find_latest(&self, query: &EventQuery) -> Result<Option<Event>>;
}

/// Consumer of finished records (persistence / notification)
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn publish(&self, request: &CanonicalRequest, record: &TxnRecord) -> Result<()>;
}

/// Sink that only logs what it receives
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

#[async_trait]
impl RecordSink for LoggingSink {
    async fn publish(&self, request: &CanonicalRequest, record: &TxnRecord) -> Result<()> {
        tracing::info!(
            event_id = request.event_id.as_deref().unwrap_or(""),
            txn_id = record.txn_id.as_deref().unwrap_or(""),
            attachments = record.attachments.as_ref().map(Vec::len).unwrap_or(0),
            "Track-and-trace record published"
        );
        Ok(())
    }
}
