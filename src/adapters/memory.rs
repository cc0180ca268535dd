//! In-memory collaborator services
//!
//! Backs the offline CLI mode and the test suite. Fixtures are plain data and can
//! be deserialized from the `fixtures` section of an input bundle.

use super::traits::{
    CourierLookup, DocumentMetadataSource, EventQuery, EventStore, RecordSink, RefIdLookup,
};
use crate::domain::{
    CanonicalRequest, Courier, DocumentCriteria, DocumentMeta, Event, EventKey, Result, TntError,
    TxnRecord,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Courier registered for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierFixture {
    pub branch_code: String,
    pub country_code: String,
    pub event_id: String,
    pub courier: Courier,
}

/// Reference id known for one merchant file reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefIdFixture {
    pub branch_code: String,
    pub country_code: String,
    pub mfr: String,
    pub ref_id: String,
}

/// Documents stored for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFixture {
    pub event_id: String,
    pub documents: Vec<DocumentMeta>,
}

/// Serializable fixture set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceFixtures {
    pub couriers: Vec<CourierFixture>,
    pub ref_ids: Vec<RefIdFixture>,
    pub documents: Vec<DocumentFixture>,
    pub events: Vec<Event>,
}

type Key = (String, String, String);

fn key(a: &str, b: &str, c: &str) -> Key {
    (a.to_string(), b.to_string(), c.to_string())
}

/// Collaborator services answering from memory
#[derive(Debug, Default)]
pub struct InMemoryServices {
    couriers: HashMap<Key, Courier>,
    ref_ids: HashMap<Key, String>,
    documents: HashMap<String, Vec<DocumentMeta>>,
    events: Vec<Event>,
    published: Mutex<Vec<(CanonicalRequest, TxnRecord)>>,
}

impl InMemoryServices {
    /// Creates an empty service set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service set from deserialized fixtures
    pub fn from_fixtures(fixtures: ServiceFixtures) -> Self {
        let mut services = Self::new();
        for c in fixtures.couriers {
            services = services.with_courier(&c.branch_code, &c.country_code, &c.event_id, c.courier);
        }
        for r in fixtures.ref_ids {
            services = services.with_ref_id(&r.branch_code, &r.country_code, &r.mfr, &r.ref_id);
        }
        for d in fixtures.documents {
            services = services.with_documents(&d.event_id, d.documents);
        }
        for e in fixtures.events {
            services = services.with_event(e);
        }
        services
    }

    pub fn with_courier(mut self, branch: &str, country: &str, event_id: &str, courier: Courier) -> Self {
        self.couriers.insert(key(branch, country, event_id), courier);
        self
    }

    pub fn with_ref_id(mut self, branch: &str, country: &str, mfr: &str, ref_id: &str) -> Self {
        self.ref_ids.insert(key(branch, country, mfr), ref_id.to_string());
        self
    }

    pub fn with_documents(mut self, event_id: &str, documents: Vec<DocumentMeta>) -> Self {
        self.documents
            .entry(event_id.to_string())
            .or_default()
            .extend(documents);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Records handed to the sink so far
    pub fn published(&self) -> Vec<(CanonicalRequest, TxnRecord)> {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

fn event_value(event: &Event, key: EventKey) -> Option<&str> {
    match key {
        EventKey::CxtTxnId => event.txn_id.as_deref(),
        EventKey::CxtRefId => event.ref_id.as_deref(),
        EventKey::Umfr => event.umfr.as_deref(),
        EventKey::Mfr => event.mfr.as_deref(),
    }
}

fn scope_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        Some(w) => actual.as_deref() == Some(w.as_str()),
        None => true,
    }
}

#[async_trait]
impl CourierLookup for InMemoryServices {
    async fn courier_details(
        &self,
        branch_code: &str,
        country_code: &str,
        event_id: &str,
    ) -> Result<Option<Courier>> {
        Ok(self
            .couriers
            .get(&key(branch_code, country_code, event_id))
            .cloned())
    }
}

#[async_trait]
impl RefIdLookup for InMemoryServices {
    async fn ref_id_by_mfr(
        &self,
        branch_code: &str,
        country_code: &str,
        mfr: &str,
    ) -> Result<Option<String>> {
        Ok(self.ref_ids.get(&key(branch_code, country_code, mfr)).cloned())
    }
}

#[async_trait]
impl DocumentMetadataSource for InMemoryServices {
    async fn documents(&self, criteria: &DocumentCriteria) -> Result<Vec<DocumentMeta>> {
        Ok(criteria
            .event_id
            .as_ref()
            .and_then(|id| self.documents.get(id))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl EventStore for InMemoryServices {
    async fn find_latest(&self, query: &EventQuery) -> Result<Option<Event>> {
        Ok(self
            .events
            .iter()
            .filter(|e| scope_matches(&query.branch_code, &e.branch_code))
            .filter(|e| scope_matches(&query.country_code, &e.country_code))
            .filter(|e| event_value(e, query.key) == Some(query.value.as_str()))
            .filter(|e| {
                e.status
                    .as_ref()
                    .map(|s| !query.excluded_statuses.contains(s))
                    .unwrap_or(true)
            })
            .max_by_key(|e| e.created_at)
            .cloned())
    }
}

#[async_trait]
impl RecordSink for InMemoryServices {
    async fn publish(&self, request: &CanonicalRequest, record: &TxnRecord) -> Result<()> {
        self.published
            .lock()
            .map_err(|e| TntError::Other(format!("Record sink lock poisoned: {e}")))?
            .push((request.clone(), record.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, mfr: &str, status: &str, day: u32) -> Event {
        Event {
            event_id: Some(id.to_string()),
            mfr: Some(mfr.to_string()),
            branch_code: Some("BR".to_string()),
            country_code: Some("IN".to_string()),
            status: Some(status.to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn query(excluded: &[&str]) -> EventQuery {
        EventQuery {
            branch_code: Some("BR".to_string()),
            country_code: Some("IN".to_string()),
            key: EventKey::Mfr,
            column: EventKey::Mfr.column().to_string(),
            value: "MFR1".to_string(),
            excluded_statuses: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_find_latest_prefers_newest() {
        let services = InMemoryServices::new()
            .with_event(event("E1", "MFR1", "OPEN", 1))
            .with_event(event("E2", "MFR1", "OPEN", 3))
            .with_event(event("E3", "MFR2", "OPEN", 5));

        let found = services.find_latest(&query(&[])).await.unwrap().unwrap();
        assert_eq!(found.event_id.as_deref(), Some("E2"));
    }

    #[tokio::test]
    async fn test_find_latest_skips_excluded_statuses() {
        let services = InMemoryServices::new()
            .with_event(event("E1", "MFR1", "OPEN", 1))
            .with_event(event("E2", "MFR1", "CANCELLED", 3));

        let found = services
            .find_latest(&query(&["CANCELLED"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.event_id.as_deref(), Some("E1"));
    }

    #[tokio::test]
    async fn test_fixtures_round_trip_into_services() {
        let fixtures: ServiceFixtures = serde_json::from_value(serde_json::json!({
            "couriers": [{
                "branch_code": "BR", "country_code": "IN", "event_id": "EVT1",
                "courier": {"courier_partner": "DHL", "waybill_number": "WB1"}
            }],
            "documents": [{
                "event_id": "EVT1",
                "documents": [{"title": "a.pdf", "eligible": true}]
            }]
        }))
        .unwrap();
        let services = InMemoryServices::from_fixtures(fixtures);

        let courier = services.courier_details("BR", "IN", "EVT1").await.unwrap();
        assert_eq!(courier, Some(Courier::new("DHL", "WB1")));

        let criteria = DocumentCriteria {
            event_id: Some("EVT1".to_string()),
            ..Default::default()
        };
        assert_eq!(services.documents(&criteria).await.unwrap().len(), 1);
        assert!(services.ref_id_by_mfr("BR", "IN", "X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_publish_records() {
        let services = InMemoryServices::new();
        services
            .publish(&CanonicalRequest::default(), &TxnRecord::new())
            .await
            .unwrap();
        assert_eq!(services.published().len(), 1);
    }
}
