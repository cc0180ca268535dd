//! Event location
//!
//! When the caller supplies no event, the persisted event is looked up by trying the
//! request's identifying keys in a fixed order until one matches.

use crate::adapters::traits::{EventQuery, EventStore};
use crate::domain::{BaseRequest, Event, EventKey, Result};

/// Finds the latest event matching the request
///
/// Keys are tried in [`EventKey::ORDERED`] order; blank keys are skipped. Every
/// query is scoped to the request's branch and country and ignores events in
/// `excluded_statuses`. Returns the first hit with the key that produced it.
///
/// # Errors
///
/// Propagates store failures; a key that matches nothing is not an error.
pub async fn locate_event(
    store: &dyn EventStore,
    request: &BaseRequest,
    excluded_statuses: &[String],
) -> Result<Option<(Event, EventKey)>> {
    for key in EventKey::ORDERED {
        let Some(value) = key.value_from(request) else {
            continue;
        };

        let query = EventQuery {
            branch_code: request.branch_code.clone(),
            country_code: request.country_code.clone(),
            key,
            column: key.column().to_string(),
            value: value.to_string(),
            excluded_statuses: excluded_statuses.to_vec(),
        };

        if let Some(event) = store.find_latest(&query).await? {
            tracing::debug!(key = %key, value = %value, "Event located");
            return Ok(Some((event, key)));
        }
    }

    tracing::debug!("No event matched any candidate key");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryServices;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, day: u32) -> Event {
        Event {
            event_id: Some(id.to_string()),
            branch_code: Some("BR".to_string()),
            country_code: Some("IN".to_string()),
            status: Some("OPEN".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2025, 2, day, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn request() -> BaseRequest {
        BaseRequest {
            branch_code: Some("BR".to_string()),
            country_code: Some("IN".to_string()),
            txn_id: Some("TXN1".to_string()),
            ref_id: Some("REF1".to_string()),
            mfr: Some("MFR1".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_txn_id_wins_over_later_keys() {
        let by_txn = Event {
            txn_id: Some("TXN1".to_string()),
            ..event("E_TXN", 1)
        };
        let by_mfr = Event {
            mfr: Some("MFR1".to_string()),
            ..event("E_MFR", 9)
        };
        let store = InMemoryServices::new().with_event(by_mfr).with_event(by_txn);

        let (found, key) = locate_event(&store, &request(), &[]).await.unwrap().unwrap();
        assert_eq!(found.event_id.as_deref(), Some("E_TXN"));
        assert_eq!(key, EventKey::CxtTxnId);
    }

    #[tokio::test]
    async fn test_blank_keys_skipped() {
        let by_mfr = Event {
            mfr: Some("MFR1".to_string()),
            ..event("E_MFR", 1)
        };
        let store = InMemoryServices::new().with_event(by_mfr);

        let mut req = request();
        req.txn_id = Some("  ".to_string());
        req.ref_id = None;

        let (found, key) = locate_event(&store, &req, &[]).await.unwrap().unwrap();
        assert_eq!(found.event_id.as_deref(), Some("E_MFR"));
        assert_eq!(key, EventKey::Mfr);
    }

    #[tokio::test]
    async fn test_other_branch_not_matched() {
        let elsewhere = Event {
            txn_id: Some("TXN1".to_string()),
            branch_code: Some("ZZ".to_string()),
            ..event("E1", 1)
        };
        let store = InMemoryServices::new().with_event(elsewhere);

        assert!(locate_event(&store, &request(), &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_excluded_status_falls_through_to_next_key() {
        let cancelled = Event {
            txn_id: Some("TXN1".to_string()),
            status: Some("CANCELLED".to_string()),
            ..event("E_CANCELLED", 5)
        };
        let by_ref = Event {
            ref_id: Some("REF1".to_string()),
            ..event("E_REF", 1)
        };
        let store = InMemoryServices::new().with_event(cancelled).with_event(by_ref);

        let (found, key) = locate_event(&store, &request(), &["CANCELLED".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.event_id.as_deref(), Some("E_REF"));
        assert_eq!(key, EventKey::CxtRefId);
    }
}
