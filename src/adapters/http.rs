//! REST client for the collaborator services
//!
//! One client implements every collaborator trait against a single service:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | courier details | `GET /couriers?branch&country&eventId` |
//! | reference id by MFR | `GET /reference-ids?branch&country&mfr` |
//! | document metadata | `POST /documents/search` |
//! | latest event | `POST /events/search` |
//! | record publication | `POST /track-trace` |
//!
//! A 404 (or 204) answer means "nothing found"; any other non-success status is a
//! `TntError::Lookup`.

use super::traits::{
    CourierLookup, DocumentMetadataSource, EventQuery, EventStore, RecordSink, RefIdLookup,
};
use crate::config::{SecretString, ServicesConfig};
use crate::domain::{
    CanonicalRequest, Courier, DocumentCriteria, DocumentMeta, Event, Result, TntError, TxnRecord,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RefIdResponse {
    ref_id: Option<String>,
}

#[derive(Serialize)]
struct PublishBody<'a> {
    request: &'a CanonicalRequest,
    record: &'a TxnRecord,
}

/// HTTP client for the collaborator services
#[derive(Clone)]
pub struct ServiceClient {
    base_url: String,
    client: Client,
    api_token: Option<SecretString>,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_token.is_some())
            .finish()
    }
}

impl ServiceClient {
    /// Creates a client from the `[services]` configuration
    ///
    /// # Errors
    ///
    /// Returns `TntError::Configuration` when no base URL is configured or the
    /// HTTP client cannot be built.
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| TntError::Configuration("services.base_url is not set".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| TntError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            api_token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => {
                let token: &str = token.expose_secret().as_ref();
                request.bearer_auth(token)
            }
            None => request,
        }
    }

    /// Sends a request and decodes the body; `None` for 404/204
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<Option<T>> {
        let resp = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| TntError::Lookup(format!("{what} request failed: {e}")))?;

        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => {
                tracing::debug!(what, "Service returned no result");
                Ok(None)
            }
            status if status.is_success() => resp
                .json::<T>()
                .await
                .map(Some)
                .map_err(|e| TntError::Lookup(format!("Invalid {what} response: {e}"))),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TntError::Lookup(format!(
                    "{what} failed with status {status}: {body}"
                )))
            }
        }
    }
}

#[async_trait]
impl CourierLookup for ServiceClient {
    async fn courier_details(
        &self,
        branch_code: &str,
        country_code: &str,
        event_id: &str,
    ) -> Result<Option<Courier>> {
        let request = self.client.get(self.url("couriers")).query(&[
            ("branch", branch_code),
            ("country", country_code),
            ("eventId", event_id),
        ]);
        self.fetch(request, "courier lookup").await
    }
}

#[async_trait]
impl RefIdLookup for ServiceClient {
    async fn ref_id_by_mfr(
        &self,
        branch_code: &str,
        country_code: &str,
        mfr: &str,
    ) -> Result<Option<String>> {
        let request = self.client.get(self.url("reference-ids")).query(&[
            ("branch", branch_code),
            ("country", country_code),
            ("mfr", mfr),
        ]);
        let response: Option<RefIdResponse> = self.fetch(request, "reference id lookup").await?;
        Ok(response
            .and_then(|r| r.ref_id)
            .filter(|id| !id.trim().is_empty()))
    }
}

#[async_trait]
impl DocumentMetadataSource for ServiceClient {
    async fn documents(&self, criteria: &DocumentCriteria) -> Result<Vec<DocumentMeta>> {
        let request = self.client.post(self.url("documents/search")).json(criteria);
        Ok(self
            .fetch::<Vec<DocumentMeta>>(request, "document search")
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl EventStore for ServiceClient {
    async fn find_latest(&self, query: &EventQuery) -> Result<Option<Event>> {
        let request = self.client.post(self.url("events/search")).json(query);
        self.fetch(request, "event search").await
    }
}

#[async_trait]
impl RecordSink for ServiceClient {
    async fn publish(&self, request: &CanonicalRequest, record: &TxnRecord) -> Result<()> {
        let resp = self
            .authorize(
                self.client
                    .post(self.url("track-trace"))
                    .json(&PublishBody { request, record }),
            )
            .send()
            .await
            .map_err(|e| TntError::Lookup(format!("record publication failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TntError::Lookup(format!(
                "record publication failed with status {status}: {body}"
            )));
        }

        tracing::debug!(
            event_id = request.event_id.as_deref().unwrap_or(""),
            "Record published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::EventKey;
    use mockito::Matcher;

    fn client(url: String, token: Option<&str>) -> ServiceClient {
        ServiceClient::new(&ServicesConfig {
            base_url: Some(url),
            api_token: token.map(|t| secret_string(t.to_string())),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_new_requires_base_url() {
        let err = ServiceClient::new(&ServicesConfig::default()).unwrap_err();
        assert!(matches!(err, TntError::Configuration(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let c = client("http://localhost:1/".to_string(), Some("s3cret"));
        assert_eq!(c.base_url(), "http://localhost:1");
        assert!(!format!("{c:?}").contains("s3cret"));
    }

    #[tokio::test]
    async fn test_courier_details_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/couriers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("branch".into(), "BR".into()),
                Matcher::UrlEncoded("country".into(), "IN".into()),
                Matcher::UrlEncoded("eventId".into(), "EVT1".into()),
            ]))
            .match_header("authorization", "Bearer token-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"courier_partner":"DHL","waybill_number":"WB1"}"#)
            .create_async()
            .await;

        let courier = client(server.url(), Some("token-1"))
            .courier_details("BR", "IN", "EVT1")
            .await
            .unwrap();

        assert_eq!(courier, Some(Courier::new("DHL", "WB1")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/reference-ids")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let ref_id = client(server.url(), None)
            .ref_id_by_mfr("BR", "IN", "MFR1")
            .await
            .unwrap();
        assert!(ref_id.is_none());
    }

    #[tokio::test]
    async fn test_ref_id_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/reference-ids")
            .match_query(Matcher::UrlEncoded("mfr".into(), "MFR1".into()))
            .with_status(200)
            .with_body(r#"{"ref_id":"REF123"}"#)
            .create_async()
            .await;

        let ref_id = client(server.url(), None)
            .ref_id_by_mfr("BR", "IN", "MFR1")
            .await
            .unwrap();
        assert_eq!(ref_id.as_deref(), Some("REF123"));
    }

    #[tokio::test]
    async fn test_server_error_is_lookup_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/documents/search")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client(server.url(), None)
            .documents(&DocumentCriteria::default())
            .await
            .unwrap_err();

        match err {
            TntError::Lookup(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("maintenance"));
            }
            other => panic!("expected Lookup error, got {other:?}"),
        }
        assert!(TntError::Lookup(String::new()).is_retryable());
    }

    #[tokio::test]
    async fn test_event_search_posts_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/events/search")
            .match_body(Matcher::PartialJsonString(
                r#"{"key":"MFR","column":"mfr","value":"MFR1"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"event_id":"EVT9","mfr":"MFR1"}"#)
            .create_async()
            .await;

        let query = EventQuery {
            branch_code: Some("BR".to_string()),
            country_code: Some("IN".to_string()),
            key: EventKey::Mfr,
            column: "mfr".to_string(),
            value: "MFR1".to_string(),
            excluded_statuses: vec![],
        };
        let event = client(server.url(), None).find_latest(&query).await.unwrap().unwrap();

        assert_eq!(event.event_id.as_deref(), Some("EVT9"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/track-trace")
            .with_status(422)
            .create_async()
            .await;

        let result = client(server.url(), None)
            .publish(&CanonicalRequest::default(), &TxnRecord::new())
            .await;
        assert!(matches!(result, Err(TntError::Lookup(_))));
    }
}
