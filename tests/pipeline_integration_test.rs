//! Integration tests for the track-and-trace pipeline
//!
//! Each test wires a coordinator to in-memory collaborators and a temporary output
//! directory, then checks the published record and the written document.

use chrono::{FixedOffset, TimeZone, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tempfile::TempDir;
use tntrace::adapters::memory::InMemoryServices;
use tntrace::core::generate::{DocumentStrategy, ProductDetail, StrategyRegistry};
use tntrace::core::pipeline::{
    Collaborators, CoordinatorOptions, TrackTraceCoordinator, TrackTraceInput,
};
use tntrace::core::select::{FieldSelector, FixedClock};
use tntrace::domain::{
    BaseRequest, CanonicalRequest, Courier, DocumentMeta, Event, EventKey, RuleMapping, TntError,
    TxnRecord, MO_EVENT_ID,
};

fn selector() -> FieldSelector {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 7, 1, 8, 30, 0).unwrap());
    FieldSelector::new(Arc::new(clock), FixedOffset::east_opt(5 * 3600 + 1800).unwrap())
}

fn options(dir: &TempDir) -> CoordinatorOptions {
    CoordinatorOptions {
        output_dir: dir.path().to_path_buf(),
        dry_run: false,
        locate_events: true,
        excluded_statuses: vec!["CANCELLED".to_string()],
    }
}

fn coordinator_with(
    registry: StrategyRegistry,
    services: Arc<InMemoryServices>,
    dir: &TempDir,
) -> TrackTraceCoordinator {
    TrackTraceCoordinator::new(
        Arc::new(registry),
        Collaborators::from_service(services),
        selector(),
        options(dir),
    )
}

fn coordinator(services: Arc<InMemoryServices>, dir: &TempDir) -> TrackTraceCoordinator {
    coordinator_with(StrategyRegistry::with_defaults().unwrap(), services, dir)
}

fn base_request() -> BaseRequest {
    BaseRequest {
        branch_code: Some("BR".to_string()),
        country_code: Some("IN".to_string()),
        event_id: Some("EVT1".to_string()),
        ref_id: Some("REF1".to_string()),
        txn_id: Some("TXN1".to_string()),
        customer_id: Some("EBCUS".to_string()),
        prod_code: Some("IMLC".to_string()),
        common_fields: vec![
            "BRANCH_CODE".to_string(),
            "BO_REF_ID".to_string(),
            "TXN_ID".to_string(),
            "TXN_TYPE_CODE".to_string(),
            "PROD_CODE".to_string(),
            "CUSTOMER_REF".to_string(),
            "RELEASE_DTTM".to_string(),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_pre_linked_request_end_to_end() {
    let dir = TempDir::new().unwrap();
    let services = Arc::new(InMemoryServices::new());
    let coordinator = coordinator(services.clone(), &dir);

    let input = TrackTraceInput {
        mapping: Some(RuleMapping {
            txn_type_code: Some("TT".to_string()),
            ..Default::default()
        }),
        request: Some(base_request()),
        event: None,
    };
    let outcome = coordinator.process(input).await.unwrap();

    assert_eq!(outcome.request.branch_code.as_deref(), Some("BR"));
    assert_eq!(outcome.request.bo_ref_id.as_deref(), Some("EVT1"));
    assert_eq!(outcome.request.txn_type_code, None);
    assert_eq!(outcome.request.prod_code.as_deref(), Some("IMLC"));

    let record = &outcome.record;
    assert_eq!(record.bo_ref_id.as_deref(), Some("EVT1"));
    assert_eq!(record.txn_id.as_deref(), Some("TXN1"));
    assert_eq!(record.customer_reference.as_deref(), Some("BREBCUS"));
    assert_eq!(
        record.release_dttm.unwrap().to_rfc3339(),
        "2025-07-01T14:00:00+05:30"
    );
    assert_eq!(record.txn_type_code, None);

    let document = outcome.document.unwrap();
    assert!(document.path.ends_with("TNT_IMLC_EVT1.xml"));
    let xml = std::fs::read_to_string(&document.path).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<ImportLcTrackTrace product="IMLC" eventId="EVT1">"#));
    assert!(xml.contains("<ReleaseDttm>2025-07-01T14:00:00+05:30</ReleaseDttm>"));
    assert!(xml.contains(&format!(r#"<Field name="{MO_EVENT_ID}">EVT1</Field>"#)));
    assert_eq!(document.bytes, xml.len() as u64);

    let published = services.published();
    assert_eq!(published.len(), 1);
    assert_eq!(&published[0].1, record);
}

#[tokio::test]
async fn test_courier_and_attachments_in_document() {
    let dir = TempDir::new().unwrap();
    let services = Arc::new(
        InMemoryServices::new()
            .with_courier("BR", "IN", "EVT1", Courier::new("DHL", "WB-42"))
            .with_documents(
                "EVT1",
                vec![
                    DocumentMeta {
                        title: "invoice.pdf".to_string(),
                        document_source: Some("EMAIL".to_string()),
                        eligible: true,
                        ..Default::default()
                    },
                    DocumentMeta {
                        title: "mt700.txt".to_string(),
                        document_source: Some("SWIFT".to_string()),
                        document_category: Some("700".to_string()),
                        eligible: true,
                    },
                    DocumentMeta {
                        title: "internal.docx".to_string(),
                        eligible: false,
                        ..Default::default()
                    },
                ],
            ),
    );
    let coordinator = coordinator(services, &dir);

    let input = TrackTraceInput {
        mapping: Some(RuleMapping {
            courier_required: true,
            attachments_required: true,
            ..Default::default()
        }),
        request: Some(base_request()),
        event: None,
    };
    let outcome = coordinator.process(input).await.unwrap();

    assert_eq!(outcome.record.courier_partner.as_deref(), Some("DHL"));
    assert_eq!(outcome.record.waybill_number.as_deref(), Some("WB-42"));
    let attachments = outcome.record.attachments.as_ref().unwrap();
    assert_eq!(attachments.len(), 2);
    assert_eq!(attachments[0].title, "DOCUMENT_VALUE : invoice");
    assert_eq!(attachments[1].title, "SWIFT : 700");

    let xml = std::fs::read_to_string(outcome.document.unwrap().path).unwrap();
    assert!(xml.contains("<Partner>DHL</Partner>"));
    assert!(xml.contains("<WaybillNumber>WB-42</WaybillNumber>"));
    assert!(xml.contains("<FileName>invoice.pdf</FileName>"));
    assert!(!xml.contains("internal.docx"));
}

#[tokio::test]
async fn test_event_located_when_not_supplied() {
    let dir = TempDir::new().unwrap();
    let at = |day| Some(Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap());
    let services = Arc::new(
        InMemoryServices::new()
            .with_event(Event {
                event_id: Some("EVT_OLD".to_string()),
                mfr: Some("MFR1".to_string()),
                branch_code: Some("BR".to_string()),
                country_code: Some("IN".to_string()),
                created_at: at(1),
                ..Default::default()
            })
            .with_event(Event {
                event_id: Some("EVT_CANCELLED".to_string()),
                mfr: Some("MFR1".to_string()),
                branch_code: Some("BR".to_string()),
                country_code: Some("IN".to_string()),
                status: Some("CANCELLED".to_string()),
                created_at: at(20),
                ..Default::default()
            })
            .with_event(Event {
                event_id: Some("EVT_NEW".to_string()),
                mfr: Some("MFR1".to_string()),
                currency: Some("USD".to_string()),
                branch_code: Some("BR".to_string()),
                country_code: Some("IN".to_string()),
                created_at: at(10),
                ..Default::default()
            }),
    );
    let coordinator = coordinator(services, &dir);

    let request = BaseRequest {
        branch_code: Some("BR".to_string()),
        country_code: Some("IN".to_string()),
        mfr: Some("MFR1".to_string()),
        prod_code: Some("EXCO".to_string()),
        common_fields: vec!["CURRENCY".to_string()],
        ..Default::default()
    };
    let input = TrackTraceInput {
        mapping: Some(RuleMapping::default()),
        request: Some(request),
        event: None,
    };
    let outcome = coordinator.process(input).await.unwrap();

    assert_eq!(outcome.request.found_by, Some(EventKey::Mfr));
    assert_eq!(outcome.request.event_id.as_deref(), Some("EVT_NEW"));
    assert_eq!(outcome.record.currency.as_deref(), Some("USD"));
    assert!(outcome
        .document
        .unwrap()
        .path
        .ends_with("TNT_EXCO_EVT_NEW.xml"));
}

#[tokio::test]
async fn test_unregistered_product_is_not_found() {
    let dir = TempDir::new().unwrap();
    let services = Arc::new(InMemoryServices::new());
    let coordinator = coordinator(services.clone(), &dir);

    let mut request = base_request();
    request.prod_code = Some("PROD".to_string());
    let input = TrackTraceInput {
        mapping: Some(RuleMapping::default()),
        request: Some(request),
        event: None,
    };

    match coordinator.process(input).await {
        Err(TntError::DispatchNotFound { product_code }) => assert_eq!(product_code, "PROD"),
        other => panic!("expected DispatchNotFound, got {:?}", other.map(|o| o.request)),
    }
    assert!(services.published().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_rerun_replaces_document() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(Arc::new(InMemoryServices::new()), &dir);
    let input = TrackTraceInput {
        mapping: Some(RuleMapping::default()),
        request: Some(base_request()),
        event: None,
    };

    let first = coordinator.process(input.clone()).await.unwrap().document.unwrap();
    let second = coordinator.process(input).await.unwrap().document.unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(first.checksum, second.checksum);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_concurrent_invocations_are_isolated() {
    let dir = TempDir::new().unwrap();
    let services = Arc::new(InMemoryServices::new());
    let coordinator = coordinator(services.clone(), &dir);

    let inputs: Vec<TrackTraceInput> = (0..16)
        .map(|i| {
            let mut request = base_request();
            request.event_id = Some(format!("EVT{i}"));
            request.txn_id = Some(format!("TXN{i}"));
            request.prod_code = Some(["IMLC", "EXCO", "OWGT"][i % 3].to_string());
            TrackTraceInput {
                mapping: Some(RuleMapping::default()),
                request: Some(request),
                event: None,
            }
        })
        .collect();

    let outcomes = join_all(inputs.into_iter().map(|input| coordinator.process(input))).await;

    for (i, outcome) in outcomes.into_iter().enumerate() {
        let outcome = outcome.unwrap();
        let event_id = format!("EVT{i}");
        assert_eq!(outcome.record.txn_id, Some(format!("TXN{i}")));
        assert_eq!(
            outcome
                .record
                .additional_field(MO_EVENT_ID)
                .and_then(|f| f.value.as_deref()),
            Some(event_id.as_str())
        );
        let document = outcome.document.unwrap();
        let file_name = document.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.ends_with(&format!("_{event_id}.xml")));
    }
    assert_eq!(services.published().len(), 16);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 16);
}

struct TestStrategy;

impl DocumentStrategy for TestStrategy {
    fn product_code(&self) -> &str {
        "TEST"
    }

    fn document_root(&self) -> &'static str {
        "TestTrackTrace"
    }

    fn product_details(&self, record: &TxnRecord, _request: &CanonicalRequest) -> Vec<ProductDetail> {
        vec![ProductDetail::new("Echo", record.txn_id.clone())]
    }
}

#[tokio::test]
async fn test_custom_strategy_registration() {
    let dir = TempDir::new().unwrap();
    let registry = StrategyRegistry::new(vec![Arc::new(TestStrategy)]).unwrap();
    assert_eq!(registry.product_codes(), vec!["TEST"]);

    let coordinator = coordinator_with(registry, Arc::new(InMemoryServices::new()), &dir);
    let mut request = base_request();
    request.prod_code = Some(" TEST ".to_string());
    let input = TrackTraceInput {
        mapping: Some(RuleMapping::default()),
        request: Some(request),
        event: None,
    };

    let document = coordinator.process(input).await.unwrap().document.unwrap();
    let xml = std::fs::read_to_string(&document.path).unwrap();
    assert!(xml.contains("<TestTrackTrace"));
    assert!(xml.contains(r#"<Field name="Echo">TXN1</Field>"#));
}

#[test]
fn test_duplicate_strategy_rejected() {
    let err = StrategyRegistry::new(vec![Arc::new(TestStrategy), Arc::new(TestStrategy)])
        .unwrap_err();
    assert!(matches!(err, TntError::DuplicateStrategy { ref product_code } if product_code == "TEST"));
}
