//! Track-and-trace coordinator - orchestrates one invocation end to end
//!
//! resolve → locate (optional) → enrich → select → attachments → dispatch →
//! generate → publish. Every invocation works on its own request and record; the
//! coordinator itself is immutable and can be shared across tasks.

use crate::adapters::traits::{
    CourierLookup, DocumentMetadataSource, EventStore, RecordSink, RefIdLookup,
};
use crate::config::TntConfig;
use crate::core::attachments::classify;
use crate::core::enrich::enrich;
use crate::core::generate::{document_event_id, GeneratedDocument, StrategyRegistry};
use crate::core::locate::locate_event;
use crate::core::resolve::resolve;
use crate::core::select::{Clock, FieldSelector};
use crate::domain::{
    Attachment, BaseRequest, CanonicalRequest, DocumentCriteria, Event, FieldSet, Result,
    RuleMapping, TntError, TxnRecord,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Inputs of one invocation, as produced by the upstream lookup layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTraceInput {
    pub mapping: Option<RuleMapping>,
    pub request: Option<BaseRequest>,
    pub event: Option<Event>,
}

/// Result of one invocation
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Enriched canonical request
    pub request: CanonicalRequest,

    /// Assembled record, as handed to the sink
    pub record: TxnRecord,

    /// Written document; `None` in dry-run mode
    pub document: Option<GeneratedDocument>,
}

/// Collaborator services used by the coordinator
#[derive(Clone)]
pub struct Collaborators {
    pub couriers: Arc<dyn CourierLookup>,
    pub ref_ids: Arc<dyn RefIdLookup>,
    pub documents: Arc<dyn DocumentMetadataSource>,
    pub events: Arc<dyn EventStore>,
    pub sink: Arc<dyn RecordSink>,
}

impl Collaborators {
    /// Uses one service implementation for every collaborator
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: CourierLookup + RefIdLookup + DocumentMetadataSource + EventStore + RecordSink + 'static,
    {
        Self {
            couriers: service.clone(),
            ref_ids: service.clone(),
            documents: service.clone(),
            events: service.clone(),
            sink: service,
        }
    }

    /// Replaces the record sink
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = sink;
        self
    }
}

/// Per-run coordinator settings
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Directory documents are written to
    pub output_dir: PathBuf,

    /// Assemble and publish records without writing documents
    pub dry_run: bool,

    /// Look up the persisted event when the input has none
    pub locate_events: bool,

    /// Statuses ignored by the event locator
    pub excluded_statuses: Vec<String>,
}

impl CoordinatorOptions {
    pub fn from_config(config: &TntConfig) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            dry_run: config.application.dry_run,
            locate_events: config.locator.enabled,
            excluded_statuses: config.locator.excluded_statuses.clone(),
        }
    }
}

/// Track-and-trace coordinator
pub struct TrackTraceCoordinator {
    registry: Arc<StrategyRegistry>,
    services: Collaborators,
    selector: FieldSelector,
    options: CoordinatorOptions,
}

impl TrackTraceCoordinator {
    /// Create a new coordinator
    pub fn new(
        registry: Arc<StrategyRegistry>,
        services: Collaborators,
        selector: FieldSelector,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            registry,
            services,
            selector,
            options,
        }
    }

    /// Create a coordinator from configuration
    ///
    /// # Errors
    ///
    /// Returns `TntError::Configuration` for an invalid time zone or an unknown
    /// enabled product code.
    pub fn from_config(
        config: &TntConfig,
        services: Collaborators,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let offset = config.output.offset().map_err(TntError::Configuration)?;
        let registry = StrategyRegistry::with_enabled(&config.strategies.enabled)?;

        Ok(Self::new(
            Arc::new(registry),
            services,
            FieldSelector::new(clock, offset),
            CoordinatorOptions::from_config(config),
        ))
    }

    /// Processes one invocation
    ///
    /// Requested field identifiers, the product code and the document event id are
    /// checked before any enrichment lookup is made or anything is written.
    ///
    /// # Errors
    ///
    /// - `TntError::Validation` for missing mapping/request, unknown field
    ///   identifiers or an unusable event id
    /// - `TntError::DispatchNotFound` for an unknown product code
    /// - `TntError::Lookup` when a collaborator fails
    /// - `TntError::Serialization` / `TntError::Io` from document generation
    pub async fn process(&self, input: TrackTraceInput) -> Result<ProcessOutcome> {
        let start_time = Instant::now();
        let TrackTraceInput {
            mapping,
            request,
            event,
        } = input;

        let Some(request) = request else {
            return Err(TntError::Validation("Base request is required".to_string()));
        };
        let fields = FieldSet::parse(&request.common_fields)?;

        let (event, found_by) = match event {
            Some(event) => (Some(event), None),
            None if self.options.locate_events => {
                match locate_event(
                    self.services.events.as_ref(),
                    &request,
                    &self.options.excluded_statuses,
                )
                .await?
                {
                    Some((event, key)) => (Some(event), Some(key)),
                    None => (None, None),
                }
            }
            None => (None, None),
        };

        let mut canonical = resolve(mapping.as_ref(), Some(&request), event.as_ref())
            .ok_or_else(|| TntError::Validation("Rule mapping is required".to_string()))?;
        canonical.found_by = found_by;

        let product_code = canonical.prod_code.clone().unwrap_or_default();
        let strategy = self.registry.dispatch(&product_code)?;
        let event_id = document_event_id(&canonical)?;

        crate::log_generation_start!(event_id.as_str(), strategy.product_code());

        enrich(
            &mut canonical,
            self.services.couriers.as_ref(),
            self.services.ref_ids.as_ref(),
        )
        .await?;

        let mut record = TxnRecord::new();
        self.selector.apply_fields(&mut record, &canonical, &fields);

        let attachments = self.attachments(&canonical).await?;
        strategy.set_attachment_and_courier(&mut record, &canonical, attachments);

        let document = if self.options.dry_run {
            tracing::info!(event_id = event_id.as_str(), "Dry run: document not written");
            None
        } else {
            let strategy = Arc::clone(&strategy);
            let (record, canonical) = (record.clone(), canonical.clone());
            let output_dir = self.options.output_dir.clone();
            let written = tokio::task::spawn_blocking(move || {
                strategy.generate(&record, &canonical, &output_dir)
            })
            .await
            .map_err(|e| TntError::Other(format!("Document writer task failed: {e}")))??;
            Some(written)
        };

        self.services.sink.publish(&canonical, &record).await?;

        crate::log_generation_complete!(event_id.as_str(), start_time.elapsed());

        Ok(ProcessOutcome {
            request: canonical,
            record,
            document,
        })
    }

    /// Attachments for the request; empty unless the mapping asks for them
    async fn attachments(&self, request: &CanonicalRequest) -> Result<Vec<Attachment>> {
        if !request.flags.attachment_needed {
            return Ok(Vec::new());
        }

        let criteria = DocumentCriteria {
            branch_code: request.branch_code.clone(),
            country_code: request.country_code.clone(),
            event_id: request.event_id.clone(),
            prod_code: request.prod_code.clone(),
        };
        let documents = self.services.documents.documents(&criteria).await?;

        Ok(classify(&documents).unwrap_or_default())
    }
}
