//! Core business logic for tntrace.
//!
//! # Modules
//!
//! - [`resolve`] - merges mapping, request and event into a canonical request
//! - [`locate`] - finds the persisted event by ordered candidate keys
//! - [`enrich`] - customer reference, reference-id and courier lookups
//! - [`select`] - projects requested fields onto a transaction record
//! - [`attachments`] - turns document metadata into attachments
//! - [`generate`] - product strategies, XML rendering and atomic writes
//! - [`pipeline`] - orchestration of one invocation and run summaries
//!
//! # Workflow
//!
//! 1. **Validate**: requested field identifiers must all be known
//! 2. **Locate** (optional): find the persisted event when none is supplied
//! 3. **Resolve**: build the canonical request and its lookup flags
//! 4. **Dispatch**: pick the strategy for the product code
//! 5. **Enrich**: run the lookups the flags call for
//! 6. **Select**: copy the requested fields onto a fresh record
//! 7. **Attach**: classify documents, assign courier and `mo_event_id`
//! 8. **Generate**: write the document atomically (skipped in dry-run mode)
//! 9. **Publish**: hand the record to the sink
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tntrace::adapters::memory::InMemoryServices;
//! use tntrace::config::TntConfig;
//! use tntrace::core::pipeline::{Collaborators, TrackTraceCoordinator, TrackTraceInput};
//! use tntrace::core::select::SystemClock;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TntConfig::default();
//! let services = Collaborators::from_service(Arc::new(InMemoryServices::new()));
//! let coordinator = TrackTraceCoordinator::from_config(&config, services, Arc::new(SystemClock))?;
//!
//! let input: TrackTraceInput = serde_json::from_str(r#"{"mapping": {}, "request": {}}"#)?;
//! let outcome = coordinator.process(input).await?;
//! println!("{:?}", outcome.document);
//! # Ok(())
//! # }
//! ```

pub mod attachments;
pub mod enrich;
pub mod generate;
pub mod locate;
pub mod pipeline;
pub mod resolve;
pub mod select;
