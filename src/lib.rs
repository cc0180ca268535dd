// tntrace - Transaction Track-and-Trace Document Generator
// Copyright (c) 2025 tntrace Contributors
// Licensed under the MIT License

//! # tntrace - Transaction Track-and-Trace
//!
//! tntrace turns a trade-finance transaction event into a track-and-trace record and
//! renders it as a product-specific XML document.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** a rule mapping, base request and optional event into one
//!   canonical request
//! - **Locating** the persisted event by ordered candidate keys
//! - **Enriching** the request with customer reference, reference id and courier
//! - **Selecting** the requested fields onto a transaction record
//! - **Generating** the document through a per-product strategy, written atomically
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (resolve, locate, enrich, select, generate, pipeline)
//! - [`adapters`] - Collaborator services (REST client, in-memory fixtures)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tntrace::adapters::memory::InMemoryServices;
//! use tntrace::config::load_config;
//! use tntrace::core::pipeline::{Collaborators, TrackTraceCoordinator, TrackTraceInput};
//! use tntrace::core::select::SystemClock;
//! use tntrace::domain::{BaseRequest, RuleMapping};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tntrace.toml")?;
//!     let services = Collaborators::from_service(Arc::new(InMemoryServices::new()));
//!     let coordinator = TrackTraceCoordinator::from_config(&config, services, Arc::new(SystemClock))?;
//!
//!     let input = TrackTraceInput {
//!         mapping: Some(RuleMapping {
//!             prod_code: Some("IMLC".to_string()),
//!             ..Default::default()
//!         }),
//!         request: Some(BaseRequest {
//!             branch_code: Some("BR".to_string()),
//!             event_id: Some("EVT1".to_string()),
//!             ..Default::default()
//!         }),
//!         event: None,
//!     };
//!
//!     let outcome = coordinator.process(input).await?;
//!     if let Some(document) = outcome.document {
//!         println!("Wrote {}", document.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], carrying a
//! [`domain::TntError`] that names the failing stage.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
