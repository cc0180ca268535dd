//! Generate command implementation
//!
//! Reads one or more JSON input bundles, runs each through the track-and-trace
//! pipeline and writes the resulting documents.
//!
//! A bundle carries the rule mapping, the base request and an optional event. In
//! offline mode (or when no service URL is configured) the bundle's `fixtures`
//! section answers the collaborator lookups:
//!
//! ```json
//! {
//!   "mapping": { "prod_code": "IMLC", "courier_required": true },
//!   "request": { "branch_code": "BR", "event_id": "EVT1", "common_fields": ["TXN_ID"] },
//!   "fixtures": { "couriers": [] }
//! }
//! ```

use crate::adapters::http::ServiceClient;
use crate::adapters::memory::{InMemoryServices, ServiceFixtures};
use crate::adapters::traits::LoggingSink;
use crate::config::{load_config, TntConfig};
use crate::core::generate::StrategyRegistry;
use crate::core::pipeline::{
    Collaborators, CoordinatorOptions, GenerationError, GenerationSummary, ProcessOutcome,
    TrackTraceCoordinator, TrackTraceInput,
};
use crate::core::select::{Clock, FieldSelector, SystemClock};
use crate::domain::{BaseRequest, Event, Result, RuleMapping, TntError};
use chrono::FixedOffset;
use clap::Args;
use futures::future::join_all;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Input bundle (JSON); repeat to process several invocations
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Answer lookups from the bundle fixtures instead of the configured services
    #[arg(long)]
    pub offline: bool,

    /// Dry run mode - assemble records without writing documents
    #[arg(long)]
    pub dry_run: bool,
}

/// One invocation as read from disk
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputBundle {
    pub mapping: Option<RuleMapping>,
    pub request: Option<BaseRequest>,
    pub event: Option<Event>,
    pub fixtures: ServiceFixtures,
}

impl InputBundle {
    /// Reads a bundle from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `TntError::Io` when the file cannot be read and
    /// `TntError::Validation` when it is not a valid bundle.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TntError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| {
            TntError::Validation(format!("Invalid input bundle {}: {e}", path.display()))
        })
    }

    /// Splits the bundle into pipeline input and fixtures
    pub fn into_parts(self) -> (TrackTraceInput, ServiceFixtures) {
        let input = TrackTraceInput {
            mapping: self.mapping,
            request: self.request,
            event: self.event,
        };
        (input, self.fixtures)
    }
}

/// Shared pieces every coordinator of a run is built from
struct RunContext {
    registry: Arc<StrategyRegistry>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    options: CoordinatorOptions,
}

impl RunContext {
    fn new(config: &TntConfig) -> Result<Self> {
        Ok(Self {
            registry: Arc::new(StrategyRegistry::with_enabled(&config.strategies.enabled)?),
            clock: Arc::new(SystemClock),
            offset: config.output.offset().map_err(TntError::Configuration)?,
            options: CoordinatorOptions::from_config(config),
        })
    }

    fn coordinator(&self, services: Collaborators) -> TrackTraceCoordinator {
        TrackTraceCoordinator::new(
            Arc::clone(&self.registry),
            services,
            FieldSelector::new(Arc::clone(&self.clock), self.offset),
            self.options.clone(),
        )
    }
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(inputs = self.input.len(), "Starting generate command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let context = match RunContext::new(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize generation");
                eprintln!("Failed to initialize generation: {e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no documents will be written");
            println!("🔍 DRY RUN MODE - No documents will be written");
            println!();
        } else if let Err(e) = tokio::fs::create_dir_all(&config.output.directory).await {
            tracing::error!(error = %e, "Failed to create output directory");
            eprintln!(
                "Failed to create output directory {}: {e}",
                config.output.directory.display()
            );
            return Ok(5);
        }

        let shared_client = if self.use_services(&config) {
            match ServiceClient::new(&config.services) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create service client");
                    eprintln!("Failed to create service client: {e}");
                    return Ok(2);
                }
            }
        } else {
            tracing::info!("Using bundle fixtures for collaborator lookups");
            None
        };

        println!("🚀 Generating documents for {} input(s)...", self.input.len());
        println!();

        let start_time = Instant::now();
        let runs = self.input.iter().map(|path| {
            let context = &context;
            let shared_client = shared_client.clone();
            async move {
                let label = path.display().to_string();
                let outcome = async {
                    let (input, fixtures) = InputBundle::from_file(path)?.into_parts();
                    let services = match shared_client {
                        Some(client) => Collaborators::from_service(client),
                        None => {
                            Collaborators::from_service(Arc::new(InMemoryServices::from_fixtures(
                                fixtures,
                            )))
                            .with_sink(Arc::new(LoggingSink))
                        }
                    };
                    context.coordinator(services).process(input).await
                }
                .await;
                (label, outcome)
            }
        });
        let results: Vec<(String, Result<ProcessOutcome>)> = join_all(runs).await;

        let mut summary = GenerationSummary::new();
        for (label, result) in results {
            match result {
                Ok(outcome) => summary.add_success(outcome.document),
                Err(e) => {
                    crate::log_error_with_context!(e, label.as_str());
                    summary.add_failure(GenerationError::from_error(label, &e));
                }
            }
        }
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Self::print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Generation completed successfully!");
            0
        } else {
            println!("⚠️  Generation completed with failures");
            1
        };
        Ok(exit_code)
    }

    fn apply_overrides(&self, config: &mut TntConfig) {
        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir.display(), "Overriding output directory from CLI");
            config.output.directory = dir.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }

    fn use_services(&self, config: &TntConfig) -> bool {
        !self.offline && config.services.base_url.is_some()
    }

    fn print_summary(summary: &GenerationSummary) {
        println!("📊 Generation Summary:");
        println!("  Inputs: {}", summary.total_inputs);
        println!("  Successful: {}", summary.successful);
        println!("  Failed: {}", summary.failed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

        if !summary.documents.is_empty() {
            println!();
            println!("📄 Documents:");
            for document in &summary.documents {
                println!(
                    "  - {} ({} bytes, sha256 {})",
                    document.path.display(),
                    document.bytes,
                    document.checksum
                );
            }
        }

        if !summary.errors.is_empty() {
            println!();
            println!("⚠️  Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.error_type, error.message);
                println!("    Input: {}", error.input);
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServicesConfig;
    use tempfile::TempDir;

    fn args() -> GenerateArgs {
        GenerateArgs {
            input: vec![PathBuf::from("bundle.json")],
            output_dir: None,
            offline: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_bundle_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(
            &path,
            r#"{
                "mapping": {"prod_code": "EXCO"},
                "request": {"branch_code": "BR", "event_id": "EVT1"},
                "fixtures": {"ref_ids": [{"branch_code": "BR", "country_code": "IN", "mfr": "M1", "ref_id": "R1"}]}
            }"#,
        )
        .unwrap();

        let (input, fixtures) = InputBundle::from_file(&path).unwrap().into_parts();
        assert_eq!(input.mapping.unwrap().prod_code.as_deref(), Some("EXCO"));
        assert_eq!(input.request.unwrap().event_id.as_deref(), Some("EVT1"));
        assert!(input.event.is_none());
        assert_eq!(fixtures.ref_ids.len(), 1);
    }

    #[test]
    fn test_bundle_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = InputBundle::from_file(&path).unwrap_err();
        assert!(matches!(err, TntError::Validation(ref msg) if msg.contains("broken.json")));
    }

    #[test]
    fn test_bundle_missing_file() {
        let err = InputBundle::from_file(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(matches!(err, TntError::Io { .. }));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = TntConfig::default();
        let args = GenerateArgs {
            output_dir: Some(PathBuf::from("/tmp/tnt-out")),
            dry_run: true,
            ..args()
        };
        args.apply_overrides(&mut config);

        assert_eq!(config.output.directory, PathBuf::from("/tmp/tnt-out"));
        assert!(config.application.dry_run);
    }

    #[test]
    fn test_use_services() {
        let mut config = TntConfig::default();
        assert!(!args().use_services(&config));

        config.services = ServicesConfig {
            base_url: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert!(args().use_services(&config));

        let offline = GenerateArgs {
            offline: true,
            ..args()
        };
        assert!(!offline.use_services(&config));
    }
}
