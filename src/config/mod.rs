//! Configuration management for tntrace.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `TNT_*` environment
//! overrides, defaults for every optional setting and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tntrace::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tntrace.toml")?;
//!
//! println!("Output directory: {}", config.output.directory.display());
//! println!("Dry run: {}", config.application.dry_run);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry-run mode
//! - [`OutputConfig`] - document directory and timestamp offset
//! - [`ServicesConfig`] - collaborator REST service
//! - [`LocatorConfig`] - persisted event lookup
//! - [`StrategiesConfig`] - enabled product strategies
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [output]
//! directory = "/var/lib/tntrace/out"
//! time_zone = "+05:30"
//!
//! [services]
//! base_url = "https://tnt-services.example.com/api"
//! api_token = "${TNT_API_TOKEN}"
//!
//! [locator]
//! excluded_statuses = ["CANCELLED"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LocatorConfig, LoggingConfig, OutputConfig, ServicesConfig,
    StrategiesConfig, TntConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
