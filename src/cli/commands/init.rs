//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tntrace.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing tntrace configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set TNT_API_TOKEN in a .env file if the services need a token");
                println!("  3. Validate configuration: tntrace validate-config");
                println!("  4. Generate documents: tntrace generate --input bundle.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# tntrace Configuration File

[application]
log_level = "info"
dry_run = false

[output]
directory = "./output"
time_zone = "UTC"

[services]
# base_url = "https://tnt-services.example.com/api"
# api_token = "${TNT_API_TOKEN}"
timeout_seconds = 30

[locator]
enabled = true
excluded_statuses = []

[strategies]
enabled = []

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# tntrace Configuration File
#
# Every value below can be overridden with a TNT_<SECTION>_<KEY> environment
# variable, e.g. TNT_OUTPUT_DIRECTORY or TNT_SERVICES_BASE_URL.
# ${VAR} references are substituted from the environment on load.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (assemble and publish records, write no documents)
dry_run = false

# ============================================================================
# Document Output
# ============================================================================
[output]
# Directory generated documents are written to
directory = "/var/lib/tntrace/out"

# Offset used for the release timestamp: UTC or +HH:MM / -HH:MM
time_zone = "+05:30"

# ============================================================================
# Collaborator Services
# ============================================================================
[services]
# REST service answering courier, reference-id, document and event lookups.
# Leave unset to run offline from input bundle fixtures.
base_url = "https://tnt-services.example.com/api"

# Bearer token (use an environment variable)
api_token = "${TNT_API_TOKEN}"

# Request timeout in seconds
timeout_seconds = 30

# ============================================================================
# Event Locator
# ============================================================================
[locator]
# Look up the persisted event when an input carries none.
# Candidate keys are tried in order: CXT_TXN_ID, CXT_REF_ID, UMFR, MFR.
enabled = true

# Event statuses the locator ignores
excluded_statuses = ["CANCELLED", "REJECTED"]

# ============================================================================
# Product Strategies
# ============================================================================
[strategies]
# Product codes to register (empty = all: IMLC, EXCO, OWGT)
enabled = ["IMLC", "EXCO"]

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = true

# Log directory
local_path = "/var/log/tntrace"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "tntrace.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "tntrace.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config_parses() {
        let content = InitArgs::generate_minimal_config();
        assert!(content.contains("[application]"));
        assert!(content.contains("[output]"));

        let config = parse_config(&content).unwrap();
        assert!(config.services.base_url.is_none());
        assert!(config.strategies.enabled.is_empty());
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# tntrace Configuration File"));
        assert!(config.contains("excluded_statuses"));
        assert!(config.contains("[strategies]"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tntrace.toml");
        std::fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[output]"));
    }
}
