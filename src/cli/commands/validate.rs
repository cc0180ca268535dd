//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the tntrace configuration file.

use crate::config::load_config;
use crate::core::generate::StrategyRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well; a failure here covers both
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match StrategyRegistry::with_enabled(&config.strategies.enabled) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Strategy registration failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Output Directory: {}", config.output.directory.display());
        println!("  Time Zone: {}", config.output.time_zone);
        match &config.services.base_url {
            Some(url) => {
                println!("  Services: {url}");
                println!(
                    "  Services Token: {}",
                    if config.services.api_token.is_some() {
                        "configured"
                    } else {
                        "none"
                    }
                );
                println!("  Services Timeout: {}s", config.services.timeout_seconds);
            }
            None => println!("  Services: not configured (offline only)"),
        }
        println!("  Event Locator: {}", config.locator.enabled);
        println!(
            "  Excluded Statuses: {:?}",
            config.locator.excluded_statuses
        );
        println!("  Strategies: {}", registry.product_codes().join(", "));
        println!();
        Ok(0)
    }
}
