//! Configuration schema types
//!
//! This module defines the TOML configuration structure for tntrace. Every section
//! is optional; a missing section takes its defaults.

use crate::config::SecretString;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main tntrace configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TntConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Document output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Collaborator REST service (offline fixtures are used when no base URL is set)
    #[serde(default)]
    pub services: ServicesConfig,

    /// Event locator settings
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Document strategy selection
    #[serde(default)]
    pub strategies: StrategiesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TntConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.output.validate()?;
        self.services.validate()?;
        self.locator.validate()?;
        self.strategies.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (assemble and publish records, write no documents)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Document output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory generated documents are written to (must exist)
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Reference offset for release timestamps: `UTC`, `Z` or `±HH:MM`
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl OutputConfig {
    /// Parsed reference offset
    ///
    /// # Errors
    ///
    /// Returns an error if `time_zone` is not a recognised offset
    pub fn offset(&self) -> Result<FixedOffset, String> {
        parse_offset(&self.time_zone)
    }

    fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }
        self.offset()?;
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            time_zone: default_time_zone(),
        }
    }
}

/// Parses `UTC`, `Z` or a `±HH:MM` offset
pub fn parse_offset(value: &str) -> Result<FixedOffset, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }
    value.parse::<FixedOffset>().map_err(|e| {
        format!("Invalid output.time_zone '{value}': {e}. Use UTC or an offset like +05:30")
    })
}

/// Collaborator REST service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the collaborator service
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ServicesConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.base_url {
            if url.is_empty() {
                return Err("services.base_url cannot be empty when set".to_string());
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("services.base_url must start with http:// or https://".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("services.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Event locator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Look up the persisted event when the caller supplies none
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Events in these statuses are never selected
    #[serde(default)]
    pub excluded_statuses: Vec<String>,
}

impl LocatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.excluded_statuses.iter().any(|s| s.trim().is_empty()) {
            return Err("locator.excluded_statuses cannot contain blank entries".to_string());
        }
        Ok(())
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excluded_statuses: Vec::new(),
        }
    }
}

/// Document strategy selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategiesConfig {
    /// Product codes to register (empty = all built-in strategies)
    #[serde(default)]
    pub enabled: Vec<String>,
}

impl StrategiesConfig {
    fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for code in &self.enabled {
            let code = code.trim();
            if code.is_empty() {
                return Err("strategies.enabled cannot contain blank product codes".to_string());
            }
            if !seen.insert(code) {
                return Err(format!("strategies.enabled lists '{code}' more than once"));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output")
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        let config = TntConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.locator.enabled);
        assert!(!config.application.dry_run);
        assert_eq!(config.output.offset().unwrap(), Utc.fix());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test_case("UTC", 0 ; "utc name")]
    #[test_case("z", 0 ; "zulu")]
    #[test_case("+05:30", 19800 ; "positive offset")]
    #[test_case("-03:00", -10800 ; "negative offset")]
    fn test_parse_offset_valid(input: &str, seconds: i32) {
        assert_eq!(parse_offset(input).unwrap().local_minus_utc(), seconds);
    }

    #[test_case("Europe/Paris" ; "iana name")]
    #[test_case("" ; "empty")]
    #[test_case("+25:00" ; "out of range")]
    fn test_parse_offset_invalid(input: &str) {
        assert!(parse_offset(input).is_err());
    }

    #[test]
    fn test_services_config_validation() {
        let mut config = ServicesConfig {
            base_url: Some("https://tnt.example.com/api".to_string()),
            api_token: Some(secret_string("token".to_string())),
            timeout_seconds: 10,
        };
        assert!(config.validate().is_ok());

        config.base_url = Some("ftp://nope".to_string());
        assert!(config.validate().is_err());

        config.base_url = None;
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategies_config_validation() {
        let mut config = StrategiesConfig {
            enabled: vec!["IMLC".to_string(), "EXCO".to_string()],
        };
        assert!(config.validate().is_ok());

        config.enabled.push(" IMLC ".to_string());
        assert!(config.validate().is_err());

        config.enabled = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_locator_rejects_blank_status() {
        let config = LocatorConfig {
            enabled: true,
            excluded_statuses: vec!["CANCELLED".to_string(), "".to_string()],
        };
        assert!(config.validate().is_err());
    }
}
