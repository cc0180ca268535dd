//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TntConfig;
use crate::config::secret_string;
use crate::domain::errors::TntError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TntConfig
/// 4. Applies environment variable overrides (TNT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `TntError::Configuration` if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tntrace::config::loader::load_config;
///
/// let config = load_config("tntrace.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TntConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TntError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TntError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitutions, overrides and validation
pub fn parse_config(contents: &str) -> Result<TntConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TntConfig = toml::from_str(&contents)
        .map_err(|e| TntError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TntError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap())
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(TntError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    value.trim().parse().map_err(|_| {
        TntError::Configuration(format!("{name} must be true or false, got '{value}'"))
    })
}

/// Applies environment variable overrides using TNT_* prefix
///
/// Environment variables follow the pattern: TNT_<SECTION>_<KEY>
/// For example: TNT_OUTPUT_DIRECTORY, TNT_SERVICES_API_TOKEN
fn apply_env_overrides(config: &mut TntConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TNT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("TNT_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_bool("TNT_APPLICATION_DRY_RUN", &val)?;
    }

    // Output overrides
    if let Ok(val) = std::env::var("TNT_OUTPUT_DIRECTORY") {
        config.output.directory = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("TNT_OUTPUT_TIME_ZONE") {
        config.output.time_zone = val;
    }

    // Services overrides
    if let Ok(val) = std::env::var("TNT_SERVICES_BASE_URL") {
        config.services.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("TNT_SERVICES_API_TOKEN") {
        config.services.api_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("TNT_SERVICES_TIMEOUT_SECONDS") {
        config.services.timeout_seconds = val.trim().parse().map_err(|_| {
            TntError::Configuration(format!(
                "TNT_SERVICES_TIMEOUT_SECONDS must be a number, got '{val}'"
            ))
        })?;
    }

    // Locator overrides
    if let Ok(val) = std::env::var("TNT_LOCATOR_ENABLED") {
        config.locator.enabled = parse_bool("TNT_LOCATOR_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("TNT_LOCATOR_EXCLUDED_STATUSES") {
        config.locator.excluded_statuses = split_list(&val);
    }

    // Strategy overrides
    if let Ok(val) = std::env::var("TNT_STRATEGIES_ENABLED") {
        config.strategies.enabled = split_list(&val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TNT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("TNT_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("TNT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Splits a comma-separated list, dropping blank entries
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
