//! Logging and observability
//!
//! Structured logging via `tracing`: console output plus optional JSON files with
//! rotation, and a few macros for the events every invocation reports.
//!
//! # Example
//!
//! ```no_run
//! use tntrace::logging::init_logging;
//! use tntrace::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a document generation
///
/// # Example
///
/// ```no_run
/// use tntrace::log_generation_start;
///
/// log_generation_start!("EVT1", "IMLC");
/// ```
#[macro_export]
macro_rules! log_generation_start {
    ($event_id:expr, $product_code:expr) => {
        tracing::info!(
            event_id = %$event_id,
            product_code = %$product_code,
            "Starting track-and-trace generation"
        );
    };
}

/// Log the completion of a document generation
///
/// # Example
///
/// ```no_run
/// use tntrace::log_generation_complete;
/// use std::time::Duration;
///
/// log_generation_complete!("EVT1", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_generation_complete {
    ($event_id:expr, $duration:expr) => {
        tracing::info!(
            event_id = %$event_id,
            duration_ms = $duration.as_millis() as u64,
            "Track-and-trace generation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tntrace::log_error_with_context;
/// use tntrace::domain::TntError;
///
/// let error = TntError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::TntError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand() {
        let error = TntError::Lookup("courier service unavailable".to_string());
        crate::log_generation_start!("EVT1", "IMLC");
        crate::log_generation_complete!("EVT1", Duration::from_millis(5));
        crate::log_error_with_context!(&error, "courier lookup");
    }
}
