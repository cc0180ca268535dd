//! Generation summary and reporting
//!
//! Collects the outcome of a batch of invocations for the CLI report.

use crate::core::generate::GeneratedDocument;
use crate::domain::TntError;
use std::time::Duration;

/// Summary of a generation run over several inputs
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    /// Total number of inputs processed
    pub total_inputs: usize,

    /// Number of inputs that produced a record
    pub successful: usize,

    /// Number of inputs that failed
    pub failed: usize,

    /// Documents written (empty in dry-run mode)
    pub documents: Vec<GeneratedDocument>,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered, one per failed input
    pub errors: Vec<GenerationError>,
}

impl GenerationSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a successful input
    pub fn add_success(&mut self, document: Option<GeneratedDocument>) {
        self.total_inputs += 1;
        self.successful += 1;
        self.documents.extend(document);
    }

    /// Record a failed input
    pub fn add_failure(&mut self, error: GenerationError) {
        self.total_inputs += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    /// Check if every input succeeded
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_inputs = self.total_inputs,
            successful = self.successful,
            failed = self.failed,
            documents = self.documents.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Generation completed"
        );

        for error in &self.errors {
            tracing::warn!(
                error_type = ?error.error_type,
                input = %error.input,
                retryable = error.retryable,
                message = %error.message,
                "Generation error"
            );
        }
    }
}

/// Type of generation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorType {
    /// Bad or missing input, unknown field identifiers
    Validation,
    /// No strategy for the product code
    Dispatch,
    /// Record could not be encoded
    Serialization,
    /// Filesystem failure
    Io,
    /// Collaborator service failure
    Lookup,
    /// Configuration error
    Configuration,
    /// Anything else
    Unknown,
}

impl From<&TntError> for GenerationErrorType {
    fn from(err: &TntError) -> Self {
        match err {
            TntError::Validation(_) => Self::Validation,
            TntError::DispatchNotFound { .. } | TntError::DuplicateStrategy { .. } => Self::Dispatch,
            TntError::Serialization { .. } => Self::Serialization,
            TntError::Io { .. } => Self::Io,
            TntError::Lookup(_) => Self::Lookup,
            TntError::Configuration(_) => Self::Configuration,
            TntError::Other(_) => Self::Unknown,
        }
    }
}

/// Generation error with the input it belongs to
#[derive(Debug, Clone)]
pub struct GenerationError {
    pub error_type: GenerationErrorType,

    /// Input label (bundle path or index)
    pub input: String,

    pub message: String,

    /// Whether rerunning the input may succeed
    pub retryable: bool,
}

impl GenerationError {
    /// Builds an error entry from a failed invocation
    pub fn from_error(input: impl Into<String>, err: &TntError) -> Self {
        Self {
            error_type: GenerationErrorType::from(err),
            input: input.into(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}
