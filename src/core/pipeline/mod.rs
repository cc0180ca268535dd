//! Invocation pipeline
//!
//! [`TrackTraceCoordinator`] runs one request through resolution, enrichment, field
//! selection, attachment classification and document generation.
//! [`GenerationSummary`] aggregates the outcomes of a multi-input run.

pub mod coordinator;
pub mod summary;

pub use coordinator::{
    Collaborators, CoordinatorOptions, ProcessOutcome, TrackTraceCoordinator, TrackTraceInput,
};
pub use summary::{GenerationError, GenerationErrorType, GenerationSummary};
