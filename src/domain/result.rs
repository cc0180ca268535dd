//! Result type alias for tntrace

use super::errors::TntError;

/// Result type alias for tntrace operations
///
/// # Examples
///
/// ```
/// use tntrace::domain::result::Result;
/// use tntrace::domain::errors::TntError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TntError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TntError>;
