//! Domain identifier types with validation
//!
//! Newtype wrappers for the two identifiers that carry structural meaning in the
//! pipeline: the product code (strategy dispatch key) and the event id (document
//! file name component).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product code newtype wrapper
///
/// Keys the strategy registry. Surrounding whitespace is dropped.
///
/// # Examples
///
/// ```
/// use tntrace::domain::ids::ProductCode;
/// use std::str::FromStr;
///
/// let code = ProductCode::from_str(" IMLC ").unwrap();
/// assert_eq!(code.as_str(), "IMLC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductCode(String);

impl ProductCode {
    /// Creates a new ProductCode, rejecting blank values
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err("Product code cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the product code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Event identifier newtype wrapper
///
/// An event id ends up inside a document file name, so besides being non-blank it
/// must not contain path separators or parent-directory references.
///
/// # Examples
///
/// ```
/// use tntrace::domain::ids::EventId;
///
/// assert!(EventId::new("EVT-2024-0001").is_ok());
/// assert!(EventId::new("../etc/passwd").is_err());
/// assert!(EventId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Creates a new EventId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Event ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(format!(
                "Event ID '{id}' cannot contain path separators or '..'"
            ));
        }
        if id.chars().any(char::is_control) {
            return Err("Event ID cannot contain control characters".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the event id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
