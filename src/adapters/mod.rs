//! Collaborator service integrations for tntrace.
//!
//! - [`traits`] - the collaborator seams the core calls through
//! - [`http`] - REST client implementing every collaborator
//! - [`memory`] - fixture-backed implementation for offline runs and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use tntrace::adapters::http::ServiceClient;
//! use tntrace::adapters::traits::CourierLookup;
//! use tntrace::config::ServicesConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServicesConfig {
//!     base_url: Some("https://tnt-services.example.com/api".to_string()),
//!     ..Default::default()
//! };
//! let client = ServiceClient::new(&config)?;
//! let courier = client.courier_details("BR", "IN", "EVT1").await?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod memory;
pub mod traits;
