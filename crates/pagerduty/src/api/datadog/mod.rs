//! Datadog integration API backend.
//!
//! Implements the [`IntegrationApi`](crate::api::IntegrationApi) trait against
//! Datadog's v1 PagerDuty integration endpoint.
//!
//! ## Example
//!
//! ```ignore
//! use datadog_pagerduty::api::datadog::DatadogClient;
//! use datadog_pagerduty::api::IntegrationApi;
//! use datadog_pagerduty::DatadogConfig;
//!
//! let client = DatadogClient::new(DatadogConfig::from_env()?)?;
//!
//! let integration = client.get_integration().await?;
//! println!("subdomain: {:?}", integration.subdomain);
//! ```

mod client;
mod models;

pub use client::DatadogClient;
pub use models::*;
