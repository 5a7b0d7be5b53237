//! Declarative management of the Datadog PagerDuty integration.
//!
//! This crate reconciles the desired state of an account's PagerDuty
//! integration (services and keys, subdomain, API token, on-call schedules)
//! against the Datadog API. It exposes the lifecycle hooks an
//! infrastructure-as-code host drives: create, read, update, delete, exists
//! and import.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   IntegrationConfig   ┌───────────────────────┐
//! │  host / CLI  │──────────────────────►│ IntegrationReconciler │
//! └──────────────┘◄──────────────────────└───────────┬───────────┘
//!                   ResourceId / state               │ IntegrationApi
//!                                         ┌──────────┴──────────┐
//!                                         ▼                     ▼
//!                                   DatadogClient         MemoryBackend
//!                                   (HTTPS, reqwest)      (in-process)
//! ```
//!
//! The Datadog API stores a single PagerDuty integration per account, so the
//! resource identity is the subdomain the API reports back after create.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use datadog_pagerduty::{DatadogClient, DatadogConfig, IntegrationConfig, IntegrationReconciler};
//!
//! let client = DatadogClient::new(DatadogConfig::from_env()?)?;
//! let reconciler = IntegrationReconciler::new(Arc::new(client));
//!
//! let config = IntegrationConfig::new("testdomain")
//!     .with_api_token(token)
//!     .with_service("checkout", service_key);
//!
//! let id = reconciler.create(&config).await?;
//! let state = reconciler.read(&id).await?;
//! ```

pub mod api;
pub mod config;
pub mod resource;

pub use api::datadog::DatadogClient;
pub use api::memory::MemoryBackend;
pub use api::{ApiError, IntegrationApi, IntegrationDocument, IntegrationRequest};
pub use config::{ConfigError, DatadogConfig};
pub use resource::{
    resource_schema, IntegrationConfig, IntegrationReconciler, Phase, ReconcileError, ResourceId,
    SchemaError, ServiceBinding,
};
