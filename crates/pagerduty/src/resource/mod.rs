//! The `datadog_integration_pagerduty` resource.
//!
//! - [`schema`] declares the attribute surface and validates configuration
//! - [`model`] holds the strongly-typed desired state
//! - [`IntegrationReconciler`] runs the lifecycle operations against an
//!   [`IntegrationApi`](crate::api::IntegrationApi)

pub mod error;
pub mod model;
pub mod reconciler;
pub mod schema;

pub use error::{Phase, ReconcileError};
pub use model::{IntegrationConfig, ResourceId, ServiceBinding};
pub use reconciler::IntegrationReconciler;
pub use schema::{resource_schema, Attribute, AttributeKind, ResourceSchema, SchemaError};
