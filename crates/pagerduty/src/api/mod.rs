//! Integration API backends.
//!
//! This module contains the [`IntegrationApi`] trait and its implementations:
//! the Datadog HTTP client and an in-memory store.

pub mod datadog;
pub mod memory;
pub mod traits;

pub use traits::{
    ApiError, IntegrationApi, IntegrationDocument, IntegrationRequest, ServiceDocument,
    ServiceRequest,
};
