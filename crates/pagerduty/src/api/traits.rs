//! Integration API trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder printed instead of credential values in `Debug` output.
pub(crate) const REDACTED: &str = "<redacted>";

/// Marker the Datadog API (and older clients) put in not-found error text.
const NOT_FOUND_MARKER: &str = "404 Not Found";

/// Errors that can occur during integration API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The account has no integration configured.
    #[error("API error: 404 Not Found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether this error means the integration does not exist.
    ///
    /// Matches the typed variant, a raw 404 status, and error text carrying
    /// the `404 Not Found` marker.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, message } => *status == 404 || message.contains(NOT_FOUND_MARKER),
            Self::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            Self::Serialization(_) | Self::Config(_) => false,
        }
    }
}

// ============================================================================
// Request types
// ============================================================================

/// One PagerDuty service to register with the integration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// PagerDuty service name.
    pub service_name: String,
    /// PagerDuty integration key for the service.
    pub service_key: String,
}

impl std::fmt::Debug for ServiceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRequest")
            .field("service_name", &self.service_name)
            .field("service_key", &REDACTED)
            .finish()
    }
}

/// Full integration document sent on create and update.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntegrationRequest {
    /// PagerDuty account subdomain.
    pub subdomain: String,
    /// PagerDuty API token.
    pub api_token: Option<String>,
    /// On-call schedule URLs.
    pub schedules: Vec<String>,
    /// Services, in configuration order.
    pub services: Vec<ServiceRequest>,
}

impl std::fmt::Debug for IntegrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationRequest")
            .field("subdomain", &self.subdomain)
            .field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
            .field("schedules", &self.schedules)
            .field("services", &self.services)
            .finish()
    }
}

// ============================================================================
// Response types
// ============================================================================

/// A service entry as reported by the API. Fields may be absent on the wire.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceDocument {
    /// PagerDuty service name.
    pub service_name: Option<String>,
    /// PagerDuty integration key.
    pub service_key: Option<String>,
}

impl std::fmt::Debug for ServiceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDocument")
            .field("service_name", &self.service_name)
            .field("service_key", &self.service_key.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// The integration as currently stored by the API.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntegrationDocument {
    /// PagerDuty account subdomain.
    pub subdomain: Option<String>,
    /// PagerDuty API token (usually masked by the API).
    pub api_token: Option<String>,
    /// On-call schedule URLs.
    pub schedules: Option<Vec<String>>,
    /// Registered services, in API order.
    pub services: Vec<ServiceDocument>,
}

impl std::fmt::Debug for IntegrationDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationDocument")
            .field("subdomain", &self.subdomain)
            .field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
            .field("schedules", &self.schedules)
            .field("services", &self.services)
            .finish()
    }
}

impl From<IntegrationRequest> for IntegrationDocument {
    fn from(req: IntegrationRequest) -> Self {
        Self {
            subdomain: Some(req.subdomain),
            api_token: req.api_token,
            schedules: Some(req.schedules),
            services: req
                .services
                .into_iter()
                .map(|s| ServiceDocument {
                    service_name: Some(s.service_name),
                    service_key: Some(s.service_key),
                })
                .collect(),
        }
    }
}

/// Remote store of the account's PagerDuty integration.
///
/// The API models exactly one integration per account, so no operation takes
/// an identifier.
#[async_trait]
pub trait IntegrationApi: Send + Sync {
    /// Fetch the current integration.
    async fn get_integration(&self) -> Result<IntegrationDocument, ApiError>;

    /// Create the integration from a full document.
    async fn create_integration(&self, req: IntegrationRequest) -> Result<(), ApiError>;

    /// Replace the integration with a full document.
    async fn update_integration(&self, req: IntegrationRequest) -> Result<(), ApiError>;

    /// Remove the integration.
    async fn delete_integration(&self) -> Result<(), ApiError>;
}
