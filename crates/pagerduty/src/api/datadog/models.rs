//! Datadog PagerDuty integration API models.
//!
//! Wire shapes of `/api/v1/integration/pagerduty`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request bodies
// ============================================================================

/// Body for `POST` and `PUT` on the integration endpoint.
#[derive(Debug, Serialize)]
pub struct PagerDutyIntegrationBody<'a> {
    /// Services to register.
    pub services: Vec<PagerDutyServiceBody<'a>>,
    /// PagerDuty account subdomain.
    pub subdomain: &'a str,
    /// Schedule URLs.
    pub schedules: &'a [String],
    /// PagerDuty API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<&'a str>,
}

/// One service inside [`PagerDutyIntegrationBody`].
#[derive(Debug, Serialize)]
pub struct PagerDutyServiceBody<'a> {
    /// Service name.
    pub service_name: &'a str,
    /// Service integration key.
    pub service_key: &'a str,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Body returned by `GET` on the integration endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PagerDutyIntegrationResponse {
    /// Registered services. `null` and absent both mean none.
    pub services: Option<Vec<PagerDutyServiceResponse>>,
    /// PagerDuty account subdomain.
    pub subdomain: Option<String>,
    /// Schedule URLs.
    pub schedules: Option<Vec<String>>,
    /// PagerDuty API token (masked by Datadog).
    pub api_token: Option<String>,
}

/// One service inside [`PagerDutyIntegrationResponse`].
#[derive(Debug, Default, Deserialize)]
pub struct PagerDutyServiceResponse {
    /// Service name.
    pub service_name: Option<String>,
    /// Service integration key (masked by Datadog).
    pub service_key: Option<String>,
}

/// Error body Datadog returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error messages.
    #[serde(default)]
    pub errors: Vec<String>,
}
