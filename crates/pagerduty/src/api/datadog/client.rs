//! Datadog PagerDuty integration API client implementation.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, warn};

use super::models::{
    ErrorResponse, PagerDutyIntegrationBody, PagerDutyIntegrationResponse, PagerDutyServiceBody,
};
use crate::api::traits::{
    ApiError, IntegrationApi, IntegrationDocument, IntegrationRequest, ServiceDocument,
};
use crate::config::DatadogConfig;

/// Path of the PagerDuty integration endpoint.
const INTEGRATION_PATH: &str = "/api/v1/integration/pagerduty";

/// Datadog integration API client.
#[derive(Clone)]
pub struct DatadogClient {
    /// HTTP client.
    client: Client,
    /// Credentials and host.
    config: DatadogConfig,
}

impl DatadogClient {
    /// Create a new Datadog client.
    ///
    /// # Errors
    /// Returns error if a key is not a valid header value or the HTTP client
    /// cannot be created.
    pub fn new(config: DatadogConfig) -> Result<Self, ApiError> {
        for (name, key) in [
            ("DD-API-KEY", config.api_key()),
            ("DD-APPLICATION-KEY", config.app_key()),
        ] {
            HeaderValue::from_str(key)
                .map_err(|_| ApiError::Config(format!("{name} contains invalid characters")))?;
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}{INTEGRATION_PATH}", self.config.host())
    }

    /// Attach Datadog authentication headers.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("DD-API-KEY", self.config.api_key())
            .header("DD-APPLICATION-KEY", self.config.app_key())
            .header("Accept", "application/json")
    }

    /// Send a full integration document with the given method.
    async fn write(
        &self,
        method: reqwest::Method,
        req: &IntegrationRequest,
    ) -> Result<(), ApiError> {
        let url = self.url();
        debug!(url = %url, method = %method, "Sending integration document");

        let body = PagerDutyIntegrationBody {
            services: req
                .services
                .iter()
                .map(|s| PagerDutyServiceBody {
                    service_name: &s.service_name,
                    service_key: &s.service_key,
                })
                .collect(),
            subdomain: &req.subdomain,
            schedules: &req.schedules,
            api_token: req.api_token.as_deref(),
        };

        let response = self
            .authed(self.client.request(method, &url))
            .json(&body)
            .send()
            .await?;

        Self::expect_success(response).await
    }

    /// Accept any 2xx status, discarding the body.
    async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(Self::error_for(status, text))
    }

    /// Map a non-2xx status and body to an [`ApiError`].
    fn error_for(status: StatusCode, text: String) -> ApiError {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .map_or(text, |e| e.errors.join("; "));

        warn!(status = %status, message = %message, "Datadog API request failed");

        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound(message)
        } else {
            ApiError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Convert the API response to our `IntegrationDocument` type.
    fn to_document(response: PagerDutyIntegrationResponse) -> IntegrationDocument {
        IntegrationDocument {
            subdomain: response.subdomain,
            api_token: response.api_token,
            schedules: response.schedules,
            services: response
                .services
                .unwrap_or_default()
                .into_iter()
                .map(|s| ServiceDocument {
                    service_name: s.service_name,
                    service_key: s.service_key,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl IntegrationApi for DatadogClient {
    async fn get_integration(&self) -> Result<IntegrationDocument, ApiError> {
        let url = self.url();
        debug!(url = %url, "GET request");

        let response = self.authed(self.client.get(&url)).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::error_for(status, text));
        }

        let parsed: PagerDutyIntegrationResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Failed to parse integration response");
            ApiError::Serialization(e)
        })?;

        Ok(Self::to_document(parsed))
    }

    async fn create_integration(&self, req: IntegrationRequest) -> Result<(), ApiError> {
        info!(
            subdomain = %req.subdomain,
            service_count = req.services.len(),
            "Creating PagerDuty integration"
        );
        self.write(reqwest::Method::POST, &req).await
    }

    async fn update_integration(&self, req: IntegrationRequest) -> Result<(), ApiError> {
        info!(
            subdomain = %req.subdomain,
            service_count = req.services.len(),
            "Updating PagerDuty integration"
        );
        self.write(reqwest::Method::PUT, &req).await
    }

    async fn delete_integration(&self) -> Result<(), ApiError> {
        let url = self.url();
        debug!(url = %url, "DELETE request");

        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::expect_success(response).await
    }
}
