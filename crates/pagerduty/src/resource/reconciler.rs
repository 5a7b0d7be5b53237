//! Lifecycle operations of the PagerDuty integration resource.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{Phase, ReconcileError};
use super::model::{IntegrationConfig, ResourceId};
use crate::api::traits::IntegrationApi;

/// Reconciles desired integration state against the remote API.
///
/// Every operation issues its remote calls in sequence and keeps no state
/// between calls. Nothing is retried; each failure is returned wrapped with
/// the [`Phase`] that produced it.
#[derive(Clone)]
pub struct IntegrationReconciler {
    api: Arc<dyn IntegrationApi>,
}

impl IntegrationReconciler {
    /// Create a reconciler issuing calls through `api`.
    #[must_use]
    pub fn new(api: Arc<dyn IntegrationApi>) -> Self {
        Self { api }
    }

    /// Check whether the integration exists.
    ///
    /// A not-found response is `Ok(false)`; any other failure is an error.
    ///
    /// # Errors
    /// Returns error if the remote call fails for another reason.
    pub async fn exists(&self, id: &ResourceId) -> Result<bool, ReconcileError> {
        match self.api.get_integration().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(id = %id, "Integration not found");
                Ok(false)
            }
            Err(e) => Err(ReconcileError::remote(Phase::Exists)(e)),
        }
    }

    /// Create the integration and return the identity reported by the API.
    ///
    /// # Errors
    /// Returns error if the config is invalid, the write fails, or the
    /// read-back fails or lacks a subdomain.
    pub async fn create(&self, config: &IntegrationConfig) -> Result<ResourceId, ReconcileError> {
        config.validate()?;

        info!(
            subdomain = %config.subdomain,
            service_count = config.services.len(),
            schedule_count = config.schedules.len(),
            "Creating integration"
        );

        self.api
            .create_integration(config.to_request())
            .await
            .map_err(ReconcileError::remote(Phase::Create))?;

        let doc = self
            .api
            .get_integration()
            .await
            .map_err(ReconcileError::remote(Phase::ReadBack))?;

        let id = doc
            .subdomain
            .and_then(ResourceId::new)
            .ok_or_else(|| ReconcileError::missing("subdomain"))?;

        info!(id = %id, "Integration created");
        Ok(id)
    }

    /// Read the remote state into the desired-state shape.
    ///
    /// The API holds one integration per account, so `id` does not scope
    /// the request.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the response lacks a
    /// required field.
    pub async fn read(&self, id: &ResourceId) -> Result<IntegrationConfig, ReconcileError> {
        let doc = self
            .api
            .get_integration()
            .await
            .map_err(ReconcileError::remote(Phase::Read))?;

        let config = IntegrationConfig::try_from(doc)?;

        if config.subdomain != id.as_str() {
            warn!(
                id = %id,
                remote_subdomain = %config.subdomain,
                "Remote subdomain differs from resource id"
            );
        }

        debug!(
            id = %id,
            service_count = config.services.len(),
            "Integration read"
        );
        Ok(config)
    }

    /// Write the full desired document over the remote integration.
    ///
    /// # Errors
    /// Returns error if the config is invalid, tries to change the
    /// subdomain, or the remote write fails.
    pub async fn update(
        &self,
        id: &ResourceId,
        config: &IntegrationConfig,
    ) -> Result<(), ReconcileError> {
        config.validate()?;

        if config.subdomain != id.as_str() {
            return Err(ReconcileError::SubdomainChanged {
                from: id.to_string(),
                to: config.subdomain.clone(),
            });
        }

        info!(
            id = %id,
            service_count = config.services.len(),
            schedule_count = config.schedules.len(),
            "Updating integration"
        );

        self.api
            .update_integration(config.to_request())
            .await
            .map_err(ReconcileError::remote(Phase::Update))
    }

    /// Delete the integration.
    ///
    /// # Errors
    /// Returns error if the remote call fails.
    pub async fn delete(&self, id: &ResourceId) -> Result<(), ReconcileError> {
        info!(id = %id, "Deleting integration");

        self.api
            .delete_integration()
            .await
            .map_err(ReconcileError::remote(Phase::Delete))
    }

    /// Import an existing integration. Identical to [`Self::read`].
    ///
    /// # Errors
    /// Same as [`Self::read`].
    pub async fn import(&self, id: &ResourceId) -> Result<IntegrationConfig, ReconcileError> {
        info!(id = %id, "Importing integration");
        self.read(id).await
    }
}
