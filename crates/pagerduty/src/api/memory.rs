//! In-memory integration backend.
//!
//! A pure store: create and update replace the stored document, delete
//! clears it, get returns it verbatim. Get, update and delete on an empty
//! store report not-found. Used for dry runs and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::api::traits::{ApiError, IntegrationApi, IntegrationDocument, IntegrationRequest};

/// [`IntegrationApi`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RwLock<Option<IntegrationDocument>>,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// Create an empty backend (no integration configured).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend already holding `document`, which may be malformed.
    #[must_use]
    pub fn with_document(document: IntegrationDocument) -> Self {
        Self {
            document: RwLock::new(Some(document)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the stored document.
    pub async fn document(&self) -> Option<IntegrationDocument> {
        self.document.read().await.clone()
    }

    /// Number of create, update and delete calls received.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntegrationApi for MemoryBackend {
    async fn get_integration(&self) -> Result<IntegrationDocument, ApiError> {
        self.document
            .read()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound("integration pagerduty not configured".to_string()))
    }

    async fn create_integration(&self, req: IntegrationRequest) -> Result<(), ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(subdomain = %req.subdomain, "Storing integration");
        *self.document.write().await = Some(req.into());
        Ok(())
    }

    async fn update_integration(&self, req: IntegrationRequest) -> Result<(), ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.document.write().await;
        if guard.is_none() {
            return Err(ApiError::NotFound(
                "integration pagerduty not configured".to_string(),
            ));
        }
        debug!(subdomain = %req.subdomain, "Replacing integration");
        *guard = Some(req.into());
        Ok(())
    }

    async fn delete_integration(&self) -> Result<(), ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.document
            .write()
            .await
            .take()
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound("integration pagerduty not configured".to_string()))
    }
}
