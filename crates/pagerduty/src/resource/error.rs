//! Error types for the resource lifecycle.

use thiserror::Error;

use super::schema::SchemaError;
use crate::api::traits::ApiError;

/// Lifecycle step that issued a failing remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Exists,
    Create,
    /// The read that follows a successful create.
    ReadBack,
    Read,
    Update,
    Delete,
}

impl Phase {
    /// What the step was trying to do, for error messages.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Exists => "check integration pagerduty",
            Self::Create => "create integration pagerduty using Datadog API",
            Self::ReadBack => "retrieve integration pagerduty after create",
            Self::Read => "read integration pagerduty",
            Self::Update => "update integration pagerduty",
            Self::Delete => "delete integration pagerduty",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::Create => write!(f, "create"),
            Self::ReadBack => write!(f, "read-back"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Errors returned by [`IntegrationReconciler`](super::IntegrationReconciler).
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A remote call failed.
    #[error("failed to {}: {source}", .phase.action())]
    Remote {
        phase: Phase,
        #[source]
        source: ApiError,
    },

    /// The API response lacks a field the resource requires.
    #[error("invalid API response: missing required field '{path}'")]
    Decode { path: String },

    /// The desired state does not satisfy the resource schema.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] SchemaError),

    /// An update tried to change the resource identity.
    #[error("subdomain cannot change from '{from}' to '{to}'; the integration must be replaced")]
    SubdomainChanged { from: String, to: String },
}

impl ReconcileError {
    pub(crate) fn remote(phase: Phase) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Remote { phase, source }
    }

    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::Decode { path: path.into() }
    }

    /// Phase of a remote failure.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Remote { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Whether the remote integration does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { source, .. } if source.is_not_found())
    }
}
