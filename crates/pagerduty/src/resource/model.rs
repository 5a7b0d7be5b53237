//! Desired-state types for the PagerDuty integration resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ReconcileError;
use super::schema::{resource_schema, SchemaError};
use crate::api::traits::{IntegrationDocument, IntegrationRequest, ServiceRequest, REDACTED};

/// Identity of the resource: the subdomain reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new identifier, returning `None` if the value is blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A PagerDuty service and its integration key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceBinding {
    pub service_name: String,
    pub service_key: String,
}

impl ServiceBinding {
    pub fn new(service_name: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_key: service_key.into(),
        }
    }
}

impl std::fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBinding")
            .field("service_name", &self.service_name)
            .field("service_key", &REDACTED)
            .finish()
    }
}

/// Desired state of the account's PagerDuty integration.
///
/// Serialized attribute names match the resource schema: `subdomain`,
/// `api_token`, `schedules` and `service`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegrationConfig {
    /// PagerDuty account subdomain. Also the resource identity.
    pub subdomain: String,

    /// PagerDuty API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// On-call schedule URLs, in order.
    #[serde(default)]
    pub schedules: Vec<String>,

    /// Services, in order.
    #[serde(rename = "service")]
    pub services: Vec<ServiceBinding>,
}

impl IntegrationConfig {
    /// Start a config with only a subdomain.
    pub fn new(subdomain: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            api_token: None,
            schedules: Vec::new(),
            services: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedules.push(schedule.into());
        self
    }

    #[must_use]
    pub fn with_service(
        mut self,
        service_name: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        self.services.push(ServiceBinding::new(service_name, service_key));
        self
    }

    /// Parse a loosely-typed attribute map, validating it against the schema.
    ///
    /// # Errors
    /// Returns error if the value does not satisfy the resource schema.
    pub fn from_value(mut value: Value) -> Result<Self, SchemaError> {
        resource_schema().validate(&value)?;

        // Null optional attributes mean "unset".
        if let Some(object) = value.as_object_mut() {
            object.retain(|_, v| !v.is_null());
        }

        serde_json::from_value(value).map_err(|e| SchemaError::Malformed(e.to_string()))
    }

    /// Check a config built in code against the resource schema.
    ///
    /// # Errors
    /// Returns error if a required attribute is blank.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let value = serde_json::to_value(self).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        resource_schema().validate(&value)
    }

    /// Build the API request carrying this full document.
    #[must_use]
    pub fn to_request(&self) -> IntegrationRequest {
        IntegrationRequest {
            subdomain: self.subdomain.clone(),
            api_token: self.api_token.clone(),
            schedules: self.schedules.clone(),
            services: self
                .services
                .iter()
                .map(|s| ServiceRequest {
                    service_name: s.service_name.clone(),
                    service_key: s.service_key.clone(),
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for IntegrationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationConfig")
            .field("subdomain", &self.subdomain)
            .field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
            .field("schedules", &self.schedules)
            .field("services", &self.services)
            .finish()
    }
}

impl TryFrom<IntegrationDocument> for IntegrationConfig {
    type Error = ReconcileError;

    /// Decode remote state. Every service must carry both fields and the
    /// document must carry a subdomain.
    fn try_from(doc: IntegrationDocument) -> Result<Self, Self::Error> {
        let services = doc
            .services
            .into_iter()
            .enumerate()
            .map(|(i, s)| -> Result<ServiceBinding, ReconcileError> {
                let service_name = s
                    .service_name
                    .ok_or_else(|| ReconcileError::missing(format!("service.{i}.service_name")))?;
                let service_key = s
                    .service_key
                    .ok_or_else(|| ReconcileError::missing(format!("service.{i}.service_key")))?;
                Ok(ServiceBinding {
                    service_name,
                    service_key,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subdomain = doc
            .subdomain
            .ok_or_else(|| ReconcileError::missing("subdomain"))?;

        Ok(Self {
            subdomain,
            api_token: doc.api_token,
            schedules: doc.schedules.unwrap_or_default(),
            services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::traits::ServiceDocument;
    use serde_json::json;

    #[test]
    fn test_resource_id_rejects_blank() {
        assert!(ResourceId::new("").is_none());
        assert!(ResourceId::new("  ").is_none());
        assert_eq!(ResourceId::new("testdomain").unwrap().as_str(), "testdomain");
    }

    #[test]
    fn test_from_value_uses_service_attribute() {
        let config = IntegrationConfig::from_value(json!({
            "subdomain": "testdomain",
            "api_token": "*****",
            "service": [
                {"service_name": "test_service", "service_key": "*****"},
                {"service_name": "test_service_2", "service_key": "*****"}
            ]
        }))
        .unwrap();

        assert_eq!(config.subdomain, "testdomain");
        assert_eq!(config.api_token.as_deref(), Some("*****"));
        assert!(config.schedules.is_empty());
        assert_eq!(config.services[0].service_name, "test_service");
        assert_eq!(config.services[1].service_name, "test_service_2");
    }

    #[test]
    fn test_serialize_round_trips_attribute_names() {
        let config = IntegrationConfig::new("testdomain").with_service("svc1", "key1");
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["service"][0]["service_key"], "key1");
        assert!(value.get("api_token").is_none());
        assert_eq!(IntegrationConfig::from_value(value).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_blank_subdomain() {
        let err = IntegrationConfig::new("").validate().unwrap_err();
        assert!(err.to_string().contains("subdomain"));
    }

    #[test]
    fn test_to_request_preserves_order() {
        let req = IntegrationConfig::new("testdomain")
            .with_api_token("tok")
            .with_schedule("https://testdomain.pagerduty.com/schedules#PX1")
            .with_service("a", "1")
            .with_service("b", "2")
            .to_request();

        assert_eq!(req.api_token.as_deref(), Some("tok"));
        assert_eq!(req.schedules.len(), 1);
        let names: Vec<_> = req.services.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_decode_missing_service_key() {
        let doc = IntegrationDocument {
            subdomain: Some("testdomain".to_string()),
            services: vec![
                ServiceDocument {
                    service_name: Some("svc1".to_string()),
                    service_key: Some("key1".to_string()),
                },
                ServiceDocument {
                    service_name: Some("svc2".to_string()),
                    service_key: None,
                },
            ],
            ..Default::default()
        };

        let err = IntegrationConfig::try_from(doc).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Decode { ref path } if path == "service.1.service_key"
        ));
    }

    #[test]
    fn test_decode_defaults_optional_fields() {
        let doc = IntegrationDocument {
            subdomain: Some("testdomain".to_string()),
            ..Default::default()
        };

        let config = IntegrationConfig::try_from(doc).unwrap();
        assert_eq!(config, IntegrationConfig::new("testdomain"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = IntegrationConfig::new("testdomain")
            .with_api_token("tok-secret")
            .with_service("svc1", "key-secret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("svc1"));
        assert!(!rendered.contains("tok-secret"));
        assert!(!rendered.contains("key-secret"));
    }
}
