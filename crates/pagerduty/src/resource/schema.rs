//! Declarative schema of the `datadog_integration_pagerduty` resource.
//!
//! The schema is the single description of the attribute surface. It is
//! printed by the CLI and used to validate configuration once, at the
//! boundary, before anything is sent to the API.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Resource type name on the declarative surface.
pub const RESOURCE_TYPE: &str = "datadog_integration_pagerduty";

/// Errors raised when configuration does not match the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The value at `path` should be an object.
    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    /// An attribute the schema does not declare.
    #[error("{path}: unsupported attribute")]
    UnknownAttribute { path: String },

    /// A required attribute is absent or null.
    #[error("{path}: required attribute is missing")]
    MissingAttribute { path: String },

    /// An attribute has the wrong type.
    #[error("{path}: expected {expected}")]
    WrongType {
        path: String,
        expected: AttributeKind,
    },

    /// A required string is blank.
    #[error("{path}: must not be empty")]
    EmptyValue { path: String },

    /// The value passed schema checks but could not be converted.
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    StringList,
    ObjectList,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::StringList => write!(f, "list of string"),
            Self::ObjectList => write!(f, "list of object"),
        }
    }
}

/// One attribute of the resource (or of a nested block).
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub required: bool,
    /// Values are credentials and must not be displayed.
    pub sensitive: bool,
    /// Changing the value requires replacing the resource.
    pub force_new: bool,
    pub description: &'static str,
    /// Attributes of each element, for [`AttributeKind::ObjectList`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<Attribute>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            sensitive: false,
            force_new: false,
            description,
            nested: Vec::new(),
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    fn with_nested(mut self, nested: Vec<Attribute>) -> Self {
        self.nested = nested;
        self
    }
}

/// Full schema of the resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub attributes: Vec<Attribute>,
}

/// Schema of the PagerDuty integration resource.
#[must_use]
pub fn resource_schema() -> ResourceSchema {
    ResourceSchema {
        type_name: RESOURCE_TYPE,
        attributes: vec![
            Attribute::new(
                "service",
                AttributeKind::ObjectList,
                "A list of service names and service keys.",
            )
            .required()
            .with_nested(vec![
                Attribute::new("service_name", AttributeKind::String, "PagerDuty service name.")
                    .required(),
                Attribute::new(
                    "service_key",
                    AttributeKind::String,
                    "PagerDuty integration key for the service.",
                )
                .required()
                .sensitive(),
            ]),
            Attribute::new(
                "subdomain",
                AttributeKind::String,
                "PagerDuty account subdomain; identifies the integration.",
            )
            .required()
            .force_new(),
            Attribute::new(
                "schedules",
                AttributeKind::StringList,
                "URLs of PagerDuty on-call schedules.",
            ),
            Attribute::new("api_token", AttributeKind::String, "PagerDuty API token.").sensitive(),
        ],
    }
}

impl ResourceSchema {
    /// Look up a top-level attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validate a loosely-typed attribute map against the schema.
    ///
    /// # Errors
    /// Returns the first violation found, with a dotted attribute path
    /// (e.g. `service.1.service_key`).
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        let object = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: self.type_name.to_string(),
        })?;
        validate_block(&self.attributes, object, "")
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_block(
    attributes: &[Attribute],
    object: &Map<String, Value>,
    prefix: &str,
) -> Result<(), SchemaError> {
    if let Some(unknown) = object
        .keys()
        .find(|k| !attributes.iter().any(|a| a.name == k.as_str()))
    {
        return Err(SchemaError::UnknownAttribute {
            path: join(prefix, unknown),
        });
    }

    for attribute in attributes {
        let path = join(prefix, attribute.name);
        match object.get(attribute.name) {
            None | Some(Value::Null) if attribute.required => {
                return Err(SchemaError::MissingAttribute { path });
            }
            None | Some(Value::Null) => {}
            Some(value) => validate_attribute(attribute, value, &path)?,
        }
    }

    Ok(())
}

fn validate_attribute(attribute: &Attribute, value: &Value, path: &str) -> Result<(), SchemaError> {
    let wrong_type = || SchemaError::WrongType {
        path: path.to_string(),
        expected: attribute.kind,
    };

    match attribute.kind {
        AttributeKind::String => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if attribute.required && s.trim().is_empty() {
                return Err(SchemaError::EmptyValue {
                    path: path.to_string(),
                });
            }
        }
        AttributeKind::StringList => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    return Err(SchemaError::WrongType {
                        path: format!("{path}.{i}"),
                        expected: AttributeKind::String,
                    });
                }
            }
        }
        AttributeKind::ObjectList => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}.{i}");
                let object = item.as_object().ok_or_else(|| SchemaError::NotAnObject {
                    path: item_path.clone(),
                })?;
                validate_block(&attribute.nested, object, &item_path)?;
            }
        }
    }

    Ok(())
}
