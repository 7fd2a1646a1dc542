use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ResourceError;

/// Root operation type of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Query,
    Mutation,
}

impl OpType {
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

/// Request body: one root field with its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphRequest {
    pub kind: OpType,
    pub field: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphError {
    pub message: String,
    pub extensions: ErrorExtensions,
}

impl GraphError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: ErrorExtensions {
                code: code.to_owned(),
            },
        }
    }

    #[must_use]
    pub fn unknown_field(kind: OpType, field: &str) -> Self {
        Self::new(
            "GRAPHQL_VALIDATION_FAILED",
            format!("Cannot query field \"{field}\" on type \"{}\"", kind.type_name()),
        )
    }
}

impl From<ResourceError> for GraphError {
    fn from(e: ResourceError) -> Self {
        match &e {
            ResourceError::Unauthenticated => Self::new("UNAUTHENTICATED", e.to_string()),
            ResourceError::Denied { .. } => Self::new("FORBIDDEN", e.to_string()),
            ResourceError::NotFound { .. } => Self::new("NOT_FOUND", e.to_string()),
            ResourceError::Validation { .. } => Self::new("BAD_USER_INPUT", e.to_string()),
            ResourceError::Store(_) | ResourceError::Internal(_) => {
                tracing::error!(error = %e, "resolver failed");
                Self::new("INTERNAL_SERVER_ERROR", "An internal error occurred")
            }
        }
    }
}

/// Response body: `data` keyed by the requested field, or `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphError>,
}

impl GraphResponse {
    #[must_use]
    pub fn data(field: &str, value: Value) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(field.to_owned(), value);
        Self {
            data: Some(Value::Object(data)),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(error: GraphError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }
}
