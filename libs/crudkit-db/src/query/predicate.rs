use serde::Serialize;
use serde_json::Value;

/// A single backend-neutral filter condition.
///
/// Field names are plain identifiers qualified by the query alias at render
/// time; values are always carried separately and bound as parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// `alias.field = value`
    Equals { field: String, value: Value },
    /// `alias.field LIKE pattern`
    Like { field: String, pattern: String },
    /// `alias.field IN (values...)`
    In { field: String, values: Vec<Value> },
    /// Custom SQL fragment from a field transform. `?` placeholders in `sql`
    /// are bound to `values` in order.
    Raw { sql: String, values: Vec<Value> },
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Substring match: wraps `needle` as `%needle%`.
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Self::Like {
            field: field.into(),
            pattern: format!("%{needle}%"),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            field: field.into(),
            values,
        }
    }

    /// The field this predicate constrains, if it names one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Equals { field, .. } | Self::Like { field, .. } | Self::In { field, .. } => {
                Some(field)
            }
            Self::Raw { .. } => None,
        }
    }
}
