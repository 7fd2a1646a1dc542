use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A filter or sort argument as it arrives from a transport.
///
/// REST passes JSON-encoded strings in the query string; the query/mutation
/// binding usually passes structured JSON. Both shapes are accepted and
/// decoded lazily by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Encoded {
    Text(String),
    Structured(Value),
}

impl Encoded {
    /// Decode into a JSON value. `None` when the text is not valid JSON.
    #[must_use]
    pub fn decode(&self) -> Option<Value> {
        match self {
            Self::Text(s) => serde_json::from_str(s).ok(),
            Self::Structured(v) => Some(v.clone()),
        }
    }
}

impl From<&str> for Encoded {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Encoded {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for Encoded {
    fn from(v: Value) -> Self {
        Self::Structured(v)
    }
}

/// Caller-supplied list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationRequest {
    /// Field → value mapping, structured or JSON-encoded.
    pub filter: Option<Encoded>,
    /// `[field, direction]`, structured or JSON-encoded.
    pub sort: Option<Encoded>,
    /// Number of records to skip.
    pub offset: Option<u64>,
    /// Maximum number of records to return.
    pub limit: Option<u64>,
}

impl PaginationRequest {
    #[must_use]
    pub fn with_filter_text(mut self, filter: &str) -> Self {
        self.filter = Some(Encoded::from(filter));
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(Encoded::Structured(filter));
        self
    }

    #[must_use]
    pub fn with_sort_text(mut self, sort: &str) -> Self {
        self.sort = Some(Encoded::from(sort));
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort = Some(Encoded::Structured(sort));
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter-only request used by bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInfo {
    pub filter: Option<Encoded>,
}

impl FilterInfo {
    #[must_use]
    pub fn new(filter: impl Into<Encoded>) -> Self {
        Self {
            filter: Some(filter.into()),
        }
    }
}
