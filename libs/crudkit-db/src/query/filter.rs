use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::ID_FIELD;
use super::predicate::Predicate;
use super::request::Encoded;

/// Filter key whose array value selects records by identity.
pub const IDS_KEY: &str = "ids";

/// Result of a per-field transform.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    /// Leave the value alone; the default substring match applies.
    Unchanged,
    /// Use a different value; the default substring match applies to it.
    Rewritten(Value),
    /// Replace the default condition entirely.
    Predicate(Predicate),
}

type TransformFn = dyn Fn(&str, &Value) -> Transformed + Send + Sync;

/// Per-field value transforms, keyed by filter field name.
///
/// A transform receives the query alias and the raw value. Returning
/// [`Transformed::Predicate`] replaces the default `LIKE '%v%'` condition
/// for that field.
#[derive(Clone, Default)]
pub struct FieldTransforms {
    inner: HashMap<String, Arc<TransformFn>>,
}

impl fmt::Debug for FieldTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.inner.keys().collect();
        keys.sort();
        f.debug_struct("FieldTransforms")
            .field("fields", &keys)
            .finish()
    }
}

impl FieldTransforms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform for `field`, replacing any previous one.
    #[must_use]
    pub fn with<F>(mut self, field: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &Value) -> Transformed + Send + Sync + 'static,
    {
        self.inner.insert(field.into(), Arc::new(f));
        self
    }

    /// Match `field` exactly instead of by substring.
    #[must_use]
    pub fn equals(self, field: &str) -> Self {
        let name = field.to_owned();
        self.with(field, move |_alias, value| {
            Transformed::Predicate(Predicate::equals(name.clone(), value.clone()))
        })
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&TransformFn> {
        self.inner.get(field).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Decode a filter argument into a field → value map.
///
/// Anything that is not a JSON object (including text that fails to parse)
/// yields `None` and is logged; callers treat that as "no filter".
#[must_use]
pub fn decode_filter(filter: &Encoded) -> Option<Map<String, Value>> {
    match filter.decode() {
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            tracing::warn!(value = %other, "filter is not an object, ignoring");
            None
        }
        None => {
            tracing::warn!(?filter, "filter is not valid JSON, ignoring");
            None
        }
    }
}

/// Compile one decoded filter entry into at most one predicate.
pub(super) fn entry_predicate(
    alias: &str,
    key: &str,
    value: &Value,
    transforms: Option<&FieldTransforms>,
) -> Option<Predicate> {
    match value {
        Value::Array(items) if key == IDS_KEY => {
            Some(Predicate::is_in(ID_FIELD, items.clone()))
        }
        Value::Array(_) => {
            tracing::debug!(field = key, "array value on non-ids key, skipping");
            None
        }
        Value::Null | Value::Object(_) => {
            tracing::debug!(field = key, "null or nested value, skipping");
            None
        }
        scalar => {
            let rewritten = match transforms.and_then(|t| t.get(key)) {
                Some(f) => match f(alias, scalar) {
                    Transformed::Predicate(p) => return Some(p),
                    Transformed::Rewritten(v) => v,
                    Transformed::Unchanged => scalar.clone(),
                },
                None => scalar.clone(),
            };
            Some(Predicate::contains(key, &scalar_text(&rewritten)?))
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
