use serde::Serialize;
use serde_json::Value;

use super::request::Encoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// `ASC` when the direction text contains `ASC`; anything else sorts
    /// descending.
    #[must_use]
    pub fn from_text(direction: &str) -> Self {
        if direction.contains("ASC") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDir,
}

/// Decode a `[field, direction]` sort argument.
///
/// A missing direction sorts descending. Anything else that does not have
/// a string field in first position is ignored.
#[must_use]
pub fn decode_sort(sort: &Encoded) -> Option<SortSpec> {
    let Some(value) = sort.decode() else {
        tracing::warn!(?sort, "sort is not valid JSON, ignoring");
        return None;
    };
    let Value::Array(items) = value else {
        tracing::warn!(value = %value, "sort is not an array, ignoring");
        return None;
    };
    let Some(field) = items.first().and_then(Value::as_str) else {
        tracing::warn!("sort has no field, ignoring");
        return None;
    };
    let direction = items
        .get(1)
        .and_then(Value::as_str)
        .map_or(SortDir::Desc, SortDir::from_text);
    Some(SortSpec {
        field: field.to_owned(),
        direction,
    })
}
