use serde::Serialize;

use super::filter::{FieldTransforms, decode_filter, entry_predicate};
use super::predicate::Predicate;
use super::request::{Encoded, PaginationRequest};
use super::sort::{SortSpec, decode_sort};

/// Backend-neutral output of [`compile`].
///
/// Predicates are conjunctive. An empty list means "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub alias: String,
    pub predicates: Vec<Predicate>,
    pub order: Option<SortSpec>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl CompiledQuery {
    /// True when the query constrains nothing.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Compile a list request against `alias`.
///
/// Malformed filter text produces no predicates; malformed sort produces no
/// ordering. Offset and limit pass through.
#[must_use]
pub fn compile(
    req: &PaginationRequest,
    alias: &str,
    transforms: Option<&FieldTransforms>,
) -> CompiledQuery {
    let predicates = req
        .filter
        .as_ref()
        .map(|f| compile_filter(f, alias, transforms))
        .unwrap_or_default();

    let order = req.sort.as_ref().and_then(decode_sort);
    if let Some(order) = &order {
        tracing::debug!(field = %order.field, direction = ?order.direction, "sort body");
    }

    CompiledQuery {
        alias: alias.to_owned(),
        predicates,
        order,
        offset: req.offset,
        limit: req.limit,
    }
}

/// Compile just the filter part, e.g. for bulk delete.
#[must_use]
pub fn compile_filter(
    filter: &Encoded,
    alias: &str,
    transforms: Option<&FieldTransforms>,
) -> Vec<Predicate> {
    let Some(map) = decode_filter(filter) else {
        tracing::debug!(alias, "no filter");
        return Vec::new();
    };
    tracing::debug!(alias, body = %serde_json::Value::Object(map.clone()), "where body");

    map.iter()
        .filter_map(|(key, value)| entry_predicate(alias, key, value, transforms))
        .collect()
}
