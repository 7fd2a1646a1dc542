use crudkit_db::{Encoded, FilterInfo, PaginationRequest};
use serde::Deserialize;

/// Query string of `GET /{name}`. `filter` and `sort` are JSON-encoded.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<ListQuery> for PaginationRequest {
    fn from(q: ListQuery) -> Self {
        Self {
            filter: q.filter.map(Encoded::Text),
            sort: q.sort.map(Encoded::Text),
            offset: q.offset,
            limit: q.limit,
        }
    }
}

/// Query string of `DELETE /{name}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

impl From<FilterQuery> for FilterInfo {
    fn from(q: FilterQuery) -> Self {
        Self {
            filter: q.filter.map(Encoded::Text),
        }
    }
}
