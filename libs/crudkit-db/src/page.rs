use serde::{Deserialize, Serialize};

/// One page of records plus the total number matching the filter,
/// ignoring offset and limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub count: u64,
}

impl<T> PaginatedResult<T> {
    #[must_use]
    pub fn new(data: Vec<T>, count: u64) -> Self {
        Self { data, count }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

impl<T> Default for PaginatedResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            count: 0,
        }
    }
}
