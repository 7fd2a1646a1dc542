//! Query shaping and record storage for crudkit resources.
//!
//! - [`query`]: turns an untyped [`PaginationRequest`] into a
//!   [`CompiledQuery`]: a backend-neutral list of typed predicates plus
//!   ordering and paging. Nothing is executed here.
//! - [`cond`]: renders a [`CompiledQuery`] into `sea-query` conditions and
//!   applies it to a `SeaORM` select. Caller values are always bound
//!   parameters, field names are always quoted identifiers.
//! - [`Store`]: generic `SeaORM`-backed store for one entity type:
//!   list/count, lookup by identity, insert, partial update, bulk delete.
//!
//! ```rust
//! use crudkit_db::{PaginationRequest, query::compile};
//!
//! let req = PaginationRequest::default()
//!     .with_filter_text(r#"{"name":"ann","ids":[1,2]}"#)
//!     .with_sort_text(r#"["created_at","ASC"]"#)
//!     .with_limit(10);
//! let q = compile(&req, "faqs", None);
//! assert_eq!(q.predicates.len(), 2);
//! assert_eq!(q.limit, Some(10));
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cond;
mod connect;
mod error;
mod page;
pub mod query;
mod store;

pub use connect::{ConnectOpts, connect_db};
pub use error::StoreError;
pub use page::PaginatedResult;
pub use query::{
    CompiledQuery, Encoded, FieldTransforms, FilterInfo, PaginationRequest, Predicate, SortDir,
    SortSpec, Transformed,
};
pub use store::{Record, Store};
