//! Pagination/filter/sort compilation.
//!
//! The compiler is a pure function of its inputs. It logs what it decoded at
//! `debug` level and degrades malformed filter/sort input to "absent"
//! instead of failing the call.

mod compiler;
mod filter;
mod predicate;
mod request;
mod sort;

pub use compiler::{CompiledQuery, compile, compile_filter};
pub use filter::{FieldTransforms, IDS_KEY, Transformed, decode_filter};
pub use predicate::Predicate;
pub use request::{Encoded, FilterInfo, PaginationRequest};
pub use sort::{SortDir, SortSpec, decode_sort};

/// Identity field every record exposes; `ids` filters compile against it.
pub const ID_FIELD: &str = "id";
