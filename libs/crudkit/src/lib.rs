//! Generic, gated CRUD resources over `SeaORM`.
//!
//! A [`Resource`] is built from a database connection and a
//! [`ResourceOptions`] value. It hands out one handle per operation kind
//! ([`Finder`], [`Creator`], [`Updater`], [`Remover`]); hidden kinds yield no
//! handle. Every handle runs the authorization gate before its body.
//!
//! [`api::rest`] and [`api::graph`] expose the same handles over HTTP.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
mod error;
mod options;
mod resource;

pub use error::ResourceError;
pub use options::ResourceOptions;
pub use resource::{Creator, Finder, Remover, Resource, Updater};

pub use crudkit_auth::{AccessPolicy, OperationKind};
pub use crudkit_db::{FieldTransforms, FilterInfo, PaginatedResult, PaginationRequest, Record};
pub use crudkit_security::{Caller, Principal, Role};
