#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod caller;
pub mod role;

pub use caller::{Caller, CallerBuilder, Principal};
pub use role::{Role, RoleParseError};
