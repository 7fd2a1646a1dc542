//! Authorization gate and identity verification for crudkit resources.
//!
//! The gate is transport-agnostic: a binding extracts the operation kind and
//! the raw credential from its own request shape, then calls
//! [`resolve_principal`] followed by [`authorize`]. Public operations never
//! reach the verifier.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bearer;
pub mod config;
mod error;
mod gate;
mod identity;
mod jwt;
mod policy;
mod static_tokens;

pub use bearer::extract_bearer_token;
pub use config::{AuthConfig, AuthMode, IdentityConfig, JwtConfig, TokenMapping, build_verifier};
pub use error::{AccessError, AuthNError};
pub use gate::{Decision, INSUFFICIENT_SCOPE, authorize, decide, resolve_principal};
pub use identity::IdentityVerifier;
pub use jwt::{JwtClaims, JwtVerifier};
pub use policy::{AccessPolicy, OperationKind, RoleRule};
pub use static_tokens::StaticTokenVerifier;
