use async_trait::async_trait;
use crudkit_security::Caller;

use crate::AuthNError;

/// Turns a raw credential into a verified [`Caller`].
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<Caller, AuthNError>;
}
