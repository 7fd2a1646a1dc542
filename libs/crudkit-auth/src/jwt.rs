use async_trait::async_trait;
use crudkit_security::Caller;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::identity::IdentityVerifier;
use crate::AuthNError;

/// Claims read from a bearer JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub scope: String,
    pub exp: u64,
}

/// HS256 JWT verifier. Expiry is always validated.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(cfg.secret.expose_secret().as_bytes(), cfg.leeway_secs)
    }

    #[must_use]
    pub fn new(secret: &[u8], leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<Caller, AuthNError> {
        if credential.is_empty() {
            return Err(AuthNError::MissingCredential);
        }
        let data = decode::<JwtClaims>(credential, &self.key, &self.validation)
            .map_err(|e| AuthNError::Unauthorized(e.to_string()))?;
        Ok(Caller::new(data.claims.sub, data.claims.scope))
    }
}
