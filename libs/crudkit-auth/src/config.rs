//! Identity verification configuration.

use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::identity::IdentityVerifier;
use crate::jwt::JwtVerifier;
use crate::static_tokens::StaticTokenVerifier;
use crate::AuthNError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Which verifier to run.
    pub mode: AuthMode,

    /// Identity returned for every non-empty token in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Token-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,

    /// Settings for `jwt` mode. Never serialized.
    #[serde(skip_serializing)]
    pub jwt: Option<JwtConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::StaticTokens,
            default_identity: IdentityConfig::default(),
            tokens: Vec::new(),
            jwt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Accept any non-empty token and return the default identity.
    AcceptAll,
    /// Map specific tokens to specific identities.
    #[default]
    StaticTokens,
    /// Verify HS256-signed JWTs.
    Jwt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub subject: String,
    pub scope: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject: "anonymous".to_owned(),
            scope: "CLIENT".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// HMAC secret shared with the token issuer.
    pub secret: SecretString,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

fn default_leeway() -> u64 {
    30
}

/// Build the verifier selected by `cfg.mode`.
///
/// # Errors
/// [`AuthNError::Internal`] when `jwt` mode is selected without `jwt`
/// settings.
pub fn build_verifier(cfg: &AuthConfig) -> Result<Arc<dyn IdentityVerifier>, AuthNError> {
    let verifier: Arc<dyn IdentityVerifier> = match cfg.mode {
        AuthMode::AcceptAll | AuthMode::StaticTokens => {
            Arc::new(StaticTokenVerifier::from_config(cfg))
        }
        AuthMode::Jwt => {
            let jwt = cfg.jwt.as_ref().ok_or_else(|| {
                AuthNError::Internal("auth.mode is 'jwt' but auth.jwt is not set".to_owned())
            })?;
            Arc::new(JwtVerifier::from_config(jwt))
        }
    };
    tracing::info!(mode = ?cfg.mode, "identity verifier configured");
    Ok(verifier)
}
