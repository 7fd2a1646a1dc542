use std::collections::HashMap;

use async_trait::async_trait;
use crudkit_security::Caller;

use crate::config::{AuthConfig, AuthMode, IdentityConfig};
use crate::identity::IdentityVerifier;
use crate::AuthNError;

/// Config-driven verifier.
///
/// - `accept_all`: any non-empty token maps to the default identity
/// - `static_tokens`: only listed tokens are accepted
#[derive(Debug, Clone)]
pub struct StaticTokenVerifier {
    accept_all: bool,
    default_identity: IdentityConfig,
    token_map: HashMap<String, IdentityConfig>,
}

impl StaticTokenVerifier {
    #[must_use]
    pub fn from_config(cfg: &AuthConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.identity.clone()))
            .collect();
        Self {
            accept_all: cfg.mode == AuthMode::AcceptAll,
            default_identity: cfg.default_identity.clone(),
            token_map,
        }
    }

    /// Static table from `(token, subject, scope)` triples.
    pub fn with_tokens<'a>(tokens: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let token_map = tokens
            .into_iter()
            .map(|(token, subject, scope)| {
                (
                    token.to_owned(),
                    IdentityConfig {
                        subject: subject.to_owned(),
                        scope: scope.to_owned(),
                    },
                )
            })
            .collect();
        Self {
            accept_all: false,
            default_identity: IdentityConfig::default(),
            token_map,
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<Caller, AuthNError> {
        if credential.is_empty() {
            return Err(AuthNError::MissingCredential);
        }
        let identity = if self.accept_all {
            &self.default_identity
        } else {
            self.token_map
                .get(credential)
                .ok_or_else(|| AuthNError::Unauthorized("unknown token".to_owned()))?
        };
        Ok(Caller::builder()
            .subject(&identity.subject)
            .scope(&identity.scope)
            .build())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::TokenMapping;

    #[tokio::test]
    async fn accept_all_returns_default_identity() {
        let cfg = AuthConfig {
            mode: AuthMode::AcceptAll,
            ..AuthConfig::default()
        };
        let v = StaticTokenVerifier::from_config(&cfg);
        let c = v.verify("whatever").await.unwrap();
        assert_eq!(c.subject(), "anonymous");
        assert_eq!(c.scope(), "CLIENT");
        assert!(matches!(v.verify("").await, Err(AuthNError::MissingCredential)));
    }

    #[tokio::test]
    async fn static_tokens_map_to_identities() {
        let cfg = AuthConfig {
            tokens: vec![TokenMapping {
                token: "t-admin".to_owned(),
                identity: IdentityConfig {
                    subject: "root".to_owned(),
                    scope: "ADMIN".to_owned(),
                },
            }],
            ..AuthConfig::default()
        };
        let v = StaticTokenVerifier::from_config(&cfg);
        let c = v.verify("t-admin").await.unwrap();
        assert_eq!(c.subject(), "root");
        assert_eq!(c.scope(), "ADMIN");
        assert!(matches!(v.verify("t-other").await, Err(AuthNError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn with_tokens_builds_table() {
        let v = StaticTokenVerifier::with_tokens([("a", "alice", "PROVIDER")]);
        assert_eq!(v.verify("a").await.unwrap().scope(), "PROVIDER");
    }
}
