use crudkit_security::{Caller, Principal};

use crate::identity::IdentityVerifier;
use crate::policy::{AccessPolicy, OperationKind};
use crate::{AccessError, AuthNError};

/// Deny reason when a caller's scope is outside the operation's role set.
pub const INSUFFICIENT_SCOPE: &str = "insufficient scope";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide whether an authenticated `caller` may perform `kind`.
///
/// No rule for `kind` means any authenticated caller is allowed. Public
/// kinds are not consulted here; see [`authorize`].
#[must_use]
pub fn decide(kind: OperationKind, caller: &Caller, policy: &AccessPolicy) -> Decision {
    let allowed = policy.allowed_roles(kind);
    if allowed.is_empty() {
        return Decision::Allow;
    }
    if allowed.iter().any(|r| r.matches_scope(caller.scope())) {
        Decision::Allow
    } else {
        Decision::Deny(INSUFFICIENT_SCOPE.to_owned())
    }
}

/// Single gate entry point shared by every transport binding.
///
/// # Errors
/// [`AccessError::Unauthenticated`] when a non-public kind is invoked
/// anonymously, [`AccessError::Denied`] when the scope does not match.
pub fn authorize(
    kind: OperationKind,
    principal: &Principal,
    policy: &AccessPolicy,
) -> Result<(), AccessError> {
    if policy.is_public(kind) {
        return Ok(());
    }
    let Some(caller) = principal.caller() else {
        return Err(AccessError::Unauthenticated);
    };
    match decide(kind, caller, policy) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::debug!(
                %kind,
                subject = caller.subject(),
                scope = caller.scope(),
                %reason,
                "access denied"
            );
            Err(AccessError::Denied { reason })
        }
    }
}

/// Run identity verification for `kind` unless it is public.
///
/// Public kinds yield [`Principal::Anonymous`] without touching the
/// credential or the verifier.
///
/// # Errors
/// [`AccessError::Unauthenticated`] when the credential is absent or
/// rejected by `verifier`, [`AccessError::Verifier`] when `verifier` itself
/// fails.
pub async fn resolve_principal(
    kind: OperationKind,
    policy: &AccessPolicy,
    credential: Option<&str>,
    verifier: &dyn IdentityVerifier,
) -> Result<Principal, AccessError> {
    if policy.is_public(kind) {
        return Ok(Principal::Anonymous);
    }
    let credential = credential.ok_or(AuthNError::MissingCredential)?;
    let caller = verifier.verify(credential).await?;
    Ok(Principal::Caller(caller))
}
