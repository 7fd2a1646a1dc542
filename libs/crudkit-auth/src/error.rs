use thiserror::Error;

/// Identity verification failures.
#[derive(Debug, Error)]
pub enum AuthNError {
    /// No credential was presented.
    #[error("missing credential")]
    MissingCredential,

    /// The credential is invalid, expired, or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The verifier itself could not run.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of the gate when a call may not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// A non-public operation was invoked without a verified caller.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The caller's scope is not in the operation's role set.
    #[error("access denied: {reason}")]
    Denied { reason: String },

    /// The identity verifier failed to run; not a verdict on the caller.
    #[error("identity verification unavailable: {0}")]
    Verifier(String),
}

impl From<AuthNError> for AccessError {
    fn from(e: AuthNError) -> Self {
        match e {
            AuthNError::Internal(message) => {
                tracing::error!(error = %message, "identity verifier failed");
                Self::Verifier(message)
            }
            e @ (AuthNError::MissingCredential | AuthNError::Unauthorized(_)) => {
                tracing::debug!(error = %e, "identity verification failed");
                Self::Unauthenticated
            }
        }
    }
}
