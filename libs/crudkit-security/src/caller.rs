use serde::{Deserialize, Serialize};

/// `Caller` is the authenticated principal of a single inbound call.
///
/// Built by an identity verifier once per call and dropped when the call
/// finishes. The `scope` is kept as the raw string the verifier produced;
/// role tables compare against it case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Subject identifier (user, service) taken from the credential.
    subject: String,
    /// Authorization scope, e.g. `CLIENT`, `PROVIDER`, `ADMIN`.
    scope: String,
}

impl Caller {
    #[must_use]
    pub fn builder() -> CallerBuilder {
        CallerBuilder::default()
    }

    /// Shorthand for tests and static identities.
    #[must_use]
    pub fn new(subject: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            scope: scope.into(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

#[derive(Default)]
pub struct CallerBuilder {
    subject: Option<String>,
    scope: Option<String>,
}

impl CallerBuilder {
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_owned());
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> Caller {
        Caller {
            subject: self.subject.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
        }
    }
}

/// Who is behind a call after the identity step.
///
/// `Anonymous` is only produced for public operations, where identity
/// verification is skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Caller(Caller),
}

impl Principal {
    #[must_use]
    pub fn caller(&self) -> Option<&Caller> {
        match self {
            Self::Anonymous => None,
            Self::Caller(c) => Some(c),
        }
    }

    /// Subject for log fields; `-` when anonymous.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.caller().map_or("-", Caller::subject)
    }
}

impl From<Caller> for Principal {
    fn from(c: Caller) -> Self {
        Self::Caller(c)
    }
}
