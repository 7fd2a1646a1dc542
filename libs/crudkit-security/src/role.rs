use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization classification of a caller.
///
/// The set is closed. Identity providers hand out the scope as a free-form
/// string, so every comparison against a role is ASCII case-insensitive
/// (see [`Role::matches_scope`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Provider,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Provider, Role::Admin];

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Provider => "PROVIDER",
            Self::Admin => "ADMIN",
        }
    }

    /// `true` when the raw caller scope names this role, ignoring ASCII case.
    #[must_use]
    pub fn matches_scope(self, scope: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(scope)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: '{0}'")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.matches_scope(s))
            .ok_or_else(|| RoleParseError(s.to_owned()))
    }
}
