use std::fmt;

use crudkit_security::Role;
use serde::{Deserialize, Serialize};

/// Kind of CRUD operation a role rule applies to.
///
/// `Find` covers find-one, find-all and find-many; `Delete` covers remove
/// and remove-many.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Create,
    Find,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Create,
        OperationKind::Find,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Find => "FIND",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles allowed to perform one kind of operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRule {
    pub kind: OperationKind,
    pub roles: Vec<Role>,
}

impl RoleRule {
    pub fn new(kind: OperationKind, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            kind,
            roles: roles.into_iter().collect(),
        }
    }
}

/// Per-resource gating table: public kinds plus role rules.
///
/// Several rules may name the same kind; their role sets are unioned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessPolicy {
    pub public: Vec<OperationKind>,
    pub rules: Vec<RoleRule>,
}

impl AccessPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exempt `kind` from authentication and authorization.
    #[must_use]
    pub fn public(mut self, kind: OperationKind) -> Self {
        if !self.public.contains(&kind) {
            self.public.push(kind);
        }
        self
    }

    #[must_use]
    pub fn rule(mut self, kind: OperationKind, roles: impl IntoIterator<Item = Role>) -> Self {
        self.rules.push(RoleRule::new(kind, roles));
        self
    }

    #[must_use]
    pub fn is_public(&self, kind: OperationKind) -> bool {
        self.public.contains(&kind)
    }

    /// Union of the roles of every rule naming `kind`, deduplicated.
    #[must_use]
    pub fn allowed_roles(&self, kind: OperationKind) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .rules
            .iter()
            .filter(|r| r.kind == kind)
            .flat_map(|r| r.roles.iter().copied())
            .collect();
        roles.sort_unstable();
        roles.dedup();
        roles
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rules_for_same_kind_are_unioned() {
        let p = AccessPolicy::new()
            .rule(OperationKind::Find, [Role::Client])
            .rule(OperationKind::Find, [Role::Admin, Role::Client])
            .rule(OperationKind::Delete, [Role::Provider]);
        assert_eq!(p.allowed_roles(OperationKind::Find), vec![Role::Client, Role::Admin]);
        assert_eq!(p.allowed_roles(OperationKind::Delete), vec![Role::Provider]);
        assert!(p.allowed_roles(OperationKind::Create).is_empty());
    }

    #[test]
    fn public_is_idempotent() {
        let p = AccessPolicy::new()
            .public(OperationKind::Find)
            .public(OperationKind::Find);
        assert_eq!(p.public, vec![OperationKind::Find]);
        assert!(p.is_public(OperationKind::Find));
        assert!(!p.is_public(OperationKind::Create));
    }

    #[test]
    fn policy_deserializes_from_config_shape() {
        let p: AccessPolicy = serde_json::from_value(serde_json::json!({
            "public": ["FIND"],
            "rules": [{"kind": "DELETE", "roles": ["ADMIN"]}]
        }))
        .unwrap();
        assert!(p.is_public(OperationKind::Find));
        assert_eq!(p.allowed_roles(OperationKind::Delete), vec![Role::Admin]);
    }
}
