use crudkit_auth::{AccessPolicy, OperationKind};
use crudkit_db::FieldTransforms;
use crudkit_security::Role;

/// Declarative description of one resource.
///
/// Immutable once handed to [`Resource::build`](crate::Resource::build).
#[derive(Debug, Clone)]
pub struct ResourceOptions {
    name: String,
    singular: Option<String>,
    policy: AccessPolicy,
    hidden: Vec<OperationKind>,
    transforms: FieldTransforms,
}

impl ResourceOptions {
    /// `name` is the plural resource name, e.g. `faqs`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            singular: None,
            policy: AccessPolicy::default(),
            hidden: Vec::new(),
            transforms: FieldTransforms::default(),
        }
    }

    /// Override the singular name. Defaults to the plural name minus its
    /// last character.
    #[must_use]
    pub fn singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self
    }

    #[must_use]
    pub fn public(mut self, kind: OperationKind) -> Self {
        self.policy = self.policy.public(kind);
        self
    }

    #[must_use]
    pub fn rule(mut self, kind: OperationKind, roles: impl IntoIterator<Item = Role>) -> Self {
        self.policy = self.policy.rule(kind, roles);
        self
    }

    /// Replace the whole gating table.
    #[must_use]
    pub fn policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Remove `kind` from the produced surface.
    #[must_use]
    pub fn hide(mut self, kind: OperationKind) -> Self {
        if !self.hidden.contains(&kind) {
            self.hidden.push(kind);
        }
        self
    }

    #[must_use]
    pub fn transforms(mut self, transforms: FieldTransforms) -> Self {
        self.transforms = transforms;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn singular_name(&self) -> String {
        match &self.singular {
            Some(s) => s.clone(),
            None => {
                let mut chars = self.name.chars();
                chars.next_back();
                chars.as_str().to_owned()
            }
        }
    }

    #[must_use]
    pub fn access_policy(&self) -> &AccessPolicy {
        &self.policy
    }

    #[must_use]
    pub fn is_hidden(&self, kind: OperationKind) -> bool {
        self.hidden.contains(&kind)
    }

    #[must_use]
    pub fn field_transforms(&self) -> &FieldTransforms {
        &self.transforms
    }
}
