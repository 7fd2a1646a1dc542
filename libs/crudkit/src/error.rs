use crudkit_auth::AccessError;
use crudkit_db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Access denied: {reason}")]
    Denied { reason: String },

    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: i64 },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    pub fn not_found(resource: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<AccessError> for ResourceError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthenticated => Self::Unauthenticated,
            AccessError::Denied { reason } => Self::Denied { reason },
            AccessError::Verifier(message) => Self::Internal(message),
        }
    }
}

impl From<StoreError> for ResourceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownField { field, .. } => Self::validation(field, "unknown field"),
            StoreError::Unbindable { field, value } => {
                Self::validation(field, format!("value {value} is not a scalar"))
            }
            StoreError::Decode(message) => Self::validation("body", message),
            e @ (StoreError::Db(_) | StoreError::Config(_)) => {
                tracing::error!(error = %e, "store failure");
                Self::Store(e)
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn caller_store_errors_become_validation() {
        let e: ResourceError = StoreError::unknown_field("faqs", "nope").into();
        assert!(matches!(e, ResourceError::Validation { ref field, .. } if field == "nope"));
    }

    #[test]
    fn backend_errors_stay_store() {
        let e: ResourceError = StoreError::Db(sea_orm::DbErr::Custom("boom".into())).into();
        assert!(matches!(e, ResourceError::Store(_)));
    }

    #[test]
    fn access_errors_map_one_to_one() {
        assert!(matches!(
            ResourceError::from(AccessError::Unauthenticated),
            ResourceError::Unauthenticated
        ));
        assert!(matches!(
            ResourceError::from(AccessError::Denied { reason: "r".into() }),
            ResourceError::Denied { ref reason } if reason == "r"
        ));
        assert!(matches!(
            ResourceError::from(AccessError::Verifier("down".into())),
            ResourceError::Internal(ref m) if m == "down"
        ));
    }
}
