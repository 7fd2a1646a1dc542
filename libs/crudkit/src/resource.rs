//! Resource factory: one [`Resource`] per record type, exposing gated
//! operation handles.
//!
//! Each handle runs the gate for its operation kind before touching the
//! store. Handles for hidden kinds are never produced.

use std::fmt;
use std::sync::Arc;

use crudkit_auth::{AccessPolicy, OperationKind, authorize};
use crudkit_db::query::{compile, compile_filter};
use crudkit_db::{FilterInfo, PaginatedResult, PaginationRequest, Predicate, Record, Store};
use crudkit_security::Principal;
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::ResourceError;
use crate::options::ResourceOptions;

struct Inner<R: Record> {
    store: Store<R>,
    options: ResourceOptions,
}

impl<R: Record> Inner<R> {
    fn gate(&self, kind: OperationKind, principal: &Principal) -> Result<(), ResourceError> {
        authorize(kind, principal, self.options.access_policy())?;
        Ok(())
    }

    fn alias() -> String {
        Store::<R>::alias()
    }
}

/// CRUD surface synthesized for record type `R`.
pub struct Resource<R: Record> {
    inner: Arc<Inner<R>>,
}

impl<R: Record> Clone for Resource<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Record> fmt::Debug for Resource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.inner.options.name())
            .field("table", &Inner::<R>::alias())
            .finish_non_exhaustive()
    }
}

impl<R: Record> Resource<R> {
    #[must_use]
    pub fn build(db: DatabaseConnection, options: ResourceOptions) -> Self {
        tracing::debug!(
            resource = options.name(),
            table = %Store::<R>::alias(),
            "resource registered"
        );
        Self {
            inner: Arc::new(Inner {
                store: Store::new(db),
                options,
            }),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ResourceOptions {
        &self.inner.options
    }

    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        self.inner.options.access_policy()
    }

    fn handle(&self, kind: OperationKind) -> Option<Arc<Inner<R>>> {
        (!self.inner.options.is_hidden(kind)).then(|| Arc::clone(&self.inner))
    }

    /// `None` when `FIND` is hidden.
    #[must_use]
    pub fn finder(&self) -> Option<Finder<R>> {
        self.handle(OperationKind::Find).map(|inner| Finder { inner })
    }

    /// `None` when `CREATE` is hidden.
    #[must_use]
    pub fn creator(&self) -> Option<Creator<R>> {
        self.handle(OperationKind::Create).map(|inner| Creator { inner })
    }

    /// `None` when `UPDATE` is hidden.
    #[must_use]
    pub fn updater(&self) -> Option<Updater<R>> {
        self.handle(OperationKind::Update).map(|inner| Updater { inner })
    }

    /// `None` when `DELETE` is hidden.
    #[must_use]
    pub fn remover(&self) -> Option<Remover<R>> {
        self.handle(OperationKind::Delete).map(|inner| Remover { inner })
    }
}

macro_rules! handle_impls {
    ($($handle:ident),*) => {$(
        impl<R: Record> Clone for $handle<R> {
            fn clone(&self) -> Self {
                Self { inner: Arc::clone(&self.inner) }
            }
        }

        impl<R: Record> fmt::Debug for $handle<R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field("resource", &self.inner.options.name())
                    .finish_non_exhaustive()
            }
        }
    )*};
}

/// `FIND` operations: find-one, find-all, find-many.
pub struct Finder<R: Record> {
    inner: Arc<Inner<R>>,
}

/// `CREATE` operation.
pub struct Creator<R: Record> {
    inner: Arc<Inner<R>>,
}

/// `UPDATE` operation.
pub struct Updater<R: Record> {
    inner: Arc<Inner<R>>,
}

/// `DELETE` operations: remove and remove-many.
pub struct Remover<R: Record> {
    inner: Arc<Inner<R>>,
}

handle_impls!(Finder, Creator, Updater, Remover);

impl<R: Record> Finder<R> {
    /// # Errors
    /// Gate failures, or [`ResourceError::NotFound`] when no record has `id`.
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), id = id, subject = principal.subject())
    )]
    pub async fn find_one(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<R::Model, ResourceError> {
        self.inner.gate(OperationKind::Find, principal)?;
        self.inner
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ResourceError::not_found(self.inner.options.name(), id))
    }

    /// Page of matching records plus their total count.
    ///
    /// # Errors
    /// Gate failures, unknown filter fields, or store failures.
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), subject = principal.subject())
    )]
    pub async fn find_all(
        &self,
        principal: &Principal,
        req: &PaginationRequest,
    ) -> Result<PaginatedResult<R::Model>, ResourceError> {
        self.inner.gate(OperationKind::Find, principal)?;
        let q = compile(req, &Inner::<R>::alias(), Some(self.inner.options.field_transforms()));
        Ok(self.inner.store.find_many_and_count(&q).await?)
    }

    /// Matching records without a count.
    ///
    /// # Errors
    /// See [`Finder::find_all`].
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), subject = principal.subject())
    )]
    pub async fn find_many(
        &self,
        principal: &Principal,
        req: &PaginationRequest,
    ) -> Result<Vec<R::Model>, ResourceError> {
        self.inner.gate(OperationKind::Find, principal)?;
        let q = compile(req, &Inner::<R>::alias(), Some(self.inner.options.field_transforms()));
        Ok(self.inner.store.find_many(&q).await?)
    }
}

impl<R: Record> Creator<R> {
    /// Persist a new record from partial input. Any `id` in the input is
    /// ignored.
    ///
    /// # Errors
    /// Gate failures, ill-typed fields, or store failures.
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), subject = principal.subject())
    )]
    pub async fn create_one(
        &self,
        principal: &Principal,
        input: Map<String, Value>,
    ) -> Result<R::Model, ResourceError> {
        self.inner.gate(OperationKind::Create, principal)?;
        let created = self.inner.store.insert(input).await?;
        tracing::info!("record created");
        Ok(created)
    }
}

impl<R: Record> Updater<R> {
    /// Merge `patch` over the record `id`, keeping its identity.
    ///
    /// # Errors
    /// Gate failures, [`ResourceError::NotFound`], ill-typed fields, or
    /// store failures.
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), id = id, subject = principal.subject())
    )]
    pub async fn update_one(
        &self,
        principal: &Principal,
        id: i64,
        patch: Map<String, Value>,
    ) -> Result<R::Model, ResourceError> {
        self.inner.gate(OperationKind::Update, principal)?;
        let updated = self
            .inner
            .store
            .update(id, patch)
            .await?
            .ok_or_else(|| ResourceError::not_found(self.inner.options.name(), id))?;
        tracing::info!("record updated");
        Ok(updated)
    }
}

impl<R: Record> Remover<R> {
    /// `true` iff a record was removed.
    ///
    /// # Errors
    /// Gate failures or store failures.
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), id = id, subject = principal.subject())
    )]
    pub async fn remove(&self, principal: &Principal, id: i64) -> Result<bool, ResourceError> {
        self.inner.gate(OperationKind::Delete, principal)?;
        let affected = self.inner.store.delete_by_id(id).await?;
        Ok(affected > 0)
    }

    /// Bulk delete by the caller's filter. `true` iff at least one record
    /// was removed. A filter that compiles to nothing removes nothing.
    ///
    /// # Errors
    /// Gate failures, unknown filter fields, or store failures.
    pub async fn remove_many(
        &self,
        principal: &Principal,
        info: &FilterInfo,
    ) -> Result<bool, ResourceError> {
        self.remove_many_where(principal, info, &[]).await
    }

    /// [`Remover::remove_many`] with extra developer-supplied predicates
    /// ANDed after the caller's filter.
    ///
    /// # Errors
    /// See [`Remover::remove_many`].
    #[instrument(
        skip_all,
        fields(resource = self.inner.options.name(), subject = principal.subject())
    )]
    pub async fn remove_many_where(
        &self,
        principal: &Principal,
        info: &FilterInfo,
        extra: &[Predicate],
    ) -> Result<bool, ResourceError> {
        self.inner.gate(OperationKind::Delete, principal)?;
        let mut predicates = info
            .filter
            .as_ref()
            .map(|f| {
                compile_filter(f, &Inner::<R>::alias(), Some(self.inner.options.field_transforms()))
            })
            .unwrap_or_default();
        if predicates.is_empty() {
            tracing::warn!("bulk delete without a usable filter, nothing removed");
            return Ok(false);
        }
        predicates.extend_from_slice(extra);
        let affected = self.inner.store.delete_where(&predicates).await?;
        tracing::info!(affected, "bulk delete");
        Ok(affected > 0)
    }
}
