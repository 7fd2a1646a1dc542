use std::fmt;
use std::marker::PhantomData;

use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityName, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, TryIntoModel,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::StoreError;
use crate::cond::{apply_filter, apply_query, build_condition, resolve_column};
use crate::page::PaginatedResult;
use crate::query::{CompiledQuery, ID_FIELD, Predicate};

/// Binds an entity, its model and its active model for use with [`Store`].
///
/// ```ignore
/// impl Record for faq::Entity {
///     type Entity = Self;
///     type Model = faq::Model;
///     type Active = faq::ActiveModel;
/// }
/// ```
pub trait Record: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::Active>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::Active>
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Sync;
    type Active: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TryIntoModel<Self::Model>
        + Send
        + Sync;
}

/// Generic `SeaORM` store for one record type.
///
/// Every record exposes an integer `id` column; lookups, updates and
/// single deletes go through it.
pub struct Store<R: Record> {
    db: DatabaseConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("table", &Self::alias()).finish()
    }
}

impl<R: Record> Store<R> {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Alias that compiled queries for this store must be built against.
    #[must_use]
    pub fn alias() -> String {
        R::Entity::default().table_name().to_owned()
    }

    fn id_column() -> Result<<R::Entity as EntityTrait>::Column, StoreError> {
        resolve_column::<R::Entity>(ID_FIELD)
            .ok_or_else(|| StoreError::unknown_field(Self::alias(), ID_FIELD))
    }

    /// Keep only keys naming a non-identity column.
    fn known_fields(fields: Map<String, Value>) -> Map<String, Value> {
        fields
            .into_iter()
            .filter(|(k, _)| {
                let known = k != ID_FIELD && resolve_column::<R::Entity>(k).is_some();
                if !known {
                    tracing::debug!(table = %Self::alias(), field = %k, "dropping field");
                }
                known
            })
            .collect()
    }

    /// # Errors
    /// Unknown filter fields, unbindable values, or backend failures.
    #[instrument(level = "debug", skip_all, fields(table = %Self::alias()))]
    pub async fn find_many(&self, q: &CompiledQuery) -> Result<Vec<R::Model>, StoreError> {
        let rows = apply_query(R::Entity::find(), q)?.all(&self.db).await?;
        tracing::debug!(rows = rows.len(), "fetched");
        Ok(rows)
    }

    /// One page plus the total number of matching rows.
    ///
    /// # Errors
    /// See [`Store::find_many`].
    #[instrument(level = "debug", skip_all, fields(table = %Self::alias()))]
    pub async fn find_many_and_count(
        &self,
        q: &CompiledQuery,
    ) -> Result<PaginatedResult<R::Model>, StoreError> {
        let data = apply_query(R::Entity::find(), q)?.all(&self.db).await?;
        let count = apply_filter(R::Entity::find(), q)?.count(&self.db).await?;
        tracing::debug!(rows = data.len(), count, "fetched page");
        Ok(PaginatedResult::new(data, count))
    }

    /// # Errors
    /// Backend failures, or an entity without an `id` column.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<R::Model>, StoreError> {
        let col = Self::id_column()?;
        let row = R::Entity::find()
            .filter(Expr::col((Alias::new(Self::alias()), col)).eq(id))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Insert a record from its JSON fields. A caller-supplied `id` is
    /// ignored; the backend assigns it.
    ///
    /// # Errors
    /// [`StoreError::Decode`] when a field has the wrong type; backend
    /// failures otherwise.
    #[instrument(level = "debug", skip_all, fields(table = %Self::alias()))]
    pub async fn insert(&self, fields: Map<String, Value>) -> Result<R::Model, StoreError> {
        let fields = Self::known_fields(fields);
        let am = R::Active::from_json(Value::Object(fields)).map_err(StoreError::decode)?;
        Ok(am.insert(&self.db).await?)
    }

    /// Merge `patch` into the record `id`. Returns `None` when no such
    /// record exists. An empty patch returns the record unchanged.
    ///
    /// # Errors
    /// See [`Store::insert`].
    #[instrument(level = "debug", skip_all, fields(table = %Self::alias(), id = id))]
    pub async fn update(
        &self,
        id: i64,
        patch: Map<String, Value>,
    ) -> Result<Option<R::Model>, StoreError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let patch = Self::known_fields(patch);
        if patch.is_empty() {
            return Ok(Some(existing));
        }
        let mut am: R::Active = existing.into_active_model();
        am.set_from_json(Value::Object(patch))
            .map_err(StoreError::decode)?;
        Ok(Some(am.update(&self.db).await?))
    }

    /// Delete every record matching all `predicates` and return how many
    /// were removed. An empty predicate list deletes nothing.
    ///
    /// # Errors
    /// Unknown fields, unbindable values, or backend failures.
    #[instrument(level = "debug", skip_all, fields(table = %Self::alias()))]
    pub async fn delete_where(&self, predicates: &[Predicate]) -> Result<u64, StoreError> {
        if predicates.is_empty() {
            tracing::warn!("refusing unrestricted delete");
            return Ok(0);
        }
        let cond = build_condition::<R::Entity>(&Self::alias(), predicates)?;
        let res = R::Entity::delete_many().filter(cond).exec(&self.db).await?;
        tracing::debug!(affected = res.rows_affected, "deleted");
        Ok(res.rows_affected)
    }

    /// # Errors
    /// Backend failures.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        self.delete_where(&[Predicate::equals(ID_FIELD, id)]).await
    }
}
