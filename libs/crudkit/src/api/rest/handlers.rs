use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use crudkit_auth::{IdentityVerifier, OperationKind, extract_bearer_token, resolve_principal};
use crudkit_db::{PaginatedResult, Record};
use crudkit_security::Principal;
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};

use super::dto::{FilterQuery, ListQuery};
use crate::api::Problem;
use crate::resource::{Creator, Finder, Remover, Resource, Updater};

pub struct RestState<R: Record> {
    pub(super) resource: Resource<R>,
    pub(super) verifier: Arc<dyn IdentityVerifier>,
}

impl<R: Record> Clone for RestState<R> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<R: Record> RestState<R> {
    async fn principal(
        &self,
        kind: OperationKind,
        headers: &HeaderMap,
    ) -> Result<Principal, Problem> {
        resolve_principal(
            kind,
            self.resource.policy(),
            extract_bearer_token(headers),
            self.verifier.as_ref(),
        )
        .await
        .map_err(|e| Problem::from(crate::ResourceError::from(e)))
    }

    fn finder(&self) -> Result<Finder<R>, Problem> {
        self.resource.finder().ok_or_else(hidden)
    }

    fn creator(&self) -> Result<Creator<R>, Problem> {
        self.resource.creator().ok_or_else(hidden)
    }

    fn updater(&self) -> Result<Updater<R>, Problem> {
        self.resource.updater().ok_or_else(hidden)
    }

    fn remover(&self) -> Result<Remover<R>, Problem> {
        self.resource.remover().ok_or_else(hidden)
    }
}

fn hidden() -> Problem {
    Problem::not_found("operation is not available")
}

fn id_from(path: Result<Path<i64>, PathRejection>) -> Result<i64, Problem> {
    path.map(|Path(id)| id)
        .map_err(|e| Problem::bad_request(format!("id: {}", e.body_text())))
}

fn object_from(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, Problem> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(Problem::bad_request("body must be a JSON object")),
        Err(e) => Err(Problem::bad_request(e.body_text())),
    }
}

#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn find_all<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<PaginatedResult<R::Model>>, Problem> {
    let Query(query) = query.map_err(|e| Problem::bad_request(e.body_text()))?;
    let principal = st.principal(OperationKind::Find, &headers).await?;
    let page = st.finder()?.find_all(&principal, &query.into()).await?;
    Ok(Json(page))
}

#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn find_one<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<R::Model>, Problem> {
    let id = id_from(path)?;
    let principal = st.principal(OperationKind::Find, &headers).await?;
    Ok(Json(st.finder()?.find_one(&principal, id).await?))
}

#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn create_one<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Model>), Problem> {
    let principal = st.principal(OperationKind::Create, &headers).await?;
    let input = object_from(body)?;
    let created = st.creator()?.create_one(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn update_one<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R::Model>, Problem> {
    let id = id_from(path)?;
    let principal = st.principal(OperationKind::Update, &headers).await?;
    let patch = object_from(body)?;
    Ok(Json(st.updater()?.update_one(&principal, id, patch).await?))
}

#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn remove<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<bool>, Problem> {
    let id = id_from(path)?;
    let principal = st.principal(OperationKind::Delete, &headers).await?;
    Ok(Json(st.remover()?.remove(&principal, id).await?))
}

/// Bulk delete. Answers 404 when nothing matched.
#[tracing::instrument(skip_all, fields(resource = st.resource.options().name()))]
pub async fn remove_many<R: Record>(
    State(st): State<RestState<R>>,
    headers: HeaderMap,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<bool>, Problem> {
    let Query(query) = query.map_err(|e| Problem::bad_request(e.body_text()))?;
    let principal = st.principal(OperationKind::Delete, &headers).await?;
    let removed = st.remover()?.remove_many(&principal, &query.into()).await?;
    if !removed {
        return Err(Problem::not_found("no matching records"));
    }
    Ok(Json(true))
}
