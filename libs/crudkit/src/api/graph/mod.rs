//! Query/mutation binding.
//!
//! A single `POST` endpoint takes `{kind, field, args}` and answers
//! `{data: {field: ...}}` or `{data: null, errors: [...]}`. Per resource
//! named `faqs` (singular `faq`) the root fields are:
//!
//! | Type     | Field           | Operation   | Args                            |
//! |----------|-----------------|-------------|---------------------------------|
//! | query    | `faq`           | find-one    | `id`                            |
//! | query    | `faqs`          | find-all    | `filter`, `sort`, `offset`, `limit` |
//! | mutation | `faqs`          | create-one  | `input`                         |
//! | mutation | `patchFaq`      | update-one  | `id`, `data`                    |
//! | mutation | `removeFaq`     | remove      | `id`                            |
//! | mutation | `removeManyFaqs`| remove-many | `info: {filter}`                |
//!
//! Hidden operation kinds contribute no fields; asking for one is an
//! unknown-field error.

mod envelope;
mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use crudkit_auth::{IdentityVerifier, extract_bearer_token};
use http::{HeaderMap, StatusCode};

pub use envelope::{ErrorExtensions, GraphError, GraphRequest, GraphResponse, OpType};
pub use resolver::{FieldDef, GraphOp, GraphResource};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("{} field '{field}' is already registered", kind.type_name())]
    DuplicateField { kind: OpType, field: String },
}

struct Entry {
    resource: Arc<dyn GraphResource>,
    op: GraphOp,
}

/// Registry of resources served by one query/mutation endpoint.
#[derive(Clone)]
pub struct GraphSchema {
    fields: Arc<HashMap<(OpType, String), Entry>>,
    verifier: Arc<dyn IdentityVerifier>,
}

/// Builder for [`GraphSchema`].
pub struct GraphSchemaBuilder {
    fields: HashMap<(OpType, String), Entry>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl GraphSchema {
    #[must_use]
    pub fn builder(verifier: Arc<dyn IdentityVerifier>) -> GraphSchemaBuilder {
        GraphSchemaBuilder {
            fields: HashMap::new(),
            verifier,
        }
    }

    /// Root field names of `kind`, sorted.
    #[must_use]
    pub fn field_names(&self, kind: OpType) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    #[tracing::instrument(skip_all, fields(kind = req.kind.type_name(), field = %req.field))]
    pub async fn execute(
        &self,
        req: GraphRequest,
        credential: Option<&str>,
    ) -> (StatusCode, GraphResponse) {
        let Some(entry) = self.fields.get(&(req.kind, req.field.clone())) else {
            tracing::debug!("unknown root field");
            return (
                StatusCode::BAD_REQUEST,
                GraphResponse::error(GraphError::unknown_field(req.kind, &req.field)),
            );
        };
        match entry
            .resource
            .resolve(entry.op, req.args, credential, self.verifier.as_ref())
            .await
        {
            Ok(value) => (StatusCode::OK, GraphResponse::data(&req.field, value)),
            Err(e) => (StatusCode::OK, GraphResponse::error(e.into())),
        }
    }

    /// Mount the endpoint at `path`.
    pub fn router(self, path: &str) -> Router {
        Router::new().route(path, post(handle)).with_state(self)
    }
}

impl GraphSchemaBuilder {
    /// Add every root field `resource` exposes.
    ///
    /// # Errors
    /// [`SchemaError::DuplicateField`] when a field name is already taken.
    pub fn register<G: GraphResource + 'static>(
        mut self,
        resource: G,
    ) -> Result<Self, SchemaError> {
        let resource: Arc<dyn GraphResource> = Arc::new(resource);
        for def in resource.fields() {
            let key = (def.kind, def.name);
            if self.fields.contains_key(&key) {
                return Err(SchemaError::DuplicateField {
                    kind: key.0,
                    field: key.1,
                });
            }
            tracing::debug!(kind = key.0.type_name(), field = %key.1, "graph field registered");
            self.fields.insert(
                key,
                Entry {
                    resource: Arc::clone(&resource),
                    op: def.op,
                },
            );
        }
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> GraphSchema {
        GraphSchema {
            fields: Arc::new(self.fields),
            verifier: self.verifier,
        }
    }
}

async fn handle(
    State(schema): State<GraphSchema>,
    headers: HeaderMap,
    body: Result<Json<GraphRequest>, JsonRejection>,
) -> (StatusCode, Json<GraphResponse>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(GraphResponse::error(GraphError::new("BAD_REQUEST", e.body_text()))),
            );
        }
    };
    let (status, resp) = schema.execute(req, extract_bearer_token(&headers)).await;
    (status, Json(resp))
}
