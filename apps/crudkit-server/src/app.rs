use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use crudkit::Resource;
use crudkit::api::graph::GraphSchema;
use crudkit::api::rest;
use crudkit_auth::{IdentityVerifier, build_verifier};
use crudkit_db::connect_db;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::faq;
use crate::migration::Migrator;

/// Connect, migrate, and return the database handle.
///
/// # Errors
/// Connection or migration failures.
pub async fn prepare_db(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let db = connect_db(&cfg.database.dsn, &cfg.database.pool)
        .await
        .context("database connect")?;
    Migrator::up(&db, None).await.context("migrations")?;
    tracing::info!("migrations applied");
    Ok(db)
}

/// Mount every resource on both bindings plus `/health`.
///
/// # Errors
/// Invalid auth settings or clashing query/mutation field names.
pub fn router(cfg: &AppConfig, db: DatabaseConnection) -> anyhow::Result<Router> {
    let verifier: Arc<dyn IdentityVerifier> = build_verifier(&cfg.auth)?;
    let faqs = Resource::<faq::Entity>::build(db, faq::options());

    let schema = GraphSchema::builder(Arc::clone(&verifier))
        .register(faqs.clone())?
        .build();

    Ok(Router::new()
        .route("/health", get(health))
        .merge(rest::router(&faqs, verifier))
        .merge(schema.router(&cfg.server.graph_path))
        .layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
