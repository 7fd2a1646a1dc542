#![allow(dead_code)]

//! Shared fixtures: a `faqs` table on in-memory `SQLite` plus a static
//! token table.

use std::sync::Arc;

use crudkit::{OperationKind, Resource, ResourceOptions, Role};
use crudkit_auth::{IdentityVerifier, StaticTokenVerifier};
use crudkit_db::{ConnectOpts, Record, connect_db};
use crudkit_security::{Caller, Principal};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigrationTrait;
use sea_orm_migration::prelude as mig;

pub mod faq {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[serde(default)]
    #[sea_orm(table_name = "faqs")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub question: String,
        pub answer: String,
        pub status: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl Record for faq::Entity {
    type Entity = Self;
    type Model = faq::Model;
    type Active = faq::ActiveModel;
}

struct CreateFaqs;

impl mig::MigrationName for CreateFaqs {
    fn name(&self) -> &'static str {
        "m001_create_faqs"
    }
}

#[async_trait::async_trait]
impl mig::MigrationTrait for CreateFaqs {
    async fn up(&self, manager: &mig::SchemaManager) -> Result<(), mig::DbErr> {
        manager
            .create_table(
                mig::Table::create()
                    .table(mig::Alias::new("faqs"))
                    .if_not_exists()
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("question"))
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("answer"))
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("status"))
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .to_owned(),
            )
            .await
    }
}

pub async fn db() -> DatabaseConnection {
    let db = connect_db("sqlite::memory:", &ConnectOpts::default())
        .await
        .expect("db connect");
    CreateFaqs
        .up(&mig::SchemaManager::new(&db))
        .await
        .expect("migrate");
    db
}

/// Reads are public, creates need CLIENT or ADMIN, updates and deletes
/// need ADMIN.
pub fn options() -> ResourceOptions {
    ResourceOptions::new("faqs")
        .public(OperationKind::Find)
        .rule(OperationKind::Create, [Role::Client, Role::Admin])
        .rule(OperationKind::Update, [Role::Admin])
        .rule(OperationKind::Delete, [Role::Admin])
}

pub async fn resource(options: ResourceOptions) -> Resource<faq::Entity> {
    Resource::build(db().await, options)
}

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLIENT_TOKEN: &str = "client-token";
pub const PROVIDER_TOKEN: &str = "provider-token";

pub fn verifier() -> Arc<dyn IdentityVerifier> {
    Arc::new(StaticTokenVerifier::with_tokens([
        (ADMIN_TOKEN, "root", "ADMIN"),
        (CLIENT_TOKEN, "alice", "CLIENT"),
        (PROVIDER_TOKEN, "pat", "PROVIDER"),
    ]))
}

pub fn admin() -> Principal {
    Principal::from(Caller::new("root", "ADMIN"))
}

pub fn client() -> Principal {
    Principal::from(Caller::new("alice", "CLIENT"))
}

pub fn provider() -> Principal {
    Principal::from(Caller::new("pat", "PROVIDER"))
}
