//! Sample resource: frequently asked questions.

use crudkit::{OperationKind, ResourceOptions, Role};
use crudkit_db::{FieldTransforms, Record};
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

impl Record for Entity {
    type Entity = Self;
    type Model = Model;
    type Active = ActiveModel;
}

/// Anyone reads, clients and admins ask, admins answer and prune.
/// `status` filters match exactly.
#[must_use]
pub fn options() -> ResourceOptions {
    ResourceOptions::new("faqs")
        .public(OperationKind::Find)
        .rule(OperationKind::Create, [Role::Client, Role::Admin])
        .rule(OperationKind::Update, [Role::Admin])
        .rule(OperationKind::Delete, [Role::Admin])
        .transforms(FieldTransforms::new().equals("status"))
}
