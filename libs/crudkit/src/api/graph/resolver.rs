use async_trait::async_trait;
use crudkit_auth::{IdentityVerifier, OperationKind, resolve_principal};
use crudkit_db::{FilterInfo, PaginationRequest, Record};
use heck::ToUpperCamelCase;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::envelope::OpType;
use crate::ResourceError;
use crate::resource::Resource;

/// Root field operations a resource can contribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphOp {
    FindOne,
    FindAll,
    Create,
    Patch,
    Remove,
    RemoveMany,
}

impl GraphOp {
    #[must_use]
    pub const fn kind(self) -> OperationKind {
        match self {
            Self::FindOne | Self::FindAll => OperationKind::Find,
            Self::Create => OperationKind::Create,
            Self::Patch => OperationKind::Update,
            Self::Remove | Self::RemoveMany => OperationKind::Delete,
        }
    }
}

/// One root field exposed by a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub kind: OpType,
    pub name: String,
    pub op: GraphOp,
}

/// Type-erased resource as seen by the query/mutation endpoint.
#[async_trait]
pub trait GraphResource: Send + Sync {
    /// Root fields this resource answers. Hidden kinds contribute none.
    fn fields(&self) -> Vec<FieldDef>;

    async fn resolve(
        &self,
        op: GraphOp,
        args: Value,
        credential: Option<&str>,
        verifier: &dyn IdentityVerifier,
    ) -> Result<Value, ResourceError>;
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    input: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PatchArgs {
    id: i64,
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RemoveManyArgs {
    #[serde(default)]
    info: FilterInfo,
}

fn args<T: DeserializeOwned>(args: Value) -> Result<T, ResourceError> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ResourceError::validation("args", e.to_string()))
}

fn to_value<T: serde::Serialize>(v: &T) -> Result<Value, ResourceError> {
    serde_json::to_value(v).map_err(|e| ResourceError::Internal(e.to_string()))
}

#[async_trait]
impl<R: Record> GraphResource for Resource<R> {
    fn fields(&self) -> Vec<FieldDef> {
        let name = self.options().name().to_owned();
        let singular = self.options().singular_name();
        let cap_name = name.to_upper_camel_case();
        let cap_singular = singular.to_upper_camel_case();

        let mut out = Vec::new();
        let mut push = |kind, name: String, op| out.push(FieldDef { kind, name, op });
        if self.finder().is_some() {
            push(OpType::Query, singular.to_lowercase(), GraphOp::FindOne);
            push(OpType::Query, name.to_lowercase(), GraphOp::FindAll);
        }
        if self.creator().is_some() {
            push(OpType::Mutation, name.to_lowercase(), GraphOp::Create);
        }
        if self.updater().is_some() {
            push(OpType::Mutation, format!("patch{cap_singular}"), GraphOp::Patch);
        }
        if self.remover().is_some() {
            push(OpType::Mutation, format!("remove{cap_singular}"), GraphOp::Remove);
            push(OpType::Mutation, format!("removeMany{cap_name}"), GraphOp::RemoveMany);
        }
        out
    }

    async fn resolve(
        &self,
        op: GraphOp,
        raw: Value,
        credential: Option<&str>,
        verifier: &dyn IdentityVerifier,
    ) -> Result<Value, ResourceError> {
        let principal = resolve_principal(op.kind(), self.policy(), credential, verifier).await?;
        let unavailable = || ResourceError::Internal("operation is hidden".to_owned());

        match op {
            GraphOp::FindOne => {
                let IdArgs { id } = args(raw)?;
                let finder = self.finder().ok_or_else(unavailable)?;
                to_value(&finder.find_one(&principal, id).await?)
            }
            GraphOp::FindAll => {
                let req: PaginationRequest = args(raw)?;
                let finder = self.finder().ok_or_else(unavailable)?;
                to_value(&finder.find_all(&principal, &req).await?)
            }
            GraphOp::Create => {
                let CreateArgs { input } = args(raw)?;
                let creator = self.creator().ok_or_else(unavailable)?;
                to_value(&creator.create_one(&principal, input).await?)
            }
            GraphOp::Patch => {
                let PatchArgs { id, data } = args(raw)?;
                let updater = self.updater().ok_or_else(unavailable)?;
                to_value(&updater.update_one(&principal, id, data).await?)
            }
            GraphOp::Remove => {
                let IdArgs { id } = args(raw)?;
                let remover = self.remover().ok_or_else(unavailable)?;
                Ok(Value::Bool(remover.remove(&principal, id).await?))
            }
            GraphOp::RemoveMany => {
                let RemoveManyArgs { info } = args(raw)?;
                let remover = self.remover().ok_or_else(unavailable)?;
                Ok(Value::Bool(remover.remove_many(&principal, &info).await?))
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn op_kinds() {
        assert_eq!(GraphOp::FindAll.kind(), OperationKind::Find);
        assert_eq!(GraphOp::Patch.kind(), OperationKind::Update);
        assert_eq!(GraphOp::RemoveMany.kind(), OperationKind::Delete);
    }

    #[test]
    fn null_args_read_as_empty_object() {
        let req: PaginationRequest = args(Value::Null).unwrap();
        assert_eq!(req, PaginationRequest::default());
        let info: RemoveManyArgs = args(Value::Null).unwrap();
        assert!(info.info.filter.is_none());
    }

    #[test]
    fn bad_args_are_validation_errors() {
        let err = args::<IdArgs>(json!({"id": "seven"})).unwrap_err();
        assert!(matches!(err, ResourceError::Validation { .. }));
    }

    #[test]
    fn structured_sort_array_is_accepted() {
        let req: PaginationRequest = args(json!({"sort": ["name", "ASC"], "limit": 2})).unwrap();
        assert_eq!(req.sort.unwrap().decode(), Some(json!(["name", "ASC"])));
        assert_eq!(req.limit, Some(2));
    }
}
