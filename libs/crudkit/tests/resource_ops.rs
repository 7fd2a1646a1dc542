#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Gated resource operations against in-memory `SQLite`.

mod common;

use common::{admin, client, faq, options, provider, resource};
use crudkit::api::graph::{GraphResource, OpType};
use crudkit::{FieldTransforms, FilterInfo, OperationKind, PaginationRequest, ResourceError};
use crudkit_db::Predicate;
use crudkit_security::Principal;
use serde_json::{Map, Value, json};

fn obj(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

async fn seed(res: &crudkit::Resource<faq::Entity>, rows: &[(&str, &str)]) -> Vec<i64> {
    let creator = res.creator().unwrap();
    let mut ids = Vec::new();
    for (question, status) in rows {
        let m = creator
            .create_one(&admin(), obj(json!({"question": question, "status": status})))
            .await
            .unwrap();
        ids.push(m.id);
    }
    ids
}

#[tokio::test]
async fn public_find_needs_no_identity() {
    let res = resource(options()).await;
    let ids = seed(&res, &[("how?", "draft")]).await;
    let found = res
        .finder()
        .unwrap()
        .find_one(&Principal::Anonymous, ids[0])
        .await
        .unwrap();
    assert_eq!(found.question, "how?");
}

#[tokio::test]
async fn anonymous_create_is_unauthenticated() {
    let res = resource(options()).await;
    let err = res
        .creator()
        .unwrap()
        .create_one(&Principal::Anonymous, obj(json!({"question": "q"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Unauthenticated), "{err}");
}

#[tokio::test]
async fn scope_outside_role_set_is_denied_and_nothing_is_written() {
    let res = resource(options()).await;
    let err = res
        .creator()
        .unwrap()
        .create_one(&provider(), obj(json!({"question": "q"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Denied { .. }), "{err}");

    let page = res
        .finder()
        .unwrap()
        .find_all(&Principal::Anonymous, &PaginationRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn client_may_create_but_not_update() {
    let res = resource(options()).await;
    let created = res
        .creator()
        .unwrap()
        .create_one(&client(), obj(json!({"question": "q"})))
        .await
        .unwrap();
    assert_eq!(created.status, "draft");

    let err = res
        .updater()
        .unwrap()
        .update_one(&client(), created.id, obj(json!({"answer": "a"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Denied { .. }));
}

#[tokio::test]
async fn find_one_missing_is_not_found() {
    let res = resource(options()).await;
    let err = res
        .finder()
        .unwrap()
        .find_one(&admin(), 42)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { id: 42, .. }), "{err}");
}

#[tokio::test]
async fn find_all_pages_and_counts() {
    let res = resource(options()).await;
    seed(
        &res,
        &[("alpha", "draft"), ("alps", "draft"), ("beta", "live"), ("alto", "live")],
    )
    .await;
    let req = PaginationRequest::default()
        .with_filter_text(r#"{"question":"al"}"#)
        .with_sort_text(r#"["question","ASC"]"#)
        .with_limit(2);
    let page = res
        .finder()
        .unwrap()
        .find_all(&Principal::Anonymous, &req)
        .await
        .unwrap();
    assert_eq!(page.count, 3);
    let qs: Vec<_> = page.data.iter().map(|m| m.question.as_str()).collect();
    assert_eq!(qs, ["alpha", "alps"]);
}

#[tokio::test]
async fn unknown_filter_field_is_validation_error() {
    let res = resource(options()).await;
    let req = PaginationRequest::default().with_filter(json!({"nope": "x"}));
    let err = res
        .finder()
        .unwrap()
        .find_all(&Principal::Anonymous, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Validation { ref field, .. } if field == "nope"));
}

#[tokio::test]
async fn equality_transform_replaces_substring_match() {
    let opts = options().transforms(FieldTransforms::new().equals("status"));
    let res = resource(opts).await;
    seed(&res, &[("a", "live"), ("b", "live-ish"), ("c", "draft")]).await;

    let req = PaginationRequest::default().with_filter(json!({"status": "live"}));
    let found = res
        .finder()
        .unwrap()
        .find_many(&Principal::Anonymous, &req)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].question, "a");
}

#[tokio::test]
async fn update_merges_and_keeps_identity() {
    let res = resource(options()).await;
    let ids = seed(&res, &[("q", "draft")]).await;
    let updated = res
        .updater()
        .unwrap()
        .update_one(&admin(), ids[0], obj(json!({"id": 777, "answer": "yes"})))
        .await
        .unwrap();
    assert_eq!(updated.id, ids[0]);
    assert_eq!(updated.question, "q");
    assert_eq!(updated.answer, "yes");

    let err = res
        .updater()
        .unwrap()
        .update_one(&admin(), 9_999, obj(json!({"answer": "x"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { .. }));
}

#[tokio::test]
async fn remove_reports_whether_a_record_went_away() {
    let res = resource(options()).await;
    let ids = seed(&res, &[("q", "draft")]).await;
    let remover = res.remover().unwrap();
    assert!(remover.remove(&admin(), ids[0]).await.unwrap());
    assert!(!remover.remove(&admin(), ids[0]).await.unwrap());
}

#[tokio::test]
async fn remove_many_by_ids_then_nothing_left() {
    let res = resource(options()).await;
    let ids = seed(&res, &[("a", "draft"), ("b", "draft"), ("c", "draft")]).await;
    let info = FilterInfo::new(json!({"ids": [ids[0], ids[1]]}));
    let remover = res.remover().unwrap();
    assert!(remover.remove_many(&admin(), &info).await.unwrap());
    assert!(!remover.remove_many(&admin(), &info).await.unwrap());

    let left = res
        .finder()
        .unwrap()
        .find_all(&Principal::Anonymous, &PaginationRequest::default())
        .await
        .unwrap();
    assert_eq!(left.count, 1);
    assert_eq!(left.data[0].id, ids[2]);
}

#[tokio::test]
async fn remove_many_without_usable_filter_removes_nothing() {
    let res = resource(options()).await;
    seed(&res, &[("a", "draft"), ("b", "draft")]).await;
    let remover = res.remover().unwrap();

    for info in [
        FilterInfo::default(),
        FilterInfo::new("not json"),
        FilterInfo::new(json!({"ids": null, "tags": ["x"]})),
        FilterInfo::new(json!([1, 2])),
    ] {
        assert!(!remover.remove_many(&admin(), &info).await.unwrap());
    }
    // extra predicates alone never authorize a bulk delete
    let extra = [Predicate::equals("status", "draft")];
    assert!(
        !remover
            .remove_many_where(&admin(), &FilterInfo::default(), &extra)
            .await
            .unwrap()
    );

    let left = res
        .finder()
        .unwrap()
        .find_all(&Principal::Anonymous, &PaginationRequest::default())
        .await
        .unwrap();
    assert_eq!(left.count, 2);
}

#[tokio::test]
async fn remove_many_where_narrows_with_extra_predicates() {
    let res = resource(options()).await;
    seed(&res, &[("a1", "draft"), ("a2", "live")]).await;
    let extra = [Predicate::equals("status", "live")];
    let info = FilterInfo::new(json!({"question": "a"}));
    let removed = res
        .remover()
        .unwrap()
        .remove_many_where(&admin(), &info, &extra)
        .await
        .unwrap();
    assert!(removed);

    let left = res
        .finder()
        .unwrap()
        .find_many(&Principal::Anonymous, &PaginationRequest::default())
        .await
        .unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].question, "a1");
}

#[tokio::test]
async fn remove_many_denied_for_client() {
    let res = resource(options()).await;
    let err = res
        .remover()
        .unwrap()
        .remove_many(&client(), &FilterInfo::new(json!({"ids": [1]})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::Denied { .. }));
}

#[tokio::test]
async fn hidden_find_produces_no_handle_and_no_fields() {
    let res = resource(options().hide(OperationKind::Find)).await;
    assert!(res.finder().is_none());
    assert!(res.creator().is_some());

    let fields = res.fields();
    assert!(fields.iter().all(|f| f.kind == OpType::Mutation));
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["faqs", "patchFaq", "removeFaq", "removeManyFaqs"]);
}

#[tokio::test]
async fn full_surface_field_names() {
    let res = resource(options()).await;
    let mut names: Vec<_> = res
        .fields()
        .into_iter()
        .map(|f| format!("{}.{}", f.kind.type_name(), f.name))
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "Mutation.faqs",
            "Mutation.patchFaq",
            "Mutation.removeFaq",
            "Mutation.removeManyFaqs",
            "Query.faq",
            "Query.faqs",
        ]
    );
}

#[tokio::test]
async fn multi_word_names_are_camel_cased() {
    let res = resource(crudkit::ResourceOptions::new("user_settings")).await;
    let names: Vec<_> = res.fields().into_iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        [
            "user_setting",
            "user_settings",
            "user_settings",
            "patchUserSetting",
            "removeUserSetting",
            "removeManyUserSettings",
        ]
    );
}
