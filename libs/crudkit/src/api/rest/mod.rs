//! Request/response binding.
//!
//! | Method | Path            | Operation     |
//! |--------|-----------------|---------------|
//! | GET    | `/{name}`       | find-all      |
//! | GET    | `/{name}/{id}`  | find-one      |
//! | POST   | `/{name}`       | create-one    |
//! | PATCH  | `/{name}/{id}`  | update-one    |
//! | DELETE | `/{name}/{id}`  | remove        |
//! | DELETE | `/{name}`       | remove-many   |
//!
//! Routes for hidden operation kinds are not registered.

mod dto;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::MethodRouter;
use crudkit_auth::IdentityVerifier;
use crudkit_db::Record;

pub use dto::{FilterQuery, ListQuery};
pub use handlers::RestState;

use crate::resource::Resource;

/// Build the REST routes of `resource`.
pub fn router<R: Record>(resource: &Resource<R>, verifier: Arc<dyn IdentityVerifier>) -> Router {
    let name = resource.options().name().to_owned();
    let has_find = resource.finder().is_some();
    let has_create = resource.creator().is_some();
    let has_update = resource.updater().is_some();
    let has_delete = resource.remover().is_some();

    let mut collection: MethodRouter<RestState<R>> = MethodRouter::new();
    let mut item: MethodRouter<RestState<R>> = MethodRouter::new();
    if has_find {
        collection = collection.get(handlers::find_all::<R>);
        item = item.get(handlers::find_one::<R>);
    }
    if has_create {
        collection = collection.post(handlers::create_one::<R>);
    }
    if has_update {
        item = item.patch(handlers::update_one::<R>);
    }
    if has_delete {
        collection = collection.delete(handlers::remove_many::<R>);
        item = item.delete(handlers::remove::<R>);
    }

    let mut router = Router::new();
    if has_find || has_create || has_delete {
        router = router.route(&format!("/{name}"), collection);
    }
    if has_find || has_update || has_delete {
        router = router.route(&format!("/{name}/{{id}}"), item);
    }
    tracing::debug!(
        resource = %name,
        find = has_find,
        create = has_create,
        update = has_update,
        delete = has_delete,
        "REST routes registered"
    );

    router.with_state(RestState {
        resource: resource.clone(),
        verifier,
    })
}
