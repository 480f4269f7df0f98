//! API route definitions.
//!
//! A request does not own a database transaction. Single-resource writes run
//! their guard lookup and statement in autocommit, with the unique indexes
//! on live rows backing the guard. Only the orchestrated creates (entity plus
//! child, account plus entity link) open a transaction.

use axum::{Json, Router, middleware};
use crm_shared::types::Page;
use serde::Serialize;
use serde_json::Value;

use crate::{AppState, error::{ApiResult, to_json}, middleware::session_middleware};

pub mod accounts;
pub mod entities;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod products;
pub mod system;

/// Creates the API router; everything except health, sign-up, and login
/// sits behind the session middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(system::routes())
        .merge(accounts::routes())
        .merge(entities::routes())
        .merge(orders::routes())
        .merge(invoices::routes())
        .merge(products::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(system::public_routes())
        .merge(protected_routes)
}

/// Wraps a page in the list envelope, with the rows under `key`.
fn envelope<T: Serialize>(key: &str, page: Page<T>) -> ApiResult<Json<Value>> {
    let items = to_json(&page.items)?;
    let mut body = to_json(&page)?;
    if let Value::Object(fields) = &mut body {
        fields.insert(key.to_string(), items);
    }
    Ok(Json(body))
}
