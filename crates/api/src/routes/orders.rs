//! Order management routes: sales orders and their items.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crm_db::{
    entities::{order_items, orders},
    repositories::{
        CreateOrderInput, CreateOrderItemInput, OrderItemRepository, OrderRepository,
        UpdateOrderInput, UpdateOrderItemInput,
    },
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::envelope;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{CurrentUser, Pagination},
};

/// Creates the order routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/order-management/orders/",
            get(list_orders).post(create_order),
        )
        .route(
            "/order-management/orders/{order_uuid}/",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route(
            "/order-management/orders/{order_uuid}/order-items/",
            get(list_order_items).post(create_order_item),
        )
        .route(
            "/order-management/orders/{order_uuid}/order-items/{order_item_uuid}/",
            get(get_order_item)
                .put(update_order_item)
                .delete(delete_order_item),
        )
}

/// GET `/order-management/orders/` - List sales orders.
async fn list_orders(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let orders = OrderRepository::new(state.db.as_ref()).list(page).await?;
    envelope("orders", orders)
}

/// POST `/order-management/orders/` - Open a sales order for an account.
async fn create_order(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<CreateOrderInput>,
) -> ApiResult<impl IntoResponse> {
    let order = OrderRepository::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    info!(order = %order.uuid, account = %order.account_uuid, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<AppState>,
    Path(order_uuid): Path<Uuid>,
) -> ApiResult<Json<orders::Model>> {
    let order = OrderRepository::new(state.db.as_ref())
        .get(order_uuid)
        .await?;
    Ok(Json(order))
}

async fn update_order(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(order_uuid): Path<Uuid>,
    Json(payload): Json<UpdateOrderInput>,
) -> ApiResult<Json<orders::Model>> {
    let order = OrderRepository::new(state.db.as_ref())
        .update(order_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(order))
}

async fn delete_order(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(order_uuid): Path<Uuid>,
) -> ApiResult<Json<orders::Model>> {
    let order = OrderRepository::new(state.db.as_ref())
        .delete(order_uuid, actor.uuid())
        .await?;
    info!(order = %order.uuid, "order deleted");
    Ok(Json(order))
}

async fn list_order_items(
    State(state): State<AppState>,
    Path(order_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let items = OrderItemRepository::new(state.db.as_ref())
        .list(order_uuid, page)
        .await?;
    envelope("order_items", items)
}

async fn create_order_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(order_uuid): Path<Uuid>,
    Json(payload): Json<CreateOrderItemInput>,
) -> ApiResult<impl IntoResponse> {
    let item = OrderItemRepository::new(state.db.as_ref())
        .create(order_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_order_item(
    State(state): State<AppState>,
    Path((order_uuid, order_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<order_items::Model>> {
    let item = OrderItemRepository::new(state.db.as_ref())
        .get(order_uuid, order_item_uuid)
        .await?;
    Ok(Json(item))
}

async fn update_order_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((order_uuid, order_item_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateOrderItemInput>,
) -> ApiResult<Json<order_items::Model>> {
    let item = OrderItemRepository::new(state.db.as_ref())
        .update(order_uuid, order_item_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(item))
}

async fn delete_order_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((order_uuid, order_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<order_items::Model>> {
    let item = OrderItemRepository::new(state.db.as_ref())
        .delete(order_uuid, order_item_uuid, actor.uuid())
        .await?;
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app, json, send, signed_in};
    use serde_json::json as body;

    const ORDER: Uuid = Uuid::from_u128(0x900);

    #[tokio::test]
    async fn test_sub_cent_price_is_rejected_before_insert() {
        let db = signed_in().into_connection();

        let (status, _, body) = send(
            app(db),
            json(
                "POST",
                &format!("/v1/order-management/orders/{ORDER}/order-items/"),
                &body!({
                    "product_list_item_uuid": Uuid::from_u128(0x901),
                    "original_price": "0.009",
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "validation_error");
        assert_eq!(body["message"], "original_price must be greater than 0");
    }
}
