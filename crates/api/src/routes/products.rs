//! Product management routes: the catalog, price lists, and list items.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crm_db::{
    entities::{product_list_items, product_lists, products},
    repositories::{
        CreateProductInput, CreateProductListInput, CreateProductListItemInput,
        ProductListItemRepository, ProductListRepository, ProductRepository, UpdateProductInput,
        UpdateProductListInput, UpdateProductListItemInput,
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

/// Creates the product routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-management/products/",
            get(list_products).post(create_product),
        )
        .route(
            "/product-management/products/{product_uuid}/",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/product-management/product-lists/",
            get(list_product_lists).post(create_product_list),
        )
        .route(
            "/product-management/product-lists/{product_list_uuid}/",
            get(get_product_list)
                .put(update_product_list)
                .delete(delete_product_list),
        )
        .route(
            "/product-management/product-lists/{product_list_uuid}/product-list-items/",
            get(list_product_list_items).post(create_product_list_item),
        )
        .route(
            "/product-management/product-lists/{product_list_uuid}/product-list-items/{product_list_item_uuid}/",
            get(get_product_list_item)
                .put(update_product_list_item)
                .delete(delete_product_list_item),
        )
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

async fn list_products(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let products = ProductRepository::new(state.db.as_ref()).list(page).await?;
    envelope("products", products)
}

async fn create_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<CreateProductInput>,
) -> ApiResult<impl IntoResponse> {
    let product = ProductRepository::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    info!(product = %product.uuid, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(product_uuid): Path<Uuid>,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new(state.db.as_ref())
        .get(product_uuid)
        .await?;
    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(product_uuid): Path<Uuid>,
    Json(payload): Json<UpdateProductInput>,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new(state.db.as_ref())
        .update(product_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(product_uuid): Path<Uuid>,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new(state.db.as_ref())
        .delete(product_uuid, actor.uuid())
        .await?;
    info!(product = %product.uuid, "product deleted");
    Ok(Json(product))
}

// ---------------------------------------------------------------------------
// Product lists
// ---------------------------------------------------------------------------

async fn list_product_lists(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let lists = ProductListRepository::new(state.db.as_ref())
        .list(page)
        .await?;
    envelope("product_lists", lists)
}

async fn create_product_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<CreateProductListInput>,
) -> ApiResult<impl IntoResponse> {
    let list = ProductListRepository::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    info!(product_list = %list.uuid, name = %list.name, "product list created");
    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_product_list(
    State(state): State<AppState>,
    Path(product_list_uuid): Path<Uuid>,
) -> ApiResult<Json<product_lists::Model>> {
    let list = ProductListRepository::new(state.db.as_ref())
        .get(product_list_uuid)
        .await?;
    Ok(Json(list))
}

async fn update_product_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(product_list_uuid): Path<Uuid>,
    Json(payload): Json<UpdateProductListInput>,
) -> ApiResult<Json<product_lists::Model>> {
    let list = ProductListRepository::new(state.db.as_ref())
        .update(product_list_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(list))
}

async fn delete_product_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(product_list_uuid): Path<Uuid>,
) -> ApiResult<Json<product_lists::Model>> {
    let list = ProductListRepository::new(state.db.as_ref())
        .delete(product_list_uuid, actor.uuid())
        .await?;
    Ok(Json(list))
}

// ---------------------------------------------------------------------------
// Product list items
// ---------------------------------------------------------------------------

async fn list_product_list_items(
    State(state): State<AppState>,
    Path(product_list_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let items = ProductListItemRepository::new(state.db.as_ref())
        .list(product_list_uuid, page)
        .await?;
    envelope("product_list_items", items)
}

async fn create_product_list_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(product_list_uuid): Path<Uuid>,
    Json(payload): Json<CreateProductListItemInput>,
) -> ApiResult<impl IntoResponse> {
    let item = ProductListItemRepository::new(state.db.as_ref())
        .create(product_list_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_product_list_item(
    State(state): State<AppState>,
    Path((product_list_uuid, product_list_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<product_list_items::Model>> {
    let item = ProductListItemRepository::new(state.db.as_ref())
        .get(product_list_uuid, product_list_item_uuid)
        .await?;
    Ok(Json(item))
}

async fn update_product_list_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((product_list_uuid, product_list_item_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateProductListItemInput>,
) -> ApiResult<Json<product_list_items::Model>> {
    let item = ProductListItemRepository::new(state.db.as_ref())
        .update(
            product_list_uuid,
            product_list_item_uuid,
            payload,
            actor.uuid(),
        )
        .await?;
    Ok(Json(item))
}

async fn delete_product_list_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((product_list_uuid, product_list_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<product_list_items::Model>> {
    let item = ProductListItemRepository::new(state.db.as_ref())
        .delete(product_list_uuid, product_list_item_uuid, actor.uuid())
        .await?;
    Ok(Json(item))
}
