//! Invoice routes: invoices and their items.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crm_db::{
    entities::{invoice_items, invoices},
    repositories::{
        CreateInvoiceInput, CreateInvoiceItemInput, InvoiceItemRepository, InvoiceRepository,
        UpdateInvoiceInput, UpdateInvoiceItemInput,
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

/// Creates the invoice routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/order-management/invoices/",
            get(list_invoices).post(create_invoice),
        )
        .route(
            "/order-management/invoices/{invoice_uuid}/",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route(
            "/order-management/invoices/{invoice_uuid}/invoice-items/",
            get(list_invoice_items).post(create_invoice_item),
        )
        .route(
            "/order-management/invoices/{invoice_uuid}/invoice-items/{invoice_item_uuid}/",
            get(get_invoice_item)
                .put(update_invoice_item)
                .delete(delete_invoice_item),
        )
}

async fn list_invoices(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let invoices = InvoiceRepository::new(state.db.as_ref()).list(page).await?;
    envelope("invoices", invoices)
}

/// POST `/order-management/invoices/` - Invoice an order (one live invoice
/// per order).
async fn create_invoice(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<CreateInvoiceInput>,
) -> ApiResult<impl IntoResponse> {
    let invoice = InvoiceRepository::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    info!(invoice = %invoice.uuid, order = %invoice.order_uuid, "invoice created");
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_uuid): Path<Uuid>,
) -> ApiResult<Json<invoices::Model>> {
    let invoice = InvoiceRepository::new(state.db.as_ref())
        .get(invoice_uuid)
        .await?;
    Ok(Json(invoice))
}

async fn update_invoice(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(invoice_uuid): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceInput>,
) -> ApiResult<Json<invoices::Model>> {
    let invoice = InvoiceRepository::new(state.db.as_ref())
        .update(invoice_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(invoice))
}

async fn delete_invoice(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(invoice_uuid): Path<Uuid>,
) -> ApiResult<Json<invoices::Model>> {
    let invoice = InvoiceRepository::new(state.db.as_ref())
        .delete(invoice_uuid, actor.uuid())
        .await?;
    info!(invoice = %invoice.uuid, "invoice deleted");
    Ok(Json(invoice))
}

async fn list_invoice_items(
    State(state): State<AppState>,
    Path(invoice_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let items = InvoiceItemRepository::new(state.db.as_ref())
        .list(invoice_uuid, page)
        .await?;
    envelope("invoice_items", items)
}

async fn create_invoice_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(invoice_uuid): Path<Uuid>,
    Json(payload): Json<CreateInvoiceItemInput>,
) -> ApiResult<impl IntoResponse> {
    let item = InvoiceItemRepository::new(state.db.as_ref())
        .create(invoice_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_invoice_item(
    State(state): State<AppState>,
    Path((invoice_uuid, invoice_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<invoice_items::Model>> {
    let item = InvoiceItemRepository::new(state.db.as_ref())
        .get(invoice_uuid, invoice_item_uuid)
        .await?;
    Ok(Json(item))
}

async fn update_invoice_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((invoice_uuid, invoice_item_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateInvoiceItemInput>,
) -> ApiResult<Json<invoice_items::Model>> {
    let item = InvoiceItemRepository::new(state.db.as_ref())
        .update(invoice_uuid, invoice_item_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(item))
}

async fn delete_invoice_item(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((invoice_uuid, invoice_item_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<invoice_items::Model>> {
    let item = InvoiceItemRepository::new(state.db.as_ref())
        .delete(invoice_uuid, invoice_item_uuid, actor.uuid())
        .await?;
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{USER, app, json, send, signed_in};
    use chrono::{TimeZone, Utc};
    use serde_json::json as body;

    const ORDER: Uuid = Uuid::from_u128(0x900);

    fn invoice() -> invoices::Model {
        invoices::Model {
            id: 1,
            uuid: Uuid::from_u128(0x950),
            order_uuid: ORDER,
            sys_value_status_uuid: None,
            transacted_on: None,
            posted_on: None,
            paid_on: None,
            sys_created_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .unwrap()
                .fixed_offset(),
            sys_created_by: Some(USER),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    #[tokio::test]
    async fn test_second_invoice_for_order_is_rejected() {
        let db = signed_in()
            .append_query_results([vec![invoice()]])
            .into_connection();

        let (status, _, body) = send(
            app(db),
            json(
                "POST",
                "/v1/order-management/invoices/",
                &body!({ "order_uuid": ORDER }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invoice_exists");
        assert_eq!(
            body["message"],
            "Invoice record already exists. A duplicate record is not allowed."
        );
    }
}
