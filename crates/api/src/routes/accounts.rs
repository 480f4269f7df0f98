//! Account management routes.
//!
//! Accounts own product links, product list links, contracts, and addresses,
//! and are linked to entities through `account-entities/`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crm_db::{
    AccountOrchestrator,
    entities::{
        account_contracts, account_lists, account_products, accounts, addresses, entity_accounts,
    },
    repositories::{
        AccountContractRepository, AccountListRepository, AccountProductRepository,
        AccountRepository, AddressInput, AddressParent, AddressRepository,
        CreateAccountContractInput, CreateAccountInput, CreateAccountListInput,
        CreateAccountProductInput, EntityAccountInput, EntityAccountRepository, LinkScope,
        UpdateAccountContractInput, UpdateAccountInput, UpdateAccountListInput,
        UpdateAccountProductInput,
    },
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::envelope;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{CurrentUser, Pagination},
};

/// Creates the account routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account-management/accounts/",
            get(list_accounts).post(create_account),
        )
        .route(
            "/account-management/accounts/{account_uuid}/",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-products/",
            get(list_account_products).post(create_account_product),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-products/{account_product_uuid}/",
            get(get_account_product)
                .put(update_account_product)
                .delete(delete_account_product),
        )
        .route(
            "/account-management/accounts/{account_uuid}/products/",
            get(list_linked_products),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-lists/",
            get(list_account_lists).post(create_account_list),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-lists/{account_list_uuid}/",
            get(get_account_list)
                .put(update_account_list)
                .delete(delete_account_list),
        )
        .route(
            "/account-management/accounts/{account_uuid}/product-lists/",
            get(list_linked_product_lists),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-contracts/",
            get(list_account_contracts).post(create_account_contract),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-contracts/{account_contract_uuid}/",
            get(get_account_contract)
                .put(update_account_contract)
                .delete(delete_account_contract),
        )
        .route(
            "/account-management/accounts/{account_uuid}/addresses/",
            get(list_addresses).post(create_address),
        )
        .route(
            "/account-management/accounts/{account_uuid}/addresses/{address_uuid}/",
            get(get_address).put(update_address).delete(delete_address),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-entities/",
            get(list_account_entities).post(link_entity),
        )
        .route(
            "/account-management/accounts/{account_uuid}/account-entities/{entity_account_uuid}/",
            get(get_account_entity)
                .put(update_account_entity)
                .delete(unlink_entity),
        )
}

/// Body for linking an existing entity to an account.
#[derive(Debug, Deserialize)]
pub struct LinkEntityRequest {
    /// Entity to link.
    pub entity_uuid: Uuid,
    /// Validity window of the link.
    #[serde(flatten)]
    pub window: EntityAccountInput,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// GET `/account-management/accounts/` - List accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let accounts = AccountRepository::new(state.db.as_ref()).list(page).await?;
    envelope("accounts", accounts)
}

/// POST `/account-management/accounts/` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<CreateAccountInput>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    info!(account = %account.uuid, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
) -> ApiResult<Json<accounts::Model>> {
    let account = AccountRepository::new(state.db.as_ref())
        .get(account_uuid)
        .await?;
    Ok(Json(account))
}

async fn update_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<UpdateAccountInput>,
) -> ApiResult<Json<accounts::Model>> {
    let account = AccountRepository::new(state.db.as_ref())
        .update(account_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(account))
}

async fn delete_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
) -> ApiResult<Json<accounts::Model>> {
    let account = AccountRepository::new(state.db.as_ref())
        .delete(account_uuid, actor.uuid())
        .await?;
    info!(account = %account.uuid, "account deleted");
    Ok(Json(account))
}

// ---------------------------------------------------------------------------
// Account products
// ---------------------------------------------------------------------------

async fn list_account_products(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let links = AccountProductRepository::new(state.db.as_ref())
        .list(account_uuid, page)
        .await?;
    envelope("account_products", links)
}

/// GET `/account-management/accounts/{uuid}/products/` - Products allowed on
/// the account, in link order.
async fn list_linked_products(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let products = AccountOrchestrator::new(state.db.as_ref())
        .products(account_uuid, page)
        .await?;
    envelope("products", products)
}

async fn create_account_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<CreateAccountProductInput>,
) -> ApiResult<impl IntoResponse> {
    let link = AccountProductRepository::new(state.db.as_ref())
        .create(account_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

async fn get_account_product(
    State(state): State<AppState>,
    Path((account_uuid, account_product_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_products::Model>> {
    let link = AccountProductRepository::new(state.db.as_ref())
        .get(account_uuid, account_product_uuid)
        .await?;
    Ok(Json(link))
}

async fn update_account_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_product_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountProductInput>,
) -> ApiResult<Json<account_products::Model>> {
    let link = AccountProductRepository::new(state.db.as_ref())
        .update(account_uuid, account_product_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(link))
}

async fn delete_account_product(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_product_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_products::Model>> {
    let link = AccountProductRepository::new(state.db.as_ref())
        .delete(account_uuid, account_product_uuid, actor.uuid())
        .await?;
    Ok(Json(link))
}

// ---------------------------------------------------------------------------
// Account lists
// ---------------------------------------------------------------------------

async fn list_account_lists(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let links = AccountListRepository::new(state.db.as_ref())
        .list(account_uuid, page)
        .await?;
    envelope("account_lists", links)
}

/// GET `/account-management/accounts/{uuid}/product-lists/` - Price lists
/// assigned to the account, in link order.
async fn list_linked_product_lists(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let lists = AccountOrchestrator::new(state.db.as_ref())
        .product_lists(account_uuid, page)
        .await?;
    envelope("product_lists", lists)
}

async fn create_account_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<CreateAccountListInput>,
) -> ApiResult<impl IntoResponse> {
    let link = AccountListRepository::new(state.db.as_ref())
        .create(account_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

async fn get_account_list(
    State(state): State<AppState>,
    Path((account_uuid, account_list_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_lists::Model>> {
    let link = AccountListRepository::new(state.db.as_ref())
        .get(account_uuid, account_list_uuid)
        .await?;
    Ok(Json(link))
}

async fn update_account_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_list_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountListInput>,
) -> ApiResult<Json<account_lists::Model>> {
    let link = AccountListRepository::new(state.db.as_ref())
        .update(account_uuid, account_list_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(link))
}

async fn delete_account_list(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_list_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_lists::Model>> {
    let link = AccountListRepository::new(state.db.as_ref())
        .delete(account_uuid, account_list_uuid, actor.uuid())
        .await?;
    Ok(Json(link))
}

// ---------------------------------------------------------------------------
// Account contracts
// ---------------------------------------------------------------------------

async fn list_account_contracts(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let contracts = AccountContractRepository::new(state.db.as_ref())
        .list(account_uuid, page)
        .await?;
    envelope("account_contracts", contracts)
}

async fn create_account_contract(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<CreateAccountContractInput>,
) -> ApiResult<impl IntoResponse> {
    let contract = AccountContractRepository::new(state.db.as_ref())
        .create(account_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

async fn get_account_contract(
    State(state): State<AppState>,
    Path((account_uuid, account_contract_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_contracts::Model>> {
    let contract = AccountContractRepository::new(state.db.as_ref())
        .get(account_uuid, account_contract_uuid)
        .await?;
    Ok(Json(contract))
}

async fn update_account_contract(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_contract_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountContractInput>,
) -> ApiResult<Json<account_contracts::Model>> {
    let contract = AccountContractRepository::new(state.db.as_ref())
        .update(account_uuid, account_contract_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(contract))
}

async fn delete_account_contract(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, account_contract_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<account_contracts::Model>> {
    let contract = AccountContractRepository::new(state.db.as_ref())
        .delete(account_uuid, account_contract_uuid, actor.uuid())
        .await?;
    Ok(Json(contract))
}

// ---------------------------------------------------------------------------
// Account addresses
// ---------------------------------------------------------------------------

async fn list_addresses(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let addresses = AddressRepository::new(state.db.as_ref())
        .list(AddressParent::Account(account_uuid), page)
        .await?;
    envelope("addresses", addresses)
}

async fn create_address(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<AddressInput>,
) -> ApiResult<impl IntoResponse> {
    let address = AddressRepository::new(state.db.as_ref())
        .create(AddressParent::Account(account_uuid), payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

async fn get_address(
    State(state): State<AppState>,
    Path((account_uuid, address_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .get(AddressParent::Account(account_uuid), address_uuid)
        .await?;
    Ok(Json(address))
}

async fn update_address(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, address_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddressInput>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .update(
            AddressParent::Account(account_uuid),
            address_uuid,
            payload,
            actor.uuid(),
        )
        .await?;
    Ok(Json(address))
}

async fn delete_address(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, address_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .delete(AddressParent::Account(account_uuid), address_uuid, actor.uuid())
        .await?;
    Ok(Json(address))
}

// ---------------------------------------------------------------------------
// Account entities
// ---------------------------------------------------------------------------

/// GET `/account-management/accounts/{uuid}/account-entities/` - Entities on
/// the account, with their names.
async fn list_account_entities(
    State(state): State<AppState>,
    Path(account_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let entities = AccountOrchestrator::new(state.db.as_ref())
        .entities(account_uuid, page)
        .await?;
    envelope("entities", entities)
}

/// POST `/account-management/accounts/{uuid}/account-entities/` - Link an
/// existing entity to the account.
async fn link_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(account_uuid): Path<Uuid>,
    Json(payload): Json<LinkEntityRequest>,
) -> ApiResult<impl IntoResponse> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .create(payload.entity_uuid, account_uuid, payload.window, actor.uuid())
        .await?;
    info!(entity = %link.entity_uuid, account = %link.account_uuid, "entity linked to account");
    Ok((StatusCode::CREATED, Json(link)))
}

async fn get_account_entity(
    State(state): State<AppState>,
    Path((account_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .get(LinkScope::Account(account_uuid), entity_account_uuid)
        .await?;
    Ok(Json(link))
}

async fn update_account_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EntityAccountInput>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .update(
            LinkScope::Account(account_uuid),
            entity_account_uuid,
            payload,
            actor.uuid(),
        )
        .await?;
    Ok(Json(link))
}

async fn unlink_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((account_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .delete(
            LinkScope::Account(account_uuid),
            entity_account_uuid,
            actor.uuid(),
        )
        .await?;
    Ok(Json(link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{USER, app, get, json, send, signed_in};
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use sea_orm::Value as DbValue;
    use serde_json::json as body;
    use std::collections::BTreeMap;

    const ACCOUNT: Uuid = Uuid::from_u128(0x10);

    fn account(id: i32, name: &str) -> accounts::Model {
        accounts::Model {
            id,
            uuid: Uuid::from_u128(0x10 + u128::try_from(id).unwrap()),
            sys_value_status_uuid: None,
            name: name.to_string(),
            start_on: None,
            end_on: None,
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

    fn count_row(n: i64) -> BTreeMap<&'static str, DbValue> {
        BTreeMap::from([("num_items", DbValue::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn test_list_accounts_envelope() {
        let db = signed_in()
            .append_query_results([vec![count_row(3)]])
            .append_query_results([vec![account(1, "Northwind"), account(2, "Contoso")]])
            .into_connection();

        let (status, _, body) =
            send(app(db), get("/v1/account-management/accounts/?page=1&limit=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["has_more"], true);
        assert_eq!(body["accounts"][1]["name"], "Contoso");
    }

    #[tokio::test]
    async fn test_empty_account_page_is_not_exist() {
        let db = signed_in()
            .append_query_results([vec![count_row(0)]])
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let (status, _, body) = send(app(db), get("/v1/account-management/accounts/")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "account_not_exist");
    }

    #[tokio::test]
    async fn test_limit_out_of_range_is_rejected() {
        let db = signed_in().into_connection();

        let (status, _, body) =
            send(app(db), get("/v1/account-management/accounts/?limit=101")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "validation_error");
    }

    #[tokio::test]
    async fn test_huge_page_is_rejected() {
        let db = signed_in().into_connection();

        let (status, _, body) = send(
            app(db),
            get("/v1/account-management/accounts/?page=184467440737095516&limit=100"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_account_returns_created() {
        let db = signed_in()
            .append_query_results([vec![account(1, "Northwind")]])
            .into_connection();

        let (status, _, body) = send(
            app(db),
            json("POST", "/v1/account-management/accounts/", &body!({"name": "Northwind"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Northwind");
        assert_eq!(body["sys_created_by"], USER.to_string());
    }

    #[tokio::test]
    async fn test_link_entity_body_flattens_window() {
        let request: LinkEntityRequest = serde_json::from_value(body!({
            "entity_uuid": ACCOUNT,
            "start_on": "2026-01-01",
        }))
        .unwrap();

        assert_eq!(request.entity_uuid, ACCOUNT);
        assert!(request.window.start_on.is_some());
        assert!(request.window.end_on.is_none());
    }
}
