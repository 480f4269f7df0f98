//! Entity management routes.
//!
//! An entity is created together with its individual or non-individual child.
//! Contact points (emails, numbers, websites, addresses) and account links
//! hang off the entity.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crm_core::entity::EntityPayload;
use crm_db::{
    EntityOrchestrator,
    entities::{
        addresses, emails, entities, entity_accounts, individuals, non_individuals, numbers,
        websites,
    },
    repositories::{
        AddressInput, AddressParent, AddressRepository, CreateAccountInput, CreateEmailInput,
        CreateIndividualInput, CreateNonIndividualInput, CreateNumberInput, CreateWebsiteInput,
        EmailRepository, EntityAccountInput, EntityAccountRepository, EntityRepository,
        IndividualRepository, LinkScope, NonIndividualRepository, NumberRepository,
        UpdateEmailInput, UpdateEntityInput, UpdateIndividualInput, UpdateNonIndividualInput,
        UpdateNumberInput, UpdateWebsiteInput, WebsiteRepository,
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

/// Creates the entity routes (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entity-management/entities/",
            get(list_entities).post(create_entity),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/",
            get(get_entity).put(update_entity).delete(delete_entity),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/individuals/",
            get(list_individuals).post(create_individual),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/individuals/{individual_uuid}/",
            get(get_individual)
                .put(update_individual)
                .delete(delete_individual),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/non-individuals/",
            get(list_non_individuals).post(create_non_individual),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/non-individuals/{non_individual_uuid}/",
            get(get_non_individual)
                .put(update_non_individual)
                .delete(delete_non_individual),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/emails/",
            get(list_emails).post(create_email),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/emails/{email_uuid}/",
            get(get_email).put(update_email).delete(delete_email),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/numbers/",
            get(list_numbers).post(create_number),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/numbers/{number_uuid}/",
            get(get_number).put(update_number).delete(delete_number),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/websites/",
            get(list_websites).post(create_website),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/websites/{website_uuid}/",
            get(get_website).put(update_website).delete(delete_website),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/addresses/",
            get(list_addresses).post(create_address),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/addresses/{address_uuid}/",
            get(get_address).put(update_address).delete(delete_address),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/entity-accounts/",
            get(list_entity_accounts).post(link_account),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/entity-accounts/new-account/",
            post(create_linked_account),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/entity-accounts/{entity_account_uuid}/",
            get(get_entity_account)
                .put(update_entity_account)
                .delete(unlink_account),
        )
        .route(
            "/entity-management/entities/{entity_uuid}/accounts/",
            get(list_linked_accounts),
        )
}

/// Body for linking an existing account to an entity.
#[derive(Debug, Deserialize)]
pub struct LinkAccountRequest {
    /// Account to link.
    pub account_uuid: Uuid,
    /// Validity window of the link.
    #[serde(flatten)]
    pub window: EntityAccountInput,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// GET `/entity-management/entities/` - List entities.
async fn list_entities(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let entities = EntityRepository::new(state.db.as_ref()).list(page).await?;
    envelope("entities", entities)
}

/// POST `/entity-management/entities/` - Create an entity with its child.
async fn create_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<EntityPayload>,
) -> ApiResult<impl IntoResponse> {
    let created = EntityOrchestrator::new(state.db.as_ref())
        .create(payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_entity(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
) -> ApiResult<Json<entities::Model>> {
    let entity = EntityRepository::new(state.db.as_ref())
        .get(entity_uuid)
        .await?;
    Ok(Json(entity))
}

async fn update_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<UpdateEntityInput>,
) -> ApiResult<Json<entities::Model>> {
    let entity = EntityRepository::new(state.db.as_ref())
        .update(entity_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(entity))
}

async fn delete_entity(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
) -> ApiResult<Json<entities::Model>> {
    let entity = EntityRepository::new(state.db.as_ref())
        .delete(entity_uuid, actor.uuid())
        .await?;
    info!(entity = %entity.uuid, "entity deleted");
    Ok(Json(entity))
}

// ---------------------------------------------------------------------------
// Individuals and non-individuals
// ---------------------------------------------------------------------------

async fn list_individuals(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let individuals = IndividualRepository::new(state.db.as_ref())
        .list(entity_uuid, page)
        .await?;
    envelope("individuals", individuals)
}

async fn create_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateIndividualInput>,
) -> ApiResult<impl IntoResponse> {
    let individual = IndividualRepository::new(state.db.as_ref())
        .create(entity_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(individual)))
}

async fn get_individual(
    State(state): State<AppState>,
    Path((entity_uuid, individual_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<individuals::Model>> {
    let individual = IndividualRepository::new(state.db.as_ref())
        .get(entity_uuid, individual_uuid)
        .await?;
    Ok(Json(individual))
}

async fn update_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, individual_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateIndividualInput>,
) -> ApiResult<Json<individuals::Model>> {
    let individual = IndividualRepository::new(state.db.as_ref())
        .update(entity_uuid, individual_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(individual))
}

async fn delete_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, individual_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<individuals::Model>> {
    let individual = IndividualRepository::new(state.db.as_ref())
        .delete(entity_uuid, individual_uuid, actor.uuid())
        .await?;
    Ok(Json(individual))
}

async fn list_non_individuals(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let non_individuals = NonIndividualRepository::new(state.db.as_ref())
        .list(entity_uuid, page)
        .await?;
    envelope("non_individuals", non_individuals)
}

async fn create_non_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateNonIndividualInput>,
) -> ApiResult<impl IntoResponse> {
    let non_individual = NonIndividualRepository::new(state.db.as_ref())
        .create(entity_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(non_individual)))
}

async fn get_non_individual(
    State(state): State<AppState>,
    Path((entity_uuid, non_individual_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<non_individuals::Model>> {
    let non_individual = NonIndividualRepository::new(state.db.as_ref())
        .get(entity_uuid, non_individual_uuid)
        .await?;
    Ok(Json(non_individual))
}

async fn update_non_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, non_individual_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateNonIndividualInput>,
) -> ApiResult<Json<non_individuals::Model>> {
    let non_individual = NonIndividualRepository::new(state.db.as_ref())
        .update(entity_uuid, non_individual_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(non_individual))
}

async fn delete_non_individual(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, non_individual_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<non_individuals::Model>> {
    let non_individual = NonIndividualRepository::new(state.db.as_ref())
        .delete(entity_uuid, non_individual_uuid, actor.uuid())
        .await?;
    Ok(Json(non_individual))
}

// ---------------------------------------------------------------------------
// Contact points
// ---------------------------------------------------------------------------

async fn list_emails(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let emails = EmailRepository::new(state.db.as_ref())
        .list(entity_uuid, page)
        .await?;
    envelope("emails", emails)
}

async fn create_email(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateEmailInput>,
) -> ApiResult<impl IntoResponse> {
    let email = EmailRepository::new(state.db.as_ref())
        .create(entity_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(email)))
}

async fn get_email(
    State(state): State<AppState>,
    Path((entity_uuid, email_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<emails::Model>> {
    let email = EmailRepository::new(state.db.as_ref())
        .get(entity_uuid, email_uuid)
        .await?;
    Ok(Json(email))
}

async fn update_email(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, email_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateEmailInput>,
) -> ApiResult<Json<emails::Model>> {
    let email = EmailRepository::new(state.db.as_ref())
        .update(entity_uuid, email_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(email))
}

async fn delete_email(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, email_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<emails::Model>> {
    let email = EmailRepository::new(state.db.as_ref())
        .delete(entity_uuid, email_uuid, actor.uuid())
        .await?;
    Ok(Json(email))
}

async fn list_numbers(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let numbers = NumberRepository::new(state.db.as_ref())
        .list(entity_uuid, page)
        .await?;
    envelope("numbers", numbers)
}

async fn create_number(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateNumberInput>,
) -> ApiResult<impl IntoResponse> {
    let number = NumberRepository::new(state.db.as_ref())
        .create(entity_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(number)))
}

async fn get_number(
    State(state): State<AppState>,
    Path((entity_uuid, number_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<numbers::Model>> {
    let number = NumberRepository::new(state.db.as_ref())
        .get(entity_uuid, number_uuid)
        .await?;
    Ok(Json(number))
}

async fn update_number(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, number_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateNumberInput>,
) -> ApiResult<Json<numbers::Model>> {
    let number = NumberRepository::new(state.db.as_ref())
        .update(entity_uuid, number_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(number))
}

async fn delete_number(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, number_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<numbers::Model>> {
    let number = NumberRepository::new(state.db.as_ref())
        .delete(entity_uuid, number_uuid, actor.uuid())
        .await?;
    Ok(Json(number))
}

async fn list_websites(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let websites = WebsiteRepository::new(state.db.as_ref())
        .list(entity_uuid, page)
        .await?;
    envelope("websites", websites)
}

async fn create_website(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateWebsiteInput>,
) -> ApiResult<impl IntoResponse> {
    let website = WebsiteRepository::new(state.db.as_ref())
        .create(entity_uuid, payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(website)))
}

async fn get_website(
    State(state): State<AppState>,
    Path((entity_uuid, website_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<websites::Model>> {
    let website = WebsiteRepository::new(state.db.as_ref())
        .get(entity_uuid, website_uuid)
        .await?;
    Ok(Json(website))
}

async fn update_website(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, website_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateWebsiteInput>,
) -> ApiResult<Json<websites::Model>> {
    let website = WebsiteRepository::new(state.db.as_ref())
        .update(entity_uuid, website_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(website))
}

async fn delete_website(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, website_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<websites::Model>> {
    let website = WebsiteRepository::new(state.db.as_ref())
        .delete(entity_uuid, website_uuid, actor.uuid())
        .await?;
    Ok(Json(website))
}

async fn list_addresses(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let addresses = AddressRepository::new(state.db.as_ref())
        .list(AddressParent::Entity(entity_uuid), page)
        .await?;
    envelope("addresses", addresses)
}

async fn create_address(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<AddressInput>,
) -> ApiResult<impl IntoResponse> {
    let address = AddressRepository::new(state.db.as_ref())
        .create(AddressParent::Entity(entity_uuid), payload, actor.uuid())
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

async fn get_address(
    State(state): State<AppState>,
    Path((entity_uuid, address_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .get(AddressParent::Entity(entity_uuid), address_uuid)
        .await?;
    Ok(Json(address))
}

async fn update_address(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, address_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddressInput>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .update(
            AddressParent::Entity(entity_uuid),
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
    Path((entity_uuid, address_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<addresses::Model>> {
    let address = AddressRepository::new(state.db.as_ref())
        .delete(AddressParent::Entity(entity_uuid), address_uuid, actor.uuid())
        .await?;
    Ok(Json(address))
}

// ---------------------------------------------------------------------------
// Entity accounts
// ---------------------------------------------------------------------------

async fn list_entity_accounts(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let links = EntityAccountRepository::new(state.db.as_ref())
        .list(LinkScope::Entity(entity_uuid), page)
        .await?;
    envelope("entity_accounts", links)
}

/// GET `/entity-management/entities/{uuid}/accounts/` - Accounts the entity
/// is linked to, in link order.
async fn list_linked_accounts(
    State(state): State<AppState>,
    Path(entity_uuid): Path<Uuid>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let accounts = EntityOrchestrator::new(state.db.as_ref())
        .accounts(entity_uuid, page)
        .await?;
    envelope("accounts", accounts)
}

/// POST `/entity-management/entities/{uuid}/entity-accounts/` - Link an
/// existing account to the entity.
async fn link_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<LinkAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .create(entity_uuid, payload.account_uuid, payload.window, actor.uuid())
        .await?;
    info!(entity = %link.entity_uuid, account = %link.account_uuid, "account linked to entity");
    Ok((StatusCode::CREATED, Json(link)))
}

/// POST `/entity-management/entities/{uuid}/entity-accounts/new-account/` -
/// Open a new account for the entity.
async fn create_linked_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(entity_uuid): Path<Uuid>,
    Json(payload): Json<CreateAccountInput>,
) -> ApiResult<impl IntoResponse> {
    let created = EntityOrchestrator::new(state.db.as_ref())
        .new_account(entity_uuid, payload, actor.uuid())
        .await?;
    info!(entity = %entity_uuid, account = %created.account.uuid, "account opened for entity");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_entity_account(
    State(state): State<AppState>,
    Path((entity_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .get(LinkScope::Entity(entity_uuid), entity_account_uuid)
        .await?;
    Ok(Json(link))
}

async fn update_entity_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EntityAccountInput>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .update(
            LinkScope::Entity(entity_uuid),
            entity_account_uuid,
            payload,
            actor.uuid(),
        )
        .await?;
    Ok(Json(link))
}

async fn unlink_account(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path((entity_uuid, entity_account_uuid)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<entity_accounts::Model>> {
    let link = EntityAccountRepository::new(state.db.as_ref())
        .delete(
            LinkScope::Entity(entity_uuid),
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
    use axum::http::{StatusCode, header};
    use chrono::{TimeZone, Utc};
    use sea_orm::prelude::DateTimeWithTimeZone;
    use serde_json::json as body;

    const ENTITY: Uuid = Uuid::from_u128(0x500);

    fn stamp() -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn entity() -> entities::Model {
        entities::Model {
            id: 1,
            uuid: ENTITY,
            entity_type: "non-individual".to_string(),
            tin: None,
            sys_created_at: stamp(),
            sys_created_by: Some(USER),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn company() -> non_individuals::Model {
        non_individuals::Model {
            id: 1,
            uuid: Uuid::from_u128(0x701),
            entity_uuid: ENTITY,
            name: "Acme".to_string(),
            legal_name: None,
            sys_created_at: stamp(),
            sys_created_by: Some(USER),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    #[tokio::test]
    async fn test_create_entity_returns_entity_and_child() {
        let db = signed_in()
            .append_query_results([vec![entity()]])
            .append_query_results([vec![company()]])
            .into_connection();

        let (status, headers, body) = send(
            app(db),
            json("POST", "/v1/entity-management/entities/", &body!({"name": "Acme"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["entity"]["type"], "non-individual");
        assert_eq!(body["non_individual"]["name"], "Acme");
        assert!(body.get("individual").is_none());
        assert!(headers.get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_create_entity_with_both_shapes() {
        let db = signed_in().into_connection();

        let (status, _, body) = send(
            app(db),
            json(
                "POST",
                "/v1/entity-management/entities/",
                &body!({"first_name": "Ada", "name": "Acme"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "entity_payload_overloaded");
    }

    #[tokio::test]
    async fn test_missing_entity() {
        let db = signed_in()
            .append_query_results([Vec::<entities::Model>::new()])
            .into_connection();

        let (status, _, body) =
            send(app(db), get(&format!("/v1/entity-management/entities/{ENTITY}/"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "entity_not_exist");
        assert_eq!(body["message"], "Entity record does not exist.");
    }

    #[tokio::test]
    async fn test_new_account_route_is_not_shadowed() {
        let db = signed_in()
            .append_query_results([Vec::<entities::Model>::new()])
            .into_connection();

        let (status, _, body) = send(
            app(db),
            json(
                "POST",
                &format!("/v1/entity-management/entities/{ENTITY}/entity-accounts/new-account/"),
                &body!({"name": "Northwind"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "entity_not_exist");
    }
}
