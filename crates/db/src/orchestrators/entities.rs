//! Entity-side use cases: creating an entity with its child, and the
//! accounts an entity is linked to.

use crm_core::entity::{EntityChild, EntityPayload};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::stitch;
use crate::{
    entities::{accounts, entities, entity_accounts, individuals, non_individuals},
    errors::storage,
    repositories::{
        AccountRepository, CreateAccountInput, EntityAccountInput, EntityAccountRepository,
        EntityRepository, IndividualRepository, LinkScope, NonIndividualRepository,
    },
};

/// The child row an entity was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedChild {
    /// Person child.
    Individual(individuals::Model),
    /// Organization child.
    NonIndividual(non_individuals::Model),
}

/// An entity together with the child it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedEntity {
    /// Parent row.
    pub entity: entities::Model,
    /// Child row, serialized under `individual` or `non_individual`.
    #[serde(flatten)]
    pub child: CreatedChild,
}

/// An account created for an entity, with the link between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEntityAccount {
    /// The new account.
    pub account: accounts::Model,
    /// The link from the entity to the account.
    pub entity_account: entity_accounts::Model,
}

/// Entity orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct EntityOrchestrator<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> EntityOrchestrator<'a, C> {
    /// Creates a new entity orchestrator.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an entity and its single child in one transaction.
    ///
    /// The payload shape selects the child. Nothing is written when the
    /// payload is rejected, and a failed child insert rolls back the entity.
    ///
    /// # Errors
    ///
    /// - `EntityDataInvalid` or `EntityPayloadOverloaded` for a bad payload.
    /// - The child's `Exists` on a unique violation.
    pub async fn create(&self, payload: EntityPayload, actor: Uuid) -> AppResult<CreatedEntity> {
        let new = payload.resolve()?;
        let kind = new.kind();

        let txn = self.db.begin().await.map_err(storage)?;
        let entity = EntityRepository::new(&txn).insert(kind, new.tin, actor).await?;
        let child = match new.child {
            EntityChild::Individual(individual) => CreatedChild::Individual(
                IndividualRepository::new(&txn)
                    .insert(entity.uuid, individual, actor)
                    .await?,
            ),
            EntityChild::NonIndividual(non_individual) => CreatedChild::NonIndividual(
                NonIndividualRepository::new(&txn)
                    .insert(entity.uuid, non_individual, actor)
                    .await?,
            ),
        };
        txn.commit().await.map_err(storage)?;

        info!(entity = %entity.uuid, %kind, "entity created");
        Ok(CreatedEntity { entity, child })
    }

    /// Lists one page of the accounts linked to an entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if the page has no links.
    pub async fn accounts(
        &self,
        entity_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<accounts::Model>> {
        let links = EntityAccountRepository::new(self.db)
            .list(LinkScope::Entity(entity_uuid), page)
            .await?;
        let keys: Vec<Uuid> = links.items.iter().map(|l| l.account_uuid).collect();
        let rows = AccountRepository::new(self.db).get_many(keys.clone()).await?;
        Ok(links.with_items(stitch::<accounts::Entity>(&keys, rows)))
    }

    /// Creates an account and links it to an existing entity, in one
    /// transaction. The link's window mirrors the account's.
    ///
    /// # Errors
    ///
    /// Returns `Entity` NotExist if the entity is missing.
    pub async fn new_account(
        &self,
        entity_uuid: Uuid,
        input: CreateAccountInput,
        actor: Uuid,
    ) -> AppResult<NewEntityAccount> {
        let window = EntityAccountInput {
            start_on: input.start_on,
            end_on: input.end_on,
        };

        let txn = self.db.begin().await.map_err(storage)?;
        EntityRepository::new(&txn).get(entity_uuid).await?;
        let account = AccountRepository::new(&txn).create(input, actor).await?;
        let entity_account = EntityAccountRepository::new(&txn)
            .create(entity_uuid, account.uuid, window, actor)
            .await?;
        txn.commit().await.map_err(storage)?;

        Ok(NewEntityAccount {
            account,
            entity_account,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};
    use sea_orm::DbErr;

    const ENTITY: Uuid = Uuid::from_u128(0x500);

    fn entity(entity_type: &str) -> entities::Model {
        entities::Model {
            id: 1,
            uuid: ENTITY,
            entity_type: entity_type.to_string(),
            tin: Some("12-3456789".to_string()),
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn individual() -> individuals::Model {
        individuals::Model {
            id: 1,
            uuid: Uuid::from_u128(0x601),
            entity_uuid: ENTITY,
            first_name: "Ada".to_string(),
            last_name: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn payload(json: &str) -> EntityPayload {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_create_inserts_entity_then_child() {
        let db = mock()
            .append_query_results([vec![entity("individual")]])
            .append_query_results([vec![individual()]])
            .into_connection();

        let created = EntityOrchestrator::new(&db)
            .create(payload(r#"{"first_name": "Ada", "tin": "12-3456789"}"#), ACTOR)
            .await
            .unwrap();
        assert!(matches!(created.child, CreatedChild::Individual(ref i) if i.entity_uuid == ENTITY));

        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["entity"]["type"], "individual");
        assert_eq!(json["individual"]["first_name"], "Ada");

        let log = sql_log(db);
        let entity_at = log.find(r#"INSERT INTO "sales"."em_entities""#).unwrap();
        let child_at = log.find(r#"INSERT INTO "sales"."em_individuals""#).unwrap();
        assert!(entity_at < child_at);
        assert!(log.contains(r#"String(Some("individual"))"#));
    }

    #[tokio::test]
    async fn test_rejected_payload_writes_nothing() {
        let db = mock().into_connection();

        let result = EntityOrchestrator::new(&db)
            .create(payload(r#"{"first_name": "Ada", "name": "Acme"}"#), ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::EntityPayloadOverloaded)));
        assert_eq!(sql_log(db), "[]");
    }

    #[tokio::test]
    async fn test_failed_child_insert_surfaces_error() {
        let db = mock()
            .append_query_results([vec![entity("non-individual")]])
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();

        let result = EntityOrchestrator::new(&db)
            .create(payload(r#"{"name": "Acme"}"#), ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_new_account_requires_live_entity() {
        let db = mock()
            .append_query_results([Vec::<entities::Model>::new()])
            .into_connection();

        let result = EntityOrchestrator::new(&db)
            .new_account(
                ENTITY,
                CreateAccountInput {
                    name: "Northwind".to_string(),
                    sys_value_status_uuid: None,
                    start_on: None,
                    end_on: None,
                },
                ACTOR,
            )
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::Entity))));
        assert!(!sql_log(db).contains("INSERT INTO"));
    }
}
