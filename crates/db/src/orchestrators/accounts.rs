//! Account-side joins: the products, product lists, and entities an account
//! is linked to.

use std::collections::HashMap;

use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use uuid::Uuid;

use super::stitch;
use crate::{
    entities::{entities, individuals, non_individuals, product_lists, products},
    repositories::{
        AccountListRepository, AccountProductRepository, EntityAccountRepository,
        EntityRepository, IndividualRepository, LinkScope, NonIndividualRepository,
        ProductListRepository, ProductRepository,
    },
};

/// An entity linked to an account, flattened with its child's names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountEntity {
    /// Entity uuid.
    pub uuid: Uuid,
    /// `individual` or `non-individual`.
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Tax identifier.
    pub tin: Option<String>,
    /// First name of an individual.
    pub first_name: Option<String>,
    /// Last name of an individual.
    pub last_name: Option<String>,
    /// Display name of a non-individual.
    pub company_name: Option<String>,
}

impl AccountEntity {
    fn new(
        entity: entities::Model,
        individual: Option<individuals::Model>,
        non_individual: Option<non_individuals::Model>,
    ) -> Self {
        let (first_name, last_name) =
            individual.map_or((None, None), |i| (Some(i.first_name), i.last_name));
        Self {
            uuid: entity.uuid,
            entity_type: entity.entity_type,
            tin: entity.tin,
            first_name,
            last_name,
            company_name: non_individual.map(|n| n.name),
        }
    }
}

/// Account orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct AccountOrchestrator<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AccountOrchestrator<'a, C> {
    /// Creates a new account orchestrator.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists one page of the products linked to an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountProduct` NotExist if the page has no links.
    pub async fn products(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<products::Model>> {
        let links = AccountProductRepository::new(self.db)
            .list(account_uuid, page)
            .await?;
        let keys: Vec<Uuid> = links.items.iter().map(|l| l.product_uuid).collect();
        let rows = ProductRepository::new(self.db).get_many(keys.clone()).await?;
        Ok(links.with_items(stitch::<products::Entity>(&keys, rows)))
    }

    /// Lists one page of the product lists linked to an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountList` NotExist if the page has no links.
    pub async fn product_lists(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<product_lists::Model>> {
        let links = AccountListRepository::new(self.db)
            .list(account_uuid, page)
            .await?;
        let keys: Vec<Uuid> = links.items.iter().map(|l| l.product_list_uuid).collect();
        let rows = ProductListRepository::new(self.db)
            .get_many(keys.clone())
            .await?;
        Ok(links.with_items(stitch::<product_lists::Entity>(&keys, rows)))
    }

    /// Lists one page of the entities linked to an account, with names.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if the page has no links.
    pub async fn entities(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<AccountEntity>> {
        let links = EntityAccountRepository::new(self.db)
            .list(LinkScope::Account(account_uuid), page)
            .await?;
        let keys: Vec<Uuid> = links.items.iter().map(|l| l.entity_uuid).collect();

        let rows = EntityRepository::new(self.db).get_many(keys.clone()).await?;
        let mut individuals: HashMap<Uuid, individuals::Model> =
            IndividualRepository::new(self.db)
                .for_entities(keys.clone())
                .await?
                .into_iter()
                .map(|i| (i.entity_uuid, i))
                .collect();
        let mut non_individuals: HashMap<Uuid, non_individuals::Model> =
            NonIndividualRepository::new(self.db)
                .for_entities(keys.clone())
                .await?
                .into_iter()
                .map(|n| (n.entity_uuid, n))
                .collect();

        let summaries = stitch::<entities::Entity>(&keys, rows)
            .into_iter()
            .map(|entity| {
                let individual = individuals.remove(&entity.uuid);
                let non_individual = non_individuals.remove(&entity.uuid);
                AccountEntity::new(entity, individual, non_individual)
            })
            .collect();
        Ok(links.with_items(summaries))
    }
}
