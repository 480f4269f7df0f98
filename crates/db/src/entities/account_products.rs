//! `SeaORM` Entity for the `sales.acc_account_products` table (account to product links).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "acc_account_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub account_uuid: Uuid,
    pub product_uuid: Uuid,
    pub start_on: Option<Date>,
    pub end_on: Option<Date>,
    pub sys_created_at: DateTimeWithTimeZone,
    pub sys_created_by: Option<Uuid>,
    pub sys_updated_at: Option<DateTimeWithTimeZone>,
    pub sys_updated_by: Option<Uuid>,
    pub sys_deleted_at: Option<DateTimeWithTimeZone>,
    pub sys_deleted_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountUuid",
        to = "super::accounts::Column::Uuid"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductUuid",
        to = "super::products::Column::Uuid"
    )]
    Products,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::audit::audited!(Resource::AccountProduct);
