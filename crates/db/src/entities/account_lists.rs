//! `SeaORM` Entity for the `sales.acc_account_lists` table (account to product list links).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "acc_account_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub account_uuid: Uuid,
    pub product_list_uuid: Uuid,
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
        belongs_to = "super::product_lists::Entity",
        from = "Column::ProductListUuid",
        to = "super::product_lists::Column::Uuid"
    )]
    ProductLists,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::product_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::audit::audited!(Resource::AccountList);
