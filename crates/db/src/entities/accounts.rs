//! `SeaORM` Entity for the `sales.acc_accounts` table (customer accounts).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "acc_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub sys_value_status_uuid: Option<Uuid>,
    pub name: String,
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
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

crate::audit::audited!(Resource::Account);
