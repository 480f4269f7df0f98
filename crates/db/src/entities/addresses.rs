//! `SeaORM` Entity for the `sales.em_addresses` table (entity and account addresses).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "em_addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub parent_uuid: Uuid,
    pub parent_table: String,
    pub sys_value_type_uuid: Option<Uuid>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub zip_plus4: Option<String>,
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

crate::audit::audited!(Resource::Address);
