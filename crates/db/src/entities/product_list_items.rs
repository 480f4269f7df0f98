//! `SeaORM` Entity for the `sales.pm_product_list_items` table (product list items).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "pm_product_list_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub product_list_uuid: Uuid,
    pub product_uuid: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub sys_allowed_price_increase: bool,
    pub man_allowed_price_increase: bool,
    pub sys_allowed_price_decrease: bool,
    pub man_allowed_price_decrease: bool,
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
        belongs_to = "super::product_lists::Entity",
        from = "Column::ProductListUuid",
        to = "super::product_lists::Column::Uuid"
    )]
    ProductLists,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductUuid",
        to = "super::products::Column::Uuid"
    )]
    Products,
}

impl Related<super::product_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLists.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::audit::audited!(Resource::ProductListItem);
