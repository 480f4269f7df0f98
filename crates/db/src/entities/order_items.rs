//! `SeaORM` Entity for the `sales.om_order_items` table (sales order line items).

use crm_shared::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "sales", table_name = "om_order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub order_uuid: Uuid,
    pub product_list_item_uuid: Uuid,
    pub owner_uuid: Option<Uuid>,
    pub adjusted_by_uuid: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub original_price: Decimal,
    pub adjustment_type: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_adjustment: Option<Decimal>,
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
        belongs_to = "super::orders::Entity",
        from = "Column::OrderUuid",
        to = "super::orders::Column::Uuid"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::product_list_items::Entity",
        from = "Column::ProductListItemUuid",
        to = "super::product_list_items::Column::Uuid"
    )]
    ProductListItems,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::product_list_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductListItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

crate::audit::audited!(Resource::OrderItem);
