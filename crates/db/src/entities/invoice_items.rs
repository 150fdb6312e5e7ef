//! `SeaORM` Entity for the invoice_items table.
//!
//! Each row is an immutable price snapshot: name and unit price are copied
//! from the catalog at attachment time so later catalog edits never change
//! an issued invoice. The net price is derived, not stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ItemType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub item_type: ItemType,
    pub service_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub item_name: String,
    pub item_description: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub discount_percent: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
