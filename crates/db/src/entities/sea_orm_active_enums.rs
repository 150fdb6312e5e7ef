//! Active enum definitions mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of billable line item: a performed service or a sold product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_type")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A clinic service (consultation, surgery, vaccination shot).
    #[sea_orm(string_value = "service")]
    Service,
    /// A retail product (food, medication, accessories).
    #[sea_orm(string_value = "product")]
    Product,
}
