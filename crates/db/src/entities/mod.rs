//! `SeaORM` entity definitions.

pub mod invoice_items;
pub mod invoices;
pub mod sea_orm_active_enums;
