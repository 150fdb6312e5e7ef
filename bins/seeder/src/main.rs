//! Database seeder for VetBill development and testing.
//!
//! Seeds a pair of demo invoices (one pending, one settled) with line items
//! for local development. Totals and status are derived at read time, so the
//! seeds only carry raw inputs.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;
use vetbill_db::entities::{invoice_items, invoices, sea_orm_active_enums::ItemType};

/// Demo client ID (consistent for all seeds)
const DEMO_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo pet ID (consistent for all seeds)
const DEMO_PET_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo pending invoice ID
const DEMO_PENDING_INVOICE_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Demo settled invoice ID
const DEMO_PAID_INVOICE_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = vetbill_db::connect(&vetbill_shared::DatabaseConfig::from_url(database_url))
        .await
        .expect("Failed to connect to database");

    println!("Seeding pending invoice...");
    seed_pending_invoice(&db).await;

    println!("Seeding settled invoice...");
    seed_paid_invoice(&db).await;

    println!("Seeding complete!");
}

fn demo_client_id() -> Uuid {
    Uuid::parse_str(DEMO_CLIENT_ID).unwrap()
}

fn demo_pet_id() -> Uuid {
    Uuid::parse_str(DEMO_PET_ID).unwrap()
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn seed_pending_invoice(db: &DatabaseConnection) {
    let invoice_id = Uuid::parse_str(DEMO_PENDING_INVOICE_ID).unwrap();

    if invoice_exists(db, invoice_id).await {
        println!("  Pending invoice already seeded, skipping");
        return;
    }

    insert_invoice(
        db,
        invoice_id,
        "INV-20260801-demo0001",
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        dec("10"),
        dec("50.00"),
        Some("Annual visit, partial payment received".to_string()),
    )
    .await;

    insert_item(
        db,
        invoice_id,
        ItemType::Service,
        "Annual checkup",
        dec("120.00"),
        1,
        dec("0"),
    )
    .await;
    insert_item(
        db,
        invoice_id,
        ItemType::Service,
        "Rabies vaccination",
        dec("45.00"),
        1,
        dec("0"),
    )
    .await;
    insert_item(
        db,
        invoice_id,
        ItemType::Product,
        "Flea treatment",
        dec("17.50"),
        2,
        dec("20"),
    )
    .await;
}

async fn seed_paid_invoice(db: &DatabaseConnection) {
    let invoice_id = Uuid::parse_str(DEMO_PAID_INVOICE_ID).unwrap();

    if invoice_exists(db, invoice_id).await {
        println!("  Settled invoice already seeded, skipping");
        return;
    }

    // deposit equals the derived total, so the invoice reads as paid
    insert_invoice(
        db,
        invoice_id,
        "INV-20260715-demo0002",
        NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
        dec("0"),
        dec("85.00"),
        None,
    )
    .await;

    insert_item(
        db,
        invoice_id,
        ItemType::Service,
        "Nail trim",
        dec("25.00"),
        1,
        dec("0"),
    )
    .await;
    insert_item(
        db,
        invoice_id,
        ItemType::Product,
        "Prescription diet food",
        dec("30.00"),
        2,
        dec("0"),
    )
    .await;
}

async fn invoice_exists(db: &DatabaseConnection, invoice_id: Uuid) -> bool {
    invoices::Entity::find_by_id(invoice_id)
        .one(db)
        .await
        .expect("Failed to query invoices")
        .is_some()
}

async fn insert_invoice(
    db: &DatabaseConnection,
    invoice_id: Uuid,
    invoice_number: &str,
    invoice_date: NaiveDate,
    discount_percent: Decimal,
    deposit: Decimal,
    notes: Option<String>,
) {
    let now = Utc::now().into();
    let invoice = invoices::ActiveModel {
        id: Set(invoice_id),
        invoice_number: Set(invoice_number.to_string()),
        client_id: Set(demo_client_id()),
        pet_id: Set(Some(demo_pet_id())),
        invoice_date: Set(invoice_date),
        due_date: Set(invoice_date.checked_add_days(chrono::Days::new(30))),
        discount_percent: Set(discount_percent),
        deposit: Set(deposit),
        notes: Set(notes),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    invoice.insert(db).await.expect("Failed to insert invoice");
}

async fn insert_item(
    db: &DatabaseConnection,
    invoice_id: Uuid,
    item_type: ItemType,
    name: &str,
    unit_price: Decimal,
    quantity: i32,
    discount_percent: Decimal,
) {
    let now = Utc::now().into();
    let item = invoice_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        invoice_id: Set(invoice_id),
        item_type: Set(item_type),
        service_id: Set(None),
        product_id: Set(None),
        item_name: Set(name.to_string()),
        item_description: Set(None),
        unit_price: Set(unit_price),
        quantity: Set(quantity),
        discount_percent: Set(discount_percent),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    item.insert(db).await.expect("Failed to insert invoice item");
}
