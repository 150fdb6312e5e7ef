//! Invoice line item repository.
//!
//! Line items are price snapshots: mutations here change what the next
//! ledger derivation sees, but there is no stored derived state to
//! resynchronize.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use vetbill_shared::types::{InvoiceId, LineItemId, ProductId, ServiceId};

use crate::entities::{invoice_items, invoices, sea_orm_active_enums::ItemType};

/// Error types for line item operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceItemError {
    /// Line item not found.
    #[error("Invoice item not found: {0}")]
    NotFound(Uuid),

    /// Parent invoice not found or inactive.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for attaching a line item to an invoice.
#[derive(Debug, Clone)]
pub struct CreateLineItemInput {
    /// The invoice to attach to.
    pub invoice_id: InvoiceId,
    /// Service or product.
    pub item_type: ItemType,
    /// Catalog service reference, if a service.
    pub service_id: Option<ServiceId>,
    /// Catalog product reference, if a product.
    pub product_id: Option<ProductId>,
    /// Name snapshot for historical display.
    pub item_name: String,
    /// Description snapshot.
    pub item_description: Option<String>,
    /// Price per unit at attachment time.
    pub unit_price: Decimal,
    /// Number of units.
    pub quantity: u32,
    /// Item-level discount percent.
    pub discount_percent: Decimal,
}

/// Input for updating a line item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLineItemInput {
    /// New name snapshot.
    pub item_name: Option<String>,
    /// New description snapshot.
    pub item_description: Option<Option<String>>,
    /// New unit price.
    pub unit_price: Option<Decimal>,
    /// New quantity.
    pub quantity: Option<u32>,
    /// New item-level discount percent.
    pub discount_percent: Option<Decimal>,
}

/// Line item repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceItemRepository {
    db: DatabaseConnection,
}

impl InvoiceItemRepository {
    /// Creates a new line item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attaches a line item to an invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItemError::InvoiceNotFound` if the parent invoice
    /// does not exist or has been soft-deleted.
    pub async fn create(
        &self,
        input: CreateLineItemInput,
    ) -> Result<invoice_items::Model, InvoiceItemError> {
        let invoice = invoices::Entity::find_by_id(input.invoice_id.into_inner())
            .filter(invoices::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(InvoiceItemError::InvoiceNotFound(
                input.invoice_id.into_inner(),
            ))?;

        let now = Utc::now().into();
        let item = invoice_items::ActiveModel {
            id: Set(LineItemId::new().into_inner()),
            invoice_id: Set(invoice.id),
            item_type: Set(input.item_type),
            service_id: Set(input.service_id.map(ServiceId::into_inner)),
            product_id: Set(input.product_id.map(ProductId::into_inner)),
            item_name: Set(input.item_name),
            item_description: Set(input.item_description),
            unit_price: Set(input.unit_price),
            quantity: Set(i32::try_from(input.quantity).unwrap_or(i32::MAX)),
            discount_percent: Set(input.discount_percent),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(item.insert(&self.db).await?)
    }

    /// Gets a line item by ID.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItemError::NotFound` if the line item does not exist.
    pub async fn get(&self, id: LineItemId) -> Result<invoice_items::Model, InvoiceItemError> {
        invoice_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceItemError::NotFound(id.into_inner()))
    }

    /// Lists the active line items of an invoice in attachment order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<invoice_items::Model>, InvoiceItemError> {
        Ok(invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id.into_inner()))
            .filter(invoice_items::Column::IsActive.eq(true))
            .order_by_asc(invoice_items::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Updates a line item's snapshot fields.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItemError::NotFound` if the line item does not exist.
    pub async fn update(
        &self,
        id: LineItemId,
        input: UpdateLineItemInput,
    ) -> Result<invoice_items::Model, InvoiceItemError> {
        let model = invoice_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceItemError::NotFound(id.into_inner()))?;

        let mut active: invoice_items::ActiveModel = model.into();
        if let Some(item_name) = input.item_name {
            active.item_name = Set(item_name);
        }
        if let Some(item_description) = input.item_description {
            active.item_description = Set(item_description);
        }
        if let Some(unit_price) = input.unit_price {
            active.unit_price = Set(unit_price);
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(i32::try_from(quantity).unwrap_or(i32::MAX));
        }
        if let Some(discount_percent) = input.discount_percent {
            active.discount_percent = Set(discount_percent);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a line item; the invoice ledger reflects the removal
    /// on its next derivation.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItemError::NotFound` if the line item does not exist.
    pub async fn soft_delete(
        &self,
        id: LineItemId,
    ) -> Result<invoice_items::Model, InvoiceItemError> {
        let model = invoice_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceItemError::NotFound(id.into_inner()))?;

        let mut active: invoice_items::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
