//! Invoice repository for invoice database operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use vetbill_core::billing::{BillingError, Ledger, LineItem};
use vetbill_shared::types::{ClientId, InvoiceId, PetId};

use crate::entities::{invoice_items, invoices};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Invoice number already exists.
    #[error("Invoice number already exists: {0}")]
    DuplicateNumber(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Invoice number; generated from the invoice date when absent.
    pub invoice_number: Option<String>,
    /// The client being billed.
    pub client_id: ClientId,
    /// The pet the visit was for, if any.
    pub pet_id: Option<PetId>,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Invoice-level discount percent.
    pub discount_percent: Decimal,
    /// Amount paid so far.
    pub deposit: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating an invoice. `None` leaves a field unchanged;
/// the double-`Option` fields distinguish "unchanged" from "cleared".
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceInput {
    /// New client reference.
    pub client_id: Option<ClientId>,
    /// New pet reference.
    pub pet_id: Option<Option<PetId>>,
    /// New invoice date.
    pub invoice_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New invoice-level discount percent.
    pub discount_percent: Option<Decimal>,
    /// New deposit amount.
    pub deposit: Option<Decimal>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

/// Filter for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Substring match on the invoice number.
    pub search: Option<String>,
    /// Include soft-deleted invoices.
    pub include_inactive: bool,
}

/// An invoice together with its active line items.
#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    /// Invoice record.
    pub invoice: invoices::Model,
    /// Active line items, in attachment order.
    pub items: Vec<invoice_items::Model>,
}

impl InvoiceRecord {
    /// The billing snapshots of the active line items.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(line_item_snapshot).collect()
    }

    /// Derives the ledger from the current items, discount, and deposit.
    ///
    /// # Errors
    ///
    /// Returns `BillingError` if stored values violate billing bounds
    /// (possible only if data bypassed the write-path validation).
    pub fn ledger(&self) -> Result<Ledger, BillingError> {
        vetbill_core::billing::LedgerCalculator::compute(
            &self.line_items(),
            self.invoice.discount_percent,
            self.invoice.deposit,
        )
    }
}

/// Converts a stored line item row into its billing snapshot.
#[must_use]
pub fn line_item_snapshot(model: &invoice_items::Model) -> LineItem {
    let quantity = u32::try_from(model.quantity).unwrap_or_else(|_| {
        tracing::warn!(
            item_id = %model.id,
            quantity = model.quantity,
            "Negative quantity in storage, treating as invalid"
        );
        0
    });
    LineItem::new(model.unit_price, quantity, model.discount_percent)
}

/// Generates an invoice number from the invoice date plus a random suffix.
fn generate_invoice_number(invoice_date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", invoice_date.format("%Y%m%d"), &suffix[..8])
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice number is already taken or the
    /// database operation fails.
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<invoices::Model, InvoiceError> {
        let invoice_number = match input.invoice_number {
            Some(number) => {
                let existing = invoices::Entity::find()
                    .filter(invoices::Column::InvoiceNumber.eq(&number))
                    .one(&self.db)
                    .await?;
                if existing.is_some() {
                    return Err(InvoiceError::DuplicateNumber(number));
                }
                number
            }
            None => generate_invoice_number(input.invoice_date),
        };

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            invoice_number: Set(invoice_number),
            client_id: Set(input.client_id.into_inner()),
            pet_id: Set(input.pet_id.map(PetId::into_inner)),
            invoice_date: Set(input.invoice_date),
            due_date: Set(input.due_date),
            discount_percent: Set(input.discount_percent),
            deposit: Set(input.deposit),
            notes: Set(input.notes),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(invoice.insert(&self.db).await?)
    }

    /// Gets an invoice with its active line items.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn get(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id.into_inner()))?;

        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(id.into_inner()))
            .filter(invoice_items::Column::IsActive.eq(true))
            .order_by_asc(invoice_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(InvoiceRecord { invoice, items })
    }

    /// Lists invoices with their active line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, filter: InvoiceFilter) -> Result<Vec<InvoiceRecord>, InvoiceError> {
        let mut query = invoices::Entity::find().find_with_related(invoice_items::Entity);

        if !filter.include_inactive {
            query = query.filter(invoices::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(invoices::Column::InvoiceNumber.contains(term));
        }

        let rows = query.all(&self.db).await?;

        // The two-many query orders by invoice id to group item rows; the
        // caller-facing ordering is applied here, where the status filter
        // and pagination already run in memory.
        let mut records: Vec<InvoiceRecord> = rows
            .into_iter()
            .map(|(invoice, items)| InvoiceRecord {
                invoice,
                items: items.into_iter().filter(|item| item.is_active).collect(),
            })
            .collect();
        records.sort_by(|a, b| {
            b.invoice
                .invoice_date
                .cmp(&a.invoice.invoice_date)
                .then_with(|| b.invoice.created_at.cmp(&a.invoice.created_at))
        });

        Ok(records)
    }

    /// Updates an invoice's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn update(
        &self,
        id: InvoiceId,
        input: UpdateInvoiceInput,
    ) -> Result<invoices::Model, InvoiceError> {
        let model = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id.into_inner()))?;

        let mut active: invoices::ActiveModel = model.into();
        if let Some(client_id) = input.client_id {
            active.client_id = Set(client_id.into_inner());
        }
        if let Some(pet_id) = input.pet_id {
            active.pet_id = Set(pet_id.map(PetId::into_inner));
        }
        if let Some(invoice_date) = input.invoice_date {
            active.invoice_date = Set(invoice_date);
        }
        if let Some(due_date) = input.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(discount_percent) = input.discount_percent {
            active.discount_percent = Set(discount_percent);
        }
        if let Some(deposit) = input.deposit {
            active.deposit = Set(deposit);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Sets the deposit. The mark-as-paid collaborator call is
    /// `set_deposit(invoice_id, total)`.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn set_deposit(
        &self,
        id: InvoiceId,
        deposit: Decimal,
    ) -> Result<invoices::Model, InvoiceError> {
        let model = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id.into_inner()))?;

        let mut active: invoices::ActiveModel = model.into();
        active.deposit = Set(deposit);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes an invoice (it remains restorable).
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn soft_delete(&self, id: InvoiceId) -> Result<invoices::Model, InvoiceError> {
        self.set_active(id, false).await
    }

    /// Restores a soft-deleted invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn restore(&self, id: InvoiceId) -> Result<invoices::Model, InvoiceError> {
        self.set_active(id, true).await
    }

    async fn set_active(
        &self,
        id: InvoiceId,
        is_active: bool,
    ) -> Result<invoices::Model, InvoiceError> {
        let model = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id.into_inner()))?;

        let mut active: invoices::ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
