//! Invoice management routes.
//!
//! Financial figures and payment status are derived per request by the
//! billing calculator; nothing here reads or writes a stored total.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use vetbill_core::billing::{
    Ledger, LedgerCalculator, PaymentStatus, format_currency, format_percent,
};
use vetbill_db::repositories::invoice::{
    CreateInvoiceInput, InvoiceError, InvoiceFilter, InvoiceRecord, InvoiceRepository,
    UpdateInvoiceInput, line_item_snapshot,
};
use vetbill_shared::AppError;
use vetbill_shared::types::{ClientId, InvoiceId, PageRequest, PetId, WireDecimal};

use super::invoice_items::{LineItemResponse, item_type_to_string};
use super::{
    app_error_response, billing_error_response, coerce_amount, internal_error_response,
    money_string,
};
use crate::AppState;

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route("/invoices/{invoice_id}", patch(update_invoice))
        .route("/invoices/{invoice_id}", delete(delete_invoice))
        .route("/invoices/{invoice_id}/restore", post(restore_invoice))
        .route("/invoices/{invoice_id}/mark-paid", post(mark_paid))
        .route("/invoices/{invoice_id}/print", get(print_invoice))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Substring match on the invoice number.
    pub search: Option<String>,
    /// Filter by derived status: "empty", "pending", "paid", or "all".
    pub status: Option<String>,
    /// Include soft-deleted invoices.
    pub include_inactive: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Invoice number; generated when absent.
    pub invoice_number: Option<String>,
    /// Client being billed.
    pub client_id: Uuid,
    /// Pet the visit was for.
    pub pet_id: Option<Uuid>,
    /// Invoice date (YYYY-MM-DD).
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Invoice-level discount percent (number or string on the wire).
    pub discount_percent: Option<WireDecimal>,
    /// Amount already paid (number or string on the wire).
    pub deposit: Option<WireDecimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating an invoice. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    /// New client reference.
    pub client_id: Option<Uuid>,
    /// New pet reference.
    pub pet_id: Option<Uuid>,
    /// New invoice date.
    pub invoice_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New invoice-level discount percent.
    pub discount_percent: Option<WireDecimal>,
    /// New deposit amount.
    pub deposit: Option<WireDecimal>,
    /// New notes.
    pub notes: Option<String>,
}

/// Derived financial figures for one invoice.
#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    /// Sum of line item net prices.
    pub subtotal: String,
    /// Amount removed by the invoice-level discount.
    pub discount_amount: String,
    /// Final amount owed.
    pub total: String,
    /// Remaining unpaid amount; negative when overpaid.
    pub balance_due: String,
    /// Derived payment status.
    pub status: PaymentStatus,
}

impl LedgerResponse {
    fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            subtotal: money_string(ledger.subtotal),
            discount_amount: money_string(ledger.discount_amount),
            total: money_string(ledger.total),
            balance_due: money_string(ledger.balance_due),
            status: ledger.status(),
        }
    }
}

/// Response for an invoice with items and derived figures.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Client ID.
    pub client_id: Uuid,
    /// Pet ID.
    pub pet_id: Option<Uuid>,
    /// Invoice date.
    pub invoice_date: String,
    /// Due date.
    pub due_date: Option<String>,
    /// Invoice-level discount percent.
    pub discount_percent: String,
    /// Amount paid so far.
    pub deposit: String,
    /// Notes.
    pub notes: Option<String>,
    /// False when soft-deleted.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
    /// Active line items.
    pub items: Vec<LineItemResponse>,
    /// Derived financial figures and status.
    pub ledger: LedgerResponse,
}

impl InvoiceResponse {
    fn from_record(record: &InvoiceRecord) -> Result<Self, vetbill_core::billing::BillingError> {
        let ledger = record.ledger()?;
        let invoice = &record.invoice;

        Ok(Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number.clone(),
            client_id: invoice.client_id,
            pet_id: invoice.pet_id,
            invoice_date: invoice.invoice_date.to_string(),
            due_date: invoice.due_date.map(|d| d.to_string()),
            discount_percent: invoice.discount_percent.to_string(),
            deposit: money_string(invoice.deposit),
            notes: invoice.notes.clone(),
            is_active: invoice.is_active,
            created_at: invoice.created_at.to_rfc3339(),
            updated_at: invoice.updated_at.to_rfc3339(),
            items: record.items.iter().map(LineItemResponse::from_model).collect(),
            ledger: LedgerResponse::from_ledger(&ledger),
        })
    }
}

/// One row of the print payload, pre-formatted for the document renderer.
#[derive(Debug, Serialize)]
pub struct PrintRow {
    /// Item name snapshot.
    pub name: String,
    /// Item description snapshot.
    pub description: Option<String>,
    /// Service or product.
    pub item_type: String,
    /// Number of units.
    pub quantity: i32,
    /// Formatted unit price, e.g. `$100.00`.
    pub unit_price: String,
    /// Formatted item discount, e.g. `10.0%`.
    pub discount_percent: String,
    /// Formatted net price, e.g. `$90.00`.
    pub net_price: String,
}

/// Discount summary row; present only when the discount is non-zero.
#[derive(Debug, Serialize)]
pub struct PrintDiscount {
    /// Row label, e.g. `Discount (10.0%)`.
    pub label: String,
    /// Formatted negative amount, e.g. `-$20.00`.
    pub amount: String,
}

/// Render-ready payload consumed by the external document renderer.
#[derive(Debug, Serialize)]
pub struct PrintPayload {
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: String,
    /// Due date.
    pub due_date: Option<String>,
    /// Client ID (the renderer resolves the display name).
    pub client_id: Uuid,
    /// Pet ID.
    pub pet_id: Option<Uuid>,
    /// Notes.
    pub notes: Option<String>,
    /// Line rows in attachment order.
    pub rows: Vec<PrintRow>,
    /// Formatted subtotal.
    pub subtotal: String,
    /// Discount row, omitted when the invoice discount is zero.
    pub discount: Option<PrintDiscount>,
    /// Formatted total.
    pub total: String,
    /// Formatted deposit.
    pub deposit: String,
    /// Formatted balance due; negative when overpaid, shown as-is.
    pub balance_due: String,
    /// Derived payment status.
    pub status: PaymentStatus,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/invoices` - List invoices with derived status filtering.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Response {
    let status_filter = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => match raw.parse::<PaymentStatus>() {
            Ok(status) => Some(status),
            Err(message) => {
                return app_error_response(&AppError::Validation(message));
            }
        },
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let filter = InvoiceFilter {
        search: query.search,
        include_inactive: query.include_inactive.unwrap_or(false),
    };

    let records = match repo.list(filter).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to list invoices");
            return internal_error_response();
        }
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        match InvoiceResponse::from_record(record) {
            Ok(response) => rows.push(response),
            Err(e) => {
                error!(error = %e, invoice_id = %record.invoice.id, "Stored invoice fails billing bounds");
                return internal_error_response();
            }
        }
    }

    if let Some(status) = status_filter {
        rows.retain(|row| row.ledger.status == status);
    }

    let page = PageRequest::new(query.page, query.per_page);
    (StatusCode::OK, Json(page.slice(rows))).into_response()
}

/// POST `/invoices` - Create an invoice.
async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Response {
    let discount_percent = coerce_amount("discount_percent", request.discount_percent.as_ref());
    let deposit = coerce_amount("deposit", request.deposit.as_ref());

    if let Err(e) = LedgerCalculator::validate_discount_percent(discount_percent) {
        return billing_error_response(&e);
    }
    if let Err(e) = LedgerCalculator::validate_deposit(deposit) {
        return billing_error_response(&e);
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        invoice_number: request.invoice_number,
        client_id: ClientId::from_uuid(request.client_id),
        pet_id: request.pet_id.map(PetId::from_uuid),
        invoice_date: request.invoice_date,
        due_date: request.due_date,
        discount_percent,
        deposit,
        notes: request.notes,
    };

    match repo.create(input).await {
        Ok(invoice) => {
            let record = InvoiceRecord {
                invoice,
                items: vec![],
            };
            match InvoiceResponse::from_record(&record) {
                Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
                Err(e) => {
                    error!(error = %e, "Freshly created invoice fails billing bounds");
                    internal_error_response()
                }
            }
        }
        Err(e) => invoice_error_response(&e),
    }
}

/// GET `/invoices/{invoice_id}` - Fetch one invoice with items and ledger.
async fn get_invoice(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get(InvoiceId::from_uuid(invoice_id)).await {
        Ok(record) => record_response(&record),
        Err(e) => invoice_error_response(&e),
    }
}

/// PATCH `/invoices/{invoice_id}` - Update invoice fields.
async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Response {
    let mut input = UpdateInvoiceInput {
        client_id: request.client_id.map(ClientId::from_uuid),
        pet_id: request.pet_id.map(|id| Some(PetId::from_uuid(id))),
        invoice_date: request.invoice_date,
        due_date: request.due_date.map(Some),
        notes: request.notes.map(Some),
        ..UpdateInvoiceInput::default()
    };

    if let Some(raw) = request.discount_percent.as_ref() {
        let value = coerce_amount("discount_percent", Some(raw));
        if let Err(e) = LedgerCalculator::validate_discount_percent(value) {
            return billing_error_response(&e);
        }
        input.discount_percent = Some(value);
    }
    if let Some(raw) = request.deposit.as_ref() {
        let value = coerce_amount("deposit", Some(raw));
        if let Err(e) = LedgerCalculator::validate_deposit(value) {
            return billing_error_response(&e);
        }
        input.deposit = Some(value);
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    let id = InvoiceId::from_uuid(invoice_id);
    if let Err(e) = repo.update(id, input).await {
        return invoice_error_response(&e);
    }

    match repo.get(id).await {
        Ok(record) => record_response(&record),
        Err(e) => invoice_error_response(&e),
    }
}

/// DELETE `/invoices/{invoice_id}` - Soft-delete an invoice.
async fn delete_invoice(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.soft_delete(InvoiceId::from_uuid(invoice_id)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Invoice deactivated" })),
        )
            .into_response(),
        Err(e) => invoice_error_response(&e),
    }
}

/// POST `/invoices/{invoice_id}/restore` - Restore a soft-deleted invoice.
async fn restore_invoice(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    let id = InvoiceId::from_uuid(invoice_id);
    if let Err(e) = repo.restore(id).await {
        return invoice_error_response(&e);
    }
    match repo.get(id).await {
        Ok(record) => record_response(&record),
        Err(e) => invoice_error_response(&e),
    }
}

/// POST `/invoices/{invoice_id}/mark-paid` - Settle the invoice in full.
///
/// Implemented as `deposit := total`; recomputation takes care of the rest.
async fn mark_paid(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    let id = InvoiceId::from_uuid(invoice_id);

    let record = match repo.get(id).await {
        Ok(record) => record,
        Err(e) => return invoice_error_response(&e),
    };

    let ledger = match record.ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            error!(error = %e, invoice_id = %invoice_id, "Stored invoice fails billing bounds");
            return internal_error_response();
        }
    };

    if let Err(e) = repo
        .set_deposit(id, LedgerCalculator::settlement_deposit(&ledger))
        .await
    {
        return invoice_error_response(&e);
    }

    match repo.get(id).await {
        Ok(record) => record_response(&record),
        Err(e) => invoice_error_response(&e),
    }
}

/// GET `/invoices/{invoice_id}/print` - Render-ready payload for printing.
async fn print_invoice(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    let record = match repo.get(InvoiceId::from_uuid(invoice_id)).await {
        Ok(record) => record,
        Err(e) => return invoice_error_response(&e),
    };

    let ledger = match record.ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            error!(error = %e, invoice_id = %invoice_id, "Stored invoice fails billing bounds");
            return internal_error_response();
        }
    };

    let rows = record
        .items
        .iter()
        .map(|item| PrintRow {
            name: item.item_name.clone(),
            description: item.item_description.clone(),
            item_type: item_type_to_string(item.item_type),
            quantity: item.quantity,
            unit_price: format_currency(item.unit_price),
            discount_percent: format_percent(item.discount_percent),
            net_price: format_currency(line_item_snapshot(item).net_price()),
        })
        .collect();

    let invoice = &record.invoice;
    let discount = (!ledger.discount_amount.is_zero()).then(|| PrintDiscount {
        label: format!("Discount ({})", format_percent(invoice.discount_percent)),
        amount: format!("-{}", format_currency(ledger.discount_amount)),
    });

    let payload = PrintPayload {
        invoice_number: invoice.invoice_number.clone(),
        invoice_date: invoice.invoice_date.to_string(),
        due_date: invoice.due_date.map(|d| d.to_string()),
        client_id: invoice.client_id,
        pet_id: invoice.pet_id,
        notes: invoice.notes.clone(),
        rows,
        subtotal: format_currency(ledger.subtotal),
        discount,
        total: format_currency(ledger.total),
        deposit: format_currency(invoice.deposit),
        balance_due: format_currency(ledger.balance_due),
        status: ledger.status(),
    };

    (StatusCode::OK, Json(payload)).into_response()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds a full invoice response from a record, or a 500 if stored data
/// violates billing bounds.
fn record_response(record: &InvoiceRecord) -> Response {
    match InvoiceResponse::from_record(record) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!(error = %e, invoice_id = %record.invoice.id, "Stored invoice fails billing bounds");
            internal_error_response()
        }
    }
}

/// Maps repository errors onto HTTP responses.
fn invoice_error_response(err: &InvoiceError) -> Response {
    match err {
        InvoiceError::NotFound(id) => {
            app_error_response(&AppError::NotFound(format!("invoice {id}")))
        }
        InvoiceError::DuplicateNumber(number) => app_error_response(&AppError::Conflict(format!(
            "invoice number already exists: {number}"
        ))),
        InvoiceError::Database(e) => {
            error!(error = %e, "Database error");
            internal_error_response()
        }
    }
}
