//! Invoice line item routes.
//!
//! Adding, editing, or removing an item changes what the next ledger
//! derivation sees; there is no stored total to resynchronize afterwards.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use vetbill_core::billing::{LedgerCalculator, LineItem};
use vetbill_db::entities::{invoice_items, sea_orm_active_enums::ItemType};
use vetbill_db::repositories::invoice::{InvoiceError, InvoiceRepository, line_item_snapshot};
use vetbill_db::repositories::invoice_item::{
    CreateLineItemInput, InvoiceItemError, InvoiceItemRepository, UpdateLineItemInput,
};
use vetbill_shared::AppError;
use vetbill_shared::types::{InvoiceId, LineItemId, ProductId, ServiceId, WireDecimal};

use super::{
    app_error_response, billing_error_response, coerce_amount, internal_error_response,
    money_string,
};
use crate::AppState;

/// Creates the line item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{invoice_id}/items", get(list_items))
        .route("/invoices/{invoice_id}/items", post(create_item))
        .route("/invoice-items/{item_id}", patch(update_item))
        .route("/invoice-items/{item_id}", delete(delete_item))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for attaching a line item to an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateLineItemRequest {
    /// "service" or "product".
    pub item_type: String,
    /// Catalog service reference.
    pub service_id: Option<Uuid>,
    /// Catalog product reference.
    pub product_id: Option<Uuid>,
    /// Name snapshot for historical display.
    pub item_name: String,
    /// Description snapshot.
    pub item_description: Option<String>,
    /// Price per unit (number or string on the wire).
    pub unit_price: WireDecimal,
    /// Number of units; defaults to 1.
    pub quantity: Option<u32>,
    /// Item-level discount percent.
    pub discount_percent: Option<WireDecimal>,
}

/// Request body for updating a line item. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateLineItemRequest {
    /// New name snapshot.
    pub item_name: Option<String>,
    /// New description snapshot.
    pub item_description: Option<String>,
    /// New unit price.
    pub unit_price: Option<WireDecimal>,
    /// New quantity.
    pub quantity: Option<u32>,
    /// New item-level discount percent.
    pub discount_percent: Option<WireDecimal>,
}

/// Response for a line item, including its derived net price.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    /// Line item ID.
    pub id: Uuid,
    /// Parent invoice ID.
    pub invoice_id: Uuid,
    /// "service" or "product".
    pub item_type: String,
    /// Catalog service reference.
    pub service_id: Option<Uuid>,
    /// Catalog product reference.
    pub product_id: Option<Uuid>,
    /// Name snapshot.
    pub item_name: String,
    /// Description snapshot.
    pub item_description: Option<String>,
    /// Unit price at attachment time.
    pub unit_price: String,
    /// Number of units.
    pub quantity: i32,
    /// Item-level discount percent.
    pub discount_percent: String,
    /// Derived net price after the item discount.
    pub net_price: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl LineItemResponse {
    /// Builds the response from a stored row, deriving the net price.
    #[must_use]
    pub fn from_model(model: &invoice_items::Model) -> Self {
        Self {
            id: model.id,
            invoice_id: model.invoice_id,
            item_type: item_type_to_string(model.item_type),
            service_id: model.service_id,
            product_id: model.product_id,
            item_name: model.item_name.clone(),
            item_description: model.item_description.clone(),
            unit_price: money_string(model.unit_price),
            quantity: model.quantity,
            discount_percent: model.discount_percent.to_string(),
            net_price: money_string(line_item_snapshot(model).net_price()),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/invoices/{invoice_id}/items` - Active line items of an invoice.
async fn list_items(State(state): State<AppState>, Path(invoice_id): Path<Uuid>) -> Response {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get(InvoiceId::from_uuid(invoice_id)).await {
        Ok(record) => {
            let items: Vec<LineItemResponse> = record
                .items
                .iter()
                .map(LineItemResponse::from_model)
                .collect();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(InvoiceError::NotFound(id)) => {
            app_error_response(&AppError::NotFound(format!("invoice {id}")))
        }
        Err(e) => {
            error!(error = %e, "Failed to list invoice items");
            internal_error_response()
        }
    }
}

/// POST `/invoices/{invoice_id}/items` - Attach a line item.
async fn create_item(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(request): Json<CreateLineItemRequest>,
) -> Response {
    let Some(item_type) = parse_item_type(&request.item_type) else {
        return app_error_response(&AppError::Validation(format!(
            "unknown item type: {}",
            request.item_type
        )));
    };

    let unit_price = coerce_amount("unit_price", Some(&request.unit_price));
    let quantity = request.quantity.unwrap_or(1);
    let discount_percent = coerce_amount("discount_percent", request.discount_percent.as_ref());

    let snapshot = LineItem::new(unit_price, quantity, discount_percent);
    if let Err(e) = LedgerCalculator::validate_line_item(&snapshot) {
        return billing_error_response(&e);
    }

    let repo = InvoiceItemRepository::new((*state.db).clone());
    let input = CreateLineItemInput {
        invoice_id: InvoiceId::from_uuid(invoice_id),
        item_type,
        service_id: request.service_id.map(ServiceId::from_uuid),
        product_id: request.product_id.map(ProductId::from_uuid),
        item_name: request.item_name,
        item_description: request.item_description,
        unit_price,
        quantity,
        discount_percent,
    };

    match repo.create(input).await {
        Ok(item) => (StatusCode::CREATED, Json(LineItemResponse::from_model(&item))).into_response(),
        Err(e) => item_error_response(&e),
    }
}

/// PATCH `/invoice-items/{item_id}` - Edit a line item snapshot.
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateLineItemRequest>,
) -> Response {
    let repo = InvoiceItemRepository::new((*state.db).clone());
    let id = LineItemId::from_uuid(item_id);

    let current = match repo.get(id).await {
        Ok(model) => model,
        Err(e) => return item_error_response(&e),
    };

    let unit_price = request
        .unit_price
        .as_ref()
        .map(|raw| coerce_amount("unit_price", Some(raw)));
    let discount_percent = request
        .discount_percent
        .as_ref()
        .map(|raw| coerce_amount("discount_percent", Some(raw)));

    // Validate the merged snapshot so a partial edit cannot push the item
    // outside billing bounds.
    let merged = {
        let base = line_item_snapshot(&current);
        LineItem::new(
            unit_price.unwrap_or(base.unit_price),
            request.quantity.unwrap_or(base.quantity),
            discount_percent.unwrap_or(base.discount_percent),
        )
    };
    if let Err(e) = LedgerCalculator::validate_line_item(&merged) {
        return billing_error_response(&e);
    }

    let input = UpdateLineItemInput {
        item_name: request.item_name,
        item_description: request.item_description.map(Some),
        unit_price,
        quantity: request.quantity,
        discount_percent,
    };

    match repo.update(id, input).await {
        Ok(item) => (StatusCode::OK, Json(LineItemResponse::from_model(&item))).into_response(),
        Err(e) => item_error_response(&e),
    }
}

/// DELETE `/invoice-items/{item_id}` - Soft-delete a line item.
async fn delete_item(State(state): State<AppState>, Path(item_id): Path<Uuid>) -> Response {
    let repo = InvoiceItemRepository::new((*state.db).clone());
    match repo.soft_delete(LineItemId::from_uuid(item_id)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Invoice item removed" })),
        )
            .into_response(),
        Err(e) => item_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts an item type string to the enum value.
pub(crate) fn parse_item_type(s: &str) -> Option<ItemType> {
    match s.to_lowercase().as_str() {
        "service" => Some(ItemType::Service),
        "product" => Some(ItemType::Product),
        _ => None,
    }
}

/// Converts an item type enum to its wire string.
pub(crate) fn item_type_to_string(item_type: ItemType) -> String {
    match item_type {
        ItemType::Service => "service".to_string(),
        ItemType::Product => "product".to_string(),
    }
}

/// Maps repository errors onto HTTP responses.
fn item_error_response(err: &InvoiceItemError) -> Response {
    match err {
        InvoiceItemError::NotFound(id) => {
            app_error_response(&AppError::NotFound(format!("invoice item {id}")))
        }
        InvoiceItemError::InvoiceNotFound(id) => {
            app_error_response(&AppError::NotFound(format!("invoice {id}")))
        }
        InvoiceItemError::Database(e) => {
            error!(error = %e, "Database error");
            internal_error_response()
        }
    }
}
