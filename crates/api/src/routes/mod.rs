//! API route definitions.

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::warn;

use vetbill_core::billing::{BillingError, round_display};
use vetbill_shared::AppError;
use vetbill_shared::types::WireDecimal;

use crate::AppState;

pub mod health;
pub mod invoice_items;
pub mod invoices;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(invoices::routes())
        .merge(invoice_items::routes())
}

/// Coerces an optional wire amount into a strict `Decimal`.
///
/// Absent fields default to zero; a value that fails to parse also becomes
/// zero with a logged warning, so a single malformed field cannot poison a
/// whole invoice total.
pub(crate) fn coerce_amount(field: &'static str, value: Option<&WireDecimal>) -> Decimal {
    match value {
        None => Decimal::ZERO,
        Some(raw) => raw.to_decimal().unwrap_or_else(|| {
            warn!(field, payload = ?raw, "Unparsable wire amount, treating as 0");
            Decimal::ZERO
        }),
    }
}

/// Formats an amount as a plain 2-decimal string for JSON responses.
pub(crate) fn money_string(amount: Decimal) -> String {
    format!("{:.2}", round_display(amount))
}

/// Builds a JSON error response.
pub(crate) fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

/// Maps an application error onto its response using the shared
/// status/code mapping.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.error_code(), &err.to_string())
}

/// Maps a billing validation failure onto its response.
pub(crate) fn billing_error_response(err: &BillingError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    error_response(status, err.error_code(), &err.to_string())
}

/// Standard 500 response that hides internals from the client.
pub(crate) fn internal_error_response() -> Response {
    app_error_response(&AppError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_coerce_amount_absent_defaults_to_zero() {
        assert_eq!(coerce_amount("deposit", None), dec!(0));
    }

    #[test]
    fn test_coerce_amount_number_and_string() {
        let number = WireDecimal::from(dec!(12.5));
        assert_eq!(coerce_amount("deposit", Some(&number)), dec!(12.5));

        let text = WireDecimal::Text("99.95".to_string());
        assert_eq!(coerce_amount("deposit", Some(&text)), dec!(99.95));
    }

    #[test]
    fn test_coerce_amount_garbage_becomes_zero() {
        let garbage = WireDecimal::Text("not-a-number".to_string());
        assert_eq!(coerce_amount("unit_price", Some(&garbage)), dec!(0));
    }

    #[test]
    fn test_money_string_fixed_decimals() {
        assert_eq!(money_string(dec!(75)), "75.00");
        assert_eq!(money_string(dec!(0.005)), "0.01");
        assert_eq!(money_string(dec!(-50)), "-50.00");
    }
}
