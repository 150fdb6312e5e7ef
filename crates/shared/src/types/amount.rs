//! Wire-amount coercion for numeric fields.
//!
//! The frontend and older API clients deliver monetary fields as either a
//! JSON number or a string (`"12.50"`). `WireDecimal` models that shape so
//! coercion happens once at the system edge; everything past the DTO layer
//! works with strict `Decimal` values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A decimal value as delivered on the wire: number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireDecimal {
    /// A JSON number, or a numeric string the `Decimal` deserializer accepts.
    Number(Decimal),
    /// Any other string payload, parsed on demand.
    Text(String),
}

impl WireDecimal {
    /// Attempts to coerce the wire value into a `Decimal`.
    ///
    /// Returns `None` when the payload does not parse as a decimal number.
    /// Callers decide how to handle the failure; the API layer substitutes
    /// zero and logs a warning rather than letting a malformed field poison
    /// a whole invoice total.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

impl From<Decimal> for WireDecimal {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_from_number() {
        let value: WireDecimal = serde_json::from_str("12.5").unwrap();
        assert_eq!(value.to_decimal(), Some(dec!(12.5)));
    }

    #[test]
    fn test_deserialize_from_string() {
        let value: WireDecimal = serde_json::from_str(r#""99.95""#).unwrap();
        assert_eq!(value.to_decimal(), Some(dec!(99.95)));
    }

    #[test]
    fn test_deserialize_from_padded_string() {
        let value = WireDecimal::Text("  42.00 ".to_string());
        assert_eq!(value.to_decimal(), Some(dec!(42.00)));
    }

    #[test]
    fn test_garbage_string_does_not_parse() {
        let value: WireDecimal = serde_json::from_str(r#""not-a-number""#).unwrap();
        assert_eq!(value.to_decimal(), None);
    }

    #[test]
    fn test_integer_number() {
        let value: WireDecimal = serde_json::from_str("200").unwrap();
        assert_eq!(value.to_decimal(), Some(dec!(200)));
    }

    #[test]
    fn test_from_decimal() {
        let value = WireDecimal::from(dec!(7.25));
        assert_eq!(value.to_decimal(), Some(dec!(7.25)));
    }
}
