/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field values produced by the codec.

use crate::field_type::FieldType;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in value of a parsed ISO 8583 field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsoValue {
    /// Text from ALPHA and the LLVAR family, or a NUMERIC too wide for `u64`.
    Text(String),
    /// NUMERIC value of up to 19 digits.
    Number(u64),
    /// AMOUNT value with two decimal places.
    Amount(Decimal),
    /// BINARY and LLBIN family payload.
    Binary(Bytes),
    /// Reconstructed date/time instant.
    DateTime(DateTime<FixedOffset>),
}

impl IsoValue {
    /// Returns the value as a string, if it is a Text variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is a Number variant.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is an Amount variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Amount(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as bytes, if it is a Binary variant.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as an instant, if it is a DateTime variant.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl fmt::Display for IsoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(v) => write!(f, "{}", v),
            Self::Amount(v) => write!(f, "{}", v),
            Self::Binary(b) => write!(f, "{}", hex::encode_upper(b)),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<String> for IsoValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for IsoValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for IsoValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<Decimal> for IsoValue {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

impl From<Bytes> for IsoValue {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<DateTime<FixedOffset>> for IsoValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

/// Result of parsing one field from a buffer.
///
/// The parser does not keep it; the caller owns the value and uses
/// [`ParsedField::next_offset`] to continue with the following field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField<T> {
    /// The type the field was parsed as.
    pub field_type: FieldType,
    /// The decoded value.
    pub value: T,
    /// Bytes consumed from the buffer, including any length prefix.
    pub consumed: usize,
}

impl<T> ParsedField<T> {
    /// Creates a new parsed field.
    #[inline]
    #[must_use]
    pub const fn new(field_type: FieldType, value: T, consumed: usize) -> Self {
        Self {
            field_type,
            value,
            consumed,
        }
    }

    /// Returns the offset right after this field.
    ///
    /// # Arguments
    /// * `start` - The offset the field was parsed from
    #[inline]
    #[must_use]
    pub const fn next_offset(&self, start: usize) -> usize {
        start + self.consumed
    }

    /// Returns the decoded value, dropping the bookkeeping.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Maps the value while keeping the type and consumed length.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ParsedField<U> {
        ParsedField {
            field_type: self.field_type,
            value: f(self.value),
            consumed: self.consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_iso_value_accessors() {
        assert_eq!(IsoValue::from("hola").as_str(), Some("hola"));
        assert_eq!(IsoValue::from(42u64).as_u64(), Some(42));
        assert_eq!(IsoValue::from(42u64).as_str(), None);
        let amount = Decimal::from_str("12.34").unwrap();
        assert_eq!(IsoValue::from(amount).as_decimal(), Some(amount));
        let bytes = Bytes::from_static(&[1, 2]);
        assert_eq!(IsoValue::from(bytes).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_iso_value_display() {
        assert_eq!(IsoValue::Number(7).to_string(), "7");
        assert_eq!(
            IsoValue::Binary(Bytes::from_static(&[0xCA, 0xFE])).to_string(),
            "CAFE"
        );
    }

    #[test]
    fn test_parsed_field_offsets() {
        let parsed = ParsedField::new(FieldType::LlVar, "hola".to_string(), 6);
        assert_eq!(parsed.next_offset(10), 16);
        let mapped = parsed.map(|s| s.len());
        assert_eq!(mapped.value, 4);
        assert_eq!(mapped.consumed, 6);
        assert_eq!(mapped.field_type, FieldType::LlVar);
    }
}
