/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! The ISO 8583 field type catalog.
//!
//! This module provides:
//! - [`FieldType`]: The closed set of wire encodings
//! - [`FieldKind`]: How a type interprets its bytes
//! - [`LengthClass`]: Where a type's length comes from
//!
//! Each [`FieldType`] also carries the canonical text formatting rules used
//! when writing outbound messages.

use crate::error::{FormatError, ParseError};
use crate::value::IsoValue;
use arrayvec::ArrayString;
use chrono::{DateTime, FixedOffset, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Number of digits in an AMOUNT field.
pub const AMOUNT_DIGITS: usize = 12;

/// Exclusive upper bound of the cents an AMOUNT field can carry.
const AMOUNT_LIMIT: i128 = 1_000_000_000_000;

/// ISO 8583 field type.
///
/// The catalog is closed: every match over it is exhaustive, so adding a
/// wire encoding is a compile-time checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Fixed-length numeric, zero padded on the left.
    #[serde(rename = "NUMERIC")]
    Numeric,
    /// Fixed-length alphanumeric, space padded on the right.
    #[serde(rename = "ALPHA")]
    Alpha,
    /// 12-digit amount with two implicit decimal places.
    #[serde(rename = "AMOUNT")]
    Amount,
    /// Fixed-length binary data.
    #[serde(rename = "BINARY")]
    Binary,
    /// Variable text with a 2-digit length prefix.
    #[serde(rename = "LLVAR")]
    LlVar,
    /// Variable text with a 3-digit length prefix.
    #[serde(rename = "LLLVAR")]
    LllVar,
    /// Variable text with a 4-digit length prefix.
    #[serde(rename = "LLLLVAR")]
    LlllVar,
    /// Variable binary with a 2-digit length prefix.
    #[serde(rename = "LLBIN")]
    LlBin,
    /// Variable binary with a 3-digit length prefix.
    #[serde(rename = "LLLBIN")]
    LllBin,
    /// Variable binary with a 4-digit length prefix.
    #[serde(rename = "LLLLBIN")]
    LlllBin,
    /// Date and time `yyMMddHHmmss`.
    #[serde(rename = "DATE12")]
    Date12,
    /// Date and time without year, `MMddHHmmss`.
    #[serde(rename = "DATE10")]
    Date10,
    /// Date without year, `MMdd`.
    #[serde(rename = "DATE4")]
    Date4,
    /// Card expiration date, `yyMM`.
    #[serde(rename = "DATE_EXP")]
    DateExp,
    /// Time of day, `HHmmss`.
    #[serde(rename = "TIME")]
    Time,
}

/// How a field type interprets its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Fixed-width decimal digits.
    FixedNumeric,
    /// Fixed-width text.
    FixedAlpha,
    /// Fixed-width raw bytes.
    FixedBinary,
    /// Length-prefixed text.
    VariableText,
    /// Length-prefixed raw bytes.
    VariableBinary,
    /// Calendar date with some components omitted.
    PartialDate,
    /// Time of day only.
    PartialTime,
}

/// Where the length of a field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthClass {
    /// Declared by the message template.
    Declared,
    /// Fixed by the type itself, in digits or characters.
    Implicit(usize),
    /// Read from a length prefix with the given number of digits.
    Prefixed(usize),
}

impl FieldType {
    /// Every field type in the catalog.
    pub const ALL: [Self; 15] = [
        Self::Numeric,
        Self::Alpha,
        Self::Amount,
        Self::Binary,
        Self::LlVar,
        Self::LllVar,
        Self::LlllVar,
        Self::LlBin,
        Self::LllBin,
        Self::LlllBin,
        Self::Date12,
        Self::Date10,
        Self::Date4,
        Self::DateExp,
        Self::Time,
    ];

    /// Returns the wire-standard name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Alpha => "ALPHA",
            Self::Amount => "AMOUNT",
            Self::Binary => "BINARY",
            Self::LlVar => "LLVAR",
            Self::LllVar => "LLLVAR",
            Self::LlllVar => "LLLLVAR",
            Self::LlBin => "LLBIN",
            Self::LllBin => "LLLBIN",
            Self::LlllBin => "LLLLBIN",
            Self::Date12 => "DATE12",
            Self::Date10 => "DATE10",
            Self::Date4 => "DATE4",
            Self::DateExp => "DATE_EXP",
            Self::Time => "TIME",
        }
    }

    /// Returns how this type interprets its bytes.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Numeric | Self::Amount => FieldKind::FixedNumeric,
            Self::Alpha => FieldKind::FixedAlpha,
            Self::Binary => FieldKind::FixedBinary,
            Self::LlVar | Self::LllVar | Self::LlllVar => FieldKind::VariableText,
            Self::LlBin | Self::LllBin | Self::LlllBin => FieldKind::VariableBinary,
            Self::Date12 | Self::Date10 | Self::Date4 | Self::DateExp => FieldKind::PartialDate,
            Self::Time => FieldKind::PartialTime,
        }
    }

    /// Returns where the length of this type comes from.
    #[must_use]
    pub const fn length_class(self) -> LengthClass {
        match self {
            Self::Numeric | Self::Alpha | Self::Binary => LengthClass::Declared,
            Self::Amount | Self::Date12 => LengthClass::Implicit(12),
            Self::Date10 => LengthClass::Implicit(10),
            Self::Date4 | Self::DateExp => LengthClass::Implicit(4),
            Self::Time => LengthClass::Implicit(6),
            Self::LlVar | Self::LlBin => LengthClass::Prefixed(2),
            Self::LllVar | Self::LllBin => LengthClass::Prefixed(3),
            Self::LlllVar | Self::LlllBin => LengthClass::Prefixed(4),
        }
    }

    /// Returns true if the template must declare a length for this type.
    #[inline]
    #[must_use]
    pub const fn needs_length(self) -> bool {
        matches!(self.length_class(), LengthClass::Declared)
    }

    /// Returns the implicit length in digits, if the type has one.
    #[inline]
    #[must_use]
    pub const fn fixed_length(self) -> Option<usize> {
        match self.length_class() {
            LengthClass::Implicit(len) => Some(len),
            _ => None,
        }
    }

    /// Returns the number of digits in the length prefix of a variable type.
    #[inline]
    #[must_use]
    pub const fn prefix_digits(self) -> Option<usize> {
        match self.length_class() {
            LengthClass::Prefixed(digits) => Some(digits),
            _ => None,
        }
    }

    /// Returns true for the length-prefixed types.
    #[inline]
    #[must_use]
    pub const fn is_variable(self) -> bool {
        self.prefix_digits().is_some()
    }

    /// Returns true for the date and time types.
    #[inline]
    #[must_use]
    pub const fn is_date(self) -> bool {
        matches!(self.kind(), FieldKind::PartialDate | FieldKind::PartialTime)
    }

    /// Returns true for the types that carry raw bytes.
    #[inline]
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(
            self.kind(),
            FieldKind::FixedBinary | FieldKind::VariableBinary
        )
    }

    /// Returns the `chrono` pattern of a date/time type.
    #[must_use]
    pub const fn date_pattern(self) -> Option<&'static str> {
        match self {
            Self::Date12 => Some("%y%m%d%H%M%S"),
            Self::Date10 => Some("%m%d%H%M%S"),
            Self::Date4 => Some("%m%d"),
            Self::DateExp => Some("%y%m"),
            Self::Time => Some("%H%M%S"),
            _ => None,
        }
    }

    /// Formats a text value for this type.
    ///
    /// # Arguments
    /// * `value` - The text to format
    /// * `length` - The declared length (ignored by the implicit and variable types)
    ///
    /// # Errors
    /// Returns `FormatError::ValueTooLong` when a NUMERIC or BINARY value is longer
    /// than `length`, `FormatError::InvalidAmount` when an AMOUNT is not a decimal,
    /// and `FormatError::NotApplicable` for the date/time types.
    pub fn format_str(self, value: &str, length: usize) -> Result<String, FormatError> {
        match self {
            Self::Alpha => {
                let mut out: String = value.chars().take(length).collect();
                let count = out.chars().count();
                out.extend(std::iter::repeat_n(' ', length - count));
                Ok(out)
            }
            Self::Numeric => {
                let count = value.chars().count();
                if count > length {
                    return Err(self.too_long(count, length));
                }
                let mut out = "0".repeat(length - count);
                out.push_str(value);
                Ok(out)
            }
            Self::Amount => {
                let amount = Decimal::from_str(value.trim())
                    .map_err(|_| FormatError::InvalidAmount(value.to_string()))?;
                self.format_decimal(amount, length)
            }
            Self::Binary => {
                let count = value.chars().count();
                let width = length * 2;
                if count > width {
                    return Err(self.too_long(count, width));
                }
                let mut out = value.to_string();
                out.extend(std::iter::repeat_n('0', width - count));
                Ok(out)
            }
            Self::LlVar
            | Self::LllVar
            | Self::LlllVar
            | Self::LlBin
            | Self::LllBin
            | Self::LlllBin => Ok(value.to_string()),
            Self::Date12 | Self::Date10 | Self::Date4 | Self::DateExp | Self::Time => {
                Err(self.not_applicable("text"))
            }
        }
    }

    /// Formats an unsigned integer for this type.
    ///
    /// AMOUNT treats the integer as whole currency units, so `12345` becomes
    /// `000001234500`.
    ///
    /// # Errors
    /// Returns `FormatError` when the value does not fit or the type is not textual.
    pub fn format_number(self, value: u64, length: usize) -> Result<String, FormatError> {
        match self {
            Self::Amount => {
                let cents = i128::from(value) * 100;
                if cents >= AMOUNT_LIMIT {
                    return Err(FormatError::AmountOutOfRange(value.to_string()));
                }
                Ok(format!("{cents:012}"))
            }
            Self::Binary
            | Self::LlBin
            | Self::LllBin
            | Self::LlllBin
            | Self::Date12
            | Self::Date10
            | Self::Date4
            | Self::DateExp
            | Self::Time => Err(self.not_applicable("number")),
            Self::Numeric | Self::Alpha | Self::LlVar | Self::LllVar | Self::LlllVar => {
                let mut buf = itoa::Buffer::new();
                self.format_str(buf.format(value), length)
            }
        }
    }

    /// Formats a decimal value for this type.
    ///
    /// For AMOUNT the value is rounded half away from zero to two decimal places,
    /// the separator is dropped and the digits are zero padded to 12. The textual
    /// types receive the plain decimal representation.
    ///
    /// # Errors
    /// Returns `FormatError::AmountOutOfRange` for negative amounts and amounts
    /// that need more than 12 digits.
    pub fn format_decimal(self, value: Decimal, length: usize) -> Result<String, FormatError> {
        match self {
            Self::Amount => {
                let mut rounded =
                    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(2);
                let cents = rounded.mantissa();
                if !(0..AMOUNT_LIMIT).contains(&cents) {
                    return Err(FormatError::AmountOutOfRange(value.to_string()));
                }
                Ok(format!("{cents:012}"))
            }
            Self::Numeric | Self::Alpha | Self::LlVar | Self::LllVar | Self::LlllVar => {
                self.format_str(&value.to_string(), length)
            }
            Self::Binary
            | Self::LlBin
            | Self::LllBin
            | Self::LlllBin
            | Self::Date12
            | Self::Date10
            | Self::Date4
            | Self::DateExp
            | Self::Time => Err(self.not_applicable("decimal")),
        }
    }

    /// Formats an instant for a date/time type, viewed in timezone `tz`.
    ///
    /// # Errors
    /// Returns `FormatError::NotApplicable` for the non-date types and
    /// `FormatError::DateUnrenderable` if the rendered text does not fit.
    pub fn format_date<Tz: TimeZone>(
        self,
        value: &DateTime<Tz>,
        tz: &FixedOffset,
    ) -> Result<ArrayString<12>, FormatError> {
        let pattern = self
            .date_pattern()
            .ok_or_else(|| self.not_applicable("date"))?;
        let local = value.with_timezone(tz);
        let mut buf = ArrayString::new();
        write!(buf, "{}", local.format(pattern))
            .map_err(|_| FormatError::DateUnrenderable(self))?;
        Ok(buf)
    }

    /// Formats binary data for this type as upper-case hex.
    ///
    /// BINARY is padded with `'0'` on the right to `length * 2` hex digits.
    ///
    /// # Errors
    /// Returns `FormatError` when the data is longer than `length` or the type is
    /// not binary.
    pub fn format_binary(self, value: &[u8], length: usize) -> Result<String, FormatError> {
        match self.kind() {
            FieldKind::FixedBinary => self.format_str(&hex::encode_upper(value), length),
            FieldKind::VariableBinary => Ok(hex::encode_upper(value)),
            _ => Err(self.not_applicable("binary")),
        }
    }

    /// Formats any built-in value for this type.
    ///
    /// # Arguments
    /// * `value` - The value to format
    /// * `length` - The declared length
    /// * `tz` - Timezone used to render date/time values
    ///
    /// # Errors
    /// Returns `FormatError` if the value does not fit the type.
    pub fn format_value(
        self,
        value: &IsoValue,
        length: usize,
        tz: &FixedOffset,
    ) -> Result<String, FormatError> {
        match value {
            IsoValue::Text(text) => self.format_str(text, length),
            IsoValue::Number(number) => self.format_number(*number, length),
            IsoValue::Amount(amount) => self.format_decimal(*amount, length),
            IsoValue::Binary(bytes) => self.format_binary(bytes, length),
            IsoValue::DateTime(instant) => {
                self.format_date(instant, tz).map(|digits| digits.to_string())
            }
        }
    }

    fn too_long(self, length: usize, max_length: usize) -> FormatError {
        FormatError::ValueTooLong {
            field_type: self,
            length,
            max_length,
        }
    }

    fn not_applicable(self, value_kind: &'static str) -> FormatError {
        FormatError::NotApplicable {
            field_type: self,
            value_kind,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = ParseError;

    /// Resolves a field type from its wire-standard name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|field_type| field_type.name() == upper)
            .ok_or_else(|| ParseError::UnsupportedType {
                name: s.to_string(),
            })
    }
}
