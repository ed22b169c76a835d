/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for the IronIso field codec.
//!
//! Parse errors are positional: every variant raised while reading a buffer
//! carries the field index and the offset where the field starts, so the
//! message layer can report which part of the input was malformed.

use crate::encoding::CharEncoding;
use crate::field_type::FieldType;
use thiserror::Error;

/// Result type alias using [`IsoError`] as the error type.
pub type Result<T> = std::result::Result<T, IsoError>;

/// Error type produced by application-supplied field decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all IronIso operations.
#[derive(Debug, Error)]
pub enum IsoError {
    /// Error while parsing a field from a buffer.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error while formatting a value for the wire.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Errors that occur while parsing a field.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The field starts outside the buffer.
    #[error("invalid {field_type} field {field} position {offset}")]
    InvalidOffset {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field was expected.
        offset: usize,
    },

    /// The buffer ends before the field does.
    #[error(
        "insufficient data for {field_type} field {field}, pos {offset}: need {needed} bytes, have {available}"
    )]
    InsufficientData {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// Bytes the field requires from `offset`.
        needed: usize,
        /// Bytes remaining from `offset`.
        available: usize,
    },

    /// A field type name outside the catalog.
    #[error("cannot parse type {name}")]
    UnsupportedType {
        /// The unrecognized type name.
        name: String,
    },

    /// A character encoding name that is not supported.
    #[error("unsupported character encoding: {name}")]
    UnsupportedEncoding {
        /// The unrecognized encoding name.
        name: String,
    },

    /// The length header of a variable field could not be read.
    #[error("invalid {field_type} length header for field {field}, pos {offset}")]
    InvalidLength {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
    },

    /// A variable field announced more data than its declared maximum.
    #[error("{field_type} field {field} pos {offset} too long: {length} exceeds max {max_length}")]
    LengthExceeded {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// Length announced by the prefix.
        length: usize,
        /// Declared maximum length.
        max_length: usize,
    },

    /// A numeric or amount field contains something other than digits.
    #[error("cannot read {field_type} field {field} pos {offset}: '{value}' is not a number")]
    InvalidNumber {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// The offending text.
        value: String,
    },

    /// The digit groups of a date/time field do not form a calendar instant.
    #[error("invalid {field_type} field {field} pos {offset}: {reason}")]
    InvalidDate {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// Which component was out of range.
        reason: String,
    },

    /// A hex-encoded binary field contains non-hex characters.
    #[error("invalid hex data in {field_type} field {field}, pos {offset}")]
    InvalidHex {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
    },

    /// The field bytes are not valid in the configured character encoding.
    #[error("cannot decode {field_type} field {field}, pos {offset} as {encoding}")]
    InvalidEncoding {
        /// Type of the field being parsed.
        field_type: FieldType,
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// The configured encoding.
        encoding: CharEncoding,
    },

    /// An application-supplied decoder rejected the field.
    #[error("custom decoder failed for field {field}, pos {offset}: {source}")]
    Decoder {
        /// Field index within the message.
        field: u32,
        /// Offset where the field starts.
        offset: usize,
        /// The decoder's own error, unchanged.
        #[source]
        source: BoxError,
    },
}

impl ParseError {
    /// Returns the field index this error refers to, if it came from a buffer.
    #[must_use]
    pub const fn field(&self) -> Option<u32> {
        match self {
            Self::InvalidOffset { field, .. }
            | Self::InsufficientData { field, .. }
            | Self::InvalidLength { field, .. }
            | Self::LengthExceeded { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::InvalidHex { field, .. }
            | Self::InvalidEncoding { field, .. }
            | Self::Decoder { field, .. } => Some(*field),
            Self::UnsupportedType { .. } | Self::UnsupportedEncoding { .. } => None,
        }
    }

    /// Returns the buffer offset this error refers to, if any.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidOffset { offset, .. }
            | Self::InsufficientData { offset, .. }
            | Self::InvalidLength { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::InvalidDate { offset, .. }
            | Self::InvalidHex { offset, .. }
            | Self::LengthExceeded { offset, .. }
            | Self::InvalidEncoding { offset, .. }
            | Self::Decoder { offset, .. } => Some(*offset),
            Self::UnsupportedType { .. } | Self::UnsupportedEncoding { .. } => None,
        }
    }

    /// Returns true for configuration errors that no input can fix.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. } | Self::UnsupportedEncoding { .. }
        )
    }
}

/// Errors that occur while formatting a value for the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The field type has no representation for this kind of value.
    #[error("{field_type} cannot format a {value_kind} value")]
    NotApplicable {
        /// Target field type.
        field_type: FieldType,
        /// Kind of value that was supplied.
        value_kind: &'static str,
    },

    /// The value does not fit the declared length.
    #[error("value too long for {field_type}: {length} exceeds {max_length}")]
    ValueTooLong {
        /// Target field type.
        field_type: FieldType,
        /// Length of the formatted value.
        length: usize,
        /// Maximum length allowed.
        max_length: usize,
    },

    /// The amount is negative or does not fit in 12 digits once scaled.
    #[error("amount out of range: {0}")]
    AmountOutOfRange(String),

    /// The text given for an amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The text cannot be represented in the configured character encoding.
    #[error("value cannot be represented in {0}")]
    Unrepresentable(CharEncoding),

    /// The instant does not render into the type's fixed date pattern.
    #[error("date cannot be rendered as {0}")]
    DateUnrenderable(FieldType),
}
