/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field parser.
//!
//! [`FieldParser`] reads one field of a given type from a message buffer,
//! either in text mode (ASCII digits, hex-encoded binary) or binary mode
//! (packed BCD, raw bytes). Parsers are immutable once built and safe to
//! share between threads.

use crate::bcd;
use crate::datetime;
use crate::decoder::CustomFieldDecoder;
use crate::digits::DigitMode;
use crate::writer::FieldWriter;
use arrayvec::ArrayVec;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use ironiso_core::field_type::AMOUNT_DIGITS;
use ironiso_core::{
    CharEncoding, Clock, CodecConfig, FieldType, IsoValue, ParseError, ParsedField, SystemClock,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Widest NUMERIC value that always fits a `u64`.
const MAX_U64_DIGITS: usize = 19;

/// Field content once its wire layout is resolved.
enum RawField {
    /// Text of ALPHA and the LLVAR family.
    Text(String),
    /// Digits of NUMERIC and AMOUNT.
    Digits(String),
    /// Payload of BINARY and the LLBIN family.
    Bytes(Bytes),
    /// Two-digit groups of a date/time field.
    Date(ArrayVec<i32, 6>),
}

/// Parser for one field definition.
#[derive(Debug, Clone)]
pub struct FieldParser {
    field_type: FieldType,
    length: usize,
    encoding: CharEncoding,
    force_string_decoding: bool,
    timezone: Option<FixedOffset>,
    future_tolerance: Duration,
    clock: Arc<dyn Clock>,
}

impl FieldParser {
    /// Creates a parser with default settings and the given encoding.
    ///
    /// `length` is the declared length. It is ignored by the types with an
    /// implicit length and is the maximum for the variable types, where 0
    /// means no maximum.
    #[must_use]
    pub fn get_instance(field_type: FieldType, length: usize, encoding: CharEncoding) -> Self {
        Self::from_config(field_type, length, &CodecConfig::new().with_encoding(encoding))
    }

    /// Creates a parser from a codec configuration.
    #[must_use]
    pub fn from_config(field_type: FieldType, length: usize, config: &CodecConfig) -> Self {
        debug!(
            %field_type,
            length,
            encoding = %config.encoding,
            force_string_decoding = config.force_string_decoding,
            "building field parser"
        );
        Self {
            field_type,
            length,
            encoding: config.encoding,
            force_string_decoding: config.force_string_decoding,
            timezone: config.timezone,
            future_tolerance: config.future_tolerance,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a parser from a type name and an encoding name.
    ///
    /// # Errors
    /// Returns `ParseError::UnsupportedType` for a name outside the catalog and
    /// `ParseError::UnsupportedEncoding` for an unknown encoding.
    pub fn from_type_name(
        name: &str,
        length: usize,
        encoding_name: &str,
    ) -> Result<Self, ParseError> {
        let field_type: FieldType = name.parse()?;
        let encoding: CharEncoding = encoding_name.parse()?;
        Ok(Self::get_instance(field_type, length, encoding))
    }

    /// Replaces the time source used to complete partial dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the timezone for date/time fields.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Option<FixedOffset>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the future tolerance for date/time fields.
    #[must_use]
    pub const fn with_future_tolerance(mut self, tolerance: Duration) -> Self {
        self.future_tolerance = tolerance;
        self
    }

    /// Sets the timezone for date/time fields.
    pub fn set_timezone(&mut self, timezone: Option<FixedOffset>) {
        self.timezone = timezone;
    }

    /// Sets whether digits are decoded through the character encoding.
    pub fn set_force_string_decoding(&mut self, force: bool) {
        self.force_string_decoding = force;
    }

    /// Sets the character encoding.
    pub fn set_character_encoding(&mut self, encoding: CharEncoding) {
        self.encoding = encoding;
    }

    /// Returns the field type this parser reads.
    #[inline]
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the declared length, or the maximum for variable types.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns the character encoding used for text content.
    #[inline]
    #[must_use]
    pub const fn encoding(&self) -> CharEncoding {
        self.encoding
    }

    /// Returns true if the whole buffer is decoded before slicing.
    #[inline]
    #[must_use]
    pub const fn force_string_decoding(&self) -> bool {
        self.force_string_decoding
    }

    /// Returns the timezone for partial dates, if one is set.
    #[inline]
    #[must_use]
    pub const fn timezone(&self) -> Option<FixedOffset> {
        self.timezone
    }

    /// Returns how far ahead of now a partial date may fall.
    #[inline]
    #[must_use]
    pub const fn future_tolerance(&self) -> Duration {
        self.future_tolerance
    }

    /// Returns a writer for the same field definition.
    #[must_use]
    pub fn writer(&self) -> FieldWriter {
        FieldWriter::new(self.field_type, self.length, self.encoding)
            .with_timezone(self.timezone)
            .with_clock(Arc::clone(&self.clock))
    }

    /// Parses the field from a text-encoded message.
    ///
    /// # Arguments
    /// * `field` - Field index, used in error reports
    /// * `buf` - The whole message
    /// * `offset` - Where the field starts
    ///
    /// # Errors
    /// Returns `ParseError` if the field is truncated or its content does not
    /// match the type.
    pub fn parse_text(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
    ) -> Result<ParsedField<IsoValue>, ParseError> {
        let (raw, consumed) = self.read_text(field, buf, offset)?;
        let value = self.to_value(field, offset, raw)?;
        Ok(ParsedField::new(self.field_type, value, consumed))
    }

    /// Parses the field from a binary-encoded message.
    ///
    /// # Errors
    /// Returns `ParseError` if the field is truncated or its content does not
    /// match the type.
    pub fn parse_binary(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
    ) -> Result<ParsedField<IsoValue>, ParseError> {
        let (raw, consumed) = self.read_binary(field, buf, offset)?;
        let value = self.to_value(field, offset, raw)?;
        Ok(ParsedField::new(self.field_type, value, consumed))
    }

    /// Parses the field from a text-encoded message through `decoder`.
    ///
    /// The decoder replaces the built-in conversion: it receives the field
    /// text (digits for dates, bytes for binary types) and its result is
    /// returned as is.
    ///
    /// # Errors
    /// Returns `ParseError::Decoder` wrapping the decoder's own error, or any
    /// error raised while locating the field.
    pub fn parse_text_with<D>(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        decoder: &D,
    ) -> Result<ParsedField<D::Value>, ParseError>
    where
        D: CustomFieldDecoder + ?Sized,
    {
        let (raw, consumed) = self.read_text(field, buf, offset)?;
        let value = decode_custom(field, offset, raw, decoder)?;
        Ok(ParsedField::new(self.field_type, value, consumed))
    }

    /// Parses the field from a binary-encoded message through `decoder`.
    ///
    /// # Errors
    /// Returns `ParseError::Decoder` wrapping the decoder's own error, or any
    /// error raised while locating the field.
    pub fn parse_binary_with<D>(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        decoder: &D,
    ) -> Result<ParsedField<D::Value>, ParseError>
    where
        D: CustomFieldDecoder + ?Sized,
    {
        let (raw, consumed) = self.read_binary(field, buf, offset)?;
        let value = decode_custom(field, offset, raw, decoder)?;
        Ok(ParsedField::new(self.field_type, value, consumed))
    }

    fn read_text(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
    ) -> Result<(RawField, usize), ParseError> {
        self.check_offset(field, buf, offset)?;
        match self.field_type {
            FieldType::Alpha => {
                let (text, consumed) = self.read_chars(field, buf, offset, 0, self.length)?;
                Ok((RawField::Text(text), consumed))
            }
            FieldType::Numeric | FieldType::Amount => {
                let width = self.digit_count();
                let digits = self.decode_str(field, buf, offset, width)?;
                Ok((RawField::Digits(digits), width))
            }
            FieldType::Binary => {
                let width = self
                    .length
                    .checked_mul(2)
                    .ok_or_else(|| self.insufficient(field, buf, offset, usize::MAX))?;
                self.require(field, buf, offset, width)?;
                let bytes = self.decode_hex(field, offset, &buf[offset..offset + width])?;
                Ok((RawField::Bytes(bytes), width))
            }
            FieldType::LlVar | FieldType::LllVar | FieldType::LlllVar => {
                let digits = self.prefix_digits();
                let len = self.text_prefix(field, buf, offset, digits)?;
                self.check_max(field, offset, len)?;
                let (text, consumed) = self.read_chars(field, buf, offset, digits, len)?;
                Ok((RawField::Text(text), digits + consumed))
            }
            FieldType::LlBin | FieldType::LllBin | FieldType::LlllBin => {
                let digits = self.prefix_digits();
                let len = self.text_prefix(field, buf, offset, digits)?;
                self.check_max(field, offset, len.div_ceil(2))?;
                self.require(field, buf, offset, digits + len)?;
                let start = offset + digits;
                let bytes = self.decode_hex(field, offset, &buf[start..start + len])?;
                Ok((RawField::Bytes(bytes), digits + len))
            }
            FieldType::Date12
            | FieldType::Date10
            | FieldType::Date4
            | FieldType::DateExp
            | FieldType::Time => {
                let width = self.field_type.fixed_length().unwrap_or(0);
                self.require(field, buf, offset, width)?;
                let mode = self.digit_mode();
                let groups = buf[offset..offset + width]
                    .chunks_exact(2)
                    .map(|pair| mode.number(pair).and_then(|v| i32::try_from(v).ok()))
                    .collect::<Option<ArrayVec<i32, 6>>>()
                    .ok_or_else(|| self.invalid_date(field, offset, "digits cannot be decoded"))?;
                Ok((RawField::Date(groups), width))
            }
        }
    }

    fn read_binary(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
    ) -> Result<(RawField, usize), ParseError> {
        self.check_offset(field, buf, offset)?;
        match self.field_type {
            FieldType::Alpha => {
                let (text, consumed) = self.read_chars(field, buf, offset, 0, self.length)?;
                Ok((RawField::Text(text), consumed))
            }
            FieldType::Numeric | FieldType::Amount => {
                let digits = self.digit_count();
                let width = bcd::packed_len(digits);
                self.require(field, buf, offset, width)?;
                let text = bcd::decode_digits(&buf[offset..offset + width], digits);
                Ok((RawField::Digits(text), width))
            }
            FieldType::Binary => {
                self.require(field, buf, offset, self.length)?;
                let bytes = Bytes::copy_from_slice(&buf[offset..offset + self.length]);
                Ok((RawField::Bytes(bytes), self.length))
            }
            FieldType::LlVar | FieldType::LllVar | FieldType::LlllVar => {
                let width = bcd::packed_len(self.prefix_digits());
                let len = self.bcd_prefix(field, buf, offset)?;
                self.check_max(field, offset, len)?;
                let (text, consumed) = self.read_chars(field, buf, offset, width, len)?;
                Ok((RawField::Text(text), width + consumed))
            }
            FieldType::LlBin | FieldType::LllBin | FieldType::LlllBin => {
                let width = bcd::packed_len(self.prefix_digits());
                let len = self.bcd_prefix(field, buf, offset)?;
                self.check_max(field, offset, len)?;
                self.require(field, buf, offset, width + len)?;
                let start = offset + width;
                let bytes = Bytes::copy_from_slice(&buf[start..start + len]);
                Ok((RawField::Bytes(bytes), width + len))
            }
            FieldType::Date12
            | FieldType::Date10
            | FieldType::Date4
            | FieldType::DateExp
            | FieldType::Time => {
                let width = bcd::packed_len(self.field_type.fixed_length().unwrap_or(0));
                self.require(field, buf, offset, width)?;
                let groups = buf[offset..offset + width]
                    .iter()
                    .map(|&b| i32::from(bcd::decode_pair(b)))
                    .collect::<ArrayVec<i32, 6>>();
                Ok((RawField::Date(groups), width))
            }
        }
    }

    fn to_value(&self, field: u32, offset: usize, raw: RawField) -> Result<IsoValue, ParseError> {
        match raw {
            RawField::Text(text) => Ok(IsoValue::Text(text)),
            RawField::Bytes(bytes) => Ok(IsoValue::Binary(bytes)),
            RawField::Digits(digits) => self.number_value(field, offset, digits),
            RawField::Date(groups) => self
                .date_value(field, offset, &groups)
                .map(IsoValue::DateTime),
        }
    }

    fn number_value(
        &self,
        field: u32,
        offset: usize,
        digits: String,
    ) -> Result<IsoValue, ParseError> {
        if self.field_type == FieldType::Amount {
            return match digits.parse::<u64>() {
                Ok(cents) => Ok(IsoValue::Amount(Decimal::from_i128_with_scale(
                    i128::from(cents),
                    2,
                ))),
                Err(_) => Err(self.invalid_number(field, offset, digits)),
            };
        }
        if digits.len() <= MAX_U64_DIGITS {
            return match digits.parse::<u64>() {
                Ok(number) => Ok(IsoValue::Number(number)),
                Err(_) => Err(self.invalid_number(field, offset, digits)),
            };
        }
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(IsoValue::Text(digits))
        } else {
            Err(self.invalid_number(field, offset, digits))
        }
    }

    fn date_value(
        &self,
        field: u32,
        offset: usize,
        groups: &[i32],
    ) -> Result<DateTime<FixedOffset>, ParseError> {
        let now = self.clock.now();
        let timezone = self
            .timezone
            .unwrap_or_else(|| self.clock.local_offset());
        datetime::resolve(self.field_type, groups, now, timezone, self.future_tolerance)
            .map_err(|reason| self.invalid_date(field, offset, &reason))
    }

    /// Reads `chars` characters starting `skip` bytes into the field.
    ///
    /// # Returns
    /// The text and the bytes it occupied.
    fn read_chars(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        skip: usize,
        chars: usize,
    ) -> Result<(String, usize), ParseError> {
        self.require(field, buf, offset, skip)?;
        let rest = &buf[offset + skip..];
        let span = self
            .encoding
            .char_span(rest, chars)
            .ok_or_else(|| self.insufficient(field, buf, offset, skip + chars))?;
        let text = self
            .encoding
            .decode(&rest[..span])
            .ok_or_else(|| self.invalid_encoding(field, offset))?;
        Ok((text.into_owned(), span))
    }

    fn decode_str(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        width: usize,
    ) -> Result<String, ParseError> {
        self.require(field, buf, offset, width)?;
        self.encoding
            .decode(&buf[offset..offset + width])
            .map(|text| text.into_owned())
            .ok_or_else(|| self.invalid_encoding(field, offset))
    }

    fn decode_hex(&self, field: u32, offset: usize, text: &[u8]) -> Result<Bytes, ParseError> {
        let decoded = if text.len() % 2 == 1 {
            let mut padded = Vec::with_capacity(text.len() + 1);
            padded.push(b'0');
            padded.extend_from_slice(text);
            hex::decode(padded)
        } else {
            hex::decode(text)
        };
        decoded.map(Bytes::from).map_err(|_| ParseError::InvalidHex {
            field_type: self.field_type,
            field,
            offset,
        })
    }

    fn text_prefix(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        digits: usize,
    ) -> Result<usize, ParseError> {
        self.require(field, buf, offset, digits)?;
        let len = self
            .digit_mode()
            .number(&buf[offset..offset + digits])
            .and_then(|v| usize::try_from(v).ok())
            .ok_or(ParseError::InvalidLength {
                field_type: self.field_type,
                field,
                offset,
            })?;
        trace!(field, offset, len, field_type = %self.field_type, "decoded length header");
        Ok(len)
    }

    fn bcd_prefix(&self, field: u32, buf: &[u8], offset: usize) -> Result<usize, ParseError> {
        let digits = self.prefix_digits();
        let width = bcd::packed_len(digits);
        self.require(field, buf, offset, width)?;
        let len = bcd::decode_number(&buf[offset..offset + width], digits) as usize;
        trace!(field, offset, len, field_type = %self.field_type, "decoded BCD length header");
        Ok(len)
    }

    fn check_offset(&self, field: u32, buf: &[u8], offset: usize) -> Result<(), ParseError> {
        if offset > buf.len() {
            return Err(ParseError::InvalidOffset {
                field_type: self.field_type,
                field,
                offset,
            });
        }
        Ok(())
    }

    fn require(
        &self,
        field: u32,
        buf: &[u8],
        offset: usize,
        needed: usize,
    ) -> Result<(), ParseError> {
        if needed > buf.len().saturating_sub(offset) {
            return Err(self.insufficient(field, buf, offset, needed));
        }
        Ok(())
    }

    fn check_max(&self, field: u32, offset: usize, length: usize) -> Result<(), ParseError> {
        if self.length > 0 && length > self.length {
            return Err(ParseError::LengthExceeded {
                field_type: self.field_type,
                field,
                offset,
                length,
                max_length: self.length,
            });
        }
        Ok(())
    }

    fn digit_count(&self) -> usize {
        if self.field_type == FieldType::Amount {
            AMOUNT_DIGITS
        } else {
            self.length
        }
    }

    fn prefix_digits(&self) -> usize {
        self.field_type.prefix_digits().unwrap_or(0)
    }

    const fn digit_mode(&self) -> DigitMode {
        DigitMode::new(self.encoding, self.force_string_decoding)
    }

    fn insufficient(&self, field: u32, buf: &[u8], offset: usize, needed: usize) -> ParseError {
        ParseError::InsufficientData {
            field_type: self.field_type,
            field,
            offset,
            needed,
            available: buf.len().saturating_sub(offset),
        }
    }

    fn invalid_number(&self, field: u32, offset: usize, value: String) -> ParseError {
        ParseError::InvalidNumber {
            field_type: self.field_type,
            field,
            offset,
            value,
        }
    }

    fn invalid_date(&self, field: u32, offset: usize, reason: &str) -> ParseError {
        ParseError::InvalidDate {
            field_type: self.field_type,
            field,
            offset,
            reason: reason.to_string(),
        }
    }

    fn invalid_encoding(&self, field: u32, offset: usize) -> ParseError {
        ParseError::InvalidEncoding {
            field_type: self.field_type,
            field,
            offset,
            encoding: self.encoding,
        }
    }
}

fn decode_custom<D>(
    field: u32,
    offset: usize,
    raw: RawField,
    decoder: &D,
) -> Result<D::Value, ParseError>
where
    D: CustomFieldDecoder + ?Sized,
{
    let decoded = match raw {
        RawField::Text(text) | RawField::Digits(text) => decoder.decode_text(&text),
        RawField::Bytes(bytes) => decoder.decode_binary(&bytes),
        RawField::Date(groups) => decoder.decode_text(&datetime::group_digits(&groups)),
    };
    decoded.map_err(|source| ParseError::Decoder {
        field,
        offset,
        source,
    })
}
