/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field writer.
//!
//! [`FieldWriter`] is the encoding counterpart of [`FieldParser`](crate::FieldParser):
//! whatever it writes, a parser of the same definition reads back.

use crate::bcd;
use crate::decoder::CustomFieldEncoder;
use bytes::{BufMut, Bytes, BytesMut};
use chrono::FixedOffset;
use ironiso_core::{CharEncoding, Clock, FieldType, FormatError, IsoValue, SystemClock};
use std::borrow::Cow;
use std::sync::Arc;

/// Writer for one field definition.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    field_type: FieldType,
    length: usize,
    encoding: CharEncoding,
    timezone: Option<FixedOffset>,
    clock: Arc<dyn Clock>,
}

impl FieldWriter {
    /// Creates a writer for a field definition.
    #[must_use]
    pub fn new(field_type: FieldType, length: usize, encoding: CharEncoding) -> Self {
        Self {
            field_type,
            length,
            encoding,
            timezone: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the timezone date/time values are rendered in.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Option<FixedOffset>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Replaces the clock whose local offset is used when no timezone is set.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the field type this writer produces.
    #[inline]
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Formats `value` as the field's text, without a length prefix.
    ///
    /// # Errors
    /// Returns `FormatError` if the value does not fit the type.
    pub fn format(&self, value: &IsoValue) -> Result<String, FormatError> {
        let timezone = self
            .timezone
            .unwrap_or_else(|| self.clock.local_offset());
        self.field_type.format_value(value, self.length, &timezone)
    }

    /// Writes `value` in text mode.
    ///
    /// Variable types get an ASCII length prefix; BINARY types are written as
    /// uppercase hex.
    ///
    /// # Returns
    /// The number of bytes written.
    ///
    /// # Errors
    /// Returns `FormatError` if the value does not fit the type or cannot be
    /// represented in the encoding.
    pub fn write_text(&self, value: &IsoValue, out: &mut BytesMut) -> Result<usize, FormatError> {
        let text = self.format(value)?;
        self.put_text(&text, out)
    }

    /// Writes an application value in text mode through `encoder`.
    ///
    /// Date/time types take the encoder's text as is; the other types pad or
    /// validate it like built-in text.
    ///
    /// # Errors
    /// Returns `FormatError` if the text does not fit the type.
    pub fn write_text_with<E>(
        &self,
        value: &E::Value,
        encoder: &E,
        out: &mut BytesMut,
    ) -> Result<usize, FormatError>
    where
        E: CustomFieldEncoder + ?Sized,
    {
        let raw = encoder.encode_text(value);
        let text = if self.field_type.is_date() {
            raw
        } else {
            self.field_type.format_str(&raw, self.length)?
        };
        self.put_text(&text, out)
    }

    /// Writes `value` in binary mode.
    ///
    /// NUMERIC, AMOUNT and date/time values are packed BCD, variable types get
    /// a BCD length prefix, and binary payloads are written raw.
    ///
    /// # Returns
    /// The number of bytes written.
    ///
    /// # Errors
    /// Returns `FormatError` if the value does not fit the type.
    pub fn write_binary(&self, value: &IsoValue, out: &mut BytesMut) -> Result<usize, FormatError> {
        let start = out.len();
        match self.field_type {
            FieldType::Alpha => {
                let text = self.format(value)?;
                out.put_slice(&self.encode(&text)?);
            }
            FieldType::Numeric
            | FieldType::Amount
            | FieldType::Date12
            | FieldType::Date10
            | FieldType::Date4
            | FieldType::DateExp
            | FieldType::Time => {
                let digits = self.format(value)?;
                if !bcd::encode_digits(&digits, out) {
                    return Err(FormatError::NotApplicable {
                        field_type: self.field_type,
                        value_kind: "non-digit text",
                    });
                }
            }
            FieldType::Binary => {
                let payload = self.payload(value)?;
                if payload.len() > self.length {
                    return Err(self.too_long(payload.len(), self.length));
                }
                out.put_slice(&payload);
                out.put_bytes(0, self.length - payload.len());
            }
            FieldType::LlVar | FieldType::LllVar | FieldType::LlllVar => {
                let text = self.format(value)?;
                let count = text.chars().count();
                let digits = self.prefix_width(count)?;
                self.check_max(count)?;
                let bytes = self.encode(&text)?;
                bcd::encode_number(count, digits, out);
                out.put_slice(&bytes);
            }
            FieldType::LlBin | FieldType::LllBin | FieldType::LlllBin => {
                let payload = self.payload(value)?;
                let digits = self.prefix_width(payload.len())?;
                self.check_max(payload.len())?;
                bcd::encode_number(payload.len(), digits, out);
                out.put_slice(&payload);
            }
        }
        Ok(out.len() - start)
    }

    fn put_text(&self, text: &str, out: &mut BytesMut) -> Result<usize, FormatError> {
        let start = out.len();
        let bytes = self.encode(text)?;
        if self.field_type.is_variable() {
            let count = if self.field_type.is_binary() {
                text.len()
            } else {
                text.chars().count()
            };
            let digits = self.prefix_width(count)?;
            if self.field_type.is_binary() {
                self.check_max(count.div_ceil(2))?;
            } else {
                self.check_max(count)?;
            }
            out.put_slice(format!("{count:0digits$}").as_bytes());
        }
        out.put_slice(&bytes);
        Ok(out.len() - start)
    }

    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, FormatError> {
        self.encoding
            .encode(text)
            .ok_or(FormatError::Unrepresentable(self.encoding))
    }

    fn payload(&self, value: &IsoValue) -> Result<Bytes, FormatError> {
        match value {
            IsoValue::Binary(bytes) => Ok(bytes.clone()),
            IsoValue::Text(text) => hex::decode(text).map(Bytes::from).map_err(|_| {
                FormatError::NotApplicable {
                    field_type: self.field_type,
                    value_kind: "non-hex text",
                }
            }),
            _ => Err(FormatError::NotApplicable {
                field_type: self.field_type,
                value_kind: "non-binary value",
            }),
        }
    }

    /// Returns the prefix width in digits if `count` fits in it.
    fn prefix_width(&self, count: usize) -> Result<usize, FormatError> {
        let digits = self.field_type.prefix_digits().unwrap_or(0);
        let max_length = 10usize.pow(digits as u32) - 1;
        if count > max_length {
            return Err(self.too_long(count, max_length));
        }
        Ok(digits)
    }

    fn check_max(&self, length: usize) -> Result<(), FormatError> {
        if self.length > 0 && length > self.length {
            return Err(self.too_long(length, self.length));
        }
        Ok(())
    }

    fn too_long(&self, length: usize, max_length: usize) -> FormatError {
        FormatError::ValueTooLong {
            field_type: self.field_type,
            length,
            max_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldParser;
    use chrono::{TimeZone, Utc};
    use ironiso_core::FixedClock;
    use rust_decimal::Decimal;

    fn text(writer: &FieldWriter, value: &IsoValue) -> Vec<u8> {
        let mut out = BytesMut::new();
        writer.write_text(value, &mut out).unwrap();
        out.to_vec()
    }

    fn binary(writer: &FieldWriter, value: &IsoValue) -> Vec<u8> {
        let mut out = BytesMut::new();
        writer.write_binary(value, &mut out).unwrap();
        out.to_vec()
    }

    #[test]
    fn test_write_text_fixed_types() {
        let alpha = FieldWriter::new(FieldType::Alpha, 6, CharEncoding::Utf8);
        assert_eq!(text(&alpha, &IsoValue::from("Hola")), b"Hola  ");

        let numeric = FieldWriter::new(FieldType::Numeric, 6, CharEncoding::Utf8);
        assert_eq!(text(&numeric, &IsoValue::Number(123)), b"000123");

        let amount = FieldWriter::new(FieldType::Amount, 0, CharEncoding::Utf8);
        assert_eq!(
            text(&amount, &IsoValue::Amount(Decimal::new(12345, 2))),
            b"000000012345"
        );

        let bin = FieldWriter::new(FieldType::Binary, 3, CharEncoding::Utf8);
        assert_eq!(text(&bin, &IsoValue::Binary(Bytes::from_static(&[0x0A]))), b"0A0000");
    }

    #[test]
    fn test_write_text_prefixes() {
        let llvar = FieldWriter::new(FieldType::LlVar, 0, CharEncoding::Utf8);
        assert_eq!(text(&llvar, &IsoValue::from("Hello")), b"05Hello");

        let lllvar = FieldWriter::new(FieldType::LllVar, 0, CharEncoding::Utf8);
        assert_eq!(text(&lllvar, &IsoValue::from("año")), "003año".as_bytes());

        let llbin = FieldWriter::new(FieldType::LlBin, 0, CharEncoding::Utf8);
        let value = IsoValue::Binary(Bytes::from_static(&[0xAB, 0xCD]));
        assert_eq!(text(&llbin, &value), b"04ABCD");
    }

    #[test]
    fn test_write_text_llvar_too_long() {
        let llvar = FieldWriter::new(FieldType::LlVar, 3, CharEncoding::Utf8);
        let mut out = BytesMut::new();
        let err = llvar.write_text(&IsoValue::from("Hello"), &mut out).unwrap_err();
        assert_eq!(
            err,
            FormatError::ValueTooLong {
                field_type: FieldType::LlVar,
                length: 5,
                max_length: 3,
            }
        );

        let unbounded = FieldWriter::new(FieldType::LlVar, 0, CharEncoding::Utf8);
        let err = unbounded
            .write_text(&IsoValue::from("x".repeat(100).as_str()), &mut out)
            .unwrap_err();
        assert!(matches!(err, FormatError::ValueTooLong { max_length: 99, .. }));
    }

    #[test]
    fn test_write_text_unrepresentable() {
        let ascii = FieldWriter::new(FieldType::Alpha, 3, CharEncoding::Ascii);
        let mut out = BytesMut::new();
        let err = ascii.write_text(&IsoValue::from("año"), &mut out).unwrap_err();
        assert_eq!(err, FormatError::Unrepresentable(CharEncoding::Ascii));
    }

    #[test]
    fn test_write_text_date_uses_timezone() {
        let instant = Utc.timestamp_millis_opt(96_867_296_000).unwrap();
        let value = IsoValue::DateTime(instant.fixed_offset());
        let writer = FieldWriter::new(FieldType::Date12, 0, CharEncoding::Utf8)
            .with_timezone(FixedOffset::west_opt(6 * 3600));
        assert_eq!(text(&writer, &value), b"730125213456");

        let fallback = FieldWriter::new(FieldType::Time, 0, CharEncoding::Utf8)
            .with_clock(Arc::new(FixedClock::utc(instant)));
        assert_eq!(text(&fallback, &value), b"033456");
    }

    #[test]
    fn test_write_binary_bcd() {
        let numeric = FieldWriter::new(FieldType::Numeric, 5, CharEncoding::Utf8);
        assert_eq!(binary(&numeric, &IsoValue::Number(12345)), [0x01, 0x23, 0x45]);

        let amount = FieldWriter::new(FieldType::Amount, 0, CharEncoding::Utf8);
        assert_eq!(
            binary(&amount, &IsoValue::Amount(Decimal::new(12345, 2))),
            [0x00, 0x00, 0x00, 0x01, 0x23, 0x45]
        );

        let llvar = FieldWriter::new(FieldType::LllVar, 0, CharEncoding::Utf8);
        assert_eq!(binary(&llvar, &IsoValue::from("ab")), [0x00, 0x02, b'a', b'b']);

        let llbin = FieldWriter::new(FieldType::LlBin, 0, CharEncoding::Utf8);
        let value = IsoValue::Binary(Bytes::from_static(&[0xDE, 0xAD]));
        assert_eq!(binary(&llbin, &value), [0x02, 0xDE, 0xAD]);

        let bin = FieldWriter::new(FieldType::Binary, 4, CharEncoding::Utf8);
        assert_eq!(binary(&bin, &value), [0xDE, 0xAD, 0x00, 0x00]);
    }

    #[test]
    fn test_write_binary_rejects_non_digits() {
        let numeric = FieldWriter::new(FieldType::Numeric, 4, CharEncoding::Utf8);
        let mut out = BytesMut::new();
        let err = numeric.write_binary(&IsoValue::from("12a4"), &mut out).unwrap_err();
        assert!(matches!(err, FormatError::NotApplicable { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_written_fields_parse_back() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::utc(now));
        let at = |month, day, hour, minute, second| {
            let instant = Utc.with_ymd_and_hms(2026, month, day, hour, minute, second);
            IsoValue::DateTime(instant.unwrap().fixed_offset())
        };
        let bytes = |data: &'static [u8]| IsoValue::Binary(Bytes::from_static(data));
        let cases = [
            (FieldType::Alpha, 4, IsoValue::from("abcd")),
            (FieldType::Numeric, 7, IsoValue::Number(4711)),
            (FieldType::Amount, 0, IsoValue::Amount(Decimal::new(99, 2))),
            (FieldType::Binary, 3, bytes(&[0x01, 0x02, 0x03])),
            (FieldType::LlVar, 0, IsoValue::from("Hello")),
            (FieldType::LllVar, 0, IsoValue::from("año")),
            (FieldType::LlllVar, 0, IsoValue::from("abc")),
            (FieldType::LlBin, 0, bytes(&[1, 2, 3])),
            (FieldType::LllBin, 0, bytes(&[0xCA, 0xFE])),
            (FieldType::LlllBin, 0, bytes(&[0x00, 0xFF, 0x10, 0x01])),
            (FieldType::Date12, 0, at(3, 4, 5, 6, 7)),
            (FieldType::Date10, 0, at(3, 4, 5, 6, 7)),
            (FieldType::Date4, 0, at(3, 4, 0, 0, 0)),
            (FieldType::DateExp, 0, at(3, 1, 0, 0, 0)),
            (FieldType::Time, 0, at(10, 16, 5, 6, 7)),
        ];

        for (field_type, length, value) in cases {
            let parser = FieldParser::get_instance(field_type, length, CharEncoding::Utf8)
                .with_clock(Arc::clone(&clock));
            let writer = parser.writer();

            let written = text(&writer, &value);
            let parsed = parser.parse_text(1, &written, 0).unwrap();
            assert_eq!(parsed.value, value, "{field_type} text");
            assert_eq!(parsed.consumed, written.len());

            let written = binary(&writer, &value);
            let parsed = parser.parse_binary(1, &written, 0).unwrap();
            assert_eq!(parsed.value, value, "{field_type} binary");
            assert_eq!(parsed.consumed, written.len());
        }
    }

    #[derive(Debug)]
    struct Cents;

    impl CustomFieldEncoder for Cents {
        type Value = u32;

        fn encode_text(&self, value: &u32) -> String {
            format!("{}.{:02}", value / 100, value % 100)
        }
    }

    #[test]
    fn test_write_text_with_encoder() {
        let writer = FieldWriter::new(FieldType::Amount, 0, CharEncoding::Utf8);
        let mut out = BytesMut::new();
        let written = writer.write_text_with(&12345, &Cents, &mut out).unwrap();
        assert_eq!(written, 12);
        assert_eq!(&out[..], b"000000012345");
    }
}
