/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Application-supplied conversions for field values.
//!
//! A [`CustomFieldDecoder`] turns the raw content of a field straight into an
//! application type. When one is passed to
//! [`FieldParser::parse_text_with`](crate::FieldParser::parse_text_with) it
//! replaces the built-in conversion entirely.

use ironiso_core::BoxError;

/// Converts field content into an application value.
pub trait CustomFieldDecoder {
    /// The decoded value type.
    type Value;

    /// Decodes the text content of a field.
    ///
    /// Alphanumeric and variable fields pass their text, numeric and amount
    /// fields their digits, and date fields their two-digit groups.
    ///
    /// # Errors
    /// Any error is reported to the caller as a decoder failure.
    fn decode_text(&self, text: &str) -> Result<Self::Value, BoxError>;

    /// Decodes the byte content of a binary field.
    ///
    /// Defaults to decoding the uppercase hex rendering of `bytes`.
    ///
    /// # Errors
    /// Any error is reported to the caller as a decoder failure.
    fn decode_binary(&self, bytes: &[u8]) -> Result<Self::Value, BoxError> {
        self.decode_text(&hex::encode_upper(bytes))
    }
}

impl<T, F> CustomFieldDecoder for F
where
    F: Fn(&str) -> Result<T, BoxError>,
{
    type Value = T;

    fn decode_text(&self, text: &str) -> Result<T, BoxError> {
        self(text)
    }
}

/// Converts an application value into field text.
pub trait CustomFieldEncoder {
    /// The encoded value type.
    type Value;

    /// Renders `value` as the field's text, before padding.
    fn encode_text(&self, value: &Self::Value) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Length;

    impl CustomFieldDecoder for Length {
        type Value = usize;

        fn decode_text(&self, text: &str) -> Result<usize, BoxError> {
            Ok(text.len())
        }
    }

    #[test]
    fn test_default_binary_uses_hex() {
        assert_eq!(Length.decode_binary(&[0xAB, 0x01]).unwrap(), 4);
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |text: &str| -> Result<u32, BoxError> { Ok(text.parse()?) };
        assert_eq!(decoder.decode_text("42").unwrap(), 42);
        assert!(decoder.decode_text("x").is_err());
        assert_eq!(decoder.decode_binary(&[0x12]).unwrap(), 12);
    }
}
