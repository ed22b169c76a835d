/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # IronIso
//!
//! An ISO 8583 field codec for Rust.
//!
//! IronIso parses and writes the individual fields of ISO 8583 messages: fixed
//! numeric and alphanumeric values, amounts, binary payloads, length-prefixed
//! variable fields, and the partial date/time formats whose missing year or
//! date is completed from the current instant.
//!
//! ## Features
//!
//! - **Text and binary wire modes**: ASCII digits and hex, or packed BCD and raw bytes
//! - **Closed type catalog**: Every dispatch over the field types is exhaustive
//! - **Deterministic dates**: An injectable clock and timezone for partial dates
//! - **Custom decoders**: Application types built straight from field content
//!
//! ## Quick Start
//!
//! ```rust
//! use ironiso::prelude::*;
//!
//! let parser = FieldParser::get_instance(FieldType::LlVar, 25, CharEncoding::Utf8);
//! let parsed = parser.parse_text(2, b"05Hello", 0).unwrap();
//! assert_eq!(parsed.value.as_str(), Some("Hello"));
//! assert_eq!(parsed.consumed, 7);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Field types, values, configuration, and errors
//! - [`codec`]: Field parsers and writers

pub mod core {
    //! Field types, values, configuration, and errors.
    pub use ironiso_core::*;
}

pub mod codec {
    //! Field parsers and writers.
    pub use ironiso_codec::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ironiso_core::{
        BoxError, CharEncoding, Clock, CodecConfig, CodecConfigBuilder, FieldKind, FieldType,
        FixedClock, FormatError, IsoError, IsoValue, LengthClass, ParseError, ParsedField, Result,
        SystemClock,
    };

    // Codec
    pub use ironiso_codec::{CustomFieldDecoder, CustomFieldEncoder, FieldParser, FieldWriter};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use bytes::BytesMut;

    #[test]
    fn test_prelude_imports() {
        let config = CodecConfigBuilder::new().encoding(CharEncoding::Latin1).build();
        let parser = FieldParser::from_config(FieldType::Alpha, 3, &config);
        assert_eq!(parser.encoding(), CharEncoding::Latin1);
        assert_eq!(FieldType::LllBin.length_class(), LengthClass::Prefixed(3));
    }

    #[test]
    fn test_write_then_parse() {
        let parser = FieldParser::get_instance(FieldType::LlVar, 0, CharEncoding::Utf8);
        let mut out = BytesMut::new();
        parser
            .writer()
            .write_text(&IsoValue::from("ISO 8583"), &mut out)
            .unwrap();
        assert_eq!(&out[..], b"08ISO 8583");

        let parsed = parser.parse_text(48, &out, 0).unwrap();
        assert_eq!(parsed.value.as_str(), Some("ISO 8583"));
    }

    #[test]
    fn test_errors_convert_to_iso_error() {
        fn parse(buf: &[u8]) -> Result<IsoValue> {
            let parser = FieldParser::get_instance(FieldType::Numeric, 4, CharEncoding::Utf8);
            Ok(parser.parse_text(3, buf, 0)?.into_value())
        }

        assert_eq!(parse(b"0042").unwrap(), IsoValue::Number(42));
        assert!(matches!(parse(b"42"), Err(IsoError::Parse(_))));
    }
}
