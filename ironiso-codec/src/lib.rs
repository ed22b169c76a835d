/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # IronIso Codec
//!
//! Field-level parsing and writing of ISO 8583 values.
//!
//! A [`FieldParser`] is built once per field definition of a message template
//! and reused for every message parsed against it. It reads a value either
//! from text (ASCII digits, hex-encoded binary) or from binary (packed BCD,
//! raw bytes) and reports how many bytes the field occupied.
//!
//! ## Features
//!
//! - **Closed dispatch**: One exhaustive `match` over [`FieldType`](ironiso_core::FieldType)
//! - **Partial dates**: Year, date, or both reconstructed from the current instant,
//!   with a configurable future tolerance
//! - **Custom decoders**: Application types produced straight from the field text or bytes
//! - **Writers**: The matching text and binary encoders, length prefixes included

pub mod bcd;
pub mod datetime;
pub mod decoder;
pub mod digits;
pub mod parser;
pub mod writer;

pub use decoder::{CustomFieldDecoder, CustomFieldEncoder};
pub use digits::DigitMode;
pub use parser::FieldParser;
pub use writer::FieldWriter;
