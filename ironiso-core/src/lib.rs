/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # IronIso Core
//!
//! Core types, traits, and error definitions for the IronIso ISO 8583 field codec.
//!
//! This crate provides the building blocks shared by the codec crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field catalog**: The closed [`FieldType`] set and its wire formatting rules
//! - **Values**: [`IsoValue`] and [`ParsedField`]
//! - **Configuration**: [`CodecConfig`], [`CharEncoding`] and the [`Clock`] abstraction
//!
//! ## Explicit Configuration
//!
//! Nothing in this crate reads process-wide properties or the platform's default
//! text encoding. Every setting that affects parsing is carried by a
//! [`CodecConfig`] value handed to the parser at construction time.

pub mod clock;
pub mod config;
pub mod encoding;
pub mod error;
pub mod field_type;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CodecConfig, CodecConfigBuilder, DEFAULT_FUTURE_TOLERANCE};
pub use encoding::CharEncoding;
pub use error::{BoxError, FormatError, IsoError, ParseError, Result};
pub use field_type::{FieldKind, FieldType, LengthClass};
pub use value::{IsoValue, ParsedField};
