/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Shared helpers for the examples.

#![allow(dead_code)]

use ironiso::prelude::*;

/// One field of a message template.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub index: u32,
    pub field_type: FieldType,
    pub length: usize,
}

impl FieldDef {
    pub const fn new(index: u32, field_type: FieldType, length: usize) -> Self {
        Self {
            index,
            field_type,
            length,
        }
    }
}

/// A small authorization request layout.
pub const TEMPLATE: [FieldDef; 7] = [
    FieldDef::new(3, FieldType::Numeric, 6),
    FieldDef::new(4, FieldType::Amount, 0),
    FieldDef::new(7, FieldType::Date10, 0),
    FieldDef::new(12, FieldType::Time, 0),
    FieldDef::new(14, FieldType::DateExp, 0),
    FieldDef::new(35, FieldType::LlVar, 37),
    FieldDef::new(55, FieldType::LllBin, 255),
];

/// Codec settings read from `IRONISO_CONFIG`, as JSON, or the defaults.
pub fn load_config() -> anyhow::Result<CodecConfig> {
    match std::env::var("IRONISO_CONFIG") {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(_) => Ok(CodecConfig::default()),
    }
}

/// Builds one parser per template field.
pub fn build_parsers(config: &CodecConfig) -> Vec<(u32, FieldParser)> {
    TEMPLATE
        .iter()
        .map(|def| {
            (
                def.index,
                FieldParser::from_config(def.field_type, def.length, config),
            )
        })
        .collect()
}

/// Initialize logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
