/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Writes a binary-encoded message and reads it back with the same template.

use anyhow::Context;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use tracing::info;

use ironiso::prelude::*;

mod common;
use common::{build_parsers, init_logging, load_config};

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = load_config().context("invalid IRONISO_CONFIG")?;
    let parsers = build_parsers(&config);

    let now = Utc::now().fixed_offset();
    let values = [
        IsoValue::Number(3000),
        IsoValue::from("150.00"),
        IsoValue::DateTime(now),
        IsoValue::DateTime(now),
        IsoValue::DateTime(now),
        IsoValue::from("4766123456789012=2812"),
        IsoValue::Binary(Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF])),
    ];

    let mut message = BytesMut::with_capacity(64);
    for ((index, parser), value) in parsers.iter().zip(&values) {
        let written = parser
            .writer()
            .write_binary(value, &mut message)
            .with_context(|| format!("field {index}"))?;
        info!(field = index, written, "wrote field");
    }
    info!(len = message.len(), hex = %hex::encode_upper(&message), "binary message");

    let mut offset = 0;
    for (index, parser) in &parsers {
        let parsed = parser.parse_binary(*index, &message, offset)?;
        info!(field = index, value = %parsed.value, "read back");
        offset = parsed.next_offset(offset);
    }

    Ok(())
}
