/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Parses the fields of a text-encoded message, one after another.
//!
//! Run with `RUST_LOG=debug` to see parser construction and date rollbacks.

use anyhow::Context;
use tracing::{info, warn};

use ironiso::prelude::*;

mod common;
use common::{build_parsers, init_logging, load_config};

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = load_config().context("invalid IRONISO_CONFIG")?;
    info!(?config, "codec configuration");

    let parsers = build_parsers(&config);
    let message = b"003000000000015000101612000012000028122147661234567890\
12=2812008DEADBEEF";

    let mut offset = 0;
    let mut offsets = Vec::with_capacity(parsers.len());
    for (index, parser) in &parsers {
        let parsed = parser
            .parse_text(*index, message, offset)
            .with_context(|| format!("field {index}"))?;
        info!(
            field = index,
            field_type = %parsed.field_type,
            value = %parsed.value,
            consumed = parsed.consumed,
            "parsed field"
        );
        offsets.push(offset);
        offset = parsed.next_offset(offset);
    }

    if offset != message.len() {
        warn!(trailing = message.len() - offset, "unparsed bytes after last field");
    }

    // A custom decoder receives the raw field content instead.
    let masked = |track: &str| -> std::result::Result<String, BoxError> {
        let pan = track.split('=').next().ok_or("empty track")?;
        let visible = pan.len().saturating_sub(4);
        Ok(format!("{}{}", "*".repeat(visible), &pan[visible..]))
    };
    let (index, pan_parser) = &parsers[5];
    let pan = pan_parser
        .parse_text_with(*index, message, offsets[5], &masked)?
        .into_value();
    info!(%pan, "masked card number");

    Ok(())
}
