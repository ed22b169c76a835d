/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Packed BCD handling.
//!
//! Packed BCD stores two decimal digits per byte: the high nibble is the tens
//! digit and the low nibble the units digit. Odd digit counts carry one
//! leading pad nibble.

use bytes::{BufMut, BytesMut};

/// Decodes one packed byte into its two-digit value.
#[inline]
#[must_use]
pub const fn decode_pair(byte: u8) -> u8 {
    ((byte & 0xF0) >> 4) * 10 + (byte & 0x0F)
}

/// Returns how many packed bytes hold `digits` digits.
#[inline]
#[must_use]
pub const fn packed_len(digits: usize) -> usize {
    digits.div_ceil(2)
}

fn nibbles(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes.iter().flat_map(|&b| [b >> 4, b & 0x0F])
}

/// Decodes the last `digits` nibbles of `bytes` as a number.
///
/// Used for length prefixes: one byte for LL, two bytes for LLL and LLLL.
#[must_use]
pub fn decode_number(bytes: &[u8], digits: usize) -> u64 {
    let skip = (bytes.len() * 2).saturating_sub(digits);
    nibbles(bytes)
        .skip(skip)
        .fold(0u64, |acc, n| acc * 10 + u64::from(n))
}

/// Decodes the last `digits` nibbles of `bytes` as digit characters.
///
/// Nibbles above 9 become the characters after `'9'`, so callers that parse
/// the result as a number reject them.
#[must_use]
pub fn decode_digits(bytes: &[u8], digits: usize) -> String {
    let skip = (bytes.len() * 2).saturating_sub(digits);
    nibbles(bytes).skip(skip).map(|n| char::from(b'0' + n)).collect()
}

/// Packs a string of ASCII digits, left padding odd counts with a zero nibble.
///
/// # Returns
/// `false` without writing anything if `digits` contains a non-digit.
pub fn encode_digits(digits: &str, out: &mut BytesMut) -> bool {
    let raw = digits.as_bytes();
    if !raw.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let (head, rest) = raw.split_at(raw.len() % 2);
    if let Some(&first) = head.first() {
        out.put_u8(first - b'0');
    }
    for pair in rest.chunks_exact(2) {
        out.put_u8(((pair[0] - b'0') << 4) | (pair[1] - b'0'));
    }
    true
}

/// Packs `value` zero padded to `digits` digits.
pub fn encode_number(value: usize, digits: usize, out: &mut BytesMut) {
    let text = format!("{value:0digits$}");
    encode_digits(&text, out);
}
