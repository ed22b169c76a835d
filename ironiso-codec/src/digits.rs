/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Decoding of text digits in length prefixes and date groups.

use ironiso_core::CharEncoding;

/// How text digits are turned into numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitMode {
    /// Each byte counts as `byte - b'0'`.
    ///
    /// Only correct for ASCII digits. Any other byte yields a wrong value
    /// instead of an error.
    Ascii,
    /// Bytes are decoded in the given encoding and parsed as a decimal integer.
    Decoded(CharEncoding),
}

impl DigitMode {
    /// Picks the mode for a parser's settings.
    #[must_use]
    pub const fn new(encoding: CharEncoding, force_string_decoding: bool) -> Self {
        if force_string_decoding {
            Self::Decoded(encoding)
        } else {
            Self::Ascii
        }
    }

    /// Decodes a run of digit bytes.
    ///
    /// # Returns
    /// `None` only in [`DigitMode::Decoded`], when the text is not an integer.
    #[must_use]
    pub fn number(self, bytes: &[u8]) -> Option<i64> {
        match self {
            Self::Ascii => Some(ascii_number(bytes)),
            Self::Decoded(encoding) => encoding.decode(bytes)?.parse::<i64>().ok(),
        }
    }
}

/// Positional decimal arithmetic over raw bytes.
#[inline]
#[must_use]
pub fn ascii_number(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0i64, |acc, &b| acc * 10 + (i64::from(b) - i64::from(b'0')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_number() {
        assert_eq!(ascii_number(b"07"), 7);
        assert_eq!(ascii_number(b"123"), 123);
        assert_eq!(ascii_number(b"9999"), 9999);
        assert_eq!(ascii_number(b""), 0);
    }

    #[test]
    fn test_ascii_number_non_digits() {
        // ' ' is 32, so "0 " gives 0 * 10 + (32 - 48).
        assert_eq!(ascii_number(b"0 "), -16);
        assert_eq!(ascii_number(b"1A"), 27);
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(DigitMode::new(CharEncoding::Utf8, false), DigitMode::Ascii);
        assert_eq!(
            DigitMode::new(CharEncoding::Latin1, true),
            DigitMode::Decoded(CharEncoding::Latin1)
        );
    }

    #[test]
    fn test_decoded_mode() {
        let mode = DigitMode::Decoded(CharEncoding::Utf8);
        assert_eq!(mode.number(b"042"), Some(42));
        assert_eq!(mode.number(b"4x"), None);
        assert_eq!(mode.number(&[0xFF, 0x30]), None);
    }

    #[test]
    fn test_modes_agree_on_ascii_digits() {
        let decoded = DigitMode::Decoded(CharEncoding::Ascii);
        for text in ["00", "09", "10", "99", "123", "0456"] {
            assert_eq!(DigitMode::Ascii.number(text.as_bytes()), decoded.number(text.as_bytes()));
        }
    }
}
