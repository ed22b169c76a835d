/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Character encodings for text fields.
//!
//! ISO 8583 declares alphanumeric lengths in characters, not bytes. For the
//! single-byte encodings both counts are the same; for UTF-8 a field of `n`
//! characters may occupy more than `n` bytes, so the codec measures the span
//! of the characters before slicing the buffer.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A named character encoding selectable for string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CharEncoding {
    /// 7-bit US-ASCII.
    Ascii,
    /// ISO-8859-1, one byte per character.
    Latin1,
    /// UTF-8.
    #[default]
    Utf8,
}

impl CharEncoding {
    /// Returns the canonical name of this encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Returns true if every character is encoded in exactly one byte.
    #[inline]
    #[must_use]
    pub const fn is_single_byte(self) -> bool {
        matches!(self, Self::Ascii | Self::Latin1)
    }

    /// Returns how many bytes the first `chars` characters of `bytes` occupy.
    ///
    /// # Returns
    /// `None` if `bytes` ends before `chars` characters are complete.
    #[must_use]
    pub fn char_span(self, bytes: &[u8], chars: usize) -> Option<usize> {
        if self.is_single_byte() {
            return (bytes.len() >= chars).then_some(chars);
        }
        let mut pos = 0;
        for _ in 0..chars {
            let lead = *bytes.get(pos)?;
            pos += utf8_width(lead);
        }
        (pos <= bytes.len()).then_some(pos)
    }

    /// Decodes `bytes` as text.
    ///
    /// # Returns
    /// `None` if the bytes are not valid in this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Ascii => {
                if bytes.is_ascii() {
                    std::str::from_utf8(bytes).ok().map(Cow::Borrowed)
                } else {
                    None
                }
            }
            Self::Latin1 => {
                if bytes.is_ascii() {
                    std::str::from_utf8(bytes).ok().map(Cow::Borrowed)
                } else {
                    Some(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
                }
            }
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
        }
    }

    /// Encodes `text` into bytes.
    ///
    /// # Returns
    /// `None` if a character has no representation in this encoding.
    #[must_use]
    pub fn encode(self, text: &str) -> Option<Cow<'_, [u8]>> {
        match self {
            Self::Ascii => text.is_ascii().then_some(Cow::Borrowed(text.as_bytes())),
            Self::Latin1 => {
                if text.is_ascii() {
                    return Some(Cow::Borrowed(text.as_bytes()));
                }
                text.chars()
                    .map(|c| u8::try_from(u32::from(c)).ok())
                    .collect::<Option<Vec<u8>>>()
                    .map(Cow::Owned)
            }
            Self::Utf8 => Some(Cow::Borrowed(text.as_bytes())),
        }
    }
}

/// Width of a UTF-8 sequence from its lead byte.
///
/// Stray continuation bytes count as one byte; decoding rejects them later.
const fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

impl fmt::Display for CharEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharEncoding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "US-ASCII" | "ASCII" => Ok(Self::Ascii),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" => Ok(Self::Latin1),
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            _ => Err(ParseError::UnsupportedEncoding {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CharEncoding {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CharEncoding> for String {
    fn from(encoding: CharEncoding) -> Self {
        encoding.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!("utf-8".parse::<CharEncoding>().unwrap(), CharEncoding::Utf8);
        assert_eq!("UTF8".parse::<CharEncoding>().unwrap(), CharEncoding::Utf8);
        assert_eq!(
            "iso_8859_1".parse::<CharEncoding>().unwrap(),
            CharEncoding::Latin1
        );
        assert_eq!(
            "US-ASCII".parse::<CharEncoding>().unwrap(),
            CharEncoding::Ascii
        );
        assert!(matches!(
            "Cp1047".parse::<CharEncoding>(),
            Err(ParseError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn test_char_span_single_byte() {
        assert_eq!(CharEncoding::Latin1.char_span(b"hola", 3), Some(3));
        assert_eq!(CharEncoding::Ascii.char_span(b"ho", 3), None);
    }

    #[test]
    fn test_char_span_utf8() {
        let bytes = "añob".as_bytes();
        assert_eq!(CharEncoding::Utf8.char_span(bytes, 3), Some(4));
        assert_eq!(CharEncoding::Utf8.char_span(bytes, 4), Some(5));
        assert_eq!(CharEncoding::Utf8.char_span(&bytes[..2], 2), None);
    }

    #[test]
    fn test_decode() {
        assert_eq!(CharEncoding::Ascii.decode(b"abc").unwrap(), "abc");
        assert!(CharEncoding::Ascii.decode(&[0xF1]).is_none());
        assert_eq!(CharEncoding::Latin1.decode(&[b'a', 0xF1]).unwrap(), "añ");
        assert!(CharEncoding::Utf8.decode(&[0xF1]).is_none());
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            &*CharEncoding::Latin1.encode("añ").unwrap(),
            &[b'a', 0xF1][..]
        );
        assert!(CharEncoding::Latin1.encode("€").is_none());
        assert!(CharEncoding::Ascii.encode("ñ").is_none());
        assert_eq!(CharEncoding::Utf8.encode("ñ").unwrap().len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(CharEncoding::Utf8.to_string(), "UTF-8");
        assert_eq!(CharEncoding::default(), CharEncoding::Utf8);
    }
}
