/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Codec configuration.
//!
//! This module provides the settings handed to every field parser when a
//! message template is built. The values are read once (typically from the
//! application's own configuration file) and never change afterwards.

use crate::encoding::CharEncoding;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default tolerance for reconstructed dates that fall in the future.
pub const DEFAULT_FUTURE_TOLERANCE: Duration = Duration::from_millis(900_000);

/// Configuration for field parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// How far in the future a reconstructed date may be before it is moved
    /// back one year.
    #[serde(rename = "future_tolerance_ms", with = "duration_millis")]
    pub future_tolerance: Duration,
    /// Character encoding of text fields.
    pub encoding: CharEncoding,
    /// Whether length prefixes and date digits are decoded as text in
    /// `encoding` instead of with ASCII arithmetic.
    pub force_string_decoding: bool,
    /// Timezone applied to date/time fields; the clock's local offset when unset.
    #[serde(with = "offset_text")]
    pub timezone: Option<FixedOffset>,
}

impl CodecConfig {
    /// Creates a configuration with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            future_tolerance: DEFAULT_FUTURE_TOLERANCE,
            encoding: CharEncoding::default(),
            force_string_decoding: false,
            timezone: None,
        }
    }

    /// Sets the future tolerance window.
    #[must_use]
    pub const fn with_future_tolerance(mut self, tolerance: Duration) -> Self {
        self.future_tolerance = tolerance;
        self
    }

    /// Sets the character encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: CharEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets whether to decode digits through the character encoding.
    #[must_use]
    pub const fn with_force_string_decoding(mut self, force: bool) -> Self {
        self.force_string_decoding = force;
        self
    }

    /// Sets the timezone for date/time fields.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Option<FixedOffset>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Returns the future tolerance in milliseconds.
    #[must_use]
    pub fn future_tolerance_ms(&self) -> u64 {
        u64::try_from(self.future_tolerance.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for codec configuration.
#[derive(Debug, Default)]
pub struct CodecConfigBuilder {
    future_tolerance: Option<Duration>,
    encoding: Option<CharEncoding>,
    force_string_decoding: bool,
    timezone: Option<FixedOffset>,
}

impl CodecConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the future tolerance window.
    #[must_use]
    pub fn future_tolerance(mut self, tolerance: Duration) -> Self {
        self.future_tolerance = Some(tolerance);
        self
    }

    /// Sets the character encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: CharEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Sets whether to decode digits through the character encoding.
    #[must_use]
    pub const fn force_string_decoding(mut self, force: bool) -> Self {
        self.force_string_decoding = force;
        self
    }

    /// Sets the timezone for date/time fields.
    #[must_use]
    pub fn timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> CodecConfig {
        let mut config = CodecConfig::new();

        if let Some(tolerance) = self.future_tolerance {
            config.future_tolerance = tolerance;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        config.force_string_decoding = self.force_string_decoding;
        config.timezone = self.timezone;

        config
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Timezones travel as `±HH:MM` text.
mod offset_text {
    use chrono::FixedOffset;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(offset) => serializer.serialize_some(&offset.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FixedOffset>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| text.parse::<FixedOffset>().map_err(D::Error::custom))
            .transpose()
    }
}
