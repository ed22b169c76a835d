/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Time source used to reconstruct partial dates.
//!
//! Date/time fields omit the year, the date, or both, and are completed from
//! the current instant. Parsers read "now" through [`Clock`] so tests and
//! replay tools can pin it.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use std::fmt;

/// Source of the current instant and the fallback timezone.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the offset used when a parser has no timezone configured.
    fn local_offset(&self) -> FixedOffset;
}

/// The host system clock and timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// A clock pinned to one instant and one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Creates a clock that always reports `now`, with `offset` as local timezone.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Creates a clock pinned to `now` whose local timezone is UTC.
    #[must_use]
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    /// Creates a clock from milliseconds since the Unix epoch.
    ///
    /// # Returns
    /// `None` if `millis` is out of the representable range.
    #[must_use]
    pub fn from_millis(millis: i64, offset: FixedOffset) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|now| Self::new(now, offset))
    }
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[inline]
    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        let clock = FixedClock::from_millis(96_867_296_000, offset).unwrap();
        assert_eq!(clock.now().timestamp_millis(), 96_867_296_000);
        assert_eq!(clock.local_offset(), offset);
    }

    #[test]
    fn test_fixed_clock_utc() {
        let now = Utc::now();
        let clock = FixedClock::utc(now);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.local_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
