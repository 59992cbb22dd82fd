// crates/lapboard-core/src/core/time.rs
// ============================================================================
// Module: Lapboard Time Model
// Description: Store-assigned timestamps and injectable clocks.
// Purpose: Keep record creation times explicit, ordered, and testable.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Score records carry a `createdAt` value assigned by the store. Internally
//! it is unix milliseconds; on the wire it is an RFC 3339 UTC string with
//! millisecond precision. Stores read time through a [`Clock`] so tests can
//! pin creation times.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Wire format for `createdAt`: RFC 3339 UTC with exactly three fractional digits.
const RFC3339_MILLIS: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Creation time of a score record in unix epoch milliseconds.
///
/// # Invariants
/// - Ordering matches chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Builds a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Self(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
    }

    /// Formats the timestamp as RFC 3339 UTC with millisecond precision.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::OutOfRange`] when the value cannot be
    /// represented as a calendar date, or [`TimestampError::Format`] when
    /// rendering fails.
    pub fn to_rfc3339(self) -> Result<String, TimestampError> {
        let datetime =
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * NANOS_PER_MILLI)
                .map_err(|_| TimestampError::OutOfRange(self.0))?;
        datetime.format(RFC3339_MILLIS).map_err(|err| TimestampError::Format(err.to_string()))
    }

    /// Parses an RFC 3339 timestamp, truncating to millisecond precision.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] when the input is not valid RFC 3339 or
    /// falls outside the representable range.
    pub fn parse_rfc3339(value: &str) -> Result<Self, TimestampError> {
        let datetime = OffsetDateTime::parse(value, &Rfc3339)
            .map_err(|err| TimestampError::Parse(err.to_string()))?;
        let millis = datetime.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI);
        let millis = i64::try_from(millis)
            .map_err(|_| TimestampError::Parse("timestamp out of range".to_string()))?;
        Ok(Self(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

/// Timestamp conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Value does not map to a calendar date.
    #[error("timestamp out of range: {0}ms")]
    OutOfRange(i64),
    /// Input text is not a valid RFC 3339 timestamp.
    #[error("invalid timestamp: {0}")]
    Parse(String),
    /// Calendar value could not be rendered.
    #[error("timestamp format failed: {0}")]
    Format(String),
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Time source used by stores when assigning `createdAt`.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
