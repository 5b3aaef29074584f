use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Unix timestamp (seconds) used as the `from_date` filter of the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    /// Create a cursor from a Unix timestamp in seconds.
    pub const fn from_timestamp(timestamp: i64) -> Self {
        Self(timestamp)
    }

    /// Cursor pointing at the current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Unix timestamp in seconds.
    pub const fn timestamp(self) -> i64 {
        self.0
    }

    /// Compute the cursor for the next poll from the server's `current_date`.
    ///
    /// An integer replaces the cursor and a missing field keeps it. Anything else
    /// is corrupted input and resets the cursor to the current time.
    pub fn advance(self, current_date: &CurrentDate) -> Self {
        match current_date {
            CurrentDate::Timestamp(ts) => Self(*ts),
            CurrentDate::Absent => self,
            CurrentDate::Invalid(value) => {
                warn!(%value, previous = self.0, "non-integer current_date, resetting cursor to now");
                Self::now()
            }
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The `current_date` field of a review API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CurrentDate {
    /// Field was not present in the response.
    #[default]
    Absent,
    /// Field held a JSON integer.
    Timestamp(i64),
    /// Field was present but not an integer (`null`, float, string, ...).
    Invalid(Value),
}

impl<'de> Deserialize<'de> for CurrentDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_i64() {
            Some(ts) => Self::Timestamp(ts),
            None => Self::Invalid(value),
        })
    }
}
