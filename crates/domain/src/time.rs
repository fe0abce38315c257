//! Time and timestamp helpers.

use chrono::{DateTime, NaiveTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for `observed_at` and other wall-clock records.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A daily window between two times of day, `HH:MM` in 24-hour format.
///
/// When `after` is later than `before` the window wraps over midnight
/// (e.g. `22:00..06:00`). Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    after: NaiveTime,
    before: NaiveTime,
}

impl TimeWindow {
    /// Build a window from two `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeOfDay`] if either bound does
    /// not parse.
    pub fn parse(after: &str, before: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            after: parse_time_of_day(after)?,
            before: parse_time_of_day(before)?,
        })
    }

    /// Whether `time` falls inside the window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.after <= self.before {
            time >= self.after && time <= self.before
        } else {
            time >= self.after || time <= self.before
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.after.format("%H:%M"),
            self.before.format("%H:%M")
        )
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTimeOfDay(value.to_string()))
}
