//! Day-granularity calendar dates
//!
//! Wire timestamps carry seconds and nanoseconds in UTC. Everything finer
//! than a day is dropped before a key is formed, so two submissions on the
//! same day at different times address the same calendar slot.

use crate::errors::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Earliest day the store's `DateTime` column can hold.
pub const MIN_DATE: &str = "1970-01-01";

/// Latest whole day the store's `DateTime` column can hold.
pub const MAX_DATE: &str = "2105-12-31";

/// Midnight UTC of [`MAX_DATE`], seconds since the Unix epoch.
const MAX_MIDNIGHT_SECS: i64 = 4_291_660_800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Result<Self, ValidationError> {
        let midnight = midnight_secs(date);
        if !(0..=MAX_MIDNIGHT_SECS).contains(&midnight) {
            return Err(ValidationError::DateOutOfRange {
                date: date.to_string(),
                min: MIN_DATE.to_string(),
                max: MAX_DATE.to_string(),
            });
        }
        Ok(Self(date))
    }

    /// Build from a UTC wire timestamp, truncating to the day.
    pub fn from_timestamp(seconds: i64, nanos: i32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimestamp { seconds, nanos };
        let nanos_u32 = u32::try_from(nanos).map_err(|_| invalid())?;
        if nanos_u32 >= 1_000_000_000 {
            return Err(invalid());
        }
        let ts = DateTime::from_timestamp(seconds, nanos_u32).ok_or_else(invalid)?;
        Self::new(ts.date_naive())
    }

    /// Parse `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
            input: s.to_string(),
        })?;
        Self::new(date)
    }

    /// Midnight UTC of this day, in seconds since the Unix epoch.
    ///
    /// Always fits in `u32` because construction enforces [`MAX_DATE`].
    pub fn midnight_utc_secs(&self) -> u32 {
        u32::try_from(midnight_secs(self.0)).unwrap_or(u32::MAX)
    }
}

fn midnight_secs(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01T00:00:00Z
    const JAN_1_2024: i64 = 1_704_067_200;

    #[test]
    fn test_truncates_to_day() {
        let morning = CalendarDate::from_timestamp(JAN_1_2024 + 5, 0).unwrap();
        let night = CalendarDate::from_timestamp(JAN_1_2024 + 86_399, 999_999_999).unwrap();
        assert_eq!(morning, night);
        assert_eq!(morning.to_string(), "2024-01-01");

        let next = CalendarDate::from_timestamp(JAN_1_2024 + 86_400, 0).unwrap();
        assert_eq!(next.to_string(), "2024-01-02");
    }

    #[test]
    fn test_rejects_bad_nanos() {
        assert!(CalendarDate::from_timestamp(JAN_1_2024, -1).is_err());
        assert!(CalendarDate::from_timestamp(JAN_1_2024, 1_000_000_000).is_err());
    }

    #[test]
    fn test_rejects_out_of_store_range() {
        assert!(matches!(
            CalendarDate::from_timestamp(-1, 0),
            Err(ValidationError::DateOutOfRange { .. })
        ));
        assert!(CalendarDate::parse("2106-01-01").is_err());
        assert!(CalendarDate::parse("2024-02-30").is_err());
        assert!(CalendarDate::parse(MIN_DATE).is_ok());
        assert!(CalendarDate::parse(MAX_DATE).is_ok());
    }

    #[test]
    fn test_rejects_unrepresentable_seconds() {
        assert!(matches!(
            CalendarDate::from_timestamp(i64::MAX, 0),
            Err(ValidationError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_midnight_secs() {
        let d = CalendarDate::from_timestamp(JAN_1_2024 + 3_600, 0).unwrap();
        assert_eq!(d.midnight_utc_secs(), JAN_1_2024 as u32);
        assert_eq!(CalendarDate::parse("2105-12-31").unwrap().midnight_utc_secs(), 4_291_660_800);
    }
}
