use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Default timezone for business dates.
/// Week boundaries and "today" are evaluated in this zone unless configured otherwise.
pub const DEFAULT_TZ: Tz = chrono_tz::Asia::Seoul;

/// Converts a UTC instant to the calendar date observed in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// Returns the Monday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(offset))
}

/// Maps platform-native day numbering (0 = Sunday .. 6 = Saturday) to a
/// calendar slot where Monday is 0 and Sunday is 6.
pub fn calendar_index(native_day: u32) -> usize {
    ((native_day + 6) % 7) as usize
}

/// Calendar slot (Monday = 0) of `date`.
pub fn calendar_index_for(date: NaiveDate) -> usize {
    calendar_index(date.weekday().num_days_from_sunday())
}

/// Parses an IANA timezone name such as `Asia/Seoul`.
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| Error::InvalidConfigValue(format!("timezone '{}': {}", name, e)))
}

/// A calendar month, used to key monthly challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            }));
        }
        if !(2000..=9999).contains(&year) {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "year".to_string(),
                min: 2000,
                max: 9999,
            }));
        }
        Ok(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
