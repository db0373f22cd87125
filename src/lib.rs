mod bounds;
mod calendar;
mod consts;
mod field;
mod grammar;
mod options;
mod prelude;
mod session;
#[cfg(test)]
mod test_utils;
mod time;
mod types;
mod value;

pub use bounds::{Bound, normalize};
pub use calendar::{Clock, FixedClock, SystemClock, days_in_month, is_leap_year};
pub use consts::*;
pub use field::{Document, InputField, NoDocument, TextField};
pub use grammar::{
    DateOrder, Field, Grammar, GrammarConfig, Mode, SegmentOrder, Separator, SeparatorChars,
    SeparatorOverrides,
};
pub use options::{Options, OptionsUpdate};
pub use session::{ConfigError, DatePicker, Session};
pub use time::TimeOfDay;
pub use types::{Day, Month, Year};
pub use value::{DateTimeValue, Value, ValuePatch};

use crate::prelude::*;
use chrono::NaiveDate;
use std::str::FromStr;

/// A calendar date in the Jalali (Solar Hijri) calendar.
/// The day is always valid for its year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}/{:02}/{:02}", "year.get()", "month.get()", "day.get()")]
pub struct JalaliDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid value format: {0}")]
    InvalidFormat(String),
    #[error("Invalid year: {0} (must be {min}-{max})", min = MIN_YEAR, max = MAX_YEAR)]
    InvalidYear(u16),
    #[error("Invalid month: {0} (must be 1-{max})", max = MAX_MONTH)]
    InvalidMonth(u8),
    #[error("Invalid day {day} for month {year}/{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[error("Invalid hour: {0} (must be 0-23)")]
    InvalidHour(u8),
    #[error("Invalid minute: {0} (must be 0-59)")]
    InvalidMinute(u8),
    #[error("Invalid second: {0} (must be 0-59)")]
    InvalidSecond(u8),
    #[error("Gregorian date {0} is outside the supported Jalali years")]
    UnsupportedGregorian(NaiveDate),
    #[error("Empty value string")]
    EmptyInput,
}

impl JalaliDate {
    /// 1348/10/11, the Jalali date of 1970-01-01
    pub const UNIX_EPOCH: Self = Self {
        year: Year::from_const(1348),
        month: Month::from_const(10),
        day: Day::from_const(11),
    };

    /// Creates a date from raw components
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component that is out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, year, month)?;
        Ok(Self {
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    /// Creates a date from validated parts, clamping the day into the month
    pub fn from_parts(year: Year, month: Month, day: u8) -> Self {
        Self {
            year,
            month,
            day: Day::clamped(day, year.get(), month.get()),
        }
    }

    /// Returns the year component (as u16 for convenience)
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component (as u8 for convenience)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day component (as u8 for convenience)
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Number of days in this date's month
    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.year(), self.month())
    }

    /// Same day in another month of the same year.
    /// The day is reduced when the new month is shorter.
    pub fn with_month(&self, month: Month) -> Self {
        self.with_year_month(self.year, month)
    }

    /// Same month and day in another year.
    /// Esfand 30th becomes the 29th when the new year is common.
    pub fn with_year(&self, year: Year) -> Self {
        self.with_year_month(year, self.month)
    }

    pub fn with_year_month(&self, year: Year, month: Month) -> Self {
        Self::from_parts(year, month, self.day())
    }

    /// First day of this date's month
    pub fn first_of_month(&self) -> Self {
        Self::from_parts(self.year, self.month, MIN_DAY)
    }
}

impl FromStr for JalaliDate {
    type Err = ParseError;

    /// Strict `YYYY/MM/DD` (or `YYYY-MM-DD`) parsing.
    /// The grammar in [`Grammar`] handles configurable, lenient input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let has_slash = trimmed.contains(DATE_SEPARATOR);
        let has_hyphen = trimmed.contains(DATE_SEPARATOR_ALT);
        if has_slash && has_hyphen {
            return Err(ParseError::InvalidFormat(format!(
                "Mixed delimiters ({DATE_SEPARATOR} and {DATE_SEPARATOR_ALT})"
            )));
        }
        let separator = if has_hyphen {
            DATE_SEPARATOR_ALT
        } else {
            DATE_SEPARATOR
        };

        let parts: Vec<&str> = trimmed.split(separator).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected 3 {separator}-separated fields, found {}",
                parts.len()
            )));
        };

        Self::new(parse_u16(year)?, parse_u8(month)?, parse_u8(day)?)
    }
}

/// Helper to parse u16 with better error messages
pub(crate) fn parse_u16(s: &str) -> Result<u16, ParseError> {
    s.parse::<u16>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

/// Helper to parse u8 with better error messages
pub(crate) fn parse_u8(s: &str) -> Result<u8, ParseError> {
    s.parse::<u8>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl serde::Serialize for JalaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Dates are accepted either as `"1403/01/05"` or as `{year, month, day}`
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DateRepr {
    Text(String),
    Fields { year: u16, month: u8, day: u8 },
}

impl<'de> serde::Deserialize<'de> for JalaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match DateRepr::deserialize(deserializer)? {
            DateRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            DateRepr::Fields { year, month, day } => {
                Self::new(year, month, day).map_err(serde::de::Error::custom)
            }
        }
    }
}
