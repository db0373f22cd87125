use crate::ParseError;
use crate::calendar::days_in_month;
use crate::consts::{MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR, MONTH_NAMES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// A Jalali year guaranteed to be in the range `MIN_YEAR..=MAX_YEAR` (1..=3177)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's within `MIN_YEAR..=MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is out of range.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        if value < MIN_YEAR || value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        NonZeroU16::new(value)
            .map(Self)
            .ok_or(ParseError::InvalidYear(value))
    }

    /// Compile-time constructor for known-good constants
    pub(crate) const fn from_const(value: u16) -> Self {
        assert!(value >= MIN_YEAR && value <= MAX_YEAR);
        match NonZeroU16::new(value) {
            Some(year) => Self(year),
            None => panic!("year must be non-zero"),
        }
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Moves the year by `delta`, or `None` when the result leaves the valid range
    pub fn offset(self, delta: i32) -> Option<Self> {
        let shifted = i32::from(self.get()).checked_add(delta)?;
        u16::try_from(shifted).ok().and_then(|y| Self::new(y).ok())
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    pub(crate) const fn from_const(value: u8) -> Self {
        assert!(value <= MAX_MONTH);
        match NonZeroU8::new(value) {
            Some(month) => Self(month),
            None => panic!("month must be non-zero"),
        }
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Following month, Esfand wraps to Farvardin
    pub const fn succ(self) -> Self {
        let value = self.0.get();
        Self::from_const(if value == MAX_MONTH { 1 } else { value + 1 })
    }

    /// Preceding month, Farvardin wraps to Esfand
    pub const fn pred(self) -> Self {
        let value = self.0.get();
        Self::from_const(if value == 1 { MAX_MONTH } else { value - 1 })
    }

    /// Persian name of the month
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[(self.0.get() - 1) as usize]
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: u16, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            month,
            day: value,
            year,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;

        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return Err(invalid);
        }

        Ok(Self(non_zero))
    }

    pub(crate) const fn from_const(value: u8) -> Self {
        assert!(value <= 31);
        match NonZeroU8::new(value) {
            Some(day) => Self(day),
            None => panic!("day must be non-zero"),
        }
    }

    /// `value` clamped into the given month
    pub(crate) fn clamped(value: u8, year: u16, month: u8) -> Self {
        let max = days_in_month(year, month);
        let day = value.clamp(MIN_DAY, max);
        // days_in_month never returns 0, so the clamp keeps us above zero
        Self(NonZeroU8::new(day).unwrap_or(NonZeroU8::MIN))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate without year/month context, so just check minimum
        NonZeroU8::new(value)
            .map(Self)
            .ok_or(ParseError::InvalidDay {
                month: 0,
                day: value,
                year: 0,
            })
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
