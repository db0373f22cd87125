use serde::{Deserialize, Serialize};

use crate::consts::{MAX_MONTH, MAX_YEAR, MIN_YEAR};
use crate::{JalaliDate, Month, TimeOfDay, Year};

/// A possibly partial date/time read from a field.
/// Both parts are absent when the input could not be understood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    pub date: Option<JalaliDate>,
    pub time: Option<TimeOfDay>,
}

impl Value {
    pub const EMPTY: Self = Self {
        date: None,
        time: None,
    };

    pub const fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }
}

impl From<JalaliDate> for Value {
    fn from(date: JalaliDate) -> Self {
        Self {
            date: Some(date),
            time: None,
        }
    }
}

impl From<TimeOfDay> for Value {
    fn from(time: TimeOfDay) -> Self {
        Self {
            date: None,
            time: Some(time),
        }
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Self {
            date: Some(value.date),
            time: Some(value.time),
        }
    }
}

/// A complete date and time, ready to be formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateTimeValue {
    pub date: JalaliDate,
    #[serde(default)]
    pub time: TimeOfDay,
}

impl DateTimeValue {
    pub const fn new(date: JalaliDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }
}

/// Per-field overrides applied by a value selection.
/// Unset fields fall through to the next layer when merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuePatch {
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl ValuePatch {
    /// Field-by-field union, `self` wins where both are set
    pub fn or(self, other: Self) -> Self {
        Self {
            year: self.year.or(other.year),
            month: self.month.or(other.month),
            day: self.day.or(other.day),
            hour: self.hour.or(other.hour),
            minute: self.minute.or(other.minute),
            second: self.second.or(other.second),
        }
    }

    /// Fills the unset fields from `defaults`.
    /// Out-of-range fields are clamped, and the day is clamped into the resulting month.
    pub fn resolve(self, defaults: DateTimeValue) -> DateTimeValue {
        let defaults_patch = Self::from(defaults);
        let merged = self.or(defaults_patch);

        let year = merged
            .year
            .map(|y| y.clamp(MIN_YEAR, MAX_YEAR))
            .and_then(|y| Year::new(y).ok())
            .unwrap_or(defaults.date.year_typed());
        let month = merged
            .month
            .map(|m| m.clamp(1, MAX_MONTH))
            .and_then(|m| Month::new(m).ok())
            .unwrap_or(defaults.date.month_typed());
        let day = merged.day.unwrap_or(defaults.date.day());

        DateTimeValue {
            date: JalaliDate::from_parts(year, month, day),
            time: TimeOfDay::clamped(
                merged.hour.unwrap_or(defaults.time.hour()),
                merged.minute.unwrap_or(defaults.time.minute()),
                merged.second.unwrap_or(defaults.time.second()),
            ),
        }
    }
}

impl From<JalaliDate> for ValuePatch {
    fn from(date: JalaliDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
            ..Self::default()
        }
    }
}

impl From<TimeOfDay> for ValuePatch {
    fn from(time: TimeOfDay) -> Self {
        Self {
            hour: Some(time.hour()),
            minute: Some(time.minute()),
            second: Some(time.second()),
            ..Self::default()
        }
    }
}

impl From<Value> for ValuePatch {
    fn from(value: Value) -> Self {
        let date = value.date.map(Self::from).unwrap_or_default();
        let time = value.time.map(Self::from).unwrap_or_default();
        date.or(time)
    }
}

impl From<DateTimeValue> for ValuePatch {
    fn from(value: DateTimeValue) -> Self {
        Self::from(Value::from(value))
    }
}
