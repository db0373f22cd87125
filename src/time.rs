use std::str::FromStr;

use crate::prelude::*;
use crate::{ParseError, TIME_SEPARATOR, parse_u8};

const MAX_HOUR: u8 = 23;
const MAX_MINUTE: u8 = 59;
const MAX_SECOND: u8 = 59;

/// A wall-clock time of day, without zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{hour:02}:{minute:02}:{second:02}")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// # Errors
    /// Returns the `ParseError` of the first component that is out of range.
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self, ParseError> {
        if hour > MAX_HOUR {
            return Err(ParseError::InvalidHour(hour));
        }
        if minute > MAX_MINUTE {
            return Err(ParseError::InvalidMinute(minute));
        }
        if second > MAX_SECOND {
            return Err(ParseError::InvalidSecond(second));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Like [`TimeOfDay::new`] but saturates each component to its maximum
    pub fn clamped(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour.min(MAX_HOUR),
            minute: minute.min(MAX_MINUTE),
            second: second.min(MAX_SECOND),
        }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    /// Strict `HH:mm:ss` or `HH:mm` parsing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(TIME_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [hour, minute] => Self::new(parse_u8(hour)?, parse_u8(minute)?, 0),
            [hour, minute, second] => {
                Self::new(parse_u8(hour)?, parse_u8(minute)?, parse_u8(second)?)
            }
            _ => Err(ParseError::InvalidFormat(format!(
                "Expected 2-3 {TIME_SEPARATOR}-separated fields, found {}",
                parts.len()
            ))),
        }
    }
}

impl serde::Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum TimeRepr {
    Text(String),
    Fields {
        hour: u8,
        #[serde(default)]
        minute: u8,
        #[serde(default)]
        second: u8,
    },
}

impl<'de> serde::Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match TimeRepr::deserialize(deserializer)? {
            TimeRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            TimeRepr::Fields {
                hour,
                minute,
                second,
            } => Self::new(hour, minute, second).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ranges() {
        assert!(TimeOfDay::new(23, 59, 59).is_ok());
        assert!(matches!(
            TimeOfDay::new(24, 0, 0),
            Err(ParseError::InvalidHour(24))
        ));
        assert!(matches!(
            TimeOfDay::new(0, 60, 0),
            Err(ParseError::InvalidMinute(60))
        ));
        assert!(matches!(
            TimeOfDay::new(0, 0, 60),
            Err(ParseError::InvalidSecond(60))
        ));
    }

    #[test]
    fn test_default_is_midnight() {
        assert_eq!(TimeOfDay::default(), TimeOfDay::MIDNIGHT);
        assert_eq!(TimeOfDay::MIDNIGHT.to_string(), "00:00:00");
    }

    #[test]
    fn test_clamped() {
        let t = TimeOfDay::clamped(30, 75, 5);
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 5));
    }

    #[test]
    fn test_parse() {
        let t = "09:05:30".parse::<TimeOfDay>().unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (9, 5, 30));

        let t = "9:05".parse::<TimeOfDay>().unwrap();
        assert_eq!(t.to_string(), "09:05:00");

        assert!("25:00:00".parse::<TimeOfDay>().is_err());
        assert!("12".parse::<TimeOfDay>().is_err());
        assert!("ab:cd".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_serde() {
        let t = TimeOfDay::new(14, 30, 0).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#""14:30:00""#);

        let parsed: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);

        let parsed: TimeOfDay = serde_json::from_str(r#"{"hour": 14, "minute": 30}"#).unwrap();
        assert_eq!(parsed, t);
    }
}
