use serde::{Deserialize, Serialize};

use crate::consts::{ATTR_SETTING, TODAY_SETTING};
use crate::field::Document;
use crate::{Grammar, JalaliDate};

/// A configured minimum or maximum date.
/// `Today` and `Attr` are resolved again on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bound {
    #[default]
    Unbounded,
    Fixed(JalaliDate),
    /// The current date
    Today,
    /// Read from the bound field's `data-jdp-min-date` / `data-jdp-max-date` attribute
    Attr,
}

impl Bound {
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Today | Self::Attr)
    }
}

impl From<JalaliDate> for Bound {
    fn from(date: JalaliDate) -> Self {
        Self::Fixed(date)
    }
}

/// Resolves an attribute value: `today`, a selector of another element whose
/// value holds the date, or a literal date. Anything else is no bound.
pub(crate) fn resolve_reference(
    raw: &str,
    today: JalaliDate,
    document: &dyn Document,
    grammar: &Grammar,
) -> Option<JalaliDate> {
    if raw == TODAY_SETTING {
        return Some(today);
    }
    // An unresolvable selector is read as a literal date
    let target = document.query_value(raw);
    let text = target.as_deref().unwrap_or(raw);
    let resolved = grammar.parse_date(text);
    if resolved.is_none() {
        tracing::debug!(reference = raw, value = text, "bound reference did not resolve to a date");
    }
    resolved
}

/// Clamps `candidate` into `[min, max]`; absent bounds leave it unchanged
pub fn normalize(
    candidate: JalaliDate,
    min: Option<JalaliDate>,
    max: Option<JalaliDate>,
) -> JalaliDate {
    match (min, max) {
        (Some(min), _) if candidate < min => min,
        (_, Some(max)) if candidate > max => max,
        _ => candidate,
    }
}

impl Serialize for Bound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Unbounded => serializer.serialize_none(),
            Self::Fixed(date) => date.serialize(serializer),
            Self::Today => serializer.serialize_str(TODAY_SETTING),
            Self::Attr => serializer.serialize_str(ATTR_SETTING),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Text(String),
    Date(JalaliDate),
    Unset(()),
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match BoundRepr::deserialize(deserializer)? {
            BoundRepr::Text(s) => match s.trim() {
                "" => Ok(Self::Unbounded),
                TODAY_SETTING => Ok(Self::Today),
                ATTR_SETTING => Ok(Self::Attr),
                other => other
                    .parse()
                    .map(Self::Fixed)
                    .map_err(serde::de::Error::custom),
            },
            BoundRepr::Date(date) => Ok(Self::Fixed(date)),
            BoundRepr::Unset(()) => Ok(Self::Unbounded),
        }
    }
}
