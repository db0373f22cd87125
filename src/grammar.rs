//! Grammar of the field's text value.
//!
//! A [`Grammar`] is derived from a [`GrammarConfig`] and the active [`Mode`].
//! It knows the canonical shape it formats to, and a looser shape that
//! accepts alternate separators, single-digit fields, native digits and
//! surrounding whitespace while the user is still typing.

use std::borrow::Cow;
use std::fmt::Write as _;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::consts::{
    BETWEEN_SEPARATOR, BETWEEN_SEPARATOR_ALT, DATE_SEPARATOR, DATE_SEPARATOR_ALT, TIME_SEPARATOR,
};
use crate::{DateTimeValue, JalaliDate, ParseError, TimeOfDay, Value, parse_u8, parse_u16};

/// Which components a value carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Date,
    Time,
    DateTime,
}

impl Mode {
    /// Mode from the two activity flags; with neither active the field is treated as date-only
    pub const fn from_flags(date: bool, time: bool) -> Self {
        match (date, time) {
            (true, true) => Self::DateTime,
            (false, true) => Self::Time,
            _ => Self::Date,
        }
    }

    pub const fn has_date(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }

    pub const fn has_time(self) -> bool {
        matches!(self, Self::Time | Self::DateTime)
    }
}

/// One value component, in the order it appears in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    /// Capture group name used in the compiled patterns
    const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    /// Digits in the canonical form
    pub const fn width(self) -> usize {
        match self {
            Self::Year => 4,
            _ => 2,
        }
    }
}

/// Order of the date fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateOrder {
    #[default]
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
}

impl DateOrder {
    const fn fields(self) -> [Field; 3] {
        match self {
            Self::YearMonthDay => [Field::Year, Field::Month, Field::Day],
            Self::DayMonthYear => [Field::Day, Field::Month, Field::Year],
            Self::MonthDayYear => [Field::Month, Field::Day, Field::Year],
        }
    }
}

/// Whether the date or the time comes first when both are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentOrder {
    #[default]
    DateTime,
    TimeDate,
}

const TIME_FIELDS: [Field; 3] = [Field::Hour, Field::Minute, Field::Second];

/// A separator position: what gets written, and what else is accepted on input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Separator {
    output: String,
    alternates: Vec<String>,
}

impl Separator {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            alternates: Vec::new(),
        }
    }

    pub fn with_alternates<I, S>(output: impl Into<String>, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: output.into(),
            alternates: alternates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// The output separator followed by the distinct alternates
    pub fn accepted(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.output.as_str()).chain(
            self.alternates
                .iter()
                .map(String::as_str)
                .filter(move |alt| *alt != self.output),
        )
    }

    fn loose_pattern(&self) -> String {
        let choices: Vec<String> = self.accepted().map(regex::escape).collect();
        format!(r"\s*(?:{})\s*", choices.join("|"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeparatorRepr {
    Output(String),
    Full {
        output: String,
        #[serde(default)]
        alternates: Vec<String>,
    },
}

impl<'de> Deserialize<'de> for Separator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match SeparatorRepr::deserialize(deserializer)? {
            SeparatorRepr::Output(output) => Self::new(output),
            SeparatorRepr::Full { output, alternates } => Self { output, alternates },
        })
    }
}

/// Separators for the three separator positions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorChars {
    pub date: Separator,
    pub between: Separator,
    pub time: Separator,
}

impl Default for SeparatorChars {
    fn default() -> Self {
        Self {
            date: Separator::with_alternates(DATE_SEPARATOR, [DATE_SEPARATOR_ALT]),
            between: Separator::with_alternates(BETWEEN_SEPARATOR, [BETWEEN_SEPARATOR_ALT]),
            time: Separator::new(TIME_SEPARATOR),
        }
    }
}

impl SeparatorChars {
    /// Replaces only the positions named by `overrides`
    pub fn merge(&mut self, overrides: SeparatorOverrides) {
        if let Some(date) = overrides.date {
            self.date = date;
        }
        if let Some(between) = overrides.between {
            self.between = between;
        }
        if let Some(time) = overrides.time {
            self.time = time;
        }
    }
}

/// Partial separator configuration, merged over the current one
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeparatorOverrides {
    pub date: Option<Separator>,
    pub between: Option<Separator>,
    pub time: Option<Separator>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarConfig {
    pub separators: SeparatorChars,
    pub date_order: DateOrder,
    pub segment_order: SegmentOrder,
}

/// Compiled tokenizing grammar for one mode
#[derive(Debug, Clone)]
pub struct Grammar {
    mode: Mode,
    config: GrammarConfig,
    canonical: Regex,
    /// Fallback shapes in priority order, with the components each yields
    loose: Vec<(Regex, Mode)>,
}

impl Grammar {
    /// # Errors
    /// Returns the `regex::Error` when a pattern built from the separators fails to compile.
    pub fn new(config: &GrammarConfig, mode: Mode) -> Result<Self, regex::Error> {
        let canonical = Regex::new(&format!("^{}$", segments(config, mode, false)))?;

        let mut fallbacks = vec![mode];
        if mode == Mode::DateTime {
            fallbacks.push(Mode::Date);
        }
        let loose = fallbacks
            .into_iter()
            .map(|m| {
                Regex::new(&format!(r"^\s*{}\s*$", segments(config, m, true))).map(|re| (re, m))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mode,
            config: config.clone(),
            canonical,
            loose,
        })
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Ordered fields of the canonical text
    pub fn fields(&self) -> Vec<Field> {
        let date = self.config.date_order.fields();
        match (self.mode, self.config.segment_order) {
            (Mode::Date, _) => date.to_vec(),
            (Mode::Time, _) => TIME_FIELDS.to_vec(),
            (Mode::DateTime, SegmentOrder::DateTime) => [date, TIME_FIELDS].concat(),
            (Mode::DateTime, SegmentOrder::TimeDate) => [TIME_FIELDS, date].concat(),
        }
    }

    /// Whether `raw` is exactly in canonical form
    pub fn is_canonical(&self, raw: &str) -> bool {
        self.canonical.is_match(&normalize_digits(raw))
    }

    /// Parses `raw`, reporting why it was rejected
    ///
    /// # Errors
    /// `ParseError::EmptyInput` for blank input, `ParseError::InvalidFormat`
    /// when no shape matches, or the range error of the first bad field.
    pub fn try_parse(&self, raw: &str) -> Result<Value, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let normalized = normalize_digits(raw);

        if let Some(caps) = self.canonical.captures(&normalized) {
            return extract(&caps, self.mode);
        }
        self.loose
            .iter()
            .find_map(|(re, mode)| re.captures(&normalized).map(|caps| extract(&caps, *mode)))
            .unwrap_or_else(|| Err(ParseError::InvalidFormat(raw.to_owned())))
    }

    /// Lenient parse: anything that does not fit the grammar becomes [`Value::EMPTY`]
    pub fn parse(&self, raw: &str) -> Value {
        match self.try_parse(raw) {
            Ok(value) => value,
            Err(ParseError::EmptyInput) => Value::EMPTY,
            Err(error) => {
                tracing::debug!(%error, input = raw, mode = ?self.mode, "unparseable value; treating as empty");
                Value::EMPTY
            }
        }
    }

    pub fn parse_date(&self, raw: &str) -> Option<JalaliDate> {
        self.parse(raw).date
    }

    pub fn parse_time(&self, raw: &str) -> Option<TimeOfDay> {
        self.parse(raw).time
    }

    /// Canonical text of `value` for this grammar's mode
    pub fn format(&self, value: &DateTimeValue) -> String {
        let seps = &self.config.separators;
        let date = || {
            join(
                self.config.date_order.fields().iter().map(|&f| match f {
                    Field::Year => u32::from(value.date.year()),
                    Field::Month => u32::from(value.date.month()),
                    _ => u32::from(value.date.day()),
                }),
                self.config.date_order.fields().iter().map(|f| f.width()),
                seps.date.output(),
            )
        };
        let time = || {
            join(
                [value.time.hour(), value.time.minute(), value.time.second()]
                    .into_iter()
                    .map(u32::from),
                TIME_FIELDS.iter().map(|f| f.width()),
                seps.time.output(),
            )
        };

        match (self.mode, self.config.segment_order) {
            (Mode::Date, _) => date(),
            (Mode::Time, _) => time(),
            (Mode::DateTime, SegmentOrder::DateTime) => {
                format!("{}{}{}", date(), seps.between.output(), time())
            }
            (Mode::DateTime, SegmentOrder::TimeDate) => {
                format!("{}{}{}", time(), seps.between.output(), date())
            }
        }
    }
}

fn join(
    values: impl Iterator<Item = u32>,
    widths: impl Iterator<Item = usize>,
    separator: &str,
) -> String {
    let mut out = String::new();
    for (i, (value, width)) in values.zip(widths).enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        // Writing into a String cannot fail
        let _ = write!(out, "{value:0width$}");
    }
    out
}

fn field_pattern(field: Field, loose: bool) -> String {
    let width = match (field, loose) {
        (Field::Year, _) => "{4}",
        (_, true) => "{1,2}",
        (_, false) => "{2}",
    };
    format!("(?P<{}>[0-9]{width})", field.name())
}

fn date_pattern(config: &GrammarConfig, loose: bool) -> String {
    let sep = separator_pattern(&config.separators.date, loose);
    config
        .date_order
        .fields()
        .iter()
        .map(|&f| field_pattern(f, loose))
        .collect::<Vec<_>>()
        .join(&sep)
}

fn time_pattern(config: &GrammarConfig, loose: bool) -> String {
    let sep = separator_pattern(&config.separators.time, loose);
    let hour = field_pattern(Field::Hour, loose);
    let minute = field_pattern(Field::Minute, loose);
    let second = field_pattern(Field::Second, loose);
    if loose {
        format!("{hour}{sep}{minute}(?:{sep}{second})?")
    } else {
        format!("{hour}{sep}{minute}{sep}{second}")
    }
}

fn separator_pattern(separator: &Separator, loose: bool) -> String {
    if loose {
        separator.loose_pattern()
    } else {
        regex::escape(separator.output())
    }
}

fn segments(config: &GrammarConfig, mode: Mode, loose: bool) -> String {
    let between = separator_pattern(&config.separators.between, loose);
    match (mode, config.segment_order) {
        (Mode::Date, _) => date_pattern(config, loose),
        (Mode::Time, _) => time_pattern(config, loose),
        (Mode::DateTime, SegmentOrder::DateTime) => format!(
            "{}{between}{}",
            date_pattern(config, loose),
            time_pattern(config, loose)
        ),
        (Mode::DateTime, SegmentOrder::TimeDate) => format!(
            "{}{between}{}",
            time_pattern(config, loose),
            date_pattern(config, loose)
        ),
    }
}

fn extract(caps: &Captures<'_>, mode: Mode) -> Result<Value, ParseError> {
    let text = |field: Field| caps.name(field.name()).map_or("", |m| m.as_str());

    let date = if mode.has_date() {
        Some(JalaliDate::new(
            parse_u16(text(Field::Year))?,
            parse_u8(text(Field::Month))?,
            parse_u8(text(Field::Day))?,
        )?)
    } else {
        None
    };

    let time = if mode.has_time() {
        let second = match caps.name(Field::Second.name()) {
            Some(m) => parse_u8(m.as_str())?,
            None => 0,
        };
        Some(TimeOfDay::new(
            parse_u8(text(Field::Hour))?,
            parse_u8(text(Field::Minute))?,
            second,
        )?)
    } else {
        None
    };

    Ok(Value { date, time })
}

/// Maps Persian and Arabic-Indic digits to ASCII
fn normalize_digits(raw: &str) -> Cow<'_, str> {
    const PERSIAN_ZERO: u32 = 0x06F0;
    const ARABIC_INDIC_ZERO: u32 = 0x0660;

    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.chars()
            .map(|c| {
                let code = u32::from(c);
                let digit = match c {
                    '۰'..='۹' => code - PERSIAN_ZERO,
                    '٠'..='٩' => code - ARABIC_INDIC_ZERO,
                    _ => return c,
                };
                char::from_digit(digit, 10).unwrap_or(c)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, time};

    fn grammar(mode: Mode) -> Grammar {
        Grammar::new(&GrammarConfig::default(), mode).unwrap()
    }

    fn custom(order: DateOrder, separator: &str, mode: Mode) -> Grammar {
        let mut config = GrammarConfig {
            date_order: order,
            ..GrammarConfig::default()
        };
        config.separators.merge(SeparatorOverrides {
            date: Some(Separator::new(separator)),
            ..SeparatorOverrides::default()
        });
        Grammar::new(&config, mode).unwrap()
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(Mode::from_flags(true, false), Mode::Date);
        assert_eq!(Mode::from_flags(false, true), Mode::Time);
        assert_eq!(Mode::from_flags(true, true), Mode::DateTime);
        assert_eq!(Mode::from_flags(false, false), Mode::Date);
    }

    #[test]
    fn test_fields_order() {
        assert_eq!(
            grammar(Mode::Date).fields(),
            vec![Field::Year, Field::Month, Field::Day]
        );
        assert_eq!(grammar(Mode::DateTime).fields().len(), 6);
        assert_eq!(
            custom(DateOrder::DayMonthYear, ".", Mode::Date).fields(),
            vec![Field::Day, Field::Month, Field::Year]
        );
    }

    #[test]
    fn test_separator_merge_is_per_position() {
        let mut chars = SeparatorChars::default();
        chars.merge(SeparatorOverrides {
            time: Some(Separator::new(".")),
            ..SeparatorOverrides::default()
        });
        assert_eq!(chars.time.output(), ".");
        assert_eq!(chars.date.output(), "/");
        assert_eq!(chars.between.output(), " ");
        assert_eq!(chars.date.accepted().collect::<Vec<_>>(), vec!["/", "-"]);
    }

    #[test]
    fn test_parse_canonical() {
        let value = grammar(Mode::DateTime).parse("1403/05/07 14:30:05");
        assert_eq!(value.date, Some(date(1403, 5, 7)));
        assert_eq!(value.time, Some(time(14, 30, 5)));

        assert!(grammar(Mode::Date).is_canonical("1403/05/07"));
        assert!(!grammar(Mode::Date).is_canonical("1403/5/7"));
    }

    #[test]
    fn test_parse_loose_date() {
        struct TestCase {
            input: &'static str,
            expected: Option<(u16, u8, u8)>,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input: "1403/5/7",
                expected: Some((1403, 5, 7)),
                description: "single digit fields",
            },
            TestCase {
                input: "1403-05-07",
                expected: Some((1403, 5, 7)),
                description: "alternate separator",
            },
            TestCase {
                input: "  1403 / 05 / 07 ",
                expected: Some((1403, 5, 7)),
                description: "surrounding whitespace",
            },
            TestCase {
                input: "۱۴۰۳/۰۵/۰۷",
                expected: Some((1403, 5, 7)),
                description: "Persian digits",
            },
            TestCase {
                input: "١٤٠٣/٠٥/٠٧",
                expected: Some((1403, 5, 7)),
                description: "Arabic-Indic digits",
            },
            TestCase {
                input: "1403.05.07",
                expected: None,
                description: "separator not accepted",
            },
            TestCase {
                input: "03/05/07",
                expected: None,
                description: "two-digit year",
            },
            TestCase {
                input: "1402/12/30",
                expected: None,
                description: "leap day in a common year",
            },
        ];

        let g = grammar(Mode::Date);
        for case in &cases {
            let expected = case.expected.map(|(y, m, d)| date(y, m, d));
            assert_eq!(
                g.parse(case.input).date,
                expected,
                "{}: {}",
                case.description,
                case.input
            );
        }
    }

    #[test]
    fn test_parse_lenient_invalid_month_and_day() {
        assert!(grammar(Mode::Date).parse("13/45/9999").is_empty());
        assert!(
            custom(DateOrder::DayMonthYear, "/", Mode::Date)
                .parse("13/45/9999")
                .is_empty()
        );
        assert!(matches!(
            custom(DateOrder::DayMonthYear, "/", Mode::Date).try_parse("13/45/1403"),
            Err(ParseError::InvalidMonth(45))
        ));
    }

    #[test]
    fn test_parse_structural_failures_are_empty() {
        let g = grammar(Mode::DateTime);
        assert!(g.parse("").is_empty());
        assert!(g.parse("hello").is_empty());
        assert!(g.parse("1403/01").is_empty());
        assert!(g.parse("1403/01/01 25:00:00").is_empty());
        assert!(matches!(g.try_parse("  "), Err(ParseError::EmptyInput)));
        assert!(matches!(
            g.try_parse("1403/01"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_datetime_falls_back_to_date_only() {
        let value = grammar(Mode::DateTime).parse("1403/1/2");
        assert_eq!(value.date, Some(date(1403, 1, 2)));
        assert_eq!(value.time, None);

        let value = grammar(Mode::DateTime).parse("1403/1/2T9:05");
        assert_eq!(value.date, Some(date(1403, 1, 2)));
        assert_eq!(value.time, Some(time(9, 5, 0)));
    }

    #[test]
    fn test_parse_time_mode() {
        let g = grammar(Mode::Time);
        assert_eq!(g.parse_time("08:15:00"), Some(time(8, 15, 0)));
        assert_eq!(g.parse_time("8:15"), Some(time(8, 15, 0)));
        assert_eq!(g.parse_time("1403/01/01"), None);
        assert_eq!(g.parse_time("08:61:00"), None);
    }

    #[test]
    fn test_format_zero_pads() {
        let value = DateTimeValue::new(date(1403, 1, 2), time(3, 4, 5));
        assert_eq!(grammar(Mode::Date).format(&value), "1403/01/02");
        assert_eq!(grammar(Mode::Time).format(&value), "03:04:05");
        assert_eq!(
            grammar(Mode::DateTime).format(&value),
            "1403/01/02 03:04:05"
        );
        let early = DateTimeValue::new(date(99, 1, 2), time(0, 0, 0));
        assert_eq!(grammar(Mode::Date).format(&early), "0099/01/02");
    }

    #[test]
    fn test_custom_order_and_separator() {
        let g = custom(DateOrder::DayMonthYear, ".", Mode::Date);
        let value = DateTimeValue::new(date(1403, 5, 7), TimeOfDay::MIDNIGHT);
        assert_eq!(g.format(&value), "07.05.1403");
        assert_eq!(g.parse_date("07.05.1403"), Some(date(1403, 5, 7)));
        assert_eq!(g.parse_date("7.5.1403"), Some(date(1403, 5, 7)));
        assert_eq!(g.parse_date("1403/05/07"), None);

        let g = custom(DateOrder::MonthDayYear, "-", Mode::Date);
        assert_eq!(g.format(&value), "05-07-1403");
        assert_eq!(g.parse_date("05-07-1403"), Some(date(1403, 5, 7)));
    }

    #[test]
    fn test_time_first_segment_order() {
        let config = GrammarConfig {
            segment_order: SegmentOrder::TimeDate,
            ..GrammarConfig::default()
        };
        let g = Grammar::new(&config, Mode::DateTime).unwrap();
        let value = DateTimeValue::new(date(1403, 5, 7), time(10, 0, 0));
        assert_eq!(g.format(&value), "10:00:00 1403/05/07");
        assert_eq!(g.parse("10:00:00 1403/05/07"), Value::from(value));
    }

    #[test]
    fn test_round_trip_every_grammar() {
        let orders = [
            DateOrder::YearMonthDay,
            DateOrder::DayMonthYear,
            DateOrder::MonthDayYear,
        ];
        let separators = ["/", "-", ".", ""];
        let samples = [
            DateTimeValue::new(date(1403, 12, 30), time(23, 59, 59)),
            DateTimeValue::new(date(1, 1, 1), time(0, 0, 0)),
            DateTimeValue::new(date(1402, 7, 15), time(12, 5, 9)),
        ];

        for order in orders {
            for sep in separators {
                for mode in [Mode::Date, Mode::Time, Mode::DateTime] {
                    let g = custom(order, sep, mode);
                    for sample in &samples {
                        let text = g.format(sample);
                        let parsed = g.parse(&text);
                        let expected = Value {
                            date: mode.has_date().then_some(sample.date),
                            time: mode.has_time().then_some(sample.time),
                        };
                        assert_eq!(parsed, expected, "{order:?} {sep:?} {mode:?}: {text}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_separator_with_regex_metacharacters() {
        let mut config = GrammarConfig::default();
        config.separators.merge(SeparatorOverrides {
            date: Some(Separator::with_alternates("|", ["*", "+"])),
            ..SeparatorOverrides::default()
        });
        let g = Grammar::new(&config, Mode::Date).unwrap();
        assert_eq!(g.parse_date("1403|01|02"), Some(date(1403, 1, 2)));
        assert_eq!(g.parse_date("1403*1+2"), Some(date(1403, 1, 2)));
        assert_eq!(g.parse_date("1403x01x02"), None);
    }

    #[test]
    fn test_separator_serde_forms() {
        let chars: SeparatorChars =
            serde_json::from_str(r#"{"date": "."}"#).unwrap();
        assert_eq!(chars.date, Separator::new("."));
        assert_eq!(chars.time.output(), ":");

        let sep: Separator =
            serde_json::from_str(r#"{"output": "/", "alternates": ["-", "."]}"#).unwrap();
        assert_eq!(sep.accepted().collect::<Vec<_>>(), vec!["/", "-", "."]);
    }
}
