use serde::{Deserialize, Serialize};

use crate::consts::{ONLY_DATE_ATTR, ONLY_TIME_ATTR};
use crate::{
    Bound, DateOrder, GrammarConfig, InputField, JalaliDate, Mode, SegmentOrder, SeparatorChars,
    SeparatorOverrides, TimeOfDay,
};

/// Picker configuration.
/// Deserializes from the widget's camelCase option object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Whether the value carries a date
    pub date: bool,
    /// Whether the value carries a time
    pub time: bool,
    pub min_date: Bound,
    pub max_date: Bound,
    pub separator_chars: SeparatorChars,
    pub date_order: DateOrder,
    pub segment_order: SegmentOrder,
    /// Cursor date when the field is empty
    pub init_date: Option<JalaliDate>,
    /// Time used when the field holds no time
    pub init_time: Option<TimeOfDay>,
    /// Whether stepping past Esfand or Farvardin also steps the year
    pub change_month_rotate_year: bool,
    /// Fixed "today", overriding the clock
    pub today: Option<JalaliDate>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            date: true,
            time: false,
            min_date: Bound::Unbounded,
            max_date: Bound::Unbounded,
            separator_chars: SeparatorChars::default(),
            date_order: DateOrder::default(),
            segment_order: SegmentOrder::default(),
            init_date: None,
            init_time: None,
            change_month_rotate_year: false,
            today: None,
        }
    }
}

impl Options {
    pub fn grammar_config(&self) -> GrammarConfig {
        GrammarConfig {
            separators: self.separator_chars.clone(),
            date_order: self.date_order,
            segment_order: self.segment_order,
        }
    }

    /// Date component is on and the field is not marked time-only
    pub fn date_active<F: InputField + ?Sized>(&self, field: &F) -> bool {
        self.date && !field.has_attribute(ONLY_TIME_ATTR)
    }

    /// Time component is on and the field is not marked date-only
    pub fn time_active<F: InputField + ?Sized>(&self, field: &F) -> bool {
        self.time && !field.has_attribute(ONLY_DATE_ATTR)
    }

    /// Mode for `field`, read from its current attributes
    pub fn mode_for<F: InputField + ?Sized>(&self, field: &F) -> Mode {
        Mode::from_flags(self.date_active(field), self.time_active(field))
    }

    /// Merges `update` over these options.
    /// Separator positions are merged one by one; everything else that is set replaces.
    pub fn apply(&mut self, update: OptionsUpdate) {
        let OptionsUpdate {
            date,
            time,
            min_date,
            max_date,
            separator_chars,
            date_order,
            segment_order,
            init_date,
            init_time,
            change_month_rotate_year,
            today,
        } = update;

        if let Some(date) = date {
            self.date = date;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(min_date) = min_date {
            self.min_date = min_date;
        }
        if let Some(max_date) = max_date {
            self.max_date = max_date;
        }
        if let Some(overrides) = separator_chars {
            self.separator_chars.merge(overrides);
        }
        if let Some(order) = date_order {
            self.date_order = order;
        }
        if let Some(order) = segment_order {
            self.segment_order = order;
        }
        if init_date.is_some() {
            self.init_date = init_date;
        }
        if init_time.is_some() {
            self.init_time = init_time;
        }
        if let Some(rotate) = change_month_rotate_year {
            self.change_month_rotate_year = rotate;
        }
        if today.is_some() {
            self.today = today;
        }
    }
}

/// A partial [`Options`]; unset fields keep their previous value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsUpdate {
    pub date: Option<bool>,
    pub time: Option<bool>,
    pub min_date: Option<Bound>,
    pub max_date: Option<Bound>,
    pub separator_chars: Option<SeparatorOverrides>,
    pub date_order: Option<DateOrder>,
    pub segment_order: Option<SegmentOrder>,
    pub init_date: Option<JalaliDate>,
    pub init_time: Option<TimeOfDay>,
    pub change_month_rotate_year: Option<bool>,
    pub today: Option<JalaliDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextField;
    use crate::test_utils::{date, time};

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.date);
        assert!(!options.time);
        assert!(!options.change_month_rotate_year);
        assert_eq!(options.min_date, Bound::Unbounded);
        assert_eq!(options.separator_chars.date.output(), "/");
    }

    #[test]
    fn test_deserialize_widget_options() {
        let json = r#"{
            "time": true,
            "minDate": "today",
            "maxDate": "attr",
            "separatorChars": {"date": "-"},
            "initTime": {"hour": 8},
            "changeMonthRotateYear": true,
            "dateOrder": "dayMonthYear"
        }"#;
        let options: Options = serde_json::from_str(json).unwrap();
        assert!(options.date);
        assert!(options.time);
        assert_eq!(options.min_date, Bound::Today);
        assert_eq!(options.max_date, Bound::Attr);
        assert_eq!(options.separator_chars.date.output(), "-");
        assert_eq!(options.separator_chars.time.output(), ":");
        assert_eq!(options.init_time, Some(time(8, 0, 0)));
        assert!(options.change_month_rotate_year);
        assert_eq!(options.date_order, DateOrder::DayMonthYear);
    }

    #[test]
    fn test_apply_merges_over_previous() {
        let mut options = Options {
            time: true,
            min_date: Bound::Fixed(date(1400, 1, 1)),
            ..Options::default()
        };
        options.separator_chars.merge(SeparatorOverrides {
            time: Some(crate::Separator::new(".")),
            ..SeparatorOverrides::default()
        });

        let update: OptionsUpdate =
            serde_json::from_str(r#"{"maxDate": "today", "separatorChars": {"date": "-"}}"#)
                .unwrap();
        options.apply(update);

        // untouched fields survive
        assert!(options.time);
        assert_eq!(options.min_date, Bound::Fixed(date(1400, 1, 1)));
        assert_eq!(options.separator_chars.time.output(), ".");
        // named fields replaced
        assert_eq!(options.max_date, Bound::Today);
        assert_eq!(options.separator_chars.date.output(), "-");
    }

    #[test]
    fn test_mode_follows_field_markers() {
        let options = Options {
            time: true,
            ..Options::default()
        };
        let plain = TextField::new("");
        let only_date = TextField::new("").with_attribute(ONLY_DATE_ATTR, "");
        let only_time = TextField::new("").with_attribute(ONLY_TIME_ATTR, "");

        assert_eq!(options.mode_for(&plain), Mode::DateTime);
        assert_eq!(options.mode_for(&only_date), Mode::Date);
        assert_eq!(options.mode_for(&only_time), Mode::Time);

        // Markers never switch on a component the options have off
        let date_only_options = Options::default();
        assert_eq!(date_only_options.mode_for(&plain), Mode::Date);
        assert!(!date_only_options.time_active(&plain));
    }

    #[test]
    fn test_grammar_config() {
        let options = Options {
            date_order: DateOrder::MonthDayYear,
            ..Options::default()
        };
        let config = options.grammar_config();
        assert_eq!(config.date_order, DateOrder::MonthDayYear);
        assert_eq!(config.separators, SeparatorChars::default());
    }
}
