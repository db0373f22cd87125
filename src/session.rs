//! The picker and its per-field sessions.
//!
//! A [`DatePicker`] holds configuration and the compiled grammars. Opening
//! it on a field yields a [`Session`], which owns everything that belongs to
//! that one attachment: the field handle, the month cursor shown by the
//! calendar, the init time and the cached value. Dropping or closing the
//! session discards all of it.

use std::fmt;

use crate::bounds::{self, resolve_reference};
use crate::calendar::{Clock, SystemClock};
use crate::consts::{ESFAND, FARVARDIN, MAX_DATE_ATTR, MIN_DATE_ATTR};
use crate::field::{Document, InputField, NoDocument};
use crate::{
    Bound, DateTimeValue, Grammar, JalaliDate, Mode, Options, OptionsUpdate, TimeOfDay, Value,
    ValuePatch,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid separator configuration: {0}")]
    Grammar(#[from] regex::Error),
}

/// One compiled grammar per mode
#[derive(Debug, Clone)]
struct Grammars {
    date: Grammar,
    time: Grammar,
    date_time: Grammar,
}

impl Grammars {
    fn compile(options: &Options) -> Result<Self, ConfigError> {
        let config = options.grammar_config();
        Ok(Self {
            date: Grammar::new(&config, Mode::Date)?,
            time: Grammar::new(&config, Mode::Time)?,
            date_time: Grammar::new(&config, Mode::DateTime)?,
        })
    }

    const fn get(&self, mode: Mode) -> &Grammar {
        match mode {
            Mode::Date => &self.date,
            Mode::Time => &self.time,
            Mode::DateTime => &self.date_time,
        }
    }
}

pub struct DatePicker {
    options: Options,
    grammars: Grammars,
    clock: Box<dyn Clock>,
    document: Box<dyn Document>,
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DatePicker {
    /// # Errors
    /// Returns `ConfigError::Grammar` when the separators cannot be compiled.
    pub fn new(options: Options) -> Result<Self, ConfigError> {
        let grammars = Grammars::compile(&options)?;
        Ok(Self {
            options,
            grammars,
            clock: Box::new(SystemClock),
            document: Box::new(NoDocument),
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Lookup used for bound references to other elements
    #[must_use]
    pub fn with_document(mut self, document: impl Document + 'static) -> Self {
        self.document = Box::new(document);
        self
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Merges `update` over the current options.
    /// On error the previous options stay in effect.
    ///
    /// # Errors
    /// Returns `ConfigError::Grammar` when the merged separators cannot be compiled.
    pub fn update_options(&mut self, update: OptionsUpdate) -> Result<(), ConfigError> {
        let mut options = self.options.clone();
        options.apply(update);
        self.grammars = Grammars::compile(&options)?;
        self.options = options;
        Ok(())
    }

    pub const fn grammar(&self, mode: Mode) -> &Grammar {
        self.grammars.get(mode)
    }

    /// The configured fixed date, or the clock's current date
    pub fn today(&self) -> JalaliDate {
        self.options.today.unwrap_or_else(|| self.clock.today())
    }

    /// Starts a session on `field`
    pub fn open<F: InputField>(&self, field: F) -> Session<'_, F> {
        Session {
            picker: self,
            field,
            cursor: None,
            init_time: None,
            value: None,
        }
    }
}

pub struct Session<'p, F: InputField> {
    picker: &'p DatePicker,
    field: F,
    /// Date whose month the calendar shows
    cursor: Option<JalaliDate>,
    init_time: Option<TimeOfDay>,
    value: Option<Value>,
}

impl<F: InputField> fmt::Debug for Session<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cursor", &self.cursor)
            .field("init_time", &self.init_time)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<'p, F: InputField> Session<'p, F> {
    pub const fn field(&self) -> &F {
        &self.field
    }

    /// Ends the session and hands the field back
    pub fn close(self) -> F {
        self.field
    }

    /// Active components, from the options and the field's current markers
    pub fn mode(&self) -> Mode {
        self.picker.options.mode_for(&self.field)
    }

    pub fn grammar(&self) -> &'p Grammar {
        self.picker.grammar(self.mode())
    }

    /// Grammar used to read dates even when the field is time-only
    fn date_grammar(&self) -> &'p Grammar {
        let mode = self.mode();
        self.picker
            .grammar(if mode.has_date() { mode } else { Mode::Date })
    }

    fn time_grammar(&self) -> &'p Grammar {
        let mode = self.mode();
        self.picker
            .grammar(if mode.has_time() { mode } else { Mode::Time })
    }

    pub fn today(&self) -> JalaliDate {
        self.picker.today()
    }

    /// The field's text parsed with the active grammar
    pub fn input_value(&self) -> Value {
        self.grammar().parse(&self.field.value())
    }

    /// Resolved minimum date, read again on every call
    pub fn min_date(&self) -> Option<JalaliDate> {
        self.resolve_bound(self.picker.options.min_date, MIN_DATE_ATTR)
    }

    /// Resolved maximum date, read again on every call
    pub fn max_date(&self) -> Option<JalaliDate> {
        self.resolve_bound(self.picker.options.max_date, MAX_DATE_ATTR)
    }

    fn resolve_bound(&self, bound: Bound, attr: &str) -> Option<JalaliDate> {
        match bound {
            Bound::Unbounded => None,
            Bound::Fixed(date) => Some(date),
            Bound::Today => Some(self.today()),
            Bound::Attr => {
                let raw = self.field.attribute(attr)?;
                resolve_reference(
                    &raw,
                    self.today(),
                    self.picker.document.as_ref(),
                    self.date_grammar(),
                )
            }
        }
    }

    /// `candidate` clamped into the currently resolved bounds
    pub fn normalize(&self, candidate: JalaliDate) -> JalaliDate {
        bounds::normalize(candidate, self.min_date(), self.max_date())
    }

    /// Whether `date` lies outside the currently resolved bounds
    pub fn is_disabled(&self, date: JalaliDate) -> bool {
        self.min_date().is_some_and(|min| date < min) || self.max_date().is_some_and(|max| date > max)
    }

    /// Cursor date of the calendar.
    /// Derived once per session from the field, the init date or today.
    pub fn init_date(&mut self) -> JalaliDate {
        if let Some(cursor) = self.cursor {
            return cursor;
        }

        let raw = self.field.value();
        let start = if raw.trim().is_empty() {
            self.picker.options.init_date.unwrap_or_else(|| self.today())
        } else {
            self.date_grammar()
                .parse_date(&raw)
                .unwrap_or_else(|| self.today())
        };
        let cursor = self.normalize(start);
        self.cursor = Some(cursor);
        cursor
    }

    /// Time used when a selection carries no time of its own
    pub fn init_time(&mut self) -> TimeOfDay {
        if let Some(time) = self.init_time {
            return time;
        }

        let raw = self.field.value();
        let time = self
            .time_grammar()
            .parse_time(&raw)
            .or(self.picker.options.init_time)
            .unwrap_or_default();
        self.init_time = Some(time);
        time
    }

    /// Current value, read from the field on first access
    pub fn value(&mut self) -> Value {
        if let Some(value) = self.value {
            return value;
        }
        let value = self.input_value();
        self.value = Some(value);
        value
    }

    /// Merges `patch` over the current value, itself over today's date and
    /// the init time, then writes the canonical text back to the field
    pub fn set_value(&mut self, patch: ValuePatch) -> DateTimeValue {
        let defaults = DateTimeValue::new(self.today(), self.init_time());
        let current = ValuePatch::from(self.value());
        let selected = patch.or(current).resolve(defaults);

        let text = self.grammar().format(&selected);
        tracing::debug!(value = %text, "value selected");
        self.value = Some(Value::from(selected));
        self.field.set_value(&text);
        self.field.notify_change();
        selected
    }

    /// Whether picking a value finishes the interaction (no time to adjust)
    pub fn closes_on_select(&self) -> bool {
        !self.mode().has_time()
    }

    /// Moves the cursor to `date`, clamped into the bounds
    pub fn set_cursor(&mut self, date: JalaliDate) -> JalaliDate {
        let from = self.init_date();
        self.move_cursor(from, date)
    }

    pub fn increase_month(&mut self) -> JalaliDate {
        let cursor = self.init_date();
        let year = if cursor.month() == ESFAND && self.picker.options.change_month_rotate_year {
            match cursor.year_typed().offset(1) {
                Some(year) => year,
                None => return cursor,
            }
        } else {
            cursor.year_typed()
        };
        let next = cursor.with_year_month(year, cursor.month_typed().succ());
        self.move_cursor(cursor, next)
    }

    pub fn decrease_month(&mut self) -> JalaliDate {
        let cursor = self.init_date();
        let year = if cursor.month() == FARVARDIN && self.picker.options.change_month_rotate_year
        {
            match cursor.year_typed().offset(-1) {
                Some(year) => year,
                None => return cursor,
            }
        } else {
            cursor.year_typed()
        };
        let next = cursor.with_year_month(year, cursor.month_typed().pred());
        self.move_cursor(cursor, next)
    }

    pub fn increase_year(&mut self) -> JalaliDate {
        self.step_year(1)
    }

    pub fn decrease_year(&mut self) -> JalaliDate {
        self.step_year(-1)
    }

    fn step_year(&mut self, delta: i32) -> JalaliDate {
        let cursor = self.init_date();
        match cursor.year_typed().offset(delta) {
            Some(year) => self.move_cursor(cursor, cursor.with_year(year)),
            None => cursor,
        }
    }

    fn move_cursor(&mut self, from: JalaliDate, candidate: JalaliDate) -> JalaliDate {
        let next = self.normalize(candidate);
        tracing::trace!(%from, %candidate, %next, "cursor moved");
        self.cursor = Some(next);
        next
    }
}
