//! Jalali calendar arithmetic.
//!
//! Leap years follow the astronomical break table: between two consecutive
//! break years the 33-year sub-cycle repeats, and each break realigns the
//! pattern with the observed vernal equinox. Conversions go through Julian
//! day numbers.

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::consts::{
    BREAKS, DAYS_IN_MONTH, ESFAND, ESFAND_DAYS_LEAP, GREGORIAN_YEAR_OFFSET, LEAP_CYCLE, MAX_MONTH,
    SHAHRIVAR,
};
use crate::{JalaliDate, ParseError};

/// Result of locating a year inside the break table
struct YearInfo {
    /// Years since the last leap year, 0 means this year is leap
    leap: i32,
    /// Gregorian year in which the Jalali year starts
    gregorian_year: i32,
    /// Day of March on which Farvardin 1st falls
    march: i32,
}

fn year_info(jy: i32) -> Option<YearInfo> {
    let last = BREAKS[BREAKS.len() - 1];
    if jy < BREAKS[0] || jy >= last {
        return None;
    }

    let gregorian_year = jy + GREGORIAN_YEAR_OFFSET;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;
    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / LEAP_CYCLE * 8 + (jump % LEAP_CYCLE) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / LEAP_CYCLE * 8 + (n % LEAP_CYCLE + 3) / 4;
    if jump % LEAP_CYCLE == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / LEAP_CYCLE * LEAP_CYCLE;
    }
    let mut leap = ((n + 1) % LEAP_CYCLE - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(YearInfo {
        leap,
        gregorian_year,
        march,
    })
}

/// Whether `year` has a 30-day Esfand
pub fn is_leap_year(year: u16) -> bool {
    year_info(i32::from(year)).is_some_and(|info| info.leap == 0)
}

/// Number of days in `month` of `year`: 31 for the first six months, 30 for
/// the next five, and 29 or 30 for Esfand
pub fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == ESFAND && is_leap_year(year) {
        ESFAND_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[usize::from(month)]
    }
}

/// Julian day number of a proleptic Gregorian date
fn gregorian_to_jdn(gy: i32, gm: i32, gd: i32) -> i32 {
    let d = (gy + (gm - 8) / 6 + 100_100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34_840_408;
    d - (gy + 100_100 + (gm - 8) / 6) / 100 * 3 / 4 + 752
}

fn jdn_to_gregorian(jdn: i32) -> (i32, i32, i32) {
    let mut j = 4 * jdn + 139_361_631;
    j += (4 * jdn + 183_187_720) / 146_097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let gd = (i % 153) / 5 + 1;
    let gm = (i / 153) % 12 + 1;
    let gy = j / 1461 - 100_100 + (8 - gm) / 6;
    (gy, gm, gd)
}

fn jalali_to_jdn(jy: i32, jm: i32, jd: i32) -> Option<i32> {
    let info = year_info(jy)?;
    Some(
        gregorian_to_jdn(info.gregorian_year, 3, info.march) + (jm - 1) * 31 - jm / 7 * (jm - 7)
            + jd
            - 1,
    )
}

fn jdn_to_jalali(jdn: i32) -> Option<(i32, i32, i32)> {
    let (gy, _, _) = jdn_to_gregorian(jdn);
    let mut jy = gy - GREGORIAN_YEAR_OFFSET;
    let info = year_info(jy)?;
    let first_day = gregorian_to_jdn(gy, 3, info.march);

    let first_half = i32::from(SHAHRIVAR) * 31;
    let mut k = jdn - first_day;
    if k >= 0 {
        if k < first_half {
            return Some((jy, 1 + k / 31, k % 31 + 1));
        }
        k -= first_half;
    } else {
        // Still in the previous year, counted back from Esfand
        jy -= 1;
        k += 179;
        if info.leap == 1 {
            k += 1;
        }
    }
    Some((jy, 7 + k / 30, k % 30 + 1))
}

impl JalaliDate {
    /// Converts a Gregorian calendar date
    ///
    /// # Errors
    /// Returns `ParseError::UnsupportedGregorian` when the date falls outside
    /// the supported Jalali years.
    pub fn from_gregorian(date: NaiveDate) -> Result<Self, ParseError> {
        let unsupported = || ParseError::UnsupportedGregorian(date);
        let month = i32::try_from(date.month()).map_err(|_| unsupported())?;
        let day = i32::try_from(date.day()).map_err(|_| unsupported())?;
        let jdn = gregorian_to_jdn(date.year(), month, day);
        let (jy, jm, jd) = jdn_to_jalali(jdn).ok_or_else(unsupported)?;

        let year = u16::try_from(jy).map_err(|_| unsupported())?;
        let month = u8::try_from(jm).map_err(|_| unsupported())?;
        let day = u8::try_from(jd).map_err(|_| unsupported())?;
        Self::new(year, month, day).map_err(|_| unsupported())
    }

    /// Julian day number of this date
    pub fn julian_day(&self) -> i32 {
        // Every constructible date lies inside the break table
        jalali_to_jdn(
            i32::from(self.year()),
            i32::from(self.month()),
            i32::from(self.day()),
        )
        .unwrap_or_default()
    }

    /// The same day in the proleptic Gregorian calendar
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        let (gy, gm, gd) = jdn_to_gregorian(self.julian_day());
        NaiveDate::from_ymd_opt(gy, u32::try_from(gm).ok()?, u32::try_from(gd).ok()?)
    }

    /// Day of the week
    pub fn weekday(&self) -> Weekday {
        const WEEK: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        WEEK[usize::try_from(self.julian_day().rem_euclid(7)).unwrap_or_default()]
    }

    /// Column of this date in a Saturday-first week, 0 for Saturday
    pub fn weekday_index(&self) -> usize {
        usize::try_from((self.julian_day() + 2).rem_euclid(7)).unwrap_or_default()
    }
}

/// Source of the current date
pub trait Clock {
    fn today(&self) -> JalaliDate;
}

/// Reads today's date from the local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> JalaliDate {
        let now = Local::now().date_naive();
        JalaliDate::from_gregorian(now).unwrap_or_else(|error| {
            tracing::warn!(%error, "system date is outside the Jalali range; using the epoch");
            JalaliDate::UNIX_EPOCH
        })
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub JalaliDate);

impl Clock for FixedClock {
    fn today(&self) -> JalaliDate {
        self.0
    }
}
