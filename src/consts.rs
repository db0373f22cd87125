/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;

/// Maximum valid year (inclusive); the break table ends at 3178
pub const MAX_YEAR: u16 = 3177;

/// Maximum valid month (Esfand)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for Farvardin
pub const FARVARDIN: u8 = 1;
/// Month number for Shahrivar, the last 31-day month
pub const SHAHRIVAR: u8 = 6;
/// Month number for Esfand
pub const ESFAND: u8 = 12;

/// Days in Esfand for leap years
pub const ESFAND_DAYS_LEAP: u8 = 30;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// Esfand shows 29 days (common year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // Farvardin
    31, // Ordibehesht
    31, // Khordad
    31, // Tir
    31, // Mordad
    31, // Shahrivar
    30, // Mehr
    30, // Aban
    30, // Azar
    30, // Dey
    30, // Bahman
    29, // Esfand (common year, adjusted by is_leap_year check)
];

/// Persian month names, index 0 is Farvardin
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Short Persian weekday names, the week starts on Saturday
pub const WEEKDAY_NAMES: [&str; 7] = ["ش", "ی", "د", "س", "چ", "پ", "ج"];

/// Years at which the leap pattern of the 33-year cycle restarts
pub(crate) const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Length of one leap sub-cycle in years
pub(crate) const LEAP_CYCLE: i32 = 33;

/// Offset between a Jalali year and the Gregorian year it starts in
pub(crate) const GREGORIAN_YEAR_OFFSET: i32 = 621;

/// Default date component separator
pub const DATE_SEPARATOR: &str = "/";
/// Alternate date separator accepted by the loose grammar
pub const DATE_SEPARATOR_ALT: &str = "-";
/// Default separator between the date and the time
pub const BETWEEN_SEPARATOR: &str = " ";
/// Alternate date-time separator accepted by the loose grammar
pub const BETWEEN_SEPARATOR_ALT: &str = "T";
/// Default time component separator
pub const TIME_SEPARATOR: &str = ":";

/// Bound sentinel resolving to the current date
pub const TODAY_SETTING: &str = "today";
/// Bound sentinel reading the bound from the field attributes
pub const ATTR_SETTING: &str = "attr";

/// Field attribute holding the minimum date when the bound is `attr`
pub const MIN_DATE_ATTR: &str = "data-jdp-min-date";
/// Field attribute holding the maximum date when the bound is `attr`
pub const MAX_DATE_ATTR: &str = "data-jdp-max-date";
/// Field attribute marker disabling the time component
pub const ONLY_DATE_ATTR: &str = "data-jdp-only-date";
/// Field attribute marker disabling the date component
pub const ONLY_TIME_ATTR: &str = "data-jdp-only-time";
