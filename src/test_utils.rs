use crate::{JalaliDate, Month, TimeOfDay, Year};

pub fn year(value: u16) -> Year {
    Year::new(value).unwrap()
}

pub fn month(value: u8) -> Month {
    Month::new(value).unwrap()
}

pub fn date(year: u16, month: u8, day: u8) -> JalaliDate {
    JalaliDate::new(year, month, day).unwrap()
}

pub fn time(hour: u8, minute: u8, second: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute, second).unwrap()
}
