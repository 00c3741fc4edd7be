//! Day numbering shared by every offer type.
//!
//! Days are numbered Monday=0 … Sunday=6. Variants must go through these
//! helpers rather than re-deriving weekdays themselves.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Index of the first weekend day (Saturday)
pub const SATURDAY: u32 = 5;

/// Hour at which a calendar-driven tariff day (Tempo, EJP, Zen Flex) starts
pub const TARIFF_DAY_START_HOUR: u32 = 6;

/// Monday=0 … Sunday=6
pub fn day_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    day_index(date) >= SATURDAY
}

/// Calendar day whose color or flag applies at `local`.
///
/// Supplier calendars switch at 06:00, so the small hours belong to the
/// previous day.
pub fn tariff_day(local: NaiveDateTime) -> NaiveDate {
    if local.time().hour() < TARIFF_DAY_START_HOUR {
        local.date() - Duration::days(1)
    } else {
        local.date()
    }
}

/// Minutes elapsed since midnight
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
