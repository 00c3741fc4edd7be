//! Off-peak clock windows.
//!
//! A window is `[start, end)`: the start instant is off-peak, the end instant
//! is not. `22:00-06:00` therefore puts 22:00:00 in "hc" and 06:00:00 in "hp".
//! Windows may span midnight; `start == end` covers the whole day.

use super::day::minute_of_day;
use crate::error::{HestiaError, Result};
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffpeakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OffpeakWindow {
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn from_hm(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Result<Self> {
        Ok(Self::new(
            clock_time(start_hour, start_minute)?,
            clock_time(end_hour, end_minute)?,
        ))
    }

    /// Inclusive start, exclusive end, wrapping past midnight
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            true
        } else if self.start < self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }

    /// Off-peak duration in minutes
    pub fn duration_minutes(&self) -> u32 {
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);
        if start == end {
            24 * 60
        } else {
            (end + 24 * 60 - start) % (24 * 60)
        }
    }
}

impl fmt::Display for OffpeakWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Accepts `22:00-06:00`, `22h00-6h00`, `22H-6H` and `22-6`
impl FromStr for OffpeakWindow {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| invalid(s, "expected START-END"))?;
        Ok(Self::new(parse_clock(start, s)?, parse_clock(end, s)?))
    }
}

/// One or more off-peak windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffpeakSchedule(Vec<OffpeakWindow>);

impl OffpeakSchedule {
    pub fn new(windows: Vec<OffpeakWindow>) -> Result<Self> {
        if windows.is_empty() {
            return Err(HestiaError::validation(
                "offpeak_hours",
                "at least one off-peak window is required",
            ));
        }
        Ok(Self(windows))
    }

    pub fn single(window: OffpeakWindow) -> Self {
        Self(vec![window])
    }

    pub fn windows(&self) -> &[OffpeakWindow] {
        &self.0
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.0.iter().any(|w| w.contains(time))
    }
}

impl fmt::Display for OffpeakSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(";"))
    }
}

/// Parses `22:00-06:00;12:30-14:30` as well as the contract form
/// `HC (22H00-6H00;12H30-14H30)`.
impl FromStr for OffpeakSchedule {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        let body = match (s.find('('), s.rfind(')')) {
            (Some(open), Some(close)) if open < close => &s[open + 1..close],
            (None, None) => s,
            _ => return Err(invalid(s, "unbalanced parentheses")),
        };
        let windows = body
            .split([';', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<OffpeakWindow>>>()?;
        Self::new(windows)
    }
}

fn clock_time(hour: u32, minute: u32) -> Result<NaiveTime> {
    // 24:00 closes a window at midnight
    let hour = if hour == 24 && minute == 0 { 0 } else { hour };
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        HestiaError::validation(
            "offpeak_hours",
            format!("invalid clock time {:02}:{:02}", hour, minute),
        )
    })
}

fn parse_clock(part: &str, whole: &str) -> Result<NaiveTime> {
    let normalized = part.trim().to_uppercase().replace('H', ":");
    let (hour, minute) = match normalized.split_once(':') {
        Some((h, m)) if m.is_empty() => (h, "0"),
        Some((h, m)) => (h, m),
        None => (normalized.as_str(), "0"),
    };
    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| invalid(whole, "hour is not a number"))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| invalid(whole, "minute is not a number"))?;
    clock_time(hour, minute)
}

fn invalid(input: &str, reason: &str) -> HestiaError {
    HestiaError::validation(
        "offpeak_hours",
        format!("cannot parse {:?}: {}", input, reason),
    )
}
