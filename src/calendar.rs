//! Calendar provider interface
//!
//! Calendar-driven tariffs (Tempo, EJP, Zen Flex, seasonal peak days) depend
//! on a per-day category published by the supplier. The core only *consumes*
//! that information through [`CalendarLookup`]; fetching and storing it is
//! the caller's business.

use crate::error::{HestiaError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Tempo day color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TempoColor {
    Blue,
    White,
    Red,
}

impl TempoColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "BLUE",
            Self::White => "WHITE",
            Self::Red => "RED",
        }
    }
}

impl fmt::Display for TempoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TempoColor {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "BLUE" | "BLEU" | "TEMPO_BLEU" => Ok(Self::Blue),
            "WHITE" | "BLANC" | "TEMPO_BLANC" => Ok(Self::White),
            "RED" | "ROUGE" | "TEMPO_ROUGE" => Ok(Self::Red),
            _ => Err(HestiaError::validation(
                "tempo_color",
                format!("unknown Tempo color: {}", s),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for TempoColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Category of one calendar day, as published by the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_color: Option<TempoColor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_peak_day: Option<bool>,
}

impl CalendarDay {
    pub const fn tempo(date: NaiveDate, color: TempoColor) -> Self {
        Self {
            date,
            tempo_color: Some(color),
            is_peak_day: None,
        }
    }

    pub const fn peak(date: NaiveDate, is_peak_day: bool) -> Self {
        Self {
            date,
            tempo_color: None,
            is_peak_day: Some(is_peak_day),
        }
    }
}

/// Pure day → category lookup
pub trait CalendarLookup {
    /// Category of `date`, or `None` when the provider has no entry
    fn day(&self, date: NaiveDate) -> Option<CalendarDay>;
}

impl<F> CalendarLookup for F
where
    F: Fn(NaiveDate) -> Option<CalendarDay>,
{
    fn day(&self, date: NaiveDate) -> Option<CalendarDay> {
        self(date)
    }
}

/// Calendar that knows no day; suits calendar-free offers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

impl CalendarLookup for NoCalendar {
    fn day(&self, _date: NaiveDate) -> Option<CalendarDay> {
        None
    }
}

/// Calendar backed by an in-memory map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryCalendar {
    days: HashMap<NaiveDate, CalendarDay>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `day.date`
    pub fn insert(&mut self, day: CalendarDay) {
        self.days.insert(day.date, day);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Load a list of [`CalendarDay`] entries from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let days: Vec<CalendarDay> = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };
        Ok(days.into_iter().collect())
    }

    /// Save entries, sorted by date, as YAML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut days: Vec<&CalendarDay> = self.days.values().collect();
        days.sort_by_key(|d| d.date);
        std::fs::write(path, serde_yaml::to_string(&days)?)?;
        Ok(())
    }
}

impl FromIterator<CalendarDay> for InMemoryCalendar {
    fn from_iter<T: IntoIterator<Item = CalendarDay>>(iter: T) -> Self {
        let mut calendar = Self::new();
        for day in iter {
            calendar.insert(day);
        }
        calendar
    }
}

impl CalendarLookup for InMemoryCalendar {
    fn day(&self, date: NaiveDate) -> Option<CalendarDay> {
        self.days.get(&date).copied()
    }
}
