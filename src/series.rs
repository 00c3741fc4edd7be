//! Ordered, timestamp-unique consumption series
//!
//! A [`ConsumptionSeries`] can only be built from a map keyed by exact
//! timestamp, so ordering and uniqueness hold by construction. Gaps are
//! allowed: a missing interval simply contributes nothing.

use crate::error::{HestiaError, Result};
use crate::quantity::{KilowattHours, WattHours};
use crate::sample::EnergySample;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive `[start_date, end_date]` validity window of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if end_date < start_date {
            return Err(HestiaError::validation(
                "window",
                format!("end date {} precedes start date {}", end_date, start_date),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// A window covering a single calendar day
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Smallest window covering both
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start_date: self.start_date.min(other.start_date),
            end_date: self.end_date.max(other.end_date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Deduplicated energy samples ordered by timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionSeries {
    samples: Vec<EnergySample>,
    window: DateWindow,
}

impl ConsumptionSeries {
    /// Build from samples already keyed by timestamp
    pub(crate) fn from_map(map: BTreeMap<DateTime<Utc>, EnergySample>, window: DateWindow) -> Self {
        Self {
            samples: map.into_values().collect(),
            window,
        }
    }

    /// Series without samples
    pub const fn empty(window: DateWindow) -> Self {
        Self {
            samples: Vec::new(),
            window,
        }
    }

    pub fn samples(&self) -> &[EnergySample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnergySample> {
        self.samples.iter()
    }

    pub const fn window(&self) -> DateWindow {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn days_in_window(&self) -> i64 {
        self.window.days()
    }

    /// Total energy of the series
    pub fn total_energy(&self) -> KilowattHours {
        self.samples.iter().map(|s| s.energy).sum::<WattHours>().into()
    }

    /// Merge an overlapping fetch window into this one.
    ///
    /// Samples already present win over those of `other`; the resulting window
    /// is the union of both. Returns the merged series and the number of
    /// colliding timestamps.
    pub fn merge(self, other: Self) -> (Self, usize) {
        let window = self.window.union(&other.window);
        let mut map: BTreeMap<DateTime<Utc>, EnergySample> =
            self.samples.into_iter().map(|s| (s.timestamp, s)).collect();
        let mut collisions = 0;
        for sample in other.samples {
            if map.contains_key(&sample.timestamp) {
                collisions += 1;
            } else {
                map.insert(sample.timestamp, sample);
            }
        }
        (Self::from_map(map, window), collisions)
    }
}

impl<'a> IntoIterator for &'a ConsumptionSeries {
    type Item = &'a EnergySample;
    type IntoIter = std::slice::Iter<'a, EnergySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
