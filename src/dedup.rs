//! Duplicate timestamp collapse
//!
//! Readings are fetched in overlapping windows because the provider
//! sometimes returns fewer days than requested. The overlap yields the same
//! reading twice; summing both doubles the bill. The deduplicator keys
//! samples by their exact instant and keeps the first value seen.

use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::sample::EnergySample;
use crate::series::{ConsumptionSeries, DateWindow};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Result of a deduplication pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    pub series: ConsumptionSeries,

    /// Duplicates dropped, identical or not
    pub collisions: usize,

    /// Dropped duplicates whose energy differed from the kept sample
    pub conflicting: usize,
}

/// Collapses exact-timestamp collisions into a [`ConsumptionSeries`]
#[derive(Debug, Clone)]
pub struct Deduplicator {
    logger: StructuredLogger,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self {
            logger: get_logger("dedup"),
        }
    }

    /// Deduplicate `samples` (any order) into a series over `window`
    pub fn deduplicate<I>(&self, samples: I, window: DateWindow) -> Result<DedupOutcome>
    where
        I: IntoIterator<Item = EnergySample>,
    {
        let window = DateWindow::new(window.start_date, window.end_date)?;
        let mut by_instant: BTreeMap<DateTime<Utc>, EnergySample> = BTreeMap::new();
        let mut collisions = 0;
        let mut conflicting = 0;

        for sample in samples {
            match by_instant.entry(sample.timestamp) {
                Entry::Vacant(slot) => {
                    slot.insert(sample);
                }
                Entry::Occupied(kept) => {
                    collisions += 1;
                    if kept.get().energy != sample.energy {
                        conflicting += 1;
                        self.logger.debug(&format!(
                            "Conflicting duplicate at {}: kept {}, dropped {}",
                            sample.timestamp,
                            kept.get().energy,
                            sample.energy
                        ));
                    }
                }
            }
        }

        if conflicting > 0 {
            self.logger.warn(&format!(
                "{} of {} duplicate timestamp(s) carried different values, kept first seen",
                conflicting, collisions
            ));
        } else if collisions > 0 {
            self.logger
                .debug(&format!("Collapsed {} duplicate timestamp(s)", collisions));
        }

        Ok(DedupOutcome {
            series: ConsumptionSeries::from_map(by_instant, window),
            collisions,
            conflicting,
        })
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::WattHours;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn sample(minutes: i64, wh: i64) -> EnergySample {
        let ts = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        EnergySample::new(ts, WattHours(Decimal::from(wh)))
    }

    fn window() -> DateWindow {
        DateWindow::single_day(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
    }

    #[test]
    fn test_overlapping_fetch_is_not_double_counted() {
        let first_fetch = (0..4).map(|i| sample(i * 30, 500));
        let second_fetch = (2..6).map(|i| sample(i * 30, 500));
        let outcome = Deduplicator::new()
            .deduplicate(first_fetch.chain(second_fetch), window())
            .unwrap();
        assert_eq!(outcome.series.len(), 6);
        assert_eq!(outcome.collisions, 2);
        assert_eq!(outcome.conflicting, 0);
        assert_eq!(outcome.series.total_energy().0, Decimal::from(3));
    }

    #[test]
    fn test_conflicting_duplicate_keeps_first_seen() {
        let outcome = Deduplicator::new()
            .deduplicate(vec![sample(30, 700), sample(0, 100), sample(30, 900)], window())
            .unwrap();
        assert_eq!(outcome.collisions, 1);
        assert_eq!(outcome.conflicting, 1);
        let energies: Vec<_> = outcome.series.iter().map(|s| s.energy.0).collect();
        assert_eq!(energies, vec![Decimal::from(100), Decimal::from(700)]);
    }

    #[test]
    fn test_sub_daily_samples_on_same_date_are_kept() {
        let outcome = Deduplicator::new()
            .deduplicate((0..48).map(|i| sample(i * 30, 250)), window())
            .unwrap();
        assert_eq!(outcome.series.len(), 48);
        assert_eq!(outcome.collisions, 0);
    }

    #[test]
    fn test_deduplication_is_idempotent() {
        let dedup = Deduplicator::new();
        let once = dedup
            .deduplicate(vec![sample(60, 1), sample(0, 2), sample(60, 3)], window())
            .unwrap()
            .series;
        let twice = dedup
            .deduplicate(once.samples().iter().copied(), once.window())
            .unwrap();
        assert_eq!(twice.series, once);
        assert_eq!(twice.collisions, 0);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let window = DateWindow {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        };
        assert!(Deduplicator::new().deduplicate(Vec::new(), window).is_err());
    }
}
