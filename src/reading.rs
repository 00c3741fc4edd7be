//! Metering provider payload adapter
//!
//! The provider's load-curve endpoint answers with average power readings
//! keyed by naive local end-of-interval times and string values:
//!
//! ```json
//! {"meter_reading": {"usage_point_id": "12345678901234",
//!   "interval_reading": [
//!     {"value": "1800", "date": "2024-01-01 00:30:00", "interval_length": "PT30M"}
//!   ]}}
//! ```
//!
//! [`MeterReadingPayload::to_raw_samples`] turns those into [`RawSample`]s,
//! resolving local times in the meter's time zone. On the autumn change the
//! repeated hour arrives twice under the same label: the first copy is the
//! summer-time instant, the second the winter-time one.

use crate::error::{HestiaError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use crate::sample::RawSample;
use chrono::offset::LocalResult;
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReadingPayload {
    pub meter_reading: MeterReading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_point_id: Option<String>,
    #[serde(default)]
    pub interval_reading: Vec<IntervalReading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalReading {
    /// Average power in W, as a string
    pub value: String,
    /// Local wall-clock time, no offset
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_length: Option<String>,
}

/// Which instant an ambiguous local time resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    Earliest,
    Latest,
}

/// Raw samples extracted from a payload
#[derive(Debug, Clone, Default)]
pub struct ConvertedReadings {
    pub samples: Vec<RawSample>,
    /// Readings skipped because their value or date could not be read
    pub rejected: usize,
}

impl MeterReadingPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert every reading, skipping and counting malformed ones
    pub fn to_raw_samples(&self, timezone: Tz) -> ConvertedReadings {
        let logger = self.logger();
        let mut converted = ConvertedReadings::default();
        let mut occurrences: HashMap<NaiveDateTime, usize> = HashMap::new();
        for reading in &self.meter_reading.interval_reading {
            // Odd occurrences of a label take the first instant, even ones the second
            let fold = match parse_local(&reading.date) {
                Ok(local) => {
                    let seen = occurrences.entry(local).or_insert(0);
                    *seen += 1;
                    if *seen % 2 == 0 {
                        Fold::Latest
                    } else {
                        Fold::Earliest
                    }
                }
                Err(_) => Fold::Earliest,
            };
            match reading.to_raw_sample_in(timezone, fold) {
                Ok(sample) => converted.samples.push(sample),
                Err(e) => {
                    logger.debug(&format!("Skipping reading {:?}: {}", reading.date, e));
                    converted.rejected += 1;
                }
            }
        }
        if converted.rejected > 0 {
            logger.warn(&format!(
                "Skipped {} unreadable reading(s) of {}",
                converted.rejected,
                self.meter_reading.interval_reading.len()
            ));
        }
        converted
    }

    fn logger(&self) -> StructuredLogger {
        match &self.meter_reading.usage_point_id {
            Some(id) => get_logger_with_context(LogContext::new("reading").with_usage_point_id(id)),
            None => get_logger("reading"),
        }
    }
}

/// Load samples from a JSON file holding either a provider payload or a
/// plain array of [`RawSample`]s
pub fn load_samples_file<P: AsRef<Path>>(path: P, timezone: Tz) -> Result<ConvertedReadings> {
    let contents = std::fs::read_to_string(path)?;
    if let Ok(payload) = MeterReadingPayload::from_json(&contents) {
        return Ok(payload.to_raw_samples(timezone));
    }
    let samples: Vec<RawSample> = serde_json::from_str(&contents)?;
    Ok(ConvertedReadings {
        samples,
        rejected: 0,
    })
}

impl IntervalReading {
    pub fn to_raw_sample(&self, timezone: Tz) -> Result<RawSample> {
        self.to_raw_sample_in(timezone, Fold::Earliest)
    }

    /// Convert, resolving an ambiguous local time to `fold`
    pub fn to_raw_sample_in(&self, timezone: Tz, fold: Fold) -> Result<RawSample> {
        let power_value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| HestiaError::data(format!("value is not a number: {:?}", self.value)))?;
        let local = parse_local(&self.date)?;
        let timestamp = resolve_local_in(local, timezone, fold)?;
        Ok(RawSample::new(
            timestamp,
            power_value,
            self.interval_length.as_deref(),
        ))
    }
}

fn parse_local(date: &str) -> Result<NaiveDateTime> {
    let date = date.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
        .ok_or_else(|| HestiaError::data(format!("unreadable date: {:?}", date)))
}

/// Local wall-clock time to UTC. Ambiguous fall-back times take the earlier
/// instant; times skipped by spring-forward are rejected.
pub fn resolve_local(local: NaiveDateTime, timezone: Tz) -> Result<chrono::DateTime<Utc>> {
    resolve_local_in(local, timezone, Fold::Earliest)
}

pub fn resolve_local_in(
    local: NaiveDateTime,
    timezone: Tz,
    fold: Fold,
) -> Result<chrono::DateTime<Utc>> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, latest) => Ok(match fold {
            Fold::Earliest => earliest.with_timezone(&Utc),
            Fold::Latest => latest.with_timezone(&Utc),
        }),
        LocalResult::None => Err(HestiaError::data(format!(
            "{} does not exist in {}",
            local, timezone
        ))),
    }
}
