//! Sample normalization
//!
//! Meters report the *average power* over a sampling interval, not the energy
//! consumed during it. [`Normalizer`] turns each [`RawSample`] into an
//! [`EnergySample`] by dividing the power by the number of intervals per hour.
//! The interval is read from every sample because a single series can mix
//! 10, 15, 30 and 60 minute steps across contract changes.

use crate::error::{HestiaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::quantity::WattHours;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_HOUR: i64 = 60;

/// Default interval assumed when the provider omits interval metadata
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

/// Duration over which a single power reading is averaged by the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SamplingInterval(u32);

impl SamplingInterval {
    /// Build an interval from a minute count, rejecting zero and negative values
    pub fn from_minutes(minutes: i64) -> Result<Self> {
        if minutes <= 0 {
            return Err(HestiaError::data(format!(
                "sampling interval must be positive, got {} minute(s)",
                minutes
            )));
        }
        u32::try_from(minutes)
            .map(Self)
            .map_err(|_| HestiaError::data(format!("sampling interval too large: {}", minutes)))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL_MINUTES)
    }
}

impl fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PT{}M", self.0)
    }
}

/// Parses `PT30M`, `PT1H`, `PT1H30M`, `PT900S` or a bare minute count (`30`).
impl FromStr for SamplingInterval {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        let descriptor = s.trim();
        if let Ok(minutes) = descriptor.parse::<i64>() {
            return Self::from_minutes(minutes);
        }

        let upper = descriptor.to_ascii_uppercase();
        let Some(body) = upper.strip_prefix("PT") else {
            return Err(HestiaError::data(format!(
                "unrecognised sampling interval: {:?}",
                s
            )));
        };

        let mut seconds: i64 = 0;
        let mut number = String::new();
        for c in body.chars() {
            if c.is_ascii_digit() || c == '-' {
                number.push(c);
                continue;
            }
            let value: i64 = number
                .parse()
                .map_err(|_| HestiaError::data(format!("malformed sampling interval: {:?}", s)))?;
            number.clear();
            let unit = match c {
                'H' => 3600,
                'M' => 60,
                'S' => 1,
                _ => {
                    return Err(HestiaError::data(format!(
                        "unsupported unit {:?} in sampling interval {:?}",
                        c, s
                    )));
                }
            };
            seconds = value
                .checked_mul(unit)
                .and_then(|v| seconds.checked_add(v))
                .ok_or_else(|| HestiaError::data(format!("sampling interval overflow: {:?}", s)))?;
        }
        if !number.is_empty() || body.is_empty() {
            return Err(HestiaError::data(format!(
                "malformed sampling interval: {:?}",
                s
            )));
        }
        if seconds % 60 != 0 {
            return Err(HestiaError::data(format!(
                "sampling interval is not a whole number of minutes: {:?}",
                s
            )));
        }
        Self::from_minutes(seconds / 60)
    }
}

/// Instantaneous power reading as delivered by the metering provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Instant the reading refers to
    pub timestamp: DateTime<Utc>,

    /// Average power over the interval, in watts
    pub power_value: f64,

    /// Interval descriptor as sent by the provider (`PT30M`), if any
    #[serde(default, alias = "interval_length")]
    pub interval: Option<String>,
}

impl RawSample {
    pub fn new(timestamp: DateTime<Utc>, power_value: f64, interval: Option<&str>) -> Self {
        Self {
            timestamp,
            power_value,
            interval: interval.map(str::to_string),
        }
    }

    /// Convenience constructor with the interval given in minutes
    pub fn with_minutes(timestamp: DateTime<Utc>, power_value: f64, minutes: i64) -> Self {
        Self {
            timestamp,
            power_value,
            interval: Some(minutes.to_string()),
        }
    }
}

/// Energy consumed during one sampling interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySample {
    pub timestamp: DateTime<Utc>,
    pub energy: WattHours,
}

impl EnergySample {
    pub const fn new(timestamp: DateTime<Utc>, energy: WattHours) -> Self {
        Self { timestamp, energy }
    }
}

/// Outcome of normalizing a batch of raw samples
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Successfully converted samples, in input order
    pub samples: Vec<EnergySample>,

    /// Number of samples rejected with a data error
    pub rejected: usize,

    /// Number of samples whose interval fell back to the default
    pub defaulted_intervals: usize,
}

/// Converts raw power readings into energy samples
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_interval: SamplingInterval,
    logger: StructuredLogger,
}

impl Normalizer {
    /// Create a normalizer with a fallback interval for samples lacking metadata
    pub fn new(default_interval: SamplingInterval) -> Self {
        Self {
            default_interval,
            logger: get_logger("normalizer"),
        }
    }

    /// Convert one raw sample. A missing interval uses the default and logs a warning.
    pub fn normalize(&self, raw: &RawSample) -> Result<EnergySample> {
        let (sample, defaulted) = self.convert(raw)?;
        if defaulted {
            self.logger.warn(&format!(
                "Sample at {} has no interval metadata, assuming {}",
                raw.timestamp, self.default_interval
            ));
        }
        Ok(sample)
    }

    /// Convert a batch, skipping and counting invalid samples
    pub fn normalize_batch<'a, I>(&self, raws: I) -> NormalizedBatch
    where
        I: IntoIterator<Item = &'a RawSample>,
    {
        let mut batch = NormalizedBatch::default();
        for raw in raws {
            match self.convert(raw) {
                Ok((sample, defaulted)) => {
                    if defaulted {
                        batch.defaulted_intervals += 1;
                    }
                    batch.samples.push(sample);
                }
                Err(e) => {
                    self.logger
                        .debug(&format!("Rejected sample at {}: {}", raw.timestamp, e));
                    batch.rejected += 1;
                }
            }
        }

        if batch.defaulted_intervals > 0 {
            self.logger.warn(&format!(
                "{} sample(s) without interval metadata, assumed {}",
                batch.defaulted_intervals, self.default_interval
            ));
        }
        if batch.rejected > 0 {
            self.logger
                .warn(&format!("Rejected {} invalid sample(s)", batch.rejected));
        }
        batch
    }

    fn convert(&self, raw: &RawSample) -> Result<(EnergySample, bool)> {
        let (interval, defaulted) = match raw.interval.as_deref() {
            Some(descriptor) if !descriptor.trim().is_empty() => (descriptor.parse()?, false),
            _ => (self.default_interval, true),
        };
        let energy = energy_from_power(raw.power_value, interval)?;
        Ok((EnergySample::new(raw.timestamp, energy), defaulted))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(SamplingInterval::default())
    }
}

/// `energy_wh = power_w / (60 / interval_minutes)`
pub fn energy_from_power(power_w: f64, interval: SamplingInterval) -> Result<WattHours> {
    if !power_w.is_finite() {
        return Err(HestiaError::data(format!(
            "power value is not finite: {}",
            power_w
        )));
    }
    let power = Decimal::from_f64(power_w)
        .ok_or_else(|| HestiaError::data(format!("power value out of range: {}", power_w)))?;
    let energy = power
        .checked_mul(Decimal::from(interval.minutes()))
        .and_then(|p| p.checked_div(Decimal::from(MINUTES_PER_HOUR)))
        .ok_or_else(|| {
            HestiaError::data(format!(
                "energy of {} W over {} min out of range",
                power_w,
                interval.minutes()
            ))
        })?;
    Ok(WattHours(energy))
}
