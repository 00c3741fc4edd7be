//! Calculation entry point
//!
//! [`Calculator`] ties the pipeline together:
//!
//! 1. look the offer type up in the registry,
//! 2. check the price set carries every required field,
//! 3. classify each sample at its local wall-clock time,
//! 4. aggregate per period and add the prorated subscription.
//!
//! Steps 1 and 2 abort before any sample is touched, also on the raw-sample
//! path. Samples whose local date lies outside the series window are dropped
//! and counted, since the subscription only covers the window's days.
//! Calendar gaps found in step 3 are gathered over the whole series and
//! reported in a single [`HestiaError::CalendarUnavailable`].
//!
//! A calculator holds no mutable state and can be shared between threads.

use crate::aggregate::{CalculationResult, CostAggregator, DataQuality};
use crate::calendar::CalendarLookup;
use crate::config::{CalculationConfig, TariffConfig};
use crate::dedup::Deduplicator;
use crate::error::{HestiaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::quantity::WattHours;
use crate::registry::CalculatorRegistry;
use crate::sample::{Normalizer, RawSample, SamplingInterval};
use crate::series::{ConsumptionSeries, DateWindow};
use crate::tariff::{OfferTypeInfo, PeriodClassifier, PriceSet, TariffOptions};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Time zone of the French metering provider
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// A named, priced offer to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffDefinition {
    pub name: String,
    pub offer_type: String,
    pub options: TariffOptions,
    pub prices: PriceSet,
}

impl TariffDefinition {
    pub fn new(name: &str, offer_type: &str, prices: PriceSet) -> Self {
        Self {
            name: name.to_string(),
            offer_type: offer_type.to_string(),
            options: TariffOptions::default(),
            prices,
        }
    }

    pub fn with_options(mut self, options: TariffOptions) -> Self {
        self.options = options;
        self
    }
}

impl TryFrom<&TariffConfig> for TariffDefinition {
    type Error = HestiaError;

    fn try_from(config: &TariffConfig) -> Result<Self> {
        Ok(Self {
            name: config.name.clone(),
            offer_type: config.offer_type.clone(),
            options: config.options()?,
            prices: config.price_set(),
        })
    }
}

/// Outcome of one offer in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferComparison {
    pub name: String,
    pub offer_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OfferComparison {
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// Deduplicated series together with the quality signals gathered building it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSeries {
    pub series: ConsumptionSeries,
    pub data_quality: DataQuality,
}

/// Consumption-to-cost calculator
#[derive(Debug, Clone)]
pub struct Calculator {
    registry: CalculatorRegistry,
    timezone: Tz,
    normalizer: Normalizer,
    deduplicator: Deduplicator,
    aggregator: CostAggregator,
    logger: StructuredLogger,
}

impl Calculator {
    pub fn new(
        registry: CalculatorRegistry,
        timezone: Tz,
        average_days_per_month: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            registry,
            timezone,
            normalizer: Normalizer::default(),
            deduplicator: Deduplicator::new(),
            aggregator: CostAggregator::new(average_days_per_month)?,
            logger: get_logger("calculator"),
        })
    }

    /// Calculator over the built-in offers with the configured time zone,
    /// default interval and month length
    pub fn from_config(config: &CalculationConfig) -> Result<Self> {
        let timezone = config.timezone()?;
        let interval = SamplingInterval::from_minutes(i64::from(config.default_interval_minutes))?;
        Ok(Self::new(
            CalculatorRegistry::with_builtins(),
            timezone,
            config.average_days_per_month,
        )?
        .with_default_interval(interval))
    }

    /// Interval assumed for raw samples without interval metadata
    pub fn with_default_interval(mut self, interval: SamplingInterval) -> Self {
        self.normalizer = Normalizer::new(interval);
        self
    }

    pub fn registry(&self) -> &CalculatorRegistry {
        &self.registry
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Check that `offer_type` is registered and `prices` carries every
    /// field it requires, without touching any sample
    pub fn check_offer(
        &self,
        offer_type: &str,
        options: &TariffOptions,
        prices: &PriceSet,
    ) -> Result<OfferTypeInfo> {
        Ok(self.resolve(offer_type, options, prices)?.info())
    }

    fn resolve(
        &self,
        offer_type: &str,
        options: &TariffOptions,
        prices: &PriceSet,
    ) -> Result<Box<dyn PeriodClassifier>> {
        let classifier = self.registry.get(offer_type, options)?;
        let code = classifier.offer_type_code();
        for field in classifier.required_price_fields() {
            prices.require(code, &field)?;
        }
        Ok(classifier)
    }

    /// Price `series` under `offer_type`
    pub fn calculate(
        &self,
        series: &ConsumptionSeries,
        offer_type: &str,
        options: &TariffOptions,
        prices: &PriceSet,
        calendar: &dyn CalendarLookup,
    ) -> Result<CalculationResult> {
        let classifier = self.resolve(offer_type, options, prices)?;
        self.price_series(classifier.as_ref(), series, prices, calendar)
    }

    fn price_series(
        &self,
        classifier: &dyn PeriodClassifier,
        series: &ConsumptionSeries,
        prices: &PriceSet,
        calendar: &dyn CalendarLookup,
    ) -> Result<CalculationResult> {
        let code = classifier.offer_type_code();
        let logger = self.logger.for_offer_type(code);
        let window = series.window();

        let mut classified: Vec<(&str, WattHours)> = Vec::with_capacity(series.len());
        let mut missing_days = BTreeSet::new();
        let mut out_of_window = 0;
        for sample in series {
            let local = sample.timestamp.with_timezone(&self.timezone).naive_local();
            if !window.contains(local.date()) {
                out_of_window += 1;
                continue;
            }
            match classifier.classify(local, calendar) {
                Ok(period) => classified.push((period, sample.energy)),
                Err(HestiaError::CalendarUnavailable { dates, .. }) => missing_days.extend(dates),
                Err(e) => return Err(e),
            }
        }

        if !missing_days.is_empty() {
            logger.warn(&format!(
                "Calendar has no entry for {} day(s) in the series",
                missing_days.len()
            ));
            return Err(HestiaError::calendar_unavailable(
                code,
                missing_days.into_iter().collect(),
            ));
        }

        if out_of_window > 0 {
            logger.warn(&format!(
                "Ignored {} sample(s) outside {} to {}",
                out_of_window, window.start_date, window.end_date
            ));
        }

        let mut result =
            self.aggregator
                .aggregate(classifier, classified, prices, series.days_in_window())?;
        result.data_quality.out_of_window_samples = out_of_window;

        logger.info(&format!(
            "Calculated {} samples over {} day(s): {} / {} with subscription",
            series.len() - out_of_window,
            result.days,
            result.total_kwh,
            result.total_with_subscription
        ));
        Ok(result)
    }

    /// Normalize and deduplicate raw samples into a series over `window`.
    ///
    /// Samples whose local date falls outside `window` are dropped and
    /// counted.
    pub fn prepare(&self, raws: &[RawSample], window: DateWindow) -> Result<PreparedSeries> {
        let window = DateWindow::new(window.start_date, window.end_date)?;
        let batch = self.normalizer.normalize_batch(raws);
        let (inside, outside): (Vec<_>, Vec<_>) = batch.samples.into_iter().partition(|s| {
            window.contains(s.timestamp.with_timezone(&self.timezone).date_naive())
        });
        if !outside.is_empty() {
            self.logger.warn(&format!(
                "Dropped {} sample(s) outside {} to {}",
                outside.len(),
                window.start_date,
                window.end_date
            ));
        }

        let outcome = self.deduplicator.deduplicate(inside, window)?;
        Ok(PreparedSeries {
            series: outcome.series,
            data_quality: DataQuality {
                rejected_samples: batch.rejected,
                defaulted_intervals: batch.defaulted_intervals,
                duplicate_timestamps: outcome.collisions,
                conflicting_duplicates: outcome.conflicting,
                out_of_window_samples: outside.len(),
            },
        })
    }

    /// Full pipeline from raw power readings. The offer and its prices are
    /// checked before any sample is normalized.
    pub fn calculate_raw(
        &self,
        raws: &[RawSample],
        window: DateWindow,
        offer_type: &str,
        options: &TariffOptions,
        prices: &PriceSet,
        calendar: &dyn CalendarLookup,
    ) -> Result<CalculationResult> {
        let classifier = self.resolve(offer_type, options, prices)?;
        let prepared = self.prepare(raws, window)?;
        let mut result =
            self.price_series(classifier.as_ref(), &prepared.series, prices, calendar)?;
        result.data_quality = prepared.data_quality;
        Ok(result)
    }

    /// Price the same series under several offers, cheapest first.
    ///
    /// Offers that fail are kept with their error message, after every
    /// successful one and in input order.
    pub fn compare(
        &self,
        series: &ConsumptionSeries,
        tariffs: &[TariffDefinition],
        calendar: &dyn CalendarLookup,
    ) -> Vec<OfferComparison> {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for tariff in tariffs {
            match self.calculate(
                series,
                &tariff.offer_type,
                &tariff.options,
                &tariff.prices,
                calendar,
            ) {
                Ok(result) => succeeded.push(OfferComparison {
                    name: tariff.name.clone(),
                    offer_type: result.offer_type.clone(),
                    result: Some(result),
                    error: None,
                }),
                Err(e) => {
                    self.logger
                        .warn(&format!("Offer {} could not be priced: {}", tariff.name, e));
                    failed.push(OfferComparison {
                        name: tariff.name.clone(),
                        offer_type: tariff.offer_type.clone(),
                        result: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        succeeded.sort_by_key(|c| c.result.as_ref().map(|r| r.total_with_subscription));
        succeeded.extend(failed);
        succeeded
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            registry: CalculatorRegistry::with_builtins(),
            timezone: DEFAULT_TIMEZONE,
            normalizer: Normalizer::default(),
            deduplicator: Deduplicator::new(),
            aggregator: CostAggregator::default(),
            logger: get_logger("calculator"),
        }
    }
}
