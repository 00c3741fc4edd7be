//! # Hestia - electricity consumption to tariff cost
//!
//! Turns smart-meter load curves into an itemized electricity bill for a
//! chosen offer, and ranks offers against the same consumption.
//!
//! ## Pipeline
//!
//! 1. `sample`/`reading`: raw average-power readings become energy samples
//!    (`energy_wh = power_w × interval_minutes / 60`).
//! 2. `dedup`/`series`: overlapping fetches collapse into one ordered,
//!    timestamp-unique series.
//! 3. `tariff`: an offer's classifier assigns each sample to a period,
//!    consulting the injected `calendar` for Tempo, EJP and Zen Flex days.
//! 4. `aggregate`: per-period energy is priced and the subscription prorated.
//!
//! `calculator` runs the whole pipeline against a `registry` of offer types.
//!
//! ## Modules
//!
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing
//! - `error`: error types
//! - `quantity`: fixed-point energy and money types

pub mod aggregate;
pub mod calculator;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod quantity;
pub mod reading;
pub mod registry;
pub mod sample;
pub mod series;
pub mod tariff;

pub use aggregate::{CalculationResult, CostAggregator, DataQuality, PeriodDetail};
pub use calculator::{Calculator, OfferComparison, TariffDefinition};
pub use calendar::{CalendarDay, CalendarLookup, InMemoryCalendar, NoCalendar, TempoColor};
pub use error::{HestiaError, Result};
pub use registry::{CalculatorRegistry, ClassifierFactory};
pub use sample::{EnergySample, Normalizer, RawSample, SamplingInterval};
pub use series::{ConsumptionSeries, DateWindow};
pub use tariff::{OfferType, PeriodClassifier, PriceSet, TariffOptions};
