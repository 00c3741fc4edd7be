//! Tariff period classification
//!
//! Each offer type assigns every energy sample to exactly one named period
//! ("hc", "tempo red hp", ...). The built-in offer types are a closed
//! [`OfferType`] enum so building one is an exhaustive `match`; third-party
//! rule sets plug in through [`PeriodClassifier`] and the
//! [`registry`](crate::registry).
//!
//! ## Submodules
//!
//! - `day`: weekday numbering and the 06:00 tariff-day boundary
//! - `window`: off-peak clock windows
//! - `prices`: price sets
//! - one module per offer type

mod base;
mod base_weekend;
pub mod day;
mod ejp;
mod hc_hp;
mod hc_weekend;
mod prices;
mod seasonal;
mod tempo;
mod weekend;
pub mod window;
mod zen_flex;

pub use base::BaseRules;
pub use base_weekend::BaseWeekendRules;
pub use ejp::EjpRules;
pub use hc_hp::HcHpRules;
pub use hc_weekend::HcWeekendRules;
pub use prices::PriceSet;
pub use seasonal::SeasonalRules;
pub use tempo::TempoRules;
pub use weekend::WeekendRules;
pub use window::{OffpeakSchedule, OffpeakWindow};
pub use zen_flex::ZenFlexRules;

use crate::calendar::CalendarLookup;
use crate::error::{HestiaError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One billable period of an offer and the price field that prices it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffPeriod {
    pub name: String,
    pub price_field: String,
    /// Only priced when the offer is configured to use it
    #[serde(default)]
    pub optional: bool,
}

impl TariffPeriod {
    pub fn new(name: &str, price_field: &str) -> Self {
        Self {
            name: name.to_string(),
            price_field: price_field.to_string(),
            optional: false,
        }
    }

    pub fn optional(name: &str, price_field: &str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, price_field)
        }
    }
}

/// Rule set assigning samples to tariff periods
pub trait PeriodClassifier: Send + Sync + fmt::Debug {
    /// Stable offer type code, e.g. `HC_HP`
    fn offer_type_code(&self) -> &str;

    /// Periods in display order
    fn periods(&self) -> &[TariffPeriod];

    /// Whether classification consults the calendar provider
    fn uses_calendar(&self) -> bool {
        false
    }

    /// Period name for a sample taken at local wall-clock time `local`
    fn classify(&self, local: NaiveDateTime, calendar: &dyn CalendarLookup) -> Result<&str>;

    /// Price fields a [`PriceSet`] must carry for this offer
    fn required_price_fields(&self) -> BTreeSet<String> {
        self.periods()
            .iter()
            .filter(|p| !p.optional)
            .map(|p| p.price_field.clone())
            .collect()
    }

    fn optional_price_fields(&self) -> BTreeSet<String> {
        self.periods()
            .iter()
            .filter(|p| p.optional)
            .map(|p| p.price_field.clone())
            .collect()
    }

    fn period(&self, name: &str) -> Option<&TariffPeriod> {
        self.periods().iter().find(|p| p.name == name)
    }

    /// Metadata for forms, validation and admin tooling
    fn info(&self) -> OfferTypeInfo {
        OfferTypeInfo {
            code: self.offer_type_code().to_string(),
            periods: self.periods().to_vec(),
            required_price_fields: self.required_price_fields(),
            optional_price_fields: self.optional_price_fields(),
            uses_calendar: self.uses_calendar(),
        }
    }
}

/// Discoverable description of an offer type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTypeInfo {
    pub code: String,
    pub periods: Vec<TariffPeriod>,
    pub required_price_fields: BTreeSet<String>,
    pub optional_price_fields: BTreeSet<String>,
    pub uses_calendar: bool,
}

/// Per-contract parameters of an offer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TariffOptions {
    /// Off-peak schedule; each offer falls back to its usual window
    pub offpeak: Option<OffpeakSchedule>,

    /// Months (1-12) billed at winter prices by `SEASONAL`
    pub winter_months: Option<Vec<u32>>,

    /// Apply the `peak_day_price` override on calendar peak days (`SEASONAL`)
    pub peak_day_pricing: bool,
}

impl TariffOptions {
    pub fn with_offpeak(mut self, offpeak: OffpeakSchedule) -> Self {
        self.offpeak = Some(offpeak);
        self
    }

    pub fn with_winter_months(mut self, months: Vec<u32>) -> Self {
        self.winter_months = Some(months);
        self
    }

    pub fn with_peak_day_pricing(mut self, enabled: bool) -> Self {
        self.peak_day_pricing = enabled;
        self
    }

    fn offpeak_or(&self, default: OffpeakSchedule) -> OffpeakSchedule {
        self.offpeak.clone().unwrap_or(default)
    }
}

/// Built-in offer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    Base,
    BaseWeekend,
    HcHp,
    HcNuitWeekend,
    Weekend,
    HcWeekend,
    Seasonal,
    ZenFlex,
    Tempo,
    Ejp,
}

impl OfferType {
    pub const ALL: [OfferType; 10] = [
        OfferType::Base,
        OfferType::BaseWeekend,
        OfferType::HcHp,
        OfferType::HcNuitWeekend,
        OfferType::Weekend,
        OfferType::HcWeekend,
        OfferType::Seasonal,
        OfferType::ZenFlex,
        OfferType::Tempo,
        OfferType::Ejp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            OfferType::Base => "BASE",
            OfferType::BaseWeekend => "BASE_WEEKEND",
            OfferType::HcHp => "HC_HP",
            OfferType::HcNuitWeekend => "HC_NUIT_WEEKEND",
            OfferType::Weekend => "WEEKEND",
            OfferType::HcWeekend => "HC_WEEKEND",
            OfferType::Seasonal => "SEASONAL",
            OfferType::ZenFlex => "ZEN_FLEX",
            OfferType::Tempo => "TEMPO",
            OfferType::Ejp => "EJP",
        }
    }

    /// Build the classifier for this offer with contract `options`.
    ///
    /// TEMPO and ZEN_FLEX keep their fixed 22:00-06:00 window whatever the
    /// contract schedule says.
    pub fn build(&self, options: &TariffOptions) -> Result<Box<dyn PeriodClassifier>> {
        let evening = OffpeakSchedule::single(OffpeakWindow::from_hm(22, 0, 6, 0)?);
        let classifier: Box<dyn PeriodClassifier> = match self {
            OfferType::Base => Box::new(BaseRules::new()),
            OfferType::BaseWeekend => Box::new(BaseWeekendRules::new()),
            OfferType::HcHp => Box::new(HcHpRules::new(options.offpeak_or(evening))),
            OfferType::HcNuitWeekend | OfferType::Weekend => {
                let night = OffpeakSchedule::single(OffpeakWindow::from_hm(23, 0, 6, 0)?);
                Box::new(WeekendRules::new(self.code(), options.offpeak_or(night)))
            }
            OfferType::HcWeekend => Box::new(HcWeekendRules::new(options.offpeak_or(evening))),
            OfferType::Seasonal => Box::new(SeasonalRules::new(
                options.offpeak_or(evening),
                options
                    .winter_months
                    .clone()
                    .unwrap_or_else(|| SeasonalRules::DEFAULT_WINTER_MONTHS.to_vec()),
                options.peak_day_pricing,
            )?),
            OfferType::ZenFlex => Box::new(ZenFlexRules::new(evening)),
            OfferType::Tempo => Box::new(TempoRules::new(evening)),
            OfferType::Ejp => Box::new(EjpRules::new()),
        };
        Ok(classifier)
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OfferType {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        let code = normalize_code(s);
        OfferType::ALL
            .into_iter()
            .find(|offer| offer.code() == code)
            .ok_or_else(|| HestiaError::unknown_offer_type(s.trim()))
    }
}

/// Canonical form of an offer type code: trimmed, uppercase
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Calendar-unavailable error for a single day
pub(crate) fn calendar_gap(offer_type: &str, date: chrono::NaiveDate) -> HestiaError {
    HestiaError::calendar_unavailable(offer_type, vec![date])
}
