//! Single-price offer

use super::{PeriodClassifier, TariffPeriod};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

const BASE: &str = "base";

/// Every sample is billed at `base_price`
#[derive(Debug, Clone)]
pub struct BaseRules {
    periods: Vec<TariffPeriod>,
}

impl BaseRules {
    pub fn new() -> Self {
        Self {
            periods: vec![TariffPeriod::new(BASE, "base_price")],
        }
    }
}

impl Default for BaseRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodClassifier for BaseRules {
    fn offer_type_code(&self) -> &str {
        "BASE"
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn classify(&self, _local: NaiveDateTime, _calendar: &dyn CalendarLookup) -> Result<&str> {
        Ok(BASE)
    }
}
