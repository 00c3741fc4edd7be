//! Single price on weekdays, another on Saturday and Sunday

use super::day::is_weekend;
use super::{PeriodClassifier, TariffPeriod};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

const BASE: &str = "base";
const BASE_WEEKEND: &str = "base_weekend";

#[derive(Debug, Clone)]
pub struct BaseWeekendRules {
    periods: Vec<TariffPeriod>,
}

impl BaseWeekendRules {
    pub fn new() -> Self {
        Self {
            periods: vec![
                TariffPeriod::new(BASE, "base_price"),
                TariffPeriod::new(BASE_WEEKEND, "base_price_weekend"),
            ],
        }
    }
}

impl Default for BaseWeekendRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodClassifier for BaseWeekendRules {
    fn offer_type_code(&self) -> &str {
        "BASE_WEEKEND"
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn classify(&self, local: NaiveDateTime, _calendar: &dyn CalendarLookup) -> Result<&str> {
        if is_weekend(local.date()) {
            Ok(BASE_WEEKEND)
        } else {
            Ok(BASE)
        }
    }
}
