//! Contract off-peak window on weekdays, off-peak all weekend

use super::day::is_weekend;
use super::hc_hp::{HC, HP, hc_hp_periods};
use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct HcWeekendRules {
    offpeak: OffpeakSchedule,
    periods: Vec<TariffPeriod>,
}

impl HcWeekendRules {
    pub fn new(offpeak: OffpeakSchedule) -> Self {
        Self {
            offpeak,
            periods: hc_hp_periods(),
        }
    }
}

impl PeriodClassifier for HcWeekendRules {
    fn offer_type_code(&self) -> &str {
        "HC_WEEKEND"
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn classify(&self, local: NaiveDateTime, _calendar: &dyn CalendarLookup) -> Result<&str> {
        if is_weekend(local.date()) || self.offpeak.contains(local.time()) {
            Ok(HC)
        } else {
            Ok(HP)
        }
    }
}
