//! Night off-peak on weekdays, off-peak all weekend
//!
//! Shared by `HC_NUIT_WEEKEND` and `WEEKEND`, which bill the same way.

use super::day::is_weekend;
use super::hc_hp::{HC, HP, hc_hp_periods};
use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct WeekendRules {
    code: &'static str,
    night: OffpeakSchedule,
    periods: Vec<TariffPeriod>,
}

impl WeekendRules {
    pub fn new(code: &'static str, night: OffpeakSchedule) -> Self {
        Self {
            code,
            night,
            periods: hc_hp_periods(),
        }
    }
}

impl PeriodClassifier for WeekendRules {
    fn offer_type_code(&self) -> &str {
        self.code
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn classify(&self, local: NaiveDateTime, _calendar: &dyn CalendarLookup) -> Result<&str> {
        if is_weekend(local.date()) || self.night.contains(local.time()) {
            Ok(HC)
        } else {
            Ok(HP)
        }
    }
}
