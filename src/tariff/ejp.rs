//! EJP: normal days and peak-day removal days

use super::day::tariff_day;
use super::{PeriodClassifier, TariffPeriod, calendar_gap};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

const CODE: &str = "EJP";

#[derive(Debug, Clone)]
pub struct EjpRules {
    periods: Vec<TariffPeriod>,
}

impl EjpRules {
    pub fn new() -> Self {
        Self {
            periods: vec![
                TariffPeriod::new("normal", "ejp_normal"),
                TariffPeriod::new("peak", "ejp_peak"),
            ],
        }
    }
}

impl Default for EjpRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodClassifier for EjpRules {
    fn offer_type_code(&self) -> &str {
        CODE
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn uses_calendar(&self) -> bool {
        true
    }

    fn classify(&self, local: NaiveDateTime, calendar: &dyn CalendarLookup) -> Result<&str> {
        let day = tariff_day(local);
        let peak = calendar
            .day(day)
            .and_then(|entry| entry.is_peak_day)
            .ok_or_else(|| calendar_gap(CODE, day))?;
        Ok(if peak { "peak" } else { "normal" })
    }
}
