//! Winter / summer peak and off-peak offer with optional peak-day override

use super::day::tariff_day;
use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod, calendar_gap};
use crate::calendar::CalendarLookup;
use crate::error::{HestiaError, Result};
use chrono::{Datelike, NaiveDateTime};

const CODE: &str = "SEASONAL";
const HC_WINTER: &str = "hc_winter";
const HP_WINTER: &str = "hp_winter";
const HC_SUMMER: &str = "hc_summer";
const HP_SUMMER: &str = "hp_summer";
const PEAK_DAY: &str = "peak_day";

#[derive(Debug, Clone)]
pub struct SeasonalRules {
    offpeak: OffpeakSchedule,
    winter_months: Vec<u32>,
    peak_day_pricing: bool,
    periods: Vec<TariffPeriod>,
}

impl SeasonalRules {
    /// November through March
    pub const DEFAULT_WINTER_MONTHS: [u32; 5] = [11, 12, 1, 2, 3];

    pub fn new(
        offpeak: OffpeakSchedule,
        winter_months: Vec<u32>,
        peak_day_pricing: bool,
    ) -> Result<Self> {
        if let Some(bad) = winter_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(HestiaError::validation(
                "winter_months",
                format!("month {} is outside 1..=12", bad),
            ));
        }

        // The peak-day price is only required when the override is on
        let peak_day = if peak_day_pricing {
            TariffPeriod::new(PEAK_DAY, "peak_day_price")
        } else {
            TariffPeriod::optional(PEAK_DAY, "peak_day_price")
        };

        Ok(Self {
            offpeak,
            winter_months,
            peak_day_pricing,
            periods: vec![
                TariffPeriod::new(HC_WINTER, "hc_price_winter"),
                TariffPeriod::new(HP_WINTER, "hp_price_winter"),
                TariffPeriod::new(HC_SUMMER, "hc_price_summer"),
                TariffPeriod::new(HP_SUMMER, "hp_price_summer"),
                peak_day,
            ],
        })
    }

    fn is_winter(&self, local: NaiveDateTime) -> bool {
        self.winter_months.contains(&local.month())
    }
}

impl PeriodClassifier for SeasonalRules {
    fn offer_type_code(&self) -> &str {
        CODE
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn uses_calendar(&self) -> bool {
        self.peak_day_pricing
    }

    fn classify(&self, local: NaiveDateTime, calendar: &dyn CalendarLookup) -> Result<&str> {
        if self.peak_day_pricing {
            let day = tariff_day(local);
            let is_peak = calendar
                .day(day)
                .and_then(|entry| entry.is_peak_day)
                .ok_or_else(|| calendar_gap(CODE, day))?;
            if is_peak {
                return Ok(PEAK_DAY);
            }
        }

        let offpeak = self.offpeak.contains(local.time());
        Ok(match (self.is_winter(local), offpeak) {
            (true, true) => HC_WINTER,
            (true, false) => HP_WINTER,
            (false, true) => HC_SUMMER,
            (false, false) => HP_SUMMER,
        })
    }
}
