//! Tempo: day color (blue, white, red) crossed with hc/hp

use super::day::tariff_day;
use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod, calendar_gap};
use crate::calendar::{CalendarLookup, TempoColor};
use crate::error::Result;
use chrono::NaiveDateTime;

const CODE: &str = "TEMPO";

#[derive(Debug, Clone)]
pub struct TempoRules {
    offpeak: OffpeakSchedule,
    periods: Vec<TariffPeriod>,
}

impl TempoRules {
    pub fn new(offpeak: OffpeakSchedule) -> Self {
        Self {
            offpeak,
            periods: vec![
                TariffPeriod::new("blue_hc", "tempo_blue_hc"),
                TariffPeriod::new("blue_hp", "tempo_blue_hp"),
                TariffPeriod::new("white_hc", "tempo_white_hc"),
                TariffPeriod::new("white_hp", "tempo_white_hp"),
                TariffPeriod::new("red_hc", "tempo_red_hc"),
                TariffPeriod::new("red_hp", "tempo_red_hp"),
            ],
        }
    }
}

impl PeriodClassifier for TempoRules {
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
        let color = calendar
            .day(day)
            .and_then(|entry| entry.tempo_color)
            .ok_or_else(|| calendar_gap(CODE, day))?;
        let offpeak = self.offpeak.contains(local.time());
        Ok(match (color, offpeak) {
            (TempoColor::Blue, true) => "blue_hc",
            (TempoColor::Blue, false) => "blue_hp",
            (TempoColor::White, true) => "white_hc",
            (TempoColor::White, false) => "white_hp",
            (TempoColor::Red, true) => "red_hc",
            (TempoColor::Red, false) => "red_hp",
        })
    }
}
