//! Zen Flex: eco days and a handful of sobriety days, each with hc/hp

use super::day::tariff_day;
use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod, calendar_gap};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

const CODE: &str = "ZEN_FLEX";

#[derive(Debug, Clone)]
pub struct ZenFlexRules {
    offpeak: OffpeakSchedule,
    periods: Vec<TariffPeriod>,
}

impl ZenFlexRules {
    pub fn new(offpeak: OffpeakSchedule) -> Self {
        Self {
            offpeak,
            periods: vec![
                TariffPeriod::new("eco_hc", "zen_flex_eco_hc"),
                TariffPeriod::new("eco_hp", "zen_flex_eco_hp"),
                TariffPeriod::new("sobriete_hc", "zen_flex_sobriete_hc"),
                TariffPeriod::new("sobriete_hp", "zen_flex_sobriete_hp"),
            ],
        }
    }
}

impl PeriodClassifier for ZenFlexRules {
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
        let sobriety = calendar
            .day(day)
            .and_then(|entry| entry.is_peak_day)
            .ok_or_else(|| calendar_gap(CODE, day))?;
        let offpeak = self.offpeak.contains(local.time());
        Ok(match (sobriety, offpeak) {
            (true, true) => "sobriete_hc",
            (true, false) => "sobriete_hp",
            (false, true) => "eco_hc",
            (false, false) => "eco_hp",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarDay, InMemoryCalendar, NoCalendar};
    use crate::error::HestiaError;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_sobriety_and_eco_days() {
        let rules = ZenFlexRules::new("22:00-06:00".parse().unwrap());
        let calendar: InMemoryCalendar = [
            CalendarDay::peak(date(1), true),
            CalendarDay::peak(date(2), false),
        ]
        .into_iter()
        .collect();
        let at = |d: u32, h: u32| date(d).and_hms_opt(h, 0, 0).unwrap();
        assert_eq!(rules.classify(at(1, 9), &calendar).unwrap(), "sobriete_hp");
        assert_eq!(rules.classify(at(1, 23), &calendar).unwrap(), "sobriete_hc");
        assert_eq!(rules.classify(at(2, 3), &calendar).unwrap(), "sobriete_hc");
        assert_eq!(rules.classify(at(2, 9), &calendar).unwrap(), "eco_hp");
        assert_eq!(rules.classify(at(2, 22), &calendar).unwrap(), "eco_hc");
    }

    #[test]
    fn test_missing_day_is_reported() {
        let rules = ZenFlexRules::new("22:00-06:00".parse().unwrap());
        let local = date(5).and_hms_opt(10, 0, 0).unwrap();
        match rules.classify(local, &NoCalendar) {
            Err(HestiaError::CalendarUnavailable { offer_type, dates }) => {
                assert_eq!(offer_type, "ZEN_FLEX");
                assert_eq!(dates, vec![date(5)]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
