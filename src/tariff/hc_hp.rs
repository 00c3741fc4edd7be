//! Peak / off-peak offer

use super::window::OffpeakSchedule;
use super::{PeriodClassifier, TariffPeriod};
use crate::calendar::CalendarLookup;
use crate::error::Result;
use chrono::NaiveDateTime;

pub(super) const HC: &str = "hc";
pub(super) const HP: &str = "hp";

/// Samples inside the off-peak schedule are "hc", all others "hp"
#[derive(Debug, Clone)]
pub struct HcHpRules {
    offpeak: OffpeakSchedule,
    periods: Vec<TariffPeriod>,
}

impl HcHpRules {
    pub fn new(offpeak: OffpeakSchedule) -> Self {
        Self {
            offpeak,
            periods: hc_hp_periods(),
        }
    }

    pub fn offpeak(&self) -> &OffpeakSchedule {
        &self.offpeak
    }
}

pub(super) fn hc_hp_periods() -> Vec<TariffPeriod> {
    vec![
        TariffPeriod::new(HC, "hc_price"),
        TariffPeriod::new(HP, "hp_price"),
    ]
}

impl PeriodClassifier for HcHpRules {
    fn offer_type_code(&self) -> &str {
        "HC_HP"
    }

    fn periods(&self) -> &[TariffPeriod] {
        &self.periods
    }

    fn classify(&self, local: NaiveDateTime, _calendar: &dyn CalendarLookup) -> Result<&str> {
        if self.offpeak.contains(local.time()) {
            Ok(HC)
        } else {
            Ok(HP)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NoCalendar;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_boundaries_of_default_window() {
        let rules = HcHpRules::new("22:00-06:00".parse().unwrap());
        assert_eq!(rules.classify(at(22, 0), &NoCalendar).unwrap(), "hc");
        assert_eq!(rules.classify(at(6, 0), &NoCalendar).unwrap(), "hp");
        assert_eq!(rules.classify(at(5, 30), &NoCalendar).unwrap(), "hc");
        assert_eq!(rules.classify(at(21, 30), &NoCalendar).unwrap(), "hp");
    }

    #[test]
    fn test_split_contract_window() {
        let rules = HcHpRules::new("HC (1H30-7H30;12H30-14H30)".parse().unwrap());
        assert_eq!(rules.classify(at(13, 0), &NoCalendar).unwrap(), "hc");
        assert_eq!(rules.classify(at(1, 0), &NoCalendar).unwrap(), "hp");
        assert_eq!(rules.classify(at(7, 0), &NoCalendar).unwrap(), "hc");
        assert_eq!(rules.offpeak().windows().len(), 2);
    }
}
