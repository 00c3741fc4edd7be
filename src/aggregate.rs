//! Cost aggregation
//!
//! Sums classified energy per period, prices each period, prorates the
//! monthly subscription over the window and assembles a
//! [`CalculationResult`]. Everything stays at full [`Decimal`] precision until
//! [`CalculationResult::rounded`] is called for display.

use crate::error::{HestiaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::quantity::{Euros, EurosPerKilowattHour, KilowattHours, WattHours};
use crate::tariff::{PeriodClassifier, PriceSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Average month length used to prorate subscriptions (365.25 / 12)
pub const DEFAULT_AVERAGE_DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

/// Consumption and cost of one tariff period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDetail {
    pub name: String,
    pub consumption_kwh: KilowattHours,
    pub unit_price: EurosPerKilowattHour,
    pub cost_euros: Euros,
    pub percentage_of_total: Decimal,
}

/// Input-side quality signals collected on the way to a result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Raw samples skipped as malformed
    pub rejected_samples: usize,
    /// Samples whose interval fell back to the default
    pub defaulted_intervals: usize,
    /// Duplicate timestamps dropped
    pub duplicate_timestamps: usize,
    /// Dropped duplicates whose value differed from the kept one
    pub conflicting_duplicates: usize,
    /// Samples dated outside the billed window
    #[serde(default)]
    pub out_of_window_samples: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub offer_type: String,
    pub total_kwh: KilowattHours,
    pub total_cost_euros: Euros,
    pub subscription_cost_euros: Euros,
    pub total_with_subscription: Euros,
    /// Days billed, both window ends included
    pub days: i64,
    pub periods: Vec<PeriodDetail>,
    #[serde(default)]
    pub data_quality: DataQuality,
}

impl CalculationResult {
    /// Copy rounded for display: money to cents, energy to Wh, shares to 2 dp.
    ///
    /// The rounded totals are rounded independently and may no longer add up
    /// to the cent.
    pub fn rounded(&self) -> Self {
        Self {
            offer_type: self.offer_type.clone(),
            total_kwh: self.total_kwh.round_dp(3),
            total_cost_euros: self.total_cost_euros.round_to_cents(),
            subscription_cost_euros: self.subscription_cost_euros.round_to_cents(),
            total_with_subscription: self.total_with_subscription.round_to_cents(),
            days: self.days,
            periods: self
                .periods
                .iter()
                .map(|p| PeriodDetail {
                    name: p.name.clone(),
                    consumption_kwh: p.consumption_kwh.round_dp(3),
                    unit_price: p.unit_price,
                    cost_euros: p.cost_euros.round_to_cents(),
                    percentage_of_total: p.percentage_of_total.round_dp(2),
                })
                .collect(),
            data_quality: self.data_quality,
        }
    }

    pub fn period(&self, name: &str) -> Option<&PeriodDetail> {
        self.periods.iter().find(|p| p.name == name)
    }
}

/// Turns classified energy into a priced [`CalculationResult`]
#[derive(Debug, Clone)]
pub struct CostAggregator {
    average_days_per_month: Decimal,
    logger: StructuredLogger,
}

impl CostAggregator {
    pub fn new(average_days_per_month: Decimal) -> Result<Self> {
        if average_days_per_month <= Decimal::ZERO {
            return Err(HestiaError::validation(
                "average_days_per_month",
                "must be positive",
            ));
        }
        Ok(Self {
            average_days_per_month,
            logger: get_logger("aggregate"),
        })
    }

    /// Subscription share for `days` days
    pub fn prorate_subscription(&self, monthly: Euros, days: i64) -> Result<Euros> {
        monthly
            .0
            .checked_div(self.average_days_per_month)
            .and_then(|daily| daily.checked_mul(Decimal::from(days)))
            .map(Euros)
            .ok_or_else(|| overflow("subscription_monthly", monthly))
    }

    /// Price `classified` (period name, energy) pairs under `classifier`.
    ///
    /// Periods are reported in the classifier's order and only when at least
    /// one sample fell into them.
    pub fn aggregate<S, I>(
        &self,
        classifier: &dyn PeriodClassifier,
        classified: I,
        prices: &PriceSet,
        days: i64,
    ) -> Result<CalculationResult>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, WattHours)>,
    {
        let code = classifier.offer_type_code();
        let periods = classifier.periods();
        let mut energy = vec![WattHours::ZERO; periods.len()];
        let mut hits = vec![0usize; periods.len()];

        for (name, wh) in classified {
            let name = name.as_ref();
            let index = periods
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| {
                    HestiaError::validation(
                        "period",
                        format!("{} classified a sample into unknown period {}", code, name),
                    )
                })?;
            energy[index] = energy[index]
                .checked_add(wh)
                .ok_or_else(|| overflow("consumption", name))?;
            hits[index] += 1;
        }

        let mut details = Vec::new();
        for (index, period) in periods.iter().enumerate() {
            if hits[index] == 0 {
                continue;
            }
            let consumption_kwh = KilowattHours::from(energy[index]);
            let unit_price = prices.require(code, &period.price_field)?;
            let cost_euros = consumption_kwh
                .checked_cost(unit_price)
                .ok_or_else(|| overflow("cost", &period.name))?;
            details.push(PeriodDetail {
                name: period.name.clone(),
                consumption_kwh,
                unit_price,
                cost_euros,
                percentage_of_total: Decimal::ZERO,
            });
        }

        let total_kwh = details
            .iter()
            .try_fold(KilowattHours::ZERO, |acc, p| acc.checked_add(p.consumption_kwh))
            .ok_or_else(|| overflow("total_kwh", code))?;
        if !total_kwh.is_zero() {
            for detail in &mut details {
                detail.percentage_of_total =
                    detail.consumption_kwh.0 / total_kwh.0 * Decimal::ONE_HUNDRED;
            }
        }

        let total_cost_euros = details
            .iter()
            .try_fold(Euros::ZERO, |acc, p| acc.checked_add(p.cost_euros))
            .ok_or_else(|| overflow("total_cost_euros", code))?;
        let subscription_cost_euros =
            self.prorate_subscription(prices.subscription_monthly(), days)?;
        let total_with_subscription = total_cost_euros
            .checked_add(subscription_cost_euros)
            .ok_or_else(|| overflow("total_with_subscription", code))?;

        self.logger.debug(&format!(
            "{}: {} period(s), {} over {} day(s)",
            code,
            details.len(),
            total_kwh,
            days
        ));

        Ok(CalculationResult {
            offer_type: code.to_string(),
            total_kwh,
            total_cost_euros,
            subscription_cost_euros,
            total_with_subscription,
            days,
            periods: details,
            data_quality: DataQuality::default(),
        })
    }
}

fn overflow(field: &str, subject: impl std::fmt::Display) -> HestiaError {
    HestiaError::validation(field, format!("amount for {} is out of range", subject))
}

impl Default for CostAggregator {
    fn default() -> Self {
        Self {
            average_days_per_month: DEFAULT_AVERAGE_DAYS_PER_MONTH,
            logger: get_logger("aggregate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::{OfferType, TariffOptions};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn hc_hp_prices() -> PriceSet {
        PriceSet::new(d("12"))
            .with_price("hc_price", d("0.15"))
            .with_price("hp_price", d("0.25"))
    }

    #[test]
    fn test_default_month_length() {
        assert_eq!(DEFAULT_AVERAGE_DAYS_PER_MONTH, d("30.44"));
    }

    #[test]
    fn test_periods_in_classifier_order() {
        let classifier = OfferType::HcHp.build(&TariffOptions::default()).unwrap();
        let classified = vec![("hp", WattHours(d("2000"))), ("hc", WattHours(d("1000")))];
        let result = CostAggregator::default()
            .aggregate(classifier.as_ref(), classified, &hc_hp_prices(), 1)
            .unwrap();
        let names: Vec<_> = result.periods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["hc", "hp"]);
        assert_eq!(result.total_kwh.0, d("3"));
        assert_eq!(result.total_cost_euros.0, d("0.65"));
        assert_eq!(
            result.total_with_subscription,
            result.total_cost_euros + result.subscription_cost_euros
        );
    }

    #[test]
    fn test_empty_series_has_zero_percentages() {
        let classifier = OfferType::HcHp.build(&TariffOptions::default()).unwrap();
        let result = CostAggregator::default()
            .aggregate(
                classifier.as_ref(),
                Vec::<(&str, WattHours)>::new(),
                &hc_hp_prices(),
                30,
            )
            .unwrap();
        assert!(result.periods.is_empty());
        assert!(result.total_kwh.is_zero());
        // Subscription still accrues
        assert!(result.subscription_cost_euros.0 > Decimal::ZERO);
    }

    #[test]
    fn test_zero_energy_period_has_zero_share() {
        let classifier = OfferType::Base.build(&TariffOptions::default()).unwrap();
        let prices = PriceSet::new(Decimal::ZERO).with_price("base_price", d("0.2"));
        let result = CostAggregator::default()
            .aggregate(classifier.as_ref(), vec![("base", WattHours::ZERO)], &prices, 1)
            .unwrap();
        assert_eq!(result.periods.len(), 1);
        assert_eq!(result.periods[0].percentage_of_total, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let classifier = OfferType::Base.build(&TariffOptions::default()).unwrap();
        let prices = PriceSet::new(Decimal::ZERO).with_price("base_price", d("0.2"));
        let result = CostAggregator::default().aggregate(
            classifier.as_ref(),
            vec![("hc", WattHours(d("1")))],
            &prices,
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let classifier = OfferType::Base.build(&TariffOptions::default()).unwrap();
        let prices = PriceSet::new(Decimal::ZERO).with_price("base_price", d("1"));
        let huge = WattHours(Decimal::MAX);
        let result = CostAggregator::default().aggregate(
            classifier.as_ref(),
            vec![("base", huge), ("base", huge)],
            &prices,
            1,
        );
        assert!(matches!(result, Err(HestiaError::Validation { .. })));
    }

    #[test]
    fn test_subscription_proration() {
        let aggregator = CostAggregator::new(d("30.44")).unwrap();
        let cost = aggregator.prorate_subscription(Euros(d("30.44")), 10).unwrap();
        assert_eq!(cost.0, d("10"));
        assert!(aggregator.prorate_subscription(Euros(Decimal::MAX), 31).is_err());
        assert!(CostAggregator::new(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_rounded_for_display() {
        let classifier = OfferType::HcHp.build(&TariffOptions::default()).unwrap();
        let classified = vec![("hc", WattHours(d("1000"))), ("hp", WattHours(d("2000")))];
        let result = CostAggregator::default()
            .aggregate(classifier.as_ref(), classified, &hc_hp_prices(), 1)
            .unwrap()
            .rounded();
        assert_eq!(result.periods[0].percentage_of_total, d("33.33"));
        assert_eq!(result.periods[1].percentage_of_total, d("66.67"));
        // 12 / 30.44 = 0.39421...
        assert_eq!(result.subscription_cost_euros.0, d("0.39"));
    }
}
