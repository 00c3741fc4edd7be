//! Price sets
//!
//! A [`PriceSet`] maps price field names (`hc_price`, `tempo_red_hp`, ...) to
//! a unit price in currency per kWh, plus the monthly subscription.

use crate::error::{HestiaError, Result};
use crate::quantity::{Euros, EurosPerKilowattHour};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSet {
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,

    #[serde(default)]
    pub subscription_monthly: Decimal,
}

impl PriceSet {
    pub fn new(subscription_monthly: Decimal) -> Self {
        Self {
            prices: BTreeMap::new(),
            subscription_monthly,
        }
    }

    /// Builder-style insert
    pub fn with_price(mut self, field: &str, price: Decimal) -> Self {
        self.insert(field, price);
        self
    }

    pub fn insert(&mut self, field: &str, price: Decimal) {
        self.prices.insert(field.to_string(), price);
    }

    pub fn get(&self, field: &str) -> Option<EurosPerKilowattHour> {
        self.prices.get(field).copied().map(EurosPerKilowattHour)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.prices.contains_key(field)
    }

    /// Unit price for `field`, or `MissingPriceField` naming it
    pub fn require(&self, offer_type: &str, field: &str) -> Result<EurosPerKilowattHour> {
        self.get(field)
            .ok_or_else(|| HestiaError::missing_price_field(offer_type, field))
    }

    pub fn subscription_monthly(&self) -> Euros {
        Euros(self.subscription_monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_names_missing_field() {
        let prices = PriceSet::new(Decimal::from(10)).with_price("hc_price", Decimal::new(15, 2));
        assert_eq!(
            prices.require("HC_HP", "hc_price").unwrap().0,
            Decimal::new(15, 2)
        );
        let err = prices.require("HC_HP", "hp_price").unwrap_err();
        assert_eq!(err.to_string(), "Missing price field for HC_HP: hp_price");
        assert_eq!(prices.subscription_monthly().0, Decimal::from(10));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let prices: PriceSet = serde_yaml::from_str(
            "prices:\n  base_price: \"0.2516\"\nsubscription_monthly: \"12.44\"\n",
        )
        .unwrap();
        assert!(prices.contains("base_price"));
        assert_eq!(prices.subscription_monthly, Decimal::new(1244, 2));
    }
}
