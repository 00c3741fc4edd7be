//! Fixed-point physical and monetary quantities
//!
//! Every quantity wraps a [`Decimal`] so that sums over thousands of samples
//! never accumulate binary floating-point error. Rounding to presentation
//! precision is explicit (`round_to_cents`, `round_dp`).

use rust_decimal::Decimal;
use std::ops::Mul;

macro_rules! quantity {
    ($name:ident, $unit:literal) => {
        #[repr(transparent)]
        #[derive(
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::default::Default,
            ::std::cmp::PartialEq,
            ::std::cmp::Eq,
            ::std::cmp::PartialOrd,
            ::std::cmp::Ord,
            ::std::hash::Hash,
            ::serde::Deserialize,
            ::serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Decimal);

        impl $name {
            pub const ZERO: Self = Self(Decimal::ZERO);

            /// Round to `dp` decimal places (banker's rounding)
            pub fn round_dp(self, dp: u32) -> Self {
                Self(self.0.round_dp(dp))
            }

            pub fn is_zero(self) -> bool {
                self.0.is_zero()
            }

            /// `None` when the sum leaves the representable range
            pub fn checked_add(self, rhs: Self) -> Option<Self> {
                self.0.checked_add(rhs.0).map(Self)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, formatter)?;
                write!(formatter, " {}", $unit)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.0, formatter)?;
                write!(formatter, "{}", $unit)
            }
        }

        impl ::std::convert::From<Decimal> for $name {
            fn from(value: Decimal) -> Self {
                Self(value)
            }
        }

        impl ::std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl ::std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl ::std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl ::std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, item| acc + item)
            }
        }
    };
}

quantity!(WattHours, "Wh");
quantity!(KilowattHours, "kWh");
quantity!(Euros, "€");
quantity!(EurosPerKilowattHour, "€/kWh");

const WATT_HOURS_PER_KILOWATT_HOUR: Decimal = Decimal::ONE_THOUSAND;

impl From<WattHours> for KilowattHours {
    fn from(value: WattHours) -> Self {
        Self(value.0 / WATT_HOURS_PER_KILOWATT_HOUR)
    }
}

impl From<KilowattHours> for WattHours {
    fn from(value: KilowattHours) -> Self {
        Self(value.0 * WATT_HOURS_PER_KILOWATT_HOUR)
    }
}

impl Mul<EurosPerKilowattHour> for KilowattHours {
    type Output = Euros;

    fn mul(self, rhs: EurosPerKilowattHour) -> Self::Output {
        Euros(self.0 * rhs.0)
    }
}

impl KilowattHours {
    /// Cost at `price`, `None` on overflow
    pub fn checked_cost(self, price: EurosPerKilowattHour) -> Option<Euros> {
        self.0.checked_mul(price.0).map(Euros)
    }
}

impl Euros {
    /// Round to the currency minor unit. Presentation only.
    pub fn round_to_cents(self) -> Self {
        self.round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_watt_hours_to_kilowatt_hours() {
        assert_eq!(KilowattHours::from(WattHours(d("900"))).0, d("0.9"));
        assert_eq!(WattHours::from(KilowattHours(d("1.25"))).0, d("1250"));
    }

    #[test]
    fn test_cost_product() {
        let cost = KilowattHours(d("8")) * EurosPerKilowattHour(d("0.15"));
        assert_eq!(cost.0, d("1.20"));
        assert_eq!(
            KilowattHours(d("8")).checked_cost(EurosPerKilowattHour(d("0.15"))),
            Some(cost)
        );
        assert!(KilowattHours(Decimal::MAX)
            .checked_cost(EurosPerKilowattHour(d("2")))
            .is_none());
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(WattHours(d("1")).checked_add(WattHours(d("2"))), Some(WattHours(d("3"))));
        assert!(Euros(Decimal::MAX).checked_add(Euros(d("1"))).is_none());
    }

    #[test]
    fn test_sum_and_display() {
        let total: KilowattHours = [d("1.5"), d("2.5")].into_iter().map(KilowattHours).sum();
        assert_eq!(total.0, d("4"));
        assert_eq!(Euros(d("5.20")).to_string(), "5.20 €");
        assert_eq!(Euros(d("0.328515")).round_to_cents().0, d("0.33"));
    }
}
