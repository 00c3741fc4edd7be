#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use hestia::calculator::Calculator;
use hestia::registry::CalculatorRegistry;
use hestia::sample::RawSample;
use hestia::tariff::PriceSet;
use rust_decimal::Decimal;

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
}

/// Calculator classifying in UTC so fixtures can be written in UTC
pub fn utc_calculator() -> Calculator {
    Calculator::new(CalculatorRegistry::with_builtins(), chrono_tz::UTC, d("30.44")).unwrap()
}

/// `count` raw samples of constant power, `minutes` apart, starting at `start`
pub fn constant_power(
    start: DateTime<Utc>,
    count: i64,
    minutes: i64,
    power_w: f64,
) -> Vec<RawSample> {
    (0..count)
        .map(|i| RawSample::with_minutes(start + Duration::minutes(i * minutes), power_w, minutes))
        .collect()
}

pub fn tempo_prices() -> PriceSet {
    PriceSet::new(d("15.50"))
        .with_price("tempo_blue_hc", d("0.1296"))
        .with_price("tempo_blue_hp", d("0.1609"))
        .with_price("tempo_white_hc", d("0.1486"))
        .with_price("tempo_white_hp", d("0.1894"))
        .with_price("tempo_red_hc", d("0.1568"))
        .with_price("tempo_red_hp", d("0.7562"))
}
