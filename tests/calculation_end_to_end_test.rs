mod common;

use common::*;
use hestia::calendar::NoCalendar;
use hestia::error::HestiaError;
use hestia::series::DateWindow;
use hestia::tariff::{PriceSet, TariffOptions};

#[test]
fn base_offer_one_day_of_half_hour_samples() {
    let day = date(2024, 1, 10);
    // 48 half-hour samples at 1000 W: 500 Wh each, 24 kWh total
    let raws = constant_power(midnight_utc(day), 48, 30, 1000.0);
    let prices = PriceSet::new(d("10")).with_price("base_price", d("0.20"));

    let result = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "BASE",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap();

    assert_eq!(result.offer_type, "BASE");
    assert_eq!(result.total_kwh.0, d("24"));
    assert_eq!(result.total_cost_euros.0, d("4.80"));
    assert_eq!(result.periods.len(), 1);
    assert_eq!(result.periods[0].percentage_of_total, d("100"));

    let subscription = result.subscription_cost_euros.0;
    assert!((subscription - d("0.328515")).abs() < d("0.000001"));
    assert_eq!(
        result.total_with_subscription.0,
        result.total_cost_euros.0 + subscription
    );

    let rounded = result.rounded();
    assert_eq!(rounded.subscription_cost_euros.0, d("0.33"));
    assert_eq!(rounded.total_with_subscription.0, d("5.13"));
    assert!(result.data_quality.is_clean());
}

#[test]
fn hc_hp_offer_splits_eight_and_sixteen_hours() {
    let day = date(2024, 1, 10);
    let raws = constant_power(midnight_utc(day), 24, 60, 1000.0);
    let prices = PriceSet::new(d("0"))
        .with_price("hc_price", d("0.15"))
        .with_price("hp_price", d("0.25"));

    let result = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "HC_HP",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap();

    let hc = result.period("hc").unwrap();
    let hp = result.period("hp").unwrap();
    assert_eq!(hc.consumption_kwh.0, d("8"));
    assert_eq!(hc.cost_euros.0, d("1.20"));
    assert_eq!(hp.consumption_kwh.0, d("16"));
    assert_eq!(hp.cost_euros.0, d("4.00"));
    assert_eq!(result.total_cost_euros.0, d("5.20"));
}

#[test]
fn missing_hp_price_names_the_field() {
    let day = date(2024, 1, 10);
    let raws = constant_power(midnight_utc(day), 24, 60, 1000.0);
    let prices = PriceSet::new(d("0")).with_price("hc_price", d("0.15"));

    let err = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "HC_HP",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap_err();

    match err {
        HestiaError::MissingPriceField { offer_type, field } => {
            assert_eq!(offer_type, "HC_HP");
            assert_eq!(field, "hp_price");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_offer_type_aborts() {
    let day = date(2024, 1, 10);
    let raws = constant_power(midnight_utc(day), 2, 30, 1000.0);
    let err = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "SOLAR_BONUS",
            &TariffOptions::default(),
            &PriceSet::default(),
            &NoCalendar,
        )
        .unwrap_err();
    assert!(matches!(err, HestiaError::UnknownOfferType { .. }));
}

#[test]
fn overlapping_fetches_and_bad_samples_are_reported() {
    let day = date(2024, 1, 10);
    let mut raws = constant_power(midnight_utc(day), 24, 60, 1000.0);
    // Second fetch overlaps the last six hours, one with a different value
    let mut overlap = constant_power(midnight_utc(day) + chrono::Duration::hours(18), 6, 60, 1000.0);
    overlap[0].power_value = 2000.0;
    raws.extend(overlap);
    raws.push(hestia::sample::RawSample::with_minutes(midnight_utc(day), f64::NAN, 60));

    let prices = PriceSet::new(d("0")).with_price("base_price", d("0.20"));
    let result = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "base",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap();

    assert_eq!(result.total_kwh.0, d("24"));
    assert_eq!(result.data_quality.rejected_samples, 1);
    assert_eq!(result.data_quality.duplicate_timestamps, 6);
    assert_eq!(result.data_quality.conflicting_duplicates, 1);
}

#[test]
fn subscription_accrues_over_inclusive_window() {
    let prices = PriceSet::new(d("30.44")).with_price("base_price", d("0.20"));
    let window = DateWindow::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
    let result = utc_calculator()
        .calculate_raw(
            &[],
            window,
            "BASE",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap();
    assert_eq!(result.days, 29);
    assert_eq!(result.subscription_cost_euros.0, d("29"));
    assert!(result.periods.is_empty());
    assert!(result.total_kwh.is_zero());
}

#[test]
fn samples_outside_the_window_are_not_billed() {
    let day = date(2024, 1, 10);
    // Three days of hourly 1 kWh readings from an overlapping fetch, one day billed
    let raws = constant_power(midnight_utc(day) - chrono::Duration::days(1), 72, 60, 1000.0);
    let prices = PriceSet::new(d("10")).with_price("base_price", d("0.20"));

    let result = utc_calculator()
        .calculate_raw(
            &raws,
            DateWindow::single_day(day),
            "BASE",
            &TariffOptions::default(),
            &prices,
            &NoCalendar,
        )
        .unwrap();

    assert_eq!(result.days, 1);
    assert_eq!(result.total_kwh.0, d("24"));
    assert_eq!(result.total_cost_euros.0, d("4.80"));
    assert_eq!(result.data_quality.out_of_window_samples, 48);
    assert!(!result.data_quality.is_clean());
}

#[test]
fn unknown_offer_type_wins_over_bad_input() {
    let day = date(2024, 1, 10);
    let raws = vec![hestia::sample::RawSample::with_minutes(midnight_utc(day), f64::NAN, 0)];
    let inverted = DateWindow {
        start_date: date(2024, 1, 11),
        end_date: day,
    };

    let err = utc_calculator()
        .calculate_raw(
            &raws,
            inverted,
            "SOLAR_BONUS",
            &TariffOptions::default(),
            &PriceSet::default(),
            &NoCalendar,
        )
        .unwrap_err();
    assert!(matches!(err, HestiaError::UnknownOfferType { .. }));

    // A missing price also aborts before the window is looked at
    let err = utc_calculator()
        .calculate_raw(
            &raws,
            inverted,
            "HC_HP",
            &TariffOptions::default(),
            &PriceSet::default(),
            &NoCalendar,
        )
        .unwrap_err();
    assert!(matches!(err, HestiaError::MissingPriceField { .. }));

    let calculator = utc_calculator();
    assert!(calculator
        .check_offer("base", &TariffOptions::default(), &PriceSet::default())
        .is_err());
    let info = calculator
        .check_offer(
            "base",
            &TariffOptions::default(),
            &PriceSet::default().with_price("base_price", d("0.2")),
        )
        .unwrap();
    assert_eq!(info.code, "BASE");
}
