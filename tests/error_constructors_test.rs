use chrono::NaiveDate;
use hestia::error::HestiaError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(HestiaError::data("x"), HestiaError::Data { .. }));
    assert!(matches!(
        HestiaError::missing_price_field("BASE", "base_price"),
        HestiaError::MissingPriceField { .. }
    ));
    assert!(matches!(
        HestiaError::unknown_offer_type("X"),
        HestiaError::UnknownOfferType { .. }
    ));
    assert!(matches!(
        HestiaError::registry_conflict("X"),
        HestiaError::RegistryConflict { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(
        HestiaError::config("x"),
        HestiaError::Config { .. }
    ));
    assert!(matches!(
        HestiaError::validation("f", "m"),
        HestiaError::Validation { .. }
    ));
    assert!(matches!(HestiaError::io("x"), HestiaError::Io { .. }));
    assert!(matches!(
        HestiaError::calendar_unavailable("EJP", Vec::new()),
        HestiaError::CalendarUnavailable { .. }
    ));
}

#[test]
fn conversions_from_library_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(HestiaError::from(io), HestiaError::Io { .. }));

    let json = serde_json::from_str::<u32>("nope").unwrap_err();
    assert!(matches!(
        HestiaError::from(json),
        HestiaError::Serialization { .. }
    ));

    let date = "2024-13-01".parse::<NaiveDate>().unwrap_err();
    assert!(matches!(
        HestiaError::from(date),
        HestiaError::Validation { .. }
    ));
}

#[test]
fn display_messages() {
    let e = HestiaError::unknown_offer_type("SOLAR");
    assert_eq!(format!("{}", e), "Unknown offer type: SOLAR");

    let days = vec![
        NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
    ];
    let e = HestiaError::calendar_unavailable("TEMPO", days);
    assert_eq!(
        format!("{}", e),
        "Calendar unavailable for TEMPO: 2 day(s) missing, first 2024-02-03"
    );

    let e = HestiaError::calendar_unavailable("TEMPO", Vec::new());
    assert!(format!("{}", e).contains("first n/a"));
}
