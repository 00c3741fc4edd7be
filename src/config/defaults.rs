use super::*;

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: None,
            json_format: false,
            console_output: true,
            backup_count: 5,
        }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Paris".to_string(),
            default_interval_minutes: crate::sample::DEFAULT_INTERVAL_MINUTES,
            average_days_per_month: crate::aggregate::DEFAULT_AVERAGE_DAYS_PER_MONTH,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            calculation: CalculationConfig::default(),
            tariffs: vec![TariffConfig {
                name: "base".to_string(),
                offer_type: "BASE".to_string(),
                subscription_monthly: Decimal::new(1244, 2),
                prices: BTreeMap::from([("base_price".to_string(), Decimal::new(2516, 4))]),
                offpeak_hours: None,
                winter_months: None,
                peak_day_pricing: None,
            }],
        }
    }
}
