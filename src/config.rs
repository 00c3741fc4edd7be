//! Configuration management for Hestia
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files: logging, calculation defaults and the list
//! of tariffs a household can compare.

mod defaults;

use crate::error::{HestiaError, Result};
use crate::logging::parse_log_level;
use crate::tariff::{OffpeakSchedule, PriceSet, TariffOptions};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Calculation defaults
    pub calculation: CalculationConfig,

    /// Tariffs available for calculation and comparison
    pub tariffs: Vec<TariffConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARNING, ERROR)
    pub level: String,

    /// Log directory or file path; console only when absent
    pub file: Option<String>,

    /// Whether to use JSON format
    pub json_format: bool,

    /// Whether to also log to the console when logging to a file
    pub console_output: bool,

    /// Number of rotated files to keep
    pub backup_count: u32,
}

/// Calculation defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// IANA time zone of the meter, used for period classification
    pub timezone: String,

    /// Interval assumed for samples without interval metadata
    pub default_interval_minutes: u32,

    /// Month length used to prorate subscriptions
    pub average_days_per_month: Decimal,
}

impl CalculationConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            HestiaError::validation(
                "calculation.timezone",
                format!("unknown time zone {}: {}", self.timezone, e),
            )
        })
    }
}

/// One priced offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Unique name, e.g. `edf-tempo`
    pub name: String,

    /// Offer type code, e.g. `HC_HP`
    pub offer_type: String,

    /// Monthly subscription
    #[serde(default)]
    pub subscription_monthly: Decimal,

    /// Price fields in currency per kWh
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,

    /// Off-peak schedule, e.g. `22:00-06:00` or `HC (22H00-6H00;12H30-14H30)`
    #[serde(default)]
    pub offpeak_hours: Option<String>,

    /// Months (1-12) billed at winter prices
    #[serde(default)]
    pub winter_months: Option<Vec<u32>>,

    /// Peak-day override; defaults to whether `peak_day_price` is priced
    #[serde(default)]
    pub peak_day_pricing: Option<bool>,
}

impl TariffConfig {
    pub fn price_set(&self) -> PriceSet {
        PriceSet {
            prices: self.prices.clone(),
            subscription_monthly: self.subscription_monthly,
        }
    }

    pub fn options(&self) -> Result<TariffOptions> {
        let mut options = TariffOptions::default().with_peak_day_pricing(
            self.peak_day_pricing
                .unwrap_or_else(|| self.prices.contains_key("peak_day_price")),
        );
        if let Some(hours) = self.offpeak_hours.as_deref() {
            options = options.with_offpeak(hours.parse::<OffpeakSchedule>()?);
        }
        if let Some(months) = &self.winter_months {
            options = options.with_winter_months(months.clone());
        }
        Ok(options)
    }

    fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("tariffs[{}].{}", index, name);

        if self.name.trim().is_empty() {
            return Err(HestiaError::validation(field("name"), "Name cannot be empty"));
        }
        if self.offer_type.trim().is_empty() {
            return Err(HestiaError::validation(
                field("offer_type"),
                "Offer type cannot be empty",
            ));
        }
        if self.subscription_monthly.is_sign_negative() {
            return Err(HestiaError::validation(
                field("subscription_monthly"),
                "Must not be negative",
            ));
        }
        if let Some((price_field, _)) = self.prices.iter().find(|(_, p)| p.is_sign_negative()) {
            return Err(HestiaError::validation(
                field(&format!("prices.{}", price_field)),
                "Must not be negative",
            ));
        }
        if let Some(hours) = self.offpeak_hours.as_deref() {
            hours.parse::<OffpeakSchedule>().map_err(|e| {
                HestiaError::validation(field("offpeak_hours"), e.to_string())
            })?;
        }
        if let Some(months) = &self.winter_months {
            if months.is_empty() || months.iter().any(|m| !(1..=12).contains(m)) {
                return Err(HestiaError::validation(
                    field("winter_months"),
                    "Must list months between 1 and 12",
                ));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = ["hestia.yaml", "/etc/hestia/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Tariff named `name`
    pub fn tariff(&self, name: &str) -> Result<&TariffConfig> {
        self.tariffs
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| HestiaError::config(format!("No tariff named {}", name)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.logging.level)?;

        self.calculation.timezone()?;

        if self.calculation.default_interval_minutes == 0 {
            return Err(HestiaError::validation(
                "calculation.default_interval_minutes",
                "Must be greater than 0",
            ));
        }

        if self.calculation.average_days_per_month <= Decimal::ZERO {
            return Err(HestiaError::validation(
                "calculation.average_days_per_month",
                "Must be positive",
            ));
        }

        if self.tariffs.is_empty() {
            return Err(HestiaError::validation(
                "tariffs",
                "At least one tariff is required",
            ));
        }

        let mut names = HashSet::new();
        for (index, tariff) in self.tariffs.iter().enumerate() {
            tariff.validate(index)?;
            if !names.insert(tariff.name.as_str()) {
                return Err(HestiaError::validation(
                    format!("tariffs[{}].name", index),
                    format!("Duplicate tariff name {}", tariff.name),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.calculation.timezone, "Europe/Paris");
        assert_eq!(config.calculation.default_interval_minutes, 30);
        assert_eq!(config.calculation.average_days_per_month, Decimal::new(3044, 2));
        assert_eq!(config.tariffs.len(), 1);
        assert!(config.logging.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.calculation.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.calculation.default_interval_minutes = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.tariffs.clear();
        assert!(config.validate().is_err());

        config = Config::default();
        config.tariffs.push(config.tariffs[0].clone());
        assert!(config.validate().is_err());

        config = Config::default();
        config.tariffs[0].offpeak_hours = Some("soon".to_string());
        assert!(config.validate().is_err());

        config = Config::default();
        config.tariffs[0].winter_months = Some(vec![13]);
        assert!(config.validate().is_err());

        config = Config::default();
        config.logging.level = "LOUD".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tariff_options_conversion() {
        let tariff: TariffConfig = serde_yaml::from_str(
            r#"
name: seasonal
offer_type: SEASONAL
subscription_monthly: "15.00"
prices:
  hc_price_winter: "0.20"
  peak_day_price: "0.80"
offpeak_hours: "HC (23H00-7H00)"
winter_months: [12, 1, 2]
"#,
        )
        .unwrap();
        let options = tariff.options().unwrap();
        assert!(options.peak_day_pricing);
        assert_eq!(options.winter_months, Some(vec![12, 1, 2]));
        assert_eq!(options.offpeak.unwrap().to_string(), "23:00-07:00");
        assert_eq!(tariff.price_set().subscription_monthly, Decimal::new(1500, 2));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("logging:\n  level: DEBUG\n").unwrap();
        assert_eq!(config.logging.level, "DEBUG");
        assert!(config.logging.console_output);
        assert_eq!(config.calculation.timezone, "Europe/Paris");
    }
}
