//! Error types and handling for Hestia
//!
//! This module defines the error types used throughout the calculation
//! pipeline. Sample-level errors ([`HestiaError::Data`]) are recovered by the
//! normalizer (skip-and-count); every other variant aborts the request that
//! raised it.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for Hestia operations
pub type Result<T> = std::result::Result<T, HestiaError>;

/// Main error type for Hestia
#[derive(Debug, Error)]
pub enum HestiaError {
    /// Malformed or invalid raw sample
    #[error("Data error: {message}")]
    Data { message: String },

    /// Price set does not carry a field the offer type needs
    #[error("Missing price field for {offer_type}: {field}")]
    MissingPriceField { offer_type: String, field: String },

    /// Offer type code not present in the registry
    #[error("Unknown offer type: {code}")]
    UnknownOfferType { code: String },

    /// Calendar-driven offer type asked about days without a calendar entry
    #[error("Calendar unavailable for {offer_type}: {} day(s) missing, first {}", .dates.len(), first_date(.dates))]
    CalendarUnavailable {
        offer_type: String,
        dates: Vec<NaiveDate>,
    },

    /// Conflicting factory registered under an existing code
    #[error("Registry conflict: offer type {code} is already registered")]
    RegistryConflict { code: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

fn first_date(dates: &[NaiveDate]) -> String {
    dates
        .first()
        .map_or_else(|| "n/a".to_string(), ToString::to_string)
}

impl HestiaError {
    /// Create a new data error
    pub fn data<S: Into<String>>(message: S) -> Self {
        HestiaError::Data {
            message: message.into(),
        }
    }

    /// Create a new missing price field error
    pub fn missing_price_field<S: Into<String>, F: Into<String>>(offer_type: S, field: F) -> Self {
        HestiaError::MissingPriceField {
            offer_type: offer_type.into(),
            field: field.into(),
        }
    }

    /// Create a new unknown offer type error
    pub fn unknown_offer_type<S: Into<String>>(code: S) -> Self {
        HestiaError::UnknownOfferType { code: code.into() }
    }

    /// Create a new calendar unavailable error for one or more days
    pub fn calendar_unavailable<S: Into<String>>(offer_type: S, dates: Vec<NaiveDate>) -> Self {
        HestiaError::CalendarUnavailable {
            offer_type: offer_type.into(),
            dates,
        }
    }

    /// Create a new registry conflict error
    pub fn registry_conflict<S: Into<String>>(code: S) -> Self {
        HestiaError::RegistryConflict { code: code.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        HestiaError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        HestiaError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        HestiaError::Io {
            message: message.into(),
        }
    }

    /// Whether the error concerns a single sample and may be skipped
    pub fn is_sample_level(&self) -> bool {
        matches!(self, HestiaError::Data { .. })
    }
}

impl From<std::io::Error> for HestiaError {
    fn from(err: std::io::Error) -> Self {
        HestiaError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for HestiaError {
    fn from(err: serde_yaml::Error) -> Self {
        HestiaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HestiaError {
    fn from(err: serde_json::Error) -> Self {
        HestiaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for HestiaError {
    fn from(err: chrono::ParseError) -> Self {
        HestiaError::validation("datetime", err.to_string())
    }
}

impl From<rust_decimal::Error> for HestiaError {
    fn from(err: rust_decimal::Error) -> Self {
        HestiaError::data(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = HestiaError::data("bad sample");
        assert!(matches!(err, HestiaError::Data { .. }));
        assert!(err.is_sample_level());

        let err = HestiaError::missing_price_field("HC_HP", "hp_price");
        assert!(matches!(err, HestiaError::MissingPriceField { .. }));
        assert!(!err.is_sample_level());

        let err = HestiaError::validation("field", "test validation error");
        assert!(matches!(err, HestiaError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = HestiaError::missing_price_field("HC_HP", "hp_price");
        assert_eq!(err.to_string(), "Missing price field for HC_HP: hp_price");

        let err = HestiaError::validation("test_field", "invalid value");
        assert_eq!(
            err.to_string(),
            "Validation error: test_field - invalid value"
        );

        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let err = HestiaError::calendar_unavailable("TEMPO", vec![day]);
        assert_eq!(
            err.to_string(),
            "Calendar unavailable for TEMPO: 1 day(s) missing, first 2024-01-15"
        );
    }
}
