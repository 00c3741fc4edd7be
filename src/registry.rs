//! Offer type registry
//!
//! Maps offer type codes to classifier factories. A registry is an ordinary
//! value handed to the [`Calculator`](crate::calculator::Calculator); there is
//! no process-wide table. Built-in offers are added explicitly with
//! [`CalculatorRegistry::register_builtins`].

use crate::error::{HestiaError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::tariff::{OfferType, OfferTypeInfo, PeriodClassifier, TariffOptions, normalize_code};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a classifier for one offer type
pub trait ClassifierFactory: Send + Sync {
    fn build(&self, options: &TariffOptions) -> Result<Box<dyn PeriodClassifier>>;

    /// Identity used to tell a repeated registration from a conflicting one.
    ///
    /// Two factories with the same id must build the same classifier, so the
    /// id has to cover any configuration the factory carries.
    fn factory_id(&self) -> String;
}

/// Factory for a built-in [`OfferType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFactory(pub OfferType);

impl ClassifierFactory for BuiltinFactory {
    fn build(&self, options: &TariffOptions) -> Result<Box<dyn PeriodClassifier>> {
        self.0.build(options)
    }

    fn factory_id(&self) -> String {
        format!("builtin:{}", self.0.code())
    }
}

/// Registry of offer types available to a calculator
#[derive(Clone)]
pub struct CalculatorRegistry {
    factories: BTreeMap<String, Arc<dyn ClassifierFactory>>,
    logger: StructuredLogger,
}

impl CalculatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            logger: get_logger("registry"),
        }
    }

    /// Registry holding every built-in offer type
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register every built-in offer type. Calling it twice is harmless.
    pub fn register_builtins(&mut self) {
        for offer in OfferType::ALL {
            // Built-in factory ids are unique per code, so this cannot conflict
            // with itself; a third-party factory already under the code wins.
            if let Err(e) = self.register(offer.code(), Arc::new(BuiltinFactory(offer))) {
                self.logger
                    .warn(&format!("Built-in {} not registered: {}", offer.code(), e));
            }
        }
    }

    /// Register `factory` under `code`.
    ///
    /// Registering the same factory again is a no-op; a different factory
    /// under an existing code is a [`HestiaError::RegistryConflict`].
    pub fn register(&mut self, code: &str, factory: Arc<dyn ClassifierFactory>) -> Result<()> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(HestiaError::validation("offer_type", "code must not be empty"));
        }

        if let Some(existing) = self.factories.get(&code) {
            if existing.factory_id() == factory.factory_id() {
                return Ok(());
            }
            return Err(HestiaError::registry_conflict(code));
        }

        self.logger.debug(&format!("Registered offer type {}", code));
        self.factories.insert(code, factory);
        Ok(())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.factories.contains_key(&normalize_code(code))
    }

    /// Registered codes in sorted order
    pub fn codes(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Classifier for `code` configured with `options`
    pub fn get(&self, code: &str, options: &TariffOptions) -> Result<Box<dyn PeriodClassifier>> {
        let normalized = normalize_code(code);
        let factory = self
            .factories
            .get(&normalized)
            .ok_or_else(|| HestiaError::unknown_offer_type(code.trim()))?;
        factory.build(options)
    }

    /// Metadata of `code` with default options
    pub fn describe(&self, code: &str) -> Result<OfferTypeInfo> {
        Ok(self.get(code, &TariffOptions::default())?.info())
    }

    /// Metadata of every registered offer type
    pub fn catalog(&self) -> Result<Vec<OfferTypeInfo>> {
        self.factories
            .keys()
            .map(|code| self.describe(code))
            .collect()
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorRegistry")
            .field("codes", &self.codes())
            .finish()
    }
}
