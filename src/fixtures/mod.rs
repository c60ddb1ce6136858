//! Fixtures
//!
//! Rule sets and baskets described in YAML. A fixture set named `example` is read from
//! `rules/example.yml` and `baskets/example.yml` under the base path.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    checkout::{Checkout, CheckoutError},
    fixtures::{
        baskets::{BasketFixture, BasketsFixture},
        rules::RulesFixture,
    },
    rules::{RuleSet, RuleSetError},
};

pub mod baskets;
pub mod rules;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price currency differs from the rule set currency
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Basket not found
    #[error("Basket not found: {0}")]
    BasketNotFound(String),

    /// No rules loaded yet
    #[error("No rules loaded; cannot create a checkout")]
    NoRules,

    /// Invalid rule set
    #[error("Invalid rule set: {0}")]
    RuleSet(#[from] RuleSetError),

    /// Scanning a basket into a checkout failed
    #[error("Failed to scan basket: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded rule set
    rule_set: Option<RuleSet>,

    /// Loaded baskets, in file order
    baskets: Vec<BasketFixture>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            rule_set: None,
            baskets: Vec::new(),
        }
    }

    /// Load a rule set from a YAML fixture file, replacing any loaded before.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the rules are invalid.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RulesFixture = serde_norway::from_str(&contents)?;

        let rule_set = fixture.try_into_rule_set()?;

        debug!(path = %file_path.display(), products = rule_set.len(), "loaded rules");

        self.rule_set = Some(rule_set);

        Ok(self)
    }

    /// Load baskets from a YAML fixture file, appending to any loaded before.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_baskets(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("baskets").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: BasketsFixture = serde_norway::from_str(&contents)?;

        debug!(path = %file_path.display(), baskets = fixture.baskets.len(), "loaded baskets");

        self.baskets.extend(fixture.baskets);

        Ok(self)
    }

    /// Load a complete fixture set (rules and baskets with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_rules(name)?.load_baskets(name)?;

        Ok(fixture)
    }

    /// Get the loaded rule set
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoRules`] if no rules have been loaded.
    pub fn rule_set(&self) -> Result<&RuleSet, FixtureError> {
        self.rule_set.as_ref().ok_or(FixtureError::NoRules)
    }

    /// All loaded baskets
    pub fn baskets(&self) -> &[BasketFixture] {
        &self.baskets
    }

    /// Get a basket by name
    ///
    /// # Errors
    ///
    /// Returns an error if the basket is not found.
    pub fn basket(&self, name: &str) -> Result<&BasketFixture, FixtureError> {
        self.baskets
            .iter()
            .find(|basket| basket.name == name)
            .ok_or_else(|| FixtureError::BasketNotFound(name.to_string()))
    }

    /// Create a checkout with every item of the named basket scanned.
    ///
    /// # Errors
    ///
    /// Returns an error if no rules are loaded, the basket is not found, or an item is unknown.
    pub fn checkout(&self, basket: &str) -> Result<Checkout<'_>, FixtureError> {
        self.basket(basket)?.checkout(self.rule_set()?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
