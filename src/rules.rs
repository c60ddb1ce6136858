//! Rule Sets

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::products::ProductRule;

/// Errors related to rule set construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    /// Two rules share a product code.
    #[error("Duplicate rule for product {0}")]
    DuplicateProduct(String),

    /// A rule has no pricing tiers.
    #[error("Product {0} has no pricing tiers")]
    NoTiers(String),
}

/// An ordered, immutable collection of product rules, all priced in one currency.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ProductRule>,
    index: FxHashMap<String, usize>,
    currency: &'static Currency,
}

impl RuleSet {
    /// Create a rule set from rules in display order.
    ///
    /// # Errors
    ///
    /// - [`RuleSetError::DuplicateProduct`]: two rules share a product code.
    /// - [`RuleSetError::NoTiers`]: a rule has an empty tier table.
    pub fn new(
        currency: &'static Currency,
        rules: impl Into<Vec<ProductRule>>,
    ) -> Result<Self, RuleSetError> {
        let rules = rules.into();
        let mut index = FxHashMap::default();

        for (idx, rule) in rules.iter().enumerate() {
            if rule.tiers().is_empty() {
                return Err(RuleSetError::NoTiers(rule.code().to_string()));
            }

            if index.insert(rule.code().to_string(), idx).is_some() {
                return Err(RuleSetError::DuplicateProduct(rule.code().to_string()));
            }
        }

        debug!(
            products = rules.len(),
            currency = currency.iso_alpha_code,
            "built rule set"
        );

        Ok(Self {
            rules,
            index,
            currency,
        })
    }

    /// Look up the rule for a product code.
    pub fn rule(&self, code: &str) -> Option<&ProductRule> {
        self.index.get(code).and_then(|&idx| self.rules.get(idx))
    }

    /// Check whether a product code has a rule.
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// All rules, in the order they were supplied.
    pub fn rules(&self) -> &[ProductRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the rule set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Currency the rule prices are denominated in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
