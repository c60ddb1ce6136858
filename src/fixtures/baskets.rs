//! Basket Fixtures

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    checkout::Checkout,
    fixtures::{FixtureError, rules::parse_price_in},
    pricing::round_to_minor_units,
    rules::RuleSet,
};

/// Wrapper for baskets in YAML
#[derive(Debug, Deserialize)]
pub struct BasketsFixture {
    /// Named baskets, in display order
    pub baskets: Vec<BasketFixture>,
}

/// A named basket of scanned product codes.
#[derive(Debug, Clone, Deserialize)]
pub struct BasketFixture {
    /// Basket name
    pub name: String,

    /// Product codes in scan order
    #[serde(default)]
    pub items: Vec<String>,

    /// Expected total (e.g., "22.45 GBP")
    #[serde(default)]
    pub expected_total: Option<String>,
}

impl BasketFixture {
    /// Scan every item into a new checkout for the rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if an item has no rule in the rule set.
    pub fn checkout<'r>(&self, rule_set: &'r RuleSet) -> Result<Checkout<'r>, FixtureError> {
        let mut checkout = Checkout::new(rule_set);

        checkout.add_items(self.items.iter().map(String::as_str))?;

        Ok(checkout)
    }

    /// Parse the expected total, if one is given, in the rule set's currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the expected total is malformed or in another currency.
    pub fn expected_total(
        &self,
        currency: &'static Currency,
    ) -> Result<Option<Money<'static, Currency>>, FixtureError> {
        let Some(expected) = self.expected_total.as_deref() else {
            return Ok(None);
        };

        let amount = parse_price_in(expected, currency)?;
        let minor = round_to_minor_units(amount, currency)
            .map_err(|_err| FixtureError::InvalidPrice(expected.to_string()))?;

        Ok(Some(Money::from_minor(minor, currency)))
    }
}
