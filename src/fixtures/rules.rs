//! Rule Fixtures

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::{PricingTier, TierTable},
    products::ProductRule,
    rules::RuleSet,
};

/// Rule set in YAML
#[derive(Debug, Deserialize)]
pub struct RulesFixture {
    /// Currency code all prices must use (e.g., "GBP")
    pub currency: String,

    /// Product rules, in display order
    pub products: Vec<ProductFixture>,
}

/// Product rule fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product code
    pub code: String,

    /// Product name
    #[serde(default)]
    pub name: Option<String>,

    /// Whether every second unit is free
    #[serde(default)]
    pub buy_one_get_one_free: bool,

    /// Price tiers
    pub tiers: Vec<TierFixture>,
}

/// Price tier fixture
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Minimum quantity for the tier to apply
    pub threshold: u32,

    /// Unit price (e.g., "4.50 GBP")
    pub price: String,
}

impl RulesFixture {
    /// Convert into a validated [`RuleSet`].
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed, uses another currency, or the rules are invalid.
    pub fn try_into_rule_set(self) -> Result<RuleSet, FixtureError> {
        let currency = parse_currency(&self.currency)?;

        let rules = self
            .products
            .into_iter()
            .map(|product| product.try_into_rule(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleSet::new(currency, rules)?)
    }
}

impl ProductFixture {
    fn try_into_rule(self, currency: &'static Currency) -> Result<ProductRule, FixtureError> {
        let tiers = self
            .tiers
            .iter()
            .map(|tier| {
                let unit_price = parse_price_in(&tier.price, currency)?;

                Ok(PricingTier::new(tier.threshold, unit_price))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let rule = ProductRule::new(self.code, TierTable::new(tiers))
            .with_buy_one_get_one_free(self.buy_one_get_one_free);

        Ok(match self.name {
            Some(name) => rule.with_name(name),
            None => rule,
        })
    }
}

/// Parse a price string (e.g., "3.11 GBP") into an exact amount and its currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not
/// a non-negative decimal, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok((amount, parse_currency(currency_code)?))
}

/// Parse a price and check it is in the expected currency.
///
/// # Errors
///
/// Returns an error if the price is malformed or in a different currency.
pub fn parse_price_in(s: &str, expected: &'static Currency) -> Result<Decimal, FixtureError> {
    let (amount, currency) = parse_price(s)?;

    if currency != expected {
        return Err(FixtureError::CurrencyMismatch(
            expected.iso_alpha_code.to_string(),
            currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(amount)
}

/// Parse a supported currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
