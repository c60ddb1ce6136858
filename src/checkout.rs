//! Checkout
//!
//! A [`Checkout`] counts scanned items against a borrowed [`RuleSet`] and prices the cart on
//! demand. Totals are recomputed from the current quantities on every call; nothing is carried
//! between calls.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    pricing::{LinePrice, PricingError, round_to_minor_units},
    products::ProductRule,
    receipt::{Receipt, ReceiptLine},
    rules::RuleSet,
};

/// Errors raised while adding items to or pricing a checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The product code has no rule in the checkout's rule set.
    #[error("Unknown product {0}")]
    UnknownProduct(String),

    /// No tier of the product's rule covers the purchased quantity.
    #[error("No pricing tier for {quantity} x {code}")]
    NoApplicableTier {
        /// Product code
        code: String,

        /// Quantity in the cart
        quantity: u64,
    },

    /// Pricing a line overflowed.
    #[error("Price overflowed for product {0}")]
    PriceOverflow(String),

    /// Summing or rounding the cart total overflowed.
    #[error("Checkout total overflowed")]
    TotalOverflow,
}

/// A cart bound to a rule set.
///
/// Holds one quantity per product in the rule set, all starting at zero. Mutation requires
/// `&mut self`, so a checkout has a single writer at a time.
#[derive(Debug, Clone)]
pub struct Checkout<'r> {
    rule_set: &'r RuleSet,
    quantities: FxHashMap<&'r str, u64>,
}

impl<'r> Checkout<'r> {
    /// Create an empty checkout for the given rule set.
    pub fn new(rule_set: &'r RuleSet) -> Self {
        let quantities = rule_set
            .rules()
            .iter()
            .map(|rule| (rule.code(), 0))
            .collect();

        Self {
            rule_set,
            quantities,
        }
    }

    /// Scan one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownProduct`] if the code has no rule; the cart is unchanged.
    pub fn add_item(&mut self, code: &str) -> Result<(), CheckoutError> {
        let Some(quantity) = self.quantities.get_mut(code) else {
            warn!(code, "rejected unknown product");

            return Err(CheckoutError::UnknownProduct(code.to_string()));
        };

        *quantity += 1;

        trace!(code, quantity = *quantity, "added item");

        Ok(())
    }

    /// Scan a sequence of products in order.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown code with [`CheckoutError::UnknownProduct`]. Items scanned
    /// before it stay in the cart.
    pub fn add_items<'c>(
        &mut self,
        codes: impl IntoIterator<Item = &'c str>,
    ) -> Result<(), CheckoutError> {
        codes.into_iter().try_for_each(|code| self.add_item(code))
    }

    /// Quantity of a product in the cart; zero for products not in the rule set.
    pub fn quantity(&self, code: &str) -> u64 {
        self.quantities.get(code).copied().unwrap_or(0)
    }

    /// Total number of units in the cart.
    pub fn len(&self) -> u64 {
        self.quantities.values().sum()
    }

    /// Check if no items have been scanned.
    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|&quantity| quantity == 0)
    }

    /// The rule set this checkout prices against.
    pub fn rule_set(&self) -> &'r RuleSet {
        self.rule_set
    }

    /// Compute the cart total, rounded to the currency's minor units.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NoApplicableTier`]: a product's quantity is below all its tiers.
    /// - [`CheckoutError::PriceOverflow`] or [`CheckoutError::TotalOverflow`]: arithmetic
    ///   overflowed.
    pub fn total(&self) -> Result<Money<'static, Currency>, CheckoutError> {
        let total = self.priced_lines().try_fold(Decimal::ZERO, |acc, line| {
            let (_rule, price) = line?;

            acc.checked_add(price.total())
                .ok_or(CheckoutError::TotalOverflow)
        })?;

        let total = self.money(total)?;

        debug!(total = %total, "computed checkout total");

        Ok(total)
    }

    /// Build an itemised receipt for the cart.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Checkout::total`].
    pub fn receipt(&self) -> Result<Receipt<'static>, CheckoutError> {
        let mut lines: SmallVec<[ReceiptLine<'static>; 8]> = SmallVec::new();
        let mut subtotal = Decimal::ZERO;
        let mut total = Decimal::ZERO;

        for line in self.priced_lines() {
            let (rule, price) = line?;

            subtotal = subtotal
                .checked_add(price.subtotal())
                .ok_or(CheckoutError::TotalOverflow)?;

            total = total
                .checked_add(price.total())
                .ok_or(CheckoutError::TotalOverflow)?;

            lines.push(ReceiptLine::new(
                rule.code(),
                rule.name(),
                price.quantity(),
                price.free_units(),
                self.line_money(rule, price.unit_price())?,
                self.line_money(rule, price.subtotal())?,
                self.line_money(rule, price.total())?,
            ));
        }

        Ok(Receipt::new(
            lines,
            self.money(subtotal)?,
            self.money(total)?,
            self.rule_set.currency(),
        ))
    }

    /// Price every product with a non-zero quantity, in rule set order.
    fn priced_lines(
        &self,
    ) -> impl Iterator<Item = Result<(&'r ProductRule, LinePrice), CheckoutError>> + '_ {
        self.rule_set.rules().iter().filter_map(move |rule| {
            let quantity = self.quantity(rule.code());

            (quantity > 0).then(|| price_rule(rule, quantity).map(|price| (rule, price)))
        })
    }

    fn money(&self, amount: Decimal) -> Result<Money<'static, Currency>, CheckoutError> {
        let currency = self.rule_set.currency();
        let minor = round_to_minor_units(amount, currency)
            .map_err(|_err| CheckoutError::TotalOverflow)?;

        Ok(Money::from_minor(minor, currency))
    }

    fn line_money(
        &self,
        rule: &ProductRule,
        amount: Decimal,
    ) -> Result<Money<'static, Currency>, CheckoutError> {
        let currency = self.rule_set.currency();
        let minor = round_to_minor_units(amount, currency)
            .map_err(|_err| CheckoutError::PriceOverflow(rule.code().to_string()))?;

        Ok(Money::from_minor(minor, currency))
    }
}

fn price_rule(rule: &ProductRule, quantity: u64) -> Result<LinePrice, CheckoutError> {
    let price = rule.price(quantity).map_err(|err| match err {
        PricingError::NoApplicableTier(quantity) => CheckoutError::NoApplicableTier {
            code: rule.code().to_string(),
            quantity,
        },
        PricingError::Overflow => CheckoutError::PriceOverflow(rule.code().to_string()),
    })?;

    trace!(
        code = rule.code(),
        quantity,
        unit_price = %price.unit_price(),
        free_units = price.free_units(),
        line_total = %price.total(),
        "priced line"
    );

    Ok(price)
}
