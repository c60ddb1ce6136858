//! Pricing
//!
//! Volume tier tables and the rules for pricing a single cart line.
//!
//! A [`TierTable`] keeps its tiers sorted by ascending threshold, so resolving the unit price for
//! a quantity is a binary search for the last tier whose threshold does not exceed it.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors that can occur while pricing a single line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Every tier threshold is above the purchased quantity.
    #[error("no pricing tier applies to a quantity of {0}")]
    NoApplicableTier(u64),

    /// Decimal arithmetic overflowed or the result did not fit in minor units.
    #[error("price overflowed")]
    Overflow,
}

/// A volume price break: the unit price applies once the quantity reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingTier {
    threshold: u32,
    unit_price: Decimal,
}

impl PricingTier {
    /// Create a new tier.
    pub fn new(threshold: u32, unit_price: Decimal) -> Self {
        Self {
            threshold,
            unit_price,
        }
    }

    /// Minimum quantity for this tier to apply.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Unit price charged when this tier applies.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Pricing tiers for one product, sorted by ascending threshold with unique thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierTable {
    tiers: SmallVec<[PricingTier; 4]>,
}

impl TierTable {
    /// Build a tier table from tiers in any order.
    ///
    /// When two tiers share a threshold, the one supplied last wins.
    pub fn new(tiers: impl IntoIterator<Item = PricingTier>) -> Self {
        let mut sorted: SmallVec<[PricingTier; 4]> = SmallVec::new();

        for tier in tiers {
            match sorted.binary_search_by_key(&tier.threshold, PricingTier::threshold) {
                Ok(idx) => {
                    if let Some(existing) = sorted.get_mut(idx) {
                        *existing = tier;
                    }
                }
                Err(idx) => sorted.insert(idx, tier),
            }
        }

        Self { tiers: sorted }
    }

    /// A table with a single tier at threshold 1.
    pub fn flat(unit_price: Decimal) -> Self {
        Self::new([PricingTier::new(1, unit_price)])
    }

    /// Resolve the tier for a quantity: the tier with the largest threshold not exceeding it.
    pub fn resolve(&self, quantity: u64) -> Option<&PricingTier> {
        let qualifying = self
            .tiers
            .partition_point(|tier| u64::from(tier.threshold) <= quantity);

        qualifying.checked_sub(1).and_then(|idx| self.tiers.get(idx))
    }

    /// Iterate over the tiers in ascending threshold order.
    pub fn iter(&self) -> impl Iterator<Item = &PricingTier> {
        self.tiers.iter()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Check if the table has no tiers.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// The priced result for one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrice {
    quantity: u64,
    unit_price: Decimal,
    free_units: u64,
    subtotal: Decimal,
    total: Decimal,
}

impl LinePrice {
    /// Quantity purchased.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Unit price from the resolved tier.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Units given away by a buy-one-get-one-free promotion.
    pub fn free_units(&self) -> u64 {
        self.free_units
    }

    /// Line cost before promotions (`unit_price * quantity`).
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Line cost after promotions.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Amount taken off the subtotal by promotions.
    pub fn savings(&self) -> Decimal {
        self.subtotal - self.total
    }
}

/// Price a line of `quantity` units against a tier table.
///
/// With `buy_one_get_one_free` set, every second unit is free: `floor(quantity / 2)` units are
/// taken off at the resolved unit price.
///
/// # Errors
///
/// - [`PricingError::NoApplicableTier`]: the quantity is below every tier threshold.
/// - [`PricingError::Overflow`]: decimal arithmetic overflowed.
pub fn price_line(
    tiers: &TierTable,
    quantity: u64,
    buy_one_get_one_free: bool,
) -> Result<LinePrice, PricingError> {
    let tier = tiers
        .resolve(quantity)
        .ok_or(PricingError::NoApplicableTier(quantity))?;

    let unit_price = tier.unit_price();
    let free_units = if buy_one_get_one_free { quantity / 2 } else { 0 };

    let subtotal = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)?;

    let discount = unit_price
        .checked_mul(Decimal::from(free_units))
        .ok_or(PricingError::Overflow)?;

    let total = subtotal
        .checked_sub(discount)
        .ok_or(PricingError::Overflow)?;

    Ok(LinePrice {
        quantity,
        unit_price,
        free_units,
        subtotal,
        total,
    })
}

/// Round an amount to the currency's minor units, half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the rounded amount does not fit in an `i64`.
pub fn round_to_minor_units(amount: Decimal, currency: &Currency) -> Result<i64, PricingError> {
    let mut rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(currency.exponent);

    i64::try_from(rounded.mantissa()).map_err(|_err| PricingError::Overflow)
}
