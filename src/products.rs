//! Products

use crate::pricing::{LinePrice, PricingError, TierTable, price_line};

/// Pricing rule for a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRule {
    code: String,
    name: Option<String>,
    buy_one_get_one_free: bool,
    tiers: TierTable,
}

impl ProductRule {
    /// Create a rule for the given product code, without promotions.
    pub fn new(code: impl Into<String>, tiers: TierTable) -> Self {
        Self {
            code: code.into(),
            name: None,
            buy_one_get_one_free: false,
            tiers,
        }
    }

    /// Set a display name for the product.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enable or disable the buy-one-get-one-free promotion.
    #[must_use]
    pub fn with_buy_one_get_one_free(mut self, enabled: bool) -> Self {
        self.buy_one_get_one_free = enabled;
        self
    }

    /// Product code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name, falling back to the product code.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }

    /// Whether every second unit is free.
    pub fn buy_one_get_one_free(&self) -> bool {
        self.buy_one_get_one_free
    }

    /// Price tiers
    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Price `quantity` units of this product.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if no tier covers the quantity or the arithmetic overflows.
    pub fn price(&self, quantity: u64) -> Result<LinePrice, PricingError> {
        price_line(&self.tiers, quantity, self.buy_one_get_one_free)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::pricing::PricingTier;

    use super::*;

    #[test]
    fn name_defaults_to_code() {
        let rule = ProductRule::new("CF1", TierTable::flat(Decimal::new(1123, 2)));

        assert_eq!(rule.name(), "CF1");
        assert_eq!(rule.with_name("Coffee").name(), "Coffee");
    }

    #[test]
    fn price_applies_promotion_flag() -> TestResult {
        let tiers = TierTable::flat(Decimal::new(311, 2));
        let plain = ProductRule::new("FR1", tiers.clone());
        let bogo = ProductRule::new("FR1", tiers).with_buy_one_get_one_free(true);

        assert_eq!(plain.price(4)?.total(), Decimal::new(1244, 2));
        assert_eq!(bogo.price(4)?.total(), Decimal::new(622, 2));

        Ok(())
    }

    #[test]
    fn price_combines_tiers_and_promotion() -> TestResult {
        let tiers = TierTable::new([
            PricingTier::new(1, Decimal::new(500, 2)),
            PricingTier::new(3, Decimal::new(450, 2)),
        ]);

        let rule = ProductRule::new("SR1", tiers).with_buy_one_get_one_free(true);
        let line = rule.price(3)?;

        assert_eq!(line.unit_price(), Decimal::new(450, 2));
        assert_eq!(line.free_units(), 1);
        assert_eq!(line.total(), Decimal::new(900, 2));

        Ok(())
    }
}
