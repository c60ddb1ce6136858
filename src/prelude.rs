//! Prelude
//!
//! Convenience exports for common library consumers.

pub use crate::{
    checkout::{Checkout, CheckoutError},
    fixtures::{Fixture, FixtureError},
    pricing::{LinePrice, PricingError, PricingTier, TierTable},
    products::ProductRule,
    receipt::{Receipt, ReceiptError, ReceiptLine},
    rules::{RuleSet, RuleSetError},
};
