//! Tiered Checkout
//!
//! Prices a shopping cart against per-product rules with volume price tiers and
//! buy-one-get-one-free promotions.
//!
//! A [`rules::RuleSet`] is built once and borrowed by any number of [`checkout::Checkout`]s.
//! Items are scanned with [`checkout::Checkout::add_item`] and the total is computed from the
//! current cart on every call to [`checkout::Checkout::total`].

pub mod checkout;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod rules;
pub mod utils;
