//! Pricing properties checked exhaustively over small carts.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use tiered_checkout::{pricing::round_to_minor_units, prelude::*};

const MAX_QUANTITY: u64 = 40;

fn single_rule(tiers: TierTable, buy_one_get_one_free: bool) -> Result<RuleSet, RuleSetError> {
    RuleSet::new(
        GBP,
        [ProductRule::new("P1", tiers).with_buy_one_get_one_free(buy_one_get_one_free)],
    )
}

fn total_of(rules: &RuleSet, quantity: u64) -> TestResult<i64> {
    let mut checkout = Checkout::new(rules);

    for _ in 0..quantity {
        checkout.add_item("P1")?;
    }

    Ok(checkout.total()?.to_minor_units())
}

fn expected_minor(amount: Decimal) -> TestResult<i64> {
    Ok(round_to_minor_units(amount, GBP)?)
}

#[test]
fn single_tier_total_is_price_times_quantity() -> TestResult {
    let price = Decimal::new(1999, 3);
    let rules = single_rule(TierTable::flat(price), false)?;

    for quantity in 0..=MAX_QUANTITY {
        assert_eq!(
            total_of(&rules, quantity)?,
            expected_minor(price * Decimal::from(quantity))?,
            "quantity {quantity}"
        );
    }

    Ok(())
}

#[test]
fn buy_one_get_one_free_charges_half_rounded_up() -> TestResult {
    let price = Decimal::new(311, 2);
    let rules = single_rule(TierTable::flat(price), true)?;

    for quantity in 0..=MAX_QUANTITY {
        let charged_units = quantity.div_ceil(2);

        assert_eq!(
            total_of(&rules, quantity)?,
            expected_minor(price * Decimal::from(charged_units))?,
            "quantity {quantity}"
        );
    }

    Ok(())
}

#[test]
fn bulk_tier_applies_from_its_threshold() -> TestResult {
    let base = Decimal::new(500, 2);
    let bulk = Decimal::new(450, 2);
    let rules = single_rule(
        TierTable::new([PricingTier::new(1, base), PricingTier::new(3, bulk)]),
        false,
    )?;

    for quantity in 1..=MAX_QUANTITY {
        let unit_price = if quantity >= 3 { bulk } else { base };

        assert_eq!(
            total_of(&rules, quantity)?,
            expected_minor(unit_price * Decimal::from(quantity))?,
            "quantity {quantity}"
        );
    }

    Ok(())
}

#[test]
fn multi_digit_thresholds_are_compared_numerically() -> TestResult {
    let rules = single_rule(
        TierTable::new([
            PricingTier::new(1, Decimal::new(120, 2)),
            PricingTier::new(5, Decimal::new(100, 2)),
            PricingTier::new(10, Decimal::new(80, 2)),
            PricingTier::new(15, Decimal::new(65, 2)),
        ]),
        false,
    )?;

    for quantity in 1..=MAX_QUANTITY {
        let unit_minor = match quantity {
            1..=4 => 120,
            5..=9 => 100,
            10..=14 => 80,
            _ => 65,
        };

        assert_eq!(
            total_of(&rules, quantity)?,
            unit_minor * i64::try_from(quantity)?,
            "quantity {quantity}"
        );
    }

    Ok(())
}

#[test]
fn total_is_idempotent() -> TestResult {
    let rules = single_rule(TierTable::flat(Decimal::new(311, 2)), true)?;
    let mut checkout = Checkout::new(&rules);

    for _ in 0..7 {
        checkout.add_item("P1")?;

        let first = checkout.total()?;
        let second = checkout.total()?;

        assert_eq!(first, second);
    }

    Ok(())
}

#[test]
fn total_is_independent_of_scan_order() -> TestResult {
    let rules = RuleSet::new(
        GBP,
        [
            ProductRule::new("FR1", TierTable::flat(Decimal::new(311, 2)))
                .with_buy_one_get_one_free(true),
            ProductRule::new(
                "SR1",
                TierTable::new([
                    PricingTier::new(1, Decimal::new(500, 2)),
                    PricingTier::new(3, Decimal::new(450, 2)),
                ]),
            ),
            ProductRule::new("CF1", TierTable::flat(Decimal::new(1123, 2))),
        ],
    )?;

    let mut items = vec!["FR1", "SR1", "FR1", "CF1", "SR1", "SR1", "FR1"];
    let mut totals = Vec::new();

    // Every rotation of the scan order and its reverse.
    for _ in 0..items.len() {
        items.rotate_left(1);

        for order in [items.clone(), items.iter().rev().copied().collect()] {
            let mut checkout = Checkout::new(&rules);

            checkout.add_items(order)?;
            totals.push(checkout.total()?);
        }
    }

    assert!(
        totals.iter().all(|total| *total == Money::from_minor(3095, GBP)),
        "{totals:?}"
    );

    Ok(())
}

#[test]
fn rounding_is_half_away_from_zero() -> TestResult {
    let rules = single_rule(TierTable::flat(Decimal::new(125, 3)), false)?;

    assert_eq!(total_of(&rules, 1)?, 13);
    assert_eq!(total_of(&rules, 3)?, 38);

    Ok(())
}

#[test]
fn rounding_happens_once_on_the_total() -> TestResult {
    let rules = RuleSet::new(
        GBP,
        [
            ProductRule::new("A", TierTable::flat(Decimal::new(1004, 3))),
            ProductRule::new("B", TierTable::flat(Decimal::new(1004, 3))),
        ],
    )?;

    let mut checkout = Checkout::new(&rules);

    checkout.add_items(["A", "B"])?;

    // 1.004 + 1.004 = 2.008, not 1.00 + 1.00
    assert_eq!(checkout.total()?, Money::from_minor(201, GBP));

    Ok(())
}
