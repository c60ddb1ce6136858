//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

/// Errors that can occur when reporting on a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One priced product on a receipt.
///
/// Amounts are rounded to the currency's minor units individually for display; the receipt
/// totals are rounded from the exact sums.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    code: String,
    name: String,
    quantity: u64,
    free_units: u64,
    unit_price: Money<'a, Currency>,
    subtotal: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> ReceiptLine<'a> {
    /// Create a new receipt line.
    pub fn new(
        code: &str,
        name: &str,
        quantity: u64,
        free_units: u64,
        unit_price: Money<'a, Currency>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
    ) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            quantity,
            free_units,
            unit_price,
            subtotal,
            total,
        }
    }

    /// Product code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Product display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units purchased
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Units given away free
    pub fn free_units(&self) -> u64 {
        self.free_units
    }

    /// Unit price from the resolved tier
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Line cost before promotions
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Line cost after promotions
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Itemised receipt for a priced checkout.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Priced lines, in rule set order
    lines: SmallVec<[ReceiptLine<'a>; 8]>,

    /// Total cost before any promotions
    subtotal: Money<'a, Currency>,

    /// Total amount paid after promotions
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    pub fn new(
        lines: SmallVec<[ReceiptLine<'a>; 8]>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            lines,
            subtotal,
            total,
            currency,
        }
    }

    /// Priced lines, in rule set order.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before any promotions
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings made by promotions as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the savings cannot be calculated or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Code",
            "Product",
            "Qty",
            "Free",
            "Unit Price",
            "Subtotal",
            "Total",
        ]);

        for line in &self.lines {
            builder.push_record([
                line.code.clone(),
                line.name.clone(),
                line.quantity.to_string(),
                free_units_cell(line.free_units),
                line.unit_price.to_string(),
                line.subtotal.to_string(),
                line.total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        write_summary(&mut out, self)
    }
}

fn free_units_cell(free_units: u64) -> String {
    if free_units == 0 {
        String::new()
    } else {
        free_units.to_string()
    }
}

fn write_summary(out: &mut impl io::Write, receipt: &Receipt<'_>) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;
    let savings_points = percent_points(receipt.savings_percent()?);

    let rows = [
        ("Subtotal:", receipt.subtotal().to_string()),
        ("Total:", receipt.total().to_string()),
        ("Savings:", format!("({savings_points:.2}%) {savings}")),
    ];

    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<10}{value:>value_width$}").map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn gbp(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, iso::GBP)
    }

    fn fruit_tea_line() -> ReceiptLine<'static> {
        ReceiptLine::new("FR1", "Fruit tea", 3, 1, gbp(311), gbp(933), gbp(622))
    }

    #[test]
    fn accessors_return_values_from_constructor() {
        let receipt = Receipt::new(smallvec![fruit_tea_line()], gbp(933), gbp(622), iso::GBP);

        assert_eq!(receipt.lines().len(), 1);
        assert_eq!(receipt.subtotal(), gbp(933));
        assert_eq!(receipt.total(), gbp(622));
        assert_eq!(receipt.currency(), iso::GBP);
    }

    #[test]
    fn savings_is_subtotal_minus_total() -> TestResult {
        let receipt = Receipt::new(smallvec![fruit_tea_line()], gbp(933), gbp(622), iso::GBP);

        assert_eq!(receipt.savings()?, gbp(311));

        Ok(())
    }

    #[test]
    fn savings_percent_of_empty_receipt_is_zero() -> TestResult {
        let receipt = Receipt::new(SmallVec::new(), gbp(0), gbp(0), iso::GBP);

        assert_eq!(percent_points(receipt.savings_percent()?), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn savings_percent_is_relative_to_subtotal() -> TestResult {
        let receipt = Receipt::new(SmallVec::new(), gbp(1000), gbp(750), iso::GBP);

        assert_eq!(
            percent_points(receipt.savings_percent()?),
            Decimal::new(25, 0)
        );

        Ok(())
    }

    #[test]
    fn savings_errors_on_currency_mismatch() {
        let receipt = Receipt::new(
            SmallVec::new(),
            gbp(300),
            Money::from_minor(250, iso::USD),
            iso::GBP,
        );

        assert_eq!(
            receipt.savings(),
            Err(MoneyError::CurrencyMismatch {
                expected: iso::GBP.iso_alpha_code,
                actual: iso::USD.iso_alpha_code,
            })
        );
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let coffee = ReceiptLine::new("CF1", "Coffee", 1, 0, gbp(1123), gbp(1123), gbp(1123));

        let receipt = Receipt::new(
            smallvec![fruit_tea_line(), coffee],
            gbp(2056),
            gbp(1745),
            iso::GBP,
        );

        let mut out = Vec::new();

        receipt.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Fruit tea"), "{rendered}");
        assert!(rendered.contains("Coffee"), "{rendered}");
        assert!(rendered.contains("Subtotal:"), "{rendered}");
        assert!(rendered.contains("Total:"), "{rendered}");
        assert!(rendered.contains("Savings:"), "{rendered}");
        assert!(rendered.contains(&gbp(1745).to_string()), "{rendered}");

        Ok(())
    }
}
