//! Money arithmetic on decimal amounts.
//!
//! Prices are plain `Decimal` amounts in the shop's single currency. Every
//! stored amount is rounded to cents (midpoint away from zero) so that line
//! totals and order totals add up exactly.

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest price accepted for a single flower.
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Errors for invalid price input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Zero or negative price.
    #[error("price must be greater than 0")]
    NotPositive,
    /// Price above [`MAX_PRICE`].
    #[error("price must be at most {MAX_PRICE}")]
    TooLarge,
}

/// Round an amount to cents.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a unit price and round it to cents.
///
/// # Errors
///
/// Returns [`MoneyError`] if the rounded price is not positive or exceeds
/// [`MAX_PRICE`].
pub fn parse_price(amount: Decimal) -> Result<Decimal, MoneyError> {
    let rounded = round_cents(amount);
    if rounded <= Decimal::ZERO {
        return Err(MoneyError::NotPositive);
    }
    if rounded > MAX_PRICE {
        return Err(MoneyError::TooLarge);
    }
    Ok(rounded)
}

/// Unit price times quantity, rounded to cents.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    round_cents(unit_price * Decimal::from(quantity))
}

/// Sum of already-rounded line totals.
pub fn sum_totals<I>(totals: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_cents(totals.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_line_total_rounds_to_cents() {
        assert_eq!(line_total(dec(1250), 3), dec(3750));
        assert_eq!(line_total(Decimal::new(335, 3), 1), dec(34));
    }

    #[test]
    fn test_sum_totals() {
        assert_eq!(sum_totals([dec(3750), dec(999)]), dec(4749));
        assert_eq!(sum_totals(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_bounds() {
        assert_eq!(parse_price(Decimal::new(19_999, 3)), Ok(dec(2000)));
        assert_eq!(parse_price(Decimal::ZERO), Err(MoneyError::NotPositive));
        assert_eq!(parse_price(dec(-500)), Err(MoneyError::NotPositive));
        assert_eq!(parse_price(Decimal::new(4, 3)), Err(MoneyError::NotPositive));
        assert_eq!(parse_price(dec(10_000_001)), Err(MoneyError::TooLarge));
    }
}
