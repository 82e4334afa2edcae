//! Money helpers.
//!
//! All amounts are US dollars held as [`Decimal`] so cart arithmetic is
//! exact; rounding only happens when an amount is formatted for display.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a dollar string with two decimals (e.g. `$25.84`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// Largest price the catalog accepts.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Whether `amount` is a price the catalog can store: not negative and at
/// most [`MAX_PRICE`].
#[must_use]
pub fn is_valid_price(amount: Decimal) -> bool {
    !amount.is_sign_negative() && amount <= MAX_PRICE
}

/// Whole-number discount of `price` against `original_price`, in percent.
///
/// Rounds like the storefront always has: halves go up (`12.5` → `13`,
/// `-12.5` → `-12`). Returns `None` when there is no original price to
/// compare against, or when the ratio is too large to represent.
#[must_use]
pub fn discount_percent(price: Decimal, original_price: Decimal) -> Option<i64> {
    if original_price.is_zero() {
        return None;
    }
    let ratio = original_price
        .checked_sub(price)?
        .checked_div(original_price)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    ratio.checked_add(Decimal::new(5, 1))?.floor().to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Decimal::from(89)), "$89.00");
        assert_eq!(format_usd(Decimal::new(2584, 2)), "$25.84");
        assert_eq!(format_usd(Decimal::new(10_005, 3)), "$10.01");
    }

    #[test]
    fn test_discount_percent_seed_products() {
        // Zafra Classic: 89 vs 120 -> 25.83%
        assert_eq!(discount_percent(Decimal::from(89), Decimal::from(120)), Some(26));
        // Zafra Premium: 145 vs 180 -> 19.44%
        assert_eq!(discount_percent(Decimal::from(145), Decimal::from(180)), Some(19));
    }

    #[test]
    fn test_discount_percent_half_rounds_up() {
        // 87.5 vs 100 -> 12.5%
        assert_eq!(discount_percent(Decimal::new(875, 1), Decimal::from(100)), Some(13));
        // 112.5 vs 100 -> -12.5%
        assert_eq!(discount_percent(Decimal::new(1125, 1), Decimal::from(100)), Some(-12));
    }

    #[test]
    fn test_discount_percent_without_original_price() {
        assert_eq!(discount_percent(Decimal::from(10), Decimal::ZERO), None);
    }

    #[test]
    fn test_discount_percent_out_of_range_is_none() {
        let huge = Decimal::from_scientific("1e20").unwrap();
        let tiny = Decimal::from_scientific("1e-20").unwrap();
        assert_eq!(discount_percent(huge, tiny), None);
        assert_eq!(discount_percent(Decimal::MAX, Decimal::MIN), None);
    }

    #[test]
    fn test_price_range() {
        assert!(is_valid_price(Decimal::ZERO));
        assert!(is_valid_price(MAX_PRICE));
        assert!(!is_valid_price(MAX_PRICE + Decimal::new(1, 2)));
        assert!(!is_valid_price(Decimal::new(-1, 2)));
    }
}
