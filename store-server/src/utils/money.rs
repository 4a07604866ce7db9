//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization (2 decimal places, half-up).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price / balance movement
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation, rounded to 2 decimal places
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_else(|| {
            tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
            Decimal::ZERO
        })
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: quantity × unit price
pub fn line_total(quantity: i64, price: f64) -> Decimal {
    Decimal::from(quantity) * to_decimal(price)
}

/// Σ quantity × price over `(quantity, price)` lines, as stored f64
pub fn sum_lines<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (i64, f64)>,
{
    to_f64(
        lines
            .into_iter()
            .map(|(qty, price)| line_total(qty, price))
            .sum(),
    )
}

/// `balance >= required`, compared in 2dp decimal
pub fn covers(balance: f64, required: f64) -> bool {
    to_decimal(balance) >= to_decimal(required)
}

/// Add a signed delta to an amount in 2dp decimal
pub fn add(amount: f64, delta: f64) -> f64 {
    to_f64(to_decimal(amount) + to_decimal(delta))
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// Average of `total` over `count` items; 0 when there are none
pub fn average(total: f64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    to_f64(to_decimal(total) / Decimal::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_noise_is_rounded_away() {
        // 0.1 + 0.2 != 0.3 in f64
        assert_eq!(add(0.1, 0.2), 0.3);
        assert_eq!(sum_lines([(3, 0.1)]), 0.3);
    }

    #[test]
    fn half_up_rounding() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }

    #[test]
    fn sum_of_lines() {
        assert_eq!(sum_lines([(2, 30.0)]), 60.0);
        assert_eq!(sum_lines([(2, 12.5), (1, 7.25), (4, 0.99)]), 36.21);
        assert_eq!(sum_lines(Vec::<(i64, f64)>::new()), 0.0);
    }

    #[test]
    fn balance_cover_boundary() {
        assert!(covers(60.0, 60.0));
        assert!(covers(100.0, 60.0));
        assert!(!covers(50.0, 60.0));
        assert!(!covers(59.99, 60.0));
    }

    #[test]
    fn average_handles_zero_count() {
        assert_eq!(average(0.0, 0), 0.0);
        assert_eq!(average(100.0, 3), 33.33);
    }

    #[test]
    fn equality_within_tolerance() {
        assert!(money_eq(10.0, 10.004));
        assert!(!money_eq(10.0, 10.02));
    }
}
