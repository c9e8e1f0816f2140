//! Price and stitch-count rounding.
//!
//! Prices are rounded up, never down: `HalfDollarUp` lands on the next
//! $0.50 and `CeilDollar` on the next whole dollar. A value already on the
//! grid is returned unchanged, which makes rounding idempotent.
//!
//! The public entry points accept anything implementing [`PriceValue`] so
//! callers holding `f64` prices get `None` back for NaN or infinite input
//! instead of a misleading number.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::models::RoundingMethod;

/// A price that may not be representable as a decimal.
pub trait PriceValue {
    /// Converts to a decimal, or `None` when the value is not a finite number.
    fn to_price(self) -> Option<Decimal>;
}

impl PriceValue for Decimal {
    fn to_price(self) -> Option<Decimal> {
        Some(self)
    }
}

impl PriceValue for f64 {
    fn to_price(self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f64(self)
    }
}

impl PriceValue for f32 {
    fn to_price(self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f32(self)
    }
}

impl PriceValue for Option<Decimal> {
    fn to_price(self) -> Option<Decimal> {
        self
    }
}

/// Rounds a decimal price with the given method.
pub fn round_decimal(value: Decimal, method: RoundingMethod) -> Decimal {
    match method {
        RoundingMethod::HalfDollarUp => value
            .checked_mul(Decimal::TWO)
            .map(|doubled| doubled.ceil() / Decimal::TWO)
            .unwrap_or(value),
        RoundingMethod::CeilDollar => value.ceil(),
    }
}

/// Rounds a garment price. Returns `None` for NaN or infinite input.
///
/// # Examples
///
/// ```
/// use embroidery_quote_engine::calculation::round_price;
/// use embroidery_quote_engine::models::RoundingMethod;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rounded = round_price(Decimal::from_str("39.51").unwrap(), RoundingMethod::HalfDollarUp);
/// assert_eq!(rounded, Some(Decimal::from_str("40.00").unwrap()));
///
/// assert_eq!(round_price(f64::NAN, RoundingMethod::HalfDollarUp), None);
/// ```
pub fn round_price<V: PriceValue>(value: V, method: RoundingMethod) -> Option<Decimal> {
    value.to_price().map(|price| round_decimal(price, method))
}

/// Rounds a cap price. Returns `None` for NaN or infinite input.
///
/// Same algorithm as [`round_price`]; caps carry their own configured
/// method, so the calculator routes them here.
pub fn round_cap_price<V: PriceValue>(value: V, method: RoundingMethod) -> Option<Decimal> {
    value.to_price().map(|price| round_decimal(price, method))
}

/// Rounds a stitch count half-up to the nearest multiple of `increment`.
///
/// An increment of zero leaves the count unchanged.
///
/// ```
/// use embroidery_quote_engine::calculation::round_stitch_count;
///
/// assert_eq!(round_stitch_count(8500, 1000), 9000);
/// assert_eq!(round_stitch_count(8499, 1000), 8000);
/// ```
pub fn round_stitch_count(count: u32, increment: u32) -> u32 {
    if increment == 0 {
        return count;
    }

    let count = u64::from(count);
    let increment = u64::from(increment);
    let remainder = count % increment;
    let lower = count - remainder;
    let rounded = if remainder * 2 >= increment {
        lower + increment
    } else {
        lower
    };

    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// RND-001: HalfDollarUp rounds 39.51 up to 40.00
    #[test]
    fn test_half_dollar_up_rounds_up() {
        assert_eq!(
            round_price(dec("39.51"), RoundingMethod::HalfDollarUp),
            Some(dec("40.00"))
        );
        assert_eq!(
            round_price(dec("39.05"), RoundingMethod::HalfDollarUp),
            Some(dec("39.50"))
        );
        assert_eq!(
            round_price(dec("39.01"), RoundingMethod::HalfDollarUp),
            Some(dec("39.50"))
        );
    }

    /// RND-002: values already on the half-dollar grid are unchanged
    #[test]
    fn test_half_dollar_up_keeps_grid_values() {
        assert_eq!(
            round_price(dec("39.50"), RoundingMethod::HalfDollarUp),
            Some(dec("39.50"))
        );
        assert_eq!(
            round_price(dec("40.00"), RoundingMethod::HalfDollarUp),
            Some(dec("40.00"))
        );
        assert_eq!(
            round_price(Decimal::ZERO, RoundingMethod::HalfDollarUp),
            Some(Decimal::ZERO)
        );
    }

    /// RND-003: CeilDollar rounds to the next whole dollar
    #[test]
    fn test_ceil_dollar() {
        assert_eq!(
            round_price(dec("39.05"), RoundingMethod::CeilDollar),
            Some(dec("40"))
        );
        assert_eq!(
            round_price(dec("39.00"), RoundingMethod::CeilDollar),
            Some(dec("39"))
        );
        assert_eq!(
            round_cap_price(dec("27.01"), RoundingMethod::CeilDollar),
            Some(dec("28"))
        );
    }

    /// RND-004: NaN and infinities yield None, never a number
    #[test]
    fn test_non_finite_input_is_none() {
        assert_eq!(round_price(f64::NAN, RoundingMethod::HalfDollarUp), None);
        assert_eq!(round_cap_price(f64::NAN, RoundingMethod::HalfDollarUp), None);
        assert_eq!(round_price(f64::INFINITY, RoundingMethod::CeilDollar), None);
        assert_eq!(round_cap_price(f32::NEG_INFINITY, RoundingMethod::CeilDollar), None);
        assert_eq!(round_price(None::<Decimal>, RoundingMethod::CeilDollar), None);
    }

    #[test]
    fn test_f64_input_is_rounded() {
        assert_eq!(
            round_price(39.51_f64, RoundingMethod::HalfDollarUp),
            Some(dec("40"))
        );
        assert_eq!(
            round_cap_price(26.2_f64, RoundingMethod::HalfDollarUp),
            Some(dec("26.5"))
        );
    }

    #[test]
    fn test_negative_values_round_toward_zero_side_of_grid() {
        assert_eq!(
            round_price(dec("-1.25"), RoundingMethod::HalfDollarUp),
            Some(dec("-1.00"))
        );
        assert_eq!(
            round_price(dec("-1.25"), RoundingMethod::CeilDollar),
            Some(dec("-1"))
        );
    }

    #[test]
    fn test_rounding_is_idempotent() {
        for method in [RoundingMethod::HalfDollarUp, RoundingMethod::CeilDollar] {
            for value in ["0.01", "12.34", "39.05", "39.50", "99.99"] {
                let once = round_decimal(dec(value), method);
                assert_eq!(round_decimal(once, method), once);
            }
        }
    }

    /// RND-005: stitch counts round half-up
    #[test]
    fn test_round_stitch_count_half_up() {
        assert_eq!(round_stitch_count(8500, 1000), 9000);
        assert_eq!(round_stitch_count(8499, 1000), 8000);
        assert_eq!(round_stitch_count(8000, 1000), 8000);
        assert_eq!(round_stitch_count(0, 1000), 0);
        assert_eq!(round_stitch_count(499, 1000), 0);
        assert_eq!(round_stitch_count(12_345, 500), 12_500);
    }

    #[test]
    fn test_round_stitch_count_edge_increments() {
        assert_eq!(round_stitch_count(8765, 0), 8765);
        assert_eq!(round_stitch_count(8765, 1), 8765);
        assert_eq!(round_stitch_count(u32::MAX, 1000), 4_294_967_000);
        assert_eq!(round_stitch_count(u32::MAX, 2_500_000_000), u32::MAX);
    }
}
