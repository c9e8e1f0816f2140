//! Property tests for tier resolution, rounding, LTM and stitch surcharges.

use proptest::prelude::*;
use rust_decimal::Decimal;

use embroidery_quote_engine::calculation::{EmbroideryCalculator, round_decimal};
use embroidery_quote_engine::config::PricingConfig;
use embroidery_quote_engine::models::{ProductCategory, RoundingMethod, TierLabel};

fn calculator() -> EmbroideryCalculator {
    EmbroideryCalculator::new(PricingConfig::default()).expect("default config is valid")
}

/// Prices between $0.00 and $10,000.00 in cents.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn rounding_method() -> impl Strategy<Value = RoundingMethod> {
    prop_oneof![
        Just(RoundingMethod::HalfDollarUp),
        Just(RoundingMethod::CeilDollar)
    ]
}

proptest! {
    #[test]
    fn every_quantity_resolves_to_exactly_one_tier(quantity in any::<i64>()) {
        let calculator = calculator();
        let label = calculator.get_tier(quantity);
        let matching = calculator
            .tier_table(ProductCategory::Garment)
            .tiers()
            .iter()
            .filter(|t| t.contains(quantity))
            .count();

        if quantity < 1 {
            prop_assert_eq!(label, TierLabel::Tier1To7);
        } else {
            prop_assert_eq!(matching, 1);
        }
        prop_assert_eq!(calculator.get_cap_tier(quantity), label);
    }

    #[test]
    fn rounding_is_idempotent_and_never_lowers(value in price(), method in rounding_method()) {
        let rounded = round_decimal(value, method);
        prop_assert!(rounded >= value);
        prop_assert_eq!(round_decimal(rounded, method), rounded);
    }

    #[test]
    fn rounding_is_monotonic(a in price(), b in price(), method in rounding_method()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(round_decimal(low, method) <= round_decimal(high, method));
    }

    #[test]
    fn half_dollar_rounding_lands_on_half_dollars(value in price()) {
        let rounded = round_decimal(value, RoundingMethod::HalfDollarUp);
        prop_assert!((rounded * Decimal::TWO).fract().is_zero());
        prop_assert!(rounded - value < Decimal::new(5, 1));
    }

    #[test]
    fn ltm_share_strictly_decreases(quantity in 1u32..10_000) {
        let fee = PricingConfig::default().ltm_fee;
        let here = fee / Decimal::from(quantity);
        let next = fee / Decimal::from(quantity + 1);
        prop_assert!(next < here);

        let calculator = calculator();
        let rounded_here = calculator.ltm_per_piece(ProductCategory::Garment, quantity);
        let rounded_next = calculator.ltm_per_piece(ProductCategory::Garment, quantity + 1);
        prop_assert!(rounded_next <= rounded_here);
    }

    #[test]
    fn stitch_surcharge_never_decreases(a in 0u32..100_000, b in 0u32..100_000) {
        let calculator = calculator();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calculator.get_stitch_surcharge(low) <= calculator.get_stitch_surcharge(high));
    }

    #[test]
    fn stitch_surcharge_constant_above_last_tier(extra in 1u32..1_000_000) {
        let calculator = calculator();
        let last = calculator
            .config()
            .stitch_surcharge_tiers
            .last()
            .expect("default table has tiers")
            .clone();
        prop_assert_eq!(calculator.get_stitch_surcharge(last.max + extra), last.fee);
        prop_assert_eq!(calculator.get_stitch_surcharge(last.max), last.fee);
    }
}
