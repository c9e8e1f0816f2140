//! Additional logo pricing.
//!
//! An additional logo costs the tier's AL price plus a per-thousand charge
//! for stitches above the included base. The stitch count is rounded to the
//! configured increment before the base is subtracted. The result is not
//! rounded to the price grid.

use rust_decimal::Decimal;

use crate::models::{AuditStep, ProductCategory, TierLabel};

use super::rounding::round_stitch_count;

/// Stitch allowance and rate for extra stitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraStitchPolicy {
    /// Stitches included in the AL price.
    pub base_stitch_count: u32,
    /// Stitch rounding increment.
    pub increment: u32,
    /// Price per 1,000 stitches above the base.
    pub rate_per_thousand: Decimal,
}

/// The result of pricing an additional logo.
#[derive(Debug, Clone)]
pub struct AdditionalLogoResult {
    /// Category the logo goes on.
    pub category: ProductCategory,
    /// The tier the AL price came from.
    pub tier: TierLabel,
    /// AL price for the tier.
    pub tier_price: Decimal,
    /// Stitches charged above the base, after rounding.
    pub extra_stitches: u32,
    /// Cost of those extra stitches.
    pub extra_stitch_cost: Decimal,
    /// `tier_price + extra_stitch_cost`.
    pub unit_price: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Stitches above the base, after rounding the count to the increment.
pub fn extra_stitches(stitch_count: u32, policy: &ExtraStitchPolicy) -> u32 {
    round_stitch_count(stitch_count, policy.increment).saturating_sub(policy.base_stitch_count)
}

/// Cost of the stitches above the base.
///
/// ```
/// use embroidery_quote_engine::calculation::{ExtraStitchPolicy, extra_stitch_cost};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let policy = ExtraStitchPolicy {
///     base_stitch_count: 8000,
///     increment: 1000,
///     rate_per_thousand: Decimal::from_str("1.25").unwrap(),
/// };
/// assert_eq!(extra_stitch_cost(10_000, &policy), Decimal::from_str("2.50").unwrap());
/// assert_eq!(extra_stitch_cost(6_000, &policy), Decimal::ZERO);
/// ```
pub fn extra_stitch_cost(stitch_count: u32, policy: &ExtraStitchPolicy) -> Decimal {
    Decimal::from(extra_stitches(stitch_count, policy)) / Decimal::ONE_THOUSAND
        * policy.rate_per_thousand
}

/// Prices an additional logo at a given tier price.
pub fn calculate_additional_logo(
    category: ProductCategory,
    tier: TierLabel,
    tier_price: Decimal,
    stitch_count: u32,
    policy: &ExtraStitchPolicy,
    step_number: u32,
) -> AdditionalLogoResult {
    let extra = extra_stitches(stitch_count, policy);
    let extra_cost = extra_stitch_cost(stitch_count, policy);
    let unit_price = tier_price + extra_cost;

    let audit_step = AuditStep {
        step_number,
        rule_id: "additional_logo".to_string(),
        rule_name: "Additional Logo".to_string(),
        input: serde_json::json!({
            "category": category,
            "tier": tier,
            "stitch_count": stitch_count,
            "base_stitch_count": policy.base_stitch_count,
            "rate_per_thousand": policy.rate_per_thousand.to_string()
        }),
        output: serde_json::json!({
            "tier_price": tier_price.to_string(),
            "extra_stitches": extra,
            "extra_stitch_cost": extra_cost.to_string(),
            "unit_price": unit_price.to_string()
        }),
        reasoning: format!(
            "AL at tier '{}' is ${}; {} stitches over the {} base at ${}/1K adds ${}",
            tier, tier_price, extra, policy.base_stitch_count, policy.rate_per_thousand, extra_cost
        ),
    };

    AdditionalLogoResult {
        category,
        tier,
        tier_price,
        extra_stitches: extra,
        extra_stitch_cost: extra_cost,
        unit_price,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn garment_policy() -> ExtraStitchPolicy {
        ExtraStitchPolicy {
            base_stitch_count: 8000,
            increment: 1000,
            rate_per_thousand: dec("1.25"),
        }
    }

    fn cap_policy() -> ExtraStitchPolicy {
        ExtraStitchPolicy {
            base_stitch_count: 5000,
            increment: 1000,
            rate_per_thousand: dec("1.00"),
        }
    }

    #[test]
    fn test_no_extra_at_or_below_base() {
        assert_eq!(extra_stitches(8000, &garment_policy()), 0);
        assert_eq!(extra_stitches(3000, &garment_policy()), 0);
        assert_eq!(extra_stitch_cost(8499, &garment_policy()), Decimal::ZERO);
    }

    #[test]
    fn test_extra_stitches_use_rounded_count() {
        assert_eq!(extra_stitches(8500, &garment_policy()), 1000);
        assert_eq!(extra_stitch_cost(8500, &garment_policy()), dec("1.25"));
        assert_eq!(extra_stitch_cost(12_400, &garment_policy()), dec("5.00"));
    }

    #[test]
    fn test_cap_policy() {
        assert_eq!(extra_stitch_cost(7000, &cap_policy()), dec("2.00"));
    }

    #[test]
    fn test_additional_logo_price() {
        let result = calculate_additional_logo(
            ProductCategory::Garment,
            TierLabel::Tier24To47,
            dec("6.00"),
            10_000,
            &garment_policy(),
            1,
        );

        assert_eq!(result.extra_stitches, 2000);
        assert_eq!(result.extra_stitch_cost, dec("2.50"));
        assert_eq!(result.unit_price, dec("8.50"));
        assert_eq!(result.audit_step.rule_id, "additional_logo");
    }

    #[test]
    fn test_additional_logo_price_is_not_rounded() {
        let result = calculate_additional_logo(
            ProductCategory::Cap,
            TierLabel::Tier72Plus,
            dec("3.50"),
            6000,
            &cap_policy(),
            1,
        );

        assert_eq!(result.unit_price, dec("4.50"));
    }
}
