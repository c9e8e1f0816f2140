//! Less-than-minimum (LTM) fee distribution.
//!
//! The flat LTM fee is spread across the pieces of a category whose total
//! falls in a tier flagged `has_ltm`. Garments and caps are evaluated
//! separately: 8 garments and 3 caps pay LTM on the caps only.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, LtmCharge, LtmSplit, PricingTier, ProductCategory};

/// The result of evaluating LTM for one category.
#[derive(Debug, Clone)]
pub struct LtmResult {
    /// The charge, when the category is below the minimum.
    pub charge: Option<LtmCharge>,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// `ltm_fee / quantity` rounded to cents, or `None` for a zero quantity.
///
/// ```
/// use embroidery_quote_engine::calculation::ltm_per_piece;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let fee = Decimal::from(50);
/// assert_eq!(ltm_per_piece(fee, 3), Some(Decimal::from_str("16.67").unwrap()));
/// assert_eq!(ltm_per_piece(fee, 0), None);
/// ```
pub fn ltm_per_piece(ltm_fee: Decimal, quantity: u32) -> Option<Decimal> {
    if quantity == 0 {
        return None;
    }
    Some(
        (ltm_fee / Decimal::from(quantity))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Evaluates the LTM fee for one category.
///
/// `tier` must be the tier the category's quantity resolved to.
pub fn calculate_ltm(
    category: ProductCategory,
    quantity: u32,
    tier: &PricingTier,
    ltm_fee: Decimal,
    step_number: u32,
) -> LtmResult {
    let charge = if tier.has_ltm {
        ltm_per_piece(ltm_fee, quantity).map(|per_piece| LtmCharge {
            category,
            quantity,
            fee: ltm_fee,
            per_piece,
        })
    } else {
        None
    };

    let reasoning = match (&charge, tier.has_ltm) {
        (Some(c), _) => format!(
            "{} {:?} pieces in tier '{}': ${} LTM spread at ${} per piece",
            quantity, category, tier.label, ltm_fee, c.per_piece
        ),
        (None, true) => format!("No {:?} pieces; no LTM charged", category),
        (None, false) => format!(
            "{} {:?} pieces in tier '{}' meet the minimum; no LTM",
            quantity, category, tier.label
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "ltm_fee".to_string(),
        rule_name: "Less Than Minimum Fee".to_string(),
        input: serde_json::json!({
            "category": category,
            "quantity": quantity,
            "tier": tier.label,
            "ltm_fee": ltm_fee.to_string()
        }),
        output: serde_json::json!({
            "applies": charge.is_some(),
            "per_piece": charge.map(|c| c.per_piece.to_string())
        }),
        reasoning,
    };

    LtmResult { charge, audit_step }
}

/// Evaluates LTM for garments and caps independently and totals the fees.
pub fn distribute_ltm(garment: &LtmResult, cap: &LtmResult) -> LtmSplit {
    let total = [garment.charge, cap.charge]
        .iter()
        .flatten()
        .map(|c| c.fee)
        .sum();

    LtmSplit {
        garment: garment.charge,
        cap: cap.charge,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingConfig;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tier(index: usize) -> PricingTier {
        PricingConfig::default().tiers[index].clone()
    }

    /// LTM-001: $50 over 3 pieces is $16.67 each
    #[test]
    fn test_per_piece_rounds_to_cents() {
        assert_eq!(ltm_per_piece(dec("50.00"), 3), Some(dec("16.67")));
        assert_eq!(ltm_per_piece(dec("50.00"), 7), Some(dec("7.14")));
        assert_eq!(ltm_per_piece(dec("50.00"), 1), Some(dec("50.00")));
        assert_eq!(ltm_per_piece(dec("50.00"), 6), Some(dec("8.33")));
    }

    #[test]
    fn test_per_piece_midpoint_rounds_away_from_zero() {
        assert_eq!(ltm_per_piece(dec("0.05"), 2), Some(dec("0.03")));
    }

    #[test]
    fn test_zero_quantity_has_no_per_piece() {
        assert_eq!(ltm_per_piece(dec("50.00"), 0), None);
    }

    #[test]
    fn test_ltm_charged_in_ltm_tier() {
        let result = calculate_ltm(ProductCategory::Garment, 3, &tier(0), dec("50.00"), 1);

        let charge = result.charge.unwrap();
        assert_eq!(charge.per_piece, dec("16.67"));
        assert_eq!(charge.fee, dec("50.00"));
        assert_eq!(result.audit_step.output["applies"], true);
    }

    #[test]
    fn test_no_ltm_above_minimum() {
        let result = calculate_ltm(ProductCategory::Garment, 8, &tier(1), dec("50.00"), 1);

        assert!(result.charge.is_none());
        assert!(result.audit_step.reasoning.contains("meet the minimum"));
    }

    #[test]
    fn test_no_ltm_for_empty_category() {
        let result = calculate_ltm(ProductCategory::Cap, 0, &tier(0), dec("50.00"), 1);
        assert!(result.charge.is_none());
    }

    /// LTM-002: 8 garments and 3 caps pay one $50 fee, on the caps
    #[test]
    fn test_categories_evaluated_independently() {
        let caps = PricingConfig::default().cap_tiers;
        let garment = calculate_ltm(ProductCategory::Garment, 8, &tier(1), dec("50.00"), 1);
        let cap = calculate_ltm(ProductCategory::Cap, 3, &caps[0], dec("50.00"), 2);

        let split = distribute_ltm(&garment, &cap);

        assert!(split.garment.is_none());
        assert_eq!(split.cap.map(|c| c.per_piece), Some(dec("16.67")));
        assert_eq!(split.total, dec("50.00"));
    }

    #[test]
    fn test_both_categories_below_minimum_pay_twice() {
        let caps = PricingConfig::default().cap_tiers;
        let garment = calculate_ltm(ProductCategory::Garment, 5, &tier(0), dec("50.00"), 1);
        let cap = calculate_ltm(ProductCategory::Cap, 2, &caps[0], dec("50.00"), 2);

        assert_eq!(distribute_ltm(&garment, &cap).total, dec("100.00"));
    }

    #[test]
    fn test_per_piece_strictly_decreases() {
        let fee = dec("50.00");
        let mut previous = ltm_per_piece(fee, 1).unwrap();
        for quantity in 2..=7 {
            let current = ltm_per_piece(fee, quantity).unwrap();
            assert!(current < previous);
            previous = current;
        }
    }
}
