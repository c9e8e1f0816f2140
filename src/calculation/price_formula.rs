//! Decorated unit price formula.
//!
//! The steps run in a fixed order:
//!
//! 1. `garment_cost = raw_cost / margin_denominator`
//! 2. `base = garment_cost + embroidery_cost`
//! 3. `rounded_base = round(base)`, the only rounding step
//! 4. `unit_price = rounded_base + stitch_surcharge + size_upcharge`
//!
//! Surcharges and upcharges are added after rounding and stay unrounded, so
//! the base price is always on the half-dollar (or dollar) grid while the
//! add-ons may carry cents.

use rust_decimal::Decimal;

use crate::models::{AuditStep, MarginDenominator, RoundingMethod};

use super::rounding::round_decimal;

/// Per-piece amounts added after rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceAddons {
    /// Flat stitch surcharge.
    pub stitch_surcharge: Decimal,
    /// Size upcharge.
    pub size_upcharge: Decimal,
}

/// The result of the decorated price formula.
#[derive(Debug, Clone)]
pub struct DecoratedPriceResult {
    /// `raw_cost / margin_denominator`.
    pub garment_cost: Decimal,
    /// `garment_cost + embroidery_cost`.
    pub base_decorated_price: Decimal,
    /// The base after rounding.
    pub rounded_base: Decimal,
    /// Stitch surcharge added.
    pub stitch_surcharge: Decimal,
    /// Size upcharge added.
    pub size_upcharge: Decimal,
    /// Final per-piece price.
    pub unit_price: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes a decorated unit price.
///
/// # Example
///
/// ```
/// use embroidery_quote_engine::calculation::{PriceAddons, calculate_decorated_price};
/// use embroidery_quote_engine::models::{MarginDenominator, RoundingMethod};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let margin = MarginDenominator::new(Decimal::from_str("0.57").unwrap()).unwrap();
/// let result = calculate_decorated_price(
///     Decimal::from_str("12.00").unwrap(),
///     margin,
///     Decimal::from_str("18.00").unwrap(),
///     RoundingMethod::HalfDollarUp,
///     PriceAddons::default(),
///     1,
/// );
///
/// assert_eq!(result.rounded_base, Decimal::from_str("39.50").unwrap());
/// ```
pub fn calculate_decorated_price(
    raw_cost: Decimal,
    margin: MarginDenominator,
    embroidery_cost: Decimal,
    rounding: RoundingMethod,
    addons: PriceAddons,
    step_number: u32,
) -> DecoratedPriceResult {
    let garment_cost = margin.apply(raw_cost);
    let base_decorated_price = garment_cost.saturating_add(embroidery_cost);
    let rounded_base = round_decimal(base_decorated_price, rounding);
    let unit_price = rounded_base
        .saturating_add(addons.stitch_surcharge)
        .saturating_add(addons.size_upcharge);

    let audit_step = AuditStep {
        step_number,
        rule_id: "decorated_price".to_string(),
        rule_name: "Decorated Price".to_string(),
        input: serde_json::json!({
            "raw_cost": raw_cost.to_string(),
            "margin_denominator": margin.value().to_string(),
            "embroidery_cost": embroidery_cost.to_string(),
            "rounding_method": rounding.as_str(),
            "stitch_surcharge": addons.stitch_surcharge.to_string(),
            "size_upcharge": addons.size_upcharge.to_string()
        }),
        output: serde_json::json!({
            "garment_cost": garment_cost.round_dp(4).to_string(),
            "base_decorated_price": base_decorated_price.round_dp(4).to_string(),
            "rounded_base": rounded_base.to_string(),
            "unit_price": unit_price.to_string()
        }),
        reasoning: format!(
            "${} / {} + ${} = ${}, rounded {} to ${}, plus ${} stitch surcharge and ${} size upcharge = ${}",
            raw_cost,
            margin.value(),
            embroidery_cost,
            base_decorated_price.round_dp(2),
            rounding.as_str(),
            rounded_base,
            addons.stitch_surcharge,
            addons.size_upcharge,
            unit_price
        ),
    };

    DecoratedPriceResult {
        garment_cost,
        base_decorated_price,
        rounded_base,
        stitch_surcharge: addons.stitch_surcharge,
        size_upcharge: addons.size_upcharge,
        unit_price,
        audit_step,
    }
}
