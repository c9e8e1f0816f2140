//! Quote result models.
//!
//! This module contains the request and result shapes for pricing a single
//! piece and a whole quote, together with the audit trail each calculation
//! records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductCategory, TierLabel};

/// A single step in the audit trace recording a pricing decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated while pricing a quote.
///
/// Warnings never stop a quote from being priced; they flag lines a human
/// should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a quote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pricing steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during pricing.
    pub warnings: Vec<AuditWarning>,
}

/// Input for pricing one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceRequest {
    /// Garment or cap; selects the tier table and rounding method.
    pub category: ProductCategory,
    /// Quantity used for tier resolution (the category total of the order).
    pub quantity: i64,
    /// Raw garment cost from the catalog.
    pub raw_cost: Decimal,
    /// Primary logo stitch count.
    pub stitch_count: u32,
    /// Per-size upcharge (2XL and up), added after rounding.
    #[serde(default)]
    pub size_upcharge: Decimal,
}

/// The breakdown of a single decorated piece price.
///
/// # Example
///
/// ```
/// use embroidery_quote_engine::calculation::EmbroideryCalculator;
/// use embroidery_quote_engine::config::PricingConfig;
/// use embroidery_quote_engine::models::{ProductCategory, TierLabel, UnitPriceRequest};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let calculator = EmbroideryCalculator::new(PricingConfig::default()).unwrap();
/// let result = calculator.unit_price(&UnitPriceRequest {
///     category: ProductCategory::Garment,
///     quantity: 3,
///     raw_cost: Decimal::from_str("12.00").unwrap(),
///     stitch_count: 8000,
///     size_upcharge: Decimal::ZERO,
/// });
///
/// assert_eq!(result.tier, TierLabel::Tier1To7);
/// assert_eq!(result.unit_price, Decimal::from_str("39.50").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceResult {
    /// The resolved tier.
    pub tier: TierLabel,
    /// `raw_cost / margin_denominator`, unrounded.
    pub garment_cost: Decimal,
    /// Decoration cost of the tier.
    pub embroidery_cost: Decimal,
    /// `garment_cost + embroidery_cost`, unrounded.
    pub base_decorated_price: Decimal,
    /// The base after the single rounding step.
    pub rounded_base: Decimal,
    /// Flat stitch surcharge added after rounding.
    pub stitch_surcharge: Decimal,
    /// Size upcharge added after rounding.
    pub size_upcharge: Decimal,
    /// `rounded_base + stitch_surcharge + size_upcharge`.
    pub unit_price: Decimal,
    /// How the price was reached.
    pub audit_steps: Vec<AuditStep>,
}

/// The less-than-minimum fee charged to one product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtmCharge {
    /// Category the fee is charged to.
    pub category: ProductCategory,
    /// Pieces in the category.
    pub quantity: u32,
    /// The flat fee.
    pub fee: Decimal,
    /// `fee / quantity`, rounded to cents.
    pub per_piece: Decimal,
}

/// LTM evaluated for garments and caps independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LtmSplit {
    /// Charge on the garment group, if it falls in an LTM tier.
    pub garment: Option<LtmCharge>,
    /// Charge on the cap group, if it falls in an LTM tier.
    pub cap: Option<LtmCharge>,
    /// Sum of the flat fees charged.
    pub total: Decimal,
}

impl LtmSplit {
    /// Returns the charge for a category.
    pub fn for_category(&self, category: ProductCategory) -> Option<&LtmCharge> {
        match category {
            ProductCategory::Garment => self.garment.as_ref(),
            ProductCategory::Cap => self.cap.as_ref(),
        }
    }
}

/// One size of a product in a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSize {
    /// Size label ("S", "2XL", "OSFA").
    pub size: String,
    /// Pieces of this size.
    pub quantity: u32,
    /// Raw catalog cost of this size.
    pub raw_cost: Decimal,
    /// Upcharge for this size.
    #[serde(default)]
    pub upcharge: Decimal,
}

/// A product in a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteProduct {
    /// Style number ("PC54", "C112").
    pub style: String,
    /// Color name, if known.
    #[serde(default)]
    pub color: Option<String>,
    /// Garment or cap.
    pub category: ProductCategory,
    /// Sizes ordered.
    pub sizes: Vec<QuoteSize>,
}

/// An additional logo location requested for a whole category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalLogoRequest {
    /// Category the logo goes on. Every piece of the category gets it.
    pub category: ProductCategory,
    /// Stitch count of the additional logo.
    pub stitch_count: u32,
}

/// A full quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Products to price.
    pub products: Vec<QuoteProduct>,
    /// Primary logo stitch count on garments.
    pub garment_stitch_count: u32,
    /// Primary logo stitch count on caps.
    pub cap_stitch_count: u32,
    /// Additional logo locations.
    #[serde(default)]
    pub additional_logos: Vec<AdditionalLogoRequest>,
}

/// A priced size line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    /// Style number.
    pub style: String,
    /// Color name, if known.
    pub color: Option<String>,
    /// Garment or cap.
    pub category: ProductCategory,
    /// Size label.
    pub size: String,
    /// Pieces on this line.
    pub quantity: u32,
    /// Tier the category total resolved to.
    pub tier: TierLabel,
    /// Decorated price per piece, without LTM.
    pub unit_price: Decimal,
    /// LTM share per piece (zero when no LTM applies).
    pub ltm_per_piece: Decimal,
    /// `unit_price + ltm_per_piece`, the price shown to the customer.
    pub unit_price_with_ltm: Decimal,
    /// `unit_price × quantity`.
    pub line_total: Decimal,
}

/// A priced additional logo location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalLogoLine {
    /// Category the logo goes on.
    pub category: ProductCategory,
    /// Stitch count as requested.
    pub stitch_count: u32,
    /// Pieces that carry the logo.
    pub quantity: u32,
    /// Price per piece.
    pub unit_price: Decimal,
    /// `unit_price × quantity`.
    pub line_total: Decimal,
}

/// Flat per-piece pricing for decorating customer-supplied goods (DECG/DECC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSuppliedPrice {
    /// Pieces being decorated.
    pub quantity: u32,
    /// Whether the goods are caps.
    pub is_cap: bool,
    /// Whether the goods are heavyweight (Carhartt jackets, bags).
    pub is_heavyweight: bool,
    /// Tier price before cap discount and heavyweight surcharge.
    pub base_price: Decimal,
    /// Price per piece after adjustments.
    pub unit_price: Decimal,
    /// Flat LTM fee (zero at 24 pieces and up).
    pub ltm_fee: Decimal,
    /// `unit_price × quantity + ltm_fee`.
    pub total: Decimal,
}

/// Aggregated totals for a quote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteTotals {
    /// Garment pieces.
    pub garment_quantity: u32,
    /// Cap pieces.
    pub cap_quantity: u32,
    /// Sum of product line totals.
    pub subtotal: Decimal,
    /// Sum of additional logo line totals.
    pub additional_logo_total: Decimal,
    /// Sum of LTM fees.
    pub ltm_total: Decimal,
    /// `subtotal + additional_logo_total + ltm_total`.
    pub grand_total: Decimal,
}

/// The complete result of pricing a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// One line per product size.
    pub lines: Vec<QuoteLine>,
    /// One line per additional logo location.
    pub additional_logos: Vec<AdditionalLogoLine>,
    /// LTM per category.
    pub ltm: LtmSplit,
    /// Aggregated totals.
    pub totals: QuoteTotals,
    /// Complete audit trace of pricing decisions.
    pub audit_trace: AuditTrace,
}
