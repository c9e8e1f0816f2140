//! Configuration types for embroidery pricing and order import.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type has a
//! `Default` carrying the reference values so the engine works without any
//! files on disk.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PricingTier, ProductCategory, RoundingMethod, StitchSurchargeTier, TierLabel};

/// The full pricing parameter set a calculator is built from.
///
/// Loaded from `pricing.yaml`. Validation happens when an
/// [`EmbroideryCalculator`](crate::calculation::EmbroideryCalculator) is
/// constructed, not at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Cost-to-price divisor (0.57 is a 43% margin).
    pub margin_denominator: Decimal,
    /// Flat less-than-minimum fee.
    pub ltm_fee: Decimal,
    /// Garment tiers, lowest volume first.
    pub tiers: Vec<PricingTier>,
    /// Cap tiers, lowest volume first.
    pub cap_tiers: Vec<PricingTier>,
    /// Additional logo price per piece, by garment tier.
    #[serde(default)]
    pub al_tiers: BTreeMap<TierLabel, Decimal>,
    /// Additional logo price per piece, by cap tier.
    #[serde(default)]
    pub cap_al_tiers: BTreeMap<TierLabel, Decimal>,
    /// Flat surcharges by primary logo stitch count.
    #[serde(default)]
    pub stitch_surcharge_tiers: Vec<StitchSurchargeTier>,
    /// Rounding for garments.
    #[serde(default)]
    pub rounding_method: RoundingMethod,
    /// Rounding for caps.
    #[serde(default)]
    pub cap_rounding_method: RoundingMethod,
    /// Stitches included in a garment additional logo.
    pub base_stitch_count: u32,
    /// Stitches included in a cap additional logo.
    pub cap_base_stitch_count: u32,
    /// Granularity stitch counts are rounded to.
    pub stitch_increment: u32,
    /// Price per 1,000 stitches above the garment base.
    pub additional_stitch_rate: Decimal,
    /// Price per 1,000 stitches above the cap base.
    pub cap_additional_stitch_rate: Decimal,
}

impl PricingConfig {
    /// Returns the tier rows for a category.
    pub fn tiers_for(&self, category: ProductCategory) -> &[PricingTier] {
        match category {
            ProductCategory::Garment => &self.tiers,
            ProductCategory::Cap => &self.cap_tiers,
        }
    }

    /// Returns the rounding method for a category.
    pub fn rounding_for(&self, category: ProductCategory) -> RoundingMethod {
        match category {
            ProductCategory::Garment => self.rounding_method,
            ProductCategory::Cap => self.cap_rounding_method,
        }
    }
}

fn tier(label: TierLabel, min: u32, max: Option<u32>, cost: i64, has_ltm: bool) -> PricingTier {
    PricingTier {
        label,
        min,
        max,
        embroidery_cost: Decimal::new(cost, 0),
        has_ltm,
    }
}

fn label_costs(costs: [Decimal; 5]) -> BTreeMap<TierLabel, Decimal> {
    TierLabel::ALL.into_iter().zip(costs).collect()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            margin_denominator: Decimal::new(57, 2),
            ltm_fee: Decimal::new(50, 0),
            tiers: vec![
                tier(TierLabel::Tier1To7, 1, Some(7), 18, true),
                tier(TierLabel::Tier8To23, 8, Some(23), 18, false),
                tier(TierLabel::Tier24To47, 24, Some(47), 14, false),
                tier(TierLabel::Tier48To71, 48, Some(71), 13, false),
                tier(TierLabel::Tier72Plus, 72, None, 12, false),
            ],
            cap_tiers: vec![
                tier(TierLabel::Tier1To7, 1, Some(7), 14, true),
                tier(TierLabel::Tier8To23, 8, Some(23), 14, false),
                tier(TierLabel::Tier24To47, 24, Some(47), 11, false),
                tier(TierLabel::Tier48To71, 48, Some(71), 10, false),
                tier(TierLabel::Tier72Plus, 72, None, 9, false),
            ],
            al_tiers: label_costs([
                Decimal::new(8, 0),
                Decimal::new(8, 0),
                Decimal::new(6, 0),
                Decimal::new(5, 0),
                Decimal::new(4, 0),
            ]),
            cap_al_tiers: label_costs([
                Decimal::new(6, 0),
                Decimal::new(6, 0),
                Decimal::new(5, 0),
                Decimal::new(4, 0),
                Decimal::new(350, 2),
            ]),
            stitch_surcharge_tiers: vec![
                StitchSurchargeTier {
                    name: "Standard".to_string(),
                    max: 10_000,
                    fee: Decimal::ZERO,
                },
                StitchSurchargeTier {
                    name: "Mid".to_string(),
                    max: 15_000,
                    fee: Decimal::new(4, 0),
                },
                StitchSurchargeTier {
                    name: "Large".to_string(),
                    max: 25_000,
                    fee: Decimal::new(10, 0),
                },
            ],
            rounding_method: RoundingMethod::HalfDollarUp,
            cap_rounding_method: RoundingMethod::HalfDollarUp,
            base_stitch_count: 8_000,
            cap_base_stitch_count: 5_000,
            stitch_increment: 1_000,
            additional_stitch_rate: Decimal::new(125, 2),
            cap_additional_stitch_rate: Decimal::new(100, 2),
        }
    }
}

/// A non-SanMar vendor recognised by style prefix or exact style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownVendor {
    /// Vendor name.
    pub vendor: String,
    /// What the vendor supplies.
    pub product_type: String,
    /// Style prefixes ("WW").
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Exact styles ("112").
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Catalog data used to classify part numbers.
///
/// The standard prefix list changes as the SanMar catalog changes, so it
/// is versioned data in `catalog.yaml` rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Version tag of the prefix list.
    pub version: String,
    /// Catalog style prefixes. A part number is standard when it starts
    /// with one of these followed by a digit.
    pub standard_prefixes: Vec<String>,
    /// Vendors of non-catalog products.
    #[serde(default)]
    pub known_vendors: Vec<KnownVendor>,
    /// Extra style prefixes that are always caps.
    #[serde(default)]
    pub cap_prefixes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            version: "2026-01".to_string(),
            standard_prefixes: strings(&[
                "BC", "BG", "C", "CP", "CS", "CSJ", "CSV", "CSW", "CT", "CTJ", "DM", "DT", "EB",
                "F", "G", "J", "JST", "K", "L", "LK", "LM", "LPC", "LST", "NE", "NKD", "OG", "PC",
                "SP", "ST", "STC", "TLJ", "TLK", "TLPC", "TST", "W",
            ]),
            known_vendors: vec![
                KnownVendor {
                    vendor: "Wink".to_string(),
                    product_type: "Scrubs".to_string(),
                    prefixes: strings(&["WW"]),
                    styles: vec![],
                },
                KnownVendor {
                    vendor: "Richardson".to_string(),
                    product_type: "Caps".to_string(),
                    prefixes: vec![],
                    styles: strings(&["110", "112", "115", "168", "258"]),
                },
                KnownVendor {
                    vendor: "Under Armour".to_string(),
                    product_type: "Apparel".to_string(),
                    prefixes: vec![],
                    styles: strings(&["1379757", "1376844"]),
                },
            ],
            cap_prefixes: strings(&["STC"]),
        }
    }
}

/// Settings for the ShopWorks order parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Two-letter state that collects sales tax.
    pub in_state: String,
    /// In-state sales tax rate, in percent.
    pub in_state_tax_rate: Decimal,
    /// Standard price per monogram name.
    pub monogram_price: Decimal,
    /// Hourly graphic design rate.
    pub graphic_design_rate: Decimal,
    /// Additional logo unit price at or above which the line is billed as a
    /// full back.
    pub al_full_back_threshold: Decimal,
    /// Unit price at or above which a Back additional logo is flagged as a
    /// possible full back.
    pub al_back_warning_threshold: Decimal,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            in_state: "WA".to_string(),
            in_state_tax_rate: Decimal::new(101, 1),
            monogram_price: Decimal::new(1250, 2),
            graphic_design_rate: Decimal::new(75, 0),
            al_full_back_threshold: Decimal::new(40, 0),
            al_back_warning_threshold: Decimal::new(10, 0),
        }
    }
}
