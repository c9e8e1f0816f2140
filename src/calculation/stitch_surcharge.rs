//! Stitch-count surcharge lookup.
//!
//! Surcharges are flat per-piece fees keyed by the primary logo's stitch
//! count. Counts above the last tier pay the last tier's fee; the surcharge
//! never grows past the table.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::StitchSurchargeTier;

/// A validated surcharge table, ascending by `max`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StitchSurchargeTable {
    tiers: Vec<StitchSurchargeTier>,
}

impl StitchSurchargeTable {
    /// Validates that `max` is strictly ascending. An empty table is allowed
    /// and charges nothing.
    pub fn new(tiers: Vec<StitchSurchargeTier>) -> EngineResult<Self> {
        for pair in tiers.windows(2) {
            if pair[1].max <= pair[0].max {
                return Err(EngineError::InvalidStitchTable {
                    message: format!(
                        "tier '{}' (max {}) is not above '{}' (max {})",
                        pair[1].name, pair[1].max, pair[0].name, pair[0].max
                    ),
                });
            }
        }
        Ok(Self { tiers })
    }

    /// Returns the rows.
    pub fn tiers(&self) -> &[StitchSurchargeTier] {
        &self.tiers
    }

    /// Returns the tier a stitch count is charged at.
    pub fn tier_for(&self, stitch_count: u32) -> Option<&StitchSurchargeTier> {
        self.tiers
            .iter()
            .find(|tier| stitch_count <= tier.max)
            .or_else(|| self.tiers.last())
    }

    /// Returns the surcharge for a stitch count.
    pub fn surcharge(&self, stitch_count: u32) -> Decimal {
        get_stitch_surcharge(stitch_count, &self.tiers)
    }
}

/// Looks up the surcharge for a stitch count in an ascending tier list.
///
/// ```
/// use embroidery_quote_engine::calculation::get_stitch_surcharge;
/// use embroidery_quote_engine::config::PricingConfig;
/// use rust_decimal::Decimal;
///
/// let tiers = PricingConfig::default().stitch_surcharge_tiers;
/// assert_eq!(get_stitch_surcharge(10_000, &tiers), Decimal::ZERO);
/// assert_eq!(get_stitch_surcharge(10_001, &tiers), Decimal::from(4));
/// assert_eq!(get_stitch_surcharge(60_000, &tiers), Decimal::from(10));
/// ```
pub fn get_stitch_surcharge(stitch_count: u32, tiers: &[StitchSurchargeTier]) -> Decimal {
    tiers
        .iter()
        .find(|tier| stitch_count <= tier.max)
        .or_else(|| tiers.last())
        .map(|tier| tier.fee)
        .unwrap_or(Decimal::ZERO)
}
