//! Quantity tier resolution.
//!
//! A [`TierTable`] is a validated, ordered list of [`PricingTier`] rows that
//! partitions every quantity: quantities below the first row's minimum
//! (zero and negatives included) belong to the first row, and the last row
//! is unbounded.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PricingTier, TierLabel};

/// A validated tier table.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    name: String,
    tiers: Vec<PricingTier>,
}

/// The result of resolving a quantity to a tier.
#[derive(Debug, Clone)]
pub struct TierLookupResult {
    /// The tier the quantity falls in.
    pub tier: PricingTier,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

impl TierTable {
    /// Validates and wraps a list of tier rows.
    ///
    /// The rows must be non-empty, ordered by `min`, contiguous (each row
    /// starts one above the previous row's `max`), use each label once,
    /// and only the last row may be unbounded (and it must be).
    pub fn new(name: &str, tiers: Vec<PricingTier>) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidTierTable {
            table: name.to_string(),
            message,
        };

        if tiers.is_empty() {
            return Err(invalid("table has no tiers".to_string()));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.label) {
                return Err(invalid(format!("label '{}' appears twice", tier.label)));
            }
            if let Some(max) = tier.max {
                if max < tier.min {
                    return Err(invalid(format!(
                        "tier '{}' has max {} below min {}",
                        tier.label, max, tier.min
                    )));
                }
            }
        }

        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let Some(lower_max) = lower.max else {
                return Err(invalid(format!(
                    "unbounded tier '{}' is not the last tier",
                    lower.label
                )));
            };
            if u64::from(upper.min) != u64::from(lower_max) + 1 {
                return Err(invalid(format!(
                    "tier '{}' starts at {} but '{}' ends at {}",
                    upper.label, upper.min, lower.label, lower_max
                )));
            }
        }

        if let Some(last) = tiers.last() {
            if last.max.is_some() {
                return Err(invalid(format!(
                    "highest tier '{}' must be unbounded",
                    last.label
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            tiers,
        })
    }

    /// Returns the table name used in errors and audit steps.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rows, lowest volume first.
    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    // Validation guarantees at least one row.
    fn lowest(&self) -> &PricingTier {
        &self.tiers[0]
    }

    /// The highest-volume (unbounded) tier.
    pub fn highest(&self) -> &PricingTier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Returns the tier containing `quantity`.
    ///
    /// Quantities below the first tier's minimum resolve to the first tier.
    pub fn resolve(&self, quantity: i64) -> &PricingTier {
        if quantity < i64::from(self.lowest().min) {
            return self.lowest();
        }
        self.tiers
            .iter()
            .find(|tier| tier.contains(quantity))
            .unwrap_or_else(|| self.highest())
    }

    /// Returns the row for a label, if the table has one.
    pub fn get(&self, label: TierLabel) -> Option<&PricingTier> {
        self.tiers.iter().find(|tier| tier.label == label)
    }

    /// Embroidery cost of a tier; labels missing from the table fall back to
    /// the highest-volume tier's cost.
    pub fn embroidery_cost(&self, label: TierLabel) -> Decimal {
        self.get(label)
            .unwrap_or_else(|| self.highest())
            .embroidery_cost
    }

    /// Embroidery cost for a display label such as `"24-47"`.
    ///
    /// Unknown labels fall back to the highest-volume tier's cost.
    pub fn embroidery_cost_for_label(&self, label: &str) -> Decimal {
        TierLabel::from_label(label)
            .and_then(|label| self.get(label))
            .unwrap_or_else(|| self.highest())
            .embroidery_cost
    }

    /// Whether the LTM fee applies at a tier. Unknown labels never carry LTM.
    pub fn has_ltm(&self, label: TierLabel) -> bool {
        self.get(label).is_some_and(|tier| tier.has_ltm)
    }
}

/// Resolves a quantity to a tier and records the decision.
pub fn resolve_tier(table: &TierTable, quantity: i64, step_number: u32) -> TierLookupResult {
    let tier = table.resolve(quantity).clone();

    let reasoning = if quantity < i64::from(tier.min) {
        format!(
            "Quantity {} is below the first tier; using '{}' from {}",
            quantity,
            tier.label,
            table.name()
        )
    } else {
        format!(
            "Quantity {} falls in tier '{}' of {}",
            quantity,
            tier.label,
            table.name()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tier_lookup".to_string(),
        rule_name: "Tier Lookup".to_string(),
        input: serde_json::json!({
            "quantity": quantity,
            "table": table.name()
        }),
        output: serde_json::json!({
            "tier": tier.label,
            "embroidery_cost": tier.embroidery_cost.to_string(),
            "has_ltm": tier.has_ltm
        }),
        reasoning,
    };

    TierLookupResult { tier, audit_step }
}
