//! The embroidery calculator.
//!
//! [`EmbroideryCalculator`] owns one validated [`PricingConfig`] and exposes
//! every pricing operation as a method. It holds no mutable state, so one
//! instance can be shared freely between threads or built per session.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PricingConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CustomerSuppliedPrice, LtmSplit, MarginDenominator, PricingTier, ProductCategory, TierLabel,
    UnitPriceRequest, UnitPriceResult,
};

use super::additional_logo::{AdditionalLogoResult, ExtraStitchPolicy, calculate_additional_logo};
use super::customer_supplied::calculate_customer_supplied_price;
use super::ltm::{LtmResult, calculate_ltm, distribute_ltm, ltm_per_piece};
use super::price_formula::{PriceAddons, calculate_decorated_price};
use super::rounding::{PriceValue, round_cap_price, round_price, round_stitch_count};
use super::stitch_surcharge::StitchSurchargeTable;
use super::tier_resolver::{TierTable, resolve_tier};

/// Prices embroidered garments and caps from one immutable configuration.
///
/// # Example
///
/// ```
/// use embroidery_quote_engine::calculation::EmbroideryCalculator;
/// use embroidery_quote_engine::config::PricingConfig;
/// use embroidery_quote_engine::models::TierLabel;
/// use rust_decimal::Decimal;
///
/// let calculator = EmbroideryCalculator::new(PricingConfig::default())?;
///
/// assert_eq!(calculator.get_tier(7), TierLabel::Tier1To7);
/// assert_eq!(calculator.get_embroidery_cost("999+"), Decimal::from(12));
/// assert_eq!(calculator.get_stitch_surcharge(25_000), Decimal::from(10));
/// # Ok::<(), embroidery_quote_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EmbroideryCalculator {
    config: PricingConfig,
    margin: MarginDenominator,
    garment_tiers: TierTable,
    cap_tiers: TierTable,
    stitch_surcharges: StitchSurchargeTable,
}

impl EmbroideryCalculator {
    /// Validates a configuration and builds a calculator.
    ///
    /// # Errors
    ///
    /// - `InvalidMarginDenominator` if the margin is not in `(0, 1]`
    /// - `InvalidTierTable` if either tier table does not partition the quantities
    /// - `InvalidStitchTable` if surcharge tiers are not ascending
    /// - `InvalidStitchIncrement` if the stitch increment is zero
    pub fn new(config: PricingConfig) -> EngineResult<Self> {
        let margin = MarginDenominator::new(config.margin_denominator)?;
        let garment_tiers =
            TierTable::new("tiers", config.tiers_for(ProductCategory::Garment).to_vec())?;
        let cap_tiers =
            TierTable::new("cap_tiers", config.tiers_for(ProductCategory::Cap).to_vec())?;
        let stitch_surcharges = StitchSurchargeTable::new(config.stitch_surcharge_tiers.clone())?;

        if config.stitch_increment == 0 {
            return Err(EngineError::InvalidStitchIncrement);
        }

        Ok(Self {
            config,
            margin,
            garment_tiers,
            cap_tiers,
            stitch_surcharges,
        })
    }

    /// Returns the configuration this calculator was built from.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Returns the tier table of a category.
    pub fn tier_table(&self, category: ProductCategory) -> &TierTable {
        match category {
            ProductCategory::Garment => &self.garment_tiers,
            ProductCategory::Cap => &self.cap_tiers,
        }
    }

    /// Resolves a garment quantity to its tier label.
    pub fn get_tier(&self, quantity: i64) -> TierLabel {
        self.garment_tiers.resolve(quantity).label
    }

    /// Resolves a cap quantity to its tier label.
    pub fn get_cap_tier(&self, quantity: i64) -> TierLabel {
        self.cap_tiers.resolve(quantity).label
    }

    /// Returns a garment tier row.
    pub fn tier(&self, label: TierLabel) -> Option<&PricingTier> {
        self.garment_tiers.get(label)
    }

    /// Returns a cap tier row.
    pub fn cap_tier(&self, label: TierLabel) -> Option<&PricingTier> {
        self.cap_tiers.get(label)
    }

    /// Garment embroidery cost for a display label; unknown labels get the
    /// highest-volume tier's cost.
    pub fn get_embroidery_cost(&self, label: &str) -> Decimal {
        self.garment_tiers.embroidery_cost_for_label(label)
    }

    /// Cap embroidery cost for a display label; unknown labels get the
    /// highest-volume tier's cost.
    pub fn get_cap_embroidery_cost(&self, label: &str) -> Decimal {
        self.cap_tiers.embroidery_cost_for_label(label)
    }

    /// Stitch surcharge for a primary logo.
    pub fn get_stitch_surcharge(&self, stitch_count: u32) -> Decimal {
        self.stitch_surcharges.surcharge(stitch_count)
    }

    /// Rounds a garment price with the garment rounding method.
    pub fn round_price<V: PriceValue>(&self, value: V) -> Option<Decimal> {
        round_price(value, self.config.rounding_method)
    }

    /// Rounds a cap price with the cap rounding method.
    pub fn round_cap_price<V: PriceValue>(&self, value: V) -> Option<Decimal> {
        round_cap_price(value, self.config.cap_rounding_method)
    }

    /// Rounds a stitch count to the configured increment.
    pub fn round_stitch_count(&self, count: u32) -> u32 {
        round_stitch_count(count, self.config.stitch_increment)
    }

    /// LTM share per piece for a category total, or `None` when the total is
    /// not in an LTM tier (or is zero).
    pub fn ltm_per_piece(&self, category: ProductCategory, quantity: u32) -> Option<Decimal> {
        let tier = self.tier_table(category).resolve(i64::from(quantity));
        if !tier.has_ltm {
            return None;
        }
        ltm_per_piece(self.config.ltm_fee, quantity)
    }

    pub(crate) fn evaluate_ltm(
        &self,
        category: ProductCategory,
        quantity: u32,
        step_number: u32,
    ) -> LtmResult {
        let tier = self.tier_table(category).resolve(i64::from(quantity));
        calculate_ltm(category, quantity, tier, self.config.ltm_fee, step_number)
    }

    /// Evaluates LTM for garments and caps independently.
    ///
    /// ```
    /// use embroidery_quote_engine::calculation::EmbroideryCalculator;
    /// use embroidery_quote_engine::config::PricingConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let calculator = EmbroideryCalculator::new(PricingConfig::default()).unwrap();
    /// let split = calculator.distribute_ltm(8, 3);
    ///
    /// assert!(split.garment.is_none());
    /// assert!(split.cap.is_some());
    /// assert_eq!(split.total, Decimal::from(50));
    /// ```
    pub fn distribute_ltm(&self, garment_quantity: u32, cap_quantity: u32) -> LtmSplit {
        let garment = self.evaluate_ltm(ProductCategory::Garment, garment_quantity, 1);
        let cap = self.evaluate_ltm(ProductCategory::Cap, cap_quantity, 2);
        let split = distribute_ltm(&garment, &cap);

        debug!(
            garment_quantity,
            cap_quantity,
            garment_ltm = garment.charge.is_some(),
            cap_ltm = cap.charge.is_some(),
            total = %split.total,
            "LTM distributed"
        );

        split
    }

    /// Prices one decorated piece.
    pub fn unit_price(&self, request: &UnitPriceRequest) -> UnitPriceResult {
        let table = self.tier_table(request.category);
        let lookup = resolve_tier(table, request.quantity, 1);
        let tier = lookup.tier;

        let stitch_surcharge = self.stitch_surcharges.surcharge(request.stitch_count);
        let priced = calculate_decorated_price(
            request.raw_cost,
            self.margin,
            tier.embroidery_cost,
            self.config.rounding_for(request.category),
            PriceAddons {
                stitch_surcharge,
                size_upcharge: request.size_upcharge,
            },
            2,
        );

        debug!(
            category = ?request.category,
            quantity = request.quantity,
            tier = %tier.label,
            raw_cost = %request.raw_cost,
            unit_price = %priced.unit_price,
            "unit price calculated"
        );

        UnitPriceResult {
            tier: tier.label,
            garment_cost: priced.garment_cost,
            embroidery_cost: tier.embroidery_cost,
            base_decorated_price: priced.base_decorated_price,
            rounded_base: priced.rounded_base,
            stitch_surcharge: priced.stitch_surcharge,
            size_upcharge: priced.size_upcharge,
            unit_price: priced.unit_price,
            audit_steps: vec![lookup.audit_step, priced.audit_step],
        }
    }

    fn al_prices(&self, category: ProductCategory) -> &BTreeMap<TierLabel, Decimal> {
        match category {
            ProductCategory::Garment => &self.config.al_tiers,
            ProductCategory::Cap => &self.config.cap_al_tiers,
        }
    }

    /// AL price for a tier; labels missing from the table fall back to the
    /// highest-volume entry, and an empty table prices at zero.
    pub fn al_tier_price(&self, category: ProductCategory, label: TierLabel) -> Decimal {
        let prices = self.al_prices(category);
        prices
            .get(&label)
            .or_else(|| prices.values().next_back())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn extra_stitch_policy(&self, category: ProductCategory) -> ExtraStitchPolicy {
        match category {
            ProductCategory::Garment => ExtraStitchPolicy {
                base_stitch_count: self.config.base_stitch_count,
                increment: self.config.stitch_increment,
                rate_per_thousand: self.config.additional_stitch_rate,
            },
            ProductCategory::Cap => ExtraStitchPolicy {
                base_stitch_count: self.config.cap_base_stitch_count,
                increment: self.config.stitch_increment,
                rate_per_thousand: self.config.cap_additional_stitch_rate,
            },
        }
    }

    /// Prices an additional logo for a category total.
    pub fn additional_logo_price(
        &self,
        category: ProductCategory,
        quantity: i64,
        stitch_count: u32,
    ) -> AdditionalLogoResult {
        let label = self.tier_table(category).resolve(quantity).label;
        calculate_additional_logo(
            category,
            label,
            self.al_tier_price(category, label),
            stitch_count,
            &self.extra_stitch_policy(category),
            1,
        )
    }

    /// Prices decoration of customer-supplied goods.
    pub fn customer_supplied_price(
        &self,
        quantity: u32,
        is_cap: bool,
        is_heavyweight: bool,
    ) -> CustomerSuppliedPrice {
        calculate_customer_supplied_price(quantity, is_cap, is_heavyweight)
    }
}
