//! Whole-quote pricing.
//!
//! Garments and caps are priced from their own category totals: the tier,
//! rounding method and LTM decision of one category never depend on the
//! other. Line totals exclude LTM; the flat fee is carried once in the
//! totals so per-piece rounding never drifts the charged amount.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::models::{
    AdditionalLogoLine, AuditStep, AuditTrace, AuditWarning, ProductCategory, QuoteLine,
    QuoteRequest, QuoteResult, QuoteTotals, UnitPriceRequest,
};

use super::calculator::EmbroideryCalculator;
use super::ltm::distribute_ltm;

fn push_step(trace: &mut AuditTrace, mut step: AuditStep) {
    step.step_number = trace.steps.len() as u32 + 1;
    trace.steps.push(step);
}

fn push_warning(trace: &mut AuditTrace, code: &str, message: String, severity: &str) {
    warn!(code, %message, "quote warning");
    trace.warnings.push(AuditWarning {
        code: code.to_string(),
        message,
        severity: severity.to_string(),
    });
}

impl EmbroideryCalculator {
    /// Prices every size line of a quote.
    ///
    /// # Example
    ///
    /// ```
    /// use embroidery_quote_engine::calculation::EmbroideryCalculator;
    /// use embroidery_quote_engine::config::PricingConfig;
    /// use embroidery_quote_engine::models::{ProductCategory, QuoteProduct, QuoteRequest, QuoteSize};
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let calculator = EmbroideryCalculator::new(PricingConfig::default()).unwrap();
    /// let quote = calculator.price_quote(&QuoteRequest {
    ///     products: vec![QuoteProduct {
    ///         style: "PC54".to_string(),
    ///         color: Some("Navy".to_string()),
    ///         category: ProductCategory::Garment,
    ///         sizes: vec![QuoteSize {
    ///             size: "L".to_string(),
    ///             quantity: 3,
    ///             raw_cost: Decimal::from_str("12.00").unwrap(),
    ///             upcharge: Decimal::ZERO,
    ///         }],
    ///     }],
    ///     garment_stitch_count: 8000,
    ///     cap_stitch_count: 5000,
    ///     additional_logos: vec![],
    /// });
    ///
    /// assert_eq!(quote.lines[0].unit_price_with_ltm, Decimal::from_str("56.17").unwrap());
    /// assert_eq!(quote.totals.grand_total, Decimal::from_str("168.50").unwrap());
    /// ```
    pub fn price_quote(&self, request: &QuoteRequest) -> QuoteResult {
        let mut trace = AuditTrace::default();

        let category_total = |category: ProductCategory| -> u64 {
            request
                .products
                .iter()
                .filter(|p| p.category == category)
                .flat_map(|p| p.sizes.iter())
                .map(|s| u64::from(s.quantity))
                .sum()
        };
        let mut capped_total = |category: ProductCategory| -> u32 {
            let total = category_total(category);
            u32::try_from(total).unwrap_or_else(|_| {
                push_warning(
                    &mut trace,
                    "QUANTITY_OVERFLOW",
                    format!("{:?} quantity {} capped at {}", category, total, u32::MAX),
                    "high",
                );
                u32::MAX
            })
        };
        let garment_quantity = capped_total(ProductCategory::Garment);
        let cap_quantity = capped_total(ProductCategory::Cap);

        let garment_ltm = self.evaluate_ltm(ProductCategory::Garment, garment_quantity, 0);
        let cap_ltm = self.evaluate_ltm(ProductCategory::Cap, cap_quantity, 0);
        let ltm = distribute_ltm(&garment_ltm, &cap_ltm);
        push_step(&mut trace, garment_ltm.audit_step);
        push_step(&mut trace, cap_ltm.audit_step);

        let mut lines = Vec::new();
        for product in &request.products {
            if product.sizes.iter().all(|s| s.quantity == 0) {
                push_warning(
                    &mut trace,
                    "EMPTY_PRODUCT",
                    format!("{} has no pieces and was not priced", product.style),
                    "low",
                );
                continue;
            }

            let (quantity, stitch_count) = match product.category {
                ProductCategory::Garment => (garment_quantity, request.garment_stitch_count),
                ProductCategory::Cap => (cap_quantity, request.cap_stitch_count),
            };
            let ltm_per_piece = ltm
                .for_category(product.category)
                .map(|c| c.per_piece)
                .unwrap_or(Decimal::ZERO);

            for size in product.sizes.iter().filter(|s| s.quantity > 0) {
                let priced = self.unit_price(&UnitPriceRequest {
                    category: product.category,
                    quantity: i64::from(quantity),
                    raw_cost: size.raw_cost,
                    stitch_count,
                    size_upcharge: size.upcharge,
                });
                for step in priced.audit_steps {
                    push_step(&mut trace, step);
                }

                lines.push(QuoteLine {
                    style: product.style.clone(),
                    color: product.color.clone(),
                    category: product.category,
                    size: size.size.clone(),
                    quantity: size.quantity,
                    tier: priced.tier,
                    unit_price: priced.unit_price,
                    ltm_per_piece,
                    unit_price_with_ltm: priced.unit_price.saturating_add(ltm_per_piece),
                    line_total: priced.unit_price.saturating_mul(Decimal::from(size.quantity)),
                });
            }
        }

        let mut additional_logos = Vec::new();
        for logo in &request.additional_logos {
            let quantity = match logo.category {
                ProductCategory::Garment => garment_quantity,
                ProductCategory::Cap => cap_quantity,
            };
            if quantity == 0 {
                push_warning(
                    &mut trace,
                    "ADDITIONAL_LOGO_WITHOUT_PIECES",
                    format!("Additional logo requested on {:?} but none are ordered", logo.category),
                    "medium",
                );
                continue;
            }

            let priced =
                self.additional_logo_price(logo.category, i64::from(quantity), logo.stitch_count);
            push_step(&mut trace, priced.audit_step);

            additional_logos.push(AdditionalLogoLine {
                category: logo.category,
                stitch_count: logo.stitch_count,
                quantity,
                unit_price: priced.unit_price,
                line_total: priced.unit_price.saturating_mul(Decimal::from(quantity)),
            });
        }

        let subtotal = lines
            .iter()
            .fold(Decimal::ZERO, |sum, l| sum.saturating_add(l.line_total));
        let additional_logo_total = additional_logos
            .iter()
            .fold(Decimal::ZERO, |sum, l| sum.saturating_add(l.line_total));
        let totals = QuoteTotals {
            garment_quantity,
            cap_quantity,
            subtotal,
            additional_logo_total,
            ltm_total: ltm.total,
            grand_total: subtotal
                .saturating_add(additional_logo_total)
                .saturating_add(ltm.total),
        };

        info!(
            lines = lines.len(),
            garment_quantity,
            cap_quantity,
            ltm_total = %totals.ltm_total,
            grand_total = %totals.grand_total,
            "quote priced"
        );

        QuoteResult {
            lines,
            additional_logos,
            ltm,
            totals,
            audit_trace: trace,
        }
    }
}
