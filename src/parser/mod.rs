//! ShopWorks order export parser.
//!
//! [`ShopWorksParser::parse`] turns one plaintext export into a
//! [`ParsedOrder`]. Parsing never fails: lines it cannot place are reported
//! in `unmatched_lines`, and part numbers that cannot be products are set
//! aside as review items.
//!
//! ```
//! use embroidery_quote_engine::parser::ShopWorksParser;
//!
//! let text = "Order #:140666\n\
//!             **********\n\
//!             Items Purchased\n\
//!             Item 1 of 1\n\
//!             Part Number:PC54\n\
//!             Description:Core Cotton Tee, Navy\n\
//!             Unit Price:$18.00\n\
//!             Item Quantity:12";
//! let order = ShopWorksParser::default().parse(text);
//! assert_eq!(order.order_id.as_deref(), Some("140666"));
//! assert_eq!(order.products[0].quantity, 12);
//! ```

mod address;
mod classify;
mod consolidate;
mod items;
mod sections;
mod summary;

pub use address::parse_city_state_zip;
pub use classify::{
    additional_logo_position, classify_part_number, detect_category, identify_vendor,
    is_standard_part, service_kind,
};
pub use consolidate::consolidate_products;
pub use items::{RawItem, extract_color, normalize_size, parse_items, split_size_suffix};
pub use sections::{classify_section, extract_design_references, split_sections};
pub use summary::{RawSummary, apply_tax_rules, parse_money, parse_order_summary};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{calculate_customer_supplied_price, is_heavyweight_description};
use crate::config::{CatalogConfig, ParserConfig};
use crate::models::{
    AdditionalLogoService, CustomerSuppliedItem, DesignReference, GraphicDesign,
    LineClassification, Monogram, ParsedOrder, ParsedProduct, ProductCategory, ReviewItem,
    SectionKind, ServiceCharge, ServiceKind, ServiceLine, VendorMatch,
};

fn collect_design_numbers(order: &ParsedOrder) -> Vec<DesignReference> {
    let mut found: Vec<DesignReference> = Vec::new();
    for text in order.notes.iter().chain(order.order_notes.iter()) {
        for reference in extract_design_references(text) {
            if !found.iter().any(|r| r.number == reference.number) {
                found.push(reference);
            }
        }
    }
    found
}

/// Parses ShopWorks exports against a catalog and tax settings.
///
/// The parser holds only configuration; each call to [`parse`](Self::parse)
/// builds a fresh order.
#[derive(Debug, Clone, Default)]
pub struct ShopWorksParser {
    catalog: CatalogConfig,
    config: ParserConfig,
}

impl ShopWorksParser {
    /// Creates a parser.
    pub fn new(catalog: CatalogConfig, config: ParserConfig) -> Self {
        Self { catalog, config }
    }

    /// The catalog used for classification.
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Tax and service settings.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one export.
    pub fn parse(&self, text: &str) -> ParsedOrder {
        let mut order = ParsedOrder::default();
        let mut raw_summary = RawSummary::default();

        for section in split_sections(text) {
            let kind = classify_section(section);
            debug!(
                section = kind.as_str(),
                lines = section.lines().count(),
                "recognised section"
            );

            match kind {
                SectionKind::OrderHeader => sections::parse_header(section, &mut order),
                SectionKind::Customer => sections::parse_customer(section, &mut order),
                SectionKind::OrderInfo => sections::parse_order_info(section, &mut order),
                SectionKind::Items => {
                    for item in parse_items(section, &mut order.unmatched_lines) {
                        self.route_item(item, &mut order);
                    }
                }
                SectionKind::Shipping => address::parse_shipping(section, &mut order),
                SectionKind::OrderSummary => {
                    raw_summary = parse_order_summary(section, &mut order.unmatched_lines);
                }
                SectionKind::Note => {
                    if let Some(note) = sections::parse_note(section) {
                        order.order_notes = Some(match order.order_notes.take() {
                            Some(existing) => format!("{existing}\n{note}"),
                            None => note,
                        });
                    }
                }
                SectionKind::Unknown => sections::report_unknown(section, &mut order),
            }
        }

        order.order_summary =
            apply_tax_rules(&raw_summary, order.shipping.state.as_deref(), &self.config);

        if order.customer.email.is_none() {
            order.customer.email =
                sections::extract_email_fallback(text, order.sales_rep.email.as_deref());
        }

        order.design_numbers = collect_design_numbers(&order);

        for line in &order.unmatched_lines {
            warn!(section = line.section.as_str(), line = %line.line, "unmatched line");
        }

        info!(
            order_id = order.order_id.as_deref().unwrap_or(""),
            products = order.products.len(),
            custom_products = order.custom_products.len(),
            services = order.services.lines.len(),
            oddballs = order.oddball_items.len(),
            unmatched = order.unmatched_lines.len(),
            "parsed ShopWorks order"
        );

        order
    }

    fn route_item(&self, item: RawItem, order: &mut ParsedOrder) {
        if item.quantity_capped {
            let part_number = item.part_number.as_deref().unwrap_or_default();
            warn!(part_number, "size quantities capped");
            order.warnings.push(format!(
                "{}: size quantities exceed {} and were capped",
                part_number,
                u32::MAX
            ));
        }

        let classification = classify_part_number(item.part_number.as_deref(), &self.catalog);

        match classification {
            LineClassification::Skip => {
                if let Some(description) = item.description {
                    order.notes.push(description);
                }
            }
            LineClassification::ServiceCode { kind } => self.apply_service(kind, item, order),
            LineClassification::Oddball { reason } => {
                let part_number = item.part_number.unwrap_or_default();
                warn!(part_number = %part_number, ?reason, "line item set aside for review");
                order.oddball_items.push(ReviewItem {
                    quantity: item.item_quantity,
                    unit_price: item.unit_price,
                    description: item.description,
                    part_number,
                    reason,
                });
            }
            LineClassification::Sanmar => {
                let product = self.build_product(item, None, order);
                order.products.push(product);
            }
            LineClassification::Custom { vendor } => {
                let product = self.build_product(item, vendor, order);
                order.custom_products.push(product);
            }
        }
    }

    fn build_product(
        &self,
        item: RawItem,
        vendor: Option<VendorMatch>,
        order: &mut ParsedOrder,
    ) -> ParsedProduct {
        let original = item.part_number.clone().unwrap_or_default();
        let (style, _) = split_size_suffix(&original);
        let quantity = item.quantity();

        if !item.sizes.is_empty() && item.item_quantity > 0 && item.item_quantity != quantity {
            order.warnings.push(format!(
                "{}: sizes total {} but item quantity is {}",
                original, quantity, item.item_quantity
            ));
        }

        ParsedProduct {
            category: detect_category(&style, item.description.as_deref(), &self.catalog),
            color: item.description.as_deref().and_then(extract_color),
            part_number: style,
            original_part_number: original,
            description: item.description,
            unit_price: item.unit_price,
            quantity,
            sizes: item.sizes,
            vendor,
        }
    }

    fn apply_service(&self, kind: ServiceKind, item: RawItem, order: &mut ParsedOrder) {
        // A service line with no quantity is a single charge.
        let quantity = match item.quantity() {
            0 => 1,
            q => q,
        };
        let part_number = item.part_number.clone().unwrap_or_default();
        let total = match item.unit_price.checked_mul(Decimal::from(quantity)) {
            Some(total) => total,
            None => {
                order.warnings.push(format!(
                    "{}: {} x ${} is out of range and was capped",
                    part_number, quantity, item.unit_price
                ));
                item.unit_price.saturating_mul(Decimal::from(quantity))
            }
        };

        // An additional logo priced like a full back is one.
        let kind = if kind == ServiceKind::AdditionalLogo
            && item.unit_price >= self.config.al_full_back_threshold
        {
            debug!(
                part_number = %part_number,
                unit_price = %item.unit_price,
                "additional logo billed as full back"
            );
            ServiceKind::FullBack
        } else {
            kind
        };

        let services = &mut order.services;
        let charge = || ServiceCharge {
            description: item.description.clone(),
            amount: total,
        };

        match kind {
            ServiceKind::Digitizing => {
                services.digitizing = true;
                services.digitizing_count += 1;
                services.digitizing_fees.push(total);
            }
            ServiceKind::AdditionalLogo => {
                let position = additional_logo_position(item.description.as_deref());
                if position == "Back" && item.unit_price >= self.config.al_back_warning_threshold {
                    let message = format!(
                        "{} x{} on the Back at ${} may be Full Back (DECG-FB) rather than an additional logo",
                        part_number, quantity, item.unit_price
                    );
                    warn!(%message, "additional logo priced like a full back");
                    order.warnings.push(message);
                }
                services.additional_logos.push(AdditionalLogoService {
                    position,
                    quantity,
                    unit_price: item.unit_price,
                    description: item.description.clone(),
                });
            }
            ServiceKind::Monogram => {
                let unit_price = self.config.monogram_price;
                services.monograms.push(Monogram {
                    description: item.description.clone(),
                    quantity,
                    unit_price,
                    total: unit_price.saturating_mul(Decimal::from(quantity)),
                });
            }
            ServiceKind::Rush => services.rush = Some(charge()),
            ServiceKind::Art => services.art_charges = Some(charge()),
            ServiceKind::Shipping => services.shipping_charge = Some(charge()),
            ServiceKind::LessThanMinimum => {
                services.ltm_fee =
                    Some(services.ltm_fee.unwrap_or(Decimal::ZERO).saturating_add(total));
            }
            ServiceKind::PatchSetup => services.patch_setup = true,
            ServiceKind::GraphicDesign => {
                let rate = self.config.graphic_design_rate;
                services.graphic_design = Some(GraphicDesign {
                    hours: quantity,
                    rate,
                    amount: rate.saturating_mul(Decimal::from(quantity)),
                });
            }
            ServiceKind::CustomerGarment | ServiceKind::CustomerCap => {
                let description = item.description.as_deref();
                let is_cap = kind == ServiceKind::CustomerCap
                    || description.is_some_and(|d| {
                        ProductCategory::detect("", Some(d)) == ProductCategory::Cap
                    });
                let is_heavyweight =
                    !is_cap && description.is_some_and(is_heavyweight_description);
                services.customer_supplied.push(CustomerSuppliedItem {
                    part_number: part_number.clone(),
                    description: item.description.clone(),
                    billed_unit_price: item.unit_price,
                    pricing: calculate_customer_supplied_price(quantity, is_cap, is_heavyweight),
                });
            }
            ServiceKind::FullBack
            | ServiceKind::CapBack
            | ServiceKind::CapSide
            | ServiceKind::Sewing
            | ServiceKind::DesignTransfer
            | ServiceKind::Contract
            | ServiceKind::DigitalPrint
            | ServiceKind::AdditionalStitches
            | ServiceKind::Weight => {}
        }

        services.lines.push(ServiceLine {
            part_number,
            kind,
            description: item.description,
            quantity,
            unit_price: item.unit_price,
            total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(part: &str, description: &str, unit_price: &str, quantity: u32) -> String {
        format!(
            "Part Number:{part}\nDescription:{description}\nUnit Price:{unit_price}\nItem Quantity:{quantity}\n"
        )
    }

    fn items_section(items: &[String]) -> String {
        let mut section = String::from("Items Purchased\n");
        for (i, body) in items.iter().enumerate() {
            section.push_str(&format!("Item {} of {}\n{}", i + 1, items.len(), body));
        }
        section
    }

    fn parse(items: &[String]) -> ParsedOrder {
        ShopWorksParser::default().parse(&items_section(items))
    }

    /// PARSE-001: Services are recognised from their part numbers
    #[test]
    fn test_services_are_collected() {
        let order = parse(&[
            item("DD", "Digitizing", "$100.00", 1),
            item("DGT-002", "Digitizing revision", "$50.00", 1),
            item("RUSH", "Rush service", "$25.00", 1),
            item("ART", "Art charge", "$30.00", 0),
            item("AL", "Additional logo - Left Sleeve", "$8.00", 12),
            item("Monogram", "Names on chest", "$10.00", 4),
            item("LTM", "Less than minimum", "$50.00", 1),
            item("GRT-75", "Graphic design", "$75.00", 2),
            item("GRT-50", "Patch setup", "$50.00", 1),
        ]);

        let services = &order.services;
        assert!(services.digitizing);
        assert_eq!(services.digitizing_count, 2);
        assert_eq!(services.digitizing_fees, vec![dec("100.00"), dec("50.00")]);
        assert_eq!(services.rush.as_ref().map(|r| r.amount), Some(dec("25.00")));
        assert_eq!(services.art_charges.as_ref().map(|a| a.amount), Some(dec("30.00")));
        assert_eq!(services.additional_logos[0].position, "Left Sleeve");
        assert_eq!(services.additional_logos[0].quantity, 12);
        assert_eq!(services.monograms[0].unit_price, dec("12.50"));
        assert_eq!(services.monograms[0].total, dec("50.00"));
        assert_eq!(services.ltm_fee, Some(dec("50.00")));
        assert!(services.patch_setup);
        let design = services.graphic_design.as_ref().unwrap();
        assert_eq!(design.hours, 2);
        assert_eq!(design.amount, dec("150"));
        assert_eq!(services.lines.len(), 9);
        assert!(order.products.is_empty());
    }

    #[test]
    fn test_customer_supplied_lines_are_priced() {
        let order = parse(&[
            item("DECG", "Customer hoodies", "$40.00", 10),
            item("DECC", "Customer caps", "$30.00", 30),
        ]);

        let supplied = &order.services.customer_supplied;
        assert_eq!(supplied.len(), 2);
        assert!(supplied[0].pricing.is_heavyweight);
        assert_eq!(supplied[0].pricing.unit_price, dec("48"));
        assert_eq!(supplied[0].pricing.ltm_fee, dec("50"));
        assert!(supplied[1].pricing.is_cap);
        assert_eq!(supplied[1].pricing.unit_price, dec("24.00"));
        assert_eq!(supplied[1].pricing.ltm_fee, Decimal::ZERO);
    }

    /// PARSE-006: a Back logo at $12.50 stays an additional logo but is flagged
    #[test]
    fn test_back_logo_priced_high_is_flagged() {
        let order = parse(&[item("AL", "Back Logo", "$12.50", 30)]);

        let logos = &order.services.additional_logos;
        assert_eq!(logos.len(), 1);
        assert_eq!(logos[0].position, "Back");
        assert_eq!(logos[0].quantity, 30);
        assert_eq!(logos[0].unit_price, dec("12.50"));

        let warning = order
            .warnings
            .iter()
            .find(|w| w.contains("may be Full Back"))
            .expect("back logo warning");
        assert!(warning.contains("DECG-FB"));
        assert!(warning.contains("$12.5"));
    }

    #[test]
    fn test_cheap_back_logo_is_not_flagged() {
        let order = parse(&[item("AL", "Back Logo \"AM\"", "$5.00", 31)]);

        assert_eq!(order.services.additional_logos.len(), 1);
        assert!(order.warnings.iter().all(|w| !w.contains("may be Full Back")));
    }

    /// PARSE-007: an additional logo at $40 or more is billed as a full back
    #[test]
    fn test_full_back_priced_logo_is_reclassified() {
        let order = parse(&[item("AL", "Full back logo", "$45.00", 12)]);

        assert!(order.services.additional_logos.is_empty());
        let line = &order.services.lines[0];
        assert_eq!(line.kind, ServiceKind::FullBack);
        assert_eq!(line.part_number, "AL");
        assert_eq!(line.total, dec("540.00"));
    }

    #[test]
    fn test_full_back_threshold_follows_config() {
        let config = ParserConfig {
            al_full_back_threshold: dec("60"),
            ..ParserConfig::default()
        };
        let parser = ShopWorksParser::new(CatalogConfig::default(), config);
        let order = parser.parse(&items_section(&[item("AL", "Left Sleeve", "$45.00", 12)]));

        assert_eq!(order.services.additional_logos.len(), 1);
        assert_eq!(order.services.lines[0].kind, ServiceKind::AdditionalLogo);
    }

    #[test]
    fn test_repeated_size_rows_past_u32_are_capped() {
        let body = format!(
            "{}Adult:Quantity\nS:4000000000\nS:4000000000\n",
            item("PC54", "Core Cotton Tee, Navy", "$20.00", 0)
        );
        let order = parse(&[body]);

        assert_eq!(order.products[0].quantity, u32::MAX);
        assert_eq!(order.products[0].sizes[0].quantity, u32::MAX);
        assert!(order.warnings.iter().any(|w| w.contains("were capped")));
    }

    #[test]
    fn test_distinct_size_rows_past_u32_are_capped() {
        let body = format!(
            "{}Adult:Quantity\nS:4000000000\nM:4000000000\n",
            item("PC54", "Core Cotton Tee, Navy", "$20.00", 0)
        );
        let order = parse(&[body]);

        assert_eq!(order.products[0].quantity, u32::MAX);
        assert_eq!(order.total_quantity(), u32::MAX);
        assert!(order.warnings.iter().any(|w| w.contains("were capped")));
    }

    #[test]
    fn test_service_total_out_of_range_is_capped() {
        let body = format!(
            "{}Adult:Quantity\nS:4000000000\n",
            item("RUSH", "Rush", "$79228162514264337593543950335", 0)
        );
        let order = parse(&[body]);

        assert_eq!(order.services.rush.as_ref().map(|r| r.amount), Some(Decimal::MAX));
        assert!(order.warnings.iter().any(|w| w.contains("out of range")));
    }

    #[test]
    fn test_products_split_by_classification() {
        let order = parse(&[
            item("PC54_2X", "Core Cotton Tee, Navy", "$20.00", 2),
            item("WW3150", "Wink Scrub Top, Ceil Blue", "$28.00", 4),
            item("C112", "Snapback Trucker Cap, Grey/Black", "$15.00", 6),
        ]);

        assert_eq!(order.products.len(), 2);
        let tee = &order.products[0];
        assert_eq!(tee.part_number, "PC54");
        assert_eq!(tee.original_part_number, "PC54_2X");
        assert_eq!(tee.color.as_deref(), Some("Navy"));
        assert_eq!(tee.sizes[0].size, "2XL");
        assert_eq!(tee.category, ProductCategory::Garment);
        assert_eq!(order.products[1].category, ProductCategory::Cap);

        assert_eq!(order.custom_products.len(), 1);
        let scrubs = &order.custom_products[0];
        assert_eq!(scrubs.vendor.as_ref().map(|v| v.vendor.as_str()), Some("Wink"));
        assert_eq!(scrubs.quantity, 4);

        assert_eq!(order.garment_quantity(), 6);
        assert_eq!(order.cap_quantity(), 6);
    }

    #[test]
    fn test_oddballs_and_notes() {
        let order = parse(&[
            item("GIFT CODE", "Holiday gift code", "$-25.00", 1),
            item("49.99", "Unknown", "$49.99", 1),
            "Description:PICKUP - Design #39719.01 Front\n".to_string(),
        ]);

        assert_eq!(order.oddball_items.len(), 2);
        assert_eq!(order.oddball_items[0].part_number, "GIFT CODE");
        assert_eq!(order.notes, vec!["PICKUP - Design #39719.01 Front"]);
        assert_eq!(order.design_numbers.len(), 1);
        assert_eq!(order.design_numbers[0].number, "39719.01");
        assert_eq!(order.design_numbers[0].label.as_deref(), Some("Front"));
    }

    #[test]
    fn test_size_mismatch_is_warned() {
        let body = format!(
            "{}Adult:Quantity\nS:2\nM:2\n",
            item("PC54", "Core Cotton Tee, Navy", "$20.00", 5)
        );
        let order = parse(&[body]);
        assert_eq!(order.products[0].quantity, 4);
        assert_eq!(order.warnings.len(), 1);
    }

    #[test]
    fn test_parse_never_fails_on_garbage() {
        let order = ShopWorksParser::default().parse("just some text\n**********\n***");
        assert_eq!(order.order_id, None);
        assert_eq!(order.unmatched_lines.len(), 2);
        assert_eq!(order.order_summary.sales_tax, Decimal::ZERO);
    }
}
