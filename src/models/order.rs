//! Parsed ShopWorks order models.
//!
//! A [`ParsedOrder`] is built fresh by every parse and never mutated by the
//! engine afterwards. Every collection keeps the order lines appeared in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CustomerSuppliedPrice, ProductCategory};

/// The kind of block a section of the export was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Order number, salesperson and company header.
    OrderHeader,
    /// Customer number and company.
    Customer,
    /// Contact, PO and dates.
    OrderInfo,
    /// Line items.
    Items,
    /// Ship-to address.
    Shipping,
    /// Subtotal, tax, shipping and balance.
    OrderSummary,
    /// Free-text order notes.
    Note,
    /// Anything not recognised.
    Unknown,
}

impl SectionKind {
    /// Returns a display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::OrderHeader => "Order Header",
            SectionKind::Customer => "Customer",
            SectionKind::OrderInfo => "Order Information",
            SectionKind::Items => "Items Purchased",
            SectionKind::Shipping => "Shipping Address",
            SectionKind::OrderSummary => "Order Summary",
            SectionKind::Note => "Note",
            SectionKind::Unknown => "Unknown",
        }
    }
}

/// A service recognised from its part number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Design digitizing setup (DD, DDE, DDT, DGT-…).
    Digitizing,
    /// Additional logo location (AL).
    AdditionalLogo,
    /// Full back embroidery (FB, EJB).
    FullBack,
    /// Cap back embroidery (CB).
    CapBack,
    /// Cap side embroidery (CS).
    CapSide,
    /// Decorating customer-supplied garments (DECG).
    CustomerGarment,
    /// Decorating customer-supplied caps (DECC).
    CustomerCap,
    /// Sewing emblems on (SEG, SECC).
    Sewing,
    /// Design transfer (DT).
    DesignTransfer,
    /// Contract embroidery (CTR-…).
    Contract,
    /// Digital print (CDP…, PALLET).
    DigitalPrint,
    /// Names and monograms.
    Monogram,
    /// Rush service.
    Rush,
    /// Art charge.
    Art,
    /// Patch setup (GRT-50).
    PatchSetup,
    /// Graphic design hours (GRT-75).
    GraphicDesign,
    /// Less-than-minimum fee line (LTM…).
    LessThanMinimum,
    /// Additional stitches (AS-…).
    AdditionalStitches,
    /// Shipping or freight billed as a line.
    Shipping,
    /// Shipping weight placeholder.
    Weight,
}

impl ServiceKind {
    /// Returns a display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Digitizing => "Digitizing",
            ServiceKind::AdditionalLogo => "Additional Logo",
            ServiceKind::FullBack => "Full Back",
            ServiceKind::CapBack => "Cap Back",
            ServiceKind::CapSide => "Cap Side",
            ServiceKind::CustomerGarment => "Customer Supplied Garment",
            ServiceKind::CustomerCap => "Customer Supplied Cap",
            ServiceKind::Sewing => "Sewing",
            ServiceKind::DesignTransfer => "Design Transfer",
            ServiceKind::Contract => "Contract",
            ServiceKind::DigitalPrint => "Digital Print",
            ServiceKind::Monogram => "Monogram",
            ServiceKind::Rush => "Rush",
            ServiceKind::Art => "Art",
            ServiceKind::PatchSetup => "Patch Setup",
            ServiceKind::GraphicDesign => "Graphic Design",
            ServiceKind::LessThanMinimum => "Less Than Minimum",
            ServiceKind::AdditionalStitches => "Additional Stitches",
            ServiceKind::Shipping => "Shipping",
            ServiceKind::Weight => "Weight",
        }
    }
}

/// Why a line item was set aside for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddballReason {
    /// A reserved word used as a part number (GIFT CODE, DISCOUNT, TAX…).
    ReservedPartNumber,
    /// A bare amount used as a part number ("49.99").
    NumericPartNumber,
    /// Characters that never appear in a style number.
    MalformedPartNumber,
}

/// The vendor a non-SanMar part number belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorMatch {
    /// Vendor name.
    pub vendor: String,
    /// Product type sold under the prefix.
    pub product_type: String,
}

/// How a line item was routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineClassification {
    /// A service or fee line.
    ServiceCode {
        /// Which service.
        kind: ServiceKind,
    },
    /// A catalog (SanMar) product.
    Sanmar,
    /// A non-catalog product.
    Custom {
        /// Known vendor, when the prefix is recognised.
        vendor: Option<VendorMatch>,
    },
    /// Needs a human to look at it.
    Oddball {
        /// Why.
        reason: OddballReason,
    },
    /// Blank or comment line.
    Skip,
}

/// Pieces ordered in one size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    /// Normalised size label.
    pub size: String,
    /// Pieces.
    pub quantity: u32,
}

/// A garment or cap line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProduct {
    /// Style number with any size suffix removed.
    pub part_number: String,
    /// Part number as it appeared in the export.
    pub original_part_number: String,
    /// Description, if present.
    pub description: Option<String>,
    /// Color taken from the description.
    pub color: Option<String>,
    /// Unit price billed on the order.
    pub unit_price: Decimal,
    /// Total pieces.
    pub quantity: u32,
    /// Size breakdown.
    pub sizes: Vec<SizeQuantity>,
    /// Garment or cap.
    pub category: ProductCategory,
    /// Vendor for custom products.
    pub vendor: Option<VendorMatch>,
}

/// Any service line, kept as billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    /// Part number as it appeared.
    pub part_number: String,
    /// Recognised service.
    pub kind: ServiceKind,
    /// Description, if present.
    pub description: Option<String>,
    /// Quantity billed.
    pub quantity: u32,
    /// Unit price billed.
    pub unit_price: Decimal,
    /// `unit_price × quantity`.
    pub total: Decimal,
}

/// A one-off service charge such as rush or art.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCharge {
    /// Description from the line.
    pub description: Option<String>,
    /// Amount billed.
    pub amount: Decimal,
}

/// An additional logo location billed on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalLogoService {
    /// Position taken from the description ("Left Sleeve", "Back").
    pub position: String,
    /// Pieces.
    pub quantity: u32,
    /// Unit price billed.
    pub unit_price: Decimal,
    /// Description from the line.
    pub description: Option<String>,
}

/// Names or monograms billed on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monogram {
    /// Description from the line.
    pub description: Option<String>,
    /// Number of names.
    pub quantity: u32,
    /// Standard price per name.
    pub unit_price: Decimal,
    /// `unit_price × quantity`.
    pub total: Decimal,
}

/// Graphic design time billed hourly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicDesign {
    /// Hours billed.
    pub hours: u32,
    /// Hourly rate.
    pub rate: Decimal,
    /// `hours × rate`.
    pub amount: Decimal,
}

/// Customer-supplied goods being decorated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSuppliedItem {
    /// DECG or DECC.
    pub part_number: String,
    /// Description from the line.
    pub description: Option<String>,
    /// Unit price billed on the order.
    pub billed_unit_price: Decimal,
    /// Reference pricing for the same quantity.
    pub pricing: CustomerSuppliedPrice,
}

/// Services found on the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Services {
    /// Whether any digitizing line exists.
    pub digitizing: bool,
    /// Number of digitizing lines.
    pub digitizing_count: u32,
    /// Amount billed per digitizing line.
    pub digitizing_fees: Vec<Decimal>,
    /// Additional logo locations.
    pub additional_logos: Vec<AdditionalLogoService>,
    /// Names and monograms.
    pub monograms: Vec<Monogram>,
    /// Rush service, if ordered.
    pub rush: Option<ServiceCharge>,
    /// Art charge, if billed.
    pub art_charges: Option<ServiceCharge>,
    /// Shipping billed as a line item.
    pub shipping_charge: Option<ServiceCharge>,
    /// LTM fee billed as a line item.
    pub ltm_fee: Option<Decimal>,
    /// Whether patch setup was billed.
    pub patch_setup: bool,
    /// Graphic design hours.
    pub graphic_design: Option<GraphicDesign>,
    /// Customer-supplied goods.
    pub customer_supplied: Vec<CustomerSuppliedItem>,
    /// Every service line, as billed.
    pub lines: Vec<ServiceLine>,
}

/// A line item set aside for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Part number as it appeared.
    pub part_number: String,
    /// Description, if present.
    pub description: Option<String>,
    /// Quantity on the line.
    pub quantity: u32,
    /// Unit price on the line.
    pub unit_price: Decimal,
    /// Why it was set aside.
    pub reason: OddballReason,
}

/// The salesperson on the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesRep {
    /// Name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
}

/// The ordering customer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// ShopWorks customer number.
    pub customer_id: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Person who placed the order.
    pub contact_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// PO, dates and terms.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderInfo {
    /// Customer purchase order number.
    pub po_number: Option<String>,
    /// Date the order was placed.
    pub order_date: Option<NaiveDate>,
    /// Requested ship date.
    pub requested_ship_date: Option<NaiveDate>,
    /// Hard deadline.
    pub drop_dead_date: Option<NaiveDate>,
    /// Payment terms.
    pub payment_terms: Option<String>,
    /// Shipping method.
    pub ship_method: Option<String>,
}

/// Where the order ships.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingInfo {
    /// Recipient line above the street.
    pub ship_to: Option<String>,
    /// Street address.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Two-letter state, upper case.
    pub state: Option<String>,
    /// ZIP code.
    pub zip: Option<String>,
    /// Address lines exactly as they appeared.
    pub raw_address: Option<String>,
}

/// Money totals from the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Subtotal.
    pub subtotal: Decimal,
    /// Sales tax after jurisdiction rules.
    pub sales_tax: Decimal,
    /// Tax rate in percent; `None` when no tax applies.
    pub tax_rate: Option<Decimal>,
    /// Shipping cost.
    pub shipping: Decimal,
    /// Order total.
    pub total: Decimal,
    /// Amount already paid.
    pub paid_to_date: Decimal,
    /// Balance due.
    pub balance: Decimal,
}

/// A design number mentioned in the notes, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignReference {
    /// Number exactly as written ("39719.01").
    pub number: String,
    /// Text after the number, if any.
    pub label: Option<String>,
}

/// A line the parser could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedLine {
    /// Section the line was found in.
    pub section: SectionKind,
    /// The line, trimmed.
    pub line: String,
}

/// Everything extracted from one ShopWorks export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedOrder {
    /// ShopWorks order number.
    pub order_id: Option<String>,
    /// Salesperson.
    pub sales_rep: SalesRep,
    /// Ordering customer.
    pub customer: CustomerInfo,
    /// PO, dates and terms.
    pub order_info: OrderInfo,
    /// Catalog products.
    pub products: Vec<ParsedProduct>,
    /// Non-catalog products.
    pub custom_products: Vec<ParsedProduct>,
    /// Services and fees.
    pub services: Services,
    /// Lines needing review.
    pub oddball_items: Vec<ReviewItem>,
    /// Ship-to address.
    pub shipping: ShippingInfo,
    /// Money totals.
    pub order_summary: OrderSummary,
    /// Comment lines from the item list.
    pub notes: Vec<String>,
    /// Design numbers found in the notes.
    pub design_numbers: Vec<DesignReference>,
    /// The free-text Note section.
    pub order_notes: Option<String>,
    /// Lines the parser could not place.
    pub unmatched_lines: Vec<UnmatchedLine>,
    /// Problems worth surfacing (bad dates, missing sizes).
    pub warnings: Vec<String>,
}

/// Counts for display after an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// ShopWorks order number.
    pub order_id: Option<String>,
    /// Company or contact name.
    pub customer: Option<String>,
    /// Salesperson name.
    pub sales_rep: Option<String>,
    /// Catalog product lines.
    pub product_count: usize,
    /// Custom product lines.
    pub custom_product_count: usize,
    /// Total pieces across products.
    pub total_quantity: u32,
    /// Names of the services present, first occurrence order.
    pub services: Vec<String>,
    /// Lines needing review.
    pub oddball_count: usize,
    /// Notes found.
    pub note_count: usize,
    /// Lines the parser could not place.
    pub unmatched_count: usize,
}

impl ParsedOrder {
    fn all_products(&self) -> impl Iterator<Item = &ParsedProduct> {
        self.products.iter().chain(self.custom_products.iter())
    }

    /// Total pieces across catalog and custom products.
    pub fn total_quantity(&self) -> u32 {
        self.all_products()
            .fold(0u32, |total, p| total.saturating_add(p.quantity))
    }

    /// Pieces of one category.
    pub fn category_quantity(&self, category: ProductCategory) -> u32 {
        self.all_products()
            .filter(|p| p.category == category)
            .fold(0u32, |total, p| total.saturating_add(p.quantity))
    }

    /// Garment pieces.
    pub fn garment_quantity(&self) -> u32 {
        self.category_quantity(ProductCategory::Garment)
    }

    /// Cap pieces.
    pub fn cap_quantity(&self) -> u32 {
        self.category_quantity(ProductCategory::Cap)
    }

    /// Summarises the order for display.
    pub fn summary(&self) -> ImportSummary {
        let mut services: Vec<String> = Vec::new();
        for line in &self.services.lines {
            let name = line.kind.as_str().to_string();
            if !services.contains(&name) {
                services.push(name);
            }
        }

        ImportSummary {
            order_id: self.order_id.clone(),
            customer: self
                .customer
                .company
                .clone()
                .or_else(|| self.customer.contact_name.clone()),
            sales_rep: self.sales_rep.name.clone(),
            product_count: self.products.len(),
            custom_product_count: self.custom_products.len(),
            total_quantity: self.total_quantity(),
            services,
            oddball_count: self.oddball_items.len(),
            note_count: self.notes.len(),
            unmatched_count: self.unmatched_lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(part: &str, quantity: u32, category: ProductCategory) -> ParsedProduct {
        ParsedProduct {
            part_number: part.to_string(),
            original_part_number: part.to_string(),
            description: None,
            color: None,
            unit_price: Decimal::ZERO,
            quantity,
            sizes: vec![],
            category,
            vendor: None,
        }
    }

    fn service(kind: ServiceKind) -> ServiceLine {
        ServiceLine {
            part_number: "X".to_string(),
            kind,
            description: None,
            quantity: 1,
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    #[test]
    fn test_category_quantities_include_custom_products() {
        let order = ParsedOrder {
            products: vec![
                product("PC54", 8, ProductCategory::Garment),
                product("C112", 3, ProductCategory::Cap),
            ],
            custom_products: vec![product("WW3150", 4, ProductCategory::Garment)],
            ..Default::default()
        };

        assert_eq!(order.garment_quantity(), 12);
        assert_eq!(order.cap_quantity(), 3);
        assert_eq!(order.total_quantity(), 15);
    }

    #[test]
    fn test_summary_lists_each_service_once() {
        let mut order = ParsedOrder {
            order_id: Some("140666".to_string()),
            ..Default::default()
        };
        order.customer.contact_name = Some("Jane Doe".to_string());
        order.services.lines = vec![
            service(ServiceKind::Digitizing),
            service(ServiceKind::Rush),
            service(ServiceKind::Digitizing),
        ];

        let summary = order.summary();
        assert_eq!(summary.order_id.as_deref(), Some("140666"));
        assert_eq!(summary.customer.as_deref(), Some("Jane Doe"));
        assert_eq!(summary.services, vec!["Digitizing", "Rush"]);
    }

    #[test]
    fn test_classification_serializes_with_category_tag() {
        let json = serde_json::to_value(LineClassification::Sanmar).unwrap();
        assert_eq!(json["category"], "SANMAR");

        let json = serde_json::to_value(LineClassification::ServiceCode {
            kind: ServiceKind::Digitizing,
        })
        .unwrap();
        assert_eq!(json["category"], "SERVICE_CODE");
        assert_eq!(json["kind"], "digitizing");
    }

    #[test]
    fn test_design_reference_keeps_number_as_text() {
        let reference = DesignReference {
            number: "39719.10".to_string(),
            label: None,
        };
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json["number"], "39719.10");
    }
}
