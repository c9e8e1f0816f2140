//! Part-number classification.
//!
//! Every line item is routed by its part number alone: service codes first
//! (exact codes before prefixes), then reserved words and bare amounts that
//! need review, then catalog styles, then known vendors. Anything left is a
//! custom product, unless its characters could never form a style number.

use crate::config::CatalogConfig;
use crate::models::{LineClassification, OddballReason, ProductCategory, ServiceKind, VendorMatch};

use super::items::split_size_suffix;

const EXACT_SERVICE_CODES: [(&str, ServiceKind); 27] = [
    ("DD", ServiceKind::Digitizing),
    ("DDE", ServiceKind::Digitizing),
    ("DDT", ServiceKind::Digitizing),
    ("DD-CAP", ServiceKind::Digitizing),
    ("AL", ServiceKind::AdditionalLogo),
    ("FB", ServiceKind::FullBack),
    ("EJB", ServiceKind::FullBack),
    ("CB", ServiceKind::CapBack),
    ("CS", ServiceKind::CapSide),
    ("DECG", ServiceKind::CustomerGarment),
    ("DECC", ServiceKind::CustomerCap),
    ("SEG", ServiceKind::Sewing),
    ("SECC", ServiceKind::Sewing),
    ("DT", ServiceKind::DesignTransfer),
    ("PALLET", ServiceKind::DigitalPrint),
    ("MONOGRAM", ServiceKind::Monogram),
    ("NAME", ServiceKind::Monogram),
    ("NAMES", ServiceKind::Monogram),
    ("RUSH", ServiceKind::Rush),
    ("ART", ServiceKind::Art),
    ("ART-CHARGE", ServiceKind::Art),
    ("GRT-50", ServiceKind::PatchSetup),
    ("GRT-75", ServiceKind::GraphicDesign),
    ("SHIPPING", ServiceKind::Shipping),
    ("FREIGHT", ServiceKind::Shipping),
    ("WEIGHT", ServiceKind::Weight),
    ("NAME/NUMBER", ServiceKind::Monogram),
];

const SERVICE_PREFIXES: [(&str, ServiceKind); 5] = [
    ("DGT-", ServiceKind::Digitizing),
    ("CTR-", ServiceKind::Contract),
    ("CDP", ServiceKind::DigitalPrint),
    ("AS-", ServiceKind::AdditionalStitches),
    ("LTM", ServiceKind::LessThanMinimum),
];

const RESERVED_PART_NUMBERS: [&str; 8] = [
    "GIFT CODE",
    "GIFT CARD",
    "DISCOUNT",
    "TAX",
    "TOTAL",
    "SUBTOTAL",
    "TEST",
    "CREDIT",
];

/// Recognises a service code, ignoring case.
pub fn service_kind(part_number: &str) -> Option<ServiceKind> {
    let code = part_number.trim().to_ascii_uppercase();

    EXACT_SERVICE_CODES
        .iter()
        .find(|(exact, _)| *exact == code)
        .or_else(|| {
            SERVICE_PREFIXES
                .iter()
                .find(|(prefix, _)| code.starts_with(prefix))
        })
        .map(|(_, kind)| *kind)
}

fn starts_with_prefix_then_digit(style: &str, prefix: &str) -> bool {
    style
        .strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Whether a part number is a catalog (SanMar) style: a standard prefix
/// followed by a digit, after any size suffix is removed.
pub fn is_standard_part(part_number: &str, catalog: &CatalogConfig) -> bool {
    let (style, _) = split_size_suffix(part_number.trim());
    let style = style.to_ascii_uppercase();
    catalog
        .standard_prefixes
        .iter()
        .any(|prefix| starts_with_prefix_then_digit(&style, &prefix.to_ascii_uppercase()))
}

/// Looks a non-catalog part number up in the known-vendor table.
pub fn identify_vendor(part_number: &str, catalog: &CatalogConfig) -> Option<VendorMatch> {
    let (style, _) = split_size_suffix(part_number.trim());
    let style = style.to_ascii_uppercase();

    catalog
        .known_vendors
        .iter()
        .find(|v| {
            v.styles.iter().any(|s| s.eq_ignore_ascii_case(&style))
                || v.prefixes
                    .iter()
                    .any(|p| style.starts_with(&p.to_ascii_uppercase()))
        })
        .map(|v| VendorMatch {
            vendor: v.vendor.clone(),
            product_type: v.product_type.clone(),
        })
}

fn is_numeric_amount(part_number: &str) -> bool {
    part_number.chars().any(|c| c.is_ascii_digit())
        && (part_number.contains('.') || part_number.starts_with('$'))
        && part_number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '$'))
}

fn is_malformed(part_number: &str) -> bool {
    part_number
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ' ' | '&')))
}

/// Routes a line item by its part number.
///
/// ```
/// use embroidery_quote_engine::config::CatalogConfig;
/// use embroidery_quote_engine::models::{LineClassification, OddballReason};
/// use embroidery_quote_engine::parser::classify_part_number;
///
/// let catalog = CatalogConfig::default();
/// assert_eq!(classify_part_number(Some("PC54"), &catalog), LineClassification::Sanmar);
/// assert_eq!(
///     classify_part_number(Some("49.99"), &catalog),
///     LineClassification::Oddball { reason: OddballReason::NumericPartNumber }
/// );
/// assert_eq!(classify_part_number(None, &catalog), LineClassification::Skip);
/// ```
pub fn classify_part_number(
    part_number: Option<&str>,
    catalog: &CatalogConfig,
) -> LineClassification {
    let part = part_number.map(str::trim).unwrap_or("");
    if part.is_empty() || part.starts_with('#') || part.starts_with("//") {
        return LineClassification::Skip;
    }

    if let Some(kind) = service_kind(part) {
        return LineClassification::ServiceCode { kind };
    }

    let upper = part.to_ascii_uppercase();
    if RESERVED_PART_NUMBERS.contains(&upper.as_str()) {
        return LineClassification::Oddball {
            reason: OddballReason::ReservedPartNumber,
        };
    }
    if is_numeric_amount(part) {
        return LineClassification::Oddball {
            reason: OddballReason::NumericPartNumber,
        };
    }

    if is_standard_part(part, catalog) {
        return LineClassification::Sanmar;
    }
    if let Some(vendor) = identify_vendor(part, catalog) {
        return LineClassification::Custom {
            vendor: Some(vendor),
        };
    }
    if is_malformed(part) {
        return LineClassification::Oddball {
            reason: OddballReason::MalformedPartNumber,
        };
    }

    LineClassification::Custom { vendor: None }
}

/// Garment or cap, from the style and description plus the catalog's
/// extra cap prefixes.
pub fn detect_category(
    style: &str,
    description: Option<&str>,
    catalog: &CatalogConfig,
) -> ProductCategory {
    let upper = style.trim().to_ascii_uppercase();
    if catalog
        .cap_prefixes
        .iter()
        .any(|p| upper.starts_with(&p.to_ascii_uppercase()))
    {
        return ProductCategory::Cap;
    }
    ProductCategory::detect(style, description)
}

/// The logo position named in an additional-logo description.
pub fn additional_logo_position(description: Option<&str>) -> String {
    const POSITIONS: [(&str, &str); 10] = [
        ("left sleeve", "Left Sleeve"),
        ("right sleeve", "Right Sleeve"),
        ("left chest", "Left Chest"),
        ("right chest", "Right Chest"),
        ("back yoke", "Back Yoke"),
        ("center back", "Center Back"),
        ("cap back", "Cap Back"),
        ("cap left", "Cap Left"),
        ("cap right", "Cap Right"),
        ("back", "Back"),
    ];

    let lower = description.unwrap_or("").to_lowercase();
    POSITIONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, position)| position.to_string())
        .unwrap_or_else(|| "Additional Location".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(part: &str) -> LineClassification {
        classify_part_number(Some(part), &CatalogConfig::default())
    }

    fn service(kind: ServiceKind) -> LineClassification {
        LineClassification::ServiceCode { kind }
    }

    fn oddball(reason: OddballReason) -> LineClassification {
        LineClassification::Oddball { reason }
    }

    #[test]
    fn test_service_codes_exact_before_prefix() {
        assert_eq!(classify("dd"), service(ServiceKind::Digitizing));
        assert_eq!(classify("DGT-002"), service(ServiceKind::Digitizing));
        assert_eq!(classify("CS"), service(ServiceKind::CapSide));
        assert_eq!(classify("DT"), service(ServiceKind::DesignTransfer));
        assert_eq!(classify("CDP 5x5"), service(ServiceKind::DigitalPrint));
        assert_eq!(classify("CTR-GARMT"), service(ServiceKind::Contract));
        assert_eq!(classify("LTM"), service(ServiceKind::LessThanMinimum));
        assert_eq!(classify("Name/Number"), service(ServiceKind::Monogram));
        assert_eq!(classify("GRT-75"), service(ServiceKind::GraphicDesign));
        assert_eq!(classify("WEIGHT"), service(ServiceKind::Weight));
    }

    #[test]
    fn test_catalog_styles_need_prefix_then_digit() {
        assert_eq!(classify("PC54"), LineClassification::Sanmar);
        assert_eq!(classify("CS410"), LineClassification::Sanmar);
        assert_eq!(classify("DT6000"), LineClassification::Sanmar);
        assert_eq!(classify("PC61LS_3X"), LineClassification::Sanmar);
        assert_eq!(classify("k500"), LineClassification::Sanmar);
        assert_eq!(classify("PCX"), LineClassification::Custom { vendor: None });
    }

    /// PARSE-003: Anything not on the catalog list is custom, with its vendor when known
    #[test]
    fn test_custom_products_and_vendors() {
        let wink = LineClassification::Custom {
            vendor: Some(VendorMatch {
                vendor: "Wink".to_string(),
                product_type: "Scrubs".to_string(),
            }),
        };
        assert_eq!(classify("WW3150"), wink);
        assert_eq!(classify("ww3160_2X"), wink);

        match classify("112") {
            LineClassification::Custom { vendor: Some(v) } => assert_eq!(v.vendor, "Richardson"),
            other => panic!("expected Richardson, got {:?}", other),
        }
        assert_eq!(classify("ABC123"), LineClassification::Custom { vendor: None });
    }

    /// PARSE-004: Reserved words and bare amounts go to review, never products
    #[test]
    fn test_oddball_part_numbers() {
        assert_eq!(classify("GIFT CODE"), oddball(OddballReason::ReservedPartNumber));
        assert_eq!(classify("Discount"), oddball(OddballReason::ReservedPartNumber));
        assert_eq!(classify("49.99"), oddball(OddballReason::NumericPartNumber));
        assert_eq!(classify("$20"), oddball(OddballReason::NumericPartNumber));
        assert_eq!(classify("HAT*2"), oddball(OddballReason::MalformedPartNumber));
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(classify("   "), LineClassification::Skip);
        assert_eq!(classify("# comment"), LineClassification::Skip);
        assert_eq!(classify("// pickup"), LineClassification::Skip);
    }

    #[test]
    fn test_detect_category_uses_cap_prefixes() {
        let catalog = CatalogConfig::default();
        assert_eq!(detect_category("STC10", None, &catalog), ProductCategory::Cap);
        assert_eq!(detect_category("C112", None, &catalog), ProductCategory::Cap);
        assert_eq!(
            detect_category("112", Some("Richardson Trucker Cap, Black"), &catalog),
            ProductCategory::Cap
        );
        assert_eq!(
            detect_category("PC54", Some("Core Tee, Navy"), &catalog),
            ProductCategory::Garment
        );
    }

    #[test]
    fn test_additional_logo_position() {
        assert_eq!(additional_logo_position(Some("AL - Left Sleeve")), "Left Sleeve");
        assert_eq!(additional_logo_position(Some("Full BACK logo")), "Back");
        assert_eq!(additional_logo_position(Some("Center Back")), "Center Back");
        assert_eq!(additional_logo_position(None), "Additional Location");
    }
}
