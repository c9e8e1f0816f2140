//! Merging products that ShopWorks split across several lines.

use tracing::debug;

use crate::models::ParsedProduct;

fn merge_key(product: &ParsedProduct) -> (String, Option<String>) {
    (
        product.part_number.to_ascii_uppercase(),
        product.color.as_deref().map(str::to_lowercase),
    )
}

/// Merges products with the same part number and color (color compared
/// without case), summing their sizes. Output keeps first-seen order and
/// each merged quantity is recomputed from its sizes.
///
/// Products that differ only in color stay separate.
pub fn consolidate_products(products: &[ParsedProduct]) -> Vec<ParsedProduct> {
    let mut merged: Vec<ParsedProduct> = Vec::with_capacity(products.len());

    for product in products {
        let key = merge_key(product);
        match merged.iter_mut().find(|m| merge_key(m) == key) {
            Some(existing) => {
                for size in &product.sizes {
                    match existing.sizes.iter_mut().find(|s| s.size == size.size) {
                        Some(s) => s.quantity = s.quantity.saturating_add(size.quantity),
                        None => existing.sizes.push(size.clone()),
                    }
                }
                existing.quantity = if existing.sizes.is_empty() {
                    existing.quantity.saturating_add(product.quantity)
                } else {
                    existing
                        .sizes
                        .iter()
                        .fold(0u32, |total, s| total.saturating_add(s.quantity))
                };
            }
            None => merged.push(product.clone()),
        }
    }

    if merged.len() != products.len() {
        debug!(
            before = products.len(),
            after = merged.len(),
            "consolidated split SKUs"
        );
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductCategory, SizeQuantity};
    use rust_decimal::Decimal;

    fn product(part: &str, color: Option<&str>, sizes: &[(&str, u32)]) -> ParsedProduct {
        let sizes: Vec<SizeQuantity> = sizes
            .iter()
            .map(|(size, quantity)| SizeQuantity {
                size: size.to_string(),
                quantity: *quantity,
            })
            .collect();
        ParsedProduct {
            part_number: part.to_string(),
            original_part_number: part.to_string(),
            description: None,
            color: color.map(str::to_string),
            unit_price: Decimal::from(20),
            quantity: sizes
                .iter()
                .fold(0u32, |total, s| total.saturating_add(s.quantity)),
            sizes,
            category: ProductCategory::Garment,
            vendor: None,
        }
    }

    #[test]
    fn test_merges_size_split_lines() {
        let products = vec![
            product("PC61LS", Some("Navy"), &[("S", 2), ("M", 4), ("L", 6)]),
            product("PC61LS", Some("navy"), &[("3XL", 1)]),
            product("PC61LS", Some("Navy"), &[("M", 1)]),
        ];

        let merged = consolidate_products(&products);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 14);
        let sizes: Vec<(&str, u32)> = merged[0]
            .sizes
            .iter()
            .map(|s| (s.size.as_str(), s.quantity))
            .collect();
        assert_eq!(sizes, vec![("S", 2), ("M", 5), ("L", 6), ("3XL", 1)]);
    }

    #[test]
    fn test_different_colors_stay_separate() {
        let products = vec![
            product("K500", Some("Black"), &[("L", 3)]),
            product("K500", Some("Stone"), &[("L", 2)]),
            product("K500", Some("Black"), &[("XL", 1)]),
        ];

        let merged = consolidate_products(&products);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].color.as_deref(), Some("Black"));
        assert_eq!(merged[0].quantity, 4);
        assert_eq!(merged[1].color.as_deref(), Some("Stone"));
        assert_eq!(merged[1].quantity, 2);
    }

    #[test]
    fn test_products_without_sizes_sum_quantities() {
        let mut a = product("WW3150", None, &[]);
        a.quantity = 3;
        let mut b = product("WW3150", None, &[]);
        b.quantity = 2;

        let merged = consolidate_products(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 5);
    }

    #[test]
    fn test_merged_quantities_saturate() {
        let products = vec![
            product("PC54", Some("Navy"), &[("S", 4_000_000_000)]),
            product("PC54", Some("Navy"), &[("S", 4_000_000_000), ("M", 1)]),
        ];

        let merged = consolidate_products(&products);
        assert_eq!(merged[0].sizes[0].quantity, u32::MAX);
        assert_eq!(merged[0].quantity, u32::MAX);

        let mut a = product("WW3150", None, &[]);
        a.quantity = u32::MAX;
        let mut b = product("WW3150", None, &[]);
        b.quantity = 2;
        assert_eq!(consolidate_products(&[a, b])[0].quantity, u32::MAX);
    }
}
