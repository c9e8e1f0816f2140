//! Item blocks inside the Items Purchased section.
//!
//! Each item starts with an `Item N of M` marker and carries its part
//! number, description, unit price and quantity, followed by size rows
//! under an `Adult:Quantity` style heading.

use rust_decimal::Decimal;

use crate::models::{SectionKind, SizeQuantity, UnmatchedLine};

use super::sections::{is_title, labeled_value};
use super::summary::parse_money;

// ShopWorks size aliases, matched after upper-casing.
const SIZE_ALIASES: [(&str, &str); 24] = [
    ("SM", "S"),
    ("MD", "M"),
    ("LG", "L"),
    ("XXL", "2XL"),
    ("XXXL", "3XL"),
    ("XXXXL", "4XL"),
    ("XXXXXL", "5XL"),
    ("2X", "2XL"),
    ("3X", "3XL"),
    ("4X", "4XL"),
    ("5X", "5XL"),
    ("6X", "6XL"),
    ("O/S", "OSFA"),
    ("OS", "OSFA"),
    ("ONE SIZE", "OSFA"),
    ("XXLT", "2XLT"),
    ("XXXLT", "3XLT"),
    ("S/M", "S/M"),
    ("M/L", "M/L"),
    ("L/XL", "L/XL"),
    ("SMALL", "S"),
    ("MEDIUM", "M"),
    ("LARGE", "L"),
    ("X-LARGE", "XL"),
];

// Sizes ShopWorks appends to a part number.
const SIZE_SUFFIXES: [&str; 22] = [
    "_2XLT", "_3XLT", "_4XLT", "_5XLT", "_XLT", "_LT", "_XLR", "_LR", "_SR", "_MR", "_XXL",
    "_OSFA", "_S/M", "_M/L", "_L/XL", "_2X", "_3X", "_4X", "_5X", "_6X", "_XS", "_NB",
];

const SIZE_HEADINGS: [&str; 3] = ["Adult:Quantity", "Youth:Quantity", "Other:Quantity"];

/// One item block as read from the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    /// Part number as written.
    pub part_number: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Unit price.
    pub unit_price: Decimal,
    /// The `Item Quantity:` value.
    pub item_quantity: u32,
    /// Size rows with a positive quantity, sizes normalised.
    pub sizes: Vec<SizeQuantity>,
    /// Set when the size rows add up past `u32::MAX` and were capped there.
    pub quantity_capped: bool,
}

impl RawItem {
    /// Pieces on the line: the size rows when present, else the item quantity.
    pub fn quantity(&self) -> u32 {
        if self.sizes.is_empty() {
            self.item_quantity
        } else {
            self.sizes
                .iter()
                .fold(0u32, |total, s| total.saturating_add(s.quantity))
        }
    }
}

/// Normalises a ShopWorks size label.
///
/// ```
/// use embroidery_quote_engine::parser::normalize_size;
///
/// assert_eq!(normalize_size("xxl"), Some("2XL".to_string()));
/// assert_eq!(normalize_size("LG (Other)"), Some("L".to_string()));
/// assert_eq!(normalize_size("   "), None);
/// ```
pub fn normalize_size(raw: &str) -> Option<String> {
    let upper = raw.to_uppercase().replace("(OTHER)", "");
    let size = upper.trim();
    if size.is_empty() {
        return None;
    }
    let normalized = SIZE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == size)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(size);
    Some(normalized.to_string())
}

/// Splits a size suffix off a part number: `PC61LS_3X` → (`PC61LS`, `3XL`).
pub fn split_size_suffix(part_number: &str) -> (String, Option<String>) {
    let upper = part_number.to_ascii_uppercase();
    for suffix in SIZE_SUFFIXES {
        if upper.ends_with(suffix) && upper.len() > suffix.len() {
            let base = &part_number[..part_number.len() - suffix.len()];
            return (base.to_string(), normalize_size(&suffix[1..]));
        }
    }
    (part_number.to_string(), None)
}

/// The color after the last comma of a description, if any.
pub fn extract_color(description: &str) -> Option<String> {
    let (_, color) = description.rsplit_once(',')?;
    let color = color.trim();
    (!color.is_empty()).then(|| color.to_string())
}

fn is_item_marker(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("Item ") else {
        return false;
    };
    let Some((n, m)) = rest.split_once(" of ") else {
        return false;
    };
    let is_number = |s: &str| !s.trim().is_empty() && s.trim().chars().all(|c| c.is_ascii_digit());
    is_number(n) && is_number(m)
}

/// Adds a size row, merging repeats. Returns `false` when the merged
/// quantity had to be capped.
fn push_size(sizes: &mut Vec<SizeQuantity>, size: String, quantity: u32) -> bool {
    match sizes.iter_mut().find(|s| s.size == size) {
        Some(existing) => match existing.quantity.checked_add(quantity) {
            Some(total) => {
                existing.quantity = total;
                true
            }
            None => {
                existing.quantity = u32::MAX;
                false
            }
        },
        None => {
            sizes.push(SizeQuantity { size, quantity });
            true
        }
    }
}

fn report(unmatched: &mut Vec<UnmatchedLine>, line: &str) {
    unmatched.push(UnmatchedLine {
        section: SectionKind::Items,
        line: line.to_string(),
    });
}

fn parse_size_row(line: &str) -> Option<(String, u32)> {
    let (size, quantity) = line.rsplit_once(':')?;
    let quantity: u32 = quantity.trim().parse().ok()?;
    Some((normalize_size(size)?, quantity))
}

fn parse_block(lines: &[&str], unmatched: &mut Vec<UnmatchedLine>) -> Option<RawItem> {
    let mut item = RawItem::default();
    let mut in_sizes = false;

    for line in lines {
        if is_title(line, &["Items Purchased"]) {
            continue;
        }
        if SIZE_HEADINGS.iter().any(|h| line.eq_ignore_ascii_case(h)) {
            in_sizes = true;
            continue;
        }

        if let Some(v) = labeled_value(line, "Part Number:") {
            item.part_number = (!v.is_empty()).then(|| v.to_string());
            in_sizes = false;
        } else if let Some(v) = labeled_value(line, "Description:") {
            item.description = (!v.is_empty()).then(|| v.to_string());
            in_sizes = false;
        } else if let Some(v) = labeled_value(line, "Unit Price:") {
            item.unit_price = parse_money(v).unwrap_or(Decimal::ZERO);
            in_sizes = false;
        } else if let Some(v) = labeled_value(line, "Item Quantity:") {
            item.item_quantity = v.parse().unwrap_or(0);
            in_sizes = false;
        } else if in_sizes {
            match parse_size_row(line) {
                Some((size, quantity)) if quantity > 0 => {
                    if !push_size(&mut item.sizes, size, quantity) {
                        item.quantity_capped = true;
                    }
                }
                Some(_) => {}
                None => report(unmatched, line),
            }
        } else {
            report(unmatched, line);
        }
    }

    if item.part_number.is_none() && item.description.is_none() {
        return None;
    }

    let size_total = item
        .sizes
        .iter()
        .try_fold(0u32, |total, s| total.checked_add(s.quantity));
    if size_total.is_none() {
        item.quantity_capped = true;
    }

    // A size carried in the part number replaces placeholder size rows.
    let suffix_size = item
        .part_number
        .as_deref()
        .and_then(|part| split_size_suffix(part).1);
    if let Some(size) = suffix_size {
        if item.item_quantity > 0 {
            item.sizes = vec![SizeQuantity {
                size,
                quantity: item.item_quantity,
            }];
        }
    }

    Some(item)
}

/// Reads every item block of an Items Purchased section.
///
/// Blocks with neither a part number nor a description are dropped; other
/// unrecognised lines are reported to `unmatched`.
pub fn parse_items(section: &str, unmatched: &mut Vec<UnmatchedLine>) -> Vec<RawItem> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_item_marker(line) {
            blocks.push(Vec::new());
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
        .iter()
        .filter(|block| !block.is_empty())
        .filter_map(|block| parse_block(block, unmatched))
        .collect()
}
