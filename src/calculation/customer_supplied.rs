//! Pricing for decorating customer-supplied goods (DECG / DECC).
//!
//! Customer-supplied pieces are priced from a flat per-piece table instead
//! of the margin formula. Caps take 20% off and heavyweight garments add $10.
//! Orders under 24 pieces pay the flat LTM fee.

use rust_decimal::Decimal;

use crate::models::CustomerSuppliedPrice;

/// Quantity below which the LTM fee applies.
pub const CUSTOMER_SUPPLIED_LTM_THRESHOLD: u32 = 24;

/// Flat LTM fee for customer-supplied orders.
pub const CUSTOMER_SUPPLIED_LTM_FEE: i64 = 50;

const HEAVYWEIGHT_SURCHARGE: i64 = 10;

// (minimum quantity, price per piece), highest minimum first
const PRICE_TIERS: [(u32, i64); 7] = [
    (144, 15),
    (72, 25),
    (24, 30),
    (12, 32),
    (6, 38),
    (3, 40),
    (1, 45),
];

/// Base per-piece price for a quantity. Zero pieces price like one.
pub fn customer_supplied_base_price(quantity: u32) -> Decimal {
    let price = PRICE_TIERS
        .iter()
        .find(|(min, _)| quantity >= *min)
        .map(|(_, price)| *price)
        .unwrap_or(PRICE_TIERS[PRICE_TIERS.len() - 1].1);
    Decimal::from(price)
}

/// Prices customer-supplied goods.
///
/// ```
/// use embroidery_quote_engine::calculation::calculate_customer_supplied_price;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let caps = calculate_customer_supplied_price(12, true, false);
/// assert_eq!(caps.unit_price, Decimal::from_str("25.60").unwrap());
/// assert_eq!(caps.ltm_fee, Decimal::from(50));
/// ```
pub fn calculate_customer_supplied_price(
    quantity: u32,
    is_cap: bool,
    is_heavyweight: bool,
) -> CustomerSuppliedPrice {
    let base_price = customer_supplied_base_price(quantity);

    let unit_price = if is_cap {
        (base_price * Decimal::new(8, 1)).round_dp(2)
    } else if is_heavyweight {
        base_price + Decimal::from(HEAVYWEIGHT_SURCHARGE)
    } else {
        base_price
    };

    let ltm_fee = if quantity < CUSTOMER_SUPPLIED_LTM_THRESHOLD {
        Decimal::from(CUSTOMER_SUPPLIED_LTM_FEE)
    } else {
        Decimal::ZERO
    };

    CustomerSuppliedPrice {
        quantity,
        is_cap,
        is_heavyweight,
        base_price,
        unit_price,
        ltm_fee,
        total: unit_price * Decimal::from(quantity) + ltm_fee,
    }
}

/// Whether a description names a heavyweight garment.
pub fn is_heavyweight_description(description: &str) -> bool {
    let d = description.to_lowercase();
    ["heavyweight", "heavy weight", "hoodie", "sweatshirt", "jacket", "fleece"]
        .iter()
        .any(|marker| d.contains(marker))
}
