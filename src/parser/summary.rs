//! Order summary amounts and sales tax rules.
//!
//! Raw amounts are read as written; [`apply_tax_rules`] then decides what
//! tax actually applies from the ship-to state. Out-of-state orders carry an
//! explicit zero, whatever the export says.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ParserConfig;
use crate::models::{OrderSummary, SectionKind, UnmatchedLine};

use super::sections::{is_title, labeled_value};

/// Amounts exactly as the Order Summary section lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSummary {
    /// Subtotal.
    pub subtotal: Decimal,
    /// Sales tax, when a tax line was present.
    pub sales_tax: Option<Decimal>,
    /// Shipping.
    pub shipping: Decimal,
    /// Order total.
    pub total: Decimal,
    /// Paid to date.
    pub paid_to_date: Decimal,
    /// Balance due.
    pub balance: Decimal,
}

/// Parses a money amount such as `$1,019,456.50` or `(12.00)`.
///
/// Returns `None` for empty or non-numeric text.
///
/// ```
/// use embroidery_quote_engine::parser::parse_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(parse_money("$1,019,456.50"), Some(Decimal::from_str("1019456.50").unwrap()));
/// assert_eq!(parse_money(""), None);
/// ```
pub fn parse_money(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value: Decimal = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn amount(value: &str) -> Decimal {
    parse_money(value).unwrap_or(Decimal::ZERO)
}

/// Reads the Order Summary section. Empty amounts read as zero.
pub fn parse_order_summary(section: &str, unmatched: &mut Vec<UnmatchedLine>) -> RawSummary {
    let mut summary = RawSummary::default();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_title(line, &["Order Summary"]) {
            continue;
        }

        if let Some(v) = labeled_value(line, "Subtotal:") {
            summary.subtotal = amount(v);
        } else if let Some(v) =
            labeled_value(line, "Sales Tax:").or_else(|| labeled_value(line, "Tax:"))
        {
            summary.sales_tax = parse_money(v);
        } else if let Some(v) = labeled_value(line, "Shipping:") {
            summary.shipping = amount(v);
        } else if let Some(v) = labeled_value(line, "Total:") {
            summary.total = amount(v);
        } else if let Some(v) = labeled_value(line, "Paid To Date:") {
            summary.paid_to_date = amount(v);
        } else if let Some(v) = labeled_value(line, "Balance:") {
            summary.balance = amount(v);
        } else {
            unmatched.push(UnmatchedLine {
                section: SectionKind::OrderSummary,
                line: line.to_string(),
            });
        }
    }

    summary
}

fn back_calculated_rate(tax: Decimal, subtotal: Decimal) -> Option<Decimal> {
    if tax.is_zero() || subtotal <= Decimal::ZERO {
        return None;
    }
    Some(
        (tax / subtotal * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// Applies the jurisdiction rules to the raw amounts.
///
/// - Ship state outside `config.in_state`: tax is zero and the rate `None`.
/// - In state with a tax line: the rate is back-calculated from it.
/// - In state without a tax line: tax is `subtotal × in_state_tax_rate`.
/// - Unknown state: the raw tax is kept.
pub fn apply_tax_rules(
    raw: &RawSummary,
    ship_state: Option<&str>,
    config: &ParserConfig,
) -> OrderSummary {
    let (sales_tax, tax_rate) = match ship_state {
        Some(state) if !state.eq_ignore_ascii_case(&config.in_state) => (Decimal::ZERO, None),
        Some(_) => match raw.sales_tax {
            Some(tax) => (tax, back_calculated_rate(tax, raw.subtotal)),
            None if raw.subtotal > Decimal::ZERO => {
                let tax = (raw.subtotal * config.in_state_tax_rate / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                (tax, Some(config.in_state_tax_rate))
            }
            None => (Decimal::ZERO, None),
        },
        None => {
            let tax = raw.sales_tax.unwrap_or(Decimal::ZERO);
            (tax, back_calculated_rate(tax, raw.subtotal))
        }
    };

    OrderSummary {
        subtotal: raw.subtotal,
        sales_tax,
        tax_rate,
        shipping: raw.shipping,
        total: raw.total,
        paid_to_date: raw.paid_to_date,
        balance: raw.balance,
    }
}
