//! Ship-to address block.

use crate::models::{ParsedOrder, SectionKind, ShippingInfo, UnmatchedLine};

use super::sections::{is_title, labeled_value};

/// Splits a `City, ST 98001` or `City ST 98001-1234` line.
///
/// Returns `(city, state, zip)`; the state is upper-cased. The city may be
/// missing when the line holds only a state and ZIP.
///
/// ```
/// use embroidery_quote_engine::parser::parse_city_state_zip;
///
/// let (city, state, zip) = parse_city_state_zip("Milton, wa 98354").unwrap();
/// assert_eq!(city.as_deref(), Some("Milton"));
/// assert_eq!(state, "WA");
/// assert_eq!(zip, "98354");
/// assert!(parse_city_state_zip("1102 Industry Dr").is_none());
/// ```
pub fn parse_city_state_zip(line: &str) -> Option<(Option<String>, String, String)> {
    let mut tokens: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    let zip = tokens.pop()?;
    let state = tokens.pop()?;
    if !is_zip(zip) || state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let city = (!tokens.is_empty()).then(|| tokens.join(" "));
    Some((city, state.to_ascii_uppercase(), zip.to_string()))
}

fn is_zip(token: &str) -> bool {
    let (five, plus_four) = match token.split_once('-') {
        Some((five, four)) => (five, Some(four)),
        None => (token, None),
    };
    let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());
    digits(five, 5) && plus_four.is_none_or(|four| digits(four, 4))
}

/// Reads the shipping section into `order.shipping`.
///
/// The city/state/ZIP line anchors the block: the line above it is the
/// street and, when two or more lines precede it, the first is the
/// recipient. A `Ship Method:` line fills the order's ship method.
pub(crate) fn parse_shipping(section: &str, order: &mut ParsedOrder) {
    let mut info = ShippingInfo::default();
    let mut address_lines: Vec<&str> = Vec::new();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_title(line, &["Shipping Address", "Ship Address", "Ship To"]) {
            continue;
        }
        if let Some(v) = labeled_value(line, "Ship Method:") {
            if order.order_info.ship_method.is_none() && !v.is_empty() {
                order.order_info.ship_method = Some(v.to_string());
            }
        } else if let Some(v) = labeled_value(line, "Ship To:") {
            info.ship_to = (!v.is_empty()).then(|| v.to_string());
        } else {
            address_lines.push(line);
        }
    }

    if address_lines.is_empty() {
        order.shipping = info;
        return;
    }

    info.raw_address = Some(address_lines.join("\n"));

    let anchor = address_lines
        .iter()
        .rposition(|line| parse_city_state_zip(line).is_some());

    match anchor {
        Some(index) => {
            if let Some((city, state, zip)) = parse_city_state_zip(address_lines[index]) {
                info.city = city;
                info.state = Some(state);
                info.zip = Some(zip);
            }
            let before = &address_lines[..index];
            match before {
                [] => {}
                [street] => info.street = Some(street.to_string()),
                [first, rest @ ..] => {
                    if info.ship_to.is_none() {
                        info.ship_to = Some(first.to_string());
                        info.street = Some(rest.join(", "));
                    } else {
                        info.street = Some(before.join(", "));
                    }
                }
            }
        }
        None => {
            order
                .warnings
                .push("Shipping address has no city/state/ZIP line".to_string());
            for line in &address_lines {
                order.unmatched_lines.push(UnmatchedLine {
                    section: SectionKind::Shipping,
                    line: line.to_string(),
                });
            }
        }
    }

    order.shipping = info;
}
