//! Section splitting and recognition for ShopWorks exports.
//!
//! An export is a run of blocks separated by rows of asterisks. Each block
//! is recognised from its content (an `Order #:` line makes a header) or
//! from its title line, and then read field by field. Lines that fit no
//! field are reported, never dropped.

use chrono::NaiveDate;

use crate::models::{DesignReference, ParsedOrder, SectionKind, UnmatchedLine};

/// Minimum run of `*` that separates two sections.
const SEPARATOR_RUN: usize = 10;

const DATE_FORMAT: &str = "%m/%d/%Y";

// Mailboxes that never belong to the ordering customer.
const SYSTEM_MAILBOX_MARKERS: [&str; 6] =
    ["noreply", "no-reply", "support@", "info@", "orders@", "sales@"];

const CONTACT_KEYWORDS: [&str; 5] = ["ordered by", "contact", "customer", "bill to", "ship to"];

/// How far past a contact keyword the email fallback looks, in bytes.
const CONTACT_WINDOW: usize = 200;

/// Splits an export into trimmed, non-empty sections.
///
/// Any run of ten or more `*` ends a section, wherever it appears.
pub fn split_sections(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sections = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'*' {
            i += 1;
        }
        if i - run_start >= SEPARATOR_RUN {
            sections.push(&text[start..run_start]);
            start = i;
        }
    }
    sections.push(&text[start..]);

    sections
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn title(section: &str) -> &str {
    section.lines().next().map(str::trim).unwrap_or("")
}

/// Whether `line` is one of the given section titles (ignoring case and a
/// trailing colon).
pub(crate) fn is_title(line: &str, titles: &[&str]) -> bool {
    let line = line.trim().trim_end_matches(':').trim_end();
    titles.iter().any(|t| line.eq_ignore_ascii_case(t))
}

/// The trimmed value after `label` when the line starts with it (ASCII case
/// ignored).
pub(crate) fn labeled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        line.get(label.len()..).map(str::trim)
    } else {
        None
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Recognises what kind of section a block is.
///
/// A recognised title wins over content markers, so a note that quotes a
/// subtotal or an order number stays a note.
pub fn classify_section(section: &str) -> SectionKind {
    let first = title(section);

    if is_title(first, &["Items Purchased"]) {
        SectionKind::Items
    } else if is_title(first, &["Shipping Address", "Ship Address", "Ship To"]) {
        SectionKind::Shipping
    } else if is_title(first, &["Order Summary"]) {
        SectionKind::OrderSummary
    } else if is_title(first, &["Note", "Notes", "Order Notes"]) {
        SectionKind::Note
    } else if is_title(first, &["Order Information"]) {
        SectionKind::OrderInfo
    } else if section.contains("Order #:") {
        SectionKind::OrderHeader
    } else if section.contains("Part Number:") {
        SectionKind::Items
    } else if section.contains("Subtotal:") {
        SectionKind::OrderSummary
    } else if section.contains("Customer #:") || section.contains("Company:") {
        SectionKind::Customer
    } else if section.contains("Ordered by:") {
        SectionKind::OrderInfo
    } else {
        SectionKind::Unknown
    }
}

fn unmatched(order: &mut ParsedOrder, section: SectionKind, line: &str) {
    order.unmatched_lines.push(UnmatchedLine {
        section,
        line: line.to_string(),
    });
}

fn content_lines(section: &str) -> impl Iterator<Item = &str> {
    section.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Reads the order header: order number, salesperson and their email.
pub(crate) fn parse_header(section: &str, order: &mut ParsedOrder) {
    for line in content_lines(section) {
        if let Some(v) = labeled_value(line, "Order #:") {
            order.order_id = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Salesperson:") {
            order.sales_rep.name = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Email:") {
            if order.sales_rep.email.is_none() {
                order.sales_rep.email = non_empty(v);
            }
        } else if labeled_value(line, "Order Type:").is_some() {
            // informational only
        } else {
            unmatched(order, SectionKind::OrderHeader, line);
        }
    }
}

/// Reads the customer block.
pub(crate) fn parse_customer(section: &str, order: &mut ParsedOrder) {
    for line in content_lines(section) {
        if is_title(line, &["Customer", "Customer Information"]) {
            continue;
        }
        if let Some(v) = labeled_value(line, "Customer #:") {
            order.customer.customer_id = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Company:") {
            order.customer.company = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Phone:") {
            order.customer.phone = order.customer.phone.take().or_else(|| non_empty(v));
        } else {
            unmatched(order, SectionKind::Customer, line);
        }
    }
}

fn parse_date(value: &str, field: &str, order: &mut ParsedOrder) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            order
                .warnings
                .push(format!("Unparseable {} '{}'", field, value));
            None
        }
    }
}

/// Reads the order information block: contact, PO, dates and terms.
pub(crate) fn parse_order_info(section: &str, order: &mut ParsedOrder) {
    for line in content_lines(section) {
        if is_title(line, &["Order Information"]) {
            continue;
        }
        if let Some(v) = labeled_value(line, "Ordered by:") {
            order.customer.contact_name = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Email:") {
            order.customer.email = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Phone:") {
            order.customer.phone = non_empty(v).or_else(|| order.customer.phone.take());
        } else if let Some(v) = labeled_value(line, "PO #:") {
            order.order_info.po_number = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Date Order Placed:") {
            order.order_info.order_date = parse_date(v, "order date", order);
        } else if let Some(v) = labeled_value(line, "Req. Ship Date:") {
            order.order_info.requested_ship_date = parse_date(v, "requested ship date", order);
        } else if let Some(v) = labeled_value(line, "Drop Dead Date:") {
            order.order_info.drop_dead_date = parse_date(v, "drop dead date", order);
        } else if let Some(v) = labeled_value(line, "Terms:") {
            order.order_info.payment_terms = non_empty(v);
        } else if let Some(v) = labeled_value(line, "Ship Method:") {
            order.order_info.ship_method = non_empty(v);
        } else {
            unmatched(order, SectionKind::OrderInfo, line);
        }
    }
}

/// The free text of a Note section, title removed.
pub(crate) fn parse_note(section: &str) -> Option<String> {
    let body: Vec<&str> = content_lines(section)
        .filter(|line| !is_title(line, &["Note", "Notes", "Order Notes"]))
        .collect();
    (!body.is_empty()).then(|| body.join("\n"))
}

/// Reports every line of an unrecognised section.
pub(crate) fn report_unknown(section: &str, order: &mut ParsedOrder) {
    for line in content_lines(section) {
        unmatched(order, SectionKind::Unknown, line);
    }
}

/// Finds `Design #…` references, keeping each number exactly as written.
///
/// ```
/// use embroidery_quote_engine::parser::extract_design_references;
///
/// let refs = extract_design_references("Design #39719.01 - Left Chest, Design #39719.10");
/// assert_eq!(refs[0].number, "39719.01");
/// assert_eq!(refs[0].label.as_deref(), Some("Left Chest"));
/// assert_eq!(refs[1].number, "39719.10");
/// ```
pub fn extract_design_references(text: &str) -> Vec<DesignReference> {
    const MARKER: &str = "design #";

    let lower = text.to_ascii_lowercase();
    let mut references = Vec::new();
    let mut search_from = 0;

    while let Some(found) = lower[search_from..].find(MARKER) {
        let number_start = search_from + found + MARKER.len();
        let rest = &text[number_start..];
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = rest[..number_len].trim_end_matches('.');
        search_from = number_start + number_len;

        if number.is_empty() {
            continue;
        }

        let after = &rest[number_len..];
        let label_end = after
            .find(|c: char| matches!(c, ',' | ';' | '\n'))
            .unwrap_or(after.len());
        let label = after[..label_end]
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | '.'))
            .trim_end();

        references.push(DesignReference {
            number: number.to_string(),
            label: non_empty(label),
        });
    }

    references
}

fn is_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    let domain_ok = domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    let tld_ok = domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        });
    local_ok && domain_ok && tld_ok
}

fn email_candidates(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || ":;,<>()[]\"'".contains(c))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| is_email(token))
        .map(str::to_string)
        .collect()
}

/// Picks the customer's email from anywhere in the export.
///
/// The sales rep's address and system mailboxes are never chosen. With one
/// candidate left it wins; otherwise the first address shortly after a
/// contact keyword, and failing that the first candidate.
pub(crate) fn extract_email_fallback(text: &str, sales_rep_email: Option<&str>) -> Option<String> {
    let is_candidate = |email: &str| {
        let lower = email.to_ascii_lowercase();
        let is_rep = sales_rep_email.is_some_and(|rep| rep.eq_ignore_ascii_case(email));
        !is_rep && !SYSTEM_MAILBOX_MARKERS.iter().any(|m| lower.contains(m))
    };

    let candidates: Vec<String> = email_candidates(text)
        .into_iter()
        .filter(|e| is_candidate(e))
        .collect();

    match candidates.len() {
        0 => return None,
        1 => return candidates.into_iter().next(),
        _ => {}
    }

    let lower = text.to_ascii_lowercase();
    for keyword in CONTACT_KEYWORDS {
        let Some(at) = lower.find(keyword) else {
            continue;
        };
        let mut end = (at + CONTACT_WINDOW).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if let Some(email) = email_candidates(&text[at..end])
            .into_iter()
            .find(|e| is_candidate(e))
        {
            return Some(email);
        }
    }

    candidates.into_iter().next()
}
