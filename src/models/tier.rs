//! Pricing value objects: tier identifiers, tier rows, stitch surcharge rows,
//! rounding methods and the margin denominator.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Identifies a quantity bracket.
///
/// The labels are a closed set so a typo in a lookup is a compile error
/// rather than a silent fallback. String labels coming from outside the
/// engine go through [`TierLabel::from_label`].
///
/// # Example
///
/// ```
/// use embroidery_quote_engine::models::TierLabel;
///
/// assert_eq!(TierLabel::from_label("8-23"), Some(TierLabel::Tier8To23));
/// assert_eq!(TierLabel::Tier72Plus.as_str(), "72+");
/// assert_eq!(TierLabel::from_label("999+"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierLabel {
    /// 1 to 7 pieces (less-than-minimum bracket).
    #[serde(rename = "1-7")]
    Tier1To7,
    /// 8 to 23 pieces.
    #[serde(rename = "8-23")]
    Tier8To23,
    /// 24 to 47 pieces.
    #[serde(rename = "24-47")]
    Tier24To47,
    /// 48 to 71 pieces.
    #[serde(rename = "48-71")]
    Tier48To71,
    /// 72 pieces and up.
    #[serde(rename = "72+")]
    Tier72Plus,
}

impl TierLabel {
    /// Every label, lowest volume first.
    pub const ALL: [TierLabel; 5] = [
        TierLabel::Tier1To7,
        TierLabel::Tier8To23,
        TierLabel::Tier24To47,
        TierLabel::Tier48To71,
        TierLabel::Tier72Plus,
    ];

    /// Returns the display label ("1-7", "72+", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TierLabel::Tier1To7 => "1-7",
            TierLabel::Tier8To23 => "8-23",
            TierLabel::Tier24To47 => "24-47",
            TierLabel::Tier48To71 => "48-71",
            TierLabel::Tier72Plus => "72+",
        }
    }

    /// Parses a display label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of a tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Which bracket this row describes.
    pub label: TierLabel,
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound; `None` means unbounded.
    #[serde(default)]
    pub max: Option<u32>,
    /// Decoration cost added per piece at this tier.
    pub embroidery_cost: Decimal,
    /// Whether the less-than-minimum fee applies at this tier.
    #[serde(default)]
    pub has_ltm: bool,
}

impl PricingTier {
    /// Returns true if `quantity` lies within `[min, max]`.
    pub fn contains(&self, quantity: i64) -> bool {
        quantity >= i64::from(self.min) && self.max.is_none_or(|max| quantity <= i64::from(max))
    }
}

/// A flat surcharge keyed by an inclusive stitch-count ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchSurchargeTier {
    /// Display name ("Standard", "Mid", "Large").
    pub name: String,
    /// Inclusive upper bound on stitch count.
    pub max: u32,
    /// Flat fee added per piece.
    pub fee: Decimal,
}

/// How a decorated base price is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundingMethod {
    /// Round up to the next $0.50.
    #[default]
    HalfDollarUp,
    /// Round up to the next whole dollar.
    CeilDollar,
}

impl RoundingMethod {
    /// Returns the identifier used by the pricing proxy.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMethod::HalfDollarUp => "HalfDollarUp",
            RoundingMethod::CeilDollar => "CeilDollar",
        }
    }
}

/// Whether a product is priced from the garment or the cap tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// Shirts, jackets, bags and everything that is not headwear.
    #[default]
    Garment,
    /// Caps, hats and beanies.
    Cap,
}

impl ProductCategory {
    /// Guesses the category from a style number and its description.
    ///
    /// Caps are `C`/`CP` followed by a digit (C112, CP90), New Era styles
    /// (`NE…`), anything containing CAP or HAT, or a description that
    /// mentions a cap, hat or beanie.
    ///
    /// ```
    /// use embroidery_quote_engine::models::ProductCategory;
    ///
    /// assert_eq!(ProductCategory::detect("C112", None), ProductCategory::Cap);
    /// assert_eq!(ProductCategory::detect("PC54", Some("Core Cotton Tee, Navy")), ProductCategory::Garment);
    /// assert_eq!(ProductCategory::detect("1379757", Some("Knit Beanie, Red")), ProductCategory::Cap);
    /// ```
    pub fn detect(part_number: &str, description: Option<&str>) -> Self {
        let style = part_number.trim().to_uppercase();
        let mut chars = style.chars();
        let cap_prefix = match (chars.next(), chars.next()) {
            (Some('C'), Some(c)) if c == 'P' || c.is_ascii_digit() => true,
            _ => false,
        };

        if cap_prefix || style.starts_with("NE") || style.contains("CAP") || style.contains("HAT") {
            return ProductCategory::Cap;
        }

        let by_description = description.is_some_and(describes_headwear);

        if by_description {
            ProductCategory::Cap
        } else {
            ProductCategory::Garment
        }
    }
}

/// Whether a description names headwear as a whole word. "Cap sleeve" is a
/// garment cut, and words such as "Capri" or "Chateau" never match.
fn describes_headwear(description: &str) -> bool {
    const HEADWEAR: [&str; 6] = ["cap", "caps", "hat", "hats", "beanie", "beanies"];

    let lower = description.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    words.iter().enumerate().any(|(i, word)| {
        HEADWEAR.contains(word) && !(*word == "cap" && words.get(i + 1) == Some(&"sleeve"))
    })
}

/// The divisor that turns a raw garment cost into a sell price.
///
/// `0.57` means the garment is sold at `cost / 0.57`, a 43% margin. The
/// value is validated to lie in `(0, 1]` so it is never a zero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarginDenominator(Decimal);

impl MarginDenominator {
    /// Validates and wraps a denominator.
    pub fn new(value: Decimal) -> EngineResult<Self> {
        if value <= Decimal::ZERO || value > Decimal::ONE {
            return Err(EngineError::InvalidMarginDenominator { value });
        }
        Ok(Self(value))
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Marks up a raw cost: `raw_cost / denominator`.
    ///
    /// Costs too large to mark up saturate at the decimal range.
    pub fn apply(&self, raw_cost: Decimal) -> Decimal {
        match raw_cost.checked_div(self.0) {
            Some(price) => price,
            None if raw_cost.is_sign_negative() => Decimal::MIN,
            None => Decimal::MAX,
        }
    }
}
