//! Pricing logic for the embroidery quote engine.
//!
//! One rule per module: rounding, tier resolution, stitch surcharges, the
//! decorated price formula, LTM distribution, additional logos and
//! customer-supplied goods. [`EmbroideryCalculator`] ties them to a
//! validated configuration and prices whole quotes.

mod additional_logo;
mod calculator;
mod customer_supplied;
mod ltm;
mod price_formula;
mod quote;
mod rounding;
mod stitch_surcharge;
mod tier_resolver;

pub use additional_logo::{
    AdditionalLogoResult, ExtraStitchPolicy, calculate_additional_logo, extra_stitch_cost,
    extra_stitches,
};
pub use calculator::EmbroideryCalculator;
pub use customer_supplied::{
    CUSTOMER_SUPPLIED_LTM_FEE, CUSTOMER_SUPPLIED_LTM_THRESHOLD, calculate_customer_supplied_price,
    customer_supplied_base_price, is_heavyweight_description,
};
pub use ltm::{LtmResult, calculate_ltm, distribute_ltm, ltm_per_piece};
pub use price_formula::{DecoratedPriceResult, PriceAddons, calculate_decorated_price};
pub use rounding::{PriceValue, round_cap_price, round_decimal, round_price, round_stitch_count};
pub use stitch_surcharge::{StitchSurchargeTable, get_stitch_surcharge};
pub use tier_resolver::{TierLookupResult, TierTable, resolve_tier};
