//! Core data models for the embroidery quote engine.
//!
//! Pricing value objects, quote requests and results, and the structured
//! order produced by the ShopWorks parser. Everything here is a plain value
//! with no back-references.

mod order;
mod quote;
mod tier;

pub use order::{
    AdditionalLogoService, CustomerInfo, CustomerSuppliedItem, DesignReference, GraphicDesign,
    ImportSummary, LineClassification, Monogram, OddballReason, OrderInfo, OrderSummary,
    ParsedOrder, ParsedProduct, ReviewItem, SalesRep, SectionKind, ServiceCharge, ServiceKind,
    ServiceLine, Services, ShippingInfo, SizeQuantity, UnmatchedLine, VendorMatch,
};
pub use quote::{
    AdditionalLogoLine, AdditionalLogoRequest, AuditStep, AuditTrace, AuditWarning,
    CustomerSuppliedPrice, LtmCharge, LtmSplit, QuoteLine, QuoteProduct, QuoteRequest,
    QuoteResult, QuoteSize, QuoteTotals, UnitPriceRequest, UnitPriceResult,
};
pub use tier::{
    MarginDenominator, PricingTier, ProductCategory, RoundingMethod, StitchSurchargeTier,
    TierLabel,
};
