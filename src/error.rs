//! Error types for the embroidery quote engine.
//!
//! Only configuration can fail. Once an [`EmbroideryCalculator`] has been
//! constructed from a validated config, every pricing call is infallible, and
//! the ShopWorks parser never fails at all (it degrades to partial results).
//!
//! [`EmbroideryCalculator`]: crate::calculation::EmbroideryCalculator

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the embroidery quote engine.
///
/// # Example
///
/// ```
/// use embroidery_quote_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/pricing.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/pricing.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tier table does not partition the order quantities.
    #[error("Invalid tier table '{table}': {message}")]
    InvalidTierTable {
        /// Which table failed ("tiers", "cap_tiers", ...).
        table: String,
        /// What is wrong with it.
        message: String,
    },

    /// The margin denominator must lie in (0, 1].
    #[error("Invalid margin denominator {value}: must be greater than 0 and at most 1")]
    InvalidMarginDenominator {
        /// The rejected denominator.
        value: Decimal,
    },

    /// Stitch surcharge tiers are not strictly ascending by `max`.
    #[error("Invalid stitch surcharge table: {message}")]
    InvalidStitchTable {
        /// What is wrong with the table.
        message: String,
    },

    /// The stitch rounding increment was zero.
    #[error("Stitch increment must be greater than zero")]
    InvalidStitchIncrement,
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
