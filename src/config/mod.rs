//! Configuration loading and management for the embroidery quote engine.
//!
//! This module loads pricing parameters, catalog classification data and
//! parser settings from YAML files. Each configuration type also has a
//! `Default` with the reference values.
//!
//! # Example
//!
//! ```no_run
//! use embroidery_quote_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/embroidery").unwrap();
//! println!("LTM fee: ${}", config.pricing().ltm_fee);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CatalogConfig, KnownVendor, ParserConfig, PricingConfig};
