//! Embroidery quote engine
//!
//! This crate prices embroidered garments and caps (tier lookup, margin
//! markup, half-dollar rounding, stitch surcharges and less-than-minimum
//! fees) and parses ShopWorks order exports into structured orders that can
//! be fed back through the same pricing.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
