//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading pricing,
//! catalog and parser configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::calculation::EmbroideryCalculator;
use crate::error::{EngineError, EngineResult};
use crate::parser::ShopWorksParser;

use super::types::{CatalogConfig, ParserConfig, PricingConfig};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/embroidery/
/// ├── pricing.yaml   # Margin, tiers, surcharges, rounding
/// ├── catalog.yaml   # Standard style prefixes and known vendors
/// └── parser.yaml    # Tax jurisdiction and service prices
/// ```
///
/// # Example
///
/// ```no_run
/// use embroidery_quote_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/embroidery")?;
/// let calculator = loader.calculator()?;
/// let parser = loader.parser();
/// # Ok::<(), embroidery_quote_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pricing: PricingConfig,
    catalog: CatalogConfig,
    parser: ParserConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let pricing = Self::load_yaml::<PricingConfig>(&path.join("pricing.yaml"))?;
        let catalog = Self::load_yaml::<CatalogConfig>(&path.join("catalog.yaml"))?;
        let parser = Self::load_yaml::<ParserConfig>(&path.join("parser.yaml"))?;

        debug!(
            dir = %path.display(),
            catalog_version = %catalog.version,
            standard_prefixes = catalog.standard_prefixes.len(),
            "configuration loaded"
        );

        Ok(Self {
            pricing,
            catalog,
            parser,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the pricing configuration.
    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Returns the catalog configuration.
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Returns the parser configuration.
    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser
    }

    /// Builds a calculator, validating the pricing configuration.
    pub fn calculator(&self) -> EngineResult<EmbroideryCalculator> {
        EmbroideryCalculator::new(self.pricing.clone())
    }

    /// Builds a ShopWorks parser from the catalog and parser settings.
    pub fn parser(&self) -> ShopWorksParser {
        ShopWorksParser::new(self.catalog.clone(), self.parser.clone())
    }
}
