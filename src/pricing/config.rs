//! Quote table configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::static_table::{StaticPriceTable, DEFAULT_QUOTES};

/// Errors raised while loading a pricing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: BigDecimal },
}

/// Static quote configuration.
///
/// ```toml
/// [prices]
/// AAPL = "150.00"
/// TSLA = 630
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Unit price per ticker symbol
    #[serde(default)]
    pub prices: BTreeMap<String, BigDecimal>,
}

impl PricingConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PricingConfig = toml::from_str(content)?;
        config.validate()?;
        info!(symbols = config.prices.len(), "pricing configuration loaded");
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zero = BigDecimal::from(0);
        match self.prices.iter().find(|(_, price)| **price <= zero) {
            Some((symbol, price)) => Err(ConfigError::InvalidPrice {
                symbol: symbol.clone(),
                price: price.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Build the quote table described by this configuration
    pub fn into_price_table(self) -> Result<StaticPriceTable, ConfigError> {
        self.validate()?;
        let table = StaticPriceTable::new();
        for (symbol, price) in self.prices {
            table
                .set_price(&symbol, price.clone())
                .map_err(|_| ConfigError::InvalidPrice { symbol, price })?;
        }
        Ok(table)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            prices: DEFAULT_QUOTES
                .iter()
                .map(|(symbol, price)| (symbol.to_string(), BigDecimal::from(*price)))
                .collect(),
        }
    }
}
