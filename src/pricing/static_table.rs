//! In-memory quote table

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::traits::PriceSource;
use crate::types::*;
use crate::utils::{normalize_symbol, validate_quote};

/// Quotes used when no configuration is supplied
pub const DEFAULT_QUOTES: [(&str, i64); 3] = [("AAPL", 150), ("TSLA", 630), ("GOOGL", 2800)];

/// Case-insensitive table of fixed quotes.
///
/// Prices can be moved after construction through a shared reference,
/// which lets tests and demos simulate a changing market while an account
/// holds the table.
#[derive(Debug)]
pub struct StaticPriceTable {
    prices: RwLock<HashMap<String, BigDecimal>>,
}

impl StaticPriceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Create a table from `(symbol, price)` pairs.
    ///
    /// Fails with [`AccountError::InvalidTransaction`] if any price is not
    /// strictly positive.
    pub fn with_prices<I, S>(prices: I) -> AccountResult<Self>
    where
        I: IntoIterator<Item = (S, BigDecimal)>,
        S: AsRef<str>,
    {
        let table = Self::new();
        for (symbol, price) in prices {
            table.set_price(symbol.as_ref(), price)?;
        }
        Ok(table)
    }

    /// Set or replace the quote for `symbol`
    pub fn set_price(&self, symbol: &str, price: BigDecimal) -> AccountResult<()> {
        let symbol = normalize_symbol(symbol);
        if validate_quote(&symbol, &price).is_err() {
            return Err(AccountError::InvalidTransaction(format!(
                "Price for {symbol} must be positive, got {price}"
            )));
        }
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol, price);
        Ok(())
    }

    /// Remove the quote for `symbol`, returning it if present
    pub fn remove_price(&self, symbol: &str) -> Option<BigDecimal> {
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize_symbol(symbol))
    }

    /// Quoted symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        symbols.sort();
        symbols
    }
}

impl Default for StaticPriceTable {
    fn default() -> Self {
        let prices = DEFAULT_QUOTES
            .iter()
            .map(|(symbol, price)| (symbol.to_string(), BigDecimal::from(*price)))
            .collect();
        Self {
            prices: RwLock::new(prices),
        }
    }
}

impl PriceSource for StaticPriceTable {
    fn price(&self, symbol: &str) -> AccountResult<BigDecimal> {
        let symbol = normalize_symbol(symbol);
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&symbol)
            .cloned()
            .ok_or(AccountError::UnknownSymbol(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quotes() {
        let table = StaticPriceTable::default();

        assert_eq!(table.price("AAPL").unwrap(), BigDecimal::from(150));
        assert_eq!(table.price("tsla").unwrap(), BigDecimal::from(630));
        assert_eq!(table.price(" googl ").unwrap(), BigDecimal::from(2800));
        assert_eq!(table.symbols(), vec!["AAPL", "GOOGL", "TSLA"]);
    }

    #[test]
    fn test_unknown_symbol() {
        let table = StaticPriceTable::default();
        let err = table.price("UNKNOWN").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownSymbol);
    }

    #[test]
    fn test_set_and_remove_price() {
        let table = StaticPriceTable::new();
        table.set_price("msft", BigDecimal::from(300)).unwrap();
        assert_eq!(table.price("MSFT").unwrap(), BigDecimal::from(300));

        assert_eq!(table.remove_price("MSFT"), Some(BigDecimal::from(300)));
        assert!(table.price("MSFT").is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let table = StaticPriceTable::new();
        let err = table.set_price("MSFT", BigDecimal::from(0)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidTransaction);
        assert!(StaticPriceTable::with_prices([("X", BigDecimal::from(-1))]).is_err());
    }
}
