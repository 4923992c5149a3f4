//! Traits for the collaborators an account depends on
//!
//! An [`Account`](crate::Account) never reaches out to the world directly.
//! Quotes come from a [`PriceSource`] and transaction timestamps from a
//! [`Clock`], both injected at construction so they can be swapped for
//! deterministic stand-ins in tests.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::types::*;

/// Source of current unit prices for ticker symbols
///
/// Lookups are synchronous and uncached from the account's point of view;
/// two calls for the same symbol may legitimately return different prices.
/// Symbols are matched case-insensitively. An unrecognized symbol must fail
/// with [`AccountError::UnknownSymbol`].
pub trait PriceSource: Send + Sync {
    /// Resolve the current unit price for `symbol`
    fn price(&self, symbol: &str) -> AccountResult<BigDecimal>;
}

/// Adapts a plain function or closure into a [`PriceSource`]
#[derive(Clone, Copy)]
pub struct PriceFn<F>(pub F);

impl<F> PriceSource for PriceFn<F>
where
    F: Fn(&str) -> AccountResult<BigDecimal> + Send + Sync,
{
    fn price(&self, symbol: &str) -> AccountResult<BigDecimal> {
        (self.0)(symbol)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Arc<T> {
    fn price(&self, symbol: &str) -> AccountResult<BigDecimal> {
        (**self).price(symbol)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn price(&self, symbol: &str) -> AccountResult<BigDecimal> {
        (**self).price(symbol)
    }
}

/// Source of transaction timestamps
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_price_source() {
        let source = PriceFn(|symbol: &str| {
            if symbol.eq_ignore_ascii_case("ACME") {
                Ok(BigDecimal::from(42))
            } else {
                Err(AccountError::UnknownSymbol(symbol.to_string()))
            }
        });

        assert_eq!(source.price("acme").unwrap(), BigDecimal::from(42));
        assert_eq!(
            source.price("NOPE").unwrap_err().kind(),
            ErrorKind::UnknownSymbol
        );
    }

    #[test]
    fn test_shared_price_source() {
        let source: Arc<dyn PriceSource> =
            Arc::new(PriceFn(|_: &str| Ok::<_, AccountError>(BigDecimal::from(7))));
        assert_eq!(source.price("X").unwrap(), BigDecimal::from(7));
    }
}
