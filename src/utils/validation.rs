//! Validation utilities

use crate::types::*;
use bigdecimal::{BigDecimal, Zero};

/// Validate that a cash amount is strictly positive
///
/// `operation` names the operation in the error message, e.g. "Deposit".
pub fn validate_positive_amount(operation: &str, amount: &BigDecimal) -> AccountResult<()> {
    if *amount <= BigDecimal::zero() {
        Err(AccountError::InvalidTransaction(format!(
            "{operation} amount must be positive, got {amount}"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a share quantity is strictly positive
pub fn validate_quantity(operation: &str, quantity: u64) -> AccountResult<()> {
    if quantity == 0 {
        return Err(AccountError::InvalidTransaction(format!(
            "{operation} quantity must be a positive integer"
        )));
    }

    Ok(())
}

/// Validate a quote returned by a price source.
///
/// A source that hands back a zero or negative price has not actually
/// priced the symbol, so it is reported the same way as an unknown one.
pub fn validate_quote(symbol: &str, price: &BigDecimal) -> AccountResult<()> {
    if *price <= BigDecimal::zero() {
        return Err(AccountError::UnknownSymbol(symbol.to_string()));
    }

    Ok(())
}

/// Canonical form of a ticker symbol: trimmed and upper-cased
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
