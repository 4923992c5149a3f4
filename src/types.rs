//! Core types and data structures for the trading ledger

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of operation recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Cash added to the account
    Deposit,
    /// Cash removed from the account
    Withdraw,
    /// Shares purchased with cash
    Buy,
    /// Shares sold for cash
    Sell,
}

impl TransactionKind {
    /// Whether this kind moves shares as well as cash
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Immutable record of one completed account operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: Uuid,
    /// When the operation was applied (UTC)
    pub timestamp: NaiveDateTime,
    /// Kind of operation
    pub kind: TransactionKind,
    /// Cash moved: the delta for deposits and withdrawals, the total
    /// value (`price_per_share * quantity`) for trades
    pub amount: BigDecimal,
    /// Ticker symbol, trades only
    pub symbol: Option<String>,
    /// Number of shares, trades only
    pub quantity: Option<u64>,
    /// Unit price fixed at execution time, trades only
    pub price_per_share: Option<BigDecimal>,
}

impl Transaction {
    /// Create a cash movement record (deposit or withdrawal)
    pub fn cash(timestamp: NaiveDateTime, kind: TransactionKind, amount: BigDecimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            amount,
            symbol: None,
            quantity: None,
            price_per_share: None,
        }
    }

    /// Create a trade record (buy or sell). The amount is derived from
    /// the unit price and quantity so the two can never disagree.
    pub fn trade(
        timestamp: NaiveDateTime,
        kind: TransactionKind,
        symbol: String,
        quantity: u64,
        price_per_share: BigDecimal,
    ) -> Self {
        let amount = &price_per_share * BigDecimal::from(quantity);
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            amount,
            symbol: Some(symbol),
            quantity: Some(quantity),
            price_per_share: Some(price_per_share),
        }
    }
}

/// Coarse classification of an [`AccountError`], for callers that only
/// need to branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request that can never be applied, such as a non-positive amount
    InvalidTransaction,
    /// Not enough cash to withdraw or to pay for a purchase
    InsufficientFunds,
    /// Not enough shares to sell
    InsufficientHoldings,
    /// The price source could not price the symbol
    UnknownSymbol,
}

/// Errors returned by account operations.
///
/// Every variant is an ordinary, caller-recoverable outcome. An operation
/// that returns one of these has left the account untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Insufficient funds: requested {requested}, but only {available} available")]
    InsufficientFunds {
        requested: BigDecimal,
        available: BigDecimal,
    },
    #[error("Insufficient holdings: attempted to sell {requested} of {symbol}, but only {held} held")]
    InsufficientHoldings {
        symbol: String,
        requested: u64,
        held: u64,
    },
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::InvalidTransaction(_) => ErrorKind::InvalidTransaction,
            AccountError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AccountError::InsufficientHoldings { .. } => ErrorKind::InsufficientHoldings,
            AccountError::UnknownSymbol(_) => ErrorKind::UnknownSymbol,
        }
    }
}

/// Result type for account operations
pub type AccountResult<T> = Result<T, AccountError>;
