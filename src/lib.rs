//! # Trading Ledger
//!
//! A single-user trading account: cash management, share trading and an
//! append-only, queryable transaction history.
//!
//! ## Features
//!
//! - **Cash management**: deposits and all-or-nothing withdrawals, never below zero
//! - **Share trading**: buys and sells priced through an injected [`PriceSource`]
//! - **Transaction history**: immutable, insertion-ordered records with time-range queries
//! - **Valuation**: portfolio value, total equity and profit/loss against deposits
//! - **Integrity checks**: ledger replay against live balances and holdings
//! - **Shared access**: [`SharedAccount`] serializes mutations behind a single lock
//!
//! ## Quick Start
//!
//! ```rust
//! use trading_ledger::{Account, StaticPriceTable};
//! use bigdecimal::BigDecimal;
//!
//! let mut account = Account::new("user-1", None, StaticPriceTable::default());
//! account.deposit(BigDecimal::from(10_000)).unwrap();
//! account.buy("AAPL", 20).unwrap();
//!
//! assert_eq!(*account.cash_balance(), BigDecimal::from(7_000));
//! assert_eq!(account.holding("AAPL"), 20);
//! ```

pub mod ledger;
pub mod pricing;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use pricing::*;
pub use traits::*;
pub use types::*;
