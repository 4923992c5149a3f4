//! Ledger module containing the account aggregate and its transaction history

pub mod account;
pub mod report;
pub mod shared;
pub mod transaction;

pub use account::*;
pub use report::*;
pub use shared::*;
pub use transaction::*;
