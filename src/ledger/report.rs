//! Read-only views of an account for reporting collaborators

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Current valuation of one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub quantity: u64,
    /// Unit price at the time the summary was taken
    pub price: BigDecimal,
    /// `price * quantity`
    pub market_value: BigDecimal,
}

/// Point-in-time valuation of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub owner_id: String,
    pub display_name: Option<String>,
    pub cash_balance: BigDecimal,
    /// Positions sorted by symbol
    pub holdings: Vec<HoldingValuation>,
    pub portfolio_value: BigDecimal,
    pub total_equity: BigDecimal,
    pub cumulative_deposits: BigDecimal,
    pub profit_loss: BigDecimal,
    pub transaction_count: usize,
}

/// Result of replaying an account's ledger against its live state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub transaction_count: usize,
    pub replayed_cash_balance: BigDecimal,
    pub replayed_cumulative_deposits: BigDecimal,
}

impl IntegrityReport {
    /// Replay `transactions` from an empty account and compare the outcome
    /// with the given live balances and holdings
    pub fn check<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        cash_balance: &BigDecimal,
        cumulative_deposits: &BigDecimal,
        holdings: &HashMap<String, u64>,
    ) -> Self {
        let mut issues = Vec::new();
        let mut cash = BigDecimal::zero();
        let mut deposits = BigDecimal::zero();
        let mut replayed: HashMap<String, u64> = HashMap::new();
        let mut seen_ids = HashSet::new();
        let mut previous_timestamp: Option<NaiveDateTime> = None;
        let mut transaction_count = 0;

        for (index, txn) in transactions.into_iter().enumerate() {
            transaction_count += 1;
            if !seen_ids.insert(txn.id) {
                issues.push(format!("Transaction #{index} reuses id {}", txn.id));
            }
            if previous_timestamp.is_some_and(|prev| txn.timestamp < prev) {
                issues.push(format!("Transaction #{index} is stamped before its predecessor"));
            }
            previous_timestamp = Some(txn.timestamp);

            if txn.amount <= BigDecimal::zero() {
                issues.push(format!("Transaction #{index} has non-positive amount {}", txn.amount));
            }

            match (txn.kind, &txn.symbol, txn.quantity, &txn.price_per_share) {
                (TransactionKind::Deposit, None, None, None) => {
                    cash += &txn.amount;
                    deposits += &txn.amount;
                }
                (TransactionKind::Withdraw, None, None, None) => {
                    cash -= &txn.amount;
                }
                (TransactionKind::Buy, Some(symbol), Some(quantity), Some(price)) => {
                    check_trade_amount(index, txn, quantity, price, &mut issues);
                    cash -= &txn.amount;
                    let held = replayed.entry(symbol.clone()).or_insert(0);
                    match held.checked_add(quantity) {
                        Some(total) => *held = total,
                        None => issues.push(format!(
                            "Transaction #{index} overflows the share count for {symbol}"
                        )),
                    }
                }
                (TransactionKind::Sell, Some(symbol), Some(quantity), Some(price)) => {
                    check_trade_amount(index, txn, quantity, price, &mut issues);
                    cash += &txn.amount;
                    let held = replayed.get(symbol).copied().unwrap_or(0);
                    if quantity > held {
                        issues.push(format!(
                            "Transaction #{index} sells {quantity} of {symbol} while holding {held}"
                        ));
                    }
                    let remaining = held.saturating_sub(quantity);
                    if remaining == 0 {
                        replayed.remove(symbol);
                    } else {
                        replayed.insert(symbol.clone(), remaining);
                    }
                }
                (kind, ..) => {
                    issues.push(format!("Transaction #{index} is a malformed {kind} record"));
                }
            }

            if cash < BigDecimal::zero() {
                issues.push(format!("Cash balance is negative after transaction #{index}"));
            }
        }

        if *cash_balance < BigDecimal::zero() {
            issues.push(format!("Cash balance {cash_balance} is negative"));
        }
        if let Some((symbol, _)) = holdings.iter().find(|(_, qty)| **qty == 0) {
            issues.push(format!("Holding for {symbol} is zero but still present"));
        }
        if cash != *cash_balance {
            issues.push(format!(
                "Replayed cash {cash} does not match balance {cash_balance}"
            ));
        }
        if deposits != *cumulative_deposits {
            issues.push(format!(
                "Replayed deposits {deposits} do not match cumulative deposits {cumulative_deposits}"
            ));
        }
        if replayed != *holdings {
            issues.push("Replayed holdings do not match current holdings".to_string());
        }

        Self {
            is_valid: issues.is_empty(),
            issues,
            transaction_count,
            replayed_cash_balance: cash,
            replayed_cumulative_deposits: deposits,
        }
    }
}

fn check_trade_amount(
    index: usize,
    txn: &Transaction,
    quantity: u64,
    price: &BigDecimal,
    issues: &mut Vec<String>,
) {
    if quantity == 0 {
        issues.push(format!("Transaction #{index} trades zero shares"));
    }
    if txn.amount != price * BigDecimal::from(quantity) {
        issues.push(format!(
            "Transaction #{index} amount {} does not equal {price} x {quantity}",
            txn.amount
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionLog;

    fn dec(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    fn sample_log() -> TransactionLog {
        let t = NaiveDateTime::UNIX_EPOCH;
        let mut log = TransactionLog::new();
        log.append(Transaction::cash(t, TransactionKind::Deposit, dec(1000)));
        log.append(Transaction::trade(t, TransactionKind::Buy, "AAPL".into(), 4, dec(150)));
        log.append(Transaction::trade(t, TransactionKind::Sell, "AAPL".into(), 2, dec(150)));
        log
    }

    #[test]
    fn test_consistent_state_is_valid() {
        let holdings = HashMap::from([("AAPL".to_string(), 2)]);
        let report = IntegrityReport::check(&sample_log(), &dec(700), &dec(1000), &holdings);

        assert!(report.is_valid, "{:?}", report.issues);
        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.replayed_cash_balance, dec(700));
    }

    #[test]
    fn test_detects_drift() {
        let holdings = HashMap::from([("AAPL".to_string(), 3)]);
        let report = IntegrityReport::check(&sample_log(), &dec(650), &dec(1000), &holdings);

        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_detects_zero_holding_and_negative_cash() {
        let mut log = TransactionLog::new();
        log.append(Transaction::cash(
            NaiveDateTime::UNIX_EPOCH,
            TransactionKind::Withdraw,
            dec(10),
        ));
        let holdings = HashMap::from([("AAPL".to_string(), 0)]);
        let report = IntegrityReport::check(&log, &dec(-10), &dec(0), &holdings);

        assert!(!report.is_valid);
        assert!(report.issues.iter().any(|i| i.contains("negative after")));
        assert!(report.issues.iter().any(|i| i.contains("zero but still present")));
    }

    #[test]
    fn test_detects_share_count_overflow() {
        let t = NaiveDateTime::UNIX_EPOCH;
        let tiny = BigDecimal::new(1.into(), 30);
        let records = [
            Transaction::cash(t, TransactionKind::Deposit, dec(1)),
            Transaction::trade(t, TransactionKind::Buy, "ACME".into(), u64::MAX, tiny.clone()),
            Transaction::trade(t, TransactionKind::Buy, "ACME".into(), 1, tiny),
        ];
        let holdings = HashMap::from([("ACME".to_string(), u64::MAX)]);
        let report = IntegrityReport::check(&records, &dec(1), &dec(1), &holdings);

        assert!(!report.is_valid);
        assert!(report.issues.iter().any(|i| i.contains("overflows the share count")));
        assert_eq!(report.transaction_count, 3);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = AccountSummary {
            owner_id: "u1".to_string(),
            display_name: None,
            cash_balance: dec(700),
            holdings: vec![HoldingValuation {
                symbol: "AAPL".to_string(),
                quantity: 2,
                price: dec(150),
                market_value: dec(300),
            }],
            portfolio_value: dec(300),
            total_equity: dec(1000),
            cumulative_deposits: dec(1000),
            profit_loss: dec(0),
            transaction_count: 3,
        };

        let json = serde_json::to_string(&summary).unwrap();
        let back: AccountSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
