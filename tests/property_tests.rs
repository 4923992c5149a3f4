//! Property-based tests for account invariants.
//!
//! Random operation sequences are applied to a fresh account and the
//! ledger invariants are checked after every step.

use bigdecimal::{BigDecimal, Zero};
use proptest::prelude::*;
use trading_ledger::{Account, StaticPriceTable};

// =============================================================================
// Generators
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Deposit(i64),
    Withdraw(i64),
    Buy(&'static str, u64),
    Sell(&'static str, u64),
}

/// Symbols the default table knows, plus one it does not
fn arb_symbol() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("AAPL"), Just("tsla"), Just("GOOGL"), Just("NOPE")]
}

/// Amounts include zero and negatives so rejections are exercised too
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-100i64..20_000).prop_map(Op::Deposit),
        (-100i64..20_000).prop_map(Op::Withdraw),
        (arb_symbol(), 0u64..20).prop_map(|(s, q)| Op::Buy(s, q)),
        (arb_symbol(), 0u64..20).prop_map(|(s, q)| Op::Sell(s, q)),
    ]
}

fn apply(account: &mut Account<StaticPriceTable>, op: &Op) -> bool {
    match op {
        Op::Deposit(amount) => account.deposit(BigDecimal::from(*amount)).is_ok(),
        Op::Withdraw(amount) => account.withdraw(BigDecimal::from(*amount)).is_ok(),
        Op::Buy(symbol, quantity) => account.buy(symbol, *quantity).is_ok(),
        Op::Sell(symbol, quantity) => account.sell(symbol, *quantity).is_ok(),
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_step(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut account = Account::new("prop", None, StaticPriceTable::default());
        let mut succeeded = 0usize;

        for op in &ops {
            if apply(&mut account, op) {
                succeeded += 1;
            }

            prop_assert!(*account.cash_balance() >= BigDecimal::zero());
            prop_assert!(account.holdings().values().all(|&qty| qty > 0));
            prop_assert_eq!(account.transaction_count(), succeeded);
        }

        let report = account.validate_integrity();
        prop_assert!(report.is_valid, "{:?}", report.issues);
    }

    #[test]
    fn prop_rejected_operations_change_nothing(
        setup in prop::collection::vec(arb_op(), 0..30),
        op in arb_op(),
    ) {
        let mut account = Account::new("prop", None, StaticPriceTable::default());
        for step in &setup {
            apply(&mut account, step);
        }

        let cash = account.cash_balance().clone();
        let deposits = account.cumulative_deposits().clone();
        let holdings = account.holdings();
        let ledger = account.list_transactions(None, None);

        if !apply(&mut account, &op) {
            prop_assert_eq!(account.cash_balance(), &cash);
            prop_assert_eq!(account.cumulative_deposits(), &deposits);
            prop_assert_eq!(account.holdings(), holdings);
            prop_assert_eq!(account.list_transactions(None, None), ledger);
        }
    }

    #[test]
    fn prop_buy_then_sell_restores_position(
        cash in 1i64..50_000,
        symbol in arb_symbol(),
        quantity in 1u64..10,
    ) {
        let mut account = Account::new("prop", None, StaticPriceTable::default());
        account.deposit(BigDecimal::from(cash)).unwrap();
        let before = account.holdings();

        if account.buy(symbol, quantity).is_ok() {
            account.sell(symbol, quantity).unwrap();
            prop_assert_eq!(account.holdings(), before);
            prop_assert_eq!(account.cash_balance(), &BigDecimal::from(cash));
            prop_assert!(account.profit_loss().unwrap().is_zero());
        }
    }

    #[test]
    fn prop_withdrawals_never_reduce_deposit_basis(
        deposits in prop::collection::vec(1i64..5_000, 1..10),
        withdraw_pct in 0i64..=100,
    ) {
        let mut account = Account::new("prop", None, StaticPriceTable::default());
        let mut total = 0i64;
        for amount in &deposits {
            account.deposit(BigDecimal::from(*amount)).unwrap();
            total += amount;
        }

        let withdrawal = total * withdraw_pct / 100;
        if withdrawal > 0 {
            account.withdraw(BigDecimal::from(withdrawal)).unwrap();
        }

        prop_assert_eq!(account.cumulative_deposits(), &BigDecimal::from(total));
        prop_assert_eq!(account.profit_loss().unwrap(), BigDecimal::from(-withdrawal));
    }
}
