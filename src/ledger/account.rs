//! The ledger-backed trading account

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, info};

use crate::ledger::report::{AccountSummary, HoldingValuation, IntegrityReport};
use crate::ledger::TransactionLog;
use crate::traits::*;
use crate::types::*;
use crate::utils::{normalize_symbol, validate_positive_amount, validate_quantity, validate_quote};

/// A single user's trading account.
///
/// The account is the only writer of its own ledger. Cash and holdings
/// change exclusively through [`deposit`](Self::deposit),
/// [`withdraw`](Self::withdraw), [`buy`](Self::buy) and
/// [`sell`](Self::sell); each of them either applies completely and appends
/// exactly one transaction, or returns an error and changes nothing.
pub struct Account<P: PriceSource, C: Clock = SystemClock> {
    owner_id: String,
    display_name: Option<String>,
    cash_balance: BigDecimal,
    cumulative_deposits: BigDecimal,
    holdings: HashMap<String, u64>,
    ledger: TransactionLog,
    prices: P,
    clock: C,
}

impl<P: PriceSource> Account<P, SystemClock> {
    /// Create an empty account stamped by the wall clock
    pub fn new(owner_id: impl Into<String>, display_name: Option<String>, prices: P) -> Self {
        Self::with_clock(owner_id, display_name, prices, SystemClock)
    }
}

impl<P: PriceSource, C: Clock> Account<P, C> {
    /// Create an empty account with a custom clock
    pub fn with_clock(
        owner_id: impl Into<String>,
        display_name: Option<String>,
        prices: P,
        clock: C,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            display_name,
            cash_balance: BigDecimal::zero(),
            cumulative_deposits: BigDecimal::zero(),
            holdings: HashMap::new(),
            ledger: TransactionLog::new(),
            prices,
            clock,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Liquid cash
    pub fn cash_balance(&self) -> &BigDecimal {
        &self.cash_balance
    }

    /// Running total of every deposit ever made. Withdrawals and trades
    /// never reduce it.
    pub fn cumulative_deposits(&self) -> &BigDecimal {
        &self.cumulative_deposits
    }

    /// Snapshot of current holdings (symbol -> shares)
    pub fn holdings(&self) -> HashMap<String, u64> {
        self.holdings.clone()
    }

    /// Shares held for `symbol`, zero when none
    pub fn holding(&self, symbol: &str) -> u64 {
        self.holdings
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(0)
    }

    pub fn price_source(&self) -> &P {
        &self.prices
    }

    // Cash management

    /// Add cash to the account
    pub fn deposit(&mut self, amount: BigDecimal) -> AccountResult<&Transaction> {
        if let Err(err) = validate_positive_amount("Deposit", &amount) {
            return Err(self.rejected(TransactionKind::Deposit, err));
        }

        self.cash_balance += &amount;
        self.cumulative_deposits += &amount;
        let txn = Transaction::cash(self.clock.now(), TransactionKind::Deposit, amount);
        Ok(self.commit(txn))
    }

    /// Remove cash from the account. Never leaves a negative balance and
    /// never performs a partial withdrawal.
    pub fn withdraw(&mut self, amount: BigDecimal) -> AccountResult<&Transaction> {
        if let Err(err) = validate_positive_amount("Withdraw", &amount) {
            return Err(self.rejected(TransactionKind::Withdraw, err));
        }
        if amount > self.cash_balance {
            let err = AccountError::InsufficientFunds {
                requested: amount,
                available: self.cash_balance.clone(),
            };
            return Err(self.rejected(TransactionKind::Withdraw, err));
        }

        self.cash_balance -= &amount;
        let txn = Transaction::cash(self.clock.now(), TransactionKind::Withdraw, amount);
        Ok(self.commit(txn))
    }

    // Trading

    /// Purchase `quantity` shares of `symbol` at the current price.
    ///
    /// The price is looked up exactly once, before the funds check, and
    /// that same quote is both charged and recorded.
    pub fn buy(&mut self, symbol: &str, quantity: u64) -> AccountResult<&Transaction> {
        if let Err(err) = validate_quantity("Buy", quantity) {
            return Err(self.rejected(TransactionKind::Buy, err));
        }

        let symbol = normalize_symbol(symbol);
        let price = match self.quote(&symbol) {
            Ok(price) => price,
            Err(err) => return Err(self.rejected(TransactionKind::Buy, err)),
        };
        let total = &price * BigDecimal::from(quantity);
        if total > self.cash_balance {
            let err = AccountError::InsufficientFunds {
                requested: total,
                available: self.cash_balance.clone(),
            };
            return Err(self.rejected(TransactionKind::Buy, err));
        }
        let held = self.holdings.get(&symbol).copied().unwrap_or(0);
        let Some(new_quantity) = held.checked_add(quantity) else {
            let err = AccountError::InvalidTransaction(format!(
                "Buy of {quantity} {symbol} would exceed the maximum share count, {held} already held"
            ));
            return Err(self.rejected(TransactionKind::Buy, err));
        };

        self.cash_balance -= &total;
        self.holdings.insert(symbol.clone(), new_quantity);
        let txn = Transaction::trade(self.clock.now(), TransactionKind::Buy, symbol, quantity, price);
        Ok(self.commit(txn))
    }

    /// Sell `quantity` shares of `symbol` at the current price.
    ///
    /// Holdings are checked before the price is resolved, so selling a
    /// symbol that is not held always fails with
    /// [`AccountError::InsufficientHoldings`].
    pub fn sell(&mut self, symbol: &str, quantity: u64) -> AccountResult<&Transaction> {
        if let Err(err) = validate_quantity("Sell", quantity) {
            return Err(self.rejected(TransactionKind::Sell, err));
        }

        let symbol = normalize_symbol(symbol);
        let held = self.holdings.get(&symbol).copied().unwrap_or(0);
        if quantity > held {
            let err = AccountError::InsufficientHoldings {
                symbol,
                requested: quantity,
                held,
            };
            return Err(self.rejected(TransactionKind::Sell, err));
        }

        let price = match self.quote(&symbol) {
            Ok(price) => price,
            Err(err) => return Err(self.rejected(TransactionKind::Sell, err)),
        };

        self.cash_balance += &price * BigDecimal::from(quantity);
        let remaining = held - quantity;
        if remaining == 0 {
            self.holdings.remove(&symbol);
        } else {
            self.holdings.insert(symbol.clone(), remaining);
        }
        debug_assert!(self.holdings.values().all(|&qty| qty > 0));

        let txn = Transaction::trade(self.clock.now(), TransactionKind::Sell, symbol, quantity, price);
        Ok(self.commit(txn))
    }

    // Reporting

    /// Market value of all held shares at current prices.
    ///
    /// Prices are fetched fresh on every call.
    pub fn portfolio_value(&self) -> AccountResult<BigDecimal> {
        let mut total = BigDecimal::zero();
        for (symbol, quantity) in &self.holdings {
            total += self.quote(symbol)? * BigDecimal::from(*quantity);
        }
        Ok(total)
    }

    /// Cash plus portfolio value
    pub fn total_equity(&self) -> AccountResult<BigDecimal> {
        Ok(&self.cash_balance + self.portfolio_value()?)
    }

    /// Total equity minus cumulative deposits.
    ///
    /// Withdrawals are not netted out of the deposit basis, so withdrawing
    /// cash shows up as a loss of the same size.
    pub fn profit_loss(&self) -> AccountResult<BigDecimal> {
        Ok(self.total_equity()? - &self.cumulative_deposits)
    }

    /// Transactions in insertion order whose timestamps fall within
    /// `[start, end]`. Either bound may be omitted. The result is a copy.
    pub fn list_transactions(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Vec<Transaction> {
        self.ledger.range(start, end)
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.ledger.last()
    }

    /// Valuation of the whole account at current prices, one quote per
    /// held symbol
    pub fn summary(&self) -> AccountResult<AccountSummary> {
        let holdings: BTreeMap<&String, &u64> = self.holdings.iter().collect();
        let mut valuations = Vec::with_capacity(holdings.len());
        let mut portfolio_value = BigDecimal::zero();

        for (symbol, quantity) in holdings {
            let price = self.quote(symbol)?;
            let market_value = &price * BigDecimal::from(*quantity);
            portfolio_value += &market_value;
            valuations.push(HoldingValuation {
                symbol: symbol.clone(),
                quantity: *quantity,
                price,
                market_value,
            });
        }

        let total_equity = &self.cash_balance + &portfolio_value;
        let profit_loss = &total_equity - &self.cumulative_deposits;

        Ok(AccountSummary {
            owner_id: self.owner_id.clone(),
            display_name: self.display_name.clone(),
            cash_balance: self.cash_balance.clone(),
            holdings: valuations,
            portfolio_value,
            total_equity,
            cumulative_deposits: self.cumulative_deposits.clone(),
            profit_loss,
            transaction_count: self.ledger.len(),
        })
    }

    /// Replay the ledger and check it against the live state
    pub fn validate_integrity(&self) -> IntegrityReport {
        IntegrityReport::check(
            &self.ledger,
            &self.cash_balance,
            &self.cumulative_deposits,
            &self.holdings,
        )
    }

    fn quote(&self, symbol: &str) -> AccountResult<BigDecimal> {
        let price = self.prices.price(symbol)?;
        validate_quote(symbol, &price)?;
        Ok(price)
    }

    fn commit(&mut self, mut txn: Transaction) -> &Transaction {
        txn.timestamp = self.ledger.stamp(txn.timestamp);
        debug_assert!(
            self.integrity_after(&txn).is_valid,
            "account invariants violated by {}",
            txn.kind
        );

        let txn = self.ledger.append(txn);
        info!(
            owner_id = %self.owner_id,
            kind = %txn.kind,
            amount = %txn.amount,
            symbol = txn.symbol.as_deref().unwrap_or("-"),
            quantity = txn.quantity.unwrap_or(0),
            cash_balance = %self.cash_balance,
            "transaction applied"
        );
        txn
    }

    /// Integrity of the state that results once `pending` is appended
    fn integrity_after(&self, pending: &Transaction) -> IntegrityReport {
        IntegrityReport::check(
            self.ledger.iter().chain(std::iter::once(pending)),
            &self.cash_balance,
            &self.cumulative_deposits,
            &self.holdings,
        )
    }

    fn rejected(&self, kind: TransactionKind, err: AccountError) -> AccountError {
        debug!(owner_id = %self.owner_id, %kind, error = %err, "transaction rejected");
        err
    }
}

impl<P: PriceSource, C: Clock> fmt::Display for Account<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let holdings: BTreeMap<_, _> = self.holdings.iter().collect();
        write!(
            f,
            "Account(owner_id={:?}, name={:?}, cash={}, holdings={:?})",
            self.owner_id,
            self.display_name,
            self.cash_balance.with_scale(2),
            holdings
        )
    }
}

impl<P: PriceSource, C: Clock> fmt::Debug for Account<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("owner_id", &self.owner_id)
            .field("display_name", &self.display_name)
            .field("cash_balance", &self.cash_balance)
            .field("cumulative_deposits", &self.cumulative_deposits)
            .field("holdings", &self.holdings)
            .field("transactions", &self.ledger.len())
            .finish_non_exhaustive()
    }
}
