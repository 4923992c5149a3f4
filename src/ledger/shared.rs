//! Thread-safe handle to a single account

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ledger::report::{AccountSummary, IntegrityReport};
use crate::ledger::Account;
use crate::traits::*;
use crate::types::*;

/// Shared, cloneable handle to one [`Account`].
///
/// Mutations hold the write lock for their whole duration, including the
/// price lookup, so no caller ever observes a half-applied operation.
/// Queries share the read lock with each other.
pub struct SharedAccount<P: PriceSource, C: Clock = SystemClock> {
    inner: Arc<RwLock<Account<P, C>>>,
}

impl<P: PriceSource, C: Clock> Clone for SharedAccount<P, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: PriceSource, C: Clock> std::fmt::Debug for SharedAccount<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedAccount")
            .field("account", &*self.read())
            .finish()
    }
}

impl<P: PriceSource, C: Clock> SharedAccount<P, C> {
    pub fn new(account: Account<P, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(account)),
        }
    }

    // Operations validate before they mutate, so a panic while the lock
    // was held cannot have left a half-applied change behind.
    fn read(&self) -> RwLockReadGuard<'_, Account<P, C>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Account<P, C>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn deposit(&self, amount: BigDecimal) -> AccountResult<Transaction> {
        self.write().deposit(amount).cloned()
    }

    pub fn withdraw(&self, amount: BigDecimal) -> AccountResult<Transaction> {
        self.write().withdraw(amount).cloned()
    }

    pub fn buy(&self, symbol: &str, quantity: u64) -> AccountResult<Transaction> {
        self.write().buy(symbol, quantity).cloned()
    }

    pub fn sell(&self, symbol: &str, quantity: u64) -> AccountResult<Transaction> {
        self.write().sell(symbol, quantity).cloned()
    }

    pub fn cash_balance(&self) -> BigDecimal {
        self.read().cash_balance().clone()
    }

    pub fn cumulative_deposits(&self) -> BigDecimal {
        self.read().cumulative_deposits().clone()
    }

    pub fn holdings(&self) -> HashMap<String, u64> {
        self.read().holdings()
    }

    pub fn portfolio_value(&self) -> AccountResult<BigDecimal> {
        self.read().portfolio_value()
    }

    pub fn total_equity(&self) -> AccountResult<BigDecimal> {
        self.read().total_equity()
    }

    pub fn profit_loss(&self) -> AccountResult<BigDecimal> {
        self.read().profit_loss()
    }

    pub fn list_transactions(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Vec<Transaction> {
        self.read().list_transactions(start, end)
    }

    pub fn transaction_count(&self) -> usize {
        self.read().transaction_count()
    }

    /// Consistent valuation taken under a single read lock
    pub fn snapshot(&self) -> AccountResult<AccountSummary> {
        self.read().summary()
    }

    pub fn validate_integrity(&self) -> IntegrityReport {
        self.read().validate_integrity()
    }

    /// Run `f` with shared access to the account
    pub fn with_account<R>(&self, f: impl FnOnce(&Account<P, C>) -> R) -> R {
        f(&self.read())
    }

    /// Recover the account if this is the last handle to it
    pub fn into_inner(self) -> Result<Account<P, C>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl<P: PriceSource, C: Clock> From<Account<P, C>> for SharedAccount<P, C> {
    fn from(account: Account<P, C>) -> Self {
        Self::new(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::StaticPriceTable;
    use std::thread;

    #[test]
    fn test_concurrent_deposits_are_serialized() {
        let shared = SharedAccount::new(Account::new("u1", None, StaticPriceTable::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let account = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        account.deposit(BigDecimal::from(10)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.cash_balance(), BigDecimal::from(2000));
        assert_eq!(shared.transaction_count(), 200);
        assert!(shared.validate_integrity().is_valid);
    }

    #[test]
    fn test_into_inner_requires_last_handle() {
        let shared = SharedAccount::new(Account::new("u1", None, StaticPriceTable::default()));
        let other = shared.clone();

        let shared = shared.into_inner().unwrap_err();
        drop(other);

        let account = shared.into_inner().unwrap();
        assert_eq!(account.owner_id(), "u1");
    }
}
