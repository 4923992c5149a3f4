//! Append-only transaction history

use chrono::NaiveDateTime;

use crate::types::*;

/// Insertion-ordered, append-only record of completed operations.
///
/// Records are never mutated or removed once appended. Timestamps are
/// non-decreasing in ledger order: a new record stamped earlier than its
/// predecessor (a wall clock stepping backwards) is clamped to the
/// predecessor's timestamp.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest timestamp the next record may carry
    pub(crate) fn stamp(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self.entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }

    /// Append a completed transaction, returning a reference to it
    pub(crate) fn append(&mut self, mut transaction: Transaction) -> &Transaction {
        transaction.timestamp = self.stamp(transaction.timestamp);
        self.entries.push(transaction);
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently appended transaction
    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    /// Iterate over all transactions in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    /// Copy out the transactions whose timestamp falls within
    /// `[start, end]`, both bounds inclusive and optional, in insertion order
    pub fn range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Vec<Transaction> {
        self.entries
            .iter()
            .filter(|txn| {
                start.is_none_or(|s| txn.timestamp >= s) && end.is_none_or(|e| txn.timestamp <= e)
            })
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
