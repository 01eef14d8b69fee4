//! The append-only transaction ledger.
//!
//! Entries are kept most-recent-first. A monotonic sequence counter feeds
//! both entry ids and receipt references, which makes references pairwise
//! distinct for the lifetime of the session.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionCandidate, TransactionKind, TransactionStatus};
use crate::wallet::WalletError;

/// Date label attached to freshly appended entries.
const JUST_NOW: &str = "À l'instant";

/// Query filter for ledger reads. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Restrict to one transaction kind.
    pub kind: Option<TransactionKind>,
    /// Case-insensitive free-text match against recipient and reference.
    /// Accepts `q` on the query string.
    #[serde(alias = "q")]
    pub search: Option<String>,
}

impl TransactionFilter {
    fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty()
                && !tx.recipient.to_lowercase().contains(&needle)
                && !tx.transaction_ref.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Ordered list of transaction records plus the sequence counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Most recent first.
    entries: Vec<Transaction>,
    /// Next sequence number for ids and references.
    next_seq: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    /// Restore a ledger from pre-existing entries (seed data). The counter
    /// must be positioned past any reference already present.
    pub fn from_entries(entries: Vec<Transaction>, next_seq: u64) -> Self {
        Self { entries, next_seq }
    }

    /// Finalize a candidate and insert it at the head. Assigns the id, the
    /// receipt reference, and the creation instant. Never fails for a
    /// well-formed candidate; affordability is the caller's gate.
    pub fn append(&mut self, candidate: TransactionCandidate) -> &Transaction {
        let seq = self.next_seq;
        self.next_seq += 1;
        let now = Utc::now();
        let tx = Transaction {
            id: format!("txn_{seq:03}"),
            kind: candidate.kind,
            recipient: candidate.recipient,
            recipient_phone: candidate.recipient_phone,
            network: candidate.network,
            amount: candidate.amount,
            fee: candidate.fee,
            status: candidate.status,
            date: JUST_NOW.to_string(),
            timestamp: now,
            transaction_ref: format!("KTN-{}-{seq:06}", now.year()),
        };
        self.entries.insert(0, tx);
        &self.entries[0]
    }

    /// Lazy, restartable filtered view, always newest-first.
    pub fn query<'a>(
        &'a self,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.entries.iter().filter(move |tx| filter.matches(tx))
    }

    pub fn find_by_ref(&self, transaction_ref: &str) -> Option<&Transaction> {
        self.entries
            .iter()
            .find(|tx| tx.transaction_ref == transaction_ref)
    }

    /// Move a pending record to its settled status. Every other field is
    /// immutable after append.
    pub fn update_status(
        &mut self,
        transaction_ref: &str,
        next: TransactionStatus,
    ) -> Result<(), WalletError> {
        let tx = self
            .entries
            .iter_mut()
            .find(|tx| tx.transaction_ref == transaction_ref)
            .ok_or_else(|| WalletError::UnknownTransaction(transaction_ref.to_string()))?;
        if !tx.status.can_transition_to(next) {
            return Err(WalletError::InvalidStatusTransition {
                from: tx.status,
                to: next,
            });
        }
        tx.status = next;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of principal over completed entries, for the admin rollup.
    pub fn completed_volume(&self) -> u64 {
        self.entries
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Completed)
            .map(|tx| tx.amount)
            .sum()
    }
}
