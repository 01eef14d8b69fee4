use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::network::Network;

/// What kind of money movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sent,
    Received,
    CashIn,
    CashOut,
    Bill,
}

impl TransactionKind {
    pub fn all() -> &'static [TransactionKind] {
        &[
            TransactionKind::Sent,
            TransactionKind::Received,
            TransactionKind::CashIn,
            TransactionKind::CashOut,
            TransactionKind::Bill,
        ]
    }

    /// True when the entry credits the wallet instead of debiting it.
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionKind::Received | TransactionKind::CashIn)
    }
}

/// Settlement status. Synchronous flows settle as `Completed`; `Pending`
/// exists for asynchronous settlement and may later move to `Completed`
/// or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    /// Only pending records may move; everything else is final.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Completed)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A settled ledger entry. Immutable after append except for `status`
/// transitions on pending records.
///
/// The serialized shape is a stable contract for receipts and any future
/// persistence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Display name of the counterparty (person, agent, or merchant).
    pub recipient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    pub network: Network,
    /// Principal moved, excluding the fee.
    pub amount: u64,
    pub fee: u64,
    pub status: TransactionStatus,
    /// Human-readable date label shown in lists ("À l'instant", "Hier, 16:45").
    pub date: String,
    pub timestamp: DateTime<Utc>,
    /// Unique receipt reference, e.g. `KTN-2026-001235`.
    pub transaction_ref: String,
}

/// A fully-formed transaction minus the fields the ledger assigns at
/// append time (id, ref, timestamp, date label).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCandidate {
    pub kind: TransactionKind,
    pub recipient: String,
    pub recipient_phone: Option<String>,
    pub network: Network,
    pub amount: u64,
    pub fee: u64,
    pub status: TransactionStatus,
}
