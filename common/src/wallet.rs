//! The wallet service: single owner of account state, the transaction
//! ledger, the notification list, and all live workflow instances.
//!
//! Settlement (debit or credit, ledger append, notification) happens
//! inside one `&mut self` call, so a host that shares the service across
//! tasks gets the required atomicity from a single mutual-exclusion
//! boundary around it (the gateway wraps it in one `tokio::sync::Mutex`).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::fees::{FeeCategory, FeeQuote, FeeSchedule};
use crate::ledger::{Ledger, TransactionFilter};
use crate::network::Network;
use crate::notification::{Notification, Notifications};
use crate::transaction::{Transaction, TransactionStatus};
use crate::workflow::{
    Applied, Counterparty, Workflow, WorkflowError, WorkflowEvent, WorkflowId, WorkflowSnapshot,
    WorkflowKind,
};

/// Service-level failures. Workflow validation failures are wrapped so a
/// caller sees one error type at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalletError {
    InsufficientFunds { available: u64, requested: u64 },
    UnknownWorkflow(WorkflowId),
    UnknownTransaction(String),
    InvalidStatusTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },
    Workflow(WorkflowError),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient funds: have {available}, need {requested}"
            ),
            Self::UnknownWorkflow(id) => write!(f, "unknown workflow {id}"),
            Self::UnknownTransaction(tx_ref) => write!(f, "unknown transaction {tx_ref}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "illegal status transition {from} -> {to}")
            }
            Self::Workflow(err) => write!(f, "{err}"),
        }
    }
}

impl From<WorkflowError> for WalletError {
    fn from(err: WorkflowError) -> Self {
        WalletError::Workflow(err)
    }
}

pub struct WalletService {
    account: Account,
    ledger: Ledger,
    notifications: Notifications,
    fees: FeeSchedule,
    workflows: HashMap<WorkflowId, Workflow>,
    next_workflow: u64,
}

impl WalletService {
    pub fn new(seed_balance: u64) -> Self {
        Self {
            account: Account::new(seed_balance),
            ledger: Ledger::new(),
            notifications: Notifications::new(),
            fees: FeeSchedule::default(),
            workflows: HashMap::new(),
            next_workflow: 1,
        }
    }

    pub fn with_ledger(seed_balance: u64, ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Self::new(seed_balance)
        }
    }

    // ── Account ──

    pub fn balance(&self) -> u64 {
        self.account.balance()
    }

    pub fn balance_visible(&self) -> bool {
        self.account.balance_visible()
    }

    pub fn toggle_balance_visibility(&mut self) -> bool {
        self.account.toggle_visibility()
    }

    // ── Ledger reads ──

    pub fn transactions<'a>(
        &'a self,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.ledger.query(filter)
    }

    pub fn find_by_ref(&self, transaction_ref: &str) -> Option<&Transaction> {
        self.ledger.find_by_ref(transaction_ref)
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn completed_volume(&self) -> u64 {
        self.ledger.completed_volume()
    }

    /// Settle or fail a pending record (asynchronous settlement hook).
    pub fn update_transaction_status(
        &mut self,
        transaction_ref: &str,
        next: TransactionStatus,
    ) -> Result<(), WalletError> {
        self.ledger.update_status(transaction_ref, next)
    }

    // ── Fees ──

    pub fn quote_fee(&self, amount: u64, network: Network, category: FeeCategory) -> FeeQuote {
        self.fees.quote(amount, network, category)
    }

    // ── Notifications ──

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.items()
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn mark_notification_read(&mut self, id: &str) -> bool {
        self.notifications.mark_read(id)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    // ── Workflow commands ──

    pub fn initiate(&mut self, kind: WorkflowKind) -> WorkflowSnapshot {
        let id = WorkflowId(self.next_workflow);
        self.next_workflow += 1;
        let workflow = Workflow::new(id, kind);
        let snapshot = workflow.snapshot();
        self.workflows.insert(id, workflow);
        snapshot
    }

    pub fn workflow(&self, id: WorkflowId) -> Result<WorkflowSnapshot, WalletError> {
        self.workflows
            .get(&id)
            .map(Workflow::snapshot)
            .ok_or(WalletError::UnknownWorkflow(id))
    }

    pub fn select_counterparty(
        &mut self,
        id: WorkflowId,
        counterparty: Counterparty,
    ) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::SelectCounterparty(counterparty))
    }

    pub fn confirm_amount(
        &mut self,
        id: WorkflowId,
        raw_amount: &str,
    ) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::EnterAmount(raw_amount.to_string()))
    }

    pub fn confirm(&mut self, id: WorkflowId) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::Confirm)
    }

    /// Mark the step-up verification as outstanding. The caller runs the
    /// verifier and reports back through [`Self::complete_step_up`];
    /// duplicate submissions while outstanding are rejected, not queued.
    pub fn begin_step_up(&mut self, id: WorkflowId) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::BeginStepUp)
    }

    pub fn complete_step_up(
        &mut self,
        id: WorkflowId,
        verified: bool,
    ) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::CompleteStepUp { verified })
    }

    pub fn cancel(&mut self, id: WorkflowId) -> Result<WorkflowSnapshot, WalletError> {
        self.drive(id, WorkflowEvent::Cancel)
    }

    /// The settlement step. On a valid 4-digit PIN: debit (or credit) the
    /// account, append the finalized transaction, emit the notification,
    /// and settle the workflow, all before this call returns. A stale
    /// affordability check rewinds the workflow to the amount step and
    /// surfaces as a retryable conflict.
    pub fn submit_pin(
        &mut self,
        id: WorkflowId,
        pin: &str,
    ) -> Result<Transaction, WalletError> {
        let workflow = self
            .workflows
            .get_mut(&id)
            .ok_or(WalletError::UnknownWorkflow(id))?;
        let applied = workflow.apply(
            WorkflowEvent::SubmitPin(pin.to_string()),
            self.account.balance(),
            &self.fees,
        )?;
        let Applied::ReadyToSettle(intent) = applied else {
            // SubmitPin either errors or yields a settlement intent.
            return Err(WalletError::Workflow(WorkflowError::InvalidStep {
                event: "submitPin".to_string(),
                state: workflow.state().name().to_string(),
            }));
        };

        if intent.is_credit {
            self.account.credit(intent.candidate.amount - intent.candidate.fee);
        } else {
            let total = intent.candidate.amount + intent.candidate.fee;
            if let Err(err) = self.account.debit(total) {
                // Any failed debit aborts the settlement before the ledger
                // is touched.
                workflow.rewind_to_amount();
                let WalletError::InsufficientFunds {
                    available,
                    requested,
                } = err
                else {
                    return Err(err);
                };
                // Another settlement moved the balance since the amount
                // gate passed.
                return Err(WalletError::Workflow(WorkflowError::SettlementConflict {
                    available,
                    requested,
                }));
            }
        }

        let tx = self.ledger.append(intent.candidate).clone();
        self.notifications.on_transaction_settled(&tx);
        workflow.mark_settled(tx.transaction_ref.clone());
        Ok(tx)
    }

    fn drive(
        &mut self,
        id: WorkflowId,
        event: WorkflowEvent,
    ) -> Result<WorkflowSnapshot, WalletError> {
        let balance = self.account.balance();
        let workflow = self
            .workflows
            .get_mut(&id)
            .ok_or(WalletError::UnknownWorkflow(id))?;
        workflow.apply(event, balance, &self.fees)?;
        Ok(workflow.snapshot())
    }
}
