//! The money-movement workflow state machine.
//!
//! One [`Workflow`] instance drives a single operation (send, cash-in,
//! cash-out, merchant payment) through validated steps and produces exactly
//! one transaction on success, or aborts with no side effects. The machine
//! is independent of any rendering or HTTP layer; all transitions go
//! through [`Workflow::apply`]. Settlement itself is performed by the
//! owning wallet service so that the debit and the ledger append stay one
//! atomic unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fees::{CashInMethod, FeeCategory, FeeQuote, FeeSchedule};
use crate::network::Network;
use crate::transaction::{TransactionCandidate, TransactionKind, TransactionStatus};

/// Amounts at or above this require step-up authentication (PIN plus
/// biometric) before PIN entry.
pub const HIGH_VALUE_THRESHOLD: u64 = 100_000;

/// Upper bound on a single operation, in FC. Keeps fee arithmetic and
/// settlement totals comfortably inside u64.
pub const MAX_AMOUNT: u64 = 10_000_000_000;

/// Step-up verification failures tolerated before the workflow aborts.
pub const MAX_STEP_UP_ATTEMPTS: u8 = 3;

/// Counterparty phone numbers must carry at least this many digits.
pub const MIN_PHONE_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub u64);

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wf-{}", self.0)
    }
}

/// Which money-movement operation a workflow performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum WorkflowKind {
    Transfer,
    CashIn {
        #[serde(default)]
        method: CashInMethod,
    },
    CashOut,
    Merchant,
}

impl WorkflowKind {
    /// Policy minimum per operation category, in FC.
    pub fn minimum(&self) -> u64 {
        match self {
            WorkflowKind::Transfer => 500,
            WorkflowKind::CashIn { .. } | WorkflowKind::CashOut => 1_000,
            WorkflowKind::Merchant => 100,
        }
    }

    pub fn fee_category(&self) -> FeeCategory {
        match self {
            WorkflowKind::Transfer => FeeCategory::Transfer,
            WorkflowKind::CashIn { method } => FeeCategory::CashIn { method: *method },
            WorkflowKind::CashOut => FeeCategory::CashOut,
            WorkflowKind::Merchant => FeeCategory::Merchant,
        }
    }

    /// Ledger entry kind a settled workflow produces. Merchant payments
    /// are recorded as sends on the platform rail.
    pub fn transaction_kind(&self) -> TransactionKind {
        match self {
            WorkflowKind::Transfer | WorkflowKind::Merchant => TransactionKind::Sent,
            WorkflowKind::CashIn { .. } => TransactionKind::CashIn,
            WorkflowKind::CashOut => TransactionKind::CashOut,
        }
    }

    /// True when settlement credits the wallet (nothing is debited, so the
    /// affordability gate does not apply).
    pub fn is_credit(&self) -> bool {
        matches!(self, WorkflowKind::CashIn { .. })
    }
}

/// A resolved counterparty. Selection is the first gate of every workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum Counterparty {
    /// A person reached by phone number on a chosen rail.
    Phone { number: String, network: Network },
    /// A physical cash agent from the directory.
    Agent {
        id: String,
        name: String,
        network: Network,
    },
    /// A merchant scanned from a QR code. Merchant payments ride the
    /// platform rail.
    Merchant { id: String, name: String },
    /// A debit card funding a cash-in.
    Card { label: String },
}

impl Counterparty {
    pub fn display_name(&self) -> String {
        match self {
            Counterparty::Phone { number, network } => {
                format!("+243 {number} ({})", network.label())
            }
            Counterparty::Agent { name, .. } => name.clone(),
            Counterparty::Merchant { name, .. } => name.clone(),
            Counterparty::Card { label } => label.clone(),
        }
    }

    /// Phone field of the resulting ledger entry. Merchants record their
    /// id here, matching the receipt layout.
    pub fn recipient_phone(&self) -> Option<String> {
        match self {
            Counterparty::Phone { number, .. } => Some(number.clone()),
            Counterparty::Merchant { id, .. } => Some(id.clone()),
            Counterparty::Agent { .. } | Counterparty::Card { .. } => None,
        }
    }

    /// The rail the money moves on.
    pub fn network(&self) -> Network {
        match self {
            Counterparty::Phone { network, .. } => *network,
            Counterparty::Agent { network, .. } => *network,
            Counterparty::Merchant { .. } | Counterparty::Card { .. } => Network::Ketney,
        }
    }
}

/// Workflow steps. `Cancelled` is reachable from every non-terminal state;
/// `Settled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    SelectingCounterparty,
    EnteringAmount,
    Confirming,
    /// High-value branch. `in_flight` guards against re-entry while a
    /// verification call is outstanding.
    StepUpAuth { in_flight: bool },
    EnteringPin,
    Settled,
    Cancelled,
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::SelectingCounterparty => "selectingCounterparty",
            WorkflowState::EnteringAmount => "enteringAmount",
            WorkflowState::Confirming => "confirming",
            WorkflowState::StepUpAuth { .. } => "stepUpAuth",
            WorkflowState::EnteringPin => "enteringPin",
            WorkflowState::Settled => "settled",
            WorkflowState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Settled | WorkflowState::Cancelled)
    }
}

/// Inputs to the transition function.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    SelectCounterparty(Counterparty),
    /// Raw user input; non-digit characters are stripped before parsing.
    EnterAmount(String),
    Confirm,
    /// Mark the step-up verification call as outstanding.
    BeginStepUp,
    /// Outcome of the step-up verification call.
    CompleteStepUp { verified: bool },
    SubmitPin(String),
    Cancel,
}

impl WorkflowEvent {
    fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::SelectCounterparty(_) => "selectCounterparty",
            WorkflowEvent::EnterAmount(_) => "enterAmount",
            WorkflowEvent::Confirm => "confirm",
            WorkflowEvent::BeginStepUp => "beginStepUp",
            WorkflowEvent::CompleteStepUp { .. } => "completeStepUp",
            WorkflowEvent::SubmitPin(_) => "submitPin",
            WorkflowEvent::Cancel => "cancel",
        }
    }
}

/// All workflow validation failures are local and recoverable: the machine
/// stays at (or rewinds to) a well-defined step and the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkflowError {
    BelowMinimum { minimum: u64 },
    AboveMaximum { maximum: u64 },
    InsufficientFunds { available: u64, requested: u64 },
    InvalidCounterparty(String),
    StepUpAuthFailed { attempts_left: u8 },
    /// A verification call is already outstanding; the duplicate submission
    /// is ignored, not queued.
    VerificationInFlight,
    InvalidPin,
    /// The balance moved between confirmation and settlement; retry from
    /// the amount step.
    SettlementConflict { available: u64, requested: u64 },
    InvalidStep { event: String, state: String },
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { minimum } => {
                write!(f, "amount below the {minimum} FC minimum")
            }
            Self::AboveMaximum { maximum } => {
                write!(f, "amount above the {maximum} FC maximum")
            }
            Self::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient funds: have {available}, need {requested} (amount plus fee)"
            ),
            Self::InvalidCounterparty(reason) => write!(f, "invalid counterparty: {reason}"),
            Self::StepUpAuthFailed { attempts_left } => write!(
                f,
                "step-up authentication failed ({attempts_left} attempts left)"
            ),
            Self::VerificationInFlight => {
                write!(f, "a verification is already in progress")
            }
            Self::InvalidPin => write!(f, "PIN must be exactly 4 digits"),
            Self::SettlementConflict {
                available,
                requested,
            } => write!(
                f,
                "balance changed during confirmation: have {available}, need {requested}"
            ),
            Self::InvalidStep { event, state } => {
                write!(f, "event '{event}' not valid in state '{state}'")
            }
        }
    }
}

/// Non-error outcome of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The state advanced; nothing external to do.
    Advanced,
    /// Step-up entered in-flight: run the verifier, then feed
    /// `CompleteStepUp` back in.
    AwaitingStepUp,
    /// PIN accepted. The owner must settle atomically (debit/credit plus
    /// append plus notification) and then mark the workflow settled.
    ReadyToSettle(SettlementIntent),
}

/// Everything the wallet service needs to settle a workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementIntent {
    pub candidate: TransactionCandidate,
    /// True when settlement credits `amount - fee` instead of debiting
    /// `amount + fee`.
    pub is_credit: bool,
}

/// Serializable snapshot returned by every workflow command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub id: WorkflowId,
    #[serde(flatten)]
    pub kind: WorkflowKind,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<Counterparty>,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<FeeQuote>,
}

/// One in-progress money-movement operation.
#[derive(Debug, Clone)]
pub struct Workflow {
    id: WorkflowId,
    kind: WorkflowKind,
    state: WorkflowState,
    counterparty: Option<Counterparty>,
    amount: u64,
    quote: Option<FeeQuote>,
    step_up_attempts: u8,
    /// Reference of the settled transaction, once terminal.
    transaction_ref: Option<String>,
}

impl Workflow {
    pub fn new(id: WorkflowId, kind: WorkflowKind) -> Self {
        Self {
            id,
            kind,
            state: WorkflowState::SelectingCounterparty,
            counterparty: None,
            amount: 0,
            quote: None,
            step_up_attempts: 0,
            transaction_ref: None,
        }
    }

    pub fn id(&self) -> WorkflowId {
        self.id
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn transaction_ref(&self) -> Option<&str> {
        self.transaction_ref.as_deref()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            id: self.id,
            kind: self.kind,
            state: self.state.name(),
            counterparty: self.counterparty.clone(),
            amount: self.amount,
            quote: self.quote,
        }
    }

    /// The single transition function: `(state, event) -> state`, with
    /// validation gates at every edge. Verification failures rewind the
    /// state *and* report the error, so the caller can re-prompt at the
    /// right step.
    pub fn apply(
        &mut self,
        event: WorkflowEvent,
        balance: u64,
        fees: &FeeSchedule,
    ) -> Result<Applied, WorkflowError> {
        match (self.state, event) {
            (_, WorkflowEvent::Cancel) if !self.state.is_terminal() => {
                self.state = WorkflowState::Cancelled;
                Ok(Applied::Advanced)
            }
            (WorkflowState::SelectingCounterparty, WorkflowEvent::SelectCounterparty(cp)) => {
                self.validate_counterparty(&cp)?;
                self.counterparty = Some(cp);
                self.state = WorkflowState::EnteringAmount;
                Ok(Applied::Advanced)
            }
            (WorkflowState::EnteringAmount, WorkflowEvent::EnterAmount(raw)) => {
                let amount = parse_amount(&raw);
                if amount < self.kind.minimum() {
                    return Err(WorkflowError::BelowMinimum {
                        minimum: self.kind.minimum(),
                    });
                }
                if amount > MAX_AMOUNT {
                    return Err(WorkflowError::AboveMaximum {
                        maximum: MAX_AMOUNT,
                    });
                }
                let network = self.effective_network();
                let quote = fees.quote(amount, network, self.kind.fee_category());
                if !self.kind.is_credit() {
                    let total = amount + quote.fee;
                    if total > balance {
                        return Err(WorkflowError::InsufficientFunds {
                            available: balance,
                            requested: total,
                        });
                    }
                }
                self.amount = amount;
                self.quote = Some(quote);
                self.state = WorkflowState::Confirming;
                Ok(Applied::Advanced)
            }
            (WorkflowState::Confirming, WorkflowEvent::Confirm) => {
                self.state = if self.amount >= HIGH_VALUE_THRESHOLD {
                    WorkflowState::StepUpAuth { in_flight: false }
                } else {
                    WorkflowState::EnteringPin
                };
                Ok(Applied::Advanced)
            }
            (WorkflowState::StepUpAuth { in_flight: false }, WorkflowEvent::BeginStepUp) => {
                self.state = WorkflowState::StepUpAuth { in_flight: true };
                Ok(Applied::AwaitingStepUp)
            }
            (WorkflowState::StepUpAuth { in_flight: true }, WorkflowEvent::BeginStepUp) => {
                Err(WorkflowError::VerificationInFlight)
            }
            (
                WorkflowState::StepUpAuth { in_flight: true },
                WorkflowEvent::CompleteStepUp { verified },
            ) => {
                if verified {
                    self.step_up_attempts = 0;
                    self.state = WorkflowState::EnteringPin;
                    return Ok(Applied::Advanced);
                }
                self.step_up_attempts += 1;
                if self.step_up_attempts >= MAX_STEP_UP_ATTEMPTS {
                    self.state = WorkflowState::Cancelled;
                    return Err(WorkflowError::StepUpAuthFailed { attempts_left: 0 });
                }
                self.state = WorkflowState::Confirming;
                Err(WorkflowError::StepUpAuthFailed {
                    attempts_left: MAX_STEP_UP_ATTEMPTS - self.step_up_attempts,
                })
            }
            (WorkflowState::EnteringPin, WorkflowEvent::SubmitPin(pin)) => {
                if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
                    return Err(WorkflowError::InvalidPin);
                }
                Ok(Applied::ReadyToSettle(self.settlement_intent()))
            }
            (state, event) => Err(WorkflowError::InvalidStep {
                event: event.name().to_string(),
                state: state.name().to_string(),
            }),
        }
    }

    /// Called by the wallet service once the debit/credit and ledger
    /// append have been applied.
    pub(crate) fn mark_settled(&mut self, transaction_ref: String) {
        self.transaction_ref = Some(transaction_ref);
        self.state = WorkflowState::Settled;
    }

    /// Called by the wallet service when the settlement-time affordability
    /// re-check fails: rewind to the amount step so the user can retry.
    pub(crate) fn rewind_to_amount(&mut self) {
        self.amount = 0;
        self.quote = None;
        self.state = WorkflowState::EnteringAmount;
    }

    fn settlement_intent(&self) -> SettlementIntent {
        // EnteringPin is only reachable with these populated.
        let counterparty = self.counterparty.as_ref().expect("counterparty resolved");
        let quote = self.quote.expect("fee quoted");
        SettlementIntent {
            candidate: TransactionCandidate {
                kind: self.kind.transaction_kind(),
                recipient: counterparty.display_name(),
                recipient_phone: counterparty.recipient_phone(),
                network: self.effective_network(),
                amount: self.amount,
                fee: quote.fee,
                status: TransactionStatus::Completed,
            },
            is_credit: self.kind.is_credit(),
        }
    }

    fn effective_network(&self) -> Network {
        self.counterparty
            .as_ref()
            .map(Counterparty::network)
            .unwrap_or(Network::Ketney)
    }

    fn validate_counterparty(&self, cp: &Counterparty) -> Result<(), WorkflowError> {
        match (self.kind, cp) {
            (WorkflowKind::Transfer, Counterparty::Phone { number, .. })
            | (
                WorkflowKind::CashIn {
                    method: CashInMethod::MobileMoney,
                },
                Counterparty::Phone { number, .. },
            ) => {
                let digits = number.chars().filter(char::is_ascii_digit).count();
                if digits < MIN_PHONE_DIGITS || digits != number.len() {
                    return Err(WorkflowError::InvalidCounterparty(format!(
                        "phone number needs at least {MIN_PHONE_DIGITS} digits"
                    )));
                }
                Ok(())
            }
            (WorkflowKind::CashOut, Counterparty::Agent { .. })
            | (
                WorkflowKind::CashIn {
                    method: CashInMethod::Agent,
                },
                Counterparty::Agent { .. },
            ) => Ok(()),
            (
                WorkflowKind::CashIn {
                    method: CashInMethod::Card,
                },
                Counterparty::Card { .. },
            ) => Ok(()),
            (WorkflowKind::Merchant, Counterparty::Merchant { .. }) => Ok(()),
            _ => Err(WorkflowError::InvalidCounterparty(
                "counterparty type does not fit this operation".to_string(),
            )),
        }
    }
}

/// Strip non-digit characters and parse; anything unparseable is zero,
/// which the minimum gate then rejects.
fn parse_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_to(number: &str, network: Network) -> Workflow {
        let mut wf = Workflow::new(WorkflowId(1), WorkflowKind::Transfer);
        wf.apply(
            WorkflowEvent::SelectCounterparty(Counterparty::Phone {
                number: number.to_string(),
                network,
            }),
            450_000,
            &FeeSchedule::default(),
        )
        .unwrap();
        wf
    }

    #[test]
    fn test_happy_path_below_threshold_skips_step_up() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Orange);
        wf.apply(WorkflowEvent::EnterAmount("15000".into()), 450_000, &fees)
            .unwrap();
        assert_eq!(wf.state(), WorkflowState::Confirming);
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        assert_eq!(wf.state(), WorkflowState::EnteringPin);

        let applied = wf
            .apply(WorkflowEvent::SubmitPin("1234".into()), 450_000, &fees)
            .unwrap();
        let Applied::ReadyToSettle(intent) = applied else {
            panic!("expected settlement intent");
        };
        assert_eq!(intent.candidate.amount, 15_000);
        assert_eq!(intent.candidate.fee, 225);
        assert!(!intent.is_credit);
    }

    #[test]
    fn test_high_value_requires_step_up() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("100000".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        assert_eq!(wf.state(), WorkflowState::StepUpAuth { in_flight: false });

        // PIN entry is not reachable until the step-up verdict arrives.
        let err = wf
            .apply(WorkflowEvent::SubmitPin("1234".into()), 450_000, &fees)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidStep { .. }));

        wf.apply(WorkflowEvent::BeginStepUp, 450_000, &fees).unwrap();
        wf.apply(
            WorkflowEvent::CompleteStepUp { verified: true },
            450_000,
            &fees,
        )
        .unwrap();
        assert_eq!(wf.state(), WorkflowState::EnteringPin);
    }

    #[test]
    fn test_just_below_threshold_goes_straight_to_pin() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("99999".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        assert_eq!(wf.state(), WorkflowState::EnteringPin);
    }

    #[test]
    fn test_step_up_reentry_is_rejected_while_in_flight() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("200000".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        wf.apply(WorkflowEvent::BeginStepUp, 450_000, &fees).unwrap();

        let err = wf
            .apply(WorkflowEvent::BeginStepUp, 450_000, &fees)
            .unwrap_err();
        assert_eq!(err, WorkflowError::VerificationInFlight);
        assert_eq!(wf.state(), WorkflowState::StepUpAuth { in_flight: true });
    }

    #[test]
    fn test_step_up_failure_rewinds_to_confirming() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("150000".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        wf.apply(WorkflowEvent::BeginStepUp, 450_000, &fees).unwrap();

        let err = wf
            .apply(
                WorkflowEvent::CompleteStepUp { verified: false },
                450_000,
                &fees,
            )
            .unwrap_err();
        assert_eq!(err, WorkflowError::StepUpAuthFailed { attempts_left: 2 });
        assert_eq!(wf.state(), WorkflowState::Confirming);
    }

    #[test]
    fn test_step_up_attempts_are_bounded() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("150000".into()), 450_000, &fees)
            .unwrap();
        for attempt in 1..=MAX_STEP_UP_ATTEMPTS {
            wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
            wf.apply(WorkflowEvent::BeginStepUp, 450_000, &fees).unwrap();
            let err = wf
                .apply(
                    WorkflowEvent::CompleteStepUp { verified: false },
                    450_000,
                    &fees,
                )
                .unwrap_err();
            if attempt < MAX_STEP_UP_ATTEMPTS {
                assert_eq!(
                    err,
                    WorkflowError::StepUpAuthFailed {
                        attempts_left: MAX_STEP_UP_ATTEMPTS - attempt
                    }
                );
            } else {
                assert_eq!(err, WorkflowError::StepUpAuthFailed { attempts_left: 0 });
            }
        }
        assert_eq!(wf.state(), WorkflowState::Cancelled);
    }

    #[test]
    fn test_amount_gates() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Orange);

        // Below minimum, including zero and non-numeric input.
        for raw in ["499", "0", "", "abc"] {
            let err = wf
                .apply(WorkflowEvent::EnterAmount(raw.into()), 450_000, &fees)
                .unwrap_err();
            assert_eq!(err, WorkflowError::BelowMinimum { minimum: 500 });
            assert_eq!(wf.state(), WorkflowState::EnteringAmount);
        }

        // The gate uses amount plus fee, not amount alone: 1 000 on Orange
        // needs 1 015.
        let err = wf
            .apply(WorkflowEvent::EnterAmount("1000".into()), 1_000, &fees)
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InsufficientFunds {
                available: 1_000,
                requested: 1_015
            }
        );
        assert_eq!(wf.state(), WorkflowState::EnteringAmount);
    }

    #[test]
    fn test_amount_above_cap_is_rejected() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Orange);

        // A plain digit string near the u64 ceiling must be rejected at
        // the gate, not fed into fee arithmetic.
        let err = wf
            .apply(
                WorkflowEvent::EnterAmount("10000000000000000000".into()),
                1_000,
                &fees,
            )
            .unwrap_err();
        assert_eq!(err, WorkflowError::AboveMaximum { maximum: MAX_AMOUNT });
        assert_eq!(wf.state(), WorkflowState::EnteringAmount);

        // Same cap on the credit side, where no affordability gate runs.
        let mut wf = Workflow::new(
            WorkflowId(9),
            WorkflowKind::CashIn {
                method: CashInMethod::Card,
            },
        );
        wf.apply(
            WorkflowEvent::SelectCounterparty(Counterparty::Card {
                label: "Carte bancaire".into(),
            }),
            0,
            &fees,
        )
        .unwrap();
        let err = wf
            .apply(
                WorkflowEvent::EnterAmount("18446744073709551615".into()),
                0,
                &fees,
            )
            .unwrap_err();
        assert_eq!(err, WorkflowError::AboveMaximum { maximum: MAX_AMOUNT });
    }

    #[test]
    fn test_amount_input_strips_formatting() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("15 000".into()), 450_000, &fees)
            .unwrap();
        assert_eq!(wf.snapshot().amount, 15_000);
    }

    #[test]
    fn test_counterparty_gates() {
        let fees = FeeSchedule::default();
        let mut wf = Workflow::new(WorkflowId(1), WorkflowKind::Transfer);

        // Too short.
        let err = wf
            .apply(
                WorkflowEvent::SelectCounterparty(Counterparty::Phone {
                    number: "08912345".into(),
                    network: Network::Orange,
                }),
                450_000,
                &fees,
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidCounterparty(_)));

        // Wrong counterparty type for the operation.
        let err = wf
            .apply(
                WorkflowEvent::SelectCounterparty(Counterparty::Merchant {
                    id: "MRCH-001234".into(),
                    name: "Shoprite Gombe".into(),
                }),
                450_000,
                &fees,
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidCounterparty(_)));
        assert_eq!(wf.state(), WorkflowState::SelectingCounterparty);
    }

    #[test]
    fn test_pin_format_gate() {
        let fees = FeeSchedule::default();
        let mut wf = transfer_to("0891234567", Network::Ketney);
        wf.apply(WorkflowEvent::EnterAmount("5000".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();

        for bad in ["123", "12345", "12a4", ""] {
            let err = wf
                .apply(WorkflowEvent::SubmitPin(bad.into()), 450_000, &fees)
                .unwrap_err();
            assert_eq!(err, WorkflowError::InvalidPin);
            assert_eq!(wf.state(), WorkflowState::EnteringPin);
        }
    }

    #[test]
    fn test_cancel_from_any_non_terminal_state() {
        let fees = FeeSchedule::default();
        for advance in 0..4 {
            let mut wf = transfer_to("0891234567", Network::Orange);
            let steps: Vec<WorkflowEvent> = vec![
                WorkflowEvent::EnterAmount("150000".into()),
                WorkflowEvent::Confirm,
                WorkflowEvent::BeginStepUp,
            ];
            for event in steps.into_iter().take(advance) {
                wf.apply(event, 450_000, &fees).unwrap();
            }
            wf.apply(WorkflowEvent::Cancel, 450_000, &fees).unwrap();
            assert_eq!(wf.state(), WorkflowState::Cancelled);

            // Terminal: nothing further applies.
            let err = wf
                .apply(WorkflowEvent::Confirm, 450_000, &fees)
                .unwrap_err();
            assert!(matches!(err, WorkflowError::InvalidStep { .. }));
        }
    }

    #[test]
    fn test_merchant_workflow_settles_as_sent_on_platform_rail() {
        let fees = FeeSchedule::default();
        let mut wf = Workflow::new(WorkflowId(2), WorkflowKind::Merchant);
        wf.apply(
            WorkflowEvent::SelectCounterparty(Counterparty::Merchant {
                id: "MRCH-001234".into(),
                name: "Shoprite Gombe".into(),
            }),
            450_000,
            &fees,
        )
        .unwrap();
        wf.apply(WorkflowEvent::EnterAmount("10000".into()), 450_000, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 450_000, &fees).unwrap();
        let applied = wf
            .apply(WorkflowEvent::SubmitPin("1234".into()), 450_000, &fees)
            .unwrap();
        let Applied::ReadyToSettle(intent) = applied else {
            panic!("expected settlement intent");
        };
        assert_eq!(intent.candidate.kind, TransactionKind::Sent);
        assert_eq!(intent.candidate.network, Network::Ketney);
        assert_eq!(intent.candidate.fee, 50);
        assert_eq!(
            intent.candidate.recipient_phone.as_deref(),
            Some("MRCH-001234")
        );
    }

    #[test]
    fn test_cash_in_skips_affordability_gate() {
        let fees = FeeSchedule::default();
        let mut wf = Workflow::new(
            WorkflowId(3),
            WorkflowKind::CashIn {
                method: CashInMethod::Card,
            },
        );
        wf.apply(
            WorkflowEvent::SelectCounterparty(Counterparty::Card {
                label: "Carte bancaire".into(),
            }),
            0,
            &fees,
        )
        .unwrap();
        // Zero balance is fine: nothing is debited on a cash-in.
        wf.apply(WorkflowEvent::EnterAmount("10000".into()), 0, &fees)
            .unwrap();
        wf.apply(WorkflowEvent::Confirm, 0, &fees).unwrap();
        let applied = wf
            .apply(WorkflowEvent::SubmitPin("1234".into()), 0, &fees)
            .unwrap();
        let Applied::ReadyToSettle(intent) = applied else {
            panic!("expected settlement intent");
        };
        assert!(intent.is_credit);
        assert_eq!(intent.candidate.fee, 250);
    }
}
