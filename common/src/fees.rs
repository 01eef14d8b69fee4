//! Deterministic fee computation.
//!
//! Fees are expressed in integer basis points and rounded with ceiling
//! division, so a fractional-unit fee is never under-charged. The schedule
//! is one canonical table: the per-network transfer/clearing percentages
//! live on [`Network`], the category percentages here.

use serde::{Deserialize, Serialize};

use crate::network::Network;

/// How money is brought into the wallet for a cash-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashInMethod {
    /// Cash handed to a physical agent.
    #[default]
    Agent,
    /// Top-up from a mobile-money account on another network.
    MobileMoney,
    /// Debit card (Visa / Mastercard).
    Card,
}

/// Operation category for fee purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "category")]
pub enum FeeCategory {
    /// Peer-to-peer send.
    Transfer,
    /// Deposit into the wallet.
    CashIn {
        #[serde(default)]
        method: CashInMethod,
    },
    /// Withdrawal via agent.
    CashOut,
    /// QR merchant payment.
    Merchant,
}

/// Itemized fee components. For transfers off the platform rail both parts
/// are nonzero; everywhere else at most one is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub transfer_fee: u64,
    pub clearing_fee: u64,
}

/// Result of a fee quote: the total owed plus its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee: u64,
    pub breakdown: FeeBreakdown,
}

/// Ceiling of `amount * bps / 10_000`. The product is taken in u128 so
/// the full u64 amount range cannot overflow; with bps below 10_000 the
/// result always fits back in u64.
fn ceil_bps(amount: u64, bps: u64) -> u64 {
    ((u128::from(amount) * u128::from(bps)).div_ceil(10_000)) as u64
}

/// The fee table. Category percentages are configurable; defaults are the
/// canonical platform policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Agent cash-out, basis points (canonical 1%).
    pub cash_out_bps: u64,
    /// Merchant QR payment, basis points (canonical 0.5%).
    pub merchant_bps: u64,
    /// Card-funded cash-in, basis points (canonical 2.5%). Agent and
    /// mobile-money cash-ins are free.
    pub card_cash_in_bps: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            cash_out_bps: 100,
            merchant_bps: 50,
            card_cash_in_bps: 250,
        }
    }
}

impl FeeSchedule {
    /// Quote the fee for an operation. Pure function of its inputs and the
    /// static tables.
    pub fn quote(&self, amount: u64, network: Network, category: FeeCategory) -> FeeQuote {
        let (fee, breakdown) = match category {
            FeeCategory::Transfer => {
                let transfer_fee = ceil_bps(amount, network.transfer_bps());
                let clearing_fee = ceil_bps(amount, network.clearing_bps());
                (
                    transfer_fee + clearing_fee,
                    FeeBreakdown {
                        transfer_fee,
                        clearing_fee,
                    },
                )
            }
            FeeCategory::CashIn { method } => {
                let fee = match method {
                    CashInMethod::Agent | CashInMethod::MobileMoney => 0,
                    CashInMethod::Card => ceil_bps(amount, self.card_cash_in_bps),
                };
                (
                    fee,
                    FeeBreakdown {
                        transfer_fee: fee,
                        clearing_fee: 0,
                    },
                )
            }
            FeeCategory::CashOut => {
                let fee = ceil_bps(amount, self.cash_out_bps);
                (
                    fee,
                    FeeBreakdown {
                        transfer_fee: fee,
                        clearing_fee: 0,
                    },
                )
            }
            FeeCategory::Merchant => {
                let fee = ceil_bps(amount, self.merchant_bps);
                (
                    fee,
                    FeeBreakdown {
                        transfer_fee: fee,
                        clearing_fee: 0,
                    },
                )
            }
        };
        FeeQuote { fee, breakdown }
    }
}
