use serde::{Deserialize, Serialize};

use crate::wallet::WalletError;

/// The session account: current balance plus the display-visibility flag.
///
/// The balance is a `u64`, so non-negativity is structural; `debit` checks
/// and applies in one call with no suspension point in between. Only the
/// wallet service's settlement step may mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    balance: u64,
    /// UI display toggle, not a security control.
    balance_visible: bool,
}

impl Account {
    pub fn new(seed_balance: u64) -> Self {
        Self {
            balance: seed_balance,
            balance_visible: true,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn balance_visible(&self) -> bool {
        self.balance_visible
    }

    pub fn can_afford(&self, total: u64) -> bool {
        total <= self.balance
    }

    /// Subtract `total` and return the new balance. Rejects before any
    /// mutation when the account cannot afford it.
    pub fn debit(&mut self, total: u64) -> Result<u64, WalletError> {
        if !self.can_afford(total) {
            return Err(WalletError::InsufficientFunds {
                available: self.balance,
                requested: total,
            });
        }
        self.balance -= total;
        Ok(self.balance)
    }

    /// Add unconditionally (received / cash-in flows) and return the new
    /// balance, saturating at the type ceiling.
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.balance_visible = !self.balance_visible;
        self.balance_visible
    }
}
