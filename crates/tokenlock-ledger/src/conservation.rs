//! Custody conservation invariant checker.
//!
//! Mathematical invariant enforced on demand:
//! ```text
//! Σ_holders(locked + unlocked) == Σ(deposits) - Σ(withdrawals)
//! custody_balance(custodied asset) >= Σ_holders(locked + unlocked)
//! ```
//!
//! The custody balance may exceed the holders' claims: anyone can send the
//! custodied asset to the ledger directly, and those funds can never be
//! rescued.

use tokenlock_types::{Amount, Result, TokenLockError};

/// Cumulative deposit and withdrawal totals for the custodied asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustodyConservation {
    deposits: Amount,
    withdrawals: Amount,
}

impl CustodyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals after a deposit, without recording it.
    pub fn with_deposit(self, amount: Amount) -> Result<Self> {
        let deposits = self
            .deposits
            .checked_add(amount)
            .ok_or(TokenLockError::AmountOverflow)?;
        Ok(Self { deposits, ..self })
    }

    /// Totals after a withdrawal, without recording it.
    pub fn with_withdrawal(self, amount: Amount) -> Result<Self> {
        let withdrawals = self
            .withdrawals
            .checked_add(amount)
            .ok_or(TokenLockError::AmountOverflow)?;
        if withdrawals > self.deposits {
            return Err(TokenLockError::CustodyInvariantViolation {
                reason: format!(
                    "withdrawals {withdrawals} would exceed deposits {}",
                    self.deposits
                ),
            });
        }
        Ok(Self {
            withdrawals,
            ..self
        })
    }

    /// Expected sum of holder claims: deposits - withdrawals.
    #[must_use]
    pub fn expected_held(&self) -> Amount {
        self.deposits.saturating_sub(self.withdrawals)
    }

    #[must_use]
    pub fn total_deposits(&self) -> Amount {
        self.deposits
    }

    #[must_use]
    pub fn total_withdrawals(&self) -> Amount {
        self.withdrawals
    }

    /// Check holder claims and custody balance against the recorded totals.
    ///
    /// # Errors
    /// Returns [`TokenLockError::CustodyInvariantViolation`] if either
    /// relation fails.
    pub fn verify(&self, held: Amount, custody_balance: Amount) -> Result<()> {
        let expected = self.expected_held();
        if held != expected {
            return Err(TokenLockError::CustodyInvariantViolation {
                reason: format!(
                    "holder claims {held} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.deposits, self.withdrawals
                ),
            });
        }
        if custody_balance < held {
            return Err(TokenLockError::CustodyInvariantViolation {
                reason: format!("custody balance {custody_balance} < holder claims {held}"),
            });
        }
        Ok(())
    }
}
