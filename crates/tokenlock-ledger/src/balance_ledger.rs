//! Per-holder locked/unlocked balances and queue cursors.
//!
//! All mutations are atomic: the new account is computed in full, with
//! checked arithmetic, before anything is written. Either the full operation
//! succeeds or the account is unchanged.

use std::collections::HashMap;

use tokenlock_types::{Amount, HolderAccount, HolderId, Result, TokenLockError, UnlockIndex};

/// Source of truth for holder balances.
///
/// Accounts are created lazily on first credit and never removed.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    accounts: HashMap<HolderId, HolderAccount>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The holder's account; zero for unknown holders.
    #[must_use]
    pub fn account(&self, holder: HolderId) -> HolderAccount {
        self.accounts.get(&holder).copied().unwrap_or_default()
    }

    /// Exact prior state for rollback, including "did not exist".
    #[must_use]
    pub fn snapshot(&self, holder: HolderId) -> Option<HolderAccount> {
        self.accounts.get(&holder).copied()
    }

    /// Put back a state taken with [`BalanceLedger::snapshot`].
    pub fn restore(&mut self, holder: HolderId, snapshot: Option<HolderAccount>) {
        match snapshot {
            Some(account) => {
                self.accounts.insert(holder, account);
            }
            None => {
                self.accounts.remove(&holder);
            }
        }
    }

    /// Increase `locked`.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the new balance does not fit.
    pub fn credit_locked(&mut self, holder: HolderId, amount: Amount) -> Result<HolderAccount> {
        let mut next = self.account(holder);
        next.locked = next
            .locked
            .checked_add(amount)
            .ok_or(TokenLockError::AmountOverflow)?;
        next.total()?;
        self.accounts.insert(holder, next);
        Ok(next)
    }

    /// Move `amount` from `locked` to `unlocked` and reserve the next queue
    /// index. Returns the reserved index.
    ///
    /// # Errors
    /// - `UnlockAmountExceeded` if `amount > locked`
    /// - `AmountOverflow` if `unlocked` would overflow
    /// - `QueueIndexOverflow` if the holder's index space is exhausted
    pub fn begin_unlock(&mut self, holder: HolderId, amount: Amount) -> Result<UnlockIndex> {
        let mut next = self.account(holder);
        if amount > next.locked {
            return Err(TokenLockError::UnlockAmountExceeded {
                requested: amount,
                locked: next.locked,
            });
        }

        let index = next.queue_end;
        next.locked -= amount;
        next.unlocked = next
            .unlocked
            .checked_add(amount)
            .ok_or(TokenLockError::AmountOverflow)?;
        next.queue_end = index
            .checked_add(1)
            .ok_or(TokenLockError::QueueIndexOverflow(holder))?;

        self.accounts.insert(holder, next);
        Ok(index)
    }

    /// Advance the withdraw cursor to `next_start` and remove `total` from
    /// `unlocked`.
    ///
    /// # Errors
    /// - `Internal` if the cursor would move backwards or past `queue_end`
    /// - `BalanceUnderflow` if `total > unlocked`
    pub fn settle_withdrawal(
        &mut self,
        holder: HolderId,
        next_start: UnlockIndex,
        total: Amount,
    ) -> Result<HolderAccount> {
        let mut next = self.account(holder);
        if next_start < next.queue_start || next_start > next.queue_end {
            return Err(TokenLockError::Internal(format!(
                "withdraw cursor {next_start} outside [{}, {}] for holder {holder}",
                next.queue_start, next.queue_end
            )));
        }
        next.unlocked = next
            .unlocked
            .checked_sub(total)
            .ok_or(TokenLockError::BalanceUnderflow)?;
        next.queue_start = next_start;

        self.accounts.insert(holder, next);
        Ok(next)
    }

    /// `locked + unlocked` for the holder.
    pub fn total_balance(&self, holder: HolderId) -> Result<Amount> {
        self.account(holder).total()
    }

    /// Sum of every holder's `locked + unlocked`.
    pub fn total_held(&self) -> Result<Amount> {
        self.accounts.values().try_fold(0, |acc: Amount, account| {
            acc.checked_add(account.total()?)
                .ok_or(TokenLockError::AmountOverflow)
        })
    }

    /// All holders that have ever been credited.
    pub fn holders(&self) -> impl Iterator<Item = HolderId> + '_ {
        self.accounts.keys().copied()
    }

    /// Number of holder accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
