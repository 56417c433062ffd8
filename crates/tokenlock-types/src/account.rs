//! Holder account and unlock entry types.
//!
//! Every holder has a `locked` balance (deposited, not yet requested for
//! release) and an `unlocked` balance (requested, waiting in the unlock
//! queue). The queue cursor is the half-open range `[queue_start, queue_end)`.

use serde::{Deserialize, Serialize};

use crate::{Amount, Timestamp, TokenLockError, UnlockIndex};

/// Per-holder bookkeeping.
///
/// A zero-valued account is indistinguishable from one that was never
/// created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderAccount {
    /// Deposited and not yet requested for release.
    pub locked: Amount,
    /// Requested for release; sum of the live unlock entries.
    pub unlocked: Amount,
    /// Withdraw cursor: first not-yet-consumed unlock index.
    pub queue_start: UnlockIndex,
    /// Next unlock index to be assigned.
    pub queue_end: UnlockIndex,
}

impl HolderAccount {
    /// Create a zero account.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The holder's full claim on the ledger (`locked + unlocked`).
    pub fn total(&self) -> crate::Result<Amount> {
        self.locked
            .checked_add(self.unlocked)
            .ok_or(TokenLockError::AmountOverflow)
    }

    /// Number of live (not yet withdrawn) unlock entries.
    #[must_use]
    pub fn pending_len(&self) -> u64 {
        self.queue_end.saturating_sub(self.queue_start)
    }

    /// Whether the account holds nothing and has no live entries.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.locked == 0 && self.unlocked == 0 && self.pending_len() == 0
    }
}

/// One pending release request.
///
/// Consumed and never-created slots read as [`UnlockEntry::EMPTY`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEntry {
    /// Amount released by this request.
    pub amount: Amount,
    /// Instant at or after which the entry may be withdrawn.
    pub matures_at: Timestamp,
}

impl UnlockEntry {
    pub const EMPTY: Self = Self {
        amount: 0,
        matures_at: Timestamp::ZERO,
    };

    #[must_use]
    pub fn new(amount: Amount, matures_at: Timestamp) -> Self {
        Self { amount, matures_at }
    }

    /// Whether the entry may be withdrawn at `now`.
    #[must_use]
    pub fn is_matured(&self, now: Timestamp) -> bool {
        self.matures_at <= now
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_is_zero() {
        let acct = HolderAccount::default();
        assert_eq!(acct.locked, 0);
        assert_eq!(acct.unlocked, 0);
        assert_eq!(acct.pending_len(), 0);
        assert!(acct.is_zero());
        assert_eq!(acct, HolderAccount::new());
    }

    #[test]
    fn account_total() {
        let acct = HolderAccount {
            locked: 500,
            unlocked: 250,
            queue_start: 1,
            queue_end: 3,
        };
        assert_eq!(acct.total().unwrap(), 750);
        assert_eq!(acct.pending_len(), 2);
        assert!(!acct.is_zero());
    }

    #[test]
    fn account_total_overflow_is_an_error() {
        let acct = HolderAccount {
            locked: Amount::MAX,
            unlocked: 1,
            queue_start: 0,
            queue_end: 1,
        };
        assert!(matches!(
            acct.total().unwrap_err(),
            TokenLockError::AmountOverflow
        ));
    }

    #[test]
    fn drained_account_with_advanced_cursor_is_zero() {
        let acct = HolderAccount {
            locked: 0,
            unlocked: 0,
            queue_start: 4,
            queue_end: 4,
        };
        assert!(acct.is_zero());
    }

    #[test]
    fn entry_maturity_is_inclusive() {
        let entry = UnlockEntry::new(10, Timestamp(100));
        assert!(!entry.is_matured(Timestamp(99)));
        assert!(entry.is_matured(Timestamp(100)));
        assert!(entry.is_matured(Timestamp(101)));
    }

    #[test]
    fn empty_entry() {
        assert!(UnlockEntry::default().is_empty());
        assert!(!UnlockEntry::new(1, Timestamp(0)).is_empty());
    }

    #[test]
    fn account_serde_roundtrip() {
        let acct = HolderAccount {
            locked: 10u128.pow(27),
            unlocked: 42,
            queue_start: 2,
            queue_end: 9,
        };
        let json = serde_json::to_string(&acct).unwrap();
        let back: HolderAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(acct, back);
    }
}
