//! The custody ledger: lock, unlock, withdraw, and read-only queries.
//!
//! ## Operation Flow
//!
//! ```text
//! lock(amount)      → BalanceLedger.locked += amount → port.transfer_in
//! unlock(amount)    → locked -= amount, unlocked += amount → UnlockQueue.append(now + cooldown)
//! withdraw(max)     → UnlockQueue.scan_matured → consume prefix → unlocked -= total → port.transfer_out
//! ```
//!
//! ## Atomicity
//!
//! Bookkeeping is committed before the external transfer is invoked, so the
//! port always observes final state. If the transfer fails, the holder's
//! account, the consumed queue entries, and the conservation totals are
//! restored exactly and no event is recorded. The port is owned by the
//! ledger and called through `&mut self`, so it cannot call back into the
//! same ledger while an operation is in flight.

use tokenlock_types::{
    Amount, AssetId, HolderAccount, HolderId, LedgerEvent, LockConfig, Result, TokenLockError,
    UnlockEntry, UnlockIndex,
};
use tracing::{debug, error, info, warn};

use crate::{
    access::{AccessGate, SingleOperator},
    balance_ledger::BalanceLedger,
    clock::{Clock, SystemClock},
    conservation::CustodyConservation,
    journal::EventJournal,
    rescue::RecoveryGuard,
    transfer::{AssetTransferPort, confirm},
    unlock_queue::UnlockQueue,
};

/// Custody ledger for a single fungible asset.
///
/// Generic over its collaborators: the asset transfer port `P`, the access
/// gate `G` guarding [`TokenLock::rescue_token`], and the clock `C`.
pub struct TokenLock<P, G, C = SystemClock> {
    /// Immutable configuration.
    pub(crate) config: LockConfig,
    /// Per-holder balances and queue cursors.
    pub(crate) balances: BalanceLedger,
    /// Per-holder unlock entries.
    pub(crate) queue: UnlockQueue,
    /// Cumulative deposit/withdrawal totals.
    pub(crate) conservation: CustodyConservation,
    /// Committed events.
    pub(crate) journal: EventJournal,
    /// Blocks recovery of the custodied asset.
    pub(crate) recovery: RecoveryGuard,
    pub(crate) port: P,
    pub(crate) gate: G,
    pub(crate) clock: C,
}

impl<P, C> TokenLock<P, SingleOperator, C>
where
    P: AssetTransferPort,
    C: Clock,
{
    /// Create a ledger whose privileged operator is `operator`.
    ///
    /// # Errors
    /// - `InvalidAssetAddress` if the custodied asset is the null address
    /// - `InvalidCooldownPeriod` if the cooldown is zero
    pub fn with_operator(operator: HolderId, config: LockConfig, port: P, clock: C) -> Result<Self> {
        Self::new(config, port, SingleOperator::new(operator), clock)
    }
}

impl<P, G, C> TokenLock<P, G, C>
where
    P: AssetTransferPort,
    G: AccessGate,
    C: Clock,
{
    /// Create a ledger from explicit collaborators.
    ///
    /// # Errors
    /// - `InvalidAssetAddress` if the custodied asset is the null address
    /// - `InvalidCooldownPeriod` if the cooldown is zero
    pub fn new(config: LockConfig, port: P, gate: G, clock: C) -> Result<Self> {
        config.validate()?;
        info!(
            asset = %config.custodied_asset,
            cooldown_secs = config.cooldown_secs,
            "Token lock created"
        );
        Ok(Self {
            recovery: RecoveryGuard::new(config.custodied_asset),
            config,
            balances: BalanceLedger::new(),
            queue: UnlockQueue::new(),
            conservation: CustodyConservation::new(),
            journal: EventJournal::new(),
            port,
            gate,
            clock,
        })
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Deposit `amount` of the custodied asset from `caller` into `locked`.
    ///
    /// # Errors
    /// - `InvalidTokenAmount` if `amount == 0`
    /// - `AmountOverflow` if the holder's or the ledger's totals would overflow
    /// - `TransferFailed` / `TransferRejected` if the pull-in fails
    pub fn lock(&mut self, caller: HolderId, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(TokenLockError::InvalidTokenAmount);
        }

        let snapshot = self.balances.snapshot(caller);
        let conservation = self.conservation;

        // Effects
        let totals = conservation.with_deposit(amount)?;
        let account = self.balances.credit_locked(caller, amount)?;
        self.conservation = totals;

        // Interaction
        let asset = self.config.custodied_asset;
        if let Err(err) = confirm(asset, self.port.transfer_in(asset, caller, amount)) {
            self.balances.restore(caller, snapshot);
            self.conservation = conservation;
            warn!(holder = %caller, amount, error = %err, "Lock rolled back: transfer in failed");
            return Err(err);
        }

        self.journal.append(LedgerEvent::Locked {
            holder: caller,
            amount,
        });
        info!(holder = %caller, amount, locked = account.locked, "Locked");
        Ok(())
    }

    /// Request release of `amount` from `locked`. The new entry matures
    /// after the cooldown. Returns the entry's index.
    ///
    /// # Errors
    /// - `InvalidTokenAmount` if `amount == 0`
    /// - `UnlockAmountExceeded` if `amount > locked`
    /// - `TimestampOverflow` if `now + cooldown` does not fit
    /// - `QueueIndexOverflow` if the holder's index space is exhausted
    pub fn unlock(&mut self, caller: HolderId, amount: Amount) -> Result<UnlockIndex> {
        if amount == 0 {
            return Err(TokenLockError::InvalidTokenAmount);
        }

        let matures_at = self
            .clock
            .now()
            .checked_add_secs(self.config.cooldown_secs)?;
        let index = self.balances.begin_unlock(caller, amount)?;
        self.queue
            .append(caller, index, UnlockEntry::new(amount, matures_at));

        self.journal.append(LedgerEvent::Unlocked {
            holder: caller,
            index,
            amount,
        });
        info!(holder = %caller, index, amount, matures_at = matures_at.as_secs(), "Unlocked");
        Ok(index)
    }

    /// Withdraw matured unlock entries, oldest first.
    ///
    /// `max_entries == 0` drains every matured entry; otherwise at most
    /// `max_entries` entries are processed. The scan stops at the first
    /// immature entry either way. Returns the amount paid out, which is zero
    /// (with no transfer) when nothing has matured.
    ///
    /// # Errors
    /// - `TransferFailed` / `TransferRejected` if the payout fails
    pub fn withdraw(&mut self, caller: HolderId, max_entries: u32) -> Result<Amount> {
        let now = self.clock.now();
        let account = self.balances.account(caller);
        let scan = self.queue.scan_matured(
            caller,
            account.queue_start,
            account.queue_end,
            max_entries,
            now,
        )?;

        if scan.is_empty() {
            debug!(
                holder = %caller,
                queue_start = account.queue_start,
                queue_end = account.queue_end,
                "Nothing matured to withdraw"
            );
            return Ok(0);
        }

        let snapshot = self.balances.snapshot(caller);
        let conservation = self.conservation;

        // Effects
        let totals = conservation.with_withdrawal(scan.total)?;
        let account = self
            .balances
            .settle_withdrawal(caller, scan.next_start, scan.total)?;
        let removed = self.queue.consume(caller, &scan);
        self.conservation = totals;

        // Interaction
        let asset = self.config.custodied_asset;
        if let Err(err) = confirm(asset, self.port.transfer_out(asset, caller, scan.total)) {
            self.queue.restore(caller, removed);
            self.balances.restore(caller, snapshot);
            self.conservation = conservation;
            warn!(
                holder = %caller,
                total = scan.total,
                entries = scan.len(),
                error = %err,
                "Withdraw rolled back: transfer out failed"
            );
            return Err(err);
        }

        for &(index, amount) in &scan.consumed {
            debug!(holder = %caller, index, amount, "Unlock entry withdrawn");
            self.journal.append(LedgerEvent::Withdrawn {
                holder: caller,
                index,
                amount,
            });
        }
        info!(
            holder = %caller,
            total = scan.total,
            entries = scan.len(),
            queue_start = account.queue_start,
            queue_end = account.queue_end,
            "Withdrawn"
        );
        Ok(scan.total)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// `(locked, unlocked, queue_start, queue_end)` for `holder`.
    #[must_use]
    pub fn holder_account(&self, holder: HolderId) -> HolderAccount {
        self.balances.account(holder)
    }

    /// Entry at `index`; zero-valued for consumed or never-created indices.
    #[must_use]
    pub fn unlock_entry(&self, holder: HolderId, index: UnlockIndex) -> UnlockEntry {
        self.queue.get(holder, index)
    }

    /// The holder's full claim on the ledger: `locked + unlocked`.
    #[must_use]
    pub fn total_balance(&self, holder: HolderId) -> Amount {
        // Bounded by the checked cumulative deposit total, so it cannot wrap.
        let account = self.balances.account(holder);
        account.locked.saturating_add(account.unlocked)
    }

    /// Live entries `[queue_start, queue_end)` for `holder`.
    #[must_use]
    pub fn pending_entries(&self, holder: HolderId) -> Vec<(UnlockIndex, UnlockEntry)> {
        let account = self.balances.account(holder);
        self.queue
            .range(holder, account.queue_start, account.queue_end)
    }

    /// Number of holders that have ever locked.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    #[must_use]
    pub fn custodied_asset(&self) -> AssetId {
        self.config.custodied_asset
    }

    #[must_use]
    pub fn cooldown(&self) -> std::time::Duration {
        self.config.cooldown()
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    #[must_use]
    pub fn conservation(&self) -> &CustodyConservation {
        &self.conservation
    }

    #[must_use]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the port, for funding holders or simulating
    /// upstream conditions.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    #[must_use]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // -----------------------------------------------------------------
    // Invariant checks
    // -----------------------------------------------------------------

    /// Check `queue_start <= queue_end` and that `unlocked` equals the sum
    /// of exactly the live entries.
    ///
    /// # Errors
    /// Returns `HolderInvariantViolation` describing the first broken rule.
    pub fn verify_holder(&self, holder: HolderId) -> Result<()> {
        let violation = |reason: String| {
            error!(holder = %holder, reason = %reason, "Holder invariant violation");
            Err(TokenLockError::HolderInvariantViolation { holder, reason })
        };

        let account = self.balances.account(holder);
        if account.queue_start > account.queue_end {
            return violation(format!(
                "queue_start {} > queue_end {}",
                account.queue_start, account.queue_end
            ));
        }

        let mut sum: Amount = 0;
        for (index, entry) in self.pending_entries(holder) {
            if entry.amount == 0 {
                return violation(format!("live entry {index} is empty"));
            }
            sum = sum
                .checked_add(entry.amount)
                .ok_or(TokenLockError::AmountOverflow)?;
        }
        if sum != account.unlocked {
            return violation(format!(
                "unlocked {} != live entry sum {sum}",
                account.unlocked
            ));
        }

        let stored = self.queue.stored_for(holder) as u64;
        if stored != account.pending_len() {
            return violation(format!(
                "{stored} stored entries, {} live",
                account.pending_len()
            ));
        }
        Ok(())
    }

    /// Check the custody conservation invariant against the port.
    ///
    /// # Errors
    /// Returns `CustodyInvariantViolation` if holder claims do not match the
    /// recorded totals or exceed the custody balance.
    pub fn verify_custody(&self) -> Result<()> {
        let held = self.balances.total_held()?;
        let custody = self.port.custody_balance(self.config.custodied_asset);
        self.conservation.verify(held, custody).inspect_err(|err| {
            error!(error = %err, "Custody invariant violation");
        })
    }

    /// Run [`TokenLock::verify_holder`] for every holder, then
    /// [`TokenLock::verify_custody`] and the journal chain.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn verify_all(&self) -> Result<()> {
        for holder in self.balances.holders() {
            self.verify_holder(holder)?;
        }
        self.verify_custody()?;
        self.journal.verify_chain()
    }
}
