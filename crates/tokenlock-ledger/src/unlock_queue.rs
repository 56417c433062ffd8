//! Per-holder unlock queues.
//!
//! Entries live in an append-only, index-addressed store keyed by
//! `(holder, index)`. The live range of a holder's queue is the half-open
//! cursor range `[queue_start, queue_end)` kept on the holder's account;
//! this module never owns the cursors.
//!
//! Entries are appended with `matures_at = now + cooldown` and a constant
//! cooldown, so maturity is non-decreasing in index order. A scan from the
//! cursor can therefore stop at the first immature entry: nothing behind it
//! can be matured.
//!
//! Withdrawal happens in two steps so the caller can roll back:
//! 1. [`UnlockQueue::scan_matured`] is read-only and plans the consumption
//! 2. [`UnlockQueue::consume`] zeroes the planned prefix and returns the
//!    removed entries, which [`UnlockQueue::restore`] can put back

use std::collections::HashMap;

use tokenlock_types::{
    Amount, HolderId, Result, Timestamp, TokenLockError, UnlockEntry, UnlockIndex, constants,
};

/// Result of a read-only maturity scan over one holder's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaturedScan {
    /// Cursor before the scan.
    pub start: UnlockIndex,
    /// Cursor after consuming the scanned prefix.
    pub next_start: UnlockIndex,
    /// Sum of all consumed amounts.
    pub total: Amount,
    /// `(index, amount)` per consumed entry, in index order.
    pub consumed: Vec<(UnlockIndex, Amount)>,
}

impl MaturedScan {
    /// Whether the scan found nothing to withdraw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }

    /// Number of entries the scan consumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.consumed.len()
    }
}

/// Index-addressed store of all holders' unlock entries.
#[derive(Debug, Default)]
pub struct UnlockQueue {
    /// Live entries by `(holder, index)`. Consumed entries are removed,
    /// which reads back as [`UnlockEntry::EMPTY`].
    entries: HashMap<(HolderId, UnlockIndex), UnlockEntry>,
}

impl UnlockQueue {
    /// Create an empty queue store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` at `index` of `holder`'s queue.
    ///
    /// The caller assigns `index` from the holder's `queue_end` cursor, so a
    /// slot is never written twice.
    pub fn append(&mut self, holder: HolderId, index: UnlockIndex, entry: UnlockEntry) {
        self.entries.insert((holder, index), entry);
    }

    /// Entry at `index`, or [`UnlockEntry::EMPTY`] for consumed and
    /// never-created slots.
    #[must_use]
    pub fn get(&self, holder: HolderId, index: UnlockIndex) -> UnlockEntry {
        self.entries
            .get(&(holder, index))
            .copied()
            .unwrap_or(UnlockEntry::EMPTY)
    }

    /// Plan a withdrawal from `start` towards `end`.
    ///
    /// Visits entries in index order and stops at the first of:
    /// - the end of the live range
    /// - `max_entries` visited, when `max_entries` is non-zero
    /// - an entry with `matures_at > now`
    ///
    /// `max_entries == 0` ([`constants::WITHDRAW_ALL`]) drains every matured
    /// entry. Cost is proportional to the entries consumed plus one.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the consumed amounts do not fit in
    /// [`Amount`].
    pub fn scan_matured(
        &self,
        holder: HolderId,
        start: UnlockIndex,
        end: UnlockIndex,
        max_entries: u32,
        now: Timestamp,
    ) -> Result<MaturedScan> {
        let cap = if max_entries == constants::WITHDRAW_ALL {
            u64::MAX
        } else {
            u64::from(max_entries)
        };

        let mut index = start;
        let mut total: Amount = 0;
        let mut consumed = Vec::new();

        while index < end && (consumed.len() as u64) < cap {
            let entry = self.get(holder, index);
            if !entry.is_matured(now) {
                break;
            }
            total = total
                .checked_add(entry.amount)
                .ok_or(TokenLockError::AmountOverflow)?;
            consumed.push((index, entry.amount));
            index += 1;
        }

        Ok(MaturedScan {
            start,
            next_start: index,
            total,
            consumed,
        })
    }

    /// Zero every entry in the scanned prefix and return what was removed.
    pub fn consume(
        &mut self,
        holder: HolderId,
        scan: &MaturedScan,
    ) -> Vec<(UnlockIndex, UnlockEntry)> {
        scan.consumed
            .iter()
            .filter_map(|(index, _)| {
                self.entries
                    .remove(&(holder, *index))
                    .map(|entry| (*index, entry))
            })
            .collect()
    }

    /// Put back entries previously returned by [`UnlockQueue::consume`].
    pub fn restore(&mut self, holder: HolderId, removed: Vec<(UnlockIndex, UnlockEntry)>) {
        for (index, entry) in removed {
            self.entries.insert((holder, index), entry);
        }
    }

    /// Live entries of `holder` in `[start, end)`.
    #[must_use]
    pub fn range(
        &self,
        holder: HolderId,
        start: UnlockIndex,
        end: UnlockIndex,
    ) -> Vec<(UnlockIndex, UnlockEntry)> {
        (start..end)
            .map(|index| (index, self.get(holder, index)))
            .collect()
    }

    /// Number of stored entries belonging to `holder`. Walks the whole store;
    /// meant for audits, not for hot paths.
    #[must_use]
    pub fn stored_for(&self, holder: HolderId) -> usize {
        self.entries.keys().filter(|(h, _)| *h == holder).count()
    }

    /// Total number of stored (live) entries across all holders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
