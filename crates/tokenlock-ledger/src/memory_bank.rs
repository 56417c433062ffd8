//! In-memory multi-asset balance book implementing [`AssetTransferPort`].
//!
//! Tracks per-(asset, holder) balances plus one custody balance per asset
//! (the funds held by the ledger). Each asset can be configured with a
//! [`TransferStyle`] to mimic the different ways real assets report
//! success and failure, and can be paused so that every transfer fails.

use std::collections::{HashMap, HashSet};

use tokenlock_types::{Amount, AssetId, HolderId};

use crate::transfer::{AssetTransferPort, TransferFault, TransferOutcome, TransferReturn};

/// How an asset reports the outcome of a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferStyle {
    /// Returns `true` on success, faults on failure.
    #[default]
    Standard,
    /// Returns nothing on success, faults on failure.
    NoReturnValue,
    /// Returns `true` on success, `false` on failure, never faults.
    FalseOnFailure,
}

/// Balance book backing the ledger in tests and simulations.
#[derive(Debug, Default)]
pub struct InMemoryAssetBank {
    /// Per-(asset, holder) balances outside the ledger.
    balances: HashMap<(AssetId, HolderId), Amount>,
    /// Per-asset balance held in custody by the ledger.
    custody: HashMap<AssetId, Amount>,
    /// Reporting convention per asset; absent means `Standard`.
    styles: HashMap<AssetId, TransferStyle>,
    /// Assets whose transfers currently fail.
    paused: HashSet<AssetId>,
}

impl InMemoryAssetBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, asset: AssetId, style: TransferStyle) {
        self.styles.insert(asset, style);
    }

    #[must_use]
    pub fn style(&self, asset: AssetId) -> TransferStyle {
        self.styles.get(&asset).copied().unwrap_or_default()
    }

    pub fn pause(&mut self, asset: AssetId) {
        self.paused.insert(asset);
    }

    pub fn unpause(&mut self, asset: AssetId) {
        self.paused.remove(&asset);
    }

    /// Create `amount` of `asset` out of thin air for `to`.
    pub fn mint(&mut self, asset: AssetId, to: HolderId, amount: Amount) {
        let entry = self.balances.entry((asset, to)).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Credit custody directly, as if someone sent `asset` to the ledger
    /// without going through `lock`.
    pub fn mint_to_custody(&mut self, asset: AssetId, amount: Amount) {
        let entry = self.custody.entry(asset).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Sum of all holder and custody balances for `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .map(|(_, amount)| *amount)
            .fold(self.custody_balance(asset), Amount::saturating_add)
    }

    fn success(&self, asset: AssetId) -> TransferOutcome {
        match self.style(asset) {
            TransferStyle::NoReturnValue => Ok(TransferReturn::Empty),
            TransferStyle::Standard | TransferStyle::FalseOnFailure => {
                Ok(TransferReturn::Bool(true))
            }
        }
    }

    fn failure(&self, asset: AssetId, fault: TransferFault) -> TransferOutcome {
        match self.style(asset) {
            TransferStyle::FalseOnFailure => Ok(TransferReturn::Bool(false)),
            TransferStyle::Standard | TransferStyle::NoReturnValue => Err(fault),
        }
    }
}

impl AssetTransferPort for InMemoryAssetBank {
    fn transfer_in(&mut self, asset: AssetId, from: HolderId, amount: Amount) -> TransferOutcome {
        if self.paused.contains(&asset) {
            return self.failure(asset, TransferFault::Paused(asset));
        }

        let available = self.balance_of(asset, from);
        if available < amount {
            return self.failure(
                asset,
                TransferFault::InsufficientBalance {
                    needed: amount,
                    available,
                },
            );
        }
        let Some(custody) = self.custody_balance(asset).checked_add(amount) else {
            return self.failure(asset, TransferFault::Overflow);
        };

        self.balances.insert((asset, from), available - amount);
        self.custody.insert(asset, custody);
        self.success(asset)
    }

    fn transfer_out(&mut self, asset: AssetId, to: HolderId, amount: Amount) -> TransferOutcome {
        if self.paused.contains(&asset) {
            return self.failure(asset, TransferFault::Paused(asset));
        }

        let available = self.custody_balance(asset);
        if available < amount {
            return self.failure(
                asset,
                TransferFault::InsufficientBalance {
                    needed: amount,
                    available,
                },
            );
        }
        let Some(credited) = self.balance_of(asset, to).checked_add(amount) else {
            return self.failure(asset, TransferFault::Overflow);
        };

        self.custody.insert(asset, available - amount);
        self.balances.insert((asset, to), credited);
        self.success(asset)
    }

    fn balance_of(&self, asset: AssetId, holder: HolderId) -> Amount {
        self.balances.get(&(asset, holder)).copied().unwrap_or(0)
    }

    fn custody_balance(&self, asset: AssetId) -> Amount {
        self.custody.get(&asset).copied().unwrap_or(0)
    }
}
