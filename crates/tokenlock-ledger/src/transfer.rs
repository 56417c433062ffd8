//! Asset transfer port: the ledger's only way to move value.
//!
//! Asset implementations disagree on how they report a transfer: some return
//! `true`/`false`, some return nothing and fail loudly. [`confirm`] folds
//! both conventions into a ledger `Result`. A `false` return is a failure
//! even though no fault was raised.

use thiserror::Error;
use tokenlock_types::{Amount, AssetId, HolderId, Result, TokenLockError};

/// What a transfer call returned when it did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferReturn {
    /// The asset returned an explicit success flag.
    Bool(bool),
    /// The asset returned nothing.
    Empty,
}

/// A transfer call that failed outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferFault {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("asset {0} is paused")]
    Paused(AssetId),

    #[error("recipient balance overflow")]
    Overflow,

    #[error("{0}")]
    Other(String),
}

pub type TransferOutcome = std::result::Result<TransferReturn, TransferFault>;

/// Moves fungible assets between holders and the ledger's custody account.
pub trait AssetTransferPort {
    /// Pull `amount` of `asset` from `from` into custody.
    fn transfer_in(&mut self, asset: AssetId, from: HolderId, amount: Amount) -> TransferOutcome;

    /// Push `amount` of `asset` from custody to `to`.
    fn transfer_out(&mut self, asset: AssetId, to: HolderId, amount: Amount) -> TransferOutcome;

    /// Balance of `holder` outside the ledger.
    fn balance_of(&self, asset: AssetId, holder: HolderId) -> Amount;

    /// Balance held in the ledger's custody account.
    fn custody_balance(&self, asset: AssetId) -> Amount;
}

/// Normalize a transfer outcome.
///
/// # Errors
/// - `TransferRejected` if the asset returned `false`
/// - `TransferFailed` if the call faulted
pub fn confirm(asset: AssetId, outcome: TransferOutcome) -> Result<()> {
    match outcome {
        Ok(TransferReturn::Bool(true) | TransferReturn::Empty) => Ok(()),
        Ok(TransferReturn::Bool(false)) => Err(TokenLockError::TransferRejected { asset }),
        Err(fault) => Err(TokenLockError::TransferFailed {
            reason: fault.to_string(),
        }),
    }
}
