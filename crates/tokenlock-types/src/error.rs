//! Error types for the TokenLock custody ledger.
//!
//! All errors use the `TL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Construction / configuration errors
//! - 2xx: Input validation errors
//! - 3xx: Balance and arithmetic errors
//! - 4xx: Authorization errors
//! - 5xx: Asset-safety errors
//! - 6xx: Upstream transfer errors
//! - 8xx: Invariant violations
//! - 9xx: General / internal errors
//!
//! Every error rejects the whole attempted operation: ledger state is left
//! exactly as it was before the call.

use thiserror::Error;

use crate::{Amount, AssetId, HolderId};

/// Central error enum for all TokenLock operations.
#[derive(Debug, Error)]
pub enum TokenLockError {
    // =================================================================
    // Construction Errors (1xx)
    // =================================================================
    /// The custodied asset address is the null address.
    #[error("TL_ERR_100: Invalid asset address")]
    InvalidAssetAddress,

    /// The cooldown period is zero.
    #[error("TL_ERR_101: Invalid cooldown period")]
    InvalidCooldownPeriod,

    // =================================================================
    // Input Errors (2xx)
    // =================================================================
    /// Zero amount passed to `lock` or `unlock`.
    #[error("TL_ERR_200: Invalid token amount")]
    InvalidTokenAmount,

    // =================================================================
    // Balance Errors (3xx)
    // =================================================================
    /// Unlock request exceeds the holder's locked balance.
    #[error("TL_ERR_300: Unlock amount exceeded: requested {requested}, locked {locked}")]
    UnlockAmountExceeded { requested: Amount, locked: Amount },

    /// An addition on a balance would overflow the amount domain.
    #[error("TL_ERR_301: Amount overflow")]
    AmountOverflow,

    /// A subtraction on a balance would go below zero.
    #[error("TL_ERR_302: Balance underflow")]
    BalanceUnderflow,

    /// The holder's unlock queue has exhausted its index space.
    #[error("TL_ERR_303: Unlock queue index overflow for holder {0}")]
    QueueIndexOverflow(HolderId),

    /// `now + cooldown` does not fit in a timestamp.
    #[error("TL_ERR_304: Timestamp overflow")]
    TimestampOverflow,

    // =================================================================
    // Authorization Errors (4xx)
    // =================================================================
    /// Caller is not the privileged operator.
    #[error("TL_ERR_400: Unauthorized caller: {caller}")]
    Unauthorized { caller: HolderId },

    // =================================================================
    // Asset-Safety Errors (5xx)
    // =================================================================
    /// Attempt to divert the custodied asset through the recovery path.
    #[error("TL_ERR_500: Cannot rescue custodied asset {0}")]
    CannotRescueCustodiedAsset(AssetId),

    // =================================================================
    // Transfer Errors (6xx)
    // =================================================================
    /// The asset transfer call failed outright.
    #[error("TL_ERR_600: Asset transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The asset transfer call returned `false`.
    #[error("TL_ERR_601: Asset transfer rejected by {asset}")]
    TransferRejected { asset: AssetId },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// Per-holder bookkeeping invariant broken.
    #[error("TL_ERR_800: Holder invariant violation for {holder}: {reason}")]
    HolderInvariantViolation { holder: HolderId, reason: String },

    /// Custody conservation invariant broken. Critical safety alert.
    #[error("TL_ERR_801: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    /// The event journal hash chain does not verify.
    #[error("TL_ERR_802: Journal chain broken at sequence {sequence}")]
    JournalChainBroken { sequence: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, missing fields, etc.).
    #[error("TL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TokenLockError>;

impl From<serde_json::Error> for TokenLockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = TokenLockError::InvalidTokenAmount;
        let msg = format!("{err}");
        assert!(msg.starts_with("TL_ERR_200"), "Got: {msg}");
    }

    #[test]
    fn unlock_amount_exceeded_display() {
        let err = TokenLockError::UnlockAmountExceeded {
            requested: 100,
            locked: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("TL_ERR_300"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn rescue_error_names_asset() {
        let asset = AssetId::from_seed(9);
        let msg = TokenLockError::CannotRescueCustodiedAsset(asset).to_string();
        assert!(msg.contains("TL_ERR_500"));
        assert!(msg.contains(&asset.to_string()));
    }

    #[test]
    fn all_errors_have_tl_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(TokenLockError::InvalidAssetAddress),
            Box::new(TokenLockError::InvalidCooldownPeriod),
            Box::new(TokenLockError::AmountOverflow),
            Box::new(TokenLockError::Unauthorized {
                caller: HolderId::from_seed(1),
            }),
            Box::new(TokenLockError::TransferFailed {
                reason: "insufficient balance".into(),
            }),
            Box::new(TokenLockError::JournalChainBroken { sequence: 3 }),
            Box::new(TokenLockError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("TL_ERR_"),
                "Error missing TL_ERR_ prefix: {msg}"
            );
        }
    }
}
