//! Recovery of foreign assets sent to the ledger by mistake.
//!
//! Only the operator may rescue, and never the custodied asset: every unit
//! of the custodied asset in custody backs some holder's claim, or was sent
//! directly and is unrecoverable by anyone.

use tokenlock_types::{Amount, AssetId, HolderId, LedgerEvent, Result, TokenLockError};
use tracing::{info, warn};

use crate::{
    access::AccessGate,
    clock::Clock,
    token_lock::TokenLock,
    transfer::{AssetTransferPort, confirm},
};

/// Refuses recovery of the one asset the ledger custodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryGuard {
    custodied_asset: AssetId,
}

impl RecoveryGuard {
    #[must_use]
    pub fn new(custodied_asset: AssetId) -> Self {
        Self { custodied_asset }
    }

    /// Check that `asset` may be rescued.
    ///
    /// # Errors
    /// Returns `CannotRescueCustodiedAsset` for the custodied asset.
    pub fn check(&self, asset: AssetId) -> Result<()> {
        if asset == self.custodied_asset {
            return Err(TokenLockError::CannotRescueCustodiedAsset(asset));
        }
        Ok(())
    }
}

impl<P, G, C> TokenLock<P, G, C>
where
    P: AssetTransferPort,
    G: AccessGate,
    C: Clock,
{
    /// Send `amount` of a foreign `asset` held by the ledger to `to`.
    ///
    /// Holder balances are never touched.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the operator
    /// - `CannotRescueCustodiedAsset` if `asset` is the custodied asset
    /// - `TransferFailed` / `TransferRejected` if the transfer fails
    pub fn rescue_token(
        &mut self,
        caller: HolderId,
        asset: AssetId,
        to: HolderId,
        amount: Amount,
    ) -> Result<()> {
        if !self.gate.is_operator(caller) {
            warn!(caller = %caller, asset = %asset, "Rescue rejected: not operator");
            return Err(TokenLockError::Unauthorized { caller });
        }
        if let Err(err) = self.recovery.check(asset) {
            warn!(caller = %caller, asset = %asset, "Rescue rejected: custodied asset");
            return Err(err);
        }

        confirm(asset, self.port.transfer_out(asset, to, amount)).inspect_err(|err| {
            warn!(asset = %asset, to = %to, amount, error = %err, "Rescue transfer failed");
        })?;

        self.journal
            .append(LedgerEvent::TokenRescued { asset, to, amount });
        info!(asset = %asset, to = %to, amount, "Token rescued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{access::SingleOperator, clock::ManualClock, memory_bank::InMemoryAssetBank};
    use tokenlock_types::{LockConfig, Timestamp};

    struct Fixture {
        lock: TokenLock<InMemoryAssetBank, SingleOperator, ManualClock>,
        custodied: AssetId,
        foreign: AssetId,
        operator: HolderId,
        alice: HolderId,
    }

    fn setup() -> Fixture {
        let custodied = AssetId::from_seed(1);
        let foreign = AssetId::from_seed(2);
        let operator = HolderId::from_seed(99);
        let alice = HolderId::from_seed(10);

        let mut bank = InMemoryAssetBank::new();
        bank.mint(custodied, alice, 1_000);
        bank.mint_to_custody(foreign, 500);

        let mut lock = TokenLock::with_operator(
            operator,
            LockConfig::new(custodied, 60),
            bank,
            ManualClock::new(Timestamp(1_000)),
        )
        .unwrap();
        lock.lock(alice, 1_000).unwrap();
        Fixture {
            lock,
            custodied,
            foreign,
            operator,
            alice,
        }
    }

    #[test]
    fn guard_blocks_only_custodied_asset() {
        let guard = RecoveryGuard::new(AssetId::from_seed(1));
        assert!(guard.check(AssetId::from_seed(1)).is_err());
        assert!(guard.check(AssetId::from_seed(2)).is_ok());
    }

    #[test]
    fn operator_rescues_foreign_asset() {
        let mut f = setup();
        let before = f.lock.holder_account(f.alice);

        f.lock
            .rescue_token(f.operator, f.foreign, f.alice, 200)
            .unwrap();

        assert_eq!(f.lock.port().balance_of(f.foreign, f.alice), 200);
        assert_eq!(f.lock.port().custody_balance(f.foreign), 300);
        assert_eq!(f.lock.holder_account(f.alice), before);
        assert_eq!(
            f.lock.journal().events().last(),
            Some(&LedgerEvent::TokenRescued {
                asset: f.foreign,
                to: f.alice,
                amount: 200
            })
        );
        f.lock.verify_all().unwrap();
    }

    #[test]
    fn non_operator_is_rejected() {
        let mut f = setup();
        let err = f
            .lock
            .rescue_token(f.alice, f.foreign, f.alice, 200)
            .unwrap_err();
        assert!(matches!(err, TokenLockError::Unauthorized { caller } if caller == f.alice));
        assert_eq!(f.lock.port().custody_balance(f.foreign), 500);
    }

    #[test]
    fn custodied_asset_cannot_be_rescued() {
        let mut f = setup();
        let events = f.lock.journal().len();
        let err = f
            .lock
            .rescue_token(f.operator, f.custodied, f.operator, 1)
            .unwrap_err();
        assert!(matches!(err, TokenLockError::CannotRescueCustodiedAsset(a) if a == f.custodied));
        assert_eq!(f.lock.port().custody_balance(f.custodied), 1_000);
        assert_eq!(f.lock.journal().len(), events);
    }

    #[test]
    fn authorization_is_checked_first() {
        let mut f = setup();
        let err = f
            .lock
            .rescue_token(f.alice, f.custodied, f.alice, 1)
            .unwrap_err();
        assert!(matches!(err, TokenLockError::Unauthorized { .. }));
    }

    #[test]
    fn rescue_more_than_held_fails() {
        let mut f = setup();
        let err = f
            .lock
            .rescue_token(f.operator, f.foreign, f.operator, 501)
            .unwrap_err();
        assert!(matches!(err, TokenLockError::TransferFailed { .. }));
        assert_eq!(f.lock.port().custody_balance(f.foreign), 500);
    }
}
