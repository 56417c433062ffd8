//! # tokenlock-ledger
//!
//! **Custody engine**: holds deposits of one fungible asset, releases them
//! through a per-holder cooldown queue, and lets an operator recover foreign
//! assets sent to the ledger by mistake.
//!
//! ## Architecture
//!
//! [`TokenLock`] owns every piece of state and drives each operation:
//! 1. Validates the request (amounts, caller, asset)
//! 2. Commits bookkeeping in [`BalanceLedger`] and [`UnlockQueue`]
//! 3. Updates the [`CustodyConservation`] totals
//! 4. Moves value through its [`AssetTransferPort`], rolling back on failure
//! 5. Appends the committed event to the hash-chained [`EventJournal`]
//!
//! ## Holder lifecycle
//!
//! ```text
//! lock → locked ──unlock──→ unlocked (queued, cooldown) ──withdraw──→ paid out
//! ```

pub mod access;
pub mod balance_ledger;
pub mod clock;
pub mod conservation;
pub mod journal;
pub mod memory_bank;
pub mod rescue;
pub mod token_lock;
pub mod transfer;
pub mod unlock_queue;

pub use access::{AccessGate, SingleOperator};
pub use balance_ledger::BalanceLedger;
pub use clock::{Clock, ManualClock, SystemClock};
pub use conservation::CustodyConservation;
pub use journal::{EventJournal, JournalRecord};
pub use memory_bank::{InMemoryAssetBank, TransferStyle};
pub use rescue::RecoveryGuard;
pub use token_lock::TokenLock;
pub use transfer::{AssetTransferPort, TransferFault, TransferOutcome, TransferReturn};
pub use unlock_queue::{MaturedScan, UnlockQueue};
