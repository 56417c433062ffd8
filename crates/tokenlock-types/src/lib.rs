//! # tokenlock-types
//!
//! Shared types, errors, and configuration for the **TokenLock** custody ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`HolderId`], [`AssetId`], [`Timestamp`], [`UnlockIndex`]
//! - **Amounts**: [`Amount`], a fixed-width unsigned domain with checked arithmetic
//! - **Account model**: [`HolderAccount`], [`UnlockEntry`]
//! - **Events**: [`LedgerEvent`]
//! - **Configuration**: [`LockConfig`]
//! - **Errors**: [`TokenLockError`] with `TL_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod account;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use tokenlock_types::{HolderId, HolderAccount, LedgerEvent, ...};

pub use account::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `tokenlock_types::constants::FOO`
// (not re-exported to avoid name collisions).
