//! Ledger events.
//!
//! Every committed state transition produces one or more [`LedgerEvent`]s.
//! A withdrawal produces one `Withdrawn` event per consumed unlock entry,
//! not one per call.

use serde::{Deserialize, Serialize};

use crate::{Amount, AssetId, HolderId, UnlockIndex};

/// The kind of a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Locked,
    Unlocked,
    Withdrawn,
    TokenRescued,
}

impl EventKind {
    /// Stable one-byte tag used in canonical encodings.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Locked => 1,
            Self::Unlocked => 2,
            Self::Withdrawn => 3,
            Self::TokenRescued => 4,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "LOCKED"),
            Self::Unlocked => write!(f, "UNLOCKED"),
            Self::Withdrawn => write!(f, "WITHDRAWN"),
            Self::TokenRescued => write!(f, "TOKEN_RESCUED"),
        }
    }
}

/// A committed ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// `amount` of the custodied asset was deposited for `holder`.
    Locked { holder: HolderId, amount: Amount },
    /// `holder` requested release of `amount`, queued at `index`.
    Unlocked {
        holder: HolderId,
        index: UnlockIndex,
        amount: Amount,
    },
    /// The entry at `index` was consumed and `amount` paid out.
    Withdrawn {
        holder: HolderId,
        index: UnlockIndex,
        amount: Amount,
    },
    /// The operator recovered a foreign asset.
    TokenRescued {
        asset: AssetId,
        to: HolderId,
        amount: Amount,
    },
}

impl LedgerEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Locked { .. } => EventKind::Locked,
            Self::Unlocked { .. } => EventKind::Unlocked,
            Self::Withdrawn { .. } => EventKind::Withdrawn,
            Self::TokenRescued { .. } => EventKind::TokenRescued,
        }
    }

    /// The holder the event concerns, if any. Rescue events name a
    /// recipient, not a holder.
    #[must_use]
    pub fn holder(&self) -> Option<HolderId> {
        match self {
            Self::Locked { holder, .. }
            | Self::Unlocked { holder, .. }
            | Self::Withdrawn { holder, .. } => Some(*holder),
            Self::TokenRescued { .. } => None,
        }
    }

    #[must_use]
    pub fn amount(&self) -> Amount {
        match self {
            Self::Locked { amount, .. }
            | Self::Unlocked { amount, .. }
            | Self::Withdrawn { amount, .. }
            | Self::TokenRescued { amount, .. } => *amount,
        }
    }

    /// Canonical byte encoding for hashing.
    ///
    /// Format: `tag || fields...` with integers little-endian and
    /// identifiers as raw bytes.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.push(self.kind().tag());
        match self {
            Self::Locked { holder, amount } => {
                out.extend_from_slice(holder.as_bytes());
                out.extend_from_slice(&amount.to_le_bytes());
            }
            Self::Unlocked {
                holder,
                index,
                amount,
            }
            | Self::Withdrawn {
                holder,
                index,
                amount,
            } => {
                out.extend_from_slice(holder.as_bytes());
                out.extend_from_slice(&index.to_le_bytes());
                out.extend_from_slice(&amount.to_le_bytes());
            }
            Self::TokenRescued { asset, to, amount } => {
                out.extend_from_slice(asset.as_bytes());
                out.extend_from_slice(to.as_bytes());
                out.extend_from_slice(&amount.to_le_bytes());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_display() {
        assert_eq!(format!("{}", EventKind::Locked), "LOCKED");
        assert_eq!(format!("{}", EventKind::Withdrawn), "WITHDRAWN");
        assert_eq!(format!("{}", EventKind::TokenRescued), "TOKEN_RESCUED");
    }

    #[test]
    fn accessors() {
        let holder = HolderId::from_seed(1);
        let ev = LedgerEvent::Unlocked {
            holder,
            index: 4,
            amount: 100,
        };
        assert_eq!(ev.kind(), EventKind::Unlocked);
        assert_eq!(ev.holder(), Some(holder));
        assert_eq!(ev.amount(), 100);

        let rescue = LedgerEvent::TokenRescued {
            asset: AssetId::from_seed(2),
            to: holder,
            amount: 7,
        };
        assert_eq!(rescue.holder(), None);
    }

    #[test]
    fn canonical_bytes_distinguish_kinds() {
        let holder = HolderId::from_seed(1);
        let unlocked = LedgerEvent::Unlocked {
            holder,
            index: 0,
            amount: 5,
        };
        let withdrawn = LedgerEvent::Withdrawn {
            holder,
            index: 0,
            amount: 5,
        };
        assert_ne!(unlocked.canonical_bytes(), withdrawn.canonical_bytes());
    }

    #[test]
    fn canonical_bytes_distinguish_index() {
        let holder = HolderId::from_seed(1);
        let a = LedgerEvent::Withdrawn {
            holder,
            index: 0,
            amount: 5,
        };
        let b = LedgerEvent::Withdrawn {
            holder,
            index: 1,
            amount: 5,
        };
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn event_json_names_variant() {
        let ev = LedgerEvent::Locked {
            holder: HolderId::from_seed(1),
            amount: 1000,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.starts_with(r#"{"locked":"#), "Got: {json}");
        let back: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
