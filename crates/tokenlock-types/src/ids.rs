//! Identifiers, time, and the amount domain used throughout TokenLock.
//!
//! Holder identities use UUIDv7. Asset identifiers are 20-byte addresses
//! where the all-zero address is the null asset.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{TokenLockError, constants};

/// Token amount. Wide enough to hold the total supply of any realistic
/// asset, including 96-bit supplies; arithmetic on it is always checked.
pub type Amount = u128;

/// Position of an entry inside one holder's unlock queue.
pub type UnlockIndex = u64;

// ---------------------------------------------------------------------------
// HolderId
// ---------------------------------------------------------------------------

/// Identity of a caller: a holder, or the privileged operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HolderId(pub Uuid);

impl HolderId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for HolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// A fungible asset address. Serialized as a `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct AssetId(pub [u8; constants::ASSET_ID_LEN]);

impl AssetId {
    /// The null asset address.
    pub const ZERO: Self = Self([0u8; constants::ASSET_ID_LEN]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; constants::ASSET_ID_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::ASSET_ID_LEN] {
        &self.0
    }

    /// Whether this is the null address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AssetId {
    type Err = TokenLockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| TokenLockError::Serialization(format!("asset address {s:?}: {e}")))?;
        let bytes: [u8; constants::ASSET_ID_LEN] = raw.try_into().map_err(|v: Vec<u8>| {
            TokenLockError::Serialization(format!(
                "asset address {s:?}: expected {} bytes, got {}",
                constants::ASSET_ID_LEN,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Unix time in whole seconds.
///
/// `Timestamp::ZERO` doubles as the "no entry" marker on consumed or
/// never-created unlock slots.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// Convert from a chrono instant. Instants before the unix epoch clamp to zero.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(u64::try_from(at.timestamp()).unwrap_or(0))
    }

    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// `self + secs`, failing instead of wrapping.
    pub fn checked_add_secs(self, secs: u64) -> crate::Result<Self> {
        self.0
            .checked_add(secs)
            .map(Self)
            .ok_or(TokenLockError::TimestampOverflow)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-helpers"))]
impl HolderId {
    /// Deterministic holder identity derived from a single seed byte.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        let mut bytes = [0u8; 16];
        bytes[15] = seed;
        bytes[0] = 0x01;
        Self(Uuid::from_bytes(bytes))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl AssetId {
    /// Deterministic non-zero asset address derived from a single seed byte.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        let mut bytes = [0u8; constants::ASSET_ID_LEN];
        bytes[0] = 0xA5;
        bytes[constants::ASSET_ID_LEN - 1] = seed;
        Self(bytes)
    }

    /// Random non-zero asset address.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes: [u8; constants::ASSET_ID_LEN] = rand::random();
        bytes[0] |= 0x01;
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
