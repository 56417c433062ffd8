//! Configuration for a TokenLock ledger instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AssetId, Result, TokenLockError, constants};

/// Immutable ledger configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// The single asset this ledger holds in custody.
    pub custodied_asset: AssetId,
    /// Seconds between an unlock request and its maturity.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_cooldown_secs() -> u64 {
    constants::DEFAULT_COOLDOWN_SECS
}

impl LockConfig {
    /// Build a config. Not validated until [`LockConfig::validate`].
    #[must_use]
    pub fn new(custodied_asset: AssetId, cooldown_secs: u64) -> Self {
        Self {
            custodied_asset,
            cooldown_secs,
        }
    }

    /// Config with the default 30-day cooldown.
    #[must_use]
    pub fn with_default_cooldown(custodied_asset: AssetId) -> Self {
        Self::new(custodied_asset, constants::DEFAULT_COOLDOWN_SECS)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| TokenLockError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check construction-time preconditions.
    ///
    /// # Errors
    /// - `InvalidAssetAddress` if the custodied asset is the null address
    /// - `InvalidCooldownPeriod` if the cooldown is zero
    pub fn validate(&self) -> Result<()> {
        if self.custodied_asset.is_zero() {
            return Err(TokenLockError::InvalidAssetAddress);
        }
        if self.cooldown_secs == 0 {
            return Err(TokenLockError::InvalidCooldownPeriod);
        }
        Ok(())
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let cfg = LockConfig::new(AssetId::from_seed(1), 3600);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cooldown(), Duration::from_secs(3600));
    }

    #[test]
    fn default_cooldown_is_thirty_days() {
        let cfg = LockConfig::with_default_cooldown(AssetId::from_seed(1));
        assert_eq!(cfg.cooldown_secs, 60 * 60 * 24 * 30);
    }

    #[test]
    fn zero_asset_rejected() {
        let cfg = LockConfig::new(AssetId::ZERO, 3600);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            TokenLockError::InvalidAssetAddress
        ));
    }

    #[test]
    fn zero_cooldown_rejected() {
        let cfg = LockConfig::new(AssetId::from_seed(1), 0);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            TokenLockError::InvalidCooldownPeriod
        ));
    }

    #[test]
    fn asset_checked_before_cooldown() {
        let cfg = LockConfig::new(AssetId::ZERO, 0);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            TokenLockError::InvalidAssetAddress
        ));
    }

    #[test]
    fn from_json_applies_default_cooldown() {
        let asset = AssetId::from_seed(2);
        let json = format!(r#"{{"custodied_asset":"{asset}"}}"#);
        let cfg = LockConfig::from_json(&json).unwrap();
        assert_eq!(cfg.custodied_asset, asset);
        assert_eq!(cfg.cooldown_secs, constants::DEFAULT_COOLDOWN_SECS);
    }

    #[test]
    fn from_json_validates() {
        let asset = AssetId::from_seed(2);
        let json = format!(r#"{{"custodied_asset":"{asset}","cooldown_secs":0}}"#);
        assert!(matches!(
            LockConfig::from_json(&json).unwrap_err(),
            TokenLockError::InvalidCooldownPeriod
        ));
    }

    #[test]
    fn from_json_malformed_is_configuration_error() {
        let err = LockConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TokenLockError::Configuration(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = LockConfig::new(AssetId::from_seed(3), 86_400);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LockConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
