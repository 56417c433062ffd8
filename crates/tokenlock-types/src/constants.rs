//! System-wide constants for the TokenLock custody ledger.

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Default cooldown between an unlock request and its maturity (30 days).
pub const DEFAULT_COOLDOWN_SECS: u64 = 30 * SECONDS_PER_DAY;

/// Width of an asset address in bytes.
pub const ASSET_ID_LEN: usize = 20;

/// `withdraw` cap value meaning "drain every matured entry".
pub const WITHDRAW_ALL: u32 = 0;

/// Domain separator for the event journal hash chain.
pub const JOURNAL_DOMAIN: &[u8] = b"tokenlock:journal:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TokenLock";
