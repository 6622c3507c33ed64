//! Configuration types (`spec.md` §3 `SyncConfig`, §6 tunables).
//!
//! Only the data shape lives here — loading it from a file, environment,
//! or CLI flags is an out-of-scope collaborator (`spec.md` §1).

use crate::types::BlockNumber;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `SNAPSHOT_PREFER_THRESHOLD` from `spec.md` §4.4/§6.
pub const SNAPSHOT_PREFER_THRESHOLD: u64 = 100;

/// `SNAPSHOT_QUERY_TIMEOUT` from `spec.md` §5/§6.
pub const SNAPSHOT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// `RANGE_FETCH_MAX_RETRIES` from `spec.md` §4.2/§6.
pub const RANGE_FETCH_MAX_RETRIES: u32 = 5;

/// Base delay of the exponential backoff used for range-fetch retries.
pub const RANGE_FETCH_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Backoff multiplier for range-fetch retries.
pub const RANGE_FETCH_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Cap on the backoff delay for range-fetch retries.
pub const RANGE_FETCH_BACKOFF_MAX: Duration = Duration::from_secs(30);

/// Immutable, per-session polling/batching knobs handed to the (out of
/// scope) RPC provider driving `blockNumber$`/`liveEvent$`. Carried
/// through unchanged by the synchronizer; it does not interpret them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProviderOptions {
    pub polling_interval_ms: u64,
    pub batch: bool,
    pub skip_network_check: bool,
}

/// Immutable input to one synchronization session (`spec.md` §3).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Empty string means "no snapshot service" (`spec.md` §3).
    pub snapshot_service_url: String,
    pub chain_id: u64,
    pub world_contract_address: Vec<u8>,
    pub world_contract_abi: String,
    pub provider_options: ProviderOptions,
    /// A floor: sync never starts earlier than this block.
    pub initial_block_number: BlockNumber,
}

impl SyncConfig {
    pub fn has_snapshot_service(&self) -> bool {
        !self.snapshot_service_url.is_empty()
    }

    /// Fails fast on configuration the rest of the synchronizer would
    /// otherwise silently misinterpret (e.g. a whitespace-only URL
    /// degrading every run to "snapshot unavailable" without anyone
    /// noticing). Not specified by `spec.md`, added per the ambient
    /// configuration-validation stack (`SPEC_FULL.md` §9).
    pub fn validate(&self) -> Result<(), String> {
        if self
            .snapshot_service_url
            .chars()
            .all(|c| c.is_whitespace())
            && !self.snapshot_service_url.is_empty()
        {
            return Err("snapshot_service_url is whitespace-only, expected empty or a URL".into());
        }
        if self.world_contract_address.is_empty() {
            return Err("world_contract_address must not be empty".into());
        }
        Ok(())
    }
}

/// Tunables that aren't part of `SyncConfig` because they govern the
/// synchronizer's own internal policy rather than the external session
/// being synced (`spec.md` §6).
#[derive(Clone, Debug)]
pub struct OrchestratorTunables {
    pub snapshot_prefer_threshold: u64,
    pub snapshot_query_timeout: Duration,
    pub range_fetch_max_retries: u32,
    pub range_fetch_backoff_base: Duration,
    pub range_fetch_backoff_multiplier: f64,
    pub range_fetch_backoff_max: Duration,
    /// High-water mark for the live-event buffer accumulated during the
    /// initial phase. The spec leaves this unbounded but permits a
    /// high-water mark so long as overflow is never silently dropped
    /// (`spec.md` §6 `LIVE_BUFFER_MAX`); we log at `warn` on every
    /// crossing rather than reject events.
    pub live_buffer_high_water_mark: usize,
}

impl Default for OrchestratorTunables {
    fn default() -> Self {
        OrchestratorTunables {
            snapshot_prefer_threshold: SNAPSHOT_PREFER_THRESHOLD,
            snapshot_query_timeout: SNAPSHOT_QUERY_TIMEOUT,
            range_fetch_max_retries: RANGE_FETCH_MAX_RETRIES,
            range_fetch_backoff_base: RANGE_FETCH_BACKOFF_BASE,
            range_fetch_backoff_multiplier: RANGE_FETCH_BACKOFF_MULTIPLIER,
            range_fetch_backoff_max: RANGE_FETCH_BACKOFF_MAX,
            live_buffer_high_water_mark: 100_000,
        }
    }
}
