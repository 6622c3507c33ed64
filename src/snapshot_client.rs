//! Queries the snapshot service for its latest available block number and
//! fetches a full `CacheStore` at that block (`spec.md` §4.3).

use crate::cache_store::CacheStore;
use crate::error::Result;
use crate::types::BlockNumber;
use async_trait::async_trait;

/// The block number at which a snapshot is available, or "not available"
/// (treated identically to an empty `snapshotServiceUrl` — `spec.md`
/// §4.3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotAvailability {
    Available(BlockNumber),
    Unavailable,
}

/// Two RPCs: "latest snapshot block number" and "fetch snapshot"
/// (`spec.md` §1/§4.3). Any error — network, protocol, empty URL —
/// collapses to [`SnapshotAvailability::Unavailable`]; the resolver
/// handles that case.
#[async_trait]
pub trait SnapshotClient: Send + Sync {
    async fn latest_block_number(&self) -> SnapshotAvailability;

    /// Returns the full snapshot as a `CacheStore` whose updates carry the
    /// snapshot's block number and `txHash = "cache"`. Only called after
    /// `latest_block_number` reported `Available`.
    async fn fetch(&self) -> Result<CacheStore>;
}

/// The no-snapshot-service client used whenever `SyncConfig`'s
/// `snapshot_service_url` is empty (`spec.md` §3).
pub struct NoSnapshotClient;

#[async_trait]
impl SnapshotClient for NoSnapshotClient {
    async fn latest_block_number(&self) -> SnapshotAvailability {
        SnapshotAvailability::Unavailable
    }

    async fn fetch(&self) -> Result<CacheStore> {
        Ok(CacheStore::new())
    }
}
