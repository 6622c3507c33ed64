//! Decides which of the three state sources seeds the initial sync
//! (`spec.md` §4.4).

use crate::cache_store::CacheStore;
use crate::config::OrchestratorTunables;
use crate::error::Result;
use crate::persistent_cache::{read_cache_store, PersistentCache};
use crate::snapshot_client::{SnapshotAvailability, SnapshotClient};
use crate::time_service::TimeService;
use crate::types::BlockNumber;
use tracing::{info, warn};

/// The resolver's decision, plus the block number the chosen seed is
/// current to.
pub struct ResolvedSeed {
    pub store: CacheStore,
    pub seed_block: BlockNumber,
}

/// Runs the `spec.md` §4.4 decision algorithm.
///
/// 1. `candidateCache = max(cacheBlockNumber, initialBlockNumber)`.
/// 2. `candidateSnapshot = snapshotBlockNumber` iff available and
///    `snapshotBlockNumber > candidateCache + SNAPSHOT_PREFER_THRESHOLD`.
/// 3. If snapshot wins: load it.
/// 4. Else if the persistent cache has data at `candidateCache >=
///    initialBlockNumber`: load it.
/// 5. Else: empty seed at `initialBlockNumber`.
pub struct InitialStateResolver<'a> {
    pub persistent_cache: &'a dyn PersistentCache,
    pub snapshot_client: &'a dyn SnapshotClient,
    pub time_service: TimeService,
    pub tunables: OrchestratorTunables,
}

impl<'a> InitialStateResolver<'a> {
    pub async fn resolve(
        &self,
        cache_block_number: BlockNumber,
        initial_block_number: BlockNumber,
    ) -> Result<ResolvedSeed> {
        let candidate_cache = BlockNumber(cache_block_number.0.max(initial_block_number.0));

        let snapshot_availability = self.query_snapshot_with_timeout().await;

        let snapshot_wins = match snapshot_availability {
            SnapshotAvailability::Available(snapshot_block) => {
                snapshot_block.0 > candidate_cache.0 + self.tunables.snapshot_prefer_threshold
            }
            SnapshotAvailability::Unavailable => false,
        };

        if snapshot_wins {
            if let SnapshotAvailability::Available(snapshot_block) = snapshot_availability {
                info!(
                    snapshot_block = snapshot_block.0,
                    candidate_cache = candidate_cache.0,
                    "seeding initial state from snapshot"
                );
                let store = self.snapshot_client.fetch().await?;
                return Ok(ResolvedSeed {
                    store,
                    seed_block: snapshot_block,
                });
            }
        }

        if candidate_cache.0 >= initial_block_number.0 {
            match read_cache_store(self.persistent_cache).await {
                Ok(Some(store)) if !store.is_empty() => {
                    info!(
                        candidate_cache = candidate_cache.0,
                        "seeding initial state from persistent cache"
                    );
                    return Ok(ResolvedSeed {
                        store,
                        seed_block: candidate_cache,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    // CacheCorrupt: treated as "cache empty", logged as a
                    // recoverable warning (`spec.md` §7).
                    warn!(error = %err, "persistent cache entry unreadable, treating as empty");
                }
            }
        }

        info!(
            initial_block_number = initial_block_number.0,
            "no snapshot or persistent cache data available, seeding empty"
        );
        Ok(ResolvedSeed {
            store: CacheStore::new(),
            seed_block: initial_block_number,
        })
    }

    async fn query_snapshot_with_timeout(&self) -> SnapshotAvailability {
        match self
            .time_service
            .timeout(
                self.tunables.snapshot_query_timeout,
                self.snapshot_client.latest_block_number(),
            )
            .await
        {
            Ok(availability) => availability,
            Err(_) => {
                warn!("snapshot latest-block query timed out, treating as unavailable");
                SnapshotAvailability::Unavailable
            }
        }
    }
}
