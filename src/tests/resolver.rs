use crate::config::OrchestratorTunables;
use crate::persistent_cache::{write_cache_store, InMemoryPersistentCache};
use crate::resolver::InitialStateResolver;
use crate::tests::mocks::FakeSnapshotClient;
use crate::tests::utils::create_cache_store_with_entry;
use crate::time_service::TimeService;
use crate::types::{BlockNumber, TxHash};

#[tokio::test]
async fn snapshot_wins_when_it_clears_the_threshold() {
    let persistent_cache = InMemoryPersistentCache::new();
    let snapshot_store = create_cache_store_with_entry(0x10, 0x11, 0xFF, 9_999);
    let snapshot_client = FakeSnapshotClient::available(BlockNumber(9_999), snapshot_store);

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    let resolved = resolver
        .resolve(BlockNumber(99), BlockNumber(0))
        .await
        .unwrap();

    assert_eq!(resolved.seed_block, BlockNumber(9_999));
    let state: Vec<_> = resolved.store.state().collect();
    assert_eq!(state.len(), 1);
    assert_eq!(state[0].block_number, BlockNumber(9_999));
    assert_eq!(state[0].tx_hash, TxHash::Cache);
}

#[tokio::test]
async fn cache_wins_when_snapshot_unavailable() {
    let persistent_cache = InMemoryPersistentCache::new();
    let cached_store = create_cache_store_with_entry(0x10, 0x11, 0x01, 100);
    write_cache_store(&persistent_cache, &cached_store).await.unwrap();
    let snapshot_client = FakeSnapshotClient::unavailable();

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    let resolved = resolver
        .resolve(BlockNumber(100), BlockNumber(0))
        .await
        .unwrap();

    assert_eq!(resolved.seed_block, BlockNumber(100));
    let state: Vec<_> = resolved.store.state().collect();
    assert_eq!(state.len(), 1);
    assert_eq!(state[0].block_number, BlockNumber(100));
}

#[tokio::test]
async fn cache_wins_when_snapshot_is_within_the_threshold() {
    let persistent_cache = InMemoryPersistentCache::new();
    let cached_store = create_cache_store_with_entry(0x10, 0x11, 0x01, 990);
    write_cache_store(&persistent_cache, &cached_store).await.unwrap();
    // Snapshot is only 50 blocks ahead of the cache: below
    // SNAPSHOT_PREFER_THRESHOLD (100), so the cache wins (`spec.md` §4.4).
    let snapshot_client = FakeSnapshotClient::available(
        BlockNumber(1_040),
        create_cache_store_with_entry(0x20, 0x21, 0xAA, 1_040),
    );

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    let resolved = resolver
        .resolve(BlockNumber(990), BlockNumber(0))
        .await
        .unwrap();

    assert_eq!(resolved.seed_block, BlockNumber(990));
}

#[tokio::test]
async fn empty_seed_when_neither_source_has_data() {
    let persistent_cache = InMemoryPersistentCache::new();
    let snapshot_client = FakeSnapshotClient::unavailable();

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    let resolved = resolver
        .resolve(BlockNumber(0), BlockNumber(42))
        .await
        .unwrap();

    assert_eq!(resolved.seed_block, BlockNumber(42));
    assert!(resolved.store.is_empty());
}

#[tokio::test]
async fn floor_raises_the_empty_seed_block_even_with_an_older_cache() {
    let persistent_cache = InMemoryPersistentCache::new();
    let snapshot_client = FakeSnapshotClient::unavailable();

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    // No persisted cache store, but a nonzero cache block number and a
    // higher floor: candidateCache = max(10, 42) = 42, no cache data
    // present, so the seed is empty at the floor.
    let resolved = resolver
        .resolve(BlockNumber(10), BlockNumber(42))
        .await
        .unwrap();

    assert_eq!(resolved.seed_block, BlockNumber(42));
    assert!(resolved.store.is_empty());
}

/// Property check for `spec.md` §8 "Resolver correctness": the resolver
/// picks the snapshot iff it is available and strictly more than 100
/// blocks ahead of `max(cacheBlockNumber, floor)`.
#[tokio::test]
async fn resolver_correctness_boundary_at_exactly_the_threshold() {
    let persistent_cache = InMemoryPersistentCache::new();
    // Exactly at the threshold (100 ahead): spec requires strictly
    // greater-than, so the cache should still win.
    let snapshot_client = FakeSnapshotClient::available(
        BlockNumber(200),
        create_cache_store_with_entry(0x01, 0x01, 0x01, 200),
    );
    write_cache_store(
        &persistent_cache,
        &create_cache_store_with_entry(0x02, 0x02, 0x02, 100),
    )
    .await
    .unwrap();

    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };

    let resolved = resolver
        .resolve(BlockNumber(100), BlockNumber(0))
        .await
        .unwrap();
    assert_eq!(resolved.seed_block, BlockNumber(100));

    // One block past the threshold: the snapshot should now win.
    let snapshot_client = FakeSnapshotClient::available(
        BlockNumber(201),
        create_cache_store_with_entry(0x01, 0x01, 0x01, 201),
    );
    let resolver = InitialStateResolver {
        persistent_cache: &persistent_cache,
        snapshot_client: &snapshot_client,
        time_service: TimeService::mock(),
        tunables: OrchestratorTunables::default(),
    };
    let resolved = resolver
        .resolve(BlockNumber(100), BlockNumber(0))
        .await
        .unwrap();
    assert_eq!(resolved.seed_block, BlockNumber(201));
}
