//! The persistent key-value cache collaborator (`spec.md` §6).
//!
//! The disk-backed engine itself is an out-of-scope collaborator; this
//! module defines the trait the synchronizer talks to, plus the two
//! logical stores it addresses (`"BlockNumber"`/`"State"`), and an
//! in-memory double used throughout the test suite — mirroring the
//! teacher's `MockDatabaseReader`/`MockDatabaseWriter` pattern for its own
//! out-of-scope storage collaborator.

use crate::cache_store::CacheStore;
use crate::error::{Error, Result};
use crate::types::BlockNumber;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const BLOCK_NUMBER_STORE: &str = "BlockNumber";
pub const STATE_STORE: &str = "State";
pub const BLOCK_NUMBER_KEY: &str = "current";
pub const STATE_KEY: &str = "current";

/// `get(store, key) -> value | null`; `put(store, key, value)`
/// (`spec.md` §6).
#[async_trait]
pub trait PersistentCache: Send + Sync {
    async fn get(&self, store: &str, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, store: &str, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Reads the current cached block number. Absence (never written) is
/// reported as block `0`, matching `spec.md` §4.4's "`cacheBlockNumber`
/// (from persistent cache, possibly zero)".
pub async fn read_cache_block_number(cache: &dyn PersistentCache) -> Result<BlockNumber> {
    match cache.get(BLOCK_NUMBER_STORE, BLOCK_NUMBER_KEY).await? {
        Some(bytes) => {
            let array: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                Error::CacheCorrupt(format!(
                    "block number entry has {} bytes, expected 8",
                    bytes.len()
                ))
            })?;
            Ok(BlockNumber(u64::from_be_bytes(array)))
        }
        None => Ok(BlockNumber(0)),
    }
}

pub async fn write_cache_block_number(
    cache: &dyn PersistentCache,
    block_number: BlockNumber,
) -> Result<()> {
    cache
        .put(
            BLOCK_NUMBER_STORE,
            BLOCK_NUMBER_KEY,
            block_number.0.to_be_bytes().to_vec(),
        )
        .await
}

/// Reads the persisted `CacheStore`. A deserialization failure is
/// `CacheCorrupt`: the caller treats this identically to "cache empty"
/// (`spec.md` §7).
pub async fn read_cache_store(cache: &dyn PersistentCache) -> Result<Option<CacheStore>> {
    match cache.get(STATE_STORE, STATE_KEY).await? {
        Some(bytes) => {
            let store: CacheStore = serde_json::from_slice(&bytes)
                .map_err(|e| Error::CacheCorrupt(e.to_string()))?;
            Ok(Some(store))
        }
        None => Ok(None),
    }
}

pub async fn write_cache_store(cache: &dyn PersistentCache, store: &CacheStore) -> Result<()> {
    let bytes = serde_json::to_vec(store)
        .map_err(|e| Error::FatalSync(format!("failed to serialize cache store: {e}")))?;
    cache.put(STATE_STORE, STATE_KEY, bytes).await
}

/// An in-memory double for [`PersistentCache`], used by tests instead of
/// a real disk-backed engine.
#[derive(Default)]
pub struct InMemoryPersistentCache {
    stores: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryPersistentCache {
    pub fn new() -> Self {
        InMemoryPersistentCache::default()
    }
}

#[async_trait]
impl PersistentCache for InMemoryPersistentCache {
    async fn get(&self, store: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let stores = self.stores.lock().unwrap();
        Ok(stores.get(&(store.to_string(), key.to_string())).cloned())
    }

    async fn put(&self, store: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let mut stores = self.stores.lock().unwrap();
        stores.insert((store.to_string(), key.to_string()), value);
        Ok(())
    }
}
