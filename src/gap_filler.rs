//! Fetches the block range between the seed state and the chain head at
//! the moment the seed was chosen (`spec.md` §4.5).

use crate::block_range_fetcher::BlockRangeFetcher;
use crate::cache_store::CacheStore;
use crate::error::Result;
use crate::types::BlockNumber;

pub struct GapFiller<'a> {
    pub fetcher: &'a dyn BlockRangeFetcher,
}

impl<'a> GapFiller<'a> {
    /// If `to <= from`, returns an empty store. Otherwise delegates to the
    /// `BlockRangeFetcher`. Blocks the orchestrator's initial phase until
    /// complete (`spec.md` §4.5).
    pub async fn fill(&self, from: BlockNumber, to: BlockNumber) -> Result<CacheStore> {
        if to.0 <= from.0 {
            return Ok(CacheStore::new());
        }
        self.fetcher.fetch(from, to).await
    }
}
