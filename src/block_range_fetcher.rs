//! Fetches all component updates observed in an inclusive block range
//! (`spec.md` §4.2).

use crate::cache_store::CacheStore;
use crate::error::{Error, Result};
use crate::types::BlockNumber;
use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use tracing::warn;

/// Given an inclusive `(from, to)` block interval, returns a `CacheStore`
/// containing every update the world contract emitted in that range, in
/// observation order.
#[async_trait]
pub trait BlockRangeFetcher: Send + Sync {
    async fn fetch(&self, from: BlockNumber, to: BlockNumber) -> Result<CacheStore>;
}

/// Wraps a [`BlockRangeFetcher`] with the bounded exponential backoff
/// policy of `spec.md` §4.2/§6: transient failures are retried with
/// bounded exponential backoff; exhausting the retry budget escalates to
/// [`Error::RangeFetchExhausted`], which is fatal and propagates to the
/// orchestrator.
pub struct RetryingBlockRangeFetcher<F> {
    inner: F,
    max_retries: u32,
    backoff_base: Duration,
    backoff_multiplier: f64,
    backoff_max: Duration,
}

impl<F: BlockRangeFetcher> RetryingBlockRangeFetcher<F> {
    pub fn new(
        inner: F,
        max_retries: u32,
        backoff_base: Duration,
        backoff_multiplier: f64,
        backoff_max: Duration,
    ) -> Self {
        RetryingBlockRangeFetcher {
            inner,
            max_retries,
            backoff_base,
            backoff_multiplier,
            backoff_max,
        }
    }

    fn new_backoff(&self) -> backoff::ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.backoff_base)
            .with_multiplier(self.backoff_multiplier)
            .with_max_interval(self.backoff_max)
            .with_max_elapsed_time(None)
            .build()
    }
}

#[async_trait]
impl<F: BlockRangeFetcher> BlockRangeFetcher for RetryingBlockRangeFetcher<F> {
    async fn fetch(&self, from: BlockNumber, to: BlockNumber) -> Result<CacheStore> {
        let mut backoff_policy = self.new_backoff();
        let mut attempt = 0u32;
        loop {
            match self.inner.fetch(from, to).await {
                Ok(store) => return Ok(store),
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = backoff_policy.next_backoff().unwrap_or(self.backoff_max);
                    warn!(
                        from = from.0,
                        to = to.0,
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "transient range fetch failure, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Err(Error::RangeFetchExhausted {
                        from,
                        to,
                        source: err.to_string(),
                    });
                }
            }
        }
    }
}
