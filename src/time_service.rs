//! A thin abstraction over wall-clock time.
//!
//! Mirrors the role the teacher's `aptos-time-service` plays across the
//! state-sync test suite: production code asks a `TimeService` for sleeps
//! and timeouts instead of calling `tokio::time` directly, so that tests
//! can run under `tokio::time::pause()` without the synchronizer caring.
//! There's deliberately no separate "mock" clock implementation here (the
//! teacher's does more — standalone deterministic advancement outside
//! tokio) because every caller in this crate already runs on a `tokio`
//! runtime; `TimeService::mock()` simply documents the paused-clock
//! convention tests should follow.

use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeService {
    _private: (),
}

impl TimeService {
    /// The real, wall-clock-backed time service.
    pub fn real() -> Self {
        TimeService { _private: () }
    }

    /// Same underlying implementation as [`TimeService::real`]; tests
    /// should pair this with `#[tokio::test(start_paused = true)]` and
    /// drive `tokio::time::advance` to get deterministic timeouts.
    pub fn mock() -> Self {
        TimeService { _private: () }
    }

    pub async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }

    pub async fn timeout<F: Future>(
        &self,
        duration: Duration,
        future: F,
    ) -> Result<F::Output, Elapsed> {
        tokio::time::timeout(duration, future).await
    }
}
