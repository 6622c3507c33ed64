//! Error taxonomy for the synchronizer (`spec.md` §7).
//!
//! Only [`Error::FatalSync`] and cancellation ever escape to a caller of
//! [`crate::orchestrator::SyncOrchestrator`]. Every other variant is an
//! internal signal: retried, logged, and absorbed by the component that
//! raised it (see `spec.md` §7 "Propagation policy").

use crate::types::BlockNumber;
use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// A range fetch exhausted its retry budget (`spec.md` §4.2, §7
    /// `TransientFetchError` escalated). Fatal: surfaces on the output
    /// stream's termination channel.
    #[error("range fetch [{from}, {to}] failed after exhausting retries: {source}")]
    RangeFetchExhausted {
        from: BlockNumber,
        to: BlockNumber,
        source: String,
    },

    /// The persistent cache returned data that failed to deserialize.
    /// Recoverable: the synchronizer proceeds as though the cache were
    /// empty and logs a warning (`spec.md` §7 `CacheCorrupt`).
    #[error("persistent cache entry is corrupt: {0}")]
    CacheCorrupt(String),

    /// Snapshot service is unreachable, misconfigured, or timed out.
    /// Recoverable: the resolver falls back to the persistent cache or an
    /// empty seed (`spec.md` §7 `SnapshotUnavailable`).
    #[error("snapshot service unavailable: {0}")]
    SnapshotUnavailable(String),

    /// Unrecoverable failure of the synchronizer itself. The orchestrator
    /// transitions to `Terminated` and this is the only error variant
    /// delivered on the output stream's termination channel.
    #[error("fatal synchronizer error: {0}")]
    FatalSync(String),

    /// Cooperative cancellation was requested. Not a failure: the stream
    /// terminates cleanly and this is never surfaced to the caller as an
    /// `Err` (see [`crate::orchestrator::Termination`]).
    #[error("synchronization cancelled")]
    Cancelled,
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RangeFetchExhausted { .. } | Error::FatalSync(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
