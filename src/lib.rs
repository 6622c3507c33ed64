//! Client-side synchronizer that reconstructs the current state of an
//! on-chain component database into an in-memory ECS view, then keeps it
//! current by streaming live events.
//!
//! See `spec.md`/`SPEC_FULL.md` at the repository root for the full
//! design. The short version: [`orchestrator::SyncOrchestrator`] picks an
//! initial state via [`resolver::InitialStateResolver`] (from a
//! [`snapshot_client::SnapshotClient`], a [`persistent_cache`], or
//! neither), backfills the gap to the chain head with
//! [`gap_filler::GapFiller`], then drains buffered live events and
//! forwards the steady-state stream unmodified.

pub mod block_range_fetcher;
pub mod cache_store;
pub mod config;
pub mod error;
pub mod gap_filler;
pub mod live_stream;
pub mod orchestrator;
pub mod persistent_cache;
pub mod resolver;
pub mod snapshot_client;
pub mod time_service;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::SyncConfig;
pub use error::Error;
pub use orchestrator::{SyncOrchestrator, SyncOutput, Termination};
pub use types::{BlockNumber, ComponentId, ComponentUpdate, ComponentValue, EntityId, TxHash};
