//! The hot, unbounded stream of component updates arriving from the chain
//! (`spec.md` §4.6). The buffering queue that holds live events during
//! the initial phase lives in `orchestrator.rs`, colocated with the
//! forwarder task that owns it (`spec.md` §4.7 "Concurrency with live
//! events during initial phase").

use crate::types::{BlockNumber, ComponentUpdate};

/// A hot stream of `ComponentUpdate`s produced by the external RPC
/// driver. The orchestrator subscribes before starting resolver work so
/// that no early live events are lost (`spec.md` §9 "Hot-stream
/// buffering").
pub type LiveEventStream =
    std::pin::Pin<Box<dyn futures::Stream<Item = ComponentUpdate> + Send>>;

/// A stream of monotonically non-decreasing chain-head block numbers.
pub type BlockNumberStream = std::pin::Pin<Box<dyn futures::Stream<Item = BlockNumber> + Send>>;
