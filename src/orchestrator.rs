//! The state machine that composes every other component into a single
//! output stream of updates (`spec.md` §4.7). This is the core of the
//! synchronizer: buffering, block-number rewriting, transaction-boundary
//! preservation, and the INITIAL → LIVE transition all live here.
//!
//! States: `Boot -> Resolving -> Seeding -> GapFetching ->
//! DrainingBuffer -> Live -> Terminated`.

use crate::block_range_fetcher::BlockRangeFetcher;
use crate::config::{OrchestratorTunables, SyncConfig};
use crate::error::Error;
use crate::gap_filler::GapFiller;
use crate::live_stream::{BlockNumberStream, LiveEventStream};
use crate::persistent_cache::{read_cache_block_number, PersistentCache};
use crate::resolver::InitialStateResolver;
use crate::snapshot_client::SnapshotClient;
use crate::time_service::TimeService;
use crate::types::{BlockNumber, ComponentUpdate};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How the output stream ended. Only [`Termination::Failed`] carries an
/// error — cancellation and ordinary input-stream end are both
/// `Completed`, matching `spec.md` §7's propagation policy: "Downstream
/// sees either a stream of updates terminating normally ... or
/// terminating with a FatalSyncError."
#[derive(Debug)]
pub enum Termination {
    Completed,
    Failed(Error),
}

/// The synchronizer's output: a stream of updates plus a one-shot
/// termination outcome (`spec.md` §6 "Output stream").
pub struct SyncOutput {
    pub updates: mpsc::UnboundedReceiver<ComponentUpdate>,
    pub termination: oneshot::Receiver<Termination>,
}

pub struct SyncOrchestrator {
    config: SyncConfig,
    tunables: OrchestratorTunables,
    persistent_cache: Arc<dyn PersistentCache>,
    snapshot_client: Arc<dyn SnapshotClient>,
    block_range_fetcher: Arc<dyn BlockRangeFetcher>,
    time_service: TimeService,
}

impl SyncOrchestrator {
    pub fn new(
        config: SyncConfig,
        tunables: OrchestratorTunables,
        persistent_cache: Arc<dyn PersistentCache>,
        snapshot_client: Arc<dyn SnapshotClient>,
        block_range_fetcher: Arc<dyn BlockRangeFetcher>,
        time_service: TimeService,
    ) -> Self {
        SyncOrchestrator {
            config,
            tunables,
            persistent_cache,
            snapshot_client,
            block_range_fetcher,
            time_service,
        }
    }

    /// Subscribes to both input streams and spawns the orchestrator as a
    /// single cooperative task (`spec.md` §5). Subscription happens
    /// before any resolver work starts, so no early live event is lost
    /// (`spec.md` §9).
    pub fn spawn(
        self,
        block_number_stream: BlockNumberStream,
        live_event_stream: LiveEventStream,
        cancellation: CancellationToken,
    ) -> SyncOutput {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (term_tx, term_rx) = oneshot::channel();

        tokio::spawn(async move {
            let outcome = self
                .run(block_number_stream, live_event_stream, cancellation, &update_tx)
                .await;
            let _ = term_tx.send(outcome);
        });

        SyncOutput {
            updates: update_rx,
            termination: term_rx,
        }
    }

    async fn run(
        &self,
        block_number_stream: BlockNumberStream,
        live_event_stream: LiveEventStream,
        cancellation: CancellationToken,
        update_tx: &mpsc::UnboundedSender<ComponentUpdate>,
    ) -> Termination {
        let (tick_tx, tick_rx) = watch::channel::<Option<BlockNumber>>(None);
        let (buffer_tx, buffer_rx) = mpsc::unbounded_channel::<ComponentUpdate>();

        // Two lightweight forwarders that keep pulling from the input
        // streams regardless of whatever the state machine below is
        // awaiting. This is what gives us "live ingestion continues while
        // suspended" (`spec.md` §5) without hand-rolled polling at every
        // await point in `drive`.
        let tick_forwarder = {
            let cancellation = cancellation.clone();
            let mut stream = block_number_stream;
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = cancellation.cancelled() => break,
                        item = stream.next() => match item {
                            Some(tick) => {
                                let _ = tick_tx.send(Some(tick));
                            }
                            None => break,
                        },
                    }
                }
            })
        };

        let live_forwarder = {
            let cancellation = cancellation.clone();
            let mut stream = live_event_stream;
            let high_water_mark = self.tunables.live_buffer_high_water_mark;
            tokio::spawn(async move {
                let mut buffered = 0usize;
                let mut crossed_high_water_mark = false;
                loop {
                    tokio::select! {
                        _ = cancellation.cancelled() => break,
                        item = stream.next() => match item {
                            Some(update) => {
                                buffered += 1;
                                if !crossed_high_water_mark && buffered > high_water_mark {
                                    crossed_high_water_mark = true;
                                    warn!(
                                        buffered,
                                        high_water_mark,
                                        "live event buffer crossed high-water mark; continuing to buffer without dropping"
                                    );
                                }
                                if buffer_tx.send(update).is_err() {
                                    break;
                                }
                            }
                            None => break,
                        },
                    }
                }
            })
        };

        let mut tick_rx = tick_rx;
        let mut buffer_rx = buffer_rx;
        let termination = self
            .drive(&mut tick_rx, &mut buffer_rx, &cancellation, update_tx)
            .await;

        tick_forwarder.abort();
        live_forwarder.abort();

        termination
    }

    async fn drive(
        &self,
        tick_rx: &mut watch::Receiver<Option<BlockNumber>>,
        buffer_rx: &mut mpsc::UnboundedReceiver<ComponentUpdate>,
        cancellation: &CancellationToken,
        update_tx: &mpsc::UnboundedSender<ComponentUpdate>,
    ) -> Termination {
        // BOOT: await the first block-number tick.
        let target_block = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Termination::Completed,
            tick = Self::await_first_tick(tick_rx) => match tick {
                Some(block) => block,
                None => {
                    return Termination::Failed(Error::FatalSync(
                        "block number stream ended before the first tick arrived".into(),
                    ))
                }
            },
        };
        info!(target_block = target_block.0, "observed chain head, resolving initial state");

        // RESOLVING: read the persistent cache's block number and run the
        // resolver. A corrupt cache entry is recoverable (`spec.md` §7):
        // proceed as though the cache were empty.
        let cache_block_number = match read_cache_block_number(&*self.persistent_cache).await {
            Ok(block_number) => block_number,
            Err(err) => {
                warn!(error = %err, "persistent cache block number unreadable, treating as zero");
                BlockNumber(0)
            }
        };

        let resolver = InitialStateResolver {
            persistent_cache: &*self.persistent_cache,
            snapshot_client: &*self.snapshot_client,
            time_service: self.time_service,
            tunables: self.tunables.clone(),
        };

        let resolved = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Termination::Completed,
            result = resolver.resolve(cache_block_number, self.config.initial_block_number) => match result {
                Ok(resolved) => resolved,
                Err(err) => {
                    return Termination::Failed(Error::FatalSync(format!(
                        "initial state resolution failed: {err}"
                    )))
                }
            },
        };

        // SEEDING: emit the seed's compacted state, rewritten.
        let rewritten_block = Self::latest_tick(tick_rx).saturating_sub(1);
        for update in resolved.store.state() {
            if update_tx
                .send(update.rewritten_for_initial_phase(rewritten_block))
                .is_err()
            {
                return Termination::Completed;
            }
        }

        // GAP_FETCHING: fetch and emit the range between the seed and the
        // chain head observed at BOOT, in sequence order.
        let gap_filler = GapFiller {
            fetcher: &*self.block_range_fetcher,
        };
        let gap_store = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Termination::Completed,
            result = gap_filler.fill(resolved.seed_block, target_block) => match result {
                Ok(store) => store,
                Err(err) => return Termination::Failed(err),
            },
        };

        let rewritten_block = Self::latest_tick(tick_rx).saturating_sub(1);
        for update in gap_store.sequence().iter().cloned() {
            if update_tx
                .send(update.rewritten_for_initial_phase(rewritten_block))
                .is_err()
            {
                return Termination::Completed;
            }
        }

        // DRAINING_BUFFER: drain whatever live events accumulated since
        // BOOT, rewritten the same way.
        if cancellation.is_cancelled() {
            return Termination::Completed;
        }
        let rewritten_block = Self::latest_tick(tick_rx).saturating_sub(1);
        let mut buffered = Vec::new();
        while let Ok(update) = buffer_rx.try_recv() {
            buffered.push(update);
        }
        for update in buffered {
            if update_tx
                .send(update.rewritten_for_initial_phase(rewritten_block))
                .is_err()
            {
                return Termination::Completed;
            }
        }

        // LIVE: forward every incoming update unmodified.
        info!("initial sync complete, forwarding live events unmodified");
        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Termination::Completed,
                next = buffer_rx.recv() => match next {
                    Some(update) => {
                        if update_tx.send(update).is_err() {
                            return Termination::Completed;
                        }
                    }
                    None => {
                        return Termination::Failed(Error::FatalSync(
                            "live event stream terminated unexpectedly".into(),
                        ))
                    }
                },
            }
        }
    }

    async fn await_first_tick(tick_rx: &mut watch::Receiver<Option<BlockNumber>>) -> Option<BlockNumber> {
        loop {
            if let Some(block) = *tick_rx.borrow() {
                return Some(block);
            }
            if tick_rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// The most recent block-number tick observed so far — used by the
    /// block-number rewrite rule (`spec.md` §4.7). Always `Some` once
    /// `await_first_tick` has returned.
    fn latest_tick(tick_rx: &watch::Receiver<Option<BlockNumber>>) -> BlockNumber {
        tick_rx.borrow().unwrap_or(BlockNumber(0))
    }
}
