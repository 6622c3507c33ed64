//! Wire-level data model shared by every component of the synchronizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically non-decreasing chain head position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    pub fn saturating_sub(self, rhs: u64) -> Self {
        BlockNumber(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(value: u64) -> Self {
        BlockNumber(value)
    }
}

macro_rules! opaque_bytes_id {
    ($name:ident) => {
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        pub struct $name(pub Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
                Self(bytes.into())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), hex::encode(&self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(&self.0))
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(value: Vec<u8>) -> Self {
                Self(value)
            }
        }
    };
}

opaque_bytes_id!(ComponentId);
opaque_bytes_id!(EntityId);

/// An opaque component payload. Treated as a blob by the core — downstream
/// ECS application is responsible for interpreting its contents.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComponentValue(pub Vec<u8>);

impl fmt::Debug for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentValue({} bytes)", self.0.len())
    }
}

/// The transaction an update originated in, or the synthetic sentinel used
/// for updates that were not observed directly on-chain (seed/gap/cache).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TxHash {
    Real(Vec<u8>),
    /// The synthetic value `"cache"` from `spec.md` §3.
    Cache,
}

impl TxHash {
    pub fn is_cache(&self) -> bool {
        matches!(self, TxHash::Cache)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxHash::Real(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            TxHash::Cache => write!(f, "cache"),
        }
    }
}

/// The atomic unit flowing through the synchronizer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComponentUpdate {
    pub component: ComponentId,
    pub entity: EntityId,
    pub value: ComponentValue,
    pub tx_hash: TxHash,
    pub last_event_in_tx: bool,
    pub block_number: BlockNumber,
}

impl ComponentUpdate {
    /// Builds a synthesized update as produced by `CacheStore::state()` or
    /// by the orchestrator's seed/gap emission path: `txHash = "cache"`,
    /// `lastEventInTx = false`.
    pub fn synthetic(
        component: ComponentId,
        entity: EntityId,
        value: ComponentValue,
        block_number: BlockNumber,
    ) -> Self {
        ComponentUpdate {
            component,
            entity,
            value,
            tx_hash: TxHash::Cache,
            last_event_in_tx: false,
            block_number,
        }
    }

    /// Applies the block-number rewrite rule from `spec.md` §4.7: rewrite
    /// the block number, clear `lastEventInTx`, and stamp the `"cache"`
    /// sentinel. Used for every update emitted during the initial phase.
    pub fn rewritten_for_initial_phase(mut self, rewritten_block: BlockNumber) -> Self {
        self.block_number = rewritten_block;
        self.last_event_in_tx = false;
        self.tx_hash = TxHash::Cache;
        self
    }
}

/// Internal phase label for the orchestrator's state machine (`spec.md`
/// §3 `PhaseMarker`, §4.7 state names).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Boot,
    Resolving,
    Seeding,
    GapFetching,
    DrainingBuffer,
    Live,
    Terminated,
}
