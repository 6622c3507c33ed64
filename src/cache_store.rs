//! The in-memory append-only log of component updates plus its compacted
//! state map (`spec.md` §3/§4.1).

use crate::types::{BlockNumber, ComponentId, ComponentUpdate, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A compacted entry: the latest value observed for a (component, entity)
/// pair, and the block number of the update that produced it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
struct CompactedEntry {
    value: crate::types::ComponentValue,
    block_number: BlockNumber,
}

/// `serde_json`'s map serializer requires string (or stringifiable
/// primitive) keys, so a `HashMap` keyed on `(ComponentId, EntityId)`
/// fails to serialize — the tuple key hits `serialize_tuple`, which
/// `serde_json::ser::MapKeySerializer` rejects with "key must be a
/// string". `compacted` is serialized as a flat vector of entries
/// instead and rebuilt into the `HashMap` on the way back in.
mod compacted_map {
    use super::CompactedEntry;
    use crate::types::{ComponentId, EntityId};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S>(
        compacted: &HashMap<(ComponentId, EntityId), CompactedEntry>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries: Vec<(&ComponentId, &EntityId, &CompactedEntry)> = compacted
            .iter()
            .map(|((component, entity), entry)| (component, entity, entry))
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<HashMap<(ComponentId, EntityId), CompactedEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries: Vec<(ComponentId, EntityId, CompactedEntry)> =
            Vec::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|(component, entity, entry)| ((component, entity), entry))
            .collect())
    }
}

/// An ordered sequence of [`ComponentUpdate`]s plus the compacted state
/// they reduce to. Invariant: replaying the sequence in order reproduces
/// the compacted state (`spec.md` §3).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CacheStore {
    sequence: Vec<ComponentUpdate>,
    #[serde(with = "compacted_map")]
    compacted: HashMap<(ComponentId, EntityId), CompactedEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        CacheStore::default()
    }

    /// Appends to the sequence and updates the compacted state. A later
    /// update for the same (component, entity) overwrites the earlier one.
    pub fn store_event(&mut self, update: ComponentUpdate) {
        let key = (update.component.clone(), update.entity.clone());
        self.compacted.insert(
            key,
            CompactedEntry {
                value: update.value.clone(),
                block_number: update.block_number,
            },
        );
        self.sequence.push(update);
    }

    /// Returns the compacted state as synthetic `ComponentUpdate`s
    /// (`txHash = "cache"`, `lastEventInTx = false`), each carrying the
    /// block number originally associated with that compacted entry.
    /// Order is unspecified, only stable across calls with no
    /// intervening writes (`spec.md` §4.1).
    pub fn state(&self) -> impl Iterator<Item = ComponentUpdate> + '_ {
        self.compacted.iter().map(|((component, entity), entry)| {
            ComponentUpdate::synthetic(
                component.clone(),
                entity.clone(),
                entry.value.clone(),
                entry.block_number,
            )
        })
    }

    /// The raw, observation-ordered sequence (used by `GapFiller`
    /// emission, which must preserve sequence order rather than the
    /// compacted view — `spec.md` §4.7 GAP_FETCHING).
    pub fn sequence(&self) -> &[ComponentUpdate] {
        &self.sequence
    }

    /// Applies `store_event` for each update in `other`'s sequence, in
    /// order. Associative in outcome: `a.merge_from(&b); a.merge_from(&c)`
    /// yields the same compacted state as observing `a` then `b` then `c`
    /// (`spec.md` §4.1).
    pub fn merge_from(&mut self, other: &CacheStore) {
        for update in &other.sequence {
            self.store_event(update.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
