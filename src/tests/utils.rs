use crate::cache_store::CacheStore;
use crate::types::{BlockNumber, ComponentId, ComponentUpdate, ComponentValue, TxHash};

/// Creates a test component update with a real transaction hash.
pub fn create_real_update(
    component: u8,
    entity: u8,
    value: u8,
    block: u64,
    last_event_in_tx: bool,
) -> ComponentUpdate {
    ComponentUpdate {
        component: ComponentId::new(vec![component]),
        entity: crate::types::EntityId::new(vec![entity]),
        value: ComponentValue(vec![value]),
        tx_hash: TxHash::Real(vec![0xAB, component, entity]),
        last_event_in_tx,
        block_number: BlockNumber(block),
    }
}

/// Creates a single-entry `CacheStore` as a stand-in for a persisted
/// cache or snapshot seed.
pub fn create_cache_store_with_entry(
    component: u8,
    entity: u8,
    value: u8,
    block: u64,
) -> CacheStore {
    let mut store = CacheStore::new();
    store.store_event(create_real_update(component, entity, value, block, false));
    store
}

pub fn component(byte: u8) -> ComponentId {
    ComponentId::new(vec![byte])
}

pub fn entity(byte: u8) -> crate::types::EntityId {
    crate::types::EntityId::new(vec![byte])
}
