use crate::cache_store::CacheStore;
use crate::tests::utils::create_real_update;
use crate::types::{BlockNumber, ComponentUpdate, ComponentValue, TxHash};
use proptest::prelude::*;

#[test]
fn store_event_overwrites_compacted_state_but_not_the_sequence() {
    let mut store = CacheStore::new();
    store.store_event(create_real_update(1, 1, 10, 5, false));
    store.store_event(create_real_update(1, 1, 20, 6, false));

    let state: Vec<_> = store.state().collect();
    assert_eq!(state.len(), 1);
    assert_eq!(state[0].value, ComponentValue(vec![20]));
    assert_eq!(state[0].block_number, BlockNumber(6));
    assert_eq!(state[0].tx_hash, TxHash::Cache);
    assert!(!state[0].last_event_in_tx);

    assert_eq!(store.sequence().len(), 2);
    assert_eq!(store.len(), 2);
}

#[test]
fn merge_from_is_associative_in_outcome() {
    let mut a = CacheStore::new();
    a.store_event(create_real_update(1, 1, 1, 1, false));

    let mut b = CacheStore::new();
    b.store_event(create_real_update(1, 1, 2, 2, false));
    b.store_event(create_real_update(2, 2, 9, 2, false));

    let mut c = CacheStore::new();
    c.store_event(create_real_update(1, 1, 3, 3, false));

    let mut merged_incrementally = a.clone();
    merged_incrementally.merge_from(&b);
    merged_incrementally.merge_from(&c);

    let mut combined = CacheStore::new();
    for store in [&a, &b, &c] {
        combined.merge_from(store);
    }

    let mut lhs: Vec<_> = merged_incrementally.state().collect();
    let mut rhs: Vec<_> = combined.state().collect();
    lhs.sort_by(|x, y| x.component.0.cmp(&y.component.0));
    rhs.sort_by(|x, y| x.component.0.cmp(&y.component.0));
    assert_eq!(lhs, rhs);
}

#[test]
fn state_is_stable_across_repeated_calls_without_intervening_writes() {
    let mut store = CacheStore::new();
    store.store_event(create_real_update(1, 1, 1, 1, false));
    store.store_event(create_real_update(2, 2, 2, 2, false));

    let mut first: Vec<_> = store.state().collect();
    let mut second: Vec<_> = store.state().collect();
    first.sort_by(|x, y| x.component.0.cmp(&y.component.0));
    second.sort_by(|x, y| x.component.0.cmp(&y.component.0));
    assert_eq!(first, second);
}

#[test]
fn empty_store_has_empty_state() {
    let store = CacheStore::new();
    assert!(store.is_empty());
    assert_eq!(store.state().count(), 0);
}

#[test]
fn a_non_empty_store_round_trips_through_json() {
    let mut store = CacheStore::new();
    store.store_event(create_real_update(1, 1, 10, 5, false));
    store.store_event(create_real_update(2, 2, 20, 6, false));

    let bytes = serde_json::to_vec(&store).expect("compacted map must serialize to JSON");
    let round_tripped: CacheStore =
        serde_json::from_slice(&bytes).expect("compacted map must deserialize from JSON");

    assert_eq!(round_tripped.len(), store.len());
    let mut original: Vec<_> = store.state().collect();
    let mut restored: Vec<_> = round_tripped.state().collect();
    original.sort_by(|a, b| a.component.0.cmp(&b.component.0));
    restored.sort_by(|a, b| a.component.0.cmp(&b.component.0));
    assert_eq!(original, restored);
}

fn arb_update() -> impl Strategy<Value = ComponentUpdate> {
    (0u8..4, 0u8..4, any::<u8>(), 0u64..1_000)
        .prop_map(|(component, entity, value, block)| create_real_update(component, entity, value, block, false))
}

fn sort_by_key(updates: &mut [ComponentUpdate]) {
    updates.sort_by(|a, b| (a.component.0.clone(), a.entity.0.clone()).cmp(&(b.component.0.clone(), b.entity.0.clone())));
}

proptest! {
    /// `merge_from` is associative in outcome regardless of how an
    /// arbitrary update sequence is partitioned across stores before
    /// merging (`spec.md` §4.1).
    #[test]
    fn merge_from_associativity_holds_for_arbitrary_partitions(
        updates in prop::collection::vec(arb_update(), 0..20),
        split_at in 0usize..20,
    ) {
        let split_at = split_at.min(updates.len());
        let (first_half, second_half) = updates.split_at(split_at);

        let mut whole = CacheStore::new();
        for update in &updates {
            whole.store_event(update.clone());
        }

        let mut a = CacheStore::new();
        for update in first_half {
            a.store_event(update.clone());
        }
        let mut b = CacheStore::new();
        for update in second_half {
            b.store_event(update.clone());
        }
        let mut merged = CacheStore::new();
        merged.merge_from(&a);
        merged.merge_from(&b);

        let mut lhs: Vec<_> = whole.state().collect();
        let mut rhs: Vec<_> = merged.state().collect();
        sort_by_key(&mut lhs);
        sort_by_key(&mut rhs);
        prop_assert_eq!(lhs, rhs);
    }
}
