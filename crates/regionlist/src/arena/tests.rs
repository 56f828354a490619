extern crate std;

use std::{ops::Range, vec::Vec};

use super::*;

/// Give an unused slot an address and link it into `head`'s list in order.
fn attach(arena: &mut Arena<'_>, head: Slot, range: Range<usize>) -> Slot {
    let slot = arena.acquire_entry().expect("entry pool exhausted");
    let entry = arena.node_mut(slot);
    entry.address = Some(range.start);
    entry.length = range.len();
    let anchor = arena.find_insertion_point(head, range.start);
    arena.insert_before(anchor, slot);
    arena.node_mut(head).length += range.len();
    slot
}

fn ranges(arena: &Arena<'_>, head: Slot) -> Vec<Range<usize>> {
    arena
        .members(head)
        .map(|slot| arena.start(slot)..arena.end(slot))
        .collect()
}

#[test]
fn new_detaches_every_slot() {
    let mut entries = [Region {
        address: Some(0xdead),
        length: 42,
        prev: 3,
        next: 1,
    }; 4];
    let arena = Arena::new(&mut entries);

    assert_eq!(arena.capacity(), 4);
    assert_eq!(arena.members(USED_HEAD).count(), 0);
    assert_eq!(arena.members(FREE_HEAD).count(), 0);
    for slot in 0..4 {
        assert_eq!(*arena.node(slot), Region::detached(slot));
    }
}

#[test]
fn acquire_entry_scans_in_storage_order() {
    let mut entries = [Region::INIT; 3];
    let mut arena = Arena::new(&mut entries);

    assert_eq!(arena.acquire_entry(), Some(0));
    // Acquisition alone doesn't claim the slot
    assert_eq!(arena.acquire_entry(), Some(0));

    let a = attach(&mut arena, FREE_HEAD, 0..16);
    let b = attach(&mut arena, FREE_HEAD, 32..48);
    assert_eq!((a, b), (0, 1));
    assert_eq!(arena.acquire_entry(), Some(2));

    attach(&mut arena, FREE_HEAD, 64..80);
    assert_eq!(arena.acquire_entry(), None);

    arena.release_entry(a);
    assert_eq!(arena.acquire_entry(), Some(0));
}

#[test]
fn release_entry_leaves_a_detached_slot() {
    let mut entries = [Region::INIT; 3];
    let mut arena = Arena::new(&mut entries);
    attach(&mut arena, USED_HEAD, 0..4);
    let b = attach(&mut arena, USED_HEAD, 4..8);
    attach(&mut arena, USED_HEAD, 8..12);

    arena.release_entry(b);

    assert_eq!(*arena.node(b), Region::detached(b));
    assert_eq!(ranges(&arena, USED_HEAD), [0..4, 8..12]);
}

#[test]
fn insertion_keeps_address_order() {
    let mut entries = [Region::INIT; 5];
    let mut arena = Arena::new(&mut entries);
    for &start in &[40, 0, 80, 20, 60] {
        attach(&mut arena, USED_HEAD, start..start + 4);
    }

    assert_eq!(
        ranges(&arena, USED_HEAD),
        [0..4, 20..24, 40..44, 60..64, 80..84]
    );
    assert_eq!(arena.node(USED_HEAD).length, 20);
}

#[test]
fn find_insertion_point() {
    let mut entries = [Region::INIT; 3];
    let mut arena = Arena::new(&mut entries);
    assert_eq!(arena.find_insertion_point(FREE_HEAD, 100), FREE_HEAD);

    let a = attach(&mut arena, FREE_HEAD, 10..20);
    let b = attach(&mut arena, FREE_HEAD, 30..40);

    assert_eq!(arena.find_insertion_point(FREE_HEAD, 0), a);
    assert_eq!(arena.find_insertion_point(FREE_HEAD, 10), b);
    assert_eq!(arena.find_insertion_point(FREE_HEAD, 25), b);
    assert_eq!(arena.find_insertion_point(FREE_HEAD, 30), FREE_HEAD);
}

#[test]
fn remove_and_reinsert() {
    let mut entries = [Region::INIT; 3];
    let mut arena = Arena::new(&mut entries);
    let a = attach(&mut arena, USED_HEAD, 0..8);
    attach(&mut arena, USED_HEAD, 16..24);

    arena.remove(a);
    assert_eq!(arena.node(a).prev, a);
    assert_eq!(arena.node(a).next, a);
    assert_eq!(ranges(&arena, USED_HEAD), [16..24]);

    let anchor = arena.find_insertion_point(FREE_HEAD, 0);
    arena.insert_before(anchor, a);
    assert_eq!(ranges(&arena, FREE_HEAD), [0..8]);
}

#[test]
fn find_by_address_is_exact() {
    let mut entries = [Region::INIT; 2];
    let mut arena = Arena::new(&mut entries);
    let a = attach(&mut arena, USED_HEAD, 100..200);

    assert_eq!(arena.find_by_address(USED_HEAD, 100), Some(a));
    assert_eq!(arena.find_by_address(USED_HEAD, 104), None);
    assert_eq!(arena.find_by_address(FREE_HEAD, 100), None);
}

#[test]
fn find_first_fit_prefers_lowest_address() {
    let mut entries = [Region::INIT; 4];
    let mut arena = Arena::new(&mut entries);
    let small = attach(&mut arena, FREE_HEAD, 0..8);
    let large = attach(&mut arena, FREE_HEAD, 100..200);
    attach(&mut arena, FREE_HEAD, 300..316);

    assert_eq!(arena.find_first_fit(FREE_HEAD, 4), Some(small));
    assert_eq!(arena.find_first_fit(FREE_HEAD, 8), Some(small));
    // Not best-fit: `300..316` would be a tighter match
    assert_eq!(arena.find_first_fit(FREE_HEAD, 16), Some(large));
    assert_eq!(arena.find_first_fit(FREE_HEAD, 100), Some(large));
    assert_eq!(arena.find_first_fit(FREE_HEAD, 101), None);
}

#[test]
fn coalesce_merges_contiguous_runs() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut entries = [Region::INIT; 6];
    let mut arena = Arena::new(&mut entries);
    for range in [0..8, 8..16, 16..20, 32..40, 40..48, 64..72] {
        attach(&mut arena, FREE_HEAD, range);
    }

    arena.coalesce(FREE_HEAD);
    log::trace!("free = {:?}", ranges(&arena, FREE_HEAD));

    assert_eq!(ranges(&arena, FREE_HEAD), [0..20, 32..48, 64..72]);
    assert_eq!(arena.node(FREE_HEAD).length, 20 + 16 + 8);
    // Absorbed slots are back in the pool
    assert_eq!(
        (0..6).filter(|&slot| arena.node(slot).is_unused()).count(),
        3
    );
}

#[test]
fn coalesce_leaves_gaps_alone() {
    let mut entries = [Region::INIT; 3];
    let mut arena = Arena::new(&mut entries);
    for range in [0..8, 12..16, 20..24] {
        attach(&mut arena, FREE_HEAD, range);
    }

    arena.coalesce(FREE_HEAD);

    assert_eq!(ranges(&arena, FREE_HEAD), [0..8, 12..16, 20..24]);
}
