//! The index arena backing both region lists. The core implementation of the
//! entry pool and of the list primitives used by `RegionList`.
use crate::region::{Region, Slot, FREE_HEAD, USED_HEAD};

/// Two circular, doubly-linked lists threaded through a fixed array of
/// [`Region`] slots.
///
/// Links are slot indices. [`USED_HEAD`] and [`FREE_HEAD`] name the two
/// sentinels, which are stored here rather than in `entries`. An empty list
/// has `head.next == head.prev == head`.
pub(crate) struct Arena<'pool> {
    used: Region,
    free: Region,
    entries: &'pool mut [Region],
}

impl<'pool> Arena<'pool> {
    /// Take over `entries`, marking every slot unused and detached.
    pub fn new(entries: &'pool mut [Region]) -> Self {
        for (slot, entry) in entries.iter_mut().enumerate() {
            *entry = Region::detached(slot);
        }
        Self {
            used: Region::detached(USED_HEAD),
            free: Region::detached(FREE_HEAD),
            entries,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn into_entries(self) -> &'pool mut [Region] {
        self.entries
    }

    #[inline]
    pub fn node(&self, slot: Slot) -> &Region {
        match slot {
            USED_HEAD => &self.used,
            FREE_HEAD => &self.free,
            _ => &self.entries[slot],
        }
    }

    #[inline]
    pub fn node_mut(&mut self, slot: Slot) -> &mut Region {
        match slot {
            USED_HEAD => &mut self.used,
            FREE_HEAD => &mut self.free,
            _ => &mut self.entries[slot],
        }
    }

    /// The start address of a list member.
    #[inline]
    pub fn start(&self, slot: Slot) -> usize {
        let address = self.node(slot).address;
        debug_assert!(address.is_some(), "slot {} is not a list member", slot);
        address.unwrap_or_default()
    }

    /// The one-past-end address of a list member.
    #[inline]
    pub fn end(&self, slot: Slot) -> usize {
        self.start(slot) + self.node(slot).length
    }

    /// Iterate over the members of the list headed by `head` in address
    /// order.
    #[inline]
    pub fn members(&self, head: Slot) -> Members<'_, 'pool> {
        Members {
            arena: self,
            head,
            cursor: self.node(head).next,
        }
    }

    /// Find an unused slot, scanning in storage order.
    ///
    /// The returned slot stays unused until the caller gives it an address,
    /// so abandoning it requires no cleanup.
    pub fn acquire_entry(&self) -> Option<Slot> {
        self.entries.iter().position(Region::is_unused)
    }

    /// Unlink `slot` from whichever list holds it and mark it unused.
    ///
    /// The owning list's aggregate length is not updated.
    pub fn release_entry(&mut self, slot: Slot) {
        self.remove(slot);
        let entry = self.node_mut(slot);
        entry.address = None;
        entry.length = 0;
    }

    /// Find the first member of `head`'s list starting above `address`, or
    /// `head` itself if there's none. Inserting before the returned slot
    /// keeps the list sorted.
    pub fn find_insertion_point(&self, head: Slot, address: usize) -> Slot {
        self.members(head)
            .find(|&slot| address < self.start(slot))
            .unwrap_or(head)
    }

    /// Splice `slot` into the chain immediately before `anchor`.
    ///
    /// The owning list's aggregate length is not updated.
    pub fn insert_before(&mut self, anchor: Slot, slot: Slot) {
        let prev = self.node(anchor).prev;
        self.node_mut(prev).next = slot;
        let entry = self.node_mut(slot);
        entry.prev = prev;
        entry.next = anchor;
        self.node_mut(anchor).prev = slot;
    }

    /// Splice `slot` out of its chain, leaving it linked only to itself.
    ///
    /// The owning list's aggregate length is not updated.
    pub fn remove(&mut self, slot: Slot) {
        let Region { prev, next, .. } = *self.node(slot);
        self.node_mut(next).prev = prev;
        self.node_mut(prev).next = next;
        let entry = self.node_mut(slot);
        entry.prev = slot;
        entry.next = slot;
    }

    /// Find the member of `head`'s list starting exactly at `address`.
    pub fn find_by_address(&self, head: Slot, address: usize) -> Option<Slot> {
        self.members(head).find(|&slot| self.start(slot) == address)
    }

    /// Find the lowest-addressed member of `head`'s list that is at least
    /// `needed` bytes long.
    pub fn find_first_fit(&self, head: Slot, needed: usize) -> Option<Slot> {
        self.members(head)
            .find(|&slot| self.node(slot).length >= needed)
    }

    /// Merge every run of byte-contiguous members of `head`'s list into its
    /// first member, returning the absorbed slots to the pool.
    ///
    /// Only the following neighbor is ever compared. A member contiguous
    /// with its predecessor has already been absorbed by the time the scan
    /// would reach it.
    pub fn coalesce(&mut self, head: Slot) {
        let mut slot = self.node(head).next;
        while slot != head {
            loop {
                let next = self.node(slot).next;
                if next == head || self.end(slot) != self.start(next) {
                    break;
                }
                let absorbed = self.node(next).length;
                self.node_mut(slot).length += absorbed;
                self.release_entry(next);
            }
            slot = self.node(slot).next;
        }
    }
}

/// An iterator over the slots of one list. Created by [`Arena::members`].
#[derive(Clone)]
pub(crate) struct Members<'a, 'pool> {
    arena: &'a Arena<'pool>,
    head: Slot,
    cursor: Slot,
}

impl<'a, 'pool> Members<'a, 'pool> {
    #[inline]
    pub fn arena(&self) -> &'a Arena<'pool> {
        self.arena
    }
}

impl Iterator for Members<'_, '_> {
    type Item = Slot;

    #[inline]
    fn next(&mut self) -> Option<Slot> {
        if self.cursor == self.head {
            None
        } else {
            let slot = self.cursor;
            self.cursor = self.arena.node(slot).next;
            Some(slot)
        }
    }
}

#[cfg(test)]
mod tests;
