//! The region allocator
use core::{fmt, mem::MaybeUninit, ops::Range};

use crate::{
    arena::{Arena, Members},
    region::{Region, FREE_HEAD, MAX_ENTRIES, USED_HEAD},
    utils::checked_align_up,
    Error,
};

/// The alignment quantum. Every allocation length is rounded up to a multiple
/// of this many bytes.
pub const ALIGNMENT: usize = 4;

/// The minimum number of entry slots accepted by [`RegionList::new`].
pub const MIN_ENTRIES: usize = 2;

#[doc = svgbobdoc::transform!(
/// A fixed-capacity region allocator managing one span of address space.
///
/// # Data Structure Overview
///
/// <center>
/// ```svgbob
///                 "entries: &mut [Region]"
///        ,-------+-------+-------+-------+-------+-------,
///        |   0   |   1   |   2   |   3   |   4   |   5   |
///        | 0x1098| 0x1000| 0x1064| unused| unused| unused|
///        |  872  |  100  |  52   |       |       |       |
///        '---+---+---+---+---+---+-------+-------+-------'
///            ^       ^       ^
///            |       '---+---'
///          ,-+----------,  ,-+----------,
///          |    free    |  |    used    |
///          | length=872 |  | length=152 |
///          '------------'  '------------'
///         circular, address-ordered lists
///         linked by slot index
/// ```
/// </center>
///
/// Each slot of `entries` either describes one free or used region, or is
/// unused. The two list heads cache the total length of their members, so
/// `used_length() + free_length()` always equals the span's length.
///
/// # Properties
///
///  - [`assign`](Self::assign) takes the lowest-addressed free region that
///    is large enough (first-fit) and carves the allocation from its start.
///    Each allocation occupies one entry slot. The free region's slot goes
///    back to the pool when an allocation uses it up completely.
///  - [`release`](Self::release) moves the region back to the free list and
///    merges it with its address-contiguous neighbors.
///  - Both operations take time linear in the number of entry slots.
)]
pub struct RegionList<'pool> {
    arena: Arena<'pool>,
    base: usize,
    total: usize,
}

/// The entry slot usage reported by [`RegionList::entry_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryCounts {
    /// The number of slots not describing a used region.
    pub free: usize,
    /// The number of slots describing a used region.
    pub used: usize,
}

impl<'pool> RegionList<'pool> {
    /// Construct a `RegionList` managing `base..base + total`, keeping its
    /// bookkeeping in `entries`.
    ///
    /// Every slot of `entries` is overwritten. The whole span becomes a
    /// single free region (or nothing, if `total` is zero).
    ///
    /// The span itself is never read or written, so `base` doesn't need to
    /// point to memory accessible by the current program.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `entries` has fewer than
    /// [`MIN_ENTRIES`] slots, or `base + total` overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use regionlist::{Error, Region, RegionList};
    ///
    /// let mut entries = [Region::INIT; 1];
    /// assert_eq!(
    ///     RegionList::new(0x1000, 1024, &mut entries).err(),
    ///     Some(Error::InvalidConfiguration),
    /// );
    ///
    /// let mut entries = [Region::INIT; 2];
    /// let list = RegionList::new(0x1000, 1024, &mut entries).unwrap();
    /// assert_eq!(list.free_length(), 1024);
    /// ```
    pub fn new(base: usize, total: usize, entries: &'pool mut [Region]) -> Result<Self, Error> {
        if entries.len() < MIN_ENTRIES || entries.len() >= MAX_ENTRIES {
            return Err(Error::InvalidConfiguration);
        }
        base.checked_add(total).ok_or(Error::InvalidConfiguration)?;

        let mut arena = Arena::new(entries);
        if total > 0 {
            let slot = arena.acquire_entry().ok_or(Error::InvalidConfiguration)?;
            let entry = arena.node_mut(slot);
            entry.address = Some(base);
            entry.length = total;
            arena.insert_before(FREE_HEAD, slot);
            arena.node_mut(FREE_HEAD).length = total;
        }

        Ok(Self { arena, base, total })
    }

    /// Construct a `RegionList` managing the memory block `pool`.
    ///
    /// # Examples
    ///
    /// ```
    /// use regionlist::{Region, RegionList};
    /// use std::mem::MaybeUninit;
    ///
    /// let mut pool = [MaybeUninit::<u8>::uninit(); 256];
    /// let mut entries = [Region::INIT; 4];
    /// let mut list = RegionList::from_pool(&mut pool, &mut entries).unwrap();
    ///
    /// let p = list.assign(16).unwrap() as *mut u32;
    /// unsafe { p.write_unaligned(42) };
    /// ```
    ///
    /// The memory block must outlive the `RegionList`:
    ///
    /// ```rust,compile_fail
    /// use regionlist::{Region, RegionList};
    /// use std::mem::MaybeUninit;
    ///
    /// let mut entries = [Region::INIT; 4];
    /// let mut pool = [MaybeUninit::<u8>::uninit(); 256];
    /// let list = RegionList::from_pool(&mut pool, &mut entries).unwrap();
    /// drop(pool); // dropping the memory block first is not allowed
    /// drop(list);
    /// ```
    #[inline]
    pub fn from_pool(
        pool: &'pool mut [MaybeUninit<u8>],
        entries: &'pool mut [Region],
    ) -> Result<Self, Error> {
        Self::new(pool.as_mut_ptr() as usize, pool.len(), entries)
    }

    /// Tear down the bookkeeping and give the entry storage back, every slot
    /// reset to [`Region::INIT`].
    ///
    /// The span is left untouched; outstanding allocations are forgotten.
    pub fn destroy(self) -> &'pool mut [Region] {
        let entries = self.arena.into_entries();
        for entry in entries.iter_mut() {
            *entry = Region::INIT;
        }
        entries
    }

    /// Allocate `length` bytes, rounded up to a multiple of [`ALIGNMENT`].
    ///
    /// Returns the start address of the allocation.
    ///
    /// # Errors
    ///
    ///  - [`Error::InvalidRequest`] if `length` is zero.
    ///  - [`Error::EntryPoolExhausted`] if there's no unused entry slot to
    ///    describe the allocation. This is checked before the free list is
    ///    searched.
    ///  - [`Error::InsufficientSpace`] if no single free region is large
    ///    enough.
    ///
    /// # Examples
    ///
    /// ```
    /// use regionlist::{Error, Region, RegionList};
    ///
    /// let mut entries = [Region::INIT; 8];
    /// let mut list = RegionList::new(0x1000, 1024, &mut entries).unwrap();
    ///
    /// assert_eq!(list.assign(5), Ok(0x1000));
    /// assert_eq!(list.used_length(), 8);
    /// assert_eq!(list.assign(0), Err(Error::InvalidRequest));
    /// assert_eq!(list.assign(2048), Err(Error::InsufficientSpace));
    /// ```
    pub fn assign(&mut self, length: usize) -> Result<usize, Error> {
        if length == 0 {
            return Err(Error::InvalidRequest);
        }
        let needed = checked_align_up(length, ALIGNMENT).ok_or(Error::InsufficientSpace)?;

        // Left unused until it's linked below, so bailing out leaks nothing
        let slot = self
            .arena
            .acquire_entry()
            .ok_or(Error::EntryPoolExhausted)?;
        let blank = self
            .arena
            .find_first_fit(FREE_HEAD, needed)
            .ok_or(Error::InsufficientSpace)?;

        // Carve from the start of the free region
        let address = self.arena.start(blank);
        {
            let entry = self.arena.node_mut(slot);
            entry.address = Some(address);
            entry.length = needed;
        }
        {
            let blank_entry = self.arena.node_mut(blank);
            blank_entry.address = Some(address + needed);
            blank_entry.length -= needed;
        }
        if self.arena.node(blank).is_empty() {
            self.arena.release_entry(blank);
        }

        self.arena.node_mut(FREE_HEAD).length -= needed;
        self.arena.node_mut(USED_HEAD).length += needed;

        let anchor = self.arena.find_insertion_point(USED_HEAD, address);
        self.arena.insert_before(anchor, slot);

        Ok(address)
    }

    /// Release the allocation starting at `address`.
    ///
    /// Returns the allocation's (rounded) length. If `address` isn't the
    /// start of an outstanding allocation, this method does nothing and
    /// returns `None`; releasing an allocation twice is harmless.
    ///
    /// # Examples
    ///
    /// ```
    /// use regionlist::{Region, RegionList};
    ///
    /// let mut entries = [Region::INIT; 8];
    /// let mut list = RegionList::new(0, 64, &mut entries).unwrap();
    ///
    /// let a = list.assign(10).unwrap();
    /// assert_eq!(list.release(a), Some(12));
    /// assert_eq!(list.release(a), None);
    /// assert_eq!(list.free_length(), 64);
    /// ```
    pub fn release(&mut self, address: usize) -> Option<usize> {
        let slot = self.arena.find_by_address(USED_HEAD, address)?;
        let length = self.arena.node(slot).length;

        self.arena.remove(slot);
        self.arena.node_mut(USED_HEAD).length -= length;

        let anchor = self.arena.find_insertion_point(FREE_HEAD, address);
        self.arena.insert_before(anchor, slot);
        self.arena.node_mut(FREE_HEAD).length += length;

        self.arena.coalesce(FREE_HEAD);

        Some(length)
    }

    /// The total length of outstanding allocations. Constant time.
    #[inline]
    pub fn used_length(&self) -> usize {
        self.arena.node(USED_HEAD).length
    }

    /// The total length of free regions. Constant time.
    #[inline]
    pub fn free_length(&self) -> usize {
        self.arena.node(FREE_HEAD).length
    }

    /// Count the entry slots describing used regions, and the rest.
    ///
    /// This walks the used list.
    pub fn entry_counts(&self) -> EntryCounts {
        let used = self.arena.members(USED_HEAD).count();
        EntryCounts {
            free: self.arena.capacity() - used,
            used,
        }
    }

    /// The number of entry slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// The start address of the managed span.
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// The length of the managed span.
    #[inline]
    pub fn total_length(&self) -> usize {
        self.total
    }

    /// Iterate over outstanding allocations in address order.
    #[inline]
    pub fn used_regions(&self) -> Regions<'_, 'pool> {
        Regions {
            members: self.arena.members(USED_HEAD),
        }
    }

    /// Iterate over free regions in address order.
    #[inline]
    pub fn free_regions(&self) -> Regions<'_, 'pool> {
        Regions {
            members: self.arena.members(FREE_HEAD),
        }
    }

    /// Get a [`Display`](fmt::Display)able listing of both lists.
    ///
    /// # Examples
    ///
    /// ```
    /// use regionlist::{Region, RegionList};
    ///
    /// let mut entries = [Region::INIT; 4];
    /// let mut list = RegionList::new(0x1000, 64, &mut entries).unwrap();
    /// list.assign(16).unwrap();
    ///
    /// assert_eq!(
    ///     list.dump().to_string(),
    ///     "Used = 16\n  0x1000 16\nFree = 48\n  0x1010 48\nTotal = 64\n",
    /// );
    /// ```
    #[inline]
    pub fn dump(&self) -> Dump<'_, 'pool> {
        Dump(self)
    }
}

impl fmt::Debug for RegionList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionList")
            .field("span", &(self.base..self.base + self.total))
            .field("used", &self.used_regions())
            .field("free", &self.free_regions())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// An iterator over the regions of one list, yielding address ranges.
/// Created by [`RegionList::used_regions`] and [`RegionList::free_regions`].
#[derive(Clone)]
pub struct Regions<'a, 'pool> {
    members: Members<'a, 'pool>,
}

impl Iterator for Regions<'_, '_> {
    type Item = Range<usize>;

    #[inline]
    fn next(&mut self) -> Option<Range<usize>> {
        let slot = self.members.next()?;
        let arena = self.members.arena();
        Some(arena.start(slot)..arena.end(slot))
    }
}

impl fmt::Debug for Regions<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// The listing returned by [`RegionList::dump`].
pub struct Dump<'a, 'pool>(&'a RegionList<'pool>);

impl fmt::Display for Dump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.0;
        writeln!(f, "Used = {}", list.used_length())?;
        for region in list.used_regions() {
            writeln!(f, "  {:#x} {}", region.start, region.len())?;
        }
        writeln!(f, "Free = {}", list.free_length())?;
        for region in list.free_regions() {
            writeln!(f, "  {:#x} {}", region.start, region.len())?;
        }
        writeln!(f, "Total = {}", list.used_length() + list.free_length())
    }
}
