use crate::Init;

/// An index into the arena formed by the two list heads and the entry
/// storage.
pub(crate) type Slot = usize;

/// The slot naming the used list's head.
pub(crate) const USED_HEAD: Slot = usize::MAX;
/// The slot naming the free list's head.
pub(crate) const FREE_HEAD: Slot = usize::MAX - 1;
/// Entry storage must be strictly shorter than this so that no slot index
/// collides with a head.
pub(crate) const MAX_ENTRIES: usize = FREE_HEAD;

/// A region descriptor: one slot of the entry storage handed to
/// [`RegionList::new`].
///
/// A slot whose address is `None` is unused and belongs to neither list.
/// List heads are `Region`s too; there, `length` caches the sum of the
/// member regions' lengths.
///
/// [`RegionList::new`]: crate::RegionList::new
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub(crate) address: Option<usize>,
    pub(crate) length: usize,
    pub(crate) prev: Slot,
    pub(crate) next: Slot,
}

impl Region {
    /// An unused slot.
    pub const INIT: Self = Self {
        address: None,
        length: 0,
        prev: 0,
        next: 0,
    };

    /// An unused slot linked only to itself.
    #[inline]
    pub(crate) const fn detached(slot: Slot) -> Self {
        Self {
            address: None,
            length: 0,
            prev: slot,
            next: slot,
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub(crate) fn is_unused(&self) -> bool {
        self.address.is_none()
    }
}

impl Init for Region {
    const INIT: Self = Self::INIT;
}

impl const_default1::ConstDefault for Region {
    const DEFAULT: Self = Self::INIT;
}

impl Default for Region {
    #[inline]
    fn default() -> Self {
        Self::INIT
    }
}
