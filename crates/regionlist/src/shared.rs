use core::{cell::UnsafeCell, ops};

use crate::{EntryCounts, Error, Init, NoLock, RegionList, RegionLock};

/// [`RegionList`] behind a pair of serialization hooks.
///
/// Every method takes `&self` and runs inside `L::lock`/`L::unlock`. With an
/// [`ExclusiveLock`] such as [`SpinLock`], a `SharedRegionList` is `Sync`
/// and can be used from several threads; with the default [`NoLock`], it
/// can only be shared within one thread.
///
/// [`ExclusiveLock`]: crate::ExclusiveLock
/// [`SpinLock`]: crate::SpinLock
pub struct SharedRegionList<'pool, L = NoLock> {
    inner: UnsafeCell<RegionList<'pool>>,
    lock: L,
}

// Safety: Every access to `inner` happens while `lock` is held, and
//         `ExclusiveLock` guarantees that only one thread holds it.
unsafe impl<L: crate::ExclusiveLock + Sync> Sync for SharedRegionList<'_, L> {}

impl<'pool, L: RegionLock> SharedRegionList<'pool, L> {
    /// Wrap `list`, using `L`'s initial value as the hooks.
    #[inline]
    pub fn new(list: RegionList<'pool>) -> Self
    where
        L: Init,
    {
        Self::with_lock(list, L::INIT)
    }

    /// Wrap `list`, using `lock` as the hooks.
    #[inline]
    pub fn with_lock(list: RegionList<'pool>, lock: L) -> Self {
        Self {
            inner: UnsafeCell::new(list),
            lock,
        }
    }

    #[inline]
    fn lock_inner(&self) -> LockGuard<'_, 'pool, L> {
        self.lock.lock();
        LockGuard { shared: self }
    }

    /// Call [`RegionList::assign`] with the lock held.
    #[inline]
    pub fn assign(&self, length: usize) -> Result<usize, Error> {
        self.lock_inner().assign(length)
    }

    /// Call [`RegionList::release`] with the lock held.
    #[inline]
    pub fn release(&self, address: usize) -> Option<usize> {
        self.lock_inner().release(address)
    }

    /// Call [`RegionList::used_length`] with the lock held.
    #[inline]
    pub fn used_length(&self) -> usize {
        self.lock_inner().used_length()
    }

    /// Call [`RegionList::free_length`] with the lock held.
    #[inline]
    pub fn free_length(&self) -> usize {
        self.lock_inner().free_length()
    }

    /// Call [`RegionList::entry_counts`] with the lock held.
    #[inline]
    pub fn entry_counts(&self) -> EntryCounts {
        self.lock_inner().entry_counts()
    }

    /// Get a mutable reference to the wrapped `RegionList`. No hooks are
    /// called because `&mut self` already rules out other users.
    #[inline]
    pub fn get_mut(&mut self) -> &mut RegionList<'pool> {
        self.inner.get_mut()
    }

    /// Unwrap the `RegionList`.
    #[inline]
    pub fn into_inner(self) -> RegionList<'pool> {
        self.inner.into_inner()
    }
}

impl<L> core::fmt::Debug for SharedRegionList<'_, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedRegionList").finish_non_exhaustive()
    }
}

struct LockGuard<'a, 'pool, L: RegionLock> {
    shared: &'a SharedRegionList<'pool, L>,
}

impl<'pool, L: RegionLock> ops::Deref for LockGuard<'_, 'pool, L> {
    type Target = RegionList<'pool>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // Safety: Protected by `lock`
        unsafe { &*self.shared.inner.get() }
    }
}

impl<L: RegionLock> ops::DerefMut for LockGuard<'_, '_, L> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Safety: Protected by `lock`
        unsafe { &mut *self.shared.inner.get() }
    }
}

impl<L: RegionLock> Drop for LockGuard<'_, '_, L> {
    #[inline]
    fn drop(&mut self) {
        self.shared.lock.unlock();
    }
}
