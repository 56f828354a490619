//! Serialization hooks bracketing [`SharedRegionList`]'s operations.
//!
//! [`SharedRegionList`]: crate::SharedRegionList
use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::Init;

/// A pair of hooks called before and after each operation.
///
/// Implementations are not obliged to provide mutual exclusion. Those that
/// do should also implement [`ExclusiveLock`].
pub trait RegionLock {
    /// Called before an operation reads or modifies the lists.
    fn lock(&self);

    /// Called after an operation, exactly once per `lock` call.
    fn unlock(&self);
}

/// A [`RegionLock`] that admits only one holder at a time.
///
/// # Safety
///
/// Between a return from `lock` and the matching call to `unlock`, no other
/// call to `lock` on the same object may return, including calls made on
/// other threads.
pub unsafe trait ExclusiveLock: RegionLock {}

/// Hooks that do nothing. The default for [`SharedRegionList`].
///
/// [`SharedRegionList`]: crate::SharedRegionList
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLock(());

impl Init for NoLock {
    const INIT: Self = Self(());
}

impl RegionLock for NoLock {
    #[inline]
    fn lock(&self) {}

    #[inline]
    fn unlock(&self) {}
}

/// A test-and-set spinlock.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    /// An unlocked spinlock.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }
}

impl Init for SpinLock {
    const INIT: Self = Self::new();
}

impl RegionLock for SpinLock {
    #[inline]
    fn lock(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    #[inline]
    fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

// Safety: `compare_exchange` only lets one caller observe `false`, and only
//         `unlock` stores `false` again.
unsafe impl ExclusiveLock for SpinLock {}
