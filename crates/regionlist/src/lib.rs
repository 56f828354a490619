//! This crate implements a fixed-capacity, address-ordered region allocator.
//!
//!  - **The address span is provided by an application.** The allocator
//!    manages one contiguous span (`base..base + len`) that the application
//!    reserved beforehand: a `static` array, a fixed MCU memory window, or a
//!    mapping obtained from the OS. The span is never grown.
//!
//!  - **Bookkeeping lives in caller-supplied storage.** Every free or used
//!    region is described by one [`Region`] slot taken from an array the
//!    application passes in. No descriptor is ever allocated on its own, so
//!    the allocator needs no heap.
//!
//!  - **Bounded and inspectable.** The free and used lists are kept in
//!    address order and can be walked at any time. Lengths are rounded up to
//!    [`ALIGNMENT`] bytes; the free list is searched first-fit and coalesced
//!    with its immediate neighbors on every release.
//!
//!  - **This crate supports `#![no_std]`.** It can be used in bare-metal and
//!    RTOS-based applications.
//!
//! # Examples
//!
//! ## `RegionList`: Core API
//!
//! ```rust
//! use regionlist::{Region, RegionList};
//!
//! let mut entries = [Region::INIT; 8];
//! let mut list = RegionList::new(0x1000, 1024, &mut entries).unwrap();
//!
//! let a = list.assign(100).unwrap();
//! let b = list.assign(50).unwrap();
//! assert_eq!(a, 0x1000);
//! assert_eq!(b, 0x1000 + 100);
//! assert_eq!(list.used_length(), 152); // 50 is rounded up to 52
//!
//! assert_eq!(list.release(a), Some(100));
//! assert_eq!(list.release(b), Some(52));
//! assert_eq!(list.free_length(), 1024);
//! assert_eq!(list.free_regions().collect::<Vec<_>>(), [0x1000..0x1400]);
//! ```
//!
//! ## `SharedRegionList`: Serialized Access
//!
//! ```rust
//! use regionlist::{Region, RegionList, SharedRegionList, SpinLock};
//!
//! let mut entries = [Region::INIT; 16];
//! let list = RegionList::new(0x8000_0000, 4096, &mut entries).unwrap();
//! let shared: SharedRegionList<'_, SpinLock> = SharedRegionList::new(list);
//!
//! std::thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             let address = shared.assign(64).unwrap();
//!             shared.release(address);
//!         });
//!     }
//! });
//!
//! assert_eq!(shared.free_length(), 4096);
//! ```
//!
#![no_std]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

mod arena;
pub mod backing;
mod error;
mod init;
pub mod lock;
mod region;
mod region_list;
mod shared;
mod utils;
pub use self::{
    error::Error,
    init::*,
    lock::{ExclusiveLock, NoLock, RegionLock, SpinLock},
    region::Region,
    region_list::{Dump, EntryCounts, RegionList, Regions, ALIGNMENT, MIN_ENTRIES},
    shared::SharedRegionList,
};

#[cfg(any(test, feature = "std"))]
extern crate std;
