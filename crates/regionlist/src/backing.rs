//! Backing spans obtained from the operating system.
//!
//! A [`RegionList`] never touches the memory it manages, so any reserved
//! span works. This module provides one for hosted targets.
//!
//! [`RegionList`]: crate::RegionList
cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        pub use self::unix::MmapSpan;
    }
}
