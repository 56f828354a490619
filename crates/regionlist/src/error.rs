use core::fmt;

/// The error type for [`RegionList`] operations.
///
/// Every failure is local to the call that reported it. A failed operation
/// leaves the allocator's lists exactly as they were.
///
/// [`RegionList`]: crate::RegionList
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The entry storage is too small (fewer than [`MIN_ENTRIES`] slots), or
    /// the span's end is not representable in `usize`.
    ///
    /// [`MIN_ENTRIES`]: crate::MIN_ENTRIES
    InvalidConfiguration,
    /// A zero-length allocation was requested.
    InvalidRequest,
    /// Every entry slot is already describing a free or used region.
    EntryPoolExhausted,
    /// No single free region is large enough. The total free length might
    /// still be sufficient; the span is just too fragmented.
    InsufficientSpace,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidConfiguration => "invalid region list configuration",
            Self::InvalidRequest => "zero-length allocation request",
            Self::EntryPoolExhausted => "no region entry available",
            Self::InsufficientSpace => "no free region large enough",
        })
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for Error {}
