use core::{mem::MaybeUninit, ptr::NonNull, slice};

/// An anonymous read-write memory mapping, unmapped on drop.
///
/// # Examples
///
/// ```
/// use regionlist::{backing::MmapSpan, Region, RegionList};
///
/// let mut span = MmapSpan::new(1 << 20).unwrap();
/// let mut entries = [Region::INIT; 64];
/// let mut list = RegionList::from_pool(span.as_pool(), &mut entries).unwrap();
///
/// let p = list.assign(4096).unwrap() as *mut u8;
/// unsafe { p.write_bytes(0xa5, 4096) };
/// ```
#[cfg_attr(feature = "doc_cfg", doc(cfg(unix)))]
#[derive(Debug)]
pub struct MmapSpan {
    ptr: NonNull<u8>,
    len: usize,
}

// Safety: The mapping is exclusively owned by `MmapSpan`.
unsafe impl Send for MmapSpan {}
unsafe impl Sync for MmapSpan {}

impl MmapSpan {
    /// Map at least `min_len` bytes, rounded up to the page size.
    ///
    /// Returns `None` if the system refuses the mapping.
    pub fn new(min_len: usize) -> Option<Self> {
        let page_size_m1 = page_size()? - 1;
        let len = min_len.max(1).checked_add(page_size_m1)? & !page_size_m1;

        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_WRITE | libc::PROT_READ,
                libc::MAP_ANONYMOUS | libc::MAP_PRIVATE,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return None;
        }

        Some(Self {
            ptr: NonNull::new(ptr as *mut u8)?,
            len,
        })
    }

    /// The start address of the mapping.
    #[inline]
    pub fn base(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the mapping as a memory block for [`RegionList::from_pool`].
    ///
    /// [`RegionList::from_pool`]: crate::RegionList::from_pool
    #[inline]
    pub fn as_pool(&mut self) -> &mut [MaybeUninit<u8>] {
        // Safety: The mapping is `len` bytes long and owned by `self`
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut MaybeUninit<u8>, self.len) }
    }
}

impl Drop for MmapSpan {
    fn drop(&mut self) {
        unsafe { libc::munmap(self.ptr.as_ptr() as *mut _, self.len) };
    }
}

fn page_size() -> Option<usize> {
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }
    let page_size = page_size as usize;
    if page_size.is_power_of_two() {
        Some(page_size)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_page_size() {
        let page_size = page_size().unwrap();
        let span = MmapSpan::new(1).unwrap();
        assert_eq!(span.len(), page_size);
        assert_eq!(span.base() % page_size, 0);

        let span = MmapSpan::new(page_size + 1).unwrap();
        assert_eq!(span.len(), page_size * 2);
    }

    #[test]
    fn absurd_length_fails() {
        assert!(MmapSpan::new(usize::MAX).is_none());
    }
}
