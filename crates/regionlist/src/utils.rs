/// Round `len` up to the next multiple of `align`, which must be a power of
/// two. Returns `None` if the result is not representable in `usize`.
#[rustversion::since(1.73)]
#[inline]
pub fn checked_align_up(len: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    len.checked_next_multiple_of(align)
}

/// Polyfill for `usize::checked_next_multiple_of` (stabilized in Rust 1.73)
#[rustversion::before(1.73)]
#[inline]
pub fn checked_align_up(len: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(len.checked_add(align - 1)? & !(align - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up() {
        assert_eq!(checked_align_up(0, 4), Some(0));
        assert_eq!(checked_align_up(1, 4), Some(4));
        assert_eq!(checked_align_up(4, 4), Some(4));
        assert_eq!(checked_align_up(5, 4), Some(8));
        assert_eq!(checked_align_up(usize::MAX - 3, 4), Some(usize::MAX - 3));
        assert_eq!(checked_align_up(usize::MAX - 2, 4), None);
    }
}
