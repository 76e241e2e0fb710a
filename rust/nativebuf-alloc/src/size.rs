//! Overflow-safe computation of allocation sizes.

/// Upper bound below which a product of two factors cannot overflow `usize`
/// (roughly the square root of `usize::MAX`).
const SMALL: usize = 1 << (usize::BITS / 2);

/// Computes `element_count * element_size` in bytes, saturating to
/// `usize::MAX` instead of wrapping on overflow.
///
/// Overflow is never reported as an error: `usize::MAX` is returned as a
/// saturating sentinel, and no allocator can satisfy a request of that size
/// (`Layout` caps allocation sizes at `isize::MAX`), so the oversized request
/// surfaces downstream as an ordinary allocation failure.
///
/// # Examples
///
/// ```
/// use nativebuf_alloc::size::byte_count;
///
/// assert_eq!(byte_count(10, 4), 40);
/// assert_eq!(byte_count(0, 8), 0);
/// assert_eq!(byte_count(usize::MAX, 0), 0);
/// assert_eq!(byte_count(usize::MAX, 2), usize::MAX);
/// assert_eq!(byte_count(usize::MAX, usize::MAX), usize::MAX);
/// ```
#[inline]
pub fn byte_count(element_count: usize, element_size: usize) -> usize {
    if (element_count | element_size) < SMALL {
        // Both factors fit in a half-word, the product fits in a full word.
        element_count * element_size
    } else {
        byte_count_checked(element_count, element_size)
    }
}

#[cold]
fn byte_count_checked(element_count: usize, element_size: usize) -> usize {
    if element_size == 0 {
        // Guards the division below.
        return 0;
    }
    if usize::MAX / element_size < element_count {
        usize::MAX
    } else {
        element_count * element_size
    }
}
