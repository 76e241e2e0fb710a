//! Heap block allocation with malloc/realloc/free semantics.
//!
//! This module provides the raw memory blocks backing the buffer types.
//! Every block is aligned to [`ALIGNMENT`] bytes regardless of the element
//! type it will hold, so a block can be released through any element-type
//! lens with the same layout it was allocated with.
//!
//! Allocation failure is reported as a recoverable [`std::io::Error`] of kind
//! `OutOfMemory` rather than aborting the process; callers decide how to
//! surface it.

use std::alloc::Layout;

/// Alignment in bytes of every block returned by this module.
pub const ALIGNMENT: usize = 64;

/// Allocates an uninitialized block of `size` bytes.
///
/// # Arguments
///
/// * `size` - The number of bytes to allocate. Must be nonzero.
///
/// # Errors
///
/// Returns an `OutOfMemory` error if the system allocator cannot satisfy the
/// request, or if `size` exceeds the addressable range (`isize::MAX` once
/// rounded up to the alignment) - which includes the `usize::MAX` saturation
/// sentinel produced by [`crate::size::byte_count`].
///
/// # Safety
///
/// The function itself is safe to call. The returned block is uninitialized:
/// its contents must be written before they are read. The block must be
/// released with [`free`], passing the same `size`.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn allocate(size: usize) -> std::io::Result<*mut u8> {
    let layout = block_layout(size)?;
    let ptr = unsafe { std::alloc::alloc(layout) };
    if ptr.is_null() {
        return Err(out_of_memory(size));
    }
    Ok(ptr)
}

/// Allocates a zero-initialized block of `size` bytes.
///
/// Same contract as [`allocate`], except the returned memory is filled with
/// zero bytes.
pub fn allocate_zeroed(size: usize) -> std::io::Result<*mut u8> {
    let layout = block_layout(size)?;
    let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(out_of_memory(size));
    }
    Ok(ptr)
}

/// Grows or shrinks a block to `new_size` bytes, preserving its contents up
/// to the smaller of the two sizes. The block may move; the returned pointer
/// supersedes `ptr`.
///
/// On error the original block is untouched and remains valid.
///
/// # Safety
///
/// - `ptr` must have been returned by [`allocate`], [`allocate_zeroed`] or a
///   previous [`reallocate`] call from this module.
/// - `old_size` must be the size the block currently has.
/// - The block must not have been freed.
///
/// # Panics
///
/// Panics if `old_size` or `new_size` is zero.
pub unsafe fn reallocate(ptr: *mut u8, old_size: usize, new_size: usize) -> std::io::Result<*mut u8> {
    debug_assert!(!ptr.is_null());
    let old_layout = block_layout(old_size)?;
    // Validate the target size before touching the allocation.
    block_layout(new_size)?;
    let new_ptr = unsafe { std::alloc::realloc(ptr, old_layout, new_size) };
    if new_ptr.is_null() {
        return Err(out_of_memory(new_size));
    }
    Ok(new_ptr)
}

/// Releases a block obtained from this module.
///
/// # Safety
///
/// - `ptr` must have been returned by [`allocate`], [`allocate_zeroed`] or
///   [`reallocate`].
/// - `size` must be the size the block currently has.
/// - The block must not have already been freed, and no references into it
///   may outlive this call.
pub unsafe fn free(ptr: *mut u8, size: usize) {
    debug_assert!(!ptr.is_null());
    debug_assert_ne!(size, 0);
    // SAFETY: `size` was accepted by `block_layout` when the block was
    // allocated, so the layout is valid.
    let layout = unsafe { Layout::from_size_align_unchecked(size, ALIGNMENT) };
    unsafe { std::alloc::dealloc(ptr, layout) };
}

/// Builds the layout for a block of `size` bytes, rejecting sizes the
/// allocator could never satisfy.
fn block_layout(size: usize) -> std::io::Result<Layout> {
    assert_ne!(size, 0, "zero-sized heap block");
    Layout::from_size_align(size, ALIGNMENT).map_err(|_| out_of_memory(size))
}

#[cold]
fn out_of_memory(size: usize) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::OutOfMemory,
        format!("failed to allocate {size} bytes"),
    )
}
