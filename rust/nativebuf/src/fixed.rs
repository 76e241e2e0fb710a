//! Fixed-size buffers: an owning [`FixedBuffer`] that frees its allocation on
//! drop, and a non-owning [`NativeView`] over memory supplied by foreign code.
//!
//! The split encodes ownership in the type system: a `FixedBuffer` always
//! frees exactly the block it allocated, while a `NativeView` has no
//! destructor and can never free anything.

use std::marker::PhantomData;
use std::mem::ManuallyDrop;

use nativebuf_alloc::{heap, size};
use nativebuf_common::{Result, error::Error, verify_arg};

use crate::Element;

/// A non-resizable buffer of `len` elements over heap memory it owns.
///
/// The allocation is released when the buffer is dropped. Move semantics make
/// double-free and use-after-free unrepresentable: there is at most one live
/// owner of the block, and it cannot be accessed after it goes away.
pub struct FixedBuffer<T> {
    /// First element, or null when the buffer is empty.
    ptr: *mut u8,
    /// Element count.
    len: usize,
    /// Byte size of the underlying allocation. Carried unchanged through
    /// [`cast`](FixedBuffer::cast) so the drop path always frees with the
    /// layout the block was allocated with.
    alloc_size: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> FixedBuffer<T> {
    /// Allocates a buffer of `len` elements, zero-initialized.
    ///
    /// `len == 0` produces an empty buffer without touching the allocator.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the heap cannot satisfy the request,
    /// including the case where `len * size_of::<T>()` overflows (the size
    /// computation saturates and the saturated request is unsatisfiable).
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or requires alignment above
    /// [`heap::ALIGNMENT`].
    pub fn zeroed(len: usize) -> Result<FixedBuffer<T>> {
        check_element_type::<T>();
        if len == 0 {
            return Ok(Self::empty());
        }
        let alloc_size = size::byte_count(len, size_of::<T>());
        let ptr = heap::allocate_zeroed(alloc_size)
            .map_err(|e| Error::alloc("FixedBuffer::zeroed", e))?;
        Ok(FixedBuffer {
            ptr,
            len,
            alloc_size,
            _marker: PhantomData,
        })
    }

    /// Allocates a buffer of `len` elements without initializing the memory.
    ///
    /// # Safety
    ///
    /// Every element must be written before it is read; until then the
    /// contents are uninitialized and reading them (including through
    /// [`as_slice`](FixedBuffer::as_slice)) is undefined behavior.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`zeroed`](FixedBuffer::zeroed).
    pub unsafe fn uninitialized(len: usize) -> Result<FixedBuffer<T>> {
        check_element_type::<T>();
        if len == 0 {
            return Ok(Self::empty());
        }
        let alloc_size = size::byte_count(len, size_of::<T>());
        let ptr = heap::allocate(alloc_size)
            .map_err(|e| Error::alloc("FixedBuffer::uninitialized", e))?;
        Ok(FixedBuffer {
            ptr,
            len,
            alloc_size,
            _marker: PhantomData,
        })
    }

    fn empty() -> FixedBuffer<T> {
        FixedBuffer {
            ptr: std::ptr::null_mut(),
            len: 0,
            alloc_size: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a raw pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr as *const T
    }

    /// Returns a mutable raw pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr as *mut T
    }

    /// Returns the elements as a slice. An empty buffer yields an empty
    /// slice without dereferencing the pointer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr as *const T, self.len) }
        }
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut T, self.len) }
        }
    }

    /// Copies the elements into an owned `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Reinterprets the buffer as holding elements of type `U`.
    ///
    /// The pointer and the element *count* are unchanged: this is a type-lens
    /// change analogous to a raw pointer cast, not a byte-preserving rescale.
    /// When `size_of::<U>() != size_of::<T>()` the byte span covered by the
    /// count changes accordingly, and keeping it in bounds is the caller's
    /// responsibility. The underlying allocation is carried over as-is and is
    /// still freed in full when the result is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `U` is zero-sized or requires alignment above
    /// [`heap::ALIGNMENT`].
    pub fn cast<U: Element>(self) -> FixedBuffer<U> {
        check_element_type::<U>();
        let this = ManuallyDrop::new(self);
        FixedBuffer {
            ptr: this.ptr,
            len: this.len,
            alloc_size: this.alloc_size,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for FixedBuffer<T> {
    fn drop(&mut self) {
        if self.alloc_size != 0 {
            // SAFETY: `ptr`/`alloc_size` came from `heap::allocate*` and are
            // only ever freed here; `cast` forgets the source value.
            unsafe { heap::free(self.ptr, self.alloc_size) };
        }
    }
}

impl<T: Element> std::ops::Deref for FixedBuffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Element> std::ops::DerefMut for FixedBuffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Element + std::fmt::Debug> std::fmt::Debug for FixedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("values", &self.as_slice())
            .finish()
    }
}

// SAFETY: the buffer exclusively owns its plain-data allocation; sending it
// moves that ownership with it.
unsafe impl<T: Send> Send for FixedBuffer<T> {}

// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Sync> Sync for FixedBuffer<T> {}

/// A non-owning view of `len` elements over memory owned by foreign code.
///
/// The view never allocates, reallocates or frees: it has no destructor, so
/// the "never free a wrapped pointer" contract holds by construction. The
/// memory must stay valid for as long as the view is used.
pub struct NativeView<T> {
    ptr: *mut u8,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> NativeView<T> {
    /// Wraps a caller-supplied pointer and element count.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len * size_of::<T>()`
    /// bytes, properly aligned for `T`, and not mutated or freed through
    /// another handle while the view is in use.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error when `ptr` is null and `len` is
    /// nonzero.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or requires alignment above
    /// [`heap::ALIGNMENT`].
    pub unsafe fn wrap(ptr: *mut T, len: usize) -> Result<NativeView<T>> {
        check_element_type::<T>();
        verify_arg!(ptr, !ptr.is_null() || len == 0);
        Ok(NativeView {
            ptr: ptr as *mut u8,
            len,
            _marker: PhantomData,
        })
    }

    /// Returns the number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view covers no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a raw pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr as *const T
    }

    /// Returns the elements as a slice. An empty view yields an empty slice
    /// without dereferencing the pointer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr as *const T, self.len) }
        }
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut T, self.len) }
        }
    }

    /// Copies the viewed elements into an owned `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Reinterprets the view as covering elements of type `U`, keeping the
    /// pointer and the element count unchanged (see
    /// [`FixedBuffer::cast`] for the contract).
    ///
    /// # Panics
    ///
    /// Panics if `U` is zero-sized, requires alignment above
    /// [`heap::ALIGNMENT`], or the pointer is misaligned for `U`.
    pub fn cast<U: Element>(self) -> NativeView<U> {
        check_element_type::<U>();
        assert!(
            (self.ptr as usize).is_multiple_of(align_of::<U>()),
            "view pointer is not aligned for the target element type"
        );
        NativeView {
            ptr: self.ptr,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T: Element> std::ops::Deref for NativeView<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Element> std::ops::DerefMut for NativeView<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Element + std::fmt::Debug> std::fmt::Debug for NativeView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeView")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Rejects element types the byte-offset arithmetic cannot support.
#[inline]
pub(crate) fn check_element_type<T>() {
    assert!(size_of::<T>() != 0, "zero-sized element types are not supported");
    assert!(
        align_of::<T>() <= heap::ALIGNMENT,
        "element alignment exceeds the heap block alignment"
    );
}
