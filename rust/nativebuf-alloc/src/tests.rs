use crate::{heap, size};

#[test]
fn test_byte_count_exact_products() {
    assert_eq!(size::byte_count(0, 0), 0);
    assert_eq!(size::byte_count(0, 8), 0);
    assert_eq!(size::byte_count(1, 1), 1);
    assert_eq!(size::byte_count(10, 4), 40);
    assert_eq!(size::byte_count(1000, 16), 16000);
    assert_eq!(size::byte_count(1 << 20, 1 << 10), 1 << 30);
}

#[test]
fn test_byte_count_zero_size_never_overflows() {
    for count in [0, 1, 1 << 16, 1 << 40, usize::MAX - 1, usize::MAX] {
        assert_eq!(size::byte_count(count, 0), 0);
    }
}

#[test]
fn test_byte_count_saturates_on_overflow() {
    assert_eq!(size::byte_count(usize::MAX, 2), usize::MAX);
    assert_eq!(size::byte_count(2, usize::MAX), usize::MAX);
    assert_eq!(size::byte_count(usize::MAX, usize::MAX), usize::MAX);
    assert_eq!(size::byte_count(1 << 40, 1 << 40), usize::MAX);
    assert_eq!(size::byte_count(usize::MAX / 2 + 1, 2), usize::MAX);
}

#[test]
fn test_byte_count_at_the_fast_path_boundary() {
    let small = 1usize << (usize::BITS / 2);
    // Both factors just below the boundary: exact product.
    assert_eq!(size::byte_count(small - 1, small - 1), (small - 1) * (small - 1));
    // One factor at the boundary, product still representable: exact.
    assert_eq!(size::byte_count(small, 2), small * 2);
    assert_eq!(size::byte_count(2, small), small * 2);
    // Product exactly at the top of the range.
    assert_eq!(size::byte_count(usize::MAX, 1), usize::MAX);
    assert_eq!(size::byte_count(usize::MAX / 2, 2), usize::MAX - 1);
}

#[test]
fn test_byte_count_matches_checked_mul() {
    for _ in 0..1000 {
        let count = fastrand::usize(..);
        let element_size = fastrand::usize(..16);
        let expected = count.checked_mul(element_size).unwrap_or(usize::MAX);
        assert_eq!(size::byte_count(count, element_size), expected);
    }
}

#[test]
fn test_heap_allocate_and_free() {
    let size = 1024;
    let ptr = heap::allocate(size).expect("allocate");
    assert!(!ptr.is_null());

    unsafe {
        ptr.write_bytes(0xAB, size);
        assert_eq!(*ptr, 0xAB);
        assert_eq!(*ptr.add(size - 1), 0xAB);
        heap::free(ptr, size);
    }
}

#[test]
fn test_heap_allocate_zeroed() {
    let size = 4096;
    let ptr = heap::allocate_zeroed(size).expect("allocate_zeroed");
    let bytes = unsafe { std::slice::from_raw_parts(ptr, size) };
    assert!(bytes.iter().all(|&b| b == 0));
    unsafe { heap::free(ptr, size) };
}

#[test]
fn test_heap_alignment() {
    for size in [1, 63, 64, 65, 1000, 1 << 16] {
        let ptr = heap::allocate(size).expect("allocate");
        assert!((ptr as usize).is_multiple_of(heap::ALIGNMENT));
        unsafe { heap::free(ptr, size) };
    }
}

#[test]
fn test_heap_reallocate_preserves_contents() {
    let old_size = 256;
    let ptr = heap::allocate(old_size).expect("allocate");
    unsafe {
        for i in 0..old_size {
            ptr.add(i).write(i as u8);
        }
    }

    let new_size = 1024;
    let ptr = unsafe { heap::reallocate(ptr, old_size, new_size).expect("grow") };
    let bytes = unsafe { std::slice::from_raw_parts(ptr, old_size) };
    for (i, &b) in bytes.iter().enumerate() {
        assert_eq!(b, i as u8);
    }

    // Shrinking keeps the prefix as well.
    let ptr = unsafe { heap::reallocate(ptr, new_size, 128).expect("shrink") };
    let bytes = unsafe { std::slice::from_raw_parts(ptr, 128) };
    for (i, &b) in bytes.iter().enumerate() {
        assert_eq!(b, i as u8);
    }
    unsafe { heap::free(ptr, 128) };
}

#[test]
fn test_heap_rejects_saturated_request() {
    let err = heap::allocate(usize::MAX).expect_err("usize::MAX is unsatisfiable");
    assert_eq!(err.kind(), std::io::ErrorKind::OutOfMemory);

    let err = heap::allocate_zeroed(usize::MAX).expect_err("usize::MAX is unsatisfiable");
    assert_eq!(err.kind(), std::io::ErrorKind::OutOfMemory);
}

#[test]
fn test_heap_reallocate_rejects_saturated_request() {
    let ptr = heap::allocate(64).expect("allocate");
    let err = unsafe { heap::reallocate(ptr, 64, usize::MAX) }.expect_err("unsatisfiable");
    assert_eq!(err.kind(), std::io::ErrorKind::OutOfMemory);
    // The original block survives a failed reallocation.
    unsafe {
        ptr.write_bytes(0x5A, 64);
        heap::free(ptr, 64);
    }
}
