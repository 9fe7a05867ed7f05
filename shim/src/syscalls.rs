//! System allocator calls.
//!
//! Thin wrappers around the C allocator. Every function reports failure through a null pointer,
//! exactly like the functions it wraps.

use core::ptr;

/// Allocate `size` bytes from the system allocator.
///
/// The returned memory is aligned to at least the platform's fundamental alignment. On failure
/// (or if `size` is zero) a null pointer may be returned.
///
/// # Safety
///
/// The result must be released with [`free`] and nothing else.
#[inline]
pub unsafe fn malloc(size: usize) -> *mut u8 {
    libc::malloc(size) as *mut u8
}

/// Allocate `size` bytes aligned to `align` from the system allocator.
///
/// `align` must be a power of two. Returns null on failure.
///
/// # Safety
///
/// The result must be released with [`free`] and nothing else.
pub unsafe fn aligned_malloc(size: usize, align: usize) -> *mut u8 {
    // `posix_memalign` wants a multiple of the pointer size.
    let align = align.max(core::mem::size_of::<usize>());
    let mut out: *mut libc::c_void = ptr::null_mut();

    if libc::posix_memalign(&mut out, align, size) == 0 {
        out as *mut u8
    } else {
        ptr::null_mut()
    }
}

/// Give memory back to the system allocator.
///
/// # Safety
///
/// `ptr` must come from [`malloc`] or [`aligned_malloc`] and must not be used afterwards.
#[inline]
pub unsafe fn free(ptr: *mut u8) {
    libc::free(ptr as *mut libc::c_void)
}

/// Write a message to standard error.
///
/// This never allocates, which makes it usable from the OOM path.
pub fn log(s: &str) -> isize {
    unsafe { libc::write(2, s.as_ptr() as *const libc::c_void, s.len()) as isize }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_malloc_free() {
        unsafe {
            let ptr = malloc(64);
            assert!(!ptr.is_null());
            ptr::write_bytes(ptr, 0xAB, 64);
            assert_eq!(*ptr.offset(63), 0xAB);
            free(ptr);
        }
    }

    #[test]
    fn test_aligned() {
        unsafe {
            let ptr = aligned_malloc(100, 64);
            assert!(!ptr.is_null());
            assert_eq!(ptr as usize % 64, 0);
            free(ptr);
        }
    }

    #[test]
    fn test_oom() {
        unsafe {
            assert!(malloc(usize::MAX - 4096).is_null());
        }
    }
}
