//! System primitives.

use crate::prelude::*;

use shim::syscalls;

/// A source of system memory.
///
/// This is what the pool falls back to when its arena runs dry, and what large requests go to
/// directly. Failure is reported as `None`; the pool decides what to do about it.
pub trait Source {
    /// Acquire `size` bytes, aligned to at least `shim::config::ALIGN`.
    fn acquire(&mut self, size: usize) -> Option<Block>;

    /// Give a block obtained from `acquire` back.
    ///
    /// # Safety
    ///
    /// `block` must come from `acquire` on this source, with the exact size it was acquired with,
    /// and must not be used afterwards.
    unsafe fn release(&mut self, block: Block);
}

/// The C allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Malloc;

impl Source for Malloc {
    #[inline]
    fn acquire(&mut self, size: usize) -> Option<Block> {
        unsafe {
            // LAST AUDIT: the pointer is fresh from malloc and owns `size` bytes.
            Pointer::from_raw(syscalls::malloc(size)).map(|ptr| Block::from_raw_parts(ptr, size))
        }
    }

    #[inline]
    unsafe fn release(&mut self, block: Block) {
        syscalls::free(*Pointer::from(block));
    }
}

/// Acquire `size` bytes aligned to `align` straight from the C allocator.
///
/// This serves the types the pool cannot align.
#[inline]
pub fn acquire_aligned(size: usize, align: usize) -> Result<Pointer<u8>, AllocError> {
    Pointer::from_raw(unsafe { syscalls::aligned_malloc(size, align) }).ok_or(AllocError)
}

/// Release memory from `acquire_aligned`.
///
/// # Safety
///
/// `ptr` must come from `acquire_aligned` and must not be used afterwards.
#[inline]
pub unsafe fn release_aligned(ptr: Pointer<u8>) {
    syscalls::free(*ptr);
}

#[cfg(test)]
mod test {
    use super::*;

    use shim::config;

    #[test]
    fn test_acquire_release() {
        let mut src = Malloc;
        let block = src.acquire(200).unwrap();
        assert_eq!(block.size(), 200);
        assert!(block.aligned_to(config::ALIGN));

        unsafe {
            src.release(block);
        }
    }

    #[test]
    fn test_oom() {
        assert!(Malloc.acquire(usize::MAX - 4096).is_none());
        assert_eq!(acquire_aligned(usize::MAX - 4096, 64), Err(AllocError));
    }

    #[test]
    fn test_aligned() {
        let ptr = acquire_aligned(48, 64).unwrap();
        assert!(ptr.aligned_to(64));

        unsafe {
            release_aligned(ptr);
        }
    }
}
