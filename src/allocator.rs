//! The allocator front-ends.
//!
//! This contains the per-thread pool, the `Alloc` seam the containers are generic over, and the
//! typed `Allocator` wrapper the containers actually talk to.

use crate::bookkeeper::Bookkeeper;
use crate::prelude::*;
use crate::sys::{self, Malloc, Source};

use core::cell::RefCell;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};

use shim::config::ALIGN;

thread_local! {
    /// The bookkeeper of this thread.
    ///
    /// This is never dropped, so blocks freed on other threads never end up on a dead pool.
    static POOL: ManuallyDrop<RefCell<Bookkeeper<Malloc>>> =
        ManuallyDrop::new(RefCell::new(Bookkeeper::new(Malloc)));
}

/// Run `f` on the pool of the current thread.
#[inline]
fn with_pool<F, R>(f: F) -> R
where
    F: FnOnce(&mut Bookkeeper<Malloc>) -> R,
{
    POOL.with(|pool| f(&mut pool.borrow_mut()))
}

/// Allocate `bytes` bytes from the pool of the current thread.
#[inline]
pub fn alloc(bytes: usize) -> Result<Pointer<u8>, AllocError> {
    with_pool(|pool| pool.allocate(bytes))
}

/// Free a buffer.
///
/// The buffer must come from `alloc` (on any thread) with the same size, and must not be used
/// after the free.
#[inline]
pub unsafe fn free(ptr: Pointer<u8>, bytes: usize) {
    with_pool(|pool| pool.deallocate(ptr, bytes))
}

/// Reallocate memory.
///
/// This is `free` followed by `alloc`. The contents are _not_ preserved.
#[inline]
pub unsafe fn realloc(ptr: Pointer<u8>, old: usize, new: usize) -> Result<Pointer<u8>, AllocError> {
    with_pool(|pool| pool.reallocate(ptr, old, new))
}

/// The total number of bytes the pool of this thread has acquired from the system.
pub fn heap_size() -> usize {
    with_pool(|pool| pool.heap_size())
}

/// A raw memory allocator.
///
/// Every container takes one of these as a type parameter.
pub trait Alloc: Clone + Default {
    /// Allocate `bytes` bytes of raw memory, aligned to `ALIGN`.
    fn allocate(&self, bytes: usize) -> Result<Pointer<u8>, AllocError>;

    /// Deallocate a buffer.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` with the same `bytes`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: Pointer<u8>, bytes: usize);

    /// Deallocate a buffer and allocate a new one.
    ///
    /// # Safety
    ///
    /// See `deallocate`.
    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: Pointer<u8>,
        old: usize,
        new: usize,
    ) -> Result<Pointer<u8>, AllocError> {
        self.deallocate(ptr, old);
        self.allocate(new)
    }
}

/// The pooled allocator.
///
/// Small requests are served by the pool of the current thread. Each thread has its own pool, and
/// there is no process-wide one: a block freed on another thread than the one that allocated it
/// joins the free lists of the freeing thread, and is reused from there. A thread's pool is never
/// handed back to the system, not even when the thread exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolAlloc;

impl Alloc for PoolAlloc {
    #[inline]
    fn allocate(&self, bytes: usize) -> Result<Pointer<u8>, AllocError> {
        alloc(bytes)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: Pointer<u8>, bytes: usize) {
        free(ptr, bytes)
    }
}

/// The system allocator, without any pooling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAlloc;

impl Alloc for SystemAlloc {
    #[inline]
    fn allocate(&self, bytes: usize) -> Result<Pointer<u8>, AllocError> {
        if bytes == 0 {
            return Ok(Pointer::empty());
        }

        Malloc.acquire(bytes).map(Pointer::from).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: Pointer<u8>, bytes: usize) {
        if bytes != 0 {
            Malloc.release(Block::from_raw_parts(ptr, bytes));
        }
    }
}

/// A typed allocator.
///
/// This hands out uninitialized storage for `n` values of `T`.
pub struct Allocator<T, A: Alloc = PoolAlloc> {
    alloc: A,
    _phantom: PhantomData<fn() -> T>,
}

// Manual impls, as `T` is only a marker.
impl<T, A: Alloc> Clone for Allocator<T, A> {
    fn clone(&self) -> Allocator<T, A> {
        Allocator::with(self.alloc.clone())
    }
}

impl<T, A: Alloc> Default for Allocator<T, A> {
    fn default() -> Allocator<T, A> {
        Allocator::with(A::default())
    }
}

impl<T, A: Alloc> Allocator<T, A> {
    /// Wrap a raw allocator.
    #[inline]
    pub fn with(alloc: A) -> Allocator<T, A> {
        Allocator {
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Get the raw allocator.
    #[inline]
    pub fn inner(&self) -> &A {
        &self.alloc
    }

    /// The byte size of `n` values, if it is representable.
    #[inline]
    fn bytes(n: usize) -> Result<usize, AllocError> {
        n.checked_mul(mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(AllocError)
    }

    /// Does `T` need more alignment than the raw allocator gives?
    #[inline]
    fn overaligned() -> bool {
        mem::align_of::<T>() > ALIGN
    }

    /// Allocate storage for `n` values.
    ///
    /// Zero-sized requests (`n == 0` or zero-sized `T`) get a dangling, well-aligned pointer.
    pub fn allocate(&self, n: usize) -> Result<Pointer<T>, AllocError> {
        let bytes = Self::bytes(n)?;
        if bytes == 0 {
            return Ok(Pointer::empty());
        }

        if Self::overaligned() {
            sys::acquire_aligned(bytes, mem::align_of::<T>()).map(Pointer::cast)
        } else {
            self.alloc.allocate(bytes).map(Pointer::cast)
        }
    }

    /// Allocate storage for a single value.
    #[inline]
    pub fn allocate_one(&self) -> Result<Pointer<T>, AllocError> {
        self.allocate(1)
    }

    /// Deallocate storage for `n` values.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on an allocator with an equal raw allocator. The values
    /// must already be dropped.
    pub unsafe fn deallocate(&self, ptr: Pointer<T>, n: usize) {
        let bytes = n * mem::size_of::<T>();
        if bytes == 0 {
            return;
        }

        if Self::overaligned() {
            sys::release_aligned(ptr.cast());
        } else {
            self.alloc.deallocate(ptr.cast(), bytes);
        }
    }

    /// Deallocate storage for a single value.
    ///
    /// # Safety
    ///
    /// See `deallocate`.
    #[inline]
    pub unsafe fn deallocate_one(&self, ptr: Pointer<T>) {
        self.deallocate(ptr, 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reuse() {
        unsafe {
            let a = alloc(40).unwrap();
            free(a, 40);
            let b = alloc(40).unwrap();
            assert_eq!(a, b);
            free(b, 40);
        }
    }

    #[test]
    fn test_realloc() {
        unsafe {
            let a = alloc(8).unwrap();
            let b = realloc(a, 8, 300).unwrap();
            free(b, 300);
        }
    }

    #[test]
    fn test_typed() {
        let alloc = Allocator::<u64>::default();
        let ptr = alloc.allocate(4).unwrap();
        assert!(ptr.aligned_to(mem::align_of::<u64>()));

        unsafe {
            for i in 0..4 {
                ptr.offset(i).write(i as u64 * 3);
            }
            assert_eq!(**ptr.offset(3), 9);
            alloc.deallocate(ptr, 4);
        }
    }

    #[test]
    fn test_zero_sized() {
        let alloc = Allocator::<()>::default();
        assert_eq!(alloc.allocate(1000).unwrap(), Pointer::empty());

        let alloc = Allocator::<u32>::default();
        assert_eq!(alloc.allocate(0).unwrap(), Pointer::empty());
    }

    #[test]
    fn test_overflow() {
        let alloc = Allocator::<u64>::default();
        assert_eq!(alloc.allocate(usize::MAX / 4), Err(AllocError));
    }

    #[test]
    fn test_overaligned() {
        #[repr(align(64))]
        struct Line([u8; 64]);

        let alloc = Allocator::<Line>::default();
        let ptr = alloc.allocate(3).unwrap();
        assert!(ptr.aligned_to(64));

        unsafe {
            alloc.deallocate(ptr, 3);
        }
    }

    #[test]
    fn test_system() {
        let alloc = Allocator::<u16, SystemAlloc>::default();
        let ptr = alloc.allocate_one().unwrap();

        unsafe {
            ptr.write(7);
            assert_eq!(**ptr, 7);
            alloc.deallocate_one(ptr);
        }
    }
}
