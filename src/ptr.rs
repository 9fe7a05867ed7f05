//! Owning pointers.

use core::ptr::NonNull;
use core::{fmt, marker, ops};

/// A non-null raw pointer whose holder owns the pointee.
///
/// This is the currency of the memory layer: the pool hands out `Pointer<u8>`s, and the typed
/// allocators cast them to `Pointer<T>`s for the containers.
pub struct Pointer<T> {
    ptr: NonNull<T>,
    /// This owns a `T`.
    _phantom: marker::PhantomData<T>,
}

impl<T> Pointer<T> {
    /// Wrap a raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must not be null.
    #[inline]
    pub unsafe fn new(ptr: *mut T) -> Pointer<T> {
        debug_assert!(!ptr.is_null(), "Null pointer!");

        Pointer {
            ptr: NonNull::new_unchecked(ptr),
            _phantom: marker::PhantomData,
        }
    }

    /// Wrap a raw pointer, or `None` if it is null.
    #[inline]
    pub fn from_raw(ptr: *mut T) -> Option<Pointer<T>> {
        NonNull::new(ptr).map(|ptr| Pointer {
            ptr,
            _phantom: marker::PhantomData,
        })
    }

    /// A dangling, well-aligned pointer.
    ///
    /// This stands for "no allocation": empty buffers and zero-sized values use it. It must never
    /// be dereferenced, except for zero-sized `T`.
    #[inline]
    pub const fn empty() -> Pointer<T> {
        Pointer {
            ptr: NonNull::dangling(),
            _phantom: marker::PhantomData,
        }
    }

    /// Reinterpret the pointee as a `U`.
    #[inline]
    pub fn cast<U>(self) -> Pointer<U> {
        Pointer {
            ptr: self.ptr.cast(),
            _phantom: marker::PhantomData,
        }
    }

    /// Move the pointer by `diff` elements of `T`.
    ///
    /// # Safety
    ///
    /// The result must stay within (or one past) the same allocation.
    #[inline]
    pub unsafe fn offset(self, diff: isize) -> Pointer<T> {
        Pointer::new(self.ptr.as_ptr().offset(diff))
    }

    /// Get the raw pointer.
    #[inline]
    pub fn get(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Is the address a multiple of `align`?
    #[inline]
    pub fn aligned_to(&self, align: usize) -> bool {
        self.get() as usize % align == 0
    }

    /// Move `value` into the pointee, without dropping what was there.
    ///
    /// # Safety
    ///
    /// The pointee must be valid for writes.
    #[inline]
    pub unsafe fn write(&self, value: T) {
        self.get().write(value)
    }
}

// Not derived: that would require `T: Clone`.
impl<T> Clone for Pointer<T> {
    #[inline]
    fn clone(&self) -> Pointer<T> {
        *self
    }
}

impl<T> Copy for Pointer<T> {}

impl<T> PartialEq for Pointer<T> {
    #[inline]
    fn eq(&self, other: &Pointer<T>) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for Pointer<T> {}

impl<T> fmt::Debug for Pointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:p}", self.ptr)
    }
}

impl<T> ops::Deref for Pointer<T> {
    type Target = *mut T;

    #[inline]
    fn deref(&self) -> &*mut T {
        // `NonNull<T>` has the layout of `*mut T`.
        unsafe { &*(&self.ptr as *const NonNull<T> as *const *mut T) }
    }
}
