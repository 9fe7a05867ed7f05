//! Object lifecycle helpers.
//!
//! Placement construction and destruction over raw storage, and the bulk `uninitialized_*`
//! helpers. The bulk helpers either construct everything or, if an element fails (by panicking
//! or by returning an error), destroy what they constructed so far before passing the failure on.

use core::{mem, ptr};

/// Construct `value` in place at `ptr`.
///
/// # Safety
///
/// `ptr` must be valid for writes and aligned. Whatever it held is not dropped.
#[inline]
pub unsafe fn construct<T>(ptr: *mut T, value: T) {
    ptr::write(ptr, value);
}

/// Destroy the value at `ptr` in place.
///
/// # Safety
///
/// `ptr` must point to a live value, which is dead afterwards.
#[inline]
pub unsafe fn destroy<T>(ptr: *mut T) {
    ptr::drop_in_place(ptr);
}

/// Destroy `n` consecutive values starting at `ptr`.
///
/// This is a no-op for types without drop glue.
///
/// # Safety
///
/// The `n` values must be live, and are dead afterwards.
#[inline]
pub unsafe fn destroy_range<T>(ptr: *mut T, n: usize) {
    if mem::needs_drop::<T>() {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, n));
    }
}

/// A guard over a partially constructed range.
///
/// The guard destroys the constructed prefix when dropped, which makes bulk construction
/// unwind correctly. Call `finish` once the range is complete.
pub struct ConstructGuard<T> {
    /// The start of the range.
    start: *mut T,
    /// The number of constructed values.
    len: usize,
}

impl<T> ConstructGuard<T> {
    /// Start constructing at `start`.
    #[inline]
    pub fn new(start: *mut T) -> ConstructGuard<T> {
        ConstructGuard { start, len: 0 }
    }

    /// Construct the next value.
    ///
    /// # Safety
    ///
    /// The slot after the constructed prefix must be valid for writes.
    #[inline]
    pub unsafe fn push(&mut self, value: T) {
        construct(self.start.add(self.len), value);
        self.len += 1;
    }

    /// Disarm the guard, keeping the constructed values alive.
    ///
    /// Returns the number of constructed values.
    #[inline]
    pub fn finish(self) -> usize {
        let len = self.len;
        mem::forget(self);

        len
    }
}

impl<T> Drop for ConstructGuard<T> {
    fn drop(&mut self) {
        log!(DEBUG, "Rolling back {} constructed values.", self.len);

        unsafe {
            // LAST AUDIT: only the first `len` slots were constructed.
            destroy_range(self.start, self.len);
        }
    }
}

/// Construct `n` clones of `value` at `dst`.
///
/// # Safety
///
/// `dst` must be valid for `n` writes.
pub unsafe fn uninitialized_fill_n<T: Clone>(dst: *mut T, n: usize, value: &T) {
    let mut guard = ConstructGuard::new(dst);
    for _ in 0..n {
        guard.push(value.clone());
    }
    guard.finish();
}

/// Construct clones of `src` at `dst`.
///
/// # Safety
///
/// `dst` must be valid for `src.len()` writes, and must not overlap `src`.
pub unsafe fn uninitialized_copy<T: Clone>(dst: *mut T, src: &[T]) {
    let mut guard = ConstructGuard::new(dst);
    for x in src {
        guard.push(x.clone());
    }
    guard.finish();
}

/// Construct up to `n` values from `iter` at `dst`.
///
/// Returns the number of values constructed, which is less than `n` only if the iterator ran
/// out.
///
/// # Safety
///
/// `dst` must be valid for `n` writes.
pub unsafe fn uninitialized_from_iter<T, I>(dst: *mut T, n: usize, iter: I) -> usize
where
    I: IntoIterator<Item = T>,
{
    let mut guard = ConstructGuard::new(dst);
    for x in iter.into_iter().take(n) {
        guard.push(x);
    }
    guard.finish()
}

/// Construct `n` values produced by `f(0)`, `f(1)`, ... at `dst`.
///
/// If `f` fails, the constructed prefix is destroyed and the error returned.
///
/// # Safety
///
/// `dst` must be valid for `n` writes.
pub unsafe fn try_uninitialized_from_fn<T, E, F>(dst: *mut T, n: usize, mut f: F) -> Result<(), E>
where
    F: FnMut(usize) -> Result<T, E>,
{
    let mut guard = ConstructGuard::new(dst);
    for i in 0..n {
        guard.push(f(i)?);
    }
    guard.finish();

    Ok(())
}

/// Move `n` values from `src` to `dst`.
///
/// The source slots are logically uninitialized afterwards.
///
/// # Safety
///
/// Both ranges must be valid for `n` values, and may overlap.
#[inline]
pub unsafe fn relocate<T>(src: *const T, dst: *mut T, n: usize) {
    ptr::copy(src, dst, n);
}

#[cfg(test)]
mod test {
    use super::*;

    use std::cell::Cell;
    use std::mem::MaybeUninit;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    /// Counts its own drops.
    #[derive(Clone)]
    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_fill_and_destroy() {
        let drops = Rc::new(Cell::new(0));
        let mut buf: [MaybeUninit<Counted>; 5] = unsafe { MaybeUninit::uninit().assume_init() };
        let dst = buf.as_mut_ptr() as *mut Counted;

        unsafe {
            uninitialized_fill_n(dst, 5, &Counted(drops.clone()));
            // The template itself.
            assert_eq!(drops.get(), 1);
            destroy_range(dst, 5);
        }
        assert_eq!(drops.get(), 6);
    }

    #[test]
    fn test_try_rollback() {
        let drops = Rc::new(Cell::new(0));
        let mut buf: [MaybeUninit<Counted>; 8] = unsafe { MaybeUninit::uninit().assume_init() };
        let dst = buf.as_mut_ptr() as *mut Counted;

        let res = unsafe {
            try_uninitialized_from_fn(dst, 8, |i| {
                if i == 5 {
                    Err("five")
                } else {
                    Ok(Counted(drops.clone()))
                }
            })
        };
        assert_eq!(res, Err("five"));
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_panic_rollback() {
        let drops = Rc::new(Cell::new(0));
        let mut buf: [MaybeUninit<Counted>; 4] = unsafe { MaybeUninit::uninit().assume_init() };
        let dst = buf.as_mut_ptr() as *mut Counted;

        let res = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            uninitialized_from_iter(
                dst,
                4,
                (0..4).map(|i| {
                    assert!(i < 3, "boom");
                    Counted(drops.clone())
                }),
            );
        }));
        assert!(res.is_err());
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn test_short_iter() {
        let mut buf = [0u32; 6];
        let n = unsafe { uninitialized_from_iter(buf.as_mut_ptr(), 6, 1..4) };
        assert_eq!(n, 3);
        assert_eq!(buf[..3], [1, 2, 3]);
    }

    #[test]
    fn test_copy_relocate() {
        let src = [1, 2, 3, 4];
        let mut buf = [0; 6];

        unsafe {
            uninitialized_copy(buf.as_mut_ptr(), &src);
            relocate(buf.as_ptr(), buf.as_mut_ptr().add(2), 4);
        }
        assert_eq!(buf, [1, 2, 1, 2, 3, 4]);
    }
}
