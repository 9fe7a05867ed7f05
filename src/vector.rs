//! The dynamic array.

use crate::algo::search;
use crate::allocator::{Alloc, Allocator, PoolAlloc};
use crate::construct;
use crate::fail::{self, Error};
use crate::iter::RandomAccess;
use crate::prelude::*;

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut, Range};
use core::{fmt, mem, ptr, slice};

/// A contiguous growable array.
///
/// The capacity doubles whenever a push does not fit (starting at one), so pushes are amortized
/// O(1). Growing moves the elements to the new buffer, which invalidates every pointer into the
/// old one.
pub struct Vector<T, A: Alloc = PoolAlloc> {
    /// A pointer to the start of the buffer.
    ptr: Pointer<T>,
    /// The capacity of the buffer.
    ///
    /// This is `usize::MAX` for zero-sized types, which never allocate.
    cap: usize,
    /// The number of initialized elements at the start of the buffer.
    len: usize,
    /// The allocator of the buffer.
    alloc: Allocator<T, A>,
    /// This owns `T`s.
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send, A: Alloc + Send> Send for Vector<T, A> {}
unsafe impl<T: Sync, A: Alloc + Sync> Sync for Vector<T, A> {}

impl<T> Vector<T> {
    /// Create a new empty vector.
    ///
    /// This won't allocate a buffer, thus it will have a capacity of zero.
    #[inline]
    pub fn new() -> Vector<T> {
        Vector::new_in(PoolAlloc)
    }

    /// Create an empty vector with room for `cap` elements.
    #[inline]
    pub fn with_capacity(cap: usize) -> Vector<T> {
        fail::or_oom(Vector::try_with_capacity_in(cap, PoolAlloc))
    }
}

impl<T, A: Alloc> Vector<T, A> {
    /// Create a new empty vector using `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Vector<T, A> {
        Vector {
            ptr: Pointer::empty(),
            cap: if mem::size_of::<T>() == 0 { usize::MAX } else { 0 },
            len: 0,
            alloc: Allocator::with(alloc),
            _phantom: PhantomData,
        }
    }

    /// Create an empty vector with room for `cap` elements, using `alloc`.
    pub fn try_with_capacity_in(cap: usize, alloc: A) -> Result<Vector<T, A>, AllocError> {
        let mut vec = Vector::new_in(alloc);
        vec.try_reserve(cap)?;

        Ok(vec)
    }

    /// Create a vector of `n` clones of `value`.
    pub fn from_elem(n: usize, value: &T) -> Vector<T, A>
    where
        T: Clone,
    {
        let mut vec = fail::or_oom(Vector::try_with_capacity_in(n, A::default()));
        unsafe {
            // If a clone panics, the helper destroys its prefix and `vec` frees the buffer.
            construct::uninitialized_fill_n(*vec.ptr, n, value);
        }
        vec.len = n;

        vec
    }

    /// Create a vector of `n` elements produced by `f(0)`, `f(1)`, ...
    ///
    /// If the storage cannot be allocated or `f` fails, nothing is leaked and the error is
    /// returned.
    pub fn try_from_fn<E, F>(n: usize, f: F) -> Result<Vector<T, A>, Error<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut vec = Vector::try_with_capacity_in(n, A::default())?;
        unsafe {
            construct::try_uninitialized_from_fn(*vec.ptr, n, f).map_err(Error::Construct)?;
        }
        vec.len = n;

        Ok(vec)
    }

    /// Get the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this vector empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the capacity of this vector.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Set the length without dropping or initializing anything.
    #[inline]
    pub(crate) unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.cap, "Length beyond the capacity.");
        self.len = len;
    }

    /// View the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// View the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Get the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.first()
    }

    /// Get the first element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.first_mut()
    }

    /// Get the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.last()
    }

    /// Get the last element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.last_mut()
    }

    /// Move the elements into a buffer of `new_cap` elements.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(new_cap >= self.len, "Reallocating below the length.");
        log!(DEBUG, "Reallocating a vector from {} to {} elements.", self.cap, new_cap);

        let new = self.alloc.allocate(new_cap)?;
        unsafe {
            // Moves cannot fail, so there is nothing to roll back from here on.
            ptr::copy_nonoverlapping(*self.ptr, *new, self.len);
            self.alloc.deallocate(self.ptr, self.cap);
        }

        self.ptr = new;
        self.cap = new_cap;

        Ok(())
    }

    /// Make room for at least `min` elements, doubling the capacity if that is more.
    fn grow(&mut self, min: usize) -> Result<(), AllocError> {
        if min <= self.cap {
            return Ok(());
        }

        let doubled = if self.cap == 0 { 1 } else { self.cap.checked_mul(2).ok_or(AllocError)? };
        self.reallocate(doubled.max(min))
    }

    /// Make sure the capacity is at least `cap`.
    ///
    /// This allocates exactly `cap` if it has to allocate at all.
    pub fn try_reserve(&mut self, cap: usize) -> Result<(), AllocError> {
        if cap > self.cap {
            self.reallocate(cap)
        } else {
            Ok(())
        }
    }

    /// Make sure the capacity is at least `cap`.
    #[inline]
    pub fn reserve(&mut self, cap: usize) {
        fail::or_oom(self.try_reserve(cap))
    }

    /// Push an element to the end of this vector.
    ///
    /// If growing fails, `elem` is handed back along with the error.
    pub fn try_push_back(&mut self, elem: T) -> Result<(), (T, AllocError)> {
        if let Err(err) = self.grow(self.len + 1) {
            return Err((elem, err));
        }

        unsafe {
            construct::construct(self.ptr.get().add(self.len), elem);
        }
        self.len += 1;

        Ok(())
    }

    /// Push an element to the end of this vector.
    #[inline]
    pub fn push_back(&mut self, elem: T) {
        if self.try_push_back(elem).is_err() {
            fail::oom();
        }
    }

    /// Remove the last element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe { Some(ptr::read(self.ptr.get().add(self.len))) }
        }
    }

    /// Open a gap of `n` slots at `at`.
    ///
    /// The capacity must already suffice. The returned guard closes the gap again unless it is
    /// filled and finished.
    fn open_gap(&mut self, at: usize, n: usize) -> Gap<T, A> {
        assert!(at <= self.len, "Insertion index {} out of bounds (length is {}).", at, self.len);
        debug_assert!(self.len + n <= self.cap, "Gap does not fit.");

        let tail = self.len - at;
        unsafe {
            construct::relocate(self.ptr.get().add(at), self.ptr.get().add(at + n), tail);
        }
        // The tail is outside the vector until the gap is closed.
        self.len = at;

        Gap {
            vec: self,
            at,
            n,
            filled: 0,
            tail,
        }
    }

    /// Insert `elem` at index `at`, shifting everything after it.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    pub fn try_insert(&mut self, at: usize, elem: T) -> Result<(), AllocError> {
        assert!(at <= self.len, "Insertion index {} out of bounds (length is {}).", at, self.len);
        self.grow(self.len + 1)?;

        let mut gap = self.open_gap(at, 1);
        gap.fill(elem);
        gap.finish();

        Ok(())
    }

    /// Insert `elem` at index `at`, shifting everything after it.
    #[inline]
    pub fn insert(&mut self, at: usize, elem: T) {
        fail::or_oom(self.try_insert(at, elem))
    }

    /// Insert `n` clones of `value` at index `at`.
    ///
    /// If a clone panics, the vector is left as it was.
    pub fn try_insert_n(&mut self, at: usize, n: usize, value: &T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        assert!(at <= self.len, "Insertion index {} out of bounds (length is {}).", at, self.len);
        if n == 0 {
            return Ok(());
        }
        self.grow(self.len.checked_add(n).ok_or(AllocError)?)?;

        let mut gap = self.open_gap(at, n);
        for _ in 0..n {
            gap.fill(value.clone());
        }
        gap.finish();

        Ok(())
    }

    /// Insert `n` clones of `value` at index `at`.
    #[inline]
    pub fn insert_n(&mut self, at: usize, n: usize, value: &T)
    where
        T: Clone,
    {
        fail::or_oom(self.try_insert_n(at, n, value))
    }

    /// Insert the elements of `iter` at index `at`, in order.
    pub fn insert_iter<I>(&mut self, at: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        assert!(at <= self.len, "Insertion index {} out of bounds (length is {}).", at, self.len);

        // Draining the iterator first keeps a panicking iterator away from the gap.
        let mut items = Vector::new_in(self.alloc.inner().clone());
        items.extend(iter);
        if items.is_empty() {
            return;
        }

        let n = items.len();
        fail::or_oom(self.grow(self.len + n));

        let mut gap = self.open_gap(at, n);
        unsafe {
            ptr::copy_nonoverlapping(*items.ptr, gap.vec.ptr.get().add(at), n);
            items.len = 0;
        }
        gap.filled = n;
        gap.finish();
    }

    /// Remove and return the element at `at`, shifting everything after it.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`.
    pub fn remove(&mut self, at: usize) -> T {
        assert!(at < self.len, "Removal index {} out of bounds (length is {}).", at, self.len);

        unsafe {
            let p = self.ptr.get().add(at);
            let elem = ptr::read(p);
            construct::relocate(p.add(1), p, self.len - at - 1);
            self.len -= 1;

            elem
        }
    }

    /// Remove the elements in `range`, shifting everything after it.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let Range { start, end } = range;
        assert!(start <= end && end <= self.len, "Range {}..{} out of bounds.", start, end);

        let len = self.len;
        // Should a destructor panic, the tail is leaked rather than dropped twice.
        self.len = start;
        unsafe {
            let p = self.ptr.get();
            construct::destroy_range(p.add(start), end - start);
            construct::relocate(p.add(end), p.add(start), len - end);
        }
        self.len = len - (end - start);
    }

    /// Shorten the vector to `len` elements, dropping the rest.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            let old = self.len;
            self.len = len;
            unsafe {
                construct::destroy_range(self.ptr.get().add(len), old - len);
            }
        }
    }

    /// Drop every element, keeping the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Resize to `len` elements, cloning `value` into any new slots.
    pub fn resize(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        if len > self.len {
            let at = self.len;
            self.insert_n(at, len - at, value);
        } else {
            self.truncate(len);
        }
    }

    /// Replace the contents with `n` clones of `value`.
    pub fn assign(&mut self, n: usize, value: &T)
    where
        T: Clone,
    {
        self.clear();
        self.insert_n(0, n, value);
    }

    /// Replace the contents with the elements of `iter`.
    pub fn assign_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Swap the contents of two vectors.
    #[inline]
    pub fn swap(&mut self, other: &mut Vector<T, A>) {
        mem::swap(self, other);
    }
}

/// An open gap inside a vector.
///
/// Dropping an unfinished gap destroys what was filled in and moves the tail back.
struct Gap<'a, T, A: Alloc> {
    vec: &'a mut Vector<T, A>,
    /// The start of the gap.
    at: usize,
    /// The size of the gap.
    n: usize,
    /// The number of filled slots.
    filled: usize,
    /// The number of elements after the gap.
    tail: usize,
}

impl<'a, T, A: Alloc> Gap<'a, T, A> {
    /// Fill the next slot.
    #[inline]
    fn fill(&mut self, elem: T) {
        debug_assert!(self.filled < self.n, "Gap overfilled.");

        unsafe {
            construct::construct(self.vec.ptr.get().add(self.at + self.filled), elem);
        }
        self.filled += 1;
    }

    /// Close the gap around its (complete) contents.
    #[inline]
    fn finish(self) {
        debug_assert!(self.filled == self.n, "Gap underfilled.");

        self.vec.len = self.at + self.n + self.tail;
        mem::forget(self);
    }
}

impl<'a, T, A: Alloc> Drop for Gap<'a, T, A> {
    fn drop(&mut self) {
        log!(DEBUG, "Closing a gap of {} slots in a vector.", self.n);

        unsafe {
            let p = self.vec.ptr.get().add(self.at);
            construct::destroy_range(p, self.filled);
            construct::relocate(p.add(self.n), p, self.tail);
        }
        self.vec.len = self.at + self.tail;
    }
}

impl<T, A: Alloc> Drop for Vector<T, A> {
    fn drop(&mut self) {
        unsafe {
            construct::destroy_range(*self.ptr, self.len);
            self.alloc.deallocate(self.ptr, self.cap);
        }
    }
}

impl<T, A: Alloc> Deref for Vector<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        unsafe { slice::from_raw_parts(*self.ptr, self.len) }
    }
}

impl<T, A: Alloc> DerefMut for Vector<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(*self.ptr, self.len) }
    }
}

impl<T, A: Alloc> RandomAccess for Vector<T, A> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    #[inline]
    fn swap_at(&mut self, i: usize, j: usize) {
        self.as_mut_slice().swap(i, j)
    }
}

impl<T, A: Alloc> Default for Vector<T, A> {
    fn default() -> Vector<T, A> {
        Vector::new_in(A::default())
    }
}

impl<T: Clone, A: Alloc> Clone for Vector<T, A> {
    fn clone(&self) -> Vector<T, A> {
        let mut vec = fail::or_oom(Vector::try_with_capacity_in(self.len, self.alloc.inner().clone()));
        unsafe {
            construct::uninitialized_copy(*vec.ptr, self);
        }
        vec.len = self.len;

        vec
    }
}

impl<T: fmt::Debug, A: Alloc> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Alloc> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Vector<T, A>) -> bool {
        self.len == other.len && search::equal(self.iter(), other.iter())
    }
}

impl<T: PartialEq, A: Alloc, const N: usize> PartialEq<[T; N]> for Vector<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq, A: Alloc> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: Alloc> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Vector<T, A>) -> Option<Ordering> {
        search::lexicographical_partial_cmp(self.iter(), other.iter())
    }
}

impl<T: Ord, A: Alloc> Ord for Vector<T, A> {
    fn cmp(&self, other: &Vector<T, A>) -> Ordering {
        search::lexicographical_cmp(self.iter(), other.iter())
    }
}

impl<T, A: Alloc> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        fail::or_oom(self.grow(self.len.saturating_add(lower)));

        for elem in iter {
            self.push_back(elem);
        }
    }
}

impl<T, A: Alloc> FromIterator<T> for Vector<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Vector<T, A> {
        let mut vec = Vector::default();
        vec.extend(iter);

        vec
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Alloc> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let vec = mem::ManuallyDrop::new(self);

        IntoIter {
            ptr: vec.ptr,
            cap: vec.cap,
            // LAST AUDIT: `vec` is never dropped, so the allocator is moved out exactly once.
            alloc: unsafe { ptr::read(&vec.alloc) },
            start: 0,
            end: vec.len,
            _phantom: PhantomData,
        }
    }
}

/// An owning iterator over the elements of a vector.
pub struct IntoIter<T, A: Alloc = PoolAlloc> {
    ptr: Pointer<T>,
    cap: usize,
    alloc: Allocator<T, A>,
    /// The index of the next element from the front.
    start: usize,
    /// One past the index of the next element from the back.
    end: usize,
    _phantom: PhantomData<T>,
}

impl<T, A: Alloc> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            self.start += 1;
            unsafe { Some(ptr::read(self.ptr.get().add(self.start - 1))) }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, A: Alloc> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            self.end -= 1;
            unsafe { Some(ptr::read(self.ptr.get().add(self.end))) }
        }
    }
}

impl<T, A: Alloc> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Alloc> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        unsafe {
            construct::destroy_range(self.ptr.get().add(self.start), self.end - self.start);
            self.alloc.deallocate(self.ptr, self.cap);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::allocator::SystemAlloc;

    #[test]
    fn test_push_pop() {
        let mut vec = Vector::new();
        assert_eq!(vec.capacity(), 0);

        for i in 0..100 {
            vec.push_back(i);
        }
        assert_eq!(vec.len(), 100);
        assert_eq!(vec.capacity(), 128);
        assert_eq!(vec.front(), Some(&0));
        assert_eq!(vec.back(), Some(&99));

        assert_eq!(vec.pop_back(), Some(99));
        assert_eq!(vec.len(), 99);
        vec.clear();
        assert_eq!(vec.pop_back(), None);
        assert_eq!(vec.back(), None);
    }

    #[test]
    fn test_growth() {
        let mut vec = Vector::<u8>::new();
        let mut caps = std::vec::Vec::new();
        for i in 0..20 {
            vec.push_back(i);
            caps.push(vec.capacity());
        }
        assert_eq!(&caps[..6], &[1, 2, 4, 4, 8, 8]);
    }

    #[test]
    fn test_insert_remove() {
        let mut vec: Vector<i32> = (0..5).collect();
        vec.insert(2, 10);
        assert_eq!(vec, [0, 1, 10, 2, 3, 4]);
        vec.insert(6, 11);
        assert_eq!(vec, [0, 1, 10, 2, 3, 4, 11]);

        assert_eq!(vec.remove(0), 0);
        vec.remove_range(1..3);
        assert_eq!(vec, [1, 3, 4, 11]);

        vec.insert_n(1, 3, &7);
        assert_eq!(vec, [1, 7, 7, 7, 3, 4, 11]);

        vec.insert_iter(7, vec![20, 21]);
        vec.insert_iter(0, core::iter::empty());
        assert_eq!(vec, [1, 7, 7, 7, 3, 4, 11, 20, 21]);
    }

    #[test]
    #[should_panic]
    fn test_insert_oob() {
        let mut vec: Vector<i32> = Vector::new();
        vec.insert(1, 0);
    }

    #[test]
    fn test_resize_assign() {
        let mut vec = Vector::<String>::new();
        vec.resize(3, &"x".to_string());
        assert_eq!(vec.len(), 3);
        vec.resize(1, &String::new());
        assert_eq!(vec, ["x".to_string()]);

        vec.assign(2, &"y".to_string());
        assert_eq!(vec, ["y".to_string(), "y".to_string()]);
        vec.assign_iter(vec!["z".to_string()]);
        assert_eq!(vec, ["z".to_string()]);
    }

    #[test]
    fn test_clone_cmp() {
        let a: Vector<i32> = (0..10).collect();
        let b = a.clone();
        assert_eq!(a, b);

        let c: Vector<i32> = (0..9).collect();
        assert!(c < a);
        assert_eq!(a.cmp(&c), Ordering::Greater);
    }

    #[test]
    fn test_into_iter() {
        let vec: Vector<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let mut iter = vec.into_iter();
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next_back().as_deref(), Some("d"));
        assert_eq!(iter.len(), 2);
        // The rest is dropped with the iterator.
    }

    #[test]
    fn test_try_from_fn() {
        let vec: Vector<usize> = Vector::try_from_fn(4, |i| Ok::<_, ()>(i * i)).unwrap();
        assert_eq!(vec, [0, 1, 4, 9]);

        let res: Result<Vector<usize>, _> =
            Vector::try_from_fn(4, |i| if i < 2 { Ok(i) } else { Err("no") });
        assert_eq!(res.unwrap_err(), Error::Construct("no"));
    }

    #[test]
    fn test_zero_sized() {
        let mut vec = Vector::new();
        for _ in 0..1000 {
            vec.push_back(());
        }
        assert_eq!(vec.len(), 1000);
        assert_eq!(vec.capacity(), usize::MAX);
    }

    #[test]
    fn test_system_alloc() {
        let mut vec: Vector<u64, SystemAlloc> = Vector::default();
        vec.extend(0..300);
        assert_eq!(vec.iter().sum::<u64>(), 300 * 299 / 2);
    }
}
