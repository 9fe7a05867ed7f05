//! Iterator and sequence substrate.
//!
//! Forward traversal is plain `Iterator`. Random access is the `RandomAccess` capability trait,
//! which is what the sorting, heap and binary search algorithms are written against. Slices,
//! `Vector` and `Deque` all have it, and `Span` restricts any of them to a subrange.

use core::ops::Range;

/// Indexed access to a sequence.
pub trait RandomAccess {
    /// The element type.
    type Item;

    /// The number of elements.
    fn len(&self) -> usize;

    /// Get the element at `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    fn at(&self, i: usize) -> &Self::Item;

    /// Get the element at `i` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    fn at_mut(&mut self, i: usize) -> &mut Self::Item;

    /// Swap the elements at `i` and `j`.
    fn swap_at(&mut self, i: usize, j: usize);

    /// Is the sequence empty?
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> RandomAccess for [T] {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
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
        self.swap(i, j)
    }
}

/// A subrange of a random access sequence.
pub struct Span<'a, R: ?Sized> {
    /// The underlying sequence.
    seq: &'a mut R,
    /// The first index of the span in `seq`.
    start: usize,
    /// The number of elements in the span.
    len: usize,
}

/// Restrict `seq` to `range`.
///
/// # Panics
///
/// Panics if the range is out of bounds or decreasing.
pub fn span<R: RandomAccess + ?Sized>(seq: &mut R, range: Range<usize>) -> Span<R> {
    assert!(
        range.start <= range.end && range.end <= seq.len(),
        "Span {:?} out of bounds (length is {}).",
        range,
        seq.len()
    );

    Span {
        seq,
        start: range.start,
        len: range.end - range.start,
    }
}

impl<'a, R: RandomAccess + ?Sized> Span<'a, R> {
    /// Map a span index to an index of the underlying sequence.
    #[inline]
    fn index(&self, i: usize) -> usize {
        assert!(i < self.len, "Index {} out of bounds (span length is {}).", i, self.len);
        self.start + i
    }
}

impl<'a, R: RandomAccess + ?Sized> RandomAccess for Span<'a, R> {
    type Item = R::Item;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn at(&self, i: usize) -> &R::Item {
        self.seq.at(self.index(i))
    }

    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut R::Item {
        let i = self.index(i);
        self.seq.at_mut(i)
    }

    #[inline]
    fn swap_at(&mut self, i: usize, j: usize) {
        let (i, j) = (self.index(i), self.index(j));
        self.seq.swap_at(i, j)
    }
}

/// The number of elements of `iter`.
///
/// This is O(1) when the iterator knows its exact length, and a walk otherwise.
pub fn distance<I: IntoIterator>(iter: I) -> usize {
    let iter = iter.into_iter();

    match iter.size_hint() {
        (lo, Some(hi)) if lo == hi => lo,
        _ => iter.count(),
    }
}

/// Step `iter` forward by `n` elements.
///
/// Returns the number of steps actually taken, which is less than `n` only if the iterator ran
/// out.
pub fn advance<I: Iterator>(iter: &mut I, n: usize) -> usize {
    let mut taken = 0;
    while taken < n && iter.next().is_some() {
        taken += 1;
    }

    taken
}

/// Clone the elements of `src` into `dst`, starting at index `at` of `dst`.
///
/// Returns the index one past the last written element.
///
/// # Panics
///
/// Panics if `dst` is too short.
pub fn copy<S, D>(src: &S, dst: &mut D, at: usize) -> usize
where
    S: RandomAccess + ?Sized,
    D: RandomAccess<Item = S::Item> + ?Sized,
    S::Item: Clone,
{
    for i in 0..src.len() {
        dst.at_mut(at + i).clone_from(src.at(i));
    }

    at + src.len()
}

/// Clone the elements in `src` to the range ending at `dst_end`, inside the same sequence.
///
/// The elements are copied back to front, so this is correct for overlapping ranges where the
/// destination lies after the source.
pub fn copy_backward<R>(seq: &mut R, src: Range<usize>, dst_end: usize)
where
    R: RandomAccess + ?Sized,
    R::Item: Clone,
{
    let n = src.end - src.start;
    for k in 1..=n {
        let x = seq.at(src.end - k).clone();
        *seq.at_mut(dst_end - k) = x;
    }
}

/// Assign `value` to every element.
pub fn fill<R>(seq: &mut R, value: &R::Item)
where
    R: RandomAccess + ?Sized,
    R::Item: Clone,
{
    let n = seq.len();
    fill_n(seq, 0, n, value)
}

/// Assign `value` to the `n` elements starting at `at`.
pub fn fill_n<R>(seq: &mut R, at: usize, n: usize, value: &R::Item)
where
    R: RandomAccess + ?Sized,
    R::Item: Clone,
{
    for i in at..at + n {
        seq.at_mut(i).clone_from(value);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_span() {
        let mut arr = [0, 1, 2, 3, 4, 5];
        {
            let mut s = span(&mut arr[..], 2..5);
            assert_eq!(s.len(), 3);
            assert_eq!(*s.at(0), 2);
            s.swap_at(0, 2);
            *s.at_mut(1) = 9;
        }
        assert_eq!(arr, [0, 1, 4, 9, 2, 5]);
    }

    #[test]
    #[should_panic]
    fn test_span_oob() {
        let mut arr = [0, 1, 2];
        let s = span(&mut arr[..], 1..3);
        s.at(2);
    }

    #[test]
    fn test_distance_advance() {
        assert_eq!(distance(&[1, 2, 3]), 3);
        assert_eq!(distance((0..10).filter(|x| x % 3 == 0)), 4);

        let mut it = 0..5;
        assert_eq!(advance(&mut it, 2), 2);
        assert_eq!(it.next(), Some(2));
        assert_eq!(advance(&mut it, 10), 2);
    }

    #[test]
    fn test_copy_fill() {
        let src = [7, 8];
        let mut dst = [0; 5];
        assert_eq!(copy(&src[..], &mut dst[..], 2), 4);
        assert_eq!(dst, [0, 0, 7, 8, 0]);

        copy_backward(&mut dst[..], 1..4, 5);
        assert_eq!(dst, [0, 0, 0, 7, 8]);

        fill_n(&mut dst[..], 0, 2, &3);
        assert_eq!(dst, [3, 3, 0, 7, 8]);
        fill(&mut dst[..], &1);
        assert_eq!(dst, [1; 5]);
    }
}
