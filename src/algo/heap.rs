//! Binary heap operations.
//!
//! The heaps are max-heaps with respect to the ordering: the greatest element sits at index 0,
//! and every element is not less than its children at `2i + 1` and `2i + 2`.

use crate::functional::{Compare, Less};
use crate::iter::RandomAccess;

/// Move the element at `i` up until its parent is not less than it.
fn sift_up<R, C>(seq: &mut R, mut i: usize, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    while i > 0 {
        let parent = (i - 1) / 2;
        if !cmp.less(seq.at(parent), seq.at(i)) {
            break;
        }

        seq.swap_at(parent, i);
        i = parent;
    }
}

/// Move the element at `i` down until no child within `len` is greater.
fn sift_down<R, C>(seq: &mut R, mut i: usize, len: usize, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    loop {
        let mut child = 2 * i + 1;
        if child >= len {
            break;
        }
        // Take the greater child.
        if child + 1 < len && cmp.less(seq.at(child), seq.at(child + 1)) {
            child += 1;
        }
        if !cmp.less(seq.at(i), seq.at(child)) {
            break;
        }

        seq.swap_at(i, child);
        i = child;
    }
}

pub(crate) fn push_heap_with<R, C>(seq: &mut R, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let len = seq.len();
    if len > 1 {
        sift_up(seq, len - 1, cmp);
    }
}

pub(crate) fn pop_heap_with<R, C>(seq: &mut R, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let len = seq.len();
    if len > 1 {
        seq.swap_at(0, len - 1);
        sift_down(seq, 0, len - 1, cmp);
    }
}

pub(crate) fn make_heap_with<R, C>(seq: &mut R, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let len = seq.len();
    for i in (0..len / 2).rev() {
        sift_down(seq, i, len, cmp);
    }
}

pub(crate) fn sort_heap_with<R, C>(seq: &mut R, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    for end in (1..seq.len()).rev() {
        seq.swap_at(0, end);
        sift_down(seq, 0, end, cmp);
    }
}

/// Push the last element into the heap formed by the others.
pub fn push_heap_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    push_heap_with(seq, &cmp)
}

/// Push the last element into the heap formed by the others.
pub fn push_heap<R>(seq: &mut R)
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    push_heap_with(seq, &Less)
}

/// Move the greatest element to the back, and restore the heap over the others.
pub fn pop_heap_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    pop_heap_with(seq, &cmp)
}

/// Move the greatest element to the back, and restore the heap over the others.
pub fn pop_heap<R>(seq: &mut R)
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    pop_heap_with(seq, &Less)
}

/// Arrange the sequence into a heap.
pub fn make_heap_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    make_heap_with(seq, &cmp)
}

/// Arrange the sequence into a heap.
pub fn make_heap<R>(seq: &mut R)
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    make_heap_with(seq, &Less)
}

/// Sort a heap in ascending order.
pub fn sort_heap_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    sort_heap_with(seq, &cmp)
}

/// Sort a heap in ascending order.
pub fn sort_heap<R>(seq: &mut R)
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    sort_heap_with(seq, &Less)
}

/// The length of the longest prefix that is a heap.
pub fn is_heap_until_by<R, C>(seq: &R, cmp: C) -> usize
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    (1..seq.len())
        .find(|&i| cmp.less(seq.at((i - 1) / 2), seq.at(i)))
        .unwrap_or_else(|| seq.len())
}

/// The length of the longest prefix that is a heap.
pub fn is_heap_until<R>(seq: &R) -> usize
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    is_heap_until_by(seq, Less)
}

/// Is the sequence a heap?
pub fn is_heap_by<R, C>(seq: &R, cmp: C) -> bool
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    is_heap_until_by(seq, cmp) == seq.len()
}

/// Is the sequence a heap?
pub fn is_heap<R>(seq: &R) -> bool
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    is_heap_by(seq, Less)
}
