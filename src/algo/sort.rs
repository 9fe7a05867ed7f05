//! Sorting and partitioning.

use crate::algo::heap;
use crate::functional::{Compare, Less};
use crate::iter::{span, RandomAccess};

use shim::config::INSERTION_SORT_THRESHOLD;

/// Insertion sort the range `lo..hi`.
fn insertion_sort_range<R, C>(seq: &mut R, lo: usize, hi: usize, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    for i in lo + 1..hi {
        let mut j = i;
        while j > lo && cmp.less(seq.at(j), seq.at(j - 1)) {
            seq.swap_at(j, j - 1);
            j -= 1;
        }
    }
}

/// Partition `lo..hi` (at least three elements) around a median of three.
///
/// Returns the final index of the pivot. Everything left of it is not greater, and everything
/// right of it is not less.
fn partition_median3<R, C>(seq: &mut R, lo: usize, hi: usize, cmp: &C) -> usize
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let last = hi - 1;
    let mid = lo + (last - lo) / 2;

    // Order the three samples.
    if cmp.less(seq.at(mid), seq.at(lo)) {
        seq.swap_at(mid, lo);
    }
    if cmp.less(seq.at(last), seq.at(lo)) {
        seq.swap_at(last, lo);
    }
    if cmp.less(seq.at(last), seq.at(mid)) {
        seq.swap_at(last, mid);
    }

    // Park the pivot next to the end. `lo` and `last` now act as sentinels for the scans.
    let pivot = last - 1;
    seq.swap_at(mid, pivot);

    let mut i = lo;
    let mut j = pivot;
    loop {
        loop {
            i += 1;
            if !cmp.less(seq.at(i), seq.at(pivot)) {
                break;
            }
        }
        loop {
            j -= 1;
            if !cmp.less(seq.at(pivot), seq.at(j)) {
                break;
            }
        }

        if i >= j {
            break;
        }
        seq.swap_at(i, j);
    }

    seq.swap_at(i, pivot);
    i
}

/// The introsort loop over `lo..hi`.
///
/// `budget` shrinks by a quarter on every partitioning step; once it is spent the range is heap
/// sorted instead, which bounds the worst case by O(n log n).
fn introsort<R, C>(seq: &mut R, mut lo: usize, mut hi: usize, mut budget: usize, cmp: &C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    while hi - lo > INSERTION_SORT_THRESHOLD {
        if budget == 0 {
            let mut sub = span(seq, lo..hi);
            heap::make_heap_with(&mut sub, cmp);
            heap::sort_heap_with(&mut sub, cmp);
            return;
        }
        budget = (budget >> 1) + (budget >> 2);

        let p = partition_median3(seq, lo, hi, cmp);

        // Recurse into the smaller half, loop on the bigger one.
        if p - lo < hi - p {
            introsort(seq, lo, p, budget, cmp);
            lo = p + 1;
        } else {
            introsort(seq, p + 1, hi, budget, cmp);
            hi = p;
        }
    }

    insertion_sort_range(seq, lo, hi, cmp);
}

/// Sort the sequence with an ordering.
///
/// This is an introspective sort: a median-of-three quicksort that falls back to heap sort when
/// partitioning degenerates, and finishes short ranges by insertion sort. It is not stable.
pub fn sort_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let len = seq.len();
    if len > 1 {
        introsort(seq, 0, len, len, &cmp);
    }
}

/// Sort the sequence in ascending order.
pub fn sort<R>(seq: &mut R)
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    sort_by(seq, Less)
}

/// Sort the sequence by insertion.
///
/// This is stable, and quadratic.
pub fn insertion_sort_by<R, C>(seq: &mut R, cmp: C)
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let len = seq.len();
    insertion_sort_range(seq, 0, len, &cmp);
}

/// Move the elements satisfying `pred` in front of the others.
///
/// Returns the number of elements satisfying `pred`. The relative order is not preserved.
pub fn partition<R, P>(seq: &mut R, mut pred: P) -> usize
where
    R: RandomAccess + ?Sized,
    P: FnMut(&R::Item) -> bool,
{
    let mut lo = 0;
    let mut hi = seq.len();

    loop {
        while lo < hi && pred(seq.at(lo)) {
            lo += 1;
        }
        while lo < hi && !pred(seq.at(hi - 1)) {
            hi -= 1;
        }
        if lo >= hi {
            return lo;
        }

        seq.swap_at(lo, hi - 1);
        lo += 1;
        hi -= 1;
    }
}

/// Do all elements satisfying `pred` precede all others?
pub fn is_partitioned<R, P>(seq: &R, mut pred: P) -> bool
where
    R: RandomAccess + ?Sized,
    P: FnMut(&R::Item) -> bool,
{
    let len = seq.len();
    let first_false = (0..len).find(|&i| !pred(seq.at(i))).unwrap_or(len);

    (first_false..len).all(|i| !pred(seq.at(i)))
}

/// Is the sequence sorted with respect to an ordering?
pub fn is_sorted_by<R, C>(seq: &R, cmp: C) -> bool
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    (1..seq.len()).all(|i| !cmp.less(seq.at(i), seq.at(i - 1)))
}

/// Is the sequence sorted in ascending order?
pub fn is_sorted<R>(seq: &R) -> bool
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    is_sorted_by(seq, Less)
}
