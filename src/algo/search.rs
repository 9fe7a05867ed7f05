//! Searching and comparing.

use core::cmp::Ordering;
use core::ops::Range;

use crate::functional::{Compare, Less};
use crate::iter::RandomAccess;

/// The first index whose element is not ordered before `value`.
///
/// The sequence must be partitioned with respect to `cmp.less(_, value)`.
pub fn lower_bound_by<R, C>(seq: &R, value: &R::Item, cmp: C) -> usize
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let (mut lo, mut len) = (0, seq.len());

    while len > 0 {
        let half = len / 2;
        let mid = lo + half;
        if cmp.less(seq.at(mid), value) {
            lo = mid + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    lo
}

/// The first index whose element is not less than `value`.
pub fn lower_bound<R>(seq: &R, value: &R::Item) -> usize
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    lower_bound_by(seq, value, Less)
}

/// The first index whose element is ordered after `value`.
pub fn upper_bound_by<R, C>(seq: &R, value: &R::Item, cmp: C) -> usize
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let (mut lo, mut len) = (0, seq.len());

    while len > 0 {
        let half = len / 2;
        let mid = lo + half;
        if cmp.less(value, seq.at(mid)) {
            len = half;
        } else {
            lo = mid + 1;
            len -= half + 1;
        }
    }

    lo
}

/// The first index whose element is greater than `value`.
pub fn upper_bound<R>(seq: &R, value: &R::Item) -> usize
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    upper_bound_by(seq, value, Less)
}

/// The range of elements equivalent to `value`.
pub fn equal_range_by<R, C>(seq: &R, value: &R::Item, cmp: C) -> Range<usize>
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let lo = lower_bound_by(seq, value, &|a: &R::Item, b: &R::Item| cmp.less(a, b));
    let hi = upper_bound_by(seq, value, &|a: &R::Item, b: &R::Item| cmp.less(a, b));

    lo..hi
}

/// The range of elements equal to `value`.
pub fn equal_range<R>(seq: &R, value: &R::Item) -> Range<usize>
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    equal_range_by(seq, value, Less)
}

/// Does the sorted sequence contain an element equivalent to `value`?
pub fn binary_search_by<R, C>(seq: &R, value: &R::Item, cmp: C) -> bool
where
    R: RandomAccess + ?Sized,
    C: Compare<R::Item>,
{
    let i = lower_bound_by(seq, value, &|a: &R::Item, b: &R::Item| cmp.less(a, b));

    i < seq.len() && !cmp.less(value, seq.at(i))
}

/// Does the sorted sequence contain `value`?
pub fn binary_search<R>(seq: &R, value: &R::Item) -> bool
where
    R: RandomAccess + ?Sized,
    R::Item: PartialOrd,
{
    binary_search_by(seq, value, Less)
}

/// The first index at which `needle` occurs in `hay`.
///
/// An empty needle occurs at 0.
pub fn search<R, N>(hay: &R, needle: &N) -> Option<usize>
where
    R: RandomAccess + ?Sized,
    N: RandomAccess<Item = R::Item> + ?Sized,
    R::Item: PartialEq,
{
    let (h, n) = (hay.len(), needle.len());
    if n > h {
        return None;
    }

    (0..=h - n).find(|&start| (0..n).all(|k| hay.at(start + k) == needle.at(k)))
}

/// The index of the first element equal to its successor.
pub fn adjacent_find<I>(iter: I) -> Option<usize>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    let mut iter = iter.into_iter();
    let mut prev = iter.next()?;

    for (n, x) in iter.enumerate() {
        if prev == x {
            return Some(n);
        }
        prev = x;
    }

    None
}

/// Is every element of `a` equal to the element at the same position of `b`?
///
/// `b` may be longer than `a`; it may not be shorter.
pub fn equal<A, B>(a: A, b: B) -> bool
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialEq<B::Item>,
{
    let mut b = b.into_iter();

    a.into_iter().all(|x| b.next().map_or(false, |y| x == y))
}

/// Is `a` lexicographically less than `b`?
pub fn lexicographical_compare<A, B>(a: A, b: B) -> bool
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialOrd<B::Item>,
{
    let mut b = b.into_iter();

    for x in a {
        match b.next() {
            None => return false,
            Some(y) => match x.partial_cmp(&y) {
                Some(Ordering::Equal) => {}
                Some(Ordering::Less) => return true,
                _ => return false,
            },
        }
    }

    // `a` is a prefix of `b`.
    b.next().is_some()
}

/// Compare `a` and `b` lexicographically.
pub fn lexicographical_cmp<A, B>(a: A, b: B) -> Ordering
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    A::Item: Ord,
{
    let mut b = b.into_iter();

    for x in a {
        match b.next() {
            None => return Ordering::Greater,
            Some(y) => match x.cmp(&y) {
                Ordering::Equal => {}
                ord => return ord,
            },
        }
    }

    if b.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Compare `a` and `b` lexicographically, if every pair of elements is comparable.
pub fn lexicographical_partial_cmp<A, B>(a: A, b: B) -> Option<Ordering>
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialOrd<B::Item>,
{
    let mut b = b.into_iter();

    for x in a {
        match b.next() {
            None => return Some(Ordering::Greater),
            Some(y) => match x.partial_cmp(&y) {
                Some(Ordering::Equal) => {}
                ord => return ord,
            },
        }
    }

    Some(if b.next().is_some() { Ordering::Less } else { Ordering::Equal })
}

/// Is `b` a rearrangement of `a`?
pub fn is_permutation<R, S>(a: &R, b: &S) -> bool
where
    R: RandomAccess + ?Sized,
    S: RandomAccess<Item = R::Item> + ?Sized,
    R::Item: PartialEq,
{
    if a.len() != b.len() {
        return false;
    }

    (0..a.len()).all(|i| {
        let x = a.at(i);
        // Count every distinct value once, at its first occurrence.
        if (0..i).any(|j| a.at(j) == x) {
            return true;
        }

        let in_a = (i..a.len()).filter(|&j| a.at(j) == x).count();
        let in_b = (0..b.len()).filter(|&j| b.at(j) == x).count();
        in_a == in_b
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bounds() {
        let arr = [1, 2, 2, 2, 5, 8];
        assert_eq!(lower_bound(&arr[..], &2), 1);
        assert_eq!(upper_bound(&arr[..], &2), 4);
        assert_eq!(equal_range(&arr[..], &2), 1..4);
        assert_eq!(equal_range(&arr[..], &3), 4..4);
        assert_eq!(lower_bound(&arr[..], &0), 0);
        assert_eq!(upper_bound(&arr[..], &9), 6);

        assert!(binary_search(&arr[..], &5));
        assert!(!binary_search(&arr[..], &4));
        assert!(!binary_search(&arr[..], &9));
    }

    #[test]
    fn test_bounds_by() {
        let arr = [9, 7, 7, 3];
        let desc = |a: &i32, b: &i32| a > b;
        assert_eq!(lower_bound_by(&arr[..], &7, desc), 1);
        assert_eq!(upper_bound_by(&arr[..], &7, desc), 3);
        assert!(binary_search_by(&arr[..], &3, desc));
    }

    #[test]
    fn test_search() {
        let hay = [1, 2, 3, 1, 2, 4];
        assert_eq!(search(&hay[..], &[1, 2, 4][..]), Some(3));
        assert_eq!(search(&hay[..], &[2, 2][..]), None);
        assert_eq!(search(&hay[..], &[][..]), Some(0));
        assert_eq!(search(&[1][..], &[1, 2][..]), None);
    }

    #[test]
    fn test_adjacent_equal() {
        assert_eq!(adjacent_find(&[1, 2, 3, 3, 4]), Some(2));
        assert_eq!(adjacent_find(&[1, 2, 3]), None);
        assert_eq!(adjacent_find(Vec::<i32>::new()), None);

        assert!(equal(&[1, 2], &[1, 2, 3]));
        assert!(!equal(&[1, 2, 3], &[1, 2]));
    }

    #[test]
    fn test_lexicographical() {
        assert!(lexicographical_compare(&[1, 2], &[1, 3]));
        assert!(lexicographical_compare(&[1, 2], &[1, 2, 0]));
        assert!(!lexicographical_compare(&[1, 2], &[1, 2]));
        assert_eq!(lexicographical_cmp(&[2], &[1, 9]), Ordering::Greater);
        assert_eq!(lexicographical_cmp(&[1, 2], &[1, 2]), Ordering::Equal);
        assert_eq!(lexicographical_partial_cmp(&[1.0], &[f64::NAN]), None);
    }

    #[test]
    fn test_permutation() {
        assert!(is_permutation(&[1, 2, 2, 3][..], &[2, 3, 1, 2][..]));
        assert!(!is_permutation(&[1, 2, 2, 3][..], &[2, 3, 1, 1][..]));
        assert!(!is_permutation(&[1][..], &[1, 1][..]));
    }
}
