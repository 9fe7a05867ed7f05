use tinystl::algo::{self, heap, search};
use tinystl::iter;
use tinystl::{Deque, Greater, Vector};

use std::cmp::Ordering;

fn scramble(n: usize, mut seed: u64) -> Vector<u64> {
    (0..n)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            seed >> 40
        })
        .collect()
}

#[test]
fn sort_like_std() {
    for &n in [0, 1, 2, 15, 16, 17, 100, 1000, 20_000].iter() {
        let mut ours = scramble(n, n as u64);
        let mut theirs: Vec<u64> = ours.iter().cloned().collect();

        algo::sort(&mut ours);
        theirs.sort();
        assert!(ours.iter().eq(theirs.iter()), "Mismatch at length {}.", n);
    }
}

#[test]
fn sort_patterns() {
    // Sorted, reversed, organ pipe, and all equal.
    let mut inputs: Vec<Vector<i32>> = Vec::new();
    inputs.push((0..5000).collect());
    inputs.push((0..5000).rev().collect());
    inputs.push((0..2500).chain((0..2500).rev()).collect());
    inputs.push(Vector::<_>::from_elem(5000, &7));

    for mut seq in inputs {
        let mut expected: Vec<i32> = seq.iter().cloned().collect();
        expected.sort();

        algo::sort(&mut seq);
        assert!(seq.iter().eq(expected.iter()));

        algo::sort_by(&mut seq, Greater);
        assert!(algo::is_sorted_by(&seq, Greater));
    }
}

#[test]
fn sort_subranges() {
    let mut deque: Deque<u64> = scramble(3000, 99).into_iter().collect();

    algo::sort(&mut iter::span(&mut deque, 1000..2000));
    assert!(algo::is_sorted(&iter::span(&mut deque, 1000..2000)));
    assert!(!algo::is_sorted(&deque));

    let mut small = [5u64, 3, 9, 1, 7];
    algo::insertion_sort_by(&mut small[..], |a: &u64, b: &u64| a > b);
    assert_eq!(small, [9, 7, 5, 3, 1]);
}

#[test]
fn partitioning() {
    let mut seq: Vector<u32> = (0..100).collect();

    let evens = algo::partition(&mut seq, |x| x % 2 == 0);
    assert_eq!(evens, 50);
    assert!(algo::is_partitioned(&seq, |x| x % 2 == 0));
    assert!(seq.as_slice()[..50].iter().all(|x| x % 2 == 0));
    assert!(algo::is_permutation(&seq, &(0..100).collect::<Vector<u32>>()));
}

#[test]
fn heap_ops() {
    let mut heap_seq: Vector<u64> = Vector::new();

    for x in scramble(500, 3).into_iter() {
        heap_seq.push_back(x);
        heap::push_heap(&mut heap_seq);
        assert!(algo::is_heap(&heap_seq));
    }

    let mut popped = Vec::new();
    while !heap_seq.is_empty() {
        heap::pop_heap(&mut heap_seq);
        popped.push(heap_seq.pop_back().unwrap());
    }
    // Largest first.
    assert!(popped.windows(2).all(|w| w[0] >= w[1]));

    let mut min_heap: Deque<i32> = (0..200).map(|i| (i * 71) % 200).collect();
    heap::make_heap_by(&mut min_heap, Greater);
    assert!(heap::is_heap_by(&min_heap, Greater));
    assert_eq!(min_heap[0], 0);
    heap::sort_heap_by(&mut min_heap, Greater);
    assert!(min_heap.iter().cloned().eq((0..200).rev()));

    let almost: &[i32] = &[9, 5, 8, 1, 2, 10];
    assert_eq!(heap::is_heap_until(almost), 5);
}

#[test]
fn searching() {
    let seq: Vector<i32> = [1, 2, 2, 2, 5, 8, 8, 13].iter().cloned().collect();

    assert_eq!(algo::lower_bound(&seq, &2), 1);
    assert_eq!(algo::upper_bound(&seq, &2), 4);
    assert_eq!(algo::equal_range(&seq, &8), 5..7);
    assert_eq!(algo::equal_range(&seq, &6), 5..5);
    assert_eq!(algo::lower_bound(&seq, &100), seq.len());
    assert!(algo::binary_search(&seq, &13));
    assert!(!algo::binary_search(&seq, &0));

    let desc: &[i32] = &[9, 7, 7, 3];
    assert_eq!(algo::lower_bound_by(desc, &7, Greater), 1);
    assert_eq!(algo::upper_bound_by(desc, &7, Greater), 3);

    let needle: &[i32] = &[2, 5, 8];
    assert_eq!(search::search(&seq, needle), Some(3));
    assert_eq!(search::search(&seq, &[8, 5][..]), None);
    assert_eq!(algo::adjacent_find(seq.iter()), Some(1));
    assert_eq!(algo::adjacent_find([1, 2, 3].iter()), None);
}

#[test]
fn comparing() {
    let a: Vector<u8> = (0..5).collect();
    let b: Deque<u8> = (0..6).collect();

    assert!(algo::equal(a.iter(), b.iter()));
    assert!(!algo::equal(b.iter(), a.iter()));
    assert!(algo::lexicographical_compare(a.iter(), b.iter()));
    assert_eq!(algo::lexicographical_cmp(a.iter(), b.iter()), Ordering::Less);
    assert_eq!(
        algo::lexicographical_partial_cmp([1.0, f64::NAN].iter(), [1.0, 2.0].iter()),
        None
    );

    assert!(algo::is_permutation(&[1, 2, 3, 3][..], &[3, 1, 3, 2][..]));
    assert!(!algo::is_permutation(&[1, 2, 3, 3][..], &[3, 1, 2, 2][..]));
}

#[test]
fn copying() {
    let src: Vector<char> = "abc".chars().collect();
    let mut dst: Deque<char> = Deque::from_elem(6, &'-');

    assert_eq!(iter::copy(&src, &mut dst, 2), 5);
    assert!(dst.iter().cloned().eq("--abc-".chars()));

    // Overlapping move to the right.
    iter::copy_backward(&mut dst, 2..5, 6);
    assert!(dst.iter().cloned().eq("--aabc".chars()));

    iter::fill_n(&mut dst, 0, 2, &'x');
    assert_eq!(dst[1], 'x');
    iter::fill(&mut iter::span(&mut dst, 4..6), &'y');
    assert!(dst.iter().cloned().eq("xxaayy".chars()));

    assert_eq!(iter::distance(dst.iter()), 6);
    assert_eq!(iter::distance(dst.iter().filter(|&&c| c == 'a')), 2);

    let mut it = src.iter();
    assert_eq!(iter::advance(&mut it, 5), 3);
}
