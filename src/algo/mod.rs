//! Generic algorithms.
//!
//! Everything here works on any `RandomAccess` sequence or plain iterator, and takes its ordering
//! as a `Compare` policy. The functions without a `_by` suffix use `Less`.

pub mod heap;
pub mod search;
pub mod sort;

pub use self::heap::{
    is_heap, is_heap_by, is_heap_until, is_heap_until_by, make_heap, make_heap_by, pop_heap,
    pop_heap_by, push_heap, push_heap_by, sort_heap, sort_heap_by,
};
pub use self::search::{
    adjacent_find, binary_search, binary_search_by, equal, equal_range, equal_range_by,
    is_permutation, lexicographical_cmp, lexicographical_compare, lexicographical_partial_cmp,
    lower_bound, lower_bound_by, search, upper_bound, upper_bound_by,
};
pub use self::sort::{
    insertion_sort_by, is_partitioned, is_sorted, is_sorted_by, partition, sort, sort_by,
};
