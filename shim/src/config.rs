//! Configuration.
//!
//! This module contains anything which can be tweaked and customized to the users preferences.

use crate::syscalls;

/// The size class granularity of the pool.
///
/// Every small request is rounded up to a multiple of this, and every block the pool hands out
/// is aligned to it.
pub const ALIGN: usize = 8;
/// The largest request served by the pool.
///
/// Anything bigger goes straight to the system allocator.
pub const MAX_BYTES: usize = 128;
/// The number of free lists, one per size class.
pub const NFREELISTS: usize = MAX_BYTES / ALIGN;
/// The number of blocks carved out of the arena whenever a free list runs dry.
pub const NOBJS: usize = 20;

/// The target size of a deque block, in bytes.
pub const DEQUE_BUF_BYTES: usize = 512;
/// The smallest map a deque will allocate.
pub const DEQUE_INITIAL_MAP_SIZE: usize = 8;

/// The number of buckets used by the list merge sorts.
///
/// Bucket `i` holds at most `2^(i + 1)` elements, so this bounds the sortable length by
/// `2^LIST_SORT_BUCKETS`.
pub const LIST_SORT_BUCKETS: usize = 64;

/// Ranges of at most this many elements are insertion sorted.
pub const INSERTION_SORT_THRESHOLD: usize = 32;

/// Round `bytes` up to the next multiple of `ALIGN`.
#[inline]
pub const fn round_up(bytes: usize) -> usize {
    (bytes + ALIGN - 1) & !(ALIGN - 1)
}

/// The free list index serving requests of `bytes` bytes.
///
/// `bytes` must be in `1..=MAX_BYTES`.
#[inline]
pub const fn freelist_index(bytes: usize) -> usize {
    (bytes + ALIGN - 1) / ALIGN - 1
}

/// The extra bytes requested on arena growth.
///
/// This scales with everything ever requested from the system, so a busy pool grows in
/// increasingly larger steps.
#[inline]
pub const fn extra_heap(heap_size: usize) -> usize {
    round_up(heap_size >> 4)
}

/// The number of elements of a deque block for elements of `size` bytes.
///
/// Small elements share a block of `DEQUE_BUF_BYTES`; anything at least that big gets a block of
/// its own.
#[inline]
pub const fn deque_buf_size(size: usize) -> usize {
    if size < DEQUE_BUF_BYTES {
        DEQUE_BUF_BYTES / size
    } else {
        1
    }
}

/// The default OOM handler.
#[cold]
pub fn default_oom_handler() -> ! {
    // Log some message.
    syscalls::log("\x1b[31;1mThe application ran out of memory. Aborting.\x1b[m\n");

    std::process::abort();
}
