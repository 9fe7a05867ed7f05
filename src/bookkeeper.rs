//! Memory bookkeeping.
//!
//! This is the two-level pool. Small requests are rounded up to a size class and served from the
//! class's free list; the free lists are refilled in batches carved out of a bump arena, and the
//! arena is regrown from the system source. Large requests bypass all of this.

use crate::prelude::*;
use crate::sys::Source;

use core::{mem, ptr};

use shim::config::{self, ALIGN, MAX_BYTES, NFREELISTS, NOBJS};

// A free block must be able to hold its own link.
const _: () = assert!(mem::size_of::<Link>() <= ALIGN && mem::align_of::<Link>() <= ALIGN);

/// The link of a free block.
///
/// Free blocks carry this in place of their (dead) contents.
struct Link {
    /// The next free block of the same class, or null.
    next: *mut Link,
}

/// A free list.
///
/// A singly linked stack of free blocks, all of the same size class.
struct FreeList {
    /// The top of the stack.
    head: *mut Link,
    /// The number of blocks on the stack.
    len: usize,
}

impl FreeList {
    /// Create an empty free list.
    const fn new() -> FreeList {
        FreeList {
            head: ptr::null_mut(),
            len: 0,
        }
    }

    /// Push a block onto this free list.
    ///
    /// # Safety
    ///
    /// The block must be owned, aligned to `ALIGN` and at least `ALIGN` bytes big. It must be of
    /// the list's size class.
    #[inline]
    unsafe fn push(&mut self, block: Block) {
        let link = Pointer::from(block).cast::<Link>();
        link.write(Link { next: self.head });

        self.head = *link;
        self.len += 1;
    }

    /// Pop a block from this free list.
    #[inline]
    fn pop(&mut self) -> Option<Pointer<u8>> {
        Pointer::from_raw(self.head).map(|link| {
            // LAST AUDIT: every link on the stack was written by `push`.
            self.head = unsafe { (**link).next };
            self.len -= 1;

            link.cast()
        })
    }
}

/// The memory bookkeeper.
///
/// This is the main component of the memory layer. Its job is to keep track of the free blocks
/// in a structured manner, such that allocation and deallocation of small objects are both O(1)
/// in the common case.
///
/// Guarantees
/// ==========
///
/// 1. Every block on free list `i` is exactly `(i + 1) * ALIGN` bytes.
/// 2. The arena size is always a multiple of `ALIGN`, and the arena never overlaps a block that
///    has been handed out or is on a free list.
/// 3. `heap_size` only ever grows.
pub struct Bookkeeper<S: Source> {
    /// The free lists, one per size class.
    free_lists: [FreeList; NFREELISTS],
    /// The bump arena.
    arena: Block,
    /// The total number of bytes ever acquired for the arena.
    heap_size: usize,
    /// Every chunk acquired for the arena, to be released on drop.
    chunks: Vec<(Pointer<u8>, usize)>,
    /// The system memory source.
    source: S,
}

impl<S: Source> Bookkeeper<S> {
    /// Create a new, empty pool over `source`.
    ///
    /// This will make no allocations.
    pub fn new(source: S) -> Bookkeeper<S> {
        const EMPTY: FreeList = FreeList::new();

        Bookkeeper {
            free_lists: [EMPTY; NFREELISTS],
            arena: Block::empty(Pointer::empty()),
            heap_size: 0,
            chunks: Vec::new(),
            source,
        }
    }

    /// Allocate `bytes` bytes of raw memory.
    ///
    /// The result is aligned to `ALIGN`. Zero-sized requests get a dangling pointer and never
    /// touch the pool.
    pub fn allocate(&mut self, bytes: usize) -> Result<Pointer<u8>, AllocError> {
        if bytes == 0 {
            return Ok(Pointer::empty());
        }

        if bytes > MAX_BYTES {
            log!(DEBUG, "Passing a request of {} bytes to the system.", bytes);

            return self.source.acquire(bytes).map(Pointer::from).ok_or(AllocError);
        }

        match self.free_lists[config::freelist_index(bytes)].pop() {
            Some(ptr) => Ok(ptr),
            None => self.refill(config::round_up(bytes)),
        }
    }

    /// Deallocate `bytes` bytes at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this pool with the same `bytes`, and must not be used
    /// afterwards.
    pub unsafe fn deallocate(&mut self, ptr: Pointer<u8>, bytes: usize) {
        if bytes == 0 {
            return;
        }

        if bytes > MAX_BYTES {
            self.source.release(Block::from_raw_parts(ptr, bytes));
            return;
        }

        #[allow(unused_mut)]
        let mut block = Block::from_raw_parts(ptr, config::round_up(bytes));

        #[cfg(feature = "security")]
        block.zero();

        self.free_lists[config::freelist_index(bytes)].push(block);
    }

    /// Reallocate the buffer at `ptr` from `old` to `new` bytes.
    ///
    /// This deallocates and then allocates. The contents are not carried over.
    ///
    /// # Safety
    ///
    /// See `deallocate`.
    pub unsafe fn reallocate(
        &mut self,
        ptr: Pointer<u8>,
        old: usize,
        new: usize,
    ) -> Result<Pointer<u8>, AllocError> {
        self.deallocate(ptr, old);
        self.allocate(new)
    }

    /// Refill the free list of blocks of `size` bytes, and return one such block.
    ///
    /// `size` must be a size class.
    fn refill(&mut self, size: usize) -> Result<Pointer<u8>, AllocError> {
        let mut nobjs = NOBJS;
        let chunk = self.chunk_alloc(size, &mut nobjs)?;

        log!(INTERNAL, "Refilling the {}-byte free list with {} blocks.", size, nobjs);

        let mut blocks = chunk.chop(size, nobjs);
        // `chunk_alloc` serves at least one block.
        let first = blocks.next().map(Pointer::from).ok_or(AllocError)?;

        let list = &mut self.free_lists[config::freelist_index(size)];
        for block in blocks {
            unsafe {
                // LAST AUDIT: the block was carved out of the arena and is of the list's class.
                list.push(block);
            }
        }

        Ok(first)
    }

    /// Carve up to `nobjs` blocks of `size` bytes out of the arena.
    ///
    /// On return `nobjs` is the number of blocks actually served, which is at least one.
    fn chunk_alloc(&mut self, size: usize, nobjs: &mut usize) -> Result<Block, AllocError> {
        loop {
            let total = size * *nobjs;
            let left = self.arena.size();

            if left >= total {
                return Ok(self.arena.take_front(total));
            }

            if left >= size {
                // Serve as many whole blocks as fit.
                *nobjs = left / size;
                return Ok(self.arena.take_front(size * *nobjs));
            }

            // Not even one block fits. Recycle the leftover before it is lost.
            if left > 0 {
                let leftover = self.arena.pop();
                log!(INTERNAL, "Recycling the arena leftover {:?}.", leftover);

                unsafe {
                    // LAST AUDIT: arena sizes are multiples of `ALIGN`, and `left < size`.
                    self.free_lists[config::freelist_index(left)].push(leftover);
                }
            }

            let get = 2 * total + config::extra_heap(self.heap_size);
            match self.source.acquire(get) {
                Some(block) => {
                    self.heap_size += get;
                    log!(NOTE, "Grew the arena by {} bytes (heap size is now {}).", get, self.heap_size);

                    self.chunks.push((block.ptr(), block.size()));
                    self.arena = block;
                }
                None => {
                    log!(WARNING, "The system refused {} bytes, scavenging the free lists.", get);

                    self.arena = self.scavenge(size).ok_or_else(|| {
                        log!(ERROR, "The pool is exhausted.");
                        AllocError
                    })?;
                }
            }
        }
    }

    /// Take a free block of at least `size` bytes, to be used as a new arena.
    fn scavenge(&mut self, size: usize) -> Option<Block> {
        (size..=MAX_BYTES).step_by(ALIGN).find_map(|class| {
            self.free_lists[config::freelist_index(class)].pop().map(|ptr| {
                log!(DEBUG, "Reusing a free {}-byte block as the arena.", class);

                // LAST AUDIT: the block was on the free list of its class.
                unsafe { Block::from_raw_parts(ptr, class) }
            })
        })
    }

    /// The total number of bytes ever acquired for the arena.
    #[inline]
    pub fn heap_size(&self) -> usize {
        self.heap_size
    }

    /// The number of bytes left in the arena.
    #[inline]
    pub fn arena_size(&self) -> usize {
        self.arena.size()
    }

    /// The number of free blocks of size class `class` (in `0..NFREELISTS`).
    #[inline]
    pub fn free_blocks(&self, class: usize) -> usize {
        self.free_lists[class].len
    }
}

impl<S: Source + Default> Default for Bookkeeper<S> {
    fn default() -> Bookkeeper<S> {
        Bookkeeper::new(S::default())
    }
}

impl<S: Source> Drop for Bookkeeper<S> {
    fn drop(&mut self) {
        log!(DEBUG, "Releasing {} chunks.", self.chunks.len());

        for (ptr, size) in self.chunks.drain(..) {
            unsafe {
                // LAST AUDIT: every chunk was acquired from this source with this size.
                self.source.release(Block::from_raw_parts(ptr, size));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::sys::Malloc;

    /// A source which refuses everything after `budget` acquisitions.
    struct Limited {
        budget: usize,
    }

    impl Source for Limited {
        fn acquire(&mut self, size: usize) -> Option<Block> {
            if self.budget == 0 {
                return None;
            }
            self.budget -= 1;

            Malloc.acquire(size)
        }

        unsafe fn release(&mut self, block: Block) {
            Malloc.release(block)
        }
    }

    #[test]
    fn test_reuse() {
        let mut bk = Bookkeeper::new(Malloc);

        unsafe {
            let a = bk.allocate(13).unwrap();
            bk.deallocate(a, 13);
            // 13 and 16 share a class.
            let b = bk.allocate(16).unwrap();
            assert_eq!(a, b);
            bk.deallocate(b, 16);
        }
    }

    #[test]
    fn test_refill() {
        let mut bk = Bookkeeper::new(Malloc);

        let ptr = bk.allocate(32).unwrap();
        assert!(ptr.aligned_to(ALIGN));
        // One block handed out, the rest of the batch on the list.
        assert_eq!(bk.free_blocks(3), NOBJS - 1);
        // Twice the batch was acquired; the other half is the arena.
        assert_eq!(bk.heap_size(), 2 * 32 * NOBJS);
        assert_eq!(bk.arena_size(), 32 * NOBJS);

        unsafe {
            bk.deallocate(ptr, 32);
        }
        assert_eq!(bk.free_blocks(3), NOBJS);
    }

    #[test]
    fn test_partial_batch() {
        let mut bk = Bookkeeper::new(Malloc);

        // Leaves an arena of 8 * 20 bytes.
        let _a = bk.allocate(8).unwrap();
        assert_eq!(bk.arena_size(), 160);

        // Only one 128-byte block fits.
        let _b = bk.allocate(128).unwrap();
        assert_eq!(bk.free_blocks(NFREELISTS - 1), 0);
        assert_eq!(bk.arena_size(), 32);
    }

    #[test]
    fn test_leftover_recycling() {
        let mut bk = Bookkeeper::new(Malloc);

        let _a = bk.allocate(8).unwrap();
        let _b = bk.allocate(128).unwrap();
        // 32 bytes left, too little for 64. They end up on the 32-byte list.
        let before = bk.free_blocks(3);
        let _c = bk.allocate(64).unwrap();
        assert_eq!(bk.free_blocks(3), before + 1);

        let heap = 2 * 8 * NOBJS + 2 * 64 * NOBJS + config::extra_heap(2 * 8 * NOBJS);
        assert_eq!(bk.heap_size(), heap);
    }

    #[test]
    fn test_large_bypass() {
        let mut bk = Bookkeeper::new(Malloc);

        let ptr = bk.allocate(4096).unwrap();
        assert_eq!(bk.heap_size(), 0);

        unsafe {
            bk.deallocate(ptr, 4096);
        }
    }

    #[test]
    fn test_zero() {
        let mut bk = Bookkeeper::new(Malloc);

        let ptr = bk.allocate(0).unwrap();
        assert_eq!(ptr, Pointer::empty());
        assert_eq!(bk.heap_size(), 0);

        unsafe {
            bk.deallocate(ptr, 0);
        }
    }

    #[test]
    fn test_scavenge() {
        let mut bk = Bookkeeper::new(Limited { budget: 1 });

        let a = bk.allocate(128).unwrap();
        // Drain the arena through a class below the one we will ask for.
        while bk.arena_size() > 0 {
            let _ = bk.allocate(8).unwrap();
        }
        unsafe {
            bk.deallocate(a, 128);
        }
        let spare = bk.free_blocks(NFREELISTS - 1);
        assert_eq!(spare, NOBJS);

        // The source is dry, so a 128-byte block is cut up instead.
        let _ = bk.allocate(48).unwrap();
        assert_eq!(bk.free_blocks(NFREELISTS - 1), spare - 1);
    }

    #[test]
    fn test_exhaustion() {
        let mut bk = Bookkeeper::new(Limited { budget: 0 });

        assert_eq!(bk.allocate(8), Err(AllocError));
        assert_eq!(bk.allocate(1000), Err(AllocError));
    }

    #[test]
    fn test_reallocate() {
        let mut bk = Bookkeeper::new(Malloc);

        unsafe {
            let a = bk.allocate(24).unwrap();
            let b = bk.reallocate(a, 24, 24).unwrap();
            assert_eq!(a, b);
            let c = bk.reallocate(b, 24, 200).unwrap();
            bk.deallocate(c, 200);
        }
    }
}
