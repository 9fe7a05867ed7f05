//! Raw memory blocks.
//!
//! A block is an owned range of bytes: a start pointer and a size. The pool moves memory around
//! as blocks, from the source to the arena, and from the arena onto the free lists.

use crate::prelude::*;

use core::{fmt, mem};

/// An owned, contiguous range of bytes.
///
/// No two live blocks overlap. The bytes are valid for reads and writes, but need not be
/// initialized.
pub struct Block {
    /// The first byte.
    ptr: Pointer<u8>,
    /// The number of bytes.
    size: usize,
}

impl Block {
    /// Make a block out of a pointer and a size.
    ///
    /// # Safety
    ///
    /// The caller must own the `size` bytes starting at `ptr`, and hand that ownership over.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: Pointer<u8>, size: usize) -> Block {
        Block { ptr, size }
    }

    /// An empty block at `ptr`.
    #[inline]
    pub const fn empty(ptr: Pointer<u8>) -> Block {
        Block { ptr, size: 0 }
    }

    /// The size in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The start of the block.
    #[inline]
    pub fn ptr(&self) -> Pointer<u8> {
        self.ptr
    }

    /// Does the block start at a multiple of `align`?
    #[inline]
    pub fn aligned_to(&self, align: usize) -> bool {
        self.ptr.aligned_to(align)
    }

    /// Overwrite every byte with zero, so freed contents cannot be read back.
    #[cfg(feature = "security")]
    pub fn zero(&mut self) {
        unsafe {
            // LAST AUDIT: the block owns `size` bytes.
            core::ptr::write_bytes(self.ptr.get(), 0, self.size);
        }
    }

    /// Take the whole block, leaving an empty one at its end.
    #[inline]
    pub fn pop(&mut self) -> Block {
        let end = unsafe { self.ptr.offset(self.size as isize) };
        mem::replace(self, Block::empty(end))
    }

    /// Cut the first `size` bytes off the block.
    ///
    /// # Panics
    ///
    /// Panics if the block holds fewer than `size` bytes.
    #[inline]
    pub fn take_front(&mut self, size: usize) -> Block {
        assert!(size <= self.size, "Cannot take {} bytes off {:?}.", size, self);

        let front = Block { ptr: self.ptr, size };
        self.ptr = unsafe { self.ptr.offset(size as isize) };
        self.size -= size;

        front
    }

    /// Cut the block into `n` adjacent blocks of `size` bytes each, giving up any remainder.
    ///
    /// # Panics
    ///
    /// Panics if the block holds fewer than `n * size` bytes.
    pub fn chop(self, size: usize, n: usize) -> impl Iterator<Item = Block> {
        assert!(size * n <= self.size, "Cannot chop {} blocks of {} bytes off {:?}.", n, size, self);

        let start = self.ptr;
        (0..n).map(move |i| Block {
            ptr: unsafe { start.offset((i * size) as isize) },
            size,
        })
    }
}

impl From<Block> for Pointer<u8> {
    #[inline]
    fn from(block: Block) -> Pointer<u8> {
        block.ptr
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}[0x{:x}]", *self.ptr as usize, self.size)
    }
}
