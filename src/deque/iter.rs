//! Deque positions, cursors and iterators.
//!
//! A position in a deque is a pointer to the element, the bounds of the block holding it, and
//! the map slot of that block. Stepping over a block boundary re-points the bounds through the
//! map ("setting the node"); random access computes the number of blocks crossed and the offset
//! inside the target block.

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::{fmt, mem};

use shim::config;

/// The number of elements in a block of `T`s.
#[inline]
pub(crate) fn buf_size<T>() -> usize {
    config::deque_buf_size(mem::size_of::<T>())
}

/// A raw position inside a deque.
///
/// All the operations are unsafe: the map slots visited must hold live blocks.
pub(crate) struct Position<T> {
    /// The current element.
    pub cur: *mut T,
    /// The start of the current block.
    pub first: *mut T,
    /// One past the end of the current block.
    pub last: *mut T,
    /// The map slot of the current block.
    pub node: *mut *mut T,
}

impl<T> Clone for Position<T> {
    #[inline]
    fn clone(&self) -> Position<T> {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    #[inline]
    fn eq(&self, other: &Position<T>) -> bool {
        self.cur == other.cur
    }
}

impl<T> Position<T> {
    /// Point at `cur`, inside the block of map slot `node`.
    #[inline]
    pub unsafe fn new(cur: *mut T, node: *mut *mut T) -> Position<T> {
        let first = *node;

        Position {
            cur,
            first,
            last: first.add(buf_size::<T>()),
            node,
        }
    }

    /// Move to the block of map slot `node`, leaving `cur` alone.
    #[inline]
    pub unsafe fn set_node(&mut self, node: *mut *mut T) {
        self.node = node;
        self.first = *node;
        self.last = self.first.add(buf_size::<T>());
    }

    /// Step to the next element.
    #[inline]
    pub unsafe fn inc(&mut self) {
        self.cur = self.cur.add(1);
        if self.cur == self.last {
            self.set_node(self.node.add(1));
            self.cur = self.first;
        }
    }

    /// Step to the previous element.
    #[inline]
    pub unsafe fn dec(&mut self) {
        if self.cur == self.first {
            self.set_node(self.node.sub(1));
            self.cur = self.last;
        }
        self.cur = self.cur.sub(1);
    }

    /// The position `n` elements away.
    pub unsafe fn offset(mut self, n: isize) -> Position<T> {
        let buf = buf_size::<T>() as isize;
        let off = n + self.cur.offset_from(self.first);

        if off >= 0 && off < buf {
            self.cur = self.cur.offset(n);
        } else {
            // Round towards negative infinity, so a backwards step lands in the right block.
            let nodes = if off > 0 { off / buf } else { -((-off - 1) / buf) - 1 };
            self.set_node(self.node.offset(nodes));
            self.cur = self.first.offset(off - nodes * buf);
        }

        self
    }

    /// The number of elements from `other` to `self`.
    ///
    /// The blocks are not contiguous, so this counts the whole blocks in between and adds the
    /// partial blocks at both ends.
    #[inline]
    pub unsafe fn diff(&self, other: &Position<T>) -> isize {
        let buf = buf_size::<T>() as isize;

        buf * (self.node.offset_from(other.node) - 1)
            + self.cur.offset_from(self.first)
            + other.last.offset_from(other.cur)
    }

    /// Compare two positions of the same deque.
    #[inline]
    pub fn order(&self, other: &Position<T>) -> Ordering {
        if self.node == other.node {
            self.cur.cmp(&other.cur)
        } else {
            self.node.cmp(&other.node)
        }
    }
}

/// A read-only random access cursor into a deque.
///
/// A cursor is either on an element or at the end. Arithmetic that would leave the deque panics.
pub struct Cursor<'a, T> {
    pub(crate) pos: Position<T>,
    pub(crate) start: Position<T>,
    pub(crate) finish: Position<T>,
    pub(crate) _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    /// Get the element under the cursor, or `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        if self.pos == self.finish {
            None
        } else {
            // LAST AUDIT: everything in `start..finish` is a live element.
            unsafe { Some(&*self.pos.cur) }
        }
    }

    /// The index of the cursor.
    #[inline]
    pub fn index(&self) -> usize {
        unsafe { self.pos.diff(&self.start) as usize }
    }

    /// Is the cursor at the end?
    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos == self.finish
    }

    /// Move the cursor by `n` elements.
    ///
    /// # Panics
    ///
    /// Panics if the target is outside the deque (one past the end is fine).
    pub fn offset(&mut self, n: isize) {
        let len = unsafe { self.finish.diff(&self.start) };
        let target = self.index() as isize + n;
        assert!(
            target >= 0 && target <= len,
            "Cursor moved to {} out of bounds (length is {}).",
            target,
            len
        );

        // LAST AUDIT: the target is within `start..=finish`.
        self.pos = unsafe { self.pos.offset(n) };
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    #[inline]
    fn clone(&self) -> Cursor<'a, T> {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> AddAssign<isize> for Cursor<'a, T> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.offset(n)
    }
}

impl<'a, T> SubAssign<isize> for Cursor<'a, T> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.offset(-n)
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    #[inline]
    fn add(mut self, n: isize) -> Cursor<'a, T> {
        self += n;
        self
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    #[inline]
    fn sub(mut self, n: isize) -> Cursor<'a, T> {
        self -= n;
        self
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Cursor<'a, T>) -> isize {
        assert!(self.start == other.start, "Cursors of different deques.");
        unsafe { self.pos.diff(&other.pos) }
    }
}

impl<'a, T> PartialEq for Cursor<'a, T> {
    #[inline]
    fn eq(&self, other: &Cursor<'a, T>) -> bool {
        self.pos == other.pos
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> PartialOrd for Cursor<'a, T> {
    #[inline]
    fn partial_cmp(&self, other: &Cursor<'a, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, T> Ord for Cursor<'a, T> {
    #[inline]
    fn cmp(&self, other: &Cursor<'a, T>) -> Ordering {
        self.pos.order(&other.pos)
    }
}

impl<'a, T> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cursor").field("index", &self.index()).finish()
    }
}

/// An iterator over the elements of a deque.
pub struct Iter<'a, T> {
    pub(crate) front: Position<T>,
    pub(crate) back: Position<T>,
    pub(crate) len: usize,
    pub(crate) _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            let elem = &*self.front.cur;
            self.front.inc();

            Some(elem)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            self.back.dec();
            Some(&*self.back.cur)
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter { ..*self }
    }
}

/// A mutable iterator over the elements of a deque.
pub struct IterMut<'a, T> {
    pub(crate) front: Position<T>,
    pub(crate) back: Position<T>,
    pub(crate) len: usize,
    pub(crate) _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            let elem = &mut *self.front.cur;
            self.front.inc();

            Some(elem)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            self.back.dec();
            Some(&mut *self.back.cur)
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
