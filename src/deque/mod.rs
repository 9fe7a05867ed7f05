//! The double-ended queue.
//!
//! A deque stores its elements in fixed-size blocks, and keeps the addresses of the blocks in
//! order in a "map". The live part of the map sits in the middle, leaving spare slots at both
//! ends, so that growing at either end usually only costs a block allocation. When one end of the
//! map runs out of slots, the live window is either slid back to the middle, or moved to a bigger
//! map. Only block addresses are ever copied by this; elements never move because of map growth.
//!
//! There is always at least one block, and the block of `finish` always has a free slot at
//! `finish.cur`.

mod iter;

pub use self::iter::{Cursor, Iter, IterMut};

use self::iter::{buf_size, Position};

use crate::algo::search;
use crate::allocator::{Alloc, Allocator, PoolAlloc};
use crate::construct;
use crate::fail::{self, Error};
use crate::iter::RandomAccess;
use crate::prelude::*;
use crate::vector::Vector;

use core::cmp::{self, Ordering};
use core::convert::Infallible;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut, Range};
use core::{fmt, mem, ptr};

use shim::config;

/// A double-ended queue with random access.
///
/// Pushing and popping at either end is O(1), inserting or removing in the middle moves the
/// shorter side.
pub struct Deque<T, A: Alloc = PoolAlloc> {
    /// The map of blocks.
    map: Pointer<*mut T>,
    /// The number of slots of the map.
    map_size: usize,
    /// The first element.
    start: Position<T>,
    /// One past the last element.
    finish: Position<T>,
    /// The allocator of the blocks.
    alloc: Allocator<T, A>,
    /// The allocator of the map.
    map_alloc: Allocator<*mut T, A>,
    /// This owns `T`s.
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send, A: Alloc + Send> Send for Deque<T, A> {}
unsafe impl<T: Sync, A: Alloc + Sync> Sync for Deque<T, A> {}

impl<T> Deque<T> {
    /// Create a new empty deque.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[inline]
    pub fn new() -> Deque<T> {
        Deque::new_in(PoolAlloc)
    }
}

impl<T, A: Alloc> Deque<T, A> {
    /// Create a new empty deque using `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Deque<T, A> {
        fail::or_oom(Deque::try_new_in(alloc))
    }

    /// Create a new empty deque using `alloc`.
    ///
    /// This allocates the map and one block.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn try_new_in(alloc: A) -> Result<Deque<T, A>, AllocError> {
        assert!(mem::size_of::<T>() != 0, "Deques of zero-sized types are not supported.");

        let alloc: Allocator<T, A> = Allocator::with(alloc);
        let map_alloc = Allocator::with(alloc.inner().clone());
        let map_size = config::DEQUE_INITIAL_MAP_SIZE;

        let map = Deque::<T, A>::allocate_map(&map_alloc, map_size)?;
        let block = match alloc.allocate(buf_size::<T>()) {
            Ok(block) => block,
            Err(err) => {
                unsafe { map_alloc.deallocate(map, map_size) };
                return Err(err);
            }
        };

        unsafe {
            // Center the single block, leaving room at both ends.
            let node = map.get().add((map_size - 1) / 2);
            *node = *block;
            let start = Position::new(*block, node);

            Ok(Deque {
                map,
                map_size,
                start,
                finish: start,
                alloc,
                map_alloc,
                _phantom: PhantomData,
            })
        }
    }

    /// Create a deque of `n` clones of `value`.
    pub fn from_elem(n: usize, value: &T) -> Deque<T, A>
    where
        T: Clone,
    {
        let mut deque = Deque::new_in(A::default());
        fail::or_oom(deque.fill_back_clones(n, value));

        deque
    }

    /// Create a deque of `n` elements produced by `f(0)`, `f(1)`, ...
    ///
    /// If storage cannot be allocated or `f` fails, nothing is leaked and the error is returned.
    pub fn try_from_fn<E, F>(n: usize, f: F) -> Result<Deque<T, A>, Error<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut deque = Deque::try_new_in(A::default())?;
        deque.try_fill_back(n, f)?;

        Ok(deque)
    }

    /// Allocate a map of `size` empty slots.
    fn allocate_map(map_alloc: &Allocator<*mut T, A>, size: usize) -> Result<Pointer<*mut T>, AllocError> {
        let map = map_alloc.allocate(size)?;
        unsafe {
            for i in 0..size {
                map.get().add(i).write(ptr::null_mut());
            }
        }

        Ok(map)
    }

    /// Allocate an element block.
    #[inline]
    fn allocate_node(&self) -> Result<*mut T, AllocError> {
        Ok(*self.alloc.allocate(buf_size::<T>())?)
    }

    /// Free the blocks in the map slots `from..to`.
    unsafe fn release_nodes(&self, from: *mut *mut T, to: *mut *mut T) {
        let mut node = from;
        while node < to {
            self.alloc.deallocate(Pointer::new(*node), buf_size::<T>());
            node = node.add(1);
        }
    }

    /// Move the live window of the map so that `nodes` more blocks fit at one end.
    ///
    /// If the map is less than half full, the window is recentered in place. Otherwise the block
    /// addresses are moved to a new map of `map_size + max(map_size, nodes) + 2` slots.
    fn reallocate_map(&mut self, nodes: usize, at_front: bool) -> Result<(), AllocError> {
        unsafe {
            let old_nodes = self.finish.node.offset_from(self.start.node) as usize + 1;
            let new_nodes = old_nodes.checked_add(nodes).ok_or(AllocError)?;
            let skew = if at_front { nodes } else { 0 };

            let new_start = if self.map_size > new_nodes.saturating_mul(2) {
                log!(DEBUG, "Sliding the deque map window ({} of {} slots).", new_nodes, self.map_size);

                let new_start = self.map.get().add((self.map_size - new_nodes) / 2 + skew);
                // The windows may overlap.
                ptr::copy(self.start.node, new_start, old_nodes);

                new_start
            } else {
                let new_size = self
                    .map_size
                    .checked_add(cmp::max(self.map_size, nodes))
                    .and_then(|x| x.checked_add(2))
                    .ok_or(AllocError)?;
                log!(DEBUG, "Reallocating the deque map from {} to {} slots.", self.map_size, new_size);

                let new_map = Deque::<T, A>::allocate_map(&self.map_alloc, new_size)?;
                let new_start = new_map.get().add((new_size - new_nodes) / 2 + skew);
                ptr::copy_nonoverlapping(self.start.node, new_start, old_nodes);
                self.map_alloc.deallocate(self.map, self.map_size);

                self.map = new_map;
                self.map_size = new_size;

                new_start
            };

            self.start.set_node(new_start);
            self.finish.set_node(new_start.add(old_nodes - 1));
        }

        Ok(())
    }

    /// Make sure there are map slots for `nodes` more blocks after the last one.
    fn reserve_map_at_back(&mut self, nodes: usize) -> Result<(), AllocError> {
        let used = unsafe { self.finish.node.offset_from(self.map.get()) as usize };
        if nodes + 1 > self.map_size - used {
            self.reallocate_map(nodes, false)
        } else {
            Ok(())
        }
    }

    /// Make sure there are map slots for `nodes` more blocks before the first one.
    fn reserve_map_at_front(&mut self, nodes: usize) -> Result<(), AllocError> {
        let spare = unsafe { self.start.node.offset_from(self.map.get()) as usize };
        if nodes > spare {
            self.reallocate_map(nodes, true)
        } else {
            Ok(())
        }
    }

    /// The number of blocks needed for `n` elements.
    #[inline]
    fn nodes_for(n: usize) -> usize {
        let buf = buf_size::<T>();
        n / buf + (n % buf != 0) as usize
    }

    /// Allocate the blocks for `n` more elements before the first block.
    fn new_elements_at_front(&mut self, n: usize) -> Result<(), AllocError> {
        let nodes = Deque::<T, A>::nodes_for(n);
        self.reserve_map_at_front(nodes)?;

        for i in 1..=nodes {
            match self.allocate_node() {
                Ok(block) => unsafe { *self.start.node.sub(i) = block },
                Err(err) => {
                    unsafe { self.release_nodes(self.start.node.sub(i - 1), self.start.node) };
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Allocate the blocks for `n` more elements after the last block.
    fn new_elements_at_back(&mut self, n: usize) -> Result<(), AllocError> {
        let nodes = Deque::<T, A>::nodes_for(n);
        self.reserve_map_at_back(nodes)?;

        for i in 1..=nodes {
            match self.allocate_node() {
                Ok(block) => unsafe { *self.finish.node.add(i) = block },
                Err(err) => {
                    unsafe { self.release_nodes(self.finish.node.add(1), self.finish.node.add(i)) };
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Make room for `n` elements before the first, returning the future start.
    ///
    /// The new blocks belong to the deque only once `start` is moved there.
    fn reserve_elements_at_front(&mut self, n: usize) -> Result<Position<T>, AllocError> {
        let vacancies = unsafe { self.start.cur.offset_from(self.start.first) as usize };
        if n > vacancies {
            self.new_elements_at_front(n - vacancies)?;
        }

        Ok(unsafe { self.start.offset(-(n as isize)) })
    }

    /// Make room for `n` elements after the last, returning the future finish.
    ///
    /// The new blocks belong to the deque only once `finish` is moved there.
    fn reserve_elements_at_back(&mut self, n: usize) -> Result<Position<T>, AllocError> {
        let vacancies = unsafe { self.finish.last.offset_from(self.finish.cur) as usize - 1 };
        if n > vacancies {
            self.new_elements_at_back(n - vacancies)?;
        }

        Ok(unsafe { self.finish.offset(n as isize) })
    }

    /// Move `n` elements from `src` to `dst`, first to last.
    ///
    /// `dst` must not be after `src`.
    unsafe fn move_forward(mut src: Position<T>, mut dst: Position<T>, n: usize) {
        for _ in 0..n {
            ptr::copy_nonoverlapping(src.cur, dst.cur, 1);
            src.inc();
            dst.inc();
        }
    }

    /// Move the `n` elements ending at `src_end` to end at `dst_end`, last to first.
    ///
    /// `dst_end` must not be before `src_end`.
    unsafe fn move_backward(mut src_end: Position<T>, mut dst_end: Position<T>, n: usize) {
        for _ in 0..n {
            src_end.dec();
            dst_end.dec();
            ptr::copy_nonoverlapping(src_end.cur, dst_end.cur, 1);
        }
    }

    /// Drop the elements in `from..to`.
    unsafe fn destroy_range(mut from: Position<T>, to: Position<T>) {
        if mem::needs_drop::<T>() {
            while from != to {
                construct::destroy(from.cur);
                from.inc();
            }
        }
    }

    /// Give up the first `n` (vacated) slots, freeing the blocks left behind.
    unsafe fn release_front(&mut self, n: usize) {
        let new_start = self.start.offset(n as isize);
        self.release_nodes(self.start.node, new_start.node);
        self.start = new_start;
    }

    /// Give up the last `n` (vacated) slots, freeing the blocks left behind.
    unsafe fn release_back(&mut self, n: usize) {
        let new_finish = self.finish.offset(-(n as isize));
        self.release_nodes(new_finish.node.add(1), self.finish.node.add(1));
        self.finish = new_finish;
    }

    /// The position of the element at `i`.
    #[inline]
    fn position(&self, i: usize) -> Position<T> {
        debug_assert!(i <= self.len(), "Position out of bounds.");
        unsafe { self.start.offset(i as isize) }
    }

    /// Get the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        unsafe { self.finish.diff(&self.start) as usize }
    }

    /// Is this deque empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.finish
    }

    /// Get the element at `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        if i < self.len() {
            unsafe { Some(&*self.position(i).cur) }
        } else {
            None
        }
    }

    /// Get the element at `i` mutably.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i < self.len() {
            unsafe { Some(&mut *self.position(i).cur) }
        } else {
            None
        }
    }

    /// Get the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Get the first element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Get the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Get the last element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len() {
            0 => None,
            len => self.get_mut(len - 1),
        }
    }

    /// Push an element to the back.
    ///
    /// If a new block cannot be allocated, `elem` is handed back along with the error.
    pub fn try_push_back(&mut self, elem: T) -> Result<(), (T, AllocError)> {
        unsafe {
            if self.finish.cur != self.finish.last.sub(1) {
                construct::construct(self.finish.cur, elem);
                self.finish.cur = self.finish.cur.add(1);
            } else {
                // The last free slot of the block: the next block must exist before `finish`
                // can step into it.
                let block = match self.reserve_map_at_back(1).and_then(|()| self.allocate_node()) {
                    Ok(block) => block,
                    Err(err) => return Err((elem, err)),
                };

                *self.finish.node.add(1) = block;
                construct::construct(self.finish.cur, elem);
                self.finish.set_node(self.finish.node.add(1));
                self.finish.cur = self.finish.first;
            }
        }

        Ok(())
    }

    /// Push an element to the back.
    #[inline]
    pub fn push_back(&mut self, elem: T) {
        if self.try_push_back(elem).is_err() {
            fail::oom();
        }
    }

    /// Push an element to the front.
    ///
    /// If a new block cannot be allocated, `elem` is handed back along with the error.
    pub fn try_push_front(&mut self, elem: T) -> Result<(), (T, AllocError)> {
        unsafe {
            if self.start.cur != self.start.first {
                self.start.cur = self.start.cur.sub(1);
                construct::construct(self.start.cur, elem);
            } else {
                let block = match self.reserve_map_at_front(1).and_then(|()| self.allocate_node()) {
                    Ok(block) => block,
                    Err(err) => return Err((elem, err)),
                };

                *self.start.node.sub(1) = block;
                self.start.set_node(self.start.node.sub(1));
                self.start.cur = self.start.last.sub(1);
                construct::construct(self.start.cur, elem);
            }
        }

        Ok(())
    }

    /// Push an element to the front.
    #[inline]
    pub fn push_front(&mut self, elem: T) {
        if self.try_push_front(elem).is_err() {
            fail::oom();
        }
    }

    /// Remove the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        unsafe {
            if self.finish.cur == self.finish.first {
                // The block of `finish` has no elements left.
                self.alloc.deallocate(Pointer::new(self.finish.first), buf_size::<T>());
                self.finish.set_node(self.finish.node.sub(1));
                self.finish.cur = self.finish.last;
            }
            self.finish.cur = self.finish.cur.sub(1);

            Some(ptr::read(self.finish.cur))
        }
    }

    /// Remove the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        unsafe {
            let elem = ptr::read(self.start.cur);
            if self.start.cur == self.start.last.sub(1) {
                self.alloc.deallocate(Pointer::new(self.start.first), buf_size::<T>());
                self.start.set_node(self.start.node.add(1));
                self.start.cur = self.start.first;
            } else {
                self.start.cur = self.start.cur.add(1);
            }

            Some(elem)
        }
    }

    /// Move `n` elements from `src` into a new gap at `at`.
    ///
    /// On error nothing has moved and `src` still owns its elements.
    unsafe fn insert_raw(&mut self, at: usize, src: *const T, n: usize) -> Result<(), AllocError> {
        let len = self.len();
        debug_assert!(at <= len, "Insertion out of bounds.");

        let mut gap = if at < len / 2 {
            let new_start = self.reserve_elements_at_front(n)?;
            Deque::<T, A>::move_forward(self.start, new_start, at);
            self.start = new_start;

            new_start.offset(at as isize)
        } else {
            let new_finish = self.reserve_elements_at_back(n)?;
            let gap = self.start.offset(at as isize);
            Deque::<T, A>::move_backward(self.finish, new_finish, len - at);
            self.finish = new_finish;

            gap
        };

        for i in 0..n {
            ptr::copy_nonoverlapping(src.add(i), gap.cur, 1);
            gap.inc();
        }

        Ok(())
    }

    /// Move the contents of `items` into the deque at `at`.
    fn insert_vector(&mut self, at: usize, mut items: Vector<T, A>) -> Result<(), AllocError> {
        if items.is_empty() {
            return Ok(());
        }

        unsafe {
            self.insert_raw(at, items.as_ptr(), items.len())?;
            items.set_len(0);
        }

        Ok(())
    }

    /// Insert `elem` at index `at`.
    ///
    /// Whichever of the elements before or after `at` are fewer are moved.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    pub fn try_insert(&mut self, at: usize, elem: T) -> Result<(), AllocError> {
        let len = self.len();
        assert!(at <= len, "Insertion index {} out of bounds (length is {}).", at, len);

        unsafe { self.insert_raw(at, &elem, 1)? };
        mem::forget(elem);

        Ok(())
    }

    /// Insert `elem` at index `at`.
    #[inline]
    pub fn insert(&mut self, at: usize, elem: T) {
        fail::or_oom(self.try_insert(at, elem))
    }

    /// Insert `n` clones of `value` at index `at`.
    ///
    /// The clones are made before the deque is touched, so a panicking clone leaves it as it was.
    pub fn try_insert_n(&mut self, at: usize, n: usize, value: &T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let len = self.len();
        assert!(at <= len, "Insertion index {} out of bounds (length is {}).", at, len);

        let mut items = Vector::new_in(self.alloc.inner().clone());
        items.try_reserve(n)?;
        items.resize(n, value);

        self.insert_vector(at, items)
    }

    /// Insert `n` clones of `value` at index `at`.
    #[inline]
    pub fn insert_n(&mut self, at: usize, n: usize, value: &T)
    where
        T: Clone,
    {
        fail::or_oom(self.try_insert_n(at, n, value))
    }

    /// Insert the elements of `iter` at index `at`, in order.
    pub fn insert_iter<I>(&mut self, at: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        assert!(at <= len, "Insertion index {} out of bounds (length is {}).", at, len);

        let mut items = Vector::new_in(self.alloc.inner().clone());
        items.extend(iter);

        fail::or_oom(self.insert_vector(at, items))
    }

    /// Remove and return the element at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`.
    pub fn remove(&mut self, at: usize) -> T {
        let len = self.len();
        assert!(at < len, "Removal index {} out of bounds (length is {}).", at, len);

        unsafe {
            let pos = self.position(at);
            let elem = ptr::read(pos.cur);

            if at < len / 2 {
                Deque::<T, A>::move_backward(pos, pos.offset(1), at);
                self.release_front(1);
            } else {
                Deque::<T, A>::move_forward(pos.offset(1), pos, len - at - 1);
                self.release_back(1);
            }

            elem
        }
    }

    /// Remove the elements in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let len = self.len();
        let Range { start, end } = range;
        assert!(start <= end && end <= len, "Range {}..{} out of bounds.", start, end);

        let n = end - start;
        if n == 0 {
            return;
        }
        if n == len {
            self.clear();
            return;
        }

        unsafe {
            let first = self.position(start);
            let last = self.position(end);
            Deque::<T, A>::destroy_range(first, last);

            if start < (len - n) / 2 {
                Deque::<T, A>::move_backward(first, last, start);
                self.release_front(n);
            } else {
                Deque::<T, A>::move_forward(last, first, len - end);
                self.release_back(n);
            }
        }
    }

    /// Shorten the deque to `len` elements, dropping the rest.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        let old = self.len();
        if len < old {
            self.remove_range(len..old);
        }
    }

    /// Drop every element.
    ///
    /// Every block but the first is freed.
    pub fn clear(&mut self) {
        unsafe {
            Deque::<T, A>::destroy_range(self.start, self.finish);
            self.release_nodes(self.start.node.add(1), self.finish.node.add(1));
        }

        self.start.cur = self.start.first;
        self.finish = self.start;
    }

    /// Append `n` elements produced by `f(0)`, `f(1)`, ...
    ///
    /// If `f` fails, the elements produced so far stay and the unused blocks are freed.
    fn try_fill_back<E, F>(&mut self, n: usize, mut f: F) -> Result<(), Error<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let new_finish = self.reserve_elements_at_back(n)?;
        let guard = FillGuard {
            last_node: new_finish.node,
            deque: self,
        };

        for i in 0..n {
            let elem = f(i).map_err(Error::Construct)?;
            unsafe {
                construct::construct(guard.deque.finish.cur, elem);
                guard.deque.finish.inc();
            }
        }
        mem::forget(guard);

        Ok(())
    }

    /// Append `n` clones of `value`.
    fn fill_back_clones(&mut self, n: usize, value: &T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.try_fill_back(n, |_| Ok::<T, Infallible>(value.clone())).map_err(|err| match err {
            Error::Alloc(err) => err,
            Error::Construct(never) => match never {},
        })
    }

    /// Resize to `len` elements, cloning `value` into any new slots.
    pub fn resize(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        let old = self.len();
        if len > old {
            fail::or_oom(self.fill_back_clones(len - old, value));
        } else {
            self.truncate(len);
        }
    }

    /// Replace the contents with `n` clones of `value`.
    pub fn assign(&mut self, n: usize, value: &T)
    where
        T: Clone,
    {
        self.clear();
        self.resize(n, value);
    }

    /// Replace the contents with the elements of `iter`.
    pub fn assign_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Swap the contents of two deques.
    #[inline]
    pub fn swap(&mut self, other: &mut Deque<T, A>) {
        mem::swap(self, other);
    }

    /// Iterate over the elements.
    #[inline]
    pub fn iter(&self) -> Iter<T> {
        Iter {
            front: self.start,
            back: self.finish,
            len: self.len(),
            _marker: PhantomData,
        }
    }

    /// Iterate mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<T> {
        IterMut {
            front: self.start,
            back: self.finish,
            len: self.len(),
            _marker: PhantomData,
        }
    }

    /// Get a cursor at index `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    pub fn cursor(&self, at: usize) -> Cursor<T> {
        let len = self.len();
        assert!(at <= len, "Cursor index {} out of bounds (length is {}).", at, len);

        Cursor {
            pos: self.position(at),
            start: self.start,
            finish: self.finish,
            _marker: PhantomData,
        }
    }

    /// Get a cursor at the first element.
    #[inline]
    pub fn begin(&self) -> Cursor<T> {
        self.cursor(0)
    }

    /// Get a cursor past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<T> {
        self.cursor(self.len())
    }
}

/// Blocks reserved at the back of a deque while it is being filled.
///
/// Dropping it frees those that the filling did not reach.
struct FillGuard<'a, T, A: Alloc> {
    deque: &'a mut Deque<T, A>,
    /// The map slot of the last reserved block.
    last_node: *mut *mut T,
}

impl<'a, T, A: Alloc> Drop for FillGuard<'a, T, A> {
    fn drop(&mut self) {
        log!(DEBUG, "Filling a deque stopped early.");

        unsafe {
            self.deque.release_nodes(self.deque.finish.node.add(1), self.last_node.add(1));
        }
    }
}

impl<T, A: Alloc> Drop for Deque<T, A> {
    fn drop(&mut self) {
        unsafe {
            Deque::<T, A>::destroy_range(self.start, self.finish);
            self.release_nodes(self.start.node, self.finish.node.add(1));
            self.map_alloc.deallocate(self.map, self.map_size);
        }
    }
}

impl<T, A: Alloc> Index<usize> for Deque<T, A> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        let len = self.len();
        assert!(i < len, "Index {} out of bounds (length is {}).", i, len);

        unsafe { &*self.position(i).cur }
    }
}

impl<T, A: Alloc> IndexMut<usize> for Deque<T, A> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        let len = self.len();
        assert!(i < len, "Index {} out of bounds (length is {}).", i, len);

        unsafe { &mut *self.position(i).cur }
    }
}

impl<T, A: Alloc> RandomAccess for Deque<T, A> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        Deque::len(self)
    }

    #[inline]
    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn swap_at(&mut self, i: usize, j: usize) {
        let len = self.len();
        assert!(i < len && j < len, "Swap of {} and {} out of bounds (length is {}).", i, j, len);

        unsafe {
            ptr::swap(self.position(i).cur, self.position(j).cur);
        }
    }
}

impl<T, A: Alloc> Default for Deque<T, A> {
    fn default() -> Deque<T, A> {
        Deque::new_in(A::default())
    }
}

impl<T: Clone, A: Alloc> Clone for Deque<T, A> {
    fn clone(&self) -> Deque<T, A> {
        let mut deque = Deque::new_in(self.alloc.inner().clone());
        deque.extend(self.iter().cloned());

        deque
    }
}

impl<T: fmt::Debug, A: Alloc> fmt::Debug for Deque<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Alloc> PartialEq for Deque<T, A> {
    fn eq(&self, other: &Deque<T, A>) -> bool {
        self.len() == other.len() && search::equal(self.iter(), other.iter())
    }
}

impl<T: PartialEq, A: Alloc, const N: usize> PartialEq<[T; N]> for Deque<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.len() == N && search::equal(self.iter(), other.iter())
    }
}

impl<T: Eq, A: Alloc> Eq for Deque<T, A> {}

impl<T: PartialOrd, A: Alloc> PartialOrd for Deque<T, A> {
    fn partial_cmp(&self, other: &Deque<T, A>) -> Option<Ordering> {
        search::lexicographical_partial_cmp(self.iter(), other.iter())
    }
}

impl<T: Ord, A: Alloc> Ord for Deque<T, A> {
    fn cmp(&self, other: &Deque<T, A>) -> Ordering {
        search::lexicographical_cmp(self.iter(), other.iter())
    }
}

impl<T, A: Alloc> Extend<T> for Deque<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

impl<T, A: Alloc> FromIterator<T> for Deque<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Deque<T, A> {
        let mut deque = Deque::default();
        deque.extend(iter);

        deque
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a Deque<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a mut Deque<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Alloc> IntoIterator for Deque<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { deque: self }
    }
}

/// An owning iterator over the elements of a deque.
pub struct IntoIter<T, A: Alloc = PoolAlloc> {
    deque: Deque<T, A>,
}

impl<T, A: Alloc> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T, A: Alloc> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T, A: Alloc> ExactSizeIterator for IntoIter<T, A> {}
