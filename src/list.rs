//! The doubly linked list.
//!
//! The nodes form a ring through a sentinel link, which is both the position before the first
//! element and the position after the last. An empty list is a sentinel pointing to itself. The
//! sentinel lives in the pool rather than inside the list, so moving a list does not break the
//! ring.

use crate::algo::search;
use crate::allocator::{Alloc, Allocator, PoolAlloc};
use crate::fail;
use crate::functional::{Compare, Less};
use crate::prelude::*;

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::Range;
use core::{fmt, mem, ptr};

use shim::config;

/// The links of a node.
struct Link {
    next: *mut Link,
    prev: *mut Link,
}

impl Link {
    const DANGLING: Link = Link {
        next: ptr::null_mut(),
        prev: ptr::null_mut(),
    };

    /// Make `link` an empty ring.
    #[inline]
    unsafe fn init(link: *mut Link) {
        (*link).next = link;
        (*link).prev = link;
    }
}

/// A node: its links, then the value.
#[repr(C)]
struct Node<T> {
    link: Link,
    value: T,
}

/// Get the value of the node behind `link`.
///
/// `link` must not be a sentinel.
#[inline]
unsafe fn value<'a, T>(link: *mut Link) -> &'a mut T {
    &mut (*(link as *mut Node<T>)).value
}

/// Get the value of the node behind `link`, for reading.
///
/// Read-only paths use this rather than `value`.
#[inline]
unsafe fn value_ref<'a, T>(link: *const Link) -> &'a T {
    &(*(link as *const Node<T>)).value
}

/// Move the nodes `first..last` in front of `pos`.
///
/// The range may come from another ring, but `pos` must not be inside it.
unsafe fn transfer(pos: *mut Link, first: *mut Link, last: *mut Link) {
    if pos == last || first == last {
        return;
    }

    let last_prev = (*last).prev;
    let first_prev = (*first).prev;
    let pos_prev = (*pos).prev;

    (*last_prev).next = pos;
    (*first_prev).next = last;
    (*pos_prev).next = first;

    (*pos).prev = last_prev;
    (*last).prev = first_prev;
    (*first).prev = pos_prev;
}

/// Move the whole ring of `from` in front of `pos`.
///
/// With `pos` a sentinel, that is to the end of its ring.
#[inline]
unsafe fn splice_all(pos: *mut Link, from: *mut Link) {
    transfer(pos, (*from).next, from);
}

/// Exchange the nodes of two rings.
unsafe fn swap_rings(a: *mut Link, b: *mut Link) {
    let mut tmp = Link::DANGLING;
    let tmp: *mut Link = &mut tmp;
    Link::init(tmp);

    splice_all(tmp, a);
    splice_all(a, b);
    splice_all(b, tmp);
}

/// Merge the sorted ring `from` into the sorted ring `into`.
///
/// On ties the node of `into` goes first, so merging is stable.
unsafe fn merge_rings<T, C: Compare<T>>(into: *mut Link, from: *mut Link, cmp: &C) {
    let mut first1 = (*into).next;
    let mut first2 = (*from).next;

    while first1 != into && first2 != from {
        if cmp.less(value_ref::<T>(first2), value_ref::<T>(first1)) {
            let next = (*first2).next;
            transfer(first1, first2, next);
            first2 = next;
        } else {
            first1 = (*first1).next;
        }
    }

    if first2 != from {
        transfer(into, first2, from);
    }
}

/// The scratch rings of the bucket merge sort.
///
/// Dropping it puts every node it still holds back into the list, so a panicking comparison
/// leaves the list whole (if not sorted).
struct SortBuckets {
    head: *mut Link,
    carry: Link,
    counter: [Link; config::LIST_SORT_BUCKETS],
}

impl Drop for SortBuckets {
    fn drop(&mut self) {
        unsafe {
            splice_all(self.head, &mut self.carry);
            for bucket in self.counter.iter_mut() {
                splice_all(self.head, bucket);
            }
        }
    }
}

/// A doubly linked list.
pub struct List<T, A: Alloc = PoolAlloc> {
    /// The sentinel.
    head: Pointer<Link>,
    /// The number of elements.
    len: usize,
    /// The allocator of the nodes.
    alloc: Allocator<Node<T>, A>,
    /// The allocator of the sentinel.
    head_alloc: Allocator<Link, A>,
    /// This owns `T`s.
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send, A: Alloc + Send> Send for List<T, A> {}
unsafe impl<T: Sync, A: Alloc + Sync> Sync for List<T, A> {}

impl<T> List<T> {
    /// Create a new empty list.
    #[inline]
    pub fn new() -> List<T> {
        List::new_in(PoolAlloc)
    }
}

impl<T, A: Alloc> List<T, A> {
    /// Create a new empty list using `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> List<T, A> {
        fail::or_oom(List::try_new_in(alloc))
    }

    /// Create a new empty list using `alloc`.
    ///
    /// This allocates the sentinel.
    pub fn try_new_in(alloc: A) -> Result<List<T, A>, AllocError> {
        let head_alloc: Allocator<Link, A> = Allocator::with(alloc.clone());
        let head = head_alloc.allocate_one()?;
        unsafe { Link::init(head.get()) };

        Ok(List {
            head,
            len: 0,
            alloc: Allocator::with(alloc),
            head_alloc,
            _phantom: PhantomData,
        })
    }

    /// Create a list of `n` clones of `value`.
    pub fn from_elem(n: usize, value: &T) -> List<T, A>
    where
        T: Clone,
    {
        let mut list = List::default();
        list.resize(n, value);

        list
    }

    #[inline]
    fn ghost(&self) -> *mut Link {
        self.head.get()
    }

    /// Allocate a node holding `value`.
    ///
    /// If that fails, `value` is handed back.
    fn create_node(&self, value: T) -> Result<*mut Link, (T, AllocError)> {
        match self.alloc.allocate_one() {
            Ok(node) => unsafe {
                node.get().write(Node {
                    link: Link::DANGLING,
                    value,
                });

                Ok(node.get() as *mut Link)
            },
            Err(err) => Err((value, err)),
        }
    }

    /// Free an unlinked node, returning its value.
    unsafe fn destroy_node(&self, link: *mut Link) -> T {
        let node = link as *mut Node<T>;
        let value = ptr::read(&(*node).value);
        self.alloc.deallocate_one(Pointer::new(node));

        value
    }

    /// Link a new node holding `value` in front of `pos`.
    fn try_link_before(&mut self, pos: *mut Link, value: T) -> Result<(), (T, AllocError)> {
        let node = self.create_node(value)?;
        unsafe {
            let prev = (*pos).prev;
            (*node).next = pos;
            (*node).prev = prev;
            (*prev).next = node;
            (*pos).prev = node;
        }
        self.len += 1;

        Ok(())
    }

    /// Unlink `node` and free it, returning its value.
    unsafe fn unlink(&mut self, node: *mut Link) -> T {
        debug_assert!(node != self.ghost(), "Unlinking the sentinel.");

        (*(*node).prev).next = (*node).next;
        (*(*node).next).prev = (*node).prev;
        self.len -= 1;

        self.destroy_node(node)
    }

    /// The link of the element at `at`, or the sentinel if `at == len`.
    fn link_at(&self, at: usize) -> *mut Link {
        assert!(at <= self.len, "Index {} out of bounds (length is {}).", at, self.len);

        let ghost = self.ghost();
        unsafe {
            // Walk from the nearer end.
            if at <= self.len / 2 {
                let mut link = (*ghost).next;
                for _ in 0..at {
                    link = (*link).next;
                }
                link
            } else {
                let mut link = ghost;
                for _ in at..self.len {
                    link = (*link).prev;
                }
                link
            }
        }
    }

    /// Get the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this list empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Get the first element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.iter_mut().next()
    }

    /// Get the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Get the last element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.iter_mut().next_back()
    }

    /// Push an element to the back.
    ///
    /// If the node cannot be allocated, `value` is handed back along with the error.
    #[inline]
    pub fn try_push_back(&mut self, value: T) -> Result<(), (T, AllocError)> {
        let ghost = self.ghost();
        self.try_link_before(ghost, value)
    }

    /// Push an element to the back.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        if self.try_push_back(value).is_err() {
            fail::oom();
        }
    }

    /// Push an element to the front.
    ///
    /// If the node cannot be allocated, `value` is handed back along with the error.
    #[inline]
    pub fn try_push_front(&mut self, value: T) -> Result<(), (T, AllocError)> {
        let first = unsafe { (*self.ghost()).next };
        self.try_link_before(first, value)
    }

    /// Push an element to the front.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        if self.try_push_front(value).is_err() {
            fail::oom();
        }
    }

    /// Remove the last element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            unsafe { Some(self.unlink((*self.ghost()).prev)) }
        }
    }

    /// Remove the first element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            unsafe { Some(self.unlink((*self.ghost()).next)) }
        }
    }

    /// Get a cursor at the first element (or the sentinel if empty).
    #[inline]
    pub fn cursor_front(&self) -> Cursor<T, A> {
        Cursor {
            current: unsafe { (*self.ghost()).next },
            index: 0,
            list: self,
        }
    }

    /// Get a mutable cursor at index `at`.
    ///
    /// `at == len` places the cursor on the sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    #[inline]
    pub fn cursor_mut(&mut self, at: usize) -> CursorMut<T, A> {
        CursorMut {
            current: self.link_at(at),
            index: at,
            list: self,
        }
    }

    /// Get a mutable cursor at the first element (or the sentinel if empty).
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<T, A> {
        self.cursor_mut(0)
    }

    /// Get a mutable cursor at the last element (or the sentinel if empty).
    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<T, A> {
        let at = self.len.saturating_sub(1);
        self.cursor_mut(at)
    }

    /// Move all elements of `other` in front of index `at`.
    ///
    /// This is O(min(at, len - at)) for finding the position, and O(1) for the move.
    pub fn splice(&mut self, at: usize, other: &mut List<T, A>) {
        let pos = self.link_at(at);
        unsafe { splice_all(pos, other.ghost()) };

        self.len += other.len;
        other.len = 0;
    }

    /// Move the element at index `from` of `other` in front of index `at`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not an index of `other`.
    pub fn splice_one(&mut self, at: usize, other: &mut List<T, A>, from: usize) {
        assert!(from < other.len, "Index {} out of bounds (length is {}).", from, other.len);

        let pos = self.link_at(at);
        let node = other.link_at(from);
        unsafe { transfer(pos, node, (*node).next) };

        self.len += 1;
        other.len -= 1;
    }

    /// Move the elements of `other` in `range` in front of index `at`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn splice_range(&mut self, at: usize, other: &mut List<T, A>, range: Range<usize>) {
        let Range { start, end } = range;
        assert!(start <= end && end <= other.len, "Range {}..{} out of bounds.", start, end);

        let pos = self.link_at(at);
        let first = other.link_at(start);
        let last = other.link_at(end);
        unsafe { transfer(pos, first, last) };

        self.len += end - start;
        other.len -= end - start;
    }

    /// Move all elements of `other` to the back.
    #[inline]
    pub fn append(&mut self, other: &mut List<T, A>) {
        let at = self.len;
        self.splice(at, other);
    }

    /// Split the list in two at `at`, returning everything from `at` on.
    pub fn split_off(&mut self, at: usize) -> List<T, A> {
        let first = self.link_at(at);
        let mut tail = List::new_in(self.alloc.inner().clone());
        unsafe { transfer(tail.ghost(), first, self.ghost()) };

        tail.len = self.len - at;
        self.len = at;

        tail
    }

    /// Merge the sorted list `other` into this sorted list, with an ordering.
    ///
    /// `other` is left empty. Equivalent elements of `self` come before those of `other`.
    pub fn merge_by<C: Compare<T>>(&mut self, other: &mut List<T, A>, cmp: C) {
        unsafe { merge_rings(self.ghost(), other.ghost(), &cmp) };

        self.len += other.len;
        other.len = 0;
    }

    /// Merge the sorted list `other` into this sorted list.
    #[inline]
    pub fn merge(&mut self, other: &mut List<T, A>)
    where
        T: PartialOrd,
    {
        self.merge_by(other, Less)
    }

    /// Sort the list with an ordering.
    ///
    /// This is a bottom-up merge sort: elements are moved one by one into a carry ring, which is
    /// merged up a table of buckets like a binary counter increment (bucket `i` holds up to
    /// 2^(i + 1) elements), and finally the buckets are merged down. It is stable, O(n log n),
    /// and only relinks nodes.
    pub fn sort_by<C: Compare<T>>(&mut self, cmp: C) {
        if self.len < 2 {
            return;
        }

        let mut buckets = SortBuckets {
            head: self.ghost(),
            carry: Link::DANGLING,
            counter: [Link::DANGLING; config::LIST_SORT_BUCKETS],
        };

        unsafe {
            let head = buckets.head;
            let carry: *mut Link = &mut buckets.carry;
            let counter: *mut Link = buckets.counter.as_mut_ptr();
            Link::init(carry);
            for i in 0..config::LIST_SORT_BUCKETS {
                Link::init(counter.add(i));
            }

            let mut fill = 0;
            while (*head).next != head {
                let first = (*head).next;
                transfer(carry, first, (*first).next);

                let mut i = 0;
                while i < fill && (*counter.add(i)).next != counter.add(i) {
                    merge_rings::<T, C>(counter.add(i), carry, &cmp);
                    swap_rings(carry, counter.add(i));
                    i += 1;
                }
                swap_rings(carry, counter.add(i));
                if i == fill {
                    fill += 1;
                }
            }

            for i in 1..fill {
                merge_rings::<T, C>(counter.add(i), counter.add(i - 1), &cmp);
            }
            swap_rings(head, counter.add(fill - 1));
        }
    }

    /// Sort the list in ascending order.
    #[inline]
    pub fn sort(&mut self)
    where
        T: PartialOrd,
    {
        self.sort_by(Less)
    }

    /// Reverse the order of the elements.
    pub fn reverse(&mut self) {
        let ghost = self.ghost();
        let mut link = ghost;
        unsafe {
            loop {
                mem::swap(&mut (*link).next, &mut (*link).prev);
                // The old `next` is now `prev`.
                link = (*link).prev;
                if link == ghost {
                    break;
                }
            }
        }
    }

    /// Remove every element for which `same(previous, element)` holds, `previous` being the
    /// last element kept before it.
    pub fn unique_by<F>(&mut self, mut same: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let ghost = self.ghost();
        unsafe {
            let mut kept = (*ghost).next;
            if kept == ghost {
                return;
            }

            let mut link = (*kept).next;
            while link != ghost {
                let next = (*link).next;
                if same(value_ref::<T>(kept), value_ref::<T>(link)) {
                    drop(self.unlink(link));
                } else {
                    kept = link;
                }
                link = next;
            }
        }
    }

    /// Remove consecutive duplicates.
    #[inline]
    pub fn unique(&mut self)
    where
        T: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Keep only the elements satisfying `pred`.
    pub fn retain<F>(&mut self, mut pred: F)
    where
        F: FnMut(&T) -> bool,
    {
        let ghost = self.ghost();
        unsafe {
            let mut link = (*ghost).next;
            while link != ghost {
                let next = (*link).next;
                if !pred(value_ref::<T>(link)) {
                    drop(self.unlink(link));
                }
                link = next;
            }
        }
    }

    /// Remove every element equal to `value`.
    #[inline]
    pub fn remove_value(&mut self, value: &T)
    where
        T: PartialEq,
    {
        self.retain(|x| x != value)
    }

    /// Shorten the list to `len` elements, dropping the rest.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Resize to `len` elements, cloning `value` into any new ones.
    pub fn resize(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        if len > self.len {
            for _ in self.len..len {
                self.push_back(value.clone());
            }
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

    /// Drop every element.
    pub fn clear(&mut self) {
        let ghost = self.ghost();
        unsafe {
            // Detach the ring first, so a panicking destructor leaks rather than double-drops.
            let mut link = (*ghost).next;
            Link::init(ghost);
            self.len = 0;

            while link != ghost {
                let next = (*link).next;
                drop(self.destroy_node(link));
                link = next;
            }
        }
    }

    /// Swap the contents of two lists.
    #[inline]
    pub fn swap(&mut self, other: &mut List<T, A>) {
        mem::swap(self, other);
    }

    /// Iterate over the elements.
    #[inline]
    pub fn iter(&self) -> Iter<T> {
        let ghost = self.ghost();
        unsafe {
            Iter {
                head: (*ghost).next,
                tail: (*ghost).prev,
                len: self.len,
                _marker: PhantomData,
            }
        }
    }

    /// Iterate mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<T> {
        let ghost = self.ghost();
        unsafe {
            IterMut {
                head: (*ghost).next,
                tail: (*ghost).prev,
                len: self.len,
                _marker: PhantomData,
            }
        }
    }
}

impl<T, A: Alloc> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        unsafe { self.head_alloc.deallocate_one(self.head) };
    }
}

impl<T, A: Alloc> Default for List<T, A> {
    #[inline]
    fn default() -> List<T, A> {
        List::new_in(A::default())
    }
}

impl<T: Clone, A: Alloc> Clone for List<T, A> {
    fn clone(&self) -> List<T, A> {
        let mut list = List::new_in(self.alloc.inner().clone());
        list.extend(self.iter().cloned());

        list
    }
}

impl<T: fmt::Debug, A: Alloc> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Alloc> PartialEq for List<T, A> {
    fn eq(&self, other: &List<T, A>) -> bool {
        self.len == other.len && search::equal(self.iter(), other.iter())
    }
}

impl<T: PartialEq, A: Alloc, const N: usize> PartialEq<[T; N]> for List<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.len == N && search::equal(self.iter(), other.iter())
    }
}

impl<T: Eq, A: Alloc> Eq for List<T, A> {}

impl<T: PartialOrd, A: Alloc> PartialOrd for List<T, A> {
    fn partial_cmp(&self, other: &List<T, A>) -> Option<Ordering> {
        search::lexicographical_partial_cmp(self.iter(), other.iter())
    }
}

impl<T: Ord, A: Alloc> Ord for List<T, A> {
    fn cmp(&self, other: &List<T, A>) -> Ordering {
        search::lexicographical_cmp(self.iter(), other.iter())
    }
}

impl<T, A: Alloc> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, A: Alloc> FromIterator<T> for List<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> List<T, A> {
        let mut list = List::default();
        list.extend(iter);

        list
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Alloc> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

/// An iterator over the elements of a list.
pub struct Iter<'a, T> {
    head: *mut Link,
    tail: *mut Link,
    len: usize,
    _marker: PhantomData<&'a T>,
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
            let elem = value_ref::<T>(self.head);
            self.head = (*self.head).next;

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
            let elem = value_ref::<T>(self.tail);
            self.tail = (*self.tail).prev;

            Some(elem)
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter { ..*self }
    }
}

/// A mutable iterator over the elements of a list.
pub struct IterMut<'a, T> {
    head: *mut Link,
    tail: *mut Link,
    len: usize,
    _marker: PhantomData<&'a mut T>,
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
            let elem = value::<T>(self.head);
            self.head = (*self.head).next;

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
            let elem = value::<T>(self.tail);
            self.tail = (*self.tail).prev;

            Some(elem)
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a list.
pub struct IntoIter<T, A: Alloc = PoolAlloc> {
    list: List<T, A>,
}

impl<T, A: Alloc> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: Alloc> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: Alloc> ExactSizeIterator for IntoIter<T, A> {}

/// A read-only cursor over a list.
///
/// The cursor sits either on an element or on the sentinel, which is between the last and the
/// first element. Moving wraps around through the sentinel.
pub struct Cursor<'a, T, A: Alloc = PoolAlloc> {
    current: *mut Link,
    /// The index of `current`; `len` on the sentinel.
    index: usize,
    list: &'a List<T, A>,
}

impl<'a, T, A: Alloc> Cursor<'a, T, A> {
    /// The index of the current element, or `None` on the sentinel.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        if self.current == self.list.ghost() {
            None
        } else {
            Some(self.index)
        }
    }

    /// Get the current element, or `None` on the sentinel.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        if self.current == self.list.ghost() {
            None
        } else {
            unsafe { Some(value_ref::<T>(self.current)) }
        }
    }

    /// Move to the next element.
    #[inline]
    pub fn move_next(&mut self) {
        self.index = if self.current == self.list.ghost() { 0 } else { self.index + 1 };
        self.current = unsafe { (*self.current).next };
    }

    /// Move to the previous element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.index = if self.current == self.list.ghost() {
            self.list.len.saturating_sub(1)
        } else if self.index == 0 {
            self.list.len
        } else {
            self.index - 1
        };
        self.current = unsafe { (*self.current).prev };
    }
}

/// A mutable cursor over a list.
///
/// The cursor sits either on an element or on the sentinel, which is between the last and the
/// first element. Moving wraps around through the sentinel.
pub struct CursorMut<'a, T, A: Alloc = PoolAlloc> {
    current: *mut Link,
    /// The index of `current`; `len` on the sentinel.
    index: usize,
    list: &'a mut List<T, A>,
}

impl<'a, T, A: Alloc> CursorMut<'a, T, A> {
    #[inline]
    fn on_ghost(&self) -> bool {
        self.current == self.list.ghost()
    }

    /// The index of the current element, or `None` on the sentinel.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        if self.on_ghost() {
            None
        } else {
            Some(self.index)
        }
    }

    /// Get the current element, or `None` on the sentinel.
    #[inline]
    pub fn current(&mut self) -> Option<&mut T> {
        if self.on_ghost() {
            None
        } else {
            unsafe { Some(value::<T>(self.current)) }
        }
    }

    /// Get the element after the current one.
    #[inline]
    pub fn peek_next(&mut self) -> Option<&mut T> {
        let next = unsafe { (*self.current).next };
        if next == self.list.ghost() {
            None
        } else {
            unsafe { Some(value::<T>(next)) }
        }
    }

    /// Get the element before the current one.
    #[inline]
    pub fn peek_prev(&mut self) -> Option<&mut T> {
        let prev = unsafe { (*self.current).prev };
        if prev == self.list.ghost() {
            None
        } else {
            unsafe { Some(value::<T>(prev)) }
        }
    }

    /// Move to the next element.
    #[inline]
    pub fn move_next(&mut self) {
        self.index = if self.on_ghost() { 0 } else { self.index + 1 };
        self.current = unsafe { (*self.current).next };
    }

    /// Move to the previous element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.index = if self.on_ghost() {
            self.list.len.saturating_sub(1)
        } else if self.index == 0 {
            self.list.len
        } else {
            self.index - 1
        };
        self.current = unsafe { (*self.current).prev };
    }

    /// Insert `value` before the current element (at the back, on the sentinel).
    pub fn try_insert_before(&mut self, value: T) -> Result<(), (T, AllocError)> {
        self.list.try_link_before(self.current, value)?;
        self.index += 1;

        Ok(())
    }

    /// Insert `value` before the current element (at the back, on the sentinel).
    #[inline]
    pub fn insert_before(&mut self, value: T) {
        if self.try_insert_before(value).is_err() {
            fail::oom();
        }
    }

    /// Insert `value` after the current element (at the front, on the sentinel).
    pub fn try_insert_after(&mut self, value: T) -> Result<(), (T, AllocError)> {
        let next = unsafe { (*self.current).next };
        self.list.try_link_before(next, value)?;
        if self.on_ghost() {
            self.index += 1;
        }

        Ok(())
    }

    /// Insert `value` after the current element (at the front, on the sentinel).
    #[inline]
    pub fn insert_after(&mut self, value: T) {
        if self.try_insert_after(value).is_err() {
            fail::oom();
        }
    }

    /// Remove the current element and move to the next one.
    ///
    /// Returns `None` (and does nothing) on the sentinel.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.on_ghost() {
            return None;
        }

        let node = self.current;
        unsafe {
            self.current = (*node).next;
            Some(self.list.unlink(node))
        }
    }

    /// Move all elements of `other` in front of the current element.
    pub fn splice_before(&mut self, other: &mut List<T, A>) {
        unsafe { splice_all(self.current, other.ghost()) };

        self.index += other.len;
        self.list.len += other.len;
        other.len = 0;
    }

    /// Move all elements of `other` after the current element.
    pub fn splice_after(&mut self, other: &mut List<T, A>) {
        unsafe { splice_all((*self.current).next, other.ghost()) };

        if self.on_ghost() {
            self.index += other.len;
        }
        self.list.len += other.len;
        other.len = 0;
    }
}
