//! The singly linked list.
//!
//! Only forward links exist, so every positional operation works "after" a position, and the
//! length is found by walking. The head link sits inside the list itself: nothing links back to
//! it, so the list can move freely.

use crate::algo::search;
use crate::allocator::{Alloc, Allocator, PoolAlloc};
use crate::fail;
use crate::functional::{Compare, Less};
use crate::prelude::*;

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::{fmt, mem, ptr};

use shim::config;

/// A forward link. Null ends the chain.
struct Link {
    next: *mut Link,
}

/// A node: its link, then the value.
#[repr(C)]
struct Node<T> {
    link: Link,
    value: T,
}

/// Get the value of the node behind `link`.
#[inline]
unsafe fn value<'a, T>(link: *mut Link) -> &'a mut T {
    &mut (*(link as *mut Node<T>)).value
}

/// Get the value of the node behind `link`, for reading.
#[inline]
unsafe fn value_ref<'a, T>(link: *const Link) -> &'a T {
    &(*(link as *const Node<T>)).value
}

/// Link a new node holding `value` after `pos`.
///
/// `pos` may be the head link of a list. These helpers take the allocator alone, never the list,
/// so a pointer to the head stays usable across them.
unsafe fn link_after<T, A: Alloc>(
    alloc: &Allocator<Node<T>, A>,
    pos: *mut Link,
    value: T,
) -> Result<*mut Link, (T, AllocError)> {
    let node = match alloc.allocate_one() {
        Ok(node) => node,
        Err(err) => return Err((value, err)),
    };

    node.get().write(Node {
        link: Link { next: (*pos).next },
        value,
    });
    let link = node.get() as *mut Link;
    (*pos).next = link;

    Ok(link)
}

/// Unlink the node after `pos` and free it, returning its value.
unsafe fn unlink_after<T, A: Alloc>(alloc: &Allocator<Node<T>, A>, pos: *mut Link) -> T {
    let link = (*pos).next;
    debug_assert!(!link.is_null(), "Unlinking past the end.");
    (*pos).next = (*link).next;

    let node = link as *mut Node<T>;
    let value = ptr::read(&(*node).value);
    alloc.deallocate_one(Pointer::new(node));

    value
}

/// Merge two sorted chains, taking from `a` on ties.
unsafe fn merge_chains<T, C: Compare<T>>(mut a: *mut Link, mut b: *mut Link, cmp: &C) -> *mut Link {
    let mut out = Link { next: ptr::null_mut() };
    let mut tail: *mut Link = &mut out;

    while !a.is_null() && !b.is_null() {
        if cmp.less(value_ref::<T>(b), value_ref::<T>(a)) {
            (*tail).next = b;
            tail = b;
            b = (*b).next;
        } else {
            (*tail).next = a;
            tail = a;
            a = (*a).next;
        }
    }
    (*tail).next = if a.is_null() { b } else { a };

    out.next
}

/// A singly linked list.
pub struct Slist<T, A: Alloc = PoolAlloc> {
    /// The link before the first node.
    head: Link,
    /// The allocator of the nodes.
    alloc: Allocator<Node<T>, A>,
    /// This owns `T`s.
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send, A: Alloc + Send> Send for Slist<T, A> {}
unsafe impl<T: Sync, A: Alloc + Sync> Sync for Slist<T, A> {}

impl<T> Slist<T> {
    /// Create a new empty list.
    #[inline]
    pub fn new() -> Slist<T> {
        Slist::new_in(PoolAlloc)
    }
}

impl<T, A: Alloc> Slist<T, A> {
    /// Create a new empty list using `alloc`.
    ///
    /// This does not allocate.
    #[inline]
    pub fn new_in(alloc: A) -> Slist<T, A> {
        Slist {
            head: Link { next: ptr::null_mut() },
            alloc: Allocator::with(alloc),
            _phantom: PhantomData,
        }
    }

    /// Create a list of `n` clones of `value`.
    pub fn from_elem(n: usize, value: &T) -> Slist<T, A>
    where
        T: Clone,
    {
        let mut list = Slist::default();
        list.resize(n, value);

        list
    }

    /// The link before the first node.
    ///
    /// The pointer stays valid until the list itself is next borrowed as a whole; only field
    /// borrows (such as `&self.alloc`) may come in between.
    #[inline]
    fn before_begin(&mut self) -> *mut Link {
        ptr::addr_of_mut!(self.head)
    }

    /// The last link of the chain (the head link if empty).
    fn last_link(&mut self) -> *mut Link {
        let mut link = self.before_begin();
        unsafe {
            while !(*link).next.is_null() {
                link = (*link).next;
            }
        }

        link
    }

    /// Get the number of elements.
    ///
    /// This walks the whole list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Is this list empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.next.is_null()
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

    /// Push an element to the front.
    ///
    /// If the node cannot be allocated, `value` is handed back along with the error.
    #[inline]
    pub fn try_push_front(&mut self, value: T) -> Result<(), (T, AllocError)> {
        let head = self.before_begin();
        unsafe { link_after(&self.alloc, head, value).map(|_| ()) }
    }

    /// Push an element to the front.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        if self.try_push_front(value).is_err() {
            fail::oom();
        }
    }

    /// Remove the first element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            let head = self.before_begin();
            unsafe { Some(unlink_after(&self.alloc, head)) }
        }
    }

    /// Get a mutable cursor before the first element.
    #[inline]
    pub fn before_begin_mut(&mut self) -> CursorMut<T, A> {
        let list = NonNull::from(self);
        CursorMut {
            current: unsafe { ptr::addr_of_mut!((*list.as_ptr()).head) },
            index: None,
            list,
            _marker: PhantomData,
        }
    }

    /// Get a mutable cursor at the element at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not an index of the list.
    pub fn cursor_mut(&mut self, at: usize) -> CursorMut<T, A> {
        let mut cursor = self.before_begin_mut();
        for _ in 0..=at {
            assert!(cursor.move_next(), "Index {} out of bounds.", at);
        }

        cursor
    }

    /// Get a mutable cursor at the element before index `at`, which is where edits of `at` go.
    ///
    /// At 0 this is before the first element. `at` may be the length.
    ///
    /// # Panics
    ///
    /// Panics if `at` is past the length.
    pub fn previous_mut(&mut self, at: usize) -> CursorMut<T, A> {
        if at == 0 {
            self.before_begin_mut()
        } else {
            self.cursor_mut(at - 1)
        }
    }

    /// Merge the sorted list `other` into this sorted list, with an ordering.
    ///
    /// `other` is left empty. Equivalent elements of `self` come before those of `other`.
    pub fn merge_by<C: Compare<T>>(&mut self, other: &mut Slist<T, A>, cmp: C) {
        let theirs = mem::replace(&mut other.head.next, ptr::null_mut());
        self.head.next = unsafe { merge_chains::<T, C>(self.head.next, theirs, &cmp) };
    }

    /// Merge the sorted list `other` into this sorted list.
    #[inline]
    pub fn merge(&mut self, other: &mut Slist<T, A>)
    where
        T: PartialOrd,
    {
        self.merge_by(other, Less)
    }

    /// Sort the list with an ordering.
    ///
    /// This is the same carry-and-buckets merge sort as that of `List`, over null-terminated
    /// chains. It is stable. If `cmp` panics, the elements being sorted are leaked.
    pub fn sort_by<C: Compare<T>>(&mut self, cmp: C) {
        let mut counter = [ptr::null_mut::<Link>(); config::LIST_SORT_BUCKETS];
        let mut fill = 0;

        unsafe {
            while !self.head.next.is_null() {
                let mut carry = self.head.next;
                self.head.next = (*carry).next;
                (*carry).next = ptr::null_mut();

                let mut i = 0;
                while i < fill && !counter[i].is_null() {
                    carry = merge_chains::<T, C>(counter[i], carry, &cmp);
                    counter[i] = ptr::null_mut();
                    i += 1;
                }
                counter[i] = carry;
                if i == fill {
                    fill += 1;
                }
            }

            let mut sorted = ptr::null_mut();
            for &bucket in counter[..fill].iter() {
                sorted = merge_chains::<T, C>(bucket, sorted, &cmp);
            }
            self.head.next = sorted;
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
        let mut reversed = ptr::null_mut();
        let mut link = self.head.next;
        unsafe {
            while !link.is_null() {
                let next = (*link).next;
                (*link).next = reversed;
                reversed = link;
                link = next;
            }
        }
        self.head.next = reversed;
    }

    /// Remove every element for which `same(previous, element)` holds, `previous` being the
    /// last element kept before it.
    pub fn unique_by<F>(&mut self, mut same: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut kept = self.head.next;
        if kept.is_null() {
            return;
        }

        unsafe {
            while !(*kept).next.is_null() {
                if same(value_ref::<T>(kept), value_ref::<T>((*kept).next)) {
                    drop(unlink_after(&self.alloc, kept));
                } else {
                    kept = (*kept).next;
                }
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
        let mut link = self.before_begin();
        unsafe {
            while !(*link).next.is_null() {
                if pred(value_ref::<T>((*link).next)) {
                    link = (*link).next;
                } else {
                    drop(unlink_after(&self.alloc, link));
                }
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
        let mut link = self.before_begin();
        unsafe {
            for _ in 0..len {
                if (*link).next.is_null() {
                    return;
                }
                link = (*link).next;
            }
            while !(*link).next.is_null() {
                drop(unlink_after(&self.alloc, link));
            }
        }
    }

    /// Resize to `len` elements, cloning `value` into any new ones.
    pub fn resize(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        let mut link = self.before_begin();
        let mut n = 0;
        unsafe {
            while n < len && !(*link).next.is_null() {
                link = (*link).next;
                n += 1;
            }
            while !(*link).next.is_null() {
                drop(unlink_after(&self.alloc, link));
            }
        }

        for _ in n..len {
            let linked = unsafe { link_after(&self.alloc, link, value.clone()) };
            link = fail::or_oom(linked.map_err(|(_, err)| err));
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
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Swap the contents of two lists.
    #[inline]
    pub fn swap(&mut self, other: &mut Slist<T, A>) {
        mem::swap(self, other);
    }

    /// Iterate over the elements.
    #[inline]
    pub fn iter(&self) -> Iter<T> {
        Iter {
            link: self.head.next,
            _marker: PhantomData,
        }
    }

    /// Iterate mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<T> {
        IterMut {
            link: self.head.next,
            _marker: PhantomData,
        }
    }
}

impl<T, A: Alloc> Drop for Slist<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Alloc> Default for Slist<T, A> {
    #[inline]
    fn default() -> Slist<T, A> {
        Slist::new_in(A::default())
    }
}

impl<T: Clone, A: Alloc> Clone for Slist<T, A> {
    fn clone(&self) -> Slist<T, A> {
        let mut list = Slist::new_in(self.alloc.inner().clone());
        list.extend(self.iter().cloned());

        list
    }
}

impl<T: fmt::Debug, A: Alloc> fmt::Debug for Slist<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Alloc> PartialEq for Slist<T, A> {
    fn eq(&self, other: &Slist<T, A>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, A: Alloc, const N: usize> PartialEq<[T; N]> for Slist<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Alloc> Eq for Slist<T, A> {}

impl<T: PartialOrd, A: Alloc> PartialOrd for Slist<T, A> {
    fn partial_cmp(&self, other: &Slist<T, A>) -> Option<Ordering> {
        search::lexicographical_partial_cmp(self.iter(), other.iter())
    }
}

impl<T: Ord, A: Alloc> Ord for Slist<T, A> {
    fn cmp(&self, other: &Slist<T, A>) -> Ordering {
        search::lexicographical_cmp(self.iter(), other.iter())
    }
}

impl<T, A: Alloc> Extend<T> for Slist<T, A> {
    /// Append the elements at the back, keeping their order.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut link = self.last_link();
        for value in iter {
            link = match unsafe { link_after(&self.alloc, link, value) } {
                Ok(link) => link,
                Err(_) => fail::oom(),
            };
        }
    }
}

impl<T, A: Alloc> FromIterator<T> for Slist<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Slist<T, A> {
        let mut list = Slist::default();
        list.extend(iter);

        list
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a Slist<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Alloc> IntoIterator for &'a mut Slist<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Alloc> IntoIterator for Slist<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

/// An iterator over the elements of a singly linked list.
pub struct Iter<'a, T> {
    link: *mut Link,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.link.is_null() {
            None
        } else {
            unsafe {
                let elem = value_ref::<T>(self.link);
                self.link = (*self.link).next;

                Some(elem)
            }
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter { ..*self }
    }
}

/// A mutable iterator over the elements of a singly linked list.
pub struct IterMut<'a, T> {
    link: *mut Link,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.link.is_null() {
            None
        } else {
            unsafe {
                let elem = value::<T>(self.link);
                self.link = (*self.link).next;

                Some(elem)
            }
        }
    }
}

/// An owning iterator over the elements of a singly linked list.
pub struct IntoIter<T, A: Alloc = PoolAlloc> {
    list: Slist<T, A>,
}

impl<T, A: Alloc> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

/// A mutable cursor over a singly linked list.
///
/// The cursor sits on an element, or before the first one. It only moves forward, and edits
/// after its position.
pub struct CursorMut<'a, T, A: Alloc = PoolAlloc> {
    /// The current link; the head link of the list before the first element.
    current: *mut Link,
    /// The index of `current`; `None` before the first element.
    index: Option<usize>,
    /// The list. Never reborrowed as a whole, since `current` may point into it.
    list: NonNull<Slist<T, A>>,
    _marker: PhantomData<&'a mut Slist<T, A>>,
}

impl<'a, T, A: Alloc> CursorMut<'a, T, A> {
    /// The index of the current element, or `None` before the first.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the current element, or `None` before the first.
    #[inline]
    pub fn current(&mut self) -> Option<&mut T> {
        match self.index {
            Some(_) => unsafe { Some(value::<T>(self.current)) },
            None => None,
        }
    }

    /// Get the element after the current one.
    #[inline]
    pub fn peek_next(&mut self) -> Option<&mut T> {
        let next = unsafe { (*self.current).next };
        if next.is_null() {
            None
        } else {
            unsafe { Some(value::<T>(next)) }
        }
    }

    /// Move to the next element.
    ///
    /// Returns `false` (and stays put) at the last element.
    #[inline]
    pub fn move_next(&mut self) -> bool {
        let next = unsafe { (*self.current).next };
        if next.is_null() {
            return false;
        }

        self.current = next;
        self.index = Some(self.index.map_or(0, |i| i + 1));

        true
    }

    /// Insert `value` after the current element.
    pub fn try_insert_after(&mut self, value: T) -> Result<(), (T, AllocError)> {
        unsafe { link_after(&(*self.list.as_ptr()).alloc, self.current, value).map(|_| ()) }
    }

    /// Insert `value` after the current element.
    #[inline]
    pub fn insert_after(&mut self, value: T) {
        if self.try_insert_after(value).is_err() {
            fail::oom();
        }
    }

    /// Remove the element after the current one.
    pub fn remove_next(&mut self) -> Option<T> {
        if unsafe { (*self.current).next.is_null() } {
            None
        } else {
            unsafe { Some(unlink_after(&(*self.list.as_ptr()).alloc, self.current)) }
        }
    }

    /// Move all elements of `other` after the current element.
    pub fn splice_after(&mut self, other: &mut Slist<T, A>) {
        if other.is_empty() {
            return;
        }

        let last = other.last_link();
        unsafe {
            (*last).next = (*self.current).next;
            (*self.current).next = mem::replace(&mut other.head.next, ptr::null_mut());
        }
    }
}
