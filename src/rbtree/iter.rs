//! Traversal of the tree.

use super::node::{self, Link};

use core::fmt;
use core::marker::PhantomData;

/// A read-only position in a tree.
///
/// It is either at an element, or at the end (the header). Moving past either end wraps around
/// through the end position.
pub struct Cursor<'a, V> {
    pub(crate) node: Link,
    pub(crate) header: Link,
    pub(crate) _marker: PhantomData<&'a V>,
}

impl<'a, V> Cursor<'a, V> {
    #[inline]
    pub(crate) fn new(node: Link, header: Link) -> Cursor<'a, V> {
        Cursor {
            node,
            header,
            _marker: PhantomData,
        }
    }

    /// Is this the end position?
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node == self.header
    }

    /// The element here, if any.
    #[inline]
    pub fn get(&self) -> Option<&'a V> {
        if self.is_end() {
            None
        } else {
            Some(unsafe { node::value_ref::<V>(self.node) })
        }
    }

    /// Move to the next element.
    #[inline]
    pub fn move_next(&mut self) {
        self.node = unsafe { node::increment(self.node) };
    }

    /// Move to the previous element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.node = unsafe { node::decrement(self.node) };
    }
}

impl<'a, V> Clone for Cursor<'a, V> {
    fn clone(&self) -> Cursor<'a, V> {
        *self
    }
}

impl<'a, V> Copy for Cursor<'a, V> {}

impl<'a, V> PartialEq for Cursor<'a, V> {
    fn eq(&self, other: &Cursor<'a, V>) -> bool {
        self.node == other.node
    }
}

impl<'a, V> Eq for Cursor<'a, V> {}

impl<'a, V: fmt::Debug> fmt::Debug for Cursor<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// An in-order iterator over the elements of a tree.
pub struct Iter<'a, V> {
    /// The next element from the front.
    pub(crate) front: Link,
    /// One past the next element from the back.
    pub(crate) back: Link,
    pub(crate) len: usize,
    pub(crate) _marker: PhantomData<&'a V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            let elem = node::value_ref::<V>(self.front);
            self.front = node::increment(self.front);

            Some(elem)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a V> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            self.back = node::decrement(self.back);

            Some(node::value_ref::<V>(self.back))
        }
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> Clone for Iter<'a, V> {
    fn clone(&self) -> Iter<'a, V> {
        Iter { ..*self }
    }
}

/// An in-order iterator over the values of a map, by mutable reference.
///
/// Keys stay immutable, since changing them would break the order.
pub struct ValuesMut<'a, K, T> {
    pub(crate) front: Link,
    pub(crate) len: usize,
    pub(crate) _marker: PhantomData<&'a mut (K, T)>,
}

impl<'a, K, T> Iterator for ValuesMut<'a, K, T> {
    type Item = (&'a K, &'a mut T);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a mut T)> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe {
            let (key, value) = node::value::<(K, T)>(self.front);
            self.front = node::increment(self.front);

            Some((&*key, value))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, T> ExactSizeIterator for ValuesMut<'a, K, T> {}
