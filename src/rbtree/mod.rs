//! The red-black tree, and the ordered set and map built on it.
//!
//! The tree stores values, and orders them by a key taken out of each value by a `KeyOf` policy
//! under a `Compare` policy. With `Identity` keys that is a set, and with `First` keys a map.
//!
//! A header node outside the tree holds the root and caches both ends, so the first and last
//! elements are found in constant time. Like the list sentinel, it lives in the pool so that the
//! tree can move.

mod iter;
mod node;

pub use self::iter::{Cursor, Iter, ValuesMut};

use self::node::{Color, Link, Node, NodeBase};

use crate::algo::search;
use crate::allocator::{Alloc, Allocator, PoolAlloc};
use crate::fail;
use crate::functional::{Compare, First, Identity, KeyOf, Less};
use crate::prelude::*;

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::Range;
use core::{fmt, mem, ptr};

/// A red-black tree.
///
/// `K` extracts the key of a value, and `C` orders the keys.
pub struct RbTree<V, K = Identity, C = Less, A: Alloc = PoolAlloc> {
    /// The header.
    header: Pointer<NodeBase>,
    /// The number of elements.
    len: usize,
    /// The key order.
    cmp: C,
    /// The allocator of the nodes.
    alloc: Allocator<Node<V>, A>,
    /// The allocator of the header.
    header_alloc: Allocator<NodeBase, A>,
    /// This owns `V`s.
    _phantom: PhantomData<(V, fn() -> K)>,
}

/// An ordered set.
pub type Set<T, C = Less, A = PoolAlloc> = RbTree<T, Identity, C, A>;

/// An ordered map.
pub type Map<K, T, C = Less, A = PoolAlloc> = RbTree<(K, T), First, C, A>;

unsafe impl<V: Send, K, C: Send, A: Alloc + Send> Send for RbTree<V, K, C, A> {}
unsafe impl<V: Sync, K, C: Sync, A: Alloc + Sync> Sync for RbTree<V, K, C, A> {}

impl<V, K> RbTree<V, K> {
    /// Create a new empty tree, in ascending order.
    #[inline]
    pub fn new() -> RbTree<V, K> {
        RbTree::with_compare(Less)
    }
}

impl<V, K, C> RbTree<V, K, C> {
    /// Create a new empty tree ordered by `cmp`.
    #[inline]
    pub fn with_compare(cmp: C) -> RbTree<V, K, C> {
        RbTree::with_compare_in(cmp, PoolAlloc)
    }
}

impl<V, K, C, A: Alloc> RbTree<V, K, C, A> {
    /// Create a new empty tree ordered by `cmp`, using `alloc`.
    #[inline]
    pub fn with_compare_in(cmp: C, alloc: A) -> RbTree<V, K, C, A> {
        fail::or_oom(RbTree::try_with_compare_in(cmp, alloc))
    }

    /// Create a new empty tree ordered by `cmp`, using `alloc`.
    ///
    /// This allocates the header.
    pub fn try_with_compare_in(cmp: C, alloc: A) -> Result<RbTree<V, K, C, A>, AllocError> {
        let header_alloc: Allocator<NodeBase, A> = Allocator::with(alloc.clone());
        let header = header_alloc.allocate_one()?;
        unsafe {
            let h = header.get();
            h.write(NodeBase::new());
            (*h).left = h;
            (*h).right = h;
        }

        Ok(RbTree {
            header,
            len: 0,
            cmp,
            alloc: Allocator::with(alloc),
            header_alloc,
            _phantom: PhantomData,
        })
    }

    #[inline]
    fn header(&self) -> Link {
        self.header.get()
    }

    #[inline]
    fn root(&self) -> Link {
        unsafe { (*self.header()).parent }
    }

    #[inline]
    fn leftmost(&self) -> Link {
        unsafe { (*self.header()).left }
    }

    #[inline]
    fn rightmost(&self) -> Link {
        unsafe { (*self.header()).right }
    }

    /// Allocate an unlinked red node holding `value`.
    ///
    /// If that fails, `value` is handed back.
    fn create_node(&self, value: V) -> Result<Link, (V, AllocError)> {
        match self.alloc.allocate_one() {
            Ok(node) => unsafe {
                node.get().write(Node {
                    base: NodeBase::new(),
                    value,
                });

                Ok(node.get() as Link)
            },
            Err(err) => Err((value, err)),
        }
    }

    /// Free an unlinked node, returning its value.
    unsafe fn destroy_node(&self, x: Link) -> V {
        let node = x as *mut Node<V>;
        let value = ptr::read(&(*node).value);
        self.alloc.deallocate_one(Pointer::new(node));

        value
    }

    /// Free `x` and everything below it, without rebalancing.
    unsafe fn destroy_subtree(&self, mut x: Link) {
        // Recurse right, loop left: the depth is bounded by the height.
        while !x.is_null() {
            self.destroy_subtree((*x).right);
            let left = (*x).left;
            drop(self.destroy_node(x));
            x = left;
        }
    }

    /// Unlink `z` and free it, returning its value.
    unsafe fn erase(&mut self, z: Link) -> V {
        debug_assert!(z != self.header(), "Erasing the header.");

        node::rebalance_for_erase(z, self.header());
        self.len -= 1;

        self.destroy_node(z)
    }

    /// Erase `first..last`, returning how many elements went.
    fn erase_links(&mut self, mut first: Link, last: Link) -> usize {
        if first == self.leftmost() && last == self.header() {
            let len = self.len;
            self.clear();
            return len;
        }

        let mut erased = 0;
        while first != last {
            unsafe {
                let next = node::increment(first);
                drop(self.erase(first));
                first = next;
            }
            erased += 1;
        }

        erased
    }

    /// Get the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the tree empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The key order.
    #[inline]
    pub fn compare(&self) -> &C {
        &self.cmp
    }

    /// The smallest element.
    #[inline]
    pub fn first(&self) -> Option<&V> {
        if self.len == 0 {
            None
        } else {
            Some(unsafe { node::value_ref::<V>(self.leftmost()) })
        }
    }

    /// The greatest element.
    #[inline]
    pub fn last(&self) -> Option<&V> {
        if self.len == 0 {
            None
        } else {
            Some(unsafe { node::value_ref::<V>(self.rightmost()) })
        }
    }

    /// Take out the smallest element.
    pub fn pop_first(&mut self) -> Option<V> {
        if self.len == 0 {
            None
        } else {
            Some(unsafe { self.erase(self.leftmost()) })
        }
    }

    /// Take out the greatest element.
    pub fn pop_last(&mut self) -> Option<V> {
        if self.len == 0 {
            None
        } else {
            Some(unsafe { self.erase(self.rightmost()) })
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        let root = self.root();
        let header = self.header();

        // Detach first, so a panicking destructor leaves an empty (if leaky) tree.
        unsafe {
            (*header).parent = ptr::null_mut();
            (*header).left = header;
            (*header).right = header;
        }
        self.len = 0;

        unsafe { self.destroy_subtree(root) };
    }

    /// Exchange the contents of two trees.
    #[inline]
    pub fn swap(&mut self, other: &mut RbTree<V, K, C, A>) {
        mem::swap(self, other);
    }

    /// A cursor at the smallest element (or at the end, if the tree is empty).
    #[inline]
    pub fn cursor_front(&self) -> Cursor<V> {
        Cursor::new(self.leftmost(), self.header())
    }

    /// A cursor at the greatest element (or at the end, if the tree is empty).
    #[inline]
    pub fn cursor_back(&self) -> Cursor<V> {
        Cursor::new(self.rightmost(), self.header())
    }

    /// A cursor at the end.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<V> {
        Cursor::new(self.header(), self.header())
    }

    /// A mutable cursor at the smallest element.
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<V, K, C, A> {
        CursorMut {
            node: self.leftmost(),
            tree: self,
        }
    }

    /// A mutable cursor at the greatest element.
    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<V, K, C, A> {
        CursorMut {
            node: self.rightmost(),
            tree: self,
        }
    }

    /// Iterate over the elements in order.
    #[inline]
    pub fn iter(&self) -> Iter<V> {
        Iter {
            front: self.leftmost(),
            back: self.header(),
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<V, K: KeyOf<V>, C: Compare<K::Key>, A: Alloc> RbTree<V, K, C, A> {
    /// The key of the node behind `x`.
    #[inline]
    unsafe fn key<'a>(x: Link) -> &'a K::Key
    where
        V: 'a,
        K::Key: 'a,
    {
        K::key(node::value_ref::<V>(x))
    }

    /// Link a new node holding `value` as a child of the leaf position below `parent`.
    fn link_leaf(&mut self, parent: Link, left: bool, value: V) -> Result<Link, (V, AllocError)> {
        let z = self.create_node(value)?;
        let header = self.header();

        unsafe {
            if left {
                // The header's left is the leftmost, so this also covers the first insertion.
                (*parent).left = z;
                if parent == header {
                    (*header).parent = z;
                    (*header).right = z;
                } else if parent == (*header).left {
                    (*header).left = z;
                }
            } else {
                (*parent).right = z;
                if parent == (*header).right {
                    (*header).right = z;
                }
            }
            (*z).parent = parent;

            node::rebalance(z, &mut (*header).parent);
        }
        self.len += 1;

        Ok(z)
    }

    /// Insert `value` unless an element with an equivalent key is already there.
    ///
    /// Gives a cursor at the new element and `true`, or at the element found and `false` (and
    /// `value` is dropped). If the node cannot be allocated, `value` is handed back along with the
    /// error.
    pub fn try_insert_unique(&mut self, value: V) -> Result<(Cursor<V>, bool), (V, AllocError)> {
        let header = self.header();
        let mut parent = header;
        let mut x = self.root();
        let mut left = true;

        unsafe {
            while !x.is_null() {
                parent = x;
                left = self.cmp.less(K::key(&value), Self::key(x));
                x = if left { (*x).left } else { (*x).right };
            }

            // The only candidate for an equal key is the in-order predecessor of the leaf slot.
            let mut prev = parent;
            if left {
                if prev == self.leftmost() {
                    let z = self.link_leaf(parent, left, value)?;
                    return Ok((Cursor::new(z, header), true));
                }
                prev = node::decrement(prev);
            }

            if self.cmp.less(Self::key(prev), K::key(&value)) {
                let z = self.link_leaf(parent, left, value)?;
                Ok((Cursor::new(z, header), true))
            } else {
                Ok((Cursor::new(prev, header), false))
            }
        }
    }

    /// Insert `value` unless an element with an equivalent key is already there.
    pub fn insert_unique(&mut self, value: V) -> (Cursor<V>, bool) {
        match self.try_insert_unique(value) {
            Ok(res) => res,
            Err(_) => fail::oom(),
        }
    }

    /// Insert `value`, after any elements with equivalent keys.
    ///
    /// If the node cannot be allocated, `value` is handed back along with the error.
    pub fn try_insert_equal(&mut self, value: V) -> Result<Cursor<V>, (V, AllocError)> {
        let mut parent = self.header();
        let mut x = self.root();
        let mut left = true;

        unsafe {
            while !x.is_null() {
                parent = x;
                left = self.cmp.less(K::key(&value), Self::key(x));
                x = if left { (*x).left } else { (*x).right };
            }
        }

        let z = self.link_leaf(parent, left, value)?;
        Ok(Cursor::new(z, self.header()))
    }

    /// Insert `value`, after any elements with equivalent keys.
    pub fn insert_equal(&mut self, value: V) -> Cursor<V> {
        match self.try_insert_equal(value) {
            Ok(cursor) => cursor,
            Err(_) => fail::oom(),
        }
    }

    /// The first node whose key is not before `key`, or the header.
    fn lower_bound_link(&self, key: &K::Key) -> Link {
        let mut y = self.header();
        let mut x = self.root();

        unsafe {
            while !x.is_null() {
                if !self.cmp.less(Self::key(x), key) {
                    y = x;
                    x = (*x).left;
                } else {
                    x = (*x).right;
                }
            }
        }

        y
    }

    /// The first node whose key is after `key`, or the header.
    fn upper_bound_link(&self, key: &K::Key) -> Link {
        let mut y = self.header();
        let mut x = self.root();

        unsafe {
            while !x.is_null() {
                if self.cmp.less(key, Self::key(x)) {
                    y = x;
                    x = (*x).left;
                } else {
                    x = (*x).right;
                }
            }
        }

        y
    }

    /// The first node with a key equivalent to `key`.
    fn find_link(&self, key: &K::Key) -> Option<Link> {
        let y = self.lower_bound_link(key);

        if y == self.header() || self.cmp.less(key, unsafe { Self::key(y) }) {
            None
        } else {
            Some(y)
        }
    }

    /// A cursor at the first element whose key is not before `key`.
    #[inline]
    pub fn lower_bound(&self, key: &K::Key) -> Cursor<V> {
        Cursor::new(self.lower_bound_link(key), self.header())
    }

    /// A cursor at the first element whose key is after `key`.
    #[inline]
    pub fn upper_bound(&self, key: &K::Key) -> Cursor<V> {
        Cursor::new(self.upper_bound_link(key), self.header())
    }

    /// The bounds of the elements with keys equivalent to `key`.
    #[inline]
    pub fn equal_range(&self, key: &K::Key) -> (Cursor<V>, Cursor<V>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// A mutable cursor at the first element whose key is not before `key`.
    #[inline]
    pub fn lower_bound_mut(&mut self, key: &K::Key) -> CursorMut<V, K, C, A> {
        CursorMut {
            node: self.lower_bound_link(key),
            tree: self,
        }
    }

    /// Find the first element with a key equivalent to `key`.
    #[inline]
    pub fn find(&self, key: &K::Key) -> Option<&V> {
        self.find_link(key).map(|x| unsafe { node::value_ref::<V>(x) })
    }

    /// Is there an element with a key equivalent to `key`?
    #[inline]
    pub fn contains(&self, key: &K::Key) -> bool {
        self.find_link(key).is_some()
    }

    /// Count the elements with keys equivalent to `key`.
    pub fn count(&self, key: &K::Key) -> usize {
        let mut x = self.lower_bound_link(key);
        let last = self.upper_bound_link(key);

        let mut count = 0;
        while x != last {
            x = unsafe { node::increment(x) };
            count += 1;
        }

        count
    }

    /// Remove the elements with keys equivalent to `key`, returning how many went.
    pub fn remove(&mut self, key: &K::Key) -> usize {
        let first = self.lower_bound_link(key);
        let last = self.upper_bound_link(key);

        self.erase_links(first, last)
    }

    /// Take out the first element with a key equivalent to `key`.
    pub fn take(&mut self, key: &K::Key) -> Option<V> {
        self.find_link(key).map(|x| unsafe { self.erase(x) })
    }

    /// Remove the elements with keys from `range.start` up to, but not including, `range.end`.
    pub fn remove_range(&mut self, range: Range<&K::Key>) -> usize {
        if self.cmp.less(range.end, range.start) {
            return 0;
        }

        let first = self.lower_bound_link(range.start);
        let last = self.lower_bound_link(range.end);

        self.erase_links(first, last)
    }

    /// Check the structure of the tree.
    ///
    /// This is a linear walk, meant for tests.
    pub fn verify(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(err) => {
                log!(WARNING, "Red-black tree check failed: {}.", err);
                false
            }
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        let header = self.header();
        let root = self.root();

        unsafe {
            if root.is_null() {
                if self.len != 0 {
                    return Err("rootless tree with elements");
                }
                if self.leftmost() != header || self.rightmost() != header {
                    return Err("empty tree with cached ends");
                }
                return Ok(());
            }

            if (*root).color != Color::Black {
                return Err("red root");
            }
            if (*root).parent != header || (*header).color != Color::Red {
                return Err("broken header");
            }
            if self.leftmost() != node::minimum(root) || self.rightmost() != node::maximum(root) {
                return Err("stale cached ends");
            }

            let black_height = node::black_count(self.leftmost(), root);
            let mut count = 0;
            let mut prev: Link = ptr::null_mut();
            let mut x = self.leftmost();

            while x != header {
                let left = (*x).left;
                let right = (*x).right;

                if (*x).color == Color::Red
                    && ((!left.is_null() && (*left).color == Color::Red)
                        || (!right.is_null() && (*right).color == Color::Red))
                {
                    return Err("red node with a red child");
                }
                if (!left.is_null() && (*left).parent != x)
                    || (!right.is_null() && (*right).parent != x)
                {
                    return Err("broken parent link");
                }
                if (left.is_null() || right.is_null())
                    && node::black_count(x, root) != black_height
                {
                    return Err("uneven black height");
                }
                if !prev.is_null() && self.cmp.less(Self::key(x), Self::key(prev)) {
                    return Err("keys out of order");
                }

                count += 1;
                prev = x;
                x = node::increment(x);
            }

            if count != self.len {
                return Err("wrong length");
            }
        }

        Ok(())
    }
}

impl<K, T, C: Compare<K>, A: Alloc> RbTree<(K, T), First, C, A> {
    /// Insert `value` under `key`, handing back the value it replaces.
    pub fn insert(&mut self, key: K, value: T) -> Option<T> {
        match self.find_link(&key) {
            Some(x) => Some(mem::replace(unsafe { &mut node::value::<(K, T)>(x).1 }, value)),
            None => {
                self.insert_unique((key, value));
                None
            }
        }
    }

    /// Get the value under `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&T> {
        self.find(key).map(|(_, value)| value)
    }

    /// Get the value under `key` mutably.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.find_link(key)
            .map(|x| unsafe { &mut node::value::<(K, T)>(x).1 })
    }

    /// Iterate over the entries in order, with mutable values.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<K, T> {
        ValuesMut {
            front: self.leftmost(),
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T, C: Compare<T>, A: Alloc> RbTree<T, Identity, C, A> {
    /// Insert `value`, unless it is already there. Returns whether it was inserted.
    #[inline]
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_unique(value).1
    }
}

impl<V, K, C, A: Alloc> Drop for RbTree<V, K, C, A> {
    fn drop(&mut self) {
        self.clear();
        unsafe { self.header_alloc.deallocate_one(self.header) };
    }
}

impl<V, K, C: Default, A: Alloc> Default for RbTree<V, K, C, A> {
    #[inline]
    fn default() -> RbTree<V, K, C, A> {
        RbTree::with_compare_in(C::default(), A::default())
    }
}

impl<V: Clone, K, C: Clone, A: Alloc> Clone for RbTree<V, K, C, A> {
    /// Copy the tree node for node, shape and colors included.
    fn clone(&self) -> RbTree<V, K, C, A> {
        let mut tree = RbTree::with_compare_in(self.cmp.clone(), self.alloc.inner().clone());

        let src = self.root();
        if src.is_null() {
            return tree;
        }

        unsafe {
            // Every copy is linked in before its children are, so if a clone panics, dropping
            // `tree` frees whatever was copied so far.
            let header = tree.header();
            let root = tree.clone_node(src);
            (*root).parent = header;
            (*header).parent = root;
            tree.copy_children(src, root);

            (*header).left = node::minimum(root);
            (*header).right = node::maximum(root);
        }
        tree.len = self.len;

        tree
    }
}

impl<V: Clone, K, C, A: Alloc> RbTree<V, K, C, A> {
    /// Allocate a copy of `src`, with its color and no links.
    unsafe fn clone_node(&self, src: Link) -> Link {
        let value = node::value_ref::<V>(src).clone();
        let z = match self.create_node(value) {
            Ok(z) => z,
            Err(_) => fail::oom(),
        };
        (*z).color = (*src).color;

        z
    }

    /// Copy the children of `src` below its copy `dst`.
    unsafe fn copy_children(&self, src: Link, dst: Link) {
        let left = (*src).left;
        if !left.is_null() {
            let copy = self.clone_node(left);
            (*copy).parent = dst;
            (*dst).left = copy;
            self.copy_children(left, copy);
        }

        let right = (*src).right;
        if !right.is_null() {
            let copy = self.clone_node(right);
            (*copy).parent = dst;
            (*dst).right = copy;
            self.copy_children(right, copy);
        }
    }
}

impl<V: fmt::Debug, K, C, A: Alloc> fmt::Debug for RbTree<V, K, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<V: PartialEq, K, C, A: Alloc> PartialEq for RbTree<V, K, C, A> {
    fn eq(&self, other: &RbTree<V, K, C, A>) -> bool {
        self.len == other.len && search::equal(self.iter(), other.iter())
    }
}

impl<V: PartialEq, K, C, A: Alloc, const N: usize> PartialEq<[V; N]> for RbTree<V, K, C, A> {
    fn eq(&self, other: &[V; N]) -> bool {
        self.len == N && search::equal(self.iter(), other.iter())
    }
}

impl<V: Eq, K, C, A: Alloc> Eq for RbTree<V, K, C, A> {}

impl<V: PartialOrd, K, C, A: Alloc> PartialOrd for RbTree<V, K, C, A> {
    fn partial_cmp(&self, other: &RbTree<V, K, C, A>) -> Option<Ordering> {
        search::lexicographical_partial_cmp(self.iter(), other.iter())
    }
}

impl<V: Ord, K, C, A: Alloc> Ord for RbTree<V, K, C, A> {
    fn cmp(&self, other: &RbTree<V, K, C, A>) -> Ordering {
        search::lexicographical_cmp(self.iter(), other.iter())
    }
}

/// Extending keeps keys unique. Use `insert_equal` to keep duplicates.
impl<V, K: KeyOf<V>, C: Compare<K::Key>, A: Alloc> Extend<V> for RbTree<V, K, C, A> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert_unique(value);
        }
    }
}

impl<V, K: KeyOf<V>, C: Compare<K::Key> + Default, A: Alloc> FromIterator<V> for RbTree<V, K, C, A> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> RbTree<V, K, C, A> {
        let mut tree = RbTree::default();
        tree.extend(iter);

        tree
    }
}

impl<'a, V, K, C, A: Alloc> IntoIterator for &'a RbTree<V, K, C, A> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, K, C, A: Alloc> IntoIterator for RbTree<V, K, C, A> {
    type Item = V;
    type IntoIter = IntoIter<V, K, C, A>;

    fn into_iter(self) -> IntoIter<V, K, C, A> {
        IntoIter { tree: self }
    }
}

/// An owning in-order iterator over the elements of a tree.
pub struct IntoIter<V, K = Identity, C = Less, A: Alloc = PoolAlloc> {
    tree: RbTree<V, K, C, A>,
}

impl<V, K, C, A: Alloc> Iterator for IntoIter<V, K, C, A> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        self.tree.pop_first()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len, Some(self.tree.len))
    }
}

impl<V, K, C, A: Alloc> DoubleEndedIterator for IntoIter<V, K, C, A> {
    #[inline]
    fn next_back(&mut self) -> Option<V> {
        self.tree.pop_last()
    }
}

impl<V, K, C, A: Alloc> ExactSizeIterator for IntoIter<V, K, C, A> {}

/// A position in a tree, which can remove elements.
pub struct CursorMut<'a, V, K = Identity, C = Less, A: Alloc = PoolAlloc> {
    node: Link,
    tree: &'a mut RbTree<V, K, C, A>,
}

impl<'a, V, K, C, A: Alloc> CursorMut<'a, V, K, C, A> {
    /// Is this the end position?
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node == self.tree.header()
    }

    /// The element here, if any.
    #[inline]
    pub fn get(&self) -> Option<&V> {
        if self.is_end() {
            None
        } else {
            Some(unsafe { node::value_ref::<V>(self.node) })
        }
    }

    /// A read-only cursor at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<V> {
        Cursor::new(self.node, self.tree.header())
    }

    /// Move to the next element, or from the end to the first.
    #[inline]
    pub fn move_next(&mut self) {
        self.node = unsafe { node::increment(self.node) };
    }

    /// Move to the previous element, or from the end to the last.
    #[inline]
    pub fn move_prev(&mut self) {
        self.node = unsafe { node::decrement(self.node) };
    }

    /// Remove the element here, and move to the next one.
    ///
    /// At the end, this does nothing.
    pub fn remove_current(&mut self) -> Option<V> {
        if self.is_end() {
            return None;
        }

        let z = self.node;
        unsafe {
            self.node = node::increment(z);
            Some(self.tree.erase(z))
        }
    }
}

impl<'a, K, T, C, A: Alloc> CursorMut<'a, (K, T), First, C, A> {
    /// The value of the entry here, if any.
    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut T> {
        if self.is_end() {
            None
        } else {
            Some(unsafe { &mut node::value::<(K, T)>(self.node).1 })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::functional::Greater;

    use std::rc::Rc;

    const KEYS: [i32; 9] = [10, 7, 8, 15, 5, 6, 11, 13, 12];

    #[test]
    fn test_insert() {
        let mut set: Set<i32> = Set::new();
        assert!(set.verify());

        for (n, &key) in KEYS.iter().enumerate() {
            assert!(set.insert(key));
            assert!(set.verify());
            assert_eq!(set.len(), n + 1);
        }

        assert_eq!(set, [5, 6, 7, 8, 10, 11, 12, 13, 15]);
        assert_eq!(set.first(), Some(&5));
        assert_eq!(set.last(), Some(&15));
    }

    #[test]
    fn test_insert_unique() {
        let mut set: Set<i32> = KEYS.iter().cloned().collect();

        let (cursor, inserted) = set.insert_unique(8);
        assert!(!inserted);
        assert_eq!(cursor.get(), Some(&8));

        let (cursor, inserted) = set.insert_unique(9);
        assert!(inserted);
        assert_eq!(cursor.get(), Some(&9));
        assert_eq!(set.len(), KEYS.len() + 1);
        assert!(set.verify());
    }

    #[test]
    fn test_insert_equal() {
        let mut map = Map::new();
        map.insert_equal((1, 'a'));
        map.insert_equal((1, 'b'));
        map.insert_equal((0, 'c'));
        map.insert_equal((2, 'd'));
        map.insert_equal((1, 'e'));
        assert!(map.verify());

        assert_eq!(map.count(&1), 3);
        assert_eq!(map, [(0, 'c'), (1, 'a'), (1, 'b'), (1, 'e'), (2, 'd')]);

        let (mut first, last) = map.equal_range(&1);
        let mut run = Vec::new();
        while first != last {
            run.push(first.get().unwrap().1);
            first.move_next();
        }
        assert_eq!(run, ['a', 'b', 'e']);
    }

    #[test]
    fn test_remove() {
        let mut set: Set<i32> = Set::new();
        for i in 0..200 {
            set.insert(i * 37 % 200);
        }
        assert!(set.verify());

        for i in (0..200).filter(|i| i % 2 == 0) {
            assert_eq!(set.remove(&i), 1);
            assert!(set.verify());
        }
        assert_eq!(set.remove(&0), 0);

        assert_eq!(set.len(), 100);
        assert!(set.iter().cloned().eq((0..200).filter(|i| i % 2 == 1)));

        while let Some(x) = set.pop_first() {
            assert!(!set.contains(&x));
            assert!(set.verify());
        }
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
    }

    #[test]
    fn test_remove_equal() {
        let mut set: Set<i32> = Set::new();
        for i in 0..30 {
            set.insert_equal(i % 3);
        }
        assert_eq!(set.count(&1), 10);

        assert_eq!(set.remove(&1), 10);
        assert!(set.verify());
        assert_eq!(set.len(), 20);
        assert!(!set.contains(&1));
        assert_eq!(set.count(&2), 10);
    }

    #[test]
    fn test_bounds() {
        let set: Set<i32> = [10, 20, 30, 40].iter().cloned().collect();

        assert_eq!(set.lower_bound(&20).get(), Some(&20));
        assert_eq!(set.upper_bound(&20).get(), Some(&30));
        assert_eq!(set.lower_bound(&25).get(), Some(&30));
        assert_eq!(set.lower_bound(&5).get(), Some(&10));
        assert!(set.lower_bound(&45).is_end());
        assert!(set.upper_bound(&40).is_end());

        let (lo, hi) = set.equal_range(&25);
        assert_eq!(lo, hi);

        assert_eq!(set.find(&30), Some(&30));
        assert_eq!(set.find(&31), None);
    }

    #[test]
    fn test_remove_range() {
        let mut set: Set<i32> = (0..50).collect();

        assert_eq!(set.remove_range(&10..&20), 10);
        assert!(set.verify());
        assert_eq!(set.len(), 40);
        assert!(!set.contains(&15));
        assert!(set.contains(&20));

        assert_eq!(set.remove_range(&30..&25), 0);
        assert_eq!(set.remove_range(&-5..&100), 40);
        assert!(set.is_empty());
        assert!(set.verify());
    }

    #[test]
    fn test_cursor() {
        let set: Set<i32> = [3, 1, 2].iter().cloned().collect();

        let mut cursor = set.cursor_front();
        assert_eq!(cursor.get(), Some(&1));
        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.get(), Some(&3));
        cursor.move_next();
        assert!(cursor.is_end());
        cursor.move_next();
        assert_eq!(cursor.get(), Some(&1));
        cursor.move_prev();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert_eq!(cursor.get(), Some(&3));
        assert_eq!(cursor, set.cursor_back());

        let empty: Set<i32> = Set::new();
        let mut cursor = empty.cursor_front();
        assert!(cursor.is_end());
        cursor.move_next();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert!(cursor.is_end());
    }

    #[test]
    fn test_cursor_mut() {
        let mut set: Set<i32> = (0..20).collect();

        {
            let mut cursor = set.cursor_front_mut();
            while let Some(&x) = cursor.get() {
                if x % 3 == 0 {
                    assert_eq!(cursor.remove_current(), Some(x));
                } else {
                    cursor.move_next();
                }
            }
            assert_eq!(cursor.remove_current(), None);
        }

        assert!(set.verify());
        assert!(set.iter().cloned().eq((0..20).filter(|x| x % 3 != 0)));

        let mut cursor = set.lower_bound_mut(&10);
        assert_eq!(cursor.get(), Some(&10));
        cursor.move_prev();
        assert_eq!(cursor.remove_current(), Some(8));
        assert_eq!(cursor.get(), Some(&10));
    }

    #[test]
    fn test_map() {
        let mut map = Map::new();
        assert_eq!(map.insert("b", 2), None);
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("b", 20), Some(2));

        assert_eq!(map.get(&"b"), Some(&20));
        assert_eq!(map.get(&"c"), None);

        *map.get_mut(&"a").unwrap() += 10;
        for (_, value) in map.values_mut() {
            *value *= 2;
        }
        assert_eq!(map, [("a", 22), ("b", 40)]);

        {
            let mut cursor = map.cursor_back_mut();
            *cursor.value_mut().unwrap() = 0;
        }
        assert_eq!(map.take(&"b"), Some(("b", 0)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_compare() {
        let mut set = Set::with_compare(Greater);
        set.extend([3, 9, 1, 7]);
        assert!(set.verify());
        assert_eq!(set, [9, 7, 3, 1]);
        assert_eq!(set.lower_bound(&5).get(), Some(&3));

        let mut by_len = Set::with_compare(|a: &&str, b: &&str| a.len() < b.len());
        by_len.insert_unique("ccc");
        by_len.insert_unique("a");
        assert!(!by_len.insert_unique("b").1);
        assert_eq!(by_len, ["a", "ccc"]);
    }

    #[test]
    fn test_clone() {
        let mut set: Set<i32> = (0..100).map(|i| i * 7 % 100).collect();
        let copy = set.clone();
        assert!(copy.verify());
        assert_eq!(set, copy);

        set.remove(&50);
        assert_ne!(set, copy);
        assert!(copy.contains(&50));

        let empty: Set<i32> = Set::new();
        assert!(empty.clone().verify());
    }

    #[test]
    fn test_cmp() {
        let a: Set<i32> = [1, 2, 3].iter().cloned().collect();
        let b: Set<i32> = [1, 2, 4].iter().cloned().collect();
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
    }

    #[test]
    fn test_into_iter() {
        let set: Set<i32> = (0..10).collect();
        let mut iter = set.into_iter();
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(9));
        assert_eq!(iter.collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7, 8]);

        let set: Set<i32> = (0..10).collect();
        assert!(set.iter().rev().cloned().eq((0..10).rev()));
    }

    #[test]
    fn test_drops() {
        let token = Rc::new(());
        {
            let mut map = Map::new();
            for i in 0..50 {
                map.insert(i, token.clone());
            }
            assert_eq!(Rc::strong_count(&token), 51);

            map.remove_range(&0..&10);
            assert_eq!(Rc::strong_count(&token), 41);

            let copy = map.clone();
            assert_eq!(Rc::strong_count(&token), 81);
            drop(copy);
        }
        assert_eq!(Rc::strong_count(&token), 1);
    }
}
