//! Tree nodes and the rebalancing algorithms.
//!
//! Everything here works on untyped node links, so the color and shape logic is compiled once
//! rather than for every value type.
//!
//! The header is a red node outside the tree: its `parent` is the root, and its `left` and
//! `right` are the minimum and maximum. The root's parent is the header. Being red is what tells
//! the header apart from the (black) root when walking up.

use core::ptr;

/// The color of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// The links of a node.
#[repr(C)]
pub(crate) struct NodeBase {
    pub color: Color,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

/// A node: its links, then the value.
#[repr(C)]
pub(crate) struct Node<V> {
    pub base: NodeBase,
    pub value: V,
}

/// A possibly null link to a node.
pub(crate) type Link = *mut NodeBase;

impl NodeBase {
    /// A new red node with no links.
    pub const fn new() -> NodeBase {
        NodeBase {
            color: Color::Red,
            parent: ptr::null_mut(),
            left: ptr::null_mut(),
            right: ptr::null_mut(),
        }
    }
}

/// Get the value of the node behind `x`.
///
/// `x` must not be the header.
#[inline]
pub(crate) unsafe fn value<'a, V>(x: Link) -> &'a mut V {
    &mut (*(x as *mut Node<V>)).value
}

/// Get the value of the node behind `x`, for reading.
///
/// Read-only paths use this rather than `value`.
#[inline]
pub(crate) unsafe fn value_ref<'a, V>(x: Link) -> &'a V {
    &(*(x as *const Node<V>)).value
}

#[inline]
unsafe fn is_red(x: Link) -> bool {
    !x.is_null() && (*x).color == Color::Red
}

#[inline]
unsafe fn is_black(x: Link) -> bool {
    !is_red(x)
}

/// Is `x` the header?
///
/// The header is the only red node that is its own grandparent (or has no parent at all, in an
/// empty tree).
#[inline]
pub(crate) unsafe fn is_header(x: Link) -> bool {
    (*x).color == Color::Red && ((*x).parent.is_null() || (*(*x).parent).parent == x)
}

/// The leftmost node below `x`.
#[inline]
pub(crate) unsafe fn minimum(mut x: Link) -> Link {
    while !(*x).left.is_null() {
        x = (*x).left;
    }

    x
}

/// The rightmost node below `x`.
#[inline]
pub(crate) unsafe fn maximum(mut x: Link) -> Link {
    while !(*x).right.is_null() {
        x = (*x).right;
    }

    x
}

/// The in-order successor of `x`.
///
/// The successor of the maximum is the header, and the successor of the header is the minimum
/// (or the header again, if the tree is empty).
pub(crate) unsafe fn increment(mut x: Link) -> Link {
    if is_header(x) {
        return (*x).left;
    }

    if !(*x).right.is_null() {
        return minimum((*x).right);
    }

    let mut y = (*x).parent;
    while x == (*y).right {
        x = y;
        y = (*y).parent;
    }
    // Walking up from the maximum when the root has no right child ends with `x` at the header
    // and `y` at the root; then `x` is already the answer.
    if (*x).right != y {
        x = y;
    }

    x
}

/// The in-order predecessor of `x`.
///
/// The predecessor of the header is the maximum, and the predecessor of the minimum is the header.
pub(crate) unsafe fn decrement(mut x: Link) -> Link {
    if is_header(x) {
        return (*x).right;
    }

    if !(*x).left.is_null() {
        return maximum((*x).left);
    }

    let mut y = (*x).parent;
    while x == (*y).left && !is_header(y) {
        x = y;
        y = (*y).parent;
    }

    y
}

unsafe fn rotate_left(x: Link, root: *mut Link) {
    let y = (*x).right;
    (*x).right = (*y).left;
    if !(*y).left.is_null() {
        (*(*y).left).parent = x;
    }
    (*y).parent = (*x).parent;

    if x == *root {
        *root = y;
    } else if x == (*(*x).parent).left {
        (*(*x).parent).left = y;
    } else {
        (*(*x).parent).right = y;
    }
    (*y).left = x;
    (*x).parent = y;
}

unsafe fn rotate_right(x: Link, root: *mut Link) {
    let y = (*x).left;
    (*x).left = (*y).right;
    if !(*y).right.is_null() {
        (*(*y).right).parent = x;
    }
    (*y).parent = (*x).parent;

    if x == *root {
        *root = y;
    } else if x == (*(*x).parent).right {
        (*(*x).parent).right = y;
    } else {
        (*(*x).parent).left = y;
    }
    (*y).right = x;
    (*x).parent = y;
}

/// Restore the coloring after linking the leaf `x` into the tree rooted at `*root`.
pub(crate) unsafe fn rebalance(mut x: Link, root: *mut Link) {
    (*x).color = Color::Red;

    while x != *root && (*(*x).parent).color == Color::Red {
        let xp = (*x).parent;
        let xpp = (*xp).parent;

        if xp == (*xpp).left {
            let uncle = (*xpp).right;
            if is_red(uncle) {
                // Push the red up.
                (*xp).color = Color::Black;
                (*uncle).color = Color::Black;
                (*xpp).color = Color::Red;
                x = xpp;
            } else {
                if x == (*xp).right {
                    // Inner child: make it an outer one.
                    x = xp;
                    rotate_left(x, root);
                }
                (*(*x).parent).color = Color::Black;
                (*(*(*x).parent).parent).color = Color::Red;
                rotate_right((*(*x).parent).parent, root);
            }
        } else {
            let uncle = (*xpp).left;
            if is_red(uncle) {
                (*xp).color = Color::Black;
                (*uncle).color = Color::Black;
                (*xpp).color = Color::Red;
                x = xpp;
            } else {
                if x == (*xp).left {
                    x = xp;
                    rotate_right(x, root);
                }
                (*(*x).parent).color = Color::Black;
                (*(*(*x).parent).parent).color = Color::Red;
                rotate_left((*(*x).parent).parent, root);
            }
        }
    }

    (**root).color = Color::Black;
}

/// Unlink `z` from the tree of `header`, and restore the coloring.
///
/// A node with two children first trades places (and colors) with its successor, so the node
/// actually cut out has at most one child. `z` itself is what ends up unlinked; the caller frees
/// it.
pub(crate) unsafe fn rebalance_for_erase(z: Link, header: Link) {
    let root: *mut Link = &mut (*header).parent;
    let leftmost: *mut Link = &mut (*header).left;
    let rightmost: *mut Link = &mut (*header).right;

    let mut y = z;
    let mut x;
    let mut x_parent;

    if (*y).left.is_null() {
        x = (*y).right;
    } else if (*y).right.is_null() {
        x = (*y).left;
    } else {
        y = minimum((*y).right);
        x = (*y).right;
    }

    if y != z {
        // Put the successor `y` where `z` is.
        (*(*z).left).parent = y;
        (*y).left = (*z).left;

        if y != (*z).right {
            x_parent = (*y).parent;
            if !x.is_null() {
                (*x).parent = (*y).parent;
            }
            (*(*y).parent).left = x;
            (*y).right = (*z).right;
            (*(*z).right).parent = y;
        } else {
            x_parent = y;
        }

        if *root == z {
            *root = y;
        } else if (*(*z).parent).left == z {
            (*(*z).parent).left = y;
        } else {
            (*(*z).parent).right = y;
        }
        (*y).parent = (*z).parent;

        // `z` now stands where `y` was removed, color included.
        core::mem::swap(&mut (*y).color, &mut (*z).color);
    } else {
        x_parent = (*y).parent;
        if !x.is_null() {
            (*x).parent = (*y).parent;
        }

        if *root == z {
            *root = x;
        } else if (*(*z).parent).left == z {
            (*(*z).parent).left = x;
        } else {
            (*(*z).parent).right = x;
        }

        if *leftmost == z {
            *leftmost = if (*z).right.is_null() { (*z).parent } else { minimum(x) };
        }
        if *rightmost == z {
            *rightmost = if (*z).left.is_null() { (*z).parent } else { maximum(x) };
        }
    }

    if (*z).color == Color::Red {
        return;
    }

    // A black node is gone: `x` carries an extra black until it can be absorbed.
    while x != *root && is_black(x) {
        if x == (*x_parent).left {
            let mut w = (*x_parent).right;
            if is_red(w) {
                (*w).color = Color::Black;
                (*x_parent).color = Color::Red;
                rotate_left(x_parent, root);
                w = (*x_parent).right;
            }

            if is_black((*w).left) && is_black((*w).right) {
                (*w).color = Color::Red;
                x = x_parent;
                x_parent = (*x_parent).parent;
            } else {
                if is_black((*w).right) {
                    (*(*w).left).color = Color::Black;
                    (*w).color = Color::Red;
                    rotate_right(w, root);
                    w = (*x_parent).right;
                }
                (*w).color = (*x_parent).color;
                (*x_parent).color = Color::Black;
                if !(*w).right.is_null() {
                    (*(*w).right).color = Color::Black;
                }
                rotate_left(x_parent, root);
                break;
            }
        } else {
            let mut w = (*x_parent).left;
            if is_red(w) {
                (*w).color = Color::Black;
                (*x_parent).color = Color::Red;
                rotate_right(x_parent, root);
                w = (*x_parent).left;
            }

            if is_black((*w).right) && is_black((*w).left) {
                (*w).color = Color::Red;
                x = x_parent;
                x_parent = (*x_parent).parent;
            } else {
                if is_black((*w).left) {
                    (*(*w).right).color = Color::Black;
                    (*w).color = Color::Red;
                    rotate_left(w, root);
                    w = (*x_parent).left;
                }
                (*w).color = (*x_parent).color;
                (*x_parent).color = Color::Black;
                if !(*w).left.is_null() {
                    (*(*w).left).color = Color::Black;
                }
                rotate_right(x_parent, root);
                break;
            }
        }
    }

    if !x.is_null() {
        (*x).color = Color::Black;
    }
}

/// The number of black nodes from `x` up to `root`, both included.
pub(crate) unsafe fn black_count(mut x: Link, root: Link) -> usize {
    if x.is_null() {
        return 0;
    }

    let mut count = 0;
    loop {
        if (*x).color == Color::Black {
            count += 1;
        }
        if x == root {
            return count;
        }
        x = (*x).parent;
    }
}
