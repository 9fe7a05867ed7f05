//! Ordering and key-extraction policies.

/// A strict weak ordering.
///
/// Closures `Fn(&T, &T) -> bool` are orderings as well, so a comparison can be passed inline.
pub trait Compare<T: ?Sized> {
    /// Is `a` ordered before `b`?
    fn less(&self, a: &T, b: &T) -> bool;

    /// Are `a` and `b` equivalent, i.e. neither ordered before the other?
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Ascending order, through `PartialOrd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Less;

impl<T: PartialOrd + ?Sized> Compare<T> for Less {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Descending order, through `PartialOrd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Greater;

impl<T: PartialOrd + ?Sized> Compare<T> for Greater {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for F {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Key extraction.
///
/// The ordered containers store values, and order them by a key derived from each value.
pub trait KeyOf<V> {
    /// The key type.
    type Key: ?Sized;

    /// Get the key of `value`.
    fn key(value: &V) -> &Self::Key;
}

/// The value is its own key. This makes a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<V> KeyOf<V> for Identity {
    type Key = V;

    #[inline]
    fn key(value: &V) -> &V {
        value
    }
}

/// The key is the first half of a pair. This makes a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct First;

impl<K, T> KeyOf<(K, T)> for First {
    type Key = K;

    #[inline]
    fn key(value: &(K, T)) -> &K {
        &value.0
    }
}
