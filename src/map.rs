use core::{borrow::Borrow, cmp::Ordering, fmt, ops::Index};

use crate::{RedBlackTree, NIL};

/// An ordered map based on a [red-black tree].
///
/// Unlike [`RedBlackTree`], each key maps to at most one value.
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RedBlackMap<K: Ord, V> {
    tree: RedBlackTree<MapNode<K, V>>,
}

// Ordered by key alone, so that the node can be looked up through `Borrow<K>`.
#[derive(Clone)]
struct MapNode<K, V> {
    key: K,
    value: V,
}

impl<K: Ord, V> PartialEq for MapNode<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for MapNode<K, V> {}

impl<K: Ord, V> PartialOrd for MapNode<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for MapNode<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for MapNode<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

impl<K: Ord, V> RedBlackMap<K, V> {
    /// Creates a new, empty `RedBlackMap`.
    pub fn new() -> Self {
        Self {
            tree: RedBlackTree::new(),
        }
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains a value associated with `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.search(key).key().map(|node| &node.value)
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.tree.search_id(key) {
            NIL => None,
            id => Some(&mut self.tree.key_mut(id).value),
        }
    }

    /// Associates `value` with `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.get_mut(&key) {
            Some(slot) => Some(core::mem::replace(slot, value)),
            None => {
                self.tree.insert(MapNode { key, value });
                None
            }
        }
    }

    /// Removes the value associated with `key` from the map.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.delete(key).map(|node| node.value)
    }

    /// Returns the first key-value pair in the map.
    ///
    /// The returned key is the minimum key in the map.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree
            .minimum()
            .key()
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the last key-value pair in the map.
    ///
    /// The returned key is the maximum key in the map.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree
            .maximum()
            .key()
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the key-value pairs of the map, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.tree.keys().map(|node| (&node.key, &node.value))
    }

    /// Clears the map, removing all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.tree.assert_invariants();
    }
}

impl<K: Ord, V> Default for RedBlackMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Index<&K> for RedBlackMap<K, V> {
    type Output = V;

    /// Returns a reference to the value associated with `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RedBlackMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_after_insert() {
        let mut map = RedBlackMap::new();
        assert_eq!(map.insert(67, 3), None);
        assert_eq!(map[&67], 3);
    }

    #[test]
    fn insert_replaces() {
        let mut map = RedBlackMap::new();
        map.insert("a", 1);
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"a"), Some(&2));
        map.assert_invariants();
    }

    #[test]
    fn get_mut_and_remove() {
        let mut map: RedBlackMap<u32, String> = (0..32).map(|k| (k, k.to_string())).collect();
        map.assert_invariants();

        map.get_mut(&7).unwrap().push('!');
        assert_eq!(map.get(&7).map(String::as_str), Some("7!"));

        assert_eq!(map.remove(&7).as_deref(), Some("7!"));
        assert_eq!(map.remove(&7), None);
        assert!(!map.contains_key(&7));
        assert_eq!(map.len(), 31);
        map.assert_invariants();

        assert_eq!(map.first_key_value().map(|(k, _)| *k), Some(0));
        assert_eq!(map.last_key_value().map(|(k, _)| *k), Some(31));
        assert!(map.iter().map(|(k, _)| *k).eq((0..32).filter(|&k| k != 7)));

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.first_key_value(), None);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_missing_panics() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        let _ = map[&1];
    }
}
