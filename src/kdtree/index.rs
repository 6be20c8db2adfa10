use tinyvec::TinyVec;

use crate::compare::{AxisCompare, Natural};
use crate::error::{KdIndexError, Result};
use crate::kdtree::next_axis;
use crate::kdtree::node::{Link, Node};
use crate::point::KdKey;

/// A mutable k-d tree mapping multi-dimensional keys to values.
///
/// The tree cycles through the key's axes as depth increases: a node at depth
/// `d` splits its subtree on axis `d mod DIM` under the comparator's predicate
/// for that axis. Keys that compare equal on **every** axis are the same
/// logical key, so inserting one again overwrites the stored value in place.
///
/// The tree is not self-balancing. Lookups and inserts are O(log n) expected
/// for randomly ordered insertions and O(n) in the worst case; deletion
/// rebuilds the removed node's subtree and is O(size of that subtree).
///
/// ```
/// use kd_index::kdtree::KdTree;
/// use kd_index::Point;
///
/// let mut tree: KdTree<Point<i32, 2>, &str> = KdTree::new();
/// tree.insert(Point::new([3, 7]), "a");
/// tree.insert(Point::new([3, 7]), "b"); // upsert
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree.find(&Point::new([3, 7])), Ok(&"b"));
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<K, V, C = Natural> {
    pub(crate) root: Link<K, V>,
    pub(crate) comparator: C,
}

impl<K: KdKey, V, C: AxisCompare<K>> KdTree<K, V, C> {
    /// Create an empty tree with the default comparator.
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Create an empty tree ordered by the given comparator.
    pub fn with_comparator(comparator: C) -> Self {
        debug_assert!(K::DIM > 0, "key dimension must be at least 1");
        Self {
            root: None,
            comparator,
        }
    }

    /// The comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The number of axes of this tree's keys.
    pub const fn dimension() -> usize {
        K::DIM
    }

    /// Returns `true` if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of entries in the tree.
    ///
    /// Counted by full traversal, not cached: O(n).
    pub fn len(&self) -> usize {
        Self::count(&self.root)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Insert a key/value pair, returning a reference to the stored value.
    ///
    /// If a key comparing equal on every axis already exists, its value is
    /// overwritten in place and the tree's shape does not change.
    pub fn insert(&mut self, key: K, value: V) -> &mut V {
        let slot = Self::insert_slot(&self.comparator, &mut self.root, &key, 0);
        match *slot {
            Some(ref mut node) => {
                node.value = value;
                &mut node.value
            }
            None => {
                let node = slot.insert(Box::new(Node::new(key, value)));
                &mut node.value
            }
        }
    }

    /// Look up the value stored under a key.
    ///
    /// # Errors
    ///
    /// [`KdIndexError::NotFound`] if no key compares equal on every axis.
    pub fn find(&self, key: &K) -> Result<&V> {
        Self::find_at(&self.comparator, &self.root, key, 0).map(|node| &node.value)
    }

    /// Look up the value stored under a key, mutably.
    ///
    /// # Errors
    ///
    /// [`KdIndexError::NotFound`] if no key compares equal on every axis.
    pub fn find_mut(&mut self, key: &K) -> Result<&mut V> {
        Self::find_at_mut(&self.comparator, &mut self.root, key, 0).map(|node| &mut node.value)
    }

    /// Returns `true` if a key comparing equal on every axis exists.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_ok()
    }

    /// Look up a key, inserting a default value first if it is absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let slot = Self::insert_slot(&self.comparator, &mut self.root, &key, 0);
        match *slot {
            Some(ref mut node) => &mut node.value,
            None => {
                let node = slot.insert(Box::new(Node::new(key, V::default())));
                &mut node.value
            }
        }
    }

    /// Remove the entry whose key compares equal on every axis, returning the
    /// number of entries removed (0 or 1).
    ///
    /// The search descends only on strict inequality: a key that ties with an
    /// unequal node on that node's splitting axis is reported as absent
    /// (count 0) rather than guessed at.
    ///
    /// Removal detaches the located node's entire subtree, drops the node and
    /// re-inserts the detached nodes below the vacated position, starting at
    /// the axis that position occupies. This is O(size of the subtree) and
    /// performs no rebalancing elsewhere in the tree.
    pub fn erase(&mut self, key: &K) -> usize {
        Self::erase_at(&self.comparator, &mut self.root, key, 0)
    }

    /// Per-axis equality: no axis predicate holds in either direction.
    fn keys_equal(comparator: &C, a: &K, b: &K) -> bool {
        (0..K::DIM)
            .all(|axis| !comparator.axis_less(axis, a, b) && !comparator.axis_less(axis, b, a))
    }

    /// Walks to the link where `key` lives or belongs: either the node whose
    /// key compares equal on every axis, or the empty link where an insertion
    /// would place it.
    pub(crate) fn insert_slot<'a>(
        comparator: &C,
        link: &'a mut Link<K, V>,
        key: &K,
        axis: usize,
    ) -> &'a mut Link<K, V> {
        let go_left = match *link {
            Some(ref node) if !Self::keys_equal(comparator, &node.key, key) => {
                comparator.axis_less(axis, key, &node.key)
            }
            _ => return link,
        };
        let node = link.as_mut().expect("checked Some above");
        if go_left {
            Self::insert_slot(comparator, &mut node.left, key, next_axis::<K>(axis))
        } else {
            Self::insert_slot(comparator, &mut node.right, key, next_axis::<K>(axis))
        }
    }

    fn find_at<'a>(
        comparator: &C,
        link: &'a Link<K, V>,
        key: &K,
        axis: usize,
    ) -> Result<&'a Node<K, V>> {
        match link.as_deref() {
            None => Err(KdIndexError::NotFound),
            Some(node) => {
                if Self::keys_equal(comparator, &node.key, key) {
                    Ok(node)
                } else if comparator.axis_less(axis, key, &node.key) {
                    Self::find_at(comparator, &node.left, key, next_axis::<K>(axis))
                } else {
                    Self::find_at(comparator, &node.right, key, next_axis::<K>(axis))
                }
            }
        }
    }

    fn find_at_mut<'a>(
        comparator: &C,
        link: &'a mut Link<K, V>,
        key: &K,
        axis: usize,
    ) -> Result<&'a mut Node<K, V>> {
        match link.as_deref_mut() {
            None => Err(KdIndexError::NotFound),
            Some(node) => {
                if Self::keys_equal(comparator, &node.key, key) {
                    Ok(node)
                } else if comparator.axis_less(axis, key, &node.key) {
                    Self::find_at_mut(comparator, &mut node.left, key, next_axis::<K>(axis))
                } else {
                    Self::find_at_mut(comparator, &mut node.right, key, next_axis::<K>(axis))
                }
            }
        }
    }

    fn erase_at(comparator: &C, link: &mut Link<K, V>, key: &K, axis: usize) -> usize {
        match *link {
            None => 0,
            Some(ref mut node) if !Self::keys_equal(comparator, &node.key, key) => {
                if comparator.axis_less(axis, key, &node.key) {
                    Self::erase_at(comparator, &mut node.left, key, next_axis::<K>(axis))
                } else if comparator.axis_less(axis, &node.key, key) {
                    Self::erase_at(comparator, &mut node.right, key, next_axis::<K>(axis))
                } else {
                    // Tied on this axis against an unequal key: no unique
                    // direction to descend, so the key is reported absent.
                    0
                }
            }
            Some(_) => {
                Self::rebuild_without_root(comparator, link, axis);
                1
            }
        }
    }

    /// Replaces the subtree at `link` with the same nodes minus its root.
    ///
    /// The removed node's descendants are detached into a flat pre-order list
    /// (left side first), then re-inserted one by one, by node identity,
    /// below the vacated link. Re-insertion starts at `axis`, the axis the
    /// removed node occupied, so the k-d invariant holds for the new subtree
    /// at its existing depth.
    fn rebuild_without_root(comparator: &C, link: &mut Link<K, V>, axis: usize) {
        let Some(mut removed) = link.take() else {
            return;
        };

        // Use TinyVec to avoid heap allocations for small subtrees
        let mut detached: TinyVec<[Link<K, V>; 16]> = TinyVec::new();
        Self::flatten_preorder(&mut removed.left, &mut detached);
        Self::flatten_preorder(&mut removed.right, &mut detached);
        drop(removed);

        for entry in detached {
            if let Some(node) = entry {
                let slot = Self::insert_slot(comparator, link, &node.key, axis);
                *slot = Some(node);
            }
        }
    }

    /// Moves every node of the subtree into `out` in pre-order, severing all
    /// child links so each entry is a bare node.
    fn flatten_preorder(link: &mut Link<K, V>, out: &mut TinyVec<[Link<K, V>; 16]>) {
        if let Some(mut node) = link.take() {
            let mut left = node.left.take();
            let mut right = node.right.take();
            out.push(Some(node));
            Self::flatten_preorder(&mut left, out);
            Self::flatten_preorder(&mut right, out);
        }
    }

    fn count(link: &Link<K, V>) -> usize {
        match link.as_deref() {
            None => 0,
            Some(node) => 1 + Self::count(&node.left) + Self::count(&node.right),
        }
    }
}

impl<K, V, C: Default> Default for KdTree<K, V, C> {
    fn default() -> Self {
        Self {
            root: None,
            comparator: C::default(),
        }
    }
}

impl<K: KdKey, V, C: AxisCompare<K>> Extend<(K, V)> for KdTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: KdKey, V, C: AxisCompare<K> + Default> FromIterator<(K, V)> for KdTree<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
