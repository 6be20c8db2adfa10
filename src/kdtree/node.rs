/// An owning link to a subtree. `None` marks the boundary of the tree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single tree node: one key/value pair and two owning child links.
///
/// Nodes carry no parent pointer and no cached size or height; every
/// structural question is answered by traversal. Dropping a node drops its
/// children with it.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }
}
