//! A mutable k-d tree with map semantics and k-nearest-neighbor search.

#![warn(missing_docs)]

mod index;
mod knn;
mod node;
mod queue;

pub use index::KdTree;
pub use knn::{DistanceMetric, Manhattan, Neighbor, SquaredEuclidean};
pub use queue::BoundedPriorityQueue;

#[cfg(test)]
mod test;

use crate::point::KdKey;

/// Advances the splitting axis by one level, wrapping at the key dimension.
#[inline]
pub(crate) fn next_axis<K: KdKey>(axis: usize) -> usize {
    (axis + 1) % K::DIM
}
