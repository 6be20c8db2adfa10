//! K-nearest-neighbor search over the tree.

use num_traits::ToPrimitive;

use crate::compare::AxisCompare;
use crate::kdtree::next_axis;
use crate::kdtree::node::Node;
use crate::kdtree::queue::BoundedPriorityQueue;
use crate::kdtree::KdTree;
use crate::point::{KdKey, Point};

/// A distance abstraction for KNN queries, supplied per call and not stored.
///
/// `axis_distance` measures along a single axis only and drives backtracking
/// pruning, so it must be consistent with `distance`: on any axis it must
/// never exceed the aggregate distance between the same two keys. Both of the
/// built-in metrics ([`SquaredEuclidean`], [`Manhattan`]) satisfy this.
pub trait DistanceMetric<K> {
    /// The totally ordered scalar both distances are measured in.
    type Distance: PartialOrd;

    /// Monotone aggregate distance between two keys.
    fn distance(&self, a: &K, b: &K) -> Self::Distance;

    /// Distance between two keys measured along `axis` only.
    fn axis_distance(&self, axis: usize, a: &K, b: &K) -> Self::Distance;
}

/// One KNN candidate: a distance and a reference to the stored value.
///
/// The reference is borrowed from the tree and is valid only while the tree
/// is not mutated. Ordering (and therefore equality) considers the distance
/// alone, which is what the candidate queue keys on.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, D, V> {
    /// Aggregate distance from the query key to this entry's key.
    pub distance: D,
    /// The entry's value.
    pub value: &'a V,
}

impl<D: PartialOrd, V> PartialEq for Neighbor<'_, D, V> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<D: PartialOrd, V> Eq for Neighbor<'_, D, V> {}

impl<D: PartialOrd, V> Ord for Neighbor<'_, D, V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // We don't allow NaN. This should only panic on NaN
        self.distance.partial_cmp(&other.distance).unwrap()
    }
}

impl<D: PartialOrd, V> PartialOrd for Neighbor<'_, D, V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: KdKey, V, C: AxisCompare<K>> KdTree<K, V, C> {
    /// The up-to-`k` entries nearest to `key` under the given metric.
    ///
    /// A recursive branch-and-bound traversal: each visited node is offered
    /// to a bounded candidate queue of capacity `k`, the child on the query's
    /// side is searched first, and the far child is searched only if the
    /// distance to the node's splitting hyperplane is smaller than the
    /// current k-th best distance (or fewer than `k` candidates are held).
    ///
    /// Results are returned in the candidate heap's order — worst kept
    /// distance first, **not** ascending — matching the queue's storage.
    /// Sort the result for ascending distances. `k == 0` returns an empty
    /// result without traversing.
    pub fn knn_search<'a, M>(
        &'a self,
        k: usize,
        metric: &M,
        key: &K,
    ) -> Vec<Neighbor<'a, M::Distance, V>>
    where
        M: DistanceMetric<K>,
    {
        // A zero limit would mean "unbounded" to the queue.
        if k == 0 {
            return Vec::new();
        }
        let mut queue = BoundedPriorityQueue::with_limit(k);
        Self::knn_at(&self.comparator, self.root.as_deref(), 0, metric, key, &mut queue);
        queue.into_inner()
    }

    fn knn_at<'a, M>(
        comparator: &C,
        node: Option<&'a Node<K, V>>,
        axis: usize,
        metric: &M,
        key: &K,
        queue: &mut BoundedPriorityQueue<Neighbor<'a, M::Distance, V>>,
    ) where
        M: DistanceMetric<K>,
    {
        let Some(node) = node else {
            return;
        };

        queue.push(Neighbor {
            distance: metric.distance(&node.key, key),
            value: &node.value,
        });

        // Search the query's side of the splitting hyperplane first.
        let query_on_left = comparator.axis_less(axis, key, &node.key);
        let (near, far) = if query_on_left {
            (&node.left, &node.right)
        } else {
            (&node.right, &node.left)
        };
        let next = next_axis::<K>(axis);
        Self::knn_at(comparator, near.as_deref(), next, metric, key, queue);

        // The far side can only hold a closer point if the hyperplane itself
        // is nearer than the current worst kept candidate.
        let plane = metric.axis_distance(axis, &node.key, key);
        if !queue.is_full() || queue.peek().is_some_and(|worst| plane < worst.distance) {
            Self::knn_at(comparator, far.as_deref(), next, metric, key, queue);
        }
    }
}

/// Squared Euclidean distance: the sum of squared per-axis differences.
///
/// Monotone in true Euclidean distance, so nearest-neighbor results are
/// identical while skipping the square root. Coordinates are converted
/// through `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

/// Manhattan (L1) distance: the sum of absolute per-axis differences.
///
/// Coordinates are converted through `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

#[inline]
fn to_f64<T: ToPrimitive>(value: &T) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

impl<T: ToPrimitive, const D: usize> DistanceMetric<Point<T, D>> for SquaredEuclidean {
    type Distance = f64;

    fn distance(&self, a: &Point<T, D>, b: &Point<T, D>) -> f64 {
        (0..D).map(|axis| self.axis_distance(axis, a, b)).sum()
    }

    #[inline]
    fn axis_distance(&self, axis: usize, a: &Point<T, D>, b: &Point<T, D>) -> f64 {
        let d = to_f64(&a[axis]) - to_f64(&b[axis]);
        d * d
    }
}

impl<T: ToPrimitive, const D: usize> DistanceMetric<Point<T, D>> for Manhattan {
    type Distance = f64;

    fn distance(&self, a: &Point<T, D>, b: &Point<T, D>) -> f64 {
        (0..D).map(|axis| self.axis_distance(axis, a, b)).sum()
    }

    #[inline]
    fn axis_distance(&self, axis: usize, a: &Point<T, D>, b: &Point<T, D>) -> f64 {
        (to_f64(&a[axis]) - to_f64(&b[axis])).abs()
    }
}

macro_rules! impl_tuple_metric {
    ($dim:literal => $(($idx:tt, $t:ident)),+) => {
        impl<$($t: ToPrimitive),+> DistanceMetric<($($t,)+)> for SquaredEuclidean {
            type Distance = f64;

            fn distance(&self, a: &($($t,)+), b: &($($t,)+)) -> f64 {
                let mut total = 0.0;
                $(
                    let d = to_f64(&a.$idx) - to_f64(&b.$idx);
                    total += d * d;
                )+
                total
            }

            fn axis_distance(&self, axis: usize, a: &($($t,)+), b: &($($t,)+)) -> f64 {
                let d = match axis {
                    $($idx => to_f64(&a.$idx) - to_f64(&b.$idx),)+
                    _ => panic!("Invalid axis {} for a {}-dimensional key", axis, $dim),
                };
                d * d
            }
        }

        impl<$($t: ToPrimitive),+> DistanceMetric<($($t,)+)> for Manhattan {
            type Distance = f64;

            fn distance(&self, a: &($($t,)+), b: &($($t,)+)) -> f64 {
                let mut total = 0.0;
                $(
                    total += (to_f64(&a.$idx) - to_f64(&b.$idx)).abs();
                )+
                total
            }

            fn axis_distance(&self, axis: usize, a: &($($t,)+), b: &($($t,)+)) -> f64 {
                match axis {
                    $($idx => (to_f64(&a.$idx) - to_f64(&b.$idx)).abs(),)+
                    _ => panic!("Invalid axis {} for a {}-dimensional key", axis, $dim),
                }
            }
        }
    };
}

impl_tuple_metric!(1 => (0, A));
impl_tuple_metric!(2 => (0, A), (1, B));
impl_tuple_metric!(3 => (0, A), (1, B), (2, C));
impl_tuple_metric!(4 => (0, A), (1, B), (2, C), (3, D));
