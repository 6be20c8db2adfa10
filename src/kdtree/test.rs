use std::cell::Cell;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::kdtree::{DistanceMetric, KdTree, SquaredEuclidean};
use crate::point::Point;

type P3 = Point<i32, 3>;

const NEEDLE: [i32; 3] = [301, 501, 601];
const QUERY: [i32; 3] = [300, 500, 600];

/// Counts aggregate-distance evaluations, for pruning regression checks.
struct Counting<'a, M> {
    inner: M,
    calls: &'a Cell<usize>,
}

impl<K, M: DistanceMetric<K>> DistanceMetric<K> for Counting<'_, M> {
    type Distance = M::Distance;

    fn distance(&self, a: &K, b: &K) -> M::Distance {
        self.calls.set(self.calls.get() + 1);
        self.inner.distance(a, b)
    }

    fn axis_distance(&self, axis: usize, a: &K, b: &K) -> M::Distance {
        self.inner.axis_distance(axis, a, b)
    }
}

/// 10k random points plus a planted needle two steps from the query point.
/// Points that would rival the needle are filtered out so the expected
/// nearest neighbor is unambiguous.
///
/// 10k keeps test time down; `benches/knn.rs` covers the 100k scale. The
/// pruning bound asserted below does not depend on the difference: a
/// balanced random tree needs on the order of 2·depth distance
/// evaluations, which stays under 100 at either size.
fn haystack_with_needle(seed: u64) -> KdTree<P3, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree: KdTree<P3, String> = KdTree::new();
    let query = Point::new(QUERY);

    for i in 0..10_000 {
        if i == 5_000 {
            *tree.get_or_default(Point::new(NEEDLE)) = "needle".to_string();
        }
        let key = loop {
            let key = Point::new([
                rng.gen_range(0..=10_000),
                rng.gen_range(0..=10_000),
                rng.gen_range(0..=10_000),
            ]);
            if SquaredEuclidean.distance(&key, &query) > 3.0 {
                break key;
            }
        };
        tree.insert(key, format!("hay{i}"));
    }

    tree
}

#[test]
fn knn_search_finds_the_planted_needle() {
    let tree = haystack_with_needle(1);

    let result = tree.knn_search(1, &SquaredEuclidean, &Point::new(QUERY));
    assert_eq!(result.len(), 1);
    assert_eq!(*result[0].value, "needle");
    assert_eq!(result[0].distance, 3.0);
}

#[test]
fn knn_search_prunes_most_of_the_tree() {
    let tree = haystack_with_needle(2);

    let calls = Cell::new(0);
    let metric = Counting {
        inner: SquaredEuclidean,
        calls: &calls,
    };
    let result = tree.knn_search(1, &metric, &Point::new(QUERY));
    assert_eq!(*result[0].value, "needle");

    // A broken pruning rule degenerates towards visiting all 10k nodes,
    // while a correct one needs roughly 2·depth evaluations. The bound
    // holds with slack for trees two orders of magnitude larger.
    assert!(
        calls.get() < 100,
        "{} distance evaluations for a 1-NN query",
        calls.get()
    );
}

#[test]
fn knn_search_matches_brute_force() {
    let tree = haystack_with_needle(3);
    let query = Point::new([4_000, 4_000, 4_000]);

    let mut result: Vec<f64> = tree
        .knn_search(5, &SquaredEuclidean, &query)
        .iter()
        .map(|n| n.distance)
        .collect();
    result.sort_by(|a, b| a.partial_cmp(b).unwrap());

    // Brute force over every stored key via exhaustive queries is not
    // possible without iteration support, so recompute from the same
    // generation sequence instead.
    let mut brute: Vec<f64> = regenerate_keys(3)
        .iter()
        .map(|key| SquaredEuclidean.distance(key, &query))
        .collect();
    brute.sort_by(|a, b| a.partial_cmp(b).unwrap());
    brute.truncate(5);

    assert_eq!(result, brute);
}

/// The exact keys `haystack_with_needle` inserts for a given seed.
fn regenerate_keys(seed: u64) -> Vec<P3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let query = Point::new(QUERY);
    let mut keys = vec![Point::new(NEEDLE)];
    for _ in 0..10_000 {
        loop {
            let key = Point::new([
                rng.gen_range(0..=10_000),
                rng.gen_range(0..=10_000),
                rng.gen_range(0..=10_000),
            ]);
            if SquaredEuclidean.distance(&key, &query) > 3.0 {
                keys.push(key);
                break;
            }
        }
    }
    // Colliding draws upsert in the tree, so they count once here too.
    keys.sort_by_key(|key| (key[0], key[1], key[2]));
    keys.dedup();
    keys
}

#[test]
fn erase_removes_the_needle() {
    let mut tree = haystack_with_needle(4);
    let needle = Point::new(NEEDLE);

    assert!(tree.contains(&needle));
    assert_eq!(tree.erase(&needle), 1);
    assert!(!tree.contains(&needle));
}

/// Keys whose axis values are all distinct, so every key is reachable by
/// erase's strict-inequality descent.
fn distinct_axis_keys(seed: u64, n: i32) -> Vec<P3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut xs: Vec<i32> = (0..n).collect();
    let mut ys: Vec<i32> = (0..n).collect();
    let mut zs: Vec<i32> = (0..n).collect();
    xs.shuffle(&mut rng);
    ys.shuffle(&mut rng);
    zs.shuffle(&mut rng);
    xs.into_iter()
        .zip(ys)
        .zip(zs)
        .map(|((x, y), z)| Point::new([x, y, z]))
        .collect()
}

#[test]
fn random_erase_bookkeeping() {
    let keys = distinct_axis_keys(5, 500);
    let mut tree: KdTree<P3, usize> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, i))
        .collect();
    assert_eq!(tree.len(), keys.len());

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(6));
    let (gone, kept) = order.split_at(keys.len() / 2);

    for &i in gone {
        assert_eq!(tree.erase(&keys[i]), 1, "failed to erase {:?}", keys[i]);
        assert!(!tree.contains(&keys[i]));
        // A second erase of the same key finds nothing.
        assert_eq!(tree.erase(&keys[i]), 0);
    }

    assert_eq!(tree.len(), keys.len() - gone.len());
    for &i in kept {
        assert_eq!(tree.find(&keys[i]), Ok(&i), "{:?} lost", keys[i]);
    }
}

#[test]
fn random_upsert_bookkeeping() {
    let keys = distinct_axis_keys(7, 200);
    let mut tree: KdTree<P3, usize> = KdTree::new();

    for (i, key) in keys.iter().enumerate() {
        tree.insert(*key, i);
    }
    assert_eq!(tree.len(), keys.len());

    // Re-inserting every key with a new value changes no sizes.
    for (i, key) in keys.iter().enumerate() {
        tree.insert(*key, i + 1_000);
    }
    assert_eq!(tree.len(), keys.len());
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(tree.find(key), Ok(&(i + 1_000)));
    }
}
