use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use kd_index::kdtree::{KdTree, SquaredEuclidean};
use kd_index::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type P3 = Point<f64, 3>;

fn random_points(n: usize, seed: u64) -> Vec<P3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new([
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..1000.0),
            ])
        })
        .collect()
}

fn construction(c: &mut Criterion) {
    let points = random_points(10_000, 42);

    c.bench_function("insert 10k random 3-D points", |b| {
        b.iter(|| {
            let mut tree: KdTree<P3, usize> = KdTree::new();
            for (i, point) in points.iter().enumerate() {
                tree.insert(*point, i);
            }
            black_box(tree.is_empty())
        })
    });
}

fn knn(c: &mut Criterion) {
    let tree: KdTree<P3, usize> = random_points(100_000, 42)
        .into_iter()
        .enumerate()
        .map(|(i, p)| (p, i))
        .collect();
    let queries = random_points(256, 7);

    let mut group = c.benchmark_group("knn_search on 100k points");
    for k in [1, 10, 100] {
        group.bench_function(format!("k={k}"), |b| {
            let mut cursor = 0;
            b.iter(|| {
                let query = &queries[cursor % queries.len()];
                cursor += 1;
                black_box(tree.knn_search(k, &SquaredEuclidean, query).len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, construction, knn);
criterion_main!(benches);
