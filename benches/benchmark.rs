use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use bstmap::{AvlTreeMap, BstMap};

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();
    let mut sorted = values.clone();
    sorted.sort();
    sorted.dedup();

    c.bench_function("avl_put", |b| {
        b.iter(|| {
            let mut map = AvlTreeMap::new();
            for value in &values {
                map.put(*value, *value);
            }
            map
        })
    });

    c.bench_function("bst_put", |b| {
        b.iter(|| {
            let mut map = BstMap::new();
            for value in &values {
                map.put(*value, *value);
            }
            map
        })
    });

    c.bench_function("avl_from_sorted", |b| {
        b.iter(|| AvlTreeMap::from_sorted(sorted.iter().map(|&value| (value, value))))
    });

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.put(*value, *value);
    }

    c.bench_function("avl_get", |b| {
        b.iter(|| {
            for value in &values {
                black_box(map.get(value));
            }
        })
    });

    c.bench_function("avl_inorder", |b| b.iter(|| black_box(map.inorder())));

    c.bench_function("avl_remove", |b| {
        b.iter(|| {
            let mut map = map.clone();
            for value in &values {
                map.remove(value);
            }
            map
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
