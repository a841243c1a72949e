// Throughput benchmarks for the matching engine
use celebmatch_core::Vector;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_vector(rng: &mut StdRng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect();
    Vector::new(data)
}

fn benchmark_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine");
    let mut rng = StdRng::seed_from_u64(7);

    for dim in [128, 384, 768].iter() {
        let a = generate_vector(&mut rng, *dim);
        let b = generate_vector(&mut rng, *dim);
        group.bench_with_input(BenchmarkId::new("pair", dim), dim, |bench, _| {
            bench.iter(|| black_box(a.cosine(black_box(&b))));
        });
    }

    group.finish();
}

fn benchmark_full_store_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_scan");
    let mut rng = StdRng::seed_from_u64(7);

    for size in [100, 1000].iter() {
        let store: Vec<Vector> = (0..*size).map(|_| generate_vector(&mut rng, 384)).collect();
        let subject = generate_vector(&mut rng, 384);

        group.bench_with_input(BenchmarkId::new("users", size), size, |bench, _| {
            bench.iter(|| {
                let scores: Vec<f32> = store
                    .iter()
                    .filter_map(|candidate| subject.cosine(candidate))
                    .collect();
                black_box(scores);
            });
        });
    }

    group.finish();
}

fn benchmark_mean_pooling(c: &mut Criterion) {
    let mut group = c.benchmark_group("mean_pool");
    let mut rng = StdRng::seed_from_u64(7);

    // A heavy poster: a few thousand post vectors pooled into one.
    let posts: Vec<Vec<f32>> = (0..3000)
        .map(|_| (0..384).map(|_| rng.random_range(-1.0f32..1.0)).collect())
        .collect();

    group.bench_function("posts_3000_dim_384", |bench| {
        bench.iter(|| black_box(Vector::mean(black_box(&posts))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_cosine,
    benchmark_full_store_scan,
    benchmark_mean_pooling
);
criterion_main!(benches);
