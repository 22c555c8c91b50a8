mod utils;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drift_report::data::Matrix;
use drift_report::stats::{ks_2samp, welch_t_test};
use drift_report::RandomForestRegressor;
use std::time::Duration;
use utils::{create_data, shifted_sample};

pub fn forest_benchmarks(c: &mut Criterion) {
    // Roughly the size of the four week reference window.
    let (data_vec, y) = create_data(672, 9);
    let data = Matrix::new(&data_vec, y.len(), 9);

    let mut group = c.benchmark_group("forest");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));
    group.bench_function("fit 50 trees", |b| {
        b.iter(|| {
            let mut forest = RandomForestRegressor::default();
            forest.fit(black_box(&data), black_box(&y)).unwrap();
        })
    });

    let mut forest = RandomForestRegressor::default();
    forest.fit(&data, &y).unwrap();
    group.bench_function("predict parallel", |b| {
        b.iter(|| forest.predict(black_box(&data), true))
    });
    group.bench_function("predict serial", |b| {
        b.iter(|| forest.predict(black_box(&data), false))
    });
    group.finish();

    let reference = shifted_sample(672, 0.0, 1);
    let current = shifted_sample(744, 0.2, 2);
    c.bench_function("ks_2samp exact", |b| {
        b.iter(|| ks_2samp(black_box(&reference), black_box(&current)))
    });
    c.bench_function("welch_t_test", |b| {
        b.iter(|| welch_t_test(black_box(&reference), black_box(&current)))
    });
}

criterion_group!(benches, forest_benchmarks);
criterion_main!(benches);
