//! Benchmarks for this crate's [`SkipList`].

use std::thread;

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use kv_skiplist::{SkipList, SkipListOptions};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Benchmarking sizes.
const SIZES: [usize; 5] = [1, 10, 100, 1000, 10_000];

fn filled(size: usize, rng: &mut StdRng) -> SkipList<u64, u64> {
    let mut sl = SkipListOptions::new()
        .seed(0x1234_abcd)
        .build()
        .expect("default max height is valid");
    sl.extend(std::iter::repeat_with(|| (rng.random(), rng.random())).take(size));
    sl
}

/// Benchmarking insertion of random keys.
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let sl = filled(size, &mut rng);

            b.iter(|| {
                sl.insert(rng.random(), rng.random());
            });
        });
    }
}

/// Benchmarking floor search of random keys.
pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Search");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let sl = filled(size, &mut rng);
            let probes: Vec<u64> = std::iter::repeat_with(|| rng.random()).take(10).collect();

            b.iter(|| {
                for probe in &probes {
                    black_box(sl.search(probe));
                }
            });
        });
    }
}

/// Benchmarking an insert immediately followed by the removal of the same
/// key, which keeps the size of the list constant.
pub fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Insert Remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let sl = filled(size, &mut rng);

            b.iter(|| {
                let key = rng.random();
                sl.insert(key, key);
                black_box(sl.remove(&key));
            });
        });
    }
}

/// Benchmarking searches while other threads keep mutating the list.
pub fn contended(c: &mut Criterion) {
    c.bench_function("SkipList Contended Search", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let sl = filled(10_000, &mut rng);
        let probes: Vec<u64> = std::iter::repeat_with(|| rng.random()).take(10).collect();

        b.iter(|| {
            thread::scope(|s| {
                for seed in 0..2 {
                    let sl = &sl;
                    s.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        for _ in 0..100 {
                            let key = rng.random();
                            sl.insert(key, key);
                            sl.remove(&key);
                        }
                    });
                }
                for probe in &probes {
                    black_box(sl.search(probe));
                }
            });
        });
    });
}
