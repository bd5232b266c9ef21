//! Benchmarks for board generation.
//!
//! This benchmark suite measures the staged enumeration pipeline and the
//! rejection sampler on the standard board types.
//!
//! # Benchmarks
//!
//! - **`generate_all_12`**: Enumerates every valid 12-sector board in
//!   memory. Measures the full pipeline, stage ordering included.
//! - **`sampler_12`**: Draws one valid 12-sector board from a fixed seed.
//!   Measures the shuffle-and-reject loop.
//!
//! # Test Data
//!
//! The sampler uses three fixed seeds so runs stay reproducible while
//! covering rejection loops of different lengths.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench pipeline
//! ```

use std::{hint, str::FromStr as _, time::Duration};

use criterion::{BenchmarkId, Criterion, PlottingBackend, criterion_group, criterion_main};
use skysearch_generator::{BoardSampler, BoardSeed, BoardType};

const SEEDS: [&str; 3] = [
    "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1",
    "a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3",
    "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
];

fn bench_generate_all(c: &mut Criterion) {
    let board_type = BoardType::standard(12).unwrap();
    c.bench_function("generate_all_12", |b| {
        b.iter(|| hint::black_box(&board_type).generate_all().unwrap());
    });
}

fn bench_sampler(c: &mut Criterion) {
    let board_type = BoardType::standard(12).unwrap();
    let sampler = BoardSampler::new(board_type);

    for (i, seed) in SEEDS.into_iter().enumerate() {
        let seed = BoardSeed::from_str(seed).unwrap();
        c.bench_with_input(
            BenchmarkId::new("sampler_12", format!("seed_{i}")),
            &seed,
            |b, &seed| {
                b.iter(|| sampler.sample_with_seed(hint::black_box(seed)));
            },
        );
    }
}

criterion_group!(
    name = benches;
    config =
        Criterion::default()
            .plotting_backend(PlottingBackend::Plotters)
            .measurement_time(Duration::from_secs(12));
    targets =
        bench_generate_all,
        bench_sampler
);
criterion_main!(benches);
