//! Mining performance benchmarks
//!
//! Criterion benchmarks for the hot path of the search loop: nonce
//! hashing, the difficulty predicate, and the per-find policy math.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mining::policy::{self, DifficultyPolicy};
use mining::pow;

fn bench_nonce_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonce_hashing");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hash_small_nonce", |b| {
        let nonce = black_box(42u64);
        b.iter(|| pow::hash_nonce(nonce))
    });

    group.bench_function("hash_large_nonce", |b| {
        let nonce = black_box(999_999_999u64);
        b.iter(|| pow::hash_nonce(nonce))
    });

    group.finish();
}

fn bench_difficulty_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("difficulty_check");
    let digest = pow::hash_nonce(123_456_789);

    for difficulty in [1u32, 5, 10].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty),
            difficulty,
            |b, &difficulty| {
                let digest = black_box(digest.as_str());
                b.iter(|| pow::meets_difficulty(digest, difficulty))
            },
        );
    }

    group.finish();
}

fn bench_search_attempt(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_attempt");
    group.throughput(Throughput::Elements(1));

    // One full attempt as the worker performs it: hash, then test.
    group.bench_function("hash_and_check", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            let digest = pow::hash_nonce(black_box(nonce));
            nonce = nonce.wrapping_add(1);
            pow::meets_difficulty(&digest, black_box(5))
        })
    });

    group.finish();
}

fn bench_policy_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_math");

    group.bench_function("difficulty_adjustment", |b| {
        let policy = black_box(DifficultyPolicy::default());
        b.iter(|| policy.next_difficulty(black_box(5), black_box(7.5)))
    });

    group.bench_function("reward_halving", |b| {
        b.iter(|| policy::halve_reward_if_due(black_box(6.25), black_box(10)))
    });

    group.bench_function("running_average", |b| {
        b.iter(|| policy::running_average(black_box(120.0), black_box(4.5), black_box(25)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_nonce_hashing,
    bench_difficulty_check,
    bench_search_attempt,
    bench_policy_math,
);

criterion_main!(benches);
