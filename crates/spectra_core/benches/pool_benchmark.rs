//! # Effect Pool Benchmark
//!
//! REQUIREMENTS:
//! - Spawning into a full pool stays O(1)
//! - A full retain pass over 1024 slots stays well under a microsecond per slot
//!
//! Run with: `cargo bench --package spectra_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectra_core::EffectPool;

#[derive(Default)]
struct Payload {
    elapsed: u32,
    max_lifetime: u32,
    position: [f32; 2],
}

/// Benchmark: acquire into a saturated pool (every call evicts).
fn bench_acquire_with_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire_full_pool");

    for capacity in [64_usize, 256, 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut pool: EffectPool<Payload> = EffectPool::new(capacity);
                let mut tick = 0_u64;
                for _ in 0..capacity {
                    pool.acquire(tick, |p| p.max_lifetime = 60);
                    tick += 1;
                }
                b.iter(|| {
                    tick += 1;
                    black_box(pool.acquire(tick, |p| p.max_lifetime = 60));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: one lifecycle-style retain pass.
fn bench_retain_pass(c: &mut Criterion) {
    c.bench_function("retain_mut_1024", |b| {
        let mut pool: EffectPool<Payload> = EffectPool::new(1024);
        b.iter(|| {
            while pool.active_count() < 1024 {
                pool.acquire(0, |p| p.max_lifetime = 8);
            }
            black_box(pool.retain_mut(|_, p| {
                p.elapsed += 1;
                p.position[0] += 0.5;
                p.elapsed < p.max_lifetime
            }))
        });
    });
}

criterion_group!(benches, bench_acquire_with_eviction, bench_retain_pass);
criterion_main!(benches);
