//! # Ribbon Benchmark
//!
//! Resampling, strip building and the three-pass composite for typical
//! effect polylines.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spectra_core::Vec2;
use spectra_rendering::compositor::{CompositeParams, Material, MultiPassCompositor, RecordingSink};
use spectra_rendering::geometry::{resample_into, ColorProfile, PrimitiveSettings, RibbonBuilder, WidthProfile};
use spectra_shared::RibbonLimits;

fn wave(points: usize) -> Vec<Vec2> {
    (0..points)
        .map(|i| {
            let x = 10.0 + i as f32 * 12.0;
            Vec2::new(x, 300.0 + (x * 0.05).sin() * 40.0)
        })
        .collect()
}

// =============================================================================
// GEOMETRY
// =============================================================================

fn bench_resample(c: &mut Criterion) {
    let points = wave(12);
    let mut out = Vec::with_capacity(64);

    c.bench_function("resample_12_to_40", |b| {
        b.iter(|| {
            resample_into(black_box(&points), 40, &mut out);
            black_box(out.len())
        });
    });
}

fn bench_build(c: &mut Criterion) {
    let points = wave(40);
    let settings = PrimitiveSettings::new(
        WidthProfile::inverse_lerp_bump(2.0, 16.0),
        ColorProfile::gradient(
            spectra_core::Color::rgb(0.3, 0.8, 1.0),
            spectra_core::Color::rgb(0.6, 0.2, 1.0),
        ),
    );
    let mut builder = RibbonBuilder::new(RibbonLimits::default());

    c.bench_function("build_ribbon_40", |b| {
        b.iter(|| black_box(builder.build(black_box(&points), &settings).vertices.len()));
    });
}

// =============================================================================
// COMPOSITE
// =============================================================================

fn bench_composite(c: &mut Criterion) {
    let points = wave(12);
    let width = WidthProfile::quadratic_bump(16.0);
    let color = ColorProfile::Solid(spectra_core::Color::rgb(0.4, 0.9, 1.0));
    let params = CompositeParams::new(2.5, 0.4);
    let mut compositor = MultiPassCompositor::new(RibbonLimits::default());
    let mut sink = RecordingSink::new();

    c.bench_function("composite_three_pass", |b| {
        b.iter(|| {
            sink.clear();
            let outcome = compositor.render(
                black_box(&points),
                &width,
                &color,
                &params,
                Material::FlatColor,
                &mut sink,
            );
            black_box(outcome.vertices)
        });
    });
}

criterion_group!(benches, bench_resample, bench_build, bench_composite);
criterion_main!(benches);
