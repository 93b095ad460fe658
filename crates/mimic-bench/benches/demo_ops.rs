//! Criterion micro-benchmarks for demonstration framing, scanning, and loading.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mimic_bench::{reference_profile, visual_profile};
use mimic_demo::{encode_demonstration, scan, BinaryCodec, FrameReader};

/// Benchmark: walk every frame of a 10K-step file without decoding.
fn bench_frame_walk_10k(c: &mut Criterion) {
    let (params, steps) = reference_profile(42);
    let bytes = encode_demonstration("bench", &params, &steps).unwrap();

    c.bench_function("frame_walk_10k", |b| {
        b.iter(|| {
            let frames = FrameReader::demonstration(&bytes)
                .map(|f| f.unwrap().payload.len())
                .sum::<usize>();
            black_box(frames);
        });
    });
}

/// Benchmark: scan and decode a 10K-step vector file.
fn bench_scan_reference(c: &mut Criterion) {
    let (params, steps) = reference_profile(42);
    let bytes = encode_demonstration("bench", &params, &steps).unwrap();

    c.bench_function("scan_reference_10k", |b| {
        b.iter(|| {
            let scanned = scan(&bytes, &BinaryCodec).unwrap();
            black_box(&scanned);
        });
    });
}

/// Benchmark: scan and decode a 1K-step file with 84x84 frames.
fn bench_scan_visual(c: &mut Criterion) {
    let (params, steps) = visual_profile(42);
    let bytes = encode_demonstration("bench", &params, &steps).unwrap();

    c.bench_function("scan_visual_1k", |b| {
        b.iter(|| {
            let scanned = scan(&bytes, &BinaryCodec).unwrap();
            black_box(&scanned);
        });
    });
}

/// Benchmark: encode a 10K-step demonstration in memory.
fn bench_encode_reference(c: &mut Criterion) {
    let (params, steps) = reference_profile(42);

    c.bench_function("encode_reference_10k", |b| {
        b.iter(|| {
            let bytes = encode_demonstration("bench", &params, &steps).unwrap();
            black_box(&bytes);
        });
    });
}

criterion_group!(
    benches,
    bench_frame_walk_10k,
    bench_scan_reference,
    bench_scan_visual,
    bench_encode_reference
);
criterion_main!(benches);
