//! GPU kernel benchmarks
//!
//! Compares the WGSL expansion and chunking kernels against the host backend.
//!
//! Note: These benchmarks require GPU hardware and are automatically skipped
//! if no GPU is available.

#![cfg(feature = "gpu")]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use trueno_csr::gpu::{gpu_chunk_partition, gpu_expand_offsets, GpuDevice, GpuOffsets};
use trueno_csr::{chunk_partition, expand_offsets, HostStream, SystemAllocator};

/// Power-law-ish degree sequence as offsets
fn generate_offsets(num_groups: usize) -> Vec<u32> {
    let mut offsets = Vec::with_capacity(num_groups + 1);
    offsets.push(0_u32);
    let mut rng_state = 12345_u64; // Simple LCG for reproducibility

    for _ in 0..num_groups {
        rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
        let degree = (rng_state % 16) as u32;
        offsets.push(offsets[offsets.len() - 1] + degree);
    }

    offsets
}

/// Benchmark: GPU expansion vs host expansion
fn bench_gpu_expand(c: &mut Criterion) {
    // Try to create GPU device; skip if unavailable
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let device = match runtime.block_on(GpuDevice::new()) {
        Ok(dev) => dev,
        Err(_) => {
            eprintln!("⚠️  GPU not available - skipping GPU expansion benchmarks");
            return;
        }
    };

    let mut group = c.benchmark_group("expand_comparison");
    let stream = HostStream::global();

    for size in [10_000, 100_000, 1_000_000].iter() {
        let offsets = generate_offsets(*size);

        group.bench_with_input(BenchmarkId::new("host", size), &offsets, |b, offsets| {
            b.iter(|| {
                let ids: Vec<u32> =
                    expand_offsets(&stream, &SystemAllocator, black_box(offsets), 0).unwrap();
                black_box(ids);
            });
        });

        let gpu_offsets = GpuOffsets::upload(&device, &offsets).unwrap();
        group.bench_with_input(
            BenchmarkId::new("gpu", size),
            &(&device, &gpu_offsets),
            |b, (device, gpu_offsets)| {
                b.iter(|| {
                    runtime.block_on(async {
                        let ids = gpu_expand_offsets(black_box(device), black_box(gpu_offsets), 0)
                            .await
                            .unwrap();
                        black_box(ids);
                    });
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: GPU chunking vs host chunking (~1000 chunks)
fn bench_gpu_chunk(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let device = match runtime.block_on(GpuDevice::new()) {
        Ok(dev) => dev,
        Err(_) => {
            eprintln!("⚠️  GPU not available - skipping GPU chunking benchmarks");
            return;
        }
    };

    let mut group = c.benchmark_group("chunk_comparison");
    let stream = HostStream::global();

    for size in [100_000, 1_000_000].iter() {
        let offsets = generate_offsets(*size);
        let num_edges = *offsets.last().unwrap();
        let chunk_size = (num_edges / 1_000).max(1);

        group.bench_with_input(BenchmarkId::new("host", size), &offsets, |b, offsets| {
            b.iter(|| {
                let chunks = chunk_partition(
                    &stream,
                    &SystemAllocator,
                    black_box(offsets),
                    *size as u32,
                    num_edges,
                    chunk_size as usize,
                )
                .unwrap();
                black_box(chunks);
            });
        });

        let gpu_offsets = GpuOffsets::upload(&device, &offsets).unwrap();
        group.bench_with_input(
            BenchmarkId::new("gpu", size),
            &(&device, &gpu_offsets),
            |b, (device, gpu_offsets)| {
                b.iter(|| {
                    runtime.block_on(async {
                        let chunks = gpu_chunk_partition(
                            black_box(device),
                            black_box(gpu_offsets),
                            *size as u32,
                            num_edges,
                            chunk_size,
                        )
                        .await
                        .unwrap();
                        black_box(chunks);
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gpu_expand, bench_gpu_chunk);
criterion_main!(benches);
