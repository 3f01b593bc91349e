#![cfg(not(target_arch = "wasm32"))]
//! Criterion benchmarks for macroblock reconstruction.
//!
//! Run with: cargo bench --bench reconstruct_benchmark

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use zenvp8::{
    ChromaMode, FilterType, IntraMode, LoopFilterConfig, LumaMode, MacroblockData, PixelLayout,
    Unstoppable, UpsamplingMethod, YuvFrame,
};

const SIZES: &[(u32, u32)] = &[(256, 256), (1024, 768)];

fn macroblocks(width: u32, height: u32) -> Vec<MacroblockData> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let count = (width.div_ceil(16) * height.div_ceil(16)) as usize;
    (0..count)
        .map(|_| {
            let luma = LumaMode::from_index(rng.gen_range(0..5)).unwrap_or_default();
            let chroma = ChromaMode::from_index(rng.gen_range(0..4)).unwrap_or_default();
            let mut mb = MacroblockData::new(luma, chroma);
            for mode in &mut mb.sub_modes {
                *mode = IntraMode::ALL[rng.gen_range(0..IntraMode::ALL.len())];
            }
            for c in mb.coeffs.iter_mut().step_by(3) {
                *c = rng.gen_range(-200..=200);
            }
            mb
        })
        .collect()
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for &(width, height) in SIZES {
        let mbs = macroblocks(width, height);
        group.throughput(Throughput::Elements(u64::from(width * height)));

        for (name, filter_type) in [("simple", FilterType::Simple), ("normal", FilterType::Normal)] {
            let config = LoopFilterConfig::new().filter_type(filter_type).level(32);
            let mut frame = YuvFrame::new(width, height, config).unwrap();
            group.bench_with_input(
                BenchmarkId::new(name, format!("{width}x{height}")),
                &mbs,
                |b, mbs| {
                    b.iter(|| {
                        frame.reset();
                        frame.reconstruct_all(black_box(mbs), &Unstoppable).unwrap();
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_yuv_to_rgb(c: &mut Criterion) {
    let mut group = c.benchmark_group("yuv_to_rgb");

    for &(width, height) in SIZES {
        let mut frame = YuvFrame::new(width, height, LoopFilterConfig::new()).unwrap();
        frame
            .reconstruct_all(&macroblocks(width, height), &Unstoppable)
            .unwrap();
        let mut out = vec![0u8; frame.rgb_len(PixelLayout::Rgba)];
        group.throughput(Throughput::Elements(u64::from(width * height)));

        for (name, method) in [
            ("bilinear", UpsamplingMethod::Bilinear),
            ("simple", UpsamplingMethod::Simple),
        ] {
            group.bench_function(BenchmarkId::new(name, format!("{width}x{height}")), |b| {
                b.iter(|| {
                    frame
                        .fill_rgb(black_box(&mut out), PixelLayout::Rgba, method)
                        .unwrap();
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_reconstruct, bench_yuv_to_rgb);
criterion_main!(benches);
