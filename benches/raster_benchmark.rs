#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for the chunked raster pass and hit-testing.

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_raster::prelude::*;

fn signal(size: usize) -> SeriesData {
    let x: Vec<f64> = (0..size).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..size)
        .map(|i| {
            let t = i as f64 * 0.001;
            t.sin() * 50.0 + (t * 10.0).sin() * 10.0
        })
        .collect();
    SeriesData::from_xy(x, y).expect("columns have equal length")
}

fn draw_pass_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_pass");
    group.sample_size(20);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build");

    for size in [1_000, 10_000, 100_000, 300_000] {
        for (label, style) in [("line", SeriesStyle::line()), ("scatter", SeriesStyle::scatter())] {
            let chart = Rc::new(RefCell::new(Chart::new(800, 600)));
            let series = SeriesBuilder::new("bench")
                .data(signal(size))
                .style(style)
                .build(&chart);

            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    runtime
                        .block_on(series.draw())
                        .expect("draw pass should succeed")
                });
            });
        }
    }

    group.finish();
}

fn search_point_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_point");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build");

    for width in [400, 1_920, 3_840] {
        let chart = Rc::new(RefCell::new(Chart::new(width, 600)));
        let series = SeriesBuilder::new("bench")
            .data(signal(200_000))
            .style(SeriesStyle::scatter())
            .build(&chart);
        runtime
            .block_on(series.draw())
            .expect("draw pass should succeed");

        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| series.search_point(black_box((f64::from(width) / 3.0, 300.0))));
        });
    }

    group.finish();
}

criterion_group!(benches, draw_pass_benchmark, search_point_benchmark);
criterion_main!(benches);
