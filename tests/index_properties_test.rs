//! Sparse Index Property Tests
//!
//! Invariants of the index a completed raster pass leaves behind, checked
//! over generated series.
//!
//! Run: cargo test --test index_properties_test

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use trueno_raster::prelude::*;

const DOMAIN: f64 = 1000.0;

fn draw_series(x: Vec<f64>, y: Vec<f64>, width: u32, chunk_size: usize) -> (Series, PassReport) {
    let chart = Rc::new(RefCell::new(Chart::new(width, 50)));
    let series = SeriesBuilder::new("prop")
        .data(SeriesData::from_xy(x, y).unwrap())
        .options(RasterOptions {
            chunk_size,
            ..RasterOptions::default()
        })
        .axes(Axes::new(
            LinearAxis::horizontal((0.0, DOMAIN), width).unwrap(),
            LinearAxis::vertical((0.0, DOMAIN), 50).unwrap(),
        ))
        .build(&chart);

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let report = runtime.block_on(series.draw()).unwrap();
    (series, report)
}

fn sorted_series() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.0..DOMAIN, 0.0..DOMAIN), 0..2000).prop_map(|mut points| {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.into_iter().unzip()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Sorted data never indexes more columns than the plot has, plus one.
    #[test]
    fn prop_index_bounded_by_width(
        (x, y) in sorted_series(),
        width in 2u32..400,
        chunk_size in 1usize..700,
    ) {
        let n = x.len();
        let (series, report) = draw_series(x, y, width, chunk_size);

        prop_assert!(report.index_len <= width as usize + 1);
        prop_assert_eq!(report.index_len, series.index_len());
        prop_assert_eq!(n == 0, report.index_len == 0);
    }

    /// Sources increase strictly, stay in range, and neighbours differ in column.
    #[test]
    fn prop_index_ordering(
        points in prop::collection::vec((0.0..DOMAIN, 0.0..DOMAIN), 1..1500),
        chunk_size in 1usize..500,
    ) {
        let n = points.len();
        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let (series, report) = draw_series(x, y, 120, chunk_size);
        let entries = series.index_entries();

        prop_assert_eq!(report.outcome, PassOutcome::Completed);
        prop_assert_eq!(entries[0].source_index, 0);
        for pair in entries.windows(2) {
            prop_assert!(pair[0].source_index < pair[1].source_index);
            prop_assert_ne!(pair[0].pixel_x, pair[1].pixel_x);
        }
        prop_assert!(entries.iter().all(|e| e.source_index < n));
    }

    /// Chunking changes neither the index nor the pixels.
    #[test]
    fn prop_chunk_size_does_not_change_result(
        (x, y) in sorted_series(),
        chunk_size in 1usize..300,
    ) {
        let (chunked, report) = draw_series(x.clone(), y.clone(), 200, chunk_size);
        let (whole, _) = draw_series(x, y, 200, usize::MAX);

        prop_assert_eq!(report.yields, report.chunks.saturating_sub(1));
        prop_assert_eq!(chunked.index_entries(), whole.index_entries());
        prop_assert_eq!(
            chunked.with_buffer(Framebuffer::to_compact_pixels),
            whole.with_buffer(Framebuffer::to_compact_pixels)
        );
    }

    /// Exactly one final publish, and it is the last one.
    #[test]
    fn prop_single_final_publish((x, y) in sorted_series()) {
        let (_, report) = draw_series(x, y, 100, 64);

        let finals = report
            .publishes
            .iter()
            .filter(|p| matches!(p, PublishMark::Final))
            .count();
        prop_assert_eq!(finals, 1);
        prop_assert_eq!(report.publishes.last(), Some(&PublishMark::Final));
    }
}
