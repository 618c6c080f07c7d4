//! Sparse point index for hit-testing.
//!
//! A raster series never materializes per-point objects. Instead the draw
//! pass records one [`IndexEntry`] per visited pixel column, which bounds the
//! index by the plot width rather than by the number of points. Nearest-point
//! queries run against this index.
//!
//! The distance kernel is vectorized with trueno; the index of a full-width
//! chart holds a few thousand entries at most, so a linear scan is cheaper
//! than maintaining a tree that is rebuilt on every pass.

use serde::{Deserialize, Serialize};
use trueno::Vector;

/// One visited pixel column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// Rounded horizontal pixel coordinate.
    pub pixel_x: i32,
    /// Vertical pixel coordinate as returned by the axis.
    pub pixel_y: f64,
    /// Position of the originating point in the series data.
    pub source_index: usize,
}

/// Raw result of a nearest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Horizontal pixel coordinate of the match.
    pub pixel_x: i32,
    /// Vertical pixel coordinate of the match.
    pub pixel_y: f64,
    /// Position of the originating point in the series data.
    pub source_index: usize,
    /// Distance from the pointer in pixels.
    pub dist: f64,
}

/// Distance metric used by nearest-point queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDimension {
    /// Horizontal distance only (tooltips follow the pointer's column).
    #[default]
    X,
    /// Euclidean distance.
    XY,
}

/// Pixel-column de-duplicated point index.
///
/// Entries are appended in data order. [`SparseIndex::record`] skips a point
/// whose column equals the column of the entry recorded just before it, so
/// consecutive entries never share `pixel_x` and `source_index` is strictly
/// increasing.
#[derive(Debug, Clone, Default)]
pub struct SparseIndex {
    entries: Vec<IndexEntry>,
}

impl SparseIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index holding every given entry, without de-duplication.
    ///
    /// Used for vector series, which search the full point set.
    #[must_use]
    pub fn dense(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record a visited point, unless its column repeats the previous entry's.
    ///
    /// Returns `true` if an entry was appended.
    pub fn record(&mut self, pixel_x: i32, pixel_y: f64, source_index: usize) -> bool {
        if self.entries.last().is_some_and(|last| last.pixel_x == pixel_x) {
            return false;
        }
        self.entries.push(IndexEntry {
            pixel_x,
            pixel_y,
            source_index,
        });
        true
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in recording order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Find the entry nearest to `pointer` (plot-area pixel coordinates).
    ///
    /// Ties resolve to the earliest entry. Returns `None` on an empty index.
    #[must_use]
    pub fn nearest(&self, pointer: (f64, f64), dimension: SearchDimension) -> Option<SearchHit> {
        if self.entries.is_empty() {
            return None;
        }

        let squared = self
            .squared_distances_simd(pointer, dimension)
            .unwrap_or_else(|| self.squared_distances_scalar(pointer, dimension));

        let (best, _) = squared
            .iter()
            .enumerate()
            .fold((0, f32::INFINITY), |(best, best_d), (i, &d)| {
                if d < best_d {
                    (i, d)
                } else {
                    (best, best_d)
                }
            });

        let entry = self.entries[best];
        let dx = f64::from(entry.pixel_x) - pointer.0;
        let dy = entry.pixel_y - pointer.1;
        let dist = match dimension {
            SearchDimension::X => dx.abs(),
            SearchDimension::XY => dx.hypot(dy),
        };

        Some(SearchHit {
            pixel_x: entry.pixel_x,
            pixel_y: entry.pixel_y,
            source_index: entry.source_index,
            dist,
        })
    }

    /// Squared distances via trueno's SIMD backends.
    fn squared_distances_simd(
        &self,
        pointer: (f64, f64),
        dimension: SearchDimension,
    ) -> Option<Vec<f32>> {
        let n = self.entries.len();
        let xs = Vector::from_vec(self.entries.iter().map(|e| e.pixel_x as f32).collect());
        let dx = xs.add(&Vector::from_vec(vec![-(pointer.0 as f32); n])).ok()?;
        let dx2 = dx.mul(&dx).ok()?;

        let total = match dimension {
            SearchDimension::X => dx2,
            SearchDimension::XY => {
                let ys = Vector::from_vec(self.entries.iter().map(|e| e.pixel_y as f32).collect());
                let dy = ys.add(&Vector::from_vec(vec![-(pointer.1 as f32); n])).ok()?;
                let dy2 = dy.mul(&dy).ok()?;
                dx2.add(&dy2).ok()?
            }
        };

        Some(total.as_slice().to_vec())
    }

    fn squared_distances_scalar(&self, pointer: (f64, f64), dimension: SearchDimension) -> Vec<f32> {
        self.entries
            .iter()
            .map(|e| {
                let dx = e.pixel_x as f32 - pointer.0 as f32;
                let dy = e.pixel_y as f32 - pointer.1 as f32;
                match dimension {
                    SearchDimension::X => dx * dx,
                    SearchDimension::XY => dx * dx + dy * dy,
                }
            })
            .collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Consecutive entries never share a column, sources strictly increase.
        #[test]
        fn prop_record_invariants(columns in prop::collection::vec(-5i32..5, 0..400)) {
            let mut index = SparseIndex::new();
            for (i, &x) in columns.iter().enumerate() {
                index.record(x, 0.0, i);
            }

            for pair in index.entries().windows(2) {
                prop_assert_ne!(pair[0].pixel_x, pair[1].pixel_x);
                prop_assert!(pair[0].source_index < pair[1].source_index);
            }
            for entry in index.entries() {
                prop_assert!(entry.source_index < columns.len());
            }
        }

        /// The SIMD kernel agrees with a scalar scan.
        #[test]
        fn prop_nearest_matches_brute_force(
            points in prop::collection::vec((0i32..200, 0.0f64..100.0), 1..100),
            px in 0.0f64..200.0,
            py in 0.0f64..100.0,
        ) {
            let index = SparseIndex::dense(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, &(x, y))| IndexEntry { pixel_x: x, pixel_y: y, source_index: i })
                    .collect(),
            );

            let hit = index.nearest((px, py), SearchDimension::XY).unwrap();
            let best = points
                .iter()
                .map(|&(x, y)| (f64::from(x) - px).hypot(y - py))
                .fold(f64::INFINITY, f64::min);
            prop_assert!((hit.dist - best).abs() < 1e-2);
        }
    }
}
