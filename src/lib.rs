//! # Trueno-Raster
//!
//! Chunked asynchronous rasterization of very large chart series.
//!
//! Series with tens or hundreds of thousands of points are drawn into an
//! off-screen RGBA buffer instead of one vector shape per point. The draw pass
//! walks the data in bounded chunks, yielding to the runtime between them,
//! periodically publishes the buffer into the scene as an embedded PNG, and
//! keeps a sparse, pixel-column de-duplicated index for hit-testing.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::{cell::RefCell, rc::Rc};
//! use trueno_raster::prelude::*;
//!
//! let chart = Rc::new(RefCell::new(Chart::new(800, 400)));
//! let series = SeriesBuilder::new("sensor")
//!     .data(SeriesData::from_xy(xs, ys)?)
//!     .style(SeriesStyle::line().color(Rgba::BLUE))
//!     .build(&chart);
//!
//! let report = series.draw().await?;
//! let tooltip = series.search_point((120.0, 40.0));
//! ```
//!
//! Passes are `!Send`: run them on a current-thread runtime, inside a
//! `tokio::task::LocalSet` when several are spawned.
//!
//! ## Algorithms
//!
//! - **Bresenham**: line stepping, with Liang-Barsky clipping for wide strokes
//! - **Midpoint circle**: marker stamping
//! - **SIMD nearest point**: brute-force distance kernel over the sparse index

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Data-to-pixel axis transforms.
pub mod axis;

/// Series data storage.
pub mod data;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization primitives.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

/// Scene graph.
pub mod scene;

/// Host chart: plot area, scene, loading indicator.
pub mod chart;

// ============================================================================
// Raster Pipeline
// ============================================================================

/// Chunked cooperative iteration.
pub mod scheduler;

/// Off-screen raster surface.
pub mod surface;

/// Per-pass drawing state.
pub mod session;

/// Sparse hit-test index.
pub mod index;


/// Raster and vector rendering strategies.
pub mod strategy;

/// Series and the draw pass.
pub mod series;

// ============================================================================
// Configuration & Error Types
// ============================================================================

/// YAML configuration.
pub mod config;

/// Error types for trueno-raster operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use trueno_raster::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::axis::{Axes, AxisTransform, LinearAxis};
    pub use crate::chart::{Chart, PlotArea};
    pub use crate::color::Rgba;
    pub use crate::config::{Config, Marker, RasterOptions, SeriesKind, SeriesStyle};
    pub use crate::data::SeriesData;
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::hit_test::{DataRow, Point, PointResolver};
    pub use crate::index::{IndexEntry, SearchDimension, SearchHit, SparseIndex};
    pub use crate::series::{PassOutcome, PassReport, Series, SeriesBuilder};
    pub use crate::session::PublishMark;
    pub use crate::strategy::{RasterStrategy, RenderingStrategy, VectorStrategy};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
