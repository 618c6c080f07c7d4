//! Rasterization of geometric primitives.
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: Fast non-antialiased line drawing, widened with a square brush
//! - **Midpoint Circle**: Filled circle rendering for scatter markers
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;

pub use primitives::{draw_circle, draw_line, draw_polyline, draw_thick_line};
