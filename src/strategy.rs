//! Rendering strategies.
//!
//! A series renders either as one raster image ([`RasterStrategy`]) or as one
//! vector shape per point ([`VectorStrategy`]). The strategy is chosen once,
//! from the point count, when the series is built. The host hooks
//! (`generate_points`, `extremes`, `draw_points`, `draw_tracker`) dispatch
//! through it; for raster series they do nothing because the chunked pass
//! replaces all of them.

use crate::axis::{Axes, Extremes};
use crate::color::Rgba;
use crate::config::SeriesStyle;
use crate::data::SeriesData;
use crate::error::{Error, Result};
use crate::hit_test::{GeneratedResolver, Point, PointResolver, RowResolver};
use crate::output::SvgElement;
use crate::scene::{GroupId, Scene};
use crate::session::DrawMode;
use std::fmt;

/// Stroke width of the invisible hit area laid over vector lines.
const TRACKER_WIDTH: f32 = 20.0;

/// Horizontal and vertical data extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataExtremes {
    /// Extent of x values.
    pub x: Extremes,
    /// Extent of y values.
    pub y: Extremes,
}

/// How a series turns its data into scene content.
pub trait RenderingStrategy: fmt::Debug {
    /// Whether the chunked raster pass draws this series.
    fn is_raster(&self) -> bool;

    /// Build per-point objects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transform`] if a point cannot be placed.
    fn generate_points(&self, data: &SeriesData, axes: &Axes) -> Result<Vec<Point>>;

    /// Data extremes used to fit the axes, if this strategy computes them.
    fn extremes(&self, data: &SeriesData) -> Option<DataExtremes>;

    /// Add the visible shapes for `points` to `group`.
    fn draw_points(&self, points: &[Point], style: &SeriesStyle, scene: &mut Scene, group: GroupId);

    /// Add the invisible hit area for `points` to `group`.
    fn draw_tracker(&self, points: &[Point], scene: &mut Scene, group: GroupId);

    /// Resolver turning index matches into points.
    fn resolver<'a>(&self, data: &'a SeriesData, points: &'a [Point])
        -> Box<dyn PointResolver + 'a>;
}

/// Pick the strategy for a series of `len` points.
#[must_use]
pub fn select(len: usize, raster_threshold: usize) -> Box<dyn RenderingStrategy> {
    if len >= raster_threshold {
        Box::new(RasterStrategy)
    } else {
        Box::new(VectorStrategy)
    }
}

/// Draws through the chunked raster pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterStrategy;

impl RenderingStrategy for RasterStrategy {
    fn is_raster(&self) -> bool {
        true
    }

    fn generate_points(&self, _data: &SeriesData, _axes: &Axes) -> Result<Vec<Point>> {
        Ok(Vec::new())
    }

    fn extremes(&self, _data: &SeriesData) -> Option<DataExtremes> {
        None
    }

    fn draw_points(&self, _: &[Point], _: &SeriesStyle, _: &mut Scene, _: GroupId) {}

    fn draw_tracker(&self, _: &[Point], _: &mut Scene, _: GroupId) {}

    fn resolver<'a>(
        &self,
        data: &'a SeriesData,
        _points: &'a [Point],
    ) -> Box<dyn PointResolver + 'a> {
        Box::new(RowResolver::new(data.rows()))
    }
}

/// Draws one scene element per point.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorStrategy;

impl RenderingStrategy for VectorStrategy {
    fn is_raster(&self) -> bool {
        false
    }

    fn generate_points(&self, data: &SeriesData, axes: &Axes) -> Result<Vec<Point>> {
        data.rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let plot_x = axes.x.to_pixels(row.x, true).ok_or(Error::Transform {
                    value: row.x,
                    index,
                    reason: "x axis cannot place value",
                })?;
                let plot_y = axes.y.to_pixels(row.y, true).ok_or(Error::Transform {
                    value: row.y,
                    index,
                    reason: "y axis cannot place value",
                })?;
                Ok(Point {
                    index,
                    x: row.x,
                    y: row.y,
                    name: row.name.clone(),
                    plot_x,
                    plot_y,
                    dist: None,
                })
            })
            .collect()
    }

    fn extremes(&self, data: &SeriesData) -> Option<DataExtremes> {
        Some(DataExtremes {
            x: Extremes::of(data.x())?,
            y: Extremes::of(data.y())?,
        })
    }

    fn draw_points(&self, points: &[Point], style: &SeriesStyle, scene: &mut Scene, group: GroupId) {
        match DrawMode::for_style(style) {
            DrawMode::Line { width } => scene.push(
                group,
                SvgElement::Polyline {
                    points: plot_coordinates(points),
                    stroke: style.color,
                    stroke_width: width,
                },
            ),
            DrawMode::Marker { radius } => {
                for point in points {
                    scene.push(
                        group,
                        SvgElement::Circle {
                            cx: point.plot_x as f32,
                            cy: point.plot_y as f32,
                            r: radius as f32,
                            fill: style.color,
                        },
                    );
                }
            }
            DrawMode::Skip => {}
        }
    }

    fn draw_tracker(&self, points: &[Point], scene: &mut Scene, group: GroupId) {
        if points.is_empty() {
            return;
        }
        scene.push(
            group,
            SvgElement::Polyline {
                points: plot_coordinates(points),
                stroke: Rgba::TRANSPARENT,
                stroke_width: TRACKER_WIDTH,
            },
        );
    }

    fn resolver<'a>(
        &self,
        _data: &'a SeriesData,
        points: &'a [Point],
    ) -> Box<dyn PointResolver + 'a> {
        Box::new(GeneratedResolver::new(points))
    }
}

fn plot_coordinates(points: &[Point]) -> Vec<(f32, f32)> {
    points
        .iter()
        .map(|p| (p.plot_x as f32, p.plot_y as f32))
        .collect()
}
