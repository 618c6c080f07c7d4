//! Per-pass drawing state.
//!
//! A [`DrawSession`] lives for exactly one draw pass. It receives every
//! projected point in data order, records the sparse index, accumulates the
//! pending path (line mode) or marker centers (marker mode), and decides when
//! the pending work is committed to the buffer and when the buffer is due to
//! be published.

use crate::axis::Axes;
use crate::color::Rgba;
use crate::config::{RasterOptions, SeriesStyle};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::index::SparseIndex;
use crate::render::{draw_circle, draw_polyline};
use tracing::trace;

/// Markers larger than this are clamped.
const MAX_MARKER_RADIUS: u32 = 1024;

/// What a pass draws for every point. Chosen once per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    /// Connect points with a stroke of this width.
    Line {
        /// Stroke width in pixels.
        width: f32,
    },
    /// Stamp a filled circle at every point.
    Marker {
        /// Circle radius in pixels.
        radius: i32,
    },
    /// Draw nothing; only the index is built.
    Skip,
}

impl DrawMode {
    /// Positive stroke width wins over a marker.
    #[must_use]
    pub fn for_style(style: &SeriesStyle) -> Self {
        let width = style.effective_line_width();
        if width > 0.0 {
            return Self::Line { width };
        }
        match style.effective_marker() {
            Some(marker) => Self::Marker {
                radius: marker.radius.min(MAX_MARKER_RADIUS) as i32,
            },
            None => Self::Skip,
        }
    }
}

/// A publish performed by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMark {
    /// Mid-pass publish after this many items.
    Progress(usize),
    /// The publish following the final commit.
    Final,
}

/// Map a datum to plot-area pixels: a rounded column and an exact row.
///
/// # Errors
///
/// Returns [`Error::Transform`] if either axis cannot place the value.
pub fn project(axes: &Axes, index: usize, x: f64, y: f64) -> Result<(i32, f64)> {
    let px = axes.x.to_pixels(x, true).ok_or(Error::Transform {
        value: x,
        index,
        reason: "x axis cannot place value",
    })?;
    let py = axes.y.to_pixels(y, true).ok_or(Error::Transform {
        value: y,
        index,
        reason: "y axis cannot place value",
    })?;

    // Saturating float-to-int cast; far off-plot values are clipped at draw time.
    Ok((px.round() as i32, py))
}

/// Transient state of one draw pass.
#[derive(Debug)]
pub struct DrawSession {
    mode: DrawMode,
    color: Rgba,
    len: usize,
    publish_interval: usize,
    flush_interval: usize,
    counter: usize,
    steps_since_commit: usize,
    path: Vec<(i32, i32)>,
    anchor: Option<(i32, i32)>,
    stroke_commits: usize,
    publishes: Vec<PublishMark>,
}

impl DrawSession {
    /// Start a pass over `len` items.
    #[must_use]
    pub fn new(style: &SeriesStyle, options: &RasterOptions, len: usize) -> Self {
        let flush_interval = options.stroke_flush_interval;
        Self {
            mode: DrawMode::for_style(style),
            color: style.color,
            len,
            publish_interval: options.publish_interval,
            flush_interval,
            counter: 0,
            steps_since_commit: 0,
            path: Vec::with_capacity(flush_interval.clamp(1, 4096)),
            anchor: None,
            stroke_commits: 0,
            publishes: Vec::new(),
        }
    }

    /// Visit item `source_index` at `(pixel_x, pixel_y)`.
    ///
    /// Returns `true` when the buffer is due to be published.
    pub fn step(
        &mut self,
        source_index: usize,
        pixel_x: i32,
        pixel_y: f64,
        index: &mut SparseIndex,
        fb: &mut Framebuffer,
    ) -> bool {
        index.record(pixel_x, pixel_y, source_index);

        if self.mode != DrawMode::Skip {
            self.path.push((pixel_x, pixel_y.round() as i32));
            self.steps_since_commit += 1;
            if self.flush_interval > 0 && self.steps_since_commit >= self.flush_interval {
                self.commit(fb);
            }
        }

        self.counter += 1;
        let due = self.publish_interval > 0
            && self.counter % self.publish_interval == 0
            && self.counter < self.len;
        if due {
            // Published pixels must include everything visited so far.
            if !self.path.is_empty() {
                self.commit(fb);
            }
            trace!(counter = self.counter, "progress publish due");
            self.publishes.push(PublishMark::Progress(self.counter));
        }
        due
    }

    /// Final commit of a completed pass. The caller publishes afterwards.
    pub fn finish(&mut self, fb: &mut Framebuffer) {
        self.commit(fb);
        self.publishes.push(PublishMark::Final);
    }

    /// Draw the pending path into the buffer.
    ///
    /// In line mode the next path continues from the last committed point.
    fn commit(&mut self, fb: &mut Framebuffer) {
        match self.mode {
            DrawMode::Line { width } => {
                let mut stroke = Vec::with_capacity(self.path.len() + 1);
                stroke.extend(self.anchor);
                stroke.extend_from_slice(&self.path);
                draw_polyline(fb, &stroke, width, self.color);
                if let Some(&last) = stroke.last() {
                    self.anchor = Some(last);
                }
            }
            DrawMode::Marker { radius } => {
                for &(cx, cy) in &self.path {
                    draw_circle(fb, cx, cy, radius, self.color);
                }
            }
            DrawMode::Skip => {}
        }

        self.path.clear();
        self.steps_since_commit = 0;
        self.stroke_commits += 1;
    }

    /// Mode of this pass.
    #[must_use]
    pub const fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Items visited so far.
    #[must_use]
    pub const fn counter(&self) -> usize {
        self.counter
    }

    /// Commits performed so far, including no-op commits.
    #[must_use]
    pub const fn stroke_commits(&self) -> usize {
        self.stroke_commits
    }

    /// Publishes requested so far.
    #[must_use]
    pub fn publishes(&self) -> &[PublishMark] {
        &self.publishes
    }
}
