//! Data-to-pixel axis transforms.
//!
//! The raster pipeline never maps values itself; it asks an [`AxisTransform`]
//! supplied by the host chart. [`LinearAxis`] is the stock implementation used
//! by charts without a custom axis type.

use crate::error::{Error, Result};
use std::fmt;
use std::rc::Rc;

/// Maps raw data values to pixel coordinates.
pub trait AxisTransform {
    /// Translate `value` to a pixel coordinate.
    ///
    /// With `pane_coordinates` set the result is relative to the plot area's
    /// origin, otherwise to the chart's origin. Returns `None` when the value
    /// cannot be placed on this axis (e.g. NaN).
    fn to_pixels(&self, value: f64, pane_coordinates: bool) -> Option<f64>;
}

/// The horizontal and vertical axis a series is plotted against.
#[derive(Clone)]
pub struct Axes {
    /// Horizontal axis.
    pub x: Rc<dyn AxisTransform>,
    /// Vertical axis.
    pub y: Rc<dyn AxisTransform>,
}

impl Axes {
    /// Pair two axes.
    pub fn new(x: impl AxisTransform + 'static, y: impl AxisTransform + 'static) -> Self {
        Self {
            x: Rc::new(x),
            y: Rc::new(y),
        }
    }

    /// Linear axes fitted to the data extent over a `width` x `height` plot area.
    ///
    /// A column without a usable extent maps the unit interval instead.
    #[must_use]
    pub fn fit(x: &[f64], y: &[f64], width: u32, height: u32) -> Self {
        let unit = (0.0, 1.0);
        let x_axis = LinearAxis::horizontal_from_data(x, width)
            .or_else(|| LinearAxis::horizontal(unit, width).ok())
            .unwrap_or(LinearAxis::UNIT);
        let y_axis = LinearAxis::vertical_from_data(y, height)
            .or_else(|| LinearAxis::vertical(unit, height).ok())
            .unwrap_or(LinearAxis::UNIT);
        Self::new(x_axis, y_axis)
    }

    /// Map a data point to plot-area pixels.
    #[must_use]
    pub fn to_pixels(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some((self.x.to_pixels(x, true)?, self.y.to_pixels(y, true)?))
    }
}

impl fmt::Debug for Axes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axes").finish_non_exhaustive()
    }
}

/// Linear axis mapping a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAxis {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
    /// Plot-area offset from the chart origin along this axis.
    offset: f64,
}

impl LinearAxis {
    /// Identity mapping of the unit interval.
    pub const UNIT: Self = Self {
        domain_min: 0.0,
        domain_max: 1.0,
        range_min: 0.0,
        range_max: 1.0,
        offset: 0.0,
    };

    /// Create a new linear axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
            return Err(Error::Transform {
                value: domain.0,
                index: 0,
                reason: "axis domain must be finite and non-empty",
            });
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
            offset: 0.0,
        })
    }

    /// Horizontal axis over `len` pixels, minimum on the left.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn horizontal(domain: (f64, f64), len: u32) -> Result<Self> {
        Self::new(domain, (0.0, f64::from(len.saturating_sub(1))))
    }

    /// Vertical axis over `len` pixels, minimum at the bottom.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn vertical(domain: (f64, f64), len: u32) -> Result<Self> {
        Self::new(domain, (f64::from(len.saturating_sub(1)), 0.0))
    }

    /// Build a horizontal axis from the extent of `data`.
    ///
    /// Returns `None` if the data has no finite values or a single distinct value.
    #[must_use]
    pub fn horizontal_from_data(data: &[f64], len: u32) -> Option<Self> {
        let extremes = Extremes::of(data)?;
        Self::horizontal((extremes.min, extremes.max), len).ok()
    }

    /// Build a vertical axis from the extent of `data`.
    ///
    /// Returns `None` if the data has no finite values or a single distinct value.
    #[must_use]
    pub fn vertical_from_data(data: &[f64], len: u32) -> Option<Self> {
        let extremes = Extremes::of(data)?;
        Self::vertical((extremes.min, extremes.max), len).ok()
    }

    /// Set the plot-area offset added when translating to chart coordinates.
    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Get the domain extent.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }
}

impl AxisTransform for LinearAxis {
    fn to_pixels(&self, value: f64, pane_coordinates: bool) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }

        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        let pixel = self.range_min + t * (self.range_max - self.range_min);

        Some(if pane_coordinates {
            pixel
        } else {
            pixel + self.offset
        })
    }
}

/// Minimum and maximum of a data column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    /// Smallest finite value.
    pub min: f64,
    /// Largest finite value.
    pub max: f64,
}

impl Extremes {
    /// Compute the extremes of the finite values in `data`.
    ///
    /// Returns `None` when there is no finite value.
    #[must_use]
    pub fn of(data: &[f64]) -> Option<Self> {
        data.iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(e) => Some(Self {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }
}
