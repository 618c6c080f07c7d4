//! Configuration for raster series.
//!
//! Supports YAML configuration; every field has a default so partial files
//! are valid.
//!
//! ```yaml
//! raster:
//!   chunk_size: 49999
//!   publish_interval: 50000
//! style:
//!   kind: scatter
//!   color: "#f45b5b"
//! ```

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::index::SearchDimension;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning of the chunked rasterization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterOptions {
    /// Items processed synchronously before yielding to the task queue.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// The surface is published whenever this many items have been drawn.
    /// Zero publishes only at the end of the pass.
    #[serde(default = "default_publish_interval")]
    pub publish_interval: usize,

    /// Draw steps between stroke/fill commits. Zero commits only at the end.
    #[serde(default = "default_stroke_flush_interval")]
    pub stroke_flush_interval: usize,

    /// Passes over more items than this show the loading indicator.
    #[serde(default = "default_loading_threshold")]
    pub loading_threshold: usize,

    /// Label of the loading indicator.
    #[serde(default = "default_loading_label")]
    pub loading_label: String,

    /// Series with at least this many points are rasterized; smaller ones
    /// are drawn as vector shapes.
    #[serde(default)]
    pub raster_threshold: usize,
}

fn default_chunk_size() -> usize {
    49_999
}
fn default_publish_interval() -> usize {
    50_000
}
fn default_stroke_flush_interval() -> usize {
    1_000
}
fn default_loading_threshold() -> usize {
    99_999
}
fn default_loading_label() -> String {
    "Drawing...".to_string()
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            publish_interval: default_publish_interval(),
            stroke_flush_interval: default_stroke_flush_interval(),
            loading_threshold: default_loading_threshold(),
            loading_label: default_loading_label(),
            raster_threshold: 0,
        }
    }
}

/// Kind of series, deciding default stroke, marker and search behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Connected line through the points.
    #[default]
    Line,
    /// Unconnected markers.
    Scatter,
}

/// Marker stamped at every point of an unconnected series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Circle radius in pixels.
    #[serde(default = "default_marker_radius")]
    pub radius: u32,
}

fn default_marker_radius() -> u32 {
    1
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            radius: default_marker_radius(),
        }
    }
}

/// Visual style of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Series kind.
    #[serde(default)]
    pub kind: SeriesKind,

    /// Stroke width; positive draws a line, zero draws markers only.
    /// Defaults to 1 for lines and 0 for scatter.
    #[serde(default)]
    pub line_width: Option<f32>,

    /// Stroke and fill color.
    #[serde(default = "default_color")]
    pub color: Rgba,

    /// Marker; defaults to a radius-1 circle for scatter and none for lines.
    #[serde(default)]
    pub marker: Option<Marker>,

    /// Hit-test distance metric; defaults to X for lines and XY for scatter.
    #[serde(default)]
    pub search: Option<SearchDimension>,
}

fn default_color() -> Rgba {
    Rgba::SERIES_DEFAULT
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self::line()
    }
}

impl SeriesStyle {
    /// Default line style.
    #[must_use]
    pub fn line() -> Self {
        Self {
            kind: SeriesKind::Line,
            line_width: None,
            color: default_color(),
            marker: None,
            search: None,
        }
    }

    /// Default scatter style.
    #[must_use]
    pub fn scatter() -> Self {
        Self {
            kind: SeriesKind::Scatter,
            ..Self::line()
        }
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    /// Set the marker.
    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Effective stroke width.
    #[must_use]
    pub fn effective_line_width(&self) -> f32 {
        self.line_width.unwrap_or(match self.kind {
            SeriesKind::Line => 1.0,
            SeriesKind::Scatter => 0.0,
        })
    }

    /// Effective marker.
    #[must_use]
    pub fn effective_marker(&self) -> Option<Marker> {
        self.marker.or(match self.kind {
            SeriesKind::Line => None,
            SeriesKind::Scatter => Some(Marker::default()),
        })
    }

    /// Effective hit-test distance metric.
    #[must_use]
    pub fn effective_search(&self) -> SearchDimension {
        self.search.unwrap_or(match self.kind {
            SeriesKind::Line => SearchDimension::X,
            SeriesKind::Scatter => SearchDimension::XY,
        })
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Pass tuning.
    #[serde(default)]
    pub raster: RasterOptions,

    /// Series style.
    #[serde(default)]
    pub style: SeriesStyle,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            raster: RasterOptions::default(),
            style: SeriesStyle::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or if `chunk_size`
    /// is zero.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;

        if config.raster.chunk_size == 0 {
            return Err(Error::ConfigParse {
                line: 0,
                message: "raster.chunk_size must be at least 1".to_string(),
            });
        }

        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
