//! SVG element model and serialization.
//!
//! The scene graph stores these elements per group and serializes them to
//! markup. Raster series contribute a single embedded PNG image; vector
//! series contribute one element per point.

use crate::color::Rgba;

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Rgba,
    },
    /// Polyline (connected line segments)
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Rgba,
        stroke_width: f32,
    },
    /// Embedded raster image (base64 PNG)
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        href: String,
    },
}

/// Convert an SVG element to its string representation.
pub(crate) fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
                fill.to_css()
            )
        }
        SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
        } => {
            let points_str: String = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                r#"<polyline points="{points_str}" fill="none" stroke="{}" stroke-width="{stroke_width}"/>"#,
                stroke.to_css()
            )
        }
        SvgElement::Image {
            x,
            y,
            width,
            height,
            href,
        } => {
            format!(
                r#"<image x="{x}" y="{y}" width="{width}" height="{height}" preserveAspectRatio="none" xlink:href="{href}"/>"#
            )
        }
    }
}
