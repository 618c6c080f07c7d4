//! Output encoders (PNG, SVG).

mod png_encoder;
mod svg;

pub use png_encoder::PngEncoder;
pub use svg::SvgElement;
pub(crate) use svg::element_to_svg;
