//! # boardmesh legend
//!
//! Silkscreen and fabrication-note markings as images.
//!
//! - **Font**: the [`VectorFont`] seam and a `rusttype` implementation over
//!   installed fonts
//! - **Text**: outline layout with alignment, mirroring and rotation
//! - **Raster**: one RGBA canvas per layer and legend class

pub mod error;
pub mod font;
pub mod raster;
pub mod text;

pub use error::LegendError;
pub use font::{OutlineFont, VectorFont};
pub use raster::{
    canvas_dimension, render_layer, render_legends, CanvasMapping, LegendRaster, RasterConfig,
    RenderedLegends, TextAnchors, DEFAULT_MAX_CANVAS_PIXELS, DEFAULT_TEXTURE_RESOLUTION,
};
pub use text::{layout_legend_text, layout_text, split_outline, text_stroke_width, TextOutlines};
