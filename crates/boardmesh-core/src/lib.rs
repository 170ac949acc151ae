//! # boardmesh core
//!
//! Board-feature records, the shared error taxonomy, unit constants and the
//! anchor/alignment resolver used by the geometry and legend crates.

pub mod anchor;
pub mod constants;
pub mod document;
pub mod error;
pub mod model;
pub mod pad;
pub mod polygon;

pub use anchor::{
    board_anchor_alignment, board_anchor_position, center_from_anchor, infer_alignment,
    AnchorAlignment, BoardFrame, Horizontal, Vertical,
};
pub use document::{BoardDocument, BoardElement};
pub use error::{Diagnostic, Error, FeatureError, Result};
pub use model::{
    Board, BoardMaterial, Component, Layer, LegendClass, LegendPath, LegendText, NumberLike, PlatedHole,
    PlatedHoleShape, Point, PolygonPadHole, RawPoint, SmtPad, SmtPadShape,
};
pub use pad::{clamp_border_radius, pad_rotation_degrees, pad_rotation_radians};
pub use polygon::{ensure_ccw, signed_area, Bounds2};
