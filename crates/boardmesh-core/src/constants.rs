//! Shared geometric constants, all in board-plane millimetres.

/// Minimum radius/width floor for degenerate geometry.
pub const M: f64 = 0.01;

/// Extra depth added to cutters so they never share a face with the solid
/// they cut.
pub const Z_EPSILON: f64 = 0.001;

/// Segment count used for every round hole, barrel and circular pad.
pub const SMOOTH_CIRCLE_SEGMENTS: usize = 32;

/// Segment count for the corner cylinders of rounded rectangles.
pub const RECT_PAD_SEGMENTS: usize = 64;

/// Copper pad thickness.
pub const DEFAULT_SMT_PAD_THICKNESS: f64 = 0.035;

/// Gap between the substrate surface and copper sitting on it.
pub const COPPER_SURFACE_OFFSET: f64 = 0.001;

/// Inset between a barrel's outer wall and its bore.
pub const PLATED_HOLE_LIP_HEIGHT: f64 = 0.05;

/// Pad growth on each axis when a pill hole has no outer size.
pub const DEFAULT_PAD_EXTENSION: f64 = 0.4;

/// Board drills are this much larger than the stated hole diameter.
pub const BOARD_DRILL_SCALE: f64 = 1.02;

/// Board thickness when the record does not state one.
pub const DEFAULT_BOARD_THICKNESS: f64 = 1.6;

/// Legend defaults.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.1;
pub const DEFAULT_FONT_SIZE: f64 = 0.25;

/// Height of extruded silkscreen / fabrication-note solids.
pub const LEGEND_SOLID_HEIGHT: f64 = 0.012;

/// Tolerance used when inferring alignment from geometry.
pub const ALIGNMENT_TOLERANCE: f64 = 1e-6;

/// Linear RGB colours handed to the renderer.
pub mod colors {
    pub const COPPER: [f32; 3] = [0.9, 0.6, 0.2];
    pub const FR4_GREEN: [f32; 3] = [0.05, 0.32, 0.12];
    pub const FR1_TAN: [f32; 3] = [0.8, 0.4, 0.2];
    pub const DRILL: [f32; 3] = [0.1, 0.1, 0.1];
    pub const SILKSCREEN: [f32; 3] = [1.0, 1.0, 1.0];
    pub const FABRICATION_NOTE: [f32; 3] = [1.0, 0.8, 0.2];
}
