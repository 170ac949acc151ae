//! Board outline processing: substrate solid, clip volume and drills.

use boardmesh_core::constants::{
    colors, COPPER_SURFACE_OFFSET, DEFAULT_SMT_PAD_THICKNESS, Z_EPSILON,
};
use boardmesh_core::{BoardFrame, BoardMaterial};

use crate::kernel::{CsgKernel, Solid};

/// Board footprint extruded to `thickness`, centred on z = 0.
fn footprint(kernel: &CsgKernel, frame: &BoardFrame, thickness: f64) -> Solid {
    match &frame.outline {
        Some(outline) => kernel.extrude_outline(outline, thickness),
        None => kernel
            .cuboid(frame.width, frame.height, thickness)
            .translated(frame.center.x, frame.center.y, 0.0),
    }
}

/// The substrate solid before drilling.
pub fn board_solid(kernel: &CsgKernel, frame: &BoardFrame) -> Solid {
    footprint(kernel, frame, frame.thickness)
}

/// Half-height of everything that may sit on the board faces.
pub fn copper_stack_margin() -> f64 {
    COPPER_SURFACE_OFFSET + DEFAULT_SMT_PAD_THICKNESS + Z_EPSILON
}

/// Volume that copper is intersected with so nothing leaves the board
/// edge. It has the exact board footprint and reaches past both faces far
/// enough to keep surface copper.
pub fn clip_volume(kernel: &CsgKernel, frame: &BoardFrame) -> Solid {
    footprint(kernel, frame, frame.thickness + 2.0 * copper_stack_margin())
}

/// Board minus every drill.
pub fn substrate(kernel: &CsgKernel, frame: &BoardFrame, drills: &[Solid]) -> Solid {
    drills
        .iter()
        .fold(board_solid(kernel, frame), |board, drill| {
            kernel.subtract(board, drill)
        })
}

pub fn material_color(material: BoardMaterial) -> [f32; 3] {
    match material {
        BoardMaterial::Fr4 => colors::FR4_GREEN,
        BoardMaterial::Fr1 => colors::FR1_TAN,
    }
}
