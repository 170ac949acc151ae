//! Surface-mount pad processor.

use boardmesh_core::constants::{colors, COPPER_SURFACE_OFFSET, DEFAULT_SMT_PAD_THICKNESS};
use boardmesh_core::{Diagnostic, FeatureError, SmtPad, SmtPadShape};

use crate::export::ExportedMesh;
use crate::kernel::{CsgKernel, Solid};
use crate::shapes::{cylinder, polygon_extrusion, rounded_rect_prism};

#[derive(Debug, Default)]
pub struct SmtPadOutput {
    pub meshes: Vec<ExportedMesh>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build copper for every SMT pad.
///
/// Pads sit just off the board face on their own layer. Copper already
/// claimed by plated holes (`hole_union`) is cut away before clipping.
pub fn process_smt_pads<'a>(
    kernel: &CsgKernel,
    pads: impl IntoIterator<Item = &'a SmtPad>,
    board_thickness: f64,
    hole_union: Option<&Solid>,
    clip: Option<&Solid>,
) -> SmtPadOutput {
    let mut out = SmtPadOutput::default();

    for (index, pad) in pads.into_iter().enumerate() {
        let key = pad.key(index);
        let solid = match pad_solid(kernel, pad, &key) {
            Ok(solid) => solid,
            Err(e) => {
                out.diagnostics.push(Diagnostic::skipped("smt_pad", e));
                continue;
            }
        };

        let z = pad.layer().sign() * (board_thickness / 2.0 + COPPER_SURFACE_OFFSET);
        let at = pad.position();
        let mut solid = solid.translated(at.x, at.y, z);
        if let Some(holes) = hole_union {
            solid = kernel.subtract(solid, holes);
        }
        if let Some(volume) = clip {
            solid = kernel.intersect(solid, volume);
        }
        out.meshes
            .push(ExportedMesh::from_solid(key, &solid, colors::COPPER));
    }

    tracing::debug!(
        built = out.meshes.len(),
        skipped = out.diagnostics.len(),
        "smt pads processed"
    );
    out
}

/// Pad solid centred on the pad origin, before layer placement.
pub fn pad_solid(kernel: &CsgKernel, pad: &SmtPad, key: &str) -> Result<Solid, FeatureError> {
    let t = DEFAULT_SMT_PAD_THICKNESS;
    let solid = match pad.shape(key)? {
        SmtPadShape::Rect {
            width,
            height,
            border_radius,
        } => rounded_rect_prism(kernel, width, height, t, border_radius),
        SmtPadShape::RotatedRect {
            width,
            height,
            border_radius,
            ccw_rotation,
        } => rounded_rect_prism(kernel, width, height, t, border_radius).rotated_z(ccw_rotation),
        SmtPadShape::Circle { radius } => cylinder(kernel, t, radius),
        SmtPadShape::Polygon { points } => polygon_extrusion(kernel, key, &points, t)?,
    };
    Ok(solid)
}
