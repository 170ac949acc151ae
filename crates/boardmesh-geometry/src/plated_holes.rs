//! Plated-hole processor.
//!
//! Each hole yields a board drill (removed from the substrate) and a copper
//! solid (pads, barrel and fill, with the bore cut out). Copper is clipped
//! to the board volume when one is supplied.

use boardmesh_core::constants::{
    colors, BOARD_DRILL_SCALE, COPPER_SURFACE_OFFSET, DEFAULT_SMT_PAD_THICKNESS, M,
    PLATED_HOLE_LIP_HEIGHT, Z_EPSILON,
};
use boardmesh_core::{Diagnostic, FeatureError, PlatedHole, PlatedHoleShape, Point, PolygonPadHole};

use crate::export::ExportedMesh;
use crate::kernel::{CsgKernel, Solid};
use crate::shapes::{cylinder, pill_prism, polygon_extrusion, rounded_rect_prism};

/// Solids for one plated hole, before clipping.
struct HoleSolids {
    drill: Solid,
    copper: Solid,
}

/// Everything the plated-hole stage hands downstream.
#[derive(Debug, Default)]
pub struct PlatedHoleOutput {
    /// Board drills, in hole order.
    pub drills: Vec<Solid>,
    pub copper: Vec<ExportedMesh>,
    /// Union of all (clipped) copper, for subtracting from SMT pads.
    pub copper_union: Option<Solid>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build drills and copper for every plated hole.
pub fn process_plated_holes<'a>(
    kernel: &CsgKernel,
    holes: impl IntoIterator<Item = &'a PlatedHole>,
    board_thickness: f64,
    clip: Option<&Solid>,
) -> PlatedHoleOutput {
    let mut out = PlatedHoleOutput::default();
    let mut copper_solids = Vec::new();

    for (index, hole) in holes.into_iter().enumerate() {
        let key = hole.key(index);
        match build_hole(kernel, hole, &key, board_thickness) {
            Ok(HoleSolids { drill, copper }) => {
                out.drills.push(drill);
                let copper = match clip {
                    Some(volume) => kernel.intersect(copper, volume),
                    None => copper,
                };
                out.copper
                    .push(ExportedMesh::from_solid(key, &copper, colors::COPPER));
                copper_solids.push(copper);
            }
            Err(e) => out.diagnostics.push(Diagnostic::skipped("plated_hole", e)),
        }
    }

    tracing::debug!(
        built = out.copper.len(),
        skipped = out.diagnostics.len(),
        "plated holes processed"
    );
    out.copper_union = kernel.union_all(copper_solids);
    out
}

fn build_hole(
    kernel: &CsgKernel,
    hole: &PlatedHole,
    key: &str,
    t: f64,
) -> Result<HoleSolids, FeatureError> {
    let at = hole.position(key)?;
    let solids = match hole.shape(key)? {
        PlatedHoleShape::Circle {
            hole_diameter,
            outer_diameter,
        } => circle(kernel, at, hole_diameter, outer_diameter, t),
        PlatedHoleShape::Pill {
            hole_width,
            hole_height,
            outer_width,
            outer_height,
            ccw_rotation,
        } => pill(
            kernel,
            at,
            (hole_width, hole_height),
            (outer_width, outer_height),
            ccw_rotation,
            t,
        ),
        PlatedHoleShape::PillHoleWithRectPad {
            hole_width,
            hole_height,
            hole_offset,
            pad_width,
            pad_height,
            border_radius,
        } => {
            let drill = pill_prism(
                kernel,
                hole_width + 2.0 * Z_EPSILON,
                hole_height + 2.0 * Z_EPSILON,
                t * 1.2,
            );
            let barrel = pill_prism(kernel, hole_width, hole_height, t * 1.02);
            let bore = pill_prism(
                kernel,
                (hole_width - 2.0 * PLATED_HOLE_LIP_HEIGHT).max(M),
                (hole_height - 2.0 * PLATED_HOLE_LIP_HEIGHT).max(M),
                t * 1.2,
            );
            rect_pad_stack(
                kernel,
                at,
                hole_offset,
                (pad_width, pad_height, border_radius),
                BoreParts {
                    drill,
                    barrel,
                    bore,
                },
                t,
            )
        }
        PlatedHoleShape::CircularHoleWithRectPad {
            hole_diameter,
            hole_offset,
            pad_width,
            pad_height,
            border_radius,
        } => {
            let radius = hole_diameter / 2.0;
            let drill = cylinder(kernel, t + 2.0 * Z_EPSILON, radius);
            let barrel = cylinder(kernel, t * 1.02, radius);
            let bore = cylinder(kernel, t * 1.2, (radius - M).max(M));
            rect_pad_stack(
                kernel,
                at,
                hole_offset,
                (pad_width, pad_height, border_radius),
                BoreParts {
                    drill,
                    barrel,
                    bore,
                },
                t,
            )
        }
        PlatedHoleShape::HoleWithPolygonPad {
            pad_outline,
            hole,
            hole_offset,
        } => polygon_pad(kernel, key, at, &pad_outline, &hole, hole_offset, t)?,
    };
    Ok(solids)
}

fn circle(kernel: &CsgKernel, at: Point, hole_d: f64, outer_d: f64, t: f64) -> HoleSolids {
    let copper_t = t + 2.0 * Z_EPSILON;
    let drill = cylinder(kernel, copper_t, hole_d * BOARD_DRILL_SCALE / 2.0).translated(
        at.x,
        at.y,
        0.0,
    );
    let ring = cylinder(kernel, copper_t, outer_d / 2.0);
    let bore = cylinder(kernel, copper_t * 1.05, hole_d / 2.0);
    let copper = kernel.subtract(ring, &bore).translated(at.x, at.y, 0.0);
    HoleSolids { drill, copper }
}

fn pill(
    kernel: &CsgKernel,
    at: Point,
    (hole_w, hole_h): (f64, f64),
    (outer_w, outer_h): (f64, f64),
    rotation: f64,
    t: f64,
) -> HoleSolids {
    let copper_t = t + 2.0 * Z_EPSILON;
    let drill = pill_prism(
        kernel,
        hole_w + 2.0 * Z_EPSILON,
        hole_h + 2.0 * Z_EPSILON,
        t * 1.2,
    )
    .rotated_z(rotation)
    .translated(at.x, at.y, 0.0);

    let outer = pill_prism(kernel, outer_w, outer_h, copper_t);
    let bore = pill_prism(kernel, hole_w, hole_h, copper_t * 1.05);
    let copper = kernel
        .subtract(outer, &bore)
        .rotated_z(rotation)
        .translated(at.x, at.y, 0.0);
    HoleSolids { drill, copper }
}

/// Bore-side solids of a rect-pad hole, all centred on the origin.
struct BoreParts {
    drill: Solid,
    barrel: Solid,
    bore: Solid,
}

/// Top pad, bottom pad and a fill between them, unioned with a barrel at
/// the hole offset and cut by the bore.
fn rect_pad_stack(
    kernel: &CsgKernel,
    at: Point,
    offset: Point,
    (pad_w, pad_h, radius): (f64, f64, Option<f64>),
    parts: BoreParts,
    t: f64,
) -> HoleSolids {
    let pad_t = DEFAULT_SMT_PAD_THICKNESS;
    let pad_z = t / 2.0 + COPPER_SURFACE_OFFSET;
    let fill_t = t - 2.0 * pad_t - 2.0 * COPPER_SURFACE_OFFSET + 0.1;

    let fill = rounded_rect_prism(kernel, pad_w, pad_h, fill_t, radius);
    let top = rounded_rect_prism(kernel, pad_w, pad_h, pad_t, radius).translated(0.0, 0.0, pad_z);
    let bottom =
        rounded_rect_prism(kernel, pad_w, pad_h, pad_t, radius).translated(0.0, 0.0, -pad_z);
    let barrel = parts.barrel.translated(offset.x, offset.y, 0.0);
    let bore = parts.bore.translated(offset.x, offset.y, 0.0);

    let stack = kernel
        .union_all([fill, top, bottom, barrel])
        .unwrap_or_else(|| kernel.empty());
    let copper = kernel.subtract(stack, &bore).translated(at.x, at.y, 0.0);
    let drill = parts
        .drill
        .translated(at.x + offset.x, at.y + offset.y, 0.0);
    HoleSolids { drill, copper }
}

/// Polygon pad through the full board plus a barrel shell around the bore.
fn polygon_pad(
    kernel: &CsgKernel,
    key: &str,
    at: Point,
    outline: &[Point],
    hole: &PolygonPadHole,
    offset: Point,
    t: f64,
) -> Result<HoleSolids, FeatureError> {
    let copper_t = t + 2.0 * Z_EPSILON;
    let drill_t = t * 1.2;
    let inset = 2.0 * PLATED_HOLE_LIP_HEIGHT;
    let hole_at = at.offset(offset.x, offset.y);

    let pad = polygon_extrusion(kernel, key, outline, copper_t)?.translated(at.x, at.y, 0.0);

    let place = |solid: Solid, rotation: Option<f64>| {
        solid
            .rotated_z(rotation.unwrap_or(0.0))
            .translated(hole_at.x, hole_at.y, 0.0)
    };

    let (drill, outer, inner, cut) = match *hole {
        PolygonPadHole::Circle { diameter } => {
            let inner_d = (diameter - inset).max(M);
            (
                place(cylinder(kernel, copper_t, diameter / 2.0), None),
                place(cylinder(kernel, copper_t, diameter / 2.0), None),
                place(cylinder(kernel, copper_t * 1.05, inner_d / 2.0), None),
                place(cylinder(kernel, drill_t, (inner_d / 2.0).max(M / 2.0)), None),
            )
        }
        PolygonPadHole::Pill {
            width,
            height,
            ccw_rotation,
        } => {
            let inner_w = (width - inset).max(M);
            let inner_h = (height - inset).max(M);
            (
                place(
                    pill_prism(kernel, width + 2.0 * Z_EPSILON, height + 2.0 * Z_EPSILON, drill_t),
                    ccw_rotation,
                ),
                place(pill_prism(kernel, width, height, copper_t), ccw_rotation),
                place(pill_prism(kernel, inner_w, inner_h, copper_t * 1.05), ccw_rotation),
                place(pill_prism(kernel, inner_w, inner_h, drill_t), ccw_rotation),
            )
        }
    };

    let shell = kernel.subtract(outer, &inner);
    let pad_with_hole = kernel.subtract(pad, &cut);
    let copper = kernel.union(pad_with_hole, shell);
    Ok(HoleSolids { drill, copper })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hole(value: serde_json::Value) -> PlatedHole {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_circle_hole() {
        let kernel = CsgKernel::default();
        let holes = [hole(json!({
            "shape": "circle", "x": 2, "y": 3, "hole_diameter": 1.0, "outer_diameter": 2.0,
            "pcb_plated_hole_id": "H1"
        }))];
        let out = process_plated_holes(&kernel, &holes, 1.6, None);
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.drills.len(), 1);
        assert_eq!(out.copper[0].key, "ph-H1");
        let b = out.copper[0].bounds().unwrap();
        assert!((b.max[0] - 3.0).abs() < 1e-4);
        assert!((b.min[1] - 2.0).abs() < 1e-4);
        assert!(b.max[2] > 0.8);
        assert!(out.copper_union.is_some());
    }

    #[test]
    fn test_bad_hole_is_skipped() {
        let kernel = CsgKernel::default();
        let holes = [
            hole(json!({"shape": "circle", "x": 0, "y": 0, "outer_diameter": 2.0})),
            hole(json!({"shape": "pill", "x": 0, "y": 0, "hole_width": 1.0, "hole_height": 0.6})),
        ];
        let out = process_plated_holes(&kernel, &holes, 1.6, None);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.copper.len(), 1);
        assert_eq!(out.copper[0].key, "ph-1");
        assert_eq!(out.diagnostics[0].error, FeatureError::missing("ph-0", "hole_diameter"));
    }

    #[test]
    fn test_rect_pad_stack_honours_offset() {
        let kernel = CsgKernel::default();
        let holes = [hole(json!({
            "shape": "circular_hole_with_rect_pad", "x": 0, "y": 0,
            "hole_diameter": 0.8, "rect_pad_width": 2.0, "rect_pad_height": 2.0,
            "hole_offset_x": 0.5
        }))];
        let out = process_plated_holes(&kernel, &holes, 1.6, None);
        let drill = out.drills[0].bounds().unwrap();
        assert!(((drill.min[0] + drill.max[0]) / 2.0 - 0.5).abs() < 1e-6);
        let pad = out.copper[0].bounds().unwrap();
        assert!((pad.max[0] - 1.0).abs() < 1e-4);
        assert!((pad.min[0] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_polygon_pad_clockwise_outline() {
        let kernel = CsgKernel::default();
        let holes = [hole(json!({
            "shape": "hole_with_polygon_pad", "x": 5, "y": 0,
            "hole_shape": "circle", "hole_diameter": 0.6,
            "pad_outline": [
                {"x": -1, "y": -1}, {"x": -1, "y": 1}, {"x": 1, "y": 1}, {"x": 1, "y": -1}
            ]
        }))];
        let out = process_plated_holes(&kernel, &holes, 1.6, None);
        assert!(out.diagnostics.is_empty());
        let b = out.copper[0].bounds().unwrap();
        assert!((b.min[0] - 4.0).abs() < 1e-4);
        assert!((b.max[0] - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_all_intermediates_released() {
        let kernel = CsgKernel::default();
        let holes = [
            hole(json!({
                "shape": "pill_hole_with_rect_pad", "x": 0, "y": 0,
                "hole_width": 0.6, "hole_height": 1.0,
                "rect_pad_width": 1.5, "rect_pad_height": 2.0, "rect_border_radius": 0.2
            })),
            hole(json!({"shape": "triangle", "x": 0, "y": 0})),
        ];
        let out = process_plated_holes(&kernel, &holes, 1.6, None);
        assert_eq!(kernel.live_solids(), 2);
        drop(out);
        assert_eq!(kernel.live_solids(), 0);
    }
}
