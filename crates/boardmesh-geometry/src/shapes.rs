//! Primitive shape builders. All prisms are centred on the origin and
//! extend `thickness / 2` above and below z = 0.

use boardmesh_core::{clamp_border_radius, ensure_ccw, FeatureError, Point};

use crate::kernel::{CsgKernel, Solid};

/// Rectangle prism with rounded vertical edges.
///
/// Built as two overlapping reduced boxes plus four corner cylinders. The
/// radius is clamped to half the smaller side first; a non-positive radius
/// gives a plain box.
pub fn rounded_rect_prism(
    kernel: &CsgKernel,
    width: f64,
    height: f64,
    thickness: f64,
    border_radius: Option<f64>,
) -> Solid {
    let r = clamp_border_radius(width, height, border_radius);
    if r <= 0.0 {
        return kernel.cuboid(width, height, thickness);
    }

    let inner_w = width - 2.0 * r;
    let inner_h = height - 2.0 * r;
    let segments = kernel.config().rect_corner_segments;

    let mut parts = Vec::with_capacity(6);
    if inner_w > 0.0 {
        parts.push(kernel.cuboid(inner_w, height, thickness));
    }
    if inner_h > 0.0 {
        parts.push(kernel.cuboid(width, inner_h, thickness));
    }
    // Coincident corners (stadium ends) are built once.
    let (cx, cy) = (width / 2.0 - r, height / 2.0 - r);
    let xs: &[f64] = if cx > 0.0 { &[1.0, -1.0] } else { &[0.0] };
    let ys: &[f64] = if cy > 0.0 { &[1.0, -1.0] } else { &[0.0] };
    for sx in xs {
        for sy in ys {
            parts.push(
                kernel
                    .cylinder(r, thickness, segments)
                    .translated(sx * cx, sy * cy, 0.0),
            );
        }
    }
    kernel
        .union_all(parts)
        .unwrap_or_else(|| kernel.cuboid(width, height, thickness))
}

/// Stadium: a rounded rectangle whose radius is half the smaller side.
pub fn pill_prism(kernel: &CsgKernel, width: f64, height: f64, thickness: f64) -> Solid {
    rounded_rect_prism(kernel, width, height, thickness, Some(width.min(height) / 2.0))
}

/// Cylinder with the kernel's smooth-circle segment count.
pub fn cylinder(kernel: &CsgKernel, thickness: f64, radius: f64) -> Solid {
    kernel.cylinder(radius, thickness, kernel.config().circle_segments)
}

/// Extrude a closed outline. Clockwise outlines are reversed first.
pub fn polygon_extrusion(
    kernel: &CsgKernel,
    feature: &str,
    outline: &[Point],
    thickness: f64,
) -> Result<Solid, FeatureError> {
    if outline.len() < 3 {
        return Err(FeatureError::malformed(
            feature,
            format!("outline needs at least 3 points, got {}", outline.len()),
        ));
    }
    if outline.iter().any(|p| !p.is_finite()) {
        return Err(FeatureError::malformed(feature, "outline has a non-finite point"));
    }
    let ccw = ensure_ccw(outline.to_vec());
    Ok(kernel.extrude_outline(&ccw, thickness))
}
