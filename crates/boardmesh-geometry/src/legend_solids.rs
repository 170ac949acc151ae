//! Thin 3D solids for silkscreen and fabrication-note markings.

use boardmesh_core::constants::{colors, LEGEND_SOLID_HEIGHT, M};
use boardmesh_core::{Layer, LegendClass, LegendPath, Point};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::{Matrix4, Vector3};

use crate::export::ExportedMesh;
use crate::kernel::{CsgKernel, Solid};

pub fn legend_color(class: LegendClass) -> [f32; 3] {
    match class {
        LegendClass::Silkscreen => colors::SILKSCREEN,
        LegendClass::FabricationNote => colors::FABRICATION_NOTE,
    }
}

/// Height of the legend's face above (or below) the board centre plane.
pub fn legend_z(class: LegendClass, layer: Layer, board_thickness: f64) -> f64 {
    let multiplier = match class {
        LegendClass::Silkscreen => 1.5,
        LegendClass::FabricationNote => 2.5,
    };
    layer.sign() * (board_thickness / 2.0 + M * multiplier)
}

fn disc(center: Point, radius: f64, segments: usize) -> Sketch<()> {
    let s: Sketch<()> = Sketch::circle(radius, segments, None);
    s.transform(&Matrix4::new_translation(&Vector3::new(center.x, center.y, 0.0)))
}

/// Rectangle covering one segment of the stroke.
fn segment_band(p1: Point, p2: Point, width: f64) -> Option<Sketch<()>> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        return None;
    }
    let half_w = width / 2.0;
    let half_l = len / 2.0;
    let pts = vec![
        [-half_l, -half_w],
        [half_l, -half_w],
        [half_l, half_w],
        [-half_l, half_w],
    ];
    let rect: Sketch<()> = Sketch::polygon(&pts, None);
    let rotation = Matrix4::new_rotation(Vector3::new(0.0, 0.0, dy.atan2(dx)));
    let translation = Matrix4::new_translation(&Vector3::new(
        (p1.x + p2.x) / 2.0,
        (p1.y + p2.y) / 2.0,
        0.0,
    ));
    Some(rect.transform(&(translation * rotation)))
}

/// Polyline stroked at `width` with round joints and caps.
pub fn stroke_sketch(points: &[Point], width: f64, segments: usize) -> Sketch<()> {
    let radius = width / 2.0;
    let mut sketch: Sketch<()> = Sketch::new();
    for pair in points.windows(2) {
        if let Some(band) = segment_band(pair[0], pair[1], width) {
            sketch = sketch.union(&band);
        }
    }
    for p in points {
        sketch = sketch.union(&disc(*p, radius, segments));
    }
    sketch
}

/// Extrude stroked polylines into a legend solid on the given layer.
/// Returns `None` when nothing drawable remains.
pub fn legend_polylines_solid(
    kernel: &CsgKernel,
    polylines: &[Vec<Point>],
    stroke_width: f64,
    layer: Layer,
    class: LegendClass,
    board_thickness: f64,
) -> Option<Solid> {
    let segments = (kernel.config().circle_segments / 2).max(8);
    let mut sketch: Sketch<()> = Sketch::new();
    let mut drawn = false;
    for line in polylines.iter().filter(|l| l.len() >= 2) {
        sketch = sketch.union(&stroke_sketch(line, stroke_width, segments));
        drawn = true;
    }
    if !drawn {
        return None;
    }
    let face = legend_z(class, layer, board_thickness);
    let start = match layer {
        Layer::Top => face,
        Layer::Bottom => face - LEGEND_SOLID_HEIGHT,
    };
    Some(kernel.extrude_sketch(&sketch, LEGEND_SOLID_HEIGHT, start))
}

/// Solids for every drawable legend path of one class.
pub fn process_legend_paths<'a>(
    kernel: &CsgKernel,
    paths: impl IntoIterator<Item = &'a LegendPath>,
    class: LegendClass,
    board_thickness: f64,
) -> Vec<ExportedMesh> {
    let mut meshes = Vec::new();
    for (index, path) in paths.into_iter().enumerate() {
        if !path.is_drawable() {
            tracing::debug!(class = class.as_str(), index, "legend path with fewer than 2 points");
            continue;
        }
        let polyline = [path.points()];
        if let Some(solid) = legend_polylines_solid(
            kernel,
            &polyline,
            path.stroke_width(),
            path.layer(),
            class,
            board_thickness,
        ) {
            meshes.push(ExportedMesh::from_solid(
                format!("{}_path-{index}", class.as_str()),
                &solid,
                legend_color(class),
            ));
        }
    }
    meshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legend_z_offsets() {
        assert!((legend_z(LegendClass::Silkscreen, Layer::Top, 1.6) - 0.815).abs() < 1e-12);
        assert!(
            (legend_z(LegendClass::FabricationNote, Layer::Bottom, 1.6) + 0.825).abs() < 1e-12
        );
    }

    #[test]
    fn test_path_solid_sits_on_layer() {
        let kernel = CsgKernel::default();
        let paths: Vec<LegendPath> = vec![
            serde_json::from_value(json!({
                "route": [{"x": 0, "y": 0}, {"x": 2, "y": 0}, {"x": 2, "y": 1}],
                "stroke_width": 0.2
            }))
            .unwrap(),
            serde_json::from_value(json!({"route": [{"x": 0, "y": 0}], "layer": "bottom"}))
                .unwrap(),
        ];
        let meshes = process_legend_paths(&kernel, &paths, LegendClass::Silkscreen, 1.6);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].key, "silkscreen_path-0");
        let b = meshes[0].bounds().unwrap();
        assert!(b.min[2] > 0.8);
        assert!((b.max[2] - (0.815 + LEGEND_SOLID_HEIGHT)).abs() < 1e-5);
        assert!(b.max[0] > 2.05 && b.max[0] < 2.11);
        assert_eq!(kernel.live_solids(), 0);
    }

    #[test]
    fn test_bottom_solid_below_board() {
        let kernel = CsgKernel::default();
        let line = vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]];
        let solid = legend_polylines_solid(
            &kernel,
            &line,
            0.1,
            Layer::Bottom,
            LegendClass::FabricationNote,
            1.6,
        )
        .unwrap();
        let b = solid.bounds().unwrap();
        assert!(b.max[2] < -0.8);
    }

    #[test]
    fn test_nothing_drawable() {
        let kernel = CsgKernel::default();
        let lines = vec![vec![Point::ORIGIN]];
        assert!(legend_polylines_solid(
            &kernel,
            &lines,
            0.1,
            Layer::Top,
            LegendClass::Silkscreen,
            1.6
        )
        .is_none());
    }
}
