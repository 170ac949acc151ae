use boardmesh_core::BoardDocument;
use boardmesh_geometry::{build_board_geometry, clip_volume, CsgKernel, GeometryOptions};
use serde_json::json;

fn document(records: serde_json::Value) -> BoardDocument {
    BoardDocument::from_value(records).unwrap()
}

fn edge_pill_board() -> BoardDocument {
    document(json!([
        {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 20, "height": 12, "thickness": 1.6},
        {
            "type": "pcb_plated_hole",
            "pcb_plated_hole_id": "edge",
            "shape": "pill",
            "x": 10, "y": 0,
            "hole_width": 1.2, "hole_height": 1.2,
            "outer_width": 4, "outer_height": 3
        }
    ]))
}

#[test]
fn test_copper_is_clipped_at_board_edge() {
    let kernel = CsgKernel::default();
    let geometry = build_board_geometry(&kernel, &edge_pill_board(), &GeometryOptions::default());

    let copper = geometry.mesh("ph-edge").expect("copper mesh");
    let b = copper.bounds().expect("copper bounds");
    assert!(b.max[0] <= 10.0 + 1e-6, "copper leaks past the edge: {}", b.max[0]);
    assert!(b.min[0] < 9.0);
    assert!(geometry.diagnostics.is_empty());
}

fn assert_copper_inside_clip(hole: serde_json::Value) {
    let kernel = CsgKernel::default();
    let doc = document(json!([
        {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 20, "height": 12, "thickness": 1.6},
        hole
    ]));
    let geometry = build_board_geometry(&kernel, &doc, &GeometryOptions::default());
    assert!(geometry.diagnostics.is_empty(), "{:?}", geometry.diagnostics);

    let clip = clip_volume(&kernel, geometry.frame.as_ref().unwrap())
        .bounds()
        .unwrap();
    let copper = geometry.mesh("ph-edge").expect("copper mesh");
    let b = copper.bounds().expect("copper bounds");
    assert!(b.max[0] <= clip.max[0] + 1e-6, "copper leaks past the edge: {}", b.max[0]);
    assert!(b.min[2] >= clip.min[2] - 1e-6 && b.max[2] <= clip.max[2] + 1e-6);
    assert!(b.min[0] < 9.5);
}

#[test]
fn test_edge_circle_is_clipped() {
    assert_copper_inside_clip(json!({
        "type": "pcb_plated_hole", "pcb_plated_hole_id": "edge", "shape": "circle",
        "x": 10, "y": 0, "hole_diameter": 1, "outer_diameter": 2
    }));
}

#[test]
fn test_edge_pill_hole_with_offset_rect_pad_is_clipped() {
    assert_copper_inside_clip(json!({
        "type": "pcb_plated_hole", "pcb_plated_hole_id": "edge",
        "shape": "pill_hole_with_rect_pad",
        "x": 9.5, "y": 0, "hole_offset_x": 0.5,
        "hole_width": 1, "hole_height": 0.8,
        "rect_pad_width": 3, "rect_pad_height": 2
    }));
}

#[test]
fn test_edge_circular_hole_with_rect_pad_is_clipped() {
    assert_copper_inside_clip(json!({
        "type": "pcb_plated_hole", "pcb_plated_hole_id": "edge",
        "shape": "circular_hole_with_rect_pad",
        "x": 10, "y": 0, "hole_offset_x": -0.3,
        "hole_diameter": 1, "rect_pad_width": 2.5, "rect_pad_height": 2,
        "rect_border_radius": 0.2
    }));
}

#[test]
fn test_edge_polygon_pad_is_clipped() {
    assert_copper_inside_clip(json!({
        "type": "pcb_plated_hole", "pcb_plated_hole_id": "edge",
        "shape": "hole_with_polygon_pad",
        "x": 10, "y": 0, "hole_offset_x": 0.2,
        "hole_shape": "circle", "hole_diameter": 1,
        "pad_outline": [
            {"x": -1.5, "y": -1.5}, {"x": 1.5, "y": -1.5},
            {"x": 1.5, "y": 1.5}, {"x": -1.5, "y": 1.5}
        ]
    }));
}

#[test]
fn test_unclipped_copper_extends_past_edge() {
    let kernel = CsgKernel::default();
    let options = GeometryOptions {
        clip_to_board: false,
        ..GeometryOptions::default()
    };
    let geometry = build_board_geometry(&kernel, &edge_pill_board(), &options);
    let b = geometry.mesh("ph-edge").unwrap().bounds().unwrap();
    assert!(b.max[0] > 11.9);
}

#[test]
fn test_no_solids_survive_the_build() {
    let kernel = CsgKernel::default();
    let geometry = build_board_geometry(&kernel, &edge_pill_board(), &GeometryOptions::default());
    assert!(!geometry.meshes.is_empty());
    assert!(kernel.solids_created() > 0);
    assert_eq!(kernel.live_solids(), 0);
}

#[test]
fn test_mixed_board_keys_and_order() {
    let kernel = CsgKernel::default();
    let doc = document(json!([
        {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 30, "height": 20, "material": "fr1"},
        {"type": "pcb_plated_hole", "shape": "circle", "x": -5, "y": 0, "hole_diameter": 1, "outer_diameter": 2},
        {"type": "pcb_plated_hole", "shape": "star", "x": 0, "y": 0},
        {"type": "pcb_smtpad", "pcb_smtpad_id": "P1", "shape": "rect", "x": 5, "y": 5, "width": 2, "height": 1, "layer": "top"},
        {"type": "pcb_smtpad", "shape": "circle", "x": 5, "y": -5, "radius": 0.5, "layer": "bottom"},
        {"type": "pcb_silkscreen_path", "route": [{"x": -10, "y": 8}, {"x": 10, "y": 8}], "stroke_width": 0.15},
        {"type": "pcb_trace", "route": []}
    ]));
    let options = GeometryOptions {
        emit_legend_solids: true,
        ..GeometryOptions::default()
    };
    let geometry = build_board_geometry(&kernel, &doc, &options);

    let keys: Vec<&str> = geometry.meshes.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["board", "ph-0", "smt_pad-top-P1", "smt_pad-bottom-1", "silkscreen_path-0"]
    );
    assert_eq!(geometry.drills.len(), 1);
    assert_eq!(geometry.drills[0].key, "drill-0");
    assert_eq!(geometry.diagnostics.len(), 1);
    assert_eq!(geometry.diagnostics[0].error.feature(), "ph-1");

    let board = geometry.mesh("board").unwrap();
    assert_eq!(board.color, boardmesh_core::constants::colors::FR1_TAN);

    let bottom = geometry.mesh("smt_pad-bottom-1").unwrap().bounds().unwrap();
    assert!(bottom.max[2] < 0.0 && bottom.min[2] < -0.8);
    assert_eq!(kernel.live_solids(), 0);
}

#[test]
fn test_missing_board_still_builds_copper() {
    let kernel = CsgKernel::default();
    let doc = document(json!([
        {"type": "pcb_plated_hole", "shape": "circle", "x": 50, "y": 0, "hole_diameter": 1, "outer_diameter": 2}
    ]));
    let geometry = build_board_geometry(&kernel, &doc, &GeometryOptions::default());
    assert!(geometry.frame.is_none());
    assert!(geometry.mesh("board").is_none());
    let b = geometry.mesh("ph-0").unwrap().bounds().unwrap();
    assert!(b.max[0] > 50.9);
}

#[test]
fn test_board_without_size_is_diagnosed() {
    let kernel = CsgKernel::default();
    let doc = document(json!([
        {"type": "pcb_board", "center": {"x": 0, "y": 0}}
    ]));
    let geometry = build_board_geometry(&kernel, &doc, &GeometryOptions::default());
    assert!(geometry.frame.is_none());
    assert_eq!(geometry.diagnostics.len(), 1);
    assert_eq!(geometry.diagnostics[0].stage, "board");
}

#[test]
fn test_outline_board_uses_outline_bounds() {
    let kernel = CsgKernel::default();
    // Clockwise on purpose.
    let doc = document(json!([
        {"type": "pcb_board", "outline": [
            {"x": 0, "y": 0}, {"x": 0, "y": 10}, {"x": 16, "y": 10}, {"x": 16, "y": 0}
        ]}
    ]));
    let geometry = build_board_geometry(&kernel, &doc, &GeometryOptions::default());
    let frame = geometry.frame.as_ref().unwrap();
    assert_eq!(frame.width, 16.0);
    assert!(boardmesh_core::signed_area(frame.outline.as_ref().unwrap()) > 0.0);
    let b = geometry.mesh("board").unwrap().bounds().unwrap();
    assert!((b.min[0]).abs() < 1e-6 && (b.max[0] - 16.0).abs() < 1e-6);
    assert!((b.max[2] - 0.8).abs() < 1e-6);
}
