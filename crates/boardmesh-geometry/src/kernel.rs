//! Explicit CSG kernel context and owned solid handles.
//!
//! Every builder takes a `&CsgKernel`. Solids are owned values: a boolean
//! operation consumes its operands and returns a new handle, and a handle
//! that goes out of scope on any path (including skipped features) is
//! released. The kernel counts live handles so a finished build can be
//! checked for leaks.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use boardmesh_core::constants::{M, RECT_PAD_SEGMENTS, SMOOTH_CIRCLE_SEGMENTS};
use boardmesh_core::Point;
use csgrs::mesh::polygon::Polygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::mesh::Mesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Tessellation settings for kernel primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Segments for holes, barrels and circular pads.
    pub circle_segments: usize,
    /// Segments for rounded-rectangle corner cylinders.
    pub rect_corner_segments: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            circle_segments: SMOOTH_CIRCLE_SEGMENTS,
            rect_corner_segments: RECT_PAD_SEGMENTS,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    live: Cell<usize>,
    created: Cell<usize>,
}

/// Kernel context for one board build.
///
/// Not `Sync`; a host building several boards in parallel creates one
/// kernel per board.
#[derive(Debug, Default)]
pub struct CsgKernel {
    config: KernelConfig,
    counters: Rc<Counters>,
}

/// An owned CSG solid.
pub struct Solid {
    mesh: Mesh<()>,
    counters: Rc<Counters>,
}

impl Drop for Solid {
    fn drop(&mut self) {
        let live = self.counters.live.get();
        self.counters.live.set(live.saturating_sub(1));
    }
}

impl fmt::Debug for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solid")
            .field("polygons", &self.mesh.polygons.len())
            .finish()
    }
}

/// Axis-aligned 3D bounds of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Solid {
    pub fn mesh(&self) -> &Mesh<()> {
        &self.mesh
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        let mut vertices = self.mesh.polygons.iter().flat_map(|p| p.vertices.iter());
        let first = vertices.next()?;
        let mut b = Bounds3 {
            min: [first.pos.x, first.pos.y, first.pos.z],
            max: [first.pos.x, first.pos.y, first.pos.z],
        };
        for v in vertices {
            for (axis, value) in [v.pos.x, v.pos.y, v.pos.z].into_iter().enumerate() {
                b.min[axis] = b.min[axis].min(value);
                b.max[axis] = b.max[axis].max(value);
            }
        }
        Some(b)
    }

    pub fn translated(mut self, x: f64, y: f64, z: f64) -> Self {
        if x != 0.0 || y != 0.0 || z != 0.0 {
            self.mesh = self
                .mesh
                .transform(&Matrix4::new_translation(&Vector3::new(x, y, z)));
        }
        self
    }

    /// Rotate counter-clockwise about the z axis through the origin.
    pub fn rotated_z(mut self, degrees: f64) -> Self {
        if degrees != 0.0 {
            let rotation = Matrix4::new_rotation(Vector3::new(0.0, 0.0, degrees.to_radians()));
            self.mesh = self.mesh.transform(&rotation);
        }
        self
    }
}

impl CsgKernel {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            counters: Rc::default(),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Solid handles not yet released.
    pub fn live_solids(&self) -> usize {
        self.counters.live.get()
    }

    /// Solid handles created over the kernel's lifetime.
    pub fn solids_created(&self) -> usize {
        self.counters.created.get()
    }

    fn adopt(&self, mesh: Mesh<()>) -> Solid {
        self.counters.live.set(self.counters.live.get() + 1);
        self.counters.created.set(self.counters.created.get() + 1);
        Solid {
            mesh,
            counters: Rc::clone(&self.counters),
        }
    }

    pub fn empty(&self) -> Solid {
        self.adopt(Mesh::from_polygons(&[], None))
    }

    /// Right prism over a convex counter-clockwise outline, spanning
    /// `z0..z1`.
    fn convex_prism(&self, outline: &[[f64; 2]], z0: f64, z1: f64) -> Solid {
        let n = outline.len();
        let mut polygons = Vec::with_capacity(n + 2);

        let top: Vec<Point3<f64>> = outline.iter().map(|p| Point3::new(p[0], p[1], z1)).collect();
        let bottom: Vec<Point3<f64>> =
            outline.iter().rev().map(|p| Point3::new(p[0], p[1], z0)).collect();
        polygons.push(flat_polygon(&top));
        polygons.push(flat_polygon(&bottom));

        for i in 0..n {
            let a = outline[i];
            let b = outline[(i + 1) % n];
            polygons.push(flat_polygon(&[
                Point3::new(a[0], a[1], z0),
                Point3::new(b[0], b[1], z0),
                Point3::new(b[0], b[1], z1),
                Point3::new(a[0], a[1], z1),
            ]));
        }
        self.adopt(Mesh::from_polygons(&polygons, None))
    }

    /// Box centred on the origin. Degenerate sizes are floored to `M`.
    pub fn cuboid(&self, width: f64, height: f64, thickness: f64) -> Solid {
        let hw = width.max(M) / 2.0;
        let hh = height.max(M) / 2.0;
        let ht = thickness.max(M) / 2.0;
        self.convex_prism(&[[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]], -ht, ht)
    }

    /// Cylinder along z, centred on the origin.
    pub fn cylinder(&self, radius: f64, thickness: f64, segments: usize) -> Solid {
        let radius = radius.max(M / 2.0);
        let segments = segments.max(3);
        let outline: Vec<[f64; 2]> = (0..segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / segments as f64;
                [radius * angle.cos(), radius * angle.sin()]
            })
            .collect();
        let ht = thickness.max(M) / 2.0;
        self.convex_prism(&outline, -ht, ht)
    }

    /// Extrude a counter-clockwise outline, centred in z.
    pub fn extrude_outline(&self, outline: &[Point], thickness: f64) -> Solid {
        let points: Vec<[f64; 2]> = outline.iter().map(|p| [p.x, p.y]).collect();
        let sketch: Sketch<()> = Sketch::polygon(&points, None);
        self.extrude_sketch(&sketch, thickness, -thickness / 2.0)
    }

    /// Extrude a 2D sketch upward by `height`, starting at `z`.
    pub fn extrude_sketch(&self, sketch: &Sketch<()>, height: f64, z: f64) -> Solid {
        let mesh = sketch.extrude(height);
        self.adopt(mesh).translated(0.0, 0.0, z)
    }

    /// `a ∪ b` as the complement of `a' ∩ b'`.
    ///
    /// csgrs' `union` and `difference` pass through faces whose bounds miss
    /// the other operand, so a fully contained operand is never clipped.
    /// Both operations go through `intersection`, which clips every face.
    pub fn union(&self, a: Solid, b: Solid) -> Solid {
        let complement = a.mesh.inverse().intersection(&b.mesh.inverse());
        self.adopt(complement.inverse())
    }

    /// Union of every solid, `None` when there are none.
    pub fn union_all(&self, solids: impl IntoIterator<Item = Solid>) -> Option<Solid> {
        solids.into_iter().reduce(|acc, s| self.union(acc, s))
    }

    /// `a ∩ cutter'`.
    pub fn subtract(&self, a: Solid, cutter: &Solid) -> Solid {
        self.adopt(a.mesh.intersection(&cutter.mesh.inverse()))
    }

    pub fn intersect(&self, a: Solid, volume: &Solid) -> Solid {
        self.adopt(a.mesh.intersection(&volume.mesh))
    }
}

fn flat_polygon(points: &[Point3<f64>]) -> Polygon<()> {
    let normal = face_normal(points);
    let vertices = points.iter().map(|p| Vertex::new(*p, normal)).collect();
    Polygon::new(vertices, None)
}

/// Newell normal of a planar polygon.
fn face_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n.try_normalize(1e-12).unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds() {
        let kernel = CsgKernel::default();
        let b = kernel.cuboid(2.0, 4.0, 1.0).bounds().unwrap();
        assert_eq!(b.min, [-1.0, -2.0, -0.5]);
        assert_eq!(b.max, [1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_face_normals_point_outward() {
        let kernel = CsgKernel::default();
        let solid = kernel.cuboid(2.0, 2.0, 2.0);
        for poly in &solid.mesh().polygons {
            let centroid = poly
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
                / poly.vertices.len() as f64;
            assert!(centroid.dot(&poly.vertices[0].normal) > 0.0);
        }
    }

    #[test]
    fn test_live_count_tracks_drops() {
        let kernel = CsgKernel::default();
        let a = kernel.cuboid(1.0, 1.0, 1.0);
        let b = kernel.cylinder(0.3, 2.0, 16);
        assert_eq!(kernel.live_solids(), 2);
        let cut = kernel.subtract(a, &b);
        assert_eq!(kernel.live_solids(), 2);
        drop(b);
        drop(cut);
        assert_eq!(kernel.live_solids(), 0);
        assert_eq!(kernel.solids_created(), 3);
    }

    #[test]
    fn test_transforms_keep_handle() {
        let kernel = CsgKernel::default();
        let solid = kernel.cuboid(2.0, 1.0, 1.0).rotated_z(90.0).translated(5.0, 0.0, 0.0);
        assert_eq!(kernel.live_solids(), 1);
        let b = solid.bounds().unwrap();
        assert!((b.min[0] - 4.5).abs() < 1e-9);
        assert!((b.max[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_subtract_contained_subject_is_empty() {
        let kernel = CsgKernel::default();
        let pad = kernel.cuboid(1.0, 1.0, 0.035).translated(0.0, 0.0, 0.8);
        let cutter = kernel.cuboid(10.0, 10.0, 10.0);
        let cut = kernel.subtract(pad, &cutter);
        assert!(cut.is_empty(), "{} polygons left", cut.polygon_count());
    }

    #[test]
    fn test_subtract_partial_overlap() {
        let kernel = CsgKernel::default();
        let slab = kernel.cuboid(4.0, 2.0, 1.0);
        let cutter = kernel.cuboid(4.0, 4.0, 4.0).translated(2.0, 0.0, 0.0);
        let b = kernel.subtract(slab, &cutter).bounds().unwrap();
        assert!((b.min[0] + 2.0).abs() < 1e-9);
        assert!(b.max[0].abs() < 1e-9);
    }

    #[test]
    fn test_subtract_disjoint_cutter_keeps_subject() {
        let kernel = CsgKernel::default();
        let slab = kernel.cuboid(2.0, 2.0, 1.0);
        let cutter = kernel.cuboid(1.0, 1.0, 1.0).translated(10.0, 0.0, 0.0);
        let b = kernel.subtract(slab, &cutter).bounds().unwrap();
        assert_eq!(b.min, [-1.0, -1.0, -0.5]);
        assert_eq!(b.max, [1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_union_drops_contained_operand() {
        let kernel = CsgKernel::default();
        let outer = kernel.cuboid(10.0, 10.0, 10.0);
        let inner = kernel.cuboid(1.0, 1.0, 1.0);
        let merged = kernel.union(outer, inner);
        assert!(!merged.is_empty());
        for poly in &merged.mesh().polygons {
            for v in &poly.vertices {
                let on_hull = [v.pos.x, v.pos.y, v.pos.z]
                    .iter()
                    .any(|c| (c.abs() - 5.0).abs() < 1e-9);
                assert!(on_hull, "interior vertex {:?}", v.pos);
            }
        }
    }

    #[test]
    fn test_union_of_disjoint_solids_spans_both() {
        let kernel = CsgKernel::default();
        let a = kernel.cuboid(1.0, 1.0, 1.0);
        let b = kernel.cuboid(1.0, 1.0, 1.0).translated(5.0, 0.0, 0.0);
        let b = kernel.union(a, b).bounds().unwrap();
        assert!((b.min[0] + 0.5).abs() < 1e-9);
        assert!((b.max[0] - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_union_all_empty() {
        let kernel = CsgKernel::default();
        assert!(kernel.union_all(Vec::new()).is_none());
    }
}
