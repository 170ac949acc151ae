//! Solid to render-buffer conversion.

use serde::Serialize;

use crate::kernel::{Bounds3, Solid};

/// Triangle buffers for one finished feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedMesh {
    /// Stable per-record key such as `ph-H1` or `smt_pad-top-3`.
    pub key: String,
    /// xyz triples.
    pub positions: Vec<f32>,
    /// Per-vertex normals, xyz triples.
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Linear RGB.
    pub color: [f32; 3],
}

impl ExportedMesh {
    /// Fan-triangulate every face of `solid`. Kernel faces are convex.
    pub fn from_solid(key: impl Into<String>, solid: &Solid, color: [f32; 3]) -> Self {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for polygon in &solid.mesh().polygons {
            if polygon.vertices.len() < 3 {
                continue;
            }
            let base = (positions.len() / 3) as u32;
            for v in &polygon.vertices {
                positions.extend_from_slice(&[v.pos.x as f32, v.pos.y as f32, v.pos.z as f32]);
                normals.extend_from_slice(&[
                    v.normal.x as f32,
                    v.normal.y as f32,
                    v.normal.z as f32,
                ]);
            }
            for i in 1..polygon.vertices.len() as u32 - 1 {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
        }

        Self {
            key: key.into(),
            positions,
            normals,
            indices,
            color,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let mut b = Bounds3 {
            min: [first[0] as f64, first[1] as f64, first[2] as f64],
            max: [first[0] as f64, first[1] as f64, first[2] as f64],
        };
        for c in chunks {
            for axis in 0..3 {
                b.min[axis] = b.min[axis].min(c[axis] as f64);
                b.max[axis] = b.max[axis].max(c[axis] as f64);
            }
        }
        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CsgKernel;

    #[test]
    fn test_box_export() {
        let kernel = CsgKernel::default();
        let solid = kernel.cuboid(1.0, 1.0, 1.0);
        let mesh = ExportedMesh::from_solid("board", &solid, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        let b = mesh.bounds().unwrap();
        assert_eq!(b.max, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_empty_solid_exports_empty_mesh() {
        let kernel = CsgKernel::default();
        let mesh = ExportedMesh::from_solid("x", &kernel.empty(), [1.0, 1.0, 1.0]);
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }
}
